// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use colored::Color;
use ttcal_core::{Event, Recurrence};

use crate::arg::OutputFormat;
use crate::table::{PaddingDirection, Table, TableColumn};

#[derive(Debug)]
pub struct EventFormatter {
    columns: Vec<EventColumn>,
    format: OutputFormat,
}

impl EventFormatter {
    pub fn new(verbose: bool) -> Self {
        let mut columns = vec![
            EventColumn::Course,
            EventColumn::Day,
            EventColumn::Periods,
            EventColumn::Weeks,
            EventColumn::Location,
            EventColumn::Teacher,
            EventColumn::Occurrences,
        ];
        if verbose {
            columns.push(EventColumn::Recurrence);
            columns.push(EventColumn::Uid);
        }

        Self {
            columns,
            format: OutputFormat::Table,
        }
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format<'a>(&'a self, events: &'a [Event]) -> Display<'a> {
        Display {
            events,
            formatter: self,
        }
    }
}

#[derive(Debug)]
pub struct Display<'a> {
    events: &'a [Event],
    formatter: &'a EventFormatter,
}

impl fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.formatter.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(self.events).map_err(|_| fmt::Error)?;
                writeln!(f, "{json}")
            }
            OutputFormat::Table => write!(f, "{}", Table::new(&self.formatter.columns, self.events)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventColumn {
    Course,
    Day,
    Periods,
    Weeks,
    Location,
    Teacher,
    Occurrences,
    Recurrence,
    Uid,
}

impl TableColumn<Event> for EventColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            EventColumn::Course => "Course",
            EventColumn::Day => "Day",
            EventColumn::Periods => "Periods",
            EventColumn::Weeks => "Weeks",
            EventColumn::Location => "Location",
            EventColumn::Teacher => "Teacher",
            EventColumn::Occurrences => "Count",
            EventColumn::Recurrence => "Repeat",
            EventColumn::Uid => "UID",
        }
        .into()
    }

    fn format<'a>(&self, event: &'a Event) -> Cow<'a, str> {
        match self {
            EventColumn::Course => match event.course_type.as_deref() {
                Some(course_type) if !course_type.is_empty() => {
                    format!("{}{}", course_type, event.summary()).into()
                }
                _ => event.summary().into(),
            },
            EventColumn::Day => event.day_label.as_str().into(),
            EventColumn::Periods if event.start_period == event.end_period => {
                event.start_period.to_string().into()
            }
            EventColumn::Periods => format!("{}-{}", event.start_period, event.end_period).into(),
            EventColumn::Weeks => event.weeks_raw.as_str().into(),
            EventColumn::Location => event.location.as_str().into(),
            EventColumn::Teacher => event.teacher.as_str().into(),
            EventColumn::Occurrences => event.occurrences.len().to_string().into(),
            EventColumn::Recurrence => match &event.recurrence {
                Recurrence::Single => "once".into(),
                Recurrence::Weekly { interval: 1, .. } => "weekly".into(),
                Recurrence::Weekly { interval, .. } => format!("every {interval} weeks").into(),
                Recurrence::Dates { dates } => format!("{} dates", dates.len() + 1).into(),
            },
            EventColumn::Uid => event.uid.as_str().into(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            EventColumn::Periods | EventColumn::Occurrences => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn color(&self, _event: &Event) -> Option<Color> {
        match self {
            EventColumn::Day => Some(Color::Cyan),
            EventColumn::Uid => Some(Color::BrightBlack),
            _ => None,
        }
    }
}
