// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, value_parser};
use colored::Colorize;
use jiff::Timestamp;
use tokio::{fs, io::AsyncWriteExt};
use ttcal_core::{FormatOptions, ParseResult, serialize_with};

use crate::arg::{ParseOverrides, TimetableArgs};
use crate::config::Config;
use crate::util::read_timetable;

/// What `generate` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CalendarFormat {
    Ics,
    Json,
}

#[derive(Debug, Clone)]
pub struct CmdGenerate {
    pub input: PathBuf,
    pub overrides: ParseOverrides,
    pub format: CalendarFormat,
    pub output: Option<PathBuf>,
    pub fold: bool,
}

impl CmdGenerate {
    pub const NAME: &str = "generate";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("gen")
            .about("Convert a timetable into an iCalendar file")
            .arg(TimetableArgs::input())
            .arg(TimetableArgs::start())
            .arg(TimetableArgs::tz())
            .arg(
                arg!(--format <FORMAT> "Output format")
                    .value_parser(value_parser!(CalendarFormat))
                    .default_value("ics"),
            )
            .arg(
                arg!(-o --output <FILE> "Write to FILE instead of standard output")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(arg!(--fold "Fold lines longer than 75 octets (RFC 5545)"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            input: TimetableArgs::get_input(matches),
            overrides: TimetableArgs::get_overrides(matches),
            format: matches
                .get_one("format")
                .copied()
                .unwrap_or(CalendarFormat::Ics),
            output: matches.get_one("output").cloned(),
            fold: matches.get_flag("fold"),
        }
    }

    pub async fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "generating calendar...");
        let options = self.overrides.apply(&config.core);
        let result = read_timetable(&self.input, &options, None).await?;
        let content = self.render(&result, config, Timestamp::now())?;

        match &self.output {
            Some(path) => {
                fs::write(path, content)
                    .await
                    .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
                eprintln!(
                    "{} {} events ({} occurrences) to {}",
                    "Wrote".green(),
                    result.events.len(),
                    result.occurrence_count(),
                    path.display()
                );
            }
            None => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(content.as_bytes()).await?;
                stdout.flush().await?;
            }
        }
        Ok(())
    }

    fn render(
        &self,
        result: &ParseResult,
        config: &Config,
        stamp: Timestamp,
    ) -> Result<String, Box<dyn Error>> {
        match self.format {
            CalendarFormat::Ics => {
                let folding = (self.fold || config.output.fold)
                    .then_some(FormatOptions::RFC_LINE_LENGTH);
                let options = FormatOptions::default().folding(folding);
                Ok(serialize_with(
                    &result.events,
                    &result.time_zone,
                    stamp,
                    options,
                ))
            }
            CalendarFormat::Json => Ok(serde_json::to_string_pretty(&result.events)?),
        }
    }
}
