// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::{Arg, ArgMatches, ValueHint, arg, value_parser};
use ttcal_core::ParseOptions;

/// The output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn verbose() -> Arg {
        arg!(-v --verbose "Show more detailed information")
    }

    pub fn get_verbose(matches: &ArgMatches) -> bool {
        matches.get_flag("verbose")
    }

    pub fn output_format() -> Arg {
        arg!(--"output-format" <FORMAT> "Output format")
            .value_parser(value_parser!(OutputFormat))
            .default_value("table")
    }

    pub fn get_output_format(matches: &ArgMatches) -> OutputFormat {
        matches
            .get_one("output-format")
            .copied()
            .unwrap_or(OutputFormat::Table)
    }
}

/// Arguments describing the timetable to read.
#[derive(Debug, Clone, Copy)]
pub struct TimetableArgs;

impl TimetableArgs {
    pub fn input() -> Arg {
        arg!(input: <INPUT> "Timetable document: .docx, Flat OPC .xml or a bare document.xml")
            .value_parser(value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath)
    }

    pub fn get_input(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input")
            .expect("input is required")
            .clone()
    }

    pub fn start() -> Arg {
        arg!(--start <DATE> "Monday of teaching week 1, e.g. 2025-09-08")
    }

    pub fn tz() -> Arg {
        arg!(--tz <ZONE> "IANA time zone of the timetable, e.g. Asia/Shanghai")
    }

    pub fn get_overrides(matches: &ArgMatches) -> ParseOverrides {
        ParseOverrides {
            start_date: matches.get_one("start").cloned(),
            time_zone: matches.get_one("tz").cloned(),
        }
    }
}

/// Parse options given on the command line; they win over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOverrides {
    pub start_date: Option<String>,
    pub time_zone: Option<String>,
}

impl ParseOverrides {
    pub fn apply(&self, base: &ParseOptions) -> ParseOptions {
        let mut options = base.clone();
        if let Some(start_date) = &self.start_date {
            options = options.start_date(start_date);
        }
        if let Some(time_zone) = &self.time_zone {
            options = options.time_zone(time_zone);
        }
        options
    }
}
