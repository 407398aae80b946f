// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf};

use clap::{ArgMatches, Command};
use colored::Colorize;
use ttcal_core::{Diagnostics, ParseResult};

use crate::arg::{CommonArgs, OutputFormat, ParseOverrides, TimetableArgs};
use crate::config::Config;
use crate::event_formatter::EventFormatter;
use crate::util::read_timetable;

#[derive(Debug, Clone)]
pub struct CmdEvents {
    pub input: PathBuf,
    pub overrides: ParseOverrides,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdEvents {
    pub const NAME: &str = "events";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List the events of a timetable")
            .arg(TimetableArgs::input())
            .arg(TimetableArgs::start())
            .arg(TimetableArgs::tz())
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            input: TimetableArgs::get_input(matches),
            overrides: TimetableArgs::get_overrides(matches),
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing events...");
        let (result, diagnostics) = self.load(config).await?;

        if self.output_format == OutputFormat::Table && !result.title.is_empty() {
            println!("{}", result.title.bold());
        }
        let formatter = EventFormatter::new(self.verbose).with_output_format(self.output_format);
        print!("{}", formatter.format(&result.events));

        if self.verbose && !diagnostics.is_empty() {
            eprintln!(
                "{} {} entries skipped",
                "Warning:".yellow(),
                diagnostics.len()
            );
            for skip in diagnostics.skips() {
                eprintln!("  {skip}");
            }
        }
        Ok(())
    }

    async fn load(&self, config: &Config) -> Result<(ParseResult, Diagnostics), Box<dyn Error>> {
        let options = self.overrides.apply(&config.core);
        let mut diagnostics = Diagnostics::new();
        let sink = self.verbose.then_some(&mut diagnostics);
        let result = read_timetable(&self.input, &options, sink).await?;
        Ok((result, diagnostics))
    }
}
