// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end of ttcal: read a Word timetable, print its
//! events or write them out as an iCalendar file.

mod arg;
mod cli;
mod cmd_events;
mod cmd_generate;
mod config;
mod event_formatter;
mod table;
mod util;

pub use crate::cli::{Cli, Commands, run};
pub use crate::config::{Config, OutputConfig, parse_config};
