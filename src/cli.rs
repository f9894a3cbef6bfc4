// Author: Dustin Pilgrim
// License: MIT

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use lull::config::Overrides;
use lull::utils::{parse_duration, parse_duration_allow_zero};

#[derive(Parser, Debug)]
#[command(
    name = "lull",
    version = env!("CARGO_PKG_VERSION"),
    about = "Auto-hiding overlay driven by an idle timer"
)]
pub struct Args {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action)]
    pub verbose: bool,

    /// Also write the log to the cache directory
    #[arg(long, action)]
    pub log_file: bool,

    /// Idle timeout, e.g. "5s", "1m 30s", "750ms"
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Fade length for showing and hiding, e.g. "200ms"; "0ms" disables the fade
    #[arg(long, value_name = "DURATION", value_parser = parse_duration_allow_zero)]
    pub transition: Option<Duration>,

    /// Keep the overlay up when the idle timeout elapses
    #[arg(long, action)]
    pub no_auto_hide: bool,

    /// Do not start the countdown until the first interaction
    #[arg(long, action)]
    pub no_auto_start: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Print the effective configuration")]
    Config {
        #[arg(long)]
        json: bool,
    },
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            timeout: self.timeout,
            transition: self.transition,
            no_auto_hide: self.no_auto_hide,
            no_auto_start: self.no_auto_start,
        }
    }
}
