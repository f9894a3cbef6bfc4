// Author: Dustin Pilgrim
// License: MIT

use eyre::Result;
use serde_json::json;

use lull::core::info::millis;
use lull::utils::format_duration_readable;

use crate::cli::{Args, Command};

pub fn run(args: &Args, command: Command) -> Result<()> {
    match command {
        Command::Config { json } => {
            let (cfg, source) = lull::config::load(args.config.as_deref())?;
            let cfg = cfg.with_overrides(&args.overrides());

            if json {
                let out = json!({
                    "timeout_ms": millis(cfg.timeout),
                    "auto_hide": cfg.auto_hide,
                    "auto_start": cfg.auto_start,
                    "transition_ms": millis(cfg.transition),
                    "source": source.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Source:      {source}");
                println!("Timeout:     {}", format_duration_readable(cfg.timeout));
                println!("Auto-hide:   {}", cfg.auto_hide);
                println!("Auto-start:  {}", cfg.auto_start);
                println!("Transition:  {}", format_duration_readable(cfg.transition));
            }

            Ok(())
        }
    }
}
