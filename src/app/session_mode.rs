// Author: Dustin Pilgrim
// License: MIT

use eyre::{Result, WrapErr};

use lull::log::{self, LogPolicy};
use lull::{ldebug, lerror, linfo};

use super::session::Session;
use crate::cli::Args;

pub async fn run(args: Args) -> Result<()> {
    log::set_verbose(args.verbose);
    if args.verbose {
        ldebug!("Lull", "debug logging enabled");
    }

    // file logging
    if args.log_file {
        let path = log::default_log_path();
        match log::enable_file_output(&path, LogPolicy::default()) {
            Ok(()) => linfo!("Lull", "file logging enabled: {}", path.display()),
            Err(e) => lerror!("Lull", "failed to enable file logging: {}", e),
        }
    }

    linfo!("Lull", "lull starting");

    let (cfg, source) = lull::config::load(args.config.as_deref()).map_err(|e| {
        lerror!("Config", "{:#}", e);
        e
    })?;
    let cfg = cfg.with_overrides(&args.overrides());
    linfo!("Config", "using {}", source);

    // shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let mut session = Session::new(&cfg).wrap_err("failed to start session")?;
    let session_run = session.run(shutdown_rx);
    tokio::pin!(session_run);

    tokio::select! {
        res = &mut session_run => res,

        _ = tokio::signal::ctrl_c() => {
            linfo!("Lull", "received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);
            session_run.await
        }
    }
}
