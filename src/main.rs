// Author: Dustin Pilgrim
// License: MIT

mod app;
mod cli;

use clap::Parser;

// One thread: every timer, gesture and fade callback is serialized.
#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    let args = cli::Args::parse();

    if let Some(command) = args.command.clone() {
        return app::command::run(&args, command);
    }

    app::session_mode::run(args).await
}
