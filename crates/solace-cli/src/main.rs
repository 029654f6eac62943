//! Solace operator tool.
//!
//! # Usage
//!
//! ```bash
//! # Seal a message for a session
//! solace encrypt --session sess-abc123 "Hôm nay mình rất mệt"
//!
//! # Open it again
//! solace decrypt --session sess-abc123 <envelope>
//!
//! # Screen text; exit status 2 means a crisis phrase matched
//! echo "mình muốn tự tử" | solace check
//!
//! # Emergency hotlines
//! solace resources --json
//! ```

use std::process::ExitCode;

use clap::Parser;
use solace_cli::{Cli, Status, run};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    match run(&cli, &mut stdin, &mut stdout) {
        Ok(Status::Success) => ExitCode::SUCCESS,
        Ok(Status::CrisisDetected) => ExitCode::from(2),
        Err(error) => {
            tracing::error!(%error, "command failed");
            ExitCode::FAILURE
        },
    }
}
