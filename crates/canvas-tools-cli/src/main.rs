//! Bulk administration utilities for Canvas LMS.

use canvas_tools_cli::app::Cli;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match canvas_tools_cli::run(cli) {
        Ok(summary) => {
            log::info!(
                "Done: {} succeeded, {} failed",
                summary.succeeded.len(),
                summary.failed.len()
            );
            if !summary.failed.is_empty() {
                log::warn!("Failed: {}", summary.failed.join(", "));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err:?}");
            ExitCode::FAILURE
        }
    }
}
