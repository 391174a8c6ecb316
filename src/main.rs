//! calcdeps CLI entry point
//!
//! Parses command-line arguments, runs the resolution pipeline, and renders
//! failures as user-friendly errors with suggestions.

use anyhow::Result;
use calcdeps::cli::Cli;
use calcdeps::core::user_friendly_error;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
