//! Conformance CLI - runs fixture programs through a toolchain in every mode
//!
//! Exits with status 0 when every case produced its expected output and 1
//! otherwise.

use clap::Parser;
use conformance::{cli, commands::RunArgs, common::logging};

#[derive(Parser)]
#[command(name = "conformance", about = "Fixture-driven conformance harness")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_cli(cli.run.verbose);

    match cli::dispatch(cli.run).await {
        Ok(summary) => {
            if let Some(e) = summary.error() {
                eprintln!("Error: {e}");
            }
            if !summary.success() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
