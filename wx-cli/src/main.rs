//! wx CLI - Command line tool for filling missing weather station readings.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wx-cli",
    version,
    about = "Multi-station weather reading imputation toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: wx_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("wx-cli {}", env!("CARGO_PKG_VERSION"));
    wx_cmd::run(cli.command)
}
