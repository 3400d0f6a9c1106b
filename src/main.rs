// ytfetch binary entry point

use clap::Parser;
use ytfetch_lib::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ytfetch_lib::run(Cli::parse()).await
}
