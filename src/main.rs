use anyhow::Result;
use clap::Parser;

use remedy::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Fix(args) => {
            commands::fix::execute(args).await?;
        }
        Commands::Preview(args) => {
            commands::preview::execute(args).await?;
        }
        Commands::Init(args) => {
            commands::init::execute(args).await?;
        }
    }

    Ok(())
}
