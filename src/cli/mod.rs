pub mod commands;
pub mod output;
pub mod progress;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "remedy",
    version,
    about = "Apply minimal fixes for rule violations in C# and Visual Basic sources"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply every fixable violation to the snapshots under a path
    Fix(commands::fix::FixArgs),
    /// Print the source one fix would produce
    Preview(commands::preview::PreviewArgs),
    /// Write a default .remedy.yml
    Init(commands::init::InitArgs),
}
