use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::core::config::CONFIG_FILE;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to the project (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing .remedy.yml
    #[arg(long)]
    pub force: bool,
}

pub async fn execute(args: &InitArgs) -> Result<()> {
    let path = args.path.canonicalize()?;
    let config_path = path.join(CONFIG_FILE);

    if config_path.exists() && !args.force {
        println!(
            "  {} {} already exists. Use {} to overwrite.",
            "SKIP".yellow(),
            CONFIG_FILE,
            "--force".bold()
        );
        return Ok(());
    }

    std::fs::write(&config_path, default_config())?;
    println!("  {} {} created", "DONE".green(), CONFIG_FILE);
    println!(
        "  Edit {} to set indentation and ignored rules.",
        config_path.display()
    );

    Ok(())
}

fn default_config() -> &'static str {
    r#"# remedy configuration

# Indentation of generated members and statements
indent_size: 4
use_tabs: false

# Rules never fixed automatically
ignore:
  rules: []
"#
}
