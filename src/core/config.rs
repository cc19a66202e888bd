use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::adapters::FormattingOptions;

pub const CONFIG_FILE: &str = ".remedy.yml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub indent_size: Option<usize>,
    pub use_tabs: Option<bool>,
    pub ignore: Option<IgnoreConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreConfig {
    pub rules: Option<Vec<String>>,
}

impl Config {
    pub fn load(project_path: &Path) -> Self {
        let config_path = project_path.join(CONFIG_FILE);
        if config_path.exists() {
            if let Ok(content) = std::fs::read_to_string(&config_path) {
                match serde_yaml::from_str::<Config>(&content) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("ignoring {}: {}", config_path.display(), e),
                }
            }
        }
        Config::default()
    }

    pub fn formatting(&self) -> FormattingOptions {
        if self.use_tabs.unwrap_or(false) {
            FormattingOptions::tabs()
        } else {
            FormattingOptions::spaces(self.indent_size.unwrap_or(4))
        }
    }

    pub fn is_ignored(&self, rule: &str) -> bool {
        self.ignore
            .as_ref()
            .and_then(|ignore| ignore.rules.as_ref())
            .is_some_and(|rules| rules.iter().any(|r| r.eq_ignore_ascii_case(rule)))
    }
}
