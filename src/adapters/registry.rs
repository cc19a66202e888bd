use std::sync::Arc;

use super::csharp::CSharp;
use super::grammar::{FormattingOptions, GrammarAdapter};
use super::traits::ProgramModelAdapter;
use super::visual_basic::VisualBasic;
use crate::core::error::FixError;
use crate::model::Language;

pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn ProgramModelAdapter>>,
}

impl AdapterRegistry {
    pub fn new(adapters: Vec<Arc<dyn ProgramModelAdapter>>) -> Self {
        Self { adapters }
    }

    pub fn find_adapter(&self, language: Language) -> Result<Arc<dyn ProgramModelAdapter>, FixError> {
        self.adapters
            .iter()
            .find(|a| a.language() == language)
            .cloned()
            .ok_or(FixError::NoAdapter(language))
    }
}

pub fn default_adapters(options: FormattingOptions) -> AdapterRegistry {
    let adapters: Vec<Arc<dyn ProgramModelAdapter>> = vec![
        Arc::new(GrammarAdapter::new(CSharp, options.clone())),
        Arc::new(GrammarAdapter::new(VisualBasic, options)),
    ];
    AdapterRegistry::new(adapters)
}
