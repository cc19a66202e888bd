use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{DocumentId, TextSpan};

/// A rule violation reported by an external analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub rule: String,
    pub document: DocumentId,
    pub span: TextSpan,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl Violation {
    pub fn new(rule: impl Into<String>, document: DocumentId, span: TextSpan) -> Self {
        Self {
            rule: rule.into(),
            document,
            span,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|v| v.as_str())
    }

    /// The same violation observed at `span` of a later snapshot.
    pub fn at(&self, span: TextSpan) -> Self {
        Self {
            span,
            ..self.clone()
        }
    }
}
