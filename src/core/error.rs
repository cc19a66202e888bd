use thiserror::Error;

use crate::model::{DocumentId, Language, TextSpan};

/// Failures of the fix pipeline.
///
/// Only `Realization` reaches users as a failed fix. Location and synthesis
/// errors mean the fix is never offered, and `Canceled` becomes a partial result.
#[derive(Debug, Clone, Error)]
pub enum FixError {
    #[error("span {span} does not resolve to a node in {document}")]
    Location { document: DocumentId, span: TextSpan },

    #[error("{language} cannot realize a {descriptor} edit")]
    SynthesisUnsupported {
        language: Language,
        descriptor: &'static str,
    },

    #[error("realization failed: {0}")]
    Realization(String),

    #[error("fix action is {0}, expected registered")]
    InvalidState(String),

    #[error("operation canceled")]
    Canceled,

    #[error("unknown document: {0}")]
    UnknownDocument(DocumentId),

    #[error("no adapter registered for {0}")]
    NoAdapter(Language),
}
