use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::span::{TextChange, TextSpan};
use super::syntax::{NodeKind, NodeRef, SyntaxNode};
use crate::core::error::FixError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    CSharp,
    VisualBasic,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::CSharp => write!(f, "C#"),
            Language::VisualBasic => write!(f, "Visual Basic"),
        }
    }
}

/// How a [`SyntaxEdit`] reshapes the outline tree. Targets and parents are
/// addressed in the old snapshot; inserted nodes carry spans of the new one.
#[derive(Debug, Clone)]
pub enum TreeEdit {
    Insert { parent: NodeRef, node: SyntaxNode },
    Remove { target: NodeRef },
    Replace { target: NodeRef, node: SyntaxNode },
}

/// A concrete edit produced by an adapter: one text splice plus its tree update.
#[derive(Debug, Clone)]
pub struct SyntaxEdit {
    pub span: TextSpan,
    pub replacement: String,
    pub tree: TreeEdit,
}

/// Immutable snapshot of a parsed source unit.
///
/// Cloning is cheap; applying an edit never touches `self` and returns the next
/// snapshot, which remembers every change since the first one so older spans can
/// be carried forward.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    language: Language,
    text: Arc<str>,
    root: Arc<SyntaxNode>,
    version: usize,
    history: Arc<Vec<TextChange>>,
}

impl Document {
    pub fn new(
        id: DocumentId,
        language: Language,
        text: impl Into<Arc<str>>,
        root: SyntaxNode,
    ) -> Result<Self, FixError> {
        let text = text.into();
        if root.kind != NodeKind::CompilationUnit
            || root.span.end > text.len()
            || !root.is_well_formed()
        {
            return Err(FixError::Location {
                document: id,
                span: root.span,
            });
        }
        if let Some(span) = root.misplaced_span(&text) {
            return Err(FixError::Location { document: id, span });
        }
        Ok(Self {
            id,
            language,
            text,
            root: Arc::new(root),
            version: 0,
            history: Arc::new(Vec::new()),
        })
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn version(&self) -> usize {
        self.version
    }

    pub fn slice(&self, span: TextSpan) -> Option<&str> {
        self.text.get(span.start..span.end)
    }

    /// Changes applied after snapshot `version` of this lineage, oldest first.
    pub fn changes_since(&self, version: usize) -> &[TextChange] {
        let start = version.min(self.history.len());
        &self.history[start..]
    }

    pub fn apply(&self, edit: SyntaxEdit) -> Result<Document, FixError> {
        if self.slice(edit.span).is_none() {
            return Err(FixError::Realization(format!(
                "edit span {} is not a valid range of {}",
                edit.span, self.id
            )));
        }

        let change = TextChange::new(edit.span, edit.replacement.len());
        let mut root = (*self.root).clone();

        let (parent, node) = match edit.tree {
            TreeEdit::Insert { parent, node } => (Some(parent), Some(node)),
            TreeEdit::Remove { target } => {
                root.detach(target).ok_or_else(|| missing(target, &self.id))?;
                (None, None)
            }
            TreeEdit::Replace { target, node } => {
                let parent = root.detach(target).ok_or_else(|| missing(target, &self.id))?;
                (Some(parent), Some(node))
            }
        };

        let mut text = String::with_capacity(self.text.len() + edit.replacement.len());
        text.push_str(&self.text[..edit.span.start]);
        text.push_str(&edit.replacement);
        text.push_str(&self.text[edit.span.end..]);

        let mut root = root.remapped(&change).ok_or_else(|| {
            FixError::Realization(format!("edit at {} removes the compilation unit", edit.span))
        })?;
        root.span = TextSpan::new(0, text.len());

        if let (Some(parent), Some(node)) = (parent, node) {
            let parent = NodeRef {
                kind: parent.kind,
                span: change
                    .map_span(parent.span)
                    .ok_or_else(|| missing(parent, &self.id))?,
            };
            if !root.attach(parent, node) {
                return Err(missing(parent, &self.id));
            }
        }

        let mut history = (*self.history).clone();
        history.push(change);

        Ok(Document {
            id: self.id.clone(),
            language: self.language,
            text: text.into(),
            root: Arc::new(root),
            version: self.version + 1,
            history: Arc::new(history),
        })
    }
}

fn missing(node: NodeRef, document: &DocumentId) -> FixError {
    FixError::Realization(format!("{} no longer exists in {}", node, document))
}

/// Serialized form of a [`Document`] exchanged with the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub id: DocumentId,
    pub language: Language,
    pub text: String,
    pub root: SyntaxNode,
}

impl From<&Document> for DocumentSnapshot {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            language: document.language,
            text: document.text.to_string(),
            root: (*document.root).clone(),
        }
    }
}

impl TryFrom<DocumentSnapshot> for Document {
    type Error = FixError;

    fn try_from(snapshot: DocumentSnapshot) -> Result<Self, Self::Error> {
        Document::new(snapshot.id, snapshot.language, snapshot.text, snapshot.root)
    }
}
