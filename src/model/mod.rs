pub mod document;
pub mod span;
pub mod syntax;

pub use document::{Document, DocumentId, DocumentSnapshot, Language, SyntaxEdit, TreeEdit};
pub use span::{map_span_through, TextChange, TextSpan};
pub use syntax::{NodeKind, NodeRef, Parameter, SyntaxNode};
