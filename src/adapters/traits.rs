use async_trait::async_trait;

use crate::core::descriptor::{
    EditDescriptor, ExpressionDescriptor, MemberDescriptor, StatementDescriptor,
};
use crate::core::error::FixError;
use crate::model::{Document, Language, NodeKind, Parameter, SyntaxNode, TextSpan};

/// Concrete syntax synthesized for one grammar, not yet placed in a document.
/// `lines` are relative to the insertion indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteSyntax {
    pub kind: NodeKind,
    pub name: Option<String>,
    pub parameters: Vec<Parameter>,
    pub lines: Vec<String>,
}

impl ConcreteSyntax {
    /// Outline node for the synthesized text once it sits at `span`.
    pub fn node(&self, span: TextSpan) -> SyntaxNode {
        SyntaxNode {
            kind: self.kind,
            name: self.name.clone(),
            span,
            parameters: self.parameters.clone(),
            children: Vec::new(),
        }
    }
}

/// Capability interface over one concrete syntax.
///
/// Every operation that produces a document returns a fresh snapshot; the input
/// is never modified.
#[async_trait]
pub trait ProgramModelAdapter: Send + Sync {
    fn language(&self) -> Language;

    /// Identifier comparison under this grammar's case rules.
    fn names_equal(&self, a: &str, b: &str) -> bool;

    /// Whether every part of `descriptor` has a rendering in this grammar.
    fn supports(&self, descriptor: &EditDescriptor) -> bool;

    /// Whether `declaration` already declares a method shaped like `member`.
    fn has_member(&self, declaration: &SyntaxNode, member: &MemberDescriptor) -> bool;

    /// Innermost node containing `span`.
    async fn find_node(&self, document: &Document, span: TextSpan) -> Result<SyntaxNode, FixError>;

    /// Innermost declaration containing `span`, `None` outside any declaration.
    async fn find_enclosing_declaration(
        &self,
        document: &Document,
        span: TextSpan,
    ) -> Result<Option<SyntaxNode>, FixError>;

    async fn synthesize_member(&self, member: &MemberDescriptor) -> Result<ConcreteSyntax, FixError>;

    async fn synthesize_statement(
        &self,
        statement: &StatementDescriptor,
    ) -> Result<ConcreteSyntax, FixError>;

    async fn synthesize_expression(
        &self,
        expression: &ExpressionDescriptor,
    ) -> Result<ConcreteSyntax, FixError>;

    /// Appends `member` as the last member of `declaration`.
    async fn add_member(
        &self,
        document: &Document,
        declaration: &SyntaxNode,
        member: ConcreteSyntax,
    ) -> Result<Document, FixError>;

    /// Inserts `statement` as the first statement of `owner`'s body.
    async fn insert_statement(
        &self,
        document: &Document,
        owner: &SyntaxNode,
        statement: ConcreteSyntax,
    ) -> Result<Document, FixError>;

    async fn replace_node(
        &self,
        document: &Document,
        target: &SyntaxNode,
        replacement: ConcreteSyntax,
    ) -> Result<Document, FixError>;

    async fn remove_node(&self, document: &Document, target: &SyntaxNode) -> Result<Document, FixError>;
}
