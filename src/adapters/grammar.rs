use async_trait::async_trait;

use super::layout;
use super::traits::{ConcreteSyntax, ProgramModelAdapter};
use crate::core::descriptor::{
    EditDescriptor, ExpressionDescriptor, MemberDescriptor, StatementDescriptor, TypeRef,
};
use crate::core::error::FixError;
use crate::model::{
    Document, Language, NodeKind, NodeRef, Parameter, SyntaxEdit, SyntaxNode, TextSpan, TreeEdit,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingOptions {
    /// One level of indentation.
    pub indent: String,
}

impl FormattingOptions {
    pub fn spaces(width: usize) -> Self {
        Self {
            indent: " ".repeat(width),
        }
    }

    pub fn tabs() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self::spaces(4)
    }
}

/// The token-level knowledge of one concrete syntax.
pub trait Grammar: Send + Sync {
    fn language(&self) -> Language;

    fn names_equal(&self, a: &str, b: &str) -> bool;

    fn type_name(&self, ty: &TypeRef) -> String;

    /// Whether a type as written in source denotes `ty`.
    fn type_matches(&self, written: &str, ty: &TypeRef) -> bool;

    fn member_lines(&self, member: &MemberDescriptor, unit: &str) -> Vec<String>;

    fn statement_lines(&self, statement: &StatementDescriptor, unit: &str) -> Vec<String>;

    fn expression_text(&self, expression: &ExpressionDescriptor) -> Result<String, FixError>;

    /// Offset of the token closing `declaration`'s member list.
    fn members_closer(&self, text: &str, declaration: &SyntaxNode) -> Option<usize>;

    /// Offset just past the token opening `owner`'s statement body.
    fn body_opener_end(&self, text: &str, owner: &SyntaxNode) -> Option<usize>;
}

/// [`ProgramModelAdapter`] for any [`Grammar`]: tree navigation and placement
/// are shared, tokens come from `G`.
pub struct GrammarAdapter<G: Grammar> {
    grammar: G,
    options: FormattingOptions,
}

impl<G: Grammar> GrammarAdapter<G> {
    pub fn new(grammar: G, options: FormattingOptions) -> Self {
        Self { grammar, options }
    }

    fn ensure_language(&self, document: &Document) -> Result<(), FixError> {
        if document.language() == self.grammar.language() {
            Ok(())
        } else {
            Err(FixError::Realization(format!(
                "{} is a {} document, adapter handles {}",
                document.id(),
                document.language(),
                self.grammar.language()
            )))
        }
    }

    fn path_to<'d>(
        &self,
        document: &'d Document,
        span: TextSpan,
    ) -> Result<Vec<&'d SyntaxNode>, FixError> {
        let path = match document.slice(span) {
            Some(_) => document.root().path_to(span),
            None => Vec::new(),
        };
        if path.is_empty() {
            return Err(FixError::Location {
                document: document.id().clone(),
                span,
            });
        }
        Ok(path)
    }

    fn unsupported(&self, descriptor: &'static str) -> FixError {
        FixError::SynthesisUnsupported {
            language: self.grammar.language(),
            descriptor,
        }
    }
}

#[async_trait]
impl<G: Grammar> ProgramModelAdapter for GrammarAdapter<G> {
    fn language(&self) -> Language {
        self.grammar.language()
    }

    fn names_equal(&self, a: &str, b: &str) -> bool {
        self.grammar.names_equal(a, b)
    }

    fn supports(&self, descriptor: &EditDescriptor) -> bool {
        match descriptor {
            EditDescriptor::ReplaceNode { replacement, .. } => {
                self.grammar.expression_text(replacement).is_ok()
            }
            EditDescriptor::AddMember { .. }
            | EditDescriptor::InsertStatement { .. }
            | EditDescriptor::RemoveNode { .. } => true,
        }
    }

    fn has_member(&self, declaration: &SyntaxNode, member: &MemberDescriptor) -> bool {
        declaration.children.iter().any(|child| {
            child.kind == NodeKind::Method
                && child
                    .name()
                    .is_some_and(|name| self.names_equal(name, &member.name))
                && child.parameters.len() == member.parameters.len()
                && child
                    .parameters
                    .iter()
                    .zip(&member.parameters)
                    .all(|(written, wanted)| self.grammar.type_matches(&written.type_name, &wanted.ty))
        })
    }

    async fn find_node(&self, document: &Document, span: TextSpan) -> Result<SyntaxNode, FixError> {
        let path = self.path_to(document, span)?;
        Ok(path[path.len() - 1].clone())
    }

    async fn find_enclosing_declaration(
        &self,
        document: &Document,
        span: TextSpan,
    ) -> Result<Option<SyntaxNode>, FixError> {
        let path = self.path_to(document, span)?;
        Ok(path
            .into_iter()
            .rev()
            .find(|node| node.kind.is_declaration())
            .cloned())
    }

    async fn synthesize_member(&self, member: &MemberDescriptor) -> Result<ConcreteSyntax, FixError> {
        Ok(ConcreteSyntax {
            kind: NodeKind::Method,
            name: Some(member.name.clone()),
            parameters: member
                .parameters
                .iter()
                .map(|p| Parameter {
                    name: p.name.clone(),
                    type_name: self.grammar.type_name(&p.ty),
                })
                .collect(),
            lines: self.grammar.member_lines(member, &self.options.indent),
        })
    }

    async fn synthesize_statement(
        &self,
        statement: &StatementDescriptor,
    ) -> Result<ConcreteSyntax, FixError> {
        let name = match statement {
            StatementDescriptor::ThrowIfNull { parameter } => Some(parameter.clone()),
            StatementDescriptor::Throw(_) => None,
        };
        Ok(ConcreteSyntax {
            kind: NodeKind::Statement,
            name,
            parameters: Vec::new(),
            lines: self.grammar.statement_lines(statement, &self.options.indent),
        })
    }

    async fn synthesize_expression(
        &self,
        expression: &ExpressionDescriptor,
    ) -> Result<ConcreteSyntax, FixError> {
        let text = self
            .grammar
            .expression_text(expression)
            .map_err(|_| self.unsupported("replace-node"))?;
        Ok(ConcreteSyntax {
            kind: NodeKind::Expression,
            name: None,
            parameters: Vec::new(),
            lines: vec![text],
        })
    }

    async fn add_member(
        &self,
        document: &Document,
        declaration: &SyntaxNode,
        member: ConcreteSyntax,
    ) -> Result<Document, FixError> {
        self.ensure_language(document)?;
        if !declaration.kind.is_type() {
            return Err(FixError::Realization(format!(
                "cannot add a member to a {}",
                declaration.kind
            )));
        }
        let closer = self
            .grammar
            .members_closer(document.text(), declaration)
            .ok_or_else(|| {
                FixError::Realization(format!("{} has no closing token", NodeRef::of(declaration)))
            })?;
        let placement = layout::before_closer(
            document.text(),
            closer,
            &self.options.indent,
            &member.lines,
            !declaration.children.is_empty(),
        )?;
        document.apply(SyntaxEdit {
            span: placement.span,
            replacement: placement.replacement,
            tree: TreeEdit::Insert {
                parent: NodeRef::of(declaration),
                node: member.node(placement.node_span),
            },
        })
    }

    async fn insert_statement(
        &self,
        document: &Document,
        owner: &SyntaxNode,
        statement: ConcreteSyntax,
    ) -> Result<Document, FixError> {
        self.ensure_language(document)?;
        if !owner.kind.has_body() {
            return Err(FixError::Realization(format!(
                "a {} has no statement body",
                owner.kind
            )));
        }
        let anchor = self
            .grammar
            .body_opener_end(document.text(), owner)
            .ok_or_else(|| {
                FixError::Realization(format!("{} has no block body", NodeRef::of(owner)))
            })?;
        let base = layout::indentation_at(document.text(), owner.span.start);
        let placement = layout::after_opener(
            document.text(),
            anchor,
            base,
            &self.options.indent,
            &statement.lines,
        )?;
        document.apply(SyntaxEdit {
            span: placement.span,
            replacement: placement.replacement,
            tree: TreeEdit::Insert {
                parent: NodeRef::of(owner),
                node: statement.node(placement.node_span),
            },
        })
    }

    async fn replace_node(
        &self,
        document: &Document,
        target: &SyntaxNode,
        replacement: ConcreteSyntax,
    ) -> Result<Document, FixError> {
        self.ensure_language(document)?;
        let text = replacement.lines.join("\n");
        let span = TextSpan::new(target.span.start, target.span.start + text.len());
        document.apply(SyntaxEdit {
            span: target.span,
            replacement: text,
            tree: TreeEdit::Replace {
                target: NodeRef::of(target),
                node: replacement.node(span),
            },
        })
    }

    async fn remove_node(&self, document: &Document, target: &SyntaxNode) -> Result<Document, FixError> {
        self.ensure_language(document)?;
        document.apply(SyntaxEdit {
            span: layout::removal_span(document.text(), target.span),
            replacement: String::new(),
            tree: TreeEdit::Remove {
                target: NodeRef::of(target),
            },
        })
    }
}
