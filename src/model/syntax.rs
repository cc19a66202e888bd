use serde::{Deserialize, Serialize};

use super::span::{TextChange, TextSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    CompilationUnit,
    Namespace,
    Class,
    Struct,
    Interface,
    Module,
    Method,
    Operator,
    Constructor,
    Property,
    Field,
    LocalFunction,
    LocalDeclaration,
    Statement,
    Expression,
}

impl NodeKind {
    pub fn is_declaration(&self) -> bool {
        !matches!(
            self,
            NodeKind::CompilationUnit
                | NodeKind::LocalDeclaration
                | NodeKind::Statement
                | NodeKind::Expression
        )
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeKind::Class | NodeKind::Struct | NodeKind::Interface | NodeKind::Module
        )
    }

    /// Kinds that own a statement body.
    pub fn has_body(&self) -> bool {
        matches!(
            self,
            NodeKind::Method | NodeKind::Operator | NodeKind::Constructor | NodeKind::LocalFunction
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::CompilationUnit => "compilation unit",
            NodeKind::Namespace => "namespace",
            NodeKind::Class => "class",
            NodeKind::Struct => "struct",
            NodeKind::Interface => "interface",
            NodeKind::Module => "module",
            NodeKind::Method => "method",
            NodeKind::Operator => "operator",
            NodeKind::Constructor => "constructor",
            NodeKind::Property => "property",
            NodeKind::Field => "field",
            NodeKind::LocalFunction => "local function",
            NodeKind::LocalDeclaration => "local declaration",
            NodeKind::Statement => "statement",
            NodeKind::Expression => "expression",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Addresses a node in one snapshot without borrowing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub kind: NodeKind,
    pub span: TextSpan,
}

impl NodeRef {
    pub fn of(node: &SyntaxNode) -> Self {
        Self {
            kind: node.kind,
            span: node.span,
        }
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}

/// Outline node of a parsed source unit. Children are ordered by position and
/// nested strictly inside their parent's span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub span: TextSpan,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, span: TextSpan) -> Self {
        Self {
            kind,
            name: None,
            span,
            parameters: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Nodes from `self` down to the innermost one containing `span`.
    /// Empty when `span` is outside `self`.
    pub fn path_to(&self, span: TextSpan) -> Vec<&SyntaxNode> {
        let mut path = Vec::new();
        if !self.span.contains(&span) {
            return path;
        }
        let mut current = self;
        path.push(current);
        while let Some(child) = current.children.iter().find(|c| c.span.contains(&span)) {
            path.push(child);
            current = child;
        }
        path
    }

    pub fn find(&self, target: NodeRef) -> Option<&SyntaxNode> {
        if self.kind == target.kind && self.span == target.span {
            return Some(self);
        }
        self.children
            .iter()
            .filter(|c| c.span.contains(&target.span))
            .find_map(|c| c.find(target))
    }

    /// Checks the nesting invariant for the whole subtree.
    pub fn is_well_formed(&self) -> bool {
        let mut previous_end = self.span.start;
        for child in &self.children {
            if !self.span.contains(&child.span) || child.span.start < previous_end {
                return false;
            }
            if !child.is_well_formed() {
                return false;
            }
            previous_end = child.span.end;
        }
        true
    }

    /// First span in the subtree that runs backwards or splits a character of `text`.
    pub fn misplaced_span(&self, text: &str) -> Option<TextSpan> {
        let fits = self.span.start <= self.span.end
            && text.is_char_boundary(self.span.start)
            && text.is_char_boundary(self.span.end);
        if !fits {
            return Some(self.span);
        }
        self.children.iter().find_map(|c| c.misplaced_span(text))
    }

    /// Copy of the subtree with every span mapped through `change`. Nodes whose
    /// text was removed or partially overwritten are dropped.
    pub(crate) fn remapped(&self, change: &TextChange) -> Option<SyntaxNode> {
        let span = change.map_span(self.span)?;
        if span.is_empty() && !self.span.is_empty() {
            return None;
        }
        Some(SyntaxNode {
            kind: self.kind,
            name: self.name.clone(),
            span,
            parameters: self.parameters.clone(),
            children: self
                .children
                .iter()
                .filter_map(|c| c.remapped(change))
                .collect(),
        })
    }

    /// Removes the descendant addressed by `target`, returning its parent.
    pub(crate) fn detach(&mut self, target: NodeRef) -> Option<NodeRef> {
        if let Some(pos) = self
            .children
            .iter()
            .position(|c| c.kind == target.kind && c.span == target.span)
        {
            self.children.remove(pos);
            return Some(NodeRef::of(self));
        }
        self.children
            .iter_mut()
            .filter(|c| c.span.contains(&target.span))
            .find_map(|c| c.detach(target))
    }

    /// Inserts `node` under `parent`, keeping children ordered by position.
    pub(crate) fn attach(&mut self, parent: NodeRef, node: SyntaxNode) -> bool {
        if self.kind == parent.kind && self.span == parent.span {
            let pos = self
                .children
                .iter()
                .position(|c| c.span.start >= node.span.end)
                .unwrap_or(self.children.len());
            self.children.insert(pos, node);
            return true;
        }
        match self
            .children
            .iter_mut()
            .find(|c| c.span.contains(&parent.span) && c.find(parent).is_some())
        {
            Some(child) => child.attach(parent, node),
            None => false,
        }
    }
}
