//! Grammar-neutral descriptions of edits.
//!
//! Nothing here names a concrete token: types are semantic categories and
//! members are described by name, accessibility and shape. Adapters turn these
//! into C# or Visual Basic text.

use serde::Serialize;

use crate::model::NodeRef;

pub const OBJECT_EQUALS: &str = "Equals";
pub const OBJECT_GET_HASH_CODE: &str = "GetHashCode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpecialType {
    Object,
    Boolean,
    Int32,
    String,
    Void,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeRef {
    Special(SpecialType),
    Named(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Accessibility {
    Public,
    Protected,
    Internal,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modifier {
    Static,
    Override,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExceptionKind {
    NotImplemented,
    ArgumentNull { parameter: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub ty: TypeRef,
}

/// A method to be declared. `return_type: None` means no return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDescriptor {
    pub name: String,
    pub accessibility: Accessibility,
    pub modifiers: Vec<Modifier>,
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: Option<TypeRef>,
    pub body: Vec<StatementDescriptor>,
}

impl MemberDescriptor {
    /// `Equals(object)` override whose body throws "not implemented", leaving a
    /// compiling placeholder that fails loudly until completed by hand.
    pub fn equals_stub() -> Self {
        Self {
            name: OBJECT_EQUALS.to_string(),
            accessibility: Accessibility::Public,
            modifiers: vec![Modifier::Override],
            parameters: vec![ParameterDescriptor {
                name: "obj".to_string(),
                ty: TypeRef::Special(SpecialType::Object),
            }],
            return_type: Some(TypeRef::Special(SpecialType::Boolean)),
            body: vec![StatementDescriptor::Throw(ExceptionKind::NotImplemented)],
        }
    }

    pub fn get_hash_code_stub() -> Self {
        Self {
            name: OBJECT_GET_HASH_CODE.to_string(),
            accessibility: Accessibility::Public,
            modifiers: vec![Modifier::Override],
            parameters: Vec::new(),
            return_type: Some(TypeRef::Special(SpecialType::Int32)),
            body: vec![StatementDescriptor::Throw(ExceptionKind::NotImplemented)],
        }
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StatementDescriptor {
    Throw(ExceptionKind),
    /// Throws an argument-null exception when `parameter` is null.
    ThrowIfNull { parameter: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExpressionDescriptor {
    /// Null-or-empty test of a string operand.
    IsNullOrEmpty { operand: String },
    Throw(ExceptionKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EditDescriptor {
    AddMember {
        declaration: NodeRef,
        member: MemberDescriptor,
    },
    ReplaceNode {
        target: NodeRef,
        replacement: ExpressionDescriptor,
    },
    InsertStatement {
        body_owner: NodeRef,
        statement: StatementDescriptor,
    },
    RemoveNode {
        target: NodeRef,
    },
}

impl EditDescriptor {
    /// The node whose text the edit touches.
    pub fn target(&self) -> NodeRef {
        match self {
            EditDescriptor::AddMember { declaration, .. } => *declaration,
            EditDescriptor::ReplaceNode { target, .. } => *target,
            EditDescriptor::InsertStatement { body_owner, .. } => *body_owner,
            EditDescriptor::RemoveNode { target } => *target,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            EditDescriptor::AddMember { .. } => "add-member",
            EditDescriptor::ReplaceNode { .. } => "replace-node",
            EditDescriptor::InsertStatement { .. } => "insert-statement",
            EditDescriptor::RemoveNode { .. } => "remove-node",
        }
    }
}
