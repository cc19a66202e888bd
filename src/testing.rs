//! Shared fixtures: small C# and Visual Basic sources with hand-built outlines.

use async_trait::async_trait;
use std::sync::Arc;

use crate::adapters::csharp::CSharp;
use crate::adapters::grammar::{FormattingOptions, GrammarAdapter};
use crate::adapters::visual_basic::VisualBasic;
use crate::adapters::ProgramModelAdapter;
use crate::core::descriptor::EditDescriptor;
use crate::core::violation::Violation;
use crate::fixers::DescriptorBuilder;
use crate::model::{Document, DocumentId, Language, NodeKind, SyntaxNode, TextSpan};

pub const CSHARP_SOURCE: &str = r#"using System;

class P
{
    public static bool operator ==(P a, P b) { return true; }
    public static bool operator !=(P a, P b) { return false; }
}

class Q
{
    public void M(string s, object value)
    {
        int unused = 0;
        if (s == "") { }
    }
}
"#;

pub const CSHARP_EQUALS_FIXED: &str = r#"using System;

class P
{
    public static bool operator ==(P a, P b) { return true; }
    public static bool operator !=(P a, P b) { return false; }

    public override bool Equals(object obj)
    {
        throw new System.NotImplementedException();
    }
}

class Q
{
    public void M(string s, object value)
    {
        int unused = 0;
        if (s == "") { }
    }
}
"#;

pub const VB_SOURCE: &str = r#"Imports System

Class P
    Public Shared Operator =(a As P, b As P) As Boolean
        Return True
    End Operator

    Public Shared Operator <>(a As P, b As P) As Boolean
        Return False
    End Operator
End Class

Class Q
    Public Sub M(s As String, value As Object)
        Dim unused As Integer = 0
        If s = "" Then
        End If
    End Sub
End Class
"#;

pub const VB_EQUALS_FIXED: &str = r#"Imports System

Class P
    Public Shared Operator =(a As P, b As P) As Boolean
        Return True
    End Operator

    Public Shared Operator <>(a As P, b As P) As Boolean
        Return False
    End Operator

    Public Overrides Function Equals(obj As Object) As Boolean
        Throw New System.NotImplementedException()
    End Function
End Class

Class Q
    Public Sub M(s As String, value As Object)
        Dim unused As Integer = 0
        If s = "" Then
        End If
    End Sub
End Class
"#;

pub const NESTED_SOURCE: &str = r#"class Outer
{
    public static bool operator ==(Outer a, Outer b) { return true; }

    class Inner
    {
        public static bool operator ==(Inner a, Inner b) { return true; }
    }
}
"#;

fn find(text: &str, needle: &str) -> TextSpan {
    let start = text
        .find(needle)
        .unwrap_or_else(|| panic!("{:?} not in fixture", needle));
    TextSpan::new(start, start + needle.len())
}

pub fn span_of(document: &Document, needle: &str) -> TextSpan {
    find(document.text(), needle)
}

/// From the start of `header` to the brace closing the first block after it.
fn braced(text: &str, header: &str) -> TextSpan {
    let start = find(text, header).start;
    let open = start + text[start..].find('{').expect("block opener");
    let mut depth = 0;
    for (i, c) in text[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return TextSpan::new(start, open + i + 1);
                }
            }
            _ => {}
        }
    }
    panic!("unbalanced block after {:?}", header)
}

/// From the start of `header` to the end of the first `terminator` after it.
fn block(text: &str, header: &str, terminator: &str) -> TextSpan {
    let start = find(text, header).start;
    let end = start + text[start..].find(terminator).expect("block terminator") + terminator.len();
    TextSpan::new(start, end)
}

fn unit(text: &str, children: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new(NodeKind::CompilationUnit, TextSpan::new(0, text.len())).with_children(children)
}

pub fn csharp_document() -> Document {
    let text = CSHARP_SOURCE;
    let root = unit(
        text,
        vec![
            SyntaxNode::new(NodeKind::Class, braced(text, "class P"))
                .named("P")
                .with_children(vec![
                    SyntaxNode::new(NodeKind::Operator, braced(text, "public static bool operator =="))
                        .named("op_Equality")
                        .with_parameter("a", "P")
                        .with_parameter("b", "P"),
                    SyntaxNode::new(NodeKind::Operator, braced(text, "public static bool operator !="))
                        .named("op_Inequality")
                        .with_parameter("a", "P")
                        .with_parameter("b", "P"),
                ]),
            SyntaxNode::new(NodeKind::Class, braced(text, "class Q"))
                .named("Q")
                .with_children(vec![SyntaxNode::new(NodeKind::Method, braced(text, "public void M"))
                    .named("M")
                    .with_parameter("s", "string")
                    .with_parameter("value", "object")
                    .with_children(vec![
                        SyntaxNode::new(NodeKind::LocalDeclaration, find(text, "int unused = 0;"))
                            .named("unused"),
                        SyntaxNode::new(NodeKind::Statement, braced(text, "if (s")).with_children(
                            vec![SyntaxNode::new(NodeKind::Expression, find(text, "s == \"\""))],
                        ),
                    ])]),
        ],
    );
    Document::new(DocumentId::from("docA"), Language::CSharp, text, root).unwrap()
}

pub fn vb_document() -> Document {
    let text = VB_SOURCE;
    let root = unit(
        text,
        vec![
            SyntaxNode::new(NodeKind::Class, block(text, "Class P", "End Class"))
                .named("P")
                .with_children(vec![
                    SyntaxNode::new(
                        NodeKind::Operator,
                        block(text, "Public Shared Operator =", "End Operator"),
                    )
                    .named("op_Equality")
                    .with_parameter("a", "P")
                    .with_parameter("b", "P"),
                    SyntaxNode::new(
                        NodeKind::Operator,
                        block(text, "Public Shared Operator <>", "End Operator"),
                    )
                    .named("op_Inequality")
                    .with_parameter("a", "P")
                    .with_parameter("b", "P"),
                ]),
            SyntaxNode::new(NodeKind::Class, block(text, "Class Q", "End Class"))
                .named("Q")
                .with_children(vec![SyntaxNode::new(
                    NodeKind::Method,
                    block(text, "Public Sub M", "End Sub"),
                )
                .named("M")
                .with_parameter("s", "String")
                .with_parameter("value", "Object")
                .with_children(vec![
                    SyntaxNode::new(NodeKind::LocalDeclaration, find(text, "Dim unused As Integer = 0"))
                        .named("unused"),
                    SyntaxNode::new(NodeKind::Statement, block(text, "If s", "End If")).with_children(
                        vec![SyntaxNode::new(NodeKind::Expression, find(text, "s = \"\""))],
                    ),
                ])]),
        ],
    );
    Document::new(DocumentId::from("docB"), Language::VisualBasic, text, root).unwrap()
}

pub fn nested_document() -> Document {
    let text = NESTED_SOURCE;
    let root = unit(
        text,
        vec![SyntaxNode::new(NodeKind::Class, braced(text, "class Outer"))
            .named("Outer")
            .with_children(vec![
                SyntaxNode::new(NodeKind::Operator, braced(text, "public static bool operator ==(Outer"))
                    .named("op_Equality"),
                SyntaxNode::new(NodeKind::Class, braced(text, "class Inner"))
                    .named("Inner")
                    .with_children(vec![SyntaxNode::new(
                        NodeKind::Operator,
                        braced(text, "public static bool operator ==(Inner"),
                    )
                    .named("op_Equality")]),
            ])],
    );
    Document::new(DocumentId::from("docN"), Language::CSharp, text, root).unwrap()
}

pub fn csharp_adapter() -> Arc<dyn ProgramModelAdapter> {
    Arc::new(GrammarAdapter::new(CSharp, FormattingOptions::default()))
}

pub fn vb_adapter() -> Arc<dyn ProgramModelAdapter> {
    Arc::new(GrammarAdapter::new(VisualBasic, FormattingOptions::default()))
}

/// Builder that offers the same descriptor wherever it is asked.
pub struct FixedDescriptor(pub EditDescriptor);

#[async_trait]
impl DescriptorBuilder for FixedDescriptor {
    fn handles(&self) -> &[&str] {
        &[]
    }

    fn title(&self) -> &str {
        "fixed descriptor"
    }

    async fn build(
        &self,
        _violation: &Violation,
        _document: &Document,
        _adapter: &dyn ProgramModelAdapter,
    ) -> Option<EditDescriptor> {
        Some(self.0.clone())
    }
}
