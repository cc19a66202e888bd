use async_trait::async_trait;

use super::traits::{node_at, DescriptorBuilder};
use crate::adapters::ProgramModelAdapter;
use crate::core::descriptor::{EditDescriptor, ExpressionDescriptor};
use crate::core::violation::Violation;
use crate::model::{Document, NodeKind, NodeRef};

const EMPTY_LITERAL: &str = "\"\"";

/// The trimmed sides of an equality test such as `s == ""` or `s <> ""`.
fn comparison_sides(source: &str) -> Option<(&str, &str)> {
    for op in ["==", "!=", "<>"] {
        if let Some((left, right)) = source.split_once(op) {
            return Some((left.trim(), right.trim()));
        }
    }
    let (left, right) = source.split_once('=')?;
    if left.ends_with(['<', '>']) {
        return None;
    }
    Some((left.trim(), right.trim()))
}

/// CA1820: rewrites a comparison against `""` as a null-or-empty test of the
/// operand named by the `operand` property.
pub struct EmptyStringFixer;

#[async_trait]
impl DescriptorBuilder for EmptyStringFixer {
    fn handles(&self) -> &[&str] {
        &["CA1820"]
    }

    fn title(&self) -> &str {
        "Test for empty strings using string length"
    }

    async fn build(
        &self,
        violation: &Violation,
        document: &Document,
        adapter: &dyn ProgramModelAdapter,
    ) -> Option<EditDescriptor> {
        let operand = violation.property("operand")?;
        let comparison = node_at(violation, document, adapter).await?;
        if comparison.kind != NodeKind::Expression {
            return None;
        }
        let source = document.slice(comparison.span)?;
        let (left, right) = comparison_sides(source)?;
        let is_operand = |side: &str| adapter.names_equal(side, operand);
        let against_empty = (is_operand(left) && right == EMPTY_LITERAL)
            || (left == EMPTY_LITERAL && is_operand(right));
        if !against_empty {
            return None;
        }

        Some(EditDescriptor::ReplaceNode {
            target: NodeRef::of(&comparison),
            replacement: ExpressionDescriptor::IsNullOrEmpty {
                operand: operand.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentId, Language, SyntaxNode, TextSpan};
    use crate::testing::{csharp_adapter, csharp_document, span_of};

    #[tokio::test]
    async fn test_replaces_empty_literal_comparison() {
        let document = csharp_document();
        let violation = Violation::new(
            "CA1820",
            DocumentId::from("docA"),
            span_of(&document, "s == \"\""),
        )
        .with_property("operand", "s");
        let descriptor = EmptyStringFixer
            .build(&violation, &document, csharp_adapter().as_ref())
            .await;
        assert_eq!(
            descriptor,
            Some(EditDescriptor::ReplaceNode {
                target: NodeRef {
                    kind: NodeKind::Expression,
                    span: span_of(&document, "s == \"\""),
                },
                replacement: ExpressionDescriptor::IsNullOrEmpty {
                    operand: "s".to_string()
                },
            })
        );
    }

    #[tokio::test]
    async fn test_requires_operand_property() {
        let document = csharp_document();
        let violation = Violation::new(
            "CA1820",
            DocumentId::from("docA"),
            span_of(&document, "s == \"\""),
        );
        let descriptor = EmptyStringFixer
            .build(&violation, &document, csharp_adapter().as_ref())
            .await;
        assert!(descriptor.is_none());
    }

    #[test]
    fn test_comparison_sides() {
        assert_eq!(comparison_sides("s == \"\""), Some(("s", "\"\"")));
        assert_eq!(comparison_sides("\"\" != s"), Some(("\"\"", "s")));
        assert_eq!(comparison_sides("s <> \"\""), Some(("s", "\"\"")));
        assert_eq!(comparison_sides("s = \"\""), Some(("s", "\"\"")));
        assert_eq!(comparison_sides("n <= 0"), None);
        assert_eq!(comparison_sides("Run(s)"), None);
    }

    #[tokio::test]
    async fn test_operand_must_be_a_whole_side() {
        let text = "class Q\n{\n    void M(string s, string x)\n    {\n        if (x == \"s\") { }\n        if (sx == \"\") { }\n    }\n}\n";
        let expression = |needle: &str| {
            let start = text.find(needle).unwrap();
            SyntaxNode::new(NodeKind::Expression, TextSpan::new(start, start + needle.len()))
        };
        let method_start = text.find("void M").unwrap();
        let root = SyntaxNode::new(NodeKind::CompilationUnit, TextSpan::new(0, text.len()))
            .with_children(vec![SyntaxNode::new(NodeKind::Class, TextSpan::new(0, text.len() - 1))
                .named("Q")
                .with_children(vec![SyntaxNode::new(
                    NodeKind::Method,
                    TextSpan::new(method_start, text.len() - 3),
                )
                .named("M")
                .with_children(vec![
                    expression("x == \"s\""),
                    expression("sx == \"\""),
                ])])]);
        let document = Document::new(DocumentId::from("docS"), Language::CSharp, text, root).unwrap();

        for needle in ["x == \"s\"", "sx == \"\""] {
            let start = text.find(needle).unwrap();
            let violation = Violation::new(
                "CA1820",
                DocumentId::from("docS"),
                TextSpan::new(start, start + needle.len()),
            )
            .with_property("operand", "s");
            let descriptor = EmptyStringFixer
                .build(&violation, &document, csharp_adapter().as_ref())
                .await;
            assert!(descriptor.is_none(), "{} must not be rewritten", needle);
        }
    }
}
