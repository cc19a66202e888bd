use std::sync::Arc;

use super::action::{FixAction, FixState, SkipReason};
use super::cancel::CancellationToken;
use super::error::FixError;
use crate::adapters::ProgramModelAdapter;
use crate::model::{map_span_through, Document, TextChange, TextSpan};

/// Outcome of folding one document's fixes.
#[derive(Debug)]
pub struct AggregateResult {
    pub document: Document,
    /// Every candidate in registration order, in its terminal state.
    pub actions: Vec<FixAction>,
}

impl AggregateResult {
    pub fn realized(&self) -> impl Iterator<Item = &FixAction> {
        self.actions
            .iter()
            .filter(|a| *a.state() == FixState::Realized)
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&FixAction, &SkipReason)> {
        self.actions.iter().filter_map(|a| match a.state() {
            FixState::Skipped(reason) => Some((a, reason)),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&FixAction, &str)> {
        self.actions.iter().filter_map(|a| match a.state() {
            FixState::Failed(error) => Some((a, error.as_str())),
            _ => None,
        })
    }
}

/// Applies many fixes to one document as a single consistent edit.
///
/// Candidates run in registration order against the snapshot produced by the
/// fixes before them. Each is remapped and rebuilt first, so a violation that an
/// earlier fix already resolved is skipped as invalidated; a fix touching text
/// an earlier fix claimed is skipped as an overlap. Failures stay contained to
/// their own action.
pub struct BatchAggregator {
    adapter: Arc<dyn ProgramModelAdapter>,
}

impl BatchAggregator {
    pub fn new(adapter: Arc<dyn ProgramModelAdapter>) -> Self {
        Self { adapter }
    }

    pub async fn aggregate(
        &self,
        document: Document,
        actions: Vec<FixAction>,
        token: &CancellationToken,
    ) -> AggregateResult {
        self.aggregate_with_progress(document, actions, token, |_| {})
            .await
    }

    pub async fn aggregate_with_progress<F>(
        &self,
        document: Document,
        mut actions: Vec<FixAction>,
        token: &CancellationToken,
        mut on_realized: F,
    ) -> AggregateResult
    where
        F: FnMut(&FixAction) + Send,
    {
        actions.sort_by_key(|a| a.id());
        let origin = document.version();
        let mut current = document;
        let mut claimed: Vec<TextSpan> = Vec::new();

        for action in actions.iter_mut() {
            if *action.state() != FixState::Registered {
                continue;
            }
            if token.is_cancelled() {
                action.skip(SkipReason::Canceled);
                continue;
            }

            let span = match map_span_through(current.changes_since(origin), action.violation().span) {
                Some(span) => span,
                None => {
                    log::debug!("fix {} lost its span to an earlier edit", action.id());
                    action.skip(SkipReason::Invalidated);
                    continue;
                }
            };
            if !action.rebase(span, &current, self.adapter.as_ref()).await {
                log::debug!("fix {} no longer applies", action.id());
                action.skip(SkipReason::Invalidated);
                continue;
            }

            let target = action.descriptor().target().span;
            if let Some(conflict) = claimed.iter().find(|c| c.overlaps(&target)) {
                log::debug!("fix {} at {} overlaps {}", action.id(), target, conflict);
                action.skip(SkipReason::Overlap { claimed: *conflict });
                continue;
            }

            match action.realize(&current, self.adapter.as_ref(), token).await {
                Ok(next) => {
                    let changes = next.changes_since(current.version());
                    claimed = claimed
                        .iter()
                        .filter_map(|c| map_span_through(changes, *c))
                        .collect();
                    claimed.push(touched(changes, target));
                    current = next;
                    on_realized(action);
                }
                Err(FixError::Canceled) => action.skip(SkipReason::Canceled),
                Err(e) => log::warn!("fix {} ({}) failed: {}", action.id(), action.title(), e),
            }
        }

        AggregateResult {
            document: current,
            actions,
        }
    }
}

/// Region of the new text a realized fix owns: its target when that survives
/// the edit, otherwise the inserted text.
fn touched(changes: &[TextChange], target: TextSpan) -> TextSpan {
    map_span_through(changes, target).unwrap_or_else(|| {
        changes.last().map_or(target, |change| {
            TextSpan::new(change.span.start, change.span.start + change.inserted)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::FixId;
    use crate::core::descriptor::{EditDescriptor, StatementDescriptor};
    use crate::core::violation::Violation;
    use crate::fixers::{default_registry, DescriptorBuilder};
    use crate::model::{DocumentId, Language, NodeKind, NodeRef, SyntaxNode};
    use crate::testing::{
        csharp_adapter, csharp_document, nested_document, span_of, FixedDescriptor,
    };

    async fn actions(document: &Document, violations: Vec<Violation>) -> Vec<FixAction> {
        let registry = default_registry();
        let adapter = csharp_adapter();
        let mut actions = Vec::new();
        for (i, violation) in violations.into_iter().enumerate() {
            let builder: Arc<dyn DescriptorBuilder> = registry.find_fixer(&violation.rule).unwrap();
            let descriptor = builder
                .build(&violation, document, adapter.as_ref())
                .await
                .unwrap();
            actions.push(FixAction::new(
                FixId(i + 1),
                builder.title().to_string(),
                violation,
                descriptor,
                builder,
            ));
        }
        actions
    }

    fn ca2224(document: &Document, needle: &str) -> Violation {
        Violation::new("CA2224", document.id().clone(), span_of(document, needle))
    }

    #[tokio::test]
    async fn test_duplicate_request_is_invalidated() {
        let document = csharp_document();
        let candidates = actions(&document, vec![ca2224(&document, "P"), ca2224(&document, "P")]).await;
        let result = BatchAggregator::new(csharp_adapter())
            .aggregate(document, candidates, &CancellationToken::new())
            .await;

        assert_eq!(result.actions[0].state(), &FixState::Realized);
        assert_eq!(
            result.actions[1].state(),
            &FixState::Skipped(SkipReason::Invalidated)
        );
        assert_eq!(result.document.text().matches("Equals").count(), 1);
    }

    #[tokio::test]
    async fn test_nested_overlap_outer_first() {
        let document = nested_document();
        let candidates = actions(
            &document,
            vec![ca2224(&document, "Outer"), ca2224(&document, "Inner")],
        )
        .await;
        let result = BatchAggregator::new(csharp_adapter())
            .aggregate(document, candidates, &CancellationToken::new())
            .await;

        assert_eq!(result.actions[0].state(), &FixState::Realized);
        assert!(matches!(
            result.actions[1].state(),
            FixState::Skipped(SkipReason::Overlap { .. })
        ));
        assert_eq!(result.realized().count(), 1);
    }

    #[tokio::test]
    async fn test_nested_overlap_inner_first() {
        let document = nested_document();
        let candidates = actions(
            &document,
            vec![ca2224(&document, "Inner"), ca2224(&document, "Outer")],
        )
        .await;
        let result = BatchAggregator::new(csharp_adapter())
            .aggregate(document, candidates, &CancellationToken::new())
            .await;

        assert_eq!(result.actions[0].state(), &FixState::Realized);
        assert!(matches!(
            result.actions[1].state(),
            FixState::Skipped(SkipReason::Overlap { .. })
        ));
        assert_eq!(result.skipped().count(), 1);
    }

    #[tokio::test]
    async fn test_independent_fixes_compose() {
        let document = csharp_document();
        let candidates = actions(
            &document,
            vec![
                ca2224(&document, "P"),
                Violation::new(
                    "CA1062",
                    DocumentId::from("docA"),
                    span_of(&document, "object value"),
                )
                .with_property("parameter", "value"),
            ],
        )
        .await;
        let result = BatchAggregator::new(csharp_adapter())
            .aggregate(document, candidates, &CancellationToken::new())
            .await;

        assert_eq!(result.realized().count(), 2);
        let text = result.document.text();
        assert!(text.contains("public override bool Equals(object obj)"));
        assert!(text.contains("throw new System.ArgumentNullException(nameof(value));"));
        assert!(result.document.root().is_well_formed());
    }

    #[tokio::test]
    async fn test_cancel_from_progress_keeps_partial_result() {
        let document = csharp_document();
        let candidates = actions(
            &document,
            vec![
                ca2224(&document, "P"),
                Violation::new(
                    "CA1062",
                    DocumentId::from("docA"),
                    span_of(&document, "object value"),
                )
                .with_property("parameter", "value"),
                Violation::new(
                    "CA1804",
                    DocumentId::from("docA"),
                    span_of(&document, "int unused = 0;"),
                ),
            ],
        )
        .await;
        let token = CancellationToken::new();
        let trigger = token.clone();
        let result = BatchAggregator::new(csharp_adapter())
            .aggregate_with_progress(document, candidates, &token, |_| trigger.cancel())
            .await;

        assert_eq!(result.actions[0].state(), &FixState::Realized);
        for action in &result.actions[1..] {
            assert_eq!(action.state(), &FixState::Skipped(SkipReason::Canceled));
        }
        assert!(result.document.text().contains("Equals(object obj)"));
        assert!(result.document.text().contains("int unused = 0;"));
    }

    #[tokio::test]
    async fn test_failure_is_contained() {
        let document = csharp_document();
        let mut candidates = actions(
            &document,
            vec![
                Violation::new(
                    "CA1804",
                    DocumentId::from("docA"),
                    span_of(&document, "int unused = 0;"),
                ),
                ca2224(&document, "P"),
            ],
        )
        .await;
        // a statement cannot be inserted into a class body
        let class_q = document
            .root()
            .children
            .iter()
            .find(|c| c.name() == Some("Q"))
            .map(NodeRef::of)
            .unwrap();
        let broken = EditDescriptor::InsertStatement {
            body_owner: class_q,
            statement: StatementDescriptor::ThrowIfNull {
                parameter: "value".to_string(),
            },
        };
        candidates.push(FixAction::new(
            FixId(0),
            "broken",
            ca2224(&document, "Q"),
            broken.clone(),
            Arc::new(FixedDescriptor(broken)),
        ));
        let result = BatchAggregator::new(csharp_adapter())
            .aggregate(document, candidates, &CancellationToken::new())
            .await;

        assert_eq!(result.realized().count(), 2);
        let failed: Vec<_> = result.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0.id(), FixId(0));
        assert!(!result.document.text().contains("int unused"));
    }

    #[tokio::test]
    async fn test_fix_inside_removed_text_is_invalidated() {
        let document = csharp_document();
        let local = || {
            Violation::new(
                "CA1804",
                DocumentId::from("docA"),
                span_of(&document, "int unused = 0;"),
            )
        };
        let candidates = actions(&document, vec![local(), local()]).await;
        let result = BatchAggregator::new(csharp_adapter())
            .aggregate(document.clone(), candidates, &CancellationToken::new())
            .await;

        assert_eq!(result.actions[0].state(), &FixState::Realized);
        assert_eq!(
            result.actions[1].state(),
            &FixState::Skipped(SkipReason::Invalidated)
        );
        assert!(!result.document.text().contains("int unused"));
    }

    #[tokio::test]
    async fn test_removal_does_not_claim_the_next_line() {
        let text = "class A\n{\n}\nclass B\n{\n    public static bool operator ==(B a, B b) { return true; }\n}\n";
        let b_start = text.find("class B").unwrap();
        let op_start = text.find("public").unwrap();
        let op_end = text.find("true; }").unwrap() + "true; }".len();
        let root = SyntaxNode::new(NodeKind::CompilationUnit, TextSpan::new(0, text.len()))
            .with_children(vec![
                SyntaxNode::new(NodeKind::Class, TextSpan::new(0, b_start - 1)).named("A"),
                SyntaxNode::new(NodeKind::Class, TextSpan::new(b_start, text.len() - 1))
                    .named("B")
                    .with_children(vec![SyntaxNode::new(
                        NodeKind::Operator,
                        TextSpan::new(op_start, op_end),
                    )
                    .named("op_Equality")]),
            ]);
        let document =
            Document::new(DocumentId::from("docR"), Language::CSharp, text, root).unwrap();

        let class_a = NodeRef::of(&document.root().children[0]);
        let remove = EditDescriptor::RemoveNode { target: class_a };
        let mut candidates = vec![FixAction::new(
            FixId(0),
            "remove A",
            Violation::new("TEST003", DocumentId::from("docR"), class_a.span),
            remove.clone(),
            Arc::new(FixedDescriptor(remove)),
        )];
        candidates.extend(actions(&document, vec![ca2224(&document, "B")]).await);

        let result = BatchAggregator::new(csharp_adapter())
            .aggregate(document, candidates, &CancellationToken::new())
            .await;

        assert_eq!(result.realized().count(), 2);
        let text = result.document.text();
        assert!(text.starts_with("class B\n"));
        assert!(text.contains("public override bool Equals(object obj)"));
    }
}
