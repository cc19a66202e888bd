use async_trait::async_trait;

use crate::adapters::ProgramModelAdapter;
use crate::core::descriptor::EditDescriptor;
use crate::core::violation::Violation;
use crate::model::{Document, SyntaxNode};

#[async_trait]
pub trait DescriptorBuilder: Send + Sync {
    /// Rule IDs this builder handles
    fn handles(&self) -> &[&str];

    /// Title offered to the user
    fn title(&self) -> &str;

    /// Describe the edit that resolves `violation` in `document`, or `None` when
    /// the rule's precondition does not hold there.
    async fn build(
        &self,
        violation: &Violation,
        document: &Document,
        adapter: &dyn ProgramModelAdapter,
    ) -> Option<EditDescriptor>;
}

/// Innermost node at the violation, `None` when the span does not resolve.
pub(crate) async fn node_at(
    violation: &Violation,
    document: &Document,
    adapter: &dyn ProgramModelAdapter,
) -> Option<SyntaxNode> {
    match adapter.find_node(document, violation.span).await {
        Ok(node) => Some(node),
        Err(e) => {
            log::debug!("{}: {}", violation.rule, e);
            None
        }
    }
}

/// Innermost declaration around the violation.
pub(crate) async fn declaration_at(
    violation: &Violation,
    document: &Document,
    adapter: &dyn ProgramModelAdapter,
) -> Option<SyntaxNode> {
    match adapter
        .find_enclosing_declaration(document, violation.span)
        .await
    {
        Ok(Some(declaration)) => Some(declaration),
        Ok(None) => {
            log::debug!("{}: no declaration encloses {}", violation.rule, violation.span);
            None
        }
        Err(e) => {
            log::debug!("{}: {}", violation.rule, e);
            None
        }
    }
}
