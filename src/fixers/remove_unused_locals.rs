use async_trait::async_trait;

use super::traits::{declaration_at, node_at, DescriptorBuilder};
use crate::adapters::ProgramModelAdapter;
use crate::core::descriptor::EditDescriptor;
use crate::core::violation::Violation;
use crate::model::{Document, NodeKind, NodeRef};

/// CA1804: deletes a local that is declared but never read.
pub struct RemoveUnusedLocalsFixer;

#[async_trait]
impl DescriptorBuilder for RemoveUnusedLocalsFixer {
    fn handles(&self) -> &[&str] {
        &["CA1804"]
    }

    fn title(&self) -> &str {
        "Remove unused locals"
    }

    async fn build(
        &self,
        violation: &Violation,
        document: &Document,
        adapter: &dyn ProgramModelAdapter,
    ) -> Option<EditDescriptor> {
        let local = node_at(violation, document, adapter).await?;
        if local.kind != NodeKind::LocalDeclaration {
            return None;
        }
        if let Some(symbol) = violation.property("symbol") {
            let named = local.name().is_some_and(|name| adapter.names_equal(name, symbol));
            if !named {
                return None;
            }
        }
        // locals only exist inside a member
        declaration_at(violation, document, adapter).await?;

        Some(EditDescriptor::RemoveNode {
            target: NodeRef::of(&local),
        })
    }
}
