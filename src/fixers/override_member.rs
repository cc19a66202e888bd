use async_trait::async_trait;

use super::traits::{declaration_at, DescriptorBuilder};
use crate::adapters::ProgramModelAdapter;
use crate::core::descriptor::{EditDescriptor, MemberDescriptor};
use crate::core::violation::Violation;
use crate::model::{Document, NodeRef};

/// Adds a throwing override of an `Object` member to the type the violation
/// sits in. The stub compiles but fails until completed by hand.
pub struct OverrideMemberFixer {
    rules: &'static [&'static str],
    title: &'static str,
    stub: fn() -> MemberDescriptor,
}

impl OverrideMemberFixer {
    /// CA2224: types overloading `operator ==` override `Equals`.
    pub fn equals() -> Self {
        Self {
            rules: &["CA2224"],
            title: "Override Equals on overloading operator equals",
            stub: MemberDescriptor::equals_stub,
        }
    }

    /// CA2218: types overriding `Equals` override `GetHashCode`.
    pub fn get_hash_code() -> Self {
        Self {
            rules: &["CA2218"],
            title: "Override GetHashCode on overriding Equals",
            stub: MemberDescriptor::get_hash_code_stub,
        }
    }
}

#[async_trait]
impl DescriptorBuilder for OverrideMemberFixer {
    fn handles(&self) -> &[&str] {
        self.rules
    }

    fn title(&self) -> &str {
        self.title
    }

    async fn build(
        &self,
        violation: &Violation,
        document: &Document,
        adapter: &dyn ProgramModelAdapter,
    ) -> Option<EditDescriptor> {
        let declaration = declaration_at(violation, document, adapter).await?;
        if !declaration.kind.is_type() {
            log::debug!(
                "{}: innermost declaration is a {}, not a type",
                violation.rule,
                declaration.kind
            );
            return None;
        }

        let member = (self.stub)();
        if adapter.has_member(&declaration, &member) {
            return None;
        }
        Some(EditDescriptor::AddMember {
            declaration: NodeRef::of(&declaration),
            member,
        })
    }
}
