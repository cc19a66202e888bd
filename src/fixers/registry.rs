use std::sync::Arc;

use super::empty_string::EmptyStringFixer;
use super::override_member::OverrideMemberFixer;
use super::remove_unused_locals::RemoveUnusedLocalsFixer;
use super::traits::DescriptorBuilder;
use super::validate_arguments::ValidateArgumentsFixer;

pub struct FixerRegistry {
    fixers: Vec<Arc<dyn DescriptorBuilder>>,
}

impl FixerRegistry {
    pub fn new(fixers: Vec<Arc<dyn DescriptorBuilder>>) -> Self {
        Self { fixers }
    }

    pub fn find_fixer(&self, rule: &str) -> Option<Arc<dyn DescriptorBuilder>> {
        self.fixers
            .iter()
            .find(|f| f.handles().contains(&rule))
            .cloned()
    }
}

pub fn default_registry() -> FixerRegistry {
    let fixers: Vec<Arc<dyn DescriptorBuilder>> = vec![
        Arc::new(OverrideMemberFixer::equals()),
        Arc::new(OverrideMemberFixer::get_hash_code()),
        Arc::new(RemoveUnusedLocalsFixer),
        Arc::new(EmptyStringFixer),
        Arc::new(ValidateArgumentsFixer),
    ];
    FixerRegistry::new(fixers)
}
