pub mod empty_string;
pub mod override_member;
pub mod registry;
pub mod remove_unused_locals;
pub mod traits;
pub mod validate_arguments;

pub use registry::{default_registry, FixerRegistry};
pub use traits::DescriptorBuilder;
