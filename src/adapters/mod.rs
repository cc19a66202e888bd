pub mod csharp;
pub mod grammar;
pub mod layout;
pub mod registry;
pub mod traits;
pub mod visual_basic;

pub use grammar::FormattingOptions;
pub use registry::{default_adapters, AdapterRegistry};
pub use traits::{ConcreteSyntax, ProgramModelAdapter};
