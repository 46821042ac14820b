pub mod declaration;
pub mod diagnostic;
pub mod names;
pub mod position;

// Re-export commonly used types
pub use declaration::{BindingAnnotation, ContractRef, Declaration, DeclarationKind};
pub use diagnostic::{Diagnostic, Level};
pub use names::{ContractName, ImplementationName};
pub use position::{Position, SourceLocation};
