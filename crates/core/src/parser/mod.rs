//! Rust source scanning using tree-sitter
//!
//! This is the collector's front end for Rust code: it finds items carrying
//! the binding attribute and the trait impls needed to infer their contracts.

pub mod declaration_scanner;
pub mod module_path;
pub mod rust_parser;
pub mod source_set;
pub mod utils;

// Re-export commonly used items
pub use declaration_scanner::{DeclarationScanner, ScannedFile, ScannedItem, TraitImpl};
pub use module_path::ModulePath;
pub use rust_parser::RustParser;
pub use source_set::SourceSet;
pub use utils::node_to_position;
