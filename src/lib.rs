//! bindery - Service binding registries for Rust
//!
//! Facade over `bindery-core` and the `#[binding]` attribute. Annotate
//! implementations with `#[bindery::binding]`, run `cargo bindery collect` at
//! build time and resolve the registries at runtime with a [`ServiceBinder`].
pub use bindery_core::*;
pub use bindery_macros::binding;
