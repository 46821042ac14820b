//! The `#[binding]` marker attribute.
//!
//! The attribute expands to the annotated item unchanged. `cargo bindery collect`
//! reads it from the source and records the item in the registry of its contract.
//!
//! ```ignore
//! use bindery::binding;
//!
//! #[binding]                     // contract inferred from the single trait implemented
//! pub struct Polite;
//!
//! #[binding(contract = Greeter)] // explicit contract
//! pub struct Loud;
//! ```

use proc_macro::TokenStream;

mod binding;

/// Marks a struct, enum, union, trait or function as an implementation to register.
///
/// Accepted forms: `#[binding]`, `#[binding(Path)]`, `#[binding(contract = Path)]`
/// and the same with the path given as a string literal.
#[proc_macro_attribute]
pub fn binding(attr: TokenStream, item: TokenStream) -> TokenStream {
    binding::binding(attr, item)
}
