use proc_macro::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Item, Token, parse_macro_input};

/// Attribute arguments; validated for shape only, the contract itself is
/// resolved by cargo-bindery
pub(crate) struct BindingArgs;

impl Parse for BindingArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Ok(BindingArgs);
        }

        if input.peek(syn::Ident) && input.peek2(Token![=]) {
            let key: syn::Ident = input.parse()?;
            if key != "contract" {
                return Err(syn::Error::new(
                    key.span(),
                    format!("unknown binding argument `{key}`, expected `contract`"),
                ));
            }
            input.parse::<Token![=]>()?;
        }

        if input.peek(syn::LitStr) {
            let literal: syn::LitStr = input.parse()?;
            literal.parse::<syn::Path>()?;
        } else {
            input.parse::<syn::Path>()?;
        }

        if !input.is_empty() {
            return Err(input.error("expected a single contract"));
        }
        Ok(BindingArgs)
    }
}

pub fn binding(attr: TokenStream, item: TokenStream) -> TokenStream {
    parse_macro_input!(attr as BindingArgs);
    let item = parse_macro_input!(item as Item);

    match &item {
        Item::Struct(_) | Item::Enum(_) | Item::Union(_) | Item::Trait(_) | Item::Fn(_) => {}
        other => {
            return syn::Error::new_spanned(
                other,
                "#[binding] applies to structs, enums, unions, traits and functions",
            )
            .to_compile_error()
            .into();
        }
    }

    quote! { #item }.into()
}
