//! Emit synthesized constants as an inherent `impl` block.

use peephole_core::Member;
use peephole_syntax::visibility_tokens;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Item, LitStr};

use super::RewriteError;

/// Generated impl for one type.
#[derive(Debug, Default)]
pub struct Emitted {
    /// `None` when no constant could be emitted.
    pub item: Option<Item>,
    pub count: usize,
    /// Synthesized names that are not valid Rust identifiers (keywords, explicit names with punctuation).
    pub invalid_names: Vec<String>,
}

pub fn constants_impl(ident: &Ident, generics: &syn::Generics, constants: &[&Member]) -> Result<Emitted, RewriteError> {
    let mut emitted = Emitted::default();
    let mut tokens = Vec::with_capacity(constants.len());
    for constant in constants {
        let Ok(name) = syn::parse_str::<Ident>(&constant.name) else {
            emitted.invalid_names.push(constant.name.clone());
            continue;
        };
        let value_text = constant.initializer.as_deref().unwrap_or("\"\"");
        let value: LitStr = syn::parse_str(value_text)
            .map_err(|e| RewriteError::Emit(format!("initializer {value_text} of {}: {e}", constant.name)))?;

        let vis = visibility_tokens(constant.modifiers.visibility);
        let allow = if constant.name.chars().any(char::is_lowercase) {
            quote!(#[allow(non_upper_case_globals)])
        } else {
            TokenStream::new()
        };
        tokens.push(quote! {
            #allow
            #vis const #name: &'static str = #value;
        });
    }

    if tokens.is_empty() {
        return Ok(emitted);
    }
    emitted.count = tokens.len();

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let block = quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            #(#tokens)*
        }
    };
    emitted.item = Some(syn::parse2(block).map_err(|e| RewriteError::Emit(e.to_string()))?);
    Ok(emitted)
}
