//! Derive macro for name-peephole constants.
//!
//! `#[derive(PeepIn)]` lowers a struct into the `peephole_core` declaration tree, runs every `#[peep_in]` marker it
//! carries, and emits an inherent `impl` holding the synthesized constants.
//!
//! - `#[peep_in]` on the struct: one constant per eligible named field, names derived with the default `__` prefix.
//! - `#[peep_in(customer = "F_")]` on the struct: same, with `F_` as prefix.
//! - `#[peep_in]` on a field: one constant for that field; `customer = "NAME"` names it explicitly.
//! - `level = "public" | "protected" | "package" | "private" | "none"` picks the visibility (`none` disables).
//!
//! Errors (markers on enums or tuple fields, malformed arguments) become `compile_error!` at the marker. Stable proc
//! macros have no warning channel, so skipped members (name already taken, name does not fit the rule) simply get no
//! constant; `peephole check` reports them.
//!
//! A derive only sees the item it is attached to, never the `impl` blocks beside it. A constant the user already
//! declared in a separate `impl` (say `impl Hotel { const __NAME: &str = "x"; }`) is therefore not seen as taken: the
//! derive emits its own `__NAME` and rustc rejects the pair with E0592 (duplicate definitions). Run `peephole check`
//! on the file to get the skip warning instead, or name the constant explicitly with `customer`.

use peephole_core::{Engine, Marker, Member, MemberKind, Modifiers, Occurrence, Severity, TypeDeclaration, TypeKind};
use peephole_syntax::{ident_text, markers, parse_marker, visibility, visibility_tokens};
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Attribute, Data, DeriveInput, LitStr, parse_macro_input, spanned::Spanned};

/// Generates name-peephole constants for a struct.
///
/// # Example
/// ```ignore
/// #[derive(PeepIn)]
/// #[peep_in]
/// struct Hotel {
///     hotel_name: String,
///     #[peep_in(customer = "STARS")]
///     star_rating: u8,
/// }
///
/// // Generates:
/// impl Hotel {
///     pub const __HOTEL_NAME: &'static str = "hotel_name";
///     pub const STARS: &'static str = "star_rating";
/// }
/// ```
#[proc_macro_derive(PeepIn, attributes(peep_in))]
pub fn derive_peep_in(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input).unwrap_or_else(syn::Error::into_compile_error).into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let (mut owner, occurrences) = lower(input)?;

    let engine = Engine::default();
    let mut errors: Option<syn::Error> = None;
    for (occurrence, span) in &occurrences {
        for diagnostic in engine.handle(&mut owner, occurrence) {
            if diagnostic.severity != Severity::Error {
                continue;
            }
            let error = syn::Error::new(*span, diagnostic.message);
            match errors.as_mut() {
                Some(errors) => errors.combine(error),
                None => errors = Some(error),
            }
        }
    }
    if let Some(errors) = errors {
        return Err(errors);
    }

    emit(input, &owner)
}

// ============================================================================
// Lowering
// ============================================================================

/// Lower the derive input into a declaration plus its occurrences (type-level first), each with the span of its marker.
fn lower(input: &DeriveInput) -> syn::Result<(TypeDeclaration, Vec<(Occurrence, Span)>)> {
    let kind = match &input.data {
        Data::Struct(_) | Data::Union(_) => TypeKind::Class,
        Data::Enum(_) => TypeKind::Enum,
    };
    let mut owner = TypeDeclaration::new(ident_text(&input.ident), kind);
    let mut occurrences = Vec::new();

    if let Some((marker, span)) = find_marker(&input.attrs)? {
        owner.marked = true;
        occurrences.push((Occurrence::on_type(marker), span));
    }

    let fields: Vec<&syn::Field> = match &input.data {
        Data::Struct(data) => data.fields.iter().collect(),
        Data::Union(data) => data.fields.named.iter().collect(),
        Data::Enum(data) => {
            // Variant fields are not members of the enum; markers on them are still errors.
            for variant in &data.variants {
                for field in variant.fields.iter() {
                    if let Some((_, span)) = find_marker(&field.attrs)? {
                        return Err(syn::Error::new(span, "#[peep_in] is only supported on a struct or a named field"));
                    }
                }
            }
            Vec::new()
        }
    };

    for (index, field) in fields.into_iter().enumerate() {
        let mut member = match &field.ident {
            Some(ident) => Member::field(ident_text(ident), visibility(&field.vis)),
            None => Member::new(index.to_string(), MemberKind::Positional, Modifiers::instance(visibility(&field.vis))),
        };
        let marker = find_marker(&field.attrs)?;
        member.marked = marker.is_some();
        let id = owner.push(member);
        if let Some((marker, span)) = marker {
            occurrences.push((Occurrence::on_field(id, marker), span));
        }
    }

    Ok((owner, occurrences))
}

/// Parse the single `#[peep_in(...)]` attribute in `attrs`, if any.
fn find_marker(attrs: &[Attribute]) -> syn::Result<Option<(Marker, Span)>> {
    let mut found: Option<(Marker, Span)> = None;
    for attr in markers(attrs, peephole_core::MARKER) {
        if found.is_some() {
            return Err(syn::Error::new(attr.span(), "duplicate #[peep_in] attribute"));
        }
        found = Some((parse_marker(attr)?, attr.span()));
    }
    Ok(found)
}

// ============================================================================
// Emission
// ============================================================================

fn emit(input: &DeriveInput, owner: &TypeDeclaration) -> syn::Result<TokenStream2> {
    let constants = owner
        .synthesized()
        .map(|constant| emit_constant(input, constant))
        .collect::<syn::Result<Vec<_>>>()?;
    if constants.is_empty() {
        return Ok(TokenStream2::new());
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #(#constants)*
        }
    })
}

fn emit_constant(input: &DeriveInput, constant: &Member) -> syn::Result<TokenStream2> {
    let ident = syn::parse_str::<syn::Ident>(&constant.name)
        .map_err(|_| syn::Error::new(input.ident.span(), format!("`{}` is not a valid constant name", constant.name)))?;
    let value: LitStr = syn::parse_str(constant.initializer.as_deref().unwrap_or("\"\""))?;
    let vis = visibility_tokens(constant.modifiers.visibility);
    let allow = if constant.name.chars().any(char::is_lowercase) {
        quote!(#[allow(non_upper_case_globals)])
    } else {
        TokenStream2::new()
    };
    Ok(quote! {
        #allow
        #vis const #ident: &'static str = #value;
    })
}
