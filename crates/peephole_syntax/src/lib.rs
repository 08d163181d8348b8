//! Rust syntax shared by the `#[derive(PeepIn)]` macro and the `peephole` rewriter.
//!
//! Both front ends read markers, identifiers and visibilities the same way; this crate is that one reading. It maps
//! `syn` nodes onto `peephole_core` values and back, and knows nothing about spans in files.

use peephole_core::{AccessLevel, Marker, Visibility};
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, LitStr};

/// Hint attached to malformed-marker errors.
pub const MARKER_ARGUMENTS_HINT: &str = "expected `level = \"...\"` and/or `customer = \"...\"`";

/// Every attribute in `attrs` whose path is exactly `attribute`.
pub fn markers<'i>(attrs: &'i [Attribute], attribute: &'i str) -> impl Iterator<Item = &'i Attribute> {
    attrs.iter().filter(move |a| a.path().is_ident(attribute))
}

/// Whether `attrs` carries at least one `attribute` marker.
pub fn is_marked(attrs: &[Attribute], attribute: &str) -> bool {
    markers(attrs, attribute).next().is_some()
}

/// Parse the arguments of one marker attribute.
///
/// A bare `#[peep_in]` yields the default marker. Arguments are `level = "..."` and `customer = "..."`, in any order;
/// anything else is an error spanned at the offending argument.
pub fn parse_marker(attr: &Attribute) -> syn::Result<Marker> {
    let mut marker = Marker::default();
    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(marker);
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("level") {
            let lit: LitStr = meta.value()?.parse()?;
            marker.level = lit
                .value()
                .parse::<AccessLevel>()
                .map_err(|e| syn::Error::new(lit.span(), e))?;
            Ok(())
        } else if meta.path.is_ident("customer") {
            let lit: LitStr = meta.value()?.parse()?;
            marker.customer = Some(lit.value());
            Ok(())
        } else {
            Err(meta.error(format!(
                "unknown #[{}] argument (expected `level` or `customer`)",
                attribute_name(attr)
            )))
        }
    })?;
    Ok(marker)
}

fn attribute_name(attr: &Attribute) -> String {
    attr.path()
        .segments
        .last()
        .map(|segment| segment.ident.to_string())
        .unwrap_or_default()
}

/// Identifier text without the raw `r#` prefix.
pub fn ident_text(ident: &syn::Ident) -> String {
    ident.unraw().to_string()
}

/// `pub(crate)` is package visibility; any other restriction (`pub(super)`, `pub(in path)`) is protected.
pub fn visibility(vis: &syn::Visibility) -> Visibility {
    match vis {
        syn::Visibility::Public(_) => Visibility::Public,
        syn::Visibility::Restricted(restricted) if restricted.path.is_ident("crate") => Visibility::Package,
        syn::Visibility::Restricted(_) => Visibility::Protected,
        syn::Visibility::Inherited => Visibility::Private,
    }
}

/// Tokens for a synthesized constant's visibility. `Protected` maps to the parent module.
pub fn visibility_tokens(visibility: Visibility) -> TokenStream {
    match visibility {
        Visibility::Public => quote!(pub),
        Visibility::Protected => quote!(pub(super)),
        Visibility::Package => quote!(pub(crate)),
        Visibility::Private => TokenStream::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_bare_marker_is_default() {
        let marker = parse_marker(&parse_quote!(#[peep_in])).unwrap();
        assert_eq!(marker, Marker::default());
    }

    #[test]
    fn test_marker_arguments() {
        let marker = parse_marker(&parse_quote!(#[peep_in(customer = "F_", level = "none")])).unwrap();
        assert_eq!(marker.customer(), Some("F_"));
        assert_eq!(marker.level, AccessLevel::None);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let err = parse_marker(&parse_quote!(#[peep_in(level = "internal")])).unwrap_err();
        assert!(err.to_string().contains("internal"));
    }

    #[test]
    fn test_unknown_argument_names_the_attribute() {
        let err = parse_marker(&parse_quote!(#[names(prefix = "F_")])).unwrap_err();
        assert_eq!(err.to_string(), "unknown #[names] argument (expected `level` or `customer`)");
    }

    #[test]
    fn test_markers_filters_by_path() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[derive(Debug)]),
            parse_quote!(#[peep_in]),
            parse_quote!(#[peep_in]),
        ];
        assert_eq!(markers(&attrs, "peep_in").count(), 2);
        assert!(is_marked(&attrs, "peep_in"));
        assert!(!is_marked(&attrs, "names"));
    }

    #[test]
    fn test_ident_text_unraws() {
        let raw: syn::Ident = parse_quote!(r#type);
        let plain: syn::Ident = parse_quote!(hotel);
        assert_eq!(ident_text(&raw), "type");
        assert_eq!(ident_text(&plain), "hotel");
    }

    #[test]
    fn test_visibility_mapping() {
        let cases: [(syn::Visibility, Visibility); 5] = [
            (parse_quote!(pub), Visibility::Public),
            (parse_quote!(pub(crate)), Visibility::Package),
            (parse_quote!(pub(super)), Visibility::Protected),
            (parse_quote!(pub(in crate::hotel)), Visibility::Protected),
            (syn::Visibility::Inherited, Visibility::Private),
        ];
        for (vis, expected) in cases {
            assert_eq!(visibility(&vis), expected);
        }
    }

    #[test]
    fn test_visibility_tokens() {
        assert_eq!(visibility_tokens(Visibility::Protected).to_string(), "pub (super)");
        assert!(visibility_tokens(Visibility::Private).is_empty());
    }
}
