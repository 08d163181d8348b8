//! Derive the identifier of a synthesized constant from a member identifier.
//!
//! The default rule turns a camelCase identifier into a prefixed SCREAMING_SNAKE name:
//!
//! | identifier      | derived             |
//! |-----------------|---------------------|
//! | `a`             | `__A`               |
//! | `hotelName`     | `__HOTEL_NAME`      |
//! | `hotelIDNumber` | `__HOTEL_ID_NUMBER` |
//! | `id1`           | `__ID_1_`           |

use thiserror::Error;

/// Prefix used when a [`NameSpec::DerivePrefixed`] carries no prefix of its own.
pub const DEFAULT_PREFIX: &str = "__";

/// How the name of one synthesized constant is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameSpec {
    /// Run the boundary-insertion rule, starting from `prefix` (or [`DEFAULT_PREFIX`]).
    DerivePrefixed { prefix: Option<String> },
    /// Use this name verbatim.
    ExplicitLiteral(String),
}

impl Default for NameSpec {
    fn default() -> Self {
        NameSpec::DerivePrefixed { prefix: None }
    }
}

impl NameSpec {
    /// Name spec for a marker placed on a single member: `customer` is the constant's full name.
    pub fn for_member(customer: Option<&str>) -> Self {
        match customer {
            Some(name) => NameSpec::ExplicitLiteral(name.to_string()),
            None => NameSpec::default(),
        }
    }

    /// Name spec for a marker placed on a type: `customer` is the prefix shared by all its constants.
    pub fn for_type(customer: Option<&str>) -> Self {
        NameSpec::DerivePrefixed {
            prefix: customer.map(str::to_string),
        }
    }
}

/// The identifier cannot be expressed by the naming rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identifier `{identifier}` contains {offending:?}, a character outside the naming algorithm's alphabet")]
pub struct Rejected {
    pub identifier: String,
    pub offending: char,
}

/// Derive the constant name for `identifier`.
///
/// ## Parameters
/// - `identifier`: the member identifier, exactly as declared.
/// - `spec`: explicit name, or the prefix to derive with.
///
/// ## Returns
/// - (`Result<String, Rejected>`): the constant name, or the first character the rule cannot handle.
///
/// ## Notes
/// - Decimal digits of any script are always fenced by underscores: `id1` -> `__ID_1_`.
/// - An upper-case letter starts a new word when its predecessor is lower-case (only from index 2 on) or its
///   successor is lower-case. Acronym runs stay together: `hotelIDNumber` -> `__HOTEL_ID_NUMBER`.
/// - The predecessor clause starts at index 2, so `aB` derives to `__AB`.
/// - Upper-casing maps one character to one character; `ß` has no single-character upper case and is kept.
/// - An explicit literal bypasses the rule and is never rejected.
///
/// ## Examples
/// ```rust
/// use peephole_core::names::{derive, NameSpec};
/// assert_eq!(derive("hotelIDNumber", &NameSpec::default()).unwrap(), "__HOTEL_ID_NUMBER");
/// assert_eq!(derive("id1", &NameSpec::for_type(Some("F_"))).unwrap(), "F_ID_1_");
/// assert!(derive("bad name", &NameSpec::default()).is_err());
/// ```
pub fn derive(identifier: &str, spec: &NameSpec) -> Result<String, Rejected> {
    let prefix = match spec {
        NameSpec::ExplicitLiteral(name) => return Ok(name.clone()),
        NameSpec::DerivePrefixed { prefix } => prefix.as_deref().filter(|p| !p.is_empty()).unwrap_or(DEFAULT_PREFIX),
    };

    let chars: Vec<char> = identifier.chars().collect();
    let mut derived = String::with_capacity(prefix.len() + identifier.len() * 4);
    derived.push_str(prefix);

    for (i, &c) in chars.iter().enumerate() {
        if is_decimal_digit(c) {
            derived.push('_');
            derived.push(c);
            derived.push('_');
        } else if c.is_uppercase() && starts_word(&chars, i) {
            derived.push('_');
            derived.push(c);
        } else if is_identifier_char(c) {
            derived.push(upper_case(c));
        } else {
            return Err(Rejected {
                identifier: identifier.to_string(),
                offending: c,
            });
        }
    }

    Ok(derived)
}

/// Case-boundary test for the upper-case letter at `i`.
///
/// The predecessor clause uses `i > 1`, not `i > 0`: the second character never starts a word through its
/// predecessor.
fn starts_word(chars: &[char], i: usize) -> bool {
    (i > 1 && chars[i - 1].is_lowercase()) || chars.get(i + 1).is_some_and(|next| next.is_lowercase())
}

fn is_identifier_char(c: char) -> bool {
    c == '$' || unicode_ident::is_xid_continue(c)
}

/// Unicode `Nd`. Numeric continue-only characters are `Nd` except the `No` digits listed in `Other_ID_Continue`.
fn is_decimal_digit(c: char) -> bool {
    c.is_numeric()
        && unicode_ident::is_xid_continue(c)
        && !unicode_ident::is_xid_start(c)
        && !matches!(c, '\u{1369}'..='\u{1371}' | '\u{19DA}')
}

fn upper_case(c: char) -> char {
    let mut mapped = c.to_uppercase();
    match (mapped.next(), mapped.next()) {
        (Some(upper), None) => upper,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derived(identifier: &str) -> String {
        derive(identifier, &NameSpec::default()).unwrap()
    }

    // ========================================
    // Default rule
    // ========================================

    #[test]
    fn test_single_letter() {
        assert_eq!(derived("a"), "__A");
    }

    #[test]
    fn test_camel_case_words() {
        assert_eq!(derived("hotelName"), "__HOTEL_NAME");
        assert_eq!(derived("theFieldName"), "__THE_FIELD_NAME");
    }

    #[test]
    fn test_acronym_run_stays_together() {
        assert_eq!(derived("hotelIDNumber"), "__HOTEL_ID_NUMBER");
    }

    #[test]
    fn test_trailing_acronym() {
        // `I` follows a lower-case letter, `D` is followed by nothing.
        assert_eq!(derived("hotelID"), "__HOTEL_ID");
    }

    #[test]
    fn test_digits_are_fenced() {
        assert_eq!(derived("id1"), "__ID_1_");
        assert_eq!(derived("a12"), "__A_1__2_");
        assert_eq!(derived("v2Name"), "__V_2__NAME");
    }

    #[test]
    fn test_snake_case_is_upper_cased() {
        assert_eq!(derived("hotel_name"), "__HOTEL_NAME");
    }

    #[test]
    fn test_leading_upper_followed_by_lower() {
        assert_eq!(derived("Name"), "___NAME");
    }

    // ========================================
    // Asymmetric predecessor clause
    // ========================================

    #[test]
    fn test_second_char_not_split_by_predecessor() {
        assert_eq!(derived("aB"), "__AB");
        assert_eq!(derived("aBC"), "__ABC");
    }

    #[test]
    fn test_second_char_split_by_successor() {
        assert_eq!(derived("aBc"), "__A_BC");
    }

    #[test]
    fn test_third_char_split_by_predecessor() {
        assert_eq!(derived("abC"), "__AB_C");
    }

    // ========================================
    // Prefixes and literals
    // ========================================

    #[test]
    fn test_custom_prefix() {
        let spec = NameSpec::for_type(Some("F_"));
        assert_eq!(derive("hotelName", &spec).unwrap(), "F_HOTEL_NAME");
    }

    #[test]
    fn test_empty_prefix_falls_back_to_default() {
        let spec = NameSpec::for_type(Some(""));
        assert_eq!(derive("name", &spec).unwrap(), "__NAME");
    }

    #[test]
    fn test_explicit_literal_bypasses_rule() {
        let spec = NameSpec::for_member(Some("HOTEL"));
        assert_eq!(derive("bad name", &spec).unwrap(), "HOTEL");
    }

    #[test]
    fn test_for_member_without_customer_derives() {
        assert_eq!(NameSpec::for_member(None), NameSpec::default());
    }

    // ========================================
    // Rejection
    // ========================================

    #[test]
    fn test_space_is_rejected() {
        let err = derive("bad name", &NameSpec::default()).unwrap_err();
        assert_eq!(err.offending, ' ');
        assert_eq!(err.identifier, "bad name");
    }

    #[test]
    fn test_punctuation_is_rejected() {
        assert!(derive("a-b", &NameSpec::default()).is_err());
        assert!(derive("a.b", &NameSpec::default()).is_err());
    }

    #[test]
    fn test_dollar_and_underscore_are_identifier_chars() {
        assert_eq!(derived("$x"), "__$X");
        assert_eq!(derived("_x"), "___X");
    }

    #[test]
    fn test_non_ascii_letters() {
        assert_eq!(derived("straße"), "__STRAßE");
        assert_eq!(derived("éclairÉtoile"), "__ÉCLAIR_ÉTOILE");
    }

    #[test]
    fn test_combining_mark_is_identifier_char() {
        assert_eq!(derived("caf\u{301}"), "__CAFE\u{301}");
    }

    #[test]
    fn test_connecting_punctuation_is_identifier_char() {
        assert_eq!(derived("prix\u{203F}eur"), "__PRIX\u{203F}EUR");
    }

    #[test]
    fn test_non_ascii_decimal_digits_are_fenced() {
        assert_eq!(derived("a\u{663}"), "__A_\u{663}_");
        assert_eq!(derived("x\u{FF11}"), "__X_\u{FF11}_");
    }

    #[test]
    fn test_other_numerics_are_not_fenced() {
        // Roman numeral twelve is a letter number, Ethiopic digit one is `No`.
        assert_eq!(derived("a\u{216B}"), "__A\u{216B}");
        assert_eq!(derived("a\u{1369}"), "__A\u{1369}");
    }

    #[test]
    fn test_symbols_are_rejected() {
        assert_eq!(derive("a\u{B2}", &NameSpec::default()).unwrap_err().offending, '\u{B2}');
    }

    #[test]
    fn test_empty_identifier_yields_prefix() {
        assert_eq!(derived(""), "__");
    }
}
