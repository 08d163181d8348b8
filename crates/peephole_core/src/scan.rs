//! Type-level scan: synthesize a constant for every eligible member of a type.

use crate::diagnostics::{Diagnostic, Subject, messages};
use crate::dispatch::create_for_member;
use crate::names::NameSpec;
use crate::tree::{Member, MemberId, Span, TypeDeclaration, Visibility};

/// Prefix reserved for internal-use identifiers.
pub const INTERNAL_PREFIX: char = '$';

/// Whether a type-level marker applies to `member`.
///
/// Rules, in order (the first failing rule excludes the member):
/// 1. it is a named field;
/// 2. its identifier does not start with [`INTERNAL_PREFIX`];
/// 3. it is not static;
/// 4. it is not final;
/// 5. it does not carry its own marker, which is handled by its own occurrence.
pub fn is_eligible(member: &Member) -> bool {
    member.kind.is_field_like()
        && !member.name.starts_with(INTERNAL_PREFIX)
        && !member.is_static()
        && !member.is_final()
        && !member.is_marked()
}

/// Synthesize constants for the eligible members of `owner`.
///
/// ## Parameters
/// - `owner`: the type carrying the marker.
/// - `visibility`: visibility of every synthesized constant.
/// - `spec`: naming for every member (a prefix, for type-level markers).
/// - `source`: location of the type-level annotation, used for the not-a-class error.
///
/// ## Returns
/// - (`Vec<Diagnostic>`): an error when `owner` is not class-like (nothing is processed), otherwise the warnings of
///   the members that were skipped.
///
/// ## Notes
/// - Eligibility is decided once, before anything is appended. Synthesized constants are never scanned.
#[tracing::instrument(skip_all, fields(owner = %owner.name, members = owner.members().len()))]
pub fn scan_type(
    owner: &mut TypeDeclaration,
    visibility: Visibility,
    spec: &NameSpec,
    source: Option<Span>,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if !owner.is_class_like() {
        tracing::debug!(kind = %owner.kind, "refusing to scan non-class type");
        diagnostics.push(messages::unsupported_target(Subject::Type(owner.name.clone())).with_span(source));
        return diagnostics;
    }

    let eligible: Vec<(MemberId, Option<Span>)> = owner
        .member_ids()
        .filter_map(|id| owner.member(id).filter(|m| is_eligible(m)).map(|m| (id, m.span)))
        .collect();

    for (id, span) in eligible {
        create_for_member(owner, id, visibility, spec, span, &mut diagnostics);
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Marker, Occurrence, handle};
    use crate::tree::{MemberKind, Modifiers, TypeKind};

    fn scan(ty: &mut TypeDeclaration) -> Vec<Diagnostic> {
        scan_type(ty, Visibility::Public, &NameSpec::default(), None)
    }

    #[test]
    fn test_eligibility_rules() {
        assert!(is_eligible(&Member::field("name", Visibility::Private)));
        assert!(!is_eligible(&Member::new("0", MemberKind::Positional, Modifiers::default())));
        assert!(!is_eligible(&Member::new("run", MemberKind::Method, Modifiers::default())));
        assert!(!is_eligible(&Member::field("$cache", Visibility::Private)));
        assert!(!is_eligible(&Member::field("name", Visibility::Private).marked()));

        let statik = Modifiers {
            is_static: true,
            ..Modifiers::instance(Visibility::Public)
        };
        let fin = Modifiers {
            is_final: true,
            ..Modifiers::instance(Visibility::Public)
        };
        assert!(!is_eligible(&Member::field("count", Visibility::Public).with_modifiers(statik)));
        assert!(!is_eligible(&Member::field("id", Visibility::Public).with_modifiers(fin)));
    }

    #[test]
    fn test_scan_skips_ineligible_silently() {
        let mut ty = TypeDeclaration::new("Hotel", TypeKind::Class);
        ty.push(Member::field("name", Visibility::Private));
        ty.push(Member::field("$cache", Visibility::Private));
        ty.push(Member::constant("MAX", Visibility::Public));
        ty.push(Member::new("open", MemberKind::Method, Modifiers::default()));

        let diags = scan(&mut ty);

        assert!(diags.is_empty());
        let names: Vec<_> = ty.synthesized().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["__NAME"]);
    }

    #[test]
    fn test_scan_refuses_non_class_types() {
        for kind in [TypeKind::Interface, TypeKind::Annotation, TypeKind::Enum] {
            let mut ty = TypeDeclaration::new("T", kind);
            ty.push(Member::field("name", Visibility::Private));

            let diags = scan_type(&mut ty, Visibility::Public, &NameSpec::default(), Some(Span::new(0, 10)));

            assert_eq!(diags.len(), 1);
            assert!(diags[0].is_error());
            assert_eq!(diags[0].span, Some(Span::new(0, 10)));
            assert_eq!(ty.synthesized().count(), 0);
        }
    }

    #[test]
    fn test_scan_reports_collisions_at_member() {
        let mut ty = TypeDeclaration::new("Foo", TypeKind::Class);
        ty.push(Member::field("foo", Visibility::Private).with_span(Span::new(5, 8)));
        ty.push(Member::constant("__FOO", Visibility::Public));

        let diags = scan(&mut ty);

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].span, Some(Span::new(5, 8)));
        assert_eq!(ty.synthesized().count(), 0);
    }

    #[test]
    fn test_scan_continues_after_rejected_member() {
        let mut ty = TypeDeclaration::new("Odd", TypeKind::Class);
        ty.push(Member::field("bad name", Visibility::Private));
        ty.push(Member::field("good", Visibility::Private));

        let diags = scan(&mut ty);

        assert_eq!(diags.len(), 1);
        assert_eq!(ty.synthesized().map(|m| m.name.as_str()).collect::<Vec<_>>(), vec!["__GOOD"]);
    }

    #[test]
    fn test_individually_marked_member_is_handled_once() {
        let mut ty = TypeDeclaration::new("Hotel", TypeKind::Class).marked();
        ty.push(Member::field("name", Visibility::Private));
        ty.push(Member::field("stars", Visibility::Private));
        let city = ty.push(Member::field("city", Visibility::Private).marked());

        // Type-level first, then the field's own marker with an explicit name.
        let mut diags = handle(&mut ty, &Occurrence::on_type(Marker::default()));
        diags.extend(handle(&mut ty, &Occurrence::on_field(city, Marker::default().with_customer("TOWN"))));

        assert!(diags.is_empty());
        let names: Vec<_> = ty.synthesized().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["__NAME", "__STARS", "TOWN"]);
    }
}
