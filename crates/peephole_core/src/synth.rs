//! Build name-peephole constants and append them to their owner.

use crate::names::Rejected;
use crate::tree::{Member, MemberId, MemberKind, Modifiers, Origin, TypeDeclaration, Visibility};

/// Declared type of every synthesized constant.
pub const CONSTANT_TYPE: &str = "&'static str";

/// What happened to one synthesis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    Created(MemberId),
    SkippedExistingBySystem,
    SkippedExistingByUser,
    /// The member cannot get a constant (not a named field, or its name does not fit the rule).
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotAField,
    Name(Rejected),
}

/// Render `value` as a quoted string literal.
pub fn quote_literal(value: &str) -> String {
    format!("{value:?}")
}

/// Append a constant named `name` holding `value_text` to `owner`.
///
/// ## Parameters
/// - `owner`: declaration receiving the constant.
/// - `name`: identifier of the constant; the caller has already checked it is free.
/// - `visibility`: the only visibility the constant gets.
/// - `value_text`: identifier of the source member, stored as a quoted literal.
///
/// ## Returns
/// - (`MemberId`): id of the appended constant.
///
/// ## Notes
/// - The constant is always `static` and `final`, typed [`CONSTANT_TYPE`], and tagged [`Origin::Synthesized`].
/// - Existing members are not touched. Position at the end of the list is an implementation detail.
pub fn synthesize(owner: &mut TypeDeclaration, name: &str, visibility: Visibility, value_text: &str) -> MemberId {
    let mut constant = Member::new(name, MemberKind::Constant, Modifiers::constant(visibility))
        .with_type(CONSTANT_TYPE)
        .with_initializer(quote_literal(value_text));
    constant.origin = Origin::Synthesized;

    let id = owner.push(constant);
    tracing::debug!(owner = %owner.name, constant = name, value = value_text, "synthesized name constant");
    id
}
