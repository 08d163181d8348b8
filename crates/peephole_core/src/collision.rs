//! Classify a candidate constant name against the members a type already has.

use crate::tree::{Origin, TypeDeclaration};

/// Result of looking a candidate name up in the owner's member list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// No member has this name.
    Free,
    /// A constant with this name was already synthesized; nothing to do.
    ExistsBySystem,
    /// A declared member has this name; it must not be overwritten.
    ExistsByUser,
}

/// Classify `candidate` against the members of `owner`.
pub fn classify(candidate: &str, owner: &TypeDeclaration) -> Collision {
    match owner.member_named(candidate).map(|m| m.origin) {
        None => Collision::Free,
        Some(Origin::Synthesized) => Collision::ExistsBySystem,
        Some(Origin::User) => Collision::ExistsByUser,
    }
}
