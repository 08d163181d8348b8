//! Declaration tree the engine operates on.
//!
//! Front ends lower their host syntax into a [`TypeDeclaration`] that owns an ordered list of [`Member`]s. The engine
//! only ever appends to that list; existing members are never renamed or removed.

use std::fmt;
use std::str::FromStr;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Access levels
// ============================================================================

/// Visibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    Public,
    Protected,
    Package,
    #[default]
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Package => write!(f, "package"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// Requested access level carried by a marker occurrence.
///
/// `None` is the "disabled" level: an occurrence carrying it synthesizes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessLevel {
    #[default]
    Public,
    Protected,
    Package,
    Private,
    None,
}

impl AccessLevel {
    /// The visibility a synthesized constant gets, or `None` when synthesis is disabled.
    pub fn visibility(self) -> Option<Visibility> {
        match self {
            AccessLevel::Public => Some(Visibility::Public),
            AccessLevel::Protected => Some(Visibility::Protected),
            AccessLevel::Package => Some(Visibility::Package),
            AccessLevel::Private => Some(Visibility::Private),
            AccessLevel::None => None,
        }
    }

    pub fn is_disabled(self) -> bool {
        self == AccessLevel::None
    }
}

/// Error returned when parsing an unknown access level spelling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown access level `{0}` (expected one of: public, protected, package, private, none)")]
pub struct UnknownAccessLevel(pub String);

impl FromStr for AccessLevel {
    type Err = UnknownAccessLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(AccessLevel::Public),
            "protected" => Ok(AccessLevel::Protected),
            "package" => Ok(AccessLevel::Package),
            "private" => Ok(AccessLevel::Private),
            "none" => Ok(AccessLevel::None),
            _ => Err(UnknownAccessLevel(s.to_string())),
        }
    }
}

// ============================================================================
// Members
// ============================================================================

/// Declared modifiers of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub visibility: Visibility,
    /// Type-scoped rather than instance-scoped.
    pub is_static: bool,
    /// Immutable after initialization.
    pub is_final: bool,
}

impl Modifiers {
    /// Modifiers of a plain instance field.
    pub fn instance(visibility: Visibility) -> Self {
        Self {
            visibility,
            is_static: false,
            is_final: false,
        }
    }

    /// Modifiers of a type-scoped immutable constant.
    pub fn constant(visibility: Visibility) -> Self {
        Self {
            visibility,
            is_static: true,
            is_final: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Named data slot.
    Field,
    /// Unnamed tuple slot; its identifier is the index.
    Positional,
    Constant,
    Method,
}

impl MemberKind {
    pub fn is_field_like(self) -> bool {
        matches!(self, MemberKind::Field)
    }
}

/// Where a member came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Declared in source.
    #[default]
    User,
    /// Appended by this engine.
    Synthesized,
}

/// A named slot inside a type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub modifiers: Modifiers,
    pub origin: Origin,
    /// Carries its own marker annotation.
    pub marked: bool,
    /// Declared type as source text, when known.
    pub ty: Option<String>,
    /// Initializer as source text (a quoted literal for synthesized constants).
    pub initializer: Option<String>,
    pub span: Option<Span>,
}

impl Member {
    pub fn new(name: impl Into<String>, kind: MemberKind, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers,
            origin: Origin::User,
            marked: false,
            ty: None,
            initializer: None,
            span: None,
        }
    }

    /// A mutable instance field.
    pub fn field(name: impl Into<String>, visibility: Visibility) -> Self {
        Self::new(name, MemberKind::Field, Modifiers::instance(visibility))
    }

    /// A user-declared type-scoped constant.
    pub fn constant(name: impl Into<String>, visibility: Visibility) -> Self {
        Self::new(name, MemberKind::Constant, Modifiers::constant(visibility))
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn with_initializer(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = Some(initializer.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Mark the member as carrying its own marker annotation.
    pub fn marked(mut self) -> Self {
        self.marked = true;
        self
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.is_static
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.is_final
    }

    pub fn is_synthesized(&self) -> bool {
        self.origin == Origin::Synthesized
    }
}

/// Stable index of a member within its owning declaration.
///
/// Members are only ever appended, so an id stays valid for the lifetime of the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub usize);

// ============================================================================
// Type declarations
// ============================================================================

/// Discriminant of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Annotation,
    Enum,
}

impl TypeKind {
    pub fn is_class_like(self) -> bool {
        matches!(self, TypeKind::Class)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Class => write!(f, "class"),
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Annotation => write!(f, "annotation"),
            TypeKind::Enum => write!(f, "enum"),
        }
    }
}

/// A type declaration owning an ordered member list.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    /// Carries the marker annotation at type level.
    pub marked: bool,
    pub span: Option<Span>,
    members: Vec<Member>,
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            marked: false,
            span: None,
            members: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn marked(mut self) -> Self {
        self.marked = true;
        self
    }

    pub fn is_class_like(&self) -> bool {
        self.kind.is_class_like()
    }

    /// Append a member and return its id.
    pub fn push(&mut self, member: Member) -> MemberId {
        self.members.push(member);
        MemberId(self.members.len() - 1)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(id.0)
    }

    /// Ids of all members, in declaration order.
    pub fn member_ids(&self) -> impl Iterator<Item = MemberId> + use<> {
        (0..self.members.len()).map(MemberId)
    }

    /// First member whose identifier equals `name`.
    pub fn member_named(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Members appended by the engine, in the order they were synthesized.
    pub fn synthesized(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_synthesized())
    }
}
