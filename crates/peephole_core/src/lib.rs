//! Declaration tree and synthesis engine for name-peephole constants.
//!
//! A name-peephole constant is a type-scoped, immutable string constant whose value is the identifier of a field on
//! the same type. For a field `hotelIDNumber` the engine synthesizes `__HOTEL_ID_NUMBER = "hotelIDNumber"`.
//!
//! The engine works on its own small declaration tree ([`tree::TypeDeclaration`] / [`tree::Member`]). Front ends
//! (the `#[derive(PeepIn)]` macro and the source rewriter in the `peephole` crate) lower their host syntax into this
//! tree, run the engine, and emit whatever members it appended.
//!
//! ## Pipeline
//!
//! [`dispatch::handle`] runs once per marker occurrence:
//!
//! - type occurrences go through [`scan::scan_type`], which filters the eligible members;
//! - each member goes through [`names::derive`] -> [`collision::classify`] -> [`synth::synthesize`].
//!
//! [`engine::Engine`] wraps the dispatcher with the process-wide [`config::PeepConfig`].
//!
//! ## Notes
//!
//! - No IO, no global state. Everything the engine needs is passed in; everything it produces is either appended to
//!   the owning declaration or returned as a [`diagnostics::Diagnostic`].
//! - The engine never panics on user input and never returns `Err` past its boundary.
//!
//! ## Examples
//! ```rust
//! use peephole_core::dispatch::{Marker, Occurrence};
//! use peephole_core::tree::{AccessLevel, Member, TypeDeclaration, TypeKind, Visibility};
//!
//! let mut hotel = TypeDeclaration::new("Hotel", TypeKind::Class);
//! hotel.push(Member::field("hotelIDNumber", Visibility::Private));
//!
//! let occurrence = Occurrence::on_type(Marker::new(AccessLevel::Public));
//! let diagnostics = peephole_core::dispatch::handle(&mut hotel, &occurrence);
//!
//! assert!(diagnostics.is_empty());
//! let constant = hotel.member_named("__HOTEL_ID_NUMBER").unwrap();
//! assert_eq!(constant.initializer.as_deref(), Some("\"hotelIDNumber\""));
//! ```

pub mod collision;
pub mod config;
pub mod diagnostics;
pub mod dispatch;
pub mod engine;
pub mod names;
pub mod scan;
pub mod synth;
pub mod tree;

pub use config::{FlagUsage, PeepConfig};
pub use diagnostics::{Diagnostic, Severity, Subject};
pub use dispatch::{Marker, Occurrence, Site, Target};
pub use engine::Engine;
pub use names::{NameSpec, Rejected};
pub use tree::{AccessLevel, Member, MemberId, MemberKind, Modifiers, Origin, Span, TypeDeclaration, TypeKind, Visibility};

/// Attribute name of the marker annotation (`#[peep_in]`).
pub const MARKER: &str = "peep_in";
