#![forbid(unsafe_code)]
//! Name-peephole constants for Rust.
//!
//! A name-peephole constant is a string constant on a type whose value is the name of one of that type's fields, so
//! code that needs a field name as a string (serialization keys, query builders, reflection-style lookups) can refer to
//! a checked constant instead of a literal.
//!
//! ```rust
//! use peephole::PeepIn;
//!
//! #[derive(PeepIn)]
//! #[peep_in]
//! struct Hotel {
//!     hotel_name: String,
//!     #[peep_in(customer = "STARS")]
//!     star_rating: u8,
//! }
//!
//! assert_eq!(Hotel::__HOTEL_NAME, "hotel_name");
//! assert_eq!(Hotel::STARS, "star_rating");
//! ```
//!
//! ## Front ends
//!
//! - [`PeepIn`]: derive macro, errors become `compile_error!`.
//! - [`rewrite::expand_source`]: source-to-source rewriter used by the `peephole` binary; it also reports warnings.
//!
//! Both lower their input into the [`peephole_core`] declaration tree and run the same engine.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod report;
pub mod rewrite;
pub mod source_map;
pub mod version;

pub use peephole_core::{
    AccessLevel, Diagnostic, Engine, FlagUsage, PeepConfig, Severity, Subject, TypeDeclaration, Visibility,
};
pub use peephole_derive::PeepIn;
pub use rewrite::{Expansion, RewriteError, expand_source};
pub use version::PEEPHOLE_VERSION;
