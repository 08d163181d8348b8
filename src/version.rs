//! peephole version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time so the CLI and any generated-code
//! headers agree on it.

/// The peephole version string (for example, `0.1.0`).
pub const PEEPHOLE_VERSION: &str = env!("CARGO_PKG_VERSION");
