//! Source-to-source rewriting of Rust files carrying `#[peep_in]` markers.
//!
//! ## Pipeline
//!
//! `syn::File` → lower each marked type into a `TypeDeclaration` → `Engine::run` → strip markers → append one
//! inherent `impl` per type with the synthesized constants → `prettyplease`.
//!
//! ## Notes
//!
//! - Each module scope (the file, every inline `mod { .. }`) is rewritten independently: inherent `impl` blocks only
//!   contribute existing members to types declared in the same scope.
//! - A file without markers is returned unchanged (not reformatted).
//! - Marker attributes are always removed, including malformed and unsupported ones, so the output compiles without the
//!   derive crate.

mod emit;
mod lower;

use peephole_core::{Diagnostic, Engine, PeepConfig, Span, Subject};
use syn::Item;
use thiserror::Error;

use crate::source_map::LineIndex;

/// Errors that stop a rewrite before the engine runs.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("failed to parse Rust source: {message}")]
    Parse { message: String, span: Span },

    #[error("failed to build generated code: {0}")]
    Emit(String),
}

/// Result of rewriting one source file.
#[derive(Debug, Clone)]
pub struct Expansion {
    /// Rewritten source (the input itself when nothing was marked).
    pub source: String,
    /// Diagnostics in source order of the occurrences that produced them.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of constants added across all types.
    pub synthesized: usize,
    /// Number of types that carried at least one marker.
    pub marked_types: usize,
}

impl Expansion {
    pub fn has_errors(&self) -> bool {
        peephole_core::diagnostics::has_errors(&self.diagnostics)
    }
}

/// Rewrite `source`, synthesizing name constants for every marked type.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn expand_source(source: &str, config: &PeepConfig) -> Result<Expansion, RewriteError> {
    let index = LineIndex::new(source);
    let mut file = syn::parse_file(source).map_err(|e| RewriteError::Parse {
        message: e.to_string(),
        span: index.span(e.span()),
    })?;

    let mut rewriter = Rewriter {
        engine: Engine::new(config.clone()),
        index: &index,
        diagnostics: Vec::new(),
        synthesized: 0,
        marked_types: 0,
        touched: false,
    };
    rewriter.rewrite_items(&mut file.items)?;

    let source = if !rewriter.touched {
        source.to_string()
    } else {
        prettyplease::unparse(&file)
    };
    tracing::info!(
        types = rewriter.marked_types,
        constants = rewriter.synthesized,
        diagnostics = rewriter.diagnostics.len(),
        "rewrite finished"
    );

    Ok(Expansion {
        source,
        diagnostics: rewriter.diagnostics,
        synthesized: rewriter.synthesized,
        marked_types: rewriter.marked_types,
    })
}

struct Rewriter<'a> {
    engine: Engine,
    index: &'a LineIndex<'a>,
    diagnostics: Vec<Diagnostic>,
    synthesized: usize,
    marked_types: usize,
    /// Whether any marker was removed from the file.
    touched: bool,
}

impl Rewriter<'_> {
    fn rewrite_items(&mut self, items: &mut Vec<Item>) -> Result<(), RewriteError> {
        let attribute = self.engine.config().attribute.clone();
        let impls = lower::ImplIndex::build(items, self.index);

        // (position, generated impl) pairs, in item order
        let mut generated: Vec<(usize, Item)> = Vec::new();
        for (position, item) in items.iter().enumerate() {
            let Some(lowered) = lower::lower_item(item, &impls, &attribute, self.index, &mut self.diagnostics)
            else {
                continue;
            };
            self.marked_types += 1;

            let lower::Lowered {
                mut decl,
                occurrences,
                ident,
                generics,
            } = lowered;
            self.diagnostics.extend(self.engine.run(&mut decl, &occurrences));

            let constants: Vec<_> = decl.synthesized().collect();
            let emitted = emit::constants_impl(&ident, &generics, &constants)?;
            for invalid in &emitted.invalid_names {
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("`{invalid}` is not a valid Rust identifier for a constant"),
                        Subject::Type(decl.name.clone()),
                    )
                    .with_span(decl.span)
                    .with_hint("choose a `customer` value that is a valid identifier"),
                );
            }
            self.synthesized += emitted.count;
            if let Some(item) = emitted.item {
                generated.push((position, item));
            }
        }

        for item in items.iter_mut() {
            self.touched |= lower::strip_markers(item, &attribute);
        }
        for (position, item) in generated.into_iter().rev() {
            items.insert(position + 1, item);
        }

        for item in items.iter_mut() {
            if let Item::Mod(module) = item {
                if let Some((_, content)) = module.content.as_mut() {
                    self.rewrite_items(content)?;
                }
            }
        }
        Ok(())
    }
}
