//! Clause- and expression-level translation from Erlang abstract forms to an
//! ESTree-shaped syntax tree.
//!
//! The input grammar is the upstream parser's abstract format: tagged,
//! macro-expanded, scope-resolved forms. The output is a single `Program`
//! node whose bindings call into a small runtime pattern-matching protocol
//! (the `Patterns` facade) instead of attempting to translate multi-clause
//! dispatch, guards, and structural patterns into native control flow.

#[cfg(feature = "tracing")]
#[macro_use]
extern crate tracing;
#[cfg(not(feature = "tracing"))]
#[macro_use]
mod mock_tracing;

pub mod compiler;
pub mod estree;
pub mod symbol;


pub use compiler::{Diagnostic, Translation, Translator};
