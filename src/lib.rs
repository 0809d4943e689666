//! Erlang abstract-form to ESTree translation.
#![cfg_attr(all(docsrs, not(doctest)), feature(doc_auto_cfg))]

pub use estrel_lang::*;
