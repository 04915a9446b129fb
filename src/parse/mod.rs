//! Parsing strategies for the textual process table.
//!
//! This module provides:
//! - `fields`: raw string → typed value conversion with defined fallbacks
//! - `fast`: the two-call, anchor-tokenized table parser
//! - `fallback`: the per-field multi-call parser used on shape failures

pub(crate) mod fallback;
pub(crate) mod fast;
pub(crate) mod fields;
