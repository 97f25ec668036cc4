//! Core engine: canonical ordering + row projection + CSV rendering for
//! API snapshots.
//!
//! Everything in this crate is pure: no I/O, no clock, no global state.
//! Callers own their snapshot and get the same bytes out for the same
//! records in, whatever order those records arrived in.

mod canonical;
mod csv;
mod flatten;

pub use canonical::canonicalize;
pub use csv::{CSV_HEADER, render_csv};
pub use flatten::flatten;
