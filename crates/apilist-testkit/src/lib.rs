//! Test utilities for the apilist crates.
//!
//! - **arb**: proptest strategies for snapshot data
//! - **builder**: fluent construction of snapshots
//! - **fixtures**: canned snapshots for integration tests
//!
//! # Example
//!
//! ```rust,ignore
//! use apilist_testkit::SnapshotBuilder;
//!
//! let snapshot = SnapshotBuilder::new()
//!     .interface("Navigator")
//!     .operation("share", "Promise<void>", &["ShareData"])
//!     .done()
//!     .build();
//! ```

pub mod arb;
pub mod builder;
pub mod fixtures;

// Re-export commonly used items
pub use arb::{arb_extended_attributes, arb_interface, arb_operation, arb_snapshot};
pub use builder::{idl, InterfaceBuilder, SnapshotBuilder};
pub use fixtures::sample_snapshot;
