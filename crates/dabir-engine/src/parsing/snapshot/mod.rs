//! # Snapshot Testing Support
//!
//! Utilities for testing the parser via snapshot assertions and invariant checks.
//!
//! ## Modules
//!
//! - **`normalize`**: renders a tree as a stable indented outline for
//!   `insta` snapshots
//! - **`invariants`**: structural checks every parsed tree must pass (table
//!   column counts, list item shapes, heading levels, couplet shape)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::outline;
