//! # Block Parsing
//!
//! Two-phase block parsing.
//!
//! ## Parsing Phases
//!
//! 1. **Line Classification** (`classify`): each line is classified into a
//!    `LineClass` holding local facts (blank status, the block it would open)
//!
//! 2. **Block Construction** (`builder`): a `BlockBuilder` keeps the open
//!    paragraph, blockquote, list or fence run and emits block nodes as runs
//!    close
//!
//! ## Modules
//!
//! - **`kinds`**: block types owning their delimiters (Heading, Rule,
//!   BlockQuote, Image, ListItem, CodeFence)
//! - **`open`**: `try_open_leaf` dispatch in precedence order
//! - **`classify`**: `MarkdownLineClassifier` produces `LineClass` per line
//! - **`list`**: `ListBuilder` nesting stack
//! - **`builder`**: `BlockBuilder` state machine
//! - **`line`**: `parse_line` single-line rules for live conversion
//!
//! Block plugins run before phase 2 for lines that do not continue a run;
//! see [`crate::parsing::plugins`].

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod line;
pub mod list;
pub mod open;

pub use builder::BlockBuilder;
pub use classify::{LineClass, MarkdownLineClassifier};
pub use line::parse_line;
pub use list::ListBuilder;
pub use open::{BlockOpen, try_open_leaf};
