//! # Inline Transcoder
//!
//! Converts a plain-text run to inline nodes and back.
//!
//! ## Modules
//!
//! - **`types`**: `InlineKind` precedence order and `InlineMatch` ranges
//! - **`kinds`**: marker types owning their delimiters
//! - **`cursor`**: `Cursor` for byte scanning on char boundaries
//! - **`parser`**: `render()` with `try_parse_*` helpers
//! - **`markdown`**: `to_markdown()` and the mapped variant
//! - **`offset_map`**: `OffsetMap` between rendered and source offsets
//! - **`html`**: `to_html()` fragments
//!
//! ## Precedence
//!
//! At each position: link, bold, italic, strikethrough, highlight, code.
//! Link, bold and italic content is scanned once more for the other kinds.

pub mod cursor;
pub mod html;
pub mod kinds;
pub mod markdown;
pub mod offset_map;
pub mod parser;
pub mod types;

pub use html::to_html;
pub use markdown::{to_markdown, to_markdown_all, to_markdown_mapped};
pub use offset_map::{OffsetMap, Segment};
pub use parser::{find_matches, render};
pub use types::{InlineKind, InlineMatch};
