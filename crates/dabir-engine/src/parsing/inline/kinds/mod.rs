//! # Inline Kinds
//!
//! Marker types that own their delimiters. The scanner asks these for their
//! syntax; it never hardcodes `**` or `[`.
//!
//! ## Types
//!
//! - **`Link`**: `[label](href)`, never preceded by `!`
//! - **`Strong`** / **`Emphasis`**: `**x**` and `*x*`
//! - **`Strikethrough`** / **`Highlight`**: `~~x~~` and `==x==`
//! - **`CodeSpan`**: `` `x` ``, always literal inside

pub mod code_span;
pub mod emphasis;
pub mod link;
pub mod mark;

pub use code_span::CodeSpan;
pub use emphasis::{Emphasis, Strong};
pub use link::Link;
pub use mark::{Highlight, Strikethrough};
