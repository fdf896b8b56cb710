//! # Block Kinds
//!
//! Block types that own their syntax. The classifier asks these whether a
//! line opens or continues them; no other code spells out `#` or `> `.

pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod image;
pub mod list_item;
pub mod rule;

pub use block_quote::BlockQuote;
pub use code_fence::CodeFence;
pub use heading::Heading;
pub use image::Image;
pub use list_item::{ListItem, ListLine, ListMarker};
pub use rule::Rule;
