pub mod editing;
pub mod io;
pub mod options;
pub mod parsing;
pub mod surface;
pub mod tree;

// Re-export key types for easier usage
pub use editing::{Editor, EditorEvent, Key, Patch, RevealCommit};
pub use io::{FileStorage, MemoryStorage, Storage, StorageError};
pub use options::{EditorOptions, LabelLocale};
pub use parsing::Markdown;
pub use surface::{NodeId, Position, Selection, Surface};
pub use tree::{Alignment, AdmonitionKind, Document, Element, Node, Tag};
