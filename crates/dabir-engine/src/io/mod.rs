//! # Persistence
//!
//! Where the editor's Markdown lives between sessions. The editor only
//! sees the [`Storage`] trait; [`FileStorage`] keeps one Markdown file
//! under a notes directory and [`MemoryStorage`] backs tests and the CLI.

use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid notes directory: {0}")]
    InvalidNotesDir(String),
}

/// Source of the document's Markdown.
pub trait Storage {
    /// The stored text, `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, StorageError>;

    fn save(&mut self, markdown: &str) -> Result<(), StorageError>;
}

/// Read a markdown file and return its content
pub fn read_file(relative_path: &RelativePath, notes_root: &Path) -> Result<String, StorageError> {
    let absolute_path = relative_path.to_path(notes_root);
    if !absolute_path.exists() {
        return Err(StorageError::NotFound(absolute_path));
    }
    Ok(fs::read_to_string(&absolute_path)?)
}

/// Write content to a markdown file, creating parent directories
pub fn write_file(
    relative_path: &RelativePath,
    notes_root: &Path,
    content: &str,
) -> Result<(), StorageError> {
    let absolute_path = relative_path.to_path(notes_root);
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(fs::write(&absolute_path, content)?)
}

pub fn validate_notes_dir(path: &Path) -> Result<(), StorageError> {
    if !path.is_dir() {
        return Err(StorageError::InvalidNotesDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(())
}

/// One Markdown document under a notes directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    notes_root: PathBuf,
    relative_path: RelativePathBuf,
}

impl FileStorage {
    /// Fails when `notes_root` is not an existing directory.
    pub fn new(
        notes_root: impl Into<PathBuf>,
        relative_path: impl Into<RelativePathBuf>,
    ) -> Result<Self, StorageError> {
        let notes_root = notes_root.into();
        validate_notes_dir(&notes_root)?;
        Ok(Self {
            notes_root,
            relative_path: relative_path.into(),
        })
    }

    pub fn notes_root(&self) -> &Path {
        &self.notes_root
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    pub fn absolute_path(&self) -> PathBuf {
        self.relative_path.to_path(&self.notes_root)
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match read_file(&self.relative_path, &self.notes_root) {
            Ok(text) => Ok(Some(text)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&mut self, markdown: &str) -> Result<(), StorageError> {
        write_file(&self.relative_path, &self.notes_root, markdown)
    }
}

/// Keeps the last saved text in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    text: Option<String>,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            saves: 0,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.text.clone())
    }

    fn save(&mut self, markdown: &str) -> Result<(), StorageError> {
        self.text = Some(markdown.to_string());
        self.saves += 1;
        Ok(())
    }
}
