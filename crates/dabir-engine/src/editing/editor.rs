use crate::{
    io::{Storage, StorageError},
    options::EditorOptions,
    parsing::Markdown,
    surface::{NodeId, Position, Surface},
    tree::{Document, Tag},
};

use super::{
    EditorEvent, Key, Patch, RevealCommit, clipboard,
    detector::{Detector, Trigger},
    lists, tables,
};

/// Live-editing facade over a host surface.
///
/// The host calls [`Editor::handle`] for every event before applying its
/// own default edit (unless the returned patch says `handled`), then
/// [`Editor::idle`] once that edit has landed. Typed Markdown is converted
/// during `idle`, and the document is saved whenever it changed.
pub struct Editor<S: Surface> {
    surface: S,
    markdown: Markdown,
    reveal: RevealCommit,
    detector: Detector,
    storage: Box<dyn Storage>,
    dirty: bool,
    version: u64,
}

impl<S: Surface> Editor<S> {
    pub fn new(surface: S, markdown: Markdown, storage: Box<dyn Storage>) -> Self {
        Self {
            surface,
            markdown,
            reveal: RevealCommit::new(),
            detector: Detector::new(),
            storage,
            dirty: false,
            version: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn codec(&self) -> &Markdown {
        &self.markdown
    }

    pub fn reveal(&self) -> &RevealCommit {
        &self.reveal
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Reacts to one host event.
    pub fn handle(&mut self, event: EditorEvent) -> Patch {
        self.reveal.sync(&self.surface);
        let mut patch = Patch::default();
        match event {
            EditorEvent::Char(_) => {
                if event.is_word_boundary()
                    && let Some(block) = self.caret_block()
                {
                    self.detector.schedule(block, Trigger::Space);
                }
                self.dirty = true;
            }
            EditorEvent::Key(Key::Enter) => {
                patch
                    .changed
                    .extend(self.reveal.commit(&mut self.surface, &self.markdown));
                if let Some(cell) = self.caret_cell() {
                    patch.handled = true;
                    patch
                        .changed
                        .extend(tables::enter(&mut self.surface, cell).unwrap_or_default());
                } else if let Some(item) = self.caret_item()
                    && lists::is_blank_item(&self.surface, item)
                {
                    patch.handled = true;
                    patch
                        .changed
                        .extend(lists::leave_blank(&mut self.surface, item));
                } else if let Some(block) = self.caret_block() {
                    self.detector.schedule(block, Trigger::Enter);
                }
                self.dirty = true;
            }
            EditorEvent::Key(Key::Backspace) => {
                patch.merge(self.backspace());
                self.dirty = true;
            }
            EditorEvent::Key(key @ (Key::Tab | Key::ShiftTab)) => {
                if let Some(cell) = self.caret_cell() {
                    patch.handled = true;
                    tables::tab(&mut self.surface, cell, key == Key::ShiftTab);
                } else if let Some(item) = self.caret_item() {
                    patch.handled = true;
                    let moved = match key {
                        Key::Tab => {
                            lists::indent(&mut self.surface, item, self.markdown.options())
                        }
                        _ => lists::outdent(&mut self.surface, item),
                    };
                    if moved {
                        patch.changed.push(item);
                    }
                }
            }
            EditorEvent::Key(Key::Escape) => {
                patch.handled = self.reveal.active().is_some();
                patch
                    .changed
                    .extend(self.reveal.cancel(&mut self.surface, &self.markdown));
            }
            EditorEvent::Key(
                key @ (Key::ArrowLeft | Key::ArrowRight | Key::ArrowUp | Key::ArrowDown),
            ) => {
                if let Some(cell) = self.caret_cell() {
                    patch.handled = tables::arrow(&mut self.surface, cell, key);
                }
            }
            EditorEvent::Blur => {
                patch
                    .changed
                    .extend(self.reveal.on_blur(&mut self.surface, &self.markdown));
                patch.merge(self.idle());
            }
            EditorEvent::SelectionChanged => {
                patch.changed.extend(
                    self.reveal
                        .on_selection_change(&mut self.surface, &self.markdown),
                );
            }
            EditorEvent::ToggleChecklist(item) => {
                patch.handled = true;
                if lists::toggle_checked(&mut self.surface, item) {
                    patch.changed.push(item);
                }
            }
        }
        self.finish(patch)
    }

    /// Pastes plain text at the caret in place of the host's own paste.
    pub fn paste(&mut self, text: &str) -> Patch {
        self.reveal.sync(&self.surface);
        let raw = self.reveal.active();
        let changed = clipboard::paste(&mut self.surface, &self.markdown, text, raw);
        self.dirty = true;
        self.finish(Patch {
            changed,
            handled: true,
            ..Patch::default()
        })
    }

    /// Markdown of the current selection, for the clipboard.
    pub fn copy(&self) -> Option<String> {
        clipboard::copy(&self.surface, &self.markdown)
    }

    /// Deferred work after the host's default edit: runs the pending
    /// conversion pass, then saves if anything changed.
    pub fn idle(&mut self) -> Patch {
        let raw = self.reveal.active();
        let patch = Patch {
            changed: self
                .detector
                .run_pending(&mut self.surface, &self.markdown, raw),
            ..Patch::default()
        };
        let patch = self.finish(patch);
        if self.dirty
            && let Err(e) = self.save()
        {
            log::warn!("Failed to save document: {e}");
        }
        patch
    }

    /// Canonical Markdown of the live tree. A raw leaf contributes its
    /// source text as typed.
    pub fn to_markdown(&self) -> String {
        self.markdown.serialize(&self.surface.snapshot_blocks())
    }

    pub fn save(&mut self) -> Result<(), StorageError> {
        let text = self.to_markdown();
        self.storage.save(&text)?;
        self.dirty = false;
        log::debug!("saved {} bytes", text.len());
        Ok(())
    }

    fn finish(&mut self, mut patch: Patch) -> Patch {
        if !patch.is_empty() {
            self.dirty = true;
            self.version += 1;
        }
        patch.version = self.version;
        patch
    }

    fn caret_block(&self) -> Option<NodeId> {
        self.surface.block_of(self.surface.caret()?.node)
    }

    fn caret_cell(&self) -> Option<NodeId> {
        tables::cell_of(&self.surface, self.surface.caret()?.node)
    }

    fn is_at_start(&self, container: NodeId, caret: Position) -> bool {
        self.surface.flat_offset(container, caret) == Some(0)
    }

    /// Backspace at the start of a table cell, quote, callout or list item
    /// edits structure instead of text.
    fn backspace(&mut self) -> Patch {
        let mut patch = Patch::default();
        let Some(caret) = self.surface.caret() else {
            return patch;
        };

        if let Some(cell) = self.caret_cell() {
            if self.is_at_start(cell, caret) && tables::backspace(&mut self.surface, cell) {
                patch.handled = true;
                patch.changed.extend(self.surface.caret().map(|p| p.node));
            }
            return patch;
        }

        let wrapper = self
            .surface
            .closest(caret.node, |t| {
                matches!(t, Tag::Blockquote | Tag::Admonition { .. })
            });
        if let Some(block) = wrapper
            && let Some(first) = self.surface.children(block).first().copied()
            && self.is_at_start(first, caret)
        {
            if let Some(raw) = self
                .reveal
                .unwrap_block(&mut self.surface, &self.markdown, block)
            {
                patch.handled = true;
                patch.changed.push(raw);
            }
            return patch;
        }

        if let Some(item) = self.caret_item()
            && self.is_at_start(item, caret)
        {
            patch
                .changed
                .extend(self.reveal.commit(&mut self.surface, &self.markdown));
            if let Some(target) = lists::backspace_at_start(&mut self.surface, item) {
                patch.handled = true;
                patch.changed.push(target);
            }
        }
        patch
    }

    fn caret_item(&self) -> Option<NodeId> {
        let caret = self.surface.caret()?;
        self.surface
            .closest(caret.node, |t| matches!(t, Tag::ListItem { .. }))
    }
}

impl Editor<Document> {
    /// Loads the stored document into an in-memory surface. Nothing stored
    /// yet gives one empty line.
    pub fn open(storage: Box<dyn Storage>, options: EditorOptions) -> Result<Self, StorageError> {
        let markdown = Markdown::new(options);
        let text = storage.load()?.unwrap_or_default();
        let document = Document::from_nodes(&markdown.parse(&text));
        Ok(Self::new(document, markdown, storage))
    }

    /// Delivers an event the way a browser host does: the editor first,
    /// then the default edit unless handled, then the deferred pass.
    pub fn input(&mut self, event: EditorEvent) -> Patch {
        let mut patch = self.handle(event);
        if !patch.handled {
            match event {
                EditorEvent::Char(c) => self.surface.type_text(c.encode_utf8(&mut [0; 4])),
                EditorEvent::Key(Key::Enter) => self.surface.split_line(),
                EditorEvent::Key(Key::Backspace) => self.surface.delete_backward(),
                _ => {}
            }
        }
        patch.merge(self.idle());
        patch
    }

    /// Types `text` one character at a time; `\n` presses Enter.
    pub fn type_str(&mut self, text: &str) -> Patch {
        let mut patch = Patch::default();
        for c in text.chars() {
            let event = match c {
                '\n' => EditorEvent::Key(Key::Enter),
                c => EditorEvent::Char(c),
            };
            patch.merge(self.input(event));
        }
        patch
    }

    /// Moves the caret and reports the selection change.
    pub fn click(&mut self, node: NodeId, offset: usize) -> Patch {
        self.surface.set_cursor(node, offset);
        self.handle(EditorEvent::SelectionChanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryStorage;

    #[test]
    fn test_open_parses_stored_text() {
        let storage = MemoryStorage::with_text("# Title\n\n- a");
        let editor = Editor::open(Box::new(storage), EditorOptions::default()).unwrap();
        assert_eq!(editor.to_markdown(), "# Title\n\n- a");
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_typing_marks_dirty_and_idle_saves() {
        let mut editor = Editor::open(Box::new(MemoryStorage::new()), EditorOptions::default()).unwrap();
        let line = editor.surface().children(editor.surface().root())[0];
        editor.click(line, 0);

        editor.type_str("hi");

        assert!(!editor.is_dirty());
        assert_eq!(editor.to_markdown(), "hi");
    }

    #[test]
    fn test_tab_outside_list_is_left_to_host() {
        let mut editor = Editor::open(Box::new(MemoryStorage::with_text("text")), EditorOptions::default()).unwrap();
        let leaf = editor.surface().find_text("text").unwrap();
        editor.click(leaf, 0);
        let patch = editor.handle(EditorEvent::Key(Key::Tab));
        assert!(!patch.handled);
    }

    #[test]
    fn test_version_counts_tree_changes() {
        let mut editor = Editor::open(Box::new(MemoryStorage::with_text("- a\n- b")), EditorOptions::default()).unwrap();
        let b = editor.surface().find_text("b").unwrap();
        editor.click(b, 1);

        let patch = editor.handle(EditorEvent::Key(Key::Tab));

        assert!(patch.handled);
        assert_eq!(patch.version, 1);
        assert_eq!(editor.to_markdown(), "- a\n  - b");
    }
}
