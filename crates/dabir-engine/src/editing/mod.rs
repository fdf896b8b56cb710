/*!
 * # Editing Core
 *
 * Live editing over a host [`Surface`](crate::surface::Surface). The tree
 * shown to the user is rendered; Markdown only appears while the caret sits
 * inside a formatted node, and typed Markdown is converted as soon as a
 * word or line is finished.
 *
 * ## Event Flow
 *
 * 1. The host reports an event to [`Editor::handle`]. Tab, Escape,
 *    checkbox clicks, table navigation and structural Enter and Backspace
 *    are applied here and mark the event handled.
 * 2. Unless handled, the host applies its default edit (insert the
 *    character, split the line, delete backwards).
 * 3. The host calls [`Editor::idle`], which runs the pending conversion
 *    pass and saves the document.
 *
 * ## Modules
 *
 * - **`reveal`**: `RevealCommit`, the raw-source state machine
 * - **`detector`**: deferred live conversion on Space and Enter
 * - **`lists`**: indent, outdent, checkbox toggling, Enter and Backspace
 *   on items
 * - **`tables`**: rows on Enter and Backspace, moving between cells
 * - **`clipboard`**: paste parsed text, copy the selection as Markdown
 * - **`events`**: `EditorEvent` and `Key`
 * - **`patch`**: what an event changed
 * - **`editor`**: the `Editor` facade tying them to storage
 */

pub mod clipboard;
pub mod detector;
pub mod editor;
pub mod events;
pub mod lists;
pub mod patch;
pub mod reveal;
pub mod tables;

pub use detector::{Detector, Pending, Trigger};
pub use editor::Editor;
pub use events::{EditorEvent, Key};
pub use patch::Patch;
pub use reveal::{Origin, RevealCommit, RevealState};
