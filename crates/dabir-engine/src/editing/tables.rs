use crate::{
    surface::{NodeId, Surface},
    tree::Tag,
};

use super::Key;

/// Where a cell sits in its table. Row 0 is the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellAt {
    table: NodeId,
    row: NodeId,
    row_index: usize,
    column: usize,
}

fn locate<S: Surface>(s: &S, cell: NodeId) -> Option<CellAt> {
    if s.tag(cell) != Some(&Tag::TableCell) {
        return None;
    }
    let row = s.parent(cell)?;
    let table = s.parent(row)?;
    Some(CellAt {
        table,
        row,
        row_index: s.index_in_parent(row)?,
        column: s.index_in_parent(cell)?,
    })
}

/// The table cell holding `id`.
pub fn cell_of<S: Surface>(s: &S, id: NodeId) -> Option<NodeId> {
    s.closest(id, |t| *t == Tag::TableCell)
}

fn is_blank<S: Surface>(s: &S, id: NodeId) -> bool {
    s.read_text(id).trim().is_empty()
}

fn caret_to_end<S: Surface>(s: &mut S, cell: NodeId) {
    let end = s.text_len(cell);
    s.set_cursor(cell, end);
}

/// A row of `columns` empty cells, inserted after `anchor`.
fn insert_row<S: Surface>(s: &mut S, anchor: NodeId, columns: usize) -> NodeId {
    let row = s.create_element(Tag::TableRow);
    for _ in 0..columns {
        let cell = s.create_element(Tag::TableCell);
        s.append_child(row, cell);
    }
    s.insert_after(anchor, row);
    row
}

/// Enter in a cell. A blank last body row leaves the table: the caret
/// moves to a new empty line after it and the row is dropped, or the whole
/// table when that row was its only body row. Otherwise an empty row is
/// added below the caret's row. Returns the nodes created.
pub fn enter<S: Surface>(s: &mut S, cell: NodeId) -> Option<Vec<NodeId>> {
    let at = locate(s, cell)?;
    let rows = s.children(at.table);
    let is_last = at.row_index + 1 == rows.len();

    if at.row_index > 0 && is_last && is_blank(s, at.row) {
        let line = s.create_element(Tag::Paragraph);
        s.insert_after(at.table, line);
        if rows.len() == 2 {
            s.remove(at.table);
        } else {
            s.remove(at.row);
        }
        s.set_cursor(line, 0);
        log::debug!("left table {:?}", at.table);
        return Some(vec![line]);
    }

    let columns = s.children(at.row).len();
    let row = insert_row(s, at.row, columns);
    if let Some(first) = s.children(row).first() {
        s.set_cursor(*first, 0);
    }
    Some(vec![row])
}

/// Backspace at the start of an empty cell. A table with no text left
/// becomes an empty line. The first cell of a blank body row removes that
/// row, unless it is the only one, and the caret goes to the end of the
/// row above. Returns whether anything changed.
pub fn backspace<S: Surface>(s: &mut S, cell: NodeId) -> bool {
    let Some(at) = locate(s, cell) else {
        return false;
    };
    if !is_blank(s, cell) {
        return false;
    }
    if is_blank(s, at.table) {
        let line = s.create_element(Tag::Paragraph);
        s.replace(at.table, line);
        s.set_cursor(line, 0);
        log::debug!("emptied table {:?} removed", at.table);
        return true;
    }

    let rows = s.children(at.table);
    if at.column != 0 || at.row_index == 0 || rows.len() <= 2 || !is_blank(s, at.row) {
        return false;
    }
    let above = rows[at.row_index - 1];
    s.remove(at.row);
    if let Some(last) = s.children(above).last() {
        caret_to_end(s, *last);
    }
    true
}

/// Every cell of the table in reading order.
fn cells<S: Surface>(s: &S, table: NodeId) -> Vec<NodeId> {
    s.children(table)
        .into_iter()
        .flat_map(|row| s.children(row))
        .collect()
}

/// Tab and Shift-Tab: the caret moves to the end of the next or previous
/// cell, across rows. At either end of the table it stays put.
pub fn tab<S: Surface>(s: &mut S, cell: NodeId, backwards: bool) {
    let Some(at) = locate(s, cell) else {
        return;
    };
    let all = cells(s, at.table);
    let Some(index) = all.iter().position(|c| *c == cell) else {
        return;
    };
    let target = if backwards {
        index.checked_sub(1)
    } else {
        Some(index + 1)
    };
    if let Some(target) = target.and_then(|i| all.get(i)) {
        caret_to_end(s, *target);
    }
}

/// Arrow keys inside a table. Left at the start of a cell and Right at its
/// end cross into the neighbouring cell, wrapping between rows. Up and
/// Down go to the same column of the adjacent row. Returns whether the
/// caret moved.
pub fn arrow<S: Surface>(s: &mut S, cell: NodeId, key: Key) -> bool {
    let (Some(at), Some(caret)) = (locate(s, cell), s.caret()) else {
        return false;
    };
    let Some(offset) = s.flat_offset(cell, caret) else {
        return false;
    };
    let text: Vec<char> = s.read_text(cell).chars().collect();
    let before_blank = text[..offset.min(text.len())].iter().all(|c| c.is_whitespace());
    let after_blank = text[offset.min(text.len())..].iter().all(|c| c.is_whitespace());

    let rows = s.children(at.table);
    let all = cells(s, at.table);
    let index = all.iter().position(|c| *c == cell);
    let target = match key {
        Key::ArrowLeft if before_blank => index.and_then(|i| i.checked_sub(1)).map(|i| all[i]),
        Key::ArrowRight if after_blank => index.and_then(|i| all.get(i + 1).copied()),
        Key::ArrowUp => at
            .row_index
            .checked_sub(1)
            .and_then(|r| s.children(rows[r]).get(at.column).copied()),
        Key::ArrowDown => rows
            .get(at.row_index + 1)
            .and_then(|r| s.children(*r).get(at.column).copied()),
        _ => None,
    };
    match target {
        Some(target) => {
            caret_to_end(s, target);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parsing::Markdown, surface::Position, tree::Document};
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> (Document, Markdown) {
        let md = Markdown::default();
        (Document::from_nodes(&md.parse(text)), md)
    }

    /// Cell `column` of row `row` in the first block.
    fn cell(d: &Document, row: usize, column: usize) -> NodeId {
        let table = d.children(d.root())[0];
        d.children(d.children(table)[row])[column]
    }

    #[test]
    fn test_enter_adds_row_below() {
        // Given the caret in the first body row
        let (mut d, md) = doc("| a | b |\n| --- | --- |\n| 1 | 2 |\n| 3 | 4 |");
        let one = cell(&d, 1, 0);
        d.set_cursor(one, 1);

        // When Enter is pressed
        enter(&mut d, one);

        // Then an empty row follows it and holds the caret
        assert_eq!(
            md.serialize(&d.to_nodes()),
            "| a | b |\n| --- | --- |\n| 1 | 2 |\n|  |  |\n| 3 | 4 |"
        );
        assert_eq!(d.caret(), Some(Position::new(cell(&d, 2, 0), 0)));
    }

    #[test]
    fn test_enter_on_blank_last_row_leaves_table() {
        let (mut d, md) = doc("| a |\n| --- |\n| 1 |\n|  |");
        let blank = cell(&d, 2, 0);

        let created = enter(&mut d, blank).unwrap();

        assert_eq!(md.serialize(&d.to_nodes()), "| a |\n| --- |\n| 1 |");
        assert_eq!(d.caret(), Some(Position::new(created[0], 0)));
        assert_eq!(d.tag(created[0]), Some(&Tag::Paragraph));
    }

    #[test]
    fn test_enter_on_only_blank_row_drops_table() {
        let (mut d, _) = doc("| a |\n| --- |");
        let blank = cell(&d, 1, 0);

        enter(&mut d, blank);

        assert_eq!(d.find_element(|t| matches!(t, Tag::Table { .. })), None);
    }

    #[test]
    fn test_backspace_in_blank_row_removes_it() {
        let (mut d, md) = doc("| a | b |\n| --- | --- |\n| 1 | 2 |\n|  |  |");
        let blank = cell(&d, 2, 0);

        assert!(backspace(&mut d, blank));

        assert_eq!(md.serialize(&d.to_nodes()), "| a | b |\n| --- | --- |\n| 1 | 2 |");
        let two = d.find_text("2").unwrap();
        assert_eq!(d.caret(), Some(Position::new(two, 1)));
    }

    #[test]
    fn test_backspace_keeps_last_body_row() {
        let (mut d, _) = doc("| a |\n| --- |\n|  |");
        let blank = cell(&d, 1, 0);
        assert!(!backspace(&mut d, blank));
    }

    #[test]
    fn test_backspace_in_empty_table_leaves_empty_line() {
        let (mut d, _) = doc("|  |\n| --- |\n|  |");
        let header = cell(&d, 0, 0);

        assert!(backspace(&mut d, header));

        assert_eq!(d.to_nodes(), vec![crate::tree::Node::element(Tag::Paragraph, vec![])]);
    }

    #[test]
    fn test_tab_walks_cells_across_rows() {
        let (mut d, _) = doc("| a | b |\n| --- | --- |\n| 1 | 2 |");
        let b = cell(&d, 0, 1);

        tab(&mut d, b, false);
        let one = d.find_text("1").unwrap();
        assert_eq!(d.caret(), Some(Position::new(one, 1)));

        let one_cell = cell(&d, 1, 0);
        tab(&mut d, one_cell, true);
        let b_leaf = d.find_text("b").unwrap();
        assert_eq!(d.caret(), Some(Position::new(b_leaf, 1)));
    }

    #[test]
    fn test_arrows_cross_cell_edges_only() {
        let (mut d, _) = doc("| ab | c |\n| --- | --- |\n| 1 | 2 |");
        let ab = d.find_text("ab").unwrap();
        let first = cell(&d, 0, 0);

        // inside the text the host moves the caret
        d.set_cursor(ab, 1);
        assert!(!arrow(&mut d, first, Key::ArrowRight));

        d.set_cursor(ab, 2);
        assert!(arrow(&mut d, first, Key::ArrowRight));
        let c = d.find_text("c").unwrap();
        assert_eq!(d.caret(), Some(Position::new(c, 1)));

        let c_cell = cell(&d, 0, 1);
        assert!(arrow(&mut d, c_cell, Key::ArrowDown));
        let two = d.find_text("2").unwrap();
        assert_eq!(d.caret(), Some(Position::new(two, 1)));

        // nothing below the last row
        let two_cell = cell(&d, 1, 1);
        assert!(!arrow(&mut d, two_cell, Key::ArrowDown));
    }
}
