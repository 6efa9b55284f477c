use std::io;

use tempfile::TempDir;

use crate::io::editor::EditorError;
use crate::model::todo::{Priority, TodoList};
use crate::ops::todo_ops;
use crate::tui::keys::ScriptedKeys;
use crate::tui::screen::Screen;
use crate::tui::session::Session;
use crate::tui::theme::Theme;
use crate::tui::ui::Ui;

pub const TERM_W: u16 = 40;
pub const TERM_H: u16 = 12;

/// Rows as plain text: styles stripped, trailing spaces and trailing blank
/// rows removed.
pub fn plain(rows: &[String]) -> String {
    let lines: Vec<String> = rows
        .iter()
        .map(|row| crate::util::text::strip_sgr(row).trim_end().to_string())
        .collect();
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// A session over an unsaved collection in `dir`, holding `items` in
/// insertion order. The external editor leaves text unchanged.
pub fn session(dir: &TempDir, items: &[(&str, Priority)]) -> Session {
    let mut list = TodoList::new();
    for (title, priority) in items {
        todo_ops::insert_item(&mut list, title, "", *priority).unwrap();
    }
    Session::new(list, dir.path().join("todohd.json"), Theme::dark(), 5)
        .with_editor(|_: &str| -> Result<Option<String>, EditorError> { Ok(None) })
}

/// Add a Whenever item with steps, without saving. Returns its id.
pub fn item_with_steps(session: &mut Session, title: &str, description: &str, steps: &[&str]) -> u32 {
    let id = todo_ops::insert_item(&mut session.list, title, description, Priority::Whenever).unwrap();
    for step in steps {
        todo_ops::add_step(&mut session.list, id, step).unwrap();
    }
    id
}

/// A detached UI of [`TERM_W`] x [`TERM_H`] that discards its output.
pub fn ui(keys: ScriptedKeys) -> Ui {
    Ui::new(Screen::new(Box::new(io::sink()), TERM_W, TERM_H), Box::new(keys))
}
