use super::{Transition, finish_frame};
use crate::tui::keys::{Key, KeyCode};
use crate::tui::session::Session;
use crate::tui::theme::Theme;

/// Key bindings, grouped into rows
const BINDINGS: &[&[(&str, &str)]] = &[
    &[("Enter", "Show item"), ("Backspace", "Back")],
    &[("I", "New item"), ("H", "Help"), ("Q", "Quit")],
    &[("E", "Edit item"), ("D", "Delete item")],
    &[("S", "Save"), ("F", "Find")],
    &[("G", "First item"), ("Shift+G", "Last item")],
    &[("J", "Next item"), ("K", "Prev item")],
    &[("Shift+J", "Move item down"), ("Shift+K", "Move item up")],
    &[("N", "Next page"), ("P", "Prev page")],
    &[("0-9", "Repeat next movement")],
    &[("Z", "Expand help line"), ("F5", "Redraw")],
];

const ITEM_BINDINGS: &[&[(&str, &str)]] = &[
    &[("+", "Add step"), ("-", "Remove step")],
    &[("T", "Edit step"), ("V", "Edit step externally")],
    &[("Space", "Mark step"), ("A", "Active step")],
    &[("O", "Read description"), ("Shift+O", "Read step")],
];

/// Static list of key bindings
pub struct HelpMode;

impl HelpMode {
    fn section(theme: &Theme, title: &str, rows: &[&[(&str, &str)]]) -> Vec<String> {
        let mut out = vec![theme.help_mode_header.paint(title)];
        for row in rows {
            let line: String = row
                .iter()
                .map(|(key, text)| {
                    format!(
                        " {} {}",
                        theme.help_mode_key.paint(&format!("[{}]", key)),
                        theme.help_mode_text.paint(text)
                    )
                })
                .collect();
            out.push(line);
        }
        out
    }

    pub fn render(&mut self, session: &Session, width: usize, height: usize) -> Vec<String> {
        let mut rows = Self::section(&session.theme, "== Keybindings ==", BINDINGS);
        rows.push(String::new());
        rows.extend(Self::section(&session.theme, "== Item view ==", ITEM_BINDINGS));
        finish_frame(rows, width, height, session.status.as_deref())
    }

    pub fn handle_key(&mut self, key: Key) -> Transition {
        match key.code {
            KeyCode::Backspace => Transition::Pop,
            _ => Transition::Stay,
        }
    }
}
