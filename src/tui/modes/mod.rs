//! The UI is a stack of modes. The top mode draws the screen and gets the
//! keys; a transition pushes or pops modes.

pub mod confirm;
pub mod delete;
pub mod edit;
pub mod help;
pub mod insert;
pub mod message;
pub mod normal;
pub mod reader;
pub mod view;

use std::io;

pub use confirm::{ConfirmAction, ConfirmMode};
pub use delete::DeleteMode;
pub use edit::EditMode;
pub use help::HelpMode;
pub use insert::InsertMode;
pub use message::MessageMode;
pub use normal::NormalMode;
pub use reader::ReaderMode;
pub use view::ViewMode;

use super::keys::Key;
use super::session::Session;
use super::theme::{AnsiColor, Style, style};
use super::ui::Ui;
use super::wrap::wrap;
use crate::model::todo::Priority;
use crate::util::text::pad_to_width;

pub enum Mode {
    Normal(NormalMode),
    View(ViewMode),
    Edit(EditMode),
    Insert(InsertMode),
    Delete(DeleteMode),
    Confirm(ConfirmMode),
    Reader(ReaderMode),
    Help(HelpMode),
    Message(MessageMode),
}

/// What the stack should do after a key
pub enum Transition {
    Stay,
    Push(Mode),
    Pop,
    /// Pop this many modes at once
    PopMany(usize),
    Quit,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal(_) => "normal",
            Mode::View(_) => "view",
            Mode::Edit(_) => "edit",
            Mode::Insert(_) => "insert",
            Mode::Delete(_) => "delete",
            Mode::Confirm(_) => "confirm",
            Mode::Reader(_) => "reader",
            Mode::Help(_) => "help",
            Mode::Message(_) => "message",
        }
    }

    /// Runs right after the mode is pushed. Prompt-only modes do all their
    /// work here.
    pub fn on_enter(&mut self, session: &mut Session, ui: &mut Ui) -> io::Result<Transition> {
        match self {
            Mode::Insert(m) => m.on_enter(session, ui),
            Mode::Delete(m) => m.on_enter(session, ui),
            Mode::Confirm(m) => m.on_enter(session, ui),
            _ => Ok(Transition::Stay),
        }
    }

    /// Re-read the collection after the modes above were popped.
    pub fn refresh(&mut self, session: &Session) {
        match self {
            Mode::Normal(m) => m.refresh(session),
            Mode::View(m) => m.refresh(session),
            Mode::Edit(m) => m.refresh(session),
            _ => {}
        }
    }

    /// What `q` does in this mode.
    pub fn on_quit(&self, session: &Session) -> Transition {
        match self {
            Mode::Normal(_) if session.dirty => Transition::Push(Mode::Confirm(ConfirmMode::new(
                "Save changes before quitting?",
                ConfirmAction::SaveAndQuit,
            ))),
            Mode::Normal(_) => Transition::Quit,
            Mode::Edit(m) if m.changed() => Transition::Push(Mode::Confirm(ConfirmMode::new(
                "Discard unsaved changes?",
                ConfirmAction::DiscardEdits,
            ))),
            _ => Transition::Pop,
        }
    }

    pub fn render(&mut self, session: &Session, width: usize, height: usize) -> Vec<String> {
        match self {
            Mode::Normal(m) => m.render(session, width, height),
            Mode::View(m) => m.render(session, width, height),
            Mode::Edit(m) => m.render(session, width, height),
            Mode::Insert(_) | Mode::Delete(_) | Mode::Confirm(_) => {
                finish_frame(Vec::new(), width, height, session.status.as_deref())
            }
            Mode::Reader(m) => m.render(session, width, height),
            Mode::Help(m) => m.render(session, width, height),
            Mode::Message(m) => {
                let blank = finish_frame(Vec::new(), width, height, session.status.as_deref());
                m.overlay(blank, width, height)
            }
        }
    }

    pub fn handle_key(
        &mut self,
        key: Key,
        session: &mut Session,
        ui: &mut Ui,
    ) -> io::Result<Transition> {
        match self {
            Mode::Normal(m) => m.handle_key(key, session, ui),
            Mode::View(m) => m.handle_key(key, session, ui),
            Mode::Edit(m) => m.handle_key(key, session, ui),
            Mode::Reader(m) => Ok(m.handle_key(key)),
            Mode::Help(m) => Ok(m.handle_key(key)),
            Mode::Message(m) => Ok(m.handle_key(key)),
            // Prompt-only modes are done by the time a key arrives
            Mode::Insert(_) | Mode::Delete(_) | Mode::Confirm(_) => Ok(Transition::Pop),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared drawing helpers
// ---------------------------------------------------------------------------

/// Wrap `text` to `width` and paint every line.
pub(crate) fn painted(text: &str, width: usize, style: Style) -> Vec<String> {
    wrap(text, width.max(1))
        .lines
        .iter()
        .map(|line| style.paint(line))
        .collect()
}

/// `<Whenever>` on green or `*Urgent*` on red
pub(crate) fn priority_badge(priority: Priority) -> String {
    match priority {
        Priority::Whenever => style(
            AnsiColor::None,
            AnsiColor::DarkGreen,
            &format!("<{}>", priority.label()),
        ),
        Priority::Urgent => style(
            AnsiColor::None,
            AnsiColor::DarkRed,
            &format!("*{}*", priority.label()),
        ),
    }
}

/// Free text indented by `indent` columns and wrapped to the rest.
pub(crate) fn indented(text: &str, width: usize, indent: usize) -> Vec<String> {
    let inner = width.saturating_sub(indent).max(1);
    let pad = " ".repeat(indent);
    crate::util::text::normalize_newlines(crate::util::text::trim_ending_newlines(text))
        .split('\n')
        .flat_map(|line| wrap(line, inner).lines)
        .map(|line| format!("{}{}", pad, line))
        .collect()
}

/// Cut or blank-fill `rows` to `height - 1` rows and put the status
/// message (if any) on the last row.
pub(crate) fn finish_frame(
    mut rows: Vec<String>,
    width: usize,
    height: usize,
    status: Option<&str>,
) -> Vec<String> {
    if height == 0 {
        return Vec::new();
    }
    rows.truncate(height - 1);
    rows.resize(height - 1, String::new());
    let status = status.unwrap_or("");
    rows.push(pad_to_width(
        &crate::util::text::truncate_chars(status, width),
        width,
    ));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::text::strip_sgr;
    use pretty_assertions::assert_eq;

    #[test]
    fn badges() {
        assert_eq!(strip_sgr(&priority_badge(Priority::Urgent)), "*Urgent*");
        assert_eq!(strip_sgr(&priority_badge(Priority::Whenever)), "<Whenever>");
        assert!(priority_badge(Priority::Urgent).contains("\x1b[1;41m"));
    }

    #[test]
    fn indented_text_wraps_inside_margin() {
        assert_eq!(
            indented("abcdef\nxy\n\n", 5, 2),
            vec!["  abc", "  def", "  xy "]
        );
    }

    #[test]
    fn frame_has_status_on_last_row() {
        let rows = finish_frame(vec!["a".into(), "b".into(), "c".into()], 4, 3, Some("saved"));
        assert_eq!(rows, vec!["a", "b", "save"]);
        let rows = finish_frame(vec![], 2, 2, None);
        assert_eq!(rows, vec!["", "  "]);
    }
}
