use std::io;

use super::Transition;
use crate::tui::prompt;
use crate::tui::session::Session;
use crate::tui::ui::Ui;

/// What a yes answer does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Save,
    /// Yes saves and quits, no quits without saving
    SaveAndQuit,
    /// Yes drops the edit mode below
    DiscardEdits,
}

/// A yes/no question over the current screen
pub struct ConfirmMode {
    question: String,
    action: ConfirmAction,
}

impl ConfirmMode {
    pub fn new(question: impl Into<String>, action: ConfirmAction) -> Self {
        ConfirmMode {
            question: question.into(),
            action,
        }
    }

    pub fn action(&self) -> ConfirmAction {
        self.action
    }

    pub fn on_enter(&mut self, session: &mut Session, ui: &mut Ui) -> io::Result<Transition> {
        let base = ui.screen.rows().to_vec();
        let top = ui.height().saturating_sub(3);
        let answer = prompt::confirm(ui, &base, top, &self.question, session.theme.todo_item_selected)?;

        Ok(match (self.action, answer) {
            (ConfirmAction::Save, Some(true)) => {
                session.save();
                Transition::Pop
            }
            (ConfirmAction::SaveAndQuit, Some(true)) => {
                if session.save() {
                    Transition::Quit
                } else {
                    Transition::Pop
                }
            }
            (ConfirmAction::SaveAndQuit, Some(false)) => Transition::Quit,
            // This mode and the edit mode under it
            (ConfirmAction::DiscardEdits, Some(true)) => Transition::PopMany(2),
            _ => Transition::Pop,
        })
    }
}
