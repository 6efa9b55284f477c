use std::io;

use tracing::{info, warn};

use super::{MessageMode, Mode, Transition, finish_frame, indented, painted, priority_badge};
use crate::model::todo::TodoItem;
use crate::ops::todo_ops;
use crate::parse::{deserialize_item, serialize_item};
use crate::tui::help_line::HelpLine;
use crate::tui::keys::{Key, KeyCode};
use crate::tui::prompt;
use crate::tui::session::Session;
use crate::tui::ui::Ui;

const HELP: &str = "[T] Title [R] Description [V] Edit externally [P] Toggle Priority [S] Save [W] Write & Quit [Q] Quit";

/// Line break marker for single-line description input
const BREAK: &str = "<br>";

/// Edits a draft copy of one item; nothing reaches the collection until
/// it is saved.
pub struct EditMode {
    item_id: u32,
    draft: TodoItem,
    changed: bool,
    help: HelpLine,
}

impl EditMode {
    pub fn new(session: &Session, item_id: u32) -> Self {
        EditMode {
            item_id,
            draft: session.list.get(item_id).cloned().unwrap_or_default(),
            changed: false,
            help: HelpLine::new(HELP),
        }
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn draft(&self) -> &TodoItem {
        &self.draft
    }

    pub fn refresh(&mut self, session: &Session) {
        if !self.changed {
            if let Some(item) = session.list.get(self.item_id) {
                self.draft = item.clone();
            }
        }
    }

    pub fn render(&mut self, session: &Session, width: usize, height: usize) -> Vec<String> {
        let theme = &session.theme;
        let mut rows = self.help.render(width, theme.help_line);
        rows.push(if self.changed {
            "<< Editing (changed!) >>".to_string()
        } else {
            "<< Editing >>".to_string()
        });
        let header = format!("== {} ==", self.draft.title);
        rows.extend(painted(&header, width, theme.todo_item_header));
        rows.push(format!("   {}", priority_badge(self.draft.priority)));
        rows.extend(indented(&self.draft.description, width, 2));
        rows.extend(painted(&header, width, theme.todo_item_header));
        finish_frame(rows, width, height, session.status.as_deref())
    }

    pub fn handle_key(
        &mut self,
        key: Key,
        session: &mut Session,
        ui: &mut Ui,
    ) -> io::Result<Transition> {
        if self.help.handle_key(key) {
            return Ok(Transition::Stay);
        }
        let transition = match (key.code, key.letter()) {
            (_, Some('t')) => {
                let base = ui.screen.rows().to_vec();
                if let Some(title) = prompt::line(ui, &base, "New title:")? {
                    self.draft.title = title.trim().to_string();
                    self.changed = true;
                }
                Transition::Stay
            }
            (_, Some('r')) => {
                let base = ui.screen.rows().to_vec();
                let label = format!("New description ({} for newlines):", BREAK);
                if let Some(text) = prompt::line(ui, &base, &label)? {
                    self.draft.description = text.replace(BREAK, "\n");
                    self.changed = true;
                }
                Transition::Stay
            }
            (_, Some('p')) => {
                self.draft.priority = self.draft.priority.toggled();
                self.changed = true;
                Transition::Stay
            }
            (_, Some('v')) => self.edit_externally(session, ui)?,
            (_, Some('s')) => {
                self.commit(session);
                Transition::Stay
            }
            (_, Some('w')) => {
                if self.commit(session) {
                    Transition::Pop
                } else {
                    Transition::Stay
                }
            }
            (KeyCode::Backspace, _) => {
                if self.changed {
                    session.status = Some("Unsaved changes! Quit with Q to discard changes.".into());
                    Transition::Stay
                } else {
                    Transition::Pop
                }
            }
            _ => Transition::Stay,
        };
        Ok(transition)
    }

    /// Round-trip the draft through the item text format in the external
    /// editor. Unparsable text is reported and dropped.
    fn edit_externally(&mut self, session: &mut Session, ui: &mut Ui) -> io::Result<Transition> {
        let text = serialize_item(&self.draft);
        let Some(edited) = session.edit_external(ui, &text)? else {
            return Ok(Transition::Stay);
        };
        match deserialize_item(&edited) {
            Ok(item) => {
                self.draft.title = item.title;
                // The text form always ends the description with a newline
                let mut description = item.description;
                if description.ends_with('\n') {
                    description.pop();
                }
                self.draft.description = description;
                self.draft.steps = item.steps;
                self.changed = true;
                Ok(Transition::Stay)
            }
            Err(e) => {
                warn!(error = %e, "edited item could not be parsed");
                Ok(Transition::Push(Mode::Message(MessageMode::new(format!(
                    "Could not read the edited item, changes were discarded. {}",
                    e
                )))))
            }
        }
    }

    /// Write the draft into the collection and save. Returns whether the
    /// draft was accepted.
    fn commit(&mut self, session: &mut Session) -> bool {
        match todo_ops::replace_content(&mut session.list, self.item_id, self.draft.clone()) {
            Ok(()) => {
                info!(id = self.item_id, "item edited");
                session.save();
                self.changed = false;
                if let Some(item) = session.list.get(self.item_id) {
                    self.draft = item.clone();
                }
                true
            }
            Err(e) => {
                session.status = Some(e.to_string());
                false
            }
        }
    }
}
