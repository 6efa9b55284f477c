use std::io;

use tracing::info;

use super::Transition;
use crate::model::todo::Priority;
use crate::ops::todo_ops;
use crate::tui::prompt;
use crate::tui::session::Session;
use crate::tui::ui::Ui;

/// Asks for title, description and priority, then adds the item.
pub struct InsertMode;

impl InsertMode {
    pub fn on_enter(&mut self, session: &mut Session, ui: &mut Ui) -> io::Result<Transition> {
        let mut base = ui.screen.rows().to_vec();
        if let Some(first) = base.first_mut() {
            *first = "== Inserting new item ==".to_string();
        }

        let Some(title) = prompt::line(ui, &base, "Title:")? else {
            return Ok(Transition::Pop);
        };
        let description = prompt::line(ui, &base, "Description (<br> for newlines):")?
            .map(|text| text.replace("<br>", "\n"))
            .unwrap_or_default();
        let options = vec![
            (Priority::Whenever.label().to_string(), Priority::Whenever),
            (Priority::Urgent.label().to_string(), Priority::Urgent),
        ];
        let top = ui.height().saturating_sub(3);
        let Some(priority) = prompt::select(
            ui,
            &base,
            top,
            "Priority:",
            options,
            session.theme.todo_item_selected,
        )?
        else {
            return Ok(Transition::Pop);
        };

        match todo_ops::insert_item(&mut session.list, &title, &description, priority) {
            Ok(id) => {
                info!(id, "inserted item");
                session.save();
            }
            Err(e) => session.status = Some(e.to_string()),
        }
        Ok(Transition::Pop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::keys::{Key, KeyCode, ScriptedKeys};
    use crate::tui::test_helpers::{session, ui};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn inserts_after_three_prompts() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp, &[]);
        let mut ui = ui(ScriptedKeys::typed("taxes\ndue<br>friday\nj\n"));
        let t = InsertMode.on_enter(&mut session, &mut ui).unwrap();
        assert!(matches!(t, Transition::Pop));

        let item = session.list.get(1).unwrap();
        assert_eq!(item.title, "taxes");
        assert_eq!(item.description, "due\nfriday");
        assert_eq!(item.priority, Priority::Urgent);
        assert!(session.path.exists());
    }

    #[test]
    fn empty_description_is_allowed() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp, &[]);
        let mut ui = ui(ScriptedKeys::typed("milk\n\n\n"));
        InsertMode.on_enter(&mut session, &mut ui).unwrap();
        let item = session.list.get(1).unwrap();
        assert_eq!(item.description, "");
        assert_eq!(item.priority, Priority::Whenever);
    }

    #[test]
    fn escape_on_title_cancels() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp, &[]);
        let mut ui = ui(ScriptedKeys::new([Key::plain(KeyCode::Esc)]));
        InsertMode.on_enter(&mut session, &mut ui).unwrap();
        assert!(session.list.is_empty());
        assert!(!session.path.exists());
    }
}
