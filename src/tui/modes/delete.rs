use std::io;

use tracing::info;

use super::{Transition, indented, painted, priority_badge};
use crate::ops::todo_ops;
use crate::tui::prompt;
use crate::tui::session::Session;
use crate::tui::ui::Ui;

/// Shows one item and asks whether to delete it.
pub struct DeleteMode {
    item_id: u32,
}

impl DeleteMode {
    pub fn new(item_id: u32) -> Self {
        DeleteMode { item_id }
    }

    pub fn on_enter(&mut self, session: &mut Session, ui: &mut Ui) -> io::Result<Transition> {
        let Some(item) = session.list.get(self.item_id) else {
            return Ok(Transition::Pop);
        };
        let width = ui.width();
        let mut base = painted(
            &format!("== {} ==", item.title),
            width,
            session.theme.todo_item_header,
        );
        base.push(format!("   {}", priority_badge(item.priority)));
        base.extend(indented(&item.description, width, 2));

        let top = (base.len() + 1).min(ui.height().saturating_sub(3));
        let answer = prompt::confirm(
            ui,
            &base,
            top,
            "Are you sure you want to delete?",
            session.theme.todo_item_selected,
        )?;
        if answer == Some(true) {
            match todo_ops::delete_item(&mut session.list, self.item_id) {
                Ok(item) => {
                    info!(id = item.id, "deleted item");
                    session.save();
                }
                Err(e) => session.status = Some(e.to_string()),
            }
        }
        Ok(Transition::Pop)
    }
}
