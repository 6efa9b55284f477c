use std::io;

use tracing::debug;

use super::{
    ConfirmAction, ConfirmMode, DeleteMode, EditMode, HelpMode, InsertMode, MessageMode, Mode,
    Transition, ViewMode, finish_frame,
};
use crate::model::todo::{Priority, TodoItem, display_order};
use crate::ops::todo_ops::{self, Direction};
use crate::tui::accumulator::Accumulator;
use crate::tui::help_line::HelpLine;
use crate::tui::keys::{Key, KeyCode};
use crate::tui::list_box::PagedListBox;
use crate::tui::prompt;
use crate::tui::session::Session;
use crate::tui::ui::Ui;

const HELP: &str = "[I] New item [H] Help [Q] Quit";

/// The item list
pub struct NormalMode {
    list: PagedListBox<TodoItem>,
    help: HelpLine,
    accumulator: Accumulator,
}

impl NormalMode {
    pub fn new(session: &Session) -> Self {
        let theme = session.theme.clone();
        let list = PagedListBox::new(
            |item: &TodoItem| match item.priority {
                Priority::Whenever => format!(" * {}", item.title),
                Priority::Urgent => format!(" (!) {}", item.title),
            },
            move |item: &TodoItem, text, selected| {
                let style = match (item.priority, selected) {
                    (Priority::Urgent, true) => theme.todo_item_urgent_selected,
                    (Priority::Urgent, false) => theme.todo_item_urgent,
                    (Priority::Whenever, true) => theme.todo_item_selected,
                    (Priority::Whenever, false) => theme.todo_item,
                };
                style.paint(text)
            },
        )
        .with_ordering(display_order);

        let mut mode = NormalMode {
            list,
            help: HelpLine::new(HELP),
            accumulator: Accumulator::default(),
        };
        mode.refresh(session);
        mode
    }

    pub fn refresh(&mut self, session: &Session) {
        self.list.update(session.list.items().cloned());
    }

    pub fn selected_id(&self) -> Option<u32> {
        self.list.selected().map(|item| item.id)
    }

    fn select_id(&mut self, id: u32) {
        if let Some(index) = self.list.items().iter().position(|item| item.id == id) {
            self.list.select_index(index);
        }
    }

    pub fn render(&mut self, session: &Session, width: usize, height: usize) -> Vec<String> {
        let text = match session.saved_label() {
            Some(label) => format!("{} {}", HELP, label),
            None => HELP.to_string(),
        };
        self.help.set_text(text);

        let mut rows = self.help.render(width, session.theme.help_line);
        let body = height.saturating_sub(rows.len() + 1);
        if body > 0 {
            rows.extend(self.list.render(width, body));
        }
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
        if let Some(digit) = key.digit() {
            self.accumulator.accumulate_digit(digit);
            return Ok(Transition::Stay);
        }

        let transition = match (key.code, key.letter()) {
            (KeyCode::Enter, _) => self.with_selected(|id| Mode::View(ViewMode::new(session, id))),
            (_, Some('i')) => Transition::Push(Mode::Insert(InsertMode)),
            (_, Some('e')) => self.with_selected(|id| Mode::Edit(EditMode::new(session, id))),
            (_, Some('d')) => self.with_selected(|id| Mode::Delete(DeleteMode::new(id))),
            (_, Some('h')) => Transition::Push(Mode::Help(HelpMode)),
            (_, Some('s')) => Transition::Push(Mode::Confirm(ConfirmMode::new(
                "Save?",
                ConfirmAction::Save,
            ))),
            (_, Some('f')) => self.find(session, ui)?,
            (_, Some('n')) => {
                let list = &mut self.list;
                self.accumulator.execute(|| {
                    list.next_page();
                });
                Transition::Stay
            }
            (_, Some('p')) => {
                let list = &mut self.list;
                self.accumulator.execute(|| {
                    list.previous_page();
                });
                Transition::Stay
            }
            (_, Some('g')) => {
                if key.shift {
                    self.list.select_last();
                } else {
                    self.list.select_first();
                }
                Transition::Stay
            }
            (KeyCode::Down, _) | (_, Some('j')) if key.shift => {
                self.move_selected(session, Direction::Down);
                Transition::Stay
            }
            (KeyCode::Up, _) | (_, Some('k')) if key.shift => {
                self.move_selected(session, Direction::Up);
                Transition::Stay
            }
            (KeyCode::Down, _) | (_, Some('j')) => {
                let list = &mut self.list;
                self.accumulator.execute(|| {
                    list.select_next();
                });
                Transition::Stay
            }
            (KeyCode::Up, _) | (_, Some('k')) => {
                let list = &mut self.list;
                self.accumulator.execute(|| {
                    list.select_previous();
                });
                Transition::Stay
            }
            _ => Transition::Stay,
        };
        self.accumulator.reset();
        Ok(transition)
    }

    fn with_selected(&self, mode: impl FnOnce(u32) -> Mode) -> Transition {
        match self.selected_id() {
            Some(id) => Transition::Push(mode(id)),
            None => Transition::Stay,
        }
    }

    fn move_selected(&mut self, session: &mut Session, direction: Direction) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let mut moved = false;
        for _ in 0..self.accumulator.take() {
            match todo_ops::move_item(&mut session.list, id, direction) {
                Ok(true) => moved = true,
                _ => break,
            }
        }
        if moved {
            debug!(id, ?direction, "moved item");
            session.touch();
            self.refresh(session);
            self.select_id(id);
        }
    }

    fn find(&mut self, session: &mut Session, ui: &mut Ui) -> io::Result<Transition> {
        let base = ui.screen.rows().to_vec();
        let Some(query) = prompt::line(ui, &base, "Find:")? else {
            return Ok(Transition::Stay);
        };
        let hits = todo_ops::find(&session.list, &query);
        if hits.is_empty() {
            return Ok(Transition::Push(Mode::Message(MessageMode::new(format!(
                "No results for '{}'",
                query
            )))));
        }

        let options = hits
            .into_iter()
            .map(|hit| {
                let title = session
                    .list
                    .get(hit.item_id)
                    .map(|item| item.title.as_str())
                    .unwrap_or_default();
                let label = match hit.step {
                    Some(_) => format!("Step (in '{}'): {}", title, hit.text),
                    None => format!("Item: {}", hit.text),
                };
                (label, hit.item_id)
            })
            .collect();
        let picked = prompt::select(
            ui,
            &base,
            1,
            "Search results:",
            options,
            session.theme.todo_item_selected,
        )?;
        Ok(match picked {
            Some(id) => Transition::Push(Mode::View(ViewMode::new(session, id))),
            None => Transition::Stay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::keys::ScriptedKeys;
    use crate::tui::test_helpers::{plain, session, ui};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn titles(mode: &NormalMode) -> Vec<String> {
        mode.list.items().iter().map(|i| i.title.clone()).collect()
    }

    #[test]
    fn urgent_items_are_listed_first() {
        let tmp = TempDir::new().unwrap();
        let session = session(
            &tmp,
            &[("milk", Priority::Whenever), ("taxes", Priority::Urgent)],
        );
        let mut mode = NormalMode::new(&session);
        assert_eq!(titles(&mode), vec!["taxes", "milk"]);

        let rows = mode.render(&session, 30, 6);
        insta::assert_snapshot!(plain(&rows), @r"
        [I] New item [H] Help [Q] Quit
         > (!) taxes
         * milk
        Page 1/1
        ");
    }

    #[test]
    fn digits_repeat_movement() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(
            &tmp,
            &[
                ("a", Priority::Whenever),
                ("b", Priority::Whenever),
                ("c", Priority::Whenever),
                ("d", Priority::Whenever),
            ],
        );
        let mut ui = ui(ScriptedKeys::new([]));
        let mut mode = NormalMode::new(&session);
        mode.render(&session, 30, 10);
        for key in [Key::char('2'), Key::char('j')] {
            mode.handle_key(key, &mut session, &mut ui).unwrap();
        }
        assert_eq!(mode.list.selected_item().title, "c");
        mode.handle_key(Key::char('k'), &mut session, &mut ui).unwrap();
        assert_eq!(mode.list.selected_item().title, "b");
    }

    #[test]
    fn shift_j_moves_item_and_keeps_it_selected() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(
            &tmp,
            &[("a", Priority::Whenever), ("b", Priority::Whenever)],
        );
        let mut ui = ui(ScriptedKeys::new([]));
        let mut mode = NormalMode::new(&session);
        mode.render(&session, 30, 10);

        mode.handle_key(Key::char('J'), &mut session, &mut ui).unwrap();
        assert_eq!(titles(&mode), vec!["b", "a"]);
        assert_eq!(mode.list.selected_item().title, "a");
        assert!(session.dirty);
    }

    #[test]
    fn enter_opens_selected_item() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp, &[("a", Priority::Whenever)]);
        let mut ui = ui(ScriptedKeys::new([]));
        let mut mode = NormalMode::new(&session);
        let t = mode
            .handle_key(Key::plain(KeyCode::Enter), &mut session, &mut ui)
            .unwrap();
        assert!(matches!(t, Transition::Push(Mode::View(_))));
    }

    #[test]
    fn enter_on_empty_list_stays() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp, &[]);
        let mut ui = ui(ScriptedKeys::new([]));
        let mut mode = NormalMode::new(&session);
        let t = mode
            .handle_key(Key::plain(KeyCode::Enter), &mut session, &mut ui)
            .unwrap();
        assert!(matches!(t, Transition::Stay));
    }

    #[test]
    fn find_without_hits_shows_message() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp, &[("milk", Priority::Whenever)]);
        let mut ui = ui(ScriptedKeys::typed("bread\n"));
        let mut mode = NormalMode::new(&session);
        let t = mode.handle_key(Key::char('f'), &mut session, &mut ui).unwrap();
        match t {
            Transition::Push(Mode::Message(m)) => assert_eq!(m.message(), "No results for 'bread'"),
            _ => panic!("expected a message"),
        }
    }

    #[test]
    fn find_opens_picked_hit() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(
            &tmp,
            &[("buy milk", Priority::Whenever), ("call mum", Priority::Whenever)],
        );
        let mut ui = ui(ScriptedKeys::typed("m\nj\n"));
        let mut mode = NormalMode::new(&session);
        let t = mode.handle_key(Key::char('f'), &mut session, &mut ui).unwrap();
        match t {
            Transition::Push(Mode::View(view)) => {
                assert_eq!(session.list.get(view.item_id()).unwrap().title, "call mum")
            }
            _ => panic!("expected the view mode"),
        }
    }
}
