use std::io;

use tracing::{debug, info};

use super::{EditMode, Mode, ReaderMode, Transition, finish_frame, painted, priority_badge};
use crate::model::todo::TodoStep;
use crate::ops::todo_ops::{self, Direction};
use crate::tui::accumulator::Accumulator;
use crate::tui::help_line::HelpLine;
use crate::tui::keys::{Key, KeyCode};
use crate::tui::list_box::PagedListBox;
use crate::tui::prompt;
use crate::tui::session::Session;
use crate::tui::text_block::CollapsibleTextBlock;
use crate::tui::ui::Ui;

const HELP: &str = "[+] Add step [-] Remove step [T] Edit step [E] Edit item [Space] Mark step [A] Active step [O] Reader [Q] Quit";

/// One item with its steps
pub struct ViewMode {
    item_id: u32,
    steps: PagedListBox<TodoStep>,
    help: HelpLine,
    accumulator: Accumulator,
}

impl ViewMode {
    pub fn new(session: &Session, item_id: u32) -> Self {
        let theme = session.theme.clone();
        let steps = PagedListBox::new(
            |step: &TodoStep| format!(" [{}] {}", step.state().marker(), step.text),
            move |step: &TodoStep, text, selected| {
                let style = match (selected, step.active(), step.completed()) {
                    (true, _, true) => theme.step_completed_selected,
                    (true, true, _) => theme.step_active_selected,
                    (true, _, _) => theme.step_selected,
                    (false, _, true) => theme.step_completed,
                    (false, true, _) => theme.step_active,
                    _ => theme.step,
                };
                style.paint(text)
            },
        )
        .with_ordering(|a, b| a.order.cmp(&b.order))
        .hide_page_number_if_single_page(true);

        let mut mode = ViewMode {
            item_id,
            steps,
            help: HelpLine::new(HELP),
            accumulator: Accumulator::default(),
        };
        mode.refresh(session);
        mode
    }

    pub fn item_id(&self) -> u32 {
        self.item_id
    }

    pub fn refresh(&mut self, session: &Session) {
        let steps = session
            .list
            .get(self.item_id)
            .map(|item| item.steps.clone())
            .unwrap_or_default();
        self.steps.update(steps);
    }

    fn selected_order(&self) -> Option<u32> {
        self.steps.selected().map(|step| step.order)
    }

    fn select_order(&mut self, order: u32) {
        if let Some(index) = self.steps.items().iter().position(|s| s.order == order) {
            self.steps.select_index(index);
        }
    }

    pub fn render(&mut self, session: &Session, width: usize, height: usize) -> Vec<String> {
        let theme = &session.theme;
        let mut rows = self.help.render(width, theme.help_line);
        let Some(item) = session.list.get(self.item_id) else {
            return finish_frame(rows, width, height, session.status.as_deref());
        };

        rows.extend(painted(
            &format!("== {} ==", item.title),
            width,
            theme.todo_item_header,
        ));
        rows.push(format!("   {}", priority_badge(item.priority)));

        let mut description_height = height.saturating_sub(1);
        if !item.steps.is_empty() {
            description_height /= 3;
        }
        if description_height > 0 {
            rows.extend(CollapsibleTextBlock::new(item.description.as_str()).render(width, description_height));
        }

        rows.push(String::new());
        rows.extend(painted("== Steps ==", width, theme.todo_item_header));

        let left = height.saturating_sub(rows.len() + 1);
        if left > 0 {
            rows.extend(self.steps.render(width, left));
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
            (KeyCode::Backspace, _) => Transition::Pop,
            (_, Some('e')) => Transition::Push(Mode::Edit(EditMode::new(session, self.item_id))),
            (KeyCode::Char('+'), _) => {
                self.add_step(session, ui)?;
                Transition::Stay
            }
            (KeyCode::Char('-'), _) => {
                self.delete_step(session, ui)?;
                Transition::Stay
            }
            (_, Some('t')) => {
                self.edit_step(session, ui)?;
                Transition::Stay
            }
            (_, Some('v')) => {
                self.edit_step_externally(session, ui)?;
                Transition::Stay
            }
            (KeyCode::Char(' '), _) => {
                if let Some(order) = self.selected_order() {
                    if todo_ops::toggle_completed(&mut session.list, self.item_id, order).is_ok() {
                        session.touch();
                        self.refresh(session);
                    }
                }
                Transition::Stay
            }
            (_, Some('a')) => {
                if let Some(order) = self.selected_order() {
                    if let Ok(true) = todo_ops::toggle_active(&mut session.list, self.item_id, order) {
                        session.touch();
                        self.refresh(session);
                    }
                }
                Transition::Stay
            }
            (_, Some('o')) if key.shift => match self.steps.selected() {
                Some(step) => Transition::Push(Mode::Reader(ReaderMode::new(step.text.clone()))),
                None => Transition::Stay,
            },
            (_, Some('o')) => {
                let description = session
                    .list
                    .get(self.item_id)
                    .map(|item| item.description.clone())
                    .unwrap_or_default();
                Transition::Push(Mode::Reader(ReaderMode::new(description)))
            }
            (_, Some('n')) => {
                let steps = &mut self.steps;
                self.accumulator.execute(|| {
                    steps.next_page();
                });
                Transition::Stay
            }
            (_, Some('p')) => {
                let steps = &mut self.steps;
                self.accumulator.execute(|| {
                    steps.previous_page();
                });
                Transition::Stay
            }
            (_, Some('g')) => {
                if key.shift {
                    self.steps.select_last();
                } else {
                    self.steps.select_first();
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
                let steps = &mut self.steps;
                self.accumulator.execute(|| {
                    steps.select_next();
                });
                Transition::Stay
            }
            (KeyCode::Up, _) | (_, Some('k')) => {
                let steps = &mut self.steps;
                self.accumulator.execute(|| {
                    steps.select_previous();
                });
                Transition::Stay
            }
            _ => Transition::Stay,
        };
        self.accumulator.reset();
        Ok(transition)
    }

    fn move_selected(&mut self, session: &mut Session, direction: Direction) {
        let Some(mut order) = self.selected_order() else {
            return;
        };
        let mut moved = false;
        for _ in 0..self.accumulator.take() {
            match todo_ops::move_step(&mut session.list, self.item_id, order, direction) {
                Ok(Some(new_order)) => {
                    order = new_order;
                    moved = true;
                }
                _ => break,
            }
        }
        if moved {
            debug!(item = self.item_id, order, "moved step");
            session.touch();
            self.refresh(session);
            self.select_order(order);
        }
    }

    fn add_step(&mut self, session: &mut Session, ui: &mut Ui) -> io::Result<()> {
        let base = ui.screen.rows().to_vec();
        let Some(text) = prompt::line(ui, &base, "Step text:")? else {
            return Ok(());
        };
        match todo_ops::add_step(&mut session.list, self.item_id, &text) {
            Ok(order) => {
                info!(item = self.item_id, order, "added step");
                session.save();
                self.refresh(session);
                self.select_order(order);
            }
            Err(e) => session.status = Some(e.to_string()),
        }
        Ok(())
    }

    fn delete_step(&mut self, session: &mut Session, ui: &mut Ui) -> io::Result<()> {
        let Some(step) = self.steps.selected().cloned() else {
            return Ok(());
        };
        let base = ui.screen.rows().to_vec();
        let top = ui.height().saturating_sub(3);
        let question = format!("Are you sure you want to delete this step? {}", step.text);
        let answer = prompt::confirm(ui, &base, top, &question, session.theme.step_selected)?;
        if answer == Some(true) {
            match todo_ops::remove_step(&mut session.list, self.item_id, step.order) {
                Ok(_) => {
                    info!(item = self.item_id, order = step.order, "removed step");
                    session.save();
                    self.refresh(session);
                }
                Err(e) => session.status = Some(e.to_string()),
            }
        }
        Ok(())
    }

    fn edit_step(&mut self, session: &mut Session, ui: &mut Ui) -> io::Result<()> {
        let Some(step) = self.steps.selected().cloned() else {
            return Ok(());
        };
        let base = ui.screen.rows().to_vec();
        let label = format!("New text (was: {}):", step.text);
        if let Some(text) = prompt::line(ui, &base, &label)? {
            self.set_step_text(session, step.order, &text);
        }
        Ok(())
    }

    fn edit_step_externally(&mut self, session: &mut Session, ui: &mut Ui) -> io::Result<()> {
        let Some(step) = self.steps.selected().cloned() else {
            return Ok(());
        };
        if let Some(text) = session.edit_external(ui, &step.text)? {
            self.set_step_text(session, step.order, &text);
        }
        Ok(())
    }

    fn set_step_text(&mut self, session: &mut Session, order: u32, text: &str) {
        match todo_ops::set_step_text(&mut session.list, self.item_id, order, text) {
            Ok(()) => {
                session.save();
                self.refresh(session);
            }
            Err(e) => session.status = Some(e.to_string()),
        }
    }
}
