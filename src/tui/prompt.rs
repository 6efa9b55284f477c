use std::io;

use super::accumulator::Accumulator;
use super::keys::KeyCode;
use super::list_box::PagedListBox;
use super::theme::Style;
use super::ui::Ui;
use crate::util::text::truncate_chars;

const INPUT_MARK: &str = ">";

/// The rows of `base` above `top`, blank-filled up to `top`.
fn base_rows(base: &[String], top: usize) -> Vec<String> {
    let mut rows: Vec<String> = base.iter().take(top).cloned().collect();
    rows.resize(top, String::new());
    rows
}

/// Read one line of text on the bottom two rows, over `base`. Esc cancels;
/// blank input counts as no input.
pub fn line(ui: &mut Ui, base: &[String], label: &str) -> io::Result<Option<String>> {
    let mut input = String::new();
    loop {
        let (width, height) = (ui.width().max(1), ui.height());
        let top = height.saturating_sub(2);
        let mut frame = base_rows(base, top);
        frame.push(truncate_chars(label, width));

        // Keep the end of long input in view
        let shown = format!("{}{}", INPUT_MARK, input);
        let len = shown.chars().count();
        let visible: String = shown.chars().skip((len + 1).saturating_sub(width)).collect();
        let cursor_x = visible.chars().count();
        frame.push(visible);

        ui.screen.draw(&frame)?;
        ui.screen
            .set_cursor(Some((cursor_x, height.saturating_sub(1))))?;

        let key = ui.next_key()?;
        match key.code {
            KeyCode::Enter => break,
            KeyCode::Esc => {
                ui.screen.set_cursor(None)?;
                return Ok(None);
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) if !key.ctrl => input.push(c),
            _ => {}
        }
    }
    ui.screen.set_cursor(None)?;
    Ok((!input.trim().is_empty()).then_some(input))
}

/// Pick one of `options` from a list shown below row `top`. Enter accepts;
/// Esc, Backspace or `q` cancel.
pub fn select<T: Clone + 'static>(
    ui: &mut Ui,
    base: &[String],
    top: usize,
    label: &str,
    options: Vec<(String, T)>,
    selected_style: Style,
) -> io::Result<Option<T>> {
    let mut list = PagedListBox::new(
        |option: &(String, T)| format!(" {}", option.0),
        move |_, text, selected| {
            if selected {
                selected_style.paint(text)
            } else {
                text.to_string()
            }
        },
    )
    .hide_page_number_if_single_page(true);
    list.update(options);
    let mut accumulator = Accumulator::default();

    loop {
        let (width, height) = (ui.width().max(1), ui.height());
        let top = top.min(height.saturating_sub(2));
        let mut frame = base_rows(base, top);
        frame.push(truncate_chars(label, width));
        frame.extend(list.render(width, height.saturating_sub(top + 1)));
        ui.screen.draw(&frame)?;

        let key = ui.next_key()?;
        if let Some(digit) = key.digit() {
            accumulator.accumulate_digit(digit);
            continue;
        }
        match (key.code, key.letter()) {
            (KeyCode::Enter, _) => return Ok(list.selected().map(|option| option.1.clone())),
            (KeyCode::Esc | KeyCode::Backspace, _) | (_, Some('q')) => return Ok(None),
            (KeyCode::Up, _) | (_, Some('k')) => accumulator.execute(|| {
                list.select_previous();
            }),
            (KeyCode::Down, _) | (_, Some('j')) => accumulator.execute(|| {
                list.select_next();
            }),
            (_, Some('n')) => accumulator.execute(|| {
                list.next_page();
            }),
            (_, Some('p')) => accumulator.execute(|| {
                list.previous_page();
            }),
            (_, Some('g')) => {
                if key.shift {
                    list.select_last();
                } else {
                    list.select_first();
                }
                accumulator.reset();
            }
            _ => accumulator.reset(),
        }
    }
}

/// Yes/No question. `None` when the question was dismissed.
pub fn confirm(
    ui: &mut Ui,
    base: &[String],
    top: usize,
    question: &str,
    selected_style: Style,
) -> io::Result<Option<bool>> {
    let options = vec![("No".to_string(), false), ("Yes".to_string(), true)];
    select(ui, base, top, question, options, selected_style)
}
