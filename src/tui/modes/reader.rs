use super::{Transition, finish_frame};
use crate::tui::accumulator::Accumulator;
use crate::tui::keys::{Key, KeyCode};
use crate::tui::session::Session;
use crate::tui::wrap::wrap;
use crate::util::text::pad_to_width;

/// Full-screen scrolling view of a piece of text
pub struct ReaderMode {
    text: String,
    scroll: usize,
    accumulator: Accumulator,
    /// Width the text was last wrapped for
    width: usize,
    lines: Vec<String>,
    /// Text rows of the last frame, one page for n/p
    page_height: usize,
}

impl ReaderMode {
    pub fn new(text: impl Into<String>) -> Self {
        ReaderMode {
            text: text.into(),
            scroll: 0,
            accumulator: Accumulator::default(),
            width: 0,
            lines: Vec::new(),
            page_height: 1,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn last_line(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn rewrap(&mut self, width: usize) {
        if width == self.width {
            return;
        }
        self.width = width;
        self.lines = if self.text.trim().is_empty() {
            Vec::new()
        } else {
            wrap(&self.text, width).lines
        };
        self.scroll = self.scroll.min(self.last_line());
    }

    pub fn render(&mut self, session: &Session, width: usize, height: usize) -> Vec<String> {
        let width = width.max(1);
        self.rewrap(width);
        self.page_height = height.saturating_sub(2).max(1);

        let theme = &session.theme;
        let position = if self.lines.is_empty() {
            "(Line 0/0)".to_string()
        } else {
            format!("(Line {}/{})", self.scroll + 1, self.lines.len())
        };
        let header = format!(
            "{} {} {} {}",
            theme.help_mode_header.paint("== Reader =="),
            position,
            theme.help_mode_key.paint("[Q]"),
            theme.help_mode_text.paint("Exit"),
        );

        let mut rows = vec![pad_to_width(&header, width)];
        rows.extend(
            self.lines
                .iter()
                .skip(self.scroll)
                .take(self.page_height)
                .cloned(),
        );
        finish_frame(rows, width, height, session.status.as_deref())
    }

    pub fn handle_key(&mut self, key: Key) -> Transition {
        if let Some(digit) = key.digit() {
            self.accumulator.accumulate_digit(digit);
            return Transition::Stay;
        }
        let last = self.last_line();
        let step = match (key.code, key.letter()) {
            (KeyCode::Backspace, _) => return Transition::Pop,
            (KeyCode::Down, _) | (_, Some('j')) => Some((1, true)),
            (KeyCode::Up, _) | (_, Some('k')) => Some((1, false)),
            (_, Some('n')) => Some((self.page_height, true)),
            (_, Some('p')) => Some((self.page_height, false)),
            (_, Some('g')) => {
                self.scroll = if key.shift { last } else { 0 };
                None
            }
            _ => None,
        };

        if let Some((amount, down)) = step {
            let times = self.accumulator.take() as usize;
            let amount = amount.saturating_mul(times);
            self.scroll = if down {
                self.scroll.saturating_add(amount).min(last)
            } else {
                self.scroll.saturating_sub(amount)
            };
        }
        self.accumulator.reset();
        Transition::Stay
    }
}
