use super::Transition;
use crate::tui::keys::{Key, KeyCode};
use crate::tui::theme::{AnsiColor, Style};
use crate::tui::wrap::wrap;
use crate::util::text::{pad_to_width, truncate_chars};

const MIN_WIDTH: usize = 30;
/// Border plus one column of margin on each side
const FRAME_WIDTH: usize = 4;

const BOX_STYLE: Style = Style::new(AnsiColor::White, AnsiColor::Black);

/// A message in a box over the mode below, dismissed with Enter
pub struct MessageMode {
    message: String,
}

impl MessageMode {
    pub fn new(message: impl Into<String>) -> Self {
        MessageMode {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The box lines, unstyled.
    fn lines(&self, width: usize, height: usize) -> Vec<String> {
        let len = self.message.chars().count();
        let box_width = ((width / 4) * 3).min(len + FRAME_WIDTH).max(MIN_WIDTH);
        let inner = box_width - FRAME_WIDTH;

        let mut lines = vec![format!("┌{}┐", "─".repeat(inner + 2))];
        for line in wrap(&self.message, inner)
            .lines
            .into_iter()
            .take(height.saturating_sub(4))
        {
            lines.push(format!("│ {} │", pad_to_width(&line, inner)));
        }
        lines.push(format!("├────┐{} │", " ".repeat(inner - 4)));
        lines.push(format!("│ OK │{} │", " ".repeat(inner - 4)));
        lines.push(format!("└────┴{}┘", "─".repeat(inner - 3)));
        lines
    }

    /// Draw the box centered over `rows`. Covered rows are replaced whole.
    pub fn overlay(&self, mut rows: Vec<String>, width: usize, height: usize) -> Vec<String> {
        let lines = self.lines(width, height);
        let box_width = lines[0].chars().count();
        let x = width.saturating_sub(box_width) / 2;
        let y = height.saturating_sub(lines.len()) / 2;

        if rows.len() < height {
            rows.resize(height, String::new());
        }
        for (i, line) in lines.iter().enumerate() {
            let Some(row) = rows.get_mut(y + i) else {
                break;
            };
            let visible = truncate_chars(line, width.saturating_sub(x));
            *row = pad_to_width(
                &format!("{}{}", " ".repeat(x), BOX_STYLE.paint(&visible)),
                width,
            );
        }
        rows
    }

    pub fn handle_key(&mut self, key: Key) -> Transition {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Backspace => Transition::Pop,
            _ => Transition::Stay,
        }
    }
}
