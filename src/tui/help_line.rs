use super::keys::Key;
use super::theme::Style;
use super::wrap::wrap;
use crate::util::text::{pad_to_width, truncate_chars};

const MORE: &str = " [Z] More";

/// One row of key hints at the top of a mode. Too long hints are cut off
/// with `[Z] More`; `z` shows all of them over several rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpLine {
    text: String,
    expanded: bool,
}

impl HelpLine {
    pub fn new(text: impl Into<String>) -> Self {
        HelpLine {
            text: text.into(),
            expanded: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Toggle on `z`. Returns whether the key was used.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if key.is_letter('z') && !key.shift {
            self.expanded = !self.expanded;
            true
        } else {
            false
        }
    }

    pub fn render(&self, width: usize, style: Style) -> Vec<String> {
        let width = width.max(1);
        let len = self.text.chars().count();
        if len <= width {
            return vec![pad_to_width(&style.paint(&self.text), width)];
        }
        if self.expanded {
            return wrap(&self.text, width)
                .lines
                .iter()
                .map(|line| style.paint(line))
                .collect();
        }

        let more_len = MORE.chars().count();
        let line = if width > more_len {
            let head = truncate_chars(&self.text, width - more_len);
            format!("{}{}", head.trim_end(), MORE)
        } else {
            truncate_chars(MORE.trim_start(), width)
        };
        vec![pad_to_width(&style.paint(&line), width)]
    }

    pub fn height(&self, width: usize) -> usize {
        let width = width.max(1);
        if self.expanded && self.text.chars().count() > width {
            wrap(&self.text, width).line_count
        } else {
            1
        }
    }
}
