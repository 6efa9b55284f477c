use std::fmt;

use super::wrap::{collapse_lines, wrap};
use crate::util::text::{normalize_newlines, trim_ending_newlines};

pub type LineFormatter = Box<dyn Fn(&str) -> String>;

/// A block of free text rendered into a fixed region, cut short with an
/// ellipsis when it does not fit.
pub struct CollapsibleTextBlock {
    text: String,
    line_formatter: Option<LineFormatter>,
    collapsed: Option<(usize, usize)>,
}

impl fmt::Debug for CollapsibleTextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollapsibleTextBlock")
            .field("text", &self.text)
            .field("collapsed", &self.collapsed)
            .finish()
    }
}

impl CollapsibleTextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        CollapsibleTextBlock {
            text: text.into(),
            line_formatter: None,
            collapsed: None,
        }
    }

    /// Transform every source line before it is wrapped.
    pub fn with_line_formatter(mut self, f: impl Fn(&str) -> String + 'static) -> Self {
        self.line_formatter = Some(Box::new(f));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Pin the block to `width` x `height` until [`expand`](Self::expand).
    pub fn collapse(&mut self, width: usize, height: usize) {
        self.collapsed = Some((width, height));
    }

    pub fn expand(&mut self) {
        self.collapsed = None;
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed.is_some()
    }

    /// All wrapped lines for `width`, before any height limit.
    pub fn wrapped_lines(&self, width: usize) -> Vec<String> {
        let text = normalize_newlines(trim_ending_newlines(&self.text));
        text.split('\n')
            .flat_map(|line| {
                let line = match &self.line_formatter {
                    Some(f) => f(line),
                    None => line.to_string(),
                };
                wrap(&line, width).lines
            })
            .collect()
    }

    /// Render into the available region. A collapsed block ignores the
    /// arguments and uses its pinned size.
    pub fn render(&self, available_width: usize, available_height: usize) -> Vec<String> {
        let (width, height) = self
            .collapsed
            .unwrap_or((available_width, available_height));
        let width = width.max(1);
        collapse_lines(&self.wrapped_lines(width), height, width)
    }
}
