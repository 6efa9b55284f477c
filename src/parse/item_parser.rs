use crate::model::todo::{StepState, TodoItem, TodoStep};

use super::item_serializer::{ESCAPED_STEP_OPEN, STEPS_HEADER, STEP_OPEN};

/// Why an item text could not be parsed. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("line {line}: expected a title like '== Title ==' but found '{text}'")]
    InvalidTitle { line: usize, text: String },
    #[error("line {line}: the title in '{text}' is empty")]
    EmptyTitle { line: usize, text: String },
    #[error("line {line}: expected a title like '== Title ==' but the text ended")]
    MissingTitle { line: usize },
    #[error("line {line}: step state is missing its closing bracket in '{text}'")]
    UnclosedState { line: usize, text: String },
    #[error("line {line}: unknown step state '{state}' in '{text}', expected ' ', 'o' or 'x'")]
    UnknownState {
        line: usize,
        state: String,
        text: String,
    },
    #[error("line {line}: step text is empty in '{text}'")]
    EmptyStep { line: usize, text: String },
    #[error("line {line}: steps have to start with a state like '- [ ]', found '{text}'")]
    StepWithoutState { line: usize, text: String },
}

impl SyntaxError {
    /// The 1-based line the error points at
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::InvalidTitle { line, .. }
            | SyntaxError::EmptyTitle { line, .. }
            | SyntaxError::MissingTitle { line }
            | SyntaxError::UnclosedState { line, .. }
            | SyntaxError::UnknownState { line, .. }
            | SyntaxError::EmptyStep { line, .. }
            | SyntaxError::StepWithoutState { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Title,
    Description,
    Steps,
}

/// A step whose continuation lines may still follow
struct OpenStep {
    state: StepState,
    text: String,
}

struct ItemParser {
    section: Section,
    item: TodoItem,
    description: String,
    open: Option<OpenStep>,
}

/// Parse the text produced by [`serialize_item`](super::serialize_item)
/// (or edited by hand) back into an item. Id, order and priority are left
/// at their defaults for the caller to fill in.
pub fn deserialize_item(text: &str) -> Result<TodoItem, SyntaxError> {
    let mut parser = ItemParser {
        section: Section::Title,
        item: TodoItem::default(),
        description: String::new(),
        open: None,
    };

    let mut line_count = 0;
    for (index, line) in text.lines().enumerate() {
        line_count = index + 1;
        parser.line(line, index + 1)?;
    }
    parser.finish(line_count + 1)
}

impl ItemParser {
    fn line(&mut self, line: &str, number: usize) -> Result<(), SyntaxError> {
        match self.section {
            Section::Title => {
                if line.trim().is_empty() {
                    return Ok(());
                }
                self.item.title = parse_title(line, number)?;
                self.section = Section::Description;
            }
            Section::Description => {
                if line.trim() == STEPS_HEADER {
                    self.item.description = std::mem::take(&mut self.description);
                    self.section = Section::Steps;
                } else {
                    self.description.push_str(line);
                    self.description.push('\n');
                }
            }
            Section::Steps => self.step_line(line, number)?,
        }
        Ok(())
    }

    fn step_line(&mut self, line: &str, number: usize) -> Result<(), SyntaxError> {
        let body = line.trim_start();

        if let Some(rest) = body.strip_prefix(STEP_OPEN) {
            let close = rest.find(']').ok_or_else(|| SyntaxError::UnclosedState {
                line: number,
                text: line.to_string(),
            })?;
            let marker = &rest[..close];
            let state = StepState::from_marker(marker).ok_or_else(|| SyntaxError::UnknownState {
                line: number,
                state: marker.trim().to_string(),
                text: line.to_string(),
            })?;
            let first = rest[close + 1..].trim_start();
            if first.trim().is_empty() {
                return Err(SyntaxError::EmptyStep {
                    line: number,
                    text: line.to_string(),
                });
            }

            self.flush_step();
            let mut text = first.to_string();
            text.push('\n');
            self.open = Some(OpenStep { state, text });
            return Ok(());
        }

        match &mut self.open {
            Some(step) => {
                step.text.push_str(&unescape(line));
                step.text.push('\n');
                Ok(())
            }
            // Blank lines between the header and the first step are harmless
            None if body.is_empty() => Ok(()),
            None => Err(SyntaxError::StepWithoutState {
                line: number,
                text: line.to_string(),
            }),
        }
    }

    fn flush_step(&mut self) {
        if let Some(step) = self.open.take() {
            let order = self.item.steps.len() as u32 + 1;
            self.item
                .steps
                .push(TodoStep::new(order, step.text.trim()).with_state(step.state));
        }
    }

    fn finish(mut self, end_line: usize) -> Result<TodoItem, SyntaxError> {
        match self.section {
            Section::Title => return Err(SyntaxError::MissingTitle { line: end_line }),
            Section::Description => {
                self.item.description = std::mem::take(&mut self.description);
            }
            Section::Steps => self.flush_step(),
        }
        Ok(self.item)
    }
}

/// `== Title ==` → `Title`
fn parse_title(line: &str, number: usize) -> Result<String, SyntaxError> {
    let trimmed = line.trim();
    let well_formed = trimmed.chars().count() >= 5
        && trimmed.starts_with("==")
        && trimmed.ends_with("==");
    if !well_formed {
        return Err(SyntaxError::InvalidTitle {
            line: number,
            text: line.to_string(),
        });
    }

    let title = trimmed[2..trimmed.len() - 2].trim();
    if title.is_empty() {
        return Err(SyntaxError::EmptyTitle {
            line: number,
            text: line.to_string(),
        });
    }
    Ok(title.to_string())
}

/// `\- [` at the start of a continuation line (after indentation) → `- [`
fn unescape(line: &str) -> String {
    let body = line.trim_start();
    if body.starts_with(ESCAPED_STEP_OPEN) {
        let indent = &line[..line.len() - body.len()];
        format!("{}{}", indent, &body[1..])
    } else {
        line.to_string()
    }
}
