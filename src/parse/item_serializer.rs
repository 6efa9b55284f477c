use crate::model::todo::TodoItem;
use crate::util::text::normalize_newlines;

/// Header line that separates the description from the steps
pub const STEPS_HEADER: &str = "== Steps ==";

/// Prefix that opens a step line
pub const STEP_OPEN: &str = "- [";

/// Escaped form of [`STEP_OPEN`] at the start of a continuation line
pub const ESCAPED_STEP_OPEN: &str = "\\- [";

/// Serialize an item into its editable text form:
///
/// ```text
/// == title ==
/// description
/// == Steps ==
/// - [x] completed step
/// - [o] active step
/// - [ ] open step
/// ```
///
/// Continuation lines of a step that start with `- [` are escaped as `\- [`.
pub fn serialize_item(item: &TodoItem) -> String {
    let mut out = String::new();

    out.push_str(&format!("== {} ==\n", item.title));

    let description = normalize_newlines(&item.description);
    out.push_str(&description);
    if !description.ends_with('\n') {
        out.push('\n');
    }

    out.push_str(STEPS_HEADER);
    out.push('\n');

    for step in item.sorted_steps() {
        let text = normalize_newlines(&step.text);
        let mut lines = text.split('\n');
        let first = lines.next().unwrap_or_default();
        out.push_str(&format!("- [{}] {}\n", step.state().marker(), first));
        for line in lines {
            let body = line.trim_start();
            if body.starts_with(STEP_OPEN) {
                out.push_str(&line[..line.len() - body.len()]);
                out.push('\\');
                out.push_str(body);
            } else {
                out.push_str(line);
            }
            out.push('\n');
        }
    }

    out
}
