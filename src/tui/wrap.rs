use crate::util::text::{pad_to_width, truncate_chars};

/// Columns a tab expands to, capped by the room left on the line.
pub const TAB_WIDTH: usize = 4;

/// Marker appended to the last visible line of collapsed content.
pub const ELLIPSIS: &str = " [...]";

/// Output of [`wrap`]: fixed-width screen lines for one text blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    pub line_count: usize,
    pub lines: Vec<String>,
}

/// Output of [`measure`]: the footprint a blob takes when wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measured {
    pub max_width: usize,
    pub max_height: usize,
}

/// Chars that take part in layout. Carriage returns never do.
fn layout_chars(text: &str) -> std::iter::Peekable<impl Iterator<Item = char> + '_> {
    text.chars().filter(|&c| c != '\r').peekable()
}

fn padded(buf: &str, len: usize, width: usize) -> String {
    let mut line = String::with_capacity(buf.len() + width.saturating_sub(len));
    line.push_str(buf);
    line.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    line
}

/// Break `text` into lines of exactly `width` columns.
///
/// `\n` is a hard break, `\t` expands to at most [`TAB_WIDTH`] spaces and
/// `\r` is dropped. A line is flushed as soon as it holds `width` chars. A
/// trailing hard break that would leave a dangling blank line is dropped
/// unless that line is the only one. A width of 0 is treated as 1.
pub fn wrap(text: &str, width: usize) -> Wrapped {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut buf = String::new();
    let mut len = 0usize;
    let mut dangling = false;

    let mut chars = layout_chars(text);
    while let Some(c) = chars.next() {
        dangling = false;
        match c {
            '\n' => {
                dangling = len == 0 && chars.peek().is_none();
                lines.push(padded(&buf, len, width));
                buf.clear();
                len = 0;
                continue;
            }
            '\t' => {
                let room = width - len;
                let spaces = room.min(TAB_WIDTH);
                buf.extend(std::iter::repeat_n(' ', spaces));
                len += spaces;
            }
            c => {
                buf.push(c);
                len += 1;
            }
        }
        if len >= width {
            lines.push(std::mem::take(&mut buf));
            len = 0;
        }
    }

    if len > 0 {
        lines.push(padded(&buf, len, width));
    }
    if dangling && lines.len() > 1 {
        lines.pop();
    }
    if lines.is_empty() {
        lines.push(padded("", 0, width));
    }

    Wrapped {
        line_count: lines.len(),
        lines,
    }
}

/// Compute how much room `text` needs when wrapped to `width`, without
/// building the lines. Always agrees with `wrap(text, width).line_count`.
pub fn measure(text: &str, width: usize) -> Measured {
    let width = width.max(1);
    let mut height = 0usize;
    let mut max_width = 0usize;
    let mut cols = 0usize;

    let mut chars = layout_chars(text);
    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                // A final hard break never opens a new line
                if chars.peek().is_some() {
                    height += 1;
                    max_width = width;
                    cols = 0;
                }
                continue;
            }
            '\t' => cols += (width - cols).min(TAB_WIDTH),
            _ => cols += 1,
        }
        if cols >= width {
            height += 1;
            max_width = width;
            cols = 0;
        }
    }

    if cols > 0 {
        max_width = if height > 0 { width } else { cols };
        height += 1;
    }

    Measured {
        max_width,
        max_height: height.max(1),
    }
}

/// Keep at most `height` (minimum 1) of `lines`. When lines are cut, the
/// last kept line ends in [`ELLIPSIS`] and is re-padded to `width`.
pub fn collapse_lines(lines: &[String], height: usize, width: usize) -> Vec<String> {
    let keep = height.max(1);
    if lines.len() <= keep {
        return lines.to_vec();
    }
    let mut kept = lines[..keep].to_vec();
    if let Some(last) = kept.last_mut() {
        *last = with_ellipsis(last, width);
    }
    kept
}

fn with_ellipsis(line: &str, width: usize) -> String {
    let marker_len = ELLIPSIS.chars().count();
    if width <= marker_len {
        return pad_to_width(&truncate_chars(ELLIPSIS.trim_start(), width), width);
    }
    let head = truncate_chars(line, width - marker_len);
    pad_to_width(&format!("{}{}", head.trim_end(), ELLIPSIS), width)
}
