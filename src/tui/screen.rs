use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;

use crate::util::text::pad_to_width;

/// A fixed-size character grid. Remembers what each row shows so a redraw
/// only writes rows that changed.
pub struct Screen {
    out: Box<dyn Write>,
    width: u16,
    height: u16,
    rows: Vec<String>,
}

impl Screen {
    pub fn new(out: Box<dyn Write>, width: u16, height: u16) -> Self {
        Screen {
            out,
            width,
            height,
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// The rows as last drawn.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        self.width = width;
        self.height = height;
        self.clear()
    }

    /// Wipe the terminal and forget the cached rows.
    pub fn clear(&mut self) -> io::Result<()> {
        self.rows.clear();
        queue!(self.out, Clear(ClearType::All))?;
        self.out.flush()
    }

    /// Show `frame`, one entry per row. Missing rows are blanked; rows are
    /// padded to the screen width.
    pub fn draw(&mut self, frame: &[String]) -> io::Result<()> {
        let width = self.width();
        let mut next = Vec::with_capacity(self.height());
        for y in 0..self.height() {
            let row = frame.get(y).map(String::as_str).unwrap_or("");
            let row = pad_to_width(row, width);
            if self.rows.get(y) != Some(&row) {
                queue!(self.out, MoveTo(0, y as u16), Print(&row))?;
            }
            next.push(row);
        }
        self.rows = next;
        self.out.flush()
    }

    /// Put a visible cursor at (`x`, `y`), or hide it.
    pub fn set_cursor(&mut self, at: Option<(usize, usize)>) -> io::Result<()> {
        match at {
            Some((x, y)) => queue!(self.out, MoveTo(x as u16, y as u16), Show)?,
            None => queue!(self.out, Hide)?,
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    /// A writer whose bytes the test can inspect.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn take(&self) -> String {
            String::from_utf8(std::mem::take(&mut *self.0.lock().unwrap())).unwrap()
        }
    }

    #[test]
    fn rows_are_padded_and_blanked() {
        let mut screen = Screen::new(Box::new(io::sink()), 4, 3);
        screen.draw(&["ab".to_string()]).unwrap();
        assert_eq!(screen.rows(), ["ab  ", "    ", "    "]);
    }

    #[test]
    fn unchanged_rows_are_not_rewritten() {
        let capture = Capture::default();
        let mut screen = Screen::new(Box::new(capture.clone()), 5, 2);
        screen
            .draw(&["one".to_string(), "two".to_string()])
            .unwrap();
        let first = capture.take();
        assert!(first.contains("one") && first.contains("two"));

        screen
            .draw(&["one".to_string(), "TWO".to_string()])
            .unwrap();
        let second = capture.take();
        assert!(!second.contains("one"));
        assert!(second.contains("TWO"));
    }

    #[test]
    fn clear_forces_full_redraw() {
        let capture = Capture::default();
        let mut screen = Screen::new(Box::new(capture.clone()), 3, 1);
        screen.draw(&["x".to_string()]).unwrap();
        screen.clear().unwrap();
        capture.take();
        screen.draw(&["x".to_string()]).unwrap();
        assert!(capture.take().contains('x'));
    }
}
