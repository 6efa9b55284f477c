use std::io;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

use super::keys::{Key, KeyCode, KeySource};
use super::screen::Screen;

/// The terminal surface and its key source, handed to whatever is
/// currently reading keys.
pub struct Ui {
    pub screen: Screen,
    keys: Box<dyn KeySource>,
    attached: bool,
}

impl Ui {
    pub fn new(screen: Screen, keys: Box<dyn KeySource>) -> Self {
        Ui {
            screen,
            keys,
            attached: false,
        }
    }

    /// Mark this UI as driving the real terminal, so [`suspend`](Self::suspend)
    /// leaves raw mode and the alternate screen.
    pub fn attached(mut self) -> Self {
        self.attached = true;
        self
    }

    pub fn width(&self) -> usize {
        self.screen.width()
    }

    pub fn height(&self) -> usize {
        self.screen.height()
    }

    /// Next key press. Resizes are applied to the screen before they are
    /// passed on.
    pub fn next_key(&mut self) -> io::Result<Key> {
        let key = self.keys.next_key()?;
        if let KeyCode::Resize(cols, rows) = key.code {
            self.screen.resize(cols, rows)?;
        }
        Ok(key)
    }

    /// Hand the terminal to `f` (an external program), then take it back
    /// and force a full redraw.
    pub fn suspend<R>(&mut self, f: impl FnOnce() -> R) -> io::Result<R> {
        if self.attached {
            disable_raw_mode()?;
            execute!(io::stdout(), Show, LeaveAlternateScreen)?;
        }
        let result = f();
        if self.attached {
            execute!(io::stdout(), EnterAlternateScreen, Hide)?;
            enable_raw_mode()?;
        }
        self.screen.clear()?;
        Ok(result)
    }
}
