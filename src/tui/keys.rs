use std::collections::VecDeque;
use std::io;

use crossterm::event::{self, Event, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Esc,
    Tab,
    Up,
    Down,
    Left,
    Right,
    F(u8),
    /// The terminal changed size (columns, rows)
    Resize(u16, u16),
    Other,
}

/// One key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub code: KeyCode,
    pub shift: bool,
    pub ctrl: bool,
}

impl Key {
    pub fn plain(code: KeyCode) -> Self {
        Key {
            code,
            shift: false,
            ctrl: false,
        }
    }

    /// A typed character. Uppercase letters count as shifted.
    pub fn char(c: char) -> Self {
        Key {
            code: KeyCode::Char(c),
            shift: c.is_uppercase(),
            ctrl: false,
        }
    }

    pub fn shifted(code: KeyCode) -> Self {
        Key {
            code,
            shift: true,
            ctrl: false,
        }
    }

    /// The lowercase letter for a plain (non-ctrl) letter key.
    pub fn letter(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.ctrl && c.is_alphabetic() => c.to_lowercase().next(),
            _ => None,
        }
    }

    pub fn digit(&self) -> Option<u32> {
        match self.code {
            KeyCode::Char(c) if !self.ctrl => c.to_digit(10),
            _ => None,
        }
    }

    pub fn is_letter(&self, letter: char) -> bool {
        self.letter() == Some(letter)
    }
}

/// Blocking source of key presses
pub trait KeySource {
    fn next_key(&mut self) -> io::Result<Key>;
}

/// Keys from the real terminal. Releases and repeats are skipped.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> io::Result<Key> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(convert(key)),
                Event::Resize(cols, rows) => return Ok(Key::plain(KeyCode::Resize(cols, rows))),
                _ => {}
            }
        }
    }
}

fn convert(key: event::KeyEvent) -> Key {
    let code = match key.code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Esc => KeyCode::Esc,
        event::KeyCode::Tab => KeyCode::Tab,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::F(n) => KeyCode::F(n),
        _ => KeyCode::Other,
    };
    let uppercase = matches!(code, KeyCode::Char(c) if c.is_uppercase());
    Key {
        code,
        shift: key.modifiers.contains(KeyModifiers::SHIFT) || uppercase,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
    }
}

/// Pre-recorded keys. Running out is reported as `UnexpectedEof`.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<Key>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        ScriptedKeys {
            keys: keys.into_iter().collect(),
        }
    }

    /// Every char becomes one key; `\n` is Enter.
    pub fn typed(text: &str) -> Self {
        Self::new(text.chars().map(|c| match c {
            '\n' => Key::plain(KeyCode::Enter),
            c => Key::char(c),
        }))
    }

    pub fn then(mut self, key: Key) -> Self {
        self.keys.push_back(key);
        self
    }

    pub fn then_typed(mut self, text: &str) -> Self {
        self.keys.extend(Self::typed(text).keys);
        self
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> io::Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted keys"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn uppercase_is_shifted_letter() {
        let key = Key::char('J');
        assert!(key.shift);
        assert_eq!(key.letter(), Some('j'));
        assert!(key.is_letter('j'));
        assert_eq!(Key::char('7').digit(), Some(7));
        assert_eq!(Key::char('7').letter(), None);
    }

    #[test]
    fn crossterm_events_convert() {
        let key = convert(event::KeyEvent::new(
            event::KeyCode::Char('k'),
            KeyModifiers::SHIFT,
        ));
        assert_eq!(key.letter(), Some('k'));
        assert!(key.shift);
        let key = convert(event::KeyEvent::new(event::KeyCode::F(5), KeyModifiers::NONE));
        assert_eq!(key, Key::plain(KeyCode::F(5)));
    }

    #[test]
    fn scripted_keys_run_out() {
        let mut keys = ScriptedKeys::typed("a\n");
        assert_eq!(keys.next_key().unwrap(), Key::char('a'));
        assert_eq!(keys.next_key().unwrap(), Key::plain(KeyCode::Enter));
        assert_eq!(
            keys.next_key().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }
}
