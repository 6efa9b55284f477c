use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use super::theme::Theme;
use super::ui::Ui;
use crate::io::editor::{SystemEditor, TextEditor};
use crate::io::todo_io::{self, BackupClock};
use crate::model::todo::TodoList;

/// Everything the modes share: the collection, where it lives, and how to
/// draw it.
pub struct Session {
    pub list: TodoList,
    pub path: PathBuf,
    pub theme: Theme,
    /// The collection has changes that are not on disk yet
    pub dirty: bool,
    pub last_save: Option<DateTime<Local>>,
    /// One-shot message for the bottom row, cleared by the next key
    pub status: Option<String>,
    clock: BackupClock,
    editor: Box<dyn TextEditor>,
}

impl Session {
    pub fn new(list: TodoList, path: PathBuf, theme: Theme, backup_interval_minutes: u64) -> Self {
        Session {
            list,
            path,
            theme,
            dirty: false,
            last_save: None,
            status: None,
            clock: BackupClock::new(backup_interval_minutes, Local::now()),
            editor: Box::new(SystemEditor::default()),
        }
    }

    pub fn with_editor(mut self, editor: impl TextEditor + 'static) -> Self {
        self.editor = Box::new(editor);
        self
    }

    pub fn touch(&mut self) {
        self.dirty = true;
    }

    /// Write the collection. Failures end up in the status row.
    pub fn save(&mut self) -> bool {
        match todo_io::save(&self.path, &self.list) {
            Ok(()) => {
                self.dirty = false;
                self.last_save = Some(Local::now());
                true
            }
            Err(e) => {
                error!(error = %e, "save failed");
                self.status = Some(format!("Save failed: {}", e));
                false
            }
        }
    }

    /// Save unsaved changes when the backup interval has passed.
    pub fn checkpoint(&mut self, now: DateTime<Local>) {
        if !self.clock.is_due(now) {
            return;
        }
        self.clock.reset(now);
        if self.dirty {
            info!("checkpoint save");
            self.save();
        }
    }

    /// Open `text` in the external editor. Editor failures are reported in
    /// the status row and count as no change.
    pub fn edit_external(&mut self, ui: &mut Ui, text: &str) -> io::Result<Option<String>> {
        let editor = &mut self.editor;
        match ui.suspend(|| editor.edit(text))? {
            Ok(edited) => Ok(edited),
            Err(e) => {
                warn!(error = %e, "external edit failed");
                self.status = Some(e.to_string());
                Ok(None)
            }
        }
    }

    /// `(Saved 2024-01-31 09:15:00)` once something was saved.
    pub fn saved_label(&self) -> Option<String> {
        self.last_save
            .map(|at| format!("(Saved {})", at.format("%Y-%m-%d %H:%M:%S")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::todo::Priority;
    use crate::ops::todo_ops::insert_item;
    use chrono::Duration;
    use tempfile::TempDir;

    fn session(dir: &TempDir) -> Session {
        Session::new(
            TodoList::new(),
            dir.path().join("todohd.json"),
            Theme::dark(),
            5,
        )
    }

    #[test]
    fn save_clears_dirty() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp);
        insert_item(&mut session.list, "a", "", Priority::Whenever).unwrap();
        session.touch();
        assert!(session.save());
        assert!(!session.dirty);
        assert!(session.saved_label().unwrap().starts_with("(Saved "));
        assert!(tmp.path().join("todohd.json").exists());
    }

    #[test]
    fn save_failure_goes_to_status() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp);
        session.path = tmp.path().join("missing-dir").join("todohd.json");
        assert!(!session.save());
        assert!(session.status.unwrap().starts_with("Save failed"));
    }

    #[test]
    fn checkpoint_saves_only_when_due_and_dirty() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp);
        let path = session.path.clone();
        session.touch();

        session.checkpoint(Local::now());
        assert!(!path.exists());

        session.checkpoint(Local::now() + Duration::minutes(6));
        assert!(path.exists());
        assert!(!session.dirty);
    }
}
