use std::fs;
use std::io::{self, Write};
use std::process::{Command, ExitStatus};

use tracing::info;

/// Error type for the external editor bridge
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("could not prepare the temp file: {0}")]
    TempFile(#[source] io::Error),
    #[error("could not start editor '{command}': {source}")]
    Spawn { command: String, source: io::Error },
    #[error("editor '{command}' exited with {status}")]
    Failed { command: String, status: ExitStatus },
}

/// Something that lets the user edit a piece of text. `Ok(None)` means the
/// text was left unchanged.
pub trait TextEditor {
    fn edit(&mut self, text: &str) -> Result<Option<String>, EditorError>;
}

impl<F> TextEditor for F
where
    F: FnMut(&str) -> Result<Option<String>, EditorError>,
{
    fn edit(&mut self, text: &str) -> Result<Option<String>, EditorError> {
        self(text)
    }
}

/// The user's configured editor program
#[derive(Debug, Clone)]
pub struct SystemEditor {
    command: String,
}

impl Default for SystemEditor {
    fn default() -> Self {
        SystemEditor {
            command: editor_command(),
        }
    }
}

impl TextEditor for SystemEditor {
    fn edit(&mut self, text: &str) -> Result<Option<String>, EditorError> {
        edit_with(&self.command, text)
    }
}

/// `$VISUAL`, then `$EDITOR`, then `vi`.
pub fn editor_command() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

/// Edit `initial` with an editor command line (program plus whitespace
/// separated arguments). `None` when nothing changed. The caller is
/// responsible for leaving raw mode first.
pub fn edit_with(command: &str, initial: &str) -> Result<Option<String>, EditorError> {
    let mut file = tempfile::Builder::new()
        .prefix("todohd-")
        .suffix(".md")
        .tempfile()
        .map_err(EditorError::TempFile)?;
    file.write_all(initial.as_bytes())
        .and_then(|_| file.flush())
        .map_err(EditorError::TempFile)?;

    let mut parts = command.split_whitespace();
    let program = parts.next().unwrap_or("vi");
    info!(editor = command, file = %file.path().display(), "launching editor");

    let status = Command::new(program)
        .args(parts)
        .arg(file.path())
        .status()
        .map_err(|source| EditorError::Spawn {
            command: command.to_string(),
            source,
        })?;
    if !status.success() {
        return Err(EditorError::Failed {
            command: command.to_string(),
            status,
        });
    }

    let edited = fs::read_to_string(file.path()).map_err(EditorError::TempFile)?;
    Ok((edited != initial).then_some(edited))
}
