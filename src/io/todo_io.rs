use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::model::todo::{TodoDocument, TodoList};
use crate::ops::todo_ops::normalize;

pub const DATA_FILE_NAME: &str = "todohd.json";

/// Error type for reading and writing the data file
#[derive(Debug, thiserror::Error)]
pub enum TodoIoError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not locate the executable: {0}")]
    ExeDir(io::Error),
}

/// Result of [`load`]: the collection plus a message for the user when the
/// file had to be recovered.
#[derive(Debug)]
pub struct Loaded {
    pub list: TodoList,
    pub warning: Option<String>,
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Pick the data file: an explicit file wins, then a directory argument,
/// then the directory of the executable.
pub fn resolve_data_path(file: Option<&Path>, dir: Option<&Path>) -> Result<PathBuf, TodoIoError> {
    if let Some(file) = file {
        return Ok(file.to_path_buf());
    }
    if let Some(dir) = dir {
        return Ok(dir.join(DATA_FILE_NAME));
    }
    let exe = std::env::current_exe().map_err(TodoIoError::ExeDir)?;
    let dir = exe.parent().unwrap_or(Path::new("."));
    Ok(dir.join(DATA_FILE_NAME))
}

/// `todohd.json` + `20240131` + `bak` → `todohd.json.20240131.bak`
pub fn sibling_path(path: &Path, stamp: &str, extension: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.{}", stamp, extension));
    path.with_file_name(name)
}

fn timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load the data file. A missing file is created empty. A file that does
/// not decode is copied aside and replaced by an empty one.
pub fn load(path: &Path) -> Result<Loaded, TodoIoError> {
    if !path.exists() {
        info!(path = %path.display(), "data file missing, starting empty");
        write_document(path, &TodoDocument::default())?;
        return Ok(Loaded {
            list: TodoList::new(),
            warning: None,
        });
    }

    let bytes = fs::read(path).map_err(|source| TodoIoError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match serde_json::from_slice::<TodoDocument>(&bytes) {
        Ok(doc) => {
            let mut list = TodoList::from_document(doc);
            normalize(&mut list);
            info!(items = list.len(), path = %path.display(), "loaded");
            Ok(Loaded {
                list,
                warning: None,
            })
        }
        Err(e) => {
            let corrupt = sibling_path(path, &timestamp(Local::now()), "corrupt");
            let kept = match fs::copy(path, &corrupt) {
                Ok(_) => format!("It was copied to {}", corrupt.display()),
                Err(copy_error) => {
                    warn!(error = %copy_error, copy = %corrupt.display(), "could not keep corrupt data file");
                    "It could not be copied aside".to_string()
                }
            };
            write_document(path, &TodoDocument::default())?;
            warn!(error = %e, path = %path.display(), "data file corrupt, started empty");
            Ok(Loaded {
                list: TodoList::new(),
                warning: Some(format!(
                    "{} could not be read ({}). {} and an empty list was started.",
                    path.display(),
                    e,
                    kept
                )),
            })
        }
    }
}

/// Save the collection, taking the daily backup first.
pub fn save(path: &Path, list: &TodoList) -> Result<(), TodoIoError> {
    daily_backup(path, Local::now().date_naive());
    write_document(path, &list.to_document())?;
    debug!(items = list.len(), path = %path.display(), "saved");
    Ok(())
}

/// Copy the current file to `<file>.<yyyyMMdd>.bak` unless today's backup
/// already exists. Failures are logged, never returned.
pub fn daily_backup(path: &Path, today: NaiveDate) -> Option<PathBuf> {
    if !path.exists() {
        return None;
    }
    let backup = sibling_path(path, &today.format("%Y%m%d").to_string(), "bak");
    if backup.exists() {
        return None;
    }
    match fs::copy(path, &backup) {
        Ok(_) => {
            info!(backup = %backup.display(), "daily backup written");
            Some(backup)
        }
        Err(e) => {
            warn!(error = %e, backup = %backup.display(), "daily backup failed");
            None
        }
    }
}

/// Dump the in-memory collection to `<file>.<yyyyMMddHHmmss>.bak`.
pub fn emergency_backup(path: &Path, list: &TodoList) -> Result<PathBuf, TodoIoError> {
    let backup = sibling_path(path, &timestamp(Local::now()), "bak");
    write_document(&backup, &list.to_document())?;
    warn!(backup = %backup.display(), "emergency backup written");
    Ok(backup)
}

fn write_document(path: &Path, doc: &TodoDocument) -> Result<(), TodoIoError> {
    let json = serde_json::to_string_pretty(doc).map_err(|source| TodoIoError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, json.as_bytes()).map_err(|source| TodoIoError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `content` to `path` through a temp file in the same directory.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Checkpoints
// ---------------------------------------------------------------------------

/// Decides when unsaved changes are written without the user asking.
#[derive(Debug, Clone)]
pub struct BackupClock {
    interval_minutes: i64,
    last: DateTime<Local>,
}

impl BackupClock {
    pub fn new(interval_minutes: u64, now: DateTime<Local>) -> Self {
        BackupClock {
            interval_minutes: i64::try_from(interval_minutes).unwrap_or(i64::MAX),
            last: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Local>) -> bool {
        (now - self.last).num_minutes() >= self.interval_minutes
    }

    pub fn reset(&mut self, now: DateTime<Local>) {
        self.last = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::todo::{Priority, TodoItem};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn one_item() -> TodoList {
        let mut list = TodoList::new();
        let mut item = TodoItem::new("Water plants", "", Priority::Urgent);
        item.id = 1;
        item.order = 1;
        list.put(item);
        list
    }

    #[test]
    fn missing_file_is_created_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DATA_FILE_NAME);
        let loaded = load(&path).unwrap();
        assert!(loaded.list.is_empty());
        assert!(loaded.warning.is_none());
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"Items\": []"));
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DATA_FILE_NAME);
        save(&path, &one_item()).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.list, one_item());
    }

    #[test]
    fn load_normalizes_orders() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DATA_FILE_NAME);
        fs::write(
            &path,
            r#"{ "Items": [ { "Id": 4, "Order": 9, "Title": "a" }, { "Id": 2, "Order": 3, "Title": "b" } ] }"#,
        )
        .unwrap();
        let list = load(&path).unwrap().list;
        assert_eq!(list.get(2).unwrap().order, 1);
        assert_eq!(list.get(4).unwrap().order, 2);
    }

    #[test]
    fn corrupt_file_is_copied_aside() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DATA_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let loaded = load(&path).unwrap();
        assert!(loaded.list.is_empty());
        assert!(loaded.warning.unwrap().contains("could not be read"));

        let copies: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".corrupt"))
            .collect();
        assert_eq!(copies.len(), 1);
        let copy = fs::read_to_string(tmp.path().join(&copies[0])).unwrap();
        assert_eq!(copy, "{ not json");
        // The data file itself is usable again
        assert!(load(&path).unwrap().warning.is_none());
    }

    #[test]
    fn non_utf8_file_counts_as_corrupt() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DATA_FILE_NAME);
        fs::write(&path, [0xff, 0xfe, b'{', 0x80]).unwrap();

        let loaded = load(&path).unwrap();
        assert!(matches!(loaded, Loaded { warning: Some(_), .. }));
        assert!(loaded.list.is_empty());
        assert_eq!(load(&path).unwrap().list.len(), 0);
    }

    #[test]
    fn daily_backup_only_once() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DATA_FILE_NAME);
        let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        assert_eq!(daily_backup(&path, day), None);
        fs::write(&path, "first").unwrap();
        let backup = daily_backup(&path, day).unwrap();
        assert_eq!(backup, tmp.path().join("todohd.json.20240131.bak"));

        fs::write(&path, "second").unwrap();
        assert_eq!(daily_backup(&path, day), None);
        assert_eq!(fs::read_to_string(&backup).unwrap(), "first");
    }

    #[test]
    fn emergency_backup_writes_memory_state() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DATA_FILE_NAME);
        let backup = emergency_backup(&path, &one_item()).unwrap();
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("todohd.json."));
        assert!(name.ends_with(".bak"));
        let doc: TodoDocument = serde_json::from_str(&fs::read_to_string(&backup).unwrap()).unwrap();
        assert_eq!(doc.items[0].title, "Water plants");
    }

    #[test]
    fn resolve_prefers_explicit_file() {
        let file = Path::new("/tmp/x.json");
        let dir = Path::new("/data");
        assert_eq!(resolve_data_path(Some(file), Some(dir)).unwrap(), file);
        assert_eq!(
            resolve_data_path(None, Some(dir)).unwrap(),
            Path::new("/data/todohd.json")
        );
        assert!(resolve_data_path(None, None).unwrap().ends_with(DATA_FILE_NAME));
    }

    #[test]
    fn atomic_write_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        atomic_write(&path, b"hello").unwrap();
        atomic_write(&path, b"bye").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "bye");
    }

    #[test]
    fn backup_clock_interval() {
        let start = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut clock = BackupClock::new(5, start);
        assert!(!clock.is_due(start + chrono::Duration::minutes(4)));
        assert!(clock.is_due(start + chrono::Duration::minutes(5)));
        clock.reset(start + chrono::Duration::minutes(5));
        assert!(!clock.is_due(start + chrono::Duration::minutes(6)));
    }
}
