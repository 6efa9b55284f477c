use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// User settings from todohd.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Preset name: "dark" or "light". Unset means dark.
    #[serde(default)]
    pub theme: Option<String>,
    /// Write a log file next to the data file
    #[serde(default)]
    pub trace: bool,
    /// Minutes between automatic saves of unsaved changes
    #[serde(default = "default_backup_interval")]
    pub backup_interval_minutes: u64,
    /// Per-role color overrides, e.g. `step_active = "Color(Blue, DarkGray)"`
    #[serde(default)]
    pub colors: IndexMap<String, String>,
}

fn default_backup_interval() -> u64 {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            theme: None,
            trace: false,
            backup_interval_minutes: default_backup_interval(),
            colors: IndexMap::new(),
        }
    }
}
