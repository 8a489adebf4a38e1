use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::alarm::model::{Alarm, parse_alarm_list, serialize_alarm_list};
use crate::format::TimeFormat;

pub const THEME_KEY: &str = "theme";
pub const TIME_FORMAT_KEY: &str = "timeFormat";
pub const ALARMS_KEY: &str = "alarms";
pub const DEFAULT_THEME: &str = "default";

/// Flat string-keyed persistent store.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process store used where nothing should touch the disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All keys live in one JSON object file, rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store; a missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("unable to read preferences file {}", path.display()))?;
            parse_store_text(&content)?
        } else {
            debug!("preferences file {} not found, using defaults", path.display());
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detached copy of the loaded values; writes to it never reach the file.
    pub fn snapshot(&self) -> MemoryStore {
        MemoryStore {
            values: self.values.clone(),
        }
    }

    fn flush(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, format!("{text}\n"))
            .with_context(|| format!("unable to write preferences file {}", self.path.display()))?;
        Ok(())
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

fn parse_store_text(content: &str) -> Result<BTreeMap<String, String>> {
    serde_json::from_str::<BTreeMap<String, String>>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow::anyhow!("invalid JSON at line {line}, column {column}: {err}")
    })
}

/// Durable projection of the display settings and the alarm list.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Preferences {
    pub theme: String,
    pub time_format: TimeFormat,
    pub alarms: Vec<Alarm>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            time_format: TimeFormat::Hour12,
            alarms: Vec::new(),
        }
    }
}

impl Preferences {
    /// Absent keys fall back to defaults. An unreadable alarm list is dropped
    /// with a warning rather than failing startup.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let theme = store
            .get(THEME_KEY)
            .filter(|theme| !theme.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_THEME.to_string());
        let time_format = TimeFormat::from_pref_value(store.get(TIME_FORMAT_KEY).as_deref());
        let alarms = match store.get(ALARMS_KEY) {
            Some(text) => parse_alarm_list(&text).unwrap_or_else(|err| {
                warn!("ignoring stored alarms: {err:#}");
                Vec::new()
            }),
            None => Vec::new(),
        };
        Self {
            theme,
            time_format,
            alarms,
        }
    }

    pub fn save(&self, store: &mut dyn PreferenceStore) -> Result<()> {
        store.set(THEME_KEY, &self.theme)?;
        store.set(TIME_FORMAT_KEY, self.time_format.as_pref_value())?;
        store.set(ALARMS_KEY, &serialize_alarm_list(&self.alarms)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn sample_preferences() -> Preferences {
        Preferences {
            theme: "ocean".to_string(),
            time_format: TimeFormat::Hour24,
            alarms: vec![
                Alarm::new(6, 45),
                Alarm {
                    hour: 22,
                    minute: 0,
                    active: false,
                },
            ],
        }
    }

    #[test]
    fn empty_store_yields_defaults() {
        let store = MemoryStore::default();
        assert_eq!(Preferences::load(&store), Preferences::default());
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::default();
        let prefs = sample_preferences();
        prefs.save(&mut store).expect("save");
        assert_eq!(store.get(TIME_FORMAT_KEY).as_deref(), Some("24h"));
        assert_eq!(Preferences::load(&store), prefs);
    }

    #[test]
    fn malformed_alarm_value_falls_back_to_empty() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "forest").expect("set");
        store.set(ALARMS_KEY, "{ not a list").expect("set");
        let prefs = Preferences::load(&store);
        assert_eq!(prefs.theme, "forest");
        assert!(prefs.alarms.is_empty());
    }

    #[test]
    fn file_store_persists_between_opens() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");
        let prefs = sample_preferences();
        {
            let mut store = JsonFileStore::open(&path).expect("open new");
            prefs.save(&mut store).expect("save");
        }

        let written = fs::read_to_string(&path).expect("read back");
        assert!(written.ends_with('\n'));
        let reopened = JsonFileStore::open(&path).expect("reopen");
        assert_eq!(reopened.path(), path.as_path());
        assert_eq!(Preferences::load(&reopened), prefs);
    }

    #[test]
    fn snapshot_writes_stay_off_disk() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{\"theme\": \"ocean\"}\n").expect("write json");
        let store = JsonFileStore::open(&path).expect("open");

        let mut snapshot = store.snapshot();
        assert_eq!(snapshot.get(THEME_KEY).as_deref(), Some("ocean"));
        snapshot.set(THEME_KEY, "sunset").expect("set");

        assert_eq!(snapshot.get(THEME_KEY).as_deref(), Some("sunset"));
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("ocean"));
        assert_eq!(
            fs::read_to_string(&path).expect("read back"),
            "{\"theme\": \"ocean\"}\n"
        );
    }

    #[test]
    fn file_store_rejects_non_object_content() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not-valid-json ").expect("write invalid json");
        let err = JsonFileStore::open(&path).expect_err("malformed file should fail");
        assert!(err.to_string().contains("invalid JSON"));
    }
}
