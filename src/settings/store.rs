use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::warn;

use crate::settings::notification_settings::NotificationSettings;

const KEY_MODE: &str = "mode";
const KEY_START: &str = "start_time";
const KEY_END: &str = "end_time";
const KEY_COUNT: &str = "count";
const KEY_MULTIPLIER: &str = "frequency_multiplier";

/// Key→value persistence boundary for settings. Last write wins; missing
/// or unparseable values fall back per key to the documented defaults.
pub trait SettingsStore: Send {
    fn get_raw(&self, key: &str) -> Option<String>;
    fn set_raw(&mut self, key: &str, value: String) -> Result<()>;

    fn load_settings(&self) -> NotificationSettings {
        let defaults = NotificationSettings::default();

        NotificationSettings {
            mode: parse_or(self.get_raw(KEY_MODE), KEY_MODE, defaults.mode),
            start: parse_or(self.get_raw(KEY_START), KEY_START, defaults.start),
            end: parse_or(self.get_raw(KEY_END), KEY_END, defaults.end),
            count: parse_or(self.get_raw(KEY_COUNT), KEY_COUNT, defaults.count),
            frequency_multiplier: parse_or(
                self.get_raw(KEY_MULTIPLIER),
                KEY_MULTIPLIER,
                defaults.frequency_multiplier,
            ),
        }
    }

    fn save_settings(&mut self, settings: &NotificationSettings) -> Result<()> {
        self.set_raw(KEY_MODE, settings.mode.to_string())?;
        self.set_raw(KEY_START, settings.start.to_string())?;
        self.set_raw(KEY_END, settings.end.to_string())?;
        self.set_raw(KEY_COUNT, settings.count.to_string())?;
        self.set_raw(KEY_MULTIPLIER, settings.frequency_multiplier.to_string())?;
        Ok(())
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, raw, "unparseable stored setting, using default");
                default
            }
        },
    }
}

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: HashMap<String, String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// YAML map file on disk. Reads tolerate a missing or corrupt file by
/// starting from empty; writes rewrite the whole map.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileSettingsStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Err(_) => HashMap::new(),
            Ok(raw) => match serde_yaml::from_str(&raw) {
                Ok(values) => values,
                Err(error) => {
                    warn!(path = %path.display(), %error, "corrupt settings file, starting from defaults");
                    HashMap::new()
                }
            },
        };

        Self { path, values }
    }

    fn persist(&self) -> Result<()> {
        let raw = serde_yaml::to_string(&self.values).context("failed to serialize settings")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write settings {}", self.path.display()))
    }
}

impl SettingsStore for FileSettingsStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.persist()
    }
}
