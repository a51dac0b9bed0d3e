//! Display settings and their persistence.
//!
//! Settings mirror the task store's read/merge/persist pattern over a single
//! object rather than a collection: loaded from `settings.json`, merged
//! field-wise with a fixed default baseline, and re-written whole on every
//! change.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StoreError;
use crate::fields::{LayoutStyle, SortField};

/// File name of the settings object inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// User display preferences, consulted only at render/sort time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_layout_style")]
    pub layout_style: LayoutStyle,
    #[serde(default = "default_sort_field", deserialize_with = "sort_field_or_unsorted")]
    pub layout_order: SortField,
    #[serde(default = "default_layout_asc")]
    pub layout_asc: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            layout_style: LayoutStyle::Grid,
            layout_order: SortField::Unsorted,
            layout_asc: true,
        }
    }
}

fn default_layout_style() -> LayoutStyle {
    LayoutStyle::Grid
}

fn default_sort_field() -> SortField {
    SortField::Unsorted
}

fn default_layout_asc() -> bool {
    true
}

/// Loose typing guard: several historical settings shapes stored arbitrary
/// strings here. Anything unrecognised becomes the no-op sort order.
fn sort_field_or_unsorted<'de, D>(deserializer: D) -> Result<SortField, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(match raw.as_str() {
        "az" | "Az" => SortField::Az,
        "date" => SortField::Date,
        "priority" => SortField::Priority,
        _ => SortField::Unsorted,
    })
}

/// Partial settings change. `None` leaves a field untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsPatch {
    pub layout_style: Option<LayoutStyle>,
    pub layout_order: Option<SortField>,
    pub layout_asc: Option<bool>,
}

/// Exposes the current settings and an updater that merges partial changes
/// and persists them. Same failure semantics as the task store: persist
/// errors are logged and the in-memory value keeps serving.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Load settings from a JSON file, falling back to the default baseline
    /// when no stored value exists or the stored value is invalid. Fields
    /// missing from the stored object take their defaults.
    pub fn load(path: &Path) -> Self {
        let settings = if path.exists() {
            let mut buf = String::new();
            match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
                Ok(_) => match serde_json::from_str(&buf) {
                    Ok(settings) => settings,
                    Err(e) => {
                        eprintln!(
                            "Invalid settings in {}, using defaults: {e}",
                            path.display()
                        );
                        Settings::default()
                    }
                },
                Err(e) => {
                    eprintln!("Error reading {}, using defaults: {e}", path.display());
                    Settings::default()
                }
            }
        } else {
            Settings::default()
        };
        SettingsStore {
            path: path.to_path_buf(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Merge a partial change and persist the result.
    pub fn update(&mut self, patch: SettingsPatch) {
        if let Some(style) = patch.layout_style {
            self.settings.layout_style = style;
        }
        if let Some(order) = patch.layout_order {
            self.settings.layout_order = order;
        }
        if let Some(asc) = patch.layout_asc {
            self.settings.layout_asc = asc;
        }
        if let Err(e) = self.save() {
            eprintln!("Failed to save settings: {e}");
        }
    }

    /// Write the settings object using an atomic temp + rename.
    pub fn save(&self) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(&self.settings)?;
        let mut f = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        f.write_all(data.as_bytes())
            .map_err(|e| StoreError::io(&tmp, e))?;
        f.flush().map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> SettingsStore {
        SettingsStore::load(&dir.join(SETTINGS_FILE))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert_eq!(*store.settings(), Settings::default());
        assert_eq!(store.settings().layout_style, LayoutStyle::Grid);
        assert!(store.settings().layout_asc);
    }

    #[test]
    fn invalid_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "][").unwrap();
        assert_eq!(*SettingsStore::load(&path).settings(), Settings::default());
    }

    #[test]
    fn partial_object_merges_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{"layout_style": "list"}"#).unwrap();
        let store = SettingsStore::load(&path);
        assert_eq!(store.settings().layout_style, LayoutStyle::List);
        assert_eq!(store.settings().layout_order, SortField::Unsorted);
        assert!(store.settings().layout_asc);
    }

    #[test]
    fn unknown_sort_field_coerces_to_unsorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(
            &path,
            r#"{"layout_style": "grid", "layout_order": "by-vibes", "layout_asc": false}"#,
        )
        .unwrap();
        let store = SettingsStore::load(&path);
        assert_eq!(store.settings().layout_order, SortField::Unsorted);
        assert!(!store.settings().layout_asc);
    }

    #[test]
    fn legacy_order_spelling_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{"layout_order": "Az"}"#).unwrap();
        assert_eq!(
            SettingsStore::load(&path).settings().layout_order,
            SortField::Az
        );
    }

    #[test]
    fn update_merges_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = store_in(dir.path());
            store.update(SettingsPatch {
                layout_order: Some(SortField::Priority),
                layout_asc: Some(false),
                ..SettingsPatch::default()
            });
        }
        let store = store_in(dir.path());
        assert_eq!(store.settings().layout_order, SortField::Priority);
        assert!(!store.settings().layout_asc);
        // Style was never patched and keeps its default.
        assert_eq!(store.settings().layout_style, LayoutStyle::Grid);
    }
}
