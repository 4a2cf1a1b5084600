pub mod schema;

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use schema::{Settings, SettingsCategory};

const SAVE_DEBOUNCE_MS: u64 = 500;
const APP_DIR_NAME: &str = "Tabelo";
const SETTINGS_FILE_NAME: &str = "settings.json";
const PORTABLE_MARKER: &str = "tabelo.ini";

#[derive(Debug, Clone)]
pub struct SettingSearchHit {
    pub category: SettingsCategory,
    pub setting_key: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
}

/// Owns the persisted preferences. Components receive it by reference.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
    pending_write: bool,
    last_change_at: Option<Instant>,
    debounce: Duration,
}

impl SettingsStore {
    pub fn load() -> Self {
        Self::with_path(settings_path())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = load_settings_from(path.as_path());
        Self {
            path,
            settings,
            pending_write: false,
            last_change_at: None,
            debounce: Duration::from_millis(SAVE_DEBOUNCE_MS),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update<F>(&mut self, mutator: F)
    where
        F: FnOnce(&mut Settings),
    {
        mutator(&mut self.settings);
        self.pending_write = true;
        self.last_change_at = Some(Instant::now());
    }

    pub fn is_dirty(&self) -> bool {
        self.pending_write
    }

    pub fn flush_if_due(&mut self) -> Result<bool> {
        let Some(last_change) = self.last_change_at else {
            return Ok(false);
        };
        if !self.pending_write || last_change.elapsed() < self.debounce {
            return Ok(false);
        }

        self.save()?;
        Ok(true)
    }

    pub fn save(&mut self) -> Result<()> {
        self.settings.saved_at_utc = Some(Utc::now());
        save_settings_to(self.path.as_path(), &self.settings)?;
        self.pending_write = false;
        self.last_change_at = None;
        Ok(())
    }
}

pub fn settings_path() -> PathBuf {
    if let Some(root) = portable_root() {
        return root.join(SETTINGS_FILE_NAME);
    }

    if let Some(base) = dirs::config_dir() {
        base.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME)
    } else {
        PathBuf::from(SETTINGS_FILE_NAME)
    }
}

pub fn portable_root() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?.to_path_buf();
    if dir.join(PORTABLE_MARKER).exists() {
        Some(dir)
    } else {
        None
    }
}

/// Missing or unreadable files yield defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            debug!(path = %path.display(), %err, "no stored settings, using defaults");
            return Settings::default();
        }
    };

    match serde_json::from_str::<Settings>(&data) {
        Ok(settings) => {
            info!(path = %path.display(), "settings loaded");
            settings.migrate()
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "settings file is malformed, using defaults");
            Settings::default()
        }
    }
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
    }
    let data = serde_json::to_string_pretty(&settings.clone().migrate())?;
    fs::write(path, data).map_err(|err| Error::io(path, err))?;
    info!(path = %path.display(), "settings saved");
    Ok(())
}

pub fn search_settings(query: &str) -> Vec<SettingSearchHit> {
    let needle = query.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return settings_catalog().to_vec();
    }

    settings_catalog()
        .iter()
        .filter(|item| {
            item.title.to_ascii_lowercase().contains(needle.as_str())
                || item.summary.to_ascii_lowercase().contains(needle.as_str())
                || item.setting_key.to_ascii_lowercase().contains(needle.as_str())
                || item
                    .category
                    .title()
                    .to_ascii_lowercase()
                    .contains(needle.as_str())
        })
        .cloned()
        .collect()
}

fn settings_catalog() -> &'static [SettingSearchHit] {
    &[
        SettingSearchHit {
            category: SettingsCategory::General,
            setting_key: "Application/ShowPath",
            title: "Show Path in Titlebar",
            summary: "Show the document path in the window caption.",
        },
        SettingSearchHit {
            category: SettingsCategory::Appearance,
            setting_key: "Application/ShowMenubar",
            title: "Show Menubar",
            summary: "Show or hide the menu bar.",
        },
        SettingSearchHit {
            category: SettingsCategory::Appearance,
            setting_key: "Application/ShowStatusbar",
            title: "Show Statusbar",
            summary: "Show or hide the status bar.",
        },
        SettingSearchHit {
            category: SettingsCategory::Appearance,
            setting_key: "Application/ToolButtonStyle",
            title: "Tool Button Style",
            summary: "Icon only, text only, text beside or under the icon.",
        },
        SettingSearchHit {
            category: SettingsCategory::Appearance,
            setting_key: "Application/ToolButtonSize",
            title: "Tool Button Size",
            summary: "Small, medium, large, huge or theme icon size.",
        },
        SettingSearchHit {
            category: SettingsCategory::Documents,
            setting_key: "Document/TabsVisible",
            title: "Show Document Tabs",
            summary: "Show the tabs of the open documents.",
        },
        SettingSearchHit {
            category: SettingsCategory::Documents,
            setting_key: "Document/TabsPosition",
            title: "Document Tab Position",
            summary: "Show document tabs above or below the documents.",
        },
        SettingSearchHit {
            category: SettingsCategory::Documents,
            setting_key: "Document/TabsAutoHide",
            title: "Auto Hide Document Tabs",
            summary: "Hide the tabs while only one document is open.",
        },
        SettingSearchHit {
            category: SettingsCategory::Documents,
            setting_key: "Document/SheetTabsVisible",
            title: "Show Sheet Tabs",
            summary: "Show the sheet tabs of new documents.",
        },
        SettingSearchHit {
            category: SettingsCategory::Documents,
            setting_key: "Document/SheetTabsPosition",
            title: "Sheet Tab Position",
            summary: "Show sheet tabs above or below the sheets.",
        },
        SettingSearchHit {
            category: SettingsCategory::Documents,
            setting_key: "Document/SheetTabsAutoHide",
            title: "Auto Hide Sheet Tabs",
            summary: "Hide the sheet tabs while a document has only one sheet.",
        },
        SettingSearchHit {
            category: SettingsCategory::Confirmations,
            setting_key: "Confirmations",
            title: "Reset Confirmations",
            summary: "Show every confirmation again, including the ones marked do not show again.",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::TabPosition;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SettingsStore::with_path(dir.path().join("absent.json"));

        assert_eq!(store.settings(), &Settings::default());
        assert!(!store.is_dirty());
    }

    #[test]
    fn saved_values_survive_a_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("settings.json");

        let mut store = SettingsStore::with_path(&path);
        store.update(|settings| {
            settings.application.show_statusbar = false;
            settings.document.sheet_tabs_position = TabPosition::Top;
            settings.set_confirmation_enabled("ConfirmCloseAllDocuments", false);
        });
        assert!(store.is_dirty());
        store.save().expect("save");
        assert!(!store.is_dirty());

        let reloaded = SettingsStore::with_path(&path);
        assert!(!reloaded.settings().application.show_statusbar);
        assert_eq!(reloaded.settings().document.sheet_tabs_position, TabPosition::Top);
        assert!(!reloaded.settings().confirmation_enabled("ConfirmCloseAllDocuments"));
        assert!(reloaded.settings().saved_at_utc.is_some());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").expect("write");

        let store = SettingsStore::with_path(&path);
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn flush_waits_for_the_debounce_window() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let mut store = SettingsStore::with_path(&path);

        store.update(|settings| settings.application.show_menubar = false);
        assert!(!store.flush_if_due().expect("flush"));
        assert!(!path.exists());
    }

    #[test]
    fn search_matches_keys_titles_and_categories() {
        assert_eq!(search_settings("").len(), settings_catalog().len());
        assert!(
            search_settings("sheet")
                .iter()
                .all(|hit| hit.category == SettingsCategory::Documents)
        );
        assert!(
            search_settings("confirmations")
                .iter()
                .any(|hit| hit.setting_key == "Confirmations")
        );
    }
}
