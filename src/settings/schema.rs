use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::ui::{
    TabPosition,
    toolbar::{ToolButtonStyle, ToolbarId},
};

pub const SETTINGS_SCHEMA_VERSION: u32 = 1;

/// Icon sizes offered by the toolbar menu; `0` follows the platform.
pub const TOOL_BUTTON_SIZES: [u16; 5] = [0, 16, 22, 32, 48];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingsCategory {
    General,
    Appearance,
    Documents,
    Confirmations,
}

impl SettingsCategory {
    pub const fn title(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Appearance => "Appearance",
            Self::Documents => "Documents",
            Self::Confirmations => "Confirmations",
        }
    }

    pub const fn all() -> [Self; 4] {
        [Self::General, Self::Appearance, Self::Documents, Self::Confirmations]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Settings {
    pub schema_version: u32,
    pub saved_at_utc: Option<DateTime<Utc>>,
    pub application: ApplicationSettings,
    pub document: DocumentSettings,
    pub confirmations: BTreeMap<String, bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: SETTINGS_SCHEMA_VERSION,
            saved_at_utc: None,
            application: ApplicationSettings::default(),
            document: DocumentSettings::default(),
            confirmations: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn migrate(mut self) -> Self {
        if self.schema_version > SETTINGS_SCHEMA_VERSION {
            return self;
        }

        if !TOOL_BUTTON_SIZES.contains(&self.application.tool_button_size) {
            self.application.tool_button_size = 0;
        }
        if let Some(geometry) = self.application.geometry
            && !geometry.is_usable()
        {
            self.application.geometry = None;
        }

        self.schema_version = SETTINGS_SCHEMA_VERSION;
        self
    }

    /// Whether the prompt stored under `id` should still be shown.
    pub fn confirmation_enabled(&self, id: &str) -> bool {
        self.confirmations.get(id).copied().unwrap_or(true)
    }

    pub fn set_confirmation_enabled(&mut self, id: &str, enabled: bool) {
        self.confirmations.insert(id.to_string(), enabled);
    }

    pub fn reset_confirmations(&mut self) {
        self.confirmations.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ApplicationSettings {
    pub geometry: Option<WindowGeometry>,
    pub state: Option<ShellState>,
    pub show_path: bool,
    pub show_menubar: bool,
    pub show_statusbar: bool,
    #[serde(deserialize_with = "or_default")]
    pub tool_button_style: ToolButtonStyle,
    pub tool_button_size: u16,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            geometry: None,
            state: None,
            show_path: true,
            show_menubar: true,
            show_statusbar: true,
            tool_button_style: ToolButtonStyle::FollowStyle,
            tool_button_size: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub maximized: bool,
}

impl WindowGeometry {
    pub fn is_usable(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Two thirds of the available area, centered.
    pub fn centered_in(available_width: i32, available_height: i32) -> Self {
        let width = available_width * 2 / 3;
        let height = available_height * 2 / 3;
        Self {
            x: (available_width - width) / 2,
            y: (available_height - height) / 2,
            width,
            height,
            maximized: false,
        }
    }
}

/// Toolbar layout of the main window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ShellState {
    pub toolbars: BTreeMap<ToolbarId, bool>,
    pub full_screen: bool,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            toolbars: ToolbarId::all()
                .into_iter()
                .map(|id| (id, id.visible_by_default()))
                .collect(),
            full_screen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DocumentSettings {
    pub tabs_visible: bool,
    #[serde(deserialize_with = "or_default")]
    pub tabs_position: TabPosition,
    pub tabs_auto_hide: bool,
    pub sheet_tabs_visible: bool,
    #[serde(deserialize_with = "or_default_bottom")]
    pub sheet_tabs_position: TabPosition,
    pub sheet_tabs_auto_hide: bool,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            tabs_visible: true,
            tabs_position: TabPosition::Top,
            tabs_auto_hide: false,
            sheet_tabs_visible: true,
            sheet_tabs_position: TabPosition::Bottom,
            sheet_tabs_auto_hide: true,
        }
    }
}

/// Falls back to the default instead of rejecting the whole file when a
/// stored value is not one of the known variants.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn or_default_bottom<'de, D>(deserializer: D) -> Result<TabPosition, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or(TabPosition::Bottom))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_use_the_documented_names() {
        let mut settings = Settings::default();
        settings.set_confirmation_enabled("ConfirmCloseAllDocuments", false);
        let json = serde_json::to_value(&settings).expect("serialize");

        assert!(json["Application"].get("ShowMenubar").is_some());
        assert!(json["Application"].get("ToolButtonStyle").is_some());
        assert!(json["Application"].get("Geometry").is_some());
        assert!(json["Application"].get("State").is_some());
        assert!(json["Document"].get("SheetTabsPosition").is_some());
        assert_eq!(json["Confirmations"]["ConfirmCloseAllDocuments"], false);
    }

    #[test]
    fn unknown_enum_values_fall_back_to_defaults() {
        let json = r#"{
            "Application": { "ToolButtonStyle": "Sideways", "ShowMenubar": false },
            "Document": { "SheetTabsPosition": "West", "TabsPosition": "Bottom" }
        }"#;
        let settings = serde_json::from_str::<Settings>(json).expect("parse").migrate();

        assert_eq!(settings.application.tool_button_style, ToolButtonStyle::FollowStyle);
        assert!(!settings.application.show_menubar);
        assert_eq!(settings.document.sheet_tabs_position, TabPosition::Bottom);
        assert_eq!(settings.document.tabs_position, TabPosition::Bottom);
    }

    #[test]
    fn migrate_rejects_unknown_icon_sizes_and_empty_geometry() {
        let mut settings = Settings::default();
        settings.application.tool_button_size = 17;
        settings.application.geometry = Some(WindowGeometry {
            x: 0,
            y: 0,
            width: 0,
            height: 400,
            maximized: false,
        });

        let settings = settings.migrate();
        assert_eq!(settings.application.tool_button_size, 0);
        assert!(settings.application.geometry.is_none());
    }

    #[test]
    fn confirmations_default_to_enabled() {
        let mut settings = Settings::default();
        assert!(settings.confirmation_enabled("ConfirmQuitApplication"));

        settings.set_confirmation_enabled("ConfirmQuitApplication", false);
        assert!(!settings.confirmation_enabled("ConfirmQuitApplication"));

        settings.reset_confirmations();
        assert!(settings.confirmation_enabled("ConfirmQuitApplication"));
    }

    #[test]
    fn default_shell_state_hides_appearance_and_help_toolbars() {
        let state = ShellState::default();
        assert_eq!(state.toolbars.get(&ToolbarId::File), Some(&true));
        assert_eq!(state.toolbars.get(&ToolbarId::Appearance), Some(&false));
        assert_eq!(state.toolbars.get(&ToolbarId::Help), Some(&false));
    }

    #[test]
    fn centered_geometry_uses_two_thirds() {
        let geometry = WindowGeometry::centered_in(1800, 900);
        assert_eq!((geometry.width, geometry.height), (1200, 600));
        assert_eq!((geometry.x, geometry.y), (300, 150));
    }
}
