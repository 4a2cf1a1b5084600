use crate::{
    settings::{
        SettingSearchHit,
        schema::{Settings, SettingsCategory, TOOL_BUTTON_SIZES},
        search_settings,
    },
    ui::{
        InputEvent, Point, Rect, TabPosition, UIComponent, strip_mnemonic,
        toolbar::{ToolButtonStyle, tool_button_size_label},
    },
};

const CATEGORY_PANE_WIDTH: f32 = 250.0;
const HEADER_HEIGHT: f32 = 56.0;
const SEARCH_HEIGHT: f32 = 36.0;
const ROW_HEIGHT: f32 = 30.0;
const SETTING_ROW_HEIGHT: f32 = 44.0;
const FOOTER_HEIGHT: f32 = 48.0;
const BUTTON_WIDTH: f32 = 96.0;
const PREFERRED_WIDTH: f32 = 760.0;
const PREFERRED_HEIGHT: f32 = 520.0;
const MARGIN: f32 = 24.0;

const VK_BACK: u32 = 0x08;
const VK_RETURN: u32 = 0x0D;
const VK_ESCAPE: u32 = 0x1B;

/// What closing the dialog asks the window to do with the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum PreferencesOutcome {
    Accepted(Box<Settings>),
    Rejected,
}

/// Preferences window. Edits a draft copy; nothing reaches the store until
/// the draft is accepted.
pub struct PreferencesDialog {
    bounds: Rect,
    visible: bool,
    search_query: String,
    selected_category: SettingsCategory,
    filtered_hits: Vec<SettingSearchHit>,
    draft: Settings,
    dirty: bool,
    outcome: Option<PreferencesOutcome>,
}

impl Default for PreferencesDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferencesDialog {
    pub fn new() -> Self {
        Self {
            bounds: Rect::default(),
            visible: false,
            search_query: String::new(),
            selected_category: SettingsCategory::General,
            filtered_hits: search_settings(""),
            draft: Settings::default(),
            dirty: false,
            outcome: None,
        }
    }

    pub fn title(&self) -> &'static str {
        "Preferences"
    }

    /// Opens with a fresh draft of `current`.
    pub fn open(&mut self, current: Settings) {
        self.draft = current;
        self.dirty = false;
        self.outcome = None;
        self.visible = true;
    }

    pub fn accept(&mut self) {
        self.outcome = Some(PreferencesOutcome::Accepted(Box::new(self.draft.clone())));
        self.visible = false;
    }

    pub fn close(&mut self) {
        self.outcome = Some(PreferencesOutcome::Rejected);
        self.visible = false;
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn take_outcome(&mut self) -> Option<PreferencesOutcome> {
        self.outcome.take()
    }

    pub fn selected_category(&self) -> SettingsCategory {
        self.selected_category
    }

    pub fn select_category(&mut self, category: SettingsCategory) {
        self.selected_category = category;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.refilter();
    }

    pub fn search_query(&self) -> &str {
        self.search_query.as_str()
    }

    pub fn visible_categories(&self) -> Vec<SettingsCategory> {
        if self.search_query.trim().is_empty() {
            return SettingsCategory::all().to_vec();
        }

        SettingsCategory::all()
            .into_iter()
            .filter(|category| self.filtered_hits.iter().any(|hit| hit.category == *category))
            .collect()
    }

    pub fn visible_setting_hits(&self) -> Vec<&SettingSearchHit> {
        self.filtered_hits
            .iter()
            .filter(|hit| hit.category == self.selected_category)
            .collect()
    }

    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn apply_change<F>(&mut self, mutator: F)
    where
        F: FnOnce(&mut Settings),
    {
        mutator(&mut self.draft);
        self.dirty = true;
    }

    /// Every confirmation is shown again once the draft is accepted.
    pub fn reset_confirmations(&mut self) {
        self.apply_change(Settings::reset_confirmations);
    }

    /// Current value of a catalog entry, as shown beside its title.
    pub fn value_label(&self, setting_key: &str) -> Option<String> {
        let application = &self.draft.application;
        let document = &self.draft.document;
        let on_off = |value: bool| String::from(if value { "On" } else { "Off" });
        let position = |position: TabPosition| strip_mnemonic(position.label());

        let label = match setting_key {
            "Application/ShowPath" => on_off(application.show_path),
            "Application/ShowMenubar" => on_off(application.show_menubar),
            "Application/ShowStatusbar" => on_off(application.show_statusbar),
            "Application/ToolButtonStyle" => strip_mnemonic(application.tool_button_style.label()),
            "Application/ToolButtonSize" => strip_mnemonic(tool_button_size_label(application.tool_button_size)),
            "Document/TabsVisible" => on_off(document.tabs_visible),
            "Document/TabsPosition" => position(document.tabs_position),
            "Document/TabsAutoHide" => on_off(document.tabs_auto_hide),
            "Document/SheetTabsVisible" => on_off(document.sheet_tabs_visible),
            "Document/SheetTabsPosition" => position(document.sheet_tabs_position),
            "Document/SheetTabsAutoHide" => on_off(document.sheet_tabs_auto_hide),
            "Confirmations" => {
                let suppressed = self.draft.confirmations.values().filter(|enabled| !**enabled).count();
                format!("{suppressed} hidden")
            }
            _ => return None,
        };
        Some(label)
    }

    /// Flips a switch, steps a choice to its next value, or resets the
    /// confirmations. Returns false for unknown keys.
    pub fn activate_setting(&mut self, setting_key: &str) -> bool {
        let flip = |position: TabPosition| match position {
            TabPosition::Top => TabPosition::Bottom,
            TabPosition::Bottom => TabPosition::Top,
        };

        match setting_key {
            "Application/ShowPath" => self.apply_change(|s| s.application.show_path ^= true),
            "Application/ShowMenubar" => self.apply_change(|s| s.application.show_menubar ^= true),
            "Application/ShowStatusbar" => self.apply_change(|s| s.application.show_statusbar ^= true),
            "Application/ToolButtonStyle" => self.apply_change(|s| {
                let styles = ToolButtonStyle::all();
                let current = styles
                    .iter()
                    .position(|style| *style == s.application.tool_button_style)
                    .unwrap_or(0);
                s.application.tool_button_style = styles[(current + 1) % styles.len()];
            }),
            "Application/ToolButtonSize" => self.apply_change(|s| {
                let current = TOOL_BUTTON_SIZES
                    .iter()
                    .position(|size| *size == s.application.tool_button_size)
                    .unwrap_or(0);
                s.application.tool_button_size = TOOL_BUTTON_SIZES[(current + 1) % TOOL_BUTTON_SIZES.len()];
            }),
            "Document/TabsVisible" => self.apply_change(|s| s.document.tabs_visible ^= true),
            "Document/TabsPosition" => self.apply_change(|s| s.document.tabs_position = flip(s.document.tabs_position)),
            "Document/TabsAutoHide" => self.apply_change(|s| s.document.tabs_auto_hide ^= true),
            "Document/SheetTabsVisible" => self.apply_change(|s| s.document.sheet_tabs_visible ^= true),
            "Document/SheetTabsPosition" => {
                self.apply_change(|s| s.document.sheet_tabs_position = flip(s.document.sheet_tabs_position))
            }
            "Document/SheetTabsAutoHide" => self.apply_change(|s| s.document.sheet_tabs_auto_hide ^= true),
            "Confirmations" => self.reset_confirmations(),
            _ => return false,
        }
        true
    }

    fn refilter(&mut self) {
        self.filtered_hits = search_settings(self.search_query.as_str());
        if let Some(first) = self.visible_categories().first()
            && !self.visible_categories().contains(&self.selected_category)
        {
            self.selected_category = *first;
        }
    }

    /// Centers the dialog in a client area of `width` by `height`.
    pub fn place(&mut self, width: f32, height: f32, dpi: f32) {
        let scale = (dpi / 96.0).max(1.0);
        let dialog_width = (PREFERRED_WIDTH * scale).min((width - MARGIN * 2.0).max(0.0));
        let dialog_height = (PREFERRED_HEIGHT * scale).min((height - MARGIN * 2.0).max(0.0));
        self.layout(
            Rect {
                x: ((width - dialog_width) / 2.0).max(0.0),
                y: ((height - dialog_height) / 2.0).max(0.0),
                width: dialog_width,
                height: dialog_height,
            },
            dpi,
        );
    }

    pub fn header_rect(&self) -> Rect {
        Rect {
            x: self.bounds.x + 16.0,
            y: self.bounds.y,
            width: (self.bounds.width - 32.0).max(0.0),
            height: HEADER_HEIGHT,
        }
    }

    pub fn search_rect(&self) -> Rect {
        Rect {
            x: self.bounds.x + 12.0,
            y: self.bounds.y + HEADER_HEIGHT,
            width: (self.bounds.width - 24.0).max(0.0),
            height: SEARCH_HEIGHT - 6.0,
        }
    }

    pub fn category_rect(&self, index: usize) -> Rect {
        Rect {
            x: self.bounds.x + 12.0,
            y: self.bounds.y + HEADER_HEIGHT + SEARCH_HEIGHT + 8.0 + (index as f32 * ROW_HEIGHT),
            width: CATEGORY_PANE_WIDTH - 24.0,
            height: ROW_HEIGHT,
        }
    }

    /// Row of the `index`th setting of the selected category.
    pub fn setting_rect(&self, index: usize) -> Rect {
        let list = self.list_rect();
        Rect {
            y: list.y + index as f32 * SETTING_ROW_HEIGHT,
            height: SETTING_ROW_HEIGHT,
            ..list
        }
    }

    pub fn ok_rect(&self) -> Rect {
        self.footer_button(1)
    }

    pub fn cancel_rect(&self) -> Rect {
        self.footer_button(0)
    }

    /// Footer buttons are laid out from the right edge.
    fn footer_button(&self, slot: usize) -> Rect {
        Rect {
            x: self.bounds.x + self.bounds.width - 12.0 - (slot as f32 + 1.0) * (BUTTON_WIDTH + 8.0),
            y: self.bounds.y + self.bounds.height - FOOTER_HEIGHT + 10.0,
            width: BUTTON_WIDTH,
            height: FOOTER_HEIGHT - 20.0,
        }
    }

    fn list_rect(&self) -> Rect {
        Rect {
            x: self.bounds.x + CATEGORY_PANE_WIDTH + 8.0,
            y: self.bounds.y + HEADER_HEIGHT + SEARCH_HEIGHT + 8.0,
            width: (self.bounds.width - CATEGORY_PANE_WIDTH - 20.0).max(0.0),
            height: (self.bounds.height - HEADER_HEIGHT - SEARCH_HEIGHT - FOOTER_HEIGHT - 12.0).max(0.0),
        }
    }

    fn click(&mut self, point: Point) -> bool {
        if self.ok_rect().contains(point) {
            self.accept();
            return true;
        }
        if self.cancel_rect().contains(point) {
            self.close();
            return true;
        }

        for (index, category) in self.visible_categories().into_iter().enumerate() {
            if self.category_rect(index).contains(point) {
                self.select_category(category);
                return true;
            }
        }

        let list = self.list_rect();
        if !list.contains(point) {
            return self.bounds.contains(point);
        }
        let key = self
            .visible_setting_hits()
            .into_iter()
            .enumerate()
            .find(|(index, _)| self.setting_rect(*index).contains(point))
            .map(|(_, hit)| hit.setting_key);
        if let Some(key) = key {
            self.activate_setting(key);
        }
        true
    }
}

impl UIComponent for PreferencesDialog {
    fn layout(&mut self, bounds: Rect, _dpi: f32) {
        self.bounds = bounds;
    }

    fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.visible {
            return false;
        }

        match event {
            InputEvent::KeyDown(vk) => match *vk {
                VK_ESCAPE => {
                    self.close();
                    true
                }
                VK_RETURN => {
                    self.accept();
                    true
                }
                VK_BACK => {
                    let mut query = self.search_query.clone();
                    query.pop();
                    self.set_search_query(query);
                    true
                }
                _ => false,
            },
            InputEvent::Char(ch) if !ch.is_control() => {
                let query = format!("{}{ch}", self.search_query);
                self.set_search_query(query);
                true
            }
            InputEvent::MouseDown(point) => self.click(*point),
            _ => false,
        }
    }

    fn hit_test(&self, point: Point) -> bool {
        self.visible && self.bounds.contains(point)
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_dialog() -> PreferencesDialog {
        let mut dialog = PreferencesDialog::new();
        let mut current = Settings::default();
        current.set_confirmation_enabled("ConfirmQuitApplication", false);
        dialog.open(current);
        dialog
    }

    #[test]
    fn typing_filters_categories() {
        let mut dialog = open_dialog();
        for ch in "sheet".chars() {
            assert!(dialog.handle_input(&InputEvent::Char(ch)));
        }

        assert_eq!(dialog.search_query(), "sheet");
        assert_eq!(dialog.visible_categories(), [SettingsCategory::Documents]);
        assert_eq!(dialog.selected_category(), SettingsCategory::Documents);
        assert_eq!(dialog.visible_setting_hits().len(), 3);

        dialog.set_search_query("menubar");
        assert_eq!(dialog.visible_categories(), [SettingsCategory::Appearance]);
    }

    #[test]
    fn escape_discards_the_draft() {
        let mut dialog = open_dialog();
        dialog.apply_change(|settings| settings.application.show_statusbar = false);
        assert!(dialog.is_dirty());

        dialog.handle_input(&InputEvent::KeyDown(VK_ESCAPE));
        assert!(!dialog.is_open());
        assert_eq!(dialog.take_outcome(), Some(PreferencesOutcome::Rejected));
    }

    #[test]
    fn accepting_hands_back_the_edited_draft() {
        let mut dialog = open_dialog();
        dialog.reset_confirmations();
        dialog.handle_input(&InputEvent::KeyDown(VK_RETURN));

        match dialog.take_outcome() {
            Some(PreferencesOutcome::Accepted(settings)) => {
                assert!(settings.confirmation_enabled("ConfirmQuitApplication"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(dialog.take_outcome(), None);
    }

    #[test]
    fn activating_settings_edits_the_draft() {
        let mut dialog = open_dialog();
        assert_eq!(dialog.value_label("Document/SheetTabsPosition").as_deref(), Some("Bottom"));
        assert_eq!(dialog.value_label("Confirmations").as_deref(), Some("1 hidden"));

        assert!(dialog.activate_setting("Document/SheetTabsPosition"));
        assert!(dialog.activate_setting("Application/ToolButtonSize"));
        assert!(dialog.activate_setting("Confirmations"));
        assert!(!dialog.activate_setting("Document/Unknown"));

        assert_eq!(dialog.draft().document.sheet_tabs_position, TabPosition::Top);
        assert_eq!(dialog.draft().application.tool_button_size, 16);
        assert_eq!(dialog.value_label("Confirmations").as_deref(), Some("0 hidden"));
    }

    #[test]
    fn every_catalog_entry_can_be_edited() {
        let dialog = open_dialog();
        for hit in search_settings("") {
            assert!(dialog.value_label(hit.setting_key).is_some(), "{}", hit.setting_key);
        }
    }

    fn placed_dialog() -> PreferencesDialog {
        let mut dialog = open_dialog();
        dialog.place(1200.0, 800.0, 96.0);
        dialog
    }

    fn center(rect: Rect) -> Point {
        Point {
            x: rect.x + rect.width / 2.0,
            y: rect.y + rect.height / 2.0,
        }
    }

    #[test]
    fn placement_centers_and_fits_the_client_area() {
        let dialog = placed_dialog();
        assert_eq!(
            dialog.bounds(),
            Rect {
                x: 220.0,
                y: 140.0,
                width: 760.0,
                height: 520.0
            }
        );

        let mut small = open_dialog();
        small.place(400.0, 300.0, 96.0);
        assert_eq!(small.bounds().width, 352.0);
        assert_eq!(small.bounds().height, 252.0);
    }

    #[test]
    fn clicking_a_category_selects_it() {
        let mut dialog = placed_dialog();
        let confirmations = dialog.category_rect(3);
        assert!(dialog.handle_input(&InputEvent::MouseDown(center(confirmations))));

        assert_eq!(dialog.selected_category(), SettingsCategory::Confirmations);
        assert_eq!(dialog.visible_setting_hits()[0].setting_key, "Confirmations");
    }

    #[test]
    fn clicking_a_setting_row_activates_it() {
        let mut dialog = placed_dialog();
        dialog.set_search_query("sheet tab position");
        assert_eq!(dialog.visible_setting_hits()[0].setting_key, "Document/SheetTabsPosition");

        assert!(dialog.handle_input(&InputEvent::MouseDown(center(dialog.setting_rect(0)))));
        assert_eq!(dialog.draft().document.sheet_tabs_position, TabPosition::Top);
        assert!(dialog.is_dirty());
    }

    #[test]
    fn footer_buttons_close_the_dialog() {
        let mut dialog = placed_dialog();
        dialog.handle_input(&InputEvent::MouseDown(center(dialog.ok_rect())));
        assert!(matches!(dialog.take_outcome(), Some(PreferencesOutcome::Accepted(_))));

        let mut dialog = placed_dialog();
        dialog.handle_input(&InputEvent::MouseDown(center(dialog.cancel_rect())));
        assert_eq!(dialog.take_outcome(), Some(PreferencesOutcome::Rejected));
    }

    #[test]
    fn clicks_outside_are_not_consumed() {
        let mut dialog = placed_dialog();
        assert!(!dialog.handle_input(&InputEvent::MouseDown(Point { x: 5.0, y: 5.0 })));
        assert!(dialog.is_open());
    }
}
