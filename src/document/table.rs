use tracing::debug;

use crate::{settings::schema::DocumentSettings, ui::TabPosition};

/// Sheets a new document starts with.
pub const DEFAULT_SHEET_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    TabsVisibleChanged(bool),
    TabsPositionChanged(TabPosition),
    TabsAutoHideChanged(bool),
}

/// Sheet tab strip of a document. The sheets carry no cell data.
#[derive(Debug, Clone)]
pub struct TableDocument {
    sheets: Vec<Sheet>,
    current: usize,
    tabs_visible: bool,
    tabs_position: TabPosition,
    tabs_auto_hide: bool,
    events: Vec<TableEvent>,
}

impl Default for TableDocument {
    fn default() -> Self {
        Self::with_defaults(&DocumentSettings::default())
    }
}

impl TableDocument {
    /// Starts from the stored sheet tab preferences.
    pub fn with_defaults(defaults: &DocumentSettings) -> Self {
        Self {
            sheets: Vec::new(),
            current: 0,
            tabs_visible: defaults.sheet_tabs_visible,
            tabs_position: defaults.sheet_tabs_position,
            tabs_auto_hide: defaults.sheet_tabs_auto_hide,
            events: Vec::new(),
        }
    }

    pub fn take_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn tabs_visible(&self) -> bool {
        self.tabs_visible
    }

    pub fn set_tabs_visible(&mut self, visible: bool) {
        if visible != self.tabs_visible {
            self.tabs_visible = visible;
            self.events.push(TableEvent::TabsVisibleChanged(visible));
        }
    }

    pub fn init_tabs_visible(&mut self) {
        self.events.push(TableEvent::TabsVisibleChanged(self.tabs_visible));
    }

    pub fn tabs_position(&self) -> TabPosition {
        self.tabs_position
    }

    pub fn set_tabs_position(&mut self, position: TabPosition) {
        if position != self.tabs_position {
            self.tabs_position = position;
            self.events.push(TableEvent::TabsPositionChanged(position));
        }
    }

    pub fn init_tabs_position(&mut self) {
        self.events.push(TableEvent::TabsPositionChanged(self.tabs_position));
    }

    pub fn tabs_auto_hide(&self) -> bool {
        self.tabs_auto_hide
    }

    pub fn set_tabs_auto_hide(&mut self, hide: bool) {
        if hide != self.tabs_auto_hide {
            self.tabs_auto_hide = hide;
            self.events.push(TableEvent::TabsAutoHideChanged(hide));
        }
    }

    pub fn init_tabs_auto_hide(&mut self) {
        self.events.push(TableEvent::TabsAutoHideChanged(self.tabs_auto_hide));
    }

    /// Whether the sheet tabs are actually drawn.
    pub fn tab_bar_shown(&self) -> bool {
        if self.sheet_count() <= 1 && self.tabs_auto_hide {
            false
        } else {
            self.tabs_visible
        }
    }

    /// Fills an empty document with `count` sheets named "Sheet 1", "Sheet 2", ...
    pub fn add_sheets(&mut self, count: usize) {
        if !self.sheets.is_empty() {
            return;
        }
        self.sheets = (1..=count)
            .map(|number| Sheet {
                title: format!("Sheet {number}"),
            })
            .collect();
        self.current = 0;
        debug!(count, "sheets added");
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheets_closable(&self) -> bool {
        self.sheet_count() > 1
    }

    pub fn current_sheet(&self) -> usize {
        self.current
    }

    pub fn set_current_sheet(&mut self, index: usize) -> bool {
        if index >= self.sheets.len() || index == self.current {
            return false;
        }
        self.current = index;
        true
    }

    /// Refuses to close the last remaining sheet.
    pub fn close_sheet(&mut self, index: usize) -> bool {
        if !self.sheets_closable() || index >= self.sheets.len() {
            return false;
        }
        let sheet = self.sheets.remove(index);
        if self.current > index || self.current >= self.sheets.len() {
            self.current = self.current.saturating_sub(1);
        }
        debug!(title = %sheet.title, remaining = self.sheets.len(), "sheet closed");
        true
    }

    pub fn move_sheet(&mut self, from: usize, to: usize) -> bool {
        if from >= self.sheets.len() || to >= self.sheets.len() || from == to {
            return false;
        }

        let sheet = self.sheets.remove(from);
        self.sheets.insert(to, sheet);

        if self.current == from {
            self.current = to;
        } else if from < self.current && to >= self.current {
            self.current -= 1;
        } else if from > self.current && to <= self.current {
            self.current += 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(table: &TableDocument) -> Vec<&str> {
        table.sheets().iter().map(|sheet| sheet.title.as_str()).collect()
    }

    #[test]
    fn new_documents_get_three_numbered_sheets() {
        let mut table = TableDocument::default();
        table.add_sheets(DEFAULT_SHEET_COUNT);
        assert_eq!(titles(&table), ["Sheet 1", "Sheet 2", "Sheet 3"]);

        table.add_sheets(5);
        assert_eq!(table.sheet_count(), 3);
    }

    #[test]
    fn last_sheet_cannot_be_closed() {
        let mut table = TableDocument::default();
        table.add_sheets(2);

        assert!(table.close_sheet(0));
        assert_eq!(titles(&table), ["Sheet 2"]);
        assert!(!table.sheets_closable());
        assert!(!table.close_sheet(0));
        assert_eq!(table.sheet_count(), 1);
    }

    #[test]
    fn closing_before_the_current_sheet_keeps_it_selected() {
        let mut table = TableDocument::default();
        table.add_sheets(3);
        table.set_current_sheet(2);

        table.close_sheet(0);
        assert_eq!(table.current_sheet(), 1);
        assert_eq!(table.sheets()[table.current_sheet()].title, "Sheet 3");
    }

    #[test]
    fn moving_sheets_follows_the_current_one() {
        let mut table = TableDocument::default();
        table.add_sheets(3);

        assert!(table.move_sheet(0, 2));
        assert_eq!(titles(&table), ["Sheet 2", "Sheet 3", "Sheet 1"]);
        assert_eq!(table.current_sheet(), 2);
    }

    #[test]
    fn setters_emit_only_on_change() {
        let mut table = TableDocument::default();
        table.set_tabs_visible(true);
        table.set_tabs_position(TabPosition::Bottom);
        table.set_tabs_auto_hide(true);
        assert!(table.take_events().is_empty());

        table.set_tabs_position(TabPosition::Top);
        table.set_tabs_auto_hide(false);
        assert_eq!(
            table.take_events(),
            vec![
                TableEvent::TabsPositionChanged(TabPosition::Top),
                TableEvent::TabsAutoHideChanged(false)
            ]
        );
    }

    #[test]
    fn init_re_emits_the_loaded_values() {
        let defaults = DocumentSettings {
            sheet_tabs_visible: false,
            sheet_tabs_position: TabPosition::Top,
            sheet_tabs_auto_hide: false,
            ..DocumentSettings::default()
        };
        let mut table = TableDocument::with_defaults(&defaults);
        table.init_tabs_visible();
        table.init_tabs_position();
        table.init_tabs_auto_hide();

        assert_eq!(
            table.take_events(),
            vec![
                TableEvent::TabsVisibleChanged(false),
                TableEvent::TabsPositionChanged(TabPosition::Top),
                TableEvent::TabsAutoHideChanged(false)
            ]
        );
    }

    #[test]
    fn auto_hide_hides_a_single_sheet() {
        let mut table = TableDocument::default();
        table.add_sheets(1);
        assert!(!table.tab_bar_shown());

        table.set_tabs_auto_hide(false);
        assert!(table.tab_bar_shown());
        table.set_tabs_visible(false);
        assert!(!table.tab_bar_shown());
    }
}
