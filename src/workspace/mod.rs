pub mod window;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::{
    document::{
        DocumentUrl,
        model::{Document, DocumentEvent},
    },
    settings::schema::DocumentSettings,
    ui::{TabPosition, tabs::TabLabel},
};
use window::{DocumentWindow, WindowId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerEvent {
    TabsVisibleChanged(bool),
    TabsPositionChanged(TabPosition),
    TabsAutoHideChanged(bool),
    WindowAdded(WindowId),
    WindowClosed(WindowId),
    ActiveWindowChanged(Option<WindowId>),
    DocumentCountChanged(usize),
}

/// Tabbed container of document windows.
#[derive(Debug)]
pub struct DocumentManager {
    windows: Vec<DocumentWindow>,
    active: Option<WindowId>,
    next_id: WindowId,
    tabs_visible: bool,
    tabs_position: TabPosition,
    tabs_auto_hide: bool,
    home: Option<PathBuf>,
    events: Vec<ManagerEvent>,
}

impl Default for DocumentManager {
    fn default() -> Self {
        Self::new(&DocumentSettings::default(), None)
    }
}

impl DocumentManager {
    pub fn new(defaults: &DocumentSettings, home: Option<PathBuf>) -> Self {
        Self {
            windows: Vec::new(),
            active: None,
            next_id: 1,
            tabs_visible: defaults.tabs_visible,
            tabs_position: defaults.tabs_position,
            tabs_auto_hide: defaults.tabs_auto_hide,
            home,
            events: Vec::new(),
        }
    }

    pub fn take_events(&mut self) -> Vec<ManagerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Wraps `document` in a new window and adds it.
    pub fn add_document(&mut self, document: Document) -> WindowId {
        let id = self.next_id;
        self.next_id += 1;
        self.add_window(DocumentWindow::new(id, document, self.home.clone()))
    }

    /// Appends and activates `window`.
    pub fn add_window(&mut self, window: DocumentWindow) -> WindowId {
        let id = window.id();
        self.next_id = self.next_id.max(id + 1);
        self.windows.push(window);
        self.events.push(ManagerEvent::WindowAdded(id));
        self.events.push(ManagerEvent::DocumentCountChanged(self.count()));
        self.set_active(id);
        debug!(id, count = self.count(), "document window added");
        id
    }

    pub fn windows(&self) -> &[DocumentWindow] {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> impl Iterator<Item = &mut DocumentWindow> {
        self.windows.iter_mut()
    }

    pub fn count(&self) -> usize {
        self.windows.len()
    }

    pub fn window(&self, id: WindowId) -> Option<&DocumentWindow> {
        self.windows.iter().find(|window| window.id() == id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut DocumentWindow> {
        self.windows.iter_mut().find(|window| window.id() == id)
    }

    pub fn index_of(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|window| window.id() == id)
    }

    pub fn active_id(&self) -> Option<WindowId> {
        self.active
    }

    pub fn active(&self) -> Option<&DocumentWindow> {
        self.active.and_then(|id| self.window(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut DocumentWindow> {
        let id = self.active?;
        self.window_mut(id)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.and_then(|id| self.index_of(id))
    }

    pub fn set_active(&mut self, id: WindowId) -> bool {
        if self.active == Some(id) || self.index_of(id).is_none() {
            return false;
        }
        self.active = Some(id);
        self.events.push(ManagerEvent::ActiveWindowChanged(Some(id)));
        true
    }

    pub fn activate_next(&mut self) -> bool {
        match self.active_index() {
            Some(index) if self.count() > 1 => {
                let id = self.windows[(index + 1) % self.count()].id();
                self.set_active(id)
            }
            _ => false,
        }
    }

    pub fn activate_previous(&mut self) -> bool {
        match self.active_index() {
            Some(index) if self.count() > 1 => {
                let id = self.windows[(index + self.count() - 1) % self.count()].id();
                self.set_active(id)
            }
            _ => false,
        }
    }

    /// Window showing `url`. Untitled documents never match.
    pub fn find_by_url(&self, url: &DocumentUrl) -> Option<WindowId> {
        if url.is_empty() {
            return None;
        }
        self.windows
            .iter()
            .find(|window| window.url() == url)
            .map(DocumentWindow::id)
    }

    pub fn close_window(&mut self, id: WindowId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };

        let window = self.windows.remove(index);
        info!(id, url = %window.url(), "document closed");
        self.events.push(ManagerEvent::WindowClosed(id));
        self.events.push(ManagerEvent::DocumentCountChanged(self.count()));

        if self.active == Some(id) {
            self.active = index
                .checked_sub(1)
                .and_then(|previous| self.windows.get(previous))
                .or_else(|| self.windows.first())
                .map(DocumentWindow::id);
            self.events.push(ManagerEvent::ActiveWindowChanged(self.active));
        }
        true
    }

    pub fn close_active(&mut self) -> bool {
        match self.active {
            Some(id) => self.close_window(id),
            None => false,
        }
    }

    /// Closes every window but `keep`. Returns how many were closed.
    pub fn close_others(&mut self, keep: WindowId) -> usize {
        if self.index_of(keep).is_none() {
            return 0;
        }
        let others = self
            .windows
            .iter()
            .map(DocumentWindow::id)
            .filter(|id| *id != keep)
            .collect::<Vec<_>>();
        others.into_iter().filter(|id| self.close_window(*id)).count()
    }

    pub fn close_all(&mut self) -> usize {
        let ids = self.windows.iter().map(DocumentWindow::id).collect::<Vec<_>>();
        ids.into_iter().filter(|id| self.close_window(*id)).count()
    }

    /// Reorders the document tabs.
    pub fn move_window(&mut self, from: usize, to: usize) -> bool {
        if from >= self.count() || to >= self.count() || from == to {
            return false;
        }
        let window = self.windows.remove(from);
        self.windows.insert(to, window);
        true
    }

    /// Highest sequence number among the windows, other than `except`, whose
    /// caption reads `name`.
    pub fn latest_filename_sequence_number(&self, name: &str, except: WindowId) -> u32 {
        self.windows
            .iter()
            .filter(|window| window.id() != except && window::caption_name(window.url()) == name)
            .map(DocumentWindow::filename_sequence_number)
            .max()
            .unwrap_or(0)
    }

    /// Routes the pending notifications of one document to its window and
    /// hands them back for the application's own bookkeeping.
    pub fn process_document_events(&mut self, id: WindowId) -> Vec<DocumentEvent> {
        let Some(window) = self.window_mut(id) else {
            return Vec::new();
        };
        let events = window.document_mut().take_events();

        for event in &events {
            match event {
                DocumentEvent::UrlChanged(url) => {
                    let latest = self.latest_filename_sequence_number(&window::caption_name(url), id);
                    if let Some(window) = self.window_mut(id) {
                        window.document_url_changed(latest);
                    }
                }
                DocumentEvent::ModifiedChanged(modified) => {
                    if let Some(window) = self.window_mut(id) {
                        window.document_modified_changed(*modified);
                    }
                }
                DocumentEvent::Table(_) => {}
            }
        }
        events
    }

    pub fn tab_labels(&self) -> Vec<TabLabel> {
        self.windows.iter().map(DocumentWindow::tab_label).collect()
    }

    pub fn tabs_visible(&self) -> bool {
        self.tabs_visible
    }

    pub fn set_tabs_visible(&mut self, visible: bool) {
        if visible != self.tabs_visible {
            self.tabs_visible = visible;
            self.events.push(ManagerEvent::TabsVisibleChanged(visible));
        }
    }

    pub fn init_tabs_visible(&mut self) {
        self.events.push(ManagerEvent::TabsVisibleChanged(self.tabs_visible));
    }

    pub fn tabs_position(&self) -> TabPosition {
        self.tabs_position
    }

    pub fn set_tabs_position(&mut self, position: TabPosition) {
        if position != self.tabs_position {
            self.tabs_position = position;
            self.events.push(ManagerEvent::TabsPositionChanged(position));
        }
    }

    pub fn init_tabs_position(&mut self) {
        self.events.push(ManagerEvent::TabsPositionChanged(self.tabs_position));
    }

    pub fn tabs_auto_hide(&self) -> bool {
        self.tabs_auto_hide
    }

    pub fn set_tabs_auto_hide(&mut self, hide: bool) {
        if hide != self.tabs_auto_hide {
            self.tabs_auto_hide = hide;
            self.events.push(ManagerEvent::TabsAutoHideChanged(hide));
        }
    }

    pub fn init_tabs_auto_hide(&mut self) {
        self.events.push(ManagerEvent::TabsAutoHideChanged(self.tabs_auto_hide));
    }

    /// Whether the document tabs are actually drawn.
    pub fn tab_bar_shown(&self) -> bool {
        if self.count() <= 1 && self.tabs_auto_hide {
            false
        } else {
            self.tabs_visible
        }
    }

    /// Writes the document tab preferences back.
    pub fn save_settings(&self, settings: &mut DocumentSettings) {
        settings.tabs_visible = self.tabs_visible;
        settings.tabs_position = self.tabs_position;
        settings.tabs_auto_hide = self.tabs_auto_hide;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(manager: &mut DocumentManager, path: &str) -> WindowId {
        let id = manager.add_document(Document::default());
        if let Some(window) = manager.window_mut(id) {
            window.document_mut().set_url(DocumentUrl::from_local_file(path));
        }
        manager.process_document_events(id);
        id
    }

    fn untitled(manager: &mut DocumentManager) -> WindowId {
        let id = manager.add_document(Document::default());
        if let Some(window) = manager.window_mut(id) {
            window.document_mut().init_url();
        }
        manager.process_document_events(id);
        id
    }

    fn ids(manager: &DocumentManager) -> Vec<WindowId> {
        manager.windows().iter().map(DocumentWindow::id).collect()
    }

    #[test]
    fn added_windows_become_active() {
        let mut manager = DocumentManager::default();
        let a = untitled(&mut manager);
        let b = untitled(&mut manager);

        assert_eq!(manager.active_id(), Some(b));
        assert!(manager.set_active(a));
        assert!(!manager.set_active(a));
        assert!(!manager.set_active(99));
    }

    #[test]
    fn find_by_url_ignores_untitled_documents() {
        let mut manager = DocumentManager::default();
        let a = open(&mut manager, "/data/a.ods");
        untitled(&mut manager);

        assert_eq!(manager.find_by_url(&DocumentUrl::from_local_file("/data/a.ods")), Some(a));
        assert_eq!(manager.find_by_url(&DocumentUrl::Empty), None);
        assert_eq!(manager.find_by_url(&DocumentUrl::from_local_file("/data/b.ods")), None);
    }

    #[test]
    fn same_file_names_are_numbered() {
        let mut manager = DocumentManager::default();
        let first = open(&mut manager, "/a/x.txt");
        let second = open(&mut manager, "/b/x.txt");

        let first = manager.window(first).expect("first");
        let second = manager.window(second).expect("second");
        assert_eq!(first.filename_sequence_number(), 1);
        assert_eq!(second.filename_sequence_number(), 2);
        assert_eq!(second.window_caption(false), "x.txt (2)");
    }

    #[test]
    fn untitled_documents_are_numbered() {
        let mut manager = DocumentManager::default();
        let opened = (0..3).map(|_| untitled(&mut manager)).collect::<Vec<_>>();
        let captions = opened
            .into_iter()
            .filter_map(|id| manager.window(id).map(|w| w.window_caption(true)))
            .collect::<Vec<_>>();

        assert_eq!(captions, ["Untitled", "Untitled (2)", "Untitled (3)"]);
    }

    #[test]
    fn host_only_urls_share_the_untitled_numbering() {
        let mut manager = DocumentManager::default();
        untitled(&mut manager);
        let remote = untitled(&mut manager);
        if let Some(window) = manager.window_mut(remote) {
            window
                .document_mut()
                .set_url(DocumentUrl::from_user_input("https://example.org"));
        }
        manager.process_document_events(remote);

        let window = manager.window(remote).expect("remote window");
        assert_eq!(window.filename_sequence_number(), 2);
        assert_eq!(window.title(), "Untitled (2)");
    }

    #[test]
    fn closing_publishes_the_new_count() {
        let mut manager = DocumentManager::default();
        let a = untitled(&mut manager);
        untitled(&mut manager);
        manager.take_events();

        assert!(manager.close_window(a));
        assert_eq!(manager.count(), 1);
        let events = manager.take_events();
        assert!(events.contains(&ManagerEvent::DocumentCountChanged(1)));
        assert!(events.contains(&ManagerEvent::WindowClosed(a)));
    }

    #[test]
    fn closing_the_active_window_activates_its_neighbour() {
        let mut manager = DocumentManager::default();
        let a = untitled(&mut manager);
        let b = untitled(&mut manager);
        let c = untitled(&mut manager);

        manager.set_active(b);
        manager.close_active();
        assert_eq!(manager.active_id(), Some(a));

        manager.close_active();
        assert_eq!(manager.active_id(), Some(c));

        manager.close_active();
        assert_eq!(manager.active_id(), None);
        assert!(!manager.close_active());
    }

    #[test]
    fn close_others_keeps_only_the_given_window() {
        let mut manager = DocumentManager::default();
        let a = untitled(&mut manager);
        let b = untitled(&mut manager);
        let c = untitled(&mut manager);

        assert_eq!(manager.close_others(99), 0);
        assert_eq!(ids(&manager), [a, b, c]);

        assert_eq!(manager.close_others(b), 2);
        assert_eq!(ids(&manager), [b]);
        assert_eq!(manager.active_id(), Some(b));
    }

    #[test]
    fn close_all_empties_the_container() {
        let mut manager = DocumentManager::default();
        untitled(&mut manager);
        untitled(&mut manager);

        assert_eq!(manager.close_all(), 2);
        assert_eq!(manager.count(), 0);
        assert_eq!(manager.active_id(), None);
    }

    #[test]
    fn tab_bar_follows_auto_hide_and_visibility() {
        let mut manager = DocumentManager::default();
        manager.set_tabs_auto_hide(true);
        assert!(!manager.tab_bar_shown());

        untitled(&mut manager);
        assert!(!manager.tab_bar_shown());
        manager.set_tabs_auto_hide(false);
        assert!(manager.tab_bar_shown());

        manager.set_tabs_auto_hide(true);
        untitled(&mut manager);
        assert!(manager.tab_bar_shown());
        manager.set_tabs_visible(false);
        assert!(!manager.tab_bar_shown());
    }

    #[test]
    fn tab_properties_emit_on_change_and_on_init() {
        let mut manager = DocumentManager::default();
        manager.set_tabs_position(TabPosition::Top);
        assert!(manager.take_events().is_empty());

        manager.set_tabs_position(TabPosition::Bottom);
        manager.init_tabs_visible();
        assert_eq!(
            manager.take_events(),
            vec![
                ManagerEvent::TabsPositionChanged(TabPosition::Bottom),
                ManagerEvent::TabsVisibleChanged(true)
            ]
        );
    }

    #[test]
    fn modified_documents_mark_their_window() {
        let mut manager = DocumentManager::default();
        let id = untitled(&mut manager);
        if let Some(window) = manager.window_mut(id) {
            window.document_mut().set_modified(true);
        }

        let events = manager.process_document_events(id);
        assert_eq!(events, vec![DocumentEvent::ModifiedChanged(true)]);
        assert!(manager.window(id).is_some_and(DocumentWindow::is_window_modified));
        assert!(manager.tab_labels()[0].modified);
    }

    #[test]
    fn next_and_previous_wrap_around() {
        let mut manager = DocumentManager::default();
        let a = untitled(&mut manager);
        let b = untitled(&mut manager);

        assert!(manager.activate_next());
        assert_eq!(manager.active_id(), Some(a));
        assert!(manager.activate_previous());
        assert_eq!(manager.active_id(), Some(b));
    }
}
