pub mod actions;
pub mod menus;

use std::{path::PathBuf, time::Instant};

use tracing::{debug, info, warn};

use crate::{
    clipboard::Clipboard,
    document::{
        DocumentUrl,
        model::{Document, DocumentEvent},
        table::{DEFAULT_SHEET_COUNT, TableEvent},
    },
    error::Result,
    settings::{
        SettingsStore,
        schema::{Settings, ShellState, WindowGeometry},
    },
    ui::{
        Rect, TabPosition, UIComponent,
        about::APPLICATION_NAME,
        confirmation::{ConfirmationDialog, ConfirmationRequest, DialogButton, Prompter},
        statusbar::{READY_MESSAGE, READY_TIMEOUT, StatusBar},
        tabs::{TabLabel, TabStrip, TabStripAction},
        toolbar::{ToolButtonStyle, ToolbarDock, ToolbarId},
    },
    workspace::{
        DocumentManager, ManagerEvent,
        window::{DocumentWindow, WindowAction, WindowId, WindowRequest},
    },
};
use actions::{ActionId, ActionRegistry};
use menus::{Menu, default_toolbars, menu_bar};

/// Work only the platform host can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellRequest {
    ShowAbout,
    ShowColophon,
    ShowPreferences,
    ShowOpenDialog,
    /// Close the main window as its close button would, so the host can
    /// record the geometry before `request_quit` runs.
    Close,
    Exit,
}

/// The main window: menus, toolbars, the document area and the status bar.
pub struct ApplicationWindow {
    store: SettingsStore,
    actions: ActionRegistry,
    menus: Vec<Menu>,
    toolbars: ToolbarDock,
    documents: DocumentManager,
    document_tabs: TabStrip,
    sheet_tabs: TabStrip,
    statusbar: StatusBar,
    geometry: Option<WindowGeometry>,
    title: String,
    window_modified: bool,
    requests: Vec<ShellRequest>,
}

impl ApplicationWindow {
    pub fn new(store: SettingsStore, home: Option<PathBuf>, now: Instant) -> Self {
        let documents = DocumentManager::new(&store.settings().document, home);
        let mut window = Self {
            store,
            actions: ActionRegistry::new(),
            menus: menu_bar(),
            toolbars: ToolbarDock::new(default_toolbars()),
            documents,
            document_tabs: TabStrip::new(TabPosition::Top),
            sheet_tabs: TabStrip::new(TabPosition::Bottom),
            statusbar: StatusBar::new(),
            geometry: None,
            title: String::new(),
            window_modified: false,
            requests: Vec::new(),
        };
        window.document_tabs.show_new_tab_button = true;

        window.load_settings();
        window.document_activated();
        window.document_count_changed(0);
        window.statusbar.show_message(READY_MESSAGE, READY_TIMEOUT, now);
        window.pump_events();
        window
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    pub fn toolbars(&self) -> &ToolbarDock {
        &self.toolbars
    }

    pub fn toolbars_mut(&mut self) -> &mut ToolbarDock {
        &mut self.toolbars
    }

    pub fn documents(&self) -> &DocumentManager {
        &self.documents
    }

    pub fn document_tabs(&self) -> &TabStrip {
        &self.document_tabs
    }

    pub fn document_tabs_mut(&mut self) -> &mut TabStrip {
        &mut self.document_tabs
    }

    pub fn sheet_tabs(&self) -> &TabStrip {
        &self.sheet_tabs
    }

    pub fn sheet_tabs_mut(&mut self) -> &mut TabStrip {
        &mut self.sheet_tabs
    }

    pub fn statusbar(&self) -> &StatusBar {
        &self.statusbar
    }

    pub fn take_requests(&mut self) -> Vec<ShellRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn geometry(&self) -> Option<WindowGeometry> {
        self.geometry
    }

    /// Records the placement the host window currently has.
    pub fn set_geometry(&mut self, geometry: WindowGeometry) {
        if geometry.is_usable() {
            self.geometry = Some(geometry);
        }
    }

    pub fn is_menubar_visible(&self) -> bool {
        self.actions.is_checked(ActionId::ShowMenubar)
    }

    pub fn is_statusbar_visible(&self) -> bool {
        self.statusbar.is_visible()
    }

    pub fn is_full_screen(&self) -> bool {
        self.actions.is_checked(ActionId::FullScreen)
    }

    pub fn is_window_modified(&self) -> bool {
        self.window_modified
    }

    /// Caption with the modified placeholder resolved.
    pub fn window_title(&self) -> String {
        if self.title.is_empty() {
            return APPLICATION_NAME.to_string();
        }
        let marker = if self.window_modified { "*" } else { "" };
        self.title.replace("[*]", marker).trim_end().to_string()
    }

    /// Stacks the toolbar dock, the document tabs, the sheet tabs and the
    /// status bar inside a client area of `width` by `height`.
    pub fn layout(&mut self, width: f32, height: f32, dpi: f32) {
        self.toolbars.layout(
            Rect {
                x: 0.0,
                y: 0.0,
                width,
                height,
            },
            dpi,
        );
        let dock_h = self.toolbars.required_height();
        self.statusbar.layout(
            Rect {
                x: 0.0,
                y: 0.0,
                width,
                height,
            },
            dpi,
        );
        let status_h = self.statusbar.height();

        self.document_tabs.layout(
            Rect {
                x: 0.0,
                y: dock_h,
                width,
                height: (height - dock_h - status_h).max(0.0),
            },
            dpi,
        );
        let pages = self.document_tabs.content_rect();
        self.sheet_tabs.layout(pages, dpi);
    }

    /// Where the active sheet's cells go once both tab strips took their edges.
    pub fn sheet_area(&self) -> Rect {
        if self.documents.count() == 0 {
            return Rect::default();
        }
        self.sheet_tabs.content_rect()
    }

    //
    // Settings
    //

    fn load_settings(&mut self) {
        let settings = self.store.settings().clone();
        let application = &settings.application;

        self.geometry = application.geometry;

        let state = application.state.clone().unwrap_or_default();
        for id in ToolbarId::all() {
            let visible = state
                .toolbars
                .get(&id)
                .copied()
                .unwrap_or_else(|| id.visible_by_default());
            self.set_toolbar_visible(id, visible);
        }
        self.set_full_screen(state.full_screen);

        self.actions.set_checked(ActionId::ShowPath, application.show_path);
        self.set_menubar_visible(application.show_menubar);
        self.set_statusbar_visible(application.show_statusbar);
        self.set_tool_button_style(application.tool_button_style);
        self.set_tool_button_size(application.tool_button_size);

        let document = &settings.document;
        self.documents.set_tabs_visible(document.tabs_visible);
        self.documents.set_tabs_position(document.tabs_position);
        self.documents.set_tabs_auto_hide(document.tabs_auto_hide);
        self.documents.init_tabs_visible();
        self.documents.init_tabs_position();
        self.documents.init_tabs_auto_hide();

        self.update_window_title();
        self.pump_events();
    }

    /// The persisted preferences with the window's current state folded in.
    pub fn current_settings(&self) -> Settings {
        let mut settings = self.store.settings().clone();

        let application = &mut settings.application;
        application.geometry = self.geometry;
        application.state = Some(ShellState {
            toolbars: ToolbarId::all()
                .into_iter()
                .map(|id| (id, self.toolbars.is_toolbar_visible(id)))
                .collect(),
            full_screen: self.is_full_screen(),
        });
        application.show_path = self.actions.is_checked(ActionId::ShowPath);
        application.show_menubar = self.is_menubar_visible();
        application.show_statusbar = self.is_statusbar_visible();
        application.tool_button_style = self.toolbars.style;
        application.tool_button_size = self.toolbars.icon_size;

        self.documents.save_settings(&mut settings.document);
        if let Some(window) = self.documents.active() {
            let table = window.document().table();
            settings.document.sheet_tabs_visible = table.tabs_visible();
            settings.document.sheet_tabs_position = table.tabs_position();
            settings.document.sheet_tabs_auto_hide = table.tabs_auto_hide();
        }
        settings
    }

    pub fn save_settings(&mut self) -> Result<()> {
        let settings = self.current_settings();
        self.store.update(|stored| *stored = settings);
        self.store.save()
    }

    /// Takes over settings accepted in the preferences dialog.
    pub fn apply_preferences(&mut self, settings: Settings) -> Result<()> {
        let geometry = self.geometry;
        self.store.update(|stored| *stored = settings.migrate());
        self.load_settings();
        if geometry.is_some() {
            self.geometry = geometry;
        }
        info!("preferences applied");
        self.store.save()
    }

    /// Expires the status message and writes pending settings. Returns
    /// true when something needs a repaint.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Err(err) = self.store.flush_if_due() {
            warn!(%err, "failed to write settings");
        }
        self.statusbar.tick(now)
    }

    //
    // Documents
    //

    fn create_document(&self) -> Document {
        let mut document = Document::new(&self.store.settings().document);
        let table = document.table_mut();
        table.add_sheets(DEFAULT_SHEET_COUNT);
        table.init_tabs_visible();
        table.init_tabs_position();
        table.init_tabs_auto_hide();
        document.init_modified();
        document.init_url();
        document
    }

    pub fn new_document(&mut self) -> WindowId {
        let id = self.documents.add_document(self.create_document());
        info!(id, "new document created");
        self.pump_events();
        id
    }

    /// Shows `url`, reusing the window that already displays it.
    pub fn open_document(&mut self, url: DocumentUrl) -> WindowId {
        if let Some(id) = self.documents.find_by_url(&url) {
            debug!(id, url = %url, "document already open");
            self.documents.set_active(id);
            self.pump_events();
            return id;
        }

        let mut document = self.create_document();
        document.set_url(url.clone());
        let id = self.documents.add_document(document);
        info!(id, url = %url, "document opened");
        self.pump_events();
        id
    }

    pub fn open_documents(&mut self, urls: impl IntoIterator<Item = DocumentUrl>) -> Vec<WindowId> {
        urls.into_iter().map(|url| self.open_document(url)).collect()
    }

    pub fn close_document(&mut self) -> bool {
        let closed = self.documents.close_active();
        self.pump_events();
        closed
    }

    pub fn close_other_documents(&mut self, prompter: &mut dyn Prompter) -> usize {
        match self.documents.active_id() {
            Some(keep) => self.close_documents_except(keep, &ConfirmationRequest::close_other_documents(), prompter),
            None => 0,
        }
    }

    pub fn close_all_documents(&mut self, prompter: &mut dyn Prompter) -> usize {
        if self.documents.count() == 0 {
            return 0;
        }
        if !self.confirm(prompter, &ConfirmationRequest::close_all_documents()) {
            return 0;
        }
        let closed = self.documents.close_all();
        self.pump_events();
        closed
    }

    fn close_documents_except(
        &mut self,
        keep: WindowId,
        request: &ConfirmationRequest,
        prompter: &mut dyn Prompter,
    ) -> usize {
        if self.documents.count() < 2 || !self.confirm(prompter, request) {
            return 0;
        }
        let closed = self.documents.close_others(keep);
        self.pump_events();
        closed
    }

    /// Asks before quitting while documents are open, then closes them and
    /// writes the settings. Returns false when the user cancelled.
    pub fn request_quit(&mut self, prompter: &mut dyn Prompter) -> bool {
        if self.documents.count() >= 1 && !self.confirm(prompter, &ConfirmationRequest::quit_application()) {
            info!("quit cancelled");
            return false;
        }

        let settings = self.current_settings();
        self.documents.close_all();
        self.pump_events();

        self.store.update(|stored| *stored = settings);
        if let Err(err) = self.store.save() {
            warn!(%err, "failed to save settings on quit");
        }
        self.requests.push(ShellRequest::Exit);
        true
    }

    fn confirm(&mut self, prompter: &mut dyn Prompter, request: &ConfirmationRequest) -> bool {
        let answer = ConfirmationDialog::warning(prompter, &mut self.store, request);
        debug!(id = request.id, ?answer, "confirmation answered");
        answer == DialogButton::Yes
    }

    //
    // Actions
    //

    /// Runs an application action. Disabled actions are ignored.
    pub fn trigger(
        &mut self,
        action: ActionId,
        prompter: &mut dyn Prompter,
        clipboard: &mut dyn Clipboard,
    ) -> Result<()> {
        if !self.actions.is_enabled(action) {
            debug!(?action, "ignoring disabled action");
            return Ok(());
        }

        match action {
            ActionId::About => self.requests.push(ShellRequest::ShowAbout),
            ActionId::Colophon => self.requests.push(ShellRequest::ShowColophon),
            ActionId::Preferences => self.requests.push(ShellRequest::ShowPreferences),
            ActionId::Quit => self.requests.push(ShellRequest::Close),
            ActionId::New => {
                self.new_document();
            }
            ActionId::Open => self.requests.push(ShellRequest::ShowOpenDialog),
            ActionId::CopyPath => {
                if let Some(window) = self.documents.active() {
                    window.document().copy_path_to_clipboard(clipboard)?;
                }
            }
            ActionId::CopyFilename => {
                if let Some(window) = self.documents.active() {
                    window.document().copy_filename_to_clipboard(clipboard)?;
                }
            }
            ActionId::Close => {
                self.close_document();
            }
            ActionId::CloseOther => {
                self.close_other_documents(prompter);
            }
            ActionId::CloseAll => {
                self.close_all_documents(prompter);
            }
            ActionId::ShowPath => {
                let checked = !self.actions.is_checked(ActionId::ShowPath);
                self.actions.set_checked(ActionId::ShowPath, checked);
                self.update_window_title();
            }
            ActionId::ShowMenubar => self.set_menubar_visible(!self.is_menubar_visible()),
            ActionId::ShowToolbar(id) => self.set_toolbar_visible(id, !self.toolbars.is_toolbar_visible(id)),
            ActionId::ToolButtonStyle(style) => self.set_tool_button_style(style),
            ActionId::ToolButtonSize(pixels) => self.set_tool_button_size(pixels),
            ActionId::DocumentTabsVisible => {
                let visible = !self.documents.tabs_visible();
                self.documents.set_tabs_visible(visible);
            }
            ActionId::DocumentTabsPosition(position) => self.documents.set_tabs_position(position),
            ActionId::DocumentTabsAutoHide => {
                let hide = !self.documents.tabs_auto_hide();
                self.documents.set_tabs_auto_hide(hide);
            }
            ActionId::SheetTabsVisible => {
                let visible = !self.actions.is_checked(ActionId::SheetTabsVisible);
                self.actions.set_checked(ActionId::SheetTabsVisible, visible);
                if let Some(window) = self.documents.active_mut() {
                    window.document_mut().table_mut().set_tabs_visible(visible);
                }
            }
            ActionId::SheetTabsPosition(position) => {
                self.actions.set_checked(ActionId::SheetTabsPosition(position), true);
                if let Some(window) = self.documents.active_mut() {
                    window.document_mut().table_mut().set_tabs_position(position);
                }
            }
            ActionId::SheetTabsAutoHide => {
                let hide = !self.actions.is_checked(ActionId::SheetTabsAutoHide);
                self.actions.set_checked(ActionId::SheetTabsAutoHide, hide);
                if let Some(window) = self.documents.active_mut() {
                    window.document_mut().table_mut().set_tabs_auto_hide(hide);
                }
            }
            ActionId::ShowStatusbar => self.set_statusbar_visible(!self.is_statusbar_visible()),
            ActionId::FullScreen => self.set_full_screen(!self.is_full_screen()),
        }

        self.pump_events();
        Ok(())
    }

    /// Runs an entry of a document window's system menu.
    pub fn trigger_window_action(
        &mut self,
        id: WindowId,
        action: WindowAction,
        prompter: &mut dyn Prompter,
        clipboard: &mut dyn Clipboard,
    ) -> Result<()> {
        let request = self
            .documents
            .window_mut(id)
            .and_then(|window| window.trigger(action));
        if let Some(request) = request {
            self.handle_window_request(request, prompter, clipboard)?;
        }
        self.pump_events();
        Ok(())
    }

    fn handle_window_request(
        &mut self,
        request: WindowRequest,
        prompter: &mut dyn Prompter,
        clipboard: &mut dyn Clipboard,
    ) -> Result<()> {
        match request {
            WindowRequest::Close(id) => {
                self.documents.close_window(id);
            }
            WindowRequest::CloseOthers(id) => {
                self.close_documents_except(id, &ConfirmationRequest::close_documents_except_this(), prompter);
            }
            WindowRequest::CopyPath(id) => {
                if let Some(window) = self.documents.window(id) {
                    window.document().copy_path_to_clipboard(clipboard)?;
                }
            }
            WindowRequest::CopyFilename(id) => {
                if let Some(window) = self.documents.window(id) {
                    window.document().copy_filename_to_clipboard(clipboard)?;
                }
            }
        }
        Ok(())
    }

    /// Applies a click on the document tabs.
    pub fn handle_document_tab(&mut self, action: TabStripAction) {
        let id_at = |documents: &DocumentManager, index: usize| documents.windows().get(index).map(DocumentWindow::id);
        match action {
            TabStripAction::Activate(index) => {
                if let Some(id) = id_at(&self.documents, index) {
                    self.documents.set_active(id);
                }
            }
            TabStripAction::Close(index) => {
                if let Some(id) = id_at(&self.documents, index) {
                    self.documents.close_window(id);
                }
            }
            TabStripAction::Reorder { from, to } => {
                self.documents.move_window(from, to);
            }
            TabStripAction::NewTab => {
                self.new_document();
            }
        }
        self.pump_events();
    }

    /// Activates the next document tab, or the previous one when `forward`
    /// is false. Wraps around at either end.
    pub fn cycle_documents(&mut self, forward: bool) -> bool {
        let changed = if forward {
            self.documents.activate_next()
        } else {
            self.documents.activate_previous()
        };
        self.pump_events();
        changed
    }

    /// Applies a click on the active document's sheet tabs.
    pub fn handle_sheet_tab(&mut self, action: TabStripAction) {
        if let Some(window) = self.documents.active_mut() {
            let document = window.document_mut();
            let table = document.table_mut();
            let edited = match action {
                TabStripAction::Activate(index) => {
                    table.set_current_sheet(index);
                    false
                }
                TabStripAction::Close(index) => table.close_sheet(index),
                TabStripAction::Reorder { from, to } => table.move_sheet(from, to),
                TabStripAction::NewTab => false,
            };
            // Removing or reordering sheets edits the document.
            if edited && !document.is_modified() {
                debug!(?action, "sheet change modified the document");
                document.set_modified(true);
            }
        }
        self.pump_events();
    }

    //
    // Shell state
    //

    fn set_menubar_visible(&mut self, visible: bool) {
        self.actions.set_checked(ActionId::ShowMenubar, visible);
    }

    fn set_statusbar_visible(&mut self, visible: bool) {
        self.actions.set_checked(ActionId::ShowStatusbar, visible);
        self.statusbar.set_visible(visible);
    }

    fn set_toolbar_visible(&mut self, id: ToolbarId, visible: bool) {
        self.actions.set_checked(ActionId::ShowToolbar(id), visible);
        self.toolbars.set_toolbar_visible(id, visible);
    }

    fn set_tool_button_style(&mut self, style: ToolButtonStyle) {
        self.actions.set_checked(ActionId::ToolButtonStyle(style), true);
        self.toolbars.set_style(style);
    }

    fn set_tool_button_size(&mut self, pixels: u16) {
        self.actions.set_checked(ActionId::ToolButtonSize(pixels), true);
        self.toolbars.set_icon_size(pixels);
    }

    fn set_full_screen(&mut self, full_screen: bool) {
        self.actions.set_full_screen(full_screen);
    }

    //
    // Notifications
    //

    /// Delivers every pending manager and document notification until none
    /// are left, then refreshes the toolbars and tab strips.
    pub fn pump_events(&mut self) {
        loop {
            let manager_events = self.documents.take_events();
            let ids = self
                .documents
                .windows()
                .iter()
                .map(DocumentWindow::id)
                .collect::<Vec<_>>();
            let document_events = ids
                .into_iter()
                .flat_map(|id| {
                    self.documents
                        .process_document_events(id)
                        .into_iter()
                        .map(move |event| (id, event))
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();

            if manager_events.is_empty() && document_events.is_empty() {
                break;
            }
            for event in manager_events {
                self.on_manager_event(event);
            }
            for (id, event) in document_events {
                self.on_document_event(id, event);
            }
        }

        self.toolbars.sync_actions(&self.actions);
        self.sync_tab_strips();
    }

    fn on_manager_event(&mut self, event: ManagerEvent) {
        match event {
            ManagerEvent::TabsVisibleChanged(visible) => {
                self.actions.set_checked(ActionId::DocumentTabsVisible, visible);
            }
            ManagerEvent::TabsPositionChanged(position) => {
                self.actions.set_checked(ActionId::DocumentTabsPosition(position), true);
            }
            ManagerEvent::TabsAutoHideChanged(hide) => {
                self.actions.set_checked(ActionId::DocumentTabsAutoHide, hide);
            }
            ManagerEvent::WindowAdded(id) | ManagerEvent::WindowClosed(id) => {
                debug!(id, ?event, "document area changed");
            }
            ManagerEvent::ActiveWindowChanged(_) => self.document_activated(),
            ManagerEvent::DocumentCountChanged(count) => self.document_count_changed(count),
        }
    }

    fn on_document_event(&mut self, id: WindowId, event: DocumentEvent) {
        if self.documents.active_id() != Some(id) {
            return;
        }
        match event {
            DocumentEvent::UrlChanged(url) => {
                self.update_window_title();
                self.enable_file_actions(!url.is_empty());
            }
            DocumentEvent::ModifiedChanged(modified) => self.window_modified = modified,
            DocumentEvent::Table(TableEvent::TabsVisibleChanged(visible)) => {
                self.actions.set_checked(ActionId::SheetTabsVisible, visible);
            }
            DocumentEvent::Table(TableEvent::TabsPositionChanged(position)) => {
                self.actions.set_checked(ActionId::SheetTabsPosition(position), true);
            }
            DocumentEvent::Table(TableEvent::TabsAutoHideChanged(hide)) => {
                self.actions.set_checked(ActionId::SheetTabsAutoHide, hide);
            }
        }
    }

    fn document_count_changed(&mut self, count: usize) {
        for window in self.documents.windows_mut() {
            window.document_count_changed(count);
        }
        self.statusbar.set_document_count(count);
        self.actions.set_enabled(ActionId::CloseOther, count >= 2);
    }

    fn document_activated(&mut self) {
        let active = self.documents.active().map(|window| {
            let table = window.document().table();
            (
                window.is_window_modified(),
                table.tabs_visible(),
                table.tabs_position(),
                table.tabs_auto_hide(),
                !window.url().is_empty(),
            )
        });
        let (modified, visible, position, auto_hide, has_url) =
            active.unwrap_or((false, true, TabPosition::Bottom, true, false));

        self.window_modified = modified;
        self.update_window_title();

        self.actions.set_checked(ActionId::SheetTabsVisible, visible);
        self.actions.set_checked(ActionId::SheetTabsPosition(position), true);
        self.actions.set_checked(ActionId::SheetTabsAutoHide, auto_hide);

        self.enable_actions(active.is_some());
        self.enable_file_actions(has_url);
    }

    fn enable_actions(&mut self, enabled: bool) {
        self.actions.set_enabled(ActionId::Close, enabled);
        self.actions.set_enabled(ActionId::CloseAll, enabled);
    }

    fn enable_file_actions(&mut self, enabled: bool) {
        self.actions.set_enabled(ActionId::CopyPath, enabled);
        self.actions.set_enabled(ActionId::CopyFilename, enabled);
    }

    fn update_window_title(&mut self) {
        let path_visible = self.actions.is_checked(ActionId::ShowPath);
        self.title = self
            .documents
            .active()
            .map(|window| format!("{} [*]", window.window_caption(path_visible)))
            .unwrap_or_default();
    }

    fn sync_tab_strips(&mut self) {
        self.document_tabs.set_position(self.documents.tabs_position());
        self.document_tabs.set_visible(self.documents.tab_bar_shown());
        self.document_tabs
            .sync(self.documents.tab_labels(), self.documents.active_index().unwrap_or(0));

        match self.documents.active() {
            Some(window) => {
                let table = window.document().table();
                self.sheet_tabs.set_position(table.tabs_position());
                self.sheet_tabs.set_visible(table.tab_bar_shown());
                self.sheet_tabs.closable = table.sheets_closable();
                let labels = table
                    .sheets()
                    .iter()
                    .map(|sheet| TabLabel::new(sheet.title.clone()))
                    .collect();
                self.sheet_tabs.sync(labels, table.current_sheet());
            }
            None => {
                self.sheet_tabs.set_visible(false);
                self.sheet_tabs.sync(Vec::new(), 0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{
        clipboard::MemoryClipboard,
        ui::confirmation::{
            CONFIRM_CLOSE_ALL_DOCUMENTS, CONFIRM_CLOSE_OTHER_DOCUMENTS, CONFIRM_QUIT_APPLICATION, PromptReply,
            testing::ScriptedPrompter,
        },
    };

    fn app_in(dir: &Path) -> ApplicationWindow {
        let store = SettingsStore::with_path(dir.join("settings.json"));
        ApplicationWindow::new(store, Some(PathBuf::from("/home/ana")), Instant::now())
    }

    fn local(path: &str) -> DocumentUrl {
        DocumentUrl::from_local_file(path)
    }

    fn active_title(app: &ApplicationWindow) -> String {
        app.documents()
            .active()
            .map(|window| window.title().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn starts_empty_and_ready() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = app_in(dir.path());

        assert_eq!(app.documents().count(), 0);
        assert_eq!(app.window_title(), "Tabelo");
        assert_eq!(app.statusbar().left_text(), "Ready");
        assert_eq!(app.statusbar().right_text(), "0 documents");
        assert!(!app.actions().is_enabled(ActionId::Close));
        assert!(!app.actions().is_enabled(ActionId::CloseAll));
        assert!(!app.actions().is_enabled(ActionId::CloseOther));
        assert!(!app.actions().is_enabled(ActionId::CopyPath));
        assert!(app.actions().is_checked(ActionId::SheetTabsVisible));
        assert!(app.actions().is_checked(ActionId::SheetTabsPosition(TabPosition::Bottom)));
    }

    #[test]
    fn ready_message_expires() {
        let dir = tempfile::tempdir().expect("tempdir");
        let now = Instant::now();
        let store = SettingsStore::with_path(dir.path().join("settings.json"));
        let mut app = ApplicationWindow::new(store, None, now);

        assert!(!app.tick(now));
        assert!(app.tick(now + READY_TIMEOUT));
        assert_eq!(app.statusbar().left_text(), "");
    }

    #[test]
    fn untitled_documents_are_numbered() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());

        app.new_document();
        assert_eq!(active_title(&app), "Untitled");
        app.new_document();
        assert_eq!(active_title(&app), "Untitled (2)");
        app.new_document();
        assert_eq!(active_title(&app), "Untitled (3)");
        assert_eq!(app.window_title(), "Untitled (3)");
    }

    #[test]
    fn same_file_names_are_numbered_unless_the_path_shows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());

        app.open_document(local("/data/a/report.csv"));
        let second = app.open_document(local("/data/b/report.csv"));

        assert_eq!(active_title(&app), "report.csv (2)");
        assert_eq!(app.window_title(), "/data/b/report.csv");

        let window = app.documents().window(second).expect("window");
        assert_eq!(window.window_caption(false), "report.csv (2)");
    }

    #[test]
    fn home_is_abbreviated_in_the_title() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());

        app.open_document(local("/home/ana/sheets/budget.ods"));
        assert_eq!(
            app.window_title(),
            format!("~{}sheets/budget.ods", std::path::MAIN_SEPARATOR)
        );

        let (mut prompter, mut clipboard) = (ScriptedPrompter::default(), MemoryClipboard::default());
        app.trigger(ActionId::ShowPath, &mut prompter, &mut clipboard)
            .expect("show path");
        assert_eq!(app.window_title(), "budget.ods");
    }

    #[test]
    fn reopening_activates_the_existing_window() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());

        let first = app.open_document(local("/data/one.csv"));
        app.open_document(local("/data/two.csv"));
        let again = app.open_document(local("/data/one.csv"));

        assert_eq!(first, again);
        assert_eq!(app.documents().count(), 2);
        assert_eq!(app.documents().active_id(), Some(first));
    }

    #[test]
    fn modified_documents_mark_the_title() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let id = app.open_document(local("/data/one.csv"));

        app.handle_sheet_tab(TabStripAction::Activate(1));
        assert!(!app.is_window_modified());

        app.handle_sheet_tab(TabStripAction::Close(2));
        assert!(app.is_window_modified());
        assert_eq!(app.window_title(), "/data/one.csv *");
        assert_eq!(app.documents().window(id).and_then(DocumentWindow::icon), Some("document-save"));
    }

    #[test]
    fn action_enablement_follows_the_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());

        app.new_document();
        assert!(app.actions().is_enabled(ActionId::Close));
        assert!(app.actions().is_enabled(ActionId::CloseAll));
        assert!(!app.actions().is_enabled(ActionId::CloseOther));
        assert!(!app.actions().is_enabled(ActionId::CopyPath));

        app.open_document(local("/data/one.csv"));
        assert!(app.actions().is_enabled(ActionId::CloseOther));
        assert!(app.actions().is_enabled(ActionId::CopyPath));
        assert!(app.actions().is_enabled(ActionId::CopyFilename));
        assert_eq!(app.statusbar().right_text(), "2 documents");

        app.close_document();
        assert!(!app.actions().is_enabled(ActionId::CloseOther));
        assert!(!app.actions().is_enabled(ActionId::CopyPath));
        assert_eq!(app.statusbar().right_text(), "1 document");
    }

    #[test]
    fn copy_actions_write_to_the_clipboard() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let (mut prompter, mut clipboard) = (ScriptedPrompter::default(), MemoryClipboard::default());

        app.new_document();
        app.trigger(ActionId::CopyPath, &mut prompter, &mut clipboard)
            .expect("disabled copy");
        assert!(clipboard.history.is_empty());

        app.open_document(local("/data/one.csv"));
        app.trigger(ActionId::CopyPath, &mut prompter, &mut clipboard)
            .expect("copy path");
        app.trigger(ActionId::CopyFilename, &mut prompter, &mut clipboard)
            .expect("copy filename");
        assert_eq!(clipboard.history, ["/data/one.csv", "one.csv"]);
    }

    #[test]
    fn cancelled_close_all_keeps_the_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        app.new_document();
        app.new_document();

        let mut prompter = ScriptedPrompter::new([PromptReply::cancel()]);
        assert_eq!(app.close_all_documents(&mut prompter), 0);
        assert_eq!(app.documents().count(), 2);
        assert_eq!(prompter.asked, [CONFIRM_CLOSE_ALL_DOCUMENTS]);
    }

    #[test]
    fn suppressed_confirmation_is_not_asked_again() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        for _ in 0..3 {
            app.new_document();
        }

        let mut prompter = ScriptedPrompter::new([PromptReply {
            button: DialogButton::Yes,
            do_not_show_again: true,
        }]);
        assert_eq!(app.close_other_documents(&mut prompter), 2);
        assert!(!app.store().settings().confirmation_enabled(CONFIRM_CLOSE_OTHER_DOCUMENTS));

        app.new_document();
        app.new_document();
        assert_eq!(app.close_other_documents(&mut prompter), 2);
        assert_eq!(prompter.asked, [CONFIRM_CLOSE_OTHER_DOCUMENTS]);
        assert_eq!(app.documents().count(), 1);
    }

    #[test]
    fn close_other_is_a_no_op_with_one_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        app.new_document();

        let mut prompter = ScriptedPrompter::default();
        assert_eq!(app.close_other_documents(&mut prompter), 0);
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn window_menu_closes_the_other_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let first = app.new_document();
        app.new_document();
        let (mut prompter, mut clipboard) = (ScriptedPrompter::new([PromptReply::yes()]), MemoryClipboard::default());

        app.trigger_window_action(first, WindowAction::CloseOther, &mut prompter, &mut clipboard)
            .expect("close other");

        assert_eq!(app.documents().count(), 1);
        assert_eq!(app.documents().active_id(), Some(first));
        assert_eq!(prompter.asked, [CONFIRM_CLOSE_OTHER_DOCUMENTS]);
    }

    #[test]
    fn quit_asks_only_while_documents_are_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());

        let mut prompter = ScriptedPrompter::new([PromptReply::cancel(), PromptReply::yes()]);
        assert!(app.request_quit(&mut prompter));
        assert!(prompter.asked.is_empty());
        assert_eq!(app.take_requests(), [ShellRequest::Exit]);

        app.new_document();
        assert!(!app.request_quit(&mut prompter));
        assert_eq!(app.documents().count(), 1);
        assert!(app.take_requests().is_empty());

        assert!(app.request_quit(&mut prompter));
        assert_eq!(app.documents().count(), 0);
        assert_eq!(prompter.asked, [CONFIRM_QUIT_APPLICATION, CONFIRM_QUIT_APPLICATION]);
    }

    #[test]
    fn document_cycling_wraps_and_retitles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        assert!(!app.cycle_documents(true));

        let first = app.open_document(local("/data/first.ods"));
        let second = app.open_document(local("/data/second.ods"));
        assert_eq!(app.documents().active_id(), Some(second));

        assert!(app.cycle_documents(true));
        assert_eq!(app.documents().active_id(), Some(first));
        assert!(app.window_title().contains("first.ods"));
        assert!(app.cycle_documents(false));
        assert_eq!(app.documents().active_id(), Some(second));
    }

    #[test]
    fn quit_action_closes_the_window_through_the_host() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        app.new_document();
        let (mut prompter, mut clipboard) = (ScriptedPrompter::default(), MemoryClipboard::default());

        app.trigger(ActionId::Quit, &mut prompter, &mut clipboard).expect("quit");
        assert_eq!(app.take_requests(), [ShellRequest::Close]);
        assert!(prompter.asked.is_empty());
        assert_eq!(app.documents().count(), 1);

        let moved = WindowGeometry {
            x: 40,
            y: 30,
            width: 1024,
            height: 700,
            maximized: false,
        };
        app.set_geometry(moved);
        assert!(app.request_quit(&mut ScriptedPrompter::new([PromptReply::yes()])));
        assert_eq!(app_in(dir.path()).geometry(), Some(moved));
    }

    #[test]
    fn document_tab_bar_auto_hides_with_one_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let (mut prompter, mut clipboard) = (ScriptedPrompter::default(), MemoryClipboard::default());

        app.new_document();
        assert!(app.document_tabs().is_visible());

        app.trigger(ActionId::DocumentTabsAutoHide, &mut prompter, &mut clipboard)
            .expect("auto hide");
        assert!(app.actions().is_checked(ActionId::DocumentTabsAutoHide));
        assert!(!app.document_tabs().is_visible());

        app.new_document();
        assert!(app.document_tabs().is_visible());

        app.trigger(ActionId::DocumentTabsVisible, &mut prompter, &mut clipboard)
            .expect("hide tabs");
        assert!(!app.actions().is_checked(ActionId::DocumentTabsVisible));
        assert!(!app.document_tabs().is_visible());
    }

    #[test]
    fn sheet_tab_actions_follow_the_active_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let (mut prompter, mut clipboard) = (ScriptedPrompter::default(), MemoryClipboard::default());

        let first = app.new_document();
        app.trigger(ActionId::SheetTabsPosition(TabPosition::Top), &mut prompter, &mut clipboard)
            .expect("sheet tabs on top");
        app.trigger(ActionId::SheetTabsVisible, &mut prompter, &mut clipboard)
            .expect("hide sheet tabs");
        assert!(!app.sheet_tabs().is_visible());

        app.new_document();
        assert!(app.actions().is_checked(ActionId::SheetTabsVisible));
        assert!(app.actions().is_checked(ActionId::SheetTabsPosition(TabPosition::Bottom)));
        assert_eq!(app.sheet_tabs().tabs.len(), 3);

        app.handle_document_tab(TabStripAction::Activate(0));
        assert_eq!(app.documents().active_id(), Some(first));
        assert!(!app.actions().is_checked(ActionId::SheetTabsVisible));
        assert!(app.actions().is_checked(ActionId::SheetTabsPosition(TabPosition::Top)));
    }

    #[test]
    fn sheet_tabs_keep_the_last_sheet() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        app.new_document();

        app.handle_sheet_tab(TabStripAction::Close(0));
        app.handle_sheet_tab(TabStripAction::Close(0));
        assert_eq!(app.sheet_tabs().tabs.len(), 1);
        assert!(!app.sheet_tabs().closable);
        assert!(!app.sheet_tabs().is_visible());

        app.handle_sheet_tab(TabStripAction::Close(0));
        assert_eq!(app.sheet_tabs().tabs.len(), 1);
    }

    #[test]
    fn full_screen_flips_the_action() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let (mut prompter, mut clipboard) = (ScriptedPrompter::default(), MemoryClipboard::default());

        app.trigger(ActionId::FullScreen, &mut prompter, &mut clipboard)
            .expect("full screen");
        assert!(app.is_full_screen());
        assert_eq!(
            app.actions().get(ActionId::FullScreen).map(|action| action.text.as_str()),
            Some("Exit Full &Screen Mode")
        );
    }

    #[test]
    fn dialogs_and_open_are_left_to_the_host() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let (mut prompter, mut clipboard) = (ScriptedPrompter::default(), MemoryClipboard::default());

        for action in [ActionId::About, ActionId::Colophon, ActionId::Preferences, ActionId::Open] {
            app.trigger(action, &mut prompter, &mut clipboard).expect("trigger");
        }
        assert_eq!(
            app.take_requests(),
            [
                ShellRequest::ShowAbout,
                ShellRequest::ShowColophon,
                ShellRequest::ShowPreferences,
                ShellRequest::ShowOpenDialog
            ]
        );
    }

    #[test]
    fn shell_state_survives_a_restart() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut prompter, mut clipboard) = (ScriptedPrompter::default(), MemoryClipboard::default());
        {
            let mut app = app_in(dir.path());
            for action in [
                ActionId::ShowStatusbar,
                ActionId::ShowMenubar,
                ActionId::ShowToolbar(ToolbarId::Help),
                ActionId::ShowToolbar(ToolbarId::File),
                ActionId::ToolButtonStyle(ToolButtonStyle::TextUnderIcon),
                ActionId::ToolButtonSize(32),
                ActionId::DocumentTabsPosition(TabPosition::Bottom),
            ] {
                app.trigger(action, &mut prompter, &mut clipboard).expect("trigger");
            }
            app.new_document();
            app.trigger(ActionId::SheetTabsAutoHide, &mut prompter, &mut clipboard)
                .expect("sheet auto hide");
            app.set_geometry(WindowGeometry {
                x: 10,
                y: 20,
                width: 800,
                height: 600,
                maximized: false,
            });
            assert!(app.request_quit(&mut ScriptedPrompter::new([PromptReply::yes()])));
        }

        let app = app_in(dir.path());
        assert!(!app.is_statusbar_visible());
        assert!(!app.is_menubar_visible());
        assert!(app.toolbars().is_toolbar_visible(ToolbarId::Help));
        assert!(!app.toolbars().is_toolbar_visible(ToolbarId::File));
        assert!(app.actions().is_checked(ActionId::ToolButtonStyle(ToolButtonStyle::TextUnderIcon)));
        assert!(app.actions().is_checked(ActionId::ToolButtonSize(32)));
        assert!(app.actions().is_checked(ActionId::DocumentTabsPosition(TabPosition::Bottom)));
        assert_eq!(app.geometry().map(|geometry| geometry.width), Some(800));
        assert!(!app.store().settings().document.sheet_tabs_auto_hide);
    }

    #[test]
    fn accepted_preferences_apply_immediately() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());

        let mut settings = app.current_settings();
        settings.application.show_statusbar = false;
        settings.document.tabs_auto_hide = true;
        app.apply_preferences(settings).expect("apply");

        assert!(!app.is_statusbar_visible());
        assert!(app.actions().is_checked(ActionId::DocumentTabsAutoHide));
        assert!(dir.path().join("settings.json").exists());
    }

    #[test]
    fn layout_stacks_the_shell_parts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        app.layout(1000.0, 700.0, 96.0);
        assert!(app.sheet_area().is_empty());

        app.new_document();
        app.layout(1000.0, 700.0, 96.0);
        let area = app.sheet_area();
        let status = app.statusbar().bounds();

        assert!(!area.is_empty());
        assert!(area.y >= app.toolbars().required_height());
        assert!(area.y + area.height <= status.y + 0.5);
        assert_eq!(status.y + status.height, 700.0);
    }
}
