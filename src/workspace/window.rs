use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    document::{DocumentUrl, model::Document},
    ui::tabs::TabLabel,
};

pub type WindowId = u64;

pub const UNTITLED: &str = "Untitled";
pub const MODIFIED_ICON: &str = "document-save";

/// Entries of the per-document system menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowAction {
    Close,
    CloseOther,
    ShowPath,
    CopyPath,
    CopyFilename,
}

impl WindowAction {
    pub const fn all() -> [Self; 5] {
        [
            Self::Close,
            Self::CloseOther,
            Self::ShowPath,
            Self::CopyPath,
            Self::CopyFilename,
        ]
    }

    pub const fn text(self) -> &'static str {
        match self {
            Self::Close => "&Close",
            Self::CloseOther => "Close Ot&her",
            Self::ShowPath => "Show &Path",
            Self::CopyPath => "Cop&y Path",
            Self::CopyFilename => "Copy &Filename",
        }
    }

    pub const fn tooltip(self) -> &'static str {
        match self {
            Self::Close => "Close document",
            Self::CloseOther => "Close other open documents",
            Self::ShowPath => "Show document path in the tab caption",
            Self::CopyPath => "Copy document path to clipboard",
            Self::CopyFilename => "Copy document filename to clipboard",
        }
    }

    /// A separator precedes this entry in the menu.
    pub const fn starts_group(self) -> bool {
        matches!(self, Self::ShowPath)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemMenuItem {
    pub action: WindowAction,
    pub enabled: bool,
    pub checked: Option<bool>,
}

/// What a system menu entry asks its owner to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    Close(WindowId),
    CloseOthers(WindowId),
    CopyPath(WindowId),
    CopyFilename(WindowId),
}

/// Chrome around one document: caption, sequence number, modified marker and
/// its own menu.
#[derive(Debug, Clone)]
pub struct DocumentWindow {
    id: WindowId,
    document: Document,
    filename_sequence_number: u32,
    window_modified: bool,
    icon: Option<&'static str>,
    title: String,
    home: Option<PathBuf>,
    show_path: bool,
    show_path_enabled: bool,
    close_other_enabled: bool,
    copy_enabled: bool,
}

impl DocumentWindow {
    pub fn new(id: WindowId, document: Document, home: Option<PathBuf>) -> Self {
        let mut window = Self {
            id,
            document,
            filename_sequence_number: 0,
            window_modified: false,
            icon: None,
            title: String::new(),
            home,
            show_path: false,
            show_path_enabled: false,
            close_other_enabled: false,
            copy_enabled: false,
        };
        window.update_window_title();
        window
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn url(&self) -> &DocumentUrl {
        self.document.url()
    }

    pub fn filename_sequence_number(&self) -> u32 {
        self.filename_sequence_number
    }

    pub fn set_filename_sequence_number(&mut self, number: u32) {
        self.filename_sequence_number = number;
    }

    pub fn init_filename_sequence_number(&mut self) {
        self.filename_sequence_number = 0;
    }

    pub fn is_window_modified(&self) -> bool {
        self.window_modified
    }

    pub fn icon(&self) -> Option<&'static str> {
        self.icon
    }

    /// Caption shown on the document's own tab.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn window_caption(&self, path_visible: bool) -> String {
        window_caption(self.url(), self.filename_sequence_number, path_visible, self.home())
    }

    pub fn tab_label(&self) -> TabLabel {
        TabLabel {
            title: self.title.clone(),
            tooltip: self.url().display_string(),
            modified: self.window_modified,
        }
    }

    /// Reacts to a new url. `latest_sibling_number` is the highest sequence
    /// number among the other windows whose caption reads the same name.
    pub fn document_url_changed(&mut self, latest_sibling_number: u32) {
        self.init_filename_sequence_number();
        self.set_filename_sequence_number(latest_sibling_number + 1);
        self.update_window_title();

        let has_url = !self.url().is_empty();
        self.show_path_enabled = has_url;
        self.copy_enabled = has_url;
        debug!(
            id = self.id,
            sequence = self.filename_sequence_number,
            "window caption refreshed"
        );
    }

    pub fn document_modified_changed(&mut self, modified: bool) {
        self.window_modified = modified;
        self.icon = modified.then_some(MODIFIED_ICON);
    }

    pub fn document_count_changed(&mut self, count: usize) {
        self.close_other_enabled = count >= 2;
    }

    pub fn system_menu(&self) -> Vec<SystemMenuItem> {
        WindowAction::all()
            .into_iter()
            .map(|action| SystemMenuItem {
                action,
                enabled: self.is_action_enabled(action),
                checked: (action == WindowAction::ShowPath).then_some(self.show_path),
            })
            .collect()
    }

    pub fn is_action_enabled(&self, action: WindowAction) -> bool {
        match action {
            WindowAction::Close => true,
            WindowAction::CloseOther => self.close_other_enabled,
            WindowAction::ShowPath => self.show_path_enabled,
            WindowAction::CopyPath | WindowAction::CopyFilename => self.copy_enabled,
        }
    }

    /// Runs a system menu entry. Entries touching other windows or the
    /// clipboard are handed back to the caller.
    pub fn trigger(&mut self, action: WindowAction) -> Option<WindowRequest> {
        if !self.is_action_enabled(action) {
            return None;
        }
        match action {
            WindowAction::Close => Some(WindowRequest::Close(self.id)),
            WindowAction::CloseOther => Some(WindowRequest::CloseOthers(self.id)),
            WindowAction::ShowPath => {
                self.show_path = !self.show_path;
                self.update_window_title();
                None
            }
            WindowAction::CopyPath => Some(WindowRequest::CopyPath(self.id)),
            WindowAction::CopyFilename => Some(WindowRequest::CopyFilename(self.id)),
        }
    }

    fn update_window_title(&mut self) {
        self.title = self.window_caption(self.show_path);
    }
}

/// Caption of a document.
///
/// Untitled documents read "Untitled". With `path_visible` the full location
/// is shown with the home directory abbreviated to `~`, otherwise only the
/// file name. Untitled documents and bare file names get a " (N)" suffix once
/// another open document shares the name.
pub fn window_caption(url: &DocumentUrl, sequence: u32, path_visible: bool, home: Option<&Path>) -> String {
    let mut caption = if path_visible && !url.is_empty() {
        display_path(url, home)
    } else {
        caption_name(url)
    };

    if (!path_visible || url.is_empty()) && sequence > 1 {
        caption = format!("{caption} ({sequence})");
    }
    caption
}

/// Name shown without the path. Locations without a file name read "Untitled".
pub fn caption_name(url: &DocumentUrl) -> String {
    let name = url.file_name();
    if name.is_empty() { UNTITLED.to_string() } else { name }
}

fn display_path(url: &DocumentUrl, home: Option<&Path>) -> String {
    if let (Some(path), Some(home)) = (url.to_local_file(), home)
        && !home.as_os_str().is_empty()
        && let Ok(rest) = path.strip_prefix(home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~{}{}", std::path::MAIN_SEPARATOR, rest.display());
    }
    url.display_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_for(id: WindowId, path: &str) -> DocumentWindow {
        let mut document = Document::default();
        document.set_url(DocumentUrl::from_local_file(path));
        DocumentWindow::new(id, document, Some(PathBuf::from("/home/ada")))
    }

    #[test]
    fn untitled_captions_carry_the_sequence_number() {
        let url = DocumentUrl::Empty;
        assert_eq!(window_caption(&url, 0, true, None), "Untitled");
        assert_eq!(window_caption(&url, 1, false, None), "Untitled");
        assert_eq!(window_caption(&url, 3, true, None), "Untitled (3)");
    }

    #[test]
    fn path_captions_abbreviate_home() {
        let home = Path::new("/home/ada");
        let url = DocumentUrl::from_local_file("/home/ada/tables/x.ods");
        let expected = format!("~{0}tables{0}x.ods", std::path::MAIN_SEPARATOR);
        assert_eq!(window_caption(&url, 2, true, Some(home)), expected);

        let sibling = DocumentUrl::from_local_file("/home/adam/x.ods");
        assert_eq!(window_caption(&sibling, 1, true, Some(home)), "/home/adam/x.ods");
    }

    #[test]
    fn file_name_captions_carry_the_sequence_number() {
        let url = DocumentUrl::from_local_file("/b/x.txt");
        assert_eq!(window_caption(&url, 1, false, None), "x.txt");
        assert_eq!(window_caption(&url, 2, false, None), "x.txt (2)");
    }

    #[test]
    fn remote_documents_show_their_file_name() {
        let url = DocumentUrl::from_user_input("https://example.org/shared/plan.ods");
        assert_eq!(window_caption(&url, 1, false, None), "plan.ods");
        assert_eq!(
            window_caption(&url, 1, true, None),
            "https://example.org/shared/plan.ods"
        );
    }

    #[test]
    fn host_only_urls_read_untitled() {
        let url = DocumentUrl::from_user_input("https://example.org");
        assert_eq!(window_caption(&url, 1, false, None), UNTITLED);
        assert_eq!(window_caption(&url, 2, false, None), "Untitled (2)");
        assert_eq!(window_caption(&url, 2, true, None), "https://example.org/");
    }

    #[test]
    fn url_change_resets_and_renumbers() {
        let mut window = window_for(1, "/a/x.txt");
        window.set_filename_sequence_number(7);

        window.document_url_changed(1);
        assert_eq!(window.filename_sequence_number(), 2);
        assert_eq!(window.title(), "x.txt (2)");
        assert!(window.is_action_enabled(WindowAction::CopyPath));
        assert!(window.is_action_enabled(WindowAction::ShowPath));
    }

    #[test]
    fn untitled_windows_disable_path_actions() {
        let mut window = DocumentWindow::new(1, Document::default(), None);
        window.document_url_changed(0);

        assert_eq!(window.title(), "Untitled");
        assert!(!window.is_action_enabled(WindowAction::CopyFilename));
        assert_eq!(window.trigger(WindowAction::CopyPath), None);
    }

    #[test]
    fn modified_flag_sets_the_icon() {
        let mut window = window_for(1, "/a/x.txt");
        window.document_modified_changed(true);
        assert!(window.is_window_modified());
        assert_eq!(window.icon(), Some(MODIFIED_ICON));

        window.document_modified_changed(false);
        assert_eq!(window.icon(), None);
    }

    #[test]
    fn close_other_follows_the_document_count() {
        let mut window = window_for(4, "/a/x.txt");
        window.document_count_changed(1);
        assert_eq!(window.trigger(WindowAction::CloseOther), None);

        window.document_count_changed(2);
        assert_eq!(
            window.trigger(WindowAction::CloseOther),
            Some(WindowRequest::CloseOthers(4))
        );
    }

    #[test]
    fn show_path_toggles_the_tab_caption() {
        let mut window = window_for(1, "/data/x.txt");
        window.document_url_changed(0);
        assert_eq!(window.title(), "x.txt");

        assert_eq!(window.trigger(WindowAction::ShowPath), None);
        assert_eq!(window.title(), DocumentUrl::from_local_file("/data/x.txt").display_string());
        let item = window
            .system_menu()
            .into_iter()
            .find(|item| item.action == WindowAction::ShowPath)
            .expect("show path entry");
        assert_eq!(item.checked, Some(true));
    }
}
