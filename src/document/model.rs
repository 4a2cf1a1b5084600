use tracing::debug;

use crate::{
    clipboard::Clipboard,
    document::{
        DocumentUrl,
        table::{TableDocument, TableEvent},
    },
    error::Result,
    settings::schema::DocumentSettings,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    UrlChanged(DocumentUrl),
    ModifiedChanged(bool),
    Table(TableEvent),
}

/// One open table document: its location, its modified flag and its sheets.
#[derive(Debug, Clone)]
pub struct Document {
    table: TableDocument,
    url: DocumentUrl,
    modified: bool,
    events: Vec<DocumentEvent>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(&DocumentSettings::default())
    }
}

impl Document {
    pub fn new(defaults: &DocumentSettings) -> Self {
        Self {
            table: TableDocument::with_defaults(defaults),
            url: DocumentUrl::Empty,
            modified: false,
            events: Vec::new(),
        }
    }

    pub fn table(&self) -> &TableDocument {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableDocument {
        &mut self.table
    }

    /// Drains pending notifications, the sheet tab ones included.
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        let mut events = std::mem::take(&mut self.events);
        events.extend(self.table.take_events().into_iter().map(DocumentEvent::Table));
        events
    }

    pub fn url(&self) -> &DocumentUrl {
        &self.url
    }

    pub fn set_url(&mut self, url: DocumentUrl) {
        if url != self.url {
            debug!(url = %url, "document url changed");
            self.url = url.clone();
            self.events.push(DocumentEvent::UrlChanged(url));
        }
    }

    pub fn init_url(&mut self) {
        self.events.push(DocumentEvent::UrlChanged(self.url.clone()));
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        if modified != self.modified {
            self.modified = modified;
            self.events.push(DocumentEvent::ModifiedChanged(modified));
        }
    }

    pub fn init_modified(&mut self) {
        self.events.push(DocumentEvent::ModifiedChanged(self.modified));
    }

    pub fn copy_path_text(&self) -> Option<String> {
        (!self.url.is_empty()).then(|| self.url.display_string())
    }

    pub fn copy_filename_text(&self) -> Option<String> {
        (!self.url.is_empty()).then(|| self.url.file_name())
    }

    /// Returns whether anything was copied; untitled documents copy nothing.
    pub fn copy_path_to_clipboard(&self, clipboard: &mut dyn Clipboard) -> Result<bool> {
        match self.copy_path_text() {
            Some(text) => {
                clipboard.set_text(&text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn copy_filename_to_clipboard(&self, clipboard: &mut dyn Clipboard) -> Result<bool> {
        match self.copy_filename_text() {
            Some(text) => {
                clipboard.set_text(&text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
