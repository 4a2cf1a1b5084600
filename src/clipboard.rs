use crate::error::Result;

/// Plain text sink for the copy path / copy filename actions.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Keeps every text written to it. Used by tests and by hosts without a
/// system clipboard.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryClipboard {
    pub history: Vec<String>,
}

impl MemoryClipboard {
    pub fn text(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.history.push(text.to_string());
        Ok(())
    }
}
