use std::time::{Duration, Instant};

use crate::ui::{InputEvent, Point, Rect, UIComponent};

const STATUSBAR_HEIGHT: f32 = 24.0;
pub const READY_MESSAGE: &str = "Ready";
pub const READY_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
struct TransientMessage {
    text: String,
    expires_at: Option<Instant>,
}

#[derive(Debug, Default)]
pub struct StatusBar {
    bounds: Rect,
    visible: bool,
    message: Option<TransientMessage>,
    document_count: usize,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    /// Shows `text` until `timeout` elapses; a zero timeout keeps it until
    /// replaced.
    pub fn show_message(&mut self, text: impl Into<String>, timeout: Duration, now: Instant) {
        let expires_at = (!timeout.is_zero()).then(|| now + timeout);
        self.message = Some(TransientMessage {
            text: text.into(),
            expires_at,
        });
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Drops an expired message. Returns true when the bar needs a repaint.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.message {
            Some(TransientMessage {
                expires_at: Some(expires_at),
                ..
            }) if now >= *expires_at => {
                self.clear_message();
                true
            }
            _ => false,
        }
    }

    pub fn set_document_count(&mut self, count: usize) {
        self.document_count = count;
    }

    pub fn left_text(&self) -> &str {
        self.message.as_ref().map(|message| message.text.as_str()).unwrap_or("")
    }

    pub fn right_text(&self) -> String {
        match self.document_count {
            1 => "1 document".to_string(),
            count => format!("{count} documents"),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn height(&self) -> f32 {
        if self.visible { STATUSBAR_HEIGHT } else { 0.0 }
    }
}

impl UIComponent for StatusBar {
    fn layout(&mut self, bounds: Rect, _dpi: f32) {
        self.bounds = Rect {
            x: bounds.x,
            y: bounds.y + bounds.height - STATUSBAR_HEIGHT,
            width: bounds.width,
            height: STATUSBAR_HEIGHT,
        };
    }

    fn handle_input(&mut self, _event: &InputEvent) -> bool {
        false
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
