use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    MouseMove(Point),
    MouseDown(Point),
    MouseUp(Point),
    MiddleClick(Point),
    KeyDown(u32),
    Char(char),
}

/// Edge of a tab widget the tab bar is attached to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TabPosition {
    #[default]
    Top,
    Bottom,
}

impl TabPosition {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "&Top",
            Self::Bottom => "&Bottom",
        }
    }
}

pub trait UIComponent {
    fn layout(&mut self, bounds: Rect, dpi: f32);
    fn handle_input(&mut self, event: &InputEvent) -> bool;
    fn hit_test(&self, point: Point) -> bool;
    fn set_visible(&mut self, visible: bool);
    fn bounds(&self) -> Rect;
}

/// Strips Qt-style mnemonics: `"Clos&e All"` becomes `"Close All"`, `"&&"`
/// stays a literal ampersand.
pub fn strip_mnemonic(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '&' {
            if chars.peek() == Some(&'&') {
                out.push('&');
                chars.next();
            }
            continue;
        }
        out.push(ch);
    }
    out
}

pub mod about;
pub mod colophon;
pub mod confirmation;
pub mod dialog;
pub mod statusbar;
pub mod tabs;
pub mod toolbar;
