use crate::ui::{InputEvent, Point, Rect, TabPosition, UIComponent};

const TAB_HEIGHT: f32 = 30.0;
const TAB_MIN_WIDTH: f32 = 120.0;
const TAB_MAX_WIDTH: f32 = 240.0;
const TAB_GAP: f32 = 4.0;
const TAB_BAR_PADDING: f32 = 6.0;
const NEW_TAB_BUTTON_WIDTH: f32 = 26.0;
const OVERFLOW_BUTTON_WIDTH: f32 = 22.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    pub title: String,
    pub tooltip: String,
    pub modified: bool,
}

impl TabLabel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tooltip: String::new(),
            modified: false,
        }
    }
}

/// Requests raised by the strip; the owner of the tabs applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStripAction {
    Activate(usize),
    Close(usize),
    Reorder { from: usize, to: usize },
    NewTab,
}

/// Geometry and hit testing of a row of tabs. Used for the document tabs of
/// the main window and for the sheet tabs inside each document.
#[derive(Debug, Clone)]
pub struct TabStrip {
    bounds: Rect,
    strip_rect: Rect,
    visible: bool,
    pub position: TabPosition,
    pub tabs: Vec<TabLabel>,
    pub active: usize,
    pub closable: bool,
    pub show_new_tab_button: bool,
    pub overflow_offset: usize,
    pub max_visible_tabs: usize,
    pub tab_rects: Vec<Rect>,
    pub close_rects: Vec<Rect>,
    pub new_tab_rect: Rect,
    pub overflow_left_rect: Rect,
    pub overflow_right_rect: Rect,
    pub hovered: Option<usize>,
    dragging_tab: Option<usize>,
    pending_actions: Vec<TabStripAction>,
}

impl TabStrip {
    pub fn new(position: TabPosition) -> Self {
        Self {
            bounds: Rect::default(),
            strip_rect: Rect::default(),
            visible: true,
            position,
            tabs: Vec::new(),
            active: 0,
            closable: true,
            show_new_tab_button: false,
            overflow_offset: 0,
            max_visible_tabs: 0,
            tab_rects: Vec::new(),
            close_rects: Vec::new(),
            new_tab_rect: Rect::default(),
            overflow_left_rect: Rect::default(),
            overflow_right_rect: Rect::default(),
            hovered: None,
            dragging_tab: None,
            pending_actions: Vec::new(),
        }
    }

    /// Replaces the labels, keeping the scroll offset where possible.
    pub fn sync(&mut self, tabs: Vec<TabLabel>, active: usize) {
        self.tabs = tabs;
        self.active = active.min(self.tabs.len().saturating_sub(1));
        self.ensure_active_visible();
        self.recalc_tab_layout();
    }

    pub fn set_position(&mut self, position: TabPosition) {
        if self.position != position {
            self.position = position;
            self.layout(self.bounds, 96.0);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn take_actions(&mut self) -> Vec<TabStripAction> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Rectangle occupied by the tabs themselves, empty when hidden.
    pub fn strip_rect(&self) -> Rect {
        if self.visible { self.strip_rect } else { Rect::default() }
    }

    /// Area left for the tab pages after the strip took its edge.
    pub fn content_rect(&self) -> Rect {
        if !self.visible {
            return self.bounds;
        }
        let height = (self.bounds.height - TAB_HEIGHT).max(0.0);
        match self.position {
            TabPosition::Top => Rect {
                y: self.bounds.y + TAB_HEIGHT,
                height,
                ..self.bounds
            },
            TabPosition::Bottom => Rect { height, ..self.bounds },
        }
    }

    pub fn tab_hit_test(&self, point: Point) -> Option<usize> {
        self.tab_rects
            .iter()
            .position(|rect| rect.contains(point))
            .map(|idx| idx + self.overflow_offset)
    }

    pub fn tab_close_hit_test(&self, point: Point) -> Option<usize> {
        if !self.closable {
            return None;
        }
        self.close_rects
            .iter()
            .position(|rect| rect.contains(point))
            .map(|idx| idx + self.overflow_offset)
    }

    pub fn new_button_hit_test(&self, point: Point) -> bool {
        self.show_new_tab_button && self.new_tab_rect.contains(point)
    }

    pub fn overflow_left_hit_test(&self, point: Point) -> bool {
        self.overflow_left_rect.width > 0.0 && self.overflow_left_rect.contains(point)
    }

    pub fn overflow_right_hit_test(&self, point: Point) -> bool {
        self.overflow_right_rect.width > 0.0 && self.overflow_right_rect.contains(point)
    }

    pub fn scroll_overflow_left(&mut self) -> bool {
        if self.overflow_offset == 0 {
            return false;
        }
        self.overflow_offset -= 1;
        self.recalc_tab_layout();
        true
    }

    pub fn scroll_overflow_right(&mut self) -> bool {
        let visible = self.tab_rects.len().max(1);
        if self.overflow_offset + visible >= self.tabs.len() {
            return false;
        }
        self.overflow_offset += 1;
        self.recalc_tab_layout();
        true
    }

    fn ensure_active_visible(&mut self) {
        if self.tabs.is_empty() {
            self.overflow_offset = 0;
            return;
        }
        let visible = self.max_visible_tabs.max(1);
        if self.active < self.overflow_offset {
            self.overflow_offset = self.active;
        } else if self.active >= self.overflow_offset + visible {
            self.overflow_offset = self.active + 1 - visible;
        }
    }

    fn recalc_tab_layout(&mut self) {
        self.tab_rects.clear();
        self.close_rects.clear();
        self.new_tab_rect = Rect::default();
        self.overflow_left_rect = Rect::default();
        self.overflow_right_rect = Rect::default();

        let bar = self.strip_rect;
        if bar.width <= 0.0 {
            return;
        }

        let left_edge = bar.x + TAB_BAR_PADDING;
        let right_edge = (bar.x + bar.width - TAB_BAR_PADDING).max(left_edge);
        let mut tabs_right = right_edge;
        if self.show_new_tab_button {
            self.new_tab_rect = Rect {
                x: (right_edge - NEW_TAB_BUTTON_WIDTH).max(left_edge),
                y: bar.y + 4.0,
                width: NEW_TAB_BUTTON_WIDTH,
                height: TAB_HEIGHT - 8.0,
            };
            tabs_right = (self.new_tab_rect.x - TAB_GAP).max(left_edge);
        }

        let mut tabs_left = left_edge;
        let available_without_overflow = (tabs_right - tabs_left).max(0.0);
        let max_without_overflow =
            ((available_without_overflow + TAB_GAP) / (TAB_MIN_WIDTH + TAB_GAP)).floor() as usize;
        if self.tabs.len() > max_without_overflow.max(1) {
            self.overflow_left_rect = Rect {
                x: tabs_left,
                y: bar.y + 4.0,
                width: OVERFLOW_BUTTON_WIDTH,
                height: TAB_HEIGHT - 8.0,
            };
            self.overflow_right_rect = Rect {
                x: tabs_left + OVERFLOW_BUTTON_WIDTH + 2.0,
                ..self.overflow_left_rect
            };
            tabs_left = self.overflow_right_rect.x + OVERFLOW_BUTTON_WIDTH + TAB_GAP;
        } else {
            self.overflow_offset = 0;
        }

        let available = (tabs_right - tabs_left).max(0.0);
        self.max_visible_tabs = (((available + TAB_GAP) / (TAB_MIN_WIDTH + TAB_GAP)).floor() as usize).max(1);
        if self.overflow_offset + self.max_visible_tabs > self.tabs.len() {
            self.overflow_offset = self.tabs.len().saturating_sub(self.max_visible_tabs);
        }

        let visible_count = self
            .tabs
            .len()
            .saturating_sub(self.overflow_offset)
            .min(self.max_visible_tabs);
        if visible_count == 0 {
            return;
        }

        let total_gap = TAB_GAP * visible_count.saturating_sub(1) as f32;
        let tab_width = ((available - total_gap) / visible_count as f32).clamp(TAB_MIN_WIDTH, TAB_MAX_WIDTH);
        let mut x = tabs_left;
        for _ in 0..visible_count {
            self.tab_rects.push(Rect {
                x,
                y: bar.y,
                width: tab_width,
                height: TAB_HEIGHT,
            });
            self.close_rects.push(Rect {
                x: (x + tab_width - 18.0).max(x + 4.0),
                y: bar.y + 9.0,
                width: 12.0,
                height: 12.0,
            });
            x += tab_width + TAB_GAP;
        }
    }
}

impl UIComponent for TabStrip {
    fn layout(&mut self, bounds: Rect, _dpi: f32) {
        self.bounds = bounds;
        let y = match self.position {
            TabPosition::Top => bounds.y,
            TabPosition::Bottom => bounds.y + (bounds.height - TAB_HEIGHT).max(0.0),
        };
        self.strip_rect = Rect {
            x: bounds.x,
            y,
            width: bounds.width,
            height: TAB_HEIGHT.min(bounds.height.max(0.0)),
        };
        self.recalc_tab_layout();
    }

    fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.visible {
            return false;
        }

        match event {
            InputEvent::MouseMove(point) => {
                let mut changed = false;
                let hovered = self.tab_hit_test(*point);
                if self.hovered != hovered {
                    self.hovered = hovered;
                    changed = true;
                }
                if let Some(dragging) = self.dragging_tab
                    && let Some(target) = hovered
                    && target != dragging
                {
                    self.pending_actions.push(TabStripAction::Reorder { from: dragging, to: target });
                    self.dragging_tab = Some(target);
                    changed = true;
                }
                changed
            }
            InputEvent::MouseDown(point) => {
                if self.overflow_left_hit_test(*point) {
                    return self.scroll_overflow_left();
                }
                if self.overflow_right_hit_test(*point) {
                    return self.scroll_overflow_right();
                }
                if self.new_button_hit_test(*point) {
                    self.pending_actions.push(TabStripAction::NewTab);
                    return true;
                }
                if let Some(index) = self.tab_close_hit_test(*point) {
                    self.pending_actions.push(TabStripAction::Close(index));
                    return true;
                }
                if let Some(index) = self.tab_hit_test(*point) {
                    if index != self.active {
                        self.pending_actions.push(TabStripAction::Activate(index));
                    }
                    self.dragging_tab = Some(index);
                    return true;
                }
                false
            }
            InputEvent::MouseUp(_) => self.dragging_tab.take().is_some(),
            InputEvent::MiddleClick(point) => match self.tab_hit_test(*point) {
                Some(index) if self.closable => {
                    self.pending_actions.push(TabStripAction::Close(index));
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn hit_test(&self, point: Point) -> bool {
        self.visible && self.strip_rect.contains(point)
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.hovered = None;
            self.dragging_tab = None;
        }
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
