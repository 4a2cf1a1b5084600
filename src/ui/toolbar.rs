use serde::{Deserialize, Serialize};

use crate::{
    app::actions::{ActionId, ActionRegistry},
    ui::{InputEvent, Point, Rect, UIComponent, strip_mnemonic},
};

const TOOLBAR_PADDING_X: f32 = 6.0;
const TOOLBAR_GAP: f32 = 12.0;
const BUTTON_GAP: f32 = 2.0;
const SEPARATOR_WIDTH: f32 = 9.0;
const BUTTON_PADDING: f32 = 6.0;
const AVERAGE_CHAR_WIDTH: f32 = 7.0;
const TEXT_LINE_HEIGHT: f32 = 16.0;
const THEME_ICON_SIZE: f32 = 22.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolbarId {
    Application,
    File,
    Edit,
    View,
    Format,
    Tools,
    Appearance,
    Help,
}

impl ToolbarId {
    pub const fn all() -> [Self; 8] {
        [
            Self::Application,
            Self::File,
            Self::Edit,
            Self::View,
            Self::Format,
            Self::Tools,
            Self::Appearance,
            Self::Help,
        ]
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Application => "Application Toolbar",
            Self::File => "File Toolbar",
            Self::Edit => "Edit Toolbar",
            Self::View => "View Toolbar",
            Self::Format => "Format Toolbar",
            Self::Tools => "Tools Toolbar",
            Self::Appearance => "Appearance Toolbar",
            Self::Help => "Help Toolbar",
        }
    }

    pub const fn show_action_text(self) -> &'static str {
        match self {
            Self::Application => "Show &Application Toolbar",
            Self::File => "Show &File Toolbar",
            Self::Edit => "Show &Edit Toolbar",
            Self::View => "Show &View Toolbar",
            Self::Format => "Show F&ormat Toolbar",
            Self::Tools => "Show &Tools Toolbar",
            Self::Appearance => "Show Appea&rance Toolbar",
            Self::Help => "Show &Help Toolbar",
        }
    }

    pub const fn visible_by_default(self) -> bool {
        !matches!(self, Self::Appearance | Self::Help)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolButtonStyle {
    IconOnly,
    TextOnly,
    TextBesideIcon,
    TextUnderIcon,
    #[default]
    FollowStyle,
}

impl ToolButtonStyle {
    pub const fn all() -> [Self; 5] {
        [
            Self::IconOnly,
            Self::TextOnly,
            Self::TextBesideIcon,
            Self::TextUnderIcon,
            Self::FollowStyle,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::IconOnly => "&Icon Only",
            Self::TextOnly => "&Text Only",
            Self::TextBesideIcon => "Text &Beside Icon",
            Self::TextUnderIcon => "Text &Under Icon",
            Self::FollowStyle => "&Default",
        }
    }

    pub const fn tooltip(self) -> &'static str {
        match self {
            Self::IconOnly => "Only display the icon",
            Self::TextOnly => "Only display the text",
            Self::TextBesideIcon => "The text appears beside the icon",
            Self::TextUnderIcon => "The text appears under the icon",
            Self::FollowStyle => "Follow the theme style",
        }
    }

    /// The platform style used when following the theme.
    pub const fn resolved(self) -> Self {
        match self {
            Self::FollowStyle => Self::IconOnly,
            other => other,
        }
    }
}

pub fn tool_button_size_label(pixels: u16) -> &'static str {
    match pixels {
        16 => "&Small (16x16)",
        22 => "&Medium (22x22)",
        32 => "&Large (32x32)",
        48 => "&Huge (48x48)",
        _ => "De&fault",
    }
}

pub fn tool_button_size_tooltip(pixels: u16) -> &'static str {
    match pixels {
        16 => "Show icons in small size",
        22 => "Show icons in medium size",
        32 => "Show icons in large size",
        48 => "Show icons in huge size",
        _ => "Show icons in theme size",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarItem {
    Action(ActionId),
    Separator,
}

#[derive(Debug, Clone)]
pub struct ToolbarButton {
    pub action: ActionId,
    pub label: String,
    pub tooltip: String,
    pub icon_glyph: &'static str,
    pub enabled: bool,
    pub checked: bool,
    pub rect: Rect,
}

#[derive(Debug, Clone)]
pub struct Toolbar {
    pub id: ToolbarId,
    pub items: Vec<ToolbarItem>,
    pub visible: bool,
    pub buttons: Vec<ToolbarButton>,
    pub separators: Vec<Rect>,
    pub bounds: Rect,
}

impl Toolbar {
    pub fn new(id: ToolbarId, items: Vec<ToolbarItem>) -> Self {
        Self {
            id,
            items,
            visible: id.visible_by_default(),
            buttons: Vec::new(),
            separators: Vec::new(),
            bounds: Rect::default(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.id.title()
    }

    pub fn action_ids(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.items.iter().filter_map(|item| match item {
            ToolbarItem::Action(id) => Some(*id),
            ToolbarItem::Separator => None,
        })
    }
}

/// The toolbar area of the main window: every toolbar packed left to right,
/// wrapping into additional rows when the window is too narrow.
#[derive(Debug, Clone)]
pub struct ToolbarDock {
    bounds: Rect,
    visible: bool,
    pub toolbars: Vec<Toolbar>,
    pub style: ToolButtonStyle,
    pub icon_size: u16,
    pub hovered: Option<ActionId>,
    pub tooltip_text: Option<String>,
    pressed: Option<ActionId>,
    pub pending_action: Option<ActionId>,
}

impl ToolbarDock {
    pub fn new(toolbars: Vec<Toolbar>) -> Self {
        Self {
            bounds: Rect::default(),
            visible: true,
            toolbars,
            style: ToolButtonStyle::FollowStyle,
            icon_size: 0,
            hovered: None,
            tooltip_text: None,
            pressed: None,
            pending_action: None,
        }
    }

    pub fn toolbar(&self, id: ToolbarId) -> Option<&Toolbar> {
        self.toolbars.iter().find(|toolbar| toolbar.id == id)
    }

    pub fn set_toolbar_visible(&mut self, id: ToolbarId, visible: bool) -> bool {
        match self.toolbars.iter_mut().find(|toolbar| toolbar.id == id) {
            Some(toolbar) if toolbar.visible != visible => {
                toolbar.visible = visible;
                true
            }
            _ => false,
        }
    }

    pub fn is_toolbar_visible(&self, id: ToolbarId) -> bool {
        self.toolbar(id).is_some_and(|toolbar| toolbar.visible)
    }

    pub fn set_style(&mut self, style: ToolButtonStyle) {
        self.style = style;
    }

    pub fn set_icon_size(&mut self, pixels: u16) {
        self.icon_size = pixels;
    }

    /// Pixel size of the icons, resolving the theme default.
    pub fn effective_icon_size(&self) -> f32 {
        if self.icon_size == 0 {
            THEME_ICON_SIZE
        } else {
            f32::from(self.icon_size)
        }
    }

    /// Rebuilds button labels and states from the action registry.
    pub fn sync_actions(&mut self, actions: &ActionRegistry) {
        for toolbar in &mut self.toolbars {
            toolbar.buttons = toolbar
                .action_ids()
                .filter_map(|id| actions.get(id))
                .map(|action| ToolbarButton {
                    action: action.id,
                    label: action
                        .icon_text
                        .map(str::to_string)
                        .unwrap_or_else(|| strip_mnemonic(&action.text).trim_end_matches("...").to_string()),
                    tooltip: action.tooltip.clone(),
                    icon_glyph: action.icon_glyph,
                    enabled: action.enabled,
                    checked: action.checked,
                    rect: Rect::default(),
                })
                .collect();
        }
        self.recalc_layout();
    }

    /// Height needed for the current layout, zero when hidden.
    pub fn required_height(&self) -> f32 {
        if !self.visible {
            return 0.0;
        }
        self.toolbars
            .iter()
            .filter(|toolbar| toolbar.visible && !toolbar.bounds.is_empty())
            .map(|toolbar| toolbar.bounds.y + toolbar.bounds.height - self.bounds.y)
            .fold(0.0, f32::max)
    }

    pub fn button_hit_test(&self, point: Point) -> Option<&ToolbarButton> {
        self.toolbars
            .iter()
            .filter(|toolbar| toolbar.visible)
            .flat_map(|toolbar| toolbar.buttons.iter())
            .find(|button| button.rect.contains(point))
    }

    fn button_size(&self, label: &str) -> (f32, f32) {
        let icon = self.effective_icon_size();
        let text_width = label.chars().count() as f32 * AVERAGE_CHAR_WIDTH;
        let (width, height) = match self.style.resolved() {
            ToolButtonStyle::TextOnly => (text_width, TEXT_LINE_HEIGHT),
            ToolButtonStyle::TextBesideIcon => (icon + 4.0 + text_width, icon.max(TEXT_LINE_HEIGHT)),
            ToolButtonStyle::TextUnderIcon => (icon.max(text_width), icon + TEXT_LINE_HEIGHT),
            _ => (icon, icon),
        };
        (width + BUTTON_PADDING * 2.0, height + BUTTON_PADDING * 2.0)
    }

    fn recalc_layout(&mut self) {
        let origin_x = self.bounds.x + TOOLBAR_PADDING_X;
        let right_edge = self.bounds.x + self.bounds.width - TOOLBAR_PADDING_X;
        let mut x = origin_x;
        let mut y = self.bounds.y;
        let mut row_height = 0.0f32;

        let sizes = self
            .toolbars
            .iter()
            .map(|toolbar| {
                toolbar
                    .items
                    .iter()
                    .map(|item| match item {
                        ToolbarItem::Separator => (SEPARATOR_WIDTH, 0.0),
                        ToolbarItem::Action(id) => toolbar
                            .buttons
                            .iter()
                            .find(|button| button.action == *id)
                            .map(|button| self.button_size(&button.label))
                            .unwrap_or((0.0, 0.0)),
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        for (toolbar, item_sizes) in self.toolbars.iter_mut().zip(sizes) {
            toolbar.separators.clear();
            if !toolbar.visible || toolbar.buttons.is_empty() {
                toolbar.bounds = Rect::default();
                continue;
            }

            let width = item_sizes.iter().map(|(w, _)| *w + BUTTON_GAP).sum::<f32>();
            let height = item_sizes.iter().map(|(_, h)| *h).fold(0.0, f32::max);
            if x > origin_x && x + width > right_edge {
                x = origin_x;
                y += row_height;
                row_height = 0.0;
            }

            toolbar.bounds = Rect { x, y, width, height };
            let mut cursor = x;
            let mut button_index = 0;
            for (item, (item_width, _)) in toolbar.items.iter().zip(item_sizes.iter()) {
                match item {
                    ToolbarItem::Separator => toolbar.separators.push(Rect {
                        x: cursor,
                        y,
                        width: *item_width,
                        height,
                    }),
                    ToolbarItem::Action(id) => {
                        if let Some(button) = toolbar.buttons.get_mut(button_index)
                            && button.action == *id
                        {
                            button.rect = Rect {
                                x: cursor,
                                y,
                                width: *item_width,
                                height,
                            };
                            button_index += 1;
                        }
                    }
                }
                cursor += item_width + BUTTON_GAP;
            }

            x += width + TOOLBAR_GAP;
            row_height = row_height.max(height);
        }
    }
}

impl UIComponent for ToolbarDock {
    fn layout(&mut self, bounds: Rect, _dpi: f32) {
        self.bounds = bounds;
        self.recalc_layout();
    }

    fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.visible {
            return false;
        }

        match event {
            InputEvent::MouseMove(point) => {
                let hovered = self.button_hit_test(*point).map(|button| button.action);
                if hovered == self.hovered {
                    return false;
                }
                self.hovered = hovered;
                self.tooltip_text = self
                    .button_hit_test(*point)
                    .map(|button| button.tooltip.clone())
                    .filter(|tip| !tip.is_empty());
                true
            }
            InputEvent::MouseDown(point) => {
                self.pressed = self
                    .button_hit_test(*point)
                    .filter(|button| button.enabled)
                    .map(|button| button.action);
                self.pressed.is_some()
            }
            InputEvent::MouseUp(point) => {
                let Some(pressed) = self.pressed.take() else {
                    return false;
                };
                let released = self.button_hit_test(*point).map(|button| button.action);
                if released == Some(pressed) {
                    self.pending_action = Some(pressed);
                }
                true
            }
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
    use crate::app::{actions::ActionRegistry, menus::default_toolbars};

    fn dock_with_actions(width: f32) -> ToolbarDock {
        let actions = ActionRegistry::new();
        let mut dock = ToolbarDock::new(default_toolbars());
        dock.sync_actions(&actions);
        dock.layout(
            Rect {
                x: 0.0,
                y: 0.0,
                width,
                height: 200.0,
            },
            96.0,
        );
        dock
    }

    #[test]
    fn hidden_toolbars_take_no_space() {
        let dock = dock_with_actions(2000.0);
        let appearance = dock.toolbar(ToolbarId::Appearance).expect("appearance toolbar");

        assert!(!appearance.visible);
        assert!(appearance.bounds.is_empty());
        assert!(dock.required_height() > 0.0);
    }

    #[test]
    fn narrow_windows_wrap_toolbars_into_rows() {
        let wide = dock_with_actions(2000.0);
        let narrow = dock_with_actions(120.0);
        assert!(narrow.required_height() > wide.required_height());
    }

    #[test]
    fn text_styles_make_buttons_wider() {
        let mut dock = dock_with_actions(2000.0);
        let icon_width = dock.toolbars[1].buttons[0].rect.width;

        dock.set_style(ToolButtonStyle::TextBesideIcon);
        dock.layout(dock.bounds(), 96.0);
        assert!(dock.toolbars[1].buttons[0].rect.width > icon_width);
    }

    #[test]
    fn click_on_enabled_button_queues_its_action() {
        let mut dock = dock_with_actions(2000.0);
        let button = dock
            .toolbar(ToolbarId::File)
            .and_then(|toolbar| toolbar.buttons.iter().find(|b| b.action == ActionId::New))
            .expect("new button")
            .clone();
        let center = Point {
            x: button.rect.x + button.rect.width / 2.0,
            y: button.rect.y + button.rect.height / 2.0,
        };

        assert!(dock.handle_input(&InputEvent::MouseDown(center)));
        assert!(dock.handle_input(&InputEvent::MouseUp(center)));
        assert_eq!(dock.pending_action, Some(ActionId::New));
    }

    #[test]
    fn default_icon_size_follows_the_theme() {
        let mut dock = ToolbarDock::new(Vec::new());
        assert_eq!(dock.effective_icon_size(), THEME_ICON_SIZE);
        dock.set_icon_size(48);
        assert_eq!(dock.effective_icon_size(), 48.0);
    }
}
