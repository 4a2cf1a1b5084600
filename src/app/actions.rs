use crate::{
    settings::schema::TOOL_BUTTON_SIZES,
    ui::{
        TabPosition,
        toolbar::{ToolButtonStyle, ToolbarId, tool_button_size_label, tool_button_size_tooltip},
    },
};

/// First command identifier handed to the native menu bar.
pub const COMMAND_ID_BASE: u16 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    About,
    Colophon,
    Preferences,
    Quit,
    New,
    Open,
    CopyPath,
    CopyFilename,
    Close,
    CloseOther,
    CloseAll,
    ShowPath,
    ShowMenubar,
    ShowToolbar(ToolbarId),
    ToolButtonStyle(ToolButtonStyle),
    ToolButtonSize(u16),
    DocumentTabsVisible,
    DocumentTabsPosition(TabPosition),
    DocumentTabsAutoHide,
    SheetTabsVisible,
    SheetTabsPosition(TabPosition),
    SheetTabsAutoHide,
    ShowStatusbar,
    FullScreen,
}

/// Mutually exclusive sets of checkable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionGroup {
    ToolButtonStyle,
    ToolButtonSize,
    DocumentTabsPosition,
    SheetTabsPosition,
}

impl ActionId {
    /// Every action in menu order.
    pub fn all() -> Vec<Self> {
        let mut ids = vec![
            Self::About,
            Self::Colophon,
            Self::Preferences,
            Self::Quit,
            Self::New,
            Self::Open,
            Self::CopyPath,
            Self::CopyFilename,
            Self::Close,
            Self::CloseOther,
            Self::CloseAll,
            Self::ShowPath,
            Self::ShowMenubar,
        ];
        ids.extend(ToolbarId::all().map(Self::ShowToolbar));
        ids.extend(ToolButtonStyle::all().map(Self::ToolButtonStyle));
        ids.extend(
            TOOL_BUTTON_SIZES[1..]
                .iter()
                .chain(&TOOL_BUTTON_SIZES[..1])
                .map(|size| Self::ToolButtonSize(*size)),
        );
        ids.extend([
            Self::DocumentTabsVisible,
            Self::DocumentTabsPosition(TabPosition::Top),
            Self::DocumentTabsPosition(TabPosition::Bottom),
            Self::DocumentTabsAutoHide,
            Self::SheetTabsVisible,
            Self::SheetTabsPosition(TabPosition::Top),
            Self::SheetTabsPosition(TabPosition::Bottom),
            Self::SheetTabsAutoHide,
            Self::ShowStatusbar,
            Self::FullScreen,
        ]);
        ids
    }

    pub fn command_id(self) -> u16 {
        let index = Self::all().iter().position(|id| *id == self).unwrap_or(0);
        COMMAND_ID_BASE + index as u16
    }

    pub fn from_command_id(command: u16) -> Option<Self> {
        let index = command.checked_sub(COMMAND_ID_BASE)?;
        Self::all().get(usize::from(index)).copied()
    }

    pub const fn group(self) -> Option<ActionGroup> {
        match self {
            Self::ToolButtonStyle(_) => Some(ActionGroup::ToolButtonStyle),
            Self::ToolButtonSize(_) => Some(ActionGroup::ToolButtonSize),
            Self::DocumentTabsPosition(_) => Some(ActionGroup::DocumentTabsPosition),
            Self::SheetTabsPosition(_) => Some(ActionGroup::SheetTabsPosition),
            _ => None,
        }
    }

    pub const fn checkable(self) -> bool {
        !matches!(
            self,
            Self::About
                | Self::Colophon
                | Self::Preferences
                | Self::Quit
                | Self::New
                | Self::Open
                | Self::CopyPath
                | Self::CopyFilename
                | Self::Close
                | Self::CloseOther
                | Self::CloseAll
        )
    }

    pub const fn icon_glyph(self) -> &'static str {
        match self {
            Self::About => "\u{E946}",
            Self::Colophon => "\u{E897}",
            Self::Preferences => "\u{E713}",
            Self::Quit => "\u{E7E8}",
            Self::New => "\u{E8A5}",
            Self::Open => "\u{E8E5}",
            Self::CopyPath | Self::CopyFilename => "\u{E8C8}",
            Self::Close => "\u{E8BB}",
            Self::ShowPath => "\u{E8B7}",
            Self::ShowMenubar => "\u{E700}",
            Self::DocumentTabsVisible => "\u{E737}",
            Self::SheetTabsVisible => "\u{E80A}",
            Self::ShowStatusbar => "\u{E9F5}",
            Self::FullScreen => "\u{E740}",
            _ => "",
        }
    }

    fn text(self) -> String {
        match self {
            Self::About => "&About Tabelo".to_string(),
            Self::Colophon => "&Colophon".to_string(),
            Self::Preferences => "&Preferences...".to_string(),
            Self::Quit => "&Quit".to_string(),
            Self::New => "&New".to_string(),
            Self::Open => "&Open...".to_string(),
            Self::CopyPath => "Cop&y Path".to_string(),
            Self::CopyFilename => "Copy &Filename".to_string(),
            Self::Close => "&Close".to_string(),
            Self::CloseOther => "Close Ot&her".to_string(),
            Self::CloseAll => "Clos&e All".to_string(),
            Self::ShowPath => "Show &Path in Titlebar".to_string(),
            Self::ShowMenubar => "Show &Menubar".to_string(),
            Self::ShowToolbar(toolbar) => toolbar.show_action_text().to_string(),
            Self::ToolButtonStyle(style) => style.label().to_string(),
            Self::ToolButtonSize(size) => tool_button_size_label(size).to_string(),
            Self::DocumentTabsVisible => "Show &Document Tabs".to_string(),
            Self::DocumentTabsPosition(position) | Self::SheetTabsPosition(position) => {
                position.label().to_string()
            }
            Self::DocumentTabsAutoHide | Self::SheetTabsAutoHide => "&Auto Hide".to_string(),
            Self::SheetTabsVisible => "Show &Sheet Tabs".to_string(),
            Self::ShowStatusbar => "Show Stat&usbar".to_string(),
            Self::FullScreen => full_screen_text(false).to_string(),
        }
    }

    fn icon_text(self) -> Option<&'static str> {
        match self {
            Self::About => Some("About"),
            Self::ShowPath => Some("Path"),
            Self::ShowMenubar => Some("Menubar"),
            Self::DocumentTabsVisible => Some("Document Tabs"),
            Self::SheetTabsVisible => Some("Sheet Tabs"),
            Self::ShowStatusbar => Some("Statusbar"),
            Self::FullScreen => Some("Full Screen"),
            _ => None,
        }
    }

    fn tooltip(self) -> String {
        match self {
            Self::About => "Brief description of the application".to_string(),
            Self::Colophon => "Lengthy description of the application".to_string(),
            Self::Preferences => "Customize the appearance and behavior of the application".to_string(),
            Self::Quit => "Quit the application".to_string(),
            Self::New => "Create new document".to_string(),
            Self::Open => "Open an existing document".to_string(),
            Self::CopyPath => "Copy document path to clipboard".to_string(),
            Self::CopyFilename => "Copy document filename to clipboard".to_string(),
            Self::Close => "Close document".to_string(),
            Self::CloseOther => "Close other open documents".to_string(),
            Self::CloseAll => "Close all open documents".to_string(),
            Self::ShowPath => "Show document path in the window caption".to_string(),
            Self::ShowMenubar => "Show the menubar".to_string(),
            Self::ShowToolbar(toolbar) => {
                let title = toolbar.title();
                format!("Show the {} toolbar", title.trim_end_matches(" Toolbar"))
            }
            Self::ToolButtonStyle(style) => style.tooltip().to_string(),
            Self::ToolButtonSize(size) => tool_button_size_tooltip(size).to_string(),
            Self::DocumentTabsVisible => "Show the document tabs".to_string(),
            Self::DocumentTabsPosition(TabPosition::Top) => "Show tabs above the documents".to_string(),
            Self::DocumentTabsPosition(TabPosition::Bottom) => "Show tabs below the documents".to_string(),
            Self::DocumentTabsAutoHide => {
                "Tabs are automatically hidden if they contain only 1 document".to_string()
            }
            Self::SheetTabsVisible => "Show the sheet tabs".to_string(),
            Self::SheetTabsPosition(TabPosition::Top) => "Show tabs above the sheets".to_string(),
            Self::SheetTabsPosition(TabPosition::Bottom) => "Show tabs below the sheets".to_string(),
            Self::SheetTabsAutoHide => "Tabs are automatically hidden if they contain only 1 sheet".to_string(),
            Self::ShowStatusbar => "Show the statusbar".to_string(),
            Self::FullScreen => full_screen_tooltip(false).to_string(),
        }
    }

    fn shortcut(self) -> Option<&'static str> {
        match self {
            Self::Quit => Some("Ctrl+Q"),
            Self::New => Some("Ctrl+N"),
            Self::Open => Some("Ctrl+O"),
            Self::Close => Some("Ctrl+W"),
            Self::ShowMenubar => Some("Ctrl+M"),
            Self::FullScreen => Some("F11"),
            _ => None,
        }
    }

    const fn checked_by_default(self) -> bool {
        match self {
            Self::ShowPath
            | Self::ShowMenubar
            | Self::DocumentTabsVisible
            | Self::SheetTabsVisible
            | Self::SheetTabsAutoHide
            | Self::ShowStatusbar
            | Self::ToolButtonStyle(ToolButtonStyle::FollowStyle)
            | Self::ToolButtonSize(0)
            | Self::DocumentTabsPosition(TabPosition::Top)
            | Self::SheetTabsPosition(TabPosition::Bottom) => true,
            Self::ShowToolbar(toolbar) => toolbar.visible_by_default(),
            _ => false,
        }
    }
}

const fn full_screen_text(full_screen: bool) -> &'static str {
    if full_screen { "Exit Full &Screen Mode" } else { "Full &Screen Mode" }
}

const fn full_screen_tooltip(full_screen: bool) -> &'static str {
    if full_screen { "Exit full screen mode" } else { "Display the window in full screen" }
}

const fn full_screen_glyph(full_screen: bool) -> &'static str {
    if full_screen { "\u{E73F}" } else { "\u{E740}" }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub id: ActionId,
    pub text: String,
    pub icon_text: Option<&'static str>,
    pub icon_glyph: &'static str,
    pub tooltip: String,
    pub shortcut: Option<&'static str>,
    pub checkable: bool,
    pub checked: bool,
    pub enabled: bool,
}

impl Action {
    fn new(id: ActionId) -> Self {
        Self {
            id,
            text: id.text(),
            icon_text: id.icon_text(),
            icon_glyph: id.icon_glyph(),
            tooltip: id.tooltip(),
            shortcut: id.shortcut(),
            checkable: id.checkable(),
            checked: id.checked_by_default(),
            enabled: true,
        }
    }

    /// Menu text with the shortcut appended after a tab.
    pub fn menu_text(&self) -> String {
        match self.shortcut {
            Some(shortcut) => format!("{}\t{shortcut}", self.text),
            None => self.text.clone(),
        }
    }
}

/// State of every application action, shared by menus and toolbars.
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    actions: Vec<Action>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            actions: ActionId::all().into_iter().map(Action::new).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|action| action.id == id)
    }

    fn get_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.actions.iter_mut().find(|action| action.id == id)
    }

    pub fn is_enabled(&self, id: ActionId) -> bool {
        self.get(id).is_some_and(|action| action.enabled)
    }

    pub fn is_checked(&self, id: ActionId) -> bool {
        self.get(id).is_some_and(|action| action.checked)
    }

    pub fn set_enabled(&mut self, id: ActionId, enabled: bool) {
        if let Some(action) = self.get_mut(id) {
            action.enabled = enabled;
        }
    }

    /// Checking a grouped action unchecks its siblings.
    pub fn set_checked(&mut self, id: ActionId, checked: bool) {
        if let Some(group) = id.group()
            && checked
        {
            for action in &mut self.actions {
                if action.id.group() == Some(group) {
                    action.checked = action.id == id;
                }
            }
            return;
        }
        if let Some(action) = self.get_mut(id)
            && action.checkable
        {
            action.checked = checked;
        }
    }

    /// Flips the full screen entry between entering and leaving.
    pub fn set_full_screen(&mut self, full_screen: bool) {
        if let Some(action) = self.get_mut(ActionId::FullScreen) {
            action.checked = full_screen;
            action.text = full_screen_text(full_screen).to_string();
            action.tooltip = full_screen_tooltip(full_screen).to_string();
            action.icon_glyph = full_screen_glyph(full_screen);
        }
    }

    /// Action bound to a key chord, e.g. `Ctrl+N`.
    pub fn find_shortcut(&self, virtual_key: u32, ctrl: bool, shift: bool) -> Option<ActionId> {
        self.actions
            .iter()
            .filter(|action| action.enabled)
            .find(|action| {
                action
                    .shortcut
                    .and_then(parse_shortcut)
                    .is_some_and(|chord| chord == (virtual_key, ctrl, shift))
            })
            .map(|action| action.id)
    }
}

/// Parses "Ctrl+Shift+N" or "F11" into a virtual key and modifiers.
fn parse_shortcut(text: &str) -> Option<(u32, bool, bool)> {
    let mut ctrl = false;
    let mut shift = false;
    let mut key = None;
    for part in text.split('+') {
        match part {
            "Ctrl" => ctrl = true,
            "Shift" => shift = true,
            function if function.len() > 1 && function.starts_with('F') => {
                let number = function[1..].parse::<u32>().ok()?;
                key = Some(0x70 + number - 1);
            }
            letter if letter.len() == 1 => {
                let ch = letter.chars().next()?.to_ascii_uppercase();
                key = Some(ch as u32);
            }
            _ => return None,
        }
    }
    key.map(|key| (key, ctrl, shift))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_ids_round_trip_for_every_action() {
        let ids = ActionId::all();
        assert!(ids.iter().all(|id| ActionId::from_command_id(id.command_id()) == Some(*id)));
        assert_eq!(ActionId::from_command_id(COMMAND_ID_BASE - 1), None);
        assert_eq!(ActionId::from_command_id(COMMAND_ID_BASE + ids.len() as u16), None);
    }

    #[test]
    fn grouped_actions_are_exclusive() {
        let mut actions = ActionRegistry::new();
        let follow = ActionId::ToolButtonStyle(ToolButtonStyle::FollowStyle);
        let text_only = ActionId::ToolButtonStyle(ToolButtonStyle::TextOnly);
        assert!(actions.is_checked(follow));

        actions.set_checked(text_only, true);
        assert!(!actions.is_checked(follow));
        assert!(actions.is_checked(text_only));
        let checked_styles = ToolButtonStyle::all()
            .into_iter()
            .filter(|style| actions.is_checked(ActionId::ToolButtonStyle(*style)))
            .count();
        assert_eq!(checked_styles, 1);
        assert!(actions.is_checked(ActionId::SheetTabsPosition(TabPosition::Bottom)));
        assert!(!actions.is_checked(ActionId::SheetTabsPosition(TabPosition::Top)));
    }

    #[test]
    fn plain_actions_are_not_checkable() {
        let mut actions = ActionRegistry::new();
        actions.set_checked(ActionId::New, true);
        assert!(!actions.is_checked(ActionId::New));
    }

    #[test]
    fn full_screen_text_flips() {
        let mut actions = ActionRegistry::new();
        let text = |actions: &ActionRegistry| actions.get(ActionId::FullScreen).map(|a| a.text.clone());
        assert_eq!(text(&actions).as_deref(), Some("Full &Screen Mode"));

        actions.set_full_screen(true);
        assert_eq!(text(&actions).as_deref(), Some("Exit Full &Screen Mode"));
        assert!(actions.is_checked(ActionId::FullScreen));
    }

    #[test]
    fn shortcuts_resolve_to_enabled_actions() {
        let mut actions = ActionRegistry::new();
        assert_eq!(actions.find_shortcut('N' as u32, true, false), Some(ActionId::New));
        assert_eq!(actions.find_shortcut(0x7A, false, false), Some(ActionId::FullScreen));
        assert_eq!(actions.find_shortcut('N' as u32, false, false), None);

        actions.set_enabled(ActionId::Close, false);
        assert_eq!(actions.find_shortcut('W' as u32, true, false), None);
    }

    #[test]
    fn menu_text_carries_the_shortcut() {
        let actions = ActionRegistry::new();
        let menubar = actions.get(ActionId::ShowMenubar).expect("menubar action");
        assert_eq!(menubar.menu_text(), "Show &Menubar\tCtrl+M");
        let toolbar = actions
            .get(ActionId::ShowToolbar(ToolbarId::Format))
            .expect("format toolbar action");
        assert_eq!(toolbar.tooltip, "Show the Format toolbar");
    }
}
