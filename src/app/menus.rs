use crate::{
    app::actions::{ActionGroup, ActionId, ActionRegistry},
    settings::schema::TOOL_BUTTON_SIZES,
    ui::{
        TabPosition,
        toolbar::{ToolButtonStyle, Toolbar, ToolbarId, ToolbarItem},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Action(ActionId),
    Separator,
    /// Titled divider inside a submenu.
    Section(&'static str),
    Submenu(Menu),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: &'static str,
    pub items: Vec<MenuItem>,
    /// The submenu is only enabled while this action is checked.
    pub enabled_by: Option<ActionId>,
}

impl Menu {
    fn new(title: &'static str, items: Vec<MenuItem>) -> Self {
        Self {
            title,
            items,
            enabled_by: None,
        }
    }

    pub fn is_enabled(&self, actions: &ActionRegistry) -> bool {
        self.enabled_by.is_none_or(|id| actions.is_checked(id))
    }

    /// Every action reachable from this menu, submenus included.
    pub fn action_ids(&self) -> Vec<ActionId> {
        self.items
            .iter()
            .flat_map(|item| match item {
                MenuItem::Action(id) => vec![*id],
                MenuItem::Submenu(menu) => menu.action_ids(),
                MenuItem::Separator | MenuItem::Section(_) => Vec::new(),
            })
            .collect()
    }
}

fn actions(ids: impl IntoIterator<Item = ActionId>) -> impl Iterator<Item = MenuItem> {
    ids.into_iter().map(MenuItem::Action)
}

fn tab_position_menu(title: &'static str, group: ActionGroup, enabled_by: ActionId) -> Menu {
    let (top, bottom, auto_hide) = match group {
        ActionGroup::SheetTabsPosition => (
            ActionId::SheetTabsPosition(TabPosition::Top),
            ActionId::SheetTabsPosition(TabPosition::Bottom),
            ActionId::SheetTabsAutoHide,
        ),
        _ => (
            ActionId::DocumentTabsPosition(TabPosition::Top),
            ActionId::DocumentTabsPosition(TabPosition::Bottom),
            ActionId::DocumentTabsAutoHide,
        ),
    };
    Menu {
        title,
        items: vec![
            MenuItem::Section("Position"),
            MenuItem::Action(top),
            MenuItem::Action(bottom),
            MenuItem::Section("Behavior"),
            MenuItem::Action(auto_hide),
        ],
        enabled_by: Some(enabled_by),
    }
}

fn tool_button_style_menu() -> Menu {
    let mut items = vec![MenuItem::Section("Text Position")];
    items.extend(actions(ToolButtonStyle::all().map(ActionId::ToolButtonStyle)));
    items.push(MenuItem::Section("Icon Size"));
    items.extend(actions(
        TOOL_BUTTON_SIZES[1..]
            .iter()
            .chain(&TOOL_BUTTON_SIZES[..1])
            .map(|size| ActionId::ToolButtonSize(*size)),
    ));
    Menu::new("Tool Button St&yle", items)
}

/// The main window's menu bar.
pub fn menu_bar() -> Vec<Menu> {
    let application = Menu::new(
        "&Application",
        vec![
            MenuItem::Action(ActionId::About),
            MenuItem::Action(ActionId::Colophon),
            MenuItem::Separator,
            MenuItem::Action(ActionId::Preferences),
            MenuItem::Separator,
            MenuItem::Action(ActionId::Quit),
        ],
    );

    let file = Menu::new(
        "&File",
        vec![
            MenuItem::Action(ActionId::New),
            MenuItem::Separator,
            MenuItem::Action(ActionId::Open),
            MenuItem::Separator,
            MenuItem::Action(ActionId::CopyPath),
            MenuItem::Action(ActionId::CopyFilename),
            MenuItem::Separator,
            MenuItem::Action(ActionId::Close),
            MenuItem::Action(ActionId::CloseOther),
            MenuItem::Action(ActionId::CloseAll),
        ],
    );

    let mut appearance = vec![
        MenuItem::Action(ActionId::ShowPath),
        MenuItem::Separator,
        MenuItem::Action(ActionId::ShowMenubar),
        MenuItem::Separator,
    ];
    appearance.extend(actions(ToolbarId::all().map(ActionId::ShowToolbar)));
    appearance.extend([
        MenuItem::Submenu(tool_button_style_menu()),
        MenuItem::Separator,
        MenuItem::Action(ActionId::DocumentTabsVisible),
        MenuItem::Submenu(tab_position_menu(
            "Document Tab &Position",
            ActionGroup::DocumentTabsPosition,
            ActionId::DocumentTabsVisible,
        )),
        MenuItem::Action(ActionId::SheetTabsVisible),
        MenuItem::Submenu(tab_position_menu(
            "Sheet Tab P&osition",
            ActionGroup::SheetTabsPosition,
            ActionId::SheetTabsVisible,
        )),
        MenuItem::Separator,
        MenuItem::Action(ActionId::ShowStatusbar),
        MenuItem::Separator,
        MenuItem::Action(ActionId::FullScreen),
    ]);

    vec![
        application,
        file,
        Menu::new("&Edit", Vec::new()),
        Menu::new("&View", Vec::new()),
        Menu::new("F&ormat", Vec::new()),
        Menu::new("&Tools", Vec::new()),
        Menu::new("Appea&rance", appearance),
        Menu::new("&Help", Vec::new()),
    ]
}

/// The main window's toolbars with their default visibility.
pub fn default_toolbars() -> Vec<Toolbar> {
    ToolbarId::all()
        .into_iter()
        .map(|id| {
            let items = match id {
                ToolbarId::Application => vec![
                    ToolbarItem::Action(ActionId::About),
                    ToolbarItem::Action(ActionId::Preferences),
                    ToolbarItem::Separator,
                    ToolbarItem::Action(ActionId::Quit),
                ],
                ToolbarId::File => vec![
                    ToolbarItem::Action(ActionId::New),
                    ToolbarItem::Action(ActionId::Open),
                    ToolbarItem::Separator,
                    ToolbarItem::Action(ActionId::Close),
                ],
                ToolbarId::Appearance => vec![
                    ToolbarItem::Action(ActionId::ShowMenubar),
                    ToolbarItem::Action(ActionId::DocumentTabsVisible),
                    ToolbarItem::Action(ActionId::SheetTabsVisible),
                    ToolbarItem::Action(ActionId::ShowStatusbar),
                    ToolbarItem::Separator,
                    ToolbarItem::Action(ActionId::FullScreen),
                ],
                ToolbarId::Edit | ToolbarId::View | ToolbarId::Format | ToolbarId::Tools | ToolbarId::Help => {
                    Vec::new()
                }
            };
            Toolbar::new(id, items)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_bar_lists_the_eight_menus() {
        let titles = menu_bar().iter().map(|menu| menu.title).collect::<Vec<_>>();
        assert_eq!(
            titles,
            ["&Application", "&File", "&Edit", "&View", "F&ormat", "&Tools", "Appea&rance", "&Help"]
        );
    }

    #[test]
    fn every_action_is_reachable_from_the_menu_bar() {
        let reachable = menu_bar().iter().flat_map(Menu::action_ids).collect::<Vec<_>>();
        for id in ActionId::all() {
            assert!(reachable.contains(&id), "{id:?} is not in any menu");
        }
    }

    #[test]
    fn tab_position_submenus_follow_their_visibility_action() {
        let mut actions = ActionRegistry::new();
        let appearance = menu_bar().into_iter().nth(6).expect("appearance menu");
        let sheet_menu = appearance
            .items
            .iter()
            .find_map(|item| match item {
                MenuItem::Submenu(menu) if menu.title == "Sheet Tab P&osition" => Some(menu.clone()),
                _ => None,
            })
            .expect("sheet tab submenu");

        assert!(sheet_menu.is_enabled(&actions));
        actions.set_checked(ActionId::SheetTabsVisible, false);
        assert!(!sheet_menu.is_enabled(&actions));
    }

    #[test]
    fn appearance_and_help_toolbars_start_hidden() {
        let toolbars = default_toolbars();
        assert_eq!(toolbars.len(), 8);
        let hidden = toolbars
            .iter()
            .filter(|toolbar| !toolbar.visible)
            .map(|toolbar| toolbar.id)
            .collect::<Vec<_>>();
        assert_eq!(hidden, [ToolbarId::Appearance, ToolbarId::Help]);
    }
}
