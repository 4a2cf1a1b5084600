use widestring::U16CString;
use windows::{
    Win32::{
        Foundation::{HWND, POINT},
        UI::WindowsAndMessaging::{
            AppendMenuW, CheckMenuItem, CreateMenu, CreatePopupMenu, DestroyMenu, DrawMenuBar, EnableMenuItem,
            HMENU, MENU_ITEM_FLAGS, MF_BYCOMMAND, MF_BYPOSITION, MF_CHECKED, MF_ENABLED, MF_GRAYED, MF_POPUP,
            MF_SEPARATOR, MF_STRING, MF_UNCHECKED, ModifyMenuW, SetMenu, TPM_RETURNCMD, TPM_RIGHTBUTTON,
            TrackPopupMenuEx,
        },
    },
    core::PCWSTR,
};

use tabelo::{
    app::{
        actions::{ActionId, ActionRegistry},
        menus::{Menu, MenuItem},
    },
    error::Result,
    workspace::window::{SystemMenuItem, WindowAction},
};

const SYSTEM_MENU_BASE: usize = 0x7000;

/// Submenu whose enabled state follows a checkable action.
struct GatedSubmenu {
    parent: HMENU,
    position: u32,
    enabled_by: ActionId,
}

/// Native menu bar built from the application's menu model.
pub struct NativeMenuBar {
    bar: HMENU,
    commands: Vec<(HMENU, ActionId)>,
    gated: Vec<GatedSubmenu>,
    attached: bool,
}

impl NativeMenuBar {
    pub fn build(menus: &[Menu], actions: &ActionRegistry) -> Result<Self> {
        let bar = unsafe { CreateMenu()? };
        let mut native = Self {
            bar,
            commands: Vec::new(),
            gated: Vec::new(),
            attached: false,
        };
        for (position, menu) in menus.iter().enumerate() {
            let popup = native.build_popup(menu, actions)?;
            append(bar, MF_POPUP, popup.0 as usize, menu.title)?;
            if let Some(enabled_by) = menu.enabled_by {
                native.gated.push(GatedSubmenu {
                    parent: bar,
                    position: position as u32,
                    enabled_by,
                });
            }
        }
        Ok(native)
    }

    fn build_popup(&mut self, menu: &Menu, actions: &ActionRegistry) -> Result<HMENU> {
        let popup = unsafe { CreatePopupMenu()? };
        for (position, item) in menu.items.iter().enumerate() {
            match item {
                MenuItem::Action(id) => {
                    let text = actions.get(*id).map(|action| action.menu_text()).unwrap_or_default();
                    append(popup, MF_STRING, usize::from(id.command_id()), &text)?;
                    self.commands.push((popup, *id));
                }
                MenuItem::Separator => unsafe {
                    AppendMenuW(popup, MF_SEPARATOR, 0, PCWSTR::null())?;
                },
                MenuItem::Section(title) => {
                    if position > 0 {
                        unsafe { AppendMenuW(popup, MF_SEPARATOR, 0, PCWSTR::null())? };
                    }
                    append(popup, MF_STRING | MF_GRAYED, 0, title)?;
                }
                MenuItem::Submenu(child) => {
                    let submenu = self.build_popup(child, actions)?;
                    append(popup, MF_POPUP, submenu.0 as usize, child.title)?;
                    if let Some(enabled_by) = child.enabled_by {
                        self.gated.push(GatedSubmenu {
                            parent: popup,
                            position: position as u32,
                            enabled_by,
                        });
                    }
                }
            }
        }
        Ok(popup)
    }

    /// Mirrors enabled, checked and text state of every action.
    pub fn sync(&self, hwnd: HWND, actions: &ActionRegistry) {
        for (menu, id) in &self.commands {
            let Some(action) = actions.get(*id) else {
                continue;
            };
            let command = u32::from(id.command_id());
            if *id == ActionId::FullScreen
                && let Ok(text) = U16CString::from_str(action.menu_text())
            {
                let _ = unsafe {
                    ModifyMenuW(
                        *menu,
                        command,
                        MF_BYCOMMAND | MF_STRING,
                        usize::from(id.command_id()),
                        PCWSTR(text.as_ptr()),
                    )
                };
            }
            let enabled = if action.enabled { MF_ENABLED } else { MF_GRAYED };
            let checked = if action.checked { MF_CHECKED } else { MF_UNCHECKED };
            unsafe {
                let _ = EnableMenuItem(*menu, command, MF_BYCOMMAND | enabled);
                CheckMenuItem(*menu, command, (MF_BYCOMMAND | checked).0);
            }
        }

        for submenu in &self.gated {
            let enabled = if actions.is_checked(submenu.enabled_by) { MF_ENABLED } else { MF_GRAYED };
            let _ = unsafe { EnableMenuItem(submenu.parent, submenu.position, MF_BYPOSITION | enabled) };
        }

        if self.attached {
            let _ = unsafe { DrawMenuBar(hwnd) };
        }
    }

    /// Attaches or detaches the bar from the window.
    pub fn set_visible(&mut self, hwnd: HWND, visible: bool) -> Result<()> {
        if visible == self.attached {
            return Ok(());
        }
        unsafe { SetMenu(hwnd, visible.then_some(self.bar))? };
        self.attached = visible;
        Ok(())
    }

    /// A detached bar is not destroyed with the window.
    pub fn destroy_if_detached(&mut self) {
        if !self.attached {
            let _ = unsafe { DestroyMenu(self.bar) };
        }
    }
}

/// Pops up a document's own menu at `screen` and returns the chosen entry.
pub fn track_system_menu(hwnd: HWND, items: &[SystemMenuItem], screen: POINT) -> Result<Option<WindowAction>> {
    let popup = unsafe { CreatePopupMenu()? };
    let built = append_system_items(popup, items);
    let chosen = built.map(|()| {
        let command = unsafe {
            TrackPopupMenuEx(
                popup,
                TPM_RETURNCMD.0 | TPM_RIGHTBUTTON.0,
                screen.x,
                screen.y,
                hwnd,
                None,
            )
        };
        usize::try_from(command.0)
            .ok()
            .and_then(|command| command.checked_sub(SYSTEM_MENU_BASE))
            .and_then(|index| items.get(index))
            .map(|item| item.action)
    });
    let _ = unsafe { DestroyMenu(popup) };
    chosen
}

fn append_system_items(popup: HMENU, items: &[SystemMenuItem]) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
        if item.action.starts_group() {
            unsafe { AppendMenuW(popup, MF_SEPARATOR, 0, PCWSTR::null())? };
        }
        let mut flags = MF_STRING;
        if !item.enabled {
            flags |= MF_GRAYED;
        }
        if item.checked == Some(true) {
            flags |= MF_CHECKED;
        }
        append(popup, flags, SYSTEM_MENU_BASE + index, item.action.text())?;
    }
    Ok(())
}

fn append(menu: HMENU, flags: MENU_ITEM_FLAGS, id: usize, text: &str) -> Result<()> {
    let wide = U16CString::from_str_truncate(text);
    unsafe { AppendMenuW(menu, flags, id, PCWSTR(wide.as_ptr()))? };
    Ok(())
}
