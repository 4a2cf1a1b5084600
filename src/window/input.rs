use windows::Win32::{
    Foundation::LPARAM,
    UI::Input::KeyboardAndMouse::{GetKeyState, VK_CONTROL, VK_MENU, VK_SHIFT, VK_TAB},
};

use tabelo::{
    app::actions::{ActionId, ActionRegistry},
    ui::Point,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyModifiers {
    pub fn current() -> Self {
        let down = |key: u16| unsafe { GetKeyState(i32::from(key)) } < 0;
        Self {
            ctrl: down(VK_CONTROL.0),
            shift: down(VK_SHIFT.0),
            alt: down(VK_MENU.0),
        }
    }
}

/// Action bound to a key chord. Alt chords belong to the menu bar.
pub fn resolve_shortcut(actions: &ActionRegistry, vk: u32, modifiers: KeyModifiers) -> Option<ActionId> {
    if modifiers.alt {
        return None;
    }
    actions.find_shortcut(vk, modifiers.ctrl, modifiers.shift)
}

/// Ctrl+Tab walks the document tabs forward, Ctrl+Shift+Tab backward.
/// Returns the direction, `true` for forward.
pub fn document_cycle(vk: u32, modifiers: KeyModifiers) -> Option<bool> {
    (vk == u32::from(VK_TAB.0) && modifiers.ctrl && !modifiers.alt).then_some(!modifiers.shift)
}

pub fn point_from_lparam(lparam: LPARAM) -> Point {
    let raw = lparam.0 as u32;
    let x = (raw & 0xFFFF) as i16 as f32;
    let y = ((raw >> 16) & 0xFFFF) as i16 as f32;
    Point { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_chords() {
        let actions = ActionRegistry::new();
        let ctrl = KeyModifiers {
            ctrl: true,
            ..KeyModifiers::default()
        };

        assert_eq!(resolve_shortcut(&actions, 0x4E, ctrl), Some(ActionId::New));
        assert_eq!(resolve_shortcut(&actions, 0x7A, KeyModifiers::default()), Some(ActionId::FullScreen));
        assert_eq!(
            resolve_shortcut(&actions, 0x4E, KeyModifiers { alt: true, ..ctrl }),
            None
        );
    }

    #[test]
    fn control_tab_cycles_documents() {
        let ctrl = KeyModifiers {
            ctrl: true,
            ..KeyModifiers::default()
        };

        assert_eq!(document_cycle(0x09, ctrl), Some(true));
        assert_eq!(document_cycle(0x09, KeyModifiers { shift: true, ..ctrl }), Some(false));
        assert_eq!(document_cycle(0x09, KeyModifiers::default()), None);
        assert_eq!(document_cycle(0x4E, ctrl), None);
    }

    #[test]
    fn lparam_coordinates_are_signed() {
        let lparam = LPARAM(((-5i16 as u16 as u32) | (40 << 16)) as isize);
        assert_eq!(point_from_lparam(lparam), Point { x: -5.0, y: 40.0 });
    }
}
