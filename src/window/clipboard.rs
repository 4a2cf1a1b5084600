use std::{mem::size_of, ptr::copy_nonoverlapping};

use windows::Win32::{
    Foundation::{HANDLE, HGLOBAL, HWND},
    System::{
        DataExchange::{CloseClipboard, EmptyClipboard, OpenClipboard, SetClipboardData},
        Memory::{GMEM_MOVEABLE, GlobalAlloc, GlobalLock, GlobalUnlock},
    },
};

use tabelo::{clipboard::Clipboard, error::Result};

const CF_UNICODETEXT: u32 = 13;

/// The Windows clipboard, owned by the main window.
pub struct SystemClipboard {
    owner: HWND,
}

impl SystemClipboard {
    pub fn new(owner: HWND) -> Self {
        Self { owner }
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let _guard = ClipboardGuard::open(self.owner)?;
        unsafe {
            EmptyClipboard()?;
        }
        set_unicode_text(text)
    }
}

struct ClipboardGuard;

impl ClipboardGuard {
    fn open(owner: HWND) -> Result<Self> {
        unsafe {
            OpenClipboard(Some(owner))?;
        }
        Ok(Self)
    }
}

impl Drop for ClipboardGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseClipboard();
        }
    }
}

fn set_unicode_text(text: &str) -> Result<()> {
    let mut utf16: Vec<u16> = text.encode_utf16().collect();
    utf16.push(0);
    let byte_len = utf16.len() * size_of::<u16>();

    unsafe {
        let handle: HGLOBAL = GlobalAlloc(GMEM_MOVEABLE, byte_len)?;
        let ptr = GlobalLock(handle) as *mut u8;
        if ptr.is_null() {
            return Err(windows::core::Error::from_thread().into());
        }
        copy_nonoverlapping(utf16.as_ptr() as *const u8, ptr, byte_len);
        let _ = GlobalUnlock(handle);
        SetClipboardData(CF_UNICODETEXT, Some(HANDLE(handle.0)))?;
    }
    Ok(())
}
