use std::{ffi::OsString, os::windows::ffi::OsStringExt, path::PathBuf};

use tracing::{debug, warn};
use widestring::U16CString;
use windows::{
    Win32::{
        Foundation::HWND,
        UI::{
            Controls::{
                Dialogs::{
                    GetOpenFileNameW, OFN_ALLOWMULTISELECT, OFN_EXPLORER, OFN_FILEMUSTEXIST, OFN_PATHMUSTEXIST,
                    OPENFILENAMEW,
                },
                TASKDIALOG_BUTTON, TASKDIALOG_COMMON_BUTTON_FLAGS, TASKDIALOGCONFIG, TASKDIALOGCONFIG_0,
                TD_ERROR_ICON, TD_INFORMATION_ICON, TD_WARNING_ICON, TDCBF_CANCEL_BUTTON, TDCBF_CLOSE_BUTTON,
                TDCBF_YES_BUTTON, TDF_ALLOW_DIALOG_CANCELLATION, TDF_POSITION_RELATIVE_TO_WINDOW,
                TDF_USE_COMMAND_LINKS, TaskDialogIndirect,
            },
            WindowsAndMessaging::IDYES,
        },
    },
    core::{BOOL, PCWSTR, PWSTR, w},
};

use tabelo::{
    document::DocumentUrl,
    error::Result,
    ui::{
        about::{APPLICATION_NAME, AboutDialog},
        colophon::{ColophonDialog, ColophonPage},
        confirmation::{ConfirmationDialog, ConfirmationRequest, DialogButton, DialogIcon, PromptReply, Prompter},
    },
};

const PAGE_BUTTON_BASE: i32 = 200;
const OPEN_BUFFER_LEN: usize = 32 * 1024;

struct TaskDialog<'a> {
    owner: HWND,
    title: &'a str,
    instruction: &'a str,
    content: &'a str,
    icon: PCWSTR,
    common_buttons: TASKDIALOG_COMMON_BUTTON_FLAGS,
    buttons: Vec<(i32, String)>,
    default_button: i32,
    verification: Option<&'a str>,
}

impl<'a> TaskDialog<'a> {
    fn new(owner: HWND, title: &'a str, content: &'a str) -> Self {
        Self {
            owner,
            title,
            instruction: "",
            content,
            icon: PCWSTR::null(),
            common_buttons: TDCBF_CLOSE_BUTTON,
            buttons: Vec::new(),
            default_button: 0,
            verification: None,
        }
    }

    /// Returns the pressed button id and the verification check box state.
    fn show(&self) -> Result<(i32, bool)> {
        let title = U16CString::from_str_truncate(self.title);
        let instruction = U16CString::from_str_truncate(self.instruction);
        let content = U16CString::from_str_truncate(self.content);
        let verification = self.verification.map(|text| U16CString::from_str_truncate(text));
        let labels: Vec<U16CString> = self
            .buttons
            .iter()
            .map(|(_, text)| U16CString::from_str_truncate(text))
            .collect();
        let buttons: Vec<TASKDIALOG_BUTTON> = self
            .buttons
            .iter()
            .zip(&labels)
            .map(|((id, _), label)| TASKDIALOG_BUTTON {
                nButtonID: *id,
                pszButtonText: PCWSTR(label.as_ptr()),
            })
            .collect();

        let mut flags = TDF_ALLOW_DIALOG_CANCELLATION | TDF_POSITION_RELATIVE_TO_WINDOW;
        if !buttons.is_empty() {
            flags |= TDF_USE_COMMAND_LINKS;
        }

        let config = TASKDIALOGCONFIG {
            cbSize: std::mem::size_of::<TASKDIALOGCONFIG>() as u32,
            hwndParent: self.owner,
            dwFlags: flags,
            dwCommonButtons: self.common_buttons,
            pszWindowTitle: PCWSTR(title.as_ptr()),
            Anonymous1: TASKDIALOGCONFIG_0 { pszMainIcon: self.icon },
            pszMainInstruction: if self.instruction.is_empty() {
                PCWSTR::null()
            } else {
                PCWSTR(instruction.as_ptr())
            },
            pszContent: PCWSTR(content.as_ptr()),
            cButtons: buttons.len() as u32,
            pButtons: if buttons.is_empty() {
                std::ptr::null()
            } else {
                buttons.as_ptr()
            },
            nDefaultButton: self.default_button,
            pszVerificationText: verification
                .as_ref()
                .map_or(PCWSTR::null(), |text| PCWSTR(text.as_ptr())),
            ..Default::default()
        };

        let mut pressed = 0i32;
        let mut verified = BOOL(0);
        unsafe { TaskDialogIndirect(&config, Some(&mut pressed), None, Some(&mut verified))? };
        Ok((pressed, verified.as_bool()))
    }
}

fn icon_resource(icon: DialogIcon) -> PCWSTR {
    match icon {
        DialogIcon::Information | DialogIcon::Question => TD_INFORMATION_ICON,
        DialogIcon::Warning => TD_WARNING_ICON,
        DialogIcon::Critical => TD_ERROR_ICON,
    }
}

/// Confirmation prompts as native task dialogs.
pub struct TaskDialogPrompter {
    owner: HWND,
}

impl TaskDialogPrompter {
    pub fn new(owner: HWND) -> Self {
        Self { owner }
    }
}

impl Prompter for TaskDialogPrompter {
    fn prompt(&mut self, request: &ConfirmationRequest) -> PromptReply {
        let mut dialog = TaskDialog::new(self.owner, &request.title, &request.text);
        dialog.instruction = &request.title;
        dialog.icon = icon_resource(request.icon);
        dialog.common_buttons = request
            .buttons
            .iter()
            .fold(TASKDIALOG_COMMON_BUTTON_FLAGS(0), |flags, button| match button {
                DialogButton::Yes => flags | TDCBF_YES_BUTTON,
                DialogButton::Cancel => flags | TDCBF_CANCEL_BUTTON,
            });
        if request.default_button == DialogButton::Yes {
            dialog.default_button = IDYES.0;
        }
        dialog.verification = Some(ConfirmationDialog::DO_NOT_SHOW_AGAIN);

        match dialog.show() {
            Ok((pressed, do_not_show_again)) => PromptReply {
                button: if pressed == IDYES.0 {
                    DialogButton::Yes
                } else {
                    DialogButton::Cancel
                },
                do_not_show_again,
            },
            Err(err) => {
                warn!(%err, id = request.id, "confirmation dialog failed");
                PromptReply::cancel()
            }
        }
    }
}

pub fn show_about(owner: HWND) -> Result<()> {
    let about = AboutDialog::new();
    let text = about.text();
    let mut dialog = TaskDialog::new(owner, &about.title, &text);
    dialog.instruction = APPLICATION_NAME;
    dialog.icon = TD_INFORMATION_ICON;
    dialog.show()?;
    Ok(())
}

/// Shows one colophon page at a time; page buttons switch between them.
pub fn show_colophon(owner: HWND) -> Result<()> {
    let mut colophon = ColophonDialog::new();
    let pages = ColophonPage::all();
    loop {
        let title = colophon.title();
        let text = colophon.page_text();
        let mut dialog = TaskDialog::new(owner, &title, &text);
        dialog.instruction = colophon.current.title();
        dialog.buttons = pages
            .iter()
            .enumerate()
            .filter(|(_, page)| **page != colophon.current)
            .map(|(index, page)| (PAGE_BUTTON_BASE + index as i32, page.title().to_string()))
            .collect();

        let (pressed, _) = dialog.show()?;
        let Some(page) = usize::try_from(pressed - PAGE_BUTTON_BASE)
            .ok()
            .and_then(|index| pages.get(index))
        else {
            return Ok(());
        };
        colophon.select(*page);
    }
}

pub fn pick_open_files(owner: HWND) -> Vec<DocumentUrl> {
    let mut file_buffer = vec![0u16; OPEN_BUFFER_LEN];
    let mut filter = String::new();
    filter.push_str("Spreadsheets (*.ods;*.xlsx;*.csv)\0*.ods;*.xlsx;*.csv\0");
    filter.push_str("All Files (*.*)\0*.*\0\0");
    let filter_wide = filter.encode_utf16().collect::<Vec<u16>>();

    let mut open = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: owner,
        lpstrFilter: PCWSTR::from_raw(filter_wide.as_ptr()),
        lpstrFile: PWSTR(file_buffer.as_mut_ptr()),
        nMaxFile: file_buffer.len() as u32,
        lpstrTitle: w!("Open Documents"),
        Flags: OFN_EXPLORER | OFN_FILEMUSTEXIST | OFN_PATHMUSTEXIST | OFN_ALLOWMULTISELECT,
        ..Default::default()
    };

    if !unsafe { GetOpenFileNameW(&mut open).as_bool() } {
        debug!("open dialog dismissed");
        return Vec::new();
    }

    selected_paths(&file_buffer)
        .into_iter()
        .map(DocumentUrl::from_local_file)
        .collect()
}

/// Splits the dialog buffer: a single path, or a directory followed by names.
fn selected_paths(buffer: &[u16]) -> Vec<PathBuf> {
    let parts: Vec<PathBuf> = buffer
        .split(|unit| *unit == 0)
        .take_while(|part| !part.is_empty())
        .map(|part| PathBuf::from(OsString::from_wide(part)))
        .collect();

    match parts.split_first() {
        None => Vec::new(),
        Some((single, [])) => vec![single.clone()],
        Some((directory, names)) => names.iter().map(|name| directory.join(name)).collect(),
    }
}
