use tracing::{debug, info};

use crate::settings::SettingsStore;

pub const CONFIRM_QUIT_APPLICATION: &str = "ConfirmQuitApplication";
pub const CONFIRM_CLOSE_OTHER_DOCUMENTS: &str = "ConfirmCloseOtherDocuments";
pub const CONFIRM_CLOSE_ALL_DOCUMENTS: &str = "ConfirmCloseAllDocuments";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
    Yes,
    Cancel,
}

impl DialogButton {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "&Yes",
            Self::Cancel => "Cancel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogIcon {
    Information,
    Warning,
    Critical,
    Question,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    /// Key under `Confirmations/` that suppresses the prompt.
    pub id: &'static str,
    pub icon: DialogIcon,
    pub title: String,
    pub text: String,
    pub buttons: Vec<DialogButton>,
    pub default_button: DialogButton,
}

impl ConfirmationRequest {
    pub fn warning(id: &'static str, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            icon: DialogIcon::Warning,
            title: title.into(),
            text: text.into(),
            buttons: vec![DialogButton::Yes, DialogButton::Cancel],
            default_button: DialogButton::Yes,
        }
    }

    pub fn quit_application() -> Self {
        Self::warning(
            CONFIRM_QUIT_APPLICATION,
            "Quit the application",
            "This will close all open documents and quit the application.\nAre you sure you want to continue?",
        )
    }

    pub fn close_other_documents() -> Self {
        Self::warning(
            CONFIRM_CLOSE_OTHER_DOCUMENTS,
            "Close all documents beside current one",
            "This will close all open documents beside the current one.\nAre you sure you want to continue?",
        )
    }

    /// Variant raised from a document window's own menu.
    pub fn close_documents_except_this() -> Self {
        Self::warning(
            CONFIRM_CLOSE_OTHER_DOCUMENTS,
            "Close all documents except this one",
            "This will close all open documents except this one.\nAre you sure you want to continue?",
        )
    }

    pub fn close_all_documents() -> Self {
        Self::warning(
            CONFIRM_CLOSE_ALL_DOCUMENTS,
            "Close all documents",
            "This will close all open documents.\nAre you sure you want to continue?",
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptReply {
    pub button: DialogButton,
    pub do_not_show_again: bool,
}

impl PromptReply {
    #[cfg(test)]
    pub const fn yes() -> Self {
        Self {
            button: DialogButton::Yes,
            do_not_show_again: false,
        }
    }

    pub const fn cancel() -> Self {
        Self {
            button: DialogButton::Cancel,
            do_not_show_again: false,
        }
    }
}

/// Shows a modal question with a "Do not show again" check box.
pub trait Prompter {
    fn prompt(&mut self, request: &ConfirmationRequest) -> PromptReply;
}

pub struct ConfirmationDialog;

impl ConfirmationDialog {
    pub const DO_NOT_SHOW_AGAIN: &'static str = "Do not show again";

    /// Asks unless the user suppressed this prompt before, in which case the
    /// answer is `Yes`. Ticking the check box only sticks when confirming.
    pub fn warning(
        prompter: &mut dyn Prompter,
        store: &mut SettingsStore,
        request: &ConfirmationRequest,
    ) -> DialogButton {
        if !store.settings().confirmation_enabled(request.id) {
            debug!(id = request.id, "confirmation suppressed");
            return DialogButton::Yes;
        }

        let reply = prompter.prompt(request);
        if reply.button == DialogButton::Yes && reply.do_not_show_again {
            store.update(|settings| settings.set_confirmation_enabled(request.id, false));
            info!(id = request.id, "confirmation will no longer be shown");
        }
        reply.button
    }
}
