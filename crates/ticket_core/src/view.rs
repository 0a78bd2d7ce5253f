use shared::domain::TICKET_TITLE;

use crate::dialog::{Dialog, DialogPhase};

pub const LOADING_CAPTION: &str = "Loading Alumni Services...";
pub const SUBMIT_LABEL: &str = "Create Ticket";
pub const SUBMIT_BUSY_LABEL: &str = "Creating...";

/// Everything a front end needs to draw the dialog, rebuilt after every
/// transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogView {
    pub phase: DialogPhase,
    pub title: &'static str,
    pub busy: bool,
    pub category: String,
    pub category_options: Vec<String>,
    pub phone_digits: String,
    pub description: String,
    pub attachment_names: Vec<String>,
    pub attachment_required: bool,
    pub instructions: Option<String>,
    pub error_message: Option<String>,
    pub result_message: Option<&'static str>,
    pub loading_caption: Option<&'static str>,
    pub submit_label: &'static str,
    pub cancel_enabled: bool,
}

impl DialogView {
    pub(crate) fn from_dialog(dialog: &Dialog) -> Self {
        let form = dialog.form();
        let directory = dialog.directory();
        let selected = form.selected_category();
        let busy = dialog.is_busy();

        Self {
            phase: dialog.phase(),
            title: TICKET_TITLE,
            busy,
            category: form.category().to_string(),
            category_options: directory.names().map(str::to_string).collect(),
            phone_digits: form.phone_digits().to_string(),
            description: form.description().to_string(),
            attachment_names: form
                .attachments()
                .iter()
                .map(|file| file.name().to_string())
                .collect(),
            attachment_required: selected.is_some_and(|name| directory.requires_attachment(name)),
            instructions: selected
                .and_then(|name| directory.instructions(name))
                .map(str::to_string),
            error_message: form.error_message().map(str::to_string),
            result_message: match dialog.phase() {
                DialogPhase::ResultShown(outcome) => Some(outcome.message()),
                _ => None,
            },
            loading_caption: (dialog.phase() == DialogPhase::Loading).then_some(LOADING_CAPTION),
            submit_label: if busy { SUBMIT_BUSY_LABEL } else { SUBMIT_LABEL },
            cancel_enabled: !busy,
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase != DialogPhase::Closed
    }

    /// The form is visible whenever no result view covers it.
    pub fn shows_form(&self) -> bool {
        self.phase == DialogPhase::Editing
    }
}
