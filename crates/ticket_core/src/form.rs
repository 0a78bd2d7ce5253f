//! User-entered values of one dialog session.

use shared::domain::{PHONE_DIGITS, PHONE_PREFIX, UNSELECTED_CATEGORY};

use crate::attachment::SelectedFile;

#[derive(Debug, Clone)]
pub struct FormState {
    category: String,
    phone_number: String,
    description: String,
    attachments: Vec<SelectedFile>,
    error_message: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            category: UNSELECTED_CATEGORY.to_string(),
            phone_number: PHONE_PREFIX.to_string(),
            description: String::new(),
            attachments: Vec::new(),
            error_message: String::new(),
        }
    }
}

impl FormState {
    /// Raw dropdown value, the unselected placeholder included.
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn selected_category(&self) -> Option<&str> {
        (self.category != UNSELECTED_CATEGORY).then_some(self.category.as_str())
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// What the phone input shows: the number without its prefix.
    pub fn phone_digits(&self) -> &str {
        &self.phone_number[PHONE_PREFIX.len()..]
    }

    /// Rebuilds the number from the prefix and the input's content, capped
    /// at the input's maximum length.
    pub fn set_phone_digits(&mut self, raw: &str) {
        let digits: String = raw.chars().take(PHONE_DIGITS).collect();
        self.phone_number = format!("{PHONE_PREFIX}{digits}");
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn attachments(&self) -> &[SelectedFile] {
        &self.attachments
    }

    /// Only the first selected file is ever submitted.
    pub fn attachment(&self) -> Option<&SelectedFile> {
        self.attachments.first()
    }

    pub fn set_attachments(&mut self, files: Vec<SelectedFile>) {
        self.attachments = files;
    }

    pub fn error_message(&self) -> Option<&str> {
        (!self.error_message.is_empty()).then_some(self.error_message.as_str())
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = message.into();
    }

    pub(crate) fn clear_error(&mut self) {
        self.error_message.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
