use serde::{Deserialize, Serialize};

use crate::domain::TICKET_TITLE;

/// Encoded file carried inline with a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentPayload {
    #[serde(rename = "attachment_filename")]
    pub filename: String,
    #[serde(rename = "attachment")]
    pub base64: String,
}

/// Body of the ticket creation call. Field names are the backend's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(rename = "ticket_category")]
    category: String,
    #[serde(rename = "ticketTitle")]
    title: String,
    #[serde(rename = "ticketDetails")]
    description: String,
    #[serde(rename = "mobile")]
    phone_number: String,
    #[serde(flatten)]
    attachment: Option<AttachmentPayload>,
}

impl SubmissionPayload {
    pub fn new(
        category: impl Into<String>,
        description: impl Into<String>,
        phone_number: impl Into<String>,
        attachment: Option<AttachmentPayload>,
    ) -> Self {
        Self {
            category: category.into(),
            title: TICKET_TITLE.to_string(),
            description: description.into(),
            phone_number: phone_number.into(),
            attachment,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn attachment(&self) -> Option<&AttachmentPayload> {
        self.attachment.as_ref()
    }
}
