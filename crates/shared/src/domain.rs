use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Title attached to every ticket raised through the dialog.
pub const TICKET_TITLE: &str = "Alumni Services Ticket";
/// Placeholder value of the category dropdown before the user picks one.
pub const UNSELECTED_CATEGORY: &str = "-- Please Select --";
/// Country-code prefix that every phone number carries.
pub const PHONE_PREFIX: &str = "+91";
pub const PHONE_DIGITS: usize = 10;
/// The only `attachment_mandatory` value that makes an attachment optional.
pub const ATTACHMENT_NOT_MANDATORY: &str = "False";

/// Attachment policy for one ticket category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_mandatory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_message: Option<String>,
}

impl CategoryRecord {
    pub fn optional_attachment() -> Self {
        Self {
            attachment_mandatory: Some(ATTACHMENT_NOT_MANDATORY.to_string()),
            attachment_message: None,
        }
    }

    pub fn mandatory_attachment() -> Self {
        Self {
            attachment_mandatory: Some("True".to_string()),
            attachment_message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.attachment_message = Some(message.into());
        self
    }

    /// Anything but the exact `"False"` sentinel, including a missing value,
    /// counts as mandatory.
    pub fn requires_attachment(&self) -> bool {
        self.attachment_mandatory.as_deref() != Some(ATTACHMENT_NOT_MANDATORY)
    }
}

/// Category name to record, as served by the category source.
pub type CategoryMap = BTreeMap<String, CategoryRecord>;

/// Identity of the signed-in user, forwarded untouched to the collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub employee_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl SessionContext {
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}
