//! Payload construction and the creation call.

use shared::{
    domain::SessionContext,
    protocol::{AttachmentPayload, SubmissionPayload},
};
use tracing::info;

use crate::{
    attachment::{encode_attachment, SelectedFile},
    error::WorkflowError,
    form::FormState,
    TicketEndpoint,
};

/// Snapshot of a validated form, taken when the user submits. Later edits or
/// a reset of the form do not affect it.
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub category: String,
    pub description: String,
    pub phone_number: String,
    pub attachment: Option<SelectedFile>,
}

impl SubmissionDraft {
    pub fn from_form(form: &FormState) -> Self {
        Self {
            category: form.category().to_string(),
            description: form.description().to_string(),
            phone_number: form.phone_number().to_string(),
            attachment: form.attachment().cloned(),
        }
    }

    pub fn into_payload(self, attachment: Option<AttachmentPayload>) -> SubmissionPayload {
        SubmissionPayload::new(self.category, self.description, self.phone_number, attachment)
    }
}

/// Encodes the attachment if there is one, then makes exactly one creation
/// call with the resulting payload.
pub async fn submit_draft(
    draft: SubmissionDraft,
    endpoint: &dyn TicketEndpoint,
    context: &SessionContext,
) -> Result<bool, WorkflowError> {
    let attachment = match &draft.attachment {
        Some(file) => Some(encode_attachment(file.as_ref()).await?),
        None => None,
    };

    let payload = draft.into_payload(attachment);
    info!(
        category = payload.category(),
        has_attachment = payload.attachment().is_some(),
        "creating ticket"
    );

    endpoint
        .submit(&payload, context)
        .await
        .map_err(WorkflowError::Submission)
}
