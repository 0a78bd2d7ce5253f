use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{CategoryMap, SessionContext},
    protocol::SubmissionPayload,
};

pub mod attachment;
pub mod dialog;
pub mod directory;
pub mod error;
pub mod form;
pub mod submission;
pub mod transport;
pub mod validate;
pub mod view;
pub mod workflow;

pub use attachment::{FileHandle, MemoryFile, PathFile, SelectedFile};
pub use dialog::{Dialog, DialogCommand, DialogPhase, ResultOutcome, SessionToken};
pub use directory::CategoryDirectory;
pub use error::{EncodeError, WorkflowError};
pub use form::FormState;
pub use submission::SubmissionDraft;
pub use transport::HttpBackend;
pub use validate::{validate, ValidationError};
pub use view::DialogView;
pub use workflow::{DialogAction, TicketWorkflow, WorkflowHandle};

/// Source of the category directory shown in the dialog.
#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn fetch(&self, context: &SessionContext) -> Result<CategoryMap>;
}

/// Ticket creation call. `Ok(false)` means the backend declined the ticket;
/// `Err` means the call itself did not complete.
#[async_trait]
pub trait TicketEndpoint: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload, context: &SessionContext) -> Result<bool>;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
