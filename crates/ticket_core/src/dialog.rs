//! Dialog state machine.
//!
//! [`Dialog`] owns the form, the category directory and the busy flag of the
//! current session and is driven by plain method calls. Whenever a step needs
//! the outside world (fetching categories, sending the ticket, arming the
//! auto-close timer) it hands back a [`DialogCommand`] for the caller to run.
//! Results come back tagged with the [`SessionToken`] they were issued under;
//! results from an earlier session are dropped.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    attachment::SelectedFile,
    directory::CategoryDirectory,
    error::{WorkflowError, GENERIC_FAILURE_MESSAGE},
    form::FormState,
    submission::SubmissionDraft,
    validate::validate,
    view::DialogView,
};

pub const AUTO_CLOSE_DELAY: Duration = Duration::from_secs(3);
pub const SUCCESS_MESSAGE: &str = "Ticket created successfully";
pub const FAILURE_MESSAGE: &str = "Ticket creation failed";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(u64);

impl SessionToken {
    fn advance(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOutcome {
    Success,
    Failure,
}

impl ResultOutcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => SUCCESS_MESSAGE,
            Self::Failure => FAILURE_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogPhase {
    #[default]
    Closed,
    Loading,
    Editing,
    ResultShown(ResultOutcome),
}

#[derive(Debug)]
pub enum DialogCommand {
    LoadCategories {
        session: SessionToken,
    },
    Submit {
        session: SessionToken,
        draft: SubmissionDraft,
    },
    ScheduleAutoClose {
        session: SessionToken,
        after: Duration,
    },
    CancelAutoClose,
}

#[derive(Debug, Default)]
pub struct Dialog {
    phase: DialogPhase,
    session: SessionToken,
    form: FormState,
    directory: CategoryDirectory,
    busy: bool,
}

impl Dialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn session(&self) -> SessionToken {
        self.session
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn directory(&self) -> &CategoryDirectory {
        &self.directory
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_open(&self) -> bool {
        self.phase != DialogPhase::Closed
    }

    pub fn view(&self) -> DialogView {
        DialogView::from_dialog(self)
    }

    /// Starts a new session. No-op when the dialog is already open.
    pub fn open(&mut self) -> Option<DialogCommand> {
        if self.is_open() {
            debug!(phase = ?self.phase, "open ignored, dialog already open");
            return None;
        }

        self.session.advance();
        self.phase = DialogPhase::Loading;
        info!(session = self.session.0, "ticket dialog opened");
        Some(DialogCommand::LoadCategories {
            session: self.session,
        })
    }

    pub fn categories_loaded(&mut self, session: SessionToken, directory: CategoryDirectory) {
        if !self.is_current(session, "categories") || self.phase != DialogPhase::Loading {
            return;
        }

        self.directory = directory;
        self.phase = DialogPhase::Editing;
    }

    /// Closes the dialog from any phase: resets the form, drops the
    /// directory and invalidates everything still in flight.
    pub fn close(&mut self) -> Option<DialogCommand> {
        if !self.is_open() {
            return None;
        }

        info!(session = self.session.0, phase = ?self.phase, "ticket dialog closed");
        self.form.reset();
        self.directory = CategoryDirectory::default();
        self.busy = false;
        self.phase = DialogPhase::Closed;
        self.session.advance();
        Some(DialogCommand::CancelAutoClose)
    }

    /// Keyboard or overlay dismissal. The editing view ignores it; the result
    /// view treats it like its close button.
    pub fn dismiss(&mut self) -> Option<DialogCommand> {
        match self.phase {
            DialogPhase::ResultShown(_) => self.acknowledge_result(),
            _ => None,
        }
    }

    pub fn select_category(&mut self, category: impl Into<String>) {
        if self.accepts_input() {
            self.form.set_category(category);
        }
    }

    pub fn set_phone_digits(&mut self, raw: &str) {
        if self.accepts_input() {
            self.form.set_phone_digits(raw);
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        if self.accepts_input() {
            self.form.set_description(description);
        }
    }

    pub fn set_attachments(&mut self, files: Vec<SelectedFile>) {
        if self.accepts_input() {
            self.form.set_attachments(files);
        }
    }

    /// Validates the form. On success the form turns busy and the returned
    /// command carries a snapshot of it.
    pub fn submit(&mut self) -> Option<DialogCommand> {
        if !self.accepts_input() {
            debug!(phase = ?self.phase, busy = self.busy, "submit ignored");
            return None;
        }

        self.form.clear_error();
        if let Err(err) = validate(&self.form, &self.directory) {
            info!(session = self.session.0, reason = ?err, "ticket form rejected");
            self.form.set_error(err.to_string());
            return None;
        }

        self.busy = true;
        Some(DialogCommand::Submit {
            session: self.session,
            draft: SubmissionDraft::from_form(&self.form),
        })
    }

    pub fn submission_finished(
        &mut self,
        session: SessionToken,
        result: Result<bool, WorkflowError>,
    ) -> Option<DialogCommand> {
        if !self.is_current(session, "submission") {
            return None;
        }

        self.busy = false;
        match result {
            Ok(true) => {
                info!(session = self.session.0, "ticket created");
                self.phase = DialogPhase::ResultShown(ResultOutcome::Success);
                Some(DialogCommand::ScheduleAutoClose {
                    session,
                    after: AUTO_CLOSE_DELAY,
                })
            }
            Ok(false) => {
                warn!(session = self.session.0, "ticket creation rejected");
                self.phase = DialogPhase::ResultShown(ResultOutcome::Failure);
                None
            }
            Err(err) => {
                warn!(session = self.session.0, "ticket creation errored: {err}");
                self.form.set_error(GENERIC_FAILURE_MESSAGE);
                None
            }
        }
    }

    /// Close button of the result view. After a success the whole dialog
    /// closes; after a rejection the form comes back untouched.
    pub fn acknowledge_result(&mut self) -> Option<DialogCommand> {
        match self.phase {
            DialogPhase::ResultShown(ResultOutcome::Success) => self.close(),
            DialogPhase::ResultShown(ResultOutcome::Failure) => {
                self.phase = DialogPhase::Editing;
                None
            }
            _ => None,
        }
    }

    pub fn auto_close_elapsed(&mut self, session: SessionToken) -> Option<DialogCommand> {
        if !self.is_current(session, "auto-close")
            || self.phase != DialogPhase::ResultShown(ResultOutcome::Success)
        {
            return None;
        }

        info!(session = self.session.0, "closing dialog after successful submission");
        self.close()
    }

    fn accepts_input(&self) -> bool {
        self.phase == DialogPhase::Editing && !self.busy
    }

    fn is_current(&self, session: SessionToken, what: &str) -> bool {
        if session == self.session {
            return true;
        }
        debug!(
            stale = session.0,
            current = self.session.0,
            "discarding {what} result from an earlier session"
        );
        false
    }
}

#[cfg(test)]
#[path = "tests/dialog_tests.rs"]
mod tests;
