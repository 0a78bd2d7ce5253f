//! Drives the ticket dialog from command-line input, the way a GUI would
//! drive it from widgets.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use ticket_core::{
    DialogAction, DialogPhase, DialogView, PathFile, ResultOutcome, SelectedFile, WorkflowHandle,
};

const AUTO_CLOSE_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct TicketForm {
    pub category: String,
    pub phone_digits: String,
    pub description: String,
    pub attachment: Option<PathBuf>,
}

impl TicketForm {
    fn actions(self) -> Vec<DialogAction> {
        let mut actions = vec![
            DialogAction::SelectCategory(self.category),
            DialogAction::PhoneDigitsChanged(self.phone_digits),
            DialogAction::DescriptionChanged(self.description),
        ];
        if let Some(path) = self.attachment {
            let file: SelectedFile = Arc::new(PathFile::new(path));
            actions.push(DialogAction::FilesSelected(vec![file]));
        }
        actions
    }
}

#[derive(Debug, Clone)]
pub struct CategoryLine {
    pub name: String,
    pub attachment_required: bool,
    pub instructions: Option<String>,
}

pub struct DialogController {
    handle: WorkflowHandle,
    step_timeout: Duration,
}

impl DialogController {
    pub fn new(handle: WorkflowHandle, step_timeout: Duration) -> Self {
        Self {
            handle,
            step_timeout,
        }
    }

    async fn wait(&mut self, predicate: impl FnMut(&DialogView) -> bool) -> Result<DialogView> {
        tokio::time::timeout(self.step_timeout, self.handle.wait_for(predicate))
            .await
            .map_err(|_| anyhow!("ticket dialog did not respond in time"))?
    }

    async fn open(&mut self) -> Result<DialogView> {
        self.handle.send(DialogAction::Open).await?;
        self.wait(|view| view.phase == DialogPhase::Editing)
            .await
            .context("failed to open ticket dialog")
    }

    /// Lists every category along with its attachment policy, as the
    /// dropdown and attachment label would render them.
    pub async fn list_categories(&mut self) -> Result<Vec<CategoryLine>> {
        let view = self.open().await?;

        let mut lines = Vec::with_capacity(view.category_options.len());
        for name in view.category_options {
            self.handle
                .send(DialogAction::SelectCategory(name.clone()))
                .await?;
            let view = self.wait(|view| view.category == name).await?;
            lines.push(CategoryLine {
                name,
                attachment_required: view.attachment_required,
                instructions: view.instructions,
            });
        }

        self.handle.send(DialogAction::Close).await?;
        Ok(lines)
    }

    /// Fills and submits the form once. A success waits for the dialog to
    /// close itself; a rejection closes the result view and then the dialog.
    pub async fn submit(&mut self, form: TicketForm) -> Result<ResultOutcome> {
        self.open().await?;
        for action in form.actions() {
            self.handle.send(action).await?;
        }
        self.handle.send(DialogAction::Submit).await?;

        let view = self
            .wait(|view| {
                matches!(view.phase, DialogPhase::ResultShown(_)) || view.error_message.is_some()
            })
            .await?;

        if let Some(message) = view.error_message {
            self.handle.send(DialogAction::Close).await?;
            bail!(message);
        }

        match view.phase {
            DialogPhase::ResultShown(ResultOutcome::Success) => {
                tracing::info!("ticket created, waiting for the dialog to close");
                tokio::time::timeout(
                    AUTO_CLOSE_GRACE,
                    self.handle.wait_for(|view| view.phase == DialogPhase::Closed),
                )
                .await
                .map_err(|_| anyhow!("dialog did not close after success"))??;
                Ok(ResultOutcome::Success)
            }
            DialogPhase::ResultShown(ResultOutcome::Failure) => {
                self.handle.send(DialogAction::AcknowledgeResult).await?;
                self.handle.send(DialogAction::Close).await?;
                Ok(ResultOutcome::Failure)
            }
            phase => bail!("unexpected dialog phase after submit: {phase:?}"),
        }
    }
}
