//! Event loop that runs one [`Dialog`] against real collaborators.
//!
//! A single task owns the dialog. UI surfaces talk to it through
//! [`WorkflowHandle`]; slow work (directory fetch, encoding plus creation
//! call, the auto-close timer) runs in spawned tasks that report back to the
//! loop. Every transition republishes a [`DialogView`].

use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use shared::domain::SessionContext;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, info};

use crate::{
    attachment::SelectedFile,
    dialog::{Dialog, DialogCommand, SessionToken},
    directory::CategoryDirectory,
    error::WorkflowError,
    submission::submit_draft,
    view::DialogView,
    CategorySource, TicketEndpoint,
};

const ACTION_QUEUE_CAPACITY: usize = 64;

/// Input from the dialog's buttons and fields.
#[derive(Debug)]
pub enum DialogAction {
    Open,
    Close,
    Dismiss,
    SelectCategory(String),
    PhoneDigitsChanged(String),
    DescriptionChanged(String),
    FilesSelected(Vec<SelectedFile>),
    Submit,
    AcknowledgeResult,
}

impl DialogAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Dismiss => "dismiss",
            Self::SelectCategory(_) => "select_category",
            Self::PhoneDigitsChanged(_) => "phone_digits_changed",
            Self::DescriptionChanged(_) => "description_changed",
            Self::FilesSelected(_) => "files_selected",
            Self::Submit => "submit",
            Self::AcknowledgeResult => "acknowledge_result",
        }
    }
}

enum Completion {
    CategoriesLoaded {
        session: SessionToken,
        directory: CategoryDirectory,
    },
    SubmissionFinished {
        session: SessionToken,
        result: Result<bool, WorkflowError>,
    },
    AutoCloseElapsed {
        session: SessionToken,
    },
}

#[derive(Clone)]
pub struct WorkflowHandle {
    actions: mpsc::Sender<DialogAction>,
    view: watch::Receiver<DialogView>,
}

impl WorkflowHandle {
    pub async fn send(&self, action: DialogAction) -> Result<()> {
        self.actions
            .send(action)
            .await
            .map_err(|_| anyhow!("ticket dialog loop has stopped"))
    }

    /// Latest published view.
    pub fn view(&self) -> DialogView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DialogView> {
        self.view.clone()
    }

    /// Waits until a published view satisfies `predicate`.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&DialogView) -> bool,
    ) -> Result<DialogView> {
        let view = self
            .view
            .wait_for(predicate)
            .await
            .map_err(|_| anyhow!("ticket dialog loop has stopped"))?;
        Ok(view.clone())
    }
}

pub struct TicketWorkflow {
    dialog: Dialog,
    context: SessionContext,
    categories: Arc<dyn CategorySource>,
    endpoint: Arc<dyn TicketEndpoint>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    auto_close: Option<JoinHandle<()>>,
    view_tx: watch::Sender<DialogView>,
}

impl TicketWorkflow {
    /// Starts the dialog loop on the current tokio runtime. The loop ends
    /// once every handle has been dropped.
    pub fn spawn(
        context: SessionContext,
        categories: Arc<dyn CategorySource>,
        endpoint: Arc<dyn TicketEndpoint>,
    ) -> WorkflowHandle {
        let dialog = Dialog::new();
        let (view_tx, view_rx) = watch::channel(dialog.view());
        let (actions_tx, actions_rx) = mpsc::channel(ACTION_QUEUE_CAPACITY);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let workflow = Self {
            dialog,
            context,
            categories,
            endpoint,
            completions_tx,
            completions_rx,
            auto_close: None,
            view_tx,
        };
        tokio::spawn(workflow.run(actions_rx));

        WorkflowHandle {
            actions: actions_tx,
            view: view_rx,
        }
    }

    async fn run(mut self, mut actions: mpsc::Receiver<DialogAction>) {
        loop {
            tokio::select! {
                action = actions.recv() => match action {
                    Some(action) => self.handle_action(action),
                    None => break,
                },
                Some(completion) = self.completions_rx.recv() => {
                    self.handle_completion(completion);
                }
            }
            self.view_tx.send_replace(self.dialog.view());
        }

        self.cancel_auto_close();
        debug!("ticket dialog loop stopped");
    }

    fn handle_action(&mut self, action: DialogAction) {
        debug!(action = action.name(), "dialog action");
        let command = match action {
            DialogAction::Open => self.dialog.open(),
            DialogAction::Close => self.dialog.close(),
            DialogAction::Dismiss => self.dialog.dismiss(),
            DialogAction::SelectCategory(category) => {
                self.dialog.select_category(category);
                None
            }
            DialogAction::PhoneDigitsChanged(raw) => {
                self.dialog.set_phone_digits(&raw);
                None
            }
            DialogAction::DescriptionChanged(description) => {
                self.dialog.set_description(description);
                None
            }
            DialogAction::FilesSelected(files) => {
                self.dialog.set_attachments(files);
                None
            }
            DialogAction::Submit => self.dialog.submit(),
            DialogAction::AcknowledgeResult => self.dialog.acknowledge_result(),
        };

        if let Some(command) = command {
            self.execute(command);
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        let command = match completion {
            Completion::CategoriesLoaded { session, directory } => {
                self.dialog.categories_loaded(session, directory);
                None
            }
            Completion::SubmissionFinished { session, result } => {
                self.dialog.submission_finished(session, result)
            }
            Completion::AutoCloseElapsed { session } => {
                self.auto_close = None;
                self.dialog.auto_close_elapsed(session)
            }
        };

        if let Some(command) = command {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: DialogCommand) {
        match command {
            DialogCommand::LoadCategories { session } => {
                let source = Arc::clone(&self.categories);
                let context = self.context.clone();
                let tx = self.completions_tx.clone();
                tokio::spawn(async move {
                    let directory = CategoryDirectory::load(source.as_ref(), &context).await;
                    let _ = tx.send(Completion::CategoriesLoaded { session, directory });
                });
            }
            DialogCommand::Submit { session, draft } => {
                let endpoint = Arc::clone(&self.endpoint);
                let context = self.context.clone();
                let tx = self.completions_tx.clone();
                tokio::spawn(async move {
                    let result = submit_draft(draft, endpoint.as_ref(), &context).await;
                    let _ = tx.send(Completion::SubmissionFinished { session, result });
                });
            }
            DialogCommand::ScheduleAutoClose { session, after } => {
                self.schedule_auto_close(session, after);
            }
            DialogCommand::CancelAutoClose => self.cancel_auto_close(),
        }
    }

    fn schedule_auto_close(&mut self, session: SessionToken, after: Duration) {
        self.cancel_auto_close();
        let tx = self.completions_tx.clone();
        self.auto_close = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(Completion::AutoCloseElapsed { session });
        }));
    }

    fn cancel_auto_close(&mut self) {
        if let Some(timer) = self.auto_close.take() {
            timer.abort();
            info!("auto-close timer cancelled");
        }
    }
}
