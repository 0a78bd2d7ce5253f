use super::*;

use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use shared::domain::CategoryRecord;
use tokio::sync::{Mutex, Notify};

struct StaticCategories {
    records: CategoryMap,
    fetches: Arc<Mutex<u32>>,
}

impl StaticCategories {
    fn standard() -> Self {
        let records = CategoryMap::from([
            (
                "Degree Certificate".to_string(),
                CategoryRecord::mandatory_attachment().with_message("Attach a copy of your ID"),
            ),
            ("Transcript".to_string(), CategoryRecord::optional_attachment()),
        ]);
        Self {
            records,
            fetches: Arc::new(Mutex::new(0)),
        }
    }
}

#[async_trait]
impl CategorySource for StaticCategories {
    async fn fetch(&self, _context: &SessionContext) -> Result<CategoryMap> {
        *self.fetches.lock().await += 1;
        Ok(self.records.clone())
    }
}

struct UnavailableCategories;

#[async_trait]
impl CategorySource for UnavailableCategories {
    async fn fetch(&self, _context: &SessionContext) -> Result<CategoryMap> {
        Err(anyhow!("category service unavailable"))
    }
}

struct TestEndpoint {
    reply: std::result::Result<bool, String>,
    gate: Option<Arc<Notify>>,
    payloads: Arc<Mutex<Vec<SubmissionPayload>>>,
}

impl TestEndpoint {
    fn replying(created: bool) -> Self {
        Self {
            reply: Ok(created),
            gate: None,
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing(err: impl Into<String>) -> Self {
        Self {
            reply: Err(err.into()),
            gate: None,
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn gated(created: bool, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::replying(created)
        }
    }
}

#[async_trait]
impl TicketEndpoint for TestEndpoint {
    async fn submit(&self, payload: &SubmissionPayload, _context: &SessionContext) -> Result<bool> {
        self.payloads.lock().await.push(payload.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            Ok(created) => Ok(*created),
            Err(err) => Err(anyhow!(err.clone())),
        }
    }
}

fn spawn_workflow(endpoint: TestEndpoint) -> (WorkflowHandle, Arc<Mutex<Vec<SubmissionPayload>>>) {
    let payloads = Arc::clone(&endpoint.payloads);
    let handle = TicketWorkflow::spawn(
        SessionContext::new("EMP-042"),
        Arc::new(StaticCategories::standard()),
        Arc::new(endpoint),
    );
    (handle, payloads)
}

async fn open_and_fill(handle: &mut WorkflowHandle, category: &str) {
    handle.send(DialogAction::Open).await.expect("open");
    handle
        .wait_for(|view| view.phase == DialogPhase::Editing)
        .await
        .expect("editing");
    handle
        .send(DialogAction::SelectCategory(category.to_string()))
        .await
        .expect("category");
    handle
        .send(DialogAction::PhoneDigitsChanged("9876543210".to_string()))
        .await
        .expect("phone");
    handle
        .send(DialogAction::DescriptionChanged("Need an official transcript".to_string()))
        .await
        .expect("description");
}

#[tokio::test(start_paused = true)]
async fn successful_submission_closes_dialog_after_three_seconds() {
    let (mut handle, payloads) = spawn_workflow(TestEndpoint::replying(true));
    open_and_fill(&mut handle, "Transcript").await;

    handle.send(DialogAction::Submit).await.expect("submit");
    let view = handle
        .wait_for(|view| view.phase == DialogPhase::ResultShown(ResultOutcome::Success))
        .await
        .expect("result");
    assert_eq!(view.result_message, Some("Ticket created successfully"));
    assert!(!view.busy);

    tokio::time::sleep(Duration::from_millis(2_900)).await;
    assert!(handle.view().is_open(), "closed before the timer elapsed");

    let view = handle
        .wait_for(|view| view.phase == DialogPhase::Closed)
        .await
        .expect("closed");
    assert_eq!(view.category, "-- Please Select --");
    assert_eq!(view.phone_digits, "");
    assert_eq!(view.description, "");
    assert!(view.category_options.is_empty());

    let payloads = payloads.lock().await;
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].category(), "Transcript");
    assert_eq!(payloads[0].phone_number(), "+919876543210");
    assert_eq!(payloads[0].title(), "Alumni Services Ticket");
    assert!(payloads[0].attachment().is_none());
}

#[tokio::test]
async fn rejected_submission_keeps_form_for_retry() {
    let (mut handle, payloads) = spawn_workflow(TestEndpoint::replying(false));
    open_and_fill(&mut handle, "Transcript").await;

    handle.send(DialogAction::Submit).await.expect("submit");
    let view = handle
        .wait_for(|view| view.phase == DialogPhase::ResultShown(ResultOutcome::Failure))
        .await
        .expect("result");
    assert_eq!(view.result_message, Some("Ticket creation failed"));

    handle
        .send(DialogAction::AcknowledgeResult)
        .await
        .expect("acknowledge");
    let view = handle
        .wait_for(|view| view.phase == DialogPhase::Editing)
        .await
        .expect("editing");
    assert_eq!(view.category, "Transcript");
    assert_eq!(view.phone_digits, "9876543210");
    assert_eq!(view.description, "Need an official transcript");

    handle.send(DialogAction::Submit).await.expect("retry");
    handle
        .wait_for(|view| view.phase == DialogPhase::ResultShown(ResultOutcome::Failure))
        .await
        .expect("second result");
    assert_eq!(payloads.lock().await.len(), 2);
}

#[tokio::test]
async fn call_error_shows_inline_message() {
    let (mut handle, _) = spawn_workflow(TestEndpoint::failing("connection reset"));
    open_and_fill(&mut handle, "Transcript").await;

    handle.send(DialogAction::Submit).await.expect("submit");
    let view = handle
        .wait_for(|view| view.error_message.is_some())
        .await
        .expect("error");

    assert_eq!(view.phase, DialogPhase::Editing);
    assert!(!view.busy);
    assert_eq!(
        view.error_message.as_deref(),
        Some("An error occurred while creating the ticket")
    );
}

#[tokio::test]
async fn mandatory_attachment_is_encoded_into_payload() {
    let (mut handle, payloads) = spawn_workflow(TestEndpoint::replying(true));
    open_and_fill(&mut handle, "Degree Certificate").await;

    handle.send(DialogAction::Submit).await.expect("submit");
    let view = handle
        .wait_for(|view| view.error_message.is_some())
        .await
        .expect("validation error");
    assert_eq!(
        view.error_message.as_deref(),
        Some("Please add the attachment as it is mandatory")
    );
    assert!(view.attachment_required);
    assert_eq!(view.instructions.as_deref(), Some("Attach a copy of your ID"));

    let files: Vec<SelectedFile> = vec![
        Arc::new(MemoryFile::new("id.png", b"\x89PNG".to_vec())),
        Arc::new(MemoryFile::new("ignored.png", b"other".to_vec())),
    ];
    handle
        .send(DialogAction::FilesSelected(files))
        .await
        .expect("files");
    handle.send(DialogAction::Submit).await.expect("submit");
    handle
        .wait_for(|view| view.phase == DialogPhase::ResultShown(ResultOutcome::Success))
        .await
        .expect("result");

    let payloads = payloads.lock().await;
    let attachment = payloads[0].attachment().expect("attachment");
    assert_eq!(attachment.filename, "id.png");
    assert_eq!(attachment.base64, "iVBORw==");
}

#[tokio::test]
async fn unavailable_directory_still_opens_dialog() {
    let mut handle = TicketWorkflow::spawn(
        SessionContext::new("EMP-042"),
        Arc::new(UnavailableCategories),
        Arc::new(TestEndpoint::replying(true)),
    );

    handle.send(DialogAction::Open).await.expect("open");
    let view = handle
        .wait_for(|view| view.phase == DialogPhase::Editing)
        .await
        .expect("editing");
    assert!(view.category_options.is_empty());
}

#[tokio::test]
async fn directory_is_fetched_once_per_open() {
    let categories = StaticCategories::standard();
    let fetches = Arc::clone(&categories.fetches);
    let mut handle = TicketWorkflow::spawn(
        SessionContext::new("EMP-042"),
        Arc::new(categories),
        Arc::new(TestEndpoint::replying(true)),
    );

    for _ in 0..2 {
        handle.send(DialogAction::Open).await.expect("open");
        handle.send(DialogAction::Open).await.expect("open again");
        handle
            .wait_for(|view| view.phase == DialogPhase::Editing)
            .await
            .expect("editing");
        handle.send(DialogAction::Close).await.expect("close");
        handle
            .wait_for(|view| view.phase == DialogPhase::Closed)
            .await
            .expect("closed");
    }

    assert_eq!(*fetches.lock().await, 2);
}

#[tokio::test]
async fn closing_mid_submission_discards_late_result() {
    let gate = Arc::new(Notify::new());
    let (mut handle, payloads) = spawn_workflow(TestEndpoint::gated(true, Arc::clone(&gate)));
    open_and_fill(&mut handle, "Transcript").await;

    handle.send(DialogAction::Submit).await.expect("submit");
    let view = handle.wait_for(|view| view.busy).await.expect("busy");
    assert_eq!(view.submit_label, "Creating...");
    assert!(!view.cancel_enabled);

    handle.send(DialogAction::Close).await.expect("close");
    handle
        .wait_for(|view| view.phase == DialogPhase::Closed)
        .await
        .expect("closed");
    handle.send(DialogAction::Open).await.expect("reopen");
    handle
        .wait_for(|view| view.phase == DialogPhase::Editing)
        .await
        .expect("editing");

    while payloads.lock().await.is_empty() {
        tokio::task::yield_now().await;
    }
    gate.notify_one();
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    let view = handle.view();
    assert_eq!(view.phase, DialogPhase::Editing);
    assert_eq!(view.result_message, None);
    assert_eq!(view.category, "-- Please Select --");
    assert!(!view.busy);
}

#[tokio::test(start_paused = true)]
async fn closing_success_result_early_cancels_timer() {
    let (mut handle, _) = spawn_workflow(TestEndpoint::replying(true));
    open_and_fill(&mut handle, "Transcript").await;

    handle.send(DialogAction::Submit).await.expect("submit");
    handle
        .wait_for(|view| view.phase == DialogPhase::ResultShown(ResultOutcome::Success))
        .await
        .expect("result");

    handle
        .send(DialogAction::AcknowledgeResult)
        .await
        .expect("acknowledge");
    handle
        .wait_for(|view| view.phase == DialogPhase::Closed)
        .await
        .expect("closed");

    handle.send(DialogAction::Open).await.expect("reopen");
    handle
        .wait_for(|view| view.phase == DialogPhase::Editing)
        .await
        .expect("editing");
    handle
        .send(DialogAction::SelectCategory("Transcript".to_string()))
        .await
        .expect("category");

    tokio::time::sleep(Duration::from_secs(5)).await;
    let view = handle.view();
    assert_eq!(view.phase, DialogPhase::Editing);
    assert_eq!(view.category, "Transcript");
}
