//! Application state and core logic

use crate::relay::RelayResponse;
use crate::state::{
    Attachment, AttachmentSlot, AppState, Form, FormKind, FormRow, LabelResolver, View,
};
use crate::submission::{settle, SubmissionError, SubmissionPipeline};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::Path;
use std::time::Instant;
use tokio::sync::mpsc;
use uuid::Uuid;

const SENDING_MESSAGE: &str = "전송 중...";

/// Outcome of a background dispatch, tagged with the form it came from
#[derive(Debug)]
pub struct SubmissionEvent {
    pub form_id: Uuid,
    pub kind: FormKind,
    pub result: Result<RelayResponse, SubmissionError>,
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Validation and delivery of request forms
    pipeline: SubmissionPipeline,
    /// Dispatch results flow back to the UI loop through this channel
    events_tx: mpsc::UnboundedSender<SubmissionEvent>,
    events_rx: mpsc::UnboundedReceiver<SubmissionEvent>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    pub fn new(pipeline: SubmissionPipeline) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        if !pipeline.is_configured() {
            tracing::warn!("Relay access key is not configured; submissions will be refused");
        }
        Self {
            state: AppState::default(),
            pipeline,
            events_tx,
            events_rx,
            quit: false,
        }
    }

    pub fn labels(&self) -> &LabelResolver {
        self.pipeline.labels()
    }

    /// Whether the relay access key is available
    pub fn is_configured(&self) -> bool {
        self.pipeline.is_configured()
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// True while something on screen moves and the loop should poll faster
    pub fn is_animating(&self) -> bool {
        self.state.current_view() == View::PaidAnalysis
            && self.state.navigator.payment.is_confirming()
    }

    /// Advance timers and apply finished submissions
    pub fn tick(&mut self, now: Instant) {
        if self.state.current_view() == View::PaidAnalysis
            && self.state.navigator.payment.update(now)
        {
            tracing::info!("Payment confirmed, unlocking paid analysis form");
        }

        while let Ok(event) = self.events_rx.try_recv() {
            self.receive_submission(event);
        }
    }

    /// Handle a key press
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Dialogs are modal
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }
        if self.state.success_dialog.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_success();
            }
            return Ok(());
        }

        if key.code == KeyCode::Home {
            self.state.home();
            return Ok(());
        }

        match self.state.current_view() {
            View::Landing | View::AnalysisSelection => self.handle_menu_key(key),
            View::PaidAnalysis if !self.state.navigator.payment.is_form_entry() => {
                self.handle_payment_key(key)
            }
            View::FreeAnalysis | View::PaidAnalysis | View::PartnerRequest => {
                self.handle_form_key(key).await?
            }
        }

        Ok(())
    }

    /// Landing page and analysis selection share the card menu keys
    fn handle_menu_key(&mut self, key: KeyEvent) {
        let view = self.state.current_view();
        let cards = view.menu();

        match key.code {
            KeyCode::Right | KeyCode::Down | KeyCode::Tab | KeyCode::Char('l' | 'j') => {
                self.state.move_selection(true, cards.len())
            }
            KeyCode::Left | KeyCode::Up | KeyCode::BackTab | KeyCode::Char('h' | 'k') => {
                self.state.move_selection(false, cards.len())
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(target) = cards.get(self.state.selected_index) {
                    self.state.open(*target);
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(target) = cards.get(index) {
                    self.state.open(*target);
                }
            }
            KeyCode::Esc if view != View::Landing => self.state.back(),
            KeyCode::Char('q') if view == View::Landing => self.quit = true,
            _ => {}
        }
    }

    /// Payment screen of the paid tier
    fn handle_payment_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.state.navigator.payment.confirm(Instant::now()) {
                    tracing::info!("Payment confirmation started");
                }
            }
            KeyCode::Esc => self.state.back(),
            _ => {}
        }
    }

    fn is_submit_shortcut(key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Char('s'))
            && (key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(crate::platform::SUBMIT_MODIFIER))
    }

    /// Keys inside a request form
    async fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        if Self::is_submit_shortcut(&key) {
            self.submit_current_form();
            return Ok(());
        }
        if key.code == KeyCode::Esc {
            self.state.back();
            return Ok(());
        }

        let labels = self.pipeline.labels();
        let Some(form) = self.state.form.as_mut() else {
            return Ok(());
        };

        match (key.code, form.active_row()) {
            (KeyCode::Tab | KeyCode::Down, _) => form.next_field(),
            (KeyCode::BackTab | KeyCode::Up, _) => form.prev_field(),

            (KeyCode::Enter, FormRow::Submit) => self.submit_current_form(),

            (KeyCode::Enter, FormRow::Attachment(slot)) => self.attach_file(slot).await,
            (KeyCode::Delete, FormRow::Attachment(slot)) => {
                form.attachments.clear_slot(slot);
                form.attachment_inputs[slot.index()].clear();
            }
            (KeyCode::Char(c), FormRow::Attachment(slot)) => {
                form.attachment_inputs[slot.index()].push(c)
            }
            (KeyCode::Backspace, FormRow::Attachment(slot)) => {
                form.attachment_inputs[slot.index()].pop();
            }

            (code, FormRow::Field(_)) => {
                let mut advance = false;
                if let Some(field) = form.active_answer_mut() {
                    match code {
                        KeyCode::Right if field.is_choice() => field.select_next(labels),
                        KeyCode::Left if field.is_choice() => field.select_prev(labels),
                        KeyCode::Char(' ') | KeyCode::Enter if field.is_choice() => {
                            field.select_next(labels)
                        }
                        KeyCode::Char(c) => field.push_char(c),
                        KeyCode::Backspace => field.pop_char(),
                        KeyCode::Enter if field.is_multiline => field.push_char('\n'),
                        KeyCode::Enter => advance = true,
                        _ => {}
                    }
                }
                if advance {
                    form.next_field();
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Load the file typed into an attachment row
    async fn attach_file(&mut self, slot: AttachmentSlot) {
        let Some(form) = self.state.form.as_ref() else {
            return;
        };
        let path = form.attachment_inputs[slot.index()].trim().to_string();
        if path.is_empty() {
            return;
        }
        let accepted = form.kind.accepted_extensions(slot);

        match Attachment::load(Path::new(&path), accepted).await {
            Ok(attachment) => {
                self.state.status_message =
                    Some(format!("{} 첨부: {}", slot.label(), attachment.summary()));
                if let Some(form) = self.state.form.as_mut() {
                    form.attachments.set(slot, attachment);
                }
            }
            Err(err) => {
                tracing::warn!(slot = slot.key(), error = %err, "Attachment rejected");
                self.push_error(err.to_string());
            }
        }
    }

    /// Validate the mounted form and send it in the background
    fn submit_current_form(&mut self) {
        let Some(form) = self.state.form.as_ref() else {
            return;
        };
        let kind = form.kind;

        match self.pipeline.prepare(form) {
            Ok(Some(prepared)) => {
                self.state.status_message = Some(SENDING_MESSAGE.to_string());
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let form_id = prepared.form_id();
                    let result = prepared.dispatch().await;
                    // The receiver only goes away when the app is shutting down
                    let _ = tx.send(SubmissionEvent {
                        form_id,
                        kind,
                        result,
                    });
                });
            }
            Ok(None) => {}
            Err(err) => {
                tracing::info!(?kind, error = %err, "Submission refused");
                self.push_error(err.user_message(kind));
            }
        }
    }

    /// Apply a dispatch result to the form that produced it
    fn receive_submission(&mut self, event: SubmissionEvent) {
        let SubmissionEvent {
            form_id,
            kind,
            result,
        } = event;

        match self.state.form.as_mut().filter(|form| form.id == form_id) {
            Some(form) => {
                settle(form, &result);
                self.state.status_message = None;
                match result {
                    Ok(_) => self.state.show_success(kind.success_message()),
                    Err(err) => {
                        tracing::warn!(%form_id, error = %err, "Submission failed");
                        self.push_error(err.user_message(kind));
                    }
                }
            }
            None => {
                // The form was closed while its request was running
                tracing::info!(%form_id, success = result.is_ok(), "Result for a closed form");
                self.state.status_message = Some(match result {
                    Ok(_) => format!("{} 접수가 완료되었습니다.", kind.title()),
                    Err(err) => err.user_message(kind).to_string(),
                });
            }
        }
    }
}
