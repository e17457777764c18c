//! Submission pipeline: validate a form, build its payload and deliver it
//! through the relay

mod compose;

pub use compose::{format_timestamp, Submission, NOT_ATTACHED};

use crate::config::AccessKey;
use crate::relay::{RelayClientTrait, RelayError, RelayPayload, RelayResponse};
use crate::state::{FieldId, FormInstance, FormKind, InFlightGuard, LabelResolver};
use chrono::Local;
use std::sync::Arc;
use uuid::Uuid;

const VALIDATION_MESSAGE: &str = "모든 필수 항목(*)을 입력해 주세요.";
const CONFIGURATION_MESSAGE: &str =
    "이메일 서비스가 아직 구성되지 않았습니다. 관리자에게 문의해주세요.";

/// Why a submission did not go through
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("required fields are blank: {missing:?}")]
    Validation { missing: Vec<FieldId> },

    #[error("relay access key is not configured")]
    Configuration,

    #[error("relay rejected submission (HTTP {status}): {message}")]
    RelayRejection { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] RelayError),
}

impl SubmissionError {
    /// Message shown to the applicant
    pub fn user_message(&self, kind: FormKind) -> &'static str {
        match self {
            SubmissionError::Validation { .. } => VALIDATION_MESSAGE,
            SubmissionError::Configuration => CONFIGURATION_MESSAGE,
            SubmissionError::RelayRejection { .. } | SubmissionError::Transport(_) => {
                kind.failure_message()
            }
        }
    }
}

/// Result of [`SubmissionPipeline::submit`]
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The relay accepted the submission and the form was cleared
    Delivered(RelayResponse),
    /// Another submission of the same form was still running
    AlreadyInFlight,
}

/// Validates forms and hands them to the relay
#[derive(Clone)]
pub struct SubmissionPipeline {
    relay: Arc<dyn RelayClientTrait>,
    access_key: Option<AccessKey>,
    labels: Arc<LabelResolver>,
}

impl SubmissionPipeline {
    pub fn new(
        relay: Arc<dyn RelayClientTrait>,
        access_key: Option<AccessKey>,
        labels: Arc<LabelResolver>,
    ) -> Self {
        Self {
            relay,
            access_key,
            labels,
        }
    }

    pub fn labels(&self) -> &LabelResolver {
        &self.labels
    }

    pub fn is_configured(&self) -> bool {
        self.access_key.is_some()
    }

    /// Check a form and build its payload.
    ///
    /// Returns `Ok(None)` when the form already has a submission in flight.
    /// The credential is checked before the fields, so an unconfigured
    /// service reports [`SubmissionError::Configuration`] whatever the
    /// form contains. No check reaches the relay.
    pub fn prepare(
        &self,
        form: &FormInstance,
    ) -> Result<Option<PreparedSubmission>, SubmissionError> {
        let Some(guard) = form.in_flight.try_acquire() else {
            tracing::debug!(form_id = %form.id, "Submission already in flight");
            return Ok(None);
        };

        let access_key = self
            .access_key
            .as_ref()
            .ok_or(SubmissionError::Configuration)?;

        let missing = form.answers.missing_required();
        if !missing.is_empty() {
            tracing::debug!(form_id = %form.id, ?missing, "Required fields blank");
            return Err(SubmissionError::Validation { missing });
        }

        let submission = Submission {
            kind: form.kind,
            answers: &form.answers,
            attachments: &form.attachments,
            labels: &self.labels,
            submitted_at: format_timestamp(&Local::now()),
        };

        Ok(Some(PreparedSubmission {
            form_id: form.id,
            kind: form.kind,
            payload: submission.payload(access_key),
            relay: Arc::clone(&self.relay),
            _guard: guard,
        }))
    }

    /// Run the whole pipeline for a form and clear it on success
    pub async fn submit(&self, form: &mut FormInstance) -> Result<SubmitOutcome, SubmissionError> {
        let Some(prepared) = self.prepare(form)? else {
            return Ok(SubmitOutcome::AlreadyInFlight);
        };
        let result = prepared.dispatch().await;
        settle(form, &result);
        result.map(SubmitOutcome::Delivered)
    }
}

/// A validated submission holding its form's in-flight flag until dropped
pub struct PreparedSubmission {
    form_id: Uuid,
    kind: FormKind,
    payload: RelayPayload,
    relay: Arc<dyn RelayClientTrait>,
    _guard: InFlightGuard,
}

impl PreparedSubmission {
    pub fn form_id(&self) -> Uuid {
        self.form_id
    }

    pub fn payload(&self) -> &RelayPayload {
        &self.payload
    }

    /// Send the payload. A reply without the success indicator is an error.
    pub async fn dispatch(self) -> Result<RelayResponse, SubmissionError> {
        let PreparedSubmission {
            form_id,
            kind,
            payload,
            relay,
            _guard,
        } = self;

        tracing::info!(%form_id, ?kind, parts = ?payload, "Dispatching submission");
        let response = relay.submit(payload).await.map_err(|err| {
            tracing::error!(%form_id, error = %err, "Relay transport failure");
            SubmissionError::Transport(err)
        })?;

        if response.success {
            Ok(response)
        } else {
            Err(SubmissionError::RelayRejection {
                status: response.status,
                message: response.message,
            })
        }
    }
}

/// Apply a dispatch result to its form. Success clears answers and
/// attachments; any failure leaves both untouched for a retry.
pub fn settle(form: &mut FormInstance, result: &Result<RelayResponse, SubmissionError>) {
    if result.is_ok() {
        tracing::info!(form_id = %form.id, "Submission delivered, clearing form");
        form.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::MockRelayClientTrait;
    use crate::state::{Attachment, AttachmentSlot};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn key() -> Option<AccessKey> {
        AccessKey::parse(Some("test-key".to_string()))
    }

    fn pipeline(
        relay: impl RelayClientTrait + 'static,
        access_key: Option<AccessKey>,
    ) -> SubmissionPipeline {
        SubmissionPipeline::new(
            Arc::new(relay),
            access_key,
            Arc::new(LabelResolver::default()),
        )
    }

    fn hong_form() -> FormInstance {
        let mut form = FormInstance::new(FormKind::FreeAnalysis);
        form.answers.set(FieldId::Name, "Hong");
        form.answers.set(FieldId::Email, "a@b.com");
        form.answers.set(FieldId::Phone, "010-1111-2222");
        form.answers.set(FieldId::ProjectType, "apartment");
        form.answers.set(FieldId::Region, "seoul");
        form.answers.set(FieldId::Budget, "under-50m");
        form
    }

    fn decode_error() -> RelayError {
        RelayError::Decode {
            status: 502,
            source: serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
        }
    }

    /// Relay that takes a while to answer and counts its calls
    #[derive(Default)]
    struct SlowRelay {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RelayClientTrait for SlowRelay {
        async fn submit(&self, _payload: RelayPayload) -> Result<RelayResponse, RelayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(RelayResponse::accepted("ok"))
        }
    }

    mod validation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_missing_email_never_reaches_relay() {
            let mut relay = MockRelayClientTrait::new();
            relay.expect_submit().never();
            let pipeline = pipeline(relay, key());

            let mut form = hong_form();
            form.answers.set(FieldId::Email, "");

            let err = pipeline.submit(&mut form).await.unwrap_err();

            match &err {
                SubmissionError::Validation { missing } => {
                    assert_eq!(missing, &vec![FieldId::Email])
                }
                other => panic!("unexpected error: {other:?}"),
            }
            assert_eq!(err.user_message(form.kind), "모든 필수 항목(*)을 입력해 주세요.");
            assert_eq!(form.answers.value(FieldId::Name), "Hong");
            assert!(!form.is_submitting());
        }

        #[test]
        fn test_whitespace_only_counts_as_blank() {
            let mut relay = MockRelayClientTrait::new();
            relay.expect_submit().never();
            let pipeline = pipeline(relay, key());

            let mut form = hong_form();
            form.answers.set(FieldId::Phone, "   ");

            let result = pipeline.prepare(&form);
            assert!(matches!(
                result,
                Err(SubmissionError::Validation { ref missing }) if missing == &vec![FieldId::Phone]
            ));
        }

        #[test]
        fn test_optional_fields_may_be_blank() {
            let relay = MockRelayClientTrait::new();
            let pipeline = pipeline(relay, key());

            let mut form = FormInstance::new(FormKind::PartnerRequest);
            form.answers.set(FieldId::Name, "Kim");
            form.answers.set(FieldId::Email, "k@b.com");
            form.answers.set(FieldId::Phone, "010");
            form.answers.set(FieldId::ProjectType, "office");
            form.answers.set(FieldId::Region, "busan");
            form.answers.set(FieldId::Budget, "50m-100m");

            let prepared = pipeline.prepare(&form).unwrap().unwrap();
            assert_eq!(prepared.payload().text_value("company"), Some("미입력"));
            assert_eq!(prepared.payload().text_value("timeline"), Some(""));
        }
    }

    mod configuration {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_unset_credential_reports_configuration() {
            let mut relay = MockRelayClientTrait::new();
            relay.expect_submit().never();
            let pipeline = pipeline(relay, None);

            let mut form = hong_form();
            let err = pipeline.submit(&mut form).await.unwrap_err();

            assert!(matches!(err, SubmissionError::Configuration));
            assert_eq!(
                err.user_message(form.kind),
                "이메일 서비스가 아직 구성되지 않았습니다. 관리자에게 문의해주세요."
            );
            assert_eq!(form.answers.value(FieldId::Email), "a@b.com");
        }

        #[test]
        fn test_credential_checked_before_fields() {
            let mut relay = MockRelayClientTrait::new();
            relay.expect_submit().never();
            let pipeline = pipeline(relay, None);

            let form = FormInstance::new(FormKind::PaidAnalysis);
            assert!(matches!(
                pipeline.prepare(&form),
                Err(SubmissionError::Configuration)
            ));
            assert!(!form.is_submitting());
        }
    }

    mod delivery {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_hong_without_attachments_is_delivered_and_cleared() {
            let mut relay = MockRelayClientTrait::new();
            relay
                .expect_submit()
                .withf(|payload: &RelayPayload| {
                    payload.text_value("name") == Some("Hong")
                        && payload.text_value("email") == Some("a@b.com")
                        && payload.text_value("project_type") == Some("신축")
                        && payload.text_value("construction_area") == Some("서울특별시")
                        && payload.text_value("budget_range") == Some("5천만원 이하")
                        && payload.text_value("견적서_파일") == Some(NOT_ATTACHED)
                        && payload.text_value("도면_파일") == Some(NOT_ATTACHED)
                        && payload.file_names().is_empty()
                })
                .times(1)
                .returning(|_| Ok(RelayResponse::accepted("Email sent successfully!")));
            let pipeline = pipeline(relay, key());

            let mut form = hong_form();
            let outcome = pipeline.submit(&mut form).await.unwrap();

            assert_eq!(
                outcome,
                SubmitOutcome::Delivered(RelayResponse::accepted("Email sent successfully!"))
            );
            assert!(form.answers.is_empty());
            assert!(form.attachments.is_empty());
            assert!(!form.is_submitting());
        }

        #[test]
        fn test_attachment_sent_as_file_part() {
            let mut relay = MockRelayClientTrait::new();
            relay
                .expect_submit()
                .withf(|payload: &RelayPayload| {
                    payload.file_names() == vec!["quote_estimate.pdf"]
                        && payload.text_value("견적서_파일명") == Some("estimate.pdf")
                        && payload.text_value("도면_파일") == Some(NOT_ATTACHED)
                })
                .times(1)
                .returning(|_| Ok(RelayResponse::accepted("ok")));
            let pipeline = pipeline(relay, key());

            let mut form = hong_form();
            form.attachments
                .set(AttachmentSlot::Quote, Attachment::new("estimate.pdf", vec![7; 10]));

            let outcome = tokio_test::block_on(pipeline.submit(&mut form)).unwrap();
            assert!(matches!(outcome, SubmitOutcome::Delivered(_)));
        }

        #[tokio::test]
        async fn test_rejection_keeps_stores() {
            let mut relay = MockRelayClientTrait::new();
            relay
                .expect_submit()
                .times(1)
                .returning(|_| Ok(RelayResponse::rejected(400, "Invalid access key")));
            let pipeline = pipeline(relay, key());

            let mut form = hong_form();
            form.attachments
                .set(AttachmentSlot::Blueprint, Attachment::new("plan.dwg", vec![1]));

            let err = pipeline.submit(&mut form).await.unwrap_err();

            assert!(matches!(
                err,
                SubmissionError::RelayRejection { status: 400, ref message } if message == "Invalid access key"
            ));
            assert_eq!(
                err.user_message(FormKind::FreeAnalysis),
                "죄송합니다. 신청 처리 중 오류가 발생했습니다. 잠시 후 다시 시도해 주세요."
            );
            assert_eq!(form.answers.value(FieldId::Name), "Hong");
            assert!(form.attachments.get(AttachmentSlot::Blueprint).is_some());
            assert!(!form.is_submitting());
        }

        #[tokio::test]
        async fn test_transport_fault_keeps_stores() {
            let mut relay = MockRelayClientTrait::new();
            relay
                .expect_submit()
                .times(1)
                .returning(|_| Err(decode_error()));
            let pipeline = pipeline(relay, key());

            let mut form = FormInstance::new(FormKind::PartnerRequest);
            for (id, value) in [
                (FieldId::Name, "Kim"),
                (FieldId::Email, "k@b.com"),
                (FieldId::Phone, "010"),
                (FieldId::ProjectType, "office"),
                (FieldId::Region, "busan"),
                (FieldId::Budget, "50m-100m"),
            ] {
                form.answers.set(id, value);
            }

            let err = pipeline.submit(&mut form).await.unwrap_err();

            assert!(matches!(err, SubmissionError::Transport(_)));
            assert_eq!(
                err.user_message(FormKind::PartnerRequest),
                "죄송합니다. 요청 처리 중 오류가 발생했습니다. 잠시 후 다시 시도해 주세요."
            );
            assert_eq!(form.answers.value(FieldId::Name), "Kim");
        }
    }

    mod in_flight {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_second_prepare_is_refused_while_first_is_held() {
            let pipeline = pipeline(MockRelayClientTrait::new(), key());
            let form = hong_form();

            let first = pipeline.prepare(&form).unwrap();
            assert!(first.is_some());
            assert!(form.is_submitting());
            assert!(pipeline.prepare(&form).unwrap().is_none());

            drop(first);
            assert!(!form.is_submitting());
            assert!(pipeline.prepare(&form).unwrap().is_some());
        }

        #[tokio::test]
        async fn test_concurrent_triggers_send_once() {
            let relay = SlowRelay::default();
            let calls = Arc::clone(&relay.calls);
            let pipeline = pipeline(relay, key());
            let form = hong_form();
            let (pipeline, form) = (&pipeline, &form);

            let attempt = || async move {
                match pipeline.prepare(form) {
                    Ok(Some(prepared)) => Some(prepared.dispatch().await),
                    _ => None,
                }
            };
            let (first, second) = tokio::join!(attempt(), attempt());

            let delivered = [first, second].into_iter().flatten().count();
            assert_eq!(delivered, 1);
            assert_eq!(calls.load(Ordering::SeqCst), 1);
            assert!(!form.is_submitting());
        }

        #[tokio::test]
        async fn test_submit_reports_already_in_flight() {
            let mut relay = MockRelayClientTrait::new();
            relay.expect_submit().never();
            let pipeline = pipeline(relay, key());
            let mut form = hong_form();

            let _held = form.in_flight.try_acquire();
            let outcome = pipeline.submit(&mut form).await.unwrap();

            assert_eq!(outcome, SubmitOutcome::AlreadyInFlight);
            assert_eq!(form.answers.value(FieldId::Name), "Hong");
        }
    }

    #[test]
    fn test_settle_only_clears_on_success() {
        let mut form = hong_form();
        settle(&mut form, &Err(SubmissionError::Configuration));
        assert_eq!(form.answers.value(FieldId::Name), "Hong");

        settle(&mut form, &Ok(RelayResponse::accepted("ok")));
        assert!(form.answers.is_empty());
    }
}
