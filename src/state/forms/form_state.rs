//! Form state management and the request form instances

use super::attachments::{AttachmentSlot, Attachments};
use super::field::{FieldId, FormField};
use crate::state::labels::{LabelCategory, LabelResolver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Trait for common form focus operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// The three request forms offered by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    FreeAnalysis,
    PaidAnalysis,
    PartnerRequest,
}

const DOCUMENT_AND_IMAGE: &[&str] = &["pdf", "jpg", "jpeg", "png", "gif"];
const DRAWING_DOCUMENT_AND_IMAGE: &[&str] = &["dwg", "pdf", "jpg", "jpeg", "png", "gif"];

impl FormKind {
    pub fn title(self) -> &'static str {
        match self {
            FormKind::FreeAnalysis => "무료 견적 분석 신청",
            FormKind::PaidAnalysis => "책임 분석 신청",
            FormKind::PartnerRequest => "협력사 서비스 요청",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            FormKind::FreeAnalysis => "무료 분석 신청하기",
            FormKind::PaidAnalysis => "책임 분석 신청하기",
            FormKind::PartnerRequest => "협력사 서비스 요청하기",
        }
    }

    /// Email subject line for the relay
    pub fn subject(self, applicant: &str) -> String {
        match self {
            FormKind::FreeAnalysis => format!("[무료 분석 신청] {applicant}님 견적 분석 요청"),
            FormKind::PaidAnalysis => format!("[책임 분석 신청] {applicant}님 유료 견적 분석 요청"),
            FormKind::PartnerRequest => format!("[협력사 서비스 요청] {applicant}님 프로젝트 상담"),
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            FormKind::FreeAnalysis => "행복한 하루 되세요 :)",
            FormKind::PaidAnalysis => {
                "유료 분석 신청이 접수되었습니다. 24시간 내에 전문가 분석 결과를 이메일로 보내드리겠습니다."
            }
            FormKind::PartnerRequest => {
                "협력사 서비스 요청이 접수되었습니다. 24시간 내에 담당 매니저가 연락드리겠습니다."
            }
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            FormKind::PartnerRequest => {
                "죄송합니다. 요청 처리 중 오류가 발생했습니다. 잠시 후 다시 시도해 주세요."
            }
            _ => "죄송합니다. 신청 처리 중 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.",
        }
    }

    /// Payload key carrying the free-text notes
    pub fn notes_key(self) -> &'static str {
        match self {
            FormKind::PartnerRequest => "requirements",
            _ => "additional_info",
        }
    }

    /// Label of the free-text notes field
    pub fn notes_label(self) -> &'static str {
        match self {
            FormKind::PartnerRequest => "추가 요구사항",
            _ => FieldId::Notes.label(),
        }
    }

    /// Lowercase file extensions accepted by an attachment slot
    pub fn accepted_extensions(self, slot: AttachmentSlot) -> &'static [&'static str] {
        match (self, slot) {
            (_, AttachmentSlot::Blueprint) => DRAWING_DOCUMENT_AND_IMAGE,
            _ => DOCUMENT_AND_IMAGE,
        }
    }

    /// Fields in display order, with empty defaults
    pub fn fields(self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::text(FieldId::Name, "홍길동", false),
            FormField::text(FieldId::Email, "example@email.com", false),
            FormField::text(FieldId::Phone, "010-1234-5678", false),
        ];
        if self == FormKind::PartnerRequest {
            fields.push(FormField::text(FieldId::Company, "(주)회사명", false));
        }
        fields.push(FormField::choice(
            FieldId::ProjectType,
            LabelCategory::ProjectType,
        ));
        fields.push(FormField::choice(FieldId::Region, LabelCategory::Region));
        fields.push(FormField::choice(FieldId::Budget, LabelCategory::Budget));
        if self == FormKind::PartnerRequest {
            fields.push(FormField::choice(FieldId::Timeline, LabelCategory::Timeline));
        }
        let notes_placeholder = match self {
            FormKind::FreeAnalysis => "견적서 관련 고객님의 요구사항을 기재해주세요.",
            FormKind::PaidAnalysis => "분석이 필요한 부분, 예산 관련 고민사항 등을 자세히 작성해 주세요.",
            FormKind::PartnerRequest => "협력사에 전달할 요구사항을 작성해 주세요.",
        };
        fields.push(
            FormField::text(FieldId::Notes, notes_placeholder, true).with_label(self.notes_label()),
        );
        fields
    }
}

/// Per-form record of answers keyed by question
#[derive(Debug, Clone)]
pub struct FormAnswers {
    fields: Vec<FormField>,
}

impl FormAnswers {
    pub fn new(kind: FormKind) -> Self {
        Self {
            fields: kind.fields(),
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, id: FieldId) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    pub fn field_at_mut(&mut self, index: usize) -> Option<&mut FormField> {
        self.fields.get_mut(index)
    }

    /// Raw value of a field, empty when the form has no such field
    pub fn value(&self, id: FieldId) -> &str {
        self.field(id).map(|f| f.as_text()).unwrap_or("")
    }

    /// Set the value of a field; returns false when the form lacks it
    pub fn set(&mut self, id: FieldId, value: impl Into<String>) -> bool {
        match self.field_mut(id) {
            Some(field) => {
                field.set_text(value);
                true
            }
            None => false,
        }
    }

    /// Display value with codes resolved to labels
    pub fn display(&self, id: FieldId, labels: &LabelResolver) -> String {
        self.field(id)
            .map(|f| f.display_value(labels))
            .unwrap_or_default()
    }

    /// Required fields that are still blank, in display order
    pub fn missing_required(&self) -> Vec<FieldId> {
        self.fields
            .iter()
            .filter(|f| f.id.is_required() && f.is_blank())
            .map(|f| f.id)
            .collect()
    }

    pub fn clear(&mut self) {
        self.fields.iter_mut().for_each(FormField::clear);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|f| f.as_text().is_empty())
    }
}

/// Marks a form instance as having a submission in flight
#[derive(Debug, Clone, Default)]
pub struct SubmitFlag(Arc<AtomicBool>);

impl SubmitFlag {
    /// Acquire the flag; `None` when a submission is already running
    pub fn try_acquire(&self) -> Option<InFlightGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(Arc::clone(&self.0)))
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the submit flag when dropped
#[derive(Debug)]
pub struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A focusable row of a form view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Field(usize),
    Attachment(AttachmentSlot),
    Submit,
}

/// One mounted request form: answers, attachments and submission state
#[derive(Debug, Clone)]
pub struct FormInstance {
    pub id: Uuid,
    pub kind: FormKind,
    pub answers: FormAnswers,
    pub attachments: Attachments,
    pub in_flight: SubmitFlag,
    pub active_field_index: usize,
    /// Path being typed into each attachment row, indexed by slot
    pub attachment_inputs: [String; 2],
}

impl FormInstance {
    pub fn new(kind: FormKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            answers: FormAnswers::new(kind),
            attachments: Attachments::default(),
            in_flight: SubmitFlag::default(),
            active_field_index: 0,
            attachment_inputs: Default::default(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_set()
    }

    /// Row currently holding focus
    pub fn active_row(&self) -> FormRow {
        self.row(self.active_field_index)
    }

    pub fn row(&self, index: usize) -> FormRow {
        let field_count = self.answers.len();
        match index {
            i if i < field_count => FormRow::Field(i),
            i if i == field_count => FormRow::Attachment(AttachmentSlot::Quote),
            i if i == field_count + 1 => FormRow::Attachment(AttachmentSlot::Blueprint),
            _ => FormRow::Submit,
        }
    }

    /// Active answer field, if focus is on one
    pub fn active_answer_mut(&mut self) -> Option<&mut FormField> {
        match self.active_row() {
            FormRow::Field(i) => self.answers.field_at_mut(i),
            _ => None,
        }
    }

    /// Active attachment path buffer, if focus is on an attachment row
    pub fn active_attachment_input_mut(&mut self) -> Option<(AttachmentSlot, &mut String)> {
        match self.active_row() {
            FormRow::Attachment(slot) => Some((slot, &mut self.attachment_inputs[slot.index()])),
            _ => None,
        }
    }

    /// Clear both stores after a successful submission
    pub fn reset(&mut self) {
        self.answers.clear();
        self.attachments.clear();
        self.attachment_inputs = Default::default();
        self.active_field_index = 0;
    }
}

impl Form for FormInstance {
    fn field_count(&self) -> usize {
        self.answers.len() + 3 // fields, two attachments, submit
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
    }
}
