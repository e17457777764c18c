//! Builds the relay payload and the email body for a form

use crate::config::AccessKey;
use crate::relay::RelayPayload;
use crate::state::{
    Attachment, AttachmentSlot, Attachments, FieldId, FormAnswers, FormKind, LabelResolver,
    PAID_ANALYSIS_PRICE,
};
use chrono::{DateTime, Datelike, TimeZone, Timelike};
use std::fmt::Write;

/// Sentinel sent for an empty attachment slot
pub const NOT_ATTACHED: &str = "첨부되지 않음";
const NONE_GIVEN: &str = "없음";
const NOT_ENTERED: &str = "미입력";
const PAYMENT_DONE: &str = "결제 완료";

/// Format a timestamp the way the Korean locale prints it,
/// e.g. `2025. 3. 7. 오후 2:05:09`
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    let (pm, hour) = at.hour12();
    format!(
        "{}. {}. {}. {} {}:{:02}:{:02}",
        at.year(),
        at.month(),
        at.day(),
        if pm { "오후" } else { "오전" },
        hour,
        at.minute(),
        at.second()
    )
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Everything needed to render one submission
pub struct Submission<'a> {
    pub kind: FormKind,
    pub answers: &'a FormAnswers,
    pub attachments: &'a Attachments,
    pub labels: &'a LabelResolver,
    pub submitted_at: String,
}

impl Submission<'_> {
    fn display(&self, id: FieldId) -> String {
        self.answers.display(id, self.labels)
    }

    fn notes(&self) -> &str {
        or_default(self.answers.value(FieldId::Notes), NONE_GIVEN)
    }

    fn company(&self) -> &str {
        or_default(self.answers.value(FieldId::Company), NOT_ENTERED)
    }

    /// Assemble the multipart payload
    pub fn payload(&self, access_key: &AccessKey) -> RelayPayload {
        let answers = self.answers;
        let name = answers.value(FieldId::Name);

        let mut payload = RelayPayload::new();
        payload
            .text("access_key", access_key.expose())
            .text("subject", self.kind.subject(name))
            .text("name", name)
            .text("email", answers.value(FieldId::Email))
            .text("phone", answers.value(FieldId::Phone));

        if self.kind == FormKind::PartnerRequest {
            payload.text("company", self.company());
        }

        payload
            .text("project_type", self.display(FieldId::ProjectType))
            .text("construction_area", self.display(FieldId::Region))
            .text("budget_range", self.display(FieldId::Budget));

        if self.kind == FormKind::PartnerRequest {
            payload.text("timeline", self.display(FieldId::Timeline));
        }

        payload.text(self.kind.notes_key(), self.notes());

        if self.kind == FormKind::PaidAnalysis {
            payload
                .text("결제_상태", PAYMENT_DONE)
                .text("금액", PAID_ANALYSIS_PRICE);
        }

        payload.text("신청_일시", self.submitted_at.as_str());

        for slot in AttachmentSlot::ALL {
            match self.attachments.get(slot) {
                Some(attachment) => {
                    payload
                        .text(format!("{}_파일명", slot.label()), attachment.file_name.as_str())
                        .text(
                            format!("{}_파일크기", slot.label()),
                            format!("{}KB", attachment.size_kb()),
                        )
                        .file(
                            "attachment",
                            format!("{}_{}", slot.key(), attachment.file_name),
                            attachment.bytes.clone(),
                        );
                }
                None => {
                    payload.text(format!("{}_파일", slot.label()), NOT_ATTACHED);
                }
            }
        }

        payload.text("message", self.message());
        payload
    }

    fn attachment_line(&self, slot: AttachmentSlot) -> String {
        self.attachments
            .get(slot)
            .map(Attachment::summary)
            .unwrap_or_else(|| NOT_ATTACHED.to_string())
    }

    /// Plain-text email body
    pub fn message(&self) -> String {
        let answers = self.answers;
        let email = answers.value(FieldId::Email);
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = match self.kind {
            FormKind::FreeAnalysis => writeln!(out, "새로운 무료 견적 분석 신청이 접수되었습니다.\n"),
            FormKind::PaidAnalysis => writeln!(
                out,
                "[유료] 책임 분석 신청이 접수되었습니다.\n\n=== 결제 정보 ===\n결제 금액: {PAID_ANALYSIS_PRICE}\n결제 상태: {PAYMENT_DONE}\n"
            ),
            FormKind::PartnerRequest => writeln!(out, "협력사 서비스 요청이 접수되었습니다.\n"),
        };

        let _ = writeln!(out, "=== 신청자 정보 ===");
        let _ = writeln!(out, "이름: {}", answers.value(FieldId::Name));
        if self.kind == FormKind::PartnerRequest {
            let _ = writeln!(out, "회사명: {}", self.company());
        }
        let _ = writeln!(out, "이메일: {email}");
        let _ = writeln!(out, "휴대폰: {}\n", answers.value(FieldId::Phone));

        let _ = writeln!(out, "=== 프로젝트 정보 ===");
        let _ = writeln!(out, "프로젝트 유형: {}", self.display(FieldId::ProjectType));
        let _ = writeln!(out, "시공 지역: {}", self.display(FieldId::Region));
        let _ = writeln!(out, "예산 범위: {}", self.display(FieldId::Budget));
        if self.kind == FormKind::PartnerRequest {
            let _ = writeln!(out, "희망 시공 시기: {}", self.display(FieldId::Timeline));
        }

        let _ = writeln!(out, "\n=== 첨부 파일 정보 ===");
        for slot in AttachmentSlot::ALL {
            let _ = writeln!(out, "{}: {}", slot.label(), self.attachment_line(slot));
        }

        let _ = writeln!(
            out,
            "\n=== {} ===\n{}\n",
            self.kind.notes_label(),
            self.notes()
        );

        let _ = match self.kind {
            FormKind::FreeAnalysis => writeln!(
                out,
                "처리 요청: 24시간 내 분석 결과를 고객 이메일({email})로 발송 예정"
            ),
            FormKind::PaidAnalysis => writeln!(
                out,
                "특이사항: 전문가 1:1 분석, 협력사 계약 5% 할인, 견적서 5% 이상 금액 발생 시 100% 부담\n처리 요청: 24시간 내 전문가 분석 결과를 고객 이메일({email})로 발송 예정"
            ),
            FormKind::PartnerRequest => writeln!(
                out,
                "처리 요청: 24시간 내 담당 매니저가 고객({email})에게 연락 예정"
            ),
        };
        let _ = write!(out, "신청 일시: {}", self.submitted_at);

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::PayloadPart;
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    fn key() -> AccessKey {
        AccessKey::parse(Some("test-key".to_string())).unwrap()
    }

    fn filled(kind: FormKind) -> FormAnswers {
        let mut answers = FormAnswers::new(kind);
        answers.set(FieldId::Name, "Hong");
        answers.set(FieldId::Email, "a@b.com");
        answers.set(FieldId::Phone, "010-1111-2222");
        answers.set(FieldId::ProjectType, "apartment");
        answers.set(FieldId::Region, "seoul");
        answers.set(FieldId::Budget, "under-50m");
        answers
    }

    fn submission<'a>(
        kind: FormKind,
        answers: &'a FormAnswers,
        attachments: &'a Attachments,
        labels: &'a LabelResolver,
    ) -> Submission<'a> {
        Submission {
            kind,
            answers,
            attachments,
            labels,
            submitted_at: "2025. 3. 7. 오후 2:05:09".to_string(),
        }
    }

    #[test]
    fn test_format_timestamp_korean_locale() {
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let afternoon = kst.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();

        assert_eq!(format_timestamp(&afternoon), "2025. 3. 7. 오후 2:05:09");
        assert_eq!(format_timestamp(&midnight), "2024. 12. 31. 오전 12:00:00");
    }

    #[test]
    fn test_free_payload_fields() {
        let labels = LabelResolver::default();
        let answers = filled(FormKind::FreeAnalysis);
        let attachments = Attachments::default();
        let payload =
            submission(FormKind::FreeAnalysis, &answers, &attachments, &labels).payload(&key());

        assert_eq!(payload.text_value("access_key"), Some("test-key"));
        assert_eq!(
            payload.text_value("subject"),
            Some("[무료 분석 신청] Hong님 견적 분석 요청")
        );
        assert_eq!(payload.text_value("project_type"), Some("신축"));
        assert_eq!(payload.text_value("construction_area"), Some("서울특별시"));
        assert_eq!(payload.text_value("budget_range"), Some("5천만원 이하"));
        assert_eq!(payload.text_value("additional_info"), Some("없음"));
        assert_eq!(payload.text_value("company"), None);
        assert_eq!(payload.text_value("결제_상태"), None);
    }

    #[test]
    fn test_absent_slots_get_marker() {
        let labels = LabelResolver::default();
        let answers = filled(FormKind::FreeAnalysis);
        let attachments = Attachments::default();
        let payload =
            submission(FormKind::FreeAnalysis, &answers, &attachments, &labels).payload(&key());

        assert_eq!(payload.text_value("견적서_파일"), Some(NOT_ATTACHED));
        assert_eq!(payload.text_value("도면_파일"), Some(NOT_ATTACHED));
        assert!(payload.file_names().is_empty());
    }

    #[test]
    fn test_one_attachment_mixes_part_and_marker() {
        let labels = LabelResolver::default();
        let answers = filled(FormKind::FreeAnalysis);
        let mut attachments = Attachments::default();
        attachments.set(
            AttachmentSlot::Blueprint,
            Attachment::new("plan.dwg", vec![0; 3000]),
        );
        let payload =
            submission(FormKind::FreeAnalysis, &answers, &attachments, &labels).payload(&key());

        assert_eq!(payload.text_value("견적서_파일"), Some(NOT_ATTACHED));
        assert_eq!(payload.text_value("도면_파일"), None);
        assert_eq!(payload.text_value("도면_파일명"), Some("plan.dwg"));
        assert_eq!(payload.text_value("도면_파일크기"), Some("3KB"));
        assert_eq!(payload.file_names(), vec!["blueprint_plan.dwg"]);
    }

    #[test]
    fn test_two_attachments_are_named_parts() {
        let labels = LabelResolver::default();
        let answers = filled(FormKind::PartnerRequest);
        let mut attachments = Attachments::default();
        attachments.set(AttachmentSlot::Quote, Attachment::new("q.pdf", vec![1, 2]));
        attachments.set(AttachmentSlot::Blueprint, Attachment::new("b.png", vec![3]));
        let payload =
            submission(FormKind::PartnerRequest, &answers, &attachments, &labels).payload(&key());

        assert_eq!(payload.file_names(), vec!["quote_q.pdf", "blueprint_b.png"]);
        assert_eq!(payload.text_value("견적서_파일"), None);
        assert_eq!(payload.text_value("도면_파일"), None);

        let quote_bytes = payload.parts().iter().find_map(|p| match p {
            PayloadPart::File {
                name,
                file_name,
                bytes,
                ..
            } if file_name == "quote_q.pdf" => Some((name.clone(), bytes.clone())),
            _ => None,
        });
        assert_eq!(quote_bytes, Some(("attachment".to_string(), vec![1, 2])));
    }

    #[test]
    fn test_partner_payload_defaults() {
        let labels = LabelResolver::default();
        let mut answers = filled(FormKind::PartnerRequest);
        answers.set(FieldId::Timeline, "3-months");
        let attachments = Attachments::default();
        let payload =
            submission(FormKind::PartnerRequest, &answers, &attachments, &labels).payload(&key());

        assert_eq!(payload.text_value("company"), Some("미입력"));
        assert_eq!(payload.text_value("timeline"), Some("3개월 이내"));
        assert_eq!(payload.text_value("requirements"), Some("없음"));
        assert_eq!(payload.text_value("additional_info"), None);
    }

    #[test]
    fn test_paid_payload_carries_payment() {
        let labels = LabelResolver::default();
        let answers = filled(FormKind::PaidAnalysis);
        let attachments = Attachments::default();
        let payload =
            submission(FormKind::PaidAnalysis, &answers, &attachments, &labels).payload(&key());

        assert_eq!(payload.text_value("결제_상태"), Some("결제 완료"));
        assert_eq!(payload.text_value("금액"), Some("70,000원"));
    }

    #[test]
    fn test_unmapped_code_sent_as_is() {
        let labels = LabelResolver::default();
        let mut answers = filled(FormKind::FreeAnalysis);
        answers.set(FieldId::ProjectType, "apartment-remodeling");
        let attachments = Attachments::default();
        let payload =
            submission(FormKind::FreeAnalysis, &answers, &attachments, &labels).payload(&key());

        assert_eq!(payload.text_value("project_type"), Some("apartment-remodeling"));
    }

    #[test]
    fn test_message_body() {
        let labels = LabelResolver::default();
        let mut answers = filled(FormKind::FreeAnalysis);
        answers.set(FieldId::Notes, "욕실 견적 확인 부탁드립니다");
        let mut attachments = Attachments::default();
        attachments.set(AttachmentSlot::Quote, Attachment::new("q.pdf", vec![0; 2048]));

        let message =
            submission(FormKind::FreeAnalysis, &answers, &attachments, &labels).message();

        assert!(message.starts_with("새로운 무료 견적 분석 신청이 접수되었습니다."));
        assert!(message.contains("이름: Hong\n"));
        assert!(message.contains("시공 지역: 서울특별시\n"));
        assert!(message.contains("견적서: q.pdf (2KB)\n"));
        assert!(message.contains("도면: 첨부되지 않음\n"));
        assert!(message.contains("=== 추가 요청사항 ===\n욕실 견적 확인 부탁드립니다\n"));
        assert!(message.contains("고객 이메일(a@b.com)"));
        assert!(message.ends_with("신청 일시: 2025. 3. 7. 오후 2:05:09"));
    }

    #[test]
    fn test_partner_message_sections() {
        let labels = LabelResolver::default();
        let mut answers = filled(FormKind::PartnerRequest);
        answers.set(FieldId::Company, "(주)시커");
        let attachments = Attachments::default();

        let message =
            submission(FormKind::PartnerRequest, &answers, &attachments, &labels).message();

        assert!(message.contains("회사명: (주)시커\n"));
        assert!(message.contains("희망 시공 시기: "));
        assert!(message.contains("=== 추가 요구사항 ===\n없음\n"));
        assert!(message.contains("담당 매니저가 고객(a@b.com)에게 연락 예정"));
    }
}
