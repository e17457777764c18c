//! Form field value objects

use crate::state::labels::{LabelCategory, LabelResolver};

/// Identifies a question on one of the request forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Name,
    Email,
    Phone,
    Company,
    ProjectType,
    Region,
    Budget,
    Timeline,
    Notes,
}

impl FieldId {
    /// Fields that must be non-empty before a submission is dispatched
    pub const REQUIRED: [FieldId; 6] = [
        FieldId::Name,
        FieldId::Email,
        FieldId::Phone,
        FieldId::ProjectType,
        FieldId::Region,
        FieldId::Budget,
    ];

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::Name => "이름",
            FieldId::Email => "이메일 주소",
            FieldId::Phone => "휴대폰 번호",
            FieldId::Company => "회사명",
            FieldId::ProjectType => "프로젝트 유형",
            FieldId::Region => "시공 지역",
            FieldId::Budget => "예산 범위",
            FieldId::Timeline => "희망 시작 시기",
            FieldId::Notes => "추가 요청사항",
        }
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// Selected code of a label category (empty when nothing is chosen)
    Choice {
        category: LabelCategory,
        code: String,
    },
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub id: FieldId,
    pub label: String,
    pub placeholder: &'static str,
    pub value: FieldValue,
    pub is_multiline: bool,
}

impl FormField {
    /// Create a new text field
    pub fn text(id: FieldId, placeholder: &'static str, is_multiline: bool) -> Self {
        Self {
            id,
            label: Self::decorated_label(id),
            placeholder,
            value: FieldValue::Text(String::new()),
            is_multiline,
        }
    }

    /// Create a new select field backed by a label category
    pub fn choice(id: FieldId, category: LabelCategory) -> Self {
        Self {
            id,
            label: Self::decorated_label(id),
            placeholder: "←/→ 로 선택",
            value: FieldValue::Choice {
                category,
                code: String::new(),
            },
            is_multiline: false,
        }
    }

    /// Replace the default label of an optional field
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    fn decorated_label(id: FieldId) -> String {
        if id.is_required() {
            format!("{} *", id.label())
        } else {
            id.label().to_string()
        }
    }

    /// Raw value: typed text or the selected code
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            FieldValue::Choice { code, .. } => code,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.value, FieldValue::Choice { .. })
    }

    /// True when the answer is blank (whitespace counts as blank)
    pub fn is_blank(&self) -> bool {
        self.as_text().trim().is_empty()
    }

    /// Set the value directly (text or code)
    pub fn set_text(&mut self, value: impl Into<String>) {
        match &mut self.value {
            FieldValue::Text(s) => *s = value.into(),
            FieldValue::Choice { code, .. } => *code = value.into(),
        }
    }

    /// Push a character to the field value (ignored by select fields)
    pub fn push_char(&mut self, c: char) {
        if let FieldValue::Text(s) = &mut self.value {
            s.push(c);
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => {
                s.pop();
            }
            FieldValue::Choice { code, .. } => code.clear(),
        }
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => s.clear(),
            FieldValue::Choice { code, .. } => code.clear(),
        }
    }

    /// Move a select field to the next option (wraps, starts at the first)
    pub fn select_next(&mut self, labels: &LabelResolver) {
        self.step_choice(labels, true);
    }

    /// Move a select field to the previous option (wraps, starts at the last)
    pub fn select_prev(&mut self, labels: &LabelResolver) {
        self.step_choice(labels, false);
    }

    fn step_choice(&mut self, labels: &LabelResolver, forward: bool) {
        let FieldValue::Choice { category, code } = &mut self.value else {
            return;
        };
        let options = labels.options(*category);
        if options.is_empty() {
            return;
        }
        let current = options.iter().position(|o| o == code);
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(0), false) => options.len() - 1,
            (Some(i), false) => i - 1,
        };
        *code = options[next].to_string();
    }

    /// Get the display value for rendering
    pub fn display_value(&self, labels: &LabelResolver) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Choice { code, .. } if code.is_empty() => String::new(),
            FieldValue::Choice { category, code } => labels.resolve(*category, code).to_string(),
        }
    }
}
