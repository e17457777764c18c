//! Form domain layer
//!
//! Answers, attachments and the per-instance submission flag for the
//! three request forms.

mod attachments;
mod field;
mod form_state;

pub use attachments::{Attachment, AttachmentError, AttachmentSlot, Attachments};
pub use field::{FieldId, FieldValue, FormField};
pub use form_state::{Form, FormAnswers, FormInstance, FormKind, FormRow, InFlightGuard};
