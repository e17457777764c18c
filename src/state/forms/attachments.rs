//! File attachment slots shared by the request forms

use std::path::{Path, PathBuf};

/// Which attachment a file fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentSlot {
    Quote,
    Blueprint,
}

impl AttachmentSlot {
    pub const ALL: [AttachmentSlot; 2] = [AttachmentSlot::Quote, AttachmentSlot::Blueprint];

    /// Prefix used for the uploaded part's file name
    pub fn key(self) -> &'static str {
        match self {
            AttachmentSlot::Quote => "quote",
            AttachmentSlot::Blueprint => "blueprint",
        }
    }

    /// Korean name used in field labels and payload keys
    pub fn label(self) -> &'static str {
        match self {
            AttachmentSlot::Quote => "견적서",
            AttachmentSlot::Blueprint => "도면",
        }
    }

    pub fn index(self) -> usize {
        match self {
            AttachmentSlot::Quote => 0,
            AttachmentSlot::Blueprint => 1,
        }
    }
}

/// Errors raised while attaching a local file
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("지원하지 않는 파일 형식입니다: {file_name} (허용: {accepted})")]
    UnsupportedExtension { file_name: String, accepted: String },

    #[error("파일 경로가 올바르지 않습니다: {0}")]
    InvalidPath(PathBuf),

    #[error("파일을 읽을 수 없습니다: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A user-selected file held in memory until submission
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("size", &self.size())
            .finish()
    }
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a local file, checking its extension against `accepted`
    /// (lowercase, without the dot)
    pub async fn load(path: &Path, accepted: &[&str]) -> Result<Self, AttachmentError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AttachmentError::InvalidPath(path.to_path_buf()))?
            .to_string();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if !accepted.contains(&extension.as_str()) {
            return Err(AttachmentError::UnsupportedExtension {
                file_name,
                accepted: accepted
                    .iter()
                    .map(|e| format!(".{e}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| AttachmentError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(file_name = %file_name, size = bytes.len(), "Loaded attachment");
        Ok(Self { file_name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size in kilobytes, rounded to the nearest whole number
    pub fn size_kb(&self) -> u64 {
        (self.size() as f64 / 1024.0).round() as u64
    }

    /// Human readable summary, e.g. `quote.pdf (12KB)`
    pub fn summary(&self) -> String {
        format!("{} ({}KB)", self.file_name, self.size_kb())
    }
}

/// The two optional attachment slots of a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachments {
    quote: Option<Attachment>,
    blueprint: Option<Attachment>,
}

impl Attachments {
    pub fn get(&self, slot: AttachmentSlot) -> Option<&Attachment> {
        match slot {
            AttachmentSlot::Quote => self.quote.as_ref(),
            AttachmentSlot::Blueprint => self.blueprint.as_ref(),
        }
    }

    /// Set or replace the file in a slot
    pub fn set(&mut self, slot: AttachmentSlot, attachment: Attachment) {
        *self.slot_mut(slot) = Some(attachment);
    }

    pub fn clear_slot(&mut self, slot: AttachmentSlot) {
        *self.slot_mut(slot) = None;
    }

    pub fn clear(&mut self) {
        self.quote = None;
        self.blueprint = None;
    }

    pub fn is_empty(&self) -> bool {
        self.quote.is_none() && self.blueprint.is_none()
    }

    fn slot_mut(&mut self, slot: AttachmentSlot) -> &mut Option<Attachment> {
        match slot {
            AttachmentSlot::Quote => &mut self.quote,
            AttachmentSlot::Blueprint => &mut self.blueprint,
        }
    }
}
