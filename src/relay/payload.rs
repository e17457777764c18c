//! Multipart payload sent to the relay

use reqwest::multipart::{Form, Part};

/// One part of a multipart submission
#[derive(Clone, PartialEq, Eq)]
pub enum PayloadPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: &'static str,
        bytes: Vec<u8>,
    },
}

impl PayloadPart {
    pub fn name(&self) -> &str {
        match self {
            PayloadPart::Text { name, .. } | PayloadPart::File { name, .. } => name,
        }
    }
}

/// Ordered multipart parts. Part names may repeat (every uploaded file is
/// sent as `attachment`).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RelayPayload {
    parts: Vec<PayloadPart>,
}

impl std::fmt::Debug for RelayPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Names only: values carry the access key and file contents
        f.debug_list()
            .entries(self.parts.iter().map(PayloadPart::name))
            .finish()
    }
}

impl RelayPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text part
    pub fn text(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.parts.push(PayloadPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a binary part; the MIME type is derived from the file name
    pub fn file(
        &mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> &mut Self {
        let file_name = file_name.into();
        self.parts.push(PayloadPart::File {
            name: name.into(),
            mime: mime_for(&file_name),
            file_name,
            bytes,
        });
        self
    }

    pub fn parts(&self) -> &[PayloadPart] {
        &self.parts
    }

    /// First text value with the given name
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            PayloadPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// File names of all binary parts, in order
    pub fn file_names(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                PayloadPart::File { file_name, .. } => Some(file_name.as_str()),
                PayloadPart::Text { .. } => None,
            })
            .collect()
    }

    /// Convert into a reqwest multipart form
    pub fn into_form(self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for part in self.parts {
            form = match part {
                PayloadPart::Text { name, value } => form.text(name, value),
                PayloadPart::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => form.part(name, Part::bytes(bytes).file_name(file_name).mime_str(mime)?),
            };
        }
        Ok(form)
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "dwg" => "image/vnd.dwg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parts_keep_insertion_order() {
        let mut payload = RelayPayload::new();
        payload
            .text("access_key", "secret")
            .text("name", "Hong")
            .file("attachment", "quote_a.pdf", vec![1, 2, 3]);

        let names: Vec<_> = payload.parts().iter().map(PayloadPart::name).collect();
        assert_eq!(names, vec!["access_key", "name", "attachment"]);
    }

    #[test]
    fn test_text_value_lookup() {
        let mut payload = RelayPayload::new();
        payload.text("email", "a@b.com");
        assert_eq!(payload.text_value("email"), Some("a@b.com"));
        assert_eq!(payload.text_value("phone"), None);
    }

    #[test]
    fn test_file_names_and_mime() {
        let mut payload = RelayPayload::new();
        payload
            .file("attachment", "quote_a.PDF", vec![])
            .file("attachment", "blueprint_b.dwg", vec![])
            .file("attachment", "blueprint_c", vec![]);

        assert_eq!(
            payload.file_names(),
            vec!["quote_a.PDF", "blueprint_b.dwg", "blueprint_c"]
        );
        let mimes: Vec<_> = payload
            .parts()
            .iter()
            .filter_map(|p| match p {
                PayloadPart::File { mime, .. } => Some(*mime),
                _ => None,
            })
            .collect();
        assert_eq!(
            mimes,
            vec!["application/pdf", "image/vnd.dwg", "application/octet-stream"]
        );
    }

    #[test]
    fn test_debug_hides_values() {
        let mut payload = RelayPayload::new();
        payload.text("access_key", "top-secret");
        let debug = format!("{payload:?}");
        assert!(debug.contains("access_key"));
        assert!(!debug.contains("top-secret"));
    }

    #[test]
    fn test_into_form_accepts_all_parts() {
        let mut payload = RelayPayload::new();
        payload
            .text("name", "Hong")
            .file("attachment", "quote_a.png", vec![0x89, 0x50]);
        assert!(payload.into_form().is_ok());
    }
}
