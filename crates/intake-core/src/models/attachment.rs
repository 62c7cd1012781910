use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Document types accepted by the upload gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
    Txt,
    Jpeg,
    Png,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 6] = [
        DocumentKind::Pdf,
        DocumentKind::Doc,
        DocumentKind::Docx,
        DocumentKind::Txt,
        DocumentKind::Jpeg,
        DocumentKind::Png,
    ];

    /// Canonical MIME type for this kind.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Doc => "application/msword",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Txt => "text/plain",
            DocumentKind::Jpeg => "image/jpeg",
            DocumentKind::Png => "image/png",
        }
    }

    /// Resolve a MIME type, ignoring parameters such as `; charset=utf-8`.
    pub fn from_mime_type(content_type: &str) -> Option<Self> {
        let normalized = content_type
            .split(';')
            .next()
            .map(|s| s.trim())
            .unwrap_or(content_type)
            .to_lowercase();

        Self::ALL
            .into_iter()
            .find(|kind| kind.mime_type() == normalized)
    }

    /// Resolve from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "doc" => Some(DocumentKind::Doc),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            "jpg" | "jpeg" => Some(DocumentKind::Jpeg),
            "png" => Some(DocumentKind::Png),
            _ => None,
        }
    }
}

impl Display for DocumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Doc => "doc",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
            DocumentKind::Jpeg => "jpeg",
            DocumentKind::Png => "png",
        };
        f.write_str(name)
    }
}

/// Reference to a previously uploaded supporting document.
///
/// The file itself lives in object storage; a lead only carries its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Attachment {
    pub url: String,
    pub file_name: String,
    pub kind: DocumentKind,
    /// Size in bytes when the client reported it.
    pub size_bytes: Option<u64>,
}

impl Attachment {
    /// Human-readable block used when the file can only be recorded as text.
    pub fn text_block(&self) -> String {
        format!("File: {}\nURL: {}", self.file_name, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_lookup_ignores_parameters_and_case() {
        assert_eq!(
            DocumentKind::from_mime_type("Text/Plain; charset=utf-8"),
            Some(DocumentKind::Txt)
        );
        assert_eq!(
            DocumentKind::from_mime_type("application/pdf"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::from_mime_type("application/zip"), None);
    }

    #[test]
    fn file_name_lookup_uses_last_extension() {
        assert_eq!(
            DocumentKind::from_file_name("contract.final.DOCX"),
            Some(DocumentKind::Docx)
        );
        assert_eq!(
            DocumentKind::from_file_name("scan.jpg"),
            Some(DocumentKind::Jpeg)
        );
        assert_eq!(DocumentKind::from_file_name("archive.zip"), None);
        assert_eq!(DocumentKind::from_file_name("README"), None);
    }

    #[test]
    fn text_block_lists_name_then_url() {
        let attachment = Attachment {
            url: "https://files.example.com/a.pdf".to_string(),
            file_name: "a.pdf".to_string(),
            kind: DocumentKind::Pdf,
            size_bytes: None,
        };
        assert_eq!(
            attachment.text_block(),
            "File: a.pdf\nURL: https://files.example.com/a.pdf"
        );
    }
}
