use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::attachment::Attachment;

/// Raw lead fields as submitted by the contact form.
///
/// Everything is optional here; `validate_lead` decides what is acceptable.
/// `fileType` and `fileSize` echo what `POST /upload` returned so the upload
/// gate can be re-applied to the referenced file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub case_description: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// A validated lead. Never mutated after acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub case_description: Option<String>,
    pub attachment: Option<Attachment>,
}

impl Lead {
    /// Case description as stored: empty string when absent.
    pub fn description_or_empty(&self) -> &str {
        self.case_description.as_deref().unwrap_or("")
    }

    /// Description with the attachment's text block appended, used when the
    /// file reference has to live inside the description field.
    pub fn description_with_attachment_text(&self) -> String {
        let description = self.description_or_empty();
        match &self.attachment {
            Some(attachment) if description.is_empty() => attachment.text_block(),
            Some(attachment) => format!("{}\n\n{}", description, attachment.text_block()),
            None => description.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentKind;

    fn attachment() -> Attachment {
        Attachment {
            url: "https://files.example.com/leads/abc_brief.pdf".to_string(),
            file_name: "brief.pdf".to_string(),
            kind: DocumentKind::Pdf,
            size_bytes: Some(1024),
        }
    }

    #[test]
    fn submission_deserializes_camel_case() {
        let submission: LeadSubmission = serde_json::from_str(
            r#"{"name":"A","email":"a@b.co","caseDescription":"x","fileUrl":"https://f/x.pdf","fileSize":12}"#,
        )
        .unwrap();
        assert_eq!(submission.name.as_deref(), Some("A"));
        assert_eq!(submission.case_description.as_deref(), Some("x"));
        assert_eq!(submission.file_url.as_deref(), Some("https://f/x.pdf"));
        assert_eq!(submission.file_size, Some(12));
        assert!(submission.file_name.is_none());
    }

    #[test]
    fn description_with_attachment_text_appends_block() {
        let lead = Lead {
            name: "A".to_string(),
            email: "a@b.co".to_string(),
            case_description: Some("Contract dispute".to_string()),
            attachment: Some(attachment()),
        };
        assert_eq!(
            lead.description_with_attachment_text(),
            "Contract dispute\n\nFile: brief.pdf\nURL: https://files.example.com/leads/abc_brief.pdf"
        );
    }

    #[test]
    fn description_with_attachment_text_without_description() {
        let lead = Lead {
            name: "A".to_string(),
            email: "a@b.co".to_string(),
            case_description: None,
            attachment: Some(attachment()),
        };
        assert!(lead
            .description_with_attachment_text()
            .starts_with("File: brief.pdf\n"));
    }

    #[test]
    fn description_without_attachment_is_unchanged() {
        let lead = Lead {
            name: "A".to_string(),
            email: "a@b.co".to_string(),
            case_description: None,
            attachment: None,
        };
        assert_eq!(lead.description_or_empty(), "");
        assert_eq!(lead.description_with_attachment_text(), "");
    }
}
