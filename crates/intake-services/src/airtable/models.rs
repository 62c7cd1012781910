use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::records::RecordFields;

/// Body of a create or typed update call.
#[derive(Debug, Serialize)]
pub(crate) struct RecordWriteRequest<'a> {
    pub fields: &'a RecordFields,
    pub typecast: bool,
}

/// A record as returned by the REST API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirtableRecord {
    pub id: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: RecordFields,
}

/// Airtable reports errors either as `{"error": "NOT_FOUND"}` or as
/// `{"error": {"type": "...", "message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorBody {
    Code(String),
    Detailed {
        #[serde(rename = "type")]
        kind: Option<String>,
        message: Option<String>,
    },
}

impl ErrorBody {
    pub fn describe(&self) -> String {
        match self {
            ErrorBody::Code(code) => code.clone(),
            ErrorBody::Detailed { kind, message } => match (kind, message) {
                (Some(kind), Some(message)) => format!("{}: {}", kind, message),
                (Some(kind), None) => kind.clone(),
                (None, Some(message)) => message.clone(),
                (None, None) => "unknown error".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub permission_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListBasesResponse {
    pub bases: Vec<BaseSummary>,
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub options: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub primary_field_id: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListTablesResponse {
    pub tables: Vec<TableSchema>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_accepts_both_shapes() {
        let plain: ErrorEnvelope = serde_json::from_str(r#"{"error":"NOT_FOUND"}"#).unwrap();
        assert_eq!(plain.error.describe(), "NOT_FOUND");

        let detailed: ErrorEnvelope = serde_json::from_str(
            r#"{"error":{"type":"INVALID_ATTACHMENT_OBJECT","message":"Invalid attachment"}}"#,
        )
        .unwrap();
        assert_eq!(
            detailed.error.describe(),
            "INVALID_ATTACHMENT_OBJECT: Invalid attachment"
        );
    }

    #[test]
    fn table_schema_reads_field_types() {
        let tables: ListTablesResponse = serde_json::from_str(
            r#"{"tables":[{"id":"tbl1","name":"Leads","primaryFieldId":"fld1","fields":[
                {"id":"fld1","name":"Name","type":"singleLineText"},
                {"id":"fld2","name":"Aggrement","type":"multipleAttachments","options":{"isReversed":false}}
            ]}]}"#,
        )
        .unwrap();
        let table = &tables.tables[0];
        assert_eq!(table.name, "Leads");
        assert_eq!(table.fields[1].field_type, "multipleAttachments");
    }
}
