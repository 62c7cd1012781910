use async_trait::async_trait;
use intake_core::constants::FIELD_CASE_DESCRIPTION;
use intake_core::{AttachStrategyKind, Attachment, Lead};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::records::{LeadStore, RecordFields, StoreResult};

/// One way of associating an uploaded file with an existing record.
#[async_trait]
pub trait AttachStrategy: Send + Sync {
    fn kind(&self) -> AttachStrategyKind;

    async fn try_attach(
        &self,
        record_id: &str,
        lead: &Lead,
        attachment: &Attachment,
    ) -> StoreResult<()>;
}

fn single_field(name: &str, value: Value) -> RecordFields {
    let mut fields = RecordFields::new();
    fields.insert(name.to_string(), value);
    fields
}

/// Sets the attachment field to `[{ url, filename }]` through the typed client.
pub struct StructuredAttachment {
    store: Arc<dyn LeadStore>,
    field: String,
}

impl StructuredAttachment {
    pub fn new(store: Arc<dyn LeadStore>, field: impl Into<String>) -> Self {
        Self {
            store,
            field: field.into(),
        }
    }
}

#[async_trait]
impl AttachStrategy for StructuredAttachment {
    fn kind(&self) -> AttachStrategyKind {
        AttachStrategyKind::Structured
    }

    async fn try_attach(
        &self,
        record_id: &str,
        _lead: &Lead,
        attachment: &Attachment,
    ) -> StoreResult<()> {
        let value = json!([{ "url": attachment.url, "filename": attachment.file_name }]);
        self.store
            .update(record_id, single_field(&self.field, value))
            .await
    }
}

/// Sets the attachment field to the bare URL string with a raw PATCH.
pub struct RawPatch {
    store: Arc<dyn LeadStore>,
    field: String,
}

impl RawPatch {
    pub fn new(store: Arc<dyn LeadStore>, field: impl Into<String>) -> Self {
        Self {
            store,
            field: field.into(),
        }
    }
}

#[async_trait]
impl AttachStrategy for RawPatch {
    fn kind(&self) -> AttachStrategyKind {
        AttachStrategyKind::RawPatch
    }

    async fn try_attach(
        &self,
        record_id: &str,
        _lead: &Lead,
        attachment: &Attachment,
    ) -> StoreResult<()> {
        let value = Value::String(attachment.url.clone());
        self.store
            .patch_raw(record_id, single_field(&self.field, value))
            .await
    }
}

/// Rewrites `Case Description` as the description followed by the file block.
pub struct TextAppend {
    store: Arc<dyn LeadStore>,
}

impl TextAppend {
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AttachStrategy for TextAppend {
    fn kind(&self) -> AttachStrategyKind {
        AttachStrategyKind::TextAppend
    }

    async fn try_attach(
        &self,
        record_id: &str,
        lead: &Lead,
        _attachment: &Attachment,
    ) -> StoreResult<()> {
        let text = lead.description_with_attachment_text();
        self.store
            .update(
                record_id,
                single_field(FIELD_CASE_DESCRIPTION, Value::String(text)),
            )
            .await
    }
}

/// Structured, then raw PATCH, then text append.
pub fn default_strategies(
    store: Arc<dyn LeadStore>,
    attachment_field: &str,
) -> Vec<Box<dyn AttachStrategy>> {
    vec![
        Box::new(StructuredAttachment::new(store.clone(), attachment_field)),
        Box::new(RawPatch::new(store.clone(), attachment_field)),
        Box::new(TextAppend::new(store)),
    ]
}
