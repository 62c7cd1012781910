use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// The attachment strategies, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttachStrategyKind {
    /// Client update setting the structured attachment field.
    Structured,
    /// Direct HTTP PATCH setting the field to a bare URL.
    RawPatch,
    /// Update appending the file reference to the description.
    TextAppend,
}

impl Display for AttachStrategyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AttachStrategyKind::Structured => write!(f, "structured"),
            AttachStrategyKind::RawPatch => write!(f, "raw_patch"),
            AttachStrategyKind::TextAppend => write!(f, "text_append"),
        }
    }
}

/// Progress of a single submission. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SubmissionState {
    Validating,
    Creating,
    AttachingStructured,
    AttachingRaw,
    AttachingAsText,
    Done,
}

impl SubmissionState {
    /// State entered when the given strategy is attempted.
    pub fn for_strategy(kind: AttachStrategyKind) -> Self {
        match kind {
            AttachStrategyKind::Structured => SubmissionState::AttachingStructured,
            AttachStrategyKind::RawPatch => SubmissionState::AttachingRaw,
            AttachStrategyKind::TextAppend => SubmissionState::AttachingAsText,
        }
    }
}

/// Result of reconciling one lead with the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// Record created, no attachment to associate.
    Created { record_id: String },
    /// Record created and the file associated structurally.
    CreatedWithAttachment {
        record_id: String,
        strategy: AttachStrategyKind,
    },
    /// Record created but the file could not be associated structurally.
    /// `embedded_as_text` tells whether its reference made it into the
    /// description field.
    CreatedAttachmentDegraded {
        record_id: String,
        embedded_as_text: bool,
    },
    /// No record could be created.
    Failed { reason: String, rate_limited: bool },
}

impl SubmissionOutcome {
    pub fn record_id(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Created { record_id }
            | SubmissionOutcome::CreatedWithAttachment { record_id, .. }
            | SubmissionOutcome::CreatedAttachmentDegraded { record_id, .. } => Some(record_id),
            SubmissionOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SubmissionOutcome::Failed { .. })
    }

    /// Short tag used in logs and API responses.
    pub fn tag(&self) -> &'static str {
        match self {
            SubmissionOutcome::Created { .. } => "created",
            SubmissionOutcome::CreatedWithAttachment { .. } => "created_with_attachment",
            SubmissionOutcome::CreatedAttachmentDegraded { .. } => "created_attachment_degraded",
            SubmissionOutcome::Failed { .. } => "failed",
        }
    }
}
