//! Lead submission: create the record, then associate the file through an
//! ordered chain of attachment strategies.

mod reconciler;
mod strategy;

pub use reconciler::SubmissionReconciler;
pub use strategy::{default_strategies, AttachStrategy, RawPatch, StructuredAttachment, TextAppend};
