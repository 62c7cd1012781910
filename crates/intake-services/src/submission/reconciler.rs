use intake_core::{AttachStrategyKind, Lead, SubmissionOutcome, SubmissionState};
use std::sync::Arc;
use std::time::Instant;

use super::strategy::{default_strategies, AttachStrategy};
use crate::records::{lead_fields, minimal_lead_fields, LeadStore, StoreError};

/// Forward-only progress marker for one submission.
struct Progress {
    state: SubmissionState,
}

impl Progress {
    fn new() -> Self {
        Self {
            state: SubmissionState::Creating,
        }
    }

    fn advance(&mut self, next: SubmissionState) {
        debug_assert!(next >= self.state, "{:?} -> {:?}", self.state, next);
        tracing::trace!(from = ?self.state, to = ?next, "Submission state");
        self.state = next;
    }
}

/// Turns a validated lead into a record, associating its file on a
/// best-effort basis.
///
/// Creation is attempted once in full, then once more as a minimal record
/// with the file reference folded into the description. After a record
/// exists, attachment strategies run strictly in order until one succeeds;
/// their failures are logged and never reported as a failed submission.
pub struct SubmissionReconciler {
    store: Arc<dyn LeadStore>,
    strategies: Vec<Box<dyn AttachStrategy>>,
}

impl SubmissionReconciler {
    /// Reconciler with the standard strategy chain writing to `attachment_field`.
    pub fn new(store: Arc<dyn LeadStore>, attachment_field: &str) -> Self {
        let strategies = default_strategies(store.clone(), attachment_field);
        Self { store, strategies }
    }

    /// Reconciler with a custom chain. Strategies are reordered by kind so
    /// the chain always runs structured, raw PATCH, then text append.
    pub fn with_strategies(
        store: Arc<dyn LeadStore>,
        mut strategies: Vec<Box<dyn AttachStrategy>>,
    ) -> Self {
        strategies.sort_by_key(|s| SubmissionState::for_strategy(s.kind()));
        Self { store, strategies }
    }

    pub async fn submit(&self, lead: &Lead) -> SubmissionOutcome {
        let start = Instant::now();
        let mut progress = Progress::new();

        let outcome = self.run(lead, &mut progress).await;
        progress.advance(SubmissionState::Done);

        match &outcome {
            SubmissionOutcome::Failed { reason, rate_limited } => tracing::error!(
                outcome = outcome.tag(),
                reason = %reason,
                rate_limited = rate_limited,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Lead submission failed"
            ),
            _ => tracing::info!(
                outcome = outcome.tag(),
                record_id = outcome.record_id().unwrap_or_default(),
                has_attachment = lead.attachment.is_some(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Lead submission completed"
            ),
        }

        outcome
    }

    async fn run(&self, lead: &Lead, progress: &mut Progress) -> SubmissionOutcome {
        let record_id = match self.store.create(lead_fields(lead)).await {
            Ok(id) => id,
            Err(first) => {
                tracing::warn!(error = %first, "Record create failed, retrying with minimal record");

                match self.store.create(minimal_lead_fields(lead)).await {
                    Ok(id) if lead.attachment.is_some() => {
                        return SubmissionOutcome::CreatedAttachmentDegraded {
                            record_id: id,
                            embedded_as_text: true,
                        };
                    }
                    Ok(id) => return SubmissionOutcome::Created { record_id: id },
                    Err(second) => return failed(&first, &second),
                }
            }
        };

        let Some(attachment) = &lead.attachment else {
            return SubmissionOutcome::Created { record_id };
        };

        for strategy in &self.strategies {
            let kind = strategy.kind();
            progress.advance(SubmissionState::for_strategy(kind));

            match strategy.try_attach(&record_id, lead, attachment).await {
                Ok(()) => {
                    tracing::info!(
                        record_id = %record_id,
                        strategy = %kind,
                        file_name = %attachment.file_name,
                        "Attachment associated"
                    );
                    return match kind {
                        AttachStrategyKind::TextAppend => {
                            SubmissionOutcome::CreatedAttachmentDegraded {
                                record_id,
                                embedded_as_text: true,
                            }
                        }
                        _ => SubmissionOutcome::CreatedWithAttachment {
                            record_id,
                            strategy: kind,
                        },
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        record_id = %record_id,
                        strategy = %kind,
                        error = %e,
                        "Attachment strategy failed"
                    );
                }
            }
        }

        SubmissionOutcome::CreatedAttachmentDegraded {
            record_id,
            embedded_as_text: false,
        }
    }
}

fn failed(first: &StoreError, second: &StoreError) -> SubmissionOutcome {
    SubmissionOutcome::Failed {
        reason: second.to_string(),
        rate_limited: first.is_rate_limited() || second.is_rate_limited(),
    }
}
