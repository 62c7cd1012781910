//! Test helpers
//!
//! An in-memory `LeadStore` that records every call and fails on demand, plus
//! lead fixtures. Enabled for this crate's tests and, through the
//! `test-helpers` feature, for the API integration tests.

use async_trait::async_trait;
use intake_core::{Attachment, DocumentKind, Lead};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::records::{LeadStore, RecordFields, StoreError, StoreResult};

/// A call received by `MockLeadStore`.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Create(RecordFields),
    Update {
        record_id: String,
        fields: RecordFields,
    },
    PatchRaw {
        record_id: String,
        fields: RecordFields,
    },
}

#[derive(Default)]
struct Failures {
    creates: VecDeque<StoreError>,
    updates_touching: Vec<(String, StoreError)>,
    all_updates: Option<StoreError>,
    raw_patches: Option<StoreError>,
    connectivity: Option<StoreError>,
}

/// Mock record store. Record ids are `rec1`, `rec2`, ... in creation order.
#[derive(Clone, Default)]
pub struct MockLeadStore {
    calls: Arc<Mutex<Vec<StoreCall>>>,
    failures: Arc<Mutex<Failures>>,
    created: Arc<Mutex<usize>>,
}

impl MockLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<RecordFields> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Create(fields) => Some(fields),
                _ => None,
            })
            .collect()
    }

    /// Fail the next `count` create calls with `error`.
    pub fn fail_next_creates(&self, count: usize, error: StoreError) {
        let mut failures = self.failures.lock().unwrap();
        for _ in 0..count {
            failures.creates.push_back(error.clone());
        }
    }

    /// Fail every update whose fields include `field`.
    pub fn fail_updates_touching(&self, field: &str, error: StoreError) {
        self.failures
            .lock()
            .unwrap()
            .updates_touching
            .push((field.to_string(), error));
    }

    pub fn fail_all_updates(&self, error: StoreError) {
        self.failures.lock().unwrap().all_updates = Some(error);
    }

    pub fn fail_raw_patches(&self, error: StoreError) {
        self.failures.lock().unwrap().raw_patches = Some(error);
    }

    pub fn fail_connectivity(&self, error: StoreError) {
        self.failures.lock().unwrap().connectivity = Some(error);
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl LeadStore for MockLeadStore {
    async fn create(&self, fields: RecordFields) -> StoreResult<String> {
        self.record(StoreCall::Create(fields));
        if let Some(error) = self.failures.lock().unwrap().creates.pop_front() {
            return Err(error);
        }
        let mut created = self.created.lock().unwrap();
        *created += 1;
        Ok(format!("rec{}", *created))
    }

    async fn update(&self, record_id: &str, fields: RecordFields) -> StoreResult<()> {
        let failure = {
            let failures = self.failures.lock().unwrap();
            failures.all_updates.clone().or_else(|| {
                failures
                    .updates_touching
                    .iter()
                    .find(|(field, _)| fields.contains_key(field))
                    .map(|(_, error)| error.clone())
            })
        };
        self.record(StoreCall::Update {
            record_id: record_id.to_string(),
            fields,
        });
        failure.map_or(Ok(()), Err)
    }

    async fn patch_raw(&self, record_id: &str, fields: RecordFields) -> StoreResult<()> {
        self.record(StoreCall::PatchRaw {
            record_id: record_id.to_string(),
            fields,
        });
        let failure = self.failures.lock().unwrap().raw_patches.clone();
        failure.map_or(Ok(()), Err)
    }

    async fn check_connectivity(&self) -> StoreResult<()> {
        let failure = self.failures.lock().unwrap().connectivity.clone();
        failure.map_or(Ok(()), Err)
    }
}

pub fn sample_attachment() -> Attachment {
    Attachment {
        url: "https://files.example.com/leads/0001_brief.pdf".to_string(),
        file_name: "brief.pdf".to_string(),
        kind: DocumentKind::Pdf,
        size_bytes: Some(2048),
    }
}

pub fn sample_lead(attachment: Option<Attachment>) -> Lead {
    Lead {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        case_description: Some("Contract dispute with a supplier".to_string()),
        attachment,
    }
}
