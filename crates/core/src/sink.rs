use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::domain::submission::SubmissionRecord;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("submission could not be delivered: {0}")]
    Delivery(String),
}

/// Boundary to whatever actually forwards a completed request to a human
/// (email, CRM, SMS). The engine only needs success or a retryable failure.
pub trait SubmissionSink: Send + Sync {
    fn deliver(&self, record: &SubmissionRecord) -> Result<(), SubmissionError>;
}

#[derive(Clone, Default)]
pub struct InMemorySubmissionSink {
    records: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl InMemorySubmissionSink {
    pub fn records(&self) -> Vec<SubmissionRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SubmissionSink for InMemorySubmissionSink {
    fn deliver(&self, record: &SubmissionRecord) -> Result<(), SubmissionError> {
        match self.records.lock() {
            Ok(mut records) => records.push(record.clone()),
            Err(poisoned) => poisoned.into_inner().push(record.clone()),
        }
        Ok(())
    }
}
