use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::QuestionId;
use crate::domain::contact::ContactDraft;
use crate::domain::service::ServiceId;
use crate::pricing::Estimate;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub Uuid);

/// The immutable record handed to the submission sink once the wizard
/// completes. Lives only as long as the session that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub service_id: ServiceId,
    pub answers: BTreeMap<QuestionId, String>,
    pub contact: ContactDraft,
    pub estimate: Option<Estimate>,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(
        service_id: ServiceId,
        answers: BTreeMap<QuestionId, String>,
        contact: ContactDraft,
        estimate: Option<Estimate>,
    ) -> Self {
        Self {
            id: SubmissionId(Uuid::new_v4()),
            service_id,
            answers,
            contact,
            estimate,
            submitted_at: Utc::now(),
        }
    }
}
