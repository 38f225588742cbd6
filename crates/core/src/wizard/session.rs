use std::collections::BTreeMap;

use thiserror::Error;

use crate::catalog::{Question, QuestionCatalog, QuestionId};
use crate::domain::contact::ContactDraft;
use crate::domain::service::{PriceRange, Service, ServiceId};
use crate::domain::submission::SubmissionRecord;
use crate::pricing::{compute_estimate, Estimate, EstimateSettings, PricingError};
use crate::sink::{SubmissionError, SubmissionSink};
use crate::wizard::states::{SessionAction, WizardPhase, WizardTransitionError};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Transition(#[from] WizardTransitionError),
    #[error(transparent)]
    Sink(#[from] SubmissionError),
}

/// One estimator session per hosted view. Owns the resolved questions, the
/// answer set, and the contact draft; nothing is shared or persisted.
#[derive(Clone, Debug)]
pub struct EstimatorSession {
    service_id: ServiceId,
    questions: Vec<Question>,
    answers: BTreeMap<QuestionId, String>,
    contact: ContactDraft,
    base: Option<PriceRange>,
    settings: EstimateSettings,
    phase: WizardPhase,
    submission: Option<SubmissionRecord>,
}

impl EstimatorSession {
    pub fn new(
        service_id: ServiceId,
        catalog: &QuestionCatalog,
        base: Option<PriceRange>,
        settings: EstimateSettings,
    ) -> Self {
        let questions = catalog.resolve(&service_id.0).to_vec();
        Self {
            service_id,
            questions,
            answers: BTreeMap::new(),
            contact: ContactDraft::default(),
            base,
            settings,
            phase: WizardPhase::Collecting,
            submission: None,
        }
    }

    pub fn for_service(
        service: &Service,
        catalog: &QuestionCatalog,
        settings: EstimateSettings,
    ) -> Self {
        Self::new(service.id.clone(), catalog, service.base_range(), settings)
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &BTreeMap<QuestionId, String> {
        &self.answers
    }

    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get(&QuestionId(question_id.to_owned())).map(String::as_str)
    }

    pub fn contact(&self) -> &ContactDraft {
        &self.contact
    }

    pub fn submission(&self) -> Option<&SubmissionRecord> {
        self.submission.as_ref()
    }

    /// Records an answer while collecting. Unknown question ids are ignored
    /// silently; a rendered form cannot produce one, so there is nothing for
    /// the caller to surface. A blank value clears the stored answer.
    pub fn set_answer(
        &mut self,
        question_id: &str,
        value: impl Into<String>,
    ) -> Result<(), WizardTransitionError> {
        if self.phase != WizardPhase::Collecting {
            return Err(WizardTransitionError::PhaseClosed {
                phase: self.phase,
                action: SessionAction::SetAnswer,
            });
        }
        if !self.questions.iter().any(|question| question.id.0 == question_id) {
            return Ok(());
        }

        let id = QuestionId(question_id.to_owned());
        let value = value.into();
        if value.trim().is_empty() {
            self.answers.remove(&id);
        } else {
            self.answers.insert(id, value);
        }
        Ok(())
    }

    /// Required questions whose answer is absent or blank.
    pub fn missing_required(&self) -> Vec<QuestionId> {
        self.questions
            .iter()
            .filter(|question| question.required)
            .filter(|question| {
                self.answers
                    .get(&question.id)
                    .map(|answer| answer.trim().is_empty())
                    .unwrap_or(true)
            })
            .map(|question| question.id.clone())
            .collect()
    }

    /// Collecting -> contact capture, refused while required answers are
    /// outstanding. The refusal names the offending questions so the host
    /// can highlight them.
    pub fn advance(&mut self) -> Result<(), WizardTransitionError> {
        if self.phase != WizardPhase::Collecting {
            return Err(WizardTransitionError::PhaseClosed {
                phase: self.phase,
                action: SessionAction::Advance,
            });
        }

        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(WizardTransitionError::MissingRequiredAnswers { missing });
        }

        self.phase = WizardPhase::ContactCapture;
        Ok(())
    }

    /// Contact capture -> collecting, unconditional. Answers survive so the
    /// user's prior choices are intact when the form reappears.
    pub fn retreat(&mut self) -> Result<(), WizardTransitionError> {
        if self.phase != WizardPhase::ContactCapture {
            return Err(WizardTransitionError::PhaseClosed {
                phase: self.phase,
                action: SessionAction::Retreat,
            });
        }

        self.phase = WizardPhase::Collecting;
        Ok(())
    }

    /// Hands the completed record to the sink. The draft is retained even
    /// when refused, so a partially filled form is never lost; on sink
    /// failure the session stays in contact capture and the user may simply
    /// submit again.
    pub fn submit(
        &mut self,
        draft: ContactDraft,
        sink: &dyn SubmissionSink,
    ) -> Result<&SubmissionRecord, SubmitError> {
        if self.phase != WizardPhase::ContactCapture {
            return Err(WizardTransitionError::PhaseClosed {
                phase: self.phase,
                action: SessionAction::Submit,
            }
            .into());
        }

        self.contact = draft;
        let missing = self.contact.missing_fields();
        if !missing.is_empty() {
            return Err(WizardTransitionError::MissingContactFields {
                missing: missing.into_iter().map(str::to_owned).collect(),
            }
            .into());
        }

        let estimate = self.estimate().ok().flatten();
        let record = SubmissionRecord::new(
            self.service_id.clone(),
            self.answers.clone(),
            self.contact.clone(),
            estimate,
        );
        sink.deliver(&record)?;

        self.phase = WizardPhase::Submitted;
        Ok(self.submission.insert(record))
    }

    /// Recomputed on demand, never cached. `Ok(None)` means the service has
    /// no price basis and the host should render "no estimate available".
    pub fn estimate(&self) -> Result<Option<Estimate>, PricingError> {
        match &self.base {
            None => Ok(None),
            Some(base) => {
                compute_estimate(&self.questions, &self.answers, base, &self.settings).map(Some)
            }
        }
    }
}
