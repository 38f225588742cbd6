use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::QuestionId;

/// Linear wizard flow: answers are collected, contact details captured, and
/// the session ends in a terminal submitted phase. The only backward edge is
/// contact capture returning to collecting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardPhase {
    Collecting,
    ContactCapture,
    Submitted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionAction {
    SetAnswer,
    Advance,
    Retreat,
    Submit,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WizardTransitionError {
    #[error("required questions are still unanswered: {missing:?}")]
    MissingRequiredAnswers { missing: Vec<QuestionId> },
    #[error("contact details are incomplete: {missing:?}")]
    MissingContactFields { missing: Vec<String> },
    #[error("{action:?} is not available while the wizard is in {phase:?}")]
    PhaseClosed { phase: WizardPhase, action: SessionAction },
}
