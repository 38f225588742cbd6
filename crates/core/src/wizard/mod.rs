pub mod session;
pub mod states;

pub use session::{EstimatorSession, SubmitError};
pub use states::{SessionAction, WizardPhase, WizardTransitionError};
