pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod sink;
pub mod wizard;

pub use catalog::{
    AnswerOption, CatalogError, Question, QuestionCatalog, QuestionId, QuestionKind,
    FALLBACK_ENTRY,
};
pub use domain::contact::ContactDraft;
pub use domain::service::{PriceRange, Service, ServiceId, ServicePricing};
pub use domain::submission::{SubmissionId, SubmissionRecord};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use pricing::{
    compute_estimate, quick_estimate, Composition, Estimate, EstimateSettings, ImpactStep,
    PricingError,
};
pub use sink::{InMemorySubmissionSink, SubmissionError, SubmissionSink};
pub use wizard::{
    EstimatorSession, SessionAction, SubmitError, WizardPhase, WizardTransitionError,
};
