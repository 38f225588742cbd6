mod builtin;

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog key consulted when a requested service has no entry of its own.
pub const FALLBACK_ENTRY: &str = "default";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    SingleChoice,
    Select,
    ShortText,
    LongText,
}

impl QuestionKind {
    pub fn has_options(self) -> bool {
        matches!(self, Self::SingleChoice | Self::Select)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_impact: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl Question {
    pub fn option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == value)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog is missing the required `default` entry")]
    MissingFallbackEntry,
    #[error("catalog entry `{service}` has no questions")]
    EmptyEntry { service: String },
    #[error("catalog entry `{service}` repeats question id `{id}`")]
    DuplicateQuestionId { service: String, id: String },
    #[error("question `{id}` in entry `{service}` repeats option value `{value}`")]
    DuplicateOptionValue { service: String, id: String, value: String },
    #[error("choice question `{id}` in entry `{service}` has no options")]
    MissingOptions { service: String, id: String },
    #[error("text question `{id}` in entry `{service}` carries options")]
    UnexpectedOptions { service: String, id: String },
}

/// Ordered question sequences keyed by service identifier. The `default`
/// entry is mandatory and backs every lookup for an unrecognized service,
/// so resolution is total by construction. Catalogs only enter the process
/// through `new`, which validates the entries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuestionCatalog {
    entries: BTreeMap<String, Vec<Question>>,
}

impl QuestionCatalog {
    pub fn new(entries: BTreeMap<String, Vec<Question>>) -> Result<Self, CatalogError> {
        validate_entries(&entries)?;
        Ok(Self { entries })
    }

    /// Garment-care question sets shipped with the crate. Maintained
    /// alongside a test that runs them through full validation.
    pub fn builtin() -> Self {
        Self { entries: builtin::garment_care_entries() }
    }

    /// Replaces whole entries by key and revalidates the result.
    pub fn with_overrides(
        self,
        overrides: BTreeMap<String, Vec<Question>>,
    ) -> Result<Self, CatalogError> {
        let mut entries = self.entries;
        entries.extend(overrides);
        Self::new(entries)
    }

    /// Exact lookup, falling back to the `default` entry for any identifier
    /// without one. Intentional graceful degradation, not an error path.
    pub fn resolve(&self, service_id: &str) -> &[Question] {
        match self.entries.get(service_id) {
            Some(questions) => questions,
            None => self.entries.get(FALLBACK_ENTRY).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn has_entry(&self, service_id: &str) -> bool {
        self.entries.contains_key(service_id)
    }

    pub fn service_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn validate_entries(entries: &BTreeMap<String, Vec<Question>>) -> Result<(), CatalogError> {
    if !entries.contains_key(FALLBACK_ENTRY) {
        return Err(CatalogError::MissingFallbackEntry);
    }

    for (service, questions) in entries {
        if questions.is_empty() {
            return Err(CatalogError::EmptyEntry { service: service.clone() });
        }

        let mut seen_ids = BTreeSet::new();
        for question in questions {
            if !seen_ids.insert(question.id.0.as_str()) {
                return Err(CatalogError::DuplicateQuestionId {
                    service: service.clone(),
                    id: question.id.0.clone(),
                });
            }

            if question.kind.has_options() && question.options.is_empty() {
                return Err(CatalogError::MissingOptions {
                    service: service.clone(),
                    id: question.id.0.clone(),
                });
            }
            if !question.kind.has_options() && !question.options.is_empty() {
                return Err(CatalogError::UnexpectedOptions {
                    service: service.clone(),
                    id: question.id.0.clone(),
                });
            }

            let mut seen_values = BTreeSet::new();
            for option in &question.options {
                if !seen_values.insert(option.value.as_str()) {
                    return Err(CatalogError::DuplicateOptionValue {
                        service: service.clone(),
                        id: question.id.0.clone(),
                        value: option.value.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}
