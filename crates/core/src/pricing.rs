use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Question, QuestionId};
use crate::domain::service::PriceRange;

/// How answered-option impacts combine into the price multiplier. The hosted
/// widgets shipped both rules for different site profiles, so the rule is a
/// per-site setting rather than engine behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Composition {
    /// multiplier = 1 + sum of impacts
    #[default]
    Additive,
    /// multiplier = product of (1 + impact)
    Multiplicative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateSettings {
    pub composition: Composition,
    /// Lower clamp on the cumulative multiplier. Keeps inconsistently
    /// authored negative impacts from pushing a band below zero.
    pub multiplier_floor: Decimal,
}

impl Default for EstimateSettings {
    fn default() -> Self {
        Self { composition: Composition::Additive, multiplier_floor: Decimal::new(1, 1) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactStep {
    pub question: QuestionId,
    pub option_value: String,
    pub impact: Decimal,
}

/// Derived price band plus the impact steps that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub min: Decimal,
    pub max: Decimal,
    pub multiplier: Decimal,
    pub trace: Vec<ImpactStep>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("estimated range is inverted after applying impacts: {min} > {max}")]
    InvertedRange { min: Decimal, max: Decimal },
}

/// Pure function of the catalog entry, recorded answers, and base band.
/// Answers for stale or free-text values contribute nothing; the whole
/// computation is safe to rerun on every state change.
pub fn compute_estimate(
    questions: &[Question],
    answers: &BTreeMap<QuestionId, String>,
    base: &PriceRange,
    settings: &EstimateSettings,
) -> Result<Estimate, PricingError> {
    let mut trace = Vec::new();
    for question in questions {
        if !question.kind.has_options() {
            continue;
        }
        let Some(answer) = answers.get(&question.id) else { continue };
        let Some(option) = question.option(answer) else { continue };
        if let Some(impact) = option.pricing_impact {
            trace.push(ImpactStep {
                question: question.id.clone(),
                option_value: option.value.clone(),
                impact,
            });
        }
    }

    let multiplier = match settings.composition {
        Composition::Additive => {
            Decimal::ONE + trace.iter().map(|step| step.impact).sum::<Decimal>()
        }
        Composition::Multiplicative => trace
            .iter()
            .fold(Decimal::ONE, |multiplier, step| multiplier * (Decimal::ONE + step.impact)),
    };

    apply_multiplier(base, multiplier.max(settings.multiplier_floor), trace)
}

/// Slider-driven variant: a 0-100 size score maps onto 0.5x..2.0x and scales
/// with the item count. Same floor and rounding as the catalog path.
pub fn quick_estimate(
    base: &PriceRange,
    size: u8,
    quantity: u32,
    settings: &EstimateSettings,
) -> Result<Estimate, PricingError> {
    let size = Decimal::from(size.min(100));
    let size_multiplier = Decimal::new(5, 1) + size / Decimal::ONE_HUNDRED * Decimal::new(15, 1);
    let multiplier = size_multiplier * Decimal::from(quantity.max(1));

    apply_multiplier(base, multiplier.max(settings.multiplier_floor), Vec::new())
}

fn apply_multiplier(
    base: &PriceRange,
    multiplier: Decimal,
    trace: Vec<ImpactStep>,
) -> Result<Estimate, PricingError> {
    let min = round_currency(base.min * multiplier);
    let max = round_currency(base.max * multiplier);
    if min > max {
        return Err(PricingError::InvertedRange { min, max });
    }
    Ok(Estimate { min, max, multiplier, trace })
}

// Whole currency units, half rounds up, matching the display format.
fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
