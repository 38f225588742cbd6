use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn is_well_formed(&self) -> bool {
        self.min >= Decimal::ZERO && self.min <= self.max
    }
}

/// Pricing models a site author can attach to a service. `Starting` and
/// `Quote` yield the band the estimator works from; a fixed-price service
/// has nothing to estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServicePricing {
    Fixed { amount: Decimal },
    Starting { amount: Decimal },
    Quote,
}

impl ServicePricing {
    pub fn base_range(&self) -> Option<PriceRange> {
        match self {
            Self::Fixed { .. } => None,
            Self::Starting { amount } => Some(PriceRange::new(*amount, *amount * Decimal::from(3))),
            Self::Quote => Some(PriceRange::new(Decimal::from(50), Decimal::from(300))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<ServicePricing>,
}

impl Service {
    pub fn base_range(&self) -> Option<PriceRange> {
        self.pricing.as_ref().and_then(ServicePricing::base_range)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{PriceRange, Service, ServiceId, ServicePricing};

    #[test]
    fn starting_price_spans_one_to_three_times_the_floor() {
        let range = ServicePricing::Starting { amount: Decimal::from(25) }
            .base_range()
            .expect("starting prices produce a band");

        assert_eq!(range, PriceRange::new(Decimal::from(25), Decimal::from(75)));
    }

    #[test]
    fn quote_pricing_uses_the_stock_band() {
        let range = ServicePricing::Quote.base_range().expect("quote produces a band");
        assert_eq!(range, PriceRange::new(Decimal::from(50), Decimal::from(300)));
    }

    #[test]
    fn fixed_pricing_and_unpriced_services_yield_no_band() {
        assert_eq!(ServicePricing::Fixed { amount: Decimal::from(12) }.base_range(), None);

        let service = Service {
            id: ServiceId("pressing".to_owned()),
            name: "Pressing".to_owned(),
            slug: "pressing".to_owned(),
            description: "Crisp results while you wait".to_owned(),
            featured: false,
            pricing: None,
        };
        assert_eq!(service.base_range(), None);
    }

    #[test]
    fn inverted_and_negative_ranges_are_flagged() {
        assert!(!PriceRange::new(Decimal::from(10), Decimal::from(5)).is_well_formed());
        assert!(!PriceRange::new(Decimal::from(-1), Decimal::from(5)).is_well_formed());
        assert!(PriceRange::new(Decimal::ZERO, Decimal::ZERO).is_well_formed());
    }
}
