//! Built-in catalog of test definitions and customer segments, plus the
//! caller-side guards that turn a form-style request into a simulation input.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::types::{AppealType, Segment, SensitivityWeights, SimulationInput, TestDefinition, Variant};

/// Static registry of the tests and segments a caller can pick from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub tests: Vec<TestDefinition>,
    pub segments: Vec<Segment>,
}

impl Catalog {
    pub fn new(tests: Vec<TestDefinition>, segments: Vec<Segment>) -> Self {
        Self { tests, segments }
    }

    /// The catalog shipped with the simulator.
    pub fn builtin() -> Self {
        Self::new(builtin_tests(), builtin_segments())
    }

    pub fn test(&self, id: &str) -> Option<&TestDefinition> {
        self.tests.iter().find(|t| t.id == id)
    }

    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Caller-supplied selection, as a form or API body would carry it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(default)]
    pub test_id: Option<String>,
    #[serde(default)]
    pub segment_id: Option<String>,
    #[serde(default)]
    pub traffic_split_percent: Option<f64>,
    #[serde(default)]
    pub total_visitors: Option<i64>,
    #[serde(default)]
    pub seeded: bool,
    #[serde(default)]
    pub seed: Option<u32>,
}

impl SimulationRequest {
    /// Validate the selection and resolve it against the catalog.
    pub fn resolve(&self, catalog: &Catalog, config: &SimulationConfig) -> SimResult<SimulationInput> {
        let test_id = non_empty(self.test_id.as_deref()).ok_or(SimError::MissingSelection("test"))?;
        let segment_id =
            non_empty(self.segment_id.as_deref()).ok_or(SimError::MissingSelection("segment"))?;

        let test = catalog
            .test(test_id)
            .ok_or_else(|| SimError::UnknownTest(test_id.to_string()))?;
        let segment = catalog
            .segment(segment_id)
            .ok_or_else(|| SimError::UnknownSegment(segment_id.to_string()))?;

        let total_visitors = match self.total_visitors {
            None => config.default_visitors,
            Some(n) if n < 1 => {
                return Err(SimError::InvalidVisitorCount(format!(
                    "{n} (must be at least 1)"
                )))
            }
            Some(n) if n as u64 > config.max_visitors => {
                return Err(SimError::InvalidVisitorCount(format!(
                    "{n} (must not exceed {})",
                    config.max_visitors
                )))
            }
            Some(n) => n as u64,
        };

        let split = self
            .traffic_split_percent
            .unwrap_or(config.default_traffic_split_percent);
        if !split.is_finite() || !(0.0..=100.0).contains(&split) {
            return Err(SimError::InvalidTrafficSplit(format!(
                "{split} (must be between 0 and 100)"
            )));
        }

        debug!(
            test_id,
            segment_id,
            total_visitors,
            traffic_split_percent = split,
            "Simulation request resolved"
        );

        Ok(SimulationInput {
            variant_a: test.variant_a.clone(),
            variant_b: test.variant_b.clone(),
            segment: segment.clone(),
            traffic_split_percent: split,
            total_visitors,
            seeded: self.seeded || self.seed.is_some(),
            seed: self.seed,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn variant(name: &str, appeal_type: AppealType, headline: &str) -> Variant {
    Variant {
        name: name.to_string(),
        appeal_type,
        headline: headline.to_string(),
    }
}

fn test_definition(id: &str, name: &str, description: &str, a: Variant, b: Variant) -> TestDefinition {
    TestDefinition {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        variant_a: a,
        variant_b: b,
    }
}

fn builtin_tests() -> Vec<TestDefinition> {
    vec![
        test_definition(
            "checkout_cta",
            "Checkout button copy",
            "Discount framing against friction-free framing on the checkout call to action.",
            variant("Discount CTA", AppealType::Price, "Save 15% at checkout"),
            variant("One-click CTA", AppealType::Convenience, "Check out in one click"),
        ),
        test_definition(
            "shipping_banner",
            "Shipping banner",
            "Delivery-speed promise against a countdown on the site-wide banner.",
            variant("Fast delivery", AppealType::Speed, "Delivered in 2 days, free"),
            variant("Order deadline", AppealType::Urgency, "Order within the hour for same-day dispatch"),
        ),
        test_definition(
            "product_badge",
            "Product page badge",
            "Price guarantee badge against a low-stock badge next to the add-to-cart button.",
            variant("Price guarantee", AppealType::Price, "Lowest price, guaranteed"),
            variant("Low stock", AppealType::Urgency, "Only 3 left in stock"),
        ),
        test_definition(
            "signup_modal",
            "Account signup modal",
            "Fast signup against saved-cart convenience in the account creation prompt.",
            variant("Quick signup", AppealType::Speed, "Sign up in 10 seconds"),
            variant("Saved cart", AppealType::Convenience, "Keep your cart on every device"),
        ),
    ]
}

fn segment(id: &str, name: &str, weights: SensitivityWeights, average_order_value: f64) -> Segment {
    Segment {
        id: id.to_string(),
        name: name.to_string(),
        weights,
        average_order_value,
    }
}

fn builtin_segments() -> Vec<Segment> {
    vec![
        segment(
            "bargain_hunters",
            "Bargain hunters",
            SensitivityWeights {
                price: 0.9,
                convenience: 0.3,
                urgency: 0.6,
                speed: 0.2,
            },
            42.0,
        ),
        segment(
            "busy_professionals",
            "Busy professionals",
            SensitivityWeights {
                price: 0.2,
                convenience: 0.9,
                urgency: 0.3,
                speed: 0.8,
            },
            118.0,
        ),
        segment(
            "impulse_shoppers",
            "Impulse shoppers",
            SensitivityWeights {
                price: 0.5,
                convenience: 0.4,
                urgency: 0.9,
                speed: 0.6,
            },
            65.0,
        ),
        segment(
            "loyal_regulars",
            "Loyal regulars",
            SensitivityWeights {
                price: 0.4,
                convenience: 0.6,
                urgency: 0.2,
                speed: 0.4,
            },
            88.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(test: &str, segment: &str) -> SimulationRequest {
        SimulationRequest {
            test_id: Some(test.to_string()),
            segment_id: Some(segment.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_builtin_catalog_lookup() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.tests.len(), 4);
        assert_eq!(catalog.segments.len(), 4);
        let test = catalog.test("checkout_cta").expect("test exists");
        assert_eq!(test.variant_a.appeal_type, AppealType::Price);
        assert!(catalog.segment("nobody").is_none());
        for segment in &catalog.segments {
            assert!(segment.average_order_value > 0.0);
        }
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let catalog = Catalog::builtin();
        let config = SimulationConfig::default();
        let input = request("shipping_banner", "impulse_shoppers")
            .resolve(&catalog, &config)
            .unwrap();
        assert_eq!(input.total_visitors, 10_000);
        assert_eq!(input.traffic_split_percent, 50.0);
        assert_eq!(input.segment.id, "impulse_shoppers");
        assert_eq!(input.variant_b.appeal_type, AppealType::Urgency);
        assert!(!input.seeded);
    }

    #[test]
    fn test_resolve_missing_selection() {
        let catalog = Catalog::builtin();
        let config = SimulationConfig::default();

        let err = request("", "bargain_hunters").resolve(&catalog, &config).unwrap_err();
        assert!(matches!(err, SimError::MissingSelection("test")));

        let mut req = request("checkout_cta", "x");
        req.segment_id = None;
        let err = req.resolve(&catalog, &config).unwrap_err();
        assert!(matches!(err, SimError::MissingSelection("segment")));
        assert_eq!(err.code(), "missing_selection");
    }

    #[test]
    fn test_resolve_unknown_ids() {
        let catalog = Catalog::builtin();
        let config = SimulationConfig::default();
        let err = request("nope", "bargain_hunters").resolve(&catalog, &config).unwrap_err();
        assert_eq!(err.code(), "unknown_test");
        let err = request("checkout_cta", "nope").resolve(&catalog, &config).unwrap_err();
        assert_eq!(err.code(), "unknown_segment");
    }

    #[test]
    fn test_resolve_invalid_visitor_count() {
        let catalog = Catalog::builtin();
        let config = SimulationConfig::default();
        for bad in [0, -5, 10_000_001] {
            let mut req = request("checkout_cta", "bargain_hunters");
            req.total_visitors = Some(bad);
            let err = req.resolve(&catalog, &config).unwrap_err();
            assert!(matches!(err, SimError::InvalidVisitorCount(_)), "{bad}");
        }
    }

    #[test]
    fn test_resolve_invalid_split() {
        let catalog = Catalog::builtin();
        let config = SimulationConfig::default();
        for bad in [-1.0, 100.5, f64::NAN] {
            let mut req = request("checkout_cta", "bargain_hunters");
            req.traffic_split_percent = Some(bad);
            let err = req.resolve(&catalog, &config).unwrap_err();
            assert_eq!(err.code(), "invalid_traffic_split");
        }
    }

    #[test]
    fn test_resolve_seed_implies_seeded() {
        let catalog = Catalog::builtin();
        let config = SimulationConfig::default();
        let mut req = request("checkout_cta", "bargain_hunters");
        req.seed = Some(99);
        let input = req.resolve(&catalog, &config).unwrap();
        assert!(input.seeded);
        assert_eq!(input.seed, Some(99));
    }
}
