//! Conversion-rate model: a base rate lifted by how strongly the segment
//! responds to the variant's appeal.

use abtest_core::config::ModelConfig;
use abtest_core::types::{Segment, Variant};

#[derive(Debug, Clone)]
pub struct ConversionModel {
    config: ModelConfig,
}

impl ConversionModel {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn base_rate(&self) -> f64 {
        self.config.base_conversion_rate
    }

    /// Additive bonus for a variant's appeal within a segment.
    pub fn appeal_bonus(&self, variant: &Variant, segment: &Segment) -> f64 {
        let weight = segment.weights.weight(variant.appeal_type);
        weight * self.config.coefficient(variant.appeal_type)
    }

    /// Expected conversion probability, clamped into [0, 1].
    pub fn conversion_rate(&self, variant: &Variant, segment: &Segment) -> f64 {
        let rate = self.base_rate() + self.appeal_bonus(variant, segment);
        if rate.is_nan() {
            return 0.0;
        }
        rate.clamp(0.0, 1.0)
    }
}

impl Default for ConversionModel {
    fn default() -> Self {
        Self::new(&ModelConfig::default())
    }
}
