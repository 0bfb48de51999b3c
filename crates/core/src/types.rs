use serde::{Deserialize, Serialize};

/// Categorical driver of persuasion carried by a variant's message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppealType {
    Price,
    Convenience,
    Urgency,
    Speed,
}

impl AppealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppealType::Price => "price",
            AppealType::Convenience => "convenience",
            AppealType::Urgency => "urgency",
            AppealType::Speed => "speed",
        }
    }
}

impl std::fmt::Display for AppealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One arm of a test: a message/design with a single appeal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    pub name: String,
    pub appeal_type: AppealType,
    /// Display copy shown to visitors.
    #[serde(default)]
    pub headline: String,
}

/// Sensitivity of a segment to each appeal type, each in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct SensitivityWeights {
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub convenience: f64,
    #[serde(default)]
    pub urgency: f64,
    #[serde(default)]
    pub speed: f64,
}

impl SensitivityWeights {
    /// Weight for the given appeal, clamped into [0, 1].
    pub fn weight(&self, appeal: AppealType) -> f64 {
        let raw = match appeal {
            AppealType::Price => self.price,
            AppealType::Convenience => self.convenience,
            AppealType::Urgency => self.urgency,
            AppealType::Speed => self.speed,
        };
        if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, 1.0)
        }
    }
}

/// Customer cohort with weighted sensitivities and a fixed average order value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub id: String,
    pub name: String,
    pub weights: SensitivityWeights,
    pub average_order_value: f64,
}

/// A predefined test pitting two variants against each other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub variant_a: Variant,
    pub variant_b: Variant,
}

/// How the engine obtains randomness for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngMode {
    Seeded(u32),
    Entropy,
}

/// Fully resolved input to one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationInput {
    pub variant_a: Variant,
    pub variant_b: Variant,
    pub segment: Segment,
    /// Share of traffic routed to variant A, in percent.
    pub traffic_split_percent: f64,
    pub total_visitors: u64,
    #[serde(default)]
    pub seeded: bool,
    #[serde(default)]
    pub seed: Option<u32>,
}

/// Seed used when a run asks to be seeded without naming a seed.
pub const DEFAULT_SEED: u32 = 42;

impl SimulationInput {
    pub fn rng_mode(&self) -> RngMode {
        if self.seeded {
            RngMode::Seeded(self.seed.unwrap_or(DEFAULT_SEED))
        } else {
            RngMode::Entropy
        }
    }
}

/// Which arm came out ahead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    A,
    B,
    Tie,
}

/// Strength of the recommendation, keyed on confidence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Strong,
    Weak,
    Inconclusive,
}

/// Simulated figures for one arm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArmResult {
    pub variant_name: String,
    pub visitors: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
    /// Modeled rate the conversions were sampled from.
    pub expected_rate: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationOutput {
    pub variant_a: ArmResult,
    pub variant_b: ArmResult,
    pub winner: Winner,
    pub improvement_percent: f64,
    pub confidence_percent: f64,
    pub z_score: f64,
    pub p_value: f64,
    pub revenue_lift_percent: f64,
    pub verdict: Verdict,
    pub recommendation_text: String,
    /// Seed the run used, absent for entropy-driven runs.
    pub seed: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(name: &str, appeal: AppealType) -> Variant {
        Variant {
            name: name.to_string(),
            appeal_type: appeal,
            headline: String::new(),
        }
    }

    fn input(seeded: bool, seed: Option<u32>) -> SimulationInput {
        SimulationInput {
            variant_a: variant("a", AppealType::Price),
            variant_b: variant("b", AppealType::Speed),
            segment: Segment {
                id: "s".to_string(),
                name: "S".to_string(),
                weights: SensitivityWeights::default(),
                average_order_value: 10.0,
            },
            traffic_split_percent: 50.0,
            total_visitors: 100,
            seeded,
            seed,
        }
    }

    #[test]
    fn test_weight_clamps_out_of_range_values() {
        let weights = SensitivityWeights {
            price: 1.7,
            convenience: -0.2,
            urgency: f64::NAN,
            speed: 0.4,
        };
        assert_eq!(weights.weight(AppealType::Price), 1.0);
        assert_eq!(weights.weight(AppealType::Convenience), 0.0);
        assert_eq!(weights.weight(AppealType::Urgency), 0.0);
        assert_eq!(weights.weight(AppealType::Speed), 0.4);
    }

    #[test]
    fn test_rng_mode() {
        assert_eq!(input(false, Some(7)).rng_mode(), RngMode::Entropy);
        assert_eq!(input(true, Some(7)).rng_mode(), RngMode::Seeded(7));
        assert_eq!(input(true, None).rng_mode(), RngMode::Seeded(DEFAULT_SEED));
    }

    #[test]
    fn test_appeal_type_serde_is_lowercase() {
        let json = serde_json::to_string(&AppealType::Convenience).unwrap();
        assert_eq!(json, "\"convenience\"");
        let back: AppealType = serde_json::from_str("\"urgency\"").unwrap();
        assert_eq!(back, AppealType::Urgency);
    }

    #[test]
    fn test_winner_serde() {
        assert_eq!(serde_json::to_string(&Winner::Tie).unwrap(), "\"tie\"");
        assert_eq!(serde_json::to_string(&Verdict::Strong).unwrap(), "\"strong\"");
    }
}
