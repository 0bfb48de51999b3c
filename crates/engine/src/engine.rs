//! Simulation engine. Models, samples and scores one A/B test run.

use abtest_core::config::ModelConfig;
use abtest_core::types::{ArmResult, RngMode, SimulationInput, SimulationOutput, Variant, Winner};
use tracing::debug;

use crate::model::ConversionModel;
use crate::recommendation::{recommend, RecommendationContext};
use crate::revenue::{arm_revenue, revenue_lift_percent};
use crate::rng::{RandomSource, ThreadRandom, Xorshift32};
use crate::sampling::{sample_conversions, split_visitors};
use crate::significance::{lift_percent, two_proportion_test};

/// Stateless simulator; one instance can serve any number of runs.
#[derive(Debug, Clone, Default)]
pub struct SimulationEngine {
    model: ConversionModel,
}

impl SimulationEngine {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            model: ConversionModel::new(config),
        }
    }

    /// Run a simulation, drawing randomness as the input's RNG mode asks.
    pub fn simulate(&self, input: &SimulationInput) -> SimulationOutput {
        match input.rng_mode() {
            RngMode::Seeded(seed) => {
                let mut rng = Xorshift32::new(seed);
                let mut output = self.simulate_with(input, &mut rng);
                output.seed = Some(seed);
                output
            }
            RngMode::Entropy => {
                let mut rng = ThreadRandom::new();
                self.simulate_with(input, &mut rng)
            }
        }
    }

    /// Run a simulation against a caller-supplied random source.
    pub fn simulate_with<R: RandomSource + ?Sized>(
        &self,
        input: &SimulationInput,
        rng: &mut R,
    ) -> SimulationOutput {
        let segment = &input.segment;
        let expected_a = self.model.conversion_rate(&input.variant_a, segment);
        let expected_b = self.model.conversion_rate(&input.variant_b, segment);

        let (visitors_a, visitors_b) =
            split_visitors(input.total_visitors, input.traffic_split_percent);

        // A is always drawn before B from the same stream.
        let conversions_a = sample_conversions(rng, visitors_a, expected_a);
        let conversions_b = sample_conversions(rng, visitors_b, expected_b);

        let arm_a = self.arm(&input.variant_a, visitors_a, conversions_a, expected_a, input);
        let arm_b = self.arm(&input.variant_b, visitors_b, conversions_b, expected_b, input);

        let significance = two_proportion_test(conversions_a, visitors_a, conversions_b, visitors_b);
        let winner = pick_winner(arm_a.conversion_rate, arm_b.conversion_rate);
        let improvement = lift_percent(arm_a.conversion_rate, arm_b.conversion_rate);
        let revenue_lift = revenue_lift_percent(arm_a.revenue, visitors_a, arm_b.revenue, visitors_b);

        let recommendation = recommend(&RecommendationContext {
            variant_a: &input.variant_a,
            variant_b: &input.variant_b,
            segment,
            winner,
            rate_a: arm_a.conversion_rate,
            rate_b: arm_b.conversion_rate,
            confidence_percent: significance.confidence_percent,
            revenue_lift_percent: revenue_lift,
        });

        debug!(
            segment = %segment.id,
            visitors_a,
            conversions_a,
            visitors_b,
            conversions_b,
            z_score = significance.z_score,
            confidence = significance.confidence_percent,
            verdict = ?recommendation.verdict,
            "Simulation complete"
        );

        SimulationOutput {
            variant_a: arm_a,
            variant_b: arm_b,
            winner,
            improvement_percent: improvement,
            confidence_percent: significance.confidence_percent,
            z_score: significance.z_score,
            p_value: significance.p_value,
            revenue_lift_percent: revenue_lift,
            verdict: recommendation.verdict,
            recommendation_text: recommendation.text,
            seed: None,
        }
    }

    fn arm(
        &self,
        variant: &Variant,
        visitors: u64,
        conversions: u64,
        expected_rate: f64,
        input: &SimulationInput,
    ) -> ArmResult {
        let conversion_rate = if visitors > 0 {
            conversions as f64 / visitors as f64
        } else {
            0.0
        };
        ArmResult {
            variant_name: variant.name.clone(),
            visitors,
            conversions,
            conversion_rate,
            expected_rate,
            revenue: arm_revenue(conversions, &input.segment),
        }
    }
}

fn pick_winner(rate_a: f64, rate_b: f64) -> Winner {
    if rate_b > rate_a {
        Winner::B
    } else if rate_a > rate_b {
        Winner::A
    } else {
        Winner::Tie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abtest_core::types::{AppealType, Segment, SensitivityWeights, Verdict};

    fn input(visitors: u64, split: f64, seed: Option<u32>) -> SimulationInput {
        SimulationInput {
            variant_a: Variant {
                name: "Discount CTA".to_string(),
                appeal_type: AppealType::Price,
                headline: "Save 15% at checkout".to_string(),
            },
            variant_b: Variant {
                name: "One-click CTA".to_string(),
                appeal_type: AppealType::Convenience,
                headline: "Check out in one click".to_string(),
            },
            segment: Segment {
                id: "busy_professionals".to_string(),
                name: "Busy professionals".to_string(),
                weights: SensitivityWeights {
                    price: 0.2,
                    convenience: 0.9,
                    urgency: 0.3,
                    speed: 0.8,
                },
                average_order_value: 118.0,
            },
            traffic_split_percent: split,
            total_visitors: visitors,
            seeded: seed.is_some(),
            seed,
        }
    }

    /// Replays a fixed stream of uniforms, cycling.
    struct Replay {
        values: Vec<f64>,
        idx: usize,
    }

    impl RandomSource for Replay {
        fn next_f64(&mut self) -> f64 {
            let v = self.values[self.idx % self.values.len()];
            self.idx += 1;
            v
        }
    }

    #[test]
    fn test_seeded_run_is_reproducible() {
        let engine = SimulationEngine::default();
        let first = engine.simulate(&input(20_000, 50.0, Some(1234)));
        let second = engine.simulate(&input(20_000, 50.0, Some(1234)));
        assert_eq!(first, second);
        assert_eq!(first.seed, Some(1234));
    }

    #[test]
    fn test_different_seeds_differ() {
        let engine = SimulationEngine::default();
        let a = engine.simulate(&input(50_000, 50.0, Some(1)));
        let b = engine.simulate(&input(50_000, 50.0, Some(2)));
        assert_ne!(
            (a.variant_a.conversions, a.variant_b.conversions),
            (b.variant_a.conversions, b.variant_b.conversions)
        );
    }

    #[test]
    fn test_split_and_expected_rates() {
        let engine = SimulationEngine::default();
        let out = engine.simulate(&input(1001, 50.0, Some(5)));
        assert_eq!(out.variant_a.visitors, 500);
        assert_eq!(out.variant_b.visitors, 501);
        assert!((out.variant_a.expected_rate - 0.028).abs() < 1e-12);
        assert!((out.variant_b.expected_rate - 0.034).abs() < 1e-12);
    }

    #[test]
    fn test_zero_visitors() {
        let engine = SimulationEngine::default();
        let out = engine.simulate(&input(0, 50.0, Some(9)));
        assert_eq!(out.variant_a.conversion_rate, 0.0);
        assert_eq!(out.variant_b.conversion_rate, 0.0);
        assert_eq!(out.confidence_percent, 50.0);
        assert_eq!(out.improvement_percent, 0.0);
        assert_eq!(out.revenue_lift_percent, 0.0);
        assert_eq!(out.winner, Winner::Tie);
        assert_eq!(out.verdict, Verdict::Inconclusive);
    }

    #[test]
    fn test_all_traffic_to_one_arm() {
        let engine = SimulationEngine::default();
        let out = engine.simulate(&input(5000, 100.0, Some(9)));
        assert_eq!(out.variant_b.visitors, 0);
        assert_eq!(out.variant_b.conversion_rate, 0.0);
        assert_eq!(out.confidence_percent, 50.0);
    }

    #[test]
    fn test_injected_source_drives_sampling() {
        // u1 = e^-0.5 gives sqrt(-2 ln u1) = 1, u2 = 0 gives cos = 1: z = +1 for every arm
        let engine = SimulationEngine::default();
        let mut rng = Replay {
            values: vec![(-0.5f64).exp(), 0.0],
            idx: 0,
        };
        let out = engine.simulate_with(&input(20_000, 50.0, None), &mut rng);

        let mean_a = 10_000.0 * 0.028;
        let sd_a = (10_000.0 * 0.028 * 0.972f64).sqrt();
        assert_eq!(out.variant_a.conversions, (mean_a + sd_a).round() as u64);
        let mean_b = 10_000.0 * 0.034;
        let sd_b = (10_000.0 * 0.034 * 0.966f64).sqrt();
        assert_eq!(out.variant_b.conversions, (mean_b + sd_b).round() as u64);
        assert_eq!(out.seed, None);
    }

    #[test]
    fn test_revenue_and_improvement() {
        let engine = SimulationEngine::default();
        let out = engine.simulate(&input(40_000, 50.0, Some(77)));
        assert_eq!(out.variant_a.revenue, out.variant_a.conversions as f64 * 118.0);
        assert_eq!(out.variant_b.revenue, out.variant_b.conversions as f64 * 118.0);
        let expected = (out.variant_b.conversion_rate - out.variant_a.conversion_rate)
            / out.variant_a.conversion_rate
            * 100.0;
        assert!((out.improvement_percent - expected).abs() < 1e-9);
        assert!(!out.recommendation_text.is_empty());
    }

    #[test]
    fn test_unseeded_run_stays_in_bounds() {
        let engine = SimulationEngine::default();
        let out = engine.simulate(&input(10_000, 30.0, None));
        assert_eq!(out.seed, None);
        assert_eq!(out.variant_a.visitors, 3000);
        assert!(out.variant_a.conversions <= 3000);
        assert!(out.variant_b.conversions <= 7000);
        assert!((50.0..=99.9).contains(&out.confidence_percent));
    }

    #[test]
    fn test_pick_winner() {
        assert_eq!(pick_winner(0.02, 0.03), Winner::B);
        assert_eq!(pick_winner(0.03, 0.02), Winner::A);
        assert_eq!(pick_winner(0.0, 0.0), Winner::Tie);
    }
}
