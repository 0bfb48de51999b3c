//! Traffic split and conversion sampling.

use crate::rng::{standard_normal, RandomSource};

/// Split visitors between the arms: A gets the floor of its share, B the rest.
pub fn split_visitors(total_visitors: u64, traffic_split_percent: f64) -> (u64, u64) {
    let pct = if traffic_split_percent.is_nan() {
        50.0
    } else {
        traffic_split_percent.clamp(0.0, 100.0)
    };
    let a = ((total_visitors as f64 * pct / 100.0).floor() as u64).min(total_visitors);
    (a, total_visitors - a)
}

/// Draw a conversion count from Binomial(n, p) using the normal approximation,
/// rounded and clamped to [0, n].
pub fn sample_conversions<R: RandomSource + ?Sized>(rng: &mut R, visitors: u64, rate: f64) -> u64 {
    if visitors == 0 {
        return 0;
    }
    let p = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
    let n = visitors as f64;
    let mean = n * p;
    let std_dev = (n * p * (1.0 - p)).sqrt();
    let z = standard_normal(rng);
    let draw = (mean + std_dev * z).round();
    if draw <= 0.0 {
        0
    } else if draw >= n {
        visitors
    } else {
        draw as u64
    }
}
