//! Two-proportion significance test with an unpooled (Welch-style) standard error.

/// Lower bound reported when the data carries no evidence either way.
pub const CONFIDENCE_FLOOR: f64 = 50.0;
/// Upper bound; a simulated test never claims certainty.
pub const CONFIDENCE_CEILING: f64 = 99.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Significance {
    /// Positive when B converts better than A.
    pub z_score: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    pub confidence_percent: f64,
}

impl Significance {
    fn no_evidence() -> Self {
        Self {
            z_score: 0.0,
            p_value: 1.0,
            confidence_percent: CONFIDENCE_FLOOR,
        }
    }
}

/// Standard normal CDF (Abramowitz & Stegun 26.2.17, |error| < 7.5e-8).
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return 0.5;
    }
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.2316419 * z);
    let d = 0.3989422804014327;
    let tail = d
        * (-z * z / 2.0).exp()
        * (t * (0.319381530
            + t * (-0.356563782 + t * (1.781477937 + t * (-1.821255978 + t * 1.330274429)))));
    if x >= 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Compare B against A. Empty arms or a zero standard error yield the floor.
pub fn two_proportion_test(conversions_a: u64, visitors_a: u64, conversions_b: u64, visitors_b: u64) -> Significance {
    if visitors_a == 0 || visitors_b == 0 {
        return Significance::no_evidence();
    }
    let n_a = visitors_a as f64;
    let n_b = visitors_b as f64;
    let p_a = conversions_a as f64 / n_a;
    let p_b = conversions_b as f64 / n_b;

    let se = (p_a * (1.0 - p_a) / n_a + p_b * (1.0 - p_b) / n_b).sqrt();
    if se <= 0.0 || !se.is_finite() {
        return Significance::no_evidence();
    }

    let z = (p_b - p_a) / se;
    let p_value = (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0);
    let confidence = ((1.0 - p_value) * 100.0).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING);

    Significance {
        z_score: z,
        p_value,
        confidence_percent: confidence,
    }
}

/// Relative change of `candidate` over `baseline` in percent; 0 when the baseline is 0.
pub fn lift_percent(baseline: f64, candidate: f64) -> f64 {
    if baseline > 0.0 && baseline.is_finite() && candidate.is_finite() {
        (candidate - baseline) / baseline * 100.0
    } else {
        0.0
    }
}
