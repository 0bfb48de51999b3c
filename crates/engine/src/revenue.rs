//! Revenue per arm and revenue lift.

use abtest_core::types::Segment;

use crate::significance::lift_percent;

/// Revenue for an arm: conversions times the segment's average order value.
pub fn arm_revenue(conversions: u64, segment: &Segment) -> f64 {
    conversions as f64 * segment.average_order_value
}

pub fn revenue_per_visitor(revenue: f64, visitors: u64) -> f64 {
    if visitors == 0 {
        0.0
    } else {
        revenue / visitors as f64
    }
}

/// Lift of B over A in revenue per visitor, so uneven splits compare fairly.
pub fn revenue_lift_percent(revenue_a: f64, visitors_a: u64, revenue_b: f64, visitors_b: u64) -> f64 {
    lift_percent(
        revenue_per_visitor(revenue_a, visitors_a),
        revenue_per_visitor(revenue_b, visitors_b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use abtest_core::types::SensitivityWeights;

    fn segment(aov: f64) -> Segment {
        Segment {
            id: "s".to_string(),
            name: "S".to_string(),
            weights: SensitivityWeights::default(),
            average_order_value: aov,
        }
    }

    #[test]
    fn test_revenue_is_conversions_times_aov() {
        assert_eq!(arm_revenue(12, &segment(50.0)), 600.0);
        assert_eq!(arm_revenue(0, &segment(50.0)), 0.0);
    }

    #[test]
    fn test_lift_uses_per_visitor_revenue() {
        // A: 100 per 1000 visitors, B: 100 per 500 visitors
        let lift = revenue_lift_percent(100.0, 1000, 100.0, 500);
        assert!((lift - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_lift_zero_baseline() {
        assert_eq!(revenue_lift_percent(0.0, 1000, 250.0, 1000), 0.0);
        assert_eq!(revenue_lift_percent(50.0, 0, 250.0, 1000), 0.0);
    }
}
