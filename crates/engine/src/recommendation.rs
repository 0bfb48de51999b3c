//! Recommendation text, rendered from `{{variable}}` templates keyed on the
//! verdict and on how strongly the segment responds to the winning appeal.

use abtest_core::types::{AppealType, Segment, Variant, Verdict, Winner};

use crate::significance::lift_percent;

pub const STRONG_CONFIDENCE: f64 = 95.0;
pub const WEAK_CONFIDENCE: f64 = 90.0;

const STRONG_TEMPLATE: &str = "Roll out {{winner}}. It converts {{lift}}% better than {{loser}} \
among {{segment}} at {{confidence}}% confidence.";
const WEAK_TEMPLATE: &str = "Lean towards {{winner}}, but keep the test running. It leads {{loser}} \
by {{lift}}% among {{segment}} at {{confidence}}% confidence, short of the 95% bar.";
const INCONCLUSIVE_TEMPLATE: &str = "No clear winner. The gap between {{a}} and {{b}} among \
{{segment}} is not significant ({{confidence}}% confidence). Add traffic or test a bolder change.";
const REVENUE_TEMPLATE: &str = "Revenue per visitor for {{b}} versus {{a}}: {{revenue_lift}}%.";

const HIGH_FIT_TEMPLATE: &str = "{{segment}} are highly sensitive to {{appeal}} messaging, so the \
result fits the segment profile.";
const MODERATE_FIT_TEMPLATE: &str = "{{segment}} respond moderately to {{appeal}} messaging; confirm \
with a second segment before a full rollout.";
const LOW_FIT_TEMPLATE: &str = "{{segment}} rarely respond to {{appeal}} messaging, so treat this \
lift with caution.";

const PREFERENCE_TEMPLATE: &str = "{{segment}} weight {{stronger}} appeals over {{weaker}} appeals; \
a larger sample may surface that preference.";
const NO_PREFERENCE_TEMPLATE: &str = "{{segment}} weight {{a_appeal}} and {{b_appeal}} appeals \
about equally, so a different lever may matter more.";

/// Weight at or above which a segment counts as highly sensitive.
const HIGH_FIT: f64 = 0.7;
const MODERATE_FIT: f64 = 0.4;
/// Weight gap that counts as a segment preference between the two appeals.
const PREFERENCE_GAP: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct RecommendationContext<'a> {
    pub variant_a: &'a Variant,
    pub variant_b: &'a Variant,
    pub segment: &'a Segment,
    pub winner: Winner,
    pub rate_a: f64,
    pub rate_b: f64,
    pub confidence_percent: f64,
    pub revenue_lift_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub verdict: Verdict,
    pub text: String,
}

/// Verdict from confidence alone. A tie is always inconclusive.
pub fn verdict_for(confidence_percent: f64, winner: Winner) -> Verdict {
    if winner == Winner::Tie {
        Verdict::Inconclusive
    } else if confidence_percent >= STRONG_CONFIDENCE {
        Verdict::Strong
    } else if confidence_percent >= WEAK_CONFIDENCE {
        Verdict::Weak
    } else {
        Verdict::Inconclusive
    }
}

pub fn recommend(ctx: &RecommendationContext<'_>) -> Recommendation {
    let verdict = verdict_for(ctx.confidence_percent, ctx.winner);
    let segment = ctx.segment.name.as_str();
    let confidence = format!("{:.1}", ctx.confidence_percent);

    let mut parts = Vec::with_capacity(4);
    match verdict {
        Verdict::Strong | Verdict::Weak => {
            let (winner, loser, winner_rate, loser_rate) = match ctx.winner {
                Winner::A => (ctx.variant_a, ctx.variant_b, ctx.rate_a, ctx.rate_b),
                _ => (ctx.variant_b, ctx.variant_a, ctx.rate_b, ctx.rate_a),
            };
            let template = if verdict == Verdict::Strong {
                STRONG_TEMPLATE
            } else {
                WEAK_TEMPLATE
            };
            parts.push(render(
                template,
                &[
                    ("winner", winner.name.clone()),
                    ("loser", loser.name.clone()),
                    ("lift", format!("{:.1}", lift_percent(loser_rate, winner_rate))),
                    ("segment", segment.to_string()),
                    ("confidence", confidence),
                ],
            ));
            parts.push(render(
                REVENUE_TEMPLATE,
                &[
                    ("a", ctx.variant_a.name.clone()),
                    ("b", ctx.variant_b.name.clone()),
                    ("revenue_lift", format!("{:+.1}", ctx.revenue_lift_percent)),
                ],
            ));
            parts.push(segment_fit(ctx.segment, winner.appeal_type));
            if verdict == Verdict::Strong {
                parts.push(next_step(winner.appeal_type).to_string());
            }
        }
        Verdict::Inconclusive => {
            parts.push(render(
                INCONCLUSIVE_TEMPLATE,
                &[
                    ("a", ctx.variant_a.name.clone()),
                    ("b", ctx.variant_b.name.clone()),
                    ("segment", segment.to_string()),
                    ("confidence", confidence),
                ],
            ));
            parts.push(segment_preference(
                ctx.segment,
                ctx.variant_a.appeal_type,
                ctx.variant_b.appeal_type,
            ));
        }
    }

    Recommendation {
        verdict,
        text: parts.join(" "),
    }
}

fn segment_fit(segment: &Segment, appeal: AppealType) -> String {
    let weight = segment.weights.weight(appeal);
    let template = if weight >= HIGH_FIT {
        HIGH_FIT_TEMPLATE
    } else if weight >= MODERATE_FIT {
        MODERATE_FIT_TEMPLATE
    } else {
        LOW_FIT_TEMPLATE
    };
    render(
        template,
        &[
            ("segment", segment.name.clone()),
            ("appeal", appeal.to_string()),
        ],
    )
}

fn segment_preference(segment: &Segment, a: AppealType, b: AppealType) -> String {
    let weight_a = segment.weights.weight(a);
    let weight_b = segment.weights.weight(b);
    if a != b && (weight_a - weight_b).abs() >= PREFERENCE_GAP {
        let (stronger, weaker) = if weight_a > weight_b { (a, b) } else { (b, a) };
        render(
            PREFERENCE_TEMPLATE,
            &[
                ("segment", segment.name.clone()),
                ("stronger", stronger.to_string()),
                ("weaker", weaker.to_string()),
            ],
        )
    } else {
        render(
            NO_PREFERENCE_TEMPLATE,
            &[
                ("segment", segment.name.clone()),
                ("a_appeal", a.to_string()),
                ("b_appeal", b.to_string()),
            ],
        )
    }
}

fn next_step(appeal: AppealType) -> &'static str {
    match appeal {
        AppealType::Price => "Check the margin impact before making the discount permanent.",
        AppealType::Convenience => "Carry the same friction reduction into the neighbouring funnel steps.",
        AppealType::Urgency => "Keep urgency claims truthful so they do not erode trust on repeat visits.",
        AppealType::Speed => "Confirm fulfilment can keep the speed promise at full traffic.",
    }
}

fn render(template: &str, variables: &[(&str, String)]) -> String {
    let mut result = template.to_string();
    for (name, value) in variables {
        let placeholder = format!("{{{{{}}}}}", name);
        result = result.replace(&placeholder, value);
    }
    result
}
