//! Spread "mixed" time proportionally over the real categories.

use super::intervals::CategoryDurations;
use chrono::TimeDelta;

/// Names of the two reserved categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixPolicy {
    /// Uncategorized bucket that gets redistributed.
    pub mixed: String,
    /// Where a month made only of mixed time ends up.
    pub structural: String,
}

impl MixPolicy {
    pub fn new(mixed: &str, structural: &str) -> Self {
        Self {
            mixed: mixed.trim().to_string(),
            structural: structural.trim().to_string(),
        }
    }
}

impl Default for MixPolicy {
    fn default() -> Self {
        Self::new("Popurri", "Estructural: altres")
    }
}

/// Redistribute the mixed bucket of one month.
///
/// - no mixed time: returned unchanged
/// - only mixed time: collapsed into the structural category
/// - otherwise every other category is scaled by `total / (total - mix)`
///   and the mixed entry disappears
pub fn redistribute(categories: CategoryDurations, policy: &MixPolicy) -> CategoryDurations {
    let total = total_time(&categories);
    let mix = categories
        .get(&policy.mixed)
        .copied()
        .unwrap_or_else(TimeDelta::zero);

    if mix.is_zero() {
        return categories;
    }

    if mix == total {
        let mut collapsed = CategoryDurations::new();
        collapsed.insert(policy.structural.clone(), total);
        return collapsed;
    }

    let remaining = total - mix;

    categories
        .into_iter()
        .filter(|(name, _)| *name != policy.mixed)
        .map(|(name, span)| (name, scale(span, total, remaining)))
        .collect()
}

/// `span * num / den`, computed on microseconds and rounded to nearest.
fn scale(span: TimeDelta, num: TimeDelta, den: TimeDelta) -> TimeDelta {
    let (s, n, d) = (micros(span), micros(num), micros(den));
    if d == 0 {
        return span;
    }
    let product = s * n;
    let (q, r) = (product / d, product % d);
    let rounded = if 2 * r.abs() >= d.abs() {
        q + product.signum() * d.signum()
    } else {
        q
    };
    TimeDelta::microseconds(rounded as i64)
}

fn micros(span: TimeDelta) -> i128 {
    span.num_seconds() as i128 * 1_000_000 + (span.subsec_nanos() / 1_000) as i128
}

/// Total worked time in a category map.
pub fn total_time(categories: &CategoryDurations) -> TimeDelta {
    categories
        .values()
        .fold(TimeDelta::zero(), |acc, span| acc + *span)
}
