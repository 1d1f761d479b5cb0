//! Greedy split of a bounty payout into knockout-value tiers.

/// Tier values as multiples of the buy-in, largest first.
pub const TIER_MULTIPLIERS: [f64; 6] = [10000.0, 1000.0, 100.0, 10.0, 2.0, 1.5];
pub const TIER_LABELS: [&str; 6] = ["x10000", "x1000", "x100", "x10", "x2", "x1.5"];

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BountyDecomposition {
    /// Knockout counts, aligned with [`TIER_MULTIPLIERS`].
    pub counts: [u32; 6],
    pub remainder: f64,
}

impl BountyDecomposition {
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| u64::from(*c)).sum()
    }

    #[cfg(test)]
    pub fn count(&self, label: &str) -> Option<u32> {
        TIER_LABELS
            .iter()
            .position(|l| *l == label)
            .map(|idx| self.counts[idx])
    }

    pub fn to_json(&self) -> String {
        let tiers: Vec<String> = TIER_LABELS
            .iter()
            .zip(self.counts)
            .map(|(label, count)| format!(r#""{}":{}"#, label, count))
            .collect();
        let remainder = serde_json::to_string(&self.remainder).unwrap_or_else(|_| "0".to_string());
        format!(r#"{{{},"remainder":{}}}"#, tiers.join(","), remainder)
    }
}

/// Decompose `bounty` into tier counts.
///
/// At most `players - 1` knockouts are physically possible, so the tier counts never
/// sum above that. A non-positive buy-in or a non-finite input yields all-zero counts.
pub fn decompose_bounty(bounty: f64, buy_in: f64, players: i64) -> BountyDecomposition {
    let mut result = BountyDecomposition::default();
    if !bounty.is_finite() || !buy_in.is_finite() {
        return result;
    }

    let mut remaining = bounty.max(0.0);
    if buy_in <= 0.0 {
        result.remainder = remaining;
        return result;
    }

    let max_kos = u64::try_from(players.saturating_sub(1)).unwrap_or(0);
    let mut allocated: u64 = 0;

    for (idx, multiplier) in TIER_MULTIPLIERS.iter().enumerate() {
        let value = multiplier * buy_in;
        let fits = ((remaining + EPSILON) / value).floor();
        let fits = if fits > 0.0 { fits as u64 } else { 0 };
        let count = fits.min(max_kos - allocated).min(u64::from(u32::MAX));
        if count == 0 {
            continue;
        }
        result.counts[idx] = count as u32;
        allocated += count;
        remaining -= count as f64 * value;
        if remaining.abs() < EPSILON {
            remaining = 0.0;
        }
    }

    // Smallest tiers give way first when the bound is exceeded.
    let mut excess = result.total().saturating_sub(max_kos);
    for (idx, multiplier) in TIER_MULTIPLIERS.iter().enumerate().rev() {
        while excess > 0 && result.counts[idx] > 0 {
            result.counts[idx] -= 1;
            remaining += multiplier * buy_in;
            excess -= 1;
        }
    }

    result.remainder = remaining.max(0.0);
    result
}

/// Regular (non-bounty) payout for a finishing place: top three only.
pub fn regular_payout(place: i64, buy_in: f64) -> f64 {
    match place {
        1 => 4.0 * buy_in,
        2 => 3.0 * buy_in,
        3 => 2.0 * buy_in,
        _ => 0.0,
    }
}

/// Part of `payout` attributable to knockouts, never negative.
pub fn bounty_from_payout(place: Option<i64>, payout: f64, buy_in: f64) -> f64 {
    let regular = place.map_or(0.0, |p| regular_payout(p, buy_in));
    (payout - regular).max(0.0)
}
