//! Main/side pot layering and winner inference.

use super::ledger::ChipLedger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    pub size: i64,
    /// Players who reached this pot's level, ledger order.
    pub eligible: Vec<String>,
    pub winners: Vec<String>,
}

impl Pot {
    pub fn is_won_by(&self, player: &str) -> bool {
        self.winners.iter().any(|w| w == player)
    }
}

/// Layer net contributions into pots, main pot first.
pub fn build_pots(contributions: &ChipLedger) -> Vec<Pot> {
    let mut levels: Vec<i64> = contributions
        .iter()
        .map(|(_, chips)| chips)
        .filter(|chips| *chips > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots = Vec::with_capacity(levels.len());
    let mut prev = 0;
    for level in levels {
        let eligible: Vec<String> = contributions
            .iter()
            .filter(|(_, chips)| *chips >= level)
            .map(|(player, _)| player.to_string())
            .collect();
        let size = (level - prev).saturating_mul(eligible.len() as i64);
        pots.push(Pot {
            size,
            eligible,
            winners: Vec::new(),
        });
        prev = level;
    }
    pots
}

/// Infer who won each pot from the collected amounts.
///
/// Pots with the fewest eligible players are settled first. Within a pot, eligible
/// players' remaining collections are drawn in order until the pot is exhausted.
/// Chips the collections leave in a pot go to its first eligible player.
pub fn assign_winners(pots: &mut [Pot], collected: &ChipLedger) {
    let mut remaining = collected.clone();

    let mut order: Vec<usize> = (0..pots.len()).collect();
    order.sort_by_key(|&idx| pots[idx].eligible.len());

    for idx in order {
        let pot = &mut pots[idx];
        let mut left = pot.size;
        for player in &pot.eligible {
            if left <= 0 {
                break;
            }
            let take = remaining.amount(player).min(left);
            if take > 0 {
                remaining.subtract_clamped(player, take);
                left -= take;
                pot.winners.push(player.clone());
            }
        }
        if left > 0
            && let Some(first) = pot.eligible.first()
            && !pot.winners.contains(first)
        {
            pot.winners.push(first.clone());
        }
    }
}
