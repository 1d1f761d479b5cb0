//! Elimination detection and Hero knockout attribution.

use smallvec::SmallVec;

use super::config::ParserConfig;
use super::hand::HandRecord;
use super::pots::Pot;

pub type PlayerList = SmallVec<[String; 4]>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KnockoutCredit {
    pub hero_ko: u32,
    pub ko_attempts: u32,
    pub hero_won_pot: bool,
}

fn busted_by_stack(hand: &HandRecord) -> PlayerList {
    hand.seats
        .players()
        .filter(|player| hand.final_stack(player) == 0)
        .map(str::to_string)
        .collect()
}

fn missing_from(hand: &HandRecord, next: &HandRecord) -> PlayerList {
    hand.seats
        .players()
        .filter(|player| !next.seats.contains(player))
        .map(str::to_string)
        .collect()
}

/// Players eliminated in each hand of one tournament, hands in chronological order.
///
/// A player seated in hand `i` and absent from hand `i + 1` busted in hand `i`. The
/// last hand has no successor, so there a player busts when the hand leaves them
/// with exactly zero chips. A successor without seat listings is treated the same
/// way, since its roster says nothing.
pub fn detect_eliminations(hands: &[HandRecord]) -> Vec<PlayerList> {
    hands
        .iter()
        .enumerate()
        .map(|(idx, hand)| match hands.get(idx + 1) {
            Some(next) if !next.seats.is_empty() => missing_from(hand, next),
            _ => busted_by_stack(hand),
        })
        .collect()
}

/// Credit Hero for the eliminations of one hand.
///
/// Winning any pot of the hand credits Hero with every elimination but their own.
/// An attempt is counted for each opponent in the pot whose starting stack Hero's
/// net contribution covers.
pub fn attribute(
    hand: &HandRecord,
    pots: &[Pot],
    eliminated: &[String],
    config: &ParserConfig,
) -> KnockoutCredit {
    let hero = config.hero.as_str();
    let hero_won_pot = pots.iter().any(|pot| pot.is_won_by(hero));

    let hero_ko = if hero_won_pot {
        eliminated.iter().filter(|p| !config.is_hero(p)).count() as u32
    } else {
        0
    };

    let hero_contribution = hand.contributions.amount(hero);
    let ko_attempts = if hero_contribution > 0 {
        hand.seats
            .iter()
            .filter(|(player, stack)| {
                !config.is_hero(player)
                    && *stack <= hero_contribution
                    && hand.contributions.amount(player) > 0
            })
            .count() as u32
    } else {
        0
    };

    KnockoutCredit {
        hero_ko,
        ko_attempts,
        hero_won_pot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poker::ledger::ChipLedger;
    use crate::poker::pots::{assign_winners, build_pots};

    fn hand(seats: &[(&str, i64)], contributions: &[(&str, i64)], collected: &[(&str, i64)]) -> HandRecord {
        HandRecord {
            seats: seats.iter().copied().collect(),
            contributions: contributions.iter().copied().collect(),
            collected: collected.iter().copied().collect(),
            ..HandRecord::default()
        }
    }

    fn roster(players: &[&str]) -> HandRecord {
        HandRecord {
            seats: players.iter().map(|p| (*p, 1000)).collect::<ChipLedger>(),
            ..HandRecord::default()
        }
    }

    fn settled_pots(hand: &HandRecord) -> Vec<Pot> {
        let mut pots = build_pots(&hand.contributions);
        assign_winners(&mut pots, &hand.collected);
        pots
    }

    #[test]
    fn test_detect_eliminations_by_roster_difference() {
        let hands = vec![
            roster(&["A", "B", "C", "D"]),
            roster(&["A", "C", "D"]),
            roster(&["A", "C", "D"]),
            roster(&["C"]),
        ];
        let eliminated = detect_eliminations(&hands);

        assert_eq!(eliminated.len(), 4);
        assert_eq!(eliminated[0].as_slice(), ["B".to_string()]);
        assert!(eliminated[1].is_empty());
        assert_eq!(eliminated[2].as_slice(), ["A".to_string(), "D".to_string()]);
        assert!(eliminated[3].is_empty());
    }

    #[test]
    fn test_last_hand_uses_final_stack() {
        let last = hand(
            &[("Hero", 15000), ("Victim", 5401)],
            &[("Hero", 5401), ("Victim", 5401)],
            &[("Hero", 10802)],
        );
        let eliminated = detect_eliminations(&[last]);
        assert_eq!(eliminated[0].as_slice(), ["Victim".to_string()]);
    }

    #[test]
    fn test_seatless_successor_falls_back_to_final_stack() {
        let first = hand(
            &[("A", 100), ("B", 100)],
            &[("A", 100), ("B", 100)],
            &[("B", 200)],
        );
        let eliminated = detect_eliminations(&[first, HandRecord::default()]);
        assert_eq!(eliminated[0].as_slice(), ["A".to_string()]);
    }

    #[test]
    fn test_attribute_credits_all_eliminations_to_pot_winner() {
        let h = hand(
            &[("Hero", 15000), ("V1", 2000), ("V2", 3000)],
            &[("Hero", 3000), ("V1", 2000), ("V2", 3000)],
            &[("Hero", 8000)],
        );
        let pots = settled_pots(&h);
        let eliminated = ["V1".to_string(), "V2".to_string()];

        let credit = attribute(&h, &pots, &eliminated, &ParserConfig::default());
        assert_eq!(credit.hero_ko, 2);
        assert_eq!(credit.ko_attempts, 2);
        assert!(credit.hero_won_pot);
    }

    #[test]
    fn test_attribute_never_credits_hero_own_bust() {
        let h = hand(
            &[("Hero", 500), ("Big", 9000)],
            &[("Hero", 500), ("Big", 500)],
            &[("Hero", 500), ("Big", 500)],
        );
        let pots = settled_pots(&h);
        let eliminated = ["Hero".to_string()];

        let credit = attribute(&h, &pots, &eliminated, &ParserConfig::default());
        assert_eq!(credit.hero_ko, 0);
        assert_eq!(credit.ko_attempts, 0);
    }

    #[test]
    fn test_attribute_without_hero_in_hand() {
        let h = hand(&[("A", 100), ("B", 100)], &[("A", 100), ("B", 100)], &[("A", 200)]);
        let pots = settled_pots(&h);
        let credit = attribute(&h, &pots, &["B".to_string()], &ParserConfig::default());
        assert_eq!(credit, KnockoutCredit::default());
    }

    #[test]
    fn test_custom_hero_name() {
        let h = hand(
            &[("TestHero", 1000), ("V", 400)],
            &[("TestHero", 400), ("V", 400)],
            &[("TestHero", 800)],
        );
        let pots = settled_pots(&h);
        let config = ParserConfig::default().with_hero("TestHero");

        let credit = attribute(&h, &pots, &["V".to_string()], &config);
        assert_eq!(credit.hero_ko, 1);
        assert_eq!(credit.ko_attempts, 1);
    }
}
