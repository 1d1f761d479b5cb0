//! Whole-file pipeline: hands in file order in, chronologically analyzed hands out.

use super::config::{ParserConfig, SourceOrder};
use super::hand::{HandRecord, reconstruct_hand, split_hands};
use super::knockout::{KnockoutCredit, PlayerList, attribute, detect_eliminations};
use super::pots::{assign_winners, build_pots};
use super::stage::{StageLabel, StageTracker};

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedHand {
    pub hand: HandRecord,
    /// 1-based chronological position inside its tournament.
    pub hand_number: u32,
    pub eliminated: PlayerList,
    pub credit: KnockoutCredit,
    pub stage: StageLabel,
}

/// Normalize file order to oldest-first. Applied exactly once per file.
fn chronological(mut hands: Vec<HandRecord>, order: SourceOrder) -> Vec<HandRecord> {
    if order == SourceOrder::NewestFirst {
        hands.reverse();
    }
    hands
}

/// Group hands by tournament, keeping first-appearance order of tournaments and
/// chronological order within each.
fn group_by_tournament(hands: Vec<HandRecord>) -> Vec<Vec<HandRecord>> {
    let mut groups: Vec<(Option<String>, Vec<HandRecord>)> = Vec::new();
    for hand in hands {
        match groups
            .iter_mut()
            .find(|(id, _)| *id == hand.tournament_id)
        {
            Some((_, group)) => group.push(hand),
            None => groups.push((hand.tournament_id.clone(), vec![hand])),
        }
    }
    groups.into_iter().map(|(_, group)| group).collect()
}

fn analyze_tournament(hands: Vec<HandRecord>, config: &ParserConfig) -> Vec<AnalyzedHand> {
    let eliminations = detect_eliminations(&hands);
    let mut stages = StageTracker::new(config);

    hands
        .into_iter()
        .zip(eliminations)
        .enumerate()
        .map(|(idx, (hand, eliminated))| {
            let mut pots = build_pots(&hand.contributions);
            assign_winners(&mut pots, &hand.collected);
            let credit = attribute(&hand, &pots, &eliminated, config);
            let stage = stages.classify(&hand);
            AnalyzedHand {
                hand,
                hand_number: idx as u32 + 1,
                eliminated,
                credit,
                stage,
            }
        })
        .collect()
}

/// Parse and analyze the full text of one hand-history file.
pub fn analyze_hand_history(text: &str, config: &ParserConfig) -> Vec<AnalyzedHand> {
    let hands: Vec<HandRecord> = split_hands(text)
        .iter()
        .map(|block| reconstruct_hand(block))
        .collect();

    group_by_tournament(chronological(hands, config.source_order))
        .into_iter()
        .flat_map(|tournament| analyze_tournament(tournament, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALL_AND_WIN: &str = r#"Poker Hand #HD100: Tournament #777, Mystery Battle Royale $10 Hold'em No Limit - Level10(200/400) - 2025/01/01 16:38:15
Table '777 1' 9-max Seat #1 is the button
Seat 1: Hero (15,000 in chips)
Seat 2: Victim (5,401 in chips)
Seat 3: Folder (8000 in chips)
Hero: posts ante 80
Victim: posts ante 80
Folder: posts ante 80
Victim: posts small blind 200
Hero: posts big blind 400
*** HOLE CARDS ***
Dealt to Hero [Ks Kd]
Folder: folds
Victim: raises 4,921 to 5,321 and is all-in
Hero: calls 4,921
*** FLOP *** [2c 7d 9h]
*** TURN *** [2c 7d 9h] [Js]
*** RIVER *** [2c 7d 9h Js] [3s]
*** SHOWDOWN ***
Hero collected 10,882 from pot
*** SUMMARY ***
Total pot 10,882 | Rake 0
"#;

    const FOLD_TO_ALL_IN: &str = r#"Poker Hand #HD200: Tournament #777, Mystery Battle Royale $10 Hold'em No Limit - Level10(200/400) - 2025/01/01 16:40:00
Table '777 1' 9-max Seat #1 is the button
Seat 1: Hero (15,000 in chips)
Seat 2: Victim (5,401 in chips)
Seat 3: Caller (20,000 in chips)
Hero: posts ante 80
Victim: posts ante 80
Caller: posts ante 80
Victim: posts small blind 200
Caller: posts big blind 400
*** HOLE CARDS ***
Victim: raises 4,921 to 5,321 and is all-in
Hero: folds
Caller: calls 4,921
*** SHOWDOWN ***
Caller collected 10,882 from pot
*** SUMMARY ***
Total pot 10,882 | Rake 0
"#;

    const HERO_ALL_IN_LOSES: &str = r#"Poker Hand #HD300: Tournament #777, Mystery Battle Royale $10 Hold'em No Limit - Level10(200/400) - 2025/01/01 16:42:00
Table '777 1' 9-max Seat #1 is the button
Seat 1: Hero (5,000 in chips)
Seat 2: Villain (15,000 in chips)
Hero: posts ante 80
Villain: posts ante 80
Hero: posts small blind 200
Villain: posts big blind 400
*** HOLE CARDS ***
Hero: raises 4,520 to 4,920 and is all-in
Villain: calls 4,520
*** SHOWDOWN ***
Villain collected 10,000 from pot
*** SUMMARY ***
Total pot 10,000 | Rake 0
"#;

    const WIN_WITHOUT_COVERING: &str = r#"Poker Hand #HD400: Tournament #777, Mystery Battle Royale $10 Hold'em No Limit - Level10(200/400) - 2025/01/01 16:44:00
Table '777 1' 9-max Seat #1 is the button
Seat 1: Hero (3,000 in chips)
Seat 2: Big (15,000 in chips)
Hero: posts ante 80
Big: posts ante 80
Hero: posts small blind 200
Big: posts big blind 400
*** HOLE CARDS ***
Hero: raises 2,520 to 2,920 and is all-in
Big: calls 2,520
*** SHOWDOWN ***
Hero collected 6,000 from pot
*** SUMMARY ***
Total pot 6,000 | Rake 0
"#;

    fn single(text: &str) -> AnalyzedHand {
        let mut hands = analyze_hand_history(text, &ParserConfig::default());
        assert_eq!(hands.len(), 1);
        hands.remove(0)
    }

    #[test]
    fn test_call_all_in_and_win_is_knockout_and_attempt() {
        let analyzed = single(CALL_AND_WIN);
        assert_eq!(analyzed.eliminated.as_slice(), ["Victim".to_string()]);
        assert_eq!(analyzed.credit.hero_ko, 1);
        assert_eq!(analyzed.credit.ko_attempts, 1);
        assert!(analyzed.credit.hero_won_pot);
    }

    #[test]
    fn test_fold_to_all_in_is_neither_knockout_nor_attempt() {
        let analyzed = single(FOLD_TO_ALL_IN);
        assert_eq!(analyzed.eliminated.as_slice(), ["Victim".to_string()]);
        assert_eq!(analyzed.credit.hero_ko, 0);
        assert_eq!(analyzed.credit.ko_attempts, 0);
        assert!(!analyzed.credit.hero_won_pot);
    }

    #[test]
    fn test_hero_all_in_and_loses_is_no_knockout() {
        let analyzed = single(HERO_ALL_IN_LOSES);
        assert_eq!(analyzed.eliminated.as_slice(), ["Hero".to_string()]);
        assert_eq!(analyzed.credit.hero_ko, 0);
        assert_eq!(analyzed.credit.ko_attempts, 0);
    }

    #[test]
    fn test_winning_against_uncovered_stack_is_no_knockout() {
        let analyzed = single(WIN_WITHOUT_COVERING);
        assert!(analyzed.eliminated.is_empty());
        assert!(analyzed.credit.hero_won_pot);
        assert_eq!(analyzed.credit.hero_ko, 0);
        assert_eq!(analyzed.credit.ko_attempts, 0);
    }

    #[test]
    fn test_newest_first_file_is_reversed_once() {
        // Newest hand first, as the poker room writes it.
        let text = format!("{FOLD_TO_ALL_IN}\n\n{CALL_AND_WIN}");
        let hands = analyze_hand_history(&text, &ParserConfig::default());

        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0].hand.hand_id, "HD100");
        assert_eq!(hands[0].hand_number, 1);
        assert_eq!(hands[1].hand.hand_id, "HD200");
        assert_eq!(hands[1].hand_number, 2);
        // Folder is missing from HD200, so they busted in HD100 as far as the log says.
        assert_eq!(hands[0].eliminated.as_slice(), ["Folder".to_string()]);
        assert_eq!(hands[0].credit.hero_ko, 1);
    }

    #[test]
    fn test_oldest_first_order_is_kept() {
        let text = format!("{CALL_AND_WIN}\n{FOLD_TO_ALL_IN}");
        let config = ParserConfig {
            source_order: SourceOrder::OldestFirst,
            ..ParserConfig::default()
        };
        let hands = analyze_hand_history(&text, &config);

        assert_eq!(hands[0].hand.hand_id, "HD100");
        assert_eq!(hands[1].hand.hand_id, "HD200");
    }

    #[test]
    fn test_tournaments_are_analyzed_separately() {
        let other = CALL_AND_WIN
            .replace("Tournament #777", "Tournament #888")
            .replace("HD100", "HD900");
        let text = format!("{other}\n{CALL_AND_WIN}");
        let hands = analyze_hand_history(&text, &ParserConfig::default());

        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0].hand.tournament_id.as_deref(), Some("777"));
        assert_eq!(hands[0].hand_number, 1);
        assert_eq!(hands[1].hand.tournament_id.as_deref(), Some("888"));
        assert_eq!(hands[1].hand_number, 1);
        // Each is the last hand of its tournament.
        assert_eq!(hands[0].credit.hero_ko, 1);
        assert_eq!(hands[1].credit.hero_ko, 1);
    }

    #[test]
    fn test_final_table_stage_labels() {
        let hands = analyze_hand_history(CALL_AND_WIN, &ParserConfig::default());
        let stage = hands[0].stage;
        assert!(stage.final_table);
        assert!(stage.final_table_entry);
        assert!(!stage.early_final);
        assert_eq!(stage.bucket, Some(crate::poker::stage::StageBucket::TwoToThree));
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let text = format!("{WIN_WITHOUT_COVERING}\n{HERO_ALL_IN_LOSES}\n{FOLD_TO_ALL_IN}\n{CALL_AND_WIN}");
        let config = ParserConfig::default();
        assert_eq!(
            analyze_hand_history(&text, &config),
            analyze_hand_history(&text, &config)
        );
    }

    #[test]
    fn test_pot_conservation_on_fixtures() {
        for text in [CALL_AND_WIN, FOLD_TO_ALL_IN, HERO_ALL_IN_LOSES, WIN_WITHOUT_COVERING] {
            let analyzed = single(text);
            let pots = build_pots(&analyzed.hand.contributions);
            let total: i64 = pots.iter().map(|p| p.size).sum();
            assert_eq!(Some(total), analyzed.hand.total_pot);
        }
    }

    #[test]
    fn test_empty_text_yields_no_hands() {
        assert!(analyze_hand_history("", &ParserConfig::default()).is_empty());
    }
}
