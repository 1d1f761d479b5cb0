//! Output rows for the table functions. Built once per hand or summary file and
//! written column by column into DuckDB chunks.

use chrono::NaiveDateTime;

use super::bounty::BountyDecomposition;
use super::config::ParserConfig;
use super::pots::build_pots;
use super::summary::TournamentSummary;
use super::tournament::AnalyzedHand;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandRow {
    pub tournament_id: Option<String>,
    pub hand_id: String,
    pub hand_number: u32,
    pub started_at: Option<NaiveDateTime>,
    pub table_size: Option<u32>,
    pub players: u32,
    pub big_blind: Option<i64>,
    pub hero_stack: Option<i64>,
    pub hero_contribution: Option<i64>,
    pub total_pot: i64,
    pub hero_won_pot: bool,
    /// JSON array of player names.
    pub eliminated: String,
    pub hero_ko: u32,
    pub ko_attempts: u32,
    pub is_final_table: bool,
    pub is_final_table_entry: bool,
    pub is_early_final: bool,
    pub stage: Option<&'static str>,
    pub parse_error: Option<String>,
    pub source: String,
}

impl HandRow {
    pub fn from_analyzed(analyzed: AnalyzedHand, config: &ParserConfig, source: &str) -> Self {
        let AnalyzedHand {
            hand,
            hand_number,
            eliminated,
            credit,
            stage,
        } = analyzed;

        let hero_stack = hand.seats.get(&config.hero);
        let hero_contribution = hero_stack.map(|_| hand.contributions.amount(&config.hero));
        // The summary's figure wins; layered contributions are the fallback.
        let total_pot = hand
            .total_pot
            .unwrap_or_else(|| {
                build_pots(&hand.contributions)
                    .iter()
                    .fold(0i64, |total, pot| total.saturating_add(pot.size))
            });
        let eliminated =
            serde_json::to_string(eliminated.as_slice()).unwrap_or_else(|_| "[]".to_string());

        Self {
            players: hand.player_count() as u32,
            tournament_id: hand.tournament_id,
            hand_id: hand.hand_id,
            hand_number,
            started_at: hand.started_at,
            table_size: hand.table_size,
            big_blind: hand.big_blind,
            hero_stack,
            hero_contribution,
            total_pot,
            hero_won_pot: credit.hero_won_pot,
            eliminated,
            hero_ko: credit.hero_ko,
            ko_attempts: credit.ko_attempts,
            is_final_table: stage.final_table,
            is_final_table_entry: stage.final_table_entry,
            is_early_final: stage.early_final,
            stage: stage.bucket.map(|b| b.label()),
            parse_error: hand.parse_error,
            source: source.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryRow {
    pub tournament_id: Option<String>,
    pub tournament_name: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub buy_in: Option<f64>,
    pub players: Option<i64>,
    pub finish_place: Option<i64>,
    pub payout: Option<f64>,
    pub bounty: Option<f64>,
    pub decomposition: Option<BountyDecomposition>,
    pub parse_error: Option<String>,
    pub source: String,
}

impl SummaryRow {
    pub fn from_summary(summary: TournamentSummary, source: &str) -> Self {
        Self {
            bounty: summary.bounty(),
            decomposition: summary.decomposition(),
            tournament_id: summary.tournament_id,
            tournament_name: summary.name,
            started_at: summary.started_at,
            buy_in: summary.buy_in,
            players: summary.players,
            finish_place: summary.finish_place,
            payout: summary.payout,
            parse_error: summary.parse_error,
            source: source.to_string(),
        }
    }

    pub fn tier_count(&self, idx: usize) -> Option<i64> {
        self.decomposition
            .map(|d| i64::from(d.counts.get(idx).copied().unwrap_or(0)))
    }
}
