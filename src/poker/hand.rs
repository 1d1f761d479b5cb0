//! Hand reconstruction: one block of classified lines becomes one [`HandRecord`].

use chrono::NaiveDateTime;

use super::error::ErrorAccumulator;
use super::ledger::ChipLedger;
use super::lines::{self, Action, Line};
use super::timestamp::parse_log_timestamp;

/// One hand as the log describes it. Never mutated after [`reconstruct_hand`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandRecord {
    pub hand_id: String,
    pub tournament_id: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub table_size: Option<u32>,
    pub big_blind: Option<i64>,
    /// Starting chips, seat order.
    pub seats: ChipLedger,
    /// Net chips put in this hand, after uncalled-bet returns.
    pub contributions: ChipLedger,
    pub collected: ChipLedger,
    pub total_pot: Option<i64>,
    pub parse_error: Option<String>,
}

impl HandRecord {
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    /// Chips behind at the end of the hand.
    pub fn final_stack(&self, player: &str) -> i64 {
        self.seats
            .amount(player)
            .saturating_sub(self.contributions.amount(player))
            .saturating_add(self.collected.amount(player))
    }
}

/// Split a hand-history file into per-hand line blocks. Text before the first
/// `Poker Hand #` header is ignored.
pub fn split_hands(text: &str) -> Vec<Vec<&str>> {
    let mut hands: Vec<Vec<&str>> = Vec::new();
    for line in text.lines() {
        if lines::is_hand_start(line) {
            hands.push(vec![line]);
        } else if let Some(current) = hands.last_mut() {
            current.push(line);
        }
    }
    hands
}

/// Per-hand accumulator driven by classified lines.
#[derive(Default)]
struct HandBuilder {
    record: HandRecord,
    // Chips already in front of each player on the current street.
    committed: ChipLedger,
    header_seen: bool,
    hole_cards_seen: bool,
    in_summary: bool,
    parse_error: ErrorAccumulator,
}

impl HandBuilder {
    fn feed(&mut self, raw: &str) {
        match lines::classify(raw) {
            Line::HandStart(header) => {
                if self.header_seen {
                    return;
                }
                self.header_seen = true;
                self.record.hand_id = header.hand_id.to_string();
                self.record.tournament_id = header.tournament_id.map(str::to_string);
                self.record.big_blind = header.big_blind;
                self.record.started_at = header
                    .started_at
                    .and_then(|ts| parse_log_timestamp(ts, "started_at", &mut self.parse_error));
            }
            Line::TableInfo { table_size } => {
                if self.record.table_size.is_none() {
                    self.record.table_size = Some(table_size);
                }
            }
            Line::Seat { player, chips } => {
                if !self.hole_cards_seen && !self.in_summary && !self.record.seats.contains(player)
                {
                    self.record.seats.add(player, chips);
                    self.record.contributions.add(player, 0);
                }
            }
            Line::HoleCards => self.hole_cards_seen = true,
            Line::Street | Line::Showdown => self.committed = ChipLedger::new(),
            // Summary seat lines repeat the roster with results.
            Line::Summary => self.in_summary = true,
            Line::Action { player, action } => self.apply_action(player, action, raw),
            Line::UncalledBet { player, amount } => {
                self.record.contributions.subtract_clamped(player, amount);
                self.committed.subtract_clamped(player, amount);
            }
            Line::Collected { player, amount } => self.record.collected.add(player, amount),
            Line::TotalPot { amount } => {
                if self.record.total_pot.is_none() {
                    self.record.total_pot = Some(amount);
                }
            }
            Line::Unrecognized => {}
        }
    }

    fn apply_action(&mut self, player: &str, action: Action, raw: &str) {
        let added = match action {
            Action::Post { amount, ante: true } => {
                self.record.contributions.add(player, amount);
                return;
            }
            Action::Post { amount, ante: false } => amount,
            Action::Bet(amount) | Action::Call(amount) | Action::AllIn(amount) => amount,
            Action::Raise { to: Some(to) } => {
                to.saturating_sub(self.committed.amount(player)).max(0)
            }
            Action::Raise { to: None } => {
                self.parse_error
                    .push(&format!("Malformed raise line: '{}'", raw.trim()));
                return;
            }
        };
        self.record.contributions.add(player, added);
        self.committed.add(player, added);
    }

    fn finish(mut self) -> HandRecord {
        if self.record.seats.is_empty() {
            self.parse_error.push(&format!(
                "Hand '{}' has no seat listings",
                self.record.hand_id
            ));
        }
        self.record.parse_error = self.parse_error.take();
        self.record
    }
}

/// Build the record for one hand. Never fails: missing pieces degrade the record
/// and are described in `parse_error`.
pub fn reconstruct_hand(block: &[&str]) -> HandRecord {
    let mut builder = HandBuilder::default();
    for raw in block {
        builder.feed(raw);
    }
    builder.finish()
}
