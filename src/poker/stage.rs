use super::config::{EARLY_FINAL_PLAYERS, ParserConfig};
use super::hand::HandRecord;

/// Remaining-player bucket used by the statistics layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageBucket {
    TwoToThree,
    FourToFive,
    SixToNine,
}

impl StageBucket {
    pub fn from_players(players: i64) -> Option<Self> {
        match players {
            2..=3 => Some(Self::TwoToThree),
            4..=5 => Some(Self::FourToFive),
            6..=9 => Some(Self::SixToNine),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TwoToThree => "2-3",
            Self::FourToFive => "4-5",
            Self::SixToNine => "6-9",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageLabel {
    pub final_table: bool,
    pub final_table_entry: bool,
    pub early_final: bool,
    pub bucket: Option<StageBucket>,
}

/// Labels the hands of one tournament in chronological order. The first final-table
/// hand is the entry hand.
#[derive(Debug)]
pub struct StageTracker<'a> {
    config: &'a ParserConfig,
    entered_final_table: bool,
}

impl<'a> StageTracker<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self {
            config,
            entered_final_table: false,
        }
    }

    fn is_final_table(&self, hand: &HandRecord) -> bool {
        let size_matches = hand.table_size == Some(self.config.final_table_size);
        let blind_ok = hand.big_blind.unwrap_or(0) >= self.config.min_ko_blind_level;
        size_matches && blind_ok
    }

    pub fn classify(&mut self, hand: &HandRecord) -> StageLabel {
        let players = hand.player_count();
        let final_table = self.is_final_table(hand);

        let final_table_entry = final_table && !self.entered_final_table;
        if final_table {
            self.entered_final_table = true;
        }

        StageLabel {
            final_table,
            final_table_entry,
            early_final: final_table && EARLY_FINAL_PLAYERS.contains(&players),
            bucket: StageBucket::from_players(players as i64),
        }
    }
}
