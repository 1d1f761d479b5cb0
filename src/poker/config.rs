use std::ops::RangeInclusive;

pub const DEFAULT_HERO: &str = "Hero";
pub const DEFAULT_FINAL_TABLE_SIZE: u32 = 9;
pub const EARLY_FINAL_PLAYERS: RangeInclusive<usize> = 6..=9;

/// Order in which a hand-history file lists its hands.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SourceOrder {
    /// Most recent hand first. This is how the poker room writes its logs.
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SourceOrder {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let normalized = raw.trim();
        if normalized.eq_ignore_ascii_case("newest_first") {
            Ok(Self::NewestFirst)
        } else if normalized.eq_ignore_ascii_case("oldest_first") {
            Ok(Self::OldestFirst)
        } else {
            Err(format!(
                "Invalid order value '{}'. Supported values: 'newest_first' or 'oldest_first'.",
                normalized
            ))
        }
    }
}

/// Immutable settings threaded through every parsing pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ParserConfig {
    pub hero: String,
    pub final_table_size: u32,
    /// Final-table hands below this big blind are not treated as final table.
    pub min_ko_blind_level: i64,
    pub source_order: SourceOrder,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            hero: DEFAULT_HERO.to_string(),
            final_table_size: DEFAULT_FINAL_TABLE_SIZE,
            min_ko_blind_level: 0,
            source_order: SourceOrder::NewestFirst,
        }
    }
}

impl ParserConfig {
    pub fn with_hero(mut self, hero: &str) -> Self {
        self.hero = hero.trim().to_string();
        self
    }

    pub fn is_hero(&self, name: &str) -> bool {
        name == self.hero
    }
}
