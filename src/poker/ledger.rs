/// Player -> chips map that keeps first-insertion order.
///
/// A table never holds more than ten players, so a linear scan beats hashing and
/// keeps iteration order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipLedger {
    entries: Vec<(String, i64)>,
}

impl ChipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(name, _)| name == player)
            .map(|(_, chips)| *chips)
    }

    pub fn amount(&self, player: &str) -> i64 {
        self.get(player).unwrap_or(0)
    }

    pub fn contains(&self, player: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == player)
    }

    fn slot(&mut self, player: &str) -> &mut i64 {
        let idx = match self.entries.iter().position(|(name, _)| name == player) {
            Some(idx) => idx,
            None => {
                self.entries.push((player.to_string(), 0));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn add(&mut self, player: &str, chips: i64) {
        let slot = self.slot(player);
        *slot = slot.saturating_add(chips);
    }

    /// Subtract, never going below zero. Returns the amount actually removed.
    pub fn subtract_clamped(&mut self, player: &str, chips: i64) -> i64 {
        let slot = self.slot(player);
        let removed = chips.min(*slot).max(0);
        *slot -= removed;
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(name, chips)| (name.as_str(), *chips))
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn total(&self) -> i64 {
        self.entries.iter().map(|(_, chips)| *chips).sum()
    }
}

impl<'a> FromIterator<(&'a str, i64)> for ChipLedger {
    fn from_iter<I: IntoIterator<Item = (&'a str, i64)>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for (player, chips) in iter {
            ledger.add(player, chips);
        }
        ledger
    }
}
