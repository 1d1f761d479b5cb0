/// Input file dialect, resolved once per file from its opening lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    HandHistory,
    TournamentSummary,
    Unrecognized,
}

impl FileKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::HandHistory => "hand_history",
            Self::TournamentSummary => "tournament_summary",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Inspect the first two non-blank lines of `text`.
    pub fn sniff(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let first = lines.next().unwrap_or("");
        let second = lines.next().unwrap_or("");

        if first.starts_with("Poker Hand #") && second.starts_with("Table") {
            Self::HandHistory
        } else if first.starts_with("Tournament #") && second.starts_with("Buy-in:") {
            Self::TournamentSummary
        } else {
            Self::Unrecognized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_hand_history() {
        let text = "Poker Hand #HD1: Tournament #1, Hold'em No Limit - Level1(10/20) - 2025/01/01 10:00:00\nTable '1' 9-max Seat #1 is the button\n";
        assert_eq!(FileKind::sniff(text), FileKind::HandHistory);
    }

    #[test]
    fn test_sniff_tournament_summary_with_bom_and_blank_lines() {
        let text = "\u{feff}\n\nTournament #206881959, Mystery Battle Royale $10\nBuy-in: $5+$0.8+$4.2\n";
        assert_eq!(FileKind::sniff(text), FileKind::TournamentSummary);
    }

    #[test]
    fn test_sniff_requires_both_lines() {
        assert_eq!(
            FileKind::sniff("Poker Hand #HD1: Tournament #1\nDealt to Hero [Ah Kh]"),
            FileKind::Unrecognized
        );
        assert_eq!(FileKind::sniff("Tournament #1, Test"), FileKind::Unrecognized);
        assert_eq!(FileKind::sniff(""), FileKind::Unrecognized);
    }

    #[test]
    fn test_labels() {
        assert_eq!(FileKind::HandHistory.label(), "hand_history");
        assert_eq!(FileKind::TournamentSummary.label(), "tournament_summary");
        assert_eq!(FileKind::Unrecognized.label(), "unrecognized");
    }
}
