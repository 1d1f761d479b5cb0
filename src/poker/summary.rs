//! Tournament summary files: buy-in, field size, Hero's finish and payout.

use std::sync::LazyLock;

use chrono::NaiveDateTime;

use super::bounty::{BountyDecomposition, bounty_from_payout, decompose_bounty};
use super::error::ErrorAccumulator;
use super::timestamp::parse_log_timestamp;

static TITLE_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^Tournament #(?P<id>\d+)(?:,\s*(?P<name>[^,]+))?")
        .expect("valid summary title regex")
});

static CURRENCY_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"[$€](?P<amount>[\d.,]+)").expect("valid currency amount regex")
});

static BUY_IN_LINE_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^Buy-in:").expect("valid buy-in line regex"));

static PLAYERS_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^(?P<count>\d+) Players").expect("valid players regex")
});

static STARTED_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^Tournament started (?P<ts>.+?)\s*$").expect("valid start time regex")
});

static PLACE_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"You finished the tournament in (?P<place>\d+)(?:st|nd|rd|th) place")
        .expect("valid finish place regex")
});

static PAYOUT_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"You received a total of [$€]?(?P<amount>[\d.,]+)")
        .expect("valid payout regex")
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentSummary {
    pub tournament_id: Option<String>,
    pub name: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub buy_in: Option<f64>,
    pub players: Option<i64>,
    pub finish_place: Option<i64>,
    /// `None` when Hero received nothing.
    pub payout: Option<f64>,
    pub parse_error: Option<String>,
}

impl TournamentSummary {
    /// Payout minus the regular top-three prize. Needs a known buy-in.
    pub fn bounty(&self) -> Option<f64> {
        let buy_in = self.buy_in?;
        Some(bounty_from_payout(
            self.finish_place,
            self.payout.unwrap_or(0.0),
            buy_in,
        ))
    }

    pub fn decomposition(&self) -> Option<BountyDecomposition> {
        let bounty = self.bounty()?;
        let buy_in = self.buy_in?;
        let players = self.players?;
        Some(decompose_bounty(bounty, buy_in, players))
    }
}

/// Parse a dollar amount such as `1,050.25` (a trailing sentence period is ignored).
fn parse_money(raw: &str, label: &str, parse_error: &mut ErrorAccumulator) -> Option<f64> {
    let s = raw.trim().trim_end_matches('.');
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(v) => Some(v),
        Err(e) => {
            parse_error.push(&format!("Conversion error: {label}='{s}' ({e})"));
            None
        }
    }
}

fn buy_in_from_line(line: &str, parse_error: &mut ErrorAccumulator) -> Option<f64> {
    let mut total = None;
    for caps in CURRENCY_RE.captures_iter(line) {
        if let Some(v) = caps
            .name("amount")
            .and_then(|m| parse_money(m.as_str(), "buy_in", parse_error))
        {
            total = Some(total.unwrap_or(0.0) + v);
        }
    }
    total
}

pub fn parse_summary(text: &str) -> TournamentSummary {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut summary = TournamentSummary::default();
    let mut parse_error = ErrorAccumulator::default();
    let mut title_seen = false;
    let mut buy_in_line = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !title_seen && let Some(caps) = TITLE_RE.captures(line) {
            title_seen = true;
            summary.tournament_id = caps.name("id").map(|m| m.as_str().to_string());
            summary.name = caps.name("name").map(|m| m.as_str().trim().to_string());
            summary.buy_in = CURRENCY_RE
                .captures(line)
                .and_then(|c| c.name("amount"))
                .and_then(|m| parse_money(m.as_str(), "buy_in", &mut parse_error));
            continue;
        }

        if buy_in_line.is_none() && BUY_IN_LINE_RE.is_match(line) {
            buy_in_line = Some(line);
        } else if summary.players.is_none()
            && let Some(caps) = PLAYERS_RE.captures(line)
        {
            summary.players = caps.name("count").and_then(|m| m.as_str().parse().ok());
        } else if summary.started_at.is_none()
            && let Some(caps) = STARTED_RE.captures(line)
        {
            summary.started_at = caps
                .name("ts")
                .and_then(|m| parse_log_timestamp(m.as_str(), "started_at", &mut parse_error));
        }

        if summary.finish_place.is_none()
            && let Some(caps) = PLACE_RE.captures(line)
        {
            summary.finish_place = caps.name("place").and_then(|m| m.as_str().parse().ok());
        }

        if summary.payout.is_none()
            && let Some(caps) = PAYOUT_RE.captures(line)
        {
            summary.payout = caps
                .name("amount")
                .and_then(|m| parse_money(m.as_str(), "payout", &mut parse_error));
        }
    }

    if summary.buy_in.is_none()
        && let Some(line) = buy_in_line
    {
        summary.buy_in = buy_in_from_line(line, &mut parse_error);
    }

    if !title_seen {
        parse_error.push("Missing tournament title line");
    }

    summary.parse_error = parse_error.take();
    summary
}
