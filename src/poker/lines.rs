//! Line classifier for the hand-history dialect.
//!
//! Every line of a hand maps to exactly one [`Line`]. Narrative lines (board cards,
//! showdown descriptions, chat) come back as [`Line::Unrecognized`] and are dropped
//! by the reconstructor.

use std::sync::LazyLock;

static HAND_START_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^Poker Hand #(?P<hand_id>[^:\s]+):(?:\s*Tournament #(?P<tournament_id>\d+))?")
        .expect("valid hand start regex")
});

static LEVEL_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"Level\s*\d+\s*\(\s*(?P<sb>[\d,]+)\s*/\s*(?P<bb>[\d,]+)")
        .expect("valid blind level regex")
});

static TIMESTAMP_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?P<ts>\d{4}/\d{2}/\d{2} \d{1,2}:\d{2}:\d{2})")
        .expect("valid timestamp regex")
});

static TABLE_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^Table '[^']*' (?P<size>\d+)-max").expect("valid table info regex")
});

static SEAT_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^Seat \d+: (?P<player>.+?) \((?P<chips>-?[\d,]+) in chips")
        .expect("valid seat regex")
});

static MARKER_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^\*\*\* (?P<marker>HOLE CARDS|FLOP|TURN|RIVER|SHOWDOWN|SUMMARY) \*\*\*")
        .expect("valid section marker regex")
});

static ACTION_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^(?P<player>[^:]+): (?P<action>posts|bets|calls|raises|all-in|checks|folds)\b(?P<rest>.*)$",
    )
    .expect("valid action regex")
});

static RAISE_TO_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"raises [\d,]+ to (?P<to>[\d,]+)").expect("valid raise-to regex")
});

static AMOUNT_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\d[\d,]*").expect("valid amount regex"));

static UNCALLED_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^Uncalled bet \((?P<amount>[\d,]+)\) returned to (?P<player>.+)$")
        .expect("valid uncalled bet regex")
});

static COLLECTED_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^(?P<player>[^:]+?) collected (?P<amount>[\d,]+) from (?:(?:main|side) )?pot",
    )
    .expect("valid collected regex")
});

static TOTAL_POT_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^Total pot (?P<amount>[\d,]+)").expect("valid total pot regex")
});

/// Header fields carried by the `Poker Hand #...` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandHeader<'a> {
    pub hand_id: &'a str,
    pub tournament_id: Option<&'a str>,
    pub big_blind: Option<i64>,
    pub started_at: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Post { amount: i64, ante: bool },
    Bet(i64),
    Call(i64),
    /// `raises X to Y`: only the "to" total matters. `None` when the line lacks it.
    Raise { to: Option<i64> },
    AllIn(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    HandStart(HandHeader<'a>),
    TableInfo { table_size: u32 },
    Seat { player: &'a str, chips: i64 },
    HoleCards,
    Street,
    Showdown,
    Summary,
    Action { player: &'a str, action: Action },
    UncalledBet { player: &'a str, amount: i64 },
    Collected { player: &'a str, amount: i64 },
    TotalPot { amount: i64 },
    Unrecognized,
}

/// Parse a chip amount such as `4,921`. Malformed input yields 0.
pub fn parse_chips(raw: &str) -> i64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse::<i64>().unwrap_or(0)
}

pub fn is_hand_start(line: &str) -> bool {
    HAND_START_RE.is_match(line.trim())
}

fn first_amount(rest: &str) -> i64 {
    AMOUNT_RE
        .find(rest)
        .map(|m| parse_chips(m.as_str()))
        .unwrap_or(0)
}

fn classify_action<'a>(player: &'a str, verb: &str, rest: &str, line: &str) -> Line<'a> {
    let action = match verb {
        "posts" => Action::Post {
            amount: first_amount(rest),
            ante: rest.trim_start().starts_with("ante") || rest.contains(" ante "),
        },
        "bets" => Action::Bet(first_amount(rest)),
        "calls" => Action::Call(first_amount(rest)),
        "all-in" => Action::AllIn(first_amount(rest)),
        "raises" => Action::Raise {
            to: RAISE_TO_RE
                .captures(line)
                .and_then(|c| c.name("to"))
                .map(|m| parse_chips(m.as_str())),
        },
        _ => return Line::Unrecognized,
    };
    Line::Action {
        player: player.trim(),
        action,
    }
}

/// Classify one raw hand-history line.
pub fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Unrecognized;
    }

    if let Some(caps) = HAND_START_RE.captures(line) {
        let hand_id = caps.name("hand_id").map_or("", |m| m.as_str());
        return Line::HandStart(HandHeader {
            hand_id,
            tournament_id: caps.name("tournament_id").map(|m| m.as_str()),
            big_blind: LEVEL_RE
                .captures(line)
                .and_then(|c| c.name("bb"))
                .map(|m| parse_chips(m.as_str())),
            started_at: TIMESTAMP_RE
                .captures(line)
                .and_then(|c| c.name("ts"))
                .map(|m| m.as_str()),
        });
    }

    if let Some(caps) = MARKER_RE.captures(line) {
        return match caps.name("marker").map(|m| m.as_str()) {
            Some("HOLE CARDS") => Line::HoleCards,
            Some("SHOWDOWN") => Line::Showdown,
            Some("SUMMARY") => Line::Summary,
            _ => Line::Street,
        };
    }

    if let Some(caps) = TABLE_RE.captures(line) {
        let table_size = caps
            .name("size")
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0);
        return Line::TableInfo { table_size };
    }

    if let Some(caps) = SEAT_RE.captures(line) {
        return Line::Seat {
            player: caps.name("player").map_or("", |m| m.as_str().trim()),
            chips: caps.name("chips").map_or(0, |m| parse_chips(m.as_str())),
        };
    }

    if let Some(caps) = UNCALLED_RE.captures(line) {
        return Line::UncalledBet {
            player: caps.name("player").map_or("", |m| m.as_str().trim()),
            amount: caps.name("amount").map_or(0, |m| parse_chips(m.as_str())),
        };
    }

    if let Some(caps) = ACTION_RE.captures(line) {
        let player = caps.name("player").map_or("", |m| m.as_str());
        let verb = caps.name("action").map_or("", |m| m.as_str());
        let rest = caps.name("rest").map_or("", |m| m.as_str());
        return classify_action(player, verb, rest, line);
    }

    if let Some(caps) = COLLECTED_RE.captures(line) {
        return Line::Collected {
            player: caps.name("player").map_or("", |m| m.as_str().trim()),
            amount: caps.name("amount").map_or(0, |m| parse_chips(m.as_str())),
        };
    }

    if let Some(caps) = TOTAL_POT_RE.captures(line) {
        return Line::TotalPot {
            amount: caps.name("amount").map_or(0, |m| parse_chips(m.as_str())),
        };
    }

    Line::Unrecognized
}
