//! Rule-based intent classification.
//!
//! Rules are tried in a fixed order and the first match wins. Everything runs on a
//! trimmed, lower-cased copy of the message, so captured arguments are lower-case too.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::model::Intent;

static WEATHER_PREPOSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"weather (?:in|at|for)\s+([\p{L}\s\-]+)\??").expect("valid regex"));

static WHO_WHAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:who|what)\s+(?:is|was)\s+(.+?)\??$").expect("valid regex"));

static DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^define\s+(.+?)\??$").expect("valid regex"));

static TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:time|what's the time|current time)").expect("valid regex"));

pub fn classify(message: &str) -> Intent {
    let m = message.trim().to_lowercase();

    let intent = match WEATHER_PREPOSITION.captures(&m) {
        // A matched preposition with a blank city ends as chat; the looser
        // rules below only run when the preposition form did not match at all.
        Some(caps) => group(&caps).map(Intent::Weather).unwrap_or(Intent::Chat),
        None => weather_prefix(&m)
            .or_else(|| capture(&WHO_WHAT, &m).map(Intent::Encyclopedia))
            .or_else(|| capture(&DEFINE, &m).map(Intent::Encyclopedia))
            .or_else(|| TIME.is_match(&m).then_some(Intent::Time))
            .unwrap_or(Intent::Chat),
    };

    tracing::debug!(?intent, "classified message");
    intent
}

fn weather_prefix(m: &str) -> Option<Intent> {
    let rest = m.strip_prefix("weather ")?.trim();
    (!rest.is_empty()).then(|| Intent::Weather(rest.to_string()))
}

fn capture(re: &Regex, m: &str) -> Option<String> {
    group(&re.captures(m)?)
}

/// First capture group, trimmed; `None` when it is missing or blank.
fn group(caps: &Captures<'_>) -> Option<String> {
    let arg = caps.get(1)?.as_str().trim();
    (!arg.is_empty()).then(|| arg.to_string())
}
