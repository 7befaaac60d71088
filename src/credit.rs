//! Credit balance sync with a host application.
//!
//! Independent of generation: a host pushes JSON messages, and a few URLs
//! may carry the balance as a query parameter. One task folds both into a
//! balance published on a `watch` channel.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// `type` of the current sync message.
pub const SYNC_MESSAGE_TYPE: &str = "SYNC_CREDIT";

/// `source` the host application stamps on sync messages.
pub const PARENT_APP_ID: &str = "AI_STUDIO_PARENT";

static CREDIT_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[?&#]|^)(_?credit)=(\d+)").expect("credit pattern is valid")
});

/// A credit update received from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditMessage {
    /// `{type: "SYNC_CREDIT", source: "AI_STUDIO_PARENT", credit}`. Any integer.
    Sync(i64),
    /// Older `{_credit}` or `{credit}` shapes. Always positive.
    Legacy(i64),
}

impl CreditMessage {
    /// The balance carried by the message.
    #[must_use]
    pub fn credit(self) -> i64 {
        match self {
            Self::Sync(credit) | Self::Legacy(credit) => credit,
        }
    }

    /// Interpret a decoded JSON message; `None` if it carries no usable balance.
    #[must_use]
    pub fn parse(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let is_sync = object.get("type").and_then(Value::as_str) == Some(SYNC_MESSAGE_TYPE)
            && object.get("source").and_then(Value::as_str) == Some(PARENT_APP_ID);
        if is_sync {
            if let Some(credit) = object.get("credit").and_then(parse_int) {
                return Some(Self::Sync(credit));
            }
        }

        let legacy = object
            .get("_credit")
            .filter(|v| is_truthy(v))
            .or_else(|| object.get("credit").filter(|v| is_truthy(v)))?;
        parse_int(legacy).filter(|credit| *credit > 0).map(Self::Legacy)
    }

    /// Parse a raw JSON message.
    #[must_use]
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str::<Value>(raw).ok().as_ref().and_then(Self::parse)
    }
}

/// Leading-integer parse of a number or numeric string (`"42abc"` is 42).
#[allow(clippy::cast_possible_truncation)]
fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        Value::String(s) => {
            let s = s.trim_start();
            let (sign, digits) = match s.as_bytes().first() {
                Some(b'-') => (-1, &s[1..]),
                Some(b'+') => (1, &s[1..]),
                _ => (1, s),
            };
            let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|n| sign * n)
        }
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Find a positive `credit=` / `_credit=` parameter in a URL-ish string.
///
/// Looks at the raw text first, then at percent-decoded query and fragment
/// values, so a balance inside an encoded redirect URL is still found.
#[must_use]
pub fn extract_credit_from_url(source: &str) -> Option<u64> {
    if source.is_empty() {
        return None;
    }
    if let Some(credit) = match_credit(source) {
        return Some(credit);
    }
    source
        .split(['?', '#'])
        .skip(1)
        .flat_map(|segment| url::form_urlencoded::parse(segment.as_bytes()))
        .find_map(|(key, value)| {
            let is_credit_key =
                key.eq_ignore_ascii_case("credit") || key.eq_ignore_ascii_case("_credit");
            if is_credit_key {
                value.parse::<u64>().ok().filter(|n| *n > 0)
            } else {
                match_credit(&value)
            }
        })
}

fn match_credit(text: &str) -> Option<u64> {
    let captures = CREDIT_PARAM.captures(text)?;
    captures[2].parse::<u64>().ok().filter(|n| *n > 0)
}

/// First positive balance found across `sources`, in order.
#[must_use]
pub fn scan_sources(sources: &[String]) -> Option<u64> {
    sources.iter().find_map(|s| extract_credit_from_url(s))
}

/// Start the credit subscriber.
///
/// Every `period` the `sources` are scanned; every message on `messages` is
/// applied as it arrives. The task ends when `messages` closes, which also
/// closes the returned balance channel.
#[must_use]
pub fn spawn_credit_sync(
    mut messages: mpsc::Receiver<String>,
    sources: Vec<String>,
    period: Duration,
) -> (watch::Receiver<i64>, JoinHandle<()>) {
    let (balance, receiver) = watch::channel(0_i64);

    let handle = tokio::spawn(async move {
        // Scan once before waiting on anything; the first tick comes a full period later.
        scan_and_publish(&sources, &balance);
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = ticker.tick() => scan_and_publish(&sources, &balance),
                message = messages.recv() => match message {
                    Some(raw) => match CreditMessage::from_json(&raw) {
                        Some(message) => {
                            tracing::debug!(?message, "credit message");
                            publish(&balance, message.credit());
                        }
                        None => tracing::debug!(raw = %raw, "ignored credit message"),
                    },
                    None => break,
                },
            }
        }
    });

    (receiver, handle)
}

fn scan_and_publish(sources: &[String], balance: &watch::Sender<i64>) {
    if let Some(credit) = scan_sources(sources) {
        publish(balance, i64::try_from(credit).unwrap_or(i64::MAX));
    }
}

fn publish(balance: &watch::Sender<i64>, credit: i64) {
    balance.send_if_modified(|current| {
        if *current == credit {
            return false;
        }
        *current = credit;
        true
    });
}
