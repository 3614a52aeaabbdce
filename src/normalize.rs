//! Indonesian relative-date phrases ("3 bulan lalu", "setahun lalu") to
//! absolute timestamps.
//!
//! Matching walks an ordered rule table. The first rule whose keyword occurs in
//! the lower-cased text decides the outcome, even when its count cannot be
//! extracted; later rules are not consulted.

use crate::models::{ParsedReview, RawReview};
use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("date text is not a recognised relative date")]
pub struct NotParseable;

enum Offset {
    /// Idiomatic "a month/year ago" forms with no count.
    Fixed { days: i64 },
    /// `<N> <unit>`; the pattern captures N in ASCII digits.
    Counted { pattern: Regex, days_per_unit: i64 },
}

struct Rule {
    keyword: &'static str,
    offset: Offset,
}

impl Rule {
    fn fixed(keyword: &'static str, days: i64) -> Self {
        Self {
            keyword,
            offset: Offset::Fixed { days },
        }
    }

    fn counted(keyword: &'static str, days_per_unit: i64) -> Self {
        let pattern = Regex::new(&format!(r"([0-9]+)\s+{keyword}"))
            .expect("counted-unit pattern is a valid regex");
        Self {
            keyword,
            offset: Offset::Counted {
                pattern,
                days_per_unit,
            },
        }
    }

    fn matches(&self, text: &str) -> bool {
        text.contains(self.keyword)
    }

    fn offset_days(&self, text: &str) -> Option<i64> {
        match &self.offset {
            Offset::Fixed { days } => Some(*days),
            Offset::Counted {
                pattern,
                days_per_unit,
            } => {
                let caps = pattern.captures(text)?;
                let count: i64 = caps[1].parse().ok()?;
                count.checked_mul(*days_per_unit)
            }
        }
    }
}

// "sebulan" and "setahun" contain "bulan" and "tahun", so the idiomatic
// forms must sit ahead of their counted counterparts.
fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            Rule::fixed("sebulan", 30),
            Rule::counted("bulan", 30),
            Rule::fixed("setahun", 365),
            Rule::counted("tahun", 365),
            Rule::counted("minggu", 7),
            Rule::counted("hari", 1),
        ]
    })
}

/// Resolves `text` to `now` minus the offset it describes.
///
/// A zero offset is rejected so every accepted timestamp lies strictly before
/// `now`.
pub fn normalize(text: &str, now: NaiveDateTime) -> Result<NaiveDateTime, NotParseable> {
    let text = text.to_lowercase();
    let rule = rules()
        .iter()
        .find(|rule| rule.matches(&text))
        .ok_or(NotParseable)?;

    let days = rule.offset_days(&text).ok_or(NotParseable)?;
    if days <= 0 {
        return Err(NotParseable);
    }

    Duration::try_days(days)
        .and_then(|offset| now.checked_sub_signed(offset))
        .ok_or(NotParseable)
}

/// Normalizes every row against the same `now`, dropping the ones that fail.
pub fn parse_reviews(raws: Vec<RawReview>, now: NaiveDateTime) -> Vec<ParsedReview> {
    let total = raws.len();
    let parsed: Vec<ParsedReview> = raws
        .into_iter()
        .filter_map(|raw| match normalize(&raw.date_text, now) {
            Ok(timestamp) => Some(ParsedReview::new(raw, timestamp)),
            Err(NotParseable) => {
                debug!(date_text = %raw.date_text, "dropping row with unparseable date");
                None
            }
        })
        .collect();

    info!(
        parsed = parsed.len(),
        dropped = total - parsed.len(),
        "normalized review dates"
    );
    parsed
}
