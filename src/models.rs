use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Link used when a row has no source link.
pub const PLACEHOLDER_LINK: &str = "#";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReview {
    pub date_text: String,
    pub snippet: String,
    pub link: String,
}

impl RawReview {
    pub fn new(date_text: impl Into<String>, snippet: impl Into<String>, link: Option<String>) -> Self {
        let link = link
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_LINK.to_string());
        Self {
            date_text: date_text.into(),
            snippet: snippet.into(),
            link,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
}

impl MonthBucket {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("month must be formatted as YYYY-MM")]
pub struct InvalidMonthLabel;

/// Accepts exactly the labels `Display` produces.
impl FromStr for MonthBucket {
    type Err = InvalidMonthLabel;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(&format!("{label}-01"), "%Y-%m-%d")
            .map_err(|_| InvalidMonthLabel)?;
        let bucket = Self::of(date);
        if bucket.to_string() != label {
            return Err(InvalidMonthLabel);
        }
        Ok(bucket)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReview {
    pub raw: RawReview,
    pub timestamp: NaiveDateTime,
    pub week_bucket: NaiveDate,
    pub month_bucket: MonthBucket,
    pub year: i32,
}

impl ParsedReview {
    pub fn new(raw: RawReview, timestamp: NaiveDateTime) -> Self {
        let date = timestamp.date();
        Self {
            raw,
            timestamp,
            week_bucket: week_start(date),
            month_bucket: MonthBucket::of(date),
            year: date.year(),
        }
    }
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekCount {
    pub bucket_start: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Deserialize, Default)]
pub struct SelectionQuery {
    pub year: Option<i32>,
    pub month: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct YearsResponse {
    pub years: Vec<i32>,
    pub default_year: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthsResponse {
    pub year: Option<i32>,
    pub months: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklyPoint {
    pub bucket_start: String,
    pub week: String,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklyResponse {
    pub year: Option<i32>,
    pub month: Option<String>,
    pub weeks: Vec<WeeklyPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRow {
    pub date: String,
    pub snippet: String,
    pub link: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewsResponse {
    pub total: usize,
    pub rows: Vec<ReviewRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_link_falls_back_to_placeholder() {
        let review = RawReview::new("5 hari lalu", "mantap", Some("   ".to_string()));
        assert_eq!(review.link, PLACEHOLDER_LINK);

        let review = RawReview::new("5 hari lalu", "mantap", None);
        assert_eq!(review.link, PLACEHOLDER_LINK);
    }

    #[test]
    fn parsed_review_derives_buckets() {
        // Thursday
        let ts = NaiveDate::from_ymd_opt(2025, 3, 6)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let parsed = ParsedReview::new(RawReview::new("x", "y", None), ts);
        assert_eq!(parsed.week_bucket, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(parsed.month_bucket.to_string(), "2025-03");
        assert_eq!(parsed.year, 2025);
    }

    #[test]
    fn month_label_parses_only_canonical_form() {
        assert_eq!(
            "2025-03".parse::<MonthBucket>(),
            Ok(MonthBucket { year: 2025, month: 3 })
        );
        for bad in ["2025-3", "2025-13", "2025-03-01", "maret", ""] {
            assert_eq!(bad.parse::<MonthBucket>(), Err(InvalidMonthLabel), "{bad}");
        }
    }

    #[test]
    fn week_start_crosses_year_boundary() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(week_start(date), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
    }
}
