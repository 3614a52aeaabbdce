use crate::models::{MonthBucket, ParsedReview, ReviewRow, WeekCount, WeeklyPoint};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

/// Upper bound on rows returned for the review listing.
pub const DISPLAY_LIMIT: usize = 50;

/// Rows in `year`, narrowed to the `month` label (`YYYY-MM`) when one is given.
/// An empty label selects the whole year; a malformed one selects nothing.
pub fn filter_reviews<'a>(
    reviews: &'a [ParsedReview],
    year: i32,
    month: Option<&str>,
) -> impl Iterator<Item = &'a ParsedReview> + use<'a> {
    let month: Option<Option<MonthBucket>> = month
        .filter(|label| !label.is_empty())
        .map(|label| label.parse().ok());
    reviews.iter().filter(move |review| {
        review.year == year && month.is_none_or(|selected| selected == Some(review.month_bucket))
    })
}

/// Weekly review counts for the selection, ascending by week start.
/// Weeks without reviews are omitted.
pub fn aggregate(reviews: &[ParsedReview], year: i32, month: Option<&str>) -> Vec<WeekCount> {
    let mut weeks: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for review in filter_reviews(reviews, year, month) {
        let count = weeks.entry(review.week_bucket).or_default();
        *count = count.saturating_add(1);
    }

    weeks
        .into_iter()
        .map(|(bucket_start, count)| WeekCount {
            bucket_start,
            count,
        })
        .collect()
}

pub fn month_options(reviews: &[ParsedReview], year: i32) -> Vec<String> {
    reviews
        .iter()
        .filter(|review| review.year == year)
        .map(|review| review.month_bucket)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|bucket| bucket.to_string())
        .collect()
}

pub fn year_options(reviews: &[ParsedReview]) -> Vec<i32> {
    reviews
        .iter()
        .map(|review| review.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Listing rows for the selection, newest first, at most `limit` of them.
pub fn review_rows(
    reviews: &[ParsedReview],
    year: i32,
    month: Option<&str>,
    limit: usize,
) -> Vec<ReviewRow> {
    let mut selected: Vec<&ParsedReview> = filter_reviews(reviews, year, month).collect();
    selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    selected
        .into_iter()
        .take(limit)
        .map(|review| ReviewRow {
            date: date_key(review.timestamp.date()),
            snippet: review.raw.snippet.clone(),
            link: format!("[Klik Link]({})", review.raw.link),
        })
        .collect()
}

pub fn to_weekly_points(weeks: &[WeekCount]) -> Vec<WeeklyPoint> {
    weeks
        .iter()
        .map(|week| WeeklyPoint {
            bucket_start: date_key(week.bucket_start),
            week: week_label(week.bucket_start),
            count: week.count,
        })
        .collect()
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
