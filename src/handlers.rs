use crate::errors::AppError;
use crate::models::{
    MonthBucket, MonthsResponse, ReviewsResponse, SelectionQuery, WeeklyResponse, YearsResponse,
};
use crate::state::AppState;
use crate::stats::{
    aggregate, filter_reviews, month_options, review_rows, to_weekly_points, year_options,
    DISPLAY_LIMIT,
};
use axum::{
    extract::{Query, State},
    Json,
};

pub async fn get_years(State(state): State<AppState>) -> Json<YearsResponse> {
    Json(YearsResponse {
        years: year_options(&state.reviews),
        default_year: state.default_year(),
    })
}

pub async fn get_months(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Json<MonthsResponse> {
    let year = query.year.or_else(|| state.default_year());
    let months = year
        .map(|year| month_options(&state.reviews, year))
        .unwrap_or_default();

    Json(MonthsResponse { year, months })
}

pub async fn get_weekly(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<WeeklyResponse>, AppError> {
    let month = selected_month(&query)?;
    let year = query.year.or_else(|| state.default_year());
    let weeks = year
        .map(|year| aggregate(&state.reviews, year, month.as_deref()))
        .unwrap_or_default();

    Ok(Json(WeeklyResponse {
        year,
        month,
        weeks: to_weekly_points(&weeks),
    }))
}

pub async fn get_reviews(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<ReviewsResponse>, AppError> {
    let month = selected_month(&query)?;
    let limit = query.limit.unwrap_or(DISPLAY_LIMIT).clamp(1, DISPLAY_LIMIT);

    let Some(year) = query.year.or_else(|| state.default_year()) else {
        return Ok(Json(ReviewsResponse {
            total: 0,
            rows: Vec::new(),
        }));
    };

    Ok(Json(ReviewsResponse {
        total: filter_reviews(&state.reviews, year, month.as_deref()).count(),
        rows: review_rows(&state.reviews, year, month.as_deref(), limit),
    }))
}

/// Month selection as a `YYYY-MM` label; blank means "whole year".
fn selected_month(query: &SelectionQuery) -> Result<Option<String>, AppError> {
    let Some(month) = query.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) else {
        return Ok(None);
    };

    month
        .parse::<MonthBucket>()
        .map_err(|err| AppError::bad_request(err.to_string()))?;
    Ok(Some(month.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(month: Option<&str>) -> SelectionQuery {
        SelectionQuery {
            month: month.map(str::to_string),
            ..SelectionQuery::default()
        }
    }

    #[test]
    fn month_selection_accepts_labels_and_blank() {
        assert_eq!(selected_month(&query(Some("2025-03"))).unwrap().as_deref(), Some("2025-03"));
        assert_eq!(selected_month(&query(Some(" "))).unwrap(), None);
        assert_eq!(selected_month(&query(None)).unwrap(), None);
    }

    #[test]
    fn month_selection_rejects_malformed_labels() {
        for bad in ["2025-13", "2025-3", "maret", "2025-03-01"] {
            let err = selected_month(&query(Some(bad))).unwrap_err();
            assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        }
    }
}
