use crate::models::ParsedReview;
use std::sync::Arc;

/// Normalized reviews, loaded once and shared read-only across requests.
#[derive(Clone)]
pub struct AppState {
    pub reviews: Arc<[ParsedReview]>,
}

impl AppState {
    pub fn new(reviews: Vec<ParsedReview>) -> Self {
        Self {
            reviews: reviews.into(),
        }
    }

    /// Latest year present in the dataset.
    pub fn default_year(&self) -> Option<i32> {
        self.reviews.iter().map(|review| review.year).max()
    }
}
