pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod stats;
pub mod storage;
pub mod state;

pub use app::router;
pub use normalize::{normalize, parse_reviews, NotParseable};
pub use state::AppState;
pub use storage::{load_reviews, resolve_data_path};
