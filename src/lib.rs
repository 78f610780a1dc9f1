pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod state;

pub use app::router;
pub use config::SheetConfig;
pub use state::AppState;
pub use storage::{load_goals, resolve_data_path};
