pub mod app;
pub mod celebration;
pub mod checkin;
pub mod config;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod sample;
pub mod state;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod tracker;

pub use app::router;
pub use checkin::{ToggleOutcome, Transition, toggle};
pub use config::Config;
pub use state::AppState;
pub use storage::{LoadedData, load_data, persist_data};
pub use streak::current_streak;
