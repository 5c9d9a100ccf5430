pub mod aging;
pub mod app;
pub mod auth;
pub mod board;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod pageviews;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
