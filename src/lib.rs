//! Job-seeker portal: accounts, profiles, remote listings matched to a role,
//! and an application funnel, served as HTML pages.

pub mod app;
pub mod applications;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod jobs;
pub mod state;
pub mod storage;
pub mod users;
pub mod views;

pub use app::build_app;
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use state::AppState;
