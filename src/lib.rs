pub mod app;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod de;
pub mod error;
pub mod fees;
pub mod format;
pub mod page;
pub mod payments;
pub mod routes;
pub mod state;
pub mod storage;
pub mod students;

pub use client::ApiClient;
pub use config::{ApiConfig, AppConfig};
pub use error::{ApiError, ApiResult, FieldErrors};
pub use state::AppState;
