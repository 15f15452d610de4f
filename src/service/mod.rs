//! Service orchestration: application state and the HTTP trigger surface

pub mod app;
pub mod http;

pub use app::AppState;
pub use http::{create_router, serve};
