// src/api/mod.rs
// HTTP surface: error mapping, owner extraction, routes

pub mod error;
pub mod extract;
pub mod http;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, ApiQuery, OWNER_HEADER};
pub use http::router::build_app;
