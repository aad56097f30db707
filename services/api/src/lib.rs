//! Backend client for the salon booking service
//!
//! A single [`HttpClient`] carries the session's bearer token to every call;
//! repositories wrap the endpoints with typed payloads.

pub mod client;
pub mod error;
pub mod models;
pub mod repositories;
pub mod sequencing;
pub mod state;

pub use client::HttpClient;
pub use error::{ApiError, ApiResult};
pub use state::ApiState;
