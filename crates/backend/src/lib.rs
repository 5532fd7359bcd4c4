#![forbid(unsafe_code)]

pub mod api;
pub mod http;

pub use api::{ApiError, AssessmentApi, InMemoryBackend};
pub use http::{BackendConfig, HttpBackend};
