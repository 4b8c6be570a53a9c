//! HTTP client for the material library server.

mod client;

pub use client::{ApiClient, ApiError, DocumentQuery, UploadResponse};
