//! HTTP networking module
//!
//! Provides HTTP client functionality for calling search APIs.

mod client;

pub use client::{ApiRequest, ApiResponse, HttpClient};
