//! Error types for the URLScan data source

use thiserror::Error;

/// Errors returned by a [`crate::ports::WebClient`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("404 Not Found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("Connection failed: {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Failed to read response body: {url}: {message}")]
    Body { url: String, message: String },

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Errors from URLScan configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlScanError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid configuration: {0}")]
    InvalidParameters(String),
}
