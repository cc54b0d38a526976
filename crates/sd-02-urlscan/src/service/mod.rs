//! Service Layer - Orchestration

pub mod urlscan_service;

pub use urlscan_service::{UrlScanService, SERVICE_NAME};
