//! Domain Layer - configuration and API payloads, no I/O

pub mod config;
pub mod responses;

pub use config::{UrlScanConfig, DEFAULT_BASE_URL};
pub use responses::{
    ResultLists, ResultResponse, SearchResponse, SearchResult, SubmitRequest, SubmitResponse,
    SUBMISSION_SUCCESSFUL,
};
