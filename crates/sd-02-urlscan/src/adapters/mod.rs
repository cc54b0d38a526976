//! Adapters Layer (Driven Adapters)
//!
//! - `ReqwestWebClient` - live HTTP access via reqwest

pub mod http;

pub use http::ReqwestWebClient;
