//! Ports Layer
//!
//! Defines the driven ports (outbound dependencies) of the data source.

pub mod outbound;

pub use outbound::{MockWebClient, RecordedCall, WebClient};
