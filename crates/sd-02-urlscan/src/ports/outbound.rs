//! Outbound Ports (Driven Ports)
//!
//! The HTTP access URLScan queries go through.

use crate::error::FetchError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// Minimal HTTP client (Driven Port)
///
/// Bodies are returned as text; any non-success status is an error, with
/// 404 reported as [`FetchError::NotFound`].
#[async_trait]
pub trait WebClient: Send + Sync {
    /// `GET url`.
    async fn get(&self, url: &str) -> Result<String, FetchError>;

    /// `POST url` with a JSON body and extra headers.
    async fn post_json(
        &self,
        url: &str,
        body: &str,
        headers: &[(&str, &str)],
    ) -> Result<String, FetchError>;
}

/// A recorded call on a [`MockWebClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

/// Scripted in-memory client.
///
/// Each URL has a queue of responses; the last one repeats once the queue
/// is down to a single entry. Unscripted URLs answer 404.
#[derive(Debug, Default)]
pub struct MockWebClient {
    responses: Mutex<HashMap<(&'static str, String), VecDeque<Result<String, FetchError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockWebClient {
    /// Create a client with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `GET url`.
    pub fn on_get(&self, url: impl Into<String>, response: Result<String, FetchError>) -> &Self {
        self.script("GET", url.into(), response)
    }

    /// Queue a response for `POST url`.
    pub fn on_post(&self, url: impl Into<String>, response: Result<String, FetchError>) -> &Self {
        self.script("POST", url.into(), response)
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of calls made to `url` with `method`.
    pub fn count(&self, method: &str, url: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method && c.url == url)
            .count()
    }

    fn script(&self, method: &'static str, url: String, response: Result<String, FetchError>) -> &Self {
        self.responses
            .lock()
            .entry((method, url))
            .or_default()
            .push_back(response);
        self
    }

    fn respond(&self, call: RecordedCall) -> Result<String, FetchError> {
        let key = (call.method, call.url.clone());
        self.calls.lock().push(call);

        let mut responses = self.responses.lock();
        match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(|| not_found(&key.1)),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| not_found(&key.1)),
            None => not_found(&key.1),
        }
    }
}

fn not_found(url: &str) -> Result<String, FetchError> {
    Err(FetchError::NotFound {
        url: url.to_string(),
    })
}

#[async_trait]
impl WebClient for MockWebClient {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.respond(RecordedCall {
            method: "GET",
            url: url.to_string(),
            body: None,
            headers: Vec::new(),
        })
    }

    async fn post_json(
        &self,
        url: &str,
        body: &str,
        headers: &[(&str, &str)],
    ) -> Result<String, FetchError> {
        self.respond(RecordedCall {
            method: "POST",
            url: url.to_string(),
            body: Some(body.to_string()),
            headers: headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        })
    }
}
