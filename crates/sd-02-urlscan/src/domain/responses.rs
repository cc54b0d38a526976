//! URLScan API payloads
//!
//! Only the fields this source reads are modelled; everything else in the
//! responses is ignored.

use serde::{Deserialize, Serialize};

/// `GET search/?q=domain:D`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub total: u64,
}

/// One past scan in a search response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "_id")]
    pub id: String,
}

/// `POST scan/` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitRequest<'a> {
    pub url: &'a str,
    pub public: &'a str,
    pub customagent: &'a str,
}

impl<'a> SubmitRequest<'a> {
    /// A public scan of `domain`.
    pub fn public(domain: &'a str, user_agent: &'a str) -> Self {
        Self {
            url: domain,
            public: "on",
            customagent: user_agent,
        }
    }
}

/// Message URLScan returns when a submission was accepted.
pub const SUBMISSION_SUCCESSFUL: &str = "Submission successful";

/// `POST scan/` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "uuid", default)]
    pub id: String,
    #[serde(default)]
    pub api: String,
}

impl SubmitResponse {
    /// Whether the scan was queued.
    pub fn accepted(&self) -> bool {
        self.message == SUBMISSION_SUCCESSFUL && !self.id.is_empty()
    }
}

/// `GET result/{id}/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResultResponse {
    #[serde(default)]
    pub lists: ResultLists,
}

/// Aggregated lists of a scan result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResultLists {
    #[serde(default)]
    pub ips: Vec<String>,
    #[serde(rename = "linkDomains", default)]
    pub link_domains: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let body = r#"{"results":[{"_id":"a1","page":{"domain":"x"}},{"_id":"b2"}],"total":2,"took":5}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.total, 2);
        assert_eq!(parsed.results[1].id, "b2");
    }

    #[test]
    fn test_parse_result_lists() {
        let body = r#"{"lists":{"ips":["1.2.3.4"],"linkDomains":["a.example.com","b.example.com"]},"page":{}}"#;
        let parsed: ResultResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.lists.link_domains, vec!["a.example.com", "b.example.com"]);
        assert_eq!(parsed.lists.ips.len(), 1);
    }

    #[test]
    fn test_submission_acceptance() {
        let body = r#"{"message":"Submission successful","uuid":"u-1","api":"https://urlscan.io/api/v1/result/u-1/"}"#;
        let parsed: SubmitResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.accepted());

        let rejected: SubmitResponse = serde_json::from_str(r#"{"message":"DNS Error"}"#).unwrap();
        assert!(!rejected.accepted());
    }

    #[test]
    fn test_submit_body() {
        let body = serde_json::to_value(SubmitRequest::public("example.com", "subscout/0.1")).unwrap();
        assert_eq!(body["url"], "example.com");
        assert_eq!(body["public"], "on");
        assert_eq!(body["customagent"], "subscout/0.1");
    }
}
