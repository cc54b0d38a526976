//! # Core Domain Entities
//!
//! Defines the values that flow between discovery services.
//!
//! ## Clusters
//!
//! - **Names**: `Request`, `Tag`
//! - **Resource Records**: `RecordType`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// CLUSTER A: RESOURCE RECORDS
// =============================================================================

/// A DNS resource-record type code (RFC 1035 / RFC 3596).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordType(pub u16);

impl RecordType {
    pub const A: Self = Self(1);
    pub const NS: Self = Self(2);
    pub const CNAME: Self = Self(5);
    pub const SOA: Self = Self(6);
    pub const PTR: Self = Self(12);
    pub const MX: Self = Self(15);
    pub const TXT: Self = Self(16);
    pub const AAAA: Self = Self(28);
    pub const SRV: Self = Self(33);

    /// Get the raw type code.
    #[must_use]
    pub fn code(self) -> u16 {
        self.0
    }

    /// Get the mnemonic, if this is a type the engine knows by name.
    #[must_use]
    pub fn mnemonic(self) -> Option<&'static str> {
        let name = match self {
            Self::A => "A",
            Self::NS => "NS",
            Self::CNAME => "CNAME",
            Self::SOA => "SOA",
            Self::PTR => "PTR",
            Self::MX => "MX",
            Self::TXT => "TXT",
            Self::AAAA => "AAAA",
            Self::SRV => "SRV",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(name) => f.write_str(name),
            None => write!(f, "TYPE{}", self.0),
        }
    }
}

/// Error returned when a record type mnemonic cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown record type: {0}")]
pub struct UnknownRecordType(pub String);

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let rt = match upper.as_str() {
            "A" => Self::A,
            "NS" => Self::NS,
            "CNAME" => Self::CNAME,
            "SOA" => Self::SOA,
            "PTR" => Self::PTR,
            "MX" => Self::MX,
            "TXT" => Self::TXT,
            "AAAA" => Self::AAAA,
            "SRV" => Self::SRV,
            other => match other.strip_prefix("TYPE").and_then(|n| n.parse().ok()) {
                Some(code) => Self(code),
                None => return Err(UnknownRecordType(s.to_string())),
            },
        };
        Ok(rt)
    }
}

// =============================================================================
// CLUSTER B: NAMES
// =============================================================================

/// Provenance of a discovered name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// Name answered by the resolution pipeline.
    Resolved,
    /// Name synthesized from other names (alterations, Markov guesses).
    Altered,
    /// Name produced by brute forcing a wordlist.
    Brute,
    /// Name returned by a third-party API.
    Api,
    /// Anything else.
    #[default]
    Other,
}

impl Tag {
    /// Get the wire name of this tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::Altered => "altered",
            Self::Brute => "brute",
            Self::Api => "api",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discovered DNS name, or one waiting to be processed.
///
/// Immutable once published on the bus; whoever reads it off the bus owns it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Request {
    /// Fully qualified name, without a trailing dot.
    pub name: String,
    /// The registrable domain this name belongs to.
    pub domain: String,
    /// How the name was produced.
    pub tag: Tag,
    /// Identifier of the producing service.
    pub source: String,
    /// Resource-record types observed for this name.
    pub records: Vec<RecordType>,
}

impl Request {
    /// Create a request for `name` under `domain`.
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            ..Self::default()
        }
    }

    /// Builder-style method to set the provenance tag.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    /// Builder-style method to set the producing service.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Builder-style method to set the observed record types.
    #[must_use]
    pub fn with_records(mut self, records: Vec<RecordType>) -> Self {
        self.records = records;
        self
    }

    /// Check whether any observed record type is in `wanted`.
    #[must_use]
    pub fn has_any_record(&self, wanted: &[RecordType]) -> bool {
        self.records.iter().any(|rt| wanted.contains(rt))
    }
}
