//! # Discovery Events
//!
//! Defines all event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::Request;
use std::fmt;

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DiscoveryEvent {
    /// A name was resolved by the resolution pipeline.
    /// Consumed by services that learn from live names (Markov).
    NameResolved(Request),

    /// A service discovered or synthesized a candidate name.
    /// Consumed by the resolution pipeline.
    NewName(Request),

    /// Liveness heartbeat from a service that is doing work.
    SetActive {
        /// Name of the busy service.
        source: String,
    },

    /// Human-readable status or error line.
    Log {
        /// Name of the reporting service.
        source: String,
        /// The message.
        message: String,
    },
}

impl DiscoveryEvent {
    /// Create a log event.
    pub fn log(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Log {
            source: source.into(),
            message: message.into(),
        }
    }

    /// Create a heartbeat event.
    pub fn set_active(source: impl Into<String>) -> Self {
        Self::SetActive {
            source: source.into(),
        }
    }

    /// Get the topic for this event.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::NameResolved(_) => EventTopic::NameResolved,
            Self::NewName(_) => EventTopic::NewName,
            Self::SetActive { .. } => EventTopic::SetActive,
            Self::Log { .. } => EventTopic::Log,
        }
    }

    /// Get the originating service.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::NameResolved(req) | Self::NewName(req) => &req.source,
            Self::SetActive { source } | Self::Log { source, .. } => source,
        }
    }
}

/// Named channels on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// "name-resolved"
    NameResolved,
    /// "new-name"
    NewName,
    /// "set-active"
    SetActive,
    /// "log"
    Log,
}

impl EventTopic {
    /// Get the channel name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameResolved => "name-resolved",
            Self::NewName => "new-name",
            Self::SetActive => "set-active",
            Self::Log => "log",
        }
    }
}

impl fmt::Display for EventTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch priority of a publish.
///
/// Only affects ordering for a backlogged subscriber. Never causes drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Normal,
}

impl Priority {
    /// Queue slot used by subscriber dispatchers (0 is served first).
    pub(crate) fn slot(self) -> usize {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Normal => 2,
        }
    }
}
