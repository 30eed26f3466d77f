//! Blog Engine: Operation Journal
//!
//! Every successful state change is recorded as an event. Events are
//! pure data and carry derived credentials only, never passwords.
//!
//! Sequences start at 1 and increase by exactly one per event.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credential::Credential;
use crate::domain::{PostId, UserId};

/// Schema version of journal entries produced by this crate.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case", deny_unknown_fields)]
pub enum BlogEvent {
    UserRegistered {
        user_id: UserId,
        username: String,
        credential: Credential,
    },
    LoggedIn {
        user_id: UserId,
    },
    LoggedOut,
    PostCreated {
        post_id: PostId,
        author: UserId,
        title: String,
        body: String,
    },
    /// Carries the post's fields after the edit, not the edit instructions.
    PostEdited {
        post_id: PostId,
        title: String,
        body: String,
    },
    PostDeleted {
        post_id: PostId,
    },
}

impl BlogEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => "user_registered",
            Self::LoggedIn { .. } => "logged_in",
            Self::LoggedOut => "logged_out",
            Self::PostCreated { .. } => "post_created",
            Self::PostEdited { .. } => "post_edited",
            Self::PostDeleted { .. } => "post_deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventEnvelope {
    pub schema_version: u32,
    pub sequence: u64,
    pub event: BlogEvent,
}

impl EventEnvelope {
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "schema_version": self.schema_version,
            "sequence": self.sequence,
            "event": self.event,
        })
    }

    pub fn from_value(v: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(v)
    }
}

/// Append-only, in-memory event list.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Vec<EventEnvelope>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `event` with the next sequence and append it.
    pub fn record(&mut self, event: BlogEvent) -> &EventEnvelope {
        let envelope = EventEnvelope {
            schema_version: SCHEMA_VERSION,
            sequence: self.last_sequence() + 1,
            event,
        };
        self.push(envelope)
    }

    /// Append an already stamped envelope. The caller checks the sequence.
    pub(crate) fn push(&mut self, envelope: EventEnvelope) -> &EventEnvelope {
        self.entries.push(envelope);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[EventEnvelope] {
        &self.entries
    }

    pub fn last_sequence(&self) -> u64 {
        self.entries.last().map(|e| e.sequence).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
