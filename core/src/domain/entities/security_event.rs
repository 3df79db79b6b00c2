//! Security event entity recorded for verification attempts and maintenance runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// Kinds of security events emitted by the verification flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventKind {
    VerificationFailure,
    VerificationSuccess,
    VerificationLocked,
    VerificationCodeIssued,
    CleanupRun,
}

impl SecurityEventKind {
    /// Convert to string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VerificationFailure => "verification_failure",
            Self::VerificationSuccess => "verification_success",
            Self::VerificationLocked => "verification_locked",
            Self::VerificationCodeIssued => "verification_code_issued",
            Self::CleanupRun => "cleanup_run",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "verification_failure" => Some(Self::VerificationFailure),
            "verification_success" => Some(Self::VerificationSuccess),
            "verification_locked" => Some(Self::VerificationLocked),
            "verification_code_issued" => Some(Self::VerificationCodeIssued),
            "cleanup_run" => Some(Self::CleanupRun),
            _ => None,
        }
    }
}

impl std::fmt::Display for SecurityEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An append-only audit entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityEvent {
    /// Unique identifier for the event
    pub id: Uuid,

    /// What happened
    pub kind: SecurityEventKind,

    /// Email address the event concerns, if any
    pub email: Option<String>,

    /// Client IP address
    pub ip_address: Option<String>,

    /// Client user agent
    pub user_agent: Option<String>,

    /// Open attribute bag (attempt counts, cleanup totals, ...)
    pub metadata: JsonValue,

    /// When the event was recorded
    pub created_at: DateTime<Utc>,
}

impl SecurityEvent {
    /// Creates a new event with an empty metadata object
    pub fn new(kind: SecurityEventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            email: None,
            ip_address: None,
            user_agent: None,
            metadata: JsonValue::Object(Map::new()),
            created_at: Utc::now(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_request_context(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }

    /// Adds one metadata attribute
    pub fn with_metadata(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        if let JsonValue::Object(map) = &mut self.metadata {
            map.insert(key.to_string(), value.into());
        }
        self
    }

    /// Reads one metadata attribute
    pub fn metadata_value(&self, key: &str) -> Option<&JsonValue> {
        self.metadata.get(key)
    }
}
