//! Canonical send record types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default values applied when a raw field is absent or has the wrong type.
pub mod defaults {
    pub const COLOR: &str = "Color";
    pub const GRADE: &str = "V?";
    pub const ATTEMPTS: &str = "?";
    pub const USER_ID: &str = "unknown";
    pub const USER_EMAIL: &str = "unknown@example.com";
}

/// Outcome of a send.
///
/// Anything outside the fixed vocabulary is kept verbatim in
/// [`Status::Unknown`] so that it survives a store round trip.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Onsight,
    Flash,
    Send,
    Projecting,
    Fail,
    Unknown(String),
}

impl Status {
    /// Parse a status label. Matching is exact, as the labels are
    /// produced by a fixed picker.
    pub fn parse(label: &str) -> Self {
        match label {
            "Onsight" => Status::Onsight,
            "Flash" => Status::Flash,
            "Send" => Status::Send,
            "Projecting" => Status::Projecting,
            "Fail" => Status::Fail,
            other => Status::Unknown(other.to_string()),
        }
    }

    /// The label as stored.
    pub fn as_str(&self) -> &str {
        match self {
            Status::Onsight => "Onsight",
            Status::Flash => "Flash",
            Status::Send => "Send",
            Status::Projecting => "Projecting",
            Status::Fail => "Fail",
            Status::Unknown(raw) => raw,
        }
    }

    /// Whether the route was topped out. Only completed sends score.
    pub fn is_completed(&self) -> bool {
        matches!(self, Status::Onsight | Status::Flash | Status::Send)
    }

    /// Short phrase describing the send, as shown next to it in a feed.
    pub fn summary(&self, attempts: &str) -> String {
        match self {
            Status::Onsight => "Onsight! Sent in 1 try.".to_string(),
            Status::Flash => "Flash! Sent in 1 try.".to_string(),
            Status::Send => format!("Sent in {} tries.", attempts),
            Status::Projecting => format!("Projecting... {} tries so far.", attempts),
            Status::Fail => format!("Didn't finish after {} tries.", attempts),
            Status::Unknown(_) => String::new(),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Unknown(String::new())
    }
}

impl From<String> for Status {
    fn from(label: String) -> Self {
        Status::parse(&label)
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized send.
///
/// `grade` and `attempts` stay as the strings the climber picked; they are
/// only interpreted by the scoring code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRecord {
    /// Identifier assigned by the persistence layer.
    pub id: String,
    pub color: String,
    pub grade: String,
    pub status: Status,
    pub attempts: String,
    pub feeling: String,
    pub image_url: String,
    /// Owner of the send. Leaderboards group by this, not by `id`.
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub timestamp: DateTime<Utc>,
    pub is_shared: bool,
}

impl SendRecord {
    /// Label combining hold color and grade, e.g. `"Yellow V4"`.
    pub fn color_grade(&self) -> String {
        format!("{} {}", self.color, self.grade)
    }

    /// Status phrase for this send.
    pub fn summary(&self) -> String {
        self.status.summary(&self.attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_known_labels() {
        assert_eq!(Status::parse("Onsight"), Status::Onsight);
        assert_eq!(Status::parse("Flash"), Status::Flash);
        assert_eq!(Status::parse("Send"), Status::Send);
        assert_eq!(Status::parse("Projecting"), Status::Projecting);
        assert_eq!(Status::parse("Fail"), Status::Fail);
    }

    #[test]
    fn test_status_unknown_keeps_label() {
        let status = Status::parse("send");
        assert_eq!(status, Status::Unknown("send".to_string()));
        assert_eq!(status.as_str(), "send");
        assert!(!status.is_completed());
        assert_eq!(String::from(Status::default()), "");
    }

    #[test]
    fn test_status_serde_as_string() {
        let json = serde_json::to_string(&Status::Flash).unwrap();
        assert_eq!(json, "\"Flash\"");
        let back: Status = serde_json::from_str("\"Top rope\"").unwrap();
        assert_eq!(back, Status::Unknown("Top rope".to_string()));
    }

    #[test]
    fn test_summary_phrases() {
        assert_eq!(Status::Onsight.summary("3"), "Onsight! Sent in 1 try.");
        assert_eq!(Status::Flash.summary("1"), "Flash! Sent in 1 try.");
        assert_eq!(Status::Send.summary("4"), "Sent in 4 tries.");
        assert_eq!(Status::Projecting.summary("10+"), "Projecting... 10+ tries so far.");
        assert_eq!(Status::Fail.summary("2"), "Didn't finish after 2 tries.");
        assert_eq!(Status::default().summary("2"), "");
    }
}
