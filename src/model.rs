// Shared data shapes: what we persist locally, what we send to the scoring
// server and what it sends back.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// The locally cached result of a successful registration. Stored as
/// `settings.json` inside the marker folder.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantRecord {
    /// Server-assigned participant id; empty until registration succeeds.
    pub user_id: String,
    pub name: String,
    pub course: String,
}

impl ParticipantRecord {
    pub fn new(name: impl Into<String>, course: impl Into<String>) -> Self {
        ParticipantRecord {
            user_id: String::new(),
            name: name.into(),
            course: course.into(),
        }
    }
}

/// Payload of `POST /Register/<token>`.
#[derive(Serialize, Debug)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub course: &'a str,
}

impl<'a> From<&'a ParticipantRecord> for RegisterRequest<'a> {
    fn from(record: &'a ParticipantRecord) -> Self {
        RegisterRequest {
            name: &record.name,
            course: &record.course,
        }
    }
}

/// Body of a successful registration response.
#[derive(Deserialize, Debug)]
pub struct RegisterResponse {
    pub uid: String,
}

/// Payload of `POST /Submit/<token>`. Built per submission, never stored.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FlagSubmission {
    pub flag: String,
    pub user_id: String,
}

/// One row of the scoreboard as returned by `GET /score`.
///
/// Older server builds named the timestamp `registered_at`; both spellings
/// are accepted. Every field tolerates `null` and numbers so that one odd
/// row does not void the whole board.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ScoreboardEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub course: String,
    #[serde(deserialize_with = "lenient_string")]
    pub points: String,
    #[serde(alias = "registered_at", deserialize_with = "lenient_string")]
    pub last_submit_at: String,
}

impl ScoreboardEntry {
    /// Parse `last_submit_at` as an RFC 3339 timestamp.
    pub fn last_submission(&self) -> Result<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.last_submit_at)
            .with_context(|| format!("Invalid submission time {:?} for {}", self.last_submit_at, self.name))
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
