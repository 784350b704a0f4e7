use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A participant imported from the CSV list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub note: String,
    pub code: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, note: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            note: note.into(),
            code: code.into(),
        }
    }
}

/// One winner with the prize assigned in a draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub timestamp: DateTime<Utc>,
    pub winner: Participant,
    pub prize: String,
}

impl DrawRecord {
    pub fn new(winner: Participant, prize: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            winner,
            prize: prize.into(),
        }
    }
}
