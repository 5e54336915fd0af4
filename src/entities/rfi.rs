//! RFI record - request for information

use serde::{Deserialize, Serialize};

use crate::core::entity::Record;
use crate::core::identity::EntityKind;

/// A normalized RFI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rfi {
    pub id: i64,

    pub number: String,

    #[serde(default)]
    pub subject: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Party currently responsible for the next action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball_in_court: Option<String>,
}

impl Rfi {
    pub fn new(id: i64, number: impl Into<String>, subject: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id,
            number: number.into(),
            subject: subject.into(),
            status: status.into(),
            created_at: String::new(),
            due_date: None,
            assignee: None,
            ball_in_court: None,
        }
    }

    /// Whether the RFI is still awaiting a response
    pub fn is_open(&self) -> bool {
        !matches!(
            self.status.to_lowercase().as_str(),
            "closed" | "void" | "voided"
        )
    }
}

impl Record for Rfi {
    const KIND: EntityKind = EntityKind::Rfi;

    fn id(&self) -> i64 {
        self.id
    }

    fn number(&self) -> &str {
        &self.number
    }

    fn title(&self) -> &str {
        &self.subject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_open() {
        assert!(Rfi::new(1, "1", "Beam size", "open").is_open());
        assert!(Rfi::new(2, "2", "Door hardware", "draft").is_open());
        assert!(!Rfi::new(3, "3", "Slab edge", "Closed").is_open());
    }
}
