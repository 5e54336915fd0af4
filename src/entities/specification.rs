//! Specification record - one section of the project manual

use serde::{Deserialize, Serialize};

use crate::core::entity::Record;
use crate::core::identity::EntityKind;

/// A normalized specification section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    pub id: i64,

    pub number: String,

    #[serde(default)]
    pub title: String,

    /// Division taxonomy id
    #[serde(default, rename = "divisionId", skip_serializing_if = "Option::is_none")]
    pub division_id: Option<String>,
}

impl Record for Specification {
    const KIND: EntityKind = EntityKind::Specification;

    fn id(&self) -> i64 {
        self.id
    }

    fn number(&self) -> &str {
        &self.number
    }

    fn title(&self) -> &str {
        &self.title
    }
}
