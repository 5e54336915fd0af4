//! Commitment record - subcontracts and purchase orders

use serde::{Deserialize, Serialize};

use crate::core::entity::Record;
use crate::core::identity::EntityKind;

/// A normalized commitment
///
/// Amounts stay `None` when the source did not carry them. `Some(0.0)` is a
/// real value meaning "no cost"; `None` means "unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commitment {
    pub id: i64,

    pub number: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_date: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub commitment_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_amount: Option<f64>,
}

impl Commitment {
    pub fn new(id: i64, number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            number: number.into(),
            title: title.into(),
            vendor: None,
            vendor_name: None,
            status: None,
            contract_date: None,
            commitment_type: None,
            approved_amount: None,
            pending_amount: None,
            draft_amount: None,
        }
    }

    /// Vendor to display, preferring the resolved vendor object name
    pub fn display_vendor(&self) -> Option<&str> {
        self.vendor.as_deref().or(self.vendor_name.as_deref())
    }
}

impl Record for Commitment {
    const KIND: EntityKind = EntityKind::Commitment;

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
