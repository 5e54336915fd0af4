//! Record trait - common interface for all cached record types

use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::EntityKind;

/// Common trait for every normalized record kept in the merge cache
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// The kind this record is stored under
    const KIND: EntityKind;

    /// Immutable primary key from the source system
    fn id(&self) -> i64;

    /// Human-facing number (drawing number, RFI number, ...)
    fn number(&self) -> &str;

    /// Display title
    fn title(&self) -> &str;
}
