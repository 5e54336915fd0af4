//! Drawing record - one sheet in the project drawing log

use serde::{Deserialize, Serialize};

use crate::core::entity::Record;
use crate::core::identity::EntityKind;

/// A normalized drawing
///
/// `num` is the human-facing drawing number. Favorites, recents, and every
/// other secondary index key on it rather than on `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: i64,

    pub num: String,

    #[serde(default)]
    pub title: String,

    /// Discipline taxonomy id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discipline: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discipline_name: Option<String>,
}

impl Drawing {
    pub fn new(id: i64, num: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            num: num.into(),
            title: title.into(),
            discipline: None,
            discipline_name: None,
        }
    }

    pub fn with_discipline(mut self, id: Option<i64>, name: Option<&str>) -> Self {
        self.discipline = id;
        self.discipline_name = name.map(str::to_string);
        self
    }
}

impl Record for Drawing {
    const KIND: EntityKind = EntityKind::Drawing;

    fn id(&self) -> i64 {
        self.id
    }

    fn number(&self) -> &str {
        &self.num
    }

    fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let drawing = Drawing::new(1, "A-101", "Floor Plan");
        let json = serde_json::to_value(&drawing).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "num": "A-101", "title": "Floor Plan"})
        );
    }

    #[test]
    fn test_with_discipline() {
        let drawing = Drawing::new(7, "M-201", "Level 2 HVAC").with_discipline(Some(3), Some("Mechanical"));
        assert_eq!(drawing.discipline, Some(3));
        assert_eq!(drawing.discipline_name.as_deref(), Some("Mechanical"));
    }
}
