//! Record kinds and project identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kinds of business record captured from the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Drawing sheet from the drawing log
    Drawing,
    /// Request for information
    Rfi,
    /// Commitment (subcontract or purchase order)
    Commitment,
    /// Specification section
    Specification,
}

impl EntityKind {
    /// Storage key for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Drawing => "drawings",
            EntityKind::Rfi => "rfis",
            EntityKind::Commitment => "commitments",
            EntityKind::Specification => "specifications",
        }
    }

    /// Singular human label
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Drawing => "drawing",
            EntityKind::Rfi => "RFI",
            EntityKind::Commitment => "commitment",
            EntityKind::Specification => "specification",
        }
    }

    /// Get all kinds
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Drawing,
            EntityKind::Rfi,
            EntityKind::Commitment,
            EntityKind::Specification,
        ]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drawing" | "drawings" => Ok(EntityKind::Drawing),
            "rfi" | "rfis" => Ok(EntityKind::Rfi),
            "commitment" | "commitments" => Ok(EntityKind::Commitment),
            "specification" | "specifications" | "spec" | "specs" => {
                Ok(EntityKind::Specification)
            }
            _ => Err(KindParseError::Unknown(s.to_string())),
        }
    }
}

/// Taxonomy tables kept per project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyKind {
    /// Drawing disciplines (Architectural, Mechanical, ...)
    Discipline,
    /// Specification divisions
    Division,
}

impl TaxonomyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxonomyKind::Discipline => "disciplines",
            TaxonomyKind::Division => "divisions",
        }
    }

    pub fn all() -> &'static [TaxonomyKind] {
        &[TaxonomyKind::Discipline, TaxonomyKind::Division]
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaxonomyKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discipline" | "disciplines" => Ok(TaxonomyKind::Discipline),
            "division" | "divisions" => Ok(TaxonomyKind::Division),
            _ => Err(KindParseError::Unknown(s.to_string())),
        }
    }
}

/// Project identifier assigned by the host application
///
/// Every cached list is keyed by one of these. The value is opaque: the host
/// uses numeric ids, but nothing here depends on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(KindParseError::EmptyProject);
        }
        Ok(ProjectId(trimmed.to_string()))
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        ProjectId(s.trim().to_string())
    }
}

/// Errors from parsing kinds or project ids
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KindParseError {
    #[error("unknown kind '{0}'")]
    Unknown(String),

    #[error("project id cannot be empty")]
    EmptyProject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in EntityKind::all() {
            let parsed: EntityKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!("RFI".parse::<EntityKind>().unwrap(), EntityKind::Rfi);
        assert_eq!("specs".parse::<EntityKind>().unwrap(), EntityKind::Specification);
        assert!("submittal".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_taxonomy_kind_parse() {
        assert_eq!(
            "discipline".parse::<TaxonomyKind>().unwrap(),
            TaxonomyKind::Discipline
        );
        assert_eq!(TaxonomyKind::Division.as_str(), "divisions");
    }

    #[test]
    fn test_project_id_trims() {
        let id: ProjectId = "  1234 ".parse().unwrap();
        assert_eq!(id.as_str(), "1234");
        assert_eq!(
            "   ".parse::<ProjectId>().unwrap_err(),
            KindParseError::EmptyProject
        );
    }
}
