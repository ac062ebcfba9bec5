//! Department, employee, and project records.
//!
//! # Responsibility
//! - Define the three entity records persisted by the repository layer.
//! - Validate entity names before any SQL mutation.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused within a table.
//! - Names are non-empty and strictly alphabetic (`^[A-Za-z]+$`), which
//!   also rejects multi-word names. See DESIGN.md before loosening this.
//! - A `Project`'s `department_id` is set at creation and never reassigned.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Surrogate integer identifier shared by all entity tables.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntityId = i64;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+$").expect("valid name regex"));

/// Discriminates the three entity tables in errors and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Department,
    Employee,
    Project,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Department => write!(f, "department"),
            Self::Employee => write!(f, "employee"),
            Self::Project => write!(f, "project"),
        }
    }
}

/// Organizational unit owning employees and projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: EntityId,
    /// Unique across all departments, case-sensitive.
    pub name: String,
    /// Designated lead, cleared automatically when that employee is deleted.
    pub head_of_department_id: Option<EntityId>,
}

/// Staff member, optionally attached to one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EntityId,
    pub name: String,
    /// At most one department at a time; `None` means unassigned.
    pub department_id: Option<EntityId>,
}

/// Unit of work owned by a department and staffed by employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    /// Owning department, fixed at creation.
    pub department_id: Option<EntityId>,
}

/// Validation failure for an entity name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Name is empty after trimming.
    Empty,
    /// Name contains a character outside `A-Z`/`a-z`.
    NotAlphabetic(String),
}

impl Display for NameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "name cannot be empty"),
            Self::NotAlphabetic(name) => {
                write!(f, "name `{name}` must contain only alphabetic characters")
            }
        }
    }
}

impl Error for NameError {}

/// Validates an entity name against the strict alphabetic rule.
///
/// Digits, punctuation, and whitespace are all rejected, so multi-word names
/// like `Jane Doe` fail validation. Intentional; see DESIGN.md.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if !NAME_RE.is_match(name) {
        return Err(NameError::NotAlphabetic(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_name, NameError};

    #[test]
    fn plain_alphabetic_name_is_accepted() {
        assert_eq!(validate_name("Jane"), Ok(()));
        assert_eq!(validate_name("engineering"), Ok(()));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(validate_name(""), Err(NameError::Empty));
    }

    #[test]
    fn numeric_name_is_rejected() {
        assert!(matches!(
            validate_name("123"),
            Err(NameError::NotAlphabetic(_))
        ));
    }

    #[test]
    fn name_with_space_is_rejected() {
        assert!(matches!(
            validate_name("Jane Doe"),
            Err(NameError::NotAlphabetic(_))
        ));
    }

    #[test]
    fn name_with_punctuation_is_rejected() {
        assert!(matches!(
            validate_name("O'Brien"),
            Err(NameError::NotAlphabetic(_))
        ));
    }
}
