//! List filters for owner-scoped queries.

use std::collections::HashSet;

use uuid::Uuid;

use crate::access::Owned;
use crate::error::DomainError;

/// Filter for listing tags or ingredients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeFilter {
    /// Only return records linked to at least one recipe.
    pub assigned_only: bool,
}

impl AttributeFilter {
    /// Build a filter from the raw `assigned_only` query value.
    pub fn from_query(assigned_only: Option<&str>) -> Result<Self, DomainError> {
        let assigned_only = match assigned_only {
            Some(raw) => parse_flag("assigned_only", raw)?,
            None => false,
        };
        Ok(Self { assigned_only })
    }
}

/// Filter for listing profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFilter {
    /// Case-insensitive substring matched against name or email.
    pub search: Option<String>,
}

impl ProfileFilter {
    pub fn search(term: impl Into<String>) -> Self {
        let term = term.into();
        let term = term.trim();
        Self {
            search: (!term.is_empty()).then(|| term.to_string()),
        }
    }

    /// In-process equivalent of the repository search predicate.
    pub fn matches(&self, name: &str, email: &str) -> bool {
        match &self.search {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                name.to_lowercase().contains(&term) || email.to_lowercase().contains(&term)
            }
        }
    }
}

/// Parse a truthy/falsy query flag.
pub fn parse_flag(field: &str, raw: &str) -> Result<bool, DomainError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DomainError::invalid(field, "Must be a valid boolean.")),
    }
}

/// Keep only the records whose id appears in `referenced`.
///
/// `candidates` is the owner-scoped, already ordered list; each record
/// appears at most once in it, so the result is de-duplicated and keeps
/// the candidate order.
pub fn retain_assigned<R: Owned>(candidates: Vec<R>, referenced: &HashSet<Uuid>) -> Vec<R> {
    candidates
        .into_iter()
        .filter(|record| referenced.contains(&record.id()))
        .collect()
}
