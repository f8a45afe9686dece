//! Role sets used by the authorization gate.
//!
//! Role names are configuration, not an enum: each guarded operation is given
//! a `RoleSet` built from the environment. Matching is case-insensitive.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleSetError {
    #[error("role set must contain at least one role")]
    Empty,
}

/// Non-empty list of role names, deduplicated case-insensitively.
///
/// The first spelling seen for a role is kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    names: Vec<String>,
}

impl RoleSet {
    pub fn new<I, S>(names: I) -> Result<Self, RoleSetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if out.iter().any(|seen| role_eq(seen, name)) {
                continue;
            }
            out.push(name.to_string());
        }

        if out.is_empty() {
            return Err(RoleSetError::Empty);
        }

        Ok(Self { names: out })
    }

    /// Parse a comma-separated list, e.g. `"ADMINISTRADOR, DELIVERY"`.
    pub fn parse(csv: &str) -> Result<Self, RoleSetError> {
        Self::new(csv.split(','))
    }

    pub fn contains(&self, role: &str) -> bool {
        let role = role.trim();
        self.names.iter().any(|name| role_eq(name, role))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(", "))
    }
}

fn role_eq(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_dedups_ignoring_case() {
        let set = RoleSet::parse(" ADMINISTRADOR, delivery ,Administrador,, ").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_string(), "ADMINISTRADOR, delivery");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(RoleSet::parse(""), Err(RoleSetError::Empty));
        assert_eq!(RoleSet::parse(" , ,"), Err(RoleSetError::Empty));
        assert_eq!(
            RoleSet::new(Vec::<String>::new()),
            Err(RoleSetError::Empty)
        );
    }

    #[test]
    fn contains_is_case_insensitive() {
        let set = RoleSet::new(["CLIENTE"]).unwrap();
        assert!(set.contains("cliente"));
        assert!(set.contains("Cliente"));
        assert!(set.contains(" CLIENTE "));
        assert!(!set.contains("CLIENT"));
        assert!(!set.contains(""));
    }

    #[test]
    fn contains_handles_non_ascii_case() {
        let set = RoleSet::new(["ÉLITE"]).unwrap();
        assert!(set.contains("élite"));
    }
}
