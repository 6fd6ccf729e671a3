use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a cast or director entry was established against IAFD
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    /// Credited with role text (or a bare presence tick when the site
    /// lists no role)
    Credited(String),
    /// Matched through an alias; carries the billed name
    Aka(String),
    /// Search returned candidates but the lookup could not be completed
    /// (e.g. a 403 mid-resolution)
    Unresolved,
    /// No IAFD identity established
    NotOnIafd,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Credited(text) if text.is_empty() => write!(f, "\u{2713}"),
            Role::Credited(text) => write!(f, "{}", text),
            Role::Aka(name) => write!(f, "AKA: {}", name),
            Role::Unresolved => write!(f, "Unresolved"),
            Role::NotOnIafd => write!(f, "Not on IAFD"),
        }
    }
}

/// A cast member or director, created when a name is first seen in a site
/// listing and enriched in place once IAFD resolution succeeds.
///
/// Records are merged, never deleted: once an identity is established by
/// URL or alias match, `compare_aliases` only ever grows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonRecord {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Canonical key of `name`
    pub compare_name: String,
    #[serde(default)]
    pub compare_aliases: Vec<String>,
    /// IAFD profile URL once resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    /// Key-value biography rows from the profile page
    #[serde(default)]
    pub bio: BTreeMap<String, String>,
    #[serde(default)]
    pub awards: Vec<String>,
    #[serde(default)]
    pub films: Vec<FilmographyEntry>,
    /// First year IAFD records the person as active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
}

impl PersonRecord {
    /// Create a bare record for a name seen in a site listing, before any
    /// IAFD resolution has been attempted
    pub fn unresolved(name: &str, compare_name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            compare_name: compare_name.to_string(),
            compare_aliases: Vec::new(),
            url: None,
            photo: None,
            role: Role::NotOnIafd,
            nationality: None,
            bio: BTreeMap::new(),
            awards: Vec::new(),
            films: Vec::new(),
            start_year: None,
            end_year: None,
        }
    }

    /// Record an alias and its canonical key. Aliases accumulate; adding an
    /// existing alias is a no-op.
    pub fn add_alias(&mut self, alias: &str, compare_alias: &str) {
        if !self.aliases.iter().any(|a| a == alias) {
            self.aliases.push(alias.to_string());
        }
        if !self.compare_aliases.iter().any(|a| a == compare_alias) {
            self.compare_aliases.push(compare_alias.to_string());
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilmographyEntry {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub studio: Option<String>,
    /// Genre classification letters IAFD attaches to the credit
    #[serde(default)]
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_accumulate_without_duplicates() {
        let mut person = PersonRecord::unresolved("Jack Steel", "jacksteel");
        person.add_alias("Jack S", "jacks");
        person.add_alias("Jack S", "jacks");
        person.add_alias("Steel", "steel");
        assert_eq!(person.aliases, vec!["Jack S", "Steel"]);
        assert_eq!(person.compare_aliases, vec!["jacks", "steel"]);
    }

    #[test]
    fn role_display_marks_alias_matches() {
        assert_eq!(Role::Aka("Jack S".to_string()).to_string(), "AKA: Jack S");
        assert_eq!(Role::Credited(String::new()).to_string(), "\u{2713}");
    }
}
