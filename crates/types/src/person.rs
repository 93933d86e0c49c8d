// crates/types/src/person.rs
//! Employee records from the HR roster. Read-only to the core.

use serde::{Deserialize, Serialize};

/// One employee as exported by the HR system.
///
/// `org_unit` stays a free string: the roster vocabulary is owned by the
/// external HR source and may contain units no mode maps to. Cohort
/// selection compares it against [`crate::Mode::org_unit_name`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(alias = "id")]
    pub person_id: String,
    #[serde(default)]
    pub org_unit: String,
    #[serde(default)]
    pub region: String,
    /// Display name; falls back to the id when the roster omits it.
    #[serde(default, alias = "display_name")]
    pub name: String,
}

impl Person {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.person_id
        } else {
            &self.name
        }
    }
}

/// How to slice a mode's population into a cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "key")]
pub enum CohortSpec {
    /// Everyone in the mode's org unit.
    All,
    /// Members of one region.
    Region(String),
    /// A single person by id.
    Person(String),
}

impl Default for CohortSpec {
    fn default() -> Self {
        Self::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_aliases() {
        let p: Person = serde_json::from_str(
            r#"{"id":"p-1","org_unit":"Sales","region":"EMEA","display_name":"Avery Lee"}"#,
        )
        .unwrap();
        assert_eq!(p.person_id, "p-1");
        assert_eq!(p.name, "Avery Lee");
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let p: Person = serde_json::from_str(r#"{"person_id":"p-2"}"#).unwrap();
        assert_eq!(p.display_name(), "p-2");
        assert_eq!(p.org_unit, "");
    }
}
