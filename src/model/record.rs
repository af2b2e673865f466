//! Persisted record shapes supplied by the host application.
//!
//! Field names follow the host's JSON (`titre`, `ordre`, `duree`, `contenu`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A formation as loaded from the host's store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormationRecord {
    pub id: String,
    pub titre: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Owning organization, used by sources to scope lookups.
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
    /// Quiz payload: `{"qcm": [...]}` or a bare array of questions.
    #[serde(default)]
    pub evaluations_data: Option<Value>,
}

impl FormationRecord {
    /// Sort modules by their stored `ordre`, keeping ties in input order.
    ///
    /// Sources call this to honour the "pre-sorted" contract; the normalizer
    /// itself never looks at `ordre`.
    pub fn sort_modules_by_order(&mut self) {
        self.modules.sort_by_key(|m| m.ordre);
    }
}

/// A module as loaded from the host's store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub id: String,
    pub titre: String,
    #[serde(default)]
    pub ordre: i32,
    /// Duration in minutes.
    #[serde(default)]
    pub duree: Option<u32>,
    /// Document JSON, plain string, or null.
    #[serde(default)]
    pub contenu: Option<Value>,
}

impl ModuleRecord {
    pub fn new(id: impl Into<String>, titre: impl Into<String>, ordre: i32) -> Self {
        Self {
            id: id.into(),
            titre: titre.into(),
            ordre,
            duree: None,
            contenu: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_record() {
        let record: FormationRecord = serde_json::from_str(
            r#"{"id": "f1", "titre": "Excel", "modules": [{"id": "m1", "titre": "Intro"}]}"#,
        )
        .unwrap();
        assert_eq!(record.titre, "Excel");
        assert_eq!(record.description, None);
        assert_eq!(record.modules[0].ordre, 0);
        assert!(record.evaluations_data.is_none());
    }

    #[test]
    fn test_sort_modules_is_stable() {
        let mut record = FormationRecord {
            id: "f".into(),
            titre: "t".into(),
            description: None,
            organization_id: None,
            modules: vec![
                ModuleRecord::new("a", "A", 2),
                ModuleRecord::new("b", "B", -1),
                ModuleRecord::new("c", "C", 2),
                ModuleRecord::new("d", "D", 5),
            ],
            evaluations_data: None,
        };
        record.sort_modules_by_order();
        let ids: Vec<_> = record.modules.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c", "d"]);
    }
}
