//! Where formations come from.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::model::FormationRecord;

/// Loads a formation with its modules, scoped to an organization.
///
/// Implementations return modules sorted by `ordre` and `Ok(None)` when the
/// formation does not exist or belongs to another organization.
#[async_trait]
pub trait FormationSource: Send + Sync {
    async fn formation_with_modules(
        &self,
        formation_id: &str,
        organization_id: &str,
    ) -> Result<Option<FormationRecord>>;
}

/// Formations held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFormationSource {
    formations: HashMap<String, FormationRecord>,
}

impl MemoryFormationSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formation(mut self, record: FormationRecord) -> Self {
        self.insert(record);
        self
    }

    pub fn insert(&mut self, record: FormationRecord) {
        self.formations.insert(record.id.clone(), record);
    }
}

#[async_trait]
impl FormationSource for MemoryFormationSource {
    async fn formation_with_modules(
        &self,
        formation_id: &str,
        organization_id: &str,
    ) -> Result<Option<FormationRecord>> {
        let record = self
            .formations
            .get(formation_id)
            .filter(|r| r.organization_id.as_deref() == Some(organization_id))
            .cloned()
            .map(|mut r| {
                r.sort_modules_by_order();
                r
            });
        Ok(record)
    }
}

/// One `<formation id>.json` file per formation in a directory.
#[derive(Debug, Clone)]
pub struct JsonFormationSource {
    dir: PathBuf,
}

impl JsonFormationSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, formation_id: &str) -> Option<PathBuf> {
        let valid = !formation_id.is_empty()
            && formation_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !formation_id.starts_with('.');
        valid.then(|| self.dir.join(format!("{formation_id}.json")))
    }
}

#[async_trait]
impl FormationSource for JsonFormationSource {
    async fn formation_with_modules(
        &self,
        formation_id: &str,
        organization_id: &str,
    ) -> Result<Option<FormationRecord>> {
        let Some(path) = self.path_for(formation_id) else {
            return Ok(None);
        };
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };
        let mut record: FormationRecord = serde_json::from_str(&contents)?;
        if record.id != formation_id
            || record.organization_id.as_deref() != Some(organization_id)
        {
            return Ok(None);
        }
        record.sort_modules_by_order();
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModuleRecord;

    fn record(id: &str, org: &str) -> FormationRecord {
        FormationRecord {
            id: id.into(),
            titre: "T".into(),
            description: None,
            organization_id: Some(org.into()),
            modules: vec![
                ModuleRecord::new("c", "C", 5),
                ModuleRecord::new("a", "A", -1),
                ModuleRecord::new("b", "B", 2),
            ],
            evaluations_data: None,
        }
    }

    #[tokio::test]
    async fn test_memory_source_scopes_and_sorts() {
        let source = MemoryFormationSource::new().with_formation(record("f1", "org-a"));
        let found = source.formation_with_modules("f1", "org-a").await.unwrap().unwrap();
        let ids: Vec<_> = found.modules.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert!(source.formation_with_modules("f1", "org-b").await.unwrap().is_none());
        assert!(source.formation_with_modules("f2", "org-a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_json_source() {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::to_string(&record("f1", "org-a")).unwrap();
        std::fs::write(dir.path().join("f1.json"), json).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();

        let source = JsonFormationSource::new(dir.path());
        let found = source.formation_with_modules("f1", "org-a").await.unwrap().unwrap();
        assert_eq!(found.modules[0].id, "a");
        assert!(source.formation_with_modules("f1", "org-b").await.unwrap().is_none());
        assert!(source.formation_with_modules("missing", "org-a").await.unwrap().is_none());
        assert!(source.formation_with_modules("../f1", "org-a").await.unwrap().is_none());
        assert!(matches!(
            source.formation_with_modules("broken", "org-a").await,
            Err(Error::Json(_))
        ));
    }
}
