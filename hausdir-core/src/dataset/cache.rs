//! Dataset that follows its backing file.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use super::{Area, AreaWithRelations, BuildingWithRelations, Dataset, DatasetIndex};
use crate::error::HausdirResult;

/// What identifies one version of the backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Freshness {
    modified: Option<SystemTime>,
    len: u64,
}

impl Freshness {
    fn of(path: &Path) -> HausdirResult<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Freshness {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

struct Loaded {
    index: Arc<DatasetIndex>,
    freshness: Freshness,
}

/// Owns the parsed dataset and reloads it when the file changes.
///
/// Each reload builds a complete [`DatasetIndex`] before swapping it in, so a
/// reader holding a snapshot never sees a half-built index. A failed reload
/// keeps serving the previous snapshot.
pub struct DatasetCache {
    path: PathBuf,
    loaded: RwLock<Loaded>,
}

impl DatasetCache {
    pub fn open(path: impl Into<PathBuf>) -> HausdirResult<Self> {
        let path = path.into();
        let freshness = Freshness::of(&path)?;
        let index = DatasetIndex::build(Dataset::load(&path)?);

        Ok(DatasetCache {
            path,
            loaded: RwLock::new(Loaded {
                index: Arc::new(index),
                freshness,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload if the file changed since the last load. Returns whether a
    /// reload happened.
    pub fn refresh_if_stale(&self) -> HausdirResult<bool> {
        let current = Freshness::of(&self.path)?;

        {
            let loaded = self.loaded.read().unwrap_or_else(PoisonError::into_inner);
            if loaded.freshness == current {
                return Ok(false);
            }
        }

        let dataset = Dataset::load(&self.path).inspect_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "dataset reload failed, keeping previous");
        })?;
        let index = Arc::new(DatasetIndex::build(dataset));

        let mut loaded = self.loaded.write().unwrap_or_else(PoisonError::into_inner);
        *loaded = Loaded {
            index,
            freshness: current,
        };

        tracing::debug!(path = %self.path.display(), "reloaded dataset");
        Ok(true)
    }

    /// The current index without checking the file.
    pub fn snapshot(&self) -> Arc<DatasetIndex> {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .index
            .clone()
    }

    /// Refresh, then hand out the current index.
    pub fn index(&self) -> HausdirResult<Arc<DatasetIndex>> {
        self.refresh_if_stale()?;
        Ok(self.snapshot())
    }

    pub fn area_by_label(&self, text: &str) -> HausdirResult<Option<Area>> {
        Ok(self.index()?.area_by_label(text).cloned())
    }

    pub fn resolve_area(&self, area: &Area) -> HausdirResult<AreaWithRelations> {
        Ok(self.index()?.resolve_area(area))
    }

    pub fn resolve_building(&self, building_id: u32) -> HausdirResult<Option<BuildingWithRelations>> {
        Ok(self.index()?.resolve_building(building_id))
    }

    pub fn areas_by_tenant_id(&self, person_id: u32) -> HausdirResult<Vec<Area>> {
        Ok(self
            .index()?
            .areas_by_tenant_id(person_id)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::DATASET_JSON;
    use crate::error::HausdirError;

    const SMALL: &str = r#"{"Stammdaten": {"Typ": [{"id": 5, "name": "Garage"}], "Bereich": [{"categoryId": 5, "id": 1, "buildingId": 100}]}}"#;

    #[test]
    fn test_reload_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stammdaten.json");
        std::fs::write(&path, DATASET_JSON).unwrap();

        let cache = DatasetCache::open(&path).unwrap();
        assert!(!cache.refresh_if_stale().unwrap());
        assert!(cache.area_by_label("Keller 3").unwrap().is_some());

        let before = cache.snapshot();
        std::fs::write(&path, SMALL).unwrap();

        assert!(cache.area_by_label("Keller 3").unwrap().is_none());
        assert!(cache.area_by_label("Garage 1").unwrap().is_some());
        // Old snapshots stay intact
        assert!(before.area_by_label("Keller 3").is_some());
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stammdaten.json");
        std::fs::write(&path, DATASET_JSON).unwrap();
        let cache = DatasetCache::open(&path).unwrap();

        std::fs::write(&path, "{ not json").unwrap();

        let err = cache.refresh_if_stale().unwrap_err();
        assert!(matches!(err, HausdirError::DatasetParse(_)));
        assert!(cache.snapshot().area_by_label("Wohnung 12").is_some());
    }

    #[test]
    fn test_resolve_through_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stammdaten.json");
        std::fs::write(&path, DATASET_JSON).unwrap();
        let cache = DatasetCache::open(&path).unwrap();

        let area = cache.area_by_label("Wohnung 12").unwrap().unwrap();
        let resolved = cache.resolve_area(&area).unwrap();
        assert_eq!(resolved.tenants.len(), 2);

        let building = cache.resolve_building(100).unwrap().unwrap();
        assert_eq!(building.areas.len(), 3);
        assert_eq!(cache.areas_by_tenant_id(11).unwrap(), vec![area]);
    }

    #[test]
    fn test_open_missing_file() {
        let err = DatasetCache::open("/nonexistent/stammdaten.json").err().unwrap();
        assert!(matches!(err, HausdirError::Io(_)));
    }
}
