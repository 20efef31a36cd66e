//! Lookup indexes over a [`Dataset`] and relation resolution.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::{Address, Area, Building, Category, Dataset, Person};

/// Composite key of an area. Ids are only unique per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AreaKey {
    pub category_id: u32,
    pub area_id: u32,
}

impl fmt::Display for AreaKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.category_id, self.area_id)
    }
}

/// An area joined with everything it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaWithRelations {
    pub area: Area,
    pub category: Option<Category>,
    pub building: Option<Building>,
    pub address: Option<Address>,
    /// Tenants that exist in the dataset; unknown ids are left out
    pub tenants: Vec<Person>,
}

/// A building joined with its address, category and resolved areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildingWithRelations {
    pub building: Building,
    pub category: Option<Category>,
    pub address: Option<Address>,
    pub areas: Vec<AreaWithRelations>,
}

/// Immutable dataset plus its indexes. Built in one go; a reload builds a
/// new one instead of mutating this.
#[derive(Debug, Clone, Default)]
pub struct DatasetIndex {
    dataset: Dataset,
    addresses: HashMap<u32, usize>,
    persons: HashMap<u32, usize>,
    categories: HashMap<u32, usize>,
    categories_by_name: HashMap<String, usize>,
    buildings: HashMap<u32, usize>,
    areas: HashMap<AreaKey, usize>,
}

/// Category names match trimmed and case-insensitively.
fn normalize_category_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn positions<T, K, F>(items: &[T], key: F) -> HashMap<K, usize>
where
    K: std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (key(item), i))
        .collect()
}

impl DatasetIndex {
    pub fn build(dataset: Dataset) -> Self {
        let index = DatasetIndex {
            addresses: positions(&dataset.addresses, |a| a.id),
            persons: positions(&dataset.persons, |p| p.id),
            categories: positions(&dataset.categories, |c| c.id),
            categories_by_name: positions(&dataset.categories, |c| {
                normalize_category_name(&c.name)
            }),
            buildings: positions(&dataset.buildings, |b| b.id),
            areas: positions(&dataset.areas, Area::key),
            dataset,
        };

        tracing::debug!(
            addresses = index.dataset.addresses.len(),
            persons = index.dataset.persons.len(),
            categories = index.dataset.categories.len(),
            buildings = index.dataset.buildings.len(),
            areas = index.dataset.areas.len(),
            "built dataset index"
        );

        index
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn address_by_id(&self, id: u32) -> Option<&Address> {
        self.addresses.get(&id).map(|&i| &self.dataset.addresses[i])
    }

    pub fn person_by_id(&self, id: u32) -> Option<&Person> {
        self.persons.get(&id).map(|&i| &self.dataset.persons[i])
    }

    pub fn category_by_id(&self, id: u32) -> Option<&Category> {
        self.categories.get(&id).map(|&i| &self.dataset.categories[i])
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories_by_name
            .get(&normalize_category_name(name))
            .map(|&i| &self.dataset.categories[i])
    }

    pub fn building_by_id(&self, id: u32) -> Option<&Building> {
        self.buildings.get(&id).map(|&i| &self.dataset.buildings[i])
    }

    pub fn area_by_key(&self, category_id: u32, area_id: u32) -> Option<&Area> {
        let key = AreaKey {
            category_id,
            area_id,
        };
        self.areas.get(&key).map(|&i| &self.dataset.areas[i])
    }

    pub fn area_by_category_name_and_id(&self, name: &str, area_id: u32) -> Option<&Area> {
        let category = self.category_by_name(name)?;
        self.area_by_key(category.id, area_id)
    }

    /// Areas of a building, in source order.
    pub fn areas_by_building_id(&self, building_id: u32) -> Vec<&Area> {
        self.dataset
            .areas
            .iter()
            .filter(|a| a.building_id == building_id)
            .collect()
    }

    /// Areas a person rents, in source order.
    pub fn areas_by_tenant_id(&self, person_id: u32) -> Vec<&Area> {
        self.dataset
            .areas
            .iter()
            .filter(|a| a.tenant_ids.contains(&person_id))
            .collect()
    }

    pub fn resolve_area(&self, area: &Area) -> AreaWithRelations {
        let building = self.building_by_id(area.building_id);
        let address = building.and_then(|b| self.address_by_id(b.address_id));

        let tenants = area
            .tenant_ids
            .iter()
            .filter_map(|&id| {
                let person = self.person_by_id(id);
                if person.is_none() {
                    tracing::trace!(area = %area.key(), person = id, "dropping unknown tenant");
                }
                person.cloned()
            })
            .collect();

        AreaWithRelations {
            area: area.clone(),
            category: self.category_by_id(area.category_id).cloned(),
            building: building.cloned(),
            address: address.cloned(),
            tenants,
        }
    }

    pub fn resolve_building(&self, building_id: u32) -> Option<BuildingWithRelations> {
        let building = self.building_by_id(building_id)?;

        Some(BuildingWithRelations {
            building: building.clone(),
            category: self.category_by_id(building.category_id).cloned(),
            address: self.address_by_id(building.address_id).cloned(),
            areas: self
                .areas_by_building_id(building_id)
                .into_iter()
                .map(|area| self.resolve_area(area))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::DATASET_JSON;

    fn index() -> DatasetIndex {
        DatasetIndex::build(Dataset::from_json(DATASET_JSON).unwrap())
    }

    #[test]
    fn test_every_area_found_by_key() {
        let index = index();

        for area in &index.dataset().areas {
            assert_eq!(index.area_by_key(area.category_id, area.id), Some(area));
        }
        assert_eq!(index.area_by_key(2, 99), None);
        assert_eq!(index.area_by_key(9, 12), None);
    }

    #[test]
    fn test_same_id_in_different_categories() {
        let index = index();

        assert_eq!(index.area_by_key(2, 3).unwrap().location, "EG");
        assert_eq!(index.area_by_key(3, 3).unwrap().location, "UG");
    }

    #[test]
    fn test_category_name_is_trimmed_and_case_insensitive() {
        let index = index();

        assert_eq!(index.category_by_name("keller").map(|c| c.id), Some(3));
        assert_eq!(index.category_by_name("  WOHNUNG ").map(|c| c.id), Some(2));
        assert_eq!(
            index
                .area_by_category_name_and_id("Keller", 12)
                .map(|a| a.building_id),
            Some(200)
        );
        assert_eq!(index.area_by_category_name_and_id("Garage", 12), None);
    }

    #[test]
    fn test_areas_by_building_and_tenant_keep_source_order() {
        let index = index();

        let keys: Vec<String> = index
            .areas_by_building_id(100)
            .iter()
            .map(|a| a.key().to_string())
            .collect();
        assert_eq!(keys, vec!["2:12", "3:3", "2:3"]);

        let rented: Vec<AreaKey> = index
            .areas_by_tenant_id(10)
            .iter()
            .map(|a| a.key())
            .collect();
        assert_eq!(
            rented,
            vec![
                AreaKey { category_id: 2, area_id: 12 },
                AreaKey { category_id: 3, area_id: 3 },
            ]
        );
        assert!(index.areas_by_tenant_id(404).len() == 1);
        assert!(index.areas_by_tenant_id(7).is_empty());
    }

    #[test]
    fn test_resolve_area_drops_unknown_tenants() {
        let index = index();
        let cellar = index.area_by_key(3, 3).unwrap();

        let resolved = index.resolve_area(cellar);

        assert_eq!(resolved.category.map(|c| c.id), Some(3));
        assert_eq!(resolved.building.map(|b| b.id), Some(100));
        assert_eq!(resolved.address.map(|a| a.street), Some("Lindenstraße".to_string()));
        assert_eq!(
            resolved.tenants.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![10]
        );
    }

    #[test]
    fn test_resolve_building() {
        let index = index();

        let resolved = index.resolve_building(100).unwrap();
        assert_eq!(resolved.category.map(|c| c.name), Some("Haus".to_string()));
        assert_eq!(resolved.address.map(|a| a.city), Some("Berlin".to_string()));
        assert_eq!(resolved.areas.len(), 3);
        assert_eq!(resolved.areas[0].tenants.len(), 2);

        let orphan = index.resolve_building(200).unwrap();
        assert_eq!(orphan.address, None);
        assert_eq!(orphan.areas.len(), 1);

        assert!(index.resolve_building(300).is_none());
    }

    #[test]
    fn test_area_key_display() {
        assert_eq!(
            AreaKey {
                category_id: 3,
                area_id: 12
            }
            .to_string(),
            "3:12"
        );
    }
}
