//! Reference data: addresses, people, categories, buildings and the areas
//! (flats, cellars, ...) inside them.

mod cache;
mod index;
mod label;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HausdirError, HausdirResult};

pub use cache::DatasetCache;
pub use index::{AreaKey, AreaWithRelations, BuildingWithRelations, DatasetIndex};
pub use label::parse_area_label;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: u32,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub house_number: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// A "Typ" such as Wohnung or Keller, shared by buildings and areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub category_id: u32,
    pub id: u32,
    pub address_id: u32,
}

/// A unit inside a building. Identified by `(category_id, id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub category_id: u32,
    pub id: u32,
    pub building_id: u32,
    #[serde(default)]
    pub entrance: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tenant_ids: Vec<u32>,
}

impl Area {
    pub fn key(&self) -> AreaKey {
        AreaKey {
            category_id: self.category_id,
            area_id: self.id,
        }
    }
}

/// The five collections, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "Address", default)]
    pub addresses: Vec<Address>,
    #[serde(rename = "Person", default)]
    pub persons: Vec<Person>,
    #[serde(rename = "Typ", default)]
    pub categories: Vec<Category>,
    #[serde(rename = "Haus", default)]
    pub buildings: Vec<Building>,
    #[serde(rename = "Bereich", default)]
    pub areas: Vec<Area>,
}

/// On-disk shape: everything sits under one `Stammdaten` group.
#[derive(Deserialize)]
struct DatasetFile {
    #[serde(rename = "Stammdaten")]
    stammdaten: Dataset,
}

impl Dataset {
    pub fn from_json(content: &str) -> HausdirResult<Self> {
        let file: DatasetFile = serde_json::from_str(content)
            .map_err(|e| HausdirError::DatasetParse(e.to_string()))?;
        Ok(file.stammdaten)
    }

    pub fn from_toml(content: &str) -> HausdirResult<Self> {
        let file: DatasetFile =
            toml::from_str(content).map_err(|e| HausdirError::DatasetParse(e.to_string()))?;
        Ok(file.stammdaten)
    }

    /// Load from a `.toml` file, or JSON for any other extension.
    pub fn load(path: &Path) -> HausdirResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        }
    }
}
