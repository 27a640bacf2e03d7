//! Army list store seam.
//!
//! The engine only produces replacement units; persisting them is the
//! store's job. [`ListStore`] is the boundary, [`MemoryListStore`] the
//! in-process implementation used by the harness and tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::unit::Unit;

/// A saved army list. Units are grouped by category
/// (`"characters"`, `"core"`, `"special"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmyList {
    pub id: String,
    pub name: String,
    pub game: String,
    pub army: String,
    #[serde(default)]
    pub units: BTreeMap<String, Vec<Unit>>,
}

impl ArmyList {
    pub fn unit(&self, category: &str, unit_id: &str) -> Option<&Unit> {
        self.units
            .get(category)
            .and_then(|units| units.iter().find(|u| u.id == unit_id))
    }
}

pub trait ListStore {
    fn list(&self, list_id: &str) -> Option<&ArmyList>;

    fn unit(&self, list_id: &str, category: &str, unit_id: &str) -> Option<&Unit> {
        self.list(list_id).and_then(|l| l.unit(category, unit_id))
    }

    /// Replace the unit with the same id in `category` of the list.
    fn replace_unit(&mut self, list_id: &str, category: &str, unit: Unit) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryListStore {
    lists: Vec<ArmyList>,
}

impl MemoryListStore {
    pub fn new(lists: Vec<ArmyList>) -> Self {
        Self { lists }
    }

    pub fn insert(&mut self, list: ArmyList) {
        self.lists.retain(|l| l.id != list.id);
        self.lists.push(list);
    }

    pub fn lists(&self) -> &[ArmyList] {
        &self.lists
    }
}

impl ListStore for MemoryListStore {
    fn list(&self, list_id: &str) -> Option<&ArmyList> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    fn replace_unit(&mut self, list_id: &str, category: &str, unit: Unit) -> Result<(), StoreError> {
        let list = self
            .lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| StoreError::UnknownList(list_id.to_string()))?;
        let slot = list
            .units
            .get_mut(category)
            .and_then(|units| units.iter_mut().find(|u| u.id == unit.id))
            .ok_or_else(|| StoreError::UnknownUnit {
                list: list_id.to_string(),
                category: category.to_string(),
                unit: unit.id.clone(),
            })?;
        log::debug!("Replacing unit {} in {}/{}", unit.id, list_id, category);
        *slot = unit;
        Ok(())
    }
}
