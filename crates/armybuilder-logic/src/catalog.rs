//! Magic item catalog: the per-session snapshot of selectable items.
//!
//! The external catalog source is keyed by group id; each entry is an
//! ordered list of raw item records. Building the catalog:
//!
//! 1. Keeps only the groups the active army may draw from, in the
//!    army's declared order
//! 2. Assigns each item its position as id, and each conditional child
//!    the composite `"<parent>-<child>"` id
//! 3. Merges in the group header label from the name map
//!
//! Ids are positional, so reordering the source breaks every saved
//! selection that references them. Ids are never persisted in the
//! source itself.
//!
//! ```
//! use armybuilder_logic::catalog::{build_catalog, parse_raw_catalog};
//! use armybuilder_logic::ids::ScopedId;
//! use armybuilder_logic::labels::NameMap;
//!
//! let raw = parse_raw_catalog(r#"{
//!     "talisman": [
//!         { "name_de": "Talisman", "name_en": "Talisman", "points": 15, "type": "talisman" }
//!     ]
//! }"#).unwrap();
//! let catalog = build_catalog(&raw, &["talisman".to_string()], &NameMap::default()).unwrap();
//! assert_eq!(catalog.groups()[0].items[0].id, ScopedId::Top(0));
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{CatalogError, CatalogResult};
use crate::ids::ScopedId;
use crate::labels::{Label, Language, NameMap};

/// An item record as delivered by the catalog source, before id assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
    pub name_de: String,
    pub name_en: String,
    pub points: u32,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional: Vec<RawItem>,
    /// Any further rule fields, carried through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The catalog source document: group id → ordered raw items.
pub type RawCatalog = HashMap<String, Vec<RawItem>>;

/// A catalog item with its group-scoped id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagicItem {
    pub id: ScopedId,
    pub name_de: String,
    pub name_en: String,
    pub points: u32,
    #[serde(rename = "type")]
    pub item_type: String,
    /// Items that only become selectable once this one is chosen.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional: Vec<MagicItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MagicItem {
    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::De => &self.name_de,
            Language::En => &self.name_en,
        }
    }

    pub fn has_conditional(&self) -> bool {
        !self.conditional.is_empty()
    }
}

/// One equipment slot family, e.g. "Arcane Items".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGroup {
    pub id: String,
    /// Header label; `None` when the name map has no entry for the group.
    pub label: Option<Label>,
    pub items: Vec<MagicItem>,
}

impl ItemGroup {
    /// Look up a top-level item or a conditional child by scoped id.
    pub fn item(&self, id: &ScopedId) -> Option<&MagicItem> {
        match *id {
            ScopedId::Top(index) => self.items.get(index),
            ScopedId::Child(parent, child) => self
                .items
                .get(parent)
                .and_then(|p| p.conditional.get(child)),
        }
    }
}

/// Every group the active army may draw from, in the army's order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemCatalog {
    groups: Vec<ItemGroup>,
}

impl ItemCatalog {
    pub fn new(groups: Vec<ItemGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[ItemGroup] {
        &self.groups
    }

    pub fn group(&self, group_id: &str) -> Option<&ItemGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn find_item(&self, group_id: &str, id: &ScopedId) -> Option<&MagicItem> {
        self.group(group_id).and_then(|g| g.item(id))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of top-level items across all groups.
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

/// Parse the catalog source document.
pub fn parse_raw_catalog(json: &str) -> CatalogResult<RawCatalog> {
    serde_json::from_str(json).map_err(|source| CatalogError::Json {
        what: "magic items",
        source,
    })
}

/// Assign positional ids to one group's items.
///
/// Children of children are not part of the data model and are dropped.
pub fn assign_ids(group_id: &str, raw: &[RawItem]) -> CatalogResult<Vec<MagicItem>> {
    raw.iter()
        .enumerate()
        .map(|(index, item)| {
            check_type(group_id, index, item)?;
            let conditional = item
                .conditional
                .iter()
                .enumerate()
                .map(|(child_index, child)| {
                    check_type(group_id, index, child)?;
                    if !child.conditional.is_empty() {
                        log::debug!(
                            "Dropping nested conditional items under {}-{}-{}",
                            group_id,
                            index,
                            child_index
                        );
                    }
                    Ok(to_item(ScopedId::Child(index, child_index), child, Vec::new()))
                })
                .collect::<CatalogResult<Vec<_>>>()?;
            Ok(to_item(ScopedId::Top(index), item, conditional))
        })
        .collect()
}

fn check_type(group_id: &str, index: usize, item: &RawItem) -> CatalogResult<()> {
    if item.item_type.trim().is_empty() {
        return Err(CatalogError::EmptyType {
            group: group_id.to_string(),
            index,
        });
    }
    Ok(())
}

fn to_item(id: ScopedId, raw: &RawItem, conditional: Vec<MagicItem>) -> MagicItem {
    let mut extra = raw.extra.clone();
    // The id is ours to assign; a stray source id would shadow it.
    extra.remove("id");
    MagicItem {
        id,
        name_de: raw.name_de.clone(),
        name_en: raw.name_en.clone(),
        points: raw.points,
        item_type: raw.item_type.clone(),
        conditional,
        extra,
    }
}

/// Build the session catalog for an army's group list.
///
/// A group the army declares but the source lacks becomes an empty
/// group. A group without a name-map entry gets no header label.
pub fn build_catalog(
    raw: &RawCatalog,
    army_groups: &[String],
    names: &NameMap,
) -> CatalogResult<ItemCatalog> {
    let mut groups = Vec::with_capacity(army_groups.len());

    for group_id in army_groups {
        let items = match raw.get(group_id) {
            Some(items) => assign_ids(group_id, items)?,
            None => {
                log::warn!("Catalog source has no group {:?}; treating as empty", group_id);
                Vec::new()
            }
        };
        let label = names.group_label(group_id).cloned();
        if label.is_none() {
            log::warn!("No label for catalog group {:?}", group_id);
        }
        groups.push(ItemGroup {
            id: group_id.clone(),
            label,
            items,
        });
    }

    log::debug!(
        "Built catalog: {} groups, {} items",
        groups.len(),
        groups.iter().map(|g| g.items.len()).sum::<usize>()
    );
    Ok(ItemCatalog::new(groups))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_item(name: &str, points: u32, item_type: &str) -> RawItem {
        RawItem {
            name_de: name.to_string(),
            name_en: name.to_string(),
            points,
            item_type: item_type.to_string(),
            conditional: Vec::new(),
            extra: Map::new(),
        }
    }

    #[test]
    fn ids_follow_position() {
        let raw = vec![
            raw_item("A", 10, "weapon"),
            raw_item("B", 20, "weapon"),
            raw_item("C", 30, "armour"),
        ];
        let items = assign_ids("magic-weapons", &raw).unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ScopedId::Top(0), ScopedId::Top(1), ScopedId::Top(2)]);
    }

    #[test]
    fn conditional_children_get_composite_ids() {
        let mut parent = raw_item("Staff", 25, "arcane");
        parent.conditional = vec![raw_item("Rune A", 5, "arcane"), raw_item("Rune B", 10, "arcane")];
        let raw = vec![raw_item("Scroll", 20, "arcane"), parent];
        let items = assign_ids("arcane", &raw).unwrap();

        assert!(!items[0].has_conditional());
        let children: Vec<_> = items[1].conditional.iter().map(|c| c.id).collect();
        assert_eq!(children, vec![ScopedId::Child(1, 0), ScopedId::Child(1, 1)]);
    }

    #[test]
    fn ids_are_deterministic() {
        let raw = vec![raw_item("A", 1, "t"), raw_item("B", 2, "t")];
        assert_eq!(assign_ids("g", &raw).unwrap(), assign_ids("g", &raw).unwrap());
    }

    #[test]
    fn empty_type_is_rejected() {
        let raw = vec![raw_item("A", 1, "t"), raw_item("B", 2, "  ")];
        let err = assign_ids("g", &raw).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyType { index: 1, .. }));
    }

    #[test]
    fn source_id_does_not_survive() {
        let mut item = raw_item("A", 1, "t");
        item.extra.insert("id".into(), Value::from(99));
        item.extra.insert("onePerArmy".into(), Value::Bool(true));
        let items = assign_ids("g", &[item]).unwrap();
        assert_eq!(items[0].id, ScopedId::Top(0));
        assert!(!items[0].extra.contains_key("id"));
        assert_eq!(items[0].extra.get("onePerArmy"), Some(&Value::Bool(true)));
    }

    #[test]
    fn build_follows_army_order_and_hardens_missing_groups() {
        let mut raw = RawCatalog::new();
        raw.insert("talisman".into(), vec![raw_item("Ward", 15, "talisman")]);
        raw.insert("banner".into(), vec![raw_item("Flag", 25, "banner")]);
        let names = NameMap::from_entries([("banner", Label::new("Banner", "Standards"))]);
        let army = vec!["banner".to_string(), "talisman".to_string(), "gone".to_string()];

        let catalog = build_catalog(&raw, &army, &names).unwrap();
        let ids: Vec<_> = catalog.groups().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["banner", "talisman", "gone"]);
        assert!(catalog.group("banner").unwrap().label.is_some());
        assert!(catalog.group("talisman").unwrap().label.is_none());
        assert!(catalog.group("gone").unwrap().items.is_empty());
        assert_eq!(catalog.item_count(), 2);
    }

    #[test]
    fn find_item_resolves_children() {
        let mut parent = raw_item("Staff", 25, "arcane");
        parent.conditional = vec![raw_item("Rune", 5, "arcane")];
        let mut raw = RawCatalog::new();
        raw.insert("arcane".into(), vec![raw_item("Scroll", 20, "arcane"), parent]);
        let catalog = build_catalog(&raw, &["arcane".to_string()], &NameMap::default()).unwrap();

        assert_eq!(
            catalog.find_item("arcane", &ScopedId::Child(1, 0)).map(|i| i.name_en.as_str()),
            Some("Rune")
        );
        assert!(catalog.find_item("arcane", &ScopedId::Child(0, 0)).is_none());
        assert!(catalog.find_item("other", &ScopedId::Top(0)).is_none());
    }

    #[test]
    fn parse_rejects_negative_points() {
        let json = r#"{ "g": [ { "name_de": "a", "name_en": "a", "points": -5, "type": "t" } ] }"#;
        assert!(parse_raw_catalog(json).is_err());
    }
}
