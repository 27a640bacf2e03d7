//! Unit records as stored in an army list.
//!
//! Only the parts the magic-item screen touches are modelled
//! explicitly: command entries with an optional magic allowance, and
//! equipment item slots. Everything else on the record is carried
//! through untouched in `extra`, so a replacement unit loses nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::MagicItem;
use crate::ids::CompositeId;
use crate::labels::{Label, Language};

/// A chosen item, denormalized so it displays without the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedRef {
    pub id: CompositeId,
    pub name_de: String,
    pub name_en: String,
    pub points: u32,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional: Vec<MagicItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SelectedRef {
    /// Copy a catalog item under its composite id within `group_id`.
    pub fn from_item(group_id: &str, item: &MagicItem) -> Self {
        Self {
            id: CompositeId::new(group_id, &item.id),
            name_de: item.name_de.clone(),
            name_en: item.name_en.clone(),
            points: item.points,
            item_type: item.item_type.clone(),
            conditional: item.conditional.clone(),
            extra: item.extra.clone(),
        }
    }

    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::De => &self.name_de,
            Language::En => &self.name_en,
        }
    }
}

/// Magic item allowance of a command slot (e.g. a standard bearer).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MagicAllowance {
    /// Point budget; zero means the slot grants no magic allowance.
    #[serde(rename = "maxPoints", default)]
    pub max_points: u32,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub selected: Vec<SelectedRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub name_de: String,
    pub name_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic: Option<MagicAllowance>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CommandEntry {
    /// The allowance, if this slot actually grants points to spend.
    pub fn active_allowance(&self) -> Option<&MagicAllowance> {
        self.magic.as_ref().filter(|m| m.max_points > 0)
    }
}

/// An equipment group on the unit (e.g. "Magic Items" for a character).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSlot {
    pub name_de: String,
    pub name_en: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(rename = "maxPoints", default)]
    pub max_points: u32,
    #[serde(default)]
    pub selected: Vec<SelectedRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemSlot {
    pub fn label(&self) -> Label {
        Label::new(self.name_de.clone(), self.name_en.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name_de: String,
    pub name_en: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<CommandEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemSlot>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Unit {
    pub fn new(id: impl Into<String>, label: Label) -> Self {
        Self {
            id: id.into(),
            name_de: label.name_de,
            name_en: label.name_en,
            ..Self::default()
        }
    }

    pub fn has_item_slots(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Which command entry or equipment group the screen is opened for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicRoute {
    pub command: Option<usize>,
    pub group: Option<usize>,
}

impl MagicRoute {
    pub fn command(index: usize) -> Self {
        Self {
            command: Some(index),
            group: None,
        }
    }

    pub fn group(index: usize) -> Self {
        Self {
            command: None,
            group: Some(index),
        }
    }

    /// Build from raw path segments; anything non-numeric is ignored.
    pub fn from_params(command: Option<&str>, group: Option<&str>) -> Self {
        Self {
            command: command.and_then(|c| c.trim().parse().ok()),
            group: group.and_then(|g| g.trim().parse().ok()),
        }
    }
}
