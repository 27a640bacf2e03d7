//! Bilingual labels and the name/translation table.
//!
//! Every catalog entity carries a German and an English name. Group
//! headers and item-type headings are looked up in a separate table
//! keyed by group id or type tag. Lookups are total: a missing key is
//! `None`, and callers omit the heading rather than fail.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CatalogError, CatalogResult};

/// Display language of the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    #[default]
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "de" => Ok(Language::De),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language {other:?} (expected de or en)")),
        }
    }
}

/// A name in both supported languages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Label {
    pub name_de: String,
    pub name_en: String,
}

impl Label {
    pub fn new(name_de: impl Into<String>, name_en: impl Into<String>) -> Self {
        Self {
            name_de: name_de.into(),
            name_en: name_en.into(),
        }
    }

    pub fn text(&self, language: Language) -> &str {
        match language {
            Language::De => &self.name_de,
            Language::En => &self.name_en,
        }
    }
}

/// Translation table for group ids and item type tags.
///
/// Group ids and type tags share one key space in the source data
/// (`"talisman"` is both a type and, in some armies, a group).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameMap {
    entries: HashMap<String, Label>,
}

impl NameMap {
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Label)>,
        K: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Label> {
        self.entries.get(key)
    }

    /// Header label for a catalog group.
    pub fn group_label(&self, group_id: &str) -> Option<&Label> {
        self.get(group_id)
    }

    /// Heading label for an item type tag.
    pub fn type_label(&self, item_type: &str) -> Option<&Label> {
        self.get(item_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the translation table from its JSON document.
pub fn parse_name_map(json: &str) -> CatalogResult<NameMap> {
    serde_json::from_str(json).map_err(|source| CatalogError::Json {
        what: "name map",
        source,
    })
}
