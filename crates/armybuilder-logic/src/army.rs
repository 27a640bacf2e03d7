//! Game system and army metadata.
//!
//! A list belongs to one game system and one army. The army declares
//! which catalog groups (`items`) it may draw magic items from; only
//! those groups are requested from the catalog source.

use serde::{Deserialize, Serialize};

use crate::errors::{ArmyError, CatalogError, CatalogResult};
use crate::labels::Language;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Army {
    pub id: String,
    pub name_de: String,
    pub name_en: String,
    /// Catalog group ids this army may draw magic items from.
    #[serde(default)]
    pub items: Vec<String>,
}

impl Army {
    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::De => &self.name_de,
            Language::En => &self.name_en,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSystem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub armies: Vec<Army>,
}

/// Resolve the army a list is built for.
pub fn find_army<'a>(
    systems: &'a [GameSystem],
    game: &str,
    army: &str,
) -> Result<&'a Army, ArmyError> {
    let system = systems
        .iter()
        .find(|s| s.id == game)
        .ok_or_else(|| ArmyError::UnknownGame(game.to_string()))?;
    system
        .armies
        .iter()
        .find(|a| a.id == army)
        .ok_or_else(|| ArmyError::UnknownArmy {
            game: game.to_string(),
            army: army.to_string(),
        })
}

/// Parse the game system table.
pub fn parse_game_systems(json: &str) -> CatalogResult<Vec<GameSystem>> {
    serde_json::from_str(json).map_err(|source| CatalogError::Json {
        what: "game systems",
        source,
    })
}
