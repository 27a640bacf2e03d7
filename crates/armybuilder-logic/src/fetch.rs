//! Catalog loading state and stale-result rejection.
//!
//! The catalog is fetched asynchronously once per (game, army,
//! language). Every request takes a ticket from a monotonically
//! increasing generation counter; a result is applied only if its
//! ticket is still the newest. Until then the screen is `Loading`.
//!
//! ```
//! use armybuilder_logic::catalog::ItemCatalog;
//! use armybuilder_logic::fetch::{CatalogKey, CatalogSlot};
//! use armybuilder_logic::labels::Language;
//!
//! let mut slot = CatalogSlot::default();
//! let first = slot.begin(CatalogKey::new("the-old-world", "empire", Language::En));
//! let second = slot.begin(CatalogKey::new("the-old-world", "empire", Language::De));
//! assert!(slot.complete(first, ItemCatalog::default()).is_err());
//! assert!(slot.complete(second, ItemCatalog::default()).is_ok());
//! assert!(slot.catalog().is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::ItemCatalog;
use crate::errors::FetchError;
use crate::labels::Language;

/// What a catalog is fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogKey {
    pub game: String,
    pub army: String,
    pub language: Language,
}

impl CatalogKey {
    pub fn new(game: impl Into<String>, army: impl Into<String>, language: Language) -> Self {
        Self {
            game: game.into(),
            army: army.into(),
            language,
        }
    }
}

/// Proof of a started fetch; hand it back with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    key: CatalogKey,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> &CatalogKey {
        &self.key
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CatalogState {
    #[default]
    Loading,
    Ready(ItemCatalog),
}

/// Holds the session catalog and the generation of the newest fetch.
#[derive(Debug, Clone, Default)]
pub struct CatalogSlot {
    generation: u64,
    key: Option<CatalogKey>,
    state: CatalogState,
}

impl CatalogSlot {
    /// Start a fetch for `key`. Any fetch already in flight becomes stale.
    pub fn begin(&mut self, key: CatalogKey) -> FetchTicket {
        self.generation += 1;
        self.key = Some(key.clone());
        self.state = CatalogState::Loading;
        log::debug!("Catalog fetch {} started for {:?}", self.generation, key);
        FetchTicket {
            generation: self.generation,
            key,
        }
    }

    /// Apply a fetched catalog if `ticket` is still the newest fetch.
    pub fn complete(&mut self, ticket: FetchTicket, catalog: ItemCatalog) -> Result<(), FetchError> {
        if ticket.generation != self.generation {
            log::warn!(
                "Discarding stale catalog fetch {} (current {})",
                ticket.generation,
                self.generation
            );
            return Err(FetchError::Stale {
                ticket: ticket.generation,
                current: self.generation,
            });
        }
        self.state = CatalogState::Ready(catalog);
        Ok(())
    }

    /// Whether the screen must fetch again for `key`.
    pub fn needs_fetch(&self, key: &CatalogKey) -> bool {
        self.key.as_ref() != Some(key)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, CatalogState::Loading)
    }

    pub fn catalog(&self) -> Option<&ItemCatalog> {
        match &self.state {
            CatalogState::Ready(catalog) => Some(catalog),
            CatalogState::Loading => None,
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
