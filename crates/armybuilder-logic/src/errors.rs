//! Error types.
//!
//! Budget overruns are not errors: they are reported through
//! [`crate::engine::Budget::exceeded`] and never block a selection.
//! The errors here cover malformed external data and stale or
//! misaddressed requests.

use thiserror::Error;

/// Failures while reading catalog-side JSON (items, names, armies).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse {what} JSON: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("item {index} in group {group:?} has an empty type tag")]
    EmptyType { group: String, index: usize },
}

/// Failures resolving the active game system and army.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArmyError {
    #[error("unknown game system {0:?}")]
    UnknownGame(String),
    #[error("army {army:?} not found in game system {game:?}")]
    UnknownArmy { game: String, army: String },
}

/// Failures applying an asynchronously fetched catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("catalog fetch {ticket} superseded by fetch {current}")]
    Stale { ticket: u64, current: u64 },
}

/// Failures writing a replacement unit back to the list store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("list {0:?} not found")]
    UnknownList(String),
    #[error("unit {unit:?} not found in {category:?} of list {list:?}")]
    UnknownUnit {
        list: String,
        category: String,
        unit: String,
    },
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
