//! Pure magic item selection logic for the army builder.
//!
//! This crate holds the rules behind the magic item screen, independent
//! of any UI, storage, or network layer. Functions take plain data and
//! return new values, so every rule is unit-testable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`army`] | Game systems, armies, and the catalog groups an army may use |
//! | [`catalog`] | Catalog building and positional id assignment |
//! | [`conditional`] | Visibility of items unlocked by a chosen parent |
//! | [`constraints`] | Role context resolution (command slot vs equipment group) |
//! | [`engine`] | Toggle mutation, checked state, point budget |
//! | [`errors`] | Error types for malformed data, stale fetches, store misses |
//! | [`fetch`] | Catalog loading state with stale-result rejection |
//! | [`ids`] | Group-scoped and composite item ids |
//! | [`labels`] | German/English labels and the translation table |
//! | [`ledger`] | Immutable add/remove/sum over a selection |
//! | [`store`] | Army list store boundary and in-memory implementation |
//! | [`unit`] | Unit records, selections, and screen routes |
//! | [`view`] | Per-render view model with type headings |

pub mod army;
pub mod catalog;
pub mod conditional;
pub mod constraints;
pub mod engine;
pub mod errors;
pub mod fetch;
pub mod ids;
pub mod labels;
pub mod ledger;
pub mod store;
pub mod unit;
pub mod view;
