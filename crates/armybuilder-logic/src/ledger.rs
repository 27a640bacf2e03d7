//! Selection ledger: the chosen items of one role context.
//!
//! Mutations never touch the existing sequence; they return a new one.
//! Adding does not deduplicate: adding the same id twice stores two
//! entries and counts the points twice. Membership takes the first
//! match, and removal drops every entry with the id.

use crate::ids::CompositeId;
use crate::unit::SelectedRef;

#[derive(Debug, Clone, Copy)]
pub struct SelectionLedger<'a> {
    entries: &'a [SelectedRef],
}

impl<'a> SelectionLedger<'a> {
    pub fn new(entries: &'a [SelectedRef]) -> Self {
        Self { entries }
    }

    pub fn find(&self, id: &CompositeId) -> Option<&'a SelectedRef> {
        self.entries.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &CompositeId) -> bool {
        self.find(id).is_some()
    }

    /// Sum of points over every entry, duplicates included.
    pub fn total_points(&self) -> u32 {
        self.entries
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.points))
    }

    /// A copy of the sequence with `entry` appended.
    pub fn with_added(&self, entry: SelectedRef) -> Vec<SelectedRef> {
        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.extend_from_slice(self.entries);
        next.push(entry);
        next
    }

    /// A copy of the sequence without any entry whose id is `id`.
    pub fn with_removed(&self, id: &CompositeId) -> Vec<SelectedRef> {
        self.entries
            .iter()
            .filter(|s| &s.id != id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
