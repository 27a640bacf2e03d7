//! Conditional items: children that appear only under a chosen parent.
//!
//! A child is visible iff its parent's composite id is in the current
//! selection. When the parent is deselected, children already chosen
//! stay in the selection but stop rendering.

use crate::catalog::MagicItem;
use crate::ids::{CompositeId, ScopedId};
use crate::unit::SelectedRef;

fn is_selected(selected: &[SelectedRef], id: &CompositeId) -> bool {
    selected.iter().any(|s| &s.id == id)
}

/// Whether a conditional child may be shown and toggled.
///
/// Top-level items are always visible here; eligibility filtering is
/// the constraint resolver's job.
pub fn is_visible(group_id: &str, item: &MagicItem, selected: &[SelectedRef]) -> bool {
    match item.id {
        ScopedId::Top(_) => true,
        ScopedId::Child(parent, _) => {
            is_selected(selected, &CompositeId::new(group_id, &ScopedId::Top(parent)))
        }
    }
}

/// The children of `parent` that are currently visible.
pub fn visible_children<'a>(
    group_id: &str,
    parent: &'a MagicItem,
    selected: &[SelectedRef],
) -> &'a [MagicItem] {
    if parent.has_conditional()
        && is_selected(selected, &CompositeId::new(group_id, &parent.id))
    {
        &parent.conditional
    } else {
        &[]
    }
}

/// Selected children whose parent is no longer selected.
///
/// These linger in saved lists; they still count towards the budget.
pub fn orphaned_children<'a>(group_id: &str, selected: &'a [SelectedRef]) -> Vec<&'a SelectedRef> {
    selected
        .iter()
        .filter(|s| match s.id.scoped_in(group_id) {
            Some(ScopedId::Child(parent, _)) => !is_selected(
                selected,
                &CompositeId::new(group_id, &ScopedId::Top(parent)),
            ),
            _ => false,
        })
        .collect()
}
