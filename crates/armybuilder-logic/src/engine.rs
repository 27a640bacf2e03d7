//! Selection engine: checked state, point budget, and the toggle
//! mutation.
//!
//! Every render cycle asks two questions of the unit's active role
//! context: is item X checked, and is the budget exceeded. A checkbox
//! change applies [`toggle`], which returns a whole replacement unit for
//! the list store to persist. The unit passed in is never modified.
//!
//! The budget is advisory. Selections may exceed it; doing so only sets
//! [`Budget::exceeded`].
//!
//! ```
//! use armybuilder_logic::catalog::MagicItem;
//! use armybuilder_logic::engine::{budget_for, is_checked, toggle_route};
//! use armybuilder_logic::ids::ScopedId;
//! use armybuilder_logic::unit::{ItemSlot, MagicRoute, Unit};
//!
//! let mut unit = Unit::default();
//! unit.items.push(ItemSlot { types: vec!["arcane".into()], max_points: 50, ..ItemSlot::default() });
//! let route = MagicRoute::group(0);
//! let scroll = MagicItem {
//!     id: ScopedId::Top(2),
//!     name_de: "Rolle".into(),
//!     name_en: "Scroll".into(),
//!     points: 35,
//!     item_type: "arcane".into(),
//!     conditional: Vec::new(),
//!     extra: Default::default(),
//! };
//!
//! let unit = toggle_route(&unit, &route, "arcane", &scroll, true);
//! assert!(is_checked(&unit, &route, "arcane", &ScopedId::Top(2)));
//! assert_eq!(budget_for(&unit, &route).used, 35);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::MagicItem;
use crate::conditional::is_visible;
use crate::constraints::{resolve_role_context, RoleContext};
use crate::ids::{CompositeId, ScopedId};
use crate::ledger::SelectionLedger;
use crate::unit::{MagicRoute, SelectedRef, Unit};

/// Points spent against the budget of one role context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub used: u32,
    pub max: u32,
    pub exceeded: bool,
}

impl Budget {
    pub fn new(used: u32, max: u32) -> Self {
        Self {
            used,
            max,
            exceeded: used > max,
        }
    }

    /// Points still available (zero once exceeded).
    pub fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.used)
    }
}

/// Budget of a role context on `unit`.
///
/// A context that no longer resolves on the unit has a zero budget.
pub fn compute_budget(unit: &Unit, context: &RoleContext) -> Budget {
    match context.allowance(unit) {
        Some(allowance) => Budget::new(
            SelectionLedger::new(allowance.selected).total_points(),
            allowance.max_points,
        ),
        None => Budget::default(),
    }
}

/// Budget for the context the route addresses; zero when there is none.
pub fn budget_for(unit: &Unit, route: &MagicRoute) -> Budget {
    resolve_role_context(unit, route).map_or_else(Budget::default, |ctx| compute_budget(unit, &ctx))
}

/// Whether `"<group_id>-<item_id>"` is selected in the routed context.
pub fn is_checked(unit: &Unit, route: &MagicRoute, group_id: &str, item_id: &ScopedId) -> bool {
    resolve_role_context(unit, route).is_some_and(|ctx| {
        SelectionLedger::new(ctx.selected(unit)).contains(&CompositeId::new(group_id, item_id))
    })
}

/// Select (`checked`) or deselect `item` in one role context.
///
/// Selecting appends a [`SelectedRef`]; no duplicate check is made.
/// Selecting a conditional child whose parent is not selected is
/// ignored. Deselecting removes every entry with the item's composite
/// id and is a no-op when there is none, so stale children can always
/// be cleared. Only the addressed command entry or item slot is
/// rebuilt; the rest of the unit is copied as-is.
pub fn toggle(
    unit: &Unit,
    context: &RoleContext,
    group_id: &str,
    item: &MagicItem,
    checked: bool,
) -> Unit {
    let id = CompositeId::new(group_id, &item.id);
    let current = context.selected(unit);
    if checked && !is_visible(group_id, item, current) {
        log::warn!(
            "Unit {}: parent of {} is not selected; toggle ignored",
            unit.id,
            id
        );
        return unit.clone();
    }
    let ledger = SelectionLedger::new(current);
    let selected = if checked {
        ledger.with_added(SelectedRef::from_item(group_id, item))
    } else {
        ledger.with_removed(&id)
    };

    log::debug!(
        "toggle {} checked={} on {:?} of unit {}: {} -> {} entries",
        id,
        checked,
        context,
        unit.id,
        ledger.len(),
        selected.len()
    );

    let mut next = unit.clone();
    match *context {
        RoleContext::CommandSlot { index } => {
            match next.command.get_mut(index).and_then(|e| e.magic.as_mut()) {
                Some(magic) => magic.selected = selected,
                None => log::warn!(
                    "Unit {} has no magic allowance on command entry {}; toggle ignored",
                    unit.id,
                    index
                ),
            }
        }
        RoleContext::EquipmentGroup { index } => match next.items.get_mut(index) {
            Some(slot) => slot.selected = selected,
            None => log::warn!(
                "Unit {} has no item slot {}; toggle ignored",
                unit.id,
                index
            ),
        },
    }
    next
}

/// [`toggle`] through a route. Without a role context the unit comes
/// back unchanged.
pub fn toggle_route(
    unit: &Unit,
    route: &MagicRoute,
    group_id: &str,
    item: &MagicItem,
    checked: bool,
) -> Unit {
    match resolve_role_context(unit, route) {
        Some(ctx) => toggle(unit, &ctx, group_id, item, checked),
        None => {
            log::warn!(
                "Unit {} has no magic item context for {:?}; toggle ignored",
                unit.id,
                route
            );
            unit.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditional::orphaned_children;
    use crate::unit::{CommandEntry, ItemSlot, MagicAllowance};
    use serde_json::Map;

    fn item(id: ScopedId, points: u32, item_type: &str) -> MagicItem {
        MagicItem {
            id,
            name_de: format!("Gegenstand {id}"),
            name_en: format!("Item {id}"),
            points,
            item_type: item_type.into(),
            conditional: Vec::new(),
            extra: Map::new(),
        }
    }

    fn character() -> Unit {
        let mut unit = Unit::default();
        unit.id = "wizard.1".into();
        unit.items.push(ItemSlot {
            name_en: "Magic Items".into(),
            types: vec!["arcane".into(), "talisman".into()],
            max_points: 50,
            ..ItemSlot::default()
        });
        unit.items.push(ItemSlot {
            name_en: "Extra".into(),
            types: vec!["arcane".into()],
            max_points: 25,
            ..ItemSlot::default()
        });
        unit
    }

    fn regiment() -> Unit {
        let mut unit = Unit::default();
        unit.id = "state-troops.1".into();
        unit.command.push(CommandEntry {
            name_en: "Champion".into(),
            ..CommandEntry::default()
        });
        unit.command.push(CommandEntry {
            name_en: "Standard bearer".into(),
            magic: Some(MagicAllowance {
                max_points: 50,
                types: vec!["banner".into()],
                selected: Vec::new(),
            }),
            ..CommandEntry::default()
        });
        unit
    }

    #[test]
    fn budget_exceeds_but_does_not_block() {
        let route = MagicRoute::group(0);
        let unit = toggle_route(&character(), &route, "arcane", &item(ScopedId::Top(2), 35, "arcane"), true);
        assert_eq!(budget_for(&unit, &route), Budget::new(35, 50));
        assert!(!budget_for(&unit, &route).exceeded);

        let unit = toggle_route(&unit, &route, "arcane", &item(ScopedId::Top(0), 20, "arcane"), true);
        let budget = budget_for(&unit, &route);
        assert_eq!(budget.used, 55);
        assert!(budget.exceeded);
        assert_eq!(budget.remaining(), 0);
        assert!(is_checked(&unit, &route, "arcane", &ScopedId::Top(0)));
    }

    #[test]
    fn toggle_only_rebuilds_addressed_slot() {
        let original = character();
        let ctx = RoleContext::EquipmentGroup { index: 1 };
        let next = toggle(&original, &ctx, "arcane", &item(ScopedId::Top(0), 10, "arcane"), true);

        assert!(original.items[1].selected.is_empty());
        assert_eq!(next.items[1].selected.len(), 1);
        assert_eq!(next.items[0], original.items[0]);
        assert_eq!(next.id, original.id);
    }

    #[test]
    fn toggle_command_slot() {
        let route = MagicRoute::command(1);
        let flag = item(ScopedId::Top(3), 25, "banner");
        let unit = toggle_route(&regiment(), &route, "magic-standards", &flag, true);

        let selected = &unit.command[1].magic.as_ref().unwrap().selected;
        assert_eq!(selected[0].id.as_str(), "magic-standards-3");
        assert!(is_checked(&unit, &route, "magic-standards", &ScopedId::Top(3)));
        assert_eq!(budget_for(&unit, &route).used, 25);

        let unit = toggle_route(&unit, &route, "magic-standards", &flag, false);
        assert!(unit.command[1].magic.as_ref().unwrap().selected.is_empty());
    }

    #[test]
    fn deselect_absent_id_is_noop() {
        let route = MagicRoute::group(0);
        let unit = toggle_route(&character(), &route, "arcane", &item(ScopedId::Top(1), 10, "arcane"), true);
        let after = toggle_route(&unit, &route, "arcane", &item(ScopedId::Top(4), 10, "arcane"), false);
        assert_eq!(after, unit);
    }

    #[test]
    fn duplicate_select_inflates_budget() {
        let route = MagicRoute::group(0);
        let scroll = item(ScopedId::Top(1), 20, "arcane");
        let unit = toggle_route(&character(), &route, "arcane", &scroll, true);
        let unit = toggle_route(&unit, &route, "arcane", &scroll, true);
        assert_eq!(unit.items[0].selected.len(), 2);
        assert_eq!(budget_for(&unit, &route).used, 40);

        let unit = toggle_route(&unit, &route, "arcane", &scroll, false);
        assert!(unit.items[0].selected.is_empty());
        assert!(!is_checked(&unit, &route, "arcane", &ScopedId::Top(1)));
    }

    #[test]
    fn no_context_leaves_unit_unchanged() {
        let unit = Unit::default();
        let route = MagicRoute::group(0);
        let after = toggle_route(&unit, &route, "arcane", &item(ScopedId::Top(0), 10, "arcane"), true);
        assert_eq!(after, unit);
        assert_eq!(budget_for(&unit, &route), Budget::default());
        assert!(!is_checked(&unit, &route, "arcane", &ScopedId::Top(0)));
    }

    #[test]
    fn stale_context_toggle_is_ignored() {
        let unit = regiment();
        let ctx = RoleContext::CommandSlot { index: 0 };
        let after = toggle(&unit, &ctx, "magic-standards", &item(ScopedId::Top(0), 5, "banner"), true);
        assert_eq!(after, unit);
        assert_eq!(compute_budget(&unit, &ctx), Budget::default());
    }

    #[test]
    fn child_without_selected_parent_is_rejected() {
        let route = MagicRoute::group(0);
        let child = item(ScopedId::Child(1, 0), 5, "arcane");
        let unit = character();
        let after = toggle_route(&unit, &route, "arcane", &child, true);
        assert_eq!(after, unit);
        assert!(orphaned_children("arcane", &after.items[0].selected).is_empty());

        // A parent in another group does not unlock the child
        let other = toggle_route(&unit, &route, "talisman", &item(ScopedId::Top(1), 10, "talisman"), true);
        let after = toggle_route(&other, &route, "arcane", &child, true);
        assert_eq!(after, other);
    }

    #[test]
    fn parent_and_child_ids_are_independent() {
        let route = MagicRoute::group(0);
        let parent = item(ScopedId::Top(1), 20, "arcane");
        let child = item(ScopedId::Child(1, 0), 5, "arcane");
        let unit = toggle_route(&character(), &route, "arcane", &parent, true);
        let unit = toggle_route(&unit, &route, "arcane", &child, true);
        assert!(is_checked(&unit, &route, "arcane", &ScopedId::Child(1, 0)));

        let unit = toggle_route(&unit, &route, "arcane", &parent, false);
        assert!(!is_checked(&unit, &route, "arcane", &ScopedId::Top(1)));
        assert!(is_checked(&unit, &route, "arcane", &ScopedId::Child(1, 0)));

        // Stale children can still be cleared
        let unit = toggle_route(&unit, &route, "arcane", &child, false);
        assert!(unit.items[0].selected.is_empty());
    }
}
