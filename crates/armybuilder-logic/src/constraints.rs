//! Role context resolution: which item types a unit may take, and
//! how many points it may spend.
//!
//! A unit is viewed through exactly one role context per screen:
//!
//! | Context | Source | Chosen when |
//! |---------|--------|-------------|
//! | Command slot | `unit.command[route.command].magic` | the allowance has a non-zero budget |
//! | Equipment group | `unit.items[route.group]` | otherwise, if the unit has item slots |
//! | none | n/a | neither applies; nothing is selectable |
//!
//! The command slot is authoritative when it applies: its types filter
//! the catalog regardless of any equipment groups on the same unit.
//!
//! ```
//! use armybuilder_logic::constraints::{resolve, resolve_role_context, RoleContext};
//! use armybuilder_logic::unit::{ItemSlot, MagicRoute, Unit};
//!
//! let mut unit = Unit::default();
//! unit.items.push(ItemSlot { types: vec!["talisman".into()], max_points: 50, ..ItemSlot::default() });
//! let route = MagicRoute::group(0);
//! assert_eq!(resolve_role_context(&unit, &route), Some(RoleContext::EquipmentGroup { index: 0 }));
//! assert_eq!(resolve(&unit, &route).max_points, 50);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::MagicItem;
use crate::unit::{MagicRoute, SelectedRef, Unit};

/// The single role through which a unit's magic items are edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleContext {
    CommandSlot { index: usize },
    EquipmentGroup { index: usize },
}

/// Borrowed view of the allowance a role context points at.
#[derive(Debug, Clone, Copy)]
pub struct Allowance<'a> {
    pub types: &'a [String],
    pub max_points: u32,
    pub selected: &'a [SelectedRef],
}

impl RoleContext {
    /// Look up the addressed allowance on `unit`.
    ///
    /// `None` if the unit no longer has the addressed entry.
    pub fn allowance<'a>(&self, unit: &'a Unit) -> Option<Allowance<'a>> {
        match *self {
            RoleContext::CommandSlot { index } => unit
                .command
                .get(index)
                .and_then(|entry| entry.magic.as_ref())
                .map(|magic| Allowance {
                    types: &magic.types,
                    max_points: magic.max_points,
                    selected: &magic.selected,
                }),
            RoleContext::EquipmentGroup { index } => unit.items.get(index).map(|slot| Allowance {
                types: &slot.types,
                max_points: slot.max_points,
                selected: &slot.selected,
            }),
        }
    }

    /// Current selection of the addressed allowance (empty if missing).
    pub fn selected<'a>(&self, unit: &'a Unit) -> &'a [SelectedRef] {
        self.allowance(unit).map_or(&[][..], |a| a.selected)
    }
}

/// Decide which role context the route addresses on this unit.
pub fn resolve_role_context(unit: &Unit, route: &MagicRoute) -> Option<RoleContext> {
    if let Some(index) = route.command {
        if unit
            .command
            .get(index)
            .and_then(|entry| entry.active_allowance())
            .is_some()
        {
            return Some(RoleContext::CommandSlot { index });
        }
    }

    if unit.has_item_slots() {
        if let Some(index) = route.group {
            if index < unit.items.len() {
                return Some(RoleContext::EquipmentGroup { index });
            }
        }
    }

    None
}

/// Eligible item types and point budget for one role context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    pub eligible_types: BTreeSet<String>,
    pub max_points: u32,
}

impl Constraints {
    /// No context: nothing eligible, zero budget.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_allowance(allowance: &Allowance<'_>) -> Self {
        Self {
            eligible_types: allowance.types.iter().cloned().collect(),
            max_points: allowance.max_points,
        }
    }

    pub fn is_eligible(&self, item: &MagicItem) -> bool {
        self.eligible_types.contains(&item.item_type)
    }

    pub fn is_empty(&self) -> bool {
        self.eligible_types.is_empty()
    }
}

/// Resolve the constraints for a unit viewed through `route`.
pub fn resolve(unit: &Unit, route: &MagicRoute) -> Constraints {
    resolve_role_context(unit, route)
        .and_then(|ctx| ctx.allowance(unit))
        .map_or_else(Constraints::none, |a| Constraints::from_allowance(&a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ScopedId;
    use crate::unit::{CommandEntry, ItemSlot, MagicAllowance};
    use serde_json::Map;

    fn item(item_type: &str) -> MagicItem {
        MagicItem {
            id: ScopedId::Top(0),
            name_de: "x".into(),
            name_en: "x".into(),
            points: 10,
            item_type: item_type.into(),
            conditional: Vec::new(),
            extra: Map::new(),
        }
    }

    fn banner_unit() -> Unit {
        let mut unit = Unit::default();
        unit.command.push(CommandEntry::default());
        unit.command.push(CommandEntry {
            magic: Some(MagicAllowance {
                max_points: 50,
                types: vec!["banner".into()],
                selected: Vec::new(),
            }),
            ..CommandEntry::default()
        });
        unit.items.push(ItemSlot {
            types: vec!["weapon".into(), "talisman".into()],
            max_points: 100,
            ..ItemSlot::default()
        });
        unit
    }

    #[test]
    fn command_slot_wins_over_items() {
        let unit = banner_unit();
        let route = MagicRoute {
            command: Some(1),
            group: Some(0),
        };
        assert_eq!(
            resolve_role_context(&unit, &route),
            Some(RoleContext::CommandSlot { index: 1 })
        );
        let c = resolve(&unit, &route);
        assert_eq!(c.max_points, 50);
        assert!(c.is_eligible(&item("banner")));
        assert!(!c.is_eligible(&item("weapon")));
    }

    #[test]
    fn command_without_allowance_falls_back_to_group() {
        let unit = banner_unit();
        let route = MagicRoute {
            command: Some(0),
            group: Some(0),
        };
        assert_eq!(
            resolve_role_context(&unit, &route),
            Some(RoleContext::EquipmentGroup { index: 0 })
        );
        assert_eq!(resolve(&unit, &route).max_points, 100);
    }

    #[test]
    fn missing_context_is_empty() {
        let unit = Unit::default();
        let c = resolve(&unit, &MagicRoute::command(0));
        assert!(c.is_empty());
        assert_eq!(c.max_points, 0);
        assert_eq!(c, Constraints::none());
    }

    #[test]
    fn out_of_range_indices_do_not_panic() {
        let unit = banner_unit();
        assert_eq!(resolve_role_context(&unit, &MagicRoute::command(9)), None);
        assert_eq!(resolve_role_context(&unit, &MagicRoute::group(9)), None);
        assert!(RoleContext::EquipmentGroup { index: 9 }.selected(&unit).is_empty());
    }
}
