//! View model for one render of the magic item screen.
//!
//! Turns catalog + unit + route into plain rows: group sections, type
//! headings, and item rows with their checked state. No markup.
//!
//! Type headings come from a fold over each group's item sequence: a
//! heading goes in front of every item whose type differs from the
//! previous rendered item's. The fold runs over the eligible items only,
//! so one visible run gets one heading, and each group starts fresh.

use serde::{Deserialize, Serialize};

use crate::catalog::{ItemCatalog, ItemGroup, MagicItem};
use crate::conditional::visible_children;
use crate::constraints::{resolve_role_context, Constraints, RoleContext};
use crate::engine::{compute_budget, Budget};
use crate::ids::{CompositeId, ScopedId};
use crate::labels::{Label, Language, NameMap};
use crate::ledger::SelectionLedger;
use crate::unit::{MagicRoute, SelectedRef, Unit};

/// `true` at each position where a new type run begins.
pub fn heading_markers<'a>(items: impl IntoIterator<Item = &'a MagicItem>) -> Vec<bool> {
    items
        .into_iter()
        .scan(None::<&str>, |prev, item| {
            let starts_run = *prev != Some(item.item_type.as_str());
            *prev = Some(item.item_type.as_str());
            Some(starts_run)
        })
        .collect()
}

/// Screen headline: the equipment group's own name, or a generic title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitHeadline {
    Group(Label),
    MagicItems,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeHeading {
    pub item_type: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: CompositeId,
    pub scoped: ScopedId,
    pub name: String,
    pub points: u32,
    pub checked: bool,
    /// Rendered indented under its parent.
    pub conditional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewEntry {
    Heading(TypeHeading),
    Item(ItemRow),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSection {
    pub group_id: String,
    /// `None` when the group has no label; the header is omitted.
    pub title: Option<String>,
    pub entries: Vec<ViewEntry>,
}

impl GroupSection {
    pub fn rows(&self) -> impl Iterator<Item = &ItemRow> {
        self.entries.iter().filter_map(|e| match e {
            ViewEntry::Item(row) => Some(row),
            ViewEntry::Heading(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicView {
    pub headline: UnitHeadline,
    pub budget: Budget,
    pub sections: Vec<GroupSection>,
}

impl MagicView {
    pub fn rows(&self) -> impl Iterator<Item = &ItemRow> {
        self.sections.iter().flat_map(|s| s.rows())
    }

    pub fn row(&self, id: &str) -> Option<&ItemRow> {
        self.rows().find(|r| r.id.as_str() == id)
    }
}

fn item_row(group_id: &str, item: &MagicItem, ledger: &SelectionLedger<'_>, language: Language) -> ItemRow {
    let id = CompositeId::new(group_id, &item.id);
    ItemRow {
        checked: ledger.contains(&id),
        id,
        scoped: item.id,
        name: item.name(language).to_string(),
        points: item.points,
        conditional: item.id.is_child(),
    }
}

fn build_section(
    group: &ItemGroup,
    constraints: &Constraints,
    selected: &[SelectedRef],
    names: &NameMap,
    language: Language,
) -> GroupSection {
    let ledger = SelectionLedger::new(selected);
    let eligible: Vec<&MagicItem> = group
        .items
        .iter()
        .filter(|item| constraints.is_eligible(item))
        .collect();
    let mut entries = Vec::new();

    for (item, starts_run) in eligible.iter().copied().zip(heading_markers(eligible.iter().copied())) {
        if starts_run {
            match names.type_label(&item.item_type) {
                Some(label) => entries.push(ViewEntry::Heading(TypeHeading {
                    item_type: item.item_type.clone(),
                    text: label.text(language).to_string(),
                })),
                None => log::warn!("No label for item type {:?}; heading omitted", item.item_type),
            }
        }
        entries.push(ViewEntry::Item(item_row(&group.id, item, &ledger, language)));
        for child in visible_children(&group.id, item, selected) {
            entries.push(ViewEntry::Item(item_row(&group.id, child, &ledger, language)));
        }
    }

    GroupSection {
        group_id: group.id.clone(),
        title: group.label.as_ref().map(|l| l.text(language).to_string()),
        entries,
    }
}

/// Build the full screen model for `unit` viewed through `route`.
pub fn build_view(
    catalog: &ItemCatalog,
    names: &NameMap,
    unit: &Unit,
    route: &MagicRoute,
    language: Language,
) -> MagicView {
    let context = resolve_role_context(unit, route);
    let allowance = context.and_then(|ctx| ctx.allowance(unit));
    let constraints = allowance
        .as_ref()
        .map_or_else(Constraints::none, Constraints::from_allowance);
    let selected = allowance.map_or(&[][..], |a| a.selected);

    let headline = match context {
        Some(RoleContext::EquipmentGroup { index }) => unit
            .items
            .get(index)
            .map_or(UnitHeadline::MagicItems, |slot| UnitHeadline::Group(slot.label())),
        _ => UnitHeadline::MagicItems,
    };
    let budget = context.map_or_else(Budget::default, |ctx| compute_budget(unit, &ctx));

    MagicView {
        headline,
        budget,
        sections: catalog
            .groups()
            .iter()
            .map(|group| build_section(group, &constraints, selected, names, language))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::ItemSlot;
    use serde_json::Map;

    fn item(id: ScopedId, item_type: &str) -> MagicItem {
        MagicItem {
            id,
            name_de: format!("de {id}"),
            name_en: format!("en {id}"),
            points: 10,
            item_type: item_type.into(),
            conditional: Vec::new(),
            extra: Map::new(),
        }
    }

    #[test]
    fn markers_fold_over_type_runs() {
        let items = vec![
            item(ScopedId::Top(0), "weapon"),
            item(ScopedId::Top(1), "weapon"),
            item(ScopedId::Top(2), "armour"),
            item(ScopedId::Top(3), "weapon"),
        ];
        assert_eq!(heading_markers(&items), vec![true, false, true, true]);
        assert!(heading_markers(std::iter::empty()).is_empty());
    }

    #[test]
    fn markers_carry_no_state_between_calls() {
        let a = vec![item(ScopedId::Top(0), "weapon")];
        assert_eq!(heading_markers(&a), vec![true]);
        assert_eq!(heading_markers(&a), vec![true]);
    }

    #[test]
    fn ineligible_items_and_their_headings_are_skipped() {
        let group = ItemGroup {
            id: "common".into(),
            label: Some(Label::new("Allgemein", "Common")),
            items: vec![
                item(ScopedId::Top(0), "weapon"),
                item(ScopedId::Top(1), "talisman"),
                item(ScopedId::Top(2), "talisman"),
            ],
        };
        let names = NameMap::from_entries([
            ("weapon", Label::new("Waffen", "Weapons")),
            ("talisman", Label::new("Talismane", "Talismans")),
        ]);
        let mut unit = Unit::default();
        unit.items.push(ItemSlot {
            name_de: "Magische Gegenstände".into(),
            name_en: "Magic Items".into(),
            types: vec!["talisman".into()],
            max_points: 25,
            ..ItemSlot::default()
        });
        let catalog = ItemCatalog::new(vec![group]);
        let view = build_view(&catalog, &names, &unit, &MagicRoute::group(0), Language::De);

        assert_eq!(view.headline, UnitHeadline::Group(unit.items[0].label()));
        let section = &view.sections[0];
        assert_eq!(section.title.as_deref(), Some("Allgemein"));
        assert_eq!(section.entries.len(), 3);
        assert!(matches!(&section.entries[0], ViewEntry::Heading(h) if h.text == "Talismane"));
        let ids: Vec<_> = section.rows().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["common-1", "common-2"]);
    }

    #[test]
    fn run_split_by_ineligible_item_keeps_one_heading() {
        let catalog = ItemCatalog::new(vec![ItemGroup {
            id: "g".into(),
            label: None,
            items: vec![
                item(ScopedId::Top(0), "talisman"),
                item(ScopedId::Top(1), "weapon"),
                item(ScopedId::Top(2), "talisman"),
            ],
        }]);
        let names = NameMap::from_entries([
            ("weapon", Label::new("Waffen", "Weapons")),
            ("talisman", Label::new("Talismane", "Talismans")),
        ]);
        let mut unit = Unit::default();
        unit.items.push(ItemSlot {
            types: vec!["talisman".into()],
            max_points: 50,
            ..ItemSlot::default()
        });
        let view = build_view(&catalog, &names, &unit, &MagicRoute::group(0), Language::En);

        let rendered: Vec<String> = view.sections[0]
            .entries
            .iter()
            .map(|e| match e {
                ViewEntry::Heading(h) => format!("H:{}", h.text),
                ViewEntry::Item(r) => format!("I:{}", r.id),
            })
            .collect();
        assert_eq!(rendered, vec!["H:Talismans", "I:g-0", "I:g-2"]);
    }

    #[test]
    fn missing_type_label_omits_heading() {
        let catalog = ItemCatalog::new(vec![ItemGroup {
            id: "g".into(),
            label: None,
            items: vec![item(ScopedId::Top(0), "mystery")],
        }]);
        let mut unit = Unit::default();
        unit.items.push(ItemSlot {
            types: vec!["mystery".into()],
            max_points: 10,
            ..ItemSlot::default()
        });
        let view = build_view(&catalog, &NameMap::default(), &unit, &MagicRoute::group(0), Language::En);
        let section = &view.sections[0];
        assert_eq!(section.title, None);
        assert_eq!(section.entries.len(), 1);
        assert!(matches!(section.entries[0], ViewEntry::Item(_)));
    }

    #[test]
    fn no_context_renders_nothing_selectable() {
        let catalog = ItemCatalog::new(vec![ItemGroup {
            id: "g".into(),
            label: None,
            items: vec![item(ScopedId::Top(0), "weapon")],
        }]);
        let view = build_view(&catalog, &NameMap::default(), &Unit::default(), &MagicRoute::default(), Language::En);
        assert_eq!(view.headline, UnitHeadline::MagicItems);
        assert_eq!(view.rows().count(), 0);
        assert_eq!(view.budget, Budget::default());
    }
}
