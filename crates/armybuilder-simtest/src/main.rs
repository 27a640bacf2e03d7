//! Army Builder Headless Harness
//!
//! Validates the bundled catalog data and the magic item selection
//! logic without any UI. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p armybuilder-simtest
//!   cargo run -p armybuilder-simtest -- --verbose --language de
//!   cargo run -p armybuilder-simtest -- --data-dir ./data

use std::path::{Path, PathBuf};

use armybuilder_logic::army::{self, GameSystem};
use armybuilder_logic::catalog::{self, ItemCatalog, RawCatalog};
use armybuilder_logic::conditional;
use armybuilder_logic::constraints::{self, RoleContext};
use armybuilder_logic::engine;
use armybuilder_logic::fetch::{CatalogKey, CatalogSlot};
use armybuilder_logic::ids::ScopedId;
use armybuilder_logic::labels::{self, Language, NameMap};
use armybuilder_logic::store::{ArmyList, ListStore, MemoryListStore};
use armybuilder_logic::unit::{MagicRoute, Unit};
use armybuilder_logic::view::{self, UnitHeadline, ViewEntry};
use clap::Parser;

// ── Bundled data (same JSON the builder ships) ──────────────────────────
const MAGIC_ITEMS_JSON: &str = include_str!("../../../data/magic_items.json");
const NAME_MAP_JSON: &str = include_str!("../../../data/name_map.json");
const ARMIES_JSON: &str = include_str!("../../../data/armies.json");
const ARMY_LIST_JSON: &str = include_str!("../../../data/army_list.json");

const GAME: &str = "the-old-world";
const ARMY: &str = "empire-of-man";

#[derive(Debug, Parser)]
#[command(name = "armybuilder-simtest", about = "Validate catalog data and selection logic")]
struct Args {
    /// Print details for passing checks too.
    #[arg(short, long)]
    verbose: bool,
    /// Label language for rendered views (de or en).
    #[arg(short, long, default_value = "en")]
    language: Language,
    /// Read the JSON documents from this directory instead of the bundled copies.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct DataSet {
    raw: RawCatalog,
    names: NameMap,
    systems: Vec<GameSystem>,
    list: ArmyList,
}

fn read_documents(dir: Option<&Path>) -> Result<[String; 4], String> {
    let files = [
        "magic_items.json",
        "name_map.json",
        "armies.json",
        "army_list.json",
    ];
    match dir {
        None => Ok([
            MAGIC_ITEMS_JSON.to_string(),
            NAME_MAP_JSON.to_string(),
            ARMIES_JSON.to_string(),
            ARMY_LIST_JSON.to_string(),
        ]),
        Some(dir) => {
            let read = |name: &str| {
                let path = dir.join(name);
                std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path.display(), e))
            };
            Ok([
                read(files[0])?,
                read(files[1])?,
                read(files[2])?,
                read(files[3])?,
            ])
        }
    }
}

fn load_data(dir: Option<&Path>) -> Result<DataSet, String> {
    let [items, names, armies, list] = read_documents(dir)?;
    Ok(DataSet {
        raw: catalog::parse_raw_catalog(&items).map_err(|e| e.to_string())?,
        names: labels::parse_name_map(&names).map_err(|e| e.to_string())?,
        systems: army::parse_game_systems(&armies).map_err(|e| e.to_string())?,
        list: serde_json::from_str(&list).map_err(|e| format!("army list: {}", e))?,
    })
}

fn main() {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .with_target(false)
        .init();

    println!("=== Army Builder Magic Item Harness ===\n");

    let data = match load_data(args.data_dir.as_deref()) {
        Ok(data) => data,
        Err(e) => {
            println!("  ✗ data_load: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Loaded {} catalog groups, {} name entries, {} game systems",
        data.raw.len(),
        data.names.len(),
        data.systems.len()
    );

    let mut results = Vec::new();

    // 1. Data consistency
    results.extend(validate_data(&data, args.verbose));

    let catalog = match build_empire_catalog(&data) {
        Ok(catalog) => catalog,
        Err(e) => {
            println!("  ✗ catalog_build: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Id assignment
    results.extend(validate_ids(&data, &catalog));

    // 3. Budget
    results.extend(validate_budget(&catalog));

    // 4. Conditional items
    results.extend(validate_conditional(&catalog));

    // 5. Command slot eligibility
    results.extend(validate_command_slot(&data, &catalog));

    // 6. Catalog fetch sequencing
    results.extend(validate_fetch(&data));

    // 7. Store round trip
    results.extend(validate_store(&data, &catalog));

    // 8. Rendered views
    results.extend(validate_views(&data, &catalog, args.language, args.verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn build_empire_catalog(data: &DataSet) -> Result<ItemCatalog, String> {
    let army = army::find_army(&data.systems, GAME, ARMY).map_err(|e| e.to_string())?;
    catalog::build_catalog(&data.raw, &army.items, &data.names).map_err(|e| e.to_string())
}

fn wizard(data: &DataSet) -> Unit {
    data.list
        .unit("characters", "wizard.1")
        .cloned()
        .unwrap_or_default()
}

fn regiment(data: &DataSet) -> Unit {
    data.list
        .unit("core", "state-troops.1")
        .cloned()
        .unwrap_or_default()
}

fn item_in<'a>(
    catalog: &'a ItemCatalog,
    group: &str,
    id: ScopedId,
) -> Option<&'a armybuilder_logic::catalog::MagicItem> {
    catalog.find_item(group, &id)
}

// ── 1. Data ─────────────────────────────────────────────────────────────

fn validate_data(data: &DataSet, verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog Data ---");
    let mut results = Vec::new();

    let armies: Vec<_> = data.systems.iter().flat_map(|s| &s.armies).collect();
    results.push(TestResult {
        name: "data_armies_loaded".into(),
        passed: !armies.is_empty(),
        detail: format!("{} armies in {} game systems", armies.len(), data.systems.len()),
    });

    // Every group an army declares is in the catalog source
    let missing: Vec<_> = armies
        .iter()
        .flat_map(|a| a.items.iter().map(move |g| (a.id.as_str(), g.as_str())))
        .filter(|(_, g)| !data.raw.contains_key(*g))
        .collect();
    results.push(TestResult {
        name: "data_army_groups_exist".into(),
        passed: missing.is_empty(),
        detail: if missing.is_empty() {
            "every declared group has catalog items".into()
        } else {
            format!("missing groups: {:?}", missing)
        },
    });

    // Every item type has a heading label
    let mut unlabelled: Vec<&str> = data
        .raw
        .values()
        .flatten()
        .flat_map(|item| std::iter::once(item).chain(item.conditional.iter()))
        .map(|item| item.item_type.as_str())
        .filter(|t| data.names.type_label(t).is_none())
        .collect();
    unlabelled.sort_unstable();
    unlabelled.dedup();
    results.push(TestResult {
        name: "data_type_labels".into(),
        passed: unlabelled.is_empty(),
        detail: if unlabelled.is_empty() {
            "all item types have labels".into()
        } else {
            format!("unlabelled types: {}", unlabelled.join(", "))
        },
    });

    // Unlabelled groups are tolerated but reported
    let unlabelled_groups: Vec<_> = data
        .raw
        .keys()
        .filter(|g| data.names.group_label(g).is_none())
        .map(String::as_str)
        .collect();
    results.push(TestResult {
        name: "data_group_labels".into(),
        passed: true,
        detail: format!("{} groups without header label", unlabelled_groups.len()),
    });

    if verbose {
        let mut groups: Vec<_> = data.raw.iter().collect();
        groups.sort_by(|a, b| a.0.cmp(b.0));
        println!("  Items per group:");
        for (id, items) in groups {
            println!("    {:16}: {}", id, items.len());
        }
    }

    results
}

// ── 2. Ids ──────────────────────────────────────────────────────────────

fn validate_ids(data: &DataSet, catalog: &ItemCatalog) -> Vec<TestResult> {
    println!("--- Id Assignment ---");
    let mut results = Vec::new();

    let positional = catalog.groups().iter().all(|g| {
        g.items
            .iter()
            .enumerate()
            .all(|(i, item)| item.id == ScopedId::Top(i))
    });
    results.push(TestResult {
        name: "ids_positional".into(),
        passed: positional,
        detail: format!("{} top-level items", catalog.item_count()),
    });

    let children_ok = catalog.groups().iter().all(|g| {
        g.items.iter().enumerate().all(|(p, item)| {
            item.conditional
                .iter()
                .enumerate()
                .all(|(c, child)| child.id == ScopedId::Child(p, c))
        })
    });
    results.push(TestResult {
        name: "ids_children_composite".into(),
        passed: children_ok,
        detail: "conditional children use <parent>-<child>".into(),
    });

    let rebuilt = build_empire_catalog(data);
    results.push(TestResult {
        name: "ids_deterministic".into(),
        passed: rebuilt.as_ref() == Ok(catalog),
        detail: "rebuilding the catalog yields the same ids".into(),
    });

    results
}

// ── 3. Budget ───────────────────────────────────────────────────────────

fn validate_budget(catalog: &ItemCatalog) -> Vec<TestResult> {
    println!("--- Budget ---");
    let mut results = Vec::new();

    let mut unit = Unit::default();
    unit.id = "scenario.budget".into();
    unit.items.push(armybuilder_logic::unit::ItemSlot {
        types: vec!["arcane".into()],
        max_points: 50,
        ..Default::default()
    });
    let route = MagicRoute::group(0);

    let (Some(scroll), Some(stone)) = (
        item_in(catalog, "arcane-items", ScopedId::Top(2)),
        item_in(catalog, "arcane-items", ScopedId::Top(0)),
    ) else {
        results.push(TestResult {
            name: "budget_items_present".into(),
            passed: false,
            detail: "arcane-items 0 and 2 missing from catalog".into(),
        });
        return results;
    };

    let unit = engine::toggle_route(&unit, &route, "arcane-items", scroll, true);
    let first = engine::budget_for(&unit, &route);
    results.push(TestResult {
        name: "budget_within".into(),
        passed: first.used == 35 && !first.exceeded,
        detail: format!("used={} max={} exceeded={}", first.used, first.max, first.exceeded),
    });

    let unit = engine::toggle_route(&unit, &route, "arcane-items", stone, true);
    let second = engine::budget_for(&unit, &route);
    results.push(TestResult {
        name: "budget_exceeded_not_blocked".into(),
        passed: second.used == 55
            && second.exceeded
            && engine::is_checked(&unit, &route, "arcane-items", &ScopedId::Top(0)),
        detail: format!("used={} max={} exceeded={}", second.used, second.max, second.exceeded),
    });

    let unit = engine::toggle_route(&unit, &route, "arcane-items", stone, false);
    let third = engine::budget_for(&unit, &route);
    results.push(TestResult {
        name: "budget_decreases_on_remove".into(),
        passed: third.used == 35 && !third.exceeded,
        detail: format!("used={} after removing Power Stone", third.used),
    });

    results
}

// ── 4. Conditional items ────────────────────────────────────────────────

fn validate_conditional(catalog: &ItemCatalog) -> Vec<TestResult> {
    println!("--- Conditional Items ---");
    let mut results = Vec::new();

    let Some(book) = item_in(catalog, "arcane-items", ScopedId::Top(1)) else {
        results.push(TestResult {
            name: "conditional_parent_present".into(),
            passed: false,
            detail: "arcane-items 1 missing".into(),
        });
        return results;
    };

    let mut unit = Unit::default();
    unit.id = "scenario.conditional".into();
    unit.items.push(armybuilder_logic::unit::ItemSlot {
        types: vec!["arcane".into()],
        max_points: 100,
        ..Default::default()
    });
    let route = MagicRoute::group(0);
    let ctx = RoleContext::EquipmentGroup { index: 0 };

    let hidden = conditional::visible_children("arcane-items", book, ctx.selected(&unit)).is_empty();
    results.push(TestResult {
        name: "conditional_hidden_without_parent".into(),
        passed: hidden,
        detail: "child of Book of Secrets hidden before selection".into(),
    });

    let unit = engine::toggle_route(&unit, &route, "arcane-items", book, true);
    let visible = conditional::visible_children("arcane-items", book, ctx.selected(&unit));
    results.push(TestResult {
        name: "conditional_visible_with_parent".into(),
        passed: visible.len() == 1,
        detail: format!("{} children visible", visible.len()),
    });

    let Some(chapter) = visible.first() else {
        return results;
    };
    let unit = engine::toggle_route(&unit, &route, "arcane-items", chapter, true);
    let stored = ctx
        .selected(&unit)
        .iter()
        .any(|s| s.id.as_str() == "arcane-items-1-0");
    results.push(TestResult {
        name: "conditional_child_selected".into(),
        passed: stored,
        detail: "child stored as arcane-items-1-0".into(),
    });

    // Deselecting the parent leaves the child behind, unrendered
    let unit = engine::toggle_route(&unit, &route, "arcane-items", book, false);
    let orphans = conditional::orphaned_children("arcane-items", ctx.selected(&unit));
    results.push(TestResult {
        name: "conditional_no_cascade".into(),
        passed: orphans.len() == 1
            && conditional::visible_children("arcane-items", book, ctx.selected(&unit)).is_empty(),
        detail: format!("{} stale child selections kept", orphans.len()),
    });

    results
}

// ── 5. Command slot ─────────────────────────────────────────────────────

fn validate_command_slot(data: &DataSet, catalog: &ItemCatalog) -> Vec<TestResult> {
    println!("--- Command Slot ---");
    let mut results = Vec::new();

    let unit = regiment(data);
    let route = MagicRoute {
        command: Some(1),
        group: Some(0),
    };
    let constraints = constraints::resolve(&unit, &route);
    let eligible: Vec<_> = catalog
        .groups()
        .iter()
        .flat_map(|g| &g.items)
        .filter(|item| constraints.is_eligible(item))
        .collect();

    results.push(TestResult {
        name: "command_only_banners".into(),
        passed: !eligible.is_empty() && eligible.iter().all(|i| i.item_type == "banner"),
        detail: format!("{} eligible items, budget {}", eligible.len(), constraints.max_points),
    });

    let champion = constraints::resolve_role_context(&unit, &MagicRoute::command(0));
    results.push(TestResult {
        name: "command_without_allowance".into(),
        passed: champion.is_none(),
        detail: "champion has no magic allowance".into(),
    });

    results
}

// ── 6. Fetch ────────────────────────────────────────────────────────────

fn validate_fetch(data: &DataSet) -> Vec<TestResult> {
    println!("--- Catalog Fetch ---");
    let mut results = Vec::new();

    let mut slot = CatalogSlot::default();
    let stale = slot.begin(CatalogKey::new(GAME, ARMY, Language::En));
    let fresh = slot.begin(CatalogKey::new(GAME, "dwarfen-mountain-holds", Language::En));

    let dwarf_catalog = army::find_army(&data.systems, GAME, "dwarfen-mountain-holds")
        .map_err(|e| e.to_string())
        .and_then(|a| {
            catalog::build_catalog(&data.raw, &a.items, &data.names).map_err(|e| e.to_string())
        });
    let empire_catalog = build_empire_catalog(data);

    let (Ok(dwarf_catalog), Ok(empire_catalog)) = (dwarf_catalog, empire_catalog) else {
        results.push(TestResult {
            name: "fetch_catalogs_build".into(),
            passed: false,
            detail: "could not build catalogs".into(),
        });
        return results;
    };

    let rejected = slot.complete(stale, empire_catalog).is_err();
    let applied = slot.complete(fresh, dwarf_catalog).is_ok();
    let shows_dwarfs = slot
        .catalog()
        .is_some_and(|c| c.group("dwarf-runes").is_some());
    results.push(TestResult {
        name: "fetch_stale_rejected".into(),
        passed: rejected && applied && shows_dwarfs,
        detail: format!(
            "stale rejected={} fresh applied={} generation={}",
            rejected,
            applied,
            slot.generation()
        ),
    });

    results
}

// ── 7. Store ────────────────────────────────────────────────────────────

fn validate_store(data: &DataSet, catalog: &ItemCatalog) -> Vec<TestResult> {
    println!("--- List Store ---");
    let mut results = Vec::new();

    let mut store = MemoryListStore::new(vec![data.list.clone()]);
    let route = MagicRoute::group(0);
    let list_id = data.list.id.clone();

    let Some(ward) = item_in(catalog, "talismans", ScopedId::Top(0)) else {
        results.push(TestResult {
            name: "store_item_present".into(),
            passed: false,
            detail: "talismans 0 missing".into(),
        });
        return results;
    };

    let updated = engine::toggle_route(&wizard(data), &route, "talismans", ward, true);
    let saved = store.replace_unit(&list_id, "characters", updated);
    let persisted = store
        .unit(&list_id, "characters", "wizard.1")
        .is_some_and(|u| engine::is_checked(u, &route, "talismans", &ScopedId::Top(0)));
    let untouched = store.unit(&list_id, "core", "state-troops.1") == data.list.unit("core", "state-troops.1");

    results.push(TestResult {
        name: "store_persists_toggle".into(),
        passed: saved.is_ok() && persisted && untouched,
        detail: format!("saved={:?} persisted={} siblings untouched={}", saved, persisted, untouched),
    });

    results
}

// ── 8. Views ────────────────────────────────────────────────────────────

fn validate_views(
    data: &DataSet,
    catalog: &ItemCatalog,
    language: Language,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Rendered Views ---");
    let mut results = Vec::new();

    let unit = wizard(data);
    let route = MagicRoute::group(0);
    let view = view::build_view(catalog, &data.names, &unit, &route, language);

    results.push(TestResult {
        name: "view_headline_group".into(),
        passed: matches!(view.headline, UnitHeadline::Group(_)),
        detail: format!("{:?}", view.headline),
    });

    let banners_hidden = view
        .sections
        .iter()
        .find(|s| s.group_id == "magic-standards")
        .is_some_and(|s| s.entries.is_empty());
    results.push(TestResult {
        name: "view_ineligible_hidden".into(),
        passed: banners_hidden,
        detail: "wizard sees no magic standards".into(),
    });

    let headings: usize = view
        .sections
        .iter()
        .flat_map(|s| &s.entries)
        .filter(|e| matches!(e, ViewEntry::Heading(_)))
        .count();
    results.push(TestResult {
        name: "view_type_headings".into(),
        passed: headings > 0,
        detail: format!("{} type headings, {} rows", headings, view.rows().count()),
    });

    if verbose {
        println!(
            "  Wizard ({}): {}/{} points",
            language.code(),
            view.budget.used,
            view.budget.max
        );
        for section in &view.sections {
            if section.entries.is_empty() {
                continue;
            }
            println!("    [{}]", section.title.as_deref().unwrap_or(&section.group_id));
            for entry in &section.entries {
                match entry {
                    ViewEntry::Heading(h) => println!("      -- {}", h.text),
                    ViewEntry::Item(row) => println!(
                        "      {}[{}] {} ({} pts)",
                        if row.conditional { "  " } else { "" },
                        if row.checked { "x" } else { " " },
                        row.name,
                        row.points
                    ),
                }
            }
        }
    }

    results
}
