//! Menu selection and item resolution.

use std::sync::Arc;

use menu_config::{MenuDefinition, MenuSet, ReferenceTable};
use tracing::{debug, warn};

use crate::{ResolvedMenuItem, SubProps, adapt_item};

/// Choose the menu to show.
///
/// An explicit `filter` (or, failing that, the requested `sub_menu`) selects
/// by id and never falls back to selectors. Otherwise the first menu whose
/// selector admits the check properties wins.
pub fn find_menu<'a>(
    menus: &'a MenuSet,
    props: &SubProps,
    filter: Option<&str>,
) -> Option<&'a MenuDefinition> {
    if let Some(id) = filter.or(props.sub_menu.as_deref()) {
        return menus.get(id);
    }
    menus.iter().find(|m| m.selects(&props.check_props))
}

/// Resolve the flat, ordered item list for a menu.
///
/// Returns `None` when no menu is chosen, which callers treat as "show
/// nothing". Delegating items are expanded in place, depth first; the
/// result never contains them.
pub fn get_menu_items(
    props: &Arc<SubProps>,
    menus: &MenuSet,
    refs: &ReferenceTable,
    filter: Option<&str>,
) -> Option<Vec<ResolvedMenuItem>> {
    let Some(menu) = find_menu(menus, props, filter) else {
        debug!(filter = ?filter, "no menu matched");
        return None;
    };
    debug!(menu_id = %menu.id, "menu chosen");
    Some(menu_items(menu, props, menus, refs))
}

/// Resolve the items of an already chosen menu.
pub fn menu_items(
    menu: &MenuDefinition,
    props: &Arc<SubProps>,
    menus: &MenuSet,
    refs: &ReferenceTable,
) -> Vec<ResolvedMenuItem> {
    let mut out = Vec::new();
    expand(menu, props, menus, refs, &mut out);
    out
}

/// Append the admitted items of `menu` to `out`.
///
/// `MenuSet` guarantees an acyclic delegation graph, so this terminates.
fn expand(
    menu: &MenuDefinition,
    props: &Arc<SubProps>,
    menus: &MenuSet,
    refs: &ReferenceTable,
    out: &mut Vec<ResolvedMenuItem>,
) {
    if menu.items.is_empty() {
        warn!(menu_id = %menu.id, "menu has no items");
        return;
    }
    for spec in &menu.items {
        if !spec.admits(&props.check_props) {
            continue;
        }
        if !spec.delegating {
            out.push(adapt_item(menu.attribute.as_deref(), spec, refs, props));
            continue;
        }
        let Some(target) = spec.sub_menu.as_deref() else {
            warn!(menu_id = %menu.id, item = %spec.id, "delegating item has no sub_menu");
            continue;
        };
        match menus.get(target) {
            Some(sub) => expand(sub, props, menus, refs, out),
            None => {
                warn!(menu_id = %menu.id, sub_menu = %target, "missing sub-menu");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use menu_config::{MenuItemSpec, Predicate, RefEntry};
    use serde_json::json;

    use super::*;

    fn ids(items: &[ResolvedMenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    fn props(check: serde_json::Value) -> Arc<SubProps> {
        match check {
            serde_json::Value::Object(m) => Arc::new(SubProps::new(m)),
            _ => Arc::new(SubProps::default()),
        }
    }

    fn nested() -> MenuSet {
        MenuSet::new(vec![
            MenuDefinition::new(
                "M",
                vec![
                    MenuItemSpec::new("x", "X"),
                    MenuItemSpec::delegate("toN", "N"),
                    MenuItemSpec::new("y", "Y"),
                ],
            ),
            MenuDefinition::new(
                "N",
                vec![MenuItemSpec::new("p", "P"), MenuItemSpec::new("q", "Q")],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn first_matching_selector_wins() {
        let menus = MenuSet::new(vec![
            MenuDefinition::new("A", vec![MenuItemSpec::new("a", "A")])
                .with_selector(Predicate::Always),
            MenuDefinition::new("B", vec![MenuItemSpec::new("b", "B")])
                .with_selector(Predicate::Always),
        ])
        .unwrap();
        let chosen = find_menu(&menus, &SubProps::default(), None).map(|m| m.id.as_str());
        assert_eq!(chosen, Some("A"));
    }

    #[test]
    fn selectors_are_evaluated_against_check_props() {
        let menus = MenuSet::new(vec![
            MenuDefinition::new("length", vec![MenuItemSpec::new("a", "A")])
                .with_selector(Predicate::Eq("toolName".into(), json!("Length"))),
            MenuDefinition::new("fallback", vec![MenuItemSpec::new("b", "B")]),
        ])
        .unwrap();
        let p = props(json!({"toolName": "Length"}));
        assert_eq!(find_menu(&menus, &p, None).map(|m| m.id.as_str()), Some("length"));
        let p = props(json!({"toolName": "Angle"}));
        assert_eq!(
            find_menu(&menus, &p, None).map(|m| m.id.as_str()),
            Some("fallback")
        );
    }

    #[test]
    fn delegation_is_flattened_in_place() {
        let items = get_menu_items(&Arc::default(), &nested(), &ReferenceTable::new(), None).unwrap();
        assert_eq!(ids(&items), vec!["x", "p", "q", "y"]);
        assert!(items.iter().all(|i| !i.source.delegating));
    }

    #[test]
    fn resolution_is_deterministic() {
        let menus = nested();
        let refs = ReferenceTable::new();
        let p = props(json!({"toolName": "Length"}));
        let a = get_menu_items(&p, &menus, &refs, None);
        let b = get_menu_items(&p, &menus, &refs, None);
        assert_eq!(a, b);
    }

    #[test]
    fn excluded_items_are_absent_anywhere() {
        let hidden = Predicate::Present("nearbyToolData".into());
        let menus = MenuSet::new(vec![
            MenuDefinition::new(
                "M",
                vec![
                    MenuItemSpec::new("x", "X").with_check(hidden.clone()),
                    MenuItemSpec::delegate("toN", "N"),
                    MenuItemSpec::delegate("skipped", "N").with_check(hidden.clone()),
                ],
            ),
            MenuDefinition::new(
                "N",
                vec![
                    MenuItemSpec::new("p", "P"),
                    MenuItemSpec::new("q", "Q").with_check(hidden),
                ],
            ),
        ])
        .unwrap();
        let items = get_menu_items(&Arc::default(), &menus, &ReferenceTable::new(), None).unwrap();
        assert_eq!(ids(&items), vec!["p"]);
    }

    #[test]
    fn filter_selects_by_id_without_fallback() {
        let menus = nested();
        let refs = ReferenceTable::new();
        let items = get_menu_items(&Arc::default(), &menus, &refs, Some("N")).unwrap();
        assert_eq!(ids(&items), vec!["p", "q"]);
        assert!(get_menu_items(&Arc::default(), &menus, &refs, Some("missing")).is_none());
    }

    #[test]
    fn requested_sub_menu_is_used_when_no_filter() {
        let p = Arc::new(SubProps::default().with_sub_menu("N"));
        let items = get_menu_items(&p, &nested(), &ReferenceTable::new(), None).unwrap();
        assert_eq!(ids(&items), vec!["p", "q"]);
    }

    #[test]
    fn no_matching_menu_is_none() {
        let menus = MenuSet::new(vec![
            MenuDefinition::new("A", vec![MenuItemSpec::new("a", "A")])
                .with_selector(Predicate::Never),
        ])
        .unwrap();
        assert!(get_menu_items(&Arc::default(), &menus, &ReferenceTable::new(), None).is_none());
    }

    #[test]
    fn empty_menu_resolves_to_empty_list() {
        let menus = MenuSet::new(vec![MenuDefinition::new("A", Vec::new())]).unwrap();
        let items = get_menu_items(&Arc::default(), &menus, &ReferenceTable::new(), None);
        assert_eq!(items.map(|v| v.len()), Some(0));
    }

    #[test]
    fn dangling_delegate_contributes_nothing() {
        let menus = MenuSet::new(vec![MenuDefinition::new(
            "A",
            vec![
                MenuItemSpec::new("a", "A"),
                MenuItemSpec::delegate("gone", "nowhere"),
                MenuItemSpec {
                    id: "bare".into(),
                    delegating: true,
                    ..MenuItemSpec::default()
                },
            ],
        )])
        .unwrap();
        let items = get_menu_items(&Arc::default(), &menus, &ReferenceTable::new(), None).unwrap();
        assert_eq!(ids(&items), vec!["a"]);
    }

    #[test]
    fn delegated_menu_uses_its_own_reference_attribute() {
        let menus = MenuSet::new(vec![
            MenuDefinition::new("root", vec![MenuItemSpec::delegate("f", "findings")]),
            MenuDefinition::new(
                "findings",
                vec![MenuItemSpec {
                    id: "k1".into(),
                    ..MenuItemSpec::default()
                }
                .with_attr("code", json!("K1"))],
            )
            .with_attribute("code"),
        ])
        .unwrap();
        let refs = ReferenceTable::new().with("K1", RefEntry::new("Finding"));
        let items = get_menu_items(&Arc::default(), &menus, &refs, Some("root")).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label_ref.as_deref(), Some("Finding"));
        assert_eq!(items[0].label.as_deref(), Some("Finding"));
        assert_eq!(
            items[0].attrs.get("code"),
            Some(&json!({"text": "Finding", "ref": "K1"}))
        );
    }
}
