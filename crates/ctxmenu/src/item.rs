//! Adapting declared items into activatable, display-ready items.

use std::sync::Arc;

use menu_config::{ActionKind, CustomAction, MenuItemSpec, Props, ReferenceTable};
use serde_json::Value;
use tracing::warn;

use crate::InteractionEvent;

/// Properties shared by every item of one resolution pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubProps {
    /// Properties that selectors and item filters are evaluated against.
    pub check_props: Props,
    /// The event that triggered the menu, if any.
    pub event: Option<InteractionEvent>,
    /// Menu id requested by a sub-menu activation. Consulted when no
    /// explicit filter is given.
    pub sub_menu: Option<String>,
}

impl SubProps {
    /// Props with only check properties set.
    pub fn new(check_props: Props) -> Self {
        Self {
            check_props,
            ..Self::default()
        }
    }

    /// Attach the triggering event.
    pub fn with_event(mut self, event: InteractionEvent) -> Self {
        self.event = Some(event);
        self
    }

    /// Request a specific sub-menu.
    pub fn with_sub_menu(mut self, id: impl Into<String>) -> Self {
        self.sub_menu = Some(id.into());
        self
    }
}

/// What happens when an item is activated.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemBinding {
    /// Close the panel, then route to the host handler for this kind.
    Dispatch(ActionKind),
    /// Invoke a code-installed callback instead of the host handler.
    Custom(CustomAction),
}

/// Outcome of routing an activation to a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handled {
    /// The host ran a handler.
    Yes,
    /// The host has no handler for the action kind.
    NoHandler,
}

/// The host side of an item activation, normally the session controller.
pub trait ActionTarget {
    /// Failure raised by a handler.
    type Error;

    /// Close the panel hosting the menu.
    fn close(&mut self);

    /// Run the handler bound to `kind` for `item`.
    fn dispatch(
        &mut self,
        kind: ActionKind,
        item: &ResolvedMenuItem,
    ) -> Result<Handled, Self::Error>;
}

/// An adapted item ready to be shown and activated.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedMenuItem {
    /// Declared id.
    pub id: String,
    /// Display label: explicit label, else the reference text.
    pub label: Option<String>,
    /// Display text of the resolved reference, if any.
    pub label_ref: Option<String>,
    /// Echo of the object that triggered the menu (`check_props.value`).
    pub value: Option<Value>,
    /// Item attributes with the reference attribute replaced by its entry.
    pub attrs: Props,
    /// The declaration as written.
    pub source: MenuItemSpec,
    /// Activation behavior.
    pub binding: ItemBinding,
    /// Properties of the pass that produced this item.
    pub props: Arc<SubProps>,
}

impl ResolvedMenuItem {
    /// Activate the item against `target`.
    ///
    /// Dispatch bindings close the panel first. A host without a handler for
    /// the item's kind is logged and treated as a no-op.
    pub fn activate<T: ActionTarget>(&self, target: &mut T) -> Result<(), T::Error> {
        match &self.binding {
            ItemBinding::Custom(action) => {
                (action.0)(&self.source, &self.props.check_props);
                Ok(())
            }
            ItemBinding::Dispatch(kind) => {
                target.close();
                if target.dispatch(*kind, self)? == Handled::NoHandler {
                    warn!(item = %self.id, kind = ?kind, "no action handler for menu item");
                }
                Ok(())
            }
        }
    }

    /// Display label, or the id when nothing better is known.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Replace the attribute named by `attribute` with its reference-table entry.
///
/// Returns the rewritten attributes and the entry's display text. Unknown
/// keys leave the attributes untouched.
pub fn parse_item_references(
    attribute: Option<&str>,
    spec: &MenuItemSpec,
    refs: &ReferenceTable,
) -> (Props, Option<String>) {
    let mut attrs = spec.attrs.clone();
    let Some(attribute) = attribute else {
        return (attrs, None);
    };
    let Some(key) = spec.reference_key(attribute) else {
        return (attrs, None);
    };
    match refs.get(key) {
        Some(entry) => {
            let text = entry.text.clone();
            attrs.insert(attribute.to_string(), entry.to_value(key));
            (attrs, Some(text))
        }
        None => {
            warn!(item = %spec.id, reference = %key, "missing reference entry");
            (attrs, None)
        }
    }
}

/// Adapt one declared item for display.
pub fn adapt_item(
    attribute: Option<&str>,
    spec: &MenuItemSpec,
    refs: &ReferenceTable,
    props: &Arc<SubProps>,
) -> ResolvedMenuItem {
    let (attrs, label_ref) = parse_item_references(attribute, spec, refs);
    let binding = match &spec.action {
        Some(action) => ItemBinding::Custom(action.clone()),
        None => ItemBinding::Dispatch(spec.action_type),
    };
    ResolvedMenuItem {
        id: spec.id.clone(),
        label: spec.label.clone().or_else(|| label_ref.clone()),
        label_ref,
        value: props.check_props.get("value").cloned(),
        attrs,
        source: spec.clone(),
        binding,
        props: Arc::clone(props),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use menu_config::RefEntry;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        handles: bool,
    }

    impl ActionTarget for Recorder {
        type Error = String;

        fn close(&mut self) {
            self.calls.push("close".into());
        }

        fn dispatch(
            &mut self,
            kind: ActionKind,
            item: &ResolvedMenuItem,
        ) -> Result<Handled, String> {
            self.calls.push(format!("{kind:?}:{}", item.id));
            Ok(if self.handles {
                Handled::Yes
            } else {
                Handled::NoHandler
            })
        }
    }

    fn table() -> ReferenceTable {
        ReferenceTable::new().with(
            "K1",
            RefEntry {
                text: "Finding".into(),
                attrs: Props::from_iter([("scheme".to_string(), json!("SCT"))]),
            },
        )
    }

    #[test]
    fn reference_resolution_sets_label_ref_and_stamps_key() {
        let spec = MenuItemSpec {
            id: "f".into(),
            ..MenuItemSpec::default()
        }
        .with_attr("code", json!("K1"));
        let props = Arc::new(SubProps::default());
        let item = adapt_item(Some("code"), &spec, &table(), &props);
        assert_eq!(item.label_ref.as_deref(), Some("Finding"));
        assert_eq!(item.label.as_deref(), Some("Finding"));
        assert_eq!(
            item.attrs.get("code"),
            Some(&json!({"text": "Finding", "scheme": "SCT", "ref": "K1"}))
        );
        // declaration is untouched
        assert_eq!(item.source.attrs.get("code"), Some(&json!("K1")));
    }

    #[test]
    fn explicit_label_wins_over_reference() {
        let spec = MenuItemSpec::new("f", "Custom").with_attr("code", json!("K1"));
        let item = adapt_item(Some("code"), &spec, &table(), &Arc::default());
        assert_eq!(item.label.as_deref(), Some("Custom"));
        assert_eq!(item.label_ref.as_deref(), Some("Finding"));
    }

    #[test]
    fn missing_reference_leaves_item_unchanged() {
        let spec = MenuItemSpec::new("f", "F").with_attr("code", json!("nope"));
        let item = adapt_item(Some("code"), &spec, &table(), &Arc::default());
        assert_eq!(item.label_ref, None);
        assert_eq!(item.attrs, spec.attrs);
    }

    #[test]
    fn value_echoes_triggering_object() {
        let props = Arc::new(SubProps::new(Props::from_iter([(
            "value".to_string(),
            json!({"uid": "m1"}),
        )])));
        let item = adapt_item(None, &MenuItemSpec::new("a", "A"), &table(), &props);
        assert_eq!(item.value, Some(json!({"uid": "m1"})));
    }

    #[test]
    fn dispatch_closes_then_routes_by_kind() {
        let spec = MenuItemSpec::new("s", "Sub").opening("child");
        let item = adapt_item(None, &spec, &table(), &Arc::default());
        let mut rec = Recorder {
            handles: true,
            ..Recorder::default()
        };
        item.activate(&mut rec).unwrap();
        assert_eq!(rec.calls, vec!["close", "SubMenu:s"]);
    }

    #[test]
    fn missing_handler_is_a_no_op() {
        let item = adapt_item(None, &MenuItemSpec::new("a", "A"), &table(), &Arc::default());
        let mut rec = Recorder::default();
        assert!(item.activate(&mut rec).is_ok());
        assert_eq!(rec.calls, vec!["close", "Default:a"]);
    }

    #[test]
    fn custom_action_replaces_dispatch() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let spec = MenuItemSpec::new("c", "C").with_action(move |_, _| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        let item = adapt_item(None, &spec, &table(), &Arc::default());
        let mut rec = Recorder::default();
        item.activate(&mut rec).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(rec.calls.is_empty());
    }
}
