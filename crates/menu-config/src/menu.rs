//! Menu definitions, item declarations and command references.

use std::{fmt, sync::Arc};

use serde::Deserialize;
use serde_json::Value;

use crate::{Predicate, Props};

/// Which host callback an activated item is routed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Run the item's own `command_name`.
    #[default]
    Default,
    /// Re-open the menu showing the item's `sub_menu`.
    SubMenu,
    /// Run every command in the item's `commands` list.
    RunCommands,
}

/// A reference to a registered command plus the options and context tag to
/// invoke it with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    /// Registered command name.
    pub command_name: String,
    /// Options merged over the command's defaults at call time.
    #[serde(default)]
    pub command_options: Props,
    /// Optional context tag restricting where the command may run.
    #[serde(default)]
    pub context: Option<String>,
}

impl CommandSpec {
    /// Construct a spec with no options and no context.
    pub fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            command_options: Props::new(),
            context: None,
        }
    }

    /// Set a single option value.
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.command_options.insert(key.into(), value);
        self
    }

    /// Set the context tag.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Signature of a custom item action installed from code.
pub type ItemActionFn = dyn Fn(&MenuItemSpec, &Props) + Send + Sync;

/// Custom activation callback carried by an item. When present it replaces
/// the bound host dispatch.
#[derive(Clone)]
pub struct CustomAction(pub Arc<ItemActionFn>);

impl fmt::Debug for CustomAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomAction(..)")
    }
}

impl PartialEq for CustomAction {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// One declared entry of a menu.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuItemSpec {
    /// Item identifier (unique within its menu by convention).
    pub id: String,
    /// Display label; falls back to the resolved reference text.
    #[serde(default)]
    pub label: Option<String>,
    /// Inclusion filter evaluated against check properties; absent means always.
    #[serde(default)]
    pub check: Option<Predicate>,
    /// When true this item is a placeholder for the items of `sub_menu`.
    #[serde(default)]
    pub delegating: bool,
    /// Target menu id for delegation or for `ActionKind::SubMenu`.
    #[serde(default)]
    pub sub_menu: Option<String>,
    /// Host callback selection on activation.
    #[serde(default)]
    pub action_type: ActionKind,
    /// Command run by `ActionKind::Default`.
    #[serde(default)]
    pub command_name: Option<String>,
    /// Options for `command_name`.
    #[serde(default)]
    pub command_options: Props,
    /// Context tag for `command_name`.
    #[serde(default)]
    pub context: Option<String>,
    /// Commands run by `ActionKind::RunCommands`.
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
    /// Free-form attributes. The menu's `attribute` names one of these as a
    /// reference-table key.
    #[serde(default)]
    pub attrs: Props,
    /// Code-installed activation override.
    #[serde(skip)]
    pub action: Option<CustomAction>,
}

impl MenuItemSpec {
    /// A plain item with an id and label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// A delegating placeholder that splices in the items of `menu_id`.
    pub fn delegate(id: impl Into<String>, menu_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            delegating: true,
            sub_menu: Some(menu_id.into()),
            ..Self::default()
        }
    }

    /// Set the inclusion filter.
    pub fn with_check(mut self, check: Predicate) -> Self {
        self.check = Some(check);
        self
    }

    /// Bind the item to a command.
    pub fn with_command(mut self, name: impl Into<String>, options: Props) -> Self {
        self.command_name = Some(name.into());
        self.command_options = options;
        self
    }

    /// Set a free-form attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    /// Make the item open `menu_id` as a sub-menu when activated.
    pub fn opening(mut self, menu_id: impl Into<String>) -> Self {
        self.action_type = ActionKind::SubMenu;
        self.sub_menu = Some(menu_id.into());
        self
    }

    /// Install a custom activation callback.
    pub fn with_action<F>(mut self, f: F) -> Self
    where
        F: Fn(&Self, &Props) + Send + Sync + 'static,
    {
        self.action = Some(CustomAction(Arc::new(f)));
        self
    }

    /// Whether the filter admits these check properties.
    pub fn admits(&self, check_props: &Props) -> bool {
        self.check.as_ref().is_none_or(|p| p.eval(check_props))
    }

    /// The reference-table key held in `attribute`, when it is a string.
    pub fn reference_key(&self, attribute: &str) -> Option<&str> {
        self.attrs.get(attribute).and_then(Value::as_str)
    }
}

/// A named, selectable set of items.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuDefinition {
    /// Unique id.
    pub id: String,
    /// Selection predicate; a menu without one is a catch-all.
    #[serde(default)]
    pub selector: Option<Predicate>,
    /// Names the item attribute whose value keys into the reference table.
    #[serde(default)]
    pub attribute: Option<String>,
    /// Declared items, in display order.
    #[serde(default)]
    pub items: Vec<MenuItemSpec>,
}

impl MenuDefinition {
    /// A catch-all menu with the given items.
    pub fn new(id: impl Into<String>, items: Vec<MenuItemSpec>) -> Self {
        Self {
            id: id.into(),
            selector: None,
            attribute: None,
            items,
        }
    }

    /// Set the selector.
    pub fn with_selector(mut self, selector: Predicate) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Set the reference attribute.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Whether this menu is chosen for the given check properties.
    pub fn selects(&self, check_props: &Props) -> bool {
        self.selector.as_ref().is_none_or(|p| p.eval(check_props))
    }

    /// Ids of menus this menu delegates to, in declaration order.
    pub fn delegates(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|i| i.delegating)
            .filter_map(|i| i.sub_menu.as_deref())
    }
}
