//! Declarative configuration for context menus and command bundles.
//!
//! Menus, items, reference tables and command customizations are declared
//! once at mode initialization (in code or in a RON file) and held read-only
//! afterwards. Registration-time validation lives here: a [`MenuSet`] can
//! only be built from menus with unique ids and an acyclic delegation graph.

mod customization;
mod defaults;
mod error;
mod loader;
mod menu;
mod menu_set;
mod predicate;
mod props;
mod raw;
mod refs;

#[cfg(test)]
mod test_parse;

pub use customization::{
    CommandCustomization, Customization, DEFAULT_MENU_NAME, MenuBundle, ModeConfig,
    SHOW_CONTEXT_MENU, VIEWER_CONTEXT,
};
pub use defaults::BUILTIN_RON;
pub use error::Error;
pub use loader::{load_from_path, load_from_str};
pub use menu::{ActionKind, CommandSpec, CustomAction, ItemActionFn, MenuDefinition, MenuItemSpec};
pub use menu_set::MenuSet;
pub use predicate::{Predicate, PredicateFn};
pub use props::{Props, lookup, merge};
pub use refs::{RefEntry, ReferenceTable};
