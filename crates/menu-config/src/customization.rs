//! Per-mode customizations: command bundles and context-menu bundles.

use std::{collections::BTreeMap, sync::Arc};

use serde_json::Value;

use crate::{CommandSpec, MenuSet, ReferenceTable, raw::RawCustomization};

/// Name of the customization a generic right click runs.
pub const SHOW_CONTEXT_MENU: &str = "showContextMenu";
/// Name of the context-menu bundle used when no other is configured.
pub const DEFAULT_MENU_NAME: &str = "viewerContextMenu";
/// Context tag for the viewer command module.
pub const VIEWER_CONTEXT: &str = "VIEWER";

/// An ordered list of commands a generic trigger runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandCustomization {
    /// Commands to run in order.
    pub commands: Vec<CommandSpec>,
}

impl CommandCustomization {
    /// A bundle with a single command.
    pub fn single(spec: CommandSpec) -> Self {
        Self {
            commands: vec![spec],
        }
    }

    /// The bundle a right click runs when a mode does not override it: open
    /// the default viewer context menu.
    pub fn show_context_menu_default() -> Self {
        Self::single(
            CommandSpec::new("showViewerContextMenu")
                .with_option("menuName", Value::String(DEFAULT_MENU_NAME.into()))
                .with_context(VIEWER_CONTEXT),
        )
    }
}

/// Menus plus the reference table their items consult.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuBundle {
    /// Validated menus.
    pub menus: Arc<MenuSet>,
    /// Reference lookup table.
    pub refs: Arc<ReferenceTable>,
}

impl MenuBundle {
    /// Bundle a validated set with its references.
    pub fn new(menus: MenuSet, refs: ReferenceTable) -> Self {
        Self {
            menus: Arc::new(menus),
            refs: Arc::new(refs),
        }
    }
}

/// One named customization.
#[derive(Debug, Clone, PartialEq)]
pub enum Customization {
    /// A command bundle.
    Commands(CommandCustomization),
    /// A context-menu bundle.
    ContextMenu(MenuBundle),
}

impl Customization {
    /// The command bundle, if this is one.
    pub fn as_commands(&self) -> Option<&CommandCustomization> {
        match self {
            Self::Commands(c) => Some(c),
            Self::ContextMenu(_) => None,
        }
    }

    /// The menu bundle, if this is one.
    pub fn as_menus(&self) -> Option<&MenuBundle> {
        match self {
            Self::ContextMenu(m) => Some(m),
            Self::Commands(_) => None,
        }
    }
}

/// All customizations declared for a mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeConfig {
    /// Customizations keyed by name.
    customizations: BTreeMap<String, Customization>,
}

impl ModeConfig {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a customization.
    pub fn insert(&mut self, name: impl Into<String>, c: Customization) {
        self.customizations.insert(name.into(), c);
    }

    /// Builder form of [`Self::insert`].
    pub fn with(mut self, name: impl Into<String>, c: Customization) -> Self {
        self.insert(name, c);
        self
    }

    /// Look up a customization by name.
    pub fn get(&self, name: &str) -> Option<&Customization> {
        self.customizations.get(name)
    }

    /// Names of all customizations, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.customizations.keys().map(String::as_str)
    }

    /// Validate a raw entry into its public form.
    pub(crate) fn from_raw(raw: RawCustomization) -> Result<Customization, crate::Error> {
        Ok(match raw {
            RawCustomization::Commands { commands } => {
                Customization::Commands(CommandCustomization { commands })
            }
            RawCustomization::ContextMenu { menus, refs } => {
                Customization::ContextMenu(MenuBundle::new(MenuSet::new(menus)?, refs))
            }
        })
    }
}
