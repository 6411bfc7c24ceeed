//! Raw, file-shaped configuration types.
//!
//! The loader deserializes into these shapes first and then validates them
//! into the public types, so that semantic errors can be reported with the
//! source path attached.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{CommandSpec, MenuDefinition, ReferenceTable};

/// One customization entry as written in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RawCustomization {
    /// A command bundle, e.g. what a right click should invoke.
    Commands {
        /// Commands to run in order.
        commands: Vec<CommandSpec>,
    },
    /// A set of context menus and the reference table they consult.
    ContextMenu {
        /// Menu definitions in selection order.
        menus: Vec<MenuDefinition>,
        /// Lookup table for referenced item attributes.
        #[serde(default)]
        refs: ReferenceTable,
    },
}

/// Top-level file shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawModeConfig {
    /// Customizations keyed by name.
    #[serde(default)]
    pub(crate) customizations: BTreeMap<String, RawCustomization>,
}
