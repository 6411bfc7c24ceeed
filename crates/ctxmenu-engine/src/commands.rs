//! Named command registry and dispatch.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    sync::Arc,
};

use menu_config::{CommandCustomization, CommandSpec, Props, merge};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Command handler: merged arguments and the caller's context tag in, a
/// JSON result out.
pub type Handler = dyn Fn(&Props, Option<&str>) -> Result<Value> + Send + Sync;

/// A registered command.
#[derive(Clone)]
pub struct CommandDefinition {
    /// Unique name.
    pub name: String,
    /// Options applied beneath call-time arguments.
    pub default_options: Props,
    /// Contexts the command may run in; empty means any.
    pub allowed_contexts: BTreeSet<String>,
    /// Handler invoked with the merged arguments.
    handler: Arc<Handler>,
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("default_options", &self.default_options)
            .field("allowed_contexts", &self.allowed_contexts)
            .finish_non_exhaustive()
    }
}

impl CommandDefinition {
    /// A command with no defaults that runs in any context.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Props, Option<&str>) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            default_options: Props::new(),
            allowed_contexts: BTreeSet::new(),
            handler: Arc::new(handler),
        }
    }

    /// Set one default option.
    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.default_options.insert(key.into(), value);
        self
    }

    /// Restrict the command to `context` (in addition to any already allowed).
    pub fn allowed_in(mut self, context: impl Into<String>) -> Self {
        self.allowed_contexts.insert(context.into());
        self
    }

    /// Whether a caller in `context` may run this command.
    fn admits(&self, context: Option<&str>) -> bool {
        match context {
            Some(c) => self.allowed_contexts.is_empty() || self.allowed_contexts.contains(c),
            None => true,
        }
    }
}

/// Shared handle to the command registry.
///
/// Clones share the same table. Definitions are looked up under a read lock
/// that is released before the handler runs, so handlers may themselves run
/// commands.
#[derive(Clone, Default)]
pub struct CommandsManager {
    /// Definitions keyed by name.
    defs: Arc<RwLock<HashMap<String, Arc<CommandDefinition>>>>,
}

impl fmt::Debug for CommandsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandsManager")
            .field("commands", &self.names())
            .finish()
    }
}

impl CommandsManager {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. A later registration under the same name replaces
    /// the earlier one.
    pub fn register(&self, def: CommandDefinition) {
        let name = def.name.clone();
        if self.defs.write().insert(name.clone(), Arc::new(def)).is_some() {
            warn!(command = %name, "command re-registered; replacing previous definition");
        } else {
            debug!(command = %name, "command registered");
        }
    }

    /// Whether a command is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.defs.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.defs.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Run `name` with `args` merged over its defaults.
    ///
    /// Fails with [`Error::UnknownCommand`] when nothing is registered, and
    /// with [`Error::ContextMismatch`] when `context` is given but the command
    /// is restricted to other contexts.
    pub fn run(&self, name: &str, args: &Props, context: Option<&str>) -> Result<Value> {
        let def = self
            .defs
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownCommand {
                name: name.to_string(),
            })?;
        if !def.admits(context) {
            return Err(Error::ContextMismatch {
                name: name.to_string(),
                context: context.unwrap_or_default().to_string(),
                allowed: def.allowed_contexts.iter().cloned().collect(),
            });
        }
        let merged = merge([&def.default_options, args]);
        debug!(command = %name, context = ?context, "running command");
        (def.handler)(&merged, context)
    }

    /// Run a declared command with `extra` merged over its options.
    pub fn run_spec(&self, spec: &CommandSpec, extra: &Props) -> Result<Value> {
        let args = merge([&spec.command_options, extra]);
        self.run(&spec.command_name, &args, spec.context.as_deref())
    }

    /// Run each spec in order, stopping at the first failure. Returns the
    /// last command's result, or `null` for an empty list.
    pub fn run_commands(&self, specs: &[CommandSpec], extra: &Props) -> Result<Value> {
        let mut last = Value::Null;
        for spec in specs {
            last = self.run_spec(spec, extra)?;
        }
        Ok(last)
    }

    /// Run a command customization (a generic trigger's bundle) with `props`
    /// layered over each command's options.
    pub fn run_customization(
        &self,
        customization: &CommandCustomization,
        props: &Props,
    ) -> Result<Value> {
        self.run_commands(&customization.commands, props)
    }
}
