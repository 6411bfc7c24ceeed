//! Context-menu engine
//!
//! Wires the pure resolution crate to the outside world:
//! - [`CommandsManager`]: named commands with default options and context tags
//! - [`ContextMenuController`]: the single open/closed menu session
//! - [`ContextMenuInteraction`]: right-click handling
//! - the viewer command module ([`viewer_commands::register`])
//!
//! Collaborators (panel host, viewport, measurement store, prompts, mode
//! customizations) are reached through the traits in [`Services`].
//! [`Engine`] assembles all of it.

mod commands;
mod controller;
mod error;
mod interaction;
mod panel;
mod services;
pub mod test_support;
pub mod viewer_commands;

pub use commands::{CommandDefinition, CommandsManager, Handler};
pub use controller::{CONTEXT_MENU_ID, ContextMenuController, ShowRequest};
pub use error::{Error, Result};
pub use interaction::ContextMenuInteraction;
pub use panel::{ChannelPanel, PanelMsg};
pub use services::{
    MeasurementStore, ModeCustomization, PanelRequest, PanelService, PromptService, Services,
    ViewportService,
};
pub use viewer_commands::{
    CLOSE_VIEWER_CONTEXT_MENU, GET_NEARBY_TOOL_DATA, SHOW_VIEWER_CONTEXT_MENU,
};

use ctxmenu::InteractionEvent;

/// Registry, session controller and click handling, assembled.
///
/// Construct with [`Engine::new`]; the viewer command module is registered
/// on construction. Clones share all state.
#[derive(Clone)]
pub struct Engine {
    /// Command registry.
    commands: CommandsManager,
    /// Session controller.
    controller: ContextMenuController,
    /// Click handler.
    interaction: ContextMenuInteraction,
}

impl Engine {
    /// Build an engine over `services` and register the viewer commands.
    pub fn new(services: &Services) -> Result<Self> {
        let commands = CommandsManager::new();
        let controller = ContextMenuController::new(services);
        viewer_commands::register(&commands, services, &controller)?;
        let interaction = ContextMenuInteraction::new(commands.clone(), services);
        Ok(Self {
            commands,
            controller,
            interaction,
        })
    }

    /// The command registry.
    pub fn commands(&self) -> &CommandsManager {
        &self.commands
    }

    /// The session controller.
    pub fn controller(&self) -> &ContextMenuController {
        &self.controller
    }

    /// Feed a viewport click.
    pub fn handle_click(&self, event: &InteractionEvent) -> Result<()> {
        self.interaction.handle_click(event)
    }

    /// Activate the item at `index` of the open menu.
    pub fn activate(&self, index: usize) -> Result<()> {
        self.controller.activate(index, &self.commands)
    }
}
