use std::sync::Arc;

use ctxmenu::InteractionEvent;
use menu_config::{CommandCustomization, Customization, Props, SHOW_CONTEXT_MENU};
use serde_json::Value;
use tracing::{trace, warn};

use crate::{
    CLOSE_VIEWER_CONTEXT_MENU, CommandsManager, Error, GET_NEARBY_TOOL_DATA, ModeCustomization,
    Result, Services,
};

/// Turns raw viewport clicks into context-menu commands.
///
/// A secondary click looks for tool data under the pointer and runs the
/// mode's `showContextMenu` customization; any other click closes the menu.
#[derive(Clone)]
pub struct ContextMenuInteraction {
    /// Registry the commands run against.
    commands: CommandsManager,
    /// Source of the `showContextMenu` override.
    customizations: Arc<dyn ModeCustomization>,
}

impl ContextMenuInteraction {
    /// Create a handler over `commands`.
    pub fn new(commands: CommandsManager, services: &Services) -> Self {
        Self {
            commands,
            customizations: Arc::clone(&services.customizations),
        }
    }

    /// Handle one click.
    pub fn handle_click(&self, event: &InteractionEvent) -> Result<()> {
        if !event.is_secondary() {
            trace!(button = ?event.button, "non-context click; closing menu");
            self.commands
                .run(CLOSE_VIEWER_CONTEXT_MENU, &Props::new(), None)?;
            return Ok(());
        }
        let event = event.with_known_points();
        let mut props = Props::new();
        let ev = serde_json::to_value(&event)
            .map_err(|e| Error::command(SHOW_CONTEXT_MENU, e.to_string()))?;
        props.insert("event".into(), ev);
        if let Some(data) = self.find_nearby_tool_data(&event)? {
            props.insert("nearbyToolData".into(), data);
        }
        self.commands
            .run_customization(&self.show_context_menu(), &props)?;
        Ok(())
    }

    /// Tool data under the pointer, when the event carries enough geometry.
    fn find_nearby_tool_data(&self, event: &InteractionEvent) -> Result<Option<Value>> {
        let (Some(element), Some(canvas)) = (event.element, event.canvas) else {
            return Ok(None);
        };
        let canvas = serde_json::to_value(canvas)
            .map_err(|e| Error::command(GET_NEARBY_TOOL_DATA, e.to_string()))?;
        let args = Props::from_iter([
            ("element".to_string(), Value::from(element.0)),
            ("canvasCoordinates".to_string(), canvas),
        ]);
        let found = self.commands.run(GET_NEARBY_TOOL_DATA, &args, None)?;
        Ok((!found.is_null()).then_some(found))
    }

    /// The mode's right-click bundle, or the built-in one.
    fn show_context_menu(&self) -> CommandCustomization {
        let fallback = CommandCustomization::show_context_menu_default();
        match self
            .customizations
            .get_or(SHOW_CONTEXT_MENU, Customization::Commands(fallback.clone()))
        {
            Customization::Commands(c) => c,
            Customization::ContextMenu(_) => {
                warn!(name = SHOW_CONTEXT_MENU, "customization is not a command bundle; using default");
                fallback
            }
        }
    }
}
