//! Contracts for the collaborators the engine drives, and the bundle that
//! carries them to construction sites.

use std::sync::Arc;

use ctxmenu::{ElementId, Position, Rect, ResolvedMenuItem};
use menu_config::{Customization, ModeConfig, Props};
use serde_json::Value;

use crate::Result;

/// Everything the panel needs to render one menu.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelRequest {
    /// Fixed logical panel id; a second `show` with the same id supersedes
    /// the first.
    pub id: String,
    /// Screen position of the panel's top-left corner.
    pub position: Position,
    /// Menu the items were resolved from.
    pub menu_id: String,
    /// Items in display order.
    pub items: Vec<ResolvedMenuItem>,
}

/// Floating panel lifecycle.
pub trait PanelService: Send + Sync {
    /// Show a panel. An error means nothing is visible.
    fn show(&self, request: PanelRequest) -> Result<()>;
    /// Dismiss the panel with this id, if visible.
    fn dismiss(&self, id: &str);
}

/// Queries against the rendering layer.
pub trait ViewportService: Send + Sync {
    /// The element of the active viewport.
    fn active_element(&self) -> Option<ElementId>;
    /// Screen-space bounds of an element.
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;
    /// Hit-test for an interactive object near a canvas point.
    fn find_nearby_object(&self, element: ElementId, canvas: Position) -> Option<Value>;
    /// Canvas points of an annotation, used to anchor its menu.
    fn active_canvas_points(&self, tool_data: &Value) -> Vec<Position>;
    /// Currently selected annotations, most recent first.
    fn selected_annotations(&self) -> Vec<Value>;
}

/// Measurement record storage.
pub trait MeasurementStore: Send + Sync {
    /// Fetch a record.
    fn get(&self, uid: &str) -> Option<Props>;
    /// Replace a record.
    fn update(&self, uid: &str, record: Props);
    /// Remove a record; returns whether it existed.
    fn remove(&self, uid: &str) -> bool;
}

/// Text input from the user.
pub trait PromptService: Send + Sync {
    /// Ask for a label. `None` means the user cancelled.
    fn prompt_label(&self, current: Option<&str>) -> Option<String>;
}

/// Per-mode override lookup.
pub trait ModeCustomization: Send + Sync {
    /// The customization registered under `name`.
    fn get(&self, name: &str) -> Option<Customization>;

    /// The customization registered under `name`, else `fallback`.
    fn get_or(&self, name: &str, fallback: Customization) -> Customization {
        self.get(name).unwrap_or(fallback)
    }
}

impl ModeCustomization for ModeConfig {
    fn get(&self, name: &str) -> Option<Customization> {
        Self::get(self, name).cloned()
    }
}

/// Long-lived collaborators, grouped so construction sites name their
/// dependencies once.
#[derive(Clone)]
pub struct Services {
    /// Panel host. Absent in headless setups; menus then never open.
    pub panel: Option<Arc<dyn PanelService>>,
    /// Rendering-layer queries.
    pub viewport: Arc<dyn ViewportService>,
    /// Measurement records.
    pub measurements: Arc<dyn MeasurementStore>,
    /// User prompts.
    pub prompt: Arc<dyn PromptService>,
    /// Mode customizations.
    pub customizations: Arc<dyn ModeCustomization>,
}
