//! Raw interaction events as delivered by the host.

use serde::{Deserialize, Serialize};

use crate::Position;

/// Opaque handle to a viewport element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// Pointer button that produced a click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    /// Left button.
    #[default]
    Primary,
    /// Right button; opens context menus.
    Secondary,
    /// Middle button.
    Auxiliary,
}

/// A pointer event with whatever geometry the host could attach.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Viewport element under the pointer.
    #[serde(default)]
    pub element: Option<ElementId>,
    /// Button pressed.
    #[serde(default)]
    pub button: MouseButton,
    /// Pointer location in screen space.
    #[serde(default)]
    pub client: Option<Position>,
    /// Pointer location in the element's canvas space.
    #[serde(default)]
    pub canvas: Option<Position>,
}

impl InteractionEvent {
    /// An event with no geometry attached.
    pub fn new(button: MouseButton) -> Self {
        Self {
            button,
            ..Self::default()
        }
    }

    /// Attach the element under the pointer.
    pub fn on(mut self, element: ElementId) -> Self {
        self.element = Some(element);
        self
    }

    /// Attach the screen-space location.
    pub fn at_client(mut self, x: f64, y: f64) -> Self {
        self.client = Some(Position::new(x, y));
        self
    }

    /// Attach the canvas-space location.
    pub fn at_canvas(mut self, x: f64, y: f64) -> Self {
        self.canvas = Some(Position::new(x, y));
        self
    }

    /// This event with non-finite points removed.
    ///
    /// JSON has no NaN, so an unknown coordinate must be dropped before the
    /// event travels as command arguments.
    pub fn with_known_points(&self) -> Self {
        Self {
            client: self.client.filter(Position::is_valid),
            canvas: self.canvas.filter(Position::is_valid),
            ..self.clone()
        }
    }

    /// Whether this is a context-menu click.
    pub fn is_secondary(&self) -> bool {
        self.button == MouseButton::Secondary
    }
}
