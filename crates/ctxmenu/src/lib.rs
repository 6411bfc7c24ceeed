//! Context-menu resolution: menu placement, menu selection and item adaptation.
//!
//! Everything here is synchronous and side-effect free apart from logging.
//! Given check properties and a validated [`menu_config::MenuSet`],
//! [`get_menu_items`] picks a menu, expands delegating items depth first and
//! returns a flat list of [`ResolvedMenuItem`]s. Activation is routed through
//! an [`ActionTarget`] supplied by the host.

mod event;
mod item;
mod position;
mod resolve;

pub use event::{ElementId, InteractionEvent, MouseButton};
pub use item::{
    ActionTarget, Handled, ItemBinding, ResolvedMenuItem, SubProps, adapt_item,
    parse_item_references,
};
pub use position::{Candidate, Position, Rect, anchored_position, resolve_position};
pub use resolve::{find_menu, get_menu_items, menu_items};
