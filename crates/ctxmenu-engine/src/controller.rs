//! Context-menu session lifecycle.

use std::sync::Arc;

use ctxmenu::{
    ActionTarget, Handled, InteractionEvent, Position, ResolvedMenuItem, SubProps,
    anchored_position, find_menu, menu_items,
};
use menu_config::{ActionKind, MenuBundle, Props, merge};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{CommandsManager, Error, PanelRequest, PanelService, Result, Services, ViewportService};

/// Logical id of the single context-menu panel.
pub const CONTEXT_MENU_ID: &str = "context-menu";

/// Inputs for opening a menu.
#[derive(Clone, Debug, Default)]
pub struct ShowRequest {
    /// Menus and references to resolve against.
    pub bundle: MenuBundle,
    /// Properties selectors and item filters see.
    pub check_props: Props,
    /// Triggering event.
    pub event: Option<InteractionEvent>,
    /// Canvas-space points to anchor the menu to, in preference order.
    pub anchors: Vec<Position>,
    /// Explicit menu id; bypasses selectors.
    pub menu_id: Option<String>,
    /// Sub-menu requested by a previous activation.
    pub sub_menu: Option<String>,
}

impl ShowRequest {
    /// A request against `bundle` with no context.
    pub fn new(bundle: MenuBundle) -> Self {
        Self {
            bundle,
            ..Self::default()
        }
    }

    /// Set the check properties.
    pub fn with_check_props(mut self, check_props: Props) -> Self {
        self.check_props = check_props;
        self
    }

    /// Set the triggering event.
    pub fn with_event(mut self, event: InteractionEvent) -> Self {
        self.event = Some(event);
        self
    }

    /// Set the anchor points.
    pub fn with_anchors(mut self, anchors: Vec<Position>) -> Self {
        self.anchors = anchors;
        self
    }

    /// Select a menu by id.
    pub fn with_menu_id(mut self, id: impl Into<String>) -> Self {
        self.menu_id = Some(id.into());
        self
    }
}

/// The open menu.
#[derive(Clone, Debug)]
struct Session {
    /// Menu being shown.
    menu_id: String,
    /// Where the panel was placed; reused by sub-menus.
    position: Position,
    /// Request that opened the menu.
    request: ShowRequest,
    /// Items on display.
    items: Vec<ResolvedMenuItem>,
}

/// Owns the single context-menu session.
///
/// States are CLOSED (no session) and OPEN (one session). Opening while open
/// dismisses the current panel first, so at most one panel is ever visible.
/// Clones share the session slot.
#[derive(Clone)]
pub struct ContextMenuController {
    /// Panel host, if any.
    panel: Option<Arc<dyn PanelService>>,
    /// Geometry source for placement.
    viewport: Arc<dyn ViewportService>,
    /// The session slot.
    session: Arc<Mutex<Option<Session>>>,
}

impl ContextMenuController {
    /// Create a closed controller.
    pub fn new(services: &Services) -> Self {
        Self {
            panel: services.panel.clone(),
            viewport: Arc::clone(&services.viewport),
            session: Arc::new(Mutex::new(None)),
        }
    }

    /// Resolve and show a menu. Returns whether a panel is now open.
    ///
    /// Nothing to show, or no way to show it, leaves the controller closed.
    pub fn show_context_menu(&self, request: ShowRequest) -> bool {
        self.open(request, None)
    }

    /// Open a menu, optionally at a fixed position.
    fn open(&self, request: ShowRequest, pinned: Option<Position>) -> bool {
        let Some(panel) = self.panel.as_ref() else {
            warn!("unable to show context menu; no panel service available");
            return false;
        };
        let props = Arc::new(SubProps {
            check_props: request.check_props.clone(),
            event: request.event.clone(),
            sub_menu: request.sub_menu.clone(),
        });
        let menus = &request.bundle.menus;
        let Some(menu) = find_menu(menus, &props, request.menu_id.as_deref()) else {
            debug!(menu_id = ?request.menu_id, "no menu to show");
            self.close();
            return false;
        };
        debug!(menu_id = %menu.id, "menu chosen");
        let items = menu_items(menu, &props, menus, &request.bundle.refs);
        let menu_id = menu.id.clone();
        let position = pinned.unwrap_or_else(|| self.position_for(&request));

        if self.session.lock().take().is_some() {
            panel.dismiss(CONTEXT_MENU_ID);
        }
        let shown = panel.show(PanelRequest {
            id: CONTEXT_MENU_ID.to_string(),
            position,
            menu_id: menu_id.clone(),
            items: items.clone(),
        });
        if let Err(e) = shown {
            warn!(error = %e, menu_id = %menu_id, "failed to open context menu");
            return false;
        }
        debug!(menu_id = %menu_id, items = items.len(), x = position.x, y = position.y, "context menu opened");
        *self.session.lock() = Some(Session {
            menu_id,
            position,
            request,
            items,
        });
        true
    }

    /// Placement for a fresh menu: anchors, then the event, then the
    /// viewport element, then the origin.
    fn position_for(&self, request: &ShowRequest) -> Position {
        let event = request.event.as_ref();
        anchored_position(&request.anchors, event, || {
            event
                .and_then(|e| e.element)
                .or_else(|| self.viewport.active_element())
                .and_then(|el| self.viewport.bounding_rect(el))
        })
    }

    /// Close the open menu, if any. Returns whether one was open.
    pub fn close(&self) -> bool {
        let was_open = self.session.lock().take().is_some();
        if was_open {
            if let Some(panel) = &self.panel {
                panel.dismiss(CONTEXT_MENU_ID);
            }
            debug!("context menu closed");
        }
        was_open
    }

    /// The user clicked outside the panel.
    pub fn click_outside(&self) -> bool {
        self.close()
    }

    /// The panel host closed the panel on its own; forget the session
    /// without dismissing again.
    pub fn panel_closed(&self) {
        if self.session.lock().take().is_some() {
            debug!("context menu closed by panel");
        }
    }

    /// Whether a menu is open.
    pub fn is_open(&self) -> bool {
        self.session.lock().is_some()
    }

    /// Id of the open menu.
    pub fn open_menu_id(&self) -> Option<String> {
        self.session.lock().as_ref().map(|s| s.menu_id.clone())
    }

    /// Position of the open panel.
    pub fn position(&self) -> Option<Position> {
        self.session.lock().as_ref().map(|s| s.position)
    }

    /// Items of the open menu; empty when closed.
    pub fn items(&self) -> Vec<ResolvedMenuItem> {
        self.session
            .lock()
            .as_ref()
            .map(|s| s.items.clone())
            .unwrap_or_default()
    }

    /// Index of the first open item whose display label is `label`.
    pub fn find_item(&self, label: &str) -> Option<usize> {
        self.session
            .lock()
            .as_ref()?
            .items
            .iter()
            .position(|i| i.display_label() == label)
    }

    /// Activate the item at `index` of the open menu.
    ///
    /// Activating with no open menu or an out-of-range index is a logged
    /// no-op. Command failures are returned.
    pub fn activate(&self, index: usize, commands: &CommandsManager) -> Result<()> {
        let (item, request, position) = {
            let guard = self.session.lock();
            let Some(session) = guard.as_ref() else {
                warn!(index, "activation with no open context menu");
                return Ok(());
            };
            let Some(item) = session.items.get(index) else {
                warn!(index, menu_id = %session.menu_id, "activation index out of range");
                return Ok(());
            };
            (item.clone(), session.request.clone(), session.position)
        };
        let mut target = SessionTarget {
            controller: self,
            commands,
            request,
            position,
        };
        item.activate(&mut target)
    }
}

/// Routes item activations from one session.
struct SessionTarget<'a> {
    /// Controller owning the session.
    controller: &'a ContextMenuController,
    /// Registry commands run against.
    commands: &'a CommandsManager,
    /// Request that opened the session.
    request: ShowRequest,
    /// Where the session's panel was placed.
    position: Position,
}

impl SessionTarget<'_> {
    /// `{refs: <table>}`, the layer every item command receives.
    fn refs_layer(&self) -> Props {
        Props::from_iter([("refs".to_string(), self.request.bundle.refs.to_value())])
    }

    /// Run the item's own command.
    fn run_default(&self, item: &ResolvedMenuItem) -> Result<Handled> {
        let Some(name) = item.source.command_name.as_deref() else {
            return Ok(Handled::NoHandler);
        };
        let args = merge([
            &item.attrs,
            &item.source.command_options,
            &item.props.check_props,
            &self.refs_layer(),
        ]);
        self.commands
            .run(name, &args, item.source.context.as_deref())?;
        Ok(Handled::Yes)
    }

    /// Run the item's command list in order.
    fn run_commands(&self, item: &ResolvedMenuItem) -> Result<Handled> {
        let refs = self.refs_layer();
        for spec in &item.source.commands {
            let args = merge([&spec.command_options, &refs, &item.props.check_props]);
            self.commands
                .run(&spec.command_name, &args, spec.context.as_deref())?;
        }
        Ok(Handled::Yes)
    }

    /// Re-open at the same position showing the item's sub-menu.
    fn open_sub_menu(&self, item: &ResolvedMenuItem) -> Handled {
        let Some(sub) = item.source.sub_menu.as_deref() else {
            warn!(item = %item.id, "no sub-menu defined for item");
            return Handled::Yes;
        };
        let request = ShowRequest {
            menu_id: Some(sub.to_string()),
            ..self.request.clone()
        };
        self.controller.open(request, Some(self.position));
        Handled::Yes
    }
}

impl ActionTarget for SessionTarget<'_> {
    type Error = Error;

    fn close(&mut self) {
        self.controller.close();
    }

    fn dispatch(&mut self, kind: ActionKind, item: &ResolvedMenuItem) -> Result<Handled> {
        match kind {
            ActionKind::Default => self.run_default(item),
            ActionKind::SubMenu => Ok(self.open_sub_menu(item)),
            ActionKind::RunCommands => self.run_commands(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use ctxmenu::{MouseButton, Rect};
    use menu_config::{MenuDefinition, MenuItemSpec, MenuSet, Predicate, ReferenceTable};
    use serde_json::{Value, json};

    use super::*;
    use crate::test_support::MockServices;

    fn bundle() -> MenuBundle {
        MenuBundle::new(
            MenuSet::new(vec![
                MenuDefinition::new(
                    "A",
                    vec![
                        MenuItemSpec::new("open", "More").opening("B"),
                        MenuItemSpec::new("nothing", "Nothing"),
                    ],
                )
                .with_selector(Predicate::Absent("pick".into())),
                MenuDefinition::new("B", vec![MenuItemSpec::new("b1", "B1")])
                    .with_selector(Predicate::Eq("pick".into(), json!("B"))),
            ])
            .unwrap(),
            ReferenceTable::new(),
        )
    }

    fn check(v: Value) -> Props {
        match v {
            Value::Object(m) => m,
            _ => Props::new(),
        }
    }

    #[test]
    fn opens_at_event_point() {
        let mocks = MockServices::new();
        let ctrl = ContextMenuController::new(&mocks.services());
        let ev = InteractionEvent::new(MouseButton::Secondary).at_client(12.0, 34.0);
        assert!(ctrl.show_context_menu(ShowRequest::new(bundle()).with_event(ev)));
        assert_eq!(ctrl.open_menu_id().as_deref(), Some("A"));
        assert_eq!(ctrl.position(), Some(Position::new(12.0, 34.0)));
        assert_eq!(mocks.panel.calls(), vec!["show:A@12,34"]);
    }

    #[test]
    fn anchors_are_offset_by_the_active_element() {
        let mocks = MockServices::new();
        mocks.viewport.set_rect(Rect::new(100.0, 50.0, 10.0, 10.0));
        let ctrl = ContextMenuController::new(&mocks.services());
        let req = ShowRequest::new(bundle()).with_anchors(vec![Position::new(1.0, 2.0)]);
        assert!(ctrl.show_context_menu(req));
        assert_eq!(ctrl.position(), Some(Position::new(101.0, 52.0)));
    }

    #[test]
    fn opening_while_open_dismisses_first() {
        let mocks = MockServices::new();
        let ctrl = ContextMenuController::new(&mocks.services());
        assert!(ctrl.show_context_menu(ShowRequest::new(bundle())));
        let req = ShowRequest::new(bundle()).with_check_props(check(json!({"pick": "B"})));
        assert!(ctrl.show_context_menu(req));
        assert_eq!(
            mocks.panel.calls(),
            vec!["show:A@0,0", "dismiss:context-menu", "show:B@0,0"]
        );
        assert_eq!(ctrl.open_menu_id().as_deref(), Some("B"));
    }

    #[test]
    fn no_menu_closes_and_stays_closed() {
        let mocks = MockServices::new();
        let ctrl = ContextMenuController::new(&mocks.services());
        assert!(ctrl.show_context_menu(ShowRequest::new(bundle())));
        assert!(!ctrl.show_context_menu(ShowRequest::new(bundle()).with_menu_id("missing")));
        assert!(!ctrl.is_open());
        assert_eq!(mocks.panel.calls(), vec!["show:A@0,0", "dismiss:context-menu"]);
    }

    #[test]
    fn missing_panel_service_stays_closed() {
        let mocks = MockServices::new();
        let mut services = mocks.services();
        services.panel = None;
        let ctrl = ContextMenuController::new(&services);
        assert!(!ctrl.show_context_menu(ShowRequest::new(bundle())));
        assert!(!ctrl.is_open());
    }

    #[test]
    fn failed_show_stays_closed() {
        let mocks = MockServices::new();
        mocks.panel.set_fail_show(true);
        let ctrl = ContextMenuController::new(&mocks.services());
        assert!(!ctrl.show_context_menu(ShowRequest::new(bundle())));
        assert!(!ctrl.is_open());
    }

    #[test]
    fn sub_menu_reopens_at_same_position() {
        let mocks = MockServices::new();
        let ctrl = ContextMenuController::new(&mocks.services());
        let ev = InteractionEvent::new(MouseButton::Secondary).at_client(5.0, 6.0);
        ctrl.show_context_menu(ShowRequest::new(bundle()).with_event(ev));
        let commands = CommandsManager::new();
        let idx = ctrl.find_item("More").unwrap();
        ctrl.activate(idx, &commands).unwrap();
        assert_eq!(ctrl.open_menu_id().as_deref(), Some("B"));
        assert_eq!(ctrl.position(), Some(Position::new(5.0, 6.0)));
        assert_eq!(
            mocks.panel.calls(),
            vec!["show:A@5,6", "dismiss:context-menu", "show:B@5,6"]
        );
    }

    #[test]
    fn activation_without_command_closes() {
        let mocks = MockServices::new();
        let ctrl = ContextMenuController::new(&mocks.services());
        ctrl.show_context_menu(ShowRequest::new(bundle()));
        let idx = ctrl.find_item("Nothing").unwrap();
        ctrl.activate(idx, &CommandsManager::new()).unwrap();
        assert!(!ctrl.is_open());
    }

    #[test]
    fn activation_when_closed_is_a_no_op() {
        let mocks = MockServices::new();
        let ctrl = ContextMenuController::new(&mocks.services());
        assert!(ctrl.activate(0, &CommandsManager::new()).is_ok());
        assert!(mocks.panel.calls().is_empty());
    }

    #[test]
    fn close_only_dismisses_when_open() {
        let mocks = MockServices::new();
        let ctrl = ContextMenuController::new(&mocks.services());
        assert!(!ctrl.close());
        ctrl.show_context_menu(ShowRequest::new(bundle()));
        assert!(ctrl.click_outside());
        assert!(!ctrl.close());
        assert_eq!(mocks.panel.calls(), vec!["show:A@0,0", "dismiss:context-menu"]);
    }

    #[test]
    fn panel_closed_forgets_session_silently() {
        let mocks = MockServices::new();
        let ctrl = ContextMenuController::new(&mocks.services());
        ctrl.show_context_menu(ShowRequest::new(bundle()));
        ctrl.panel_closed();
        assert!(!ctrl.is_open());
        assert_eq!(mocks.panel.calls(), vec!["show:A@0,0"]);
    }
}
