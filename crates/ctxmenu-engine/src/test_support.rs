//! Recording in-memory collaborators for tests and diagnostics.
//! Every mock logs the calls it receives so tests can assert on ordering.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use ctxmenu::{ElementId, Position, Rect};
use menu_config::{ModeConfig, Props};
use parking_lot::Mutex;
use serde_json::Value;

use crate::{
    Error, MeasurementStore, PanelRequest, PanelService, PromptService, Result, Services,
    ViewportService,
};

/// Panel that records requests instead of drawing.
#[derive(Clone, Default)]
pub struct MockPanel {
    /// Call log.
    calls: Arc<Mutex<Vec<String>>>,
    /// Every accepted show request.
    shown: Arc<Mutex<Vec<PanelRequest>>>,
    /// When set, `show` fails.
    fail_show: Arc<AtomicBool>,
}

impl MockPanel {
    /// A panel that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `show` calls fail.
    pub fn set_fail_show(&self, v: bool) {
        self.fail_show.store(v, Ordering::SeqCst);
    }

    /// Calls so far, e.g. `show:menuId@x,y` and `dismiss:id`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// The most recent accepted show request.
    pub fn last_shown(&self) -> Option<PanelRequest> {
        self.shown.lock().last().cloned()
    }

    /// Record a call.
    fn note(&self, s: String) {
        self.calls.lock().push(s);
    }
}

impl PanelService for MockPanel {
    fn show(&self, request: PanelRequest) -> Result<()> {
        if self.fail_show.load(Ordering::SeqCst) {
            self.note(format!("show-failed:{}", request.menu_id));
            return Err(Error::MissingService("panel"));
        }
        self.note(format!(
            "show:{}@{},{}",
            request.menu_id, request.position.x, request.position.y
        ));
        self.shown.lock().push(request);
        Ok(())
    }

    fn dismiss(&self, id: &str) {
        self.note(format!("dismiss:{id}"));
    }
}

/// Viewport with a single element and scripted hit-test results.
#[derive(Clone, Default)]
pub struct MockViewport {
    /// Call log.
    calls: Arc<Mutex<Vec<String>>>,
    /// Active element and its bounds.
    active: Arc<Mutex<Option<(ElementId, Rect)>>>,
    /// Object returned by the hit-test.
    nearby: Arc<Mutex<Option<Value>>>,
    /// Canvas points returned for any annotation.
    points: Arc<Mutex<Vec<Position>>>,
    /// Selected annotations.
    selected: Arc<Mutex<Vec<Value>>>,
}

impl MockViewport {
    /// A viewport with no element.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install element 1 with the given bounds as the active element.
    pub fn set_rect(&self, rect: Rect) {
        *self.active.lock() = Some((ElementId(1), rect));
    }

    /// Script the hit-test result.
    pub fn set_nearby(&self, v: Option<Value>) {
        *self.nearby.lock() = v;
    }

    /// Script the annotation canvas points.
    pub fn set_points(&self, points: Vec<Position>) {
        *self.points.lock() = points;
    }

    /// Script the selection.
    pub fn set_selected(&self, selected: Vec<Value>) {
        *self.selected.lock() = selected;
    }

    /// Calls so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Record a call.
    fn note(&self, s: &str) {
        self.calls.lock().push(s.to_string());
    }
}

impl ViewportService for MockViewport {
    fn active_element(&self) -> Option<ElementId> {
        self.note("active_element");
        self.active.lock().map(|(e, _)| e)
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.note("bounding_rect");
        self.active
            .lock()
            .filter(|(e, _)| *e == element)
            .map(|(_, r)| r)
    }

    fn find_nearby_object(&self, _element: ElementId, _canvas: Position) -> Option<Value> {
        self.note("find_nearby_object");
        self.nearby.lock().clone()
    }

    fn active_canvas_points(&self, _tool_data: &Value) -> Vec<Position> {
        self.note("active_canvas_points");
        self.points.lock().clone()
    }

    fn selected_annotations(&self) -> Vec<Value> {
        self.note("selected_annotations");
        self.selected.lock().clone()
    }
}

/// In-memory measurement records.
#[derive(Clone, Default)]
pub struct MockMeasurements {
    /// Records by uid.
    records: Arc<Mutex<HashMap<String, Props>>>,
    /// Call log.
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockMeasurements {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly.
    pub fn insert(&self, uid: &str, record: Props) {
        self.records.lock().insert(uid.to_string(), record);
    }

    /// Read a record without logging.
    pub fn record(&self, uid: &str) -> Option<Props> {
        self.records.lock().get(uid).cloned()
    }

    /// Calls so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl MeasurementStore for MockMeasurements {
    fn get(&self, uid: &str) -> Option<Props> {
        self.calls.lock().push(format!("get:{uid}"));
        self.records.lock().get(uid).cloned()
    }

    fn update(&self, uid: &str, record: Props) {
        self.calls.lock().push(format!("update:{uid}"));
        self.records.lock().insert(uid.to_string(), record);
    }

    fn remove(&self, uid: &str) -> bool {
        self.calls.lock().push(format!("remove:{uid}"));
        self.records.lock().remove(uid).is_some()
    }
}

/// Prompt with a scripted answer; `None` answers as a cancel.
#[derive(Clone, Default)]
pub struct MockPrompt {
    /// Next answer.
    answer: Arc<Mutex<Option<String>>>,
}

impl MockPrompt {
    /// A prompt that cancels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer.
    pub fn set_answer(&self, answer: Option<&str>) {
        *self.answer.lock() = answer.map(str::to_string);
    }
}

impl PromptService for MockPrompt {
    fn prompt_label(&self, _current: Option<&str>) -> Option<String> {
        self.answer.lock().clone()
    }
}

/// All mocks together, with the mode configuration they are served with.
#[derive(Clone, Default)]
pub struct MockServices {
    /// Panel.
    pub panel: MockPanel,
    /// Viewport.
    pub viewport: MockViewport,
    /// Measurements.
    pub measurements: MockMeasurements,
    /// Prompt.
    pub prompt: MockPrompt,
    /// Customizations served to the engine.
    pub config: ModeConfig,
}

impl MockServices {
    /// Mocks with an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mocks serving `config`.
    pub fn with_config(config: ModeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// A service bundle backed by these mocks.
    pub fn services(&self) -> Services {
        Services {
            panel: Some(Arc::new(self.panel.clone())),
            viewport: Arc::new(self.viewport.clone()),
            measurements: Arc::new(self.measurements.clone()),
            prompt: Arc::new(self.prompt.clone()),
            customizations: Arc::new(self.config.clone()),
        }
    }
}
