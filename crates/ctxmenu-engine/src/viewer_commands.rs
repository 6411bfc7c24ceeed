//! Viewer command module: context-menu control and measurement edits.
//!
//! Every command is registered with the `VIEWER` context tag.

use std::sync::Arc;

use ctxmenu::{ElementId, InteractionEvent, Position};
use menu_config::{Customization, DEFAULT_MENU_NAME, MenuBundle, Props, VIEWER_CONTEXT, lookup};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    CommandDefinition, CommandsManager, ContextMenuController, Error, MeasurementStore, Result,
    Services, ShowRequest, ViewportService,
};

/// Resolve and open a context menu.
pub const SHOW_VIEWER_CONTEXT_MENU: &str = "showViewerContextMenu";
/// Close any open context menu.
pub const CLOSE_VIEWER_CONTEXT_MENU: &str = "closeViewerContextMenu";
/// Hit-test for tool data near a point.
pub const GET_NEARBY_TOOL_DATA: &str = "getNearbyToolData";
/// Canvas points of an annotation.
pub const GET_TOOL_DATA_ACTIVE_CANVAS_POINTS: &str = "getToolDataActiveCanvasPoints";
/// Remove a measurement.
pub const DELETE_MEASUREMENT: &str = "deleteMeasurement";
/// Prompt for and set a measurement label.
pub const SET_LABEL: &str = "setLabel";
/// Record a finding code on a measurement.
pub const SET_FINDING: &str = "setFinding";
/// Record a site code on a measurement.
pub const SET_SITE: &str = "setSite";

/// Arguments of [`SHOW_VIEWER_CONTEXT_MENU`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ShowArgs {
    /// Customization holding the menus.
    menu_name: Option<String>,
    /// Object the menu is about.
    nearby_tool_data: Option<Value>,
    /// Triggering event.
    event: Option<InteractionEvent>,
    /// Fall back to the current selection when nothing is nearby.
    use_selected_annotation: bool,
    /// Tools whose selected annotations may open the menu.
    allowed_selected_tools: Option<Vec<String>>,
    /// Explicit menu id.
    menu_id: Option<String>,
    /// Requested sub-menu.
    sub_menu: Option<String>,
}

/// Arguments of [`GET_NEARBY_TOOL_DATA`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct NearbyArgs {
    /// Already known tool data; returned as is.
    nearby_tool_data: Option<Value>,
    /// Element to hit-test.
    element: Option<ElementId>,
    /// Canvas point to hit-test around.
    canvas_coordinates: Option<Position>,
}

/// Arguments of the measurement-editing commands.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MeasurementArgs {
    /// Measurement uid.
    uid: Option<String>,
    /// Code to record; usually a resolved reference object.
    code: Option<Value>,
    /// Record field the code is written to.
    measurement_key: Option<String>,
}

/// Decode command arguments.
fn parse<T: DeserializeOwned>(name: &str, args: &Props) -> Result<T> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| Error::command(name, format!("invalid arguments: {e}")))
}

/// String at a dotted path inside a JSON object.
fn str_at<'a>(v: &'a Value, path: &str) -> Option<&'a str> {
    v.as_object()
        .and_then(|m| lookup(m, path))
        .and_then(Value::as_str)
}

/// Check properties describing the object a menu is about.
fn check_props(nearby: Option<&Value>) -> Props {
    let mut props = Props::new();
    if let Some(data) = nearby {
        if let Some(tool) = str_at(data, "metadata.toolName") {
            props.insert("toolName".into(), Value::String(tool.to_string()));
        }
        if let Some(uid) = str_at(data, "annotationUID") {
            props.insert("uid".into(), Value::String(uid.to_string()));
        }
        props.insert("value".into(), data.clone());
        props.insert("nearbyToolData".into(), data.clone());
    }
    props
}

/// Register the viewer command module.
///
/// Fails only when the built-in fallback menu does not load.
pub fn register(
    commands: &CommandsManager,
    services: &Services,
    controller: &ContextMenuController,
) -> Result<()> {
    let fallback = MenuBundle::builtin()?;
    let defs = [
        show_viewer_context_menu(services, controller.clone(), fallback),
        close_viewer_context_menu(controller.clone()),
        get_nearby_tool_data(Arc::clone(&services.viewport)),
        get_tool_data_active_canvas_points(Arc::clone(&services.viewport)),
        delete_measurement(Arc::clone(&services.measurements)),
        set_label(services),
        update_measurement(SET_FINDING, "finding", Arc::clone(&services.measurements)),
        update_measurement(SET_SITE, "site", Arc::clone(&services.measurements)),
    ];
    for def in defs {
        commands.register(def.allowed_in(VIEWER_CONTEXT));
    }
    Ok(())
}

/// [`SHOW_VIEWER_CONTEXT_MENU`]: returns whether a menu opened. A `menuName`
/// the mode does not define falls back to `fallback`.
fn show_viewer_context_menu(
    services: &Services,
    controller: ContextMenuController,
    fallback: MenuBundle,
) -> CommandDefinition {
    let customizations = Arc::clone(&services.customizations);
    let viewport = Arc::clone(&services.viewport);
    CommandDefinition::new(SHOW_VIEWER_CONTEXT_MENU, move |args, _| {
        let a: ShowArgs = parse(SHOW_VIEWER_CONTEXT_MENU, args)?;
        let menu_name = a.menu_name.as_deref().unwrap_or(DEFAULT_MENU_NAME);
        let bundle = match customizations
            .get_or(menu_name, Customization::ContextMenu(fallback.clone()))
        {
            Customization::ContextMenu(bundle) => bundle,
            Customization::Commands(_) => {
                warn!(menu_name = %menu_name, "customization is not a context menu; using default");
                fallback.clone()
            }
        };

        let mut nearby = a.nearby_tool_data;
        if a.use_selected_annotation && nearby.is_none() {
            let selected = viewport.selected_annotations().into_iter().next();
            if let Some(allowed) = &a.allowed_selected_tools {
                let tool = selected.as_ref().and_then(|s| str_at(s, "metadata.toolName"));
                if !tool.is_some_and(|t| allowed.iter().any(|x| x == t)) {
                    debug!(tool = ?tool, "selected annotation not allowed; no menu");
                    return Ok(Value::Bool(false));
                }
            }
            nearby = selected;
        }

        let anchors = nearby
            .as_ref()
            .map(|d| viewport.active_canvas_points(d))
            .unwrap_or_default();
        let request = ShowRequest {
            bundle,
            check_props: check_props(nearby.as_ref()),
            event: a.event,
            anchors,
            menu_id: a.menu_id,
            sub_menu: a.sub_menu,
        };
        Ok(Value::Bool(controller.show_context_menu(request)))
    })
}

/// [`CLOSE_VIEWER_CONTEXT_MENU`]: returns whether a menu was open.
fn close_viewer_context_menu(controller: ContextMenuController) -> CommandDefinition {
    CommandDefinition::new(CLOSE_VIEWER_CONTEXT_MENU, move |_, _| {
        Ok(Value::Bool(controller.close()))
    })
}

/// [`GET_NEARBY_TOOL_DATA`]: the given tool data, else the hit-test result,
/// else `null`.
fn get_nearby_tool_data(viewport: Arc<dyn ViewportService>) -> CommandDefinition {
    CommandDefinition::new(GET_NEARBY_TOOL_DATA, move |args, _| {
        let a: NearbyArgs = parse(GET_NEARBY_TOOL_DATA, args)?;
        if let Some(data) = a.nearby_tool_data {
            return Ok(data);
        }
        let found = match (a.element, a.canvas_coordinates) {
            (Some(el), Some(pt)) if pt.is_valid() => viewport.find_nearby_object(el, pt),
            _ => None,
        };
        Ok(found.unwrap_or(Value::Null))
    })
}

/// [`GET_TOOL_DATA_ACTIVE_CANVAS_POINTS`]: `{toolData}` to a list of points.
fn get_tool_data_active_canvas_points(viewport: Arc<dyn ViewportService>) -> CommandDefinition {
    CommandDefinition::new(GET_TOOL_DATA_ACTIVE_CANVAS_POINTS, move |args, _| {
        let Some(data) = args.get("toolData") else {
            return Ok(Value::Array(Vec::new()));
        };
        serde_json::to_value(viewport.active_canvas_points(data))
            .map_err(|e| Error::command(GET_TOOL_DATA_ACTIVE_CANVAS_POINTS, e.to_string()))
    })
}

/// [`DELETE_MEASUREMENT`]: removes `uid` when given; returns whether a
/// record was removed.
fn delete_measurement(store: Arc<dyn MeasurementStore>) -> CommandDefinition {
    CommandDefinition::new(DELETE_MEASUREMENT, move |args, _| {
        let a: MeasurementArgs = parse(DELETE_MEASUREMENT, args)?;
        Ok(Value::Bool(a.uid.is_some_and(|uid| store.remove(&uid))))
    })
}

/// [`SET_LABEL`]: prompts for a label. Cancelling leaves the record as is.
fn set_label(services: &Services) -> CommandDefinition {
    let store = Arc::clone(&services.measurements);
    let prompt = Arc::clone(&services.prompt);
    CommandDefinition::new(SET_LABEL, move |args, _| {
        let a: MeasurementArgs = parse(SET_LABEL, args)?;
        let uid = a.uid.ok_or_else(|| Error::command(SET_LABEL, "missing uid"))?;
        let mut record = store
            .get(&uid)
            .ok_or_else(|| Error::command(SET_LABEL, format!("no measurement {uid}")))?;
        let current = record.get("label").and_then(Value::as_str);
        let Some(label) = prompt.prompt_label(current) else {
            debug!(uid = %uid, "label prompt cancelled");
            return Ok(Value::Bool(false));
        };
        record.insert("label".into(), Value::String(label));
        store.update(&uid, record);
        Ok(Value::Bool(true))
    })
}

/// [`SET_FINDING`] and [`SET_SITE`]: write `code` under the measurement key
/// and use its text as the label.
fn update_measurement(
    name: &'static str,
    default_key: &str,
    store: Arc<dyn MeasurementStore>,
) -> CommandDefinition {
    CommandDefinition::new(name, move |args, _| {
        let a: MeasurementArgs = parse(name, args)?;
        let uid = a.uid.ok_or_else(|| Error::command(name, "missing uid"))?;
        let code = a.code.ok_or_else(|| Error::command(name, "missing code"))?;
        let key = a.measurement_key.unwrap_or_else(|| "finding".to_string());
        let mut record = store
            .get(&uid)
            .ok_or_else(|| Error::command(name, format!("no measurement {uid}")))?;
        let label = match &code {
            Value::String(s) => Some(s.clone()),
            other => str_at(other, "text").map(str::to_string),
        };
        if let Some(label) = label {
            record.insert("label".into(), Value::String(label));
        }
        record.insert(key, code);
        store.update(&uid, record);
        Ok(Value::Bool(true))
    })
    .with_default("measurementKey", Value::String(default_key.to_string()))
}
