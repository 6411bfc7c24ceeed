//! The right-click scenario: in-memory collaborators, a channel-backed panel
//! and a transcript of everything the panel is asked to do.

use std::sync::Arc;

use ctxmenu::{ElementId, InteractionEvent, MouseButton, Rect};
use ctxmenu_engine::{ChannelPanel, Engine, PanelMsg, test_support::MockServices};
use menu_config::{ModeConfig, Props};
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

use crate::{
    cli::Cli,
    error::{Error, Result},
};

/// Uid of the synthetic measurement placed under the pointer.
const PROBE_UID: &str = "probe-1";

/// Tool data for an annotation made with `tool`.
fn tool_data(tool: &str) -> Value {
    let metadata = Props::from_iter([("toolName".to_string(), Value::String(tool.to_string()))]);
    Value::Object(Props::from_iter([
        ("annotationUID".to_string(), Value::String(PROBE_UID.to_string())),
        ("metadata".to_string(), Value::Object(metadata)),
    ]))
}

/// Print every queued panel message.
fn drain(rx: &mut UnboundedReceiver<PanelMsg>) {
    while let Ok(msg) = rx.try_recv() {
        match msg {
            PanelMsg::Show(req) => {
                println!(
                    "show {} at ({}, {})",
                    req.menu_id, req.position.x, req.position.y
                );
                for (i, item) in req.items.iter().enumerate() {
                    println!("  [{i}] {}", item.display_label());
                }
            }
            PanelMsg::Dismiss { id } => println!("dismiss {id}"),
        }
    }
}

/// Print the names of all customizations.
pub fn list(config: &ModeConfig) {
    for name in config.names() {
        let kind = match config.get(name) {
            Some(c) if c.as_menus().is_some() => "context_menu",
            _ => "commands",
        };
        println!("{name}: {kind}");
    }
}

/// Run the scenario described by `cli` against `config`.
pub fn run(cli: &Cli, config: ModeConfig) -> Result<()> {
    let mocks = MockServices::with_config(config);
    mocks.viewport.set_rect(Rect::new(0.0, 0.0, 1024.0, 1024.0));
    if let Some(tool) = &cli.tool {
        mocks.viewport.set_nearby(Some(tool_data(tool)));
        mocks.measurements.insert(PROBE_UID, Props::new());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut services = mocks.services();
    services.panel = Some(Arc::new(ChannelPanel::new(tx)));
    let engine = Engine::new(&services)?;

    let click = InteractionEvent::new(MouseButton::Secondary)
        .on(ElementId(1))
        .at_client(cli.x, cli.y)
        .at_canvas(cli.x, cli.y);
    info!(x = cli.x, y = cli.y, tool = ?cli.tool, "right click");
    engine.handle_click(&click)?;
    drain(&mut rx);

    for label in &cli.activate {
        let Some(idx) = engine.controller().find_item(label) else {
            return Err(Error::NoSuchItem {
                label: label.clone(),
                available: engine
                    .controller()
                    .items()
                    .iter()
                    .map(|i| i.display_label().to_string())
                    .collect(),
            });
        };
        println!("> activate {label}");
        engine.activate(idx)?;
        drain(&mut rx);
    }

    if cli.tool.is_some() {
        match mocks.measurements.record(PROBE_UID) {
            Some(record) => println!("measurement {PROBE_UID}: {}", Value::Object(record)),
            None => println!("measurement {PROBE_UID}: removed"),
        }
    }
    Ok(())
}
