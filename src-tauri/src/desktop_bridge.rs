use std::{path::Path, sync::Arc};

use serde_json::{json, Value};
use shell_host::{
    assemble, discover_route_contributions, BridgeError, CapabilityRegistry, RouteOrder,
    RouteTable, DEFAULT_BRIDGE_NAMESPACE,
};

use crate::{InjectParams, WindowStateSnapshot, BRIDGE_COMMAND};

pub(crate) fn load_route_table<F>(webui_dir: &Path, order: RouteOrder, log: F) -> RouteTable
where
    F: Fn(&str),
{
    let contributions = discover_route_contributions(webui_dir, &log);
    let module_ids = contributions
        .iter()
        .map(|contribution| contribution.module_id.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    log(&format!(
        "discovered {} route contribution(s) under {}: [{module_ids}]",
        contributions.len(),
        webui_dir.display()
    ));

    let table = assemble(contributions, order);
    for path in table.duplicate_paths() {
        log(&format!(
            "route path {path:?} is declared more than once; the first declaration wins"
        ));
    }
    table
}

fn window_state(context: &InjectParams) -> Result<Value, String> {
    let window = context
        .main_window
        .as_ref()
        .ok_or_else(|| "Main window is unavailable.".to_string())?;

    let snapshot = WindowStateSnapshot {
        title: window
            .title()
            .map_err(|error| format!("Failed to read window title: {error}"))?,
        visible: window
            .is_visible()
            .map_err(|error| format!("Failed to read window visibility: {error}"))?,
        focused: window
            .is_focused()
            .map_err(|error| format!("Failed to read window focus: {error}"))?,
        development_server: context.development_server,
    };
    serde_json::to_value(snapshot)
        .map_err(|error| format!("Failed to encode window state: {error}"))
}

/// Every operation reachable from `window.api` in the front-end.
pub(crate) fn build_capability_registry(
    routes: RouteTable,
) -> Result<CapabilityRegistry<InjectParams>, BridgeError> {
    let routes = Arc::new(routes);
    let mut registry = CapabilityRegistry::new();

    registry.register("hello", |_, _: &InjectParams| Ok(json!("world")))?;
    registry.register("routes", move |_, _: &InjectParams| {
        serde_json::to_value(routes.as_ref())
            .map_err(|error| format!("Failed to encode route table: {error}"))
    })?;
    registry.register("windowState", |_, context: &InjectParams| window_state(context))?;

    Ok(registry)
}

pub(crate) fn bridge_script(registry: &CapabilityRegistry<InjectParams>) -> String {
    registry.bridge_script(DEFAULT_BRIDGE_NAMESPACE, BRIDGE_COMMAND)
}
