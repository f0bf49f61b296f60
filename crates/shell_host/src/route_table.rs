//! Assembly of the front-end route table from per-module contributions.
//!
//! Feature modules contribute route lists at `modules/<module>/router/<file>.json` inside the
//! web UI root. All contributions are read eagerly at startup and concatenated into one table.
//! Route precedence follows table order, so contributions are ordered by module id unless the
//! shell is configured to keep raw discovery order.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

pub const ROUTE_MODULES_DIR: &str = "modules";
pub const ROUTE_CONTRIBUTION_DIR: &str = "router";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// View identifier the front-end loads lazily when the route is first visited.
    pub component: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            component: component.into(),
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContribution {
    pub module_id: String,
    pub routes: Vec<RouteDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteOrder {
    #[default]
    ModuleId,
    Discovery,
}

impl RouteOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "module" | "module-id" | "sorted" => Some(Self::ModuleId),
            "discovery" | "unsorted" => Some(Self::Discovery),
            _ => None,
        }
    }
}

pub fn default_layouts() -> BTreeMap<String, String> {
    BTreeMap::from([("default".to_string(), "layouts/Default".to_string())])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RouteTable {
    pub layouts: BTreeMap<String, String>,
    pub routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    /// Top-level paths declared more than once, in order of first appearance.
    pub fn duplicate_paths(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for route in &self.routes {
            let path = route.path.as_str();
            if !seen.insert(path) && reported.insert(path) {
                duplicates.push(path);
            }
        }
        duplicates
    }
}

/// Concatenates contributions into one table. Routes inside a contribution keep their order
/// and nothing is de-duplicated.
pub fn assemble(mut contributions: Vec<RouteContribution>, order: RouteOrder) -> RouteTable {
    if order == RouteOrder::ModuleId {
        contributions.sort_by(|left, right| left.module_id.cmp(&right.module_id));
    }

    RouteTable {
        layouts: default_layouts(),
        routes: contributions
            .into_iter()
            .flat_map(|contribution| contribution.routes)
            .collect(),
    }
}

fn sub_dirs(dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            Some((name, entry.path()))
        })
        .collect()
}

/// Reads every route contribution under `webui_root`, in file-system enumeration order.
/// Unreadable or malformed files are logged and skipped.
pub fn discover_route_contributions<F>(webui_root: &Path, log: F) -> Vec<RouteContribution>
where
    F: Fn(&str),
{
    let mut contributions = Vec::new();

    for (module, module_dir) in sub_dirs(&webui_root.join(ROUTE_MODULES_DIR)) {
        let router_dir = module_dir.join(ROUTE_CONTRIBUTION_DIR);
        let entries = match fs::read_dir(&router_dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => continue,
            Err(error) => {
                log(&format!(
                    "failed to list route contributions in {}: {error}",
                    router_dir.display()
                ));
                continue;
            }
        };

        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(error) => {
                    log(&format!(
                        "failed to read route contribution {}: {error}",
                        path.display()
                    ));
                    continue;
                }
            };
            match serde_json::from_str::<Vec<RouteDescriptor>>(&raw) {
                Ok(routes) => contributions.push(RouteContribution {
                    module_id: format!("{module}/{stem}"),
                    routes,
                }),
                Err(error) => log(&format!(
                    "failed to parse route contribution {}: {error}",
                    path.display()
                )),
            }
        }
    }

    contributions
}
