use std::{fs, path::Path, sync::Mutex};

use shell_host::{
    assemble, discover_route_contributions, AssetResolver, RouteOrder, UnknownMimePolicy,
};

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("fixture parent")).expect("create fixture dir");
    fs::write(path, contents).expect("write fixture");
}

fn webui_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create webui root");
    write(dir.path(), "index.html", "<!doctype html><div id=\"app\"></div>");
    write(dir.path(), "assets/index.css", "body{margin:0}");
    write(
        dir.path(),
        "modules/default/router/routes.json",
        r#"[{
            "path": "/",
            "component": "layout:default",
            "children": [{ "path": "", "name": "Home", "component": "modules/default/views/Index" }]
        }]"#,
    );
    write(
        dir.path(),
        "modules/settings/router/routes.json",
        r#"[{ "path": "/settings", "name": "Settings", "component": "modules/settings/views/Index" }]"#,
    );
    write(dir.path(), "modules/broken/router/routes.json", "{ not json");
    write(dir.path(), "modules/notes/README.md", "no router dir");
    dir
}

#[test]
fn packaged_entry_and_assets_resolve_from_one_root() {
    let root = webui_fixture();
    let resolver = AssetResolver::new(root.path());

    let entry = resolver.respond("app://index.html/#/", |_| {});
    assert_eq!(entry.status, 200);
    assert_eq!(entry.mime_type, Some("text/html"));
    assert_eq!(
        entry.body,
        fs::read(root.path().join("index.html")).expect("read index")
    );

    let css = resolver.respond("app://index.html/assets/index.css", |_| {});
    assert_eq!(css.mime_type, Some("text/css"));
    assert_eq!(css.body, b"body{margin:0}");

    let escape = resolver.respond("app://index.html/%2E%2E/%2E%2E/etc/passwd", |_| {});
    assert_ne!(escape.status, 200);
    assert!(escape.body.is_empty());
}

#[test]
fn unknown_extension_gets_exactly_one_response_under_either_policy() {
    let root = webui_fixture();
    write(root.path(), "data/blob.unknownext", "raw");
    let lines = Mutex::new(Vec::new());

    let strict = AssetResolver::new(root.path())
        .respond("app://index.html/data/blob.unknownext", |line| {
            lines.lock().unwrap().push(line.to_string())
        });
    assert_eq!(strict.status, 415);
    assert_eq!(lines.lock().unwrap().len(), 1);

    let lenient = AssetResolver::new(root.path())
        .with_unknown_mime_policy(UnknownMimePolicy::OctetStream)
        .respond("app://index.html/data/blob.unknownext", |_| {});
    assert_eq!(lenient.status, 200);
    assert_eq!(lenient.mime_type, Some("application/octet-stream"));
}

#[test]
fn route_contributions_are_discovered_and_sorted_by_module() {
    let root = webui_fixture();
    let lines = Mutex::new(Vec::new());

    let contributions = discover_route_contributions(root.path(), |line| {
        lines.lock().unwrap().push(line.to_string())
    });
    let mut module_ids: Vec<&str> = contributions
        .iter()
        .map(|contribution| contribution.module_id.as_str())
        .collect();
    module_ids.sort_unstable();
    assert_eq!(module_ids, vec!["default/routes", "settings/routes"]);

    let lines = lines.into_inner().unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("failed to parse route contribution"), "{lines:?}");

    let table = assemble(contributions, RouteOrder::ModuleId);
    let paths: Vec<&str> = table.routes.iter().map(|route| route.path.as_str()).collect();
    assert_eq!(paths, vec!["/", "/settings"]);
    assert_eq!(table.routes[0].children[0].name.as_deref(), Some("Home"));
    assert_eq!(
        table.layouts.get("default").map(String::as_str),
        Some("layouts/Default")
    );
    assert!(table.duplicate_paths().is_empty());
}

#[test]
fn missing_modules_dir_yields_empty_table() {
    let root = tempfile::tempdir().expect("create empty root");
    let contributions = discover_route_contributions(root.path(), |_| {});
    assert!(contributions.is_empty());
    assert!(assemble(contributions, RouteOrder::ModuleId).routes.is_empty());
}
