use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::Method;
use trierouter::hot_reload::{reload_table, watch_table};
use trierouter::table::{load_router, load_table, TableError};
use trierouter::{RouterConfig, SharedRouter};

fn temp_table(suffix: &str, body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("routes_")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const YAML_V1: &str = r#"
base_path: /api
routes:
  - method: GET
    path: /sessions/:id
    handler: get_session
    tags: [sessions]
  - method: GET
    path: /sessions/:sessionId/messages
    handler: list_messages
"#;

const YAML_V2: &str = r#"
base_path: /api
routes:
  - method: GET
    path: /sessions/:id
    handler: get_session_v2
"#;

#[test]
fn test_load_yaml_table() {
    let file = temp_table(".yaml", YAML_V1);
    let table = load_table(file.path()).unwrap();
    assert_eq!(table.base_path, "/api");
    assert_eq!(table.routes.len(), 2);
    assert_eq!(table.routes[0].tags, vec!["sessions".to_string()]);

    let router = load_router(file.path(), RouterConfig::default()).unwrap();
    let matched = router
        .match_route(&Method::GET, "/api/sessions/s1/messages")
        .unwrap();
    assert_eq!(matched.handler, "list_messages");
    assert_eq!(matched.param("sessionId"), Some("s1"));
}

#[test]
fn test_load_toml_table() {
    let file = temp_table(
        ".toml",
        r#"
global_middleware = ["auth"]

[[routes]]
method = "delete"
path = "/files/*path"
handler = "delete_file"
"#,
    );
    let router = load_router(file.path(), RouterConfig::default()).unwrap();
    let matched = router
        .match_route(&Method::DELETE, "/files/a/b.txt")
        .unwrap();
    assert_eq!(matched.param("path"), Some("a/b.txt"));
    assert_eq!(matched.compiled.map(String::as_str), Some("auth -> delete_file"));
}

#[test]
fn test_load_json_table() {
    let file = temp_table(
        ".json",
        r#"{"routes":[{"method":"GET","path":"/health","handler":"health","summary":"Liveness"}]}"#,
    );
    let router = load_router(file.path(), RouterConfig::default()).unwrap();
    let routes = router.routes();
    assert_eq!(routes.len(), 1);
    assert_eq!(
        routes[0].metadata.and_then(|m| m.summary.as_deref()),
        Some("Liveness")
    );
}

#[test]
fn test_invalid_method_is_reported() {
    let file = temp_table(
        ".yaml",
        "routes:\n  - { method: 'GE T', path: /x, handler: x }\n",
    );
    let err = load_router(file.path(), RouterConfig::default()).unwrap_err();
    let table_err = err.downcast_ref::<TableError>().unwrap();
    assert!(matches!(table_err, TableError::InvalidMethod { .. }));
}

#[test]
fn test_missing_file_and_malformed_content() {
    assert!(load_table("/definitely/not/here.yaml").is_err());

    let file = temp_table(".yaml", "routes: [ { method: GET ");
    let err = load_table(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse route table"));
}

#[test]
fn test_reload_table_swaps_snapshot() {
    let file = temp_table(".yaml", YAML_V1);
    let shared = SharedRouter::new(load_router(file.path(), RouterConfig::default()).unwrap());
    let before = shared.load_full();

    std::fs::write(file.path(), YAML_V2).unwrap();
    assert_eq!(
        reload_table(file.path(), &shared, RouterConfig::default()).unwrap(),
        1
    );

    // Old snapshot is still usable by whoever holds it
    assert_eq!(
        before
            .match_route(&Method::GET, "/api/sessions/1")
            .unwrap()
            .handler,
        "get_session"
    );
    assert_eq!(
        shared
            .load()
            .match_route(&Method::GET, "/api/sessions/1")
            .unwrap()
            .handler,
        "get_session_v2"
    );
}

#[test]
fn test_watch_table_reload() {
    let file = temp_table(".yaml", YAML_V1);
    let shared = Arc::new(SharedRouter::new(
        load_router(file.path(), RouterConfig::default()).unwrap(),
    ));

    let reloads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&reloads);
    let watcher = watch_table(
        file.path(),
        Arc::clone(&shared),
        RouterConfig::default(),
        move |router| {
            if router.len() == 1 {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        },
    )
    .unwrap();

    std::fs::write(file.path(), YAML_V2).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while reloads.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(25));
    }
    drop(watcher);

    assert!(reloads.load(Ordering::SeqCst) > 0, "watcher never reloaded");
    let router = shared.load();
    assert_eq!(
        router
            .match_route(&Method::GET, "/api/sessions/1")
            .unwrap()
            .handler,
        "get_session_v2"
    );
    assert!(router
        .match_route(&Method::GET, "/api/sessions/1/messages")
        .is_none());
}
