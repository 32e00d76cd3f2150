//! Unit tests for CLI commands

use crate::cli::{resolve_view, route_views, Cli, Commands, ResolutionView};
use crate::router::RouterConfig;
use crate::table::{parse_table, NamedRouter, TableFormat};
use clap::Parser;
use http::Method;

fn sample_router() -> NamedRouter {
    let table = parse_table(
        r#"
global_middleware: [cors]
routes:
  - { method: GET, path: /users/:id, handler: get_user, middleware: [auth] }
  - { method: PUT, path: /users/:id, handler: update_user }
  - { method: GET, path: /health, handler: health, summary: Liveness probe }
"#,
        TableFormat::Yaml,
    )
    .unwrap();
    table.build_router(RouterConfig::default()).unwrap()
}

#[test]
fn test_match_command_parses() {
    let cli = Cli::try_parse_from([
        "trierouter",
        "match",
        "--table",
        "routes.yaml",
        "GET",
        "/users/42",
    ])
    .unwrap();

    match cli.command {
        Commands::Match {
            table,
            method,
            path,
        } => {
            assert_eq!(table.to_string_lossy(), "routes.yaml");
            assert_eq!(method, "GET");
            assert_eq!(path, "/users/42");
        }
        _ => panic!("Expected Match command"),
    }
}

#[test]
fn test_routes_command_with_json_flag() {
    let cli = Cli::try_parse_from(["trierouter", "routes", "-t", "r.toml", "--json"]).unwrap();
    match cli.command {
        Commands::Routes { table, json } => {
            assert_eq!(table.to_string_lossy(), "r.toml");
            assert!(json);
        }
        _ => panic!("Expected Routes command"),
    }
}

#[test]
fn test_table_argument_is_required() {
    assert!(Cli::try_parse_from(["trierouter", "stats"]).is_err());
}

#[test]
fn test_resolve_view_matched() {
    let router = sample_router();
    let view = resolve_view(&router, &Method::GET, "/users/42");
    assert_eq!(view.status_code(), 200);
    match view {
        ResolutionView::Matched {
            handler,
            params,
            middleware,
            chain,
        } => {
            assert_eq!(handler, "get_user");
            assert_eq!(params.get("id").map(String::as_str), Some("42"));
            assert_eq!(middleware, vec!["auth".to_string()]);
            assert_eq!(chain.as_deref(), Some("cors -> auth -> get_user"));
        }
        other => panic!("Expected match, got {other:?}"),
    }
}

#[test]
fn test_resolve_view_method_not_allowed_and_not_found() {
    let router = sample_router();

    let view = resolve_view(&router, &Method::DELETE, "/users/42");
    assert_eq!(view.status_code(), 405);
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["status"], "method_not_allowed");
    assert_eq!(json["allowed"], serde_json::json!(["GET", "PUT"]));

    let view = resolve_view(&router, &Method::GET, "/nope");
    assert_eq!(view.status_code(), 404);
    assert_eq!(
        serde_json::to_value(&view).unwrap(),
        serde_json::json!({"status": "not_found"})
    );
}

#[test]
fn test_route_views_are_sorted_and_carry_summary() {
    let router = sample_router();
    let views = route_views(&router);
    let listed: Vec<(String, String)> = views
        .iter()
        .map(|v| (v.method.clone(), v.pattern.clone()))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("GET".to_string(), "/health".to_string()),
            ("GET".to_string(), "/users/:id".to_string()),
            ("PUT".to_string(), "/users/:id".to_string()),
        ]
    );
    assert_eq!(views[0].summary.as_deref(), Some("Liveness probe"));
}
