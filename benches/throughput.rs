use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use std::hint::black_box;
use trierouter::table::{parse_table, NamedRouter, TableFormat};
use trierouter::{Router, RouterConfig};

fn example_table() -> &'static str {
    r#"
global_middleware: [request_id, cors]
routes:
  - { method: GET, path: /, handler: root_handler }
  - { method: GET, path: /zoo/animals, handler: get_animals }
  - { method: POST, path: /zoo/animals, handler: create_animal }
  - { method: GET, path: /zoo/animals/:id, handler: get_animal }
  - { method: PUT, path: /zoo/animals/:id, handler: update_animal }
  - { method: DELETE, path: /zoo/animals/:id, handler: delete_animal }
  - { method: GET, path: /zoo/animals/:id/toys/:toy_id, handler: animal_toy }
  - { method: GET, path: "/zoo/:category/animals/:id/habitats/:habitat_id/sections/:section_id", handler: habitat_section }
  - { method: POST, path: "/inventory/:store/feeds/:feed/items/:item/batches/:batch", handler: batch }
  - { method: GET, path: /complex/:a/:b/:c/:d/:e/:f/:g/:h/:i, handler: complex }
  - { method: GET, path: /users/admin/dashboard, handler: dashboard }
  - { method: GET, path: /users/:id/profile, handler: profile }
  - { method: GET, path: /static/*path, handler: static_files }
"#
}

fn build_router() -> NamedRouter {
    parse_table(example_table(), TableFormat::Yaml)
        .expect("failed to parse table")
        .build_router(RouterConfig::default())
        .expect("failed to build router")
}

fn bench_route_throughput(c: &mut Criterion) {
    let router = build_router();
    c.bench_function("route_match", |b| {
        let test_paths = [
            (Method::GET, "/zoo/animals/123"),
            (Method::GET, "/zoo/animals/123/toys/456"),
            (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
            (Method::POST, "/inventory/1/feeds/2/items/3/batches/4"),
            (Method::GET, "/complex/1/2/3/4/5/6/7/8/9"),
        ];
        b.iter(|| {
            for (method, path) in test_paths.iter() {
                let res = router.match_route(method, path);
                black_box(&res);
            }
        })
    });
}

fn bench_backtracking(c: &mut Criterion) {
    let router = build_router();
    c.bench_function("route_match_backtrack", |b| {
        b.iter(|| black_box(router.match_route(&Method::GET, black_box("/users/admin/profile"))))
    });
    c.bench_function("route_match_wildcard", |b| {
        b.iter(|| {
            black_box(router.match_route(&Method::GET, black_box("/static/css/vendor/site.min.css")))
        })
    });
}

fn bench_miss_classification(c: &mut Criterion) {
    let router = build_router();
    c.bench_function("resolve_405", |b| {
        b.iter(|| black_box(router.resolve(&Method::PATCH, black_box("/zoo/animals/1"))))
    });
    c.bench_function("resolve_404", |b| {
        b.iter(|| black_box(router.resolve(&Method::GET, black_box("/nowhere/at/all"))))
    });
}

fn bench_many_routes(c: &mut Criterion) {
    let mut router: Router<String> = Router::new();
    for i in 0..1000 {
        router.register(
            Method::GET,
            &format!("/api/v1/resource{i}/:id"),
            format!("handler_{i}"),
            None,
        );
    }
    c.bench_function("route_match_1000_routes", |b| {
        b.iter(|| black_box(router.match_route(&Method::GET, black_box("/api/v1/resource500/42"))))
    });
}

criterion_group!(
    benches,
    bench_route_throughput,
    bench_backtracking,
    bench_miss_classification,
    bench_many_routes
);
criterion_main!(benches);
