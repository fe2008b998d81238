use ruletree::EngineConfig;
use ruletree::boundary::{Endpoint, handle};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = EngineConfig::default();

    let requests = [
        ("/create_rule", json!({"rule": "age > 30 AND department == 'Sales'"})),
        ("/create_rule", json!({"rule": "age >> 30"})),
        (
            "/combine_rules",
            json!({"rules": ["age > 30", "department == 'Marketing'"], "operator": "AND"}),
        ),
        ("/combine_rules", json!({"rules": []})),
    ];

    for (path, body) in requests {
        let Some(endpoint) = Endpoint::from_path(path) else {
            println!("{path}: 404");
            continue;
        };
        let reply = handle(endpoint, body, &config);
        println!("{path}: {} {}", reply.status, reply.body);
    }

    // round trip: create a tree, then evaluate it
    let created = handle(
        Endpoint::CreateRule,
        json!({"rule": "salary >= 50000 OR active == true"}),
        &config,
    );
    for data in [
        json!({"salary": 62000, "active": false}),
        json!({"salary": 42000, "active": true}),
        json!({"salary": 42000}),
    ] {
        let reply = handle(
            Endpoint::EvaluateRule,
            json!({"ast": created.body["ast"], "data": data}),
            &config,
        );
        println!("/evaluate_rule {data}: {} {}", reply.status, reply.body);
    }
}
