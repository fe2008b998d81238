use ruletree::{EngineConfig, LogicalOp, Record, combine, combine_with_config, to_transport};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let rules = [
        r#"age > 30 AND department == "Sales""#,
        r#"age < 25 AND department == "Marketing""#,
    ];

    // OR by default: eligible if any rule matches
    let any = combine(&rules).expect("failed to combine rules");
    println!("{any}");
    println!(
        "{}",
        serde_json::to_string_pretty(&to_transport(&any)).expect("transport value is valid JSON")
    );

    let config = EngineConfig::default().with_default_operator(LogicalOp::And);
    let all = combine_with_config(&["salary >= 50000", "active == true"], &config)
        .expect("failed to combine rules");
    println!("{all}");

    let record = Record::new()
        .set("age", 40)
        .set("department", "Sales")
        .set("salary", 62_000.0)
        .set("active", false);

    println!("any: {:?}", any.evaluate(&record));
    println!("all: {:?}", all.evaluate(&record));
}
