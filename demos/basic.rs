use ruletree::{Record, parse};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let tree = parse(r#"(age > 30 AND department == "Sales") OR (age < 25 AND department == "Marketing")"#)
        .expect("failed to parse rule");

    println!("{tree}");

    let record = Record::new().set("age", 35).set("department", "Sales");

    match tree.evaluate(&record) {
        Ok(result) => println!("Result: {result}"),
        Err(err) => println!("Evaluation failed: {err}"),
    }

    // missing attributes are reported, never treated as false
    match tree.evaluate(&Record::new().set("age", 28)) {
        Ok(result) => println!("Result: {result}"),
        Err(err) => println!("Evaluation failed: {err}"),
    }
}
