use std::sync::Arc;
use std::thread;

use ruletree::{Record, parse};

fn main() {
    let tree = Arc::new(
        parse("age >= 18 AND status == 'active'").expect("failed to parse rule"),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                let record = Record::new()
                    .set("age", 16_i64 + i64::from(i))
                    .set("status", "active");

                let result = tree.evaluate(&record);
                println!("Thread {i}: {result:?}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
