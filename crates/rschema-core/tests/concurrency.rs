//! A compiled validator is shared across threads without synchronization.

use std::sync::Arc;
use std::thread;

use rschema_core::prelude::*;
use serde_json::json;

#[test]
fn shared_record_validator_across_threads() {
    let handles: Vec<_> = (0..8u64)
        .map(|i| {
            thread::spawn(move || {
                let ok = json!({"id": i + 1, "name": format!("r{i}")});
                let bad = json!({"id": 0, "name": "", "tags": ["t", "t"]});
                for _ in 0..100 {
                    assert!(validate_record(&ok).unwrap().valid);
                    assert_eq!(validate_record(&bad).unwrap().violations.len(), 3);
                }
                record_validator().unwrap() as *const Validator as usize
            })
        })
        .collect();

    let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addrs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn arc_validator_with_custom_schema() {
    let v = Arc::new(
        Validator::new(&json!({"type": "array", "items": {"type": "integer", "minimum": 0}}))
            .unwrap(),
    );
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let v = Arc::clone(&v);
            thread::spawn(move || {
                let errors = v.iter_errors(&json!([1, -1, i, "x"]));
                errors.len()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 2);
    }
}
