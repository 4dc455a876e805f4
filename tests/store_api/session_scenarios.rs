//! Session Scenario Tests
//!
//! A notebook-style session mixing host data frames (opaque values with
//! content-based rules) and plain values.

use crate::*;
use sessionstore::{Diagnostic, Fingerprint, FingerprintError, OpaqueValue, ValueType};
use std::collections::BTreeMap;

const COLUMNAR: &str = "ColumnarFrame";
const ROW: &str = "RowFrame";

/// Column-major frame
#[derive(Debug, Clone, PartialEq)]
struct ColumnarFrame(BTreeMap<String, Vec<i64>>);

/// Row-major frame
#[derive(Debug, Clone, PartialEq)]
struct RowFrame {
    header: Vec<String>,
    rows: Vec<Vec<i64>>,
}

fn columnar(cols: &[(&str, [i64; 2])]) -> Value {
    let frame = ColumnarFrame(
        cols.iter()
            .map(|(name, data)| (name.to_string(), data.to_vec()))
            .collect(),
    );
    OpaqueValue::new(COLUMNAR, frame).into()
}

fn row(header: &[&str], rows: Vec<Vec<i64>>) -> Value {
    let frame = RowFrame {
        header: header.iter().map(|h| h.to_string()).collect(),
        rows,
    };
    OpaqueValue::new(ROW, frame).into()
}

fn frame_of<T: 'static>(value: Option<&Value>) -> Option<&T> {
    value?.as_opaque()?.downcast_ref::<T>()
}

fn fingerprint_columnar(value: &Value) -> Result<Fingerprint, FingerprintError> {
    let frame = frame_of::<ColumnarFrame>(Some(value))
        .ok_or_else(|| FingerprintError::rule("not a columnar frame"))?;
    Ok(Fingerprint::from(format!("{:?}", frame.0)))
}

fn fingerprint_row(value: &Value) -> Result<Fingerprint, FingerprintError> {
    let frame =
        frame_of::<RowFrame>(Some(value)).ok_or_else(|| FingerprintError::rule("not a row frame"))?;
    // CSV rendering
    let mut csv = frame.header.join(",");
    for r in &frame.rows {
        csv.push('\n');
        csv.push_str(&r.iter().map(i64::to_string).collect::<Vec<_>>().join(","));
    }
    Ok(Fingerprint::from(csv))
}

#[test]
fn test_mixed_session() {
    let (mut store, sink) = create_recording_store(3);
    store.register_fingerprint_rule(ValueType::opaque(COLUMNAR), fingerprint_columnar);
    store.register_fingerprint_rule(ValueType::opaque(ROW), fingerprint_row);

    // Columnar frame set and get
    let df1 = columnar(&[("col1", [1, 2]), ("col2", [3, 4])]);
    store.set("df", df1.clone());
    assert_eq!(store.get("df"), Some(&df1));

    // Row frame set and get
    let rf1 = row(&["col1", "col2"], vec![vec![1, 3], vec![2, 4]]);
    store.set("rf", rf1.clone());
    assert_eq!(store.get("rf"), Some(&rf1));

    // Undo a columnar frame change
    let df2 = columnar(&[("col1", [5, 6]), ("col2", [7, 8])]);
    store.set("df", df2.clone());
    assert_eq!(store.get("df"), Some(&df2));
    store.undo("df");
    assert_eq!(store.get("df"), Some(&df1));

    // Undo a row frame change
    let rf2 = row(&["col1", "col2"], vec![vec![5, 7], vec![6, 8]]);
    store.set("rf", rf2);
    store.undo("rf");
    assert_eq!(store.get("rf"), Some(&rf1));

    // Equal content, even in a fresh allocation, is not recorded again
    store.set("df", df1.clone());
    store.set("df", columnar(&[("col1", [1, 2]), ("col2", [3, 4])]));
    assert_eq!(store.history_len("df"), 1);
    assert_eq!(store.get("df"), Some(&df1));

    // Plain values alongside frames
    store.set("string", "Hello, World!");
    store.set("integer", 42);
    store.set("list", vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    store.set("none_value", Value::Null);
    store.set("string", "Goodbye!");
    store.undo("string");
    assert_eq!(store.get("string"), Some(&Value::from("Hello, World!")));
    assert_eq!(store.get("none_value"), Some(&Value::Null));

    // Nothing failed so far
    assert!(sink.take().iter().all(|d| !d.is_failure()));

    // Without its rule a frame falls back to the default scheme, which cannot serialize it
    store.set_fingerprint_function(ValueType::opaque(COLUMNAR), None);
    store.set("df", df1.clone());
    assert_eq!(
        frame_of::<ColumnarFrame>(store.get("df")),
        frame_of::<ColumnarFrame>(Some(&df1))
    );
    assert_eq!(store.history_len("df"), 2);

    let recorded = sink.take();
    assert!(recorded.contains(&Diagnostic::FingerprintRuleRemoved {
        value_type: ValueType::opaque(COLUMNAR)
    }));
    assert!(recorded
        .iter()
        .any(|d| matches!(d, Diagnostic::DefaultSerializationFailure { .. })));
}

#[test]
fn test_shared_store_behind_mutex() {
    use parking_lot::Mutex;
    use std::thread;

    let store = Arc::new(Mutex::new(VersionedStore::new(100)));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..10 {
                    store.lock().set(format!("worker:{}", t), i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let store = store.lock();
    for t in 0..4 {
        let key = format!("worker:{}", t);
        assert_eq!(store.get(&key), Some(&Value::Int(9)));
        assert_eq!(store.history_len(&key), 10);
    }
}
