//! Safe nested lookups on JSON trees

use serde_json::Value;

/// Walk `segments` from `root`, returning `None` as soon as a segment is missing.
///
/// Objects are indexed by key and arrays by numeric segment. Any other
/// intermediate value ends the walk.
pub fn get_path<'a, S: AsRef<str>>(root: &'a Value, segments: &[S]) -> Option<&'a Value> {
    segments.iter().try_fold(root, |node, segment| {
        let segment = segment.as_ref();
        match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}

/// Split a dotted path (`user.requests.LOGIN`) into segments.
pub fn split_path(path: &str) -> Vec<String> {
    path.split('.').map(str::to_string).collect()
}

/// JavaScript-style truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
