//! Property maps shared by predicates, command arguments and menu items.

use serde_json::{Map, Value};

/// A JSON-like property map. Used for check properties, command options and
/// merged command arguments.
pub type Props = Map<String, Value>;

/// Look up a dot-separated path (`"nearbyToolData.metadata.toolName"`) in a
/// property map. Returns `None` when any segment is missing or when the value
/// found is JSON `null`.
pub fn lookup<'a>(props: &'a Props, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut cur = props.get(first)?;
    for seg in segments {
        cur = match cur {
            Value::Object(map) => map.get(seg)?,
            Value::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    if cur.is_null() { None } else { Some(cur) }
}

/// Shallow merge of property layers into a fresh map. Later layers win on
/// overlapping keys; inputs are never mutated.
pub fn merge<'a, I>(layers: I) -> Props
where
    I: IntoIterator<Item = &'a Props>,
{
    let mut out = Props::new();
    for layer in layers {
        for (k, v) in layer {
            out.insert(k.clone(), v.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn props(v: Value) -> Props {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn lookup_walks_nested_objects_and_arrays() {
        let p = props(json!({
            "nearbyToolData": {"metadata": {"toolName": "Length"}},
            "points": [[1, 2], [3, 4]],
            "gone": null,
        }));
        assert_eq!(
            lookup(&p, "nearbyToolData.metadata.toolName"),
            Some(&json!("Length"))
        );
        assert_eq!(lookup(&p, "points.1.0"), Some(&json!(3)));
        assert_eq!(lookup(&p, "nearbyToolData.missing"), None);
        assert_eq!(lookup(&p, "gone"), None);
    }

    #[test]
    fn merge_later_layers_win() {
        let defaults = props(json!({"a": 0, "b": 2}));
        let call = props(json!({"a": 1}));
        let merged = merge([&defaults, &call]);
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": 2}));
        assert_eq!(defaults.get("a"), Some(&json!(0)));
    }
}
