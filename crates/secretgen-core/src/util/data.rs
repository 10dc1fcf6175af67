//! YAML and JSON data handling utilities.

use secretgen_types::Result;
use serde_json::Value;
use std::path::Path;
use std::fs;

/// Load YAML from string.
pub fn load_yaml(content: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(content)?)
}

/// Load YAML from file.
pub fn load_yaml_file(path: impl AsRef<Path>) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    load_yaml(&content)
}

/// Deep merge two values.
/// Recursively merges objects, with overlay values taking precedence.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => deep_merge(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay_val) => overlay_val,
    }
}

/// Get value at a path in dotted notation.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;

    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            Value::Array(arr) => {
                let index: usize = part.parse().ok()?;
                current = arr.get(index)?;
            }
            _ => return None,
        }
    }

    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_merge_overlay_wins() {
        let base = json!({"provider": {"endpoint": "a", "timeout_secs": 30}, "log": {"level": "INFO"}});
        let overlay = json!({"provider": {"endpoint": "b"}});

        let merged = deep_merge(base, overlay);
        assert_eq!(merged["provider"]["endpoint"], "b");
        assert_eq!(merged["provider"]["timeout_secs"], 30);
        assert_eq!(merged["log"]["level"], "INFO");
    }

    #[test]
    fn test_get_path() {
        let value = json!({"resources": {"db": {"required": [{"count": 2}]}}});
        assert_eq!(get_path(&value, "resources.db.required.0.count"), Some(&json!(2)));
        assert_eq!(get_path(&value, "resources.missing"), None);
    }

    #[test]
    fn test_load_yaml() {
        let value = load_yaml("provider:\n  project: acme\n").unwrap();
        assert_eq!(value["provider"]["project"], "acme");
        assert!(load_yaml("provider: [unclosed").is_err());
    }
}
