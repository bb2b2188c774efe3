//! Deep merge of a discovered configuration onto the built-in default.

use serde_json::Value;

use crate::error::ConfigError;

use super::types::AppConfig;

/// Recursively merge `overlay` into `base`.
///
/// Objects merge key by key. Any other overlay value, arrays included,
/// replaces the base value wholesale. `null` in the overlay leaves an
/// existing base value alone.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Merge `discovered` onto `default` and deserialize the result.
pub fn merge(default: &Value, discovered: Option<&Value>) -> Result<AppConfig, ConfigError> {
    let merged = merge_values(default, discovered);
    serde_json::from_value(merged).map_err(ConfigError::Invalid)
}

/// Merge without deserializing.
pub fn merge_values(default: &Value, discovered: Option<&Value>) -> Value {
    let mut merged = default.clone();
    if let Some(discovered) = discovered {
        deep_merge(&mut merged, discovered);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::default_config_value;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_key_by_key() {
        let mut base = json!({"llm": {"default": {"provider": "openai", "model": "a"}}});
        deep_merge(&mut base, &json!({"llm": {"default": {"model": "b"}}}));
        assert_eq!(base, json!({"llm": {"default": {"provider": "openai", "model": "b"}}}));
    }

    #[test]
    fn arrays_are_replaced_not_merged() {
        let mut base = json!({"list": [1, 2, 3]});
        deep_merge(&mut base, &json!({"list": [9]}));
        assert_eq!(base, json!({"list": [9]}));
    }

    #[test]
    fn scalar_replaces_object_and_object_replaces_scalar() {
        let mut base = json!({"a": {"x": 1}, "b": 2});
        deep_merge(&mut base, &json!({"a": 5, "b": {"y": 1}}));
        assert_eq!(base, json!({"a": 5, "b": {"y": 1}}));
    }

    #[test]
    fn null_overlay_keeps_base() {
        let mut base = json!({"llm": {"commands": {}}});
        deep_merge(&mut base, &json!({"llm": {"commands": null}}));
        assert_eq!(base, json!({"llm": {"commands": {}}}));
    }

    #[test]
    fn merge_is_idempotent() {
        let default = default_config_value();
        let cfg = json!({
            "llm": {"default": {"provider": "gemini"}, "commands": {"pr": {"model": "m"}}},
            "pr": {"include_file_tree": false},
            "extra": [1, 2]
        });

        let once = merge_values(&default, Some(&cfg));
        let twice = merge_values(&once, Some(&cfg));
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_without_discovery_is_default() {
        let default = default_config_value();
        let cfg = merge(&default, None).unwrap();
        assert_eq!(cfg, serde_json::from_value::<AppConfig>(default).unwrap());
    }

    #[test]
    fn merge_rejects_wrong_types() {
        let default = default_config_value();
        let err = merge(&default, Some(&json!({"commit": {"suggestions": "many"}}))).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
