//! Deep merge and default filling.
//!
//! The file document and the environment overlay are merged as raw values,
//! decoded into [`Config`], and then every unset leaf of a present section
//! receives its default.

use super::defaults::SectionDefaults;
use super::types::Config;
use crate::error::{ConfigError, ConfigResult};
use serde_json::Value;
use std::path::Path;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays of objects are merged by position; extra overlay items are appended
/// - Other arrays, strings, numbers, booleans are replaced entirely
/// - If overlay is null, the base value is preserved (null means "not specified")
///
/// # Example
/// ```
/// use serde_json::json;
/// use regwatch::config::deep_merge;
///
/// let base = json!({
///     "watch": { "workers": 10, "schedule": "0 * * * *" },
///     "regopts": [{ "name": "docker.io" }]
/// });
/// let overlay = json!({
///     "watch": { "workers": 20 },
///     "regopts": [{ "password": "secret" }]
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(result["watch"]["workers"], 20);
/// assert_eq!(result["watch"]["schedule"], "0 * * * *");
/// assert_eq!(result["regopts"][0], json!({ "name": "docker.io", "password": "secret" }));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        // Both are objects: merge recursively
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        // Lists of structs: merge entry by entry
        (Value::Array(base_items), Value::Array(overlay_items)) if is_struct_list(&overlay_items) => {
            let mut merged = Vec::with_capacity(base_items.len().max(overlay_items.len()));
            let mut base_iter = base_items.into_iter();
            for overlay_item in overlay_items {
                merged.push(match base_iter.next() {
                    Some(base_item) => deep_merge(base_item, overlay_item),
                    None => overlay_item,
                });
            }
            merged.extend(base_iter);
            Value::Array(merged)
        }
        // Overlay is null: preserve base (null means "not specified")
        (base, Value::Null) => base,
        // Any other case: overlay replaces base entirely
        (_, overlay) => overlay,
    }
}

/// Non-empty and made only of objects and placeholders.
fn is_struct_list(items: &[Value]) -> bool {
    items.iter().any(Value::is_object) && items.iter().all(|v| v.is_object() || v.is_null())
}

/// Decode a merged document into the typed tree.
///
/// `origin` is only used to label errors; it is the config file when there is
/// one.
pub fn decode(document: Value, origin: &Path) -> ConfigResult<Config> {
    let document = match document {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(document).map_err(|e| ConfigError::format(origin, e))
}

/// Fill every gap of a decoded configuration with its default.
///
/// Sections with declared defaults are always filled. Optional sections are
/// filled only if present; absent ones stay absent. A `notif` or `providers`
/// block with no child left collapses to absent.
pub fn finalize(mut config: Config) -> Config {
    config.db.fill_defaults();
    config.watch.fill_defaults();

    if let Some(notif) = config.notif.as_mut() {
        notif.fill_defaults();
    }
    if config.notif.as_ref().is_some_and(|n| n.is_empty()) {
        config.notif = None;
    }

    for regopt in &mut config.regopts {
        regopt.fill_defaults();
    }

    if let Some(providers) = config.providers.as_mut() {
        providers.fill_defaults();
    }
    if config.providers.as_ref().is_some_and(|p| p.is_empty()) {
        config.providers = None;
    }

    config
}
