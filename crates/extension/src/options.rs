//! Extension options and their deep merge.

use serde_json::{Map, Value};

/// Empty options object.
pub fn empty() -> Value {
	Value::Object(Map::new())
}

/// Merges `patch` over `base`.
///
/// Objects merge key by key, recursively. Any other value in `patch`
/// (arrays included) replaces what `base` had.
pub fn deep_merge(base: Value, patch: &Value) -> Value {
	match (base, patch) {
		(Value::Object(mut base), Value::Object(patch)) => {
			for (key, value) in patch {
				match base.get_mut(key) {
					Some(existing) => *existing = deep_merge(existing.take(), value),
					None => {
						base.insert(key.clone(), value.clone());
					}
				}
			}
			Value::Object(base)
		}
		(_, patch) => patch.clone(),
	}
}
