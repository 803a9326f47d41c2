//! Extension-local mutable runtime state.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

/// Shared handle to one extension's storage.
///
/// Produced once per resolution from the extension's `add_storage` field.
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct Storage(Arc<Mutex<Value>>);

impl Storage {
	pub fn new(value: Value) -> Self {
		Self(Arc::new(Mutex::new(value)))
	}

	/// Returns a snapshot of the current value.
	pub fn get(&self) -> Value {
		self.0.lock().clone()
	}

	/// Reads the value without cloning it.
	pub fn with<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
		f(&self.0.lock())
	}

	/// Mutates the value in place.
	pub fn update<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
		f(&mut self.0.lock())
	}

	/// Returns true if both handles point at the same state.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for Storage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Storage").field(&*self.0.lock()).finish()
	}
}
