//! Resolution front half: flatten, sort, split.
//!
//! Produces the ordered [`ResolvedExtension`] list every registrar consumes.
//! Options and storage are computed once per extension here, while
//! flattening, because `add_extensions` may depend on them.

use std::fmt;

use serde_json::Value;

use crate::editor::EditorHandle;
use crate::extension::{Extension, ExtensionKind, Field, Scope, field};
use crate::lifecycle::LifecycleEvent;
use crate::options;
use crate::storage::Storage;

mod flatten;
mod sort;
mod split;


pub(crate) use flatten::flatten;
pub(crate) use sort::sort_by_priority;
pub use split::ExtensionViews;

/// An extension with its options and storage materialized.
#[derive(Clone)]
pub struct ResolvedExtension {
	extension: Extension,
	options: Value,
	storage: Storage,
}

impl ResolvedExtension {
	/// Resolves options, then storage from those options.
	pub fn prepare(extension: Extension) -> Self {
		let no_options = options::empty();
		let no_storage = Storage::default();
		let options = extension
			.resolve_field(
				field::add_options,
				Scope {
					name: extension.name(),
					options: &no_options,
					storage: &no_storage,
					editor: None,
					event: None,
				},
			)
			.unwrap_or_else(options::empty);

		let storage = extension
			.resolve_field(
				field::add_storage,
				Scope {
					name: extension.name(),
					options: &options,
					storage: &no_storage,
					editor: None,
					event: None,
				},
			)
			.map(Storage::new)
			.unwrap_or_else(|| Storage::new(options::empty()));

		Self {
			extension,
			options,
			storage,
		}
	}

	pub fn name(&self) -> &str {
		self.extension.name()
	}

	pub fn kind(&self) -> ExtensionKind {
		self.extension.kind()
	}

	pub fn priority(&self) -> i32 {
		self.extension.priority()
	}

	pub fn options(&self) -> &Value {
		&self.options
	}

	pub fn storage(&self) -> &Storage {
		&self.storage
	}

	pub fn extension(&self) -> &Extension {
		&self.extension
	}

	/// Scope exposing this extension's name, options and storage.
	pub fn scope<'a>(
		&'a self,
		editor: Option<&'a dyn EditorHandle>,
		event: Option<&'a LifecycleEvent<'a>>,
	) -> Scope<'a> {
		Scope {
			name: self.extension.name(),
			options: &self.options,
			storage: &self.storage,
			editor,
			event,
		}
	}

	/// Resolves a field outside of any dispatch.
	pub fn resolve<T>(&self, field: Field<T>) -> Option<T> {
		self.extension.resolve_field(field, self.scope(None, None))
	}
}

impl fmt::Debug for ResolvedExtension {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResolvedExtension")
			.field("name", &self.name())
			.field("kind", &self.kind())
			.field("priority", &self.priority())
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}
