//! Field resolution through the override chain.

use std::ops::Deref;

use serde_json::Value;

use super::Extension;
use super::fields::{Field, FieldFn};
use crate::editor::EditorHandle;
use crate::lifecycle::LifecycleEvent;
use crate::storage::Storage;

/// Per-extension values every field function can see.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
	/// Name of the extension being resolved (the tip's name, for all generations).
	pub name: &'a str,
	pub options: &'a Value,
	pub storage: &'a Storage,
	/// Present during command, shortcut and lifecycle dispatch only.
	pub editor: Option<&'a dyn EditorHandle>,
	/// Present during lifecycle dispatch only.
	pub event: Option<&'a LifecycleEvent<'a>>,
}

/// Context handed to one field function.
///
/// Dereferences to the [`Scope`]; [`FieldContext::parent`] is the explicit
/// continuation into the previous generation.
pub struct FieldContext<'a, T> {
	scope: Scope<'a>,
	parent: Option<&'a Extension>,
	field: Field<T>,
}

impl<'a, T> FieldContext<'a, T> {
	/// Resolves the same field one generation up.
	///
	/// Returns `None` at the root of the chain or when no ancestor defines
	/// the field.
	pub fn parent(&self) -> Option<T> {
		resolve(self.parent?, self.field, self.scope)
	}

	/// Returns true if some ancestor defines this field.
	pub fn has_parent(&self) -> bool {
		let mut node = self.parent;
		while let Some(ext) = node {
			if (self.field)(&ext.node.fields).is_some() {
				return true;
			}
			node = ext.node.parent.as_ref();
		}
		false
	}

	pub fn scope(&self) -> Scope<'a> {
		self.scope
	}
}

impl<'a, T> Deref for FieldContext<'a, T> {
	type Target = Scope<'a>;

	fn deref(&self) -> &Scope<'a> {
		&self.scope
	}
}

/// Finds the nearest generation defining `field`, starting at `ext`, and
/// calls it with a context whose parent is that generation's parent.
pub(crate) fn resolve<T>(ext: &Extension, field: Field<T>, scope: Scope<'_>) -> Option<T> {
	let mut node = ext;
	loop {
		if let Some(f) = field(&node.node.fields) {
			return Some(call(f, node, field, scope));
		}
		node = node.node.parent.as_ref()?;
	}
}

fn call<T>(f: &FieldFn<T>, owner: &Extension, field: Field<T>, scope: Scope<'_>) -> T {
	let ctx = FieldContext {
		scope,
		parent: owner.node.parent.as_ref(),
		field,
	};
	f(&ctx)
}
