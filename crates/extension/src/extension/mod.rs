//! Extension descriptors and their override chains.
//!
//! An [`Extension`] is one generation of a singly linked chain. `extend()`
//! pushes a new generation whose parent is the current one; `configure()`
//! replaces the current generation with one whose options factory layers a
//! patch on top. Both are pure: the receiver is never modified.
//!
//! # Invariants
//!
//! - `configure()` keeps name, kind, priority and parent.
//! - `extend()` keeps kind and defaults the name to the parent's.
//! - An unset field resolves through the parent; a missing field anywhere in
//!   the chain is "no contribution", never an error.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use self::context::{FieldContext, Scope};
pub use self::fields::{Field, FieldFn, Fields, field, field_fn};
use crate::options::{deep_merge, empty};

mod context;
mod fields;


/// Priority of an extension that does not declare one.
pub const DEFAULT_PRIORITY: i32 = 100;

/// What an extension contributes to the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
	/// Behavior only: commands, shortcuts, hooks, global attributes.
	Plain,
	/// Declares a node type named after the extension.
	Node,
	/// Declares a mark type named after the extension.
	Mark,
}

impl ExtensionKind {
	/// Returns true for kinds that declare a document type.
	pub const fn is_structural(self) -> bool {
		matches!(self, Self::Node | Self::Mark)
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Plain => "extension",
			Self::Node => "node",
			Self::Mark => "mark",
		}
	}
}

impl fmt::Display for ExtensionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

struct Node {
	name: String,
	kind: ExtensionKind,
	priority: Option<i32>,
	fields: Fields,
	parent: Option<Extension>,
}

/// Handle to one chain generation. Cheap to clone.
#[derive(Clone)]
pub struct Extension {
	node: Arc<Node>,
}

impl Extension {
	/// Starts a new chain with no parent.
	pub fn create(name: impl Into<String>, kind: ExtensionKind) -> ExtensionBuilder {
		ExtensionBuilder {
			name: name.into(),
			kind,
			priority: None,
			fields: Fields::default(),
			parent: None,
		}
	}

	/// Starts a behavior-only extension.
	pub fn plain(name: impl Into<String>) -> ExtensionBuilder {
		Self::create(name, ExtensionKind::Plain)
	}

	/// Starts a node extension.
	pub fn node(name: impl Into<String>) -> ExtensionBuilder {
		Self::create(name, ExtensionKind::Node)
	}

	/// Starts a mark extension.
	pub fn mark(name: impl Into<String>) -> ExtensionBuilder {
		Self::create(name, ExtensionKind::Mark)
	}

	/// Starts a child generation. Fields left unset fall through to `self`.
	pub fn extend(&self) -> ExtensionBuilder {
		ExtensionBuilder {
			name: self.node.name.clone(),
			kind: self.node.kind,
			priority: None,
			fields: Fields::default(),
			parent: Some(self.clone()),
		}
	}

	/// Returns a replacement of this generation whose options are `options`
	/// deep-merged over what this generation produced before.
	pub fn configure(&self, options: Value) -> Extension {
		let previous = self.node.fields.add_options.clone();
		let mut fields = self.node.fields.clone();
		fields.add_options = Some(field_fn(move |ctx| {
			let base = match &previous {
				Some(f) => f(ctx),
				None => ctx.parent().unwrap_or_else(empty),
			};
			deep_merge(base, &options)
		}));

		Extension {
			node: Arc::new(Node {
				name: self.node.name.clone(),
				kind: self.node.kind,
				priority: self.node.priority,
				fields,
				parent: self.node.parent.clone(),
			}),
		}
	}

	pub fn name(&self) -> &str {
		&self.node.name
	}

	pub fn kind(&self) -> ExtensionKind {
		self.node.kind
	}

	/// Nearest declared priority in the chain, or [`DEFAULT_PRIORITY`].
	pub fn priority(&self) -> i32 {
		self.generations()
			.find_map(|ext| ext.node.priority)
			.unwrap_or(DEFAULT_PRIORITY)
	}

	pub fn parent(&self) -> Option<&Extension> {
		self.node.parent.as_ref()
	}

	/// Fields set on this generation only.
	pub fn fields(&self) -> &Fields {
		&self.node.fields
	}

	/// Number of generations including this one.
	pub fn depth(&self) -> usize {
		self.generations().count()
	}

	/// Iterates from this generation up to the root.
	pub fn generations(&self) -> impl Iterator<Item = &Extension> {
		std::iter::successors(Some(self), |ext| ext.node.parent.as_ref())
	}

	/// Resolves `field` through the chain.
	///
	/// Returns `None` when no generation defines it.
	pub fn resolve_field<T>(&self, field: Field<T>, scope: Scope<'_>) -> Option<T> {
		context::resolve(self, field, scope)
	}

	/// Returns true if both handles are the same generation.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.node, &other.node)
	}
}

impl fmt::Debug for Extension {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Extension")
			.field("name", &self.node.name)
			.field("kind", &self.node.kind)
			.field("priority", &self.priority())
			.field("depth", &self.depth())
			.field("fields", &self.node.fields.defined())
			.finish()
	}
}

/// Builder for one generation.
///
/// Field setters are generated alongside [`Fields`]: function fields take a
/// closure over [`FieldContext`], schema value fields take the value directly
/// or a closure through their `*_with` variant.
#[must_use = "call build() to obtain the extension"]
pub struct ExtensionBuilder {
	name: String,
	kind: ExtensionKind,
	priority: Option<i32>,
	fields: Fields,
	parent: Option<Extension>,
}

impl ExtensionBuilder {
	/// Renames the generation being built.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	/// Higher priorities resolve first.
	pub fn priority(mut self, priority: i32) -> Self {
		self.priority = Some(priority);
		self
	}

	pub fn build(self) -> Extension {
		Extension {
			node: Arc::new(Node {
				name: self.name,
				kind: self.kind,
				priority: self.priority,
				fields: self.fields,
				parent: self.parent,
			}),
		}
	}
}
