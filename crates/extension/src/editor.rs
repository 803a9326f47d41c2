//! Boundary to the host editor and its document engine.
//!
//! The engine that actually represents documents lives outside this crate.
//! Commands record [`Step`]s on a scratch [`Transaction`]; only a transaction
//! that survives a whole command (or chain) is handed to
//! [`EditorHandle::commit`]. Effects registered with
//! [`Transaction::on_commit`] run right after that call and are dropped with
//! any transaction that is discarded.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

/// One opaque document mutation, interpreted by the host engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
	pub op: String,
	pub payload: Value,
}

/// Side effect that runs once its transaction has been committed.
pub type CommitEffect = Box<dyn FnOnce() + Send>;

/// Scratch batch of steps plus metadata.
#[derive(Default)]
pub struct Transaction {
	steps: Vec<Step>,
	meta: IndexMap<String, Value>,
	effects: Vec<CommitEffect>,
}

impl Transaction {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a step.
	pub fn push(&mut self, op: impl Into<String>, payload: Value) -> &mut Self {
		self.steps.push(Step {
			op: op.into(),
			payload,
		});
		self
	}

	pub fn steps(&self) -> &[Step] {
		&self.steps
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}

	pub fn set_meta(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
		self.meta.insert(key.into(), value);
		self
	}

	pub fn meta(&self, key: &str) -> Option<&Value> {
		self.meta.get(key)
	}

	/// Defers `effect` until this transaction is committed.
	///
	/// Dry runs, failed commands and aborted chains drop the transaction, and
	/// its effects with it.
	pub fn on_commit(&mut self, effect: impl FnOnce() + Send + 'static) -> &mut Self {
		self.effects.push(Box::new(effect));
		self
	}

	/// Number of effects waiting for the commit.
	pub fn pending_effects(&self) -> usize {
		self.effects.len()
	}
}

impl fmt::Debug for Transaction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Transaction")
			.field("steps", &self.steps)
			.field("meta", &self.meta)
			.field("effects", &self.effects.len())
			.finish()
	}
}

/// Hands `tr` to the editor, then runs its deferred effects in order.
pub(crate) fn commit(editor: &dyn EditorHandle, mut tr: Transaction) {
	let effects = std::mem::take(&mut tr.effects);
	editor.commit(tr);
	for effect in effects {
		effect();
	}
}

/// Host-side editor the engine dispatches into.
///
/// Implementations use interior mutability; every call happens on the
/// caller's thread and completes before returning.
pub trait EditorHandle {
	/// Applies a fully successful transaction to the document.
	fn commit(&self, tr: Transaction);

	/// Whether the document currently accepts edits.
	fn is_editable(&self) -> bool {
		true
	}
}
