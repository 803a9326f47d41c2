//! Atomic command batches.

use serde_json::Value;
use tracing::debug;

use super::CommandRegistry;
use crate::editor::{EditorHandle, Transaction, commit};
use crate::error::LookupError;

/// Queued commands sharing one scratch transaction.
///
/// Nothing runs until [`Chain::run`]. The first failing command aborts the
/// batch and the scratch transaction is dropped, so no step of an earlier
/// command reaches the editor. Dropping the chain abandons it.
#[must_use = "a chain does nothing until run() is called"]
pub struct Chain<'a> {
	registry: &'a CommandRegistry,
	editor: &'a dyn EditorHandle,
	dispatch: bool,
	queued: Vec<(String, Value)>,
}

impl<'a> Chain<'a> {
	pub(super) fn new(registry: &'a CommandRegistry, editor: &'a dyn EditorHandle, dispatch: bool) -> Self {
		Self {
			registry,
			editor,
			dispatch,
			queued: Vec::new(),
		}
	}

	/// Queues a command with arguments.
	pub fn command(mut self, name: impl Into<String>, args: Value) -> Self {
		self.queued.push((name.into(), args));
		self
	}

	/// Queues a command without arguments.
	pub fn then(self, name: impl Into<String>) -> Self {
		self.command(name, Value::Null)
	}

	pub fn len(&self) -> usize {
		self.queued.len()
	}

	pub fn is_empty(&self) -> bool {
		self.queued.is_empty()
	}

	/// Runs the batch.
	///
	/// Returns `Ok(true)` and commits only if every command succeeded. An
	/// unknown command name aborts the batch with an error; nothing is
	/// committed in that case either.
	pub fn run(self) -> Result<bool, LookupError> {
		let mut tr = Transaction::new();
		for (index, (name, args)) in self.queued.iter().enumerate() {
			let ok = self.registry.invoke(name, &mut tr, args, self.editor, self.dispatch)?;
			if !ok {
				debug!(command = %name, index, queued = self.queued.len(), "chain aborted");
				return Ok(false);
			}
		}

		if self.dispatch {
			commit(self.editor, tr);
		}
		Ok(true)
	}
}
