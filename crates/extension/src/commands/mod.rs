//! Command namespace and invocation.
//!
//! Commands from every extension merge into one namespace in resolved order;
//! a later registration of the same name replaces the earlier one.
//!
//! A command records steps on the transaction it is handed and reports
//! success with `true`. Failure is a return value, never an unwinding error:
//! a panicking command is caught, logged with its owner's name and counted
//! as a failure.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{trace, warn};

use crate::editor::{EditorHandle, Transaction, commit};
use crate::error::LookupError;
use crate::extension::field;
use crate::lifecycle::panic_message;
use crate::resolve::ExtensionViews;

mod chain;


pub use chain::Chain;

pub type CommandFn = Arc<dyn Fn(&mut CommandProps<'_>) -> bool + Send + Sync>;

/// Commands contributed by one extension, keyed by name.
pub type CommandMap = IndexMap<String, CommandFn>;

/// Boxes a command closure.
pub fn command(f: impl Fn(&mut CommandProps<'_>) -> bool + Send + Sync + 'static) -> CommandFn {
	Arc::new(f)
}

/// Everything a command sees while it runs.
pub struct CommandProps<'a> {
	/// Scratch transaction shared by the whole invocation or chain.
	pub tr: &'a mut Transaction,
	pub args: &'a Value,
	pub editor: &'a dyn EditorHandle,
	/// `false` during a dry run: the transaction will be discarded.
	pub dispatch: bool,
	registry: &'a CommandRegistry,
}

impl CommandProps<'_> {
	/// Runs another command against the same transaction.
	///
	/// Unknown names count as failure.
	pub fn call(&mut self, name: &str, args: &Value) -> bool {
		self.registry
			.invoke(name, self.tr, args, self.editor, self.dispatch)
			.unwrap_or(false)
	}
}

#[derive(Clone)]
struct CommandEntry {
	owner: String,
	handler: CommandFn,
}

/// The merged command namespace.
#[derive(Clone, Default)]
pub struct CommandRegistry {
	entries: IndexMap<String, CommandEntry>,
}

impl CommandRegistry {
	pub(crate) fn build(views: &ExtensionViews<'_>) -> Self {
		let mut entries = IndexMap::new();
		for (_, ext) in views.all() {
			let Some(commands) = ext.resolve(field::add_commands) else {
				continue;
			};
			for (name, handler) in commands {
				let entry = CommandEntry {
					owner: ext.name().to_owned(),
					handler,
				};
				if let Some(previous) = entries.insert(name.clone(), entry) {
					trace!(command = %name, previous = %previous.owner, owner = %ext.name(), "command replaced");
				}
			}
		}
		Self { entries }
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Name of the extension whose registration won `name`.
	pub fn owner(&self, name: &str) -> Option<&str> {
		self.entries.get(name).map(|entry| entry.owner.as_str())
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Runs one command on a fresh transaction and commits it on success.
	pub fn run(&self, name: &str, args: &Value, editor: &dyn EditorHandle) -> Result<bool, LookupError> {
		let mut tr = Transaction::new();
		let ok = self.invoke(name, &mut tr, args, editor, true)?;
		if ok {
			commit(editor, tr);
		}
		Ok(ok)
	}

	/// Dry-runs one command. Nothing is committed.
	pub fn can(&self, name: &str, args: &Value, editor: &dyn EditorHandle) -> Result<bool, LookupError> {
		let mut tr = Transaction::new();
		self.invoke(name, &mut tr, args, editor, false)
	}

	/// Starts an atomic batch of commands.
	pub fn chain<'a>(&'a self, editor: &'a dyn EditorHandle) -> Chain<'a> {
		Chain::new(self, editor, true)
	}

	/// Starts a batch that only checks whether every command would succeed.
	pub fn can_chain<'a>(&'a self, editor: &'a dyn EditorHandle) -> Chain<'a> {
		Chain::new(self, editor, false)
	}

	/// Invokes `name` against `tr` without committing.
	pub(crate) fn invoke(
		&self,
		name: &str,
		tr: &mut Transaction,
		args: &Value,
		editor: &dyn EditorHandle,
		dispatch: bool,
	) -> Result<bool, LookupError> {
		let entry = self
			.entries
			.get(name)
			.ok_or_else(|| LookupError::UnknownCommand(name.to_owned()))?;

		trace!(command = name, owner = %entry.owner, dispatch, "invoking command");
		let mut props = CommandProps {
			tr,
			args,
			editor,
			dispatch,
			registry: self,
		};
		match catch_unwind(AssertUnwindSafe(|| (entry.handler)(&mut props))) {
			Ok(ok) => Ok(ok),
			Err(payload) => {
				warn!(
					command = name,
					extension = %entry.owner,
					panic = %panic_message(payload.as_ref()),
					"command panicked"
				);
				Ok(false)
			}
		}
	}
}

impl fmt::Debug for CommandRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map()
			.entries(self.entries.iter().map(|(name, entry)| (name, &entry.owner)))
			.finish()
	}
}
