//! The resolved document: one immutable snapshot of everything the
//! extensions contributed.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use tessera_keymap::{KeyCombo, ParseError};
use tracing::{debug, warn};

use crate::commands::{Chain, CommandRegistry};
use crate::config::EngineConfig;
use crate::editor::EditorHandle;
use crate::error::{LookupError, ResolveError};
use crate::extension::Extension;
use crate::input_rules::InputRules;
use crate::lifecycle::{self, DispatchReport, LifecycleEvent};
use crate::resolve::{self, ExtensionViews, ResolvedExtension};
use crate::schema::Schema;
use crate::schema::builder::build_schema;
use crate::shortcuts::{KeyOutcome, ShortcutTable};
use crate::storage::Storage;

/// Non-fatal issue found while resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
	/// Several resolved extensions share a name. The last one wins every
	/// per-name lookup and owns the type of that name.
	DuplicateName { name: String, count: usize },
	/// A shortcut key description did not parse; the binding was skipped.
	InvalidShortcut {
		extension: String,
		key: String,
		error: ParseError,
	},
	/// An input rule pattern did not compile; the rule was skipped.
	InvalidInputRule {
		extension: String,
		pattern: String,
		message: String,
	},
}

impl fmt::Display for Problem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::DuplicateName { name, count } => write!(f, "{count} extensions named '{name}'"),
			Self::InvalidShortcut { extension, key, error } => {
				write!(f, "{extension}: invalid shortcut '{key}': {error}")
			}
			Self::InvalidInputRule {
				extension,
				pattern,
				message,
			} => write!(f, "{extension}: invalid input rule '{pattern}': {message}"),
		}
	}
}

/// Schema, commands, shortcuts, input rules and lifecycle hooks of one
/// resolution pass.
#[derive(Debug)]
pub struct ResolvedDocument {
	extensions: Vec<ResolvedExtension>,
	schema: Schema,
	commands: CommandRegistry,
	shortcuts: ShortcutTable,
	input_rules: InputRules,
	problems: Vec<Problem>,
}

impl ResolvedDocument {
	/// Resolves `roots`: flatten, sort by priority, split by kind, then build
	/// every table.
	///
	/// Only runaway nesting is fatal. Everything else that is wrong ends up
	/// in [`ResolvedDocument::problems`].
	pub fn resolve(roots: &[Extension], config: &EngineConfig) -> Result<Self, ResolveError> {
		let mut extensions = resolve::flatten(roots, config.max_nesting_depth)?;
		resolve::sort_by_priority(&mut extensions);

		let mut problems = Vec::new();
		if config.warn_on_duplicate_names {
			problems.extend(duplicate_names(&extensions));
		}

		let views = ExtensionViews::split(&extensions);
		let schema = build_schema(&views);
		let commands = CommandRegistry::build(&views);
		let shortcuts = ShortcutTable::build(&views, config.platform, &mut problems);
		let input_rules = InputRules::build(&views, &mut problems);

		if !problems.is_empty() {
			let samples: Vec<_> = problems.iter().take(5).map(ToString::to_string).collect();
			warn!(count = problems.len(), ?samples, "extension resolution problems");
		}
		debug!(
			extensions = extensions.len(),
			types = schema.len(),
			commands = commands.len(),
			shortcuts = shortcuts.len(),
			input_rules = input_rules.len(),
			"extensions resolved"
		);

		Ok(Self {
			extensions,
			schema,
			commands,
			shortcuts,
			input_rules,
			problems,
		})
	}

	/// A document with no extensions.
	pub fn empty() -> Self {
		Self {
			extensions: Vec::new(),
			schema: Schema::default(),
			commands: CommandRegistry::default(),
			shortcuts: ShortcutTable::default(),
			input_rules: InputRules::default(),
			problems: Vec::new(),
		}
	}

	/// Extensions in resolved order.
	pub fn extensions(&self) -> &[ResolvedExtension] {
		&self.extensions
	}

	/// Names in resolved order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.extensions.iter().map(ResolvedExtension::name)
	}

	/// The last resolved extension called `name`.
	pub fn extension(&self, name: &str) -> Option<&ResolvedExtension> {
		self.extensions.iter().rev().find(|ext| ext.name() == name)
	}

	pub fn options(&self, name: &str) -> Result<&Value, LookupError> {
		self.lookup(name).map(ResolvedExtension::options)
	}

	pub fn storage(&self, name: &str) -> Result<&Storage, LookupError> {
		self.lookup(name).map(ResolvedExtension::storage)
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn commands(&self) -> &CommandRegistry {
		&self.commands
	}

	pub fn shortcuts(&self) -> &ShortcutTable {
		&self.shortcuts
	}

	pub fn input_rules(&self) -> &InputRules {
		&self.input_rules
	}

	pub fn problems(&self) -> &[Problem] {
		&self.problems
	}

	/// Runs one command and commits it on success.
	pub fn run(&self, command: &str, args: &Value, editor: &dyn EditorHandle) -> Result<bool, LookupError> {
		self.commands.run(command, args, editor)
	}

	/// Starts an atomic command batch.
	pub fn chain<'a>(&'a self, editor: &'a dyn EditorHandle) -> Chain<'a> {
		self.commands.chain(editor)
	}

	/// Offers a key press to the shortcut table.
	pub fn handle_key(&self, combo: KeyCombo, editor: &dyn EditorHandle) -> KeyOutcome {
		self.shortcuts.handle(combo, editor, &self.commands)
	}

	/// Offers a key press written as a description such as `"Mod-b"`.
	pub fn handle_key_str(&self, key: &str, editor: &dyn EditorHandle) -> KeyOutcome {
		self.shortcuts.handle_str(key, editor, &self.commands)
	}

	/// Offers the text before the cursor to the input rules.
	pub fn handle_text_input(&self, text_before_cursor: &str, editor: &dyn EditorHandle) -> bool {
		self.input_rules.apply(text_before_cursor, editor)
	}

	/// Runs every extension's hook for `event`, in resolved order.
	pub fn dispatch(&self, event: LifecycleEvent<'_>, editor: &dyn EditorHandle) -> DispatchReport {
		lifecycle::dispatch(&self.extensions, &event, editor)
	}

	fn lookup(&self, name: &str) -> Result<&ResolvedExtension, LookupError> {
		self.extension(name)
			.ok_or_else(|| LookupError::UnknownExtension(name.to_owned()))
	}
}

fn duplicate_names(extensions: &[ResolvedExtension]) -> Vec<Problem> {
	let mut counts: IndexMap<&str, usize> = IndexMap::new();
	for ext in extensions {
		*counts.entry(ext.name()).or_default() += 1;
	}
	counts
		.into_iter()
		.filter(|&(_, count)| count > 1)
		.map(|(name, count)| Problem::DuplicateName {
			name: name.to_owned(),
			count,
		})
		.collect()
}
