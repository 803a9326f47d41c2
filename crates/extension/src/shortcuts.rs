//! Keyboard shortcut table.
//!
//! Extensions contribute shortcut maps keyed by key descriptions such as
//! `"Mod-b"`. Descriptions are parsed with [`tessera_keymap`] for the
//! configured platform, so `"Mod-b"` and `"Ctrl-b"` collide on Linux and
//! `"Mod-b"` and `"Meta-b"` collide on macOS. Later registrations win.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tessera_keymap::{KeyCombo, Platform};
use tracing::{debug, trace, warn};

use crate::commands::CommandRegistry;
use crate::document::Problem;
use crate::editor::EditorHandle;
use crate::extension::field;
use crate::lifecycle::panic_message;
use crate::resolve::ExtensionViews;

pub type ShortcutFn = Arc<dyn Fn(&ShortcutProps<'_>) -> bool + Send + Sync>;

/// Shortcuts contributed by one extension, keyed by key description.
pub type ShortcutMap = IndexMap<String, ShortcutFn>;

/// Boxes a shortcut closure.
pub fn shortcut(f: impl Fn(&ShortcutProps<'_>) -> bool + Send + Sync + 'static) -> ShortcutFn {
	Arc::new(f)
}

/// What a shortcut handler sees.
pub struct ShortcutProps<'a> {
	pub key: KeyCombo,
	pub editor: &'a dyn EditorHandle,
	pub commands: &'a CommandRegistry,
}

impl ShortcutProps<'_> {
	/// Runs a command without arguments; unknown commands count as failure.
	pub fn run(&self, command: &str) -> bool {
		self.commands.run(command, &Value::Null, self.editor).unwrap_or(false)
	}
}

/// Result of offering a key press to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
	/// A handler ran and consumed the event.
	Consumed,
	/// A handler ran but declined; the host applies its default behavior.
	Declined,
	/// Nothing is bound to the key.
	Unbound,
}

impl KeyOutcome {
	pub fn is_consumed(self) -> bool {
		self == Self::Consumed
	}
}

#[derive(Clone)]
struct Binding {
	owner: String,
	/// Key description as written by the owner.
	source: String,
	handler: ShortcutFn,
}

/// Resolved key bindings.
#[derive(Clone, Default)]
pub struct ShortcutTable {
	platform: Platform,
	bindings: IndexMap<KeyCombo, Binding>,
}

impl ShortcutTable {
	pub(crate) fn build(views: &ExtensionViews<'_>, platform: Platform, problems: &mut Vec<Problem>) -> Self {
		let mut bindings = IndexMap::new();
		for (_, ext) in views.all() {
			let Some(shortcuts) = ext.resolve(field::add_keyboard_shortcuts) else {
				continue;
			};
			for (source, handler) in shortcuts {
				let combo = match tessera_keymap::parse_for(&source, platform) {
					Ok(combo) => combo,
					Err(error) => {
						debug!(extension = %ext.name(), key = %source, %error, "invalid shortcut key");
						problems.push(Problem::InvalidShortcut {
							extension: ext.name().to_owned(),
							key: source,
							error,
						});
						continue;
					}
				};
				let binding = Binding {
					owner: ext.name().to_owned(),
					source,
					handler,
				};
				if let Some(previous) = bindings.insert(combo, binding) {
					trace!(key = %combo, previous = %previous.owner, owner = %ext.name(), "shortcut replaced");
				}
			}
		}
		Self { platform, bindings }
	}

	pub fn platform(&self) -> Platform {
		self.platform
	}

	pub fn contains(&self, combo: &KeyCombo) -> bool {
		self.bindings.contains_key(combo)
	}

	/// Name of the extension bound to `combo`.
	pub fn owner(&self, combo: &KeyCombo) -> Option<&str> {
		self.bindings.get(combo).map(|binding| binding.owner.as_str())
	}

	/// Bound combos with the description they were registered under.
	pub fn keys(&self) -> impl Iterator<Item = (&KeyCombo, &str)> {
		self.bindings.iter().map(|(combo, binding)| (combo, binding.source.as_str()))
	}

	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}

	/// Invokes the handler bound to `combo`.
	pub fn handle(&self, combo: KeyCombo, editor: &dyn EditorHandle, commands: &CommandRegistry) -> KeyOutcome {
		let Some(binding) = self.bindings.get(&combo) else {
			return KeyOutcome::Unbound;
		};

		trace!(key = %combo, owner = %binding.owner, "dispatching shortcut");
		let props = ShortcutProps {
			key: combo,
			editor,
			commands,
		};
		match catch_unwind(AssertUnwindSafe(|| (binding.handler)(&props))) {
			Ok(true) => KeyOutcome::Consumed,
			Ok(false) => KeyOutcome::Declined,
			Err(payload) => {
				warn!(
					key = %combo,
					extension = %binding.owner,
					panic = %panic_message(payload.as_ref()),
					"shortcut handler panicked"
				);
				KeyOutcome::Declined
			}
		}
	}

	/// Parses `key` for this table's platform and dispatches it.
	///
	/// Unparseable descriptions are [`KeyOutcome::Unbound`].
	pub fn handle_str(&self, key: &str, editor: &dyn EditorHandle, commands: &CommandRegistry) -> KeyOutcome {
		match tessera_keymap::parse_for(key, self.platform) {
			Ok(combo) => self.handle(combo, editor, commands),
			Err(_) => KeyOutcome::Unbound,
		}
	}
}

impl fmt::Debug for ShortcutTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map()
			.entries(self.bindings.iter().map(|(combo, binding)| (combo.to_string(), &binding.owner)))
			.finish()
	}
}
