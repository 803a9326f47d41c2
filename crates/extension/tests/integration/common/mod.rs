//! Shared fixtures: a recording editor and a small starter kit.

use std::cell::{Cell, RefCell};

use serde_json::json;
use tessera_extension::{
	Attribute, AttributeMap, CommandMap, EditorHandle, EngineConfig, Extension, ParseRule, Platform,
	ResolvedDocument, ShortcutMap, Transaction, command, shortcut,
};

/// Editor double that records committed transactions.
pub struct RecordingEditor {
	pub committed: RefCell<Vec<Transaction>>,
	pub editable: Cell<bool>,
}

impl Default for RecordingEditor {
	fn default() -> Self {
		Self {
			committed: RefCell::new(Vec::new()),
			editable: Cell::new(true),
		}
	}
}

impl RecordingEditor {
	/// Step ops of every committed transaction, in commit order.
	pub fn ops(&self) -> Vec<Vec<String>> {
		self.committed
			.borrow()
			.iter()
			.map(|tr| tr.steps().iter().map(|step| step.op.clone()).collect())
			.collect()
	}
}

impl EditorHandle for RecordingEditor {
	fn commit(&self, tr: Transaction) {
		self.committed.borrow_mut().push(tr);
	}

	fn is_editable(&self) -> bool {
		self.editable.get()
	}
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Config with `Mod` pinned to `Ctrl` so results do not depend on the host OS.
pub fn config() -> EngineConfig {
	EngineConfig {
		platform: Platform::Other,
		..EngineConfig::default()
	}
}

pub fn resolve(roots: &[Extension]) -> ResolvedDocument {
	init_tracing();
	ResolvedDocument::resolve(roots, &config()).expect("resolution succeeds")
}

/// Mark extension with a toggle command and a `Mod-<key>` shortcut.
pub fn toggle_mark(name: &'static str, key: char) -> Extension {
	let toggle = format!("toggle_{name}");
	Extension::mark(name)
		.parse_rules(vec![ParseRule::tag(name)])
		.add_commands(move |ctx| {
			let mark = ctx.name.to_owned();
			CommandMap::from([(
				toggle.clone(),
				command(move |props| {
					if !props.editor.is_editable() {
						return false;
					}
					props.tr.push("toggle_mark", json!(mark));
					true
				}),
			)])
		})
		.add_keyboard_shortcuts(move |_| {
			let toggle = format!("toggle_{name}");
			ShortcutMap::from([(format!("Mod-{key}"), shortcut(move |props| props.run(&toggle)))])
		})
		.build()
}

pub fn bold() -> Extension {
	toggle_mark("bold", 'b')
}

pub fn italic() -> Extension {
	toggle_mark("italic", 'i')
}

pub fn doc() -> Extension {
	Extension::node("doc").top_node(true).content("block+").build()
}

pub fn paragraph() -> Extension {
	Extension::node("paragraph")
		.content("inline*")
		.group("block")
		.parse_rules(vec![ParseRule::tag("p")])
		.build()
}

pub fn heading() -> Extension {
	Extension::node("heading")
		.content("inline*")
		.group("block")
		.defining(true)
		.add_options(|_| json!({ "levels": [1, 2, 3, 4, 5, 6] }))
		.add_attributes(|_| AttributeMap::from([("level".to_owned(), Attribute::with_default(1).rendered(false))]))
		.build()
}
