use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tessera_extension::{
	Attribute, AttributeMap, CommandMap, EngineConfig, Extension, GlobalAttributes, KeyOutcome, Problem,
	ResolveError, ResolvedDocument, ShortcutMap, command, shortcut,
};
use tessera_keymap::{KeyCombo, Modifiers};

use crate::common::{self, RecordingEditor, bold, doc, heading, italic, paragraph, resolve};

fn names(doc: &ResolvedDocument) -> Vec<&str> {
	doc.names().collect()
}

fn ctrl(ch: char) -> KeyCombo {
	KeyCombo::char(ch).with(Modifiers::CTRL)
}

#[test]
fn resolution_is_deterministic() {
	let roots = [doc(), paragraph(), heading(), bold(), italic()];
	let first = resolve(&roots);
	let second = resolve(&roots);

	assert_eq!(names(&first), names(&second));
	assert_eq!(first.commands().names().collect::<Vec<_>>(), second.commands().names().collect::<Vec<_>>());
	assert_eq!(
		first.shortcuts().keys().map(|(combo, _)| *combo).collect::<Vec<_>>(),
		second.shortcuts().keys().map(|(combo, _)| *combo).collect::<Vec<_>>()
	);
	for def in first.schema().types() {
		let other = second.schema().get(&def.name).expect("same types");
		assert_eq!(def.attributes, other.attributes);
		assert_eq!(def.owner, other.owner);
	}
}

#[rstest]
#[case(&["low", "default", "high"])]
#[case(&["high", "low", "default"])]
#[case(&["default", "high", "low"])]
fn priority_orders_regardless_of_input(#[case] input: &[&str]) {
	let make = |name: &str| match name {
		"high" => Extension::plain("high").priority(200).build(),
		"low" => Extension::plain("low").priority(50).build(),
		other => Extension::plain(other).build(),
	};
	let roots: Vec<_> = input.iter().map(|name| make(name)).collect();
	assert_eq!(names(&resolve(&roots)), ["high", "default", "low"]);
}

#[test]
fn priority_ties_keep_input_order() {
	let roots = [
		Extension::plain("c").build(),
		Extension::plain("a").build(),
		Extension::plain("b").build(),
	];
	assert_eq!(names(&resolve(&roots)), ["c", "a", "b"]);
}

#[test]
fn override_exposes_parent_commands() {
	let base = Extension::plain("base")
		.add_commands(|_| {
			CommandMap::from([
				("first".to_owned(), command(|props| {
					props.tr.push("first", Value::Null);
					true
				})),
				("second".to_owned(), command(|_| true)),
			])
		})
		.build();
	let extended = base
		.extend()
		.add_commands(|ctx| {
			let mut commands = ctx.parent().unwrap_or_default();
			commands.insert(
				"new_cmd".to_owned(),
				command(|props| {
					props.tr.push("new_cmd", Value::Null);
					true
				}),
			);
			commands
		})
		.build();

	let doc = resolve(&[extended]);
	assert_eq!(doc.commands().names().collect::<Vec<_>>(), ["first", "second", "new_cmd"]);

	let editor = RecordingEditor::default();
	assert_eq!(doc.run("first", &Value::Null, &editor), Ok(true));
	assert_eq!(doc.run("new_cmd", &Value::Null, &editor), Ok(true));
	assert_eq!(editor.ops(), [vec!["first".to_owned()], vec!["new_cmd".to_owned()]]);
}

#[test]
fn configure_keeps_name_and_merges_options() {
	let configured = heading().configure(json!({ "levels": [1, 2], "id": "h" }));
	assert_eq!(configured.name(), heading().name());

	let doc = resolve(&[configured]);
	assert_eq!(doc.options("heading"), Ok(&json!({ "levels": [1, 2], "id": "h" })));
}

#[test]
fn local_attribute_beats_earlier_global() {
	let x = Extension::plain("x")
		.add_global_attributes(|_| {
			vec![GlobalAttributes::new(["paragraph"]).attribute("color", Attribute::with_default("red"))]
		})
		.build();
	let y = Extension::node("paragraph")
		.add_attributes(|_| AttributeMap::from([("color".to_owned(), Attribute::with_default("blue").rendered(false))]))
		.build();

	let doc = resolve(&[x, y]);
	let color = doc.schema().node("paragraph").and_then(|def| def.attribute("color")).unwrap();
	assert_eq!(color.default, Some(json!("blue")));
	assert!(!color.rendered);
}

#[test]
fn global_attribute_fans_out() {
	let text_align = Extension::plain("textAlign")
		.add_options(|_| json!({ "types": ["heading", "paragraph"], "default": "left" }))
		.add_global_attributes(|ctx| {
			let types: Vec<String> = ctx.options["types"]
				.as_array()
				.into_iter()
				.flatten()
				.filter_map(|t| t.as_str().map(str::to_owned))
				.collect();
			let default = ctx.options["default"].clone();
			vec![GlobalAttributes::new(types).attribute("align", Attribute::with_default(default))]
		})
		.build();

	let doc = resolve(&[doc(), heading(), paragraph(), text_align]);
	for type_name in ["heading", "paragraph"] {
		let align = doc.schema().get(type_name).and_then(|def| def.attribute("align"));
		assert_eq!(align.and_then(|spec| spec.default.clone()), Some(json!("left")), "{type_name}");
	}
	assert!(doc.schema().get("doc").and_then(|def| def.attribute("align")).is_none());
}

#[test]
fn custom_bold_takes_over_mod_b() {
	let custom_bold = bold()
		.extend()
		.add_keyboard_shortcuts(|ctx| {
			let mut map: ShortcutMap = ctx.parent().unwrap_or_default();
			map.insert(
				"Mod-b".to_owned(),
				shortcut(|props| {
					props.editor.commit({
						let mut tr = tessera_extension::Transaction::new();
						tr.push("handler_a", Value::Null);
						tr
					});
					true
				}),
			);
			map
		})
		.build();

	let doc = resolve(&[bold(), italic(), custom_bold]);
	let editor = RecordingEditor::default();

	assert_eq!(doc.shortcuts().owner(&ctrl('b')), Some("bold"));
	assert_eq!(doc.handle_key(ctrl('b'), &editor), KeyOutcome::Consumed);
	assert_eq!(editor.ops(), [vec!["handler_a".to_owned()]]);

	assert_eq!(doc.handle_key_str("Mod-i", &editor), KeyOutcome::Consumed);
	assert_eq!(editor.ops()[1], ["toggle_mark"]);
	assert_eq!(doc.shortcuts().owner(&ctrl('i')), Some("italic"));

	assert!(doc.problems().contains(&Problem::DuplicateName {
		name: "bold".into(),
		count: 2,
	}));
}

#[test]
fn unbound_and_declined_keys_fall_through() {
	let doc = resolve(&[bold()]);
	let editor = RecordingEditor::default();
	assert_eq!(doc.handle_key(ctrl('z'), &editor), KeyOutcome::Unbound);

	editor.editable.set(false);
	assert_eq!(doc.handle_key(ctrl('b'), &editor), KeyOutcome::Declined);
	assert!(editor.ops().is_empty());
}

#[test]
fn invalid_shortcut_is_a_problem_not_an_error() {
	let ext = Extension::plain("broken")
		.add_keyboard_shortcuts(|_| ShortcutMap::from([("Hyper-x".to_owned(), shortcut(|_| true))]))
		.build();
	let doc = resolve(&[ext]);
	assert!(doc.shortcuts().is_empty());
	assert!(matches!(
		doc.problems(),
		[Problem::InvalidShortcut { extension, key, .. }] if extension == "broken" && key == "Hyper-x"
	));
}

#[test]
fn runaway_nesting_is_fatal() {
	fn recursive() -> Extension {
		Extension::plain("kit").add_extensions(|_| vec![recursive()]).build()
	}
	let config = EngineConfig {
		max_nesting_depth: 2,
		..common::config()
	};
	let err = ResolvedDocument::resolve(&[recursive()], &config).unwrap_err();
	assert_eq!(
		err,
		ResolveError::NestingTooDeep {
			chain: "kit > kit > kit > kit".into(),
			limit: 2,
		}
	);
}

#[test]
fn nested_kit_splices_in_place() {
	let kit = Extension::plain("starterKit")
		.add_extensions(|_| vec![doc(), paragraph(), bold()])
		.build();
	let doc = resolve(&[kit, italic()]);
	assert_eq!(names(&doc), ["starterKit", "doc", "paragraph", "bold", "italic"]);
	assert_eq!(doc.schema().top_node(), Some("doc"));
}

#[test]
fn same_name_last_registration_wins_every_lookup() {
	let first = Extension::plain("shared").add_options(|_| json!({ "from": "first" })).build();
	let second = Extension::plain("shared").add_options(|_| json!({ "from": "second" })).build();
	let doc = resolve(&[first, second]);
	assert_eq!(doc.options("shared"), Ok(&json!({ "from": "second" })));
	assert!(doc.options("missing").is_err());
}

#[test]
fn duplicate_warning_can_be_disabled() {
	let config = EngineConfig {
		warn_on_duplicate_names: false,
		..common::config()
	};
	let doc = ResolvedDocument::resolve(&[bold(), bold()], &config).unwrap();
	assert!(doc.problems().is_empty());
}
