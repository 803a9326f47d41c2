use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tessera_extension::{CommandMap, Extension, LookupError, command};

use crate::common::{RecordingEditor, bold, italic, resolve};

fn editing() -> Extension {
	Extension::plain("editing")
		.add_storage(|_| json!({ "inserted": 0 }))
		.add_commands(|ctx| {
			let storage = ctx.storage.clone();
			CommandMap::from([
				(
					"insert_text".to_owned(),
					command(move |props| {
						let Some(text) = props.args.as_str() else {
							return false;
						};
						props.tr.push("insert_text", json!(text));
						let storage = storage.clone();
						props.tr.on_commit(move || {
							storage.update(|value| {
								let count = value["inserted"].as_u64().unwrap_or(0);
								value["inserted"] = json!(count + 1);
							});
						});
						true
					}),
				),
				("fail".to_owned(), command(|_| false)),
			])
		})
		.build()
}

#[test]
fn chain_is_all_or_nothing() {
	let doc = resolve(&[bold(), editing()]);
	let editor = RecordingEditor::default();

	let ok = doc
		.chain(&editor)
		.command("insert_text", json!("hello"))
		.then("toggle_bold")
		.then("fail")
		.run();
	assert_eq!(ok, Ok(false));
	assert!(editor.ops().is_empty());
	assert_eq!(doc.storage("editing").unwrap().get(), json!({ "inserted": 0 }));

	let ok = doc
		.chain(&editor)
		.command("insert_text", json!("hello"))
		.then("toggle_bold")
		.run();
	assert_eq!(ok, Ok(true));
	assert_eq!(editor.ops(), [vec!["insert_text".to_owned(), "toggle_mark".to_owned()]]);
	assert_eq!(doc.storage("editing").unwrap().get(), json!({ "inserted": 1 }));
}

#[test]
fn abandoned_chain_commits_nothing() {
	let doc = resolve(&[bold()]);
	let editor = RecordingEditor::default();
	drop(doc.chain(&editor).then("toggle_bold"));
	assert!(editor.ops().is_empty());
}

#[test]
fn commands_see_extension_storage() {
	let doc = resolve(&[editing()]);
	let editor = RecordingEditor::default();

	assert_eq!(doc.run("insert_text", &json!("a"), &editor), Ok(true));
	assert_eq!(doc.commands().can("insert_text", &json!("b"), &editor), Ok(true));
	assert_eq!(doc.run("insert_text", &json!(3), &editor), Ok(false));

	let storage = doc.storage("editing").unwrap();
	assert_eq!(storage.get(), json!({ "inserted": 1 }));
}

#[test]
fn every_mark_contributes_its_command() {
	let doc = resolve(&[bold(), italic()]);
	assert_eq!(doc.commands().names().collect::<Vec<_>>(), ["toggle_bold", "toggle_italic"]);
	assert_eq!(doc.commands().owner("toggle_italic"), Some("italic"));
	assert_eq!(
		doc.run("toggle_underline", &Value::Null, &RecordingEditor::default()),
		Err(LookupError::UnknownCommand("toggle_underline".into()))
	);
}
