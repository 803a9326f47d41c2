use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use serde_json::json;
use tessera_extension::{Extension, InputRule, Problem};

use crate::common::{RecordingEditor, resolve};

fn markdown_shortcuts() -> Extension {
	Extension::plain("markdownShortcuts")
		.add_input_rules(|_| {
			vec![
				InputRule::new(r"^(#{1,6})\s", |props| {
					let level = props.captures[1].as_deref().map_or(0, str::len);
					props.tr.push("set_heading", json!({ "level": level }));
					true
				}),
				InputRule::new(r"^>\s", |props| {
					props.tr.push("wrap_blockquote", json!(null));
					true
				}),
				InputRule::new(r"\*\*([^*]+)\*\*", |props| {
					if props.range.start == 0 {
						return false;
					}
					props.tr.push("bold_text", json!(props.captures[1]));
					true
				}),
			]
		})
		.build()
}

#[test]
fn rules_match_only_at_end_of_text() {
	let doc = resolve(&[markdown_shortcuts()]);
	let rules = doc.input_rules();

	let found = rules.find("## ").expect("heading rule");
	assert_eq!(found.owner, "markdownShortcuts");
	assert_eq!(found.captures[1].as_deref(), Some("##"));
	assert_eq!(found.range, 0..3);

	assert!(rules.find("## title").is_none());
	assert!(rules.find("plain").is_none());
}

#[test]
fn apply_commits_the_first_accepting_rule() {
	let doc = resolve(&[markdown_shortcuts()]);
	let editor = RecordingEditor::default();

	assert!(doc.handle_text_input("### ", &editor));
	assert!(doc.handle_text_input("say **hi**", &editor));
	assert!(!doc.handle_text_input("**hi**", &editor));
	assert_eq!(
		editor.ops(),
		[vec!["set_heading".to_owned()], vec!["bold_text".to_owned()]]
	);
	assert_eq!(editor.committed.borrow()[0].steps()[0].payload, json!({ "level": 3 }));
	assert_eq!(editor.committed.borrow()[1].steps()[0].payload, json!("hi"));
}

#[test]
fn invalid_pattern_is_reported_and_skipped() {
	let ext = Extension::plain("broken")
		.add_input_rules(|_| vec![InputRule::new("(unclosed", |_| true), InputRule::new(r"--$", |_| true)])
		.build();
	let doc = resolve(&[ext]);

	assert_eq!(doc.input_rules().len(), 1);
	assert!(matches!(
		doc.problems(),
		[Problem::InvalidInputRule { pattern, .. }] if pattern == "(unclosed"
	));
}

#[test]
fn declined_rule_drops_its_commit_effects() {
	let declined = Arc::new(AtomicUsize::new(0));
	let accepted = Arc::new(AtomicUsize::new(0));
	let ext = {
		let (declined, accepted) = (declined.clone(), accepted.clone());
		Extension::plain("typography")
			.add_input_rules(move |_| {
				let (declined, accepted) = (declined.clone(), accepted.clone());
				vec![
					InputRule::new(r"--", move |props| {
						let declined = declined.clone();
						props.tr.on_commit(move || {
							declined.fetch_add(1, Ordering::SeqCst);
						});
						false
					}),
					InputRule::new(r"-", move |props| {
						let accepted = accepted.clone();
						props.tr.push("insert_dash", json!("\u{2013}"));
						props.tr.on_commit(move || {
							accepted.fetch_add(1, Ordering::SeqCst);
						});
						true
					}),
				]
			})
			.build()
	};
	let doc = resolve(&[ext]);
	let editor = RecordingEditor::default();

	assert!(doc.handle_text_input("a--", &editor));
	assert_eq!(editor.ops(), [vec!["insert_dash".to_owned()]]);
	assert_eq!(declined.load(Ordering::SeqCst), 0);
	assert_eq!(accepted.load(Ordering::SeqCst), 1);
}
