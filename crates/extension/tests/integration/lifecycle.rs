use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use tessera_extension::{Extension, LifecycleEvent, Transaction};

use crate::common::{RecordingEditor, resolve};

type Log = Arc<Mutex<Vec<String>>>;

fn logging(name: &'static str, priority: i32, log: &Log) -> Extension {
	let on_create = log.clone();
	let on_transaction = log.clone();
	Extension::plain(name)
		.priority(priority)
		.on_create(move |ctx| {
			on_create.lock().push(format!("create:{}", ctx.name));
			Ok(())
		})
		.on_transaction(move |ctx| {
			let steps = ctx.event.and_then(|event| event.transaction()).map_or(0, Transaction::len);
			on_transaction.lock().push(format!("transaction:{}:{steps}", ctx.name));
			Ok(())
		})
		.build()
}

#[test]
fn hooks_run_in_resolved_order() {
	let log = Log::default();
	let doc = resolve(&[logging("late", 10, &log), logging("early", 500, &log), logging("middle", 100, &log)]);
	let editor = RecordingEditor::default();

	let report = doc.dispatch(LifecycleEvent::Create, &editor);
	assert_eq!(report.invoked, 3);
	assert!(report.is_ok());

	let mut tr = Transaction::new();
	tr.push("insert_text", json!("x"));
	doc.dispatch(LifecycleEvent::Transaction(&tr), &editor);

	assert_eq!(
		*log.lock(),
		[
			"create:early",
			"create:middle",
			"create:late",
			"transaction:early:1",
			"transaction:middle:1",
			"transaction:late:1",
		]
	);
}

#[test]
fn failing_hooks_are_isolated() {
	let log = Log::default();
	let erroring = Extension::plain("erroring")
		.priority(300)
		.on_create(|_| Err(anyhow::anyhow!("storage unavailable")))
		.build();
	let panicking = Extension::plain("panicking")
		.priority(200)
		.on_create(|_| panic!("hook exploded"))
		.build();
	let doc = resolve(&[erroring, panicking, logging("survivor", 100, &log)]);

	let report = doc.dispatch(LifecycleEvent::Create, &RecordingEditor::default());

	assert_eq!(report.invoked, 3);
	assert_eq!(report.failures.len(), 2);
	assert_eq!(report.failures[0].extension, "erroring");
	assert_eq!(report.failures[0].message, "storage unavailable");
	assert!(!report.failures[0].panicked);
	assert_eq!(report.failures[1].extension, "panicking");
	assert_eq!(report.failures[1].message, "hook exploded");
	assert!(report.failures[1].panicked);
	assert_eq!(*log.lock(), ["create:survivor"]);
}

#[test]
fn hooks_mutate_their_own_storage() {
	let counter = Extension::plain("focusCounter")
		.add_storage(|_| json!({ "focused": false, "count": 0 }))
		.on_focus(|ctx| {
			ctx.storage.update(|value| {
				let count = value["count"].as_i64().unwrap_or(0);
				value["count"] = json!(count + 1);
				value["focused"] = json!(true);
			});
			Ok(())
		})
		.on_blur(|ctx| {
			ctx.storage.update(|value| value["focused"] = json!(false));
			Ok(())
		})
		.build();
	let doc = resolve(&[counter]);
	let editor = RecordingEditor::default();

	doc.dispatch(LifecycleEvent::Focus, &editor);
	doc.dispatch(LifecycleEvent::Blur, &editor);
	doc.dispatch(LifecycleEvent::Focus, &editor);

	assert_eq!(doc.storage("focusCounter").unwrap().get(), json!({ "focused": true, "count": 2 }));
}

#[test]
fn extended_hook_can_call_the_original() {
	let log = Log::default();
	let base = logging("base", 100, &log);
	let wrapped = {
		let log = log.clone();
		base.extend()
			.on_create(move |ctx| {
				log.lock().push("before".to_owned());
				ctx.parent().unwrap_or(Ok(()))?;
				log.lock().push("after".to_owned());
				Ok(())
			})
			.build()
	};
	let doc = resolve(&[wrapped]);
	let report = doc.dispatch(LifecycleEvent::Create, &RecordingEditor::default());

	assert_eq!(report.invoked, 1);
	assert_eq!(*log.lock(), ["before", "create:base", "after"]);
}

#[test]
fn extensions_without_the_hook_are_skipped() {
	let doc = resolve(&[Extension::plain("quiet").build()]);
	let report = doc.dispatch(LifecycleEvent::Destroy, &RecordingEditor::default());
	assert_eq!(report.invoked, 0);
	assert!(report.is_ok());
}
