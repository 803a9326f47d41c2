use std::sync::Arc;

use pretty_assertions::assert_eq;
use tessera_extension::{EngineConfig, Extension, ExtensionHost, ResolveError};

use crate::common::{self, bold, doc, italic, paragraph};

fn names(host: &ExtensionHost) -> Vec<String> {
	host.current().names().map(str::to_owned).collect()
}

#[test]
fn reconfigure_swaps_the_whole_document() {
	common::init_tracing();
	let host = ExtensionHost::new(common::config(), &[doc(), paragraph()]).unwrap();
	let before = host.current();

	let published = host.reconfigure(&[doc(), paragraph(), bold(), italic()]).unwrap();

	assert!(Arc::ptr_eq(&published, &host.current()));
	assert_eq!(names(&host), ["doc", "paragraph", "bold", "italic"]);
	// Readers holding the old snapshot keep their view.
	assert_eq!(before.names().collect::<Vec<_>>(), ["doc", "paragraph"]);
	assert!(before.commands().is_empty());
}

#[test]
fn failed_resolution_keeps_previous_document() {
	fn recursive() -> Extension {
		Extension::plain("loop").add_extensions(|_| vec![recursive()]).build()
	}

	let config = EngineConfig {
		max_nesting_depth: 1,
		..common::config()
	};
	let host = ExtensionHost::new(config, &[bold()]).unwrap();
	let before = host.current();

	let err = host.reconfigure(&[recursive()]).unwrap_err();
	assert!(matches!(err, ResolveError::NestingTooDeep { limit: 1, .. }));
	assert!(Arc::ptr_eq(&before, &host.current()));
}

#[test]
fn empty_host_publishes_an_empty_document() {
	let host = ExtensionHost::empty(EngineConfig::default());
	let current = host.current();
	assert!(current.extensions().is_empty());
	assert!(current.schema().is_empty());
	assert_eq!(host.config(), &EngineConfig::default());
}
