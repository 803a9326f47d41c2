//! Lifecycle hook dispatch.
//!
//! Hooks run in resolved order. A hook that returns an error or panics is
//! logged with its extension's name and recorded in the [`DispatchReport`];
//! the remaining hooks still run.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{trace, warn};

use crate::editor::{EditorHandle, Transaction};
use crate::extension::{Field, field};
use crate::resolve::ResolvedExtension;

/// Outcome of one hook.
pub type HookResult = anyhow::Result<()>;

/// Events the host shell reports to extensions.
#[derive(Debug, Clone, Copy)]
pub enum LifecycleEvent<'a> {
	BeforeCreate,
	Create,
	/// Document content changed.
	Update,
	SelectionUpdate,
	/// A transaction was applied.
	Transaction(&'a Transaction),
	Focus,
	Blur,
	Destroy,
}

impl LifecycleEvent<'_> {
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::BeforeCreate => "before_create",
			Self::Create => "create",
			Self::Update => "update",
			Self::SelectionUpdate => "selection_update",
			Self::Transaction(_) => "transaction",
			Self::Focus => "focus",
			Self::Blur => "blur",
			Self::Destroy => "destroy",
		}
	}

	/// The applied transaction, for [`LifecycleEvent::Transaction`].
	pub fn transaction(&self) -> Option<&Transaction> {
		match self {
			Self::Transaction(tr) => Some(tr),
			_ => None,
		}
	}

	fn hook(&self) -> Field<HookResult> {
		match self {
			Self::BeforeCreate => field::on_before_create,
			Self::Create => field::on_create,
			Self::Update => field::on_update,
			Self::SelectionUpdate => field::on_selection_update,
			Self::Transaction(_) => field::on_transaction,
			Self::Focus => field::on_focus,
			Self::Blur => field::on_blur,
			Self::Destroy => field::on_destroy,
		}
	}
}

/// One hook that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFailure {
	pub extension: String,
	pub event: &'static str,
	pub message: String,
	pub panicked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
	/// Number of hooks that ran.
	pub invoked: usize,
	pub failures: Vec<HookFailure>,
}

impl DispatchReport {
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty()
	}
}

/// Runs every extension's hook for `event` in order.
pub(crate) fn dispatch(
	extensions: &[ResolvedExtension],
	event: &LifecycleEvent<'_>,
	editor: &dyn EditorHandle,
) -> DispatchReport {
	let hook = event.hook();
	let mut report = DispatchReport::default();

	for ext in extensions {
		let scope = ext.scope(Some(editor), Some(event));
		let outcome = catch_unwind(AssertUnwindSafe(|| ext.extension().resolve_field(hook, scope)));
		let failure = match outcome {
			Ok(None) => continue,
			Ok(Some(Ok(()))) => None,
			Ok(Some(Err(error))) => Some((format!("{error:#}"), false)),
			Err(payload) => Some((panic_message(payload.as_ref()), true)),
		};
		report.invoked += 1;

		if let Some((message, panicked)) = failure {
			warn!(extension = %ext.name(), event = event.as_str(), panicked, error = %message, "lifecycle hook failed");
			report.failures.push(HookFailure {
				extension: ext.name().to_owned(),
				event: event.as_str(),
				message,
				panicked,
			});
		}
	}

	trace!(event = event.as_str(), invoked = report.invoked, failed = report.failures.len(), "lifecycle dispatched");
	report
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_owned()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"non-string panic payload".to_owned()
	}
}
