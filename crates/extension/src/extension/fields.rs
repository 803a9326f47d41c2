//! The contribution fields one chain generation may define.

use std::sync::Arc;

use serde_json::Value;

use super::context::FieldContext;
use super::{Extension, ExtensionBuilder};
use crate::attribute::{AttributeMap, GlobalAttributes};
use crate::commands::CommandMap;
use crate::input_rules::InputRule;
use crate::lifecycle::HookResult;
use crate::schema::{ParseRule, RenderFn, Whitespace};
use crate::shortcuts::ShortcutMap;

/// A field implementation: a pure function of its [`FieldContext`].
pub type FieldFn<T> = Arc<dyn Fn(&FieldContext<'_, T>) -> T + Send + Sync>;

/// Selects one field out of a generation's [`Fields`].
///
/// The functions in [`field`] are the selectors for every known field.
pub type Field<T> = fn(&Fields) -> Option<&FieldFn<T>>;

/// Boxes a closure as a [`FieldFn`], deducing its higher-ranked signature.
pub fn field_fn<T, F>(f: F) -> FieldFn<T>
where
	F: Fn(&FieldContext<'_, T>) -> T + Send + Sync + 'static,
{
	Arc::new(f)
}

macro_rules! extension_fields {
	(
		fns { $( $(#[$fdoc:meta])* $fname:ident : $fty:ty ),* $(,)? }
		values { $( $(#[$vdoc:meta])* $vname:ident : $vty:ty ),* $(,)? }
	) => {
		/// Fields defined by one generation. Unset fields fall through to the parent.
		#[derive(Clone, Default)]
		pub struct Fields {
			$( pub(crate) $fname: Option<FieldFn<$fty>>, )*
			$( pub(crate) $vname: Option<FieldFn<$vty>>, )*
		}

		impl Fields {
			/// Names of the fields this generation defines.
			pub fn defined(&self) -> Vec<&'static str> {
				let mut out = Vec::new();
				$( if self.$fname.is_some() { out.push(stringify!($fname)); } )*
				$( if self.$vname.is_some() { out.push(stringify!($vname)); } )*
				out
			}
		}

		/// Field selectors for [`Extension::resolve_field`].
		pub mod field {
			use super::*;

			$(
				$(#[$fdoc])*
				pub fn $fname(fields: &Fields) -> Option<&FieldFn<$fty>> {
					fields.$fname.as_ref()
				}
			)*
			$(
				$(#[$vdoc])*
				pub fn $vname(fields: &Fields) -> Option<&FieldFn<$vty>> {
					fields.$vname.as_ref()
				}
			)*
		}

		impl ExtensionBuilder {
			$(
				$(#[$fdoc])*
				pub fn $fname<F>(mut self, f: F) -> Self
				where
					F: Fn(&FieldContext<'_, $fty>) -> $fty + Send + Sync + 'static,
				{
					self.fields.$fname = Some(Arc::new(f));
					self
				}
			)*
			$(
				paste::paste! {
					$(#[$vdoc])*
					pub fn $vname(mut self, value: impl Into<$vty>) -> Self {
						let value: $vty = value.into();
						self.fields.$vname = Some(field_fn(move |_| value.clone()));
						self
					}

					/// Computes the value from the field context.
					pub fn [<$vname _with>]<F>(mut self, f: F) -> Self
					where
						F: Fn(&FieldContext<'_, $vty>) -> $vty + Send + Sync + 'static,
					{
						self.fields.$vname = Some(Arc::new(f));
						self
					}
				}
			)*
		}
	};
}

extension_fields! {
	fns {
		/// Default options, deep-merged with `configure()` patches.
		add_options: Value,
		/// Initial storage value. Sees resolved options.
		add_storage: Value,
		/// Extensions spliced in right after this one.
		add_extensions: Vec<Extension>,
		/// Attributes of this extension's own type (nodes and marks only).
		add_attributes: AttributeMap,
		/// Attributes contributed to other extensions' types.
		add_global_attributes: Vec<GlobalAttributes>,
		add_commands: CommandMap,
		add_keyboard_shortcuts: ShortcutMap,
		add_input_rules: Vec<InputRule>,
		on_before_create: HookResult,
		on_create: HookResult,
		on_update: HookResult,
		on_selection_update: HookResult,
		on_transaction: HookResult,
		on_focus: HookResult,
		on_blur: HookResult,
		on_destroy: HookResult,
	}
	values {
		/// Marks this node as the document's top node.
		top_node: bool,
		/// Content expression, for example `"inline*"`.
		content: String,
		/// Marks allowed inside this node (`"_"` for all, `""` for none).
		marks: String,
		/// Space-separated group tags.
		group: String,
		inline: bool,
		atom: bool,
		selectable: bool,
		draggable: bool,
		code: bool,
		defining: bool,
		isolating: bool,
		whitespace: Whitespace,
		/// Whether a mark extends to text typed at its end.
		inclusive: bool,
		/// Space-separated marks this mark excludes.
		excludes: String,
		spanning: bool,
		/// Rules recognizing this type in the external representation.
		parse_rules: Vec<ParseRule>,
		/// Renders an instance into the external representation.
		render: RenderFn,
	}
}
