//! Extension composition engine for rich-document editors.
//!
//! Independently authored extensions (text marks, block types, keyboard
//! behavior) each contribute options, attributes, commands, shortcuts, input
//! rules, schema fields and lifecycle hooks. This crate resolves an ordered
//! list of them into one immutable [`ResolvedDocument`].
//!
//! # Pipeline
//!
//! ```text
//! roots ─▶ flatten ─▶ sort by priority ─▶ split views ─┬▶ schema (types + attributes)
//!                                                      ├▶ commands
//!                                                      ├▶ shortcuts / input rules
//!                                                      └▶ lifecycle hooks
//! ```
//!
//! # Override chains
//!
//! [`Extension::extend`] starts a new generation whose unset fields fall
//! through to its parent. A field that is set receives a [`FieldContext`]
//! whose [`FieldContext::parent`] resolves the same field one generation up,
//! so overrides compose explicitly instead of through implicit super-calls.
//!
//! # Publication
//!
//! A [`ResolvedDocument`] is never patched. [`ExtensionHost`] swaps in a fresh
//! one whenever the root list changes.

pub mod attribute;
pub mod commands;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod extension;
pub mod host;
pub mod input_rules;
pub mod lifecycle;
pub mod options;
pub mod resolve;
pub mod schema;
pub mod shortcuts;
pub mod storage;

#[cfg(test)]
use tracing_subscriber as _;

pub use attribute::{AttrValues, Attribute, AttributeMap, AttributeSpec, GlobalAttributes};
pub use commands::{Chain, CommandFn, CommandMap, CommandProps, CommandRegistry, command};
pub use config::EngineConfig;
pub use document::{Problem, ResolvedDocument};
pub use editor::{CommitEffect, EditorHandle, Step, Transaction};
pub use error::{ConfigError, InstanceError, LookupError, ResolveError};
pub use extension::{
	DEFAULT_PRIORITY, Extension, ExtensionBuilder, ExtensionKind, Field, FieldContext, FieldFn,
	Scope, field, field_fn,
};
pub use host::ExtensionHost;
pub use input_rules::{InputRule, InputRuleFn, InputRuleMatch, InputRuleProps, InputRules};
pub use lifecycle::{DispatchReport, HookFailure, HookResult, LifecycleEvent};
pub use resolve::{ExtensionViews, ResolvedExtension};
pub use schema::{
	ExternalNode, MarkShape, NodeShape, ParseRule, RenderFn, RenderProps, RenderSpec, Schema,
	TypeDef, TypeShape, Whitespace, render_fn,
};
pub use shortcuts::{KeyOutcome, ShortcutFn, ShortcutMap, ShortcutProps, ShortcutTable, shortcut};
pub use storage::Storage;
pub use tessera_keymap::{KeyCombo, Platform};
