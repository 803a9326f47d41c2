//! Text input rules.
//!
//! A rule pairs a regular expression with a handler. Patterns are matched
//! against the text before the cursor and must match at its very end, so
//! `"^## $"` fires when the user types the space after `##`.

use std::fmt;
use std::ops::Range;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, trace, warn};

use crate::document::Problem;
use crate::editor::{EditorHandle, Transaction, commit};
use crate::extension::field;
use crate::lifecycle::panic_message;
use crate::resolve::ExtensionViews;

pub type InputRuleFn = Arc<dyn Fn(&mut InputRuleProps<'_>) -> bool + Send + Sync>;

/// One contributed rule, uncompiled.
#[derive(Clone)]
pub struct InputRule {
	pub pattern: String,
	pub handler: InputRuleFn,
}

impl InputRule {
	pub fn new(
		pattern: impl Into<String>,
		handler: impl Fn(&mut InputRuleProps<'_>) -> bool + Send + Sync + 'static,
	) -> Self {
		Self {
			pattern: pattern.into(),
			handler: Arc::new(handler),
		}
	}
}

impl fmt::Debug for InputRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InputRule").field("pattern", &self.pattern).finish_non_exhaustive()
	}
}

/// What an input rule handler sees.
pub struct InputRuleProps<'a> {
	pub tr: &'a mut Transaction,
	pub editor: &'a dyn EditorHandle,
	/// The text the rule matched against.
	pub text: &'a str,
	/// Byte range of the match within `text`.
	pub range: Range<usize>,
	/// Capture groups; index 0 is the whole match.
	pub captures: &'a [Option<String>],
}

/// A rule that matched some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRuleMatch<'a> {
	/// Extension that contributed the rule.
	pub owner: &'a str,
	pub pattern: &'a str,
	pub range: Range<usize>,
	pub captures: Vec<Option<String>>,
}

struct CompiledRule {
	owner: String,
	pattern: String,
	regex: Regex,
	handler: InputRuleFn,
}

/// Compiled input rules in resolved order.
#[derive(Default)]
pub struct InputRules {
	rules: Vec<CompiledRule>,
}

impl InputRules {
	pub(crate) fn build(views: &ExtensionViews<'_>, problems: &mut Vec<Problem>) -> Self {
		let mut rules = Vec::new();
		for (_, ext) in views.all() {
			let Some(contributed) = ext.resolve(field::add_input_rules) else {
				continue;
			};
			for rule in contributed {
				match Regex::new(&format!("(?:{})$", rule.pattern)) {
					Ok(regex) => rules.push(CompiledRule {
						owner: ext.name().to_owned(),
						pattern: rule.pattern,
						regex,
						handler: rule.handler,
					}),
					Err(error) => {
						debug!(extension = %ext.name(), pattern = %rule.pattern, %error, "invalid input rule pattern");
						problems.push(Problem::InvalidInputRule {
							extension: ext.name().to_owned(),
							pattern: rule.pattern,
							message: error.to_string(),
						});
					}
				}
			}
		}
		Self { rules }
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// First rule matching at the end of `text`.
	pub fn find(&self, text: &str) -> Option<InputRuleMatch<'_>> {
		self.rules.iter().find_map(|rule| capture(rule, text))
	}

	/// Runs the first matching rule whose handler succeeds and commits its
	/// transaction.
	///
	/// A declining or panicking handler leaves nothing behind and the next
	/// matching rule is tried.
	pub fn apply(&self, text: &str, editor: &dyn EditorHandle) -> bool {
		for rule in &self.rules {
			let Some(found) = capture(rule, text) else {
				continue;
			};

			let mut tr = Transaction::new();
			let mut props = InputRuleProps {
				tr: &mut tr,
				editor,
				text,
				range: found.range.clone(),
				captures: &found.captures,
			};
			trace!(extension = %rule.owner, pattern = %rule.pattern, "input rule matched");
			match catch_unwind(AssertUnwindSafe(|| (rule.handler)(&mut props))) {
				Ok(true) => {
					commit(editor, tr);
					return true;
				}
				Ok(false) => {}
				Err(payload) => {
					warn!(
						extension = %rule.owner,
						pattern = %rule.pattern,
						panic = %panic_message(payload.as_ref()),
						"input rule panicked"
					);
				}
			}
		}
		false
	}
}

fn capture<'r>(rule: &'r CompiledRule, text: &str) -> Option<InputRuleMatch<'r>> {
	let caps = rule.regex.captures(text)?;
	let whole = caps.get(0)?;
	Some(InputRuleMatch {
		owner: &rule.owner,
		pattern: &rule.pattern,
		range: whole.range(),
		captures: caps.iter().map(|m| m.map(|m| m.as_str().to_owned())).collect(),
	})
}

impl fmt::Debug for InputRules {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list()
			.entries(self.rules.iter().map(|rule| (&rule.owner, &rule.pattern)))
			.finish()
	}
}
