//! # Parser
//!
//! Parses plain-text shortcut descriptions into [`KeyCombo`] values.
//!
//! ## Supported Syntax
//!
//! ```text
//! combo     = (modifier "-")* key
//! modifier  = "mod" | "ctrl" | "control" | "c" | "alt" | "option" | "a"
//!           | "shift" | "s" | "meta" | "cmd" | "command" | "super" | "m"
//! key       = fn-key | named-key | char
//! fn-key    = "f" digit digit?
//! named-key = "enter" | "backspace" | "arrowup" | ...
//! char      = any single character, including "-" as the final segment
//! ```
//!
//! Modifier and named-key spellings are case-insensitive. Single characters
//! are kept as written, so `"Mod-B"` and `"Mod-b"` are distinct chords.

use thiserror::Error;

use crate::combo::{Key, KeyCombo, Modifiers, NamedKey, Platform};


const KEY_SEP: char = '-';

/// Represents an error that occurred during parsing.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
	/// Human-readable description of the parse error.
	pub message: String,
	/// Byte offset in the input where the error occurred.
	pub position: usize,
}

impl ParseError {
	fn new(message: impl Into<String>, position: usize) -> Self {
		Self {
			message: message.into(),
			position,
		}
	}
}

/// One `-`-separated segment of the input with its byte offset.
#[derive(Debug, Clone, Copy)]
struct Segment<'a> {
	text: &'a str,
	position: usize,
}

/// Parses a shortcut description, resolving `Mod` for the current platform.
///
/// # Errors
///
/// Returns a [`ParseError`] if the input does not match the grammar.
pub fn parse(input: &str) -> Result<KeyCombo, ParseError> {
	parse_for(input, Platform::Auto)
}

/// Parses a shortcut description, resolving `Mod` for `platform`.
///
/// # Errors
///
/// Returns a [`ParseError`] if the input does not match the grammar.
pub fn parse_for(input: &str, platform: Platform) -> Result<KeyCombo, ParseError> {
	if input.is_empty() {
		return Err(ParseError::new("empty key description", 0));
	}

	let (modifier_segments, key_segment) = split_segments(input);

	let mut modifiers = Modifiers::empty();
	for segment in modifier_segments {
		modifiers |= parse_modifier(segment, platform)?;
	}

	let key = parse_key(key_segment)?;
	Ok(KeyCombo::new(modifiers, key))
}

/// Splits the input into modifier segments and the trailing key segment.
///
/// A trailing `-` is the key itself (`"Ctrl--"` binds the minus key).
fn split_segments(input: &str) -> (Vec<Segment<'_>>, Segment<'_>) {
	let key_start = if input.ends_with(KEY_SEP) {
		input.len() - KEY_SEP.len_utf8()
	} else {
		input.rfind(KEY_SEP).map_or(0, |idx| idx + KEY_SEP.len_utf8())
	};

	let key = Segment {
		text: &input[key_start..],
		position: key_start,
	};

	if key_start == 0 {
		return (Vec::new(), key);
	}

	// Everything before the separator that precedes the key. An empty prefix
	// still yields one (empty) modifier segment so `"--"` is rejected.
	let prefix = &input[..key_start - KEY_SEP.len_utf8()];

	let mut segments = Vec::new();
	let mut position = 0;
	for text in prefix.split(KEY_SEP) {
		segments.push(Segment { text, position });
		position += text.len() + KEY_SEP.len_utf8();
	}
	(segments, key)
}

fn parse_modifier(segment: Segment<'_>, platform: Platform) -> Result<Modifiers, ParseError> {
	if segment.text.is_empty() {
		return Err(ParseError::new("empty modifier", segment.position));
	}

	let modifier = match segment.text.to_ascii_lowercase().as_str() {
		"mod" => platform.primary_modifier(),
		"ctrl" | "control" | "c" => Modifiers::CTRL,
		"alt" | "option" | "a" => Modifiers::ALT,
		"shift" | "s" => Modifiers::SHIFT,
		"meta" | "cmd" | "command" | "super" | "m" => Modifiers::META,
		other => {
			return Err(ParseError::new(
				format!("unknown modifier '{other}'"),
				segment.position,
			));
		}
	};
	Ok(modifier)
}

fn parse_key(segment: Segment<'_>) -> Result<Key, ParseError> {
	let mut chars = segment.text.chars();
	let (Some(first), rest) = (chars.next(), chars.as_str()) else {
		return Err(ParseError::new("missing key", segment.position));
	};

	if rest.is_empty() {
		return Ok(match first {
			' ' => Key::Named(NamedKey::Space),
			ch => Key::Char(ch),
		});
	}

	if let Some(n) = parse_function_key(first, rest) {
		return Ok(Key::F(n));
	}

	NamedKey::from_name(segment.text)
		.map(Key::Named)
		.ok_or_else(|| ParseError::new(format!("unknown key '{}'", segment.text), segment.position))
}

fn parse_function_key(first: char, rest: &str) -> Option<u8> {
	if !first.eq_ignore_ascii_case(&'f') || rest.len() > 2 || !rest.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	rest.parse::<u8>().ok().filter(|n| (1..=24).contains(n))
}
