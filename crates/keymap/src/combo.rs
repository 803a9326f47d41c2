//! Normalized key chord types.

use std::fmt;

use bitflags::bitflags;
use serde::Deserialize;

bitflags! {
	/// Modifier keys held during a chord.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
	pub struct Modifiers: u8 {
		const CTRL = 1 << 0;
		const ALT = 1 << 1;
		const SHIFT = 1 << 2;
		const META = 1 << 3;
	}
}

impl Modifiers {
	/// Canonical display order.
	const ORDER: [(Modifiers, &'static str); 4] = [
		(Modifiers::CTRL, "Ctrl"),
		(Modifiers::ALT, "Alt"),
		(Modifiers::SHIFT, "Shift"),
		(Modifiers::META, "Meta"),
	];
}

/// Target platform used to resolve the `Mod` pseudo-modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
	/// Detect from the compilation target.
	#[default]
	Auto,
	/// `Mod` means `Meta` (Command).
	Mac,
	/// `Mod` means `Ctrl`.
	Other,
}

impl Platform {
	/// Returns the modifier that `Mod` stands for on this platform.
	pub fn primary_modifier(self) -> Modifiers {
		match self {
			Self::Mac => Modifiers::META,
			Self::Other => Modifiers::CTRL,
			Self::Auto if cfg!(target_os = "macos") => Modifiers::META,
			Self::Auto => Modifiers::CTRL,
		}
	}
}

/// Non-character keys with a stable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamedKey {
	Enter,
	Backspace,
	Delete,
	Tab,
	Escape,
	Space,
	ArrowUp,
	ArrowDown,
	ArrowLeft,
	ArrowRight,
	Home,
	End,
	PageUp,
	PageDown,
	Insert,
}

impl NamedKey {
	const ALL: [NamedKey; 15] = [
		NamedKey::Enter,
		NamedKey::Backspace,
		NamedKey::Delete,
		NamedKey::Tab,
		NamedKey::Escape,
		NamedKey::Space,
		NamedKey::ArrowUp,
		NamedKey::ArrowDown,
		NamedKey::ArrowLeft,
		NamedKey::ArrowRight,
		NamedKey::Home,
		NamedKey::End,
		NamedKey::PageUp,
		NamedKey::PageDown,
		NamedKey::Insert,
	];

	/// Canonical spelling.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Enter => "Enter",
			Self::Backspace => "Backspace",
			Self::Delete => "Delete",
			Self::Tab => "Tab",
			Self::Escape => "Escape",
			Self::Space => "Space",
			Self::ArrowUp => "ArrowUp",
			Self::ArrowDown => "ArrowDown",
			Self::ArrowLeft => "ArrowLeft",
			Self::ArrowRight => "ArrowRight",
			Self::Home => "Home",
			Self::End => "End",
			Self::PageUp => "PageUp",
			Self::PageDown => "PageDown",
			Self::Insert => "Insert",
		}
	}

	/// Looks up a named key, accepting a few common aliases.
	pub fn from_name(name: &str) -> Option<Self> {
		let alias = match name.to_ascii_lowercase().as_str() {
			"return" => Some(Self::Enter),
			"del" => Some(Self::Delete),
			"esc" => Some(Self::Escape),
			"up" => Some(Self::ArrowUp),
			"down" => Some(Self::ArrowDown),
			"left" => Some(Self::ArrowLeft),
			"right" => Some(Self::ArrowRight),
			_ => None,
		};
		alias.or_else(|| Self::ALL.into_iter().find(|key| key.as_str().eq_ignore_ascii_case(name)))
	}
}

/// The non-modifier part of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
	Char(char),
	Named(NamedKey),
	/// Function key `F1`..`F24`.
	F(u8),
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Char(ch) => write!(f, "{ch}"),
			Self::Named(named) => f.write_str(named.as_str()),
			Self::F(n) => write!(f, "F{n}"),
		}
	}
}

/// A normalized key chord: a modifier set plus one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCombo {
	pub modifiers: Modifiers,
	pub key: Key,
}

impl KeyCombo {
	pub const fn new(modifiers: Modifiers, key: Key) -> Self {
		Self { modifiers, key }
	}

	/// Chord for a bare character.
	pub const fn char(ch: char) -> Self {
		Self::new(Modifiers::empty(), Key::Char(ch))
	}

	/// Returns a copy with `modifiers` added.
	pub fn with(self, modifiers: Modifiers) -> Self {
		Self {
			modifiers: self.modifiers | modifiers,
			key: self.key,
		}
	}
}

impl fmt::Display for KeyCombo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (flag, name) in Modifiers::ORDER {
			if self.modifiers.contains(flag) {
				write!(f, "{name}-")?;
			}
		}
		write!(f, "{}", self.key)
	}
}
