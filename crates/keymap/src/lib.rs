//! Key combination vocabulary for editor shortcuts.
//!
//! Shortcut tables are keyed by strings such as `"Mod-b"` or
//! `"Shift-Ctrl-ArrowUp"`. Two spellings of the same chord must land on the
//! same table slot, so every key description is parsed into a normalized
//! [`KeyCombo`] before it is stored or looked up.
//!
//! - Modifiers may appear in any order and any case (`shift-CTRL-x`).
//! - `Mod` resolves to `Meta` on macOS and `Ctrl` elsewhere, see [`Platform`].
//! - Named keys are case-insensitive (`enter`, `Enter`, `ENTER`).

pub use combo::{Key, KeyCombo, Modifiers, NamedKey, Platform};
pub use parser::{ParseError, parse, parse_for};

mod combo;
mod parser;
