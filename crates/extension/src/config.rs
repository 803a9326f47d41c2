//! Engine configuration.
//!
//! ```toml
//! max_nesting_depth = 10
//! platform = "auto"            # "auto" | "mac" | "other"
//! warn_on_duplicate_names = true
//! ```

use std::path::Path;

use serde::Deserialize;
use tessera_keymap::Platform;

use crate::error::ConfigError;

/// Knobs for one resolution pass. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	/// Deepest allowed nesting of `add_extensions`; roots sit at depth 0.
	pub max_nesting_depth: usize,
	/// Platform used to resolve `Mod` in shortcut descriptions.
	pub platform: Platform,
	/// Report extensions sharing a name as resolution problems.
	pub warn_on_duplicate_names: bool,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			max_nesting_depth: 10,
			platform: Platform::Auto,
			warn_on_duplicate_names: true,
		}
	}
}

impl EngineConfig {
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}
}
