//! Error types for resolution, instance construction, lookup and configuration.

use std::path::PathBuf;

/// Fatal resolution errors. The previous document stays published.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
	/// Nested extensions recursed past the configured depth cap.
	#[error("nested extensions exceed depth limit {limit}: {chain}")]
	NestingTooDeep {
		/// Offending chain, outermost first: `a > b > c`.
		chain: String,
		limit: usize,
	},
}

/// Failures while building attribute values for one node or mark instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstanceError {
	#[error("unknown type '{0}'")]
	UnknownType(String),

	#[error("missing required attribute '{attribute}' on '{type_name}'")]
	MissingRequired { type_name: String, attribute: String },

	#[error("invalid value for '{type_name}.{attribute}': {reason}")]
	Invalid {
		type_name: String,
		attribute: String,
		reason: String,
	},
}

/// Lookups that found nothing. The host decides whether that is fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
	#[error("unknown command '{0}'")]
	UnknownCommand(String),

	#[error("unknown extension '{0}'")]
	UnknownExtension(String),
}

/// Engine configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid engine config: {0}")]
	Parse(#[from] toml::de::Error),
}
