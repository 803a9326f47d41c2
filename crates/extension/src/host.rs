//! Snapshot publication of resolved documents.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::document::ResolvedDocument;
use crate::error::ResolveError;
use crate::extension::Extension;

/// Owns the currently published [`ResolvedDocument`].
///
/// Readers take an `Arc` snapshot with [`ExtensionHost::current`] and keep a
/// consistent view for as long as they hold it. [`ExtensionHost::reconfigure`]
/// resolves a fresh document and swaps it in wholesale; a failed resolution
/// leaves the previous document published.
pub struct ExtensionHost {
	config: EngineConfig,
	snap: ArcSwap<ResolvedDocument>,
}

impl ExtensionHost {
	pub fn new(config: EngineConfig, roots: &[Extension]) -> Result<Self, ResolveError> {
		let doc = ResolvedDocument::resolve(roots, &config)?;
		Ok(Self {
			config,
			snap: ArcSwap::from_pointee(doc),
		})
	}

	/// A host publishing a document with no extensions.
	pub fn empty(config: EngineConfig) -> Self {
		Self {
			config,
			snap: ArcSwap::from_pointee(ResolvedDocument::empty()),
		}
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// The published document.
	pub fn current(&self) -> Arc<ResolvedDocument> {
		self.snap.load_full()
	}

	/// Resolves `roots` and publishes the result.
	///
	/// Callers serialize reconfiguration themselves.
	pub fn reconfigure(&self, roots: &[Extension]) -> Result<Arc<ResolvedDocument>, ResolveError> {
		match ResolvedDocument::resolve(roots, &self.config) {
			Ok(doc) => {
				let doc = Arc::new(doc);
				self.snap.store(doc.clone());
				debug!(extensions = doc.extensions().len(), "published resolved document");
				Ok(doc)
			}
			Err(error) => {
				warn!(%error, "resolution failed; keeping previous document");
				Err(error)
			}
		}
	}
}
