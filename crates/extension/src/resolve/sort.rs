//! Priority ordering.

use std::cmp::Reverse;

use super::ResolvedExtension;

/// Sorts by descending priority. The sort is stable, so ties keep their
/// flattened order and the same input always yields the same order.
pub(crate) fn sort_by_priority(extensions: &mut [ResolvedExtension]) {
	extensions.sort_by_key(|ext| Reverse(ext.priority()));
}
