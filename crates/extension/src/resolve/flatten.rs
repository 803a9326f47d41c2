//! Depth-first expansion of nested extensions.

use super::ResolvedExtension;
use crate::error::ResolveError;
use crate::extension::{Extension, field};

/// Expands `roots` in pre-order: each extension, then its nested extensions,
/// recursively, before its next sibling.
///
/// Roots sit at depth 0. Reaching a depth above `limit` fails with the chain
/// of names that led there.
pub(crate) fn flatten(roots: &[Extension], limit: usize) -> Result<Vec<ResolvedExtension>, ResolveError> {
	let mut out = Vec::with_capacity(roots.len());
	let mut chain = Vec::new();
	for root in roots {
		visit(root, limit, &mut chain, &mut out)?;
	}
	Ok(out)
}

fn visit(
	ext: &Extension,
	limit: usize,
	chain: &mut Vec<String>,
	out: &mut Vec<ResolvedExtension>,
) -> Result<(), ResolveError> {
	chain.push(ext.name().to_owned());
	if chain.len() > limit + 1 {
		return Err(ResolveError::NestingTooDeep {
			chain: chain.join(" > "),
			limit,
		});
	}

	let resolved = ResolvedExtension::prepare(ext.clone());
	let nested = resolved.resolve(field::add_extensions).unwrap_or_default();
	out.push(resolved);

	for child in &nested {
		visit(child, limit, chain, out)?;
	}

	chain.pop();
	Ok(())
}
