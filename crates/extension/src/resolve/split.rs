//! Order-preserving views over the sorted list.

use super::ResolvedExtension;
use crate::extension::ExtensionKind;

/// Partitions of the sorted extension list by kind.
///
/// Every view keeps the sorted order and yields `(index, extension)` pairs
/// where `index` is the position in the full list.
#[derive(Debug, Clone)]
pub struct ExtensionViews<'a> {
	all: &'a [ResolvedExtension],
	nodes: Vec<usize>,
	marks: Vec<usize>,
	plain: Vec<usize>,
	structural: Vec<usize>,
}

impl<'a> ExtensionViews<'a> {
	pub fn split(all: &'a [ResolvedExtension]) -> Self {
		let mut views = Self {
			all,
			nodes: Vec::new(),
			marks: Vec::new(),
			plain: Vec::new(),
			structural: Vec::new(),
		};
		for (index, ext) in all.iter().enumerate() {
			match ext.kind() {
				ExtensionKind::Node => views.nodes.push(index),
				ExtensionKind::Mark => views.marks.push(index),
				ExtensionKind::Plain => views.plain.push(index),
			}
			if ext.kind().is_structural() {
				views.structural.push(index);
			}
		}
		views
	}

	pub fn all(&self) -> impl Iterator<Item = (usize, &'a ResolvedExtension)> + '_ {
		self.all.iter().enumerate()
	}

	pub fn nodes(&self) -> impl Iterator<Item = (usize, &'a ResolvedExtension)> + '_ {
		self.pick(&self.nodes)
	}

	pub fn marks(&self) -> impl Iterator<Item = (usize, &'a ResolvedExtension)> + '_ {
		self.pick(&self.marks)
	}

	/// Behavior-only extensions.
	pub fn plain(&self) -> impl Iterator<Item = (usize, &'a ResolvedExtension)> + '_ {
		self.pick(&self.plain)
	}

	/// Nodes and marks together, in sorted order.
	pub fn structural(&self) -> impl Iterator<Item = (usize, &'a ResolvedExtension)> + '_ {
		self.pick(&self.structural)
	}

	fn pick<'s>(&'s self, indices: &'s [usize]) -> impl Iterator<Item = (usize, &'a ResolvedExtension)> + 's {
		let all = self.all;
		indices.iter().map(move |&index| (index, &all[index]))
	}
}
