//! Attribute aggregation and type-table construction.
//!
//! # Merge order
//!
//! 1. Global attribute contributions of every extension, in resolved order.
//! 2. Local attribute contributions of every structural extension, in
//!    resolved order.
//!
//! Each `{type, name}` registration overwrites the previous one. Priority
//! only matters through the resolved order, so a local attribute always
//! beats a global one for the same pair, whatever their priorities.
//!
//! Shapes are never merged: a type's shape, parse rules and render hook come
//! from the last structural extension registering that type name.

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::{MarkShape, NodeShape, Schema, TypeDef, TypeShape};
use crate::attribute::AttributeSpec;
use crate::extension::{ExtensionKind, field};
use crate::resolve::{ExtensionViews, ResolvedExtension};

/// One `{type, name}` attribute registration.
struct Registration {
	type_name: String,
	name: String,
	spec: AttributeSpec,
}

pub(crate) fn build_schema(views: &ExtensionViews<'_>) -> Schema {
	let mut registrations = collect_global(views);
	registrations.extend(collect_local(views));

	let mut types: IndexMap<String, TypeDef> = IndexMap::new();
	for (index, ext) in views.structural() {
		let Some(def) = type_def(index, ext) else {
			continue;
		};
		if let Some(previous) = types.insert(def.name.clone(), def) {
			trace!(name = %previous.name, previous = previous.owner, owner = index, "type definition replaced");
		}
	}

	for reg in registrations {
		match types.get_mut(&reg.type_name) {
			Some(def) => {
				def.attributes.insert(reg.name, reg.spec);
			}
			None => {
				debug!(type_name = %reg.type_name, attribute = %reg.name, "attribute targets an undeclared type");
			}
		}
	}

	let top_node = types
		.values()
		.find(|def| matches!(&def.shape, TypeShape::Node(shape) if shape.top_node))
		.map(|def| def.name.clone());

	Schema { types, top_node }
}

fn collect_global(views: &ExtensionViews<'_>) -> Vec<Registration> {
	let mut out = Vec::new();
	for (_, ext) in views.all() {
		let Some(globals) = ext.resolve(field::add_global_attributes) else {
			continue;
		};
		for global in globals {
			// Specs are built once per contribution and shared by every target type.
			let specs: Vec<(String, AttributeSpec)> = global
				.attributes
				.into_iter()
				.map(|(name, attribute)| (name, attribute.into_spec()))
				.collect();
			for type_name in &global.types {
				for (name, spec) in &specs {
					out.push(Registration {
						type_name: type_name.clone(),
						name: name.clone(),
						spec: spec.clone(),
					});
				}
			}
		}
	}
	out
}

fn collect_local(views: &ExtensionViews<'_>) -> Vec<Registration> {
	let mut out = Vec::new();
	for (_, ext) in views.structural() {
		let Some(attributes) = ext.resolve(field::add_attributes) else {
			continue;
		};
		for (name, attribute) in attributes {
			out.push(Registration {
				type_name: ext.name().to_owned(),
				name,
				spec: attribute.into_spec(),
			});
		}
	}
	out
}

fn type_def(owner: usize, ext: &ResolvedExtension) -> Option<TypeDef> {
	let shape = match ext.kind() {
		ExtensionKind::Node => TypeShape::Node(node_shape(ext)),
		ExtensionKind::Mark => TypeShape::Mark(mark_shape(ext)),
		ExtensionKind::Plain => return None,
	};

	Some(TypeDef {
		name: ext.name().to_owned(),
		owner,
		shape,
		attributes: IndexMap::new(),
		parse_rules: ext.resolve(field::parse_rules).unwrap_or_default(),
		render: ext.resolve(field::render),
	})
}

fn node_shape(ext: &ResolvedExtension) -> NodeShape {
	let defaults = NodeShape::default();
	NodeShape {
		top_node: ext.resolve(field::top_node).unwrap_or(defaults.top_node),
		content: ext.resolve(field::content),
		marks: ext.resolve(field::marks),
		group: ext.resolve(field::group),
		inline: ext.resolve(field::inline).unwrap_or(defaults.inline),
		atom: ext.resolve(field::atom).unwrap_or(defaults.atom),
		selectable: ext.resolve(field::selectable).unwrap_or(defaults.selectable),
		draggable: ext.resolve(field::draggable).unwrap_or(defaults.draggable),
		code: ext.resolve(field::code).unwrap_or(defaults.code),
		defining: ext.resolve(field::defining).unwrap_or(defaults.defining),
		isolating: ext.resolve(field::isolating).unwrap_or(defaults.isolating),
		whitespace: ext.resolve(field::whitespace).unwrap_or(defaults.whitespace),
	}
}

fn mark_shape(ext: &ResolvedExtension) -> MarkShape {
	let defaults = MarkShape::default();
	MarkShape {
		inclusive: ext.resolve(field::inclusive).unwrap_or(defaults.inclusive),
		excludes: ext.resolve(field::excludes),
		spanning: ext.resolve(field::spanning).unwrap_or(defaults.spanning),
		group: ext.resolve(field::group),
		code: ext.resolve(field::code).unwrap_or(defaults.code),
	}
}
