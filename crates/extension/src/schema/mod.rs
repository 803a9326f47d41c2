//! Resolved type table consumed by the document engine.
//!
//! Every structural extension owns exactly one [`TypeDef`]: its shape comes
//! wholesale from that extension, its attribute table is the merge of global
//! and local attribute contributions (see [`builder`]).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::attribute::{AttrValues, AttributeSpec};
use crate::error::InstanceError;
use crate::extension::ExtensionKind;

pub(crate) mod builder;


/// Element of the external representation (HTML-like, owned by the host).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalNode {
	pub tag: String,
	pub attributes: IndexMap<String, String>,
}

impl ExternalNode {
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attributes: IndexMap::new(),
		}
	}

	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}
}

/// Output of a render hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSpec {
	pub tag: String,
	pub attributes: IndexMap<String, String>,
	/// Whether child content renders inside this element.
	pub content_hole: bool,
}

/// Inputs to a render hook.
pub struct RenderProps<'a> {
	/// Raw attribute values of the instance.
	pub values: &'a AttrValues,
	/// External attributes already rendered from the attribute table.
	pub attributes: &'a IndexMap<String, String>,
}

pub type RenderFn = Arc<dyn Fn(&RenderProps<'_>) -> RenderSpec + Send + Sync>;

/// Boxes a render closure.
pub fn render_fn(f: impl Fn(&RenderProps<'_>) -> RenderSpec + Send + Sync + 'static) -> RenderFn {
	Arc::new(f)
}

pub type GetAttrsFn = Arc<dyn Fn(&ExternalNode) -> Option<AttrValues> + Send + Sync>;

/// Recognizes a type in the external representation.
#[derive(Clone)]
pub struct ParseRule {
	pub tag: String,
	/// Returns `None` to reject the element; extra values merge under the
	/// attribute table's own parse results.
	pub get_attrs: Option<GetAttrsFn>,
}

impl ParseRule {
	pub fn tag(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			get_attrs: None,
		}
	}

	pub fn get_attrs(mut self, f: impl Fn(&ExternalNode) -> Option<AttrValues> + Send + Sync + 'static) -> Self {
		self.get_attrs = Some(Arc::new(f));
		self
	}
}

impl fmt::Debug for ParseRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ParseRule")
			.field("tag", &self.tag)
			.field("get_attrs", &self.get_attrs.is_some())
			.finish()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Whitespace {
	#[default]
	Normal,
	Pre,
}

/// Structural fields of a node type.
#[derive(Debug, Clone)]
pub struct NodeShape {
	pub top_node: bool,
	pub content: Option<String>,
	pub marks: Option<String>,
	pub group: Option<String>,
	pub inline: bool,
	pub atom: bool,
	pub selectable: bool,
	pub draggable: bool,
	pub code: bool,
	pub defining: bool,
	pub isolating: bool,
	pub whitespace: Whitespace,
}

impl Default for NodeShape {
	fn default() -> Self {
		Self {
			top_node: false,
			content: None,
			marks: None,
			group: None,
			inline: false,
			atom: false,
			selectable: true,
			draggable: false,
			code: false,
			defining: false,
			isolating: false,
			whitespace: Whitespace::Normal,
		}
	}
}

/// Structural fields of a mark type.
#[derive(Debug, Clone)]
pub struct MarkShape {
	pub inclusive: bool,
	pub excludes: Option<String>,
	pub spanning: bool,
	pub group: Option<String>,
	pub code: bool,
}

impl Default for MarkShape {
	fn default() -> Self {
		Self {
			inclusive: true,
			excludes: None,
			spanning: true,
			group: None,
			code: false,
		}
	}
}

#[derive(Debug, Clone)]
pub enum TypeShape {
	Node(NodeShape),
	Mark(MarkShape),
}

/// One resolved node or mark type.
#[derive(Clone)]
pub struct TypeDef {
	pub name: String,
	/// Index of the owning extension in the resolved order.
	pub owner: usize,
	pub shape: TypeShape,
	pub attributes: IndexMap<String, AttributeSpec>,
	pub parse_rules: Vec<ParseRule>,
	pub render: Option<RenderFn>,
}

impl TypeDef {
	pub fn kind(&self) -> ExtensionKind {
		match self.shape {
			TypeShape::Node(_) => ExtensionKind::Node,
			TypeShape::Mark(_) => ExtensionKind::Mark,
		}
	}

	pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
		self.attributes.get(name)
	}

	/// Builds the attribute values of a new instance.
	///
	/// Supplied values win; missing ones take the default. Fails when a
	/// required attribute has neither, or when a validator rejects a value.
	/// Supplied keys unknown to the table are dropped.
	pub fn create_attrs(&self, supplied: &AttrValues) -> Result<AttrValues, InstanceError> {
		let mut out = AttrValues::new();
		for (name, spec) in &self.attributes {
			let value = match supplied.get(name).or(spec.default.as_ref()) {
				Some(value) => value.clone(),
				None => {
					return Err(InstanceError::MissingRequired {
						type_name: self.name.clone(),
						attribute: name.clone(),
					});
				}
			};
			if let Some(validate) = &spec.validate {
				validate(&value).map_err(|reason| InstanceError::Invalid {
					type_name: self.name.clone(),
					attribute: name.clone(),
					reason,
				})?;
			}
			out.insert(name.clone(), value);
		}
		Ok(out)
	}

	/// Attribute values that survive splitting the instance in two.
	pub fn split_attrs(&self, values: &AttrValues) -> AttrValues {
		values
			.iter()
			.filter(|(name, _)| self.attributes.get(name.as_str()).is_some_and(|spec| spec.keep_on_split))
			.map(|(name, value)| (name.clone(), value.clone()))
			.collect()
	}

	/// Tries the parse rules in order against `element`.
	///
	/// Returns the parsed (not default-filled) values of the first matching
	/// rule, or `None` if no rule accepts the element.
	pub fn parse(&self, element: &ExternalNode) -> Option<AttrValues> {
		self.parse_rules.iter().find_map(|rule| {
			if rule.tag != element.tag {
				return None;
			}
			let mut values = match &rule.get_attrs {
				Some(get_attrs) => get_attrs(element)?,
				None => AttrValues::new(),
			};
			for (name, spec) in &self.attributes {
				match spec.parse_from(name, element) {
					Some(Value::Null) | None => {}
					Some(value) => {
						values.insert(name.clone(), value);
					}
				}
			}
			Some(values)
		})
	}

	/// External attributes rendered from the attribute table.
	pub fn rendered_attributes(&self, values: &AttrValues) -> IndexMap<String, String> {
		self.attributes
			.iter()
			.map(|(name, spec)| spec.render_into(name, values))
			.fold(IndexMap::new(), |acc, next| merge_attributes(&acc, &next))
	}

	/// Renders an instance into the external representation.
	///
	/// Without a render hook the element is named after the type.
	pub fn render(&self, values: &AttrValues) -> RenderSpec {
		let attributes = self.rendered_attributes(values);
		match &self.render {
			Some(render) => render(&RenderProps {
				values,
				attributes: &attributes,
			}),
			None => RenderSpec {
				tag: self.name.clone(),
				attributes,
				content_hole: matches!(&self.shape, TypeShape::Node(shape) if !shape.atom),
			},
		}
	}
}

impl fmt::Debug for TypeDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeDef")
			.field("name", &self.name)
			.field("owner", &self.owner)
			.field("shape", &self.shape)
			.field("attributes", &self.attributes)
			.field("parse_rules", &self.parse_rules)
			.field("render", &self.render.is_some())
			.finish()
	}
}

/// Merges external attribute maps left to right.
///
/// `class` values are joined with a space and `style` values with `"; "`;
/// any other key takes the later value.
pub fn merge_attributes(
	base: &IndexMap<String, String>,
	next: &IndexMap<String, String>,
) -> IndexMap<String, String> {
	let mut out = base.clone();
	for (key, value) in next {
		let joined = match (key.as_str(), out.get(key)) {
			("class", Some(existing)) => {
				let mut classes: Vec<&str> = existing.split_whitespace().collect();
				for class in value.split_whitespace() {
					if !classes.contains(&class) {
						classes.push(class);
					}
				}
				classes.join(" ")
			}
			("style", Some(existing)) => {
				let parts: Vec<&str> = existing
					.split(';')
					.chain(value.split(';'))
					.map(str::trim)
					.filter(|part| !part.is_empty())
					.collect();
				parts.join("; ")
			}
			_ => value.clone(),
		};
		out.insert(key.clone(), joined);
	}
	out
}

/// Node and mark types keyed by name, in resolution order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
	types: IndexMap<String, TypeDef>,
	top_node: Option<String>,
}

impl Schema {
	pub fn get(&self, name: &str) -> Option<&TypeDef> {
		self.types.get(name)
	}

	pub fn node(&self, name: &str) -> Option<&TypeDef> {
		self.get(name).filter(|def| def.kind() == ExtensionKind::Node)
	}

	pub fn mark(&self, name: &str) -> Option<&TypeDef> {
		self.get(name).filter(|def| def.kind() == ExtensionKind::Mark)
	}

	pub fn nodes(&self) -> impl Iterator<Item = &TypeDef> {
		self.types.values().filter(|def| def.kind() == ExtensionKind::Node)
	}

	pub fn marks(&self) -> impl Iterator<Item = &TypeDef> {
		self.types.values().filter(|def| def.kind() == ExtensionKind::Mark)
	}

	pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
		self.types.values()
	}

	/// First node declaring itself the top node.
	pub fn top_node(&self) -> Option<&str> {
		self.top_node.as_deref()
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// Builds attribute values for a new instance of `type_name`.
	pub fn create_attrs(&self, type_name: &str, supplied: &AttrValues) -> Result<AttrValues, InstanceError> {
		self.get(type_name)
			.ok_or_else(|| InstanceError::UnknownType(type_name.to_owned()))?
			.create_attrs(supplied)
	}
}
