//! Attribute contributions and their filled-in specs.
//!
//! Extensions contribute [`Attribute`]s with any subset of fields set. The
//! aggregator fills the omitted ones and produces one [`AttributeSpec`] per
//! `{type, name}` pair.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::schema::ExternalNode;

/// Attribute values of one node or mark instance.
pub type AttrValues = Map<String, Value>;

/// Attributes keyed by name, in declaration order.
pub type AttributeMap = IndexMap<String, Attribute>;

/// Reads an attribute value from the external representation.
pub type ParseAttrFn = Arc<dyn Fn(&ExternalNode) -> Option<Value> + Send + Sync>;

/// Renders an instance's attributes into external attributes.
pub type RenderAttrFn = Arc<dyn Fn(&AttrValues) -> IndexMap<String, String> + Send + Sync>;

/// Checks a supplied value at instance construction.
pub type ValidateFn = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Default value source of an attribute contribution.
#[derive(Clone, Default)]
pub enum AttrDefault {
	#[default]
	Omitted,
	Value(Value),
	/// Invoked once, at aggregation time.
	Factory(Arc<dyn Fn() -> Value + Send + Sync>),
}

/// One attribute as contributed by an extension.
#[derive(Clone, Default)]
pub struct Attribute {
	default: AttrDefault,
	rendered: Option<bool>,
	parse: Option<ParseAttrFn>,
	render: Option<RenderAttrFn>,
	keep_on_split: Option<bool>,
	required: bool,
	validate: Option<ValidateFn>,
}

impl Attribute {
	pub fn new() -> Self {
		<Self as Default>::default()
	}

	/// Attribute with a fixed default.
	pub fn with_default(value: impl Into<Value>) -> Self {
		Self::new().default(value)
	}

	pub fn default(mut self, value: impl Into<Value>) -> Self {
		self.default = AttrDefault::Value(value.into());
		self
	}

	/// Default computed once when the schema is built.
	pub fn default_with(mut self, factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
		self.default = AttrDefault::Factory(Arc::new(factory));
		self
	}

	pub fn rendered(mut self, rendered: bool) -> Self {
		self.rendered = Some(rendered);
		self
	}

	pub fn parse(mut self, f: impl Fn(&ExternalNode) -> Option<Value> + Send + Sync + 'static) -> Self {
		self.parse = Some(Arc::new(f));
		self
	}

	pub fn render(
		mut self,
		f: impl Fn(&AttrValues) -> IndexMap<String, String> + Send + Sync + 'static,
	) -> Self {
		self.render = Some(Arc::new(f));
		self
	}

	pub fn keep_on_split(mut self, keep: bool) -> Self {
		self.keep_on_split = Some(keep);
		self
	}

	/// Instances must supply a value when no default is declared.
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn validate(mut self, f: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static) -> Self {
		self.validate = Some(Arc::new(f));
		self
	}

	/// Fills omitted fields and evaluates the default factory.
	///
	/// Omitted defaults become `null`, except on required attributes, which
	/// are left without a default.
	pub fn into_spec(self) -> AttributeSpec {
		let default = match self.default {
			AttrDefault::Value(value) => Some(value),
			AttrDefault::Factory(factory) => Some(factory()),
			AttrDefault::Omitted if self.required => None,
			AttrDefault::Omitted => Some(Value::Null),
		};

		AttributeSpec {
			default,
			rendered: self.rendered.unwrap_or(true),
			parse: self.parse,
			render: self.render,
			keep_on_split: self.keep_on_split.unwrap_or(true),
			required: self.required,
			validate: self.validate,
		}
	}
}

impl fmt::Debug for Attribute {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let default = match &self.default {
			AttrDefault::Omitted => None,
			AttrDefault::Value(value) => Some(value.to_string()),
			AttrDefault::Factory(_) => Some("<factory>".to_owned()),
		};
		f.debug_struct("Attribute")
			.field("default", &default)
			.field("rendered", &self.rendered)
			.field("keep_on_split", &self.keep_on_split)
			.field("required", &self.required)
			.finish_non_exhaustive()
	}
}

/// Attributes one extension adds to types declared by others.
#[derive(Debug, Clone, Default)]
pub struct GlobalAttributes {
	pub types: Vec<String>,
	pub attributes: AttributeMap,
}

impl GlobalAttributes {
	pub fn new<I, S>(types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			types: types.into_iter().map(Into::into).collect(),
			attributes: AttributeMap::new(),
		}
	}

	pub fn attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
		self.attributes.insert(name.into(), attribute);
		self
	}
}

/// A fully specified attribute in the resolved schema.
#[derive(Clone)]
pub struct AttributeSpec {
	/// `None` only for required attributes declared without a default.
	pub default: Option<Value>,
	pub rendered: bool,
	pub parse: Option<ParseAttrFn>,
	pub render: Option<RenderAttrFn>,
	pub keep_on_split: bool,
	pub required: bool,
	pub validate: Option<ValidateFn>,
}

impl AttributeSpec {
	/// Reads this attribute from `element`.
	///
	/// Without a parse function the element attribute of the same name is
	/// read and coerced with [`from_string`].
	pub fn parse_from(&self, name: &str, element: &ExternalNode) -> Option<Value> {
		match &self.parse {
			Some(parse) => parse(element),
			None => element.attributes.get(name).map(|raw| from_string(raw)),
		}
	}

	/// External attributes for this attribute's value in `values`.
	pub fn render_into(&self, name: &str, values: &AttrValues) -> IndexMap<String, String> {
		if !self.rendered {
			return IndexMap::new();
		}
		if let Some(render) = &self.render {
			return render(values);
		}
		match values.get(name) {
			None | Some(Value::Null) => IndexMap::new(),
			Some(Value::String(s)) => IndexMap::from([(name.to_owned(), s.clone())]),
			Some(other) => IndexMap::from([(name.to_owned(), other.to_string())]),
		}
	}
}

impl PartialEq for AttributeSpec {
	/// Function fields compare by identity.
	fn eq(&self, other: &Self) -> bool {
		fn same<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
			match (a, b) {
				(Some(a), Some(b)) => Arc::ptr_eq(a, b),
				(None, None) => true,
				_ => false,
			}
		}
		self.default == other.default
			&& self.rendered == other.rendered
			&& self.keep_on_split == other.keep_on_split
			&& self.required == other.required
			&& same(&self.parse, &other.parse)
			&& same(&self.render, &other.render)
			&& same(&self.validate, &other.validate)
	}
}

impl fmt::Debug for AttributeSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AttributeSpec")
			.field("default", &self.default)
			.field("rendered", &self.rendered)
			.field("keep_on_split", &self.keep_on_split)
			.field("required", &self.required)
			.field("parse", &self.parse.is_some())
			.field("render", &self.render.is_some())
			.field("validate", &self.validate.is_some())
			.finish()
	}
}

/// Coerces a raw external attribute string.
///
/// `"true"`/`"false"` become booleans and numeric strings become numbers;
/// everything else stays a string.
pub fn from_string(raw: &str) -> Value {
	match raw {
		"true" => Value::Bool(true),
		"false" => Value::Bool(false),
		_ => {
			if let Ok(n) = raw.parse::<i64>() {
				return Value::from(n);
			}
			match raw.parse::<f64>() {
				Ok(n) if n.is_finite() && !raw.trim().is_empty() => Value::from(n),
				_ => Value::String(raw.to_owned()),
			}
		}
	}
}
