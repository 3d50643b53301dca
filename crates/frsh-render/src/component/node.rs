//! IntoNode trait and Node enum: the tree handed to the renderer.

use super::props::{PropValue, Props};
use super::r#trait::ComponentType;
use crate::ssr::classify::Replacement;
use std::borrow::Cow;

/// Identity key of a node among its siblings.
///
/// Any displayable value can be a key; it is stringified once on
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(String);

impl Key {
	/// Creates a key from anything displayable.
	pub fn new(value: impl std::fmt::Display) -> Self {
		Self(value.to_string())
	}

	/// Returns the stringified key.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for Key {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

macro_rules! key_from {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Key {
				fn from(value: $ty) -> Self {
					Self::new(value)
				}
			}
		)*
	};
}

key_from!(&str, String, i32, i64, u32, u64, usize);

/// A unified representation of renderable content.
///
/// `Node` is what component bodies return. Function-typed nodes
/// ([`Node::Component`] and [`Node::Partial`]) are expanded by the renderer;
/// everything else maps directly to markup.
#[derive(Debug, Clone)]
pub enum Node {
	/// An HTML element.
	Element(Element),
	/// A text node (escaped on output).
	Text(Cow<'static, str>),
	/// Several nodes without a wrapper element.
	Fragment(Vec<Node>),
	/// A component invocation.
	Component(ComponentNode),
	/// A named, independently replaceable page region.
	Partial(PartialNode),
	/// A deferred child placeholder created for island props.
	Slot(SlotNode),
	/// An HTML comment. Used for hydration markers.
	Comment(Cow<'static, str>),
	/// Pre-escaped markup written verbatim.
	Raw(Cow<'static, str>),
	/// Position of the client bootstrap (slot templates and runtime script).
	Bootstrap,
	/// Renders nothing.
	Empty,
}

impl Node {
	/// Creates an element builder.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> Element {
		Element::new(tag)
	}

	/// Creates a text node.
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(content.into())
	}

	/// Creates a fragment.
	pub fn fragment(children: impl IntoIterator<Item = impl IntoNode>) -> Self {
		Self::Fragment(children.into_iter().map(|c| c.into_node()).collect())
	}

	/// Creates a component invocation with empty props.
	pub fn component(ty: &ComponentType) -> ComponentNode {
		ComponentNode::new(ty.clone())
	}

	/// Creates a partial region.
	pub fn partial(name: impl Into<String>) -> PartialNode {
		PartialNode::new(name)
	}

	/// Creates raw, already escaped markup.
	pub fn raw(html: impl Into<Cow<'static, str>>) -> Self {
		Self::Raw(html.into())
	}

	/// Creates an empty node.
	pub fn empty() -> Self {
		Self::Empty
	}

	/// True for nodes the renderer expands by invoking a body.
	pub fn is_function_typed(&self) -> bool {
		matches!(self, Node::Component(_) | Node::Partial(_))
	}

	/// The explicit identity key, if any.
	pub fn key(&self) -> Option<&Key> {
		match self {
			Node::Element(el) => el.key.as_ref(),
			Node::Component(c) => c.key.as_ref(),
			Node::Partial(p) => p.key.as_ref(),
			_ => None,
		}
	}

	/// Short description used in logs and error messages.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Node::Element(_) => "element",
			Node::Text(_) => "text",
			Node::Fragment(_) => "fragment",
			Node::Component(_) => "component",
			Node::Partial(_) => "partial",
			Node::Slot(_) => "slot",
			Node::Comment(_) => "comment",
			Node::Raw(_) => "raw html",
			Node::Bootstrap => "bootstrap",
			Node::Empty => "empty",
		}
	}
}

/// Represents an HTML element in the node tree.
#[derive(Debug, Clone)]
pub struct Element {
	tag: Cow<'static, str>,
	attrs: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	children: Vec<Node>,
	key: Option<Key>,
	is_void: bool,
}

impl Element {
	/// Creates a new element.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		let tag = tag.into();
		let is_void = matches!(
			tag.as_ref(),
			"area"
				| "base" | "br"
				| "col" | "embed"
				| "hr" | "img"
				| "input" | "link"
				| "meta" | "source"
				| "track" | "wbr"
		);
		Self {
			tag,
			attrs: Vec::new(),
			children: Vec::new(),
			key: None,
			is_void,
		}
	}

	/// Adds an attribute.
	pub fn attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Adds a child node.
	pub fn child(mut self, child: impl IntoNode) -> Self {
		self.children.push(child.into_node());
		self
	}

	/// Adds multiple child nodes.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoNode>) -> Self {
		self.children
			.extend(children.into_iter().map(|c| c.into_node()));
		self
	}

	/// Sets the identity key.
	pub fn key(mut self, key: impl Into<Key>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Returns the tag name.
	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	/// Returns the attributes in insertion order.
	pub fn attrs(&self) -> &[(Cow<'static, str>, Cow<'static, str>)] {
		&self.attrs
	}

	/// Returns the value of the first attribute called `name`.
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_ref())
	}

	/// Returns true when the attribute is present.
	pub fn has_attr(&self, name: &str) -> bool {
		self.attrs.iter().any(|(n, _)| n == name)
	}

	/// Sets an attribute, replacing an existing value.
	pub fn set_attr(
		&mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) {
		let name = name.into();
		let value = value.into();
		match self.attrs.iter_mut().find(|(n, _)| *n == name) {
			Some(slot) => slot.1 = value,
			None => self.attrs.push((name, value)),
		}
	}

	/// Returns the child nodes.
	pub fn child_nodes(&self) -> &[Node] {
		&self.children
	}

	/// Returns the child nodes mutably.
	pub fn child_nodes_mut(&mut self) -> &mut Vec<Node> {
		&mut self.children
	}

	/// Returns the identity key.
	pub fn key_ref(&self) -> Option<&Key> {
		self.key.as_ref()
	}

	/// Returns whether this is a void element.
	pub fn is_void(&self) -> bool {
		self.is_void
	}
}

/// A component invocation: a type plus its arguments.
#[derive(Debug, Clone)]
pub struct ComponentNode {
	pub(crate) ty: ComponentType,
	pub(crate) props: Props,
	pub(crate) key: Option<Key>,
	pub(crate) replacement: Option<Replacement>,
	pub(crate) classified: bool,
}

impl ComponentNode {
	/// Creates an invocation with empty props.
	pub fn new(ty: ComponentType) -> Self {
		Self {
			ty,
			props: Props::new(),
			key: None,
			replacement: None,
			classified: false,
		}
	}

	/// Sets a prop.
	pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
		self.props.insert(name, value);
		self
	}

	/// Replaces all props.
	pub fn props(mut self, props: Props) -> Self {
		self.props = props;
		self
	}

	/// Appends to the `children` prop.
	pub fn child(mut self, child: impl IntoNode) -> Self {
		self.props.push_child(child.into_node());
		self
	}

	/// Sets the identity key.
	pub fn key(mut self, key: impl Into<Key>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Returns the component type.
	pub fn component_type(&self) -> &ComponentType {
		&self.ty
	}

	/// Returns the invocation arguments.
	pub fn get_props(&self) -> &Props {
		&self.props
	}

	/// Returns the invocation arguments mutably.
	pub fn get_props_mut(&mut self) -> &mut Props {
		&mut self.props
	}

	/// Returns the identity key.
	pub fn key_ref(&self) -> Option<&Key> {
		self.key.as_ref()
	}

	/// True once the classifier has processed this invocation.
	pub fn is_classified(&self) -> bool {
		self.classified || self.replacement.is_some()
	}
}

/// How the client merges a partial's new content into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialMode {
	/// Replace the existing content (default).
	#[default]
	Replace,
	/// Append after the existing content.
	Append,
	/// Insert before the existing content.
	Prepend,
}

impl PartialMode {
	/// Numeric code used in the partial marker payload.
	pub fn code(self) -> u8 {
		match self {
			PartialMode::Replace => 0,
			PartialMode::Append => 1,
			PartialMode::Prepend => 2,
		}
	}
}

/// A partial region.
#[derive(Debug, Clone)]
pub struct PartialNode {
	pub(crate) name: String,
	pub(crate) mode: PartialMode,
	pub(crate) children: Vec<Node>,
	pub(crate) key: Option<Key>,
}

impl PartialNode {
	/// Creates a partial region in replace mode.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			mode: PartialMode::Replace,
			children: Vec::new(),
			key: None,
		}
	}

	/// Sets the update mode.
	pub fn mode(mut self, mode: PartialMode) -> Self {
		self.mode = mode;
		self
	}

	/// Adds a child node.
	pub fn child(mut self, child: impl IntoNode) -> Self {
		self.children.push(child.into_node());
		self
	}

	/// Adds multiple child nodes.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoNode>) -> Self {
		self.children
			.extend(children.into_iter().map(|c| c.into_node()));
		self
	}

	/// Sets the identity key.
	pub fn key(mut self, key: impl Into<Key>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Returns the partial name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the update mode.
	pub fn update_mode(&self) -> PartialMode {
		self.mode
	}
}

/// A placeholder for a tree-valued island prop.
///
/// Created by the classifier only; the content lives in the render state.
/// When an island places the placeholder in its output the content is
/// rendered inline between slot markers; otherwise it is rendered into a
/// `<template>` at the end of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotNode {
	pub(crate) id: usize,
	pub(crate) name: String,
}

impl SlotNode {
	/// Slot id (index into the render's slot table).
	pub fn id(&self) -> usize {
		self.id
	}

	/// Name of the prop this slot replaced.
	pub fn name(&self) -> &str {
		&self.name
	}
}

/// Trait for types that can be converted into a Node.
pub trait IntoNode {
	/// Converts self into a Node.
	fn into_node(self) -> Node;
}

impl IntoNode for Node {
	fn into_node(self) -> Node {
		self
	}
}

impl IntoNode for Element {
	fn into_node(self) -> Node {
		Node::Element(self)
	}
}

impl IntoNode for ComponentNode {
	fn into_node(self) -> Node {
		Node::Component(self)
	}
}

impl IntoNode for PartialNode {
	fn into_node(self) -> Node {
		Node::Partial(self)
	}
}

impl From<Element> for Node {
	fn from(el: Element) -> Self {
		Node::Element(el)
	}
}

impl From<ComponentNode> for Node {
	fn from(c: ComponentNode) -> Self {
		Node::Component(c)
	}
}

impl From<PartialNode> for Node {
	fn from(p: PartialNode) -> Self {
		Node::Partial(p)
	}
}

impl IntoNode for String {
	fn into_node(self) -> Node {
		Node::Text(Cow::Owned(self))
	}
}

impl IntoNode for &'static str {
	fn into_node(self) -> Node {
		Node::Text(Cow::Borrowed(self))
	}
}

impl<T: IntoNode> IntoNode for Option<T> {
	fn into_node(self) -> Node {
		match self {
			Some(v) => v.into_node(),
			None => Node::Empty,
		}
	}
}

impl<T: IntoNode> IntoNode for Vec<T> {
	fn into_node(self) -> Node {
		Node::Fragment(self.into_iter().map(|v| v.into_node()).collect())
	}
}

impl IntoNode for () {
	fn into_node(self) -> Node {
		Node::Empty
	}
}

impl<A: IntoNode, B: IntoNode> IntoNode for (A, B) {
	fn into_node(self) -> Node {
		Node::Fragment(vec![self.0.into_node(), self.1.into_node()])
	}
}

impl<A: IntoNode, B: IntoNode, C: IntoNode> IntoNode for (A, B, C) {
	fn into_node(self) -> Node {
		Node::Fragment(vec![
			self.0.into_node(),
			self.1.into_node(),
			self.2.into_node(),
		])
	}
}
