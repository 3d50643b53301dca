//! Component props.

use super::node::{IntoNode, Node};
use crate::reactive::{ReactiveValue, Signal};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Name of the prop holding a component's children.
pub const CHILDREN_PROP: &str = "children";

/// A single prop value.
///
/// Props are plain data, tree fragments, or reactive containers. Only the
/// first and last survive serialization as-is; tree fragments passed to an
/// island become slots.
#[derive(Clone)]
pub enum PropValue {
	/// Structured data.
	Value(serde_json::Value),
	/// A renderable tree fragment.
	Node(Node),
	/// A reactive container, serialized as a snapshot.
	Reactive(Arc<dyn ReactiveValue>),
	/// A list of prop values.
	List(Vec<PropValue>),
	/// A mapping of prop values.
	Map(IndexMap<String, PropValue>),
}

impl PropValue {
	/// Converts any serializable value into a data prop.
	pub fn json(value: impl Serialize) -> serde_json::Result<Self> {
		Ok(Self::Value(serde_json::to_value(value)?))
	}

	/// Returns the tree fragment held by this prop.
	pub fn as_node(&self) -> Option<&Node> {
		match self {
			PropValue::Node(node) => Some(node),
			_ => None,
		}
	}

	/// Returns the structured data held by this prop.
	pub fn as_value(&self) -> Option<&serde_json::Value> {
		match self {
			PropValue::Value(value) => Some(value),
			_ => None,
		}
	}

	/// Returns the string held by this prop.
	pub fn as_str(&self) -> Option<&str> {
		self.as_value().and_then(serde_json::Value::as_str)
	}

	/// Returns the reactive container held by this prop.
	pub fn as_reactive(&self) -> Option<&Arc<dyn ReactiveValue>> {
		match self {
			PropValue::Reactive(value) => Some(value),
			_ => None,
		}
	}

	/// True when this prop is a tree fragment.
	pub fn is_node(&self) -> bool {
		matches!(self, PropValue::Node(_))
	}
}

impl std::fmt::Debug for PropValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			PropValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
			PropValue::Node(n) => f.debug_tuple("Node").field(n).finish(),
			PropValue::Reactive(r) => f.debug_tuple("Reactive").field(&r.peek().ok()).finish(),
			PropValue::List(l) => f.debug_tuple("List").field(l).finish(),
			PropValue::Map(m) => f.debug_tuple("Map").field(m).finish(),
		}
	}
}

impl From<serde_json::Value> for PropValue {
	fn from(value: serde_json::Value) -> Self {
		Self::Value(value)
	}
}

impl From<Node> for PropValue {
	fn from(node: Node) -> Self {
		Self::Node(node)
	}
}

impl From<super::node::Element> for PropValue {
	fn from(el: super::node::Element) -> Self {
		Self::Node(el.into_node())
	}
}

impl From<super::node::ComponentNode> for PropValue {
	fn from(c: super::node::ComponentNode) -> Self {
		Self::Node(c.into_node())
	}
}

impl From<super::node::PartialNode> for PropValue {
	fn from(p: super::node::PartialNode) -> Self {
		Self::Node(p.into_node())
	}
}

impl From<Vec<PropValue>> for PropValue {
	fn from(values: Vec<PropValue>) -> Self {
		Self::List(values)
	}
}

impl From<IndexMap<String, PropValue>> for PropValue {
	fn from(values: IndexMap<String, PropValue>) -> Self {
		Self::Map(values)
	}
}

impl<T> From<Signal<T>> for PropValue
where
	T: Serialize + Send + Sync + 'static,
{
	fn from(signal: Signal<T>) -> Self {
		Self::Reactive(Arc::new(signal))
	}
}

macro_rules! prop_from_json {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for PropValue {
				fn from(value: $ty) -> Self {
					Self::Value(serde_json::Value::from(value))
				}
			}
		)*
	};
}

prop_from_json!(&str, String, bool, i32, i64, u32, u64, usize, f64);

/// Ordered, named component arguments.
#[derive(Debug, Clone, Default)]
pub struct Props {
	values: IndexMap<String, PropValue>,
}

impl Props {
	/// Creates an empty prop set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
		self.insert(name, value);
		self
	}

	/// Inserts or replaces a prop, keeping its original position.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
		self.values.insert(name.into(), value.into());
	}

	/// Returns a prop.
	pub fn get(&self, name: &str) -> Option<&PropValue> {
		self.values.get(name)
	}

	/// Returns a prop mutably.
	pub fn get_mut(&mut self, name: &str) -> Option<&mut PropValue> {
		self.values.get_mut(name)
	}

	/// Returns a string prop.
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.get(name).and_then(PropValue::as_str)
	}

	/// Returns a tree-valued prop.
	pub fn get_node(&self, name: &str) -> Option<&Node> {
		self.get(name).and_then(PropValue::as_node)
	}

	/// Deserializes a data prop.
	pub fn get_as<T: serde::de::DeserializeOwned>(&self, name: &str) -> Option<T> {
		self.get(name)
			.and_then(PropValue::as_value)
			.and_then(|v| serde_json::from_value(v.clone()).ok())
	}

	/// Returns the `children` prop rendered as a node, or an empty node.
	pub fn children(&self) -> Node {
		self.get_node(CHILDREN_PROP).cloned().unwrap_or(Node::Empty)
	}

	/// Appends a child to the `children` prop, turning it into a fragment
	/// when it already holds content.
	pub fn push_child(&mut self, child: Node) {
		match self.values.get_mut(CHILDREN_PROP) {
			Some(PropValue::Node(Node::Fragment(children))) => children.push(child),
			Some(PropValue::Node(existing)) => {
				let previous = std::mem::replace(existing, Node::Empty);
				*existing = Node::Fragment(vec![previous, child]);
			}
			_ => self.insert(CHILDREN_PROP, child),
		}
	}

	/// Iterates over props in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &PropValue)> {
		self.values.iter()
	}

	/// Iterates mutably over props in insertion order.
	pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut PropValue)> {
		self.values.iter_mut()
	}

	/// Number of props.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// True when there are no props.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl FromIterator<(String, PropValue)> for Props {
	fn from_iter<I: IntoIterator<Item = (String, PropValue)>>(iter: I) -> Self {
		Self {
			values: iter.into_iter().collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_insert_keeps_order() {
		let props = Props::new().with("b", 1).with("a", "x").with("b", 2);
		let names: Vec<_> = props.iter().map(|(k, _)| k.as_str()).collect();
		assert_eq!(names, ["b", "a"]);
		assert_eq!(props.get_as::<i32>("b"), Some(2));
	}

	#[rstest]
	fn test_push_child_builds_fragment() {
		let mut props = Props::new();
		props.push_child(Node::text("a"));
		assert!(matches!(props.get_node(CHILDREN_PROP), Some(Node::Text(_))));
		props.push_child(Node::text("b"));
		props.push_child(Node::text("c"));
		let Some(Node::Fragment(children)) = props.get_node(CHILDREN_PROP) else {
			panic!("expected fragment");
		};
		assert_eq!(children.len(), 3);
	}

	#[rstest]
	fn test_children_defaults_to_empty() {
		assert!(matches!(Props::new().children(), Node::Empty));
	}

	#[rstest]
	fn test_signal_prop_is_reactive() {
		let value = PropValue::from(Signal::new(3));
		assert_eq!(
			value.as_reactive().unwrap().peek().unwrap(),
			serde_json::json!(3)
		);
	}

	#[rstest]
	fn test_json_constructor() {
		#[derive(Serialize)]
		struct Point {
			x: i32,
		}
		let value = PropValue::json(Point { x: 4 }).unwrap();
		assert_eq!(value.as_value(), Some(&serde_json::json!({"x": 4})));
	}
}
