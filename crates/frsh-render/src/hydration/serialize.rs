//! Island prop serialization.
//!
//! Props are encoded as a JSON array with one entry per island invocation:
//!
//! ```text
//! [{"slots":[{"name":"children","id":0}],"props":{"start":3,"children":{"name":"children","id":0}}}]
//! ```
//!
//! Reactive values become `{"value": <snapshot>}` and slot placeholders become
//! `{"name": <prop name>, "id": <slot id>}`. Any other tree fragment cannot be
//! transmitted and fails the render.

use crate::component::{Node, PropValue, Props};
use crate::error::{RenderError, RenderResult};
use crate::ssr::state::IslandProps;
use serde_json::{Map, Value, json};

/// Serializes the props of every island invocation to a JSON string.
pub fn serialize_island_props(props: &[IslandProps]) -> RenderResult<String> {
	Ok(serde_json::to_string(&island_props_to_value(props)?)?)
}

/// Encodes the props of every island invocation as a JSON value.
pub fn island_props_to_value(props: &[IslandProps]) -> RenderResult<Value> {
	let entries = props
		.iter()
		.enumerate()
		.map(|(index, entry)| {
			let slots = serde_json::to_value(&entry.slots)?;
			let props = encode_props(&entry.props, &index.to_string())?;
			Ok(json!({ "slots": slots, "props": props }))
		})
		.collect::<RenderResult<Vec<_>>>()?;
	Ok(Value::Array(entries))
}

/// Encodes one prop set.
pub fn encode_props(props: &Props, path: &str) -> RenderResult<Value> {
	let mut object = Map::with_capacity(props.len());
	for (name, value) in props.iter() {
		object.insert(name.clone(), encode(value, &format!("{path}.{name}"))?);
	}
	Ok(Value::Object(object))
}

fn encode(value: &PropValue, path: &str) -> RenderResult<Value> {
	match value {
		PropValue::Value(v) => Ok(v.clone()),
		PropValue::Reactive(r) => Ok(json!({ "value": r.peek()? })),
		PropValue::Node(Node::Slot(slot)) => Ok(json!({ "name": slot.name(), "id": slot.id() })),
		PropValue::Node(node) => Err(RenderError::UnserializableProp {
			path: path.to_string(),
			kind: node.kind_name(),
		}),
		PropValue::List(items) => items
			.iter()
			.enumerate()
			.map(|(i, item)| encode(item, &format!("{path}.{i}")))
			.collect::<RenderResult<Vec<_>>>()
			.map(Value::Array),
		PropValue::Map(entries) => {
			let mut object = Map::with_capacity(entries.len());
			for (name, item) in entries {
				object.insert(name.clone(), encode(item, &format!("{path}.{name}"))?);
			}
			Ok(Value::Object(object))
		}
	}
}
