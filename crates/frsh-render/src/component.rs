//! Component system for the render pipeline.
//!
//! - **Node enum**: the tree component bodies return
//! - **ComponentType**: a named render function with identity, sync or async
//! - **Props**: ordered arguments holding data, tree fragments or reactive values
//!
//! ```
//! use frsh_render::component::{ComponentType, Node};
//!
//! let greeting = ComponentType::new("Greeting", |props, _cx| {
//!     let name = props.get_str("name").unwrap_or("World").to_string();
//!     Ok(Node::element("p").child(format!("Hello, {name}!")).into())
//! });
//! let node = Node::component(&greeting).prop("name", "frsh");
//! assert_eq!(node.component_type().name(), "Greeting");
//! ```

mod node;
mod props;
mod r#trait;

pub use node::{
	ComponentNode, Element, IntoNode, Key, Node, PartialMode, PartialNode, SlotNode,
};
pub use props::{CHILDREN_PROP, PropValue, Props};
pub use r#trait::{Component, ComponentContext, ComponentType, RenderFuture};
