//! Lifecycle interception.
//!
//! The walker reports five events for every tree node it visits:
//!
//! | Event | When | Built-in behavior |
//! |-------|------|-------------------|
//! | `node_created` | node reached | record owner, rewrite anchors and `<body>`, wrap partial children |
//! | `diff_start` | before rendering | classify components and partials, track document tags, emit element keys |
//! | `render_invoked` | before a body runs | push the node on the owner stack |
//! | `hook_invoked` | body and children done | pop the owner stack, close partials |
//! | `diff_end` | node finished | none |
//!
//! The built-in [`Interceptor`] always runs first. Application hooks
//! registered through a [`HookChain`] run after it, in registration order,
//! and observe every event. An error returned by a hook aborts the render.

use super::active_url::set_active_url;
use super::classify::{classify_component, enter_partial};
use super::markers::{MarkerKind, partial_payload, wrap_with_marker};
use super::state::{NodeId, RenderState};
use crate::component::Node;
use crate::error::RenderResult;
use crate::hydration::IslandRegistry;
use std::sync::Arc;

/// Attribute carrying element keys inside partials and islands.
pub const DATA_FRESH_KEY: &str = "data-frsh-key";

/// Attribute enabling client-side navigation below an element.
pub const CLIENT_NAV_ATTR: &str = "f-client-nav";

/// What a hook can see about the node an event is fired for.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
	/// Node the event is fired for.
	pub id: NodeId,
	/// Nearest enclosing function-typed node.
	pub owner: Option<NodeId>,
	/// Request path of the render.
	pub path: &'a str,
	/// Number of open partial regions.
	pub partial_depth: usize,
}

/// Observer of the render lifecycle.
///
/// All methods default to doing nothing.
///
/// # Example
///
/// ```
/// use frsh_render::component::Node;
/// use frsh_render::error::RenderResult;
/// use frsh_render::ssr::{HookContext, LifecycleHook};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct CountElements(AtomicUsize);
///
/// impl LifecycleHook for CountElements {
///     fn node_created(&self, node: &mut Node, _cx: &HookContext<'_>) -> RenderResult<()> {
///         if matches!(node, Node::Element(_)) {
///             self.0.fetch_add(1, Ordering::Relaxed);
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait LifecycleHook: Send + Sync {
	/// A node was reached. The node may be rewritten.
	fn node_created(&self, node: &mut Node, cx: &HookContext<'_>) -> RenderResult<()> {
		let _ = (node, cx);
		Ok(())
	}

	/// The node is about to be rendered. The node may be rewritten.
	fn diff_start(&self, node: &mut Node, cx: &HookContext<'_>) -> RenderResult<()> {
		let _ = (node, cx);
		Ok(())
	}

	/// A component or partial body is about to run.
	fn render_invoked(&self, node: &Node, cx: &HookContext<'_>) -> RenderResult<()> {
		let _ = (node, cx);
		Ok(())
	}

	/// A component or partial body and its output have been rendered.
	fn hook_invoked(&self, node: &Node, cx: &HookContext<'_>) -> RenderResult<()> {
		let _ = (node, cx);
		Ok(())
	}

	/// The node and its subtree have been rendered.
	fn diff_end(&self, node: &Node, cx: &HookContext<'_>) -> RenderResult<()> {
		let _ = (node, cx);
		Ok(())
	}
}

/// Ordered list of application hooks.
#[derive(Clone, Default)]
pub struct HookChain {
	hooks: Vec<Arc<dyn LifecycleHook>>,
}

impl HookChain {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a hook.
	pub fn push(&mut self, hook: Arc<dyn LifecycleHook>) {
		self.hooks.push(hook);
	}

	/// Number of hooks.
	pub fn len(&self) -> usize {
		self.hooks.len()
	}

	/// True when no hook is registered.
	pub fn is_empty(&self) -> bool {
		self.hooks.is_empty()
	}

	fn node_created(&self, node: &mut Node, cx: &HookContext<'_>) -> RenderResult<()> {
		self.hooks.iter().try_for_each(|hook| hook.node_created(node, cx))
	}

	fn diff_start(&self, node: &mut Node, cx: &HookContext<'_>) -> RenderResult<()> {
		self.hooks.iter().try_for_each(|hook| hook.diff_start(node, cx))
	}

	fn render_invoked(&self, node: &Node, cx: &HookContext<'_>) -> RenderResult<()> {
		self.hooks.iter().try_for_each(|hook| hook.render_invoked(node, cx))
	}

	fn hook_invoked(&self, node: &Node, cx: &HookContext<'_>) -> RenderResult<()> {
		self.hooks.iter().try_for_each(|hook| hook.hook_invoked(node, cx))
	}

	fn diff_end(&self, node: &Node, cx: &HookContext<'_>) -> RenderResult<()> {
		self.hooks.iter().try_for_each(|hook| hook.diff_end(node, cx))
	}
}

impl std::fmt::Debug for HookChain {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HookChain")
			.field("len", &self.hooks.len())
			.finish()
	}
}

/// The built-in interceptor, followed by the application hooks.
pub(crate) struct Interceptor<'r> {
	registry: &'r IslandRegistry,
	hooks: &'r HookChain,
	path: &'r str,
}

impl<'r> Interceptor<'r> {
	pub(crate) fn new(registry: &'r IslandRegistry, hooks: &'r HookChain, path: &'r str) -> Self {
		Self {
			registry,
			hooks,
			path,
		}
	}

	fn context(&self, state: &RenderState, id: NodeId) -> HookContext<'r> {
		HookContext {
			id,
			owner: state.owner_of(id),
			path: self.path,
			partial_depth: state.partial_depth,
		}
	}

	pub(crate) fn node_created(
		&self,
		state: &mut RenderState,
		node: &mut Node,
	) -> RenderResult<NodeId> {
		let id = state.create_node(false);

		match node {
			Node::Element(el) => {
				if el.tag_name() == "a" {
					set_active_url(el, self.path);
				} else if el.tag_name() == "body" {
					el.child_nodes_mut().push(Node::Bootstrap);
				}
				if let Some(value) = el.get_attr(CLIENT_NAV_ATTR) {
					let value = if value == "false" { "false" } else { "true" };
					el.set_attr(CLIENT_NAV_ATTR, value);
				}
			}
			Node::Partial(partial) => {
				let payload = partial_payload(&partial.name, partial.mode, partial.key.as_ref());
				let children = std::mem::take(&mut partial.children);
				partial.children = vec![wrap_with_marker(
					Node::Fragment(children),
					MarkerKind::Partial,
					&payload,
				)];
			}
			_ => {}
		}

		tracing::trace!(id = id.index(), kind = node.kind_name(), "node created");
		self.hooks.node_created(node, &self.context(state, id))?;

		// Hooks may have swapped the node.
		let island = matches!(node, Node::Component(c) if self.registry.contains(&c.ty));
		state.set_island(id, island);
		Ok(id)
	}

	pub(crate) fn diff_start(
		&self,
		state: &mut RenderState,
		id: NodeId,
		node: &mut Node,
	) -> RenderResult<()> {
		match node {
			Node::Component(component) => {
				classify_component(state, self.registry, id, component);
			}
			Node::Partial(partial) => enter_partial(state, id, partial)?,
			Node::Element(el) => {
				match el.tag_name() {
					"html" => state.rendered_html_tag = true,
					"head" => state.rendered_html_head = true,
					"body" => state.rendered_html_body = true,
					_ => {}
				}
				if let Some(key) = el.key_ref().cloned() {
					if state.partial_depth > 0 || state.has_island_owner(id) {
						el.set_attr(DATA_FRESH_KEY, key.to_string());
					}
				}
			}
			_ => {}
		}

		self.hooks.diff_start(node, &self.context(state, id))
	}

	pub(crate) fn render_invoked(
		&self,
		state: &mut RenderState,
		id: NodeId,
		node: &Node,
	) -> RenderResult<()> {
		if node.is_function_typed() {
			state.push_owner(Some(id));
		}
		tracing::trace!(id = id.index(), kind = node.kind_name(), "render invoked");
		self.hooks.render_invoked(node, &self.context(state, id))
	}

	pub(crate) fn hook_invoked(
		&self,
		state: &mut RenderState,
		id: NodeId,
		node: &Node,
	) -> RenderResult<()> {
		if node.is_function_typed() {
			state.pop_owner();
		}
		if matches!(node, Node::Partial(_)) {
			state.partial_depth = state.partial_depth.saturating_sub(1);
		}
		self.hooks.hook_invoked(node, &self.context(state, id))
	}

	pub(crate) fn diff_end(&self, state: &RenderState, id: NodeId, node: &Node) -> RenderResult<()> {
		tracing::trace!(id = id.index(), kind = node.kind_name(), "diff end");
		self.hooks.diff_end(node, &self.context(state, id))
	}
}
