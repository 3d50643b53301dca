//! Depth-first traversal of the node tree.
//!
//! The walker expands function-typed nodes, writes markup, and reports every
//! structural node to the [`Interceptor`](super::hooks::Interceptor):
//!
//! ```text
//! component / partial: node_created → diff_start → render_invoked → body → output → hook_invoked → diff_end
//! element / fragment:  node_created → diff_start → children → diff_end
//! text / raw / comment: written directly
//! ```
//!
//! Each child is awaited fully before its next sibling starts, so owner
//! bookkeeping stays a plain stack.

use super::bootstrap::BootstrapEmitter;
use super::classify::Replacement;
use super::escape::{escape_comment, html_escape};
use super::hooks::Interceptor;
use super::markers::{MarkerKind, island_payload, slot_payload, wrap_with_marker};
use super::state::{NodeId, RenderState};
use crate::component::{ComponentContext, ComponentNode, Element, Node};
use crate::error::{RenderError, RenderResult};
use futures::future::{BoxFuture, FutureExt};

pub(crate) struct Walker<'r> {
	pub(crate) state: RenderState,
	interceptor: Interceptor<'r>,
	bootstrap: BootstrapEmitter<'r>,
	cx: ComponentContext,
}

impl<'r> Walker<'r> {
	pub(crate) fn new(
		interceptor: Interceptor<'r>,
		bootstrap: BootstrapEmitter<'r>,
		cx: ComponentContext,
	) -> Self {
		Self {
			state: RenderState::new(),
			interceptor,
			bootstrap,
			cx,
		}
	}

	pub(crate) fn into_state(self) -> RenderState {
		self.state
	}

	/// Renders `node` and its subtree into `out`.
	pub(crate) fn walk<'a>(
		&'a mut self,
		node: &'a mut Node,
		out: &'a mut String,
	) -> BoxFuture<'a, RenderResult<()>> {
		async move {
			match node {
				Node::Text(text) => {
					out.push_str(&html_escape(text));
					return Ok(());
				}
				Node::Raw(html) => {
					out.push_str(html);
					return Ok(());
				}
				Node::Comment(text) => {
					out.push_str("<!--");
					out.push_str(&escape_comment(text));
					out.push_str("-->");
					return Ok(());
				}
				Node::Bootstrap => return self.emit_bootstrap(out).await,
				Node::Empty => return Ok(()),
				_ => {}
			}

			let id = self.interceptor.node_created(&mut self.state, node)?;
			self.interceptor.diff_start(&mut self.state, id, node)?;

			match node {
				Node::Element(el) => self.walk_element(el, out).await?,
				Node::Fragment(children) => {
					for child in children.iter_mut() {
						self.walk(child, out).await?;
					}
				}
				Node::Component(_) | Node::Partial(_) => {
					self.interceptor.render_invoked(&mut self.state, id, node)?;
					match node {
						Node::Component(component) => {
							let mut output = self.render_component(component).await?;
							self.walk(&mut output, out).await?;
						}
						Node::Partial(partial) => {
							for child in partial.children.iter_mut() {
								self.walk(child, out).await?;
							}
						}
						_ => {}
					}
					self.interceptor.hook_invoked(&mut self.state, id, node)?;
				}
				Node::Slot(slot) => match self.state.take_slot(slot.id) {
					Some(record) => {
						let payload = slot_payload(record.id, &record.name);
						let mut content = wrap_with_marker(record.content, MarkerKind::Slot, &payload);
						self.walk_slot_content(record.owner, &mut content, out).await?;
					}
					None => {
						tracing::debug!(slot = slot.id, name = %slot.name, "slot already rendered");
					}
				},
				_ => {}
			}

			self.interceptor.diff_end(&self.state, id, node)
		}
		.boxed()
	}

	fn walk_element<'a>(
		&'a mut self,
		el: &'a mut Element,
		out: &'a mut String,
	) -> BoxFuture<'a, RenderResult<()>> {
		async move {
			out.push('<');
			out.push_str(el.tag_name());

			for (name, value) in el.attrs() {
				out.push(' ');
				out.push_str(name);
				out.push_str("=\"");
				out.push_str(&html_escape(value));
				out.push('"');
			}

			if el.is_void() {
				out.push_str(" />");
				return Ok(());
			}

			out.push('>');
			for child in el.child_nodes_mut().iter_mut() {
				self.walk(child, out).await?;
			}
			out.push_str("</");
			out.push_str(el.tag_name());
			out.push('>');
			Ok(())
		}
		.boxed()
	}

	/// Produces the output of a component invocation.
	///
	/// Classified components render as a marker-wrapped copy of themselves
	/// that the classifier will not touch again.
	async fn render_component(&self, component: &ComponentNode) -> RenderResult<Node> {
		let (kind, payload) = match &component.replacement {
			Some(Replacement::Island { island, index }) => (
				MarkerKind::Island,
				island_payload(island.name(), *index, component.key.as_ref()),
			),
			Some(Replacement::Key(key)) => (MarkerKind::Key, key.clone()),
			None => {
				return component
					.ty
					.invoke(&component.props, &self.cx)
					.await
					.map_err(|source| RenderError::Component {
						component: component.ty.name(),
						source,
					});
			}
		};

		let original = ComponentNode {
			ty: component.ty.clone(),
			props: component.props.clone(),
			key: None,
			replacement: None,
			classified: true,
		};
		Ok(wrap_with_marker(Node::Component(original), kind, &payload))
	}

	/// Renders slot content owned by the node that created the island.
	fn walk_slot_content<'a>(
		&'a mut self,
		owner: Option<NodeId>,
		content: &'a mut Node,
		out: &'a mut String,
	) -> BoxFuture<'a, RenderResult<()>> {
		async move {
			self.state.push_owner(owner);
			let result = self.walk(content, out).await;
			self.state.pop_owner();
			result
		}
		.boxed()
	}

	/// Writes pending slot templates and the client bootstrap, once.
	pub(crate) fn emit_bootstrap<'a>(
		&'a mut self,
		out: &'a mut String,
	) -> BoxFuture<'a, RenderResult<()>> {
		async move {
			if self.state.has_runtime_script {
				return Ok(());
			}
			self.state.has_runtime_script = true;

			// Rendering a template may register further slots.
			let mut flushed = 0;
			let mut index = 0;
			while index < self.state.slots.len() {
				if let Some(record) = self.state.take_slot(index) {
					out.push_str("<template id=\"frsh-");
					out.push_str(&record.id.to_string());
					out.push('-');
					out.push_str(&html_escape(&record.name));
					out.push_str("\">");
					let mut content = record.content;
					self.walk_slot_content(record.owner, &mut content, out).await?;
					out.push_str("</template>");
					flushed += 1;
				}
				index += 1;
			}
			if flushed > 0 {
				tracing::debug!(flushed, "rendered unplaced slots as templates");
			}

			out.push_str(&self.bootstrap.emit(&self.state)?);
			Ok(())
		}
		.boxed()
	}
}
