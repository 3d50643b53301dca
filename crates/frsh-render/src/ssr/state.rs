//! Per-render bookkeeping.
//!
//! A [`RenderState`] lives for exactly one render. It records the owner of
//! every tree node, the islands and props that must be hydrated, pending
//! slots and the partial names seen so far.

use crate::component::{Node, Props};
use crate::error::{RenderError, RenderResult};
use crate::hydration::Island;
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Identifier of a tree node within one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
	/// Index of the node in creation order.
	pub fn index(self) -> usize {
		self.0
	}
}

#[derive(Debug, Clone, Copy)]
struct NodeRecord {
	owner: Option<NodeId>,
	island: bool,
}

/// Reference to a slot inside one island's props.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotRef {
	/// Prop name the slot replaced.
	pub name: String,
	/// Slot id.
	pub id: usize,
}

/// Props recorded for one island invocation.
#[derive(Debug, Clone)]
pub struct IslandProps {
	/// Slots created for this invocation.
	pub slots: Vec<SlotRef>,
	/// Props with tree-valued entries replaced by slot placeholders.
	pub props: Props,
}

/// A slot whose content has not been rendered yet.
#[derive(Debug, Clone)]
pub struct SlotRecord {
	/// Slot id.
	pub id: usize,
	/// Prop name the slot replaced.
	pub name: String,
	/// The deferred content.
	pub content: Node,
	/// Owner of the island invocation that created the slot.
	pub(crate) owner: Option<NodeId>,
}

/// Mutable state of a single render.
#[derive(Debug)]
pub struct RenderState {
	nodes: Vec<NodeRecord>,
	owner_stack: Vec<Option<NodeId>>,
	pub(crate) islands: IndexSet<Arc<Island>>,
	pub(crate) island_props: Vec<IslandProps>,
	pub(crate) slots: Vec<Option<SlotRecord>>,
	encountered_partials: HashSet<String>,
	pub(crate) partial_depth: usize,
	pub(crate) rendered_html_tag: bool,
	pub(crate) rendered_html_head: bool,
	pub(crate) rendered_html_body: bool,
	pub(crate) has_runtime_script: bool,
	nonce: String,
	partial_id: String,
}

impl Default for RenderState {
	fn default() -> Self {
		Self::new()
	}
}

impl RenderState {
	/// Creates an empty state with a fresh nonce and partial id.
	pub fn new() -> Self {
		Self {
			nodes: Vec::new(),
			owner_stack: Vec::new(),
			islands: IndexSet::new(),
			island_props: Vec::new(),
			slots: Vec::new(),
			encountered_partials: HashSet::new(),
			partial_depth: 0,
			rendered_html_tag: false,
			rendered_html_head: false,
			rendered_html_body: false,
			has_runtime_script: false,
			nonce: uuid::Uuid::new_v4().simple().to_string(),
			partial_id: uuid::Uuid::new_v4().simple().to_string(),
		}
	}

	/// Records a new node owned by the innermost active component.
	pub(crate) fn create_node(&mut self, island: bool) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(NodeRecord {
			owner: self.current_owner(),
			island,
		});
		id
	}

	/// Records whether `id` is an island boundary.
	pub(crate) fn set_island(&mut self, id: NodeId, island: bool) {
		if let Some(record) = self.nodes.get_mut(id.0) {
			record.island = island;
		}
	}

	/// The innermost function-typed node currently rendering.
	pub fn current_owner(&self) -> Option<NodeId> {
		self.owner_stack.last().copied().flatten()
	}

	/// Owner of `id`.
	pub fn owner_of(&self, id: NodeId) -> Option<NodeId> {
		self.nodes.get(id.0).and_then(|record| record.owner)
	}

	pub(crate) fn push_owner(&mut self, owner: Option<NodeId>) {
		self.owner_stack.push(owner);
	}

	pub(crate) fn pop_owner(&mut self) {
		self.owner_stack.pop();
	}

	/// True when any owner of `id`, transitively, is an island.
	pub fn has_island_owner(&self, id: NodeId) -> bool {
		let mut current = self.owner_of(id);
		while let Some(owner) = current {
			match self.nodes.get(owner.0) {
				Some(record) if record.island => return true,
				Some(record) => current = record.owner,
				None => return false,
			}
		}
		false
	}

	/// Records a partial name, failing when it was already used.
	pub(crate) fn register_partial(&mut self, name: &str) -> RenderResult<()> {
		if !self.encountered_partials.insert(name.to_string()) {
			return Err(RenderError::DuplicatePartial {
				name: name.to_string(),
			});
		}
		Ok(())
	}

	/// Registers a pending slot and returns its id.
	pub(crate) fn push_slot(&mut self, name: &str, content: Node, owner: Option<NodeId>) -> usize {
		let id = self.slots.len();
		self.slots.push(Some(SlotRecord {
			id,
			name: name.to_string(),
			content,
			owner,
		}));
		id
	}

	/// Marks a slot as rendered.
	pub(crate) fn take_slot(&mut self, id: usize) -> Option<SlotRecord> {
		self.slots.get_mut(id).and_then(Option::take)
	}

	/// Islands used by this render, in first-use order.
	pub fn islands(&self) -> impl Iterator<Item = &Arc<Island>> {
		self.islands.iter()
	}

	/// Props of every island invocation, indexed by invocation.
	pub fn island_props(&self) -> &[IslandProps] {
		&self.island_props
	}

	/// Slots that have not been rendered yet.
	pub fn pending_slots(&self) -> impl Iterator<Item = &SlotRecord> {
		self.slots.iter().flatten()
	}

	/// Names of the partial regions rendered so far.
	pub fn encountered_partials(&self) -> &HashSet<String> {
		&self.encountered_partials
	}

	/// Number of partial regions currently open.
	pub fn partial_depth(&self) -> usize {
		self.partial_depth
	}

	/// True once an `<html>` element has been rendered.
	pub fn rendered_html_tag(&self) -> bool {
		self.rendered_html_tag
	}

	/// True once a `<head>` element has been rendered.
	pub fn rendered_html_head(&self) -> bool {
		self.rendered_html_head
	}

	/// True once a `<body>` element has been rendered.
	pub fn rendered_html_body(&self) -> bool {
		self.rendered_html_body
	}

	/// True once the client bootstrap has been emitted.
	pub fn has_runtime_script(&self) -> bool {
		self.has_runtime_script
	}

	/// Nonce attached to the bootstrap script.
	pub fn nonce(&self) -> &str {
		&self.nonce
	}

	/// Identifier of the partial-mode state block.
	pub fn partial_id(&self) -> &str {
		&self.partial_id
	}

	/// Number of nodes recorded.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}
}
