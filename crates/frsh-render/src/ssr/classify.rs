//! Island, partial, slot and key classification.
//!
//! Runs on diff-start of every function-typed node. A component is either an
//! island boundary, an explicitly keyed component, or left alone. The
//! decision is recorded as a [`Replacement`] on the node; the walker applies
//! it when the body is invoked.

use super::markers::normalize_key;
use super::state::{IslandProps, NodeId, RenderState, SlotRef};
use crate::component::{ComponentNode, Node, PartialNode, PropValue, SlotNode};
use crate::error::{RenderError, RenderResult};
use crate::hydration::{Island, IslandRegistry};
use std::sync::Arc;

/// How the walker must render a classified component.
#[derive(Debug, Clone)]
pub(crate) enum Replacement {
	/// Render the original body wrapped in island markers.
	Island {
		/// Island metadata.
		island: Arc<Island>,
		/// Index of this invocation in the island props.
		index: usize,
	},
	/// Render the original body wrapped in key markers.
	Key(String),
}

/// Classifies a component invocation.
///
/// Components already classified, and islands rendered by another island,
/// are left alone. Island props holding tree fragments are replaced by slot
/// placeholders.
pub(crate) fn classify_component(
	state: &mut RenderState,
	registry: &IslandRegistry,
	id: NodeId,
	component: &mut ComponentNode,
) {
	if component.is_classified() {
		return;
	}

	if let Some(island) = registry.get(&component.ty) {
		if !state.has_island_owner(id) {
			mark_island(state, id, component, island);
			return;
		}
		tracing::trace!(
			island = island.name(),
			"island rendered by another island, hydrated by its owner"
		);
	}

	if let Some(key) = component.key.as_ref() {
		let key = normalize_key(Some(key));
		tracing::debug!(component = component.ty.name(), key = %key, "wrapping keyed component");
		component.replacement = Some(Replacement::Key(key));
	}
}

fn mark_island(
	state: &mut RenderState,
	id: NodeId,
	component: &mut ComponentNode,
	island: &Arc<Island>,
) {
	state.islands.insert(Arc::clone(island));
	let index = state.island_props.len();
	let creator = state.owner_of(id);

	let mut slots = Vec::new();
	for (name, value) in component.props.iter_mut() {
		let PropValue::Node(node) = value else {
			continue;
		};
		let content = std::mem::replace(node, Node::Empty);
		let slot_id = state.push_slot(name, content, creator);
		*node = Node::Slot(SlotNode {
			id: slot_id,
			name: name.clone(),
		});
		slots.push(SlotRef {
			name: name.clone(),
			id: slot_id,
		});
	}

	tracing::debug!(
		island = island.name(),
		index,
		slots = slots.len(),
		"classified island boundary"
	);

	state.island_props.push(IslandProps {
		slots,
		props: component.props.clone(),
	});
	component.replacement = Some(Replacement::Island {
		island: Arc::clone(island),
		index,
	});
}

/// Opens a partial region.
///
/// Partial names are unique per render and partials cannot be rendered by
/// an island.
pub(crate) fn enter_partial(
	state: &mut RenderState,
	id: NodeId,
	partial: &PartialNode,
) -> RenderResult<()> {
	state.partial_depth += 1;
	state.register_partial(&partial.name)?;
	if state.has_island_owner(id) {
		return Err(RenderError::PartialInsideIsland {
			name: partial.name.clone(),
		});
	}
	tracing::debug!(partial = %partial.name, depth = state.partial_depth, "entered partial");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::{ComponentType, Element, Props};
	use rstest::{fixture, rstest};

	struct Setup {
		island: ComponentType,
		plain: ComponentType,
		registry: IslandRegistry,
	}

	#[fixture]
	fn setup() -> Setup {
		let island = ComponentType::new("Counter", |_, _| Ok(Node::Empty));
		let plain = ComponentType::new("Plain", |_, _| Ok(Node::Empty));
		let registry = IslandRegistry::new().with(&island, Island::new("Counter", "/counter.js"));
		Setup {
			island,
			plain,
			registry,
		}
	}

	#[rstest]
	fn test_island_gets_index_and_slots(setup: Setup) {
		let mut state = RenderState::new();
		let mut first = Node::component(&setup.island)
			.prop("start", 1)
			.child(Element::new("p"));
		let mut second = Node::component(&setup.island).prop("start", 2);

		let id = state.create_node(true);
		classify_component(&mut state, &setup.registry, id, &mut first);
		let id = state.create_node(true);
		classify_component(&mut state, &setup.registry, id, &mut second);

		assert!(matches!(first.replacement, Some(Replacement::Island { index: 0, .. })));
		assert!(matches!(second.replacement, Some(Replacement::Island { index: 1, .. })));
		assert_eq!(state.islands().count(), 1);
		assert_eq!(state.island_props().len(), 2);
		assert_eq!(
			state.island_props()[0].slots,
			vec![SlotRef {
				name: "children".into(),
				id: 0
			}]
		);
		assert!(matches!(
			first.get_props().get_node("children"),
			Some(Node::Slot(slot)) if slot.id() == 0
		));
		assert_eq!(state.pending_slots().count(), 1);
	}

	#[rstest]
	fn test_island_inside_island_is_plain(setup: Setup) {
		let mut state = RenderState::new();
		let outer = state.create_node(true);
		state.push_owner(Some(outer));
		let inner = state.create_node(true);
		let mut node = Node::component(&setup.island);
		classify_component(&mut state, &setup.registry, inner, &mut node);
		assert!(node.replacement.is_none());
		assert!(state.island_props().is_empty());
	}

	#[rstest]
	fn test_keyed_component(setup: Setup) {
		let mut state = RenderState::new();
		let id = state.create_node(false);
		let mut node = Node::component(&setup.plain).key("a:b");
		classify_component(&mut state, &setup.registry, id, &mut node);
		assert!(matches!(node.replacement, Some(Replacement::Key(ref k)) if k == "a_b"));
	}

	#[rstest]
	fn test_unkeyed_plain_component_untouched(setup: Setup) {
		let mut state = RenderState::new();
		let id = state.create_node(false);
		let mut node = Node::component(&setup.plain).props(Props::new().with("x", 1));
		classify_component(&mut state, &setup.registry, id, &mut node);
		assert!(!node.is_classified());
	}

	#[rstest]
	fn test_partial_rules() {
		let mut state = RenderState::new();
		let id = state.create_node(false);
		enter_partial(&mut state, id, &PartialNode::new("main")).unwrap();
		assert_eq!(state.partial_depth(), 1);

		let id = state.create_node(false);
		let err = enter_partial(&mut state, id, &PartialNode::new("main")).unwrap_err();
		assert!(matches!(err, RenderError::DuplicatePartial { .. }));

		let island = state.create_node(true);
		state.push_owner(Some(island));
		let id = state.create_node(false);
		let err = enter_partial(&mut state, id, &PartialNode::new("other")).unwrap_err();
		assert!(matches!(err, RenderError::PartialInsideIsland { name } if name == "other"));
	}

	#[rstest]
	fn test_classification_runs_once(setup: Setup) {
		let mut state = RenderState::new();
		let mut node = Node::component(&setup.island).child(Element::new("p"));
		let id = state.create_node(true);

		classify_component(&mut state, &setup.registry, id, &mut node);
		let slots = state.pending_slots().count();
		classify_component(&mut state, &setup.registry, id, &mut node);

		assert_eq!(state.island_props().len(), 1);
		assert_eq!(state.pending_slots().count(), slots);
		assert!(matches!(node.replacement, Some(Replacement::Island { index: 0, .. })));
	}
}
