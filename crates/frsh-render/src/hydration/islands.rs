//! Island registry for partial hydration.
//!
//! An island is a component whose server-rendered output is hydrated on the
//! client. The registry maps component types to the module that exports the
//! client-side version.
//!
//! ```text
//! SSR Output:
//! <!--frsh:island:Counter:0:-->
//!   <button>3</button>
//! <!--/frsh:island-->
//!
//! Bootstrap:
//! import Counter from "/_fresh/js/islands/counter.js";
//! boot({Counter}, "[{\"slots\":[],\"props\":{\"start\":3}}]");
//! ```

use crate::component::ComponentType;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Export name used when a module's default export is the island.
pub const DEFAULT_EXPORT: &str = "default";

/// Client-side module metadata for an island component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Island {
	export_name: String,
	#[serde(rename = "chunk")]
	file: String,
	name: String,
}

impl Island {
	/// Creates an island exported as the module's default export.
	pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
		Self {
			export_name: DEFAULT_EXPORT.to_string(),
			file: file.into(),
			name: name.into(),
		}
	}

	/// Sets the export name inside the module.
	pub fn with_export(mut self, export_name: impl Into<String>) -> Self {
		self.export_name = export_name.into();
		self
	}

	/// Client-side identifier used in markers and the bootstrap.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Module path, relative to the base path.
	pub fn file(&self) -> &str {
		&self.file
	}

	/// Export holding the component inside the module.
	pub fn export_name(&self) -> &str {
		&self.export_name
	}

	/// True when the island is the module's default export.
	pub fn is_default_export(&self) -> bool {
		self.export_name == DEFAULT_EXPORT
	}
}

/// Maps component types to their island metadata.
///
/// Island names are unique within a registry: registering a second component
/// under a taken name appends a numeric suffix.
#[derive(Debug, Clone, Default)]
pub struct IslandRegistry {
	islands: HashMap<ComponentType, Arc<Island>>,
}

impl IslandRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `ty` as an island and returns the stored metadata.
	///
	/// Registering the same component type again replaces its metadata.
	pub fn register(&mut self, ty: &ComponentType, mut island: Island) -> Arc<Island> {
		let base = island.name.clone();
		let mut suffix = 0;
		while self
			.islands
			.iter()
			.any(|(other, existing)| other != ty && existing.name == island.name)
		{
			suffix += 1;
			island.name = format!("{base}_{suffix}");
		}
		if suffix > 0 {
			tracing::debug!(
				component = ty.name(),
				requested = %base,
				assigned = %island.name,
				"island name already taken, assigned a unique one"
			);
		}

		let island = Arc::new(island);
		self.islands.insert(ty.clone(), Arc::clone(&island));
		island
	}

	/// Builder-style registration.
	pub fn with(mut self, ty: &ComponentType, island: Island) -> Self {
		self.register(ty, island);
		self
	}

	/// Looks up the island metadata for a component type.
	pub fn get(&self, ty: &ComponentType) -> Option<&Arc<Island>> {
		self.islands.get(ty)
	}

	/// True when `ty` is a registered island.
	pub fn contains(&self, ty: &ComponentType) -> bool {
		self.islands.contains_key(ty)
	}

	/// Number of registered islands.
	pub fn len(&self) -> usize {
		self.islands.len()
	}

	/// True when no island is registered.
	pub fn is_empty(&self) -> bool {
		self.islands.is_empty()
	}

	/// Iterates over registered islands in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&ComponentType, &Arc<Island>)> {
		self.islands.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::Node;
	use rstest::rstest;

	fn component(name: &'static str) -> ComponentType {
		ComponentType::new(name, |_, _| Ok(Node::Empty))
	}

	#[rstest]
	fn test_register_and_lookup() {
		let counter = component("Counter");
		let plain = component("Plain");
		let registry =
			IslandRegistry::new().with(&counter, Island::new("Counter", "/islands/counter.js"));

		assert!(registry.contains(&counter));
		assert!(!registry.contains(&plain));
		let island = registry.get(&counter).unwrap();
		assert_eq!(island.name(), "Counter");
		assert!(island.is_default_export());
	}

	#[rstest]
	fn test_duplicate_names_get_suffix() {
		let a = component("Counter");
		let b = component("Counter");
		let mut registry = IslandRegistry::new();
		registry.register(&a, Island::new("Counter", "/a.js"));
		let second = registry.register(&b, Island::new("Counter", "/b.js"));
		assert_eq!(second.name(), "Counter_1");

		// Re-registering the same type keeps its name.
		let again = registry.register(&a, Island::new("Counter", "/a.js"));
		assert_eq!(again.name(), "Counter");
		assert_eq!(registry.len(), 2);
	}

	#[rstest]
	fn test_island_serializes_client_fields() {
		let island = Island::new("Clock", "/clock.js").with_export("Clock");
		assert_eq!(
			serde_json::to_value(&island).unwrap(),
			serde_json::json!({"name": "Clock", "chunk": "/clock.js", "exportName": "Clock"})
		);
	}
}
