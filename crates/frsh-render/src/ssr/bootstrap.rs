//! Client bootstrap emission.
//!
//! A full page gets a module script that imports the runtime and every island
//! used, then boots them with the serialized props:
//!
//! ```text
//! <script type="module" nonce="…">
//! import { boot } from "/_fresh/js/<build id>/fresh-runtime.js";
//! import Counter from "/islands/counter.js";
//! boot({Counter},"[{\"slots\":[],\"props\":{\"start\":3}}]");
//! </script>
//! ```
//!
//! A partial navigation response instead carries a JSON block the client
//! runtime already on the page picks up.

use super::escape::{escape_json_for_script, escape_script, html_escape};
use super::renderer::RenderRequest;
use super::state::RenderState;
use crate::error::RenderResult;
use crate::hydration::{Island, serialize_island_props};
use frsh_conf::FreshConfig;
use serde::Serialize;
use std::sync::Arc;

/// Path of the development error overlay, relative to the base path.
pub const DEV_ERROR_OVERLAY_URL: &str = "/_frsh/error_overlay";

/// Id prefix of the partial-mode state block.
pub const PARTIAL_STATE_PREFIX: &str = "__FRSH_STATE_";

const OVERLAY_STYLE: &str = "unset: all; position: fixed; top: 0; left: 0; z-index: 99999; width: 100%; height: 100%; border: none;";

#[derive(Serialize)]
struct PartialStateJson<'a> {
	islands: Vec<&'a Island>,
	props: String,
}

/// Builds the bootstrap markup for one render.
pub(crate) struct BootstrapEmitter<'r> {
	config: &'r FreshConfig,
	request: &'r RenderRequest,
}

impl<'r> BootstrapEmitter<'r> {
	pub(crate) fn new(config: &'r FreshConfig, request: &'r RenderRequest) -> Self {
		Self { config, request }
	}

	/// Returns the bootstrap markup for the islands and props in `state`.
	pub(crate) fn emit(&self, state: &RenderState) -> RenderResult<String> {
		let islands: Vec<&Arc<Island>> = state.islands().collect();
		let props = serialize_island_props(state.island_props())?;

		if self.request.is_partial() {
			tracing::debug!(islands = islands.len(), "emitting partial state block");
			return partial_state_script(state.partial_id(), &islands, props);
		}

		tracing::debug!(islands = islands.len(), "emitting runtime script");
		let mut html = runtime_script(
			&self.config.base_path,
			&self.config.build_id,
			state.nonce(),
			&islands,
			&props,
		)?;
		if self.config.is_development() {
			if let Some(overlay) = self.error_overlay() {
				html.push_str(&overlay);
			}
		}
		Ok(html)
	}

	/// The development error overlay, for server errors only.
	fn error_overlay(&self) -> Option<String> {
		let error = self.request.error()?;
		if error.status().is_some_and(|status| status < 500) {
			return None;
		}

		let mut query = url::form_urlencoded::Serializer::new(String::new());
		query.append_pair("message", error.message());
		if let Some(stack) = error.stack() {
			query.append_pair("stack", stack);
		}
		let src = format!(
			"{}{DEV_ERROR_OVERLAY_URL}?{}",
			self.config.base_path,
			query.finish()
		);
		Some(format!(
			"<iframe id=\"fresh-error-overlay\" src=\"{}\" style=\"{OVERLAY_STYLE}\"></iframe>",
			html_escape(&src)
		))
	}
}

/// The `import` statement binding an island module to the island name.
pub fn island_import(base_path: &str, island: &Island) -> String {
	let binding = if island.is_default_export() {
		island.name().to_string()
	} else if island.export_name() == island.name() {
		format!("{{ {} }}", island.name())
	} else {
		format!("{{ {} as {} }}", island.export_name(), island.name())
	};
	format!("import {binding} from \"{base_path}{}\";", island.file())
}

/// The module script booting every island of a full page.
pub fn runtime_script(
	base_path: &str,
	build_id: &str,
	nonce: &str,
	islands: &[&Arc<Island>],
	serialized_props: &str,
) -> RenderResult<String> {
	let imports: String = islands
		.iter()
		.map(|island| island_import(base_path, island))
		.collect();
	let names = islands
		.iter()
		.map(|island| island.name())
		.collect::<Vec<_>>()
		.join(",");
	let props_literal = serde_json::to_string(serialized_props)?;

	let content = format!(
		"import {{ boot }} from \"{base_path}/_fresh/js/{build_id}/fresh-runtime.js\";{}boot({{{names}}},{});",
		escape_script(&imports),
		escape_json_for_script(&props_literal),
	);
	Ok(format!(
		"<script type=\"module\" nonce=\"{}\">{content}</script>",
		html_escape(nonce)
	))
}

/// The JSON state block of a partial navigation response.
pub fn partial_state_script(
	partial_id: &str,
	islands: &[&Arc<Island>],
	serialized_props: String,
) -> RenderResult<String> {
	let json = serde_json::to_string(&PartialStateJson {
		islands: islands.iter().map(|island| Arc::as_ref(island)).collect(),
		props: serialized_props,
	})?;
	Ok(format!(
		"<script id=\"{PARTIAL_STATE_PREFIX}{}\" type=\"application/json\">{}</script>",
		html_escape(partial_id),
		escape_json_for_script(&json)
	))
}
