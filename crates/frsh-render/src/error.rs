//! Errors raised while rendering.
//!
//! Every variant aborts the current render: invariant violations are
//! authoring errors and serialization failures would otherwise ship
//! hydration data that does not match the HTML.

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Render pipeline errors
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	/// Two partial regions with the same name in one render.
	#[error("Rendered response contains duplicate partial name: \"{name}\"")]
	DuplicatePartial {
		/// The offending partial name.
		name: String,
	},

	/// A partial region rendered by an island.
	#[error("<Partial> \"{name}\" cannot be used inside an island")]
	PartialInsideIsland {
		/// The offending partial name.
		name: String,
	},

	/// The structural encoder rejected a value.
	#[error("Failed to serialize island props: {0}")]
	Serialization(#[from] serde_json::Error),

	/// A prop value has no transmissible representation.
	#[error("Island prop `{path}` holds a {kind} which cannot be serialized")]
	UnserializableProp {
		/// Dotted path of the prop inside the island props.
		path: String,
		/// What kind of value was found.
		kind: &'static str,
	},

	/// A component body failed.
	#[error("Component `{component}` failed to render: {source}")]
	Component {
		/// Name of the component.
		component: &'static str,
		/// The error returned by the body.
		#[source]
		source: anyhow::Error,
	},

	/// The request URL could not be parsed.
	#[error("Invalid request URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	/// The render configuration is invalid.
	#[error(transparent)]
	Config(#[from] frsh_conf::ConfigError),
}
