//! Errors raised while loading or validating configuration.

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Error type for configuration sources and validation
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("IO error reading {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Invalid setting `{key}`: {reason}")]
	Invalid { key: &'static str, reason: String },
}

impl ConfigError {
	pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
		Self::Invalid {
			key,
			reason: reason.into(),
		}
	}
}
