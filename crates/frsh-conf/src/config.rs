//! The render configuration consumed by the SSR pipeline.

use crate::error::{ConfigError, ConfigResult};
use crate::sources::{ConfigSource, DefaultSource, EnvSource, TomlFileSource, merge_sources};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime mode of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
	/// Development: error overlay and marker self-checks are enabled.
	#[serde(alias = "dev")]
	Development,
	/// Production (default).
	#[default]
	#[serde(alias = "prod")]
	Production,
}

impl std::fmt::Display for Mode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Mode::Development => write!(f, "development"),
			Mode::Production => write!(f, "production"),
		}
	}
}

/// Configuration for one application's renders.
///
/// # Examples
///
/// ```
/// use frsh_conf::{FreshConfig, Mode};
///
/// let config = FreshConfig::builder()
///     .mode(Mode::Development)
///     .base_path("/docs")
///     .build_id("abc123")
///     .build()
///     .unwrap();
/// assert!(config.is_development());
/// assert_eq!(config.base_path, "/docs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshConfig {
	/// Runtime mode.
	pub mode: Mode,
	/// Prefix applied to every emitted module URL.
	pub base_path: String,
	/// Build identifier embedded in the runtime script URL.
	pub build_id: String,
	/// `lang` attribute of a synthesized `<html>` element.
	pub lang: String,
}

impl Default for FreshConfig {
	fn default() -> Self {
		Self {
			mode: Mode::default(),
			base_path: String::new(),
			build_id: generate_build_id(),
			lang: "en".to_string(),
		}
	}
}

fn generate_build_id() -> String {
	uuid::Uuid::new_v4().simple().to_string()
}

impl FreshConfig {
	/// Creates a builder starting from the defaults.
	pub fn builder() -> FreshConfigBuilder {
		FreshConfigBuilder::default()
	}

	/// Returns true in development mode.
	pub fn is_development(&self) -> bool {
		self.mode == Mode::Development
	}

	/// Loads configuration from an optional TOML file and `FRSH_*`
	/// environment variables, in that priority order.
	pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
		let mut sources: Vec<Box<dyn ConfigSource>> = vec![Box::new(DefaultSource::new())];
		if let Some(path) = path {
			sources.push(Box::new(TomlFileSource::new(path)));
		}
		sources.push(Box::new(EnvSource::new()));
		Self::from_sources(&sources)
	}

	/// Builds the configuration from explicit sources.
	pub fn from_sources(sources: &[Box<dyn ConfigSource>]) -> ConfigResult<Self> {
		let merged = merge_sources(sources)?;
		let map: serde_json::Map<String, serde_json::Value> = merged.into_iter().collect();
		let config: Self = serde_json::from_value(serde_json::Value::Object(map))?;
		config.validate()?;
		Ok(config)
	}

	/// Parses TOML text (top-level keys or a `[fresh]` table).
	pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
		let values = crate::sources::parse_toml(content)?;
		let map: serde_json::Map<String, serde_json::Value> = values.into_iter().collect();
		let config: Self = serde_json::from_value(serde_json::Value::Object(map))?;
		config.validate()?;
		Ok(config)
	}

	/// Checks the invariants the emitter relies on.
	pub fn validate(&self) -> ConfigResult<()> {
		if !self.base_path.is_empty() {
			if !self.base_path.starts_with('/') {
				return Err(ConfigError::invalid(
					"base_path",
					format!("`{}` must start with `/`", self.base_path),
				));
			}
			if self.base_path.ends_with('/') {
				return Err(ConfigError::invalid(
					"base_path",
					format!("`{}` must not end with `/`", self.base_path),
				));
			}
		}

		if self.build_id.is_empty() {
			return Err(ConfigError::invalid("build_id", "must not be empty"));
		}
		if self.build_id.contains(['/', '?', '#']) {
			return Err(ConfigError::invalid(
				"build_id",
				format!("`{}` must be a single URL path segment", self.build_id),
			));
		}

		Ok(())
	}
}

/// Fluent builder for [`FreshConfig`].
#[derive(Debug, Clone, Default)]
pub struct FreshConfigBuilder {
	config: FreshConfig,
}

impl FreshConfigBuilder {
	/// Sets the runtime mode.
	pub fn mode(mut self, mode: Mode) -> Self {
		self.config.mode = mode;
		self
	}

	/// Sets the base path.
	pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
		self.config.base_path = base_path.into();
		self
	}

	/// Sets the build id.
	pub fn build_id(mut self, build_id: impl Into<String>) -> Self {
		self.config.build_id = build_id.into();
		self
	}

	/// Sets the document language.
	pub fn lang(mut self, lang: impl Into<String>) -> Self {
		self.config.lang = lang.into();
		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> ConfigResult<FreshConfig> {
		self.config.validate()?;
		Ok(self.config)
	}
}
