//! Configuration sources for the layered render configuration
//!
//! Sources are merged in priority order (environment variables > config
//! file > defaults). Each source produces a flat map of setting names to
//! JSON values; the merged map is deserialized into [`FreshConfig`].
//!
//! [`FreshConfig`]: crate::FreshConfig

use crate::error::{ConfigError, ConfigResult};
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default prefix for environment variables
pub const DEFAULT_ENV_PREFIX: &str = "FRSH_";

/// Name of the table read from TOML files when present
pub const TOML_TABLE: &str = "fresh";

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> ConfigResult<IndexMap<String, Value>>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Explicit default values, lowest priority
#[derive(Debug, Clone, Default)]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// Create an empty default source
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a default value
	///
	/// # Examples
	///
	/// ```
	/// use frsh_conf::sources::{ConfigSource, DefaultSource};
	///
	/// let source = DefaultSource::new().with_value("lang", "de");
	/// assert_eq!(source.load().unwrap()["lang"], "de");
	/// ```
	pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.values.insert(key.into(), value.into());
		self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> ConfigResult<IndexMap<String, Value>> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// TOML file configuration source
///
/// Reads the `[fresh]` table when the file has one, otherwise the
/// top-level keys.
pub struct TomlFileSource {
	path: PathBuf,
	required: bool,
}

impl TomlFileSource {
	/// Create a source for a file that must exist
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: true,
		}
	}

	/// Create a source that yields nothing when the file is missing
	pub fn optional(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}

	/// Path this source reads from
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> ConfigResult<IndexMap<String, Value>> {
		if !self.required && !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
			path: self.path.display().to_string(),
			source,
		})?;
		parse_toml(&content)
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Parse TOML text into a flat settings map.
pub(crate) fn parse_toml(content: &str) -> ConfigResult<IndexMap<String, Value>> {
	let mut table: toml::Table = toml::from_str(content)?;

	if let Some(toml::Value::Table(fresh)) = table.remove(TOML_TABLE) {
		table = fresh;
	}

	let mut config = IndexMap::new();
	for (key, value) in table {
		config.insert(key, serde_json::to_value(value)?);
	}
	Ok(config)
}

/// Environment variable configuration source
///
/// `FRSH_BASE_PATH=/app` becomes the setting `base_path = "/app"`.
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	/// Create a source using [`DEFAULT_ENV_PREFIX`]
	pub fn new() -> Self {
		Self {
			prefix: DEFAULT_ENV_PREFIX.to_string(),
		}
	}

	/// Set a different prefix filter for environment variables
	///
	/// # Examples
	///
	/// ```
	/// use frsh_conf::sources::EnvSource;
	///
	/// let source = EnvSource::new().with_prefix("MYAPP_");
	/// ```
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> ConfigResult<IndexMap<String, Value>> {
		let mut config = IndexMap::new();

		for (key, value) in std::env::vars() {
			let Some(name) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			if name.is_empty() {
				continue;
			}
			config.insert(name.to_ascii_lowercase(), Value::String(value));
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

/// Merge sources by ascending priority; later keys override earlier ones.
pub fn merge_sources(sources: &[Box<dyn ConfigSource>]) -> ConfigResult<IndexMap<String, Value>> {
	let mut ordered: Vec<&Box<dyn ConfigSource>> = sources.iter().collect();
	ordered.sort_by_key(|source| source.priority());

	let mut merged = IndexMap::new();
	for source in ordered {
		let values = source.load()?;
		tracing::trace!(
			source = %source.description(),
			keys = values.len(),
			"loaded configuration source"
		);
		merged.extend(values);
	}
	Ok(merged)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	fn test_default_source_values() {
		let source = DefaultSource::new()
			.with_value("base_path", "/docs")
			.with_value("lang", "fr");
		let values = source.load().unwrap();
		assert_eq!(values["base_path"], "/docs");
		assert_eq!(values["lang"], "fr");
		assert_eq!(source.priority(), 0);
	}

	#[rstest]
	#[case("base_path = \"/a\"\nlang = \"ja\"\n", "/a", "ja")]
	#[case("[fresh]\nbase_path = \"/b\"\nlang = \"ko\"\n", "/b", "ko")]
	fn test_parse_toml_top_level_and_table(
		#[case] input: &str,
		#[case] base_path: &str,
		#[case] lang: &str,
	) {
		let values = parse_toml(input).unwrap();
		assert_eq!(values["base_path"], base_path);
		assert_eq!(values["lang"], lang);
	}

	#[rstest]
	fn test_parse_toml_rejects_garbage() {
		let err = parse_toml("base_path = ").unwrap_err();
		assert!(matches!(err, ConfigError::Toml(_)));
	}

	#[rstest]
	fn test_toml_file_source_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "mode = \"development\"").unwrap();

		let source = TomlFileSource::new(file.path());
		let values = source.load().unwrap();
		assert_eq!(values["mode"], "development");
		assert!(source.description().starts_with("TOML file: "));
	}

	#[rstest]
	fn test_optional_toml_file_source_missing() {
		let dir = tempfile::tempdir().unwrap();
		let source = TomlFileSource::optional(dir.path().join("absent.toml"));
		assert!(source.load().unwrap().is_empty());
	}

	#[rstest]
	fn test_required_toml_file_source_missing() {
		let dir = tempfile::tempdir().unwrap();
		let source = TomlFileSource::new(dir.path().join("absent.toml"));
		assert!(matches!(source.load(), Err(ConfigError::Io { .. })));
	}

	#[rstest]
	fn test_merge_sources_priority_order() {
		let low = DefaultSource::new()
			.with_value("lang", "en")
			.with_value("base_path", "/low");
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "base_path = \"/file\"").unwrap();

		// Registered high-priority first to prove sorting happens.
		let sources: Vec<Box<dyn ConfigSource>> = vec![
			Box::new(TomlFileSource::new(file.path())),
			Box::new(low),
		];
		let merged = merge_sources(&sources).unwrap();
		assert_eq!(merged["base_path"], "/file");
		assert_eq!(merged["lang"], "en");
	}
}
