//! # frsh configuration
//!
//! Settings consumed by the frsh render pipeline: runtime mode, the base path
//! prefixed to emitted module URLs, and the build id embedded in the runtime
//! script URL.
//!
//! Configuration is layered from several [`sources`] merged by priority:
//! environment variables (`FRSH_*`) override a TOML file, which overrides
//! defaults.
//!
//! ```no_run
//! use frsh_conf::FreshConfig;
//! use std::path::Path;
//!
//! let config = FreshConfig::load(Some(Path::new("fresh.toml")))?;
//! println!("rendering in {} mode", config.mode);
//! # Ok::<(), frsh_conf::ConfigError>(())
//! ```

mod config;
mod error;
pub mod sources;

pub use config::{FreshConfig, FreshConfigBuilder, Mode};
pub use error::{ConfigError, ConfigResult};
