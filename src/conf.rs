//! Render configuration module.
//!
//! # Examples
//!
//! ```rust
//! use frsh::conf::{FreshConfig, Mode};
//!
//! let config = FreshConfig::from_toml_str("mode = \"development\"").unwrap();
//! assert_eq!(config.mode, Mode::Development);
//! ```

pub use frsh_conf::*;
