//! Server render interception pipeline.
//!
//! This module provides access to frsh-render: the node tree, island
//! registry, prop serialization, hydration markers and the SSR renderer.
//!
//! # Examples
//!
//! ```rust
//! use frsh::render::ssr::markers::check_balanced;
//!
//! assert_eq!(check_balanced("<!--frsh:key:a--><p></p><!--/frsh:key-->"), Ok(1));
//! ```

pub use frsh_render::*;
