//! # frsh
//!
//! Island-architecture server rendering.
//!
//! Pages are rendered on the server as plain HTML. Interactive components
//! (islands) are bracketed with comment markers and booted on the client
//! with their serialized props; named partial regions can be replaced on
//! client navigation without a full page load.
//!
//! ## Feature Flags
//!
//! - `render` (default) - The render interception pipeline
//!
//! ## Crates
//!
//! - [`conf`] - Render configuration with layered loading
//! - [`render`] - Markers, islands, partials, slots and client bootstrap
//!
//! ## Quick Example
//!
//! ```rust
//! use frsh::conf::FreshConfig;
//! use frsh::render::component::{ComponentType, Element, Node};
//! use frsh::render::hydration::{Island, IslandRegistry};
//! use frsh::render::ssr::{RenderRequest, SsrRenderer};
//!
//! let clock = ComponentType::new("Clock", |_, _| Ok(Element::new("time").child("12:00").into()));
//! let registry = IslandRegistry::new().with(&clock, Island::new("Clock", "/islands/clock.js"));
//!
//! let config = FreshConfig::builder().build_id("dev").build()?;
//! let renderer = SsrRenderer::new(config, registry)?;
//!
//! let request = RenderRequest::parse("http://localhost/")?;
//! let page = Element::new("main").child(Node::component(&clock));
//! let html = renderer.render_blocking(&request, page)?.into_html();
//!
//! assert!(html.contains("<!--frsh:island:Clock:0:--><time>12:00</time><!--/frsh:island-->"));
//! assert!(html.contains("/_fresh/js/dev/fresh-runtime.js"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod conf;
#[cfg(feature = "render")]
pub mod render;

pub use frsh_conf::{FreshConfig, Mode};

#[cfg(feature = "render")]
pub use frsh_render::{
	Component, ComponentType, Island, IslandRegistry, IntoNode, Node, Props, RenderError,
	RenderRequest, RenderResult, Signal, SsrRenderer,
};
