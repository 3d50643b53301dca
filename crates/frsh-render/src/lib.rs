//! # frsh render
//!
//! Server-side render interception for island-architecture pages.
//!
//! A page is a tree of [`component::Node`]s. While the tree is rendered,
//! the pipeline:
//!
//! - finds **islands** (components registered in an
//!   [`IslandRegistry`](hydration::IslandRegistry)) and brackets their output
//!   with comment markers the client runtime hydrates,
//! - turns tree-valued island props into **slots**, rendered inline or as
//!   `<template>`s,
//! - wraps **partials** (named, independently replaceable regions) and
//!   **keyed** components in markers,
//! - serializes island props, including snapshots of
//!   [`Signal`](reactive::Signal)s,
//! - emits the client bootstrap: a module script for full pages, a JSON
//!   block for partial navigations.
//!
//! ## Architecture
//!
//! - [`component`]: node tree, component types, props
//! - [`reactive`]: reactive value containers allowed in island props
//! - [`hydration`]: island registry and prop serialization
//! - [`ssr`]: the renderer, lifecycle hooks, markers and bootstrap
//! - [`error`]: render errors
//!
//! ## Example
//!
//! ```
//! use frsh_conf::FreshConfig;
//! use frsh_render::component::{ComponentType, Node};
//! use frsh_render::hydration::{Island, IslandRegistry};
//! use frsh_render::ssr::{RenderRequest, SsrRenderer};
//!
//! let counter = ComponentType::new("Counter", |props, _| {
//!     let start = props.get_as::<i64>("start").unwrap_or(0);
//!     Ok(Node::element("button").child(start.to_string()).into())
//! });
//! let page = ComponentType::new("Page", {
//!     let counter = counter.clone();
//!     move |_, _| {
//!         Ok(Node::element("main")
//!             .child(Node::component(&counter).prop("start", 3))
//!             .into())
//!     }
//! });
//!
//! let registry = IslandRegistry::new().with(&counter, Island::new("Counter", "/islands/counter.js"));
//! let renderer = SsrRenderer::new(FreshConfig::default(), registry)?;
//! let request = RenderRequest::parse("http://localhost/")?;
//! let output = renderer.render_blocking(&request, Node::component(&page))?;
//!
//! assert!(output.html().contains("<!--frsh:island:Counter:0:--><button>3</button><!--/frsh:island-->"));
//! assert!(output.html().contains("import Counter from \"/islands/counter.js\";"));
//! # Ok::<(), frsh_render::error::RenderError>(())
//! ```

pub mod component;
pub mod error;
pub mod hydration;
pub mod reactive;
pub mod ssr;

pub use component::{Component, ComponentType, IntoNode, Node, Props};
pub use error::{RenderError, RenderResult};
pub use hydration::{Island, IslandRegistry};
pub use reactive::Signal;
pub use ssr::{RenderRequest, SsrRenderer};
