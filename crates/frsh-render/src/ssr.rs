//! Server-side rendering with island hydration.
//!
//! [`SsrRenderer`] walks a node tree, intercepts its lifecycle to find
//! islands, partials, slots and keyed components, brackets them with
//! [`markers`], and finishes the page with the client bootstrap.
//!
//! ```text
//! Node tree ──▶ Walker ──▶ Interceptor ──▶ classify / markers / state
//!                  │             │
//!                  │             └──▶ application LifecycleHooks
//!                  ▼
//!            HTML + bootstrap (runtime script or partial JSON block)
//! ```

pub mod active_url;
mod bootstrap;
pub(crate) mod classify;
pub mod escape;
mod hooks;
pub mod markers;
mod renderer;
pub mod state;
mod walk;

pub use bootstrap::{
	DEV_ERROR_OVERLAY_URL, PARTIAL_STATE_PREFIX, island_import, partial_state_script,
	runtime_script,
};
pub use hooks::{CLIENT_NAV_ATTR, DATA_FRESH_KEY, HookChain, HookContext, LifecycleHook};
pub use markers::{MarkerKind, normalize_key, wrap_with_marker};
pub use renderer::{PARTIAL_SEARCH_PARAM, PageError, RenderOutput, RenderRequest, SsrRenderer};
pub use state::{IslandProps, NodeId, RenderState, SlotRecord, SlotRef};
