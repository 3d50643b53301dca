//! Component trait definition and component types.

use super::node::Node;
use super::props::Props;
use frsh_conf::Mode;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;
use url::Url;

/// Future returned by asynchronous component bodies.
pub type RenderFuture = BoxFuture<'static, anyhow::Result<Node>>;

/// Trait for reusable server components.
///
/// # Example
///
/// ```
/// use frsh_render::component::{Component, ComponentContext, ComponentType, Node, Props};
///
/// struct Greeting;
///
/// impl Component for Greeting {
///     fn render(&self, props: &Props, _cx: &ComponentContext) -> anyhow::Result<Node> {
///         let name = props.get_str("name").unwrap_or("World").to_string();
///         Ok(Node::element("p").child(format!("Hello, {name}!")).into())
///     }
///
///     fn name(&self) -> &'static str {
///         "Greeting"
///     }
/// }
///
/// let ty = ComponentType::from_component(Greeting);
/// assert_eq!(ty.name(), "Greeting");
/// ```
pub trait Component: Send + Sync + 'static {
	/// Renders the component.
	fn render(&self, props: &Props, cx: &ComponentContext) -> anyhow::Result<Node>;

	/// Returns the component's name for debugging and hydration.
	fn name(&self) -> &'static str;
}

type SyncBody = dyn Fn(&Props, &ComponentContext) -> anyhow::Result<Node> + Send + Sync;
type AsyncBody = dyn Fn(Props, ComponentContext) -> RenderFuture + Send + Sync;

enum Body {
	Sync(Arc<SyncBody>),
	Async(Arc<AsyncBody>),
}

struct ComponentDef {
	name: &'static str,
	body: Body,
}

/// A component type: a named render function with identity.
///
/// Two `ComponentType`s are equal only when they are clones of the same
/// definition, which is what the island registry keys on.
#[derive(Clone)]
pub struct ComponentType(Arc<ComponentDef>);

impl ComponentType {
	/// Creates a component type from a synchronous body.
	pub fn new<F>(name: &'static str, body: F) -> Self
	where
		F: Fn(&Props, &ComponentContext) -> anyhow::Result<Node> + Send + Sync + 'static,
	{
		Self(Arc::new(ComponentDef {
			name,
			body: Body::Sync(Arc::new(body)),
		}))
	}

	/// Creates a component type from an asynchronous body.
	pub fn new_async<F, Fut>(name: &'static str, body: F) -> Self
	where
		F: Fn(Props, ComponentContext) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<Node>> + Send + 'static,
	{
		Self(Arc::new(ComponentDef {
			name,
			body: Body::Async(Arc::new(move |props, cx| body(props, cx).boxed())),
		}))
	}

	/// Creates a component type from a [`Component`] implementation.
	pub fn from_component<C: Component>(component: C) -> Self {
		let name = component.name();
		Self::new(name, move |props, cx| component.render(props, cx))
	}

	/// Returns the component's name.
	pub fn name(&self) -> &'static str {
		self.0.name
	}

	/// Returns true when the body is asynchronous.
	pub fn is_async(&self) -> bool {
		matches!(self.0.body, Body::Async(_))
	}

	/// Runs the component body.
	pub(crate) async fn invoke(&self, props: &Props, cx: &ComponentContext) -> anyhow::Result<Node> {
		match &self.0.body {
			Body::Sync(body) => body(props, cx),
			Body::Async(body) => body(props.clone(), cx.clone()).await,
		}
	}
}

impl PartialEq for ComponentType {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Eq for ComponentType {}

impl std::hash::Hash for ComponentType {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		std::ptr::hash(Arc::as_ptr(&self.0), state);
	}
}

impl std::fmt::Debug for ComponentType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ComponentType")
			.field("name", &self.0.name)
			.field("async", &self.is_async())
			.finish()
	}
}

/// Request information available to component bodies.
#[derive(Debug, Clone)]
pub struct ComponentContext {
	url: Arc<Url>,
	partial: bool,
	mode: Mode,
}

impl ComponentContext {
	pub(crate) fn new(url: Arc<Url>, partial: bool, mode: Mode) -> Self {
		Self { url, partial, mode }
	}

	/// The request URL.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// The request path.
	pub fn path(&self) -> &str {
		self.url.path()
	}

	/// True when this render answers a partial navigation.
	pub fn is_partial(&self) -> bool {
		self.partial
	}

	/// The runtime mode.
	pub fn mode(&self) -> Mode {
		self.mode
	}
}
