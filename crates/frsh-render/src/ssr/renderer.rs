//! SSR renderer: the entry point of the pipeline.

use super::bootstrap::BootstrapEmitter;
use super::escape::html_escape;
use super::hooks::{HookChain, Interceptor, LifecycleHook};
use super::markers::check_balanced;
use super::state::RenderState;
use super::walk::Walker;
use crate::component::{ComponentContext, IntoNode};
use crate::error::RenderResult;
use crate::hydration::IslandRegistry;
use frsh_conf::FreshConfig;
use std::sync::Arc;
use url::Url;

/// Query parameter marking a partial navigation request.
pub const PARTIAL_SEARCH_PARAM: &str = "fresh-partial";

const DEFAULT_HEAD: &str = "<head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\"></head>";

/// An error the page is being rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageError {
	status: Option<u16>,
	message: String,
	stack: Option<String>,
}

impl PageError {
	/// Creates an error without a status code.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			status: None,
			message: message.into(),
			stack: None,
		}
	}

	/// Captures an error value; the source chain becomes the stack.
	pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
		let mut stack = Vec::new();
		let mut source = error.source();
		while let Some(cause) = source {
			stack.push(format!("caused by: {cause}"));
			source = cause.source();
		}
		Self {
			status: None,
			message: error.to_string(),
			stack: (!stack.is_empty()).then(|| stack.join("\n")),
		}
	}

	/// Sets the HTTP status.
	pub fn with_status(mut self, status: u16) -> Self {
		self.status = Some(status);
		self
	}

	/// Sets the stack trace.
	pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
		self.stack = Some(stack.into());
		self
	}

	/// HTTP status, when the error carries one.
	pub fn status(&self) -> Option<u16> {
		self.status
	}

	/// Error message.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Stack trace.
	pub fn stack(&self) -> Option<&str> {
		self.stack.as_deref()
	}
}

/// The request a page is rendered for.
#[derive(Debug, Clone)]
pub struct RenderRequest {
	url: Arc<Url>,
	error: Option<PageError>,
}

impl RenderRequest {
	/// Creates a request for `url`.
	pub fn new(url: Url) -> Self {
		Self {
			url: Arc::new(url),
			error: None,
		}
	}

	/// Parses an absolute URL.
	pub fn parse(url: &str) -> RenderResult<Self> {
		Ok(Self::new(Url::parse(url)?))
	}

	/// Attaches the error the page is rendered for.
	pub fn with_error(mut self, error: PageError) -> Self {
		self.error = Some(error);
		self
	}

	/// Request URL.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Request path.
	pub fn path(&self) -> &str {
		self.url.path()
	}

	/// True when the client asked for partial content only.
	pub fn is_partial(&self) -> bool {
		self.url
			.query_pairs()
			.any(|(name, _)| name == PARTIAL_SEARCH_PARAM)
	}

	/// Error the page is rendered for.
	pub fn error(&self) -> Option<&PageError> {
		self.error.as_ref()
	}
}

/// A rendered page and the state it was produced with.
#[derive(Debug)]
pub struct RenderOutput {
	html: String,
	state: RenderState,
}

impl RenderOutput {
	/// The complete HTML document.
	pub fn html(&self) -> &str {
		&self.html
	}

	/// Consumes the output, returning the HTML.
	pub fn into_html(self) -> String {
		self.html
	}

	/// The final render state.
	pub fn state(&self) -> &RenderState {
		&self.state
	}
}

/// Server-side renderer.
///
/// Cheap to clone; every call to [`render`](Self::render) uses its own
/// [`RenderState`], so one renderer can serve concurrent requests.
///
/// # Example
///
/// ```
/// use frsh_conf::FreshConfig;
/// use frsh_render::component::{ComponentType, Node};
/// use frsh_render::hydration::{Island, IslandRegistry};
/// use frsh_render::ssr::{RenderRequest, SsrRenderer};
///
/// let counter = ComponentType::new("Counter", |props, _| {
///     let start = props.get_as::<i64>("start").unwrap_or(0);
///     Ok(Node::element("button").child(start.to_string()).into())
/// });
/// let registry = IslandRegistry::new().with(&counter, Island::new("Counter", "/islands/counter.js"));
/// let renderer = SsrRenderer::new(FreshConfig::default(), registry)?;
///
/// let request = RenderRequest::parse("http://localhost/")?;
/// let output = renderer.render_blocking(&request, Node::component(&counter).prop("start", 3))?;
/// assert!(output.html().contains("<!--frsh:island:Counter:0:-->"));
/// # Ok::<(), frsh_render::error::RenderError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SsrRenderer {
	config: Arc<FreshConfig>,
	registry: Arc<IslandRegistry>,
	hooks: HookChain,
}

impl SsrRenderer {
	/// Creates a renderer, validating the configuration.
	pub fn new(config: FreshConfig, registry: IslandRegistry) -> RenderResult<Self> {
		config.validate()?;
		Ok(Self {
			config: Arc::new(config),
			registry: Arc::new(registry),
			hooks: HookChain::new(),
		})
	}

	/// Registers an application lifecycle hook.
	///
	/// Hooks run after the built-in interceptor, in registration order.
	pub fn with_hook(mut self, hook: impl LifecycleHook + 'static) -> Self {
		self.hooks.push(Arc::new(hook));
		self
	}

	/// Returns the configuration.
	pub fn config(&self) -> &FreshConfig {
		&self.config
	}

	/// Returns the island registry.
	pub fn registry(&self) -> &IslandRegistry {
		&self.registry
	}

	/// Returns the registered hooks.
	pub fn hooks(&self) -> &HookChain {
		&self.hooks
	}

	/// Renders `root` to a complete HTML document.
	#[tracing::instrument(
		skip_all,
		fields(path = %request.path(), partial = request.is_partial())
	)]
	pub async fn render(
		&self,
		request: &RenderRequest,
		root: impl IntoNode,
	) -> RenderResult<RenderOutput> {
		let mut root = root.into_node();
		let cx = ComponentContext::new(
			Arc::clone(&request.url),
			request.is_partial(),
			self.config.mode,
		);
		let mut walker = Walker::new(
			Interceptor::new(&self.registry, &self.hooks, request.path()),
			BootstrapEmitter::new(&self.config, request),
			cx,
		);

		let mut content = String::with_capacity(4096);
		walker.walk(&mut root, &mut content).await?;
		// No-op when a <body> already carried the bootstrap.
		let mut tail = String::new();
		walker.emit_bootstrap(&mut tail).await?;
		let state = walker.into_state();

		let html = assemble_document(&state, &self.config.lang, &content, &tail);
		if self.config.is_development() {
			if let Err(err) = check_balanced(&html) {
				tracing::warn!(%err, "rendered output contains unbalanced hydration markers");
			}
		}

		tracing::debug!(
			islands = state.island_props().len(),
			bytes = html.len(),
			"render complete"
		);
		Ok(RenderOutput { html, state })
	}

	/// Renders on the current thread, blocking until done.
	pub fn render_blocking(
		&self,
		request: &RenderRequest,
		root: impl IntoNode,
	) -> RenderResult<RenderOutput> {
		futures::executor::block_on(self.render(request, root))
	}
}

/// Adds the doctype and any document element the tree did not render.
fn assemble_document(state: &RenderState, lang: &str, content: &str, tail: &str) -> String {
	let mut html = String::with_capacity(content.len() + tail.len() + 256);
	html.push_str("<!DOCTYPE html>");
	if !state.rendered_html_tag() {
		html.push_str("<html lang=\"");
		html.push_str(&html_escape(lang));
		html.push_str("\">");
	}
	if !state.rendered_html_head() {
		html.push_str(DEFAULT_HEAD);
	}
	if !state.rendered_html_body() {
		html.push_str("<body>");
	}
	html.push_str(content);
	html.push_str(tail);
	if !state.rendered_html_body() {
		html.push_str("</body>");
	}
	if !state.rendered_html_tag() {
		html.push_str("</html>");
	}
	html
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::{Element, Node};
	use crate::error::RenderError;
	use rstest::{fixture, rstest};

	#[fixture]
	fn renderer() -> SsrRenderer {
		let config = FreshConfig::builder().build_id("b1").build().unwrap();
		SsrRenderer::new(config, IslandRegistry::new()).unwrap()
	}

	#[rstest]
	#[case("http://localhost/a", false)]
	#[case("http://localhost/a?fresh-partial=true", true)]
	#[case("http://localhost/a?fresh-partial", true)]
	#[case("http://localhost/a?other=1", false)]
	fn test_partial_detection(#[case] url: &str, #[case] expected: bool) {
		assert_eq!(RenderRequest::parse(url).unwrap().is_partial(), expected);
	}

	#[rstest]
	fn test_invalid_url() {
		let err = RenderRequest::parse("not a url").unwrap_err();
		assert!(matches!(err, RenderError::InvalidUrl(_)));
	}

	#[rstest]
	fn test_invalid_config_rejected() {
		let config = FreshConfig {
			base_path: "relative".into(),
			..FreshConfig::default()
		};
		let err = SsrRenderer::new(config, IslandRegistry::new()).unwrap_err();
		assert!(matches!(err, RenderError::Config(_)));
	}

	#[rstest]
	fn test_shell_synthesized(renderer: SsrRenderer) {
		let request = RenderRequest::parse("http://localhost/").unwrap();
		let output = renderer
			.render_blocking(&request, Element::new("p").child("hi"))
			.unwrap();
		let html = output.html();
		assert!(html.starts_with("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">"));
		assert!(html.contains("<body><p>hi</p><script type=\"module\""));
		assert!(html.ends_with("</script></body></html>"));
	}

	#[rstest]
	fn test_rendered_document_kept(renderer: SsrRenderer) {
		let request = RenderRequest::parse("http://localhost/").unwrap();
		let page = Element::new("html")
			.attr("lang", "de")
			.child(Element::new("head").child(Element::new("title").child("t")))
			.child(Element::new("body").child("x"));
		let output = renderer.render_blocking(&request, page).unwrap();
		let html = output.html();
		assert!(html.starts_with("<!DOCTYPE html><html lang=\"de\"><head><title>t</title></head><body>x<script"));
		assert!(html.ends_with("</script></body></html>"));
		assert_eq!(html.matches("<script").count(), 1);
		assert!(output.state().has_runtime_script());
	}

	#[rstest]
	fn test_page_error_from_error() {
		let io = std::io::Error::other("disk");
		let err = RenderError::Component {
			component: "Page",
			source: anyhow::Error::new(io),
		};
		let page_error = PageError::from_error(&err).with_status(500);
		assert!(page_error.message().contains("Page"));
		assert_eq!(page_error.stack(), Some("caused by: disk"));
		assert_eq!(page_error.status(), Some(500));
	}

	#[rstest]
	fn test_render_output_into_html(renderer: SsrRenderer) {
		let request = RenderRequest::parse("http://localhost/").unwrap();
		let output = renderer.render_blocking(&request, Node::Empty).unwrap();
		assert!(output.into_html().starts_with("<!DOCTYPE html>"));
	}
}
