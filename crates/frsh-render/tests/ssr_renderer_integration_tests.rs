//! Integration tests for the SSR renderer
//!
//! Covers the document shell, async component bodies, application lifecycle
//! hooks, active links, the bootstrap placement and the development error
//! overlay.

use frsh_conf::{FreshConfig, Mode};
use frsh_render::component::{ComponentType, Element, Node};
use frsh_render::error::{RenderError, RenderResult};
use frsh_render::hydration::{Island, IslandRegistry};
use frsh_render::ssr::{HookContext, LifecycleHook, PageError, RenderRequest, SsrRenderer};
use parking_lot::Mutex;
use rstest::*;
use std::sync::Arc;

#[derive(Default)]
struct Recorder {
	events: Mutex<Vec<String>>,
}

impl Recorder {
	fn record(&self, event: &str, node: &Node) {
		self.events.lock().push(format!("{event}:{}", node.kind_name()));
	}
}

struct SharedRecorder(Arc<Recorder>);

impl LifecycleHook for SharedRecorder {
	fn node_created(&self, node: &mut Node, _cx: &HookContext<'_>) -> RenderResult<()> {
		self.0.record("created", node);
		Ok(())
	}

	fn diff_start(&self, node: &mut Node, _cx: &HookContext<'_>) -> RenderResult<()> {
		self.0.record("start", node);
		Ok(())
	}

	fn render_invoked(&self, node: &Node, _cx: &HookContext<'_>) -> RenderResult<()> {
		self.0.record("render", node);
		Ok(())
	}

	fn hook_invoked(&self, node: &Node, _cx: &HookContext<'_>) -> RenderResult<()> {
		self.0.record("hooked", node);
		Ok(())
	}

	fn diff_end(&self, node: &Node, _cx: &HookContext<'_>) -> RenderResult<()> {
		self.0.record("end", node);
		Ok(())
	}
}

struct RejectScripts;

impl LifecycleHook for RejectScripts {
	fn diff_start(&self, node: &mut Node, _cx: &HookContext<'_>) -> RenderResult<()> {
		match node {
			Node::Element(el) if el.tag_name() == "script" => Err(RenderError::Component {
				component: "RejectScripts",
				source: anyhow::anyhow!("inline scripts are not allowed"),
			}),
			_ => Ok(()),
		}
	}
}

fn config(mode: Mode) -> FreshConfig {
	FreshConfig::builder()
		.mode(mode)
		.build_id("b1")
		.build()
		.unwrap()
}

#[fixture]
fn renderer() -> SsrRenderer {
	SsrRenderer::new(config(Mode::Production), IslandRegistry::new()).unwrap()
}

fn request(url: &str) -> RenderRequest {
	RenderRequest::parse(url).unwrap()
}

#[rstest]
fn test_hooks_observe_events_in_order() {
	let recorder = Arc::new(Recorder::default());
	let greeting = ComponentType::new("Greeting", |_, _| Ok(Node::text("hi")));
	let renderer = SsrRenderer::new(config(Mode::Production), IslandRegistry::new())
		.unwrap()
		.with_hook(SharedRecorder(Arc::clone(&recorder)));

	let page = Element::new("div").child(Node::component(&greeting));
	let output = renderer
		.render_blocking(&request("http://localhost/"), page)
		.unwrap();

	assert!(output.html().contains("<div>hi</div>"));
	assert_eq!(
		*recorder.events.lock(),
		vec![
			"created:element",
			"start:element",
			"created:component",
			"start:component",
			"render:component",
			"hooked:component",
			"end:component",
			"end:element",
		]
	);
}

#[rstest]
fn test_hook_error_aborts_render() {
	let renderer = SsrRenderer::new(config(Mode::Production), IslandRegistry::new())
		.unwrap()
		.with_hook(RejectScripts);

	let page = Element::new("div").child(Element::new("script").child(Node::raw("alert(1)")));
	let err = renderer
		.render_blocking(&request("http://localhost/"), page)
		.unwrap_err();
	assert!(matches!(err, RenderError::Component { component: "RejectScripts", .. }));
}

#[rstest]
#[tokio::test]
async fn test_async_component_body() {
	let feed = ComponentType::new_async("Feed", |props, cx| async move {
		tokio::task::yield_now().await;
		let title = props.get_str("title").unwrap_or_default().to_string();
		Ok(Element::new("h1")
			.child(format!("{title} @ {}", cx.path()))
			.into())
	});
	let registry = IslandRegistry::new().with(&feed, Island::new("Feed", "/islands/feed.js"));
	let renderer = SsrRenderer::new(config(Mode::Production), registry).unwrap();

	let output = renderer
		.render(
			&request("http://localhost/news"),
			Node::component(&feed).prop("title", "Latest"),
		)
		.await
		.unwrap();

	assert!(output.html().contains("<!--frsh:island:Feed:0:--><h1>Latest @ /news</h1><!--/frsh:island-->"));
}

#[rstest]
fn test_component_error_names_component(renderer: SsrRenderer) {
	let broken = ComponentType::new("Broken", |_, _| anyhow::bail!("no data"));
	let err = renderer
		.render_blocking(&request("http://localhost/"), Node::component(&broken))
		.unwrap_err();

	let page_error = PageError::from_error(&err).with_status(500);
	assert!(page_error.message().contains("Broken"));
	assert_eq!(page_error.stack(), Some("caused by: no data"));
}

#[rstest]
fn test_body_receives_bootstrap_once(renderer: SsrRenderer) {
	let page = Element::new("html")
		.child(Element::new("head"))
		.child(Element::new("body").child(Element::new("p").child("x")));

	let output = renderer
		.render_blocking(&request("http://localhost/"), page)
		.unwrap();
	let html = output.html();

	assert_eq!(html.matches("<script type=\"module\"").count(), 1);
	assert!(html.contains("<p>x</p><script type=\"module\""));
	assert!(html.ends_with("</script></body></html>"));
}

#[rstest]
#[case("/docs/intro", "<a href=\"/docs/intro\" data-current=\"true\" aria-current=\"page\">")]
#[case("/docs/intro/more", "<a href=\"/docs/intro\" data-ancestor=\"true\" aria-current=\"true\">")]
#[case("/blog", "<a href=\"/docs/intro\">")]
fn test_active_links(renderer: SsrRenderer, #[case] path: &str, #[case] expected: &str) {
	let page = Element::new("nav").child(Element::new("a").attr("href", "/docs/intro").child("Intro"));
	let output = renderer
		.render_blocking(&request(&format!("http://localhost{path}")), page)
		.unwrap();
	assert!(output.html().contains(expected), "{}", output.html());
}

#[rstest]
fn test_explicit_aria_current_kept(renderer: SsrRenderer) {
	let page = Element::new("a")
		.attr("href", "/")
		.attr("aria-current", "location");
	let output = renderer
		.render_blocking(&request("http://localhost/"), page)
		.unwrap();
	assert!(output.html().contains("<a href=\"/\" aria-current=\"location\" data-current=\"true\">"));
}

#[rstest]
#[case(Some(500), true)]
#[case(None, true)]
#[case(Some(404), false)]
fn test_dev_error_overlay(#[case] status: Option<u16>, #[case] shown: bool) {
	let renderer = SsrRenderer::new(config(Mode::Development), IslandRegistry::new()).unwrap();
	let mut error = PageError::new("boom");
	if let Some(status) = status {
		error = error.with_status(status);
	}
	let request = request("http://localhost/").with_error(error);

	let output = renderer.render_blocking(&request, Node::text("oops")).unwrap();
	let html = output.html();

	assert_eq!(html.contains("<iframe id=\"fresh-error-overlay\""), shown);
	if shown {
		assert!(html.contains("src=\"/_frsh/error_overlay?message=boom\""));
	}
}

#[rstest]
fn test_no_overlay_in_production(renderer: SsrRenderer) {
	let request = request("http://localhost/").with_error(PageError::new("boom"));
	let output = renderer.render_blocking(&request, Node::Empty).unwrap();
	assert!(!output.html().contains("fresh-error-overlay"));
}

#[rstest]
fn test_client_nav_attribute_normalized(renderer: SsrRenderer) {
	let page = Node::fragment([
		Element::new("div").attr("f-client-nav", ""),
		Element::new("div").attr("f-client-nav", "false"),
	]);
	let output = renderer
		.render_blocking(&request("http://localhost/"), page)
		.unwrap();
	let html = output.html();
	assert!(html.contains("<div f-client-nav=\"true\"></div><div f-client-nav=\"false\"></div>"));
}

#[rstest]
fn test_concurrent_renders_isolated(renderer: SsrRenderer) {
	let a = renderer
		.render_blocking(&request("http://localhost/"), Node::partial("main"))
		.unwrap();
	let b = renderer
		.render_blocking(&request("http://localhost/"), Node::partial("main"))
		.unwrap();
	assert_ne!(a.state().nonce(), b.state().nonce());
	assert_eq!(a.state().encountered_partials().len(), 1);
	assert_eq!(b.state().encountered_partials().len(), 1);
}
