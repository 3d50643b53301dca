//! Active-link state for anchors pointing inside the site.

use crate::component::Element;
use url::Url;

/// Attribute set on links to the current page.
pub const DATA_CURRENT: &str = "data-current";

/// Attribute set on links to an ancestor of the current page.
pub const DATA_ANCESTOR: &str = "data-ancestor";

const ARIA_CURRENT: &str = "aria-current";

/// How a link target relates to the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlMatch {
	/// Unrelated.
	None,
	/// The link points to the current page.
	Current,
	/// The link points to a parent of the current page.
	Ancestor,
}

fn trim_trailing_slash(path: &str) -> &str {
	match path.strip_suffix('/') {
		Some(trimmed) if !trimmed.is_empty() => trimmed,
		_ => path,
	}
}

/// Compares the path of `href` with the current request path.
///
/// A single trailing slash is ignored on both sides. The root path is an
/// ancestor of every other page.
pub fn matches_url(current: &str, href: &str) -> UrlMatch {
	let Ok(base) = Url::parse("http://localhost/") else {
		return UrlMatch::None;
	};
	let Ok(target) = base.join(href) else {
		return UrlMatch::None;
	};

	let href = trim_trailing_slash(target.path());
	let current = trim_trailing_slash(current);

	if current == href {
		UrlMatch::Current
	} else if href == "/" || current.strip_prefix(href).is_some_and(|rest| rest.starts_with('/')) {
		UrlMatch::Ancestor
	} else {
		UrlMatch::None
	}
}

/// Marks an `<a href="/…">` element as current or ancestor link.
///
/// An explicit `aria-current` attribute is left untouched.
pub fn set_active_url(el: &mut Element, current_path: &str) {
	let Some(href) = el.get_attr("href") else {
		return;
	};
	if !href.starts_with('/') {
		return;
	}

	let (marker, aria) = match matches_url(current_path, href) {
		UrlMatch::Current => (DATA_CURRENT, "page"),
		UrlMatch::Ancestor => (DATA_ANCESTOR, "true"),
		UrlMatch::None => return,
	};
	el.set_attr(marker, "true");
	if !el.has_attr(ARIA_CURRENT) {
		el.set_attr(ARIA_CURRENT, aria);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/docs", "/docs", UrlMatch::Current)]
	#[case("/docs/", "/docs", UrlMatch::Current)]
	#[case("/docs", "/docs/", UrlMatch::Current)]
	#[case("/docs/intro", "/docs", UrlMatch::Ancestor)]
	#[case("/docs/intro", "/", UrlMatch::Ancestor)]
	#[case("/", "/", UrlMatch::Current)]
	#[case("/docsx", "/docs", UrlMatch::None)]
	#[case("/blog", "/docs", UrlMatch::None)]
	#[case("/docs", "/docs?page=2#top", UrlMatch::Current)]
	fn test_matches_url(#[case] current: &str, #[case] href: &str, #[case] expected: UrlMatch) {
		assert_eq!(matches_url(current, href), expected);
	}

	#[rstest]
	fn test_current_link() {
		let mut el = Element::new("a").attr("href", "/docs");
		set_active_url(&mut el, "/docs");
		assert_eq!(el.get_attr(DATA_CURRENT), Some("true"));
		assert_eq!(el.get_attr("aria-current"), Some("page"));
	}

	#[rstest]
	fn test_ancestor_link() {
		let mut el = Element::new("a").attr("href", "/docs");
		set_active_url(&mut el, "/docs/intro");
		assert_eq!(el.get_attr(DATA_ANCESTOR), Some("true"));
		assert_eq!(el.get_attr("aria-current"), Some("true"));
	}

	#[rstest]
	fn test_explicit_aria_current_kept() {
		let mut el = Element::new("a")
			.attr("href", "/docs")
			.attr("aria-current", "step");
		set_active_url(&mut el, "/docs");
		assert_eq!(el.get_attr("aria-current"), Some("step"));
		assert_eq!(el.get_attr(DATA_CURRENT), Some("true"));
	}

	#[rstest]
	#[case("https://example.com/docs")]
	#[case("docs")]
	fn test_external_or_relative_ignored(#[case] href: &'static str) {
		let mut el = Element::new("a").attr("href", href);
		set_active_url(&mut el, "/docs");
		assert!(!el.has_attr(DATA_CURRENT));
		assert!(!el.has_attr("aria-current"));
	}
}
