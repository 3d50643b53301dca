//! Escaping for the contexts the renderer writes into.

use std::borrow::Cow;

/// Escapes HTML special characters for text and attribute values.
pub fn html_escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

/// Escapes JavaScript source for embedding in a `<script>` element.
///
/// HTML parsers do not understand JavaScript string context, so a literal
/// `</script` closes the element and `<!--` switches the tokenizer into
/// escaped mode. Both are rewritten with a backslash, which JavaScript string
/// literals read back unchanged.
pub fn escape_script(js: &str) -> Cow<'_, str> {
	let lower = js.to_ascii_lowercase();
	if !lower.contains("</script") && !js.contains("<!--") {
		return Cow::Borrowed(js);
	}

	let mut escaped = String::with_capacity(js.len() + 8);
	let mut rest = js;
	while let Some(pos) = rest.find('<') {
		escaped.push_str(&rest[..pos]);
		let tail = &rest[pos..];
		if tail
			.get(..8)
			.is_some_and(|prefix| prefix.eq_ignore_ascii_case("</script"))
		{
			escaped.push_str("<\\/");
			rest = &tail[2..];
		} else if tail.starts_with("<!--") {
			escaped.push_str("<\\!--");
			rest = &tail[4..];
		} else {
			escaped.push('<');
			rest = &tail[1..];
		}
	}
	escaped.push_str(rest);
	Cow::Owned(escaped)
}

/// Escapes JSON for embedding in a `type="application/json"` script block.
///
/// Every `<` becomes the JSON escape `\u003c`, so the payload still parses to
/// the same value.
pub fn escape_json_for_script(json: &str) -> Cow<'_, str> {
	if json.contains('<') {
		Cow::Owned(json.replace('<', "\\u003c"))
	} else {
		Cow::Borrowed(json)
	}
}

/// Makes text safe to place inside an HTML comment.
pub fn escape_comment(text: &str) -> Cow<'_, str> {
	if text.contains("--") || text.starts_with('>') {
		let escaped = text.replace("--", "-\u{2010}");
		match escaped.strip_prefix('>') {
			Some(rest) => Cow::Owned(format!("&gt;{rest}")),
			None => Cow::Owned(escaped),
		}
	} else {
		Cow::Borrowed(text)
	}
}
