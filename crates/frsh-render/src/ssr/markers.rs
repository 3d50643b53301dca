//! Hydration markers embedded in SSR output.
//!
//! Markers are HTML comment pairs bracketing the output of a tree node the
//! client needs to find again:
//!
//! ```text
//! <!--frsh:island:Counter:0:-->...<!--/frsh:island-->
//! <!--frsh:partial:main:0:-->...<!--/frsh:partial-->
//! <!--frsh:slot:1:children-->...<!--/frsh:slot-->
//! <!--frsh:key:row-3-->...<!--/frsh:key-->
//! ```
//!
//! Pairs are properly nested: every closing marker matches the innermost
//! open marker of the same kind.

use crate::component::{Key, Node, PartialMode};
use std::borrow::Cow;

/// Prefix of every marker.
pub const MARKER_PREFIX: &str = "frsh";

/// Separator between marker fields.
pub const MARKER_SEPARATOR: char = ':';

/// Character that replaces the separator inside keys.
pub const KEY_SEPARATOR_REPLACEMENT: char = '_';

/// Kind of a marker pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
	/// Output of an island invocation.
	Island,
	/// Content of a partial region.
	Partial,
	/// Rendered slot content.
	Slot,
	/// Output of an explicitly keyed component.
	Key,
}

impl MarkerKind {
	/// Name used in the marker text.
	pub fn as_str(self) -> &'static str {
		match self {
			MarkerKind::Island => "island",
			MarkerKind::Partial => "partial",
			MarkerKind::Slot => "slot",
			MarkerKind::Key => "key",
		}
	}

	/// Parses a marker kind name.
	pub fn parse(name: &str) -> Option<Self> {
		match name {
			"island" => Some(MarkerKind::Island),
			"partial" => Some(MarkerKind::Partial),
			"slot" => Some(MarkerKind::Slot),
			"key" => Some(MarkerKind::Key),
			_ => None,
		}
	}
}

impl std::fmt::Display for MarkerKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Text of an opening marker comment.
pub fn open_marker(kind: MarkerKind, payload: &str) -> String {
	format!("{MARKER_PREFIX}{MARKER_SEPARATOR}{kind}{MARKER_SEPARATOR}{payload}")
}

/// Text of a closing marker comment.
pub fn close_marker(kind: MarkerKind) -> String {
	format!("/{MARKER_PREFIX}{MARKER_SEPARATOR}{kind}")
}

/// Brackets `node` with a marker pair.
///
/// The marker comments have no owner; they are plain comment nodes around
/// the wrapped node.
pub fn wrap_with_marker(node: Node, kind: MarkerKind, payload: &str) -> Node {
	Node::Fragment(vec![
		Node::Comment(Cow::Owned(open_marker(kind, payload))),
		node,
		Node::Comment(Cow::Owned(close_marker(kind))),
	])
}

/// Stringifies a key so it cannot be confused with a field separator.
///
/// An absent key yields the empty string.
pub fn normalize_key(key: Option<&Key>) -> String {
	key.map(|k| k.as_str().replace(MARKER_SEPARATOR, "_"))
		.unwrap_or_default()
}

/// Payload of an island marker: `{name}:{index}:{key}`.
pub fn island_payload(name: &str, index: usize, key: Option<&Key>) -> String {
	format!("{name}:{index}:{}", normalize_key(key))
}

/// Payload of a partial marker: `{name}:{mode}:{key}`.
pub fn partial_payload(name: &str, mode: PartialMode, key: Option<&Key>) -> String {
	format!("{name}:{}:{}", mode.code(), normalize_key(key))
}

/// Payload of a slot marker: `{id}:{name}`.
pub fn slot_payload(id: usize, name: &str) -> String {
	format!("{id}:{name}")
}

/// A marker comment found in rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerToken<'a> {
	/// Marker kind.
	pub kind: MarkerKind,
	/// Payload of an opening marker; `None` for closing markers.
	pub payload: Option<&'a str>,
	/// Byte offset of the comment in the scanned text.
	pub offset: usize,
}

impl MarkerToken<'_> {
	/// True for closing markers.
	pub fn is_close(&self) -> bool {
		self.payload.is_none()
	}
}

/// Iterates over the marker comments in `html`.
///
/// Comments that are not markers, or use an unknown kind, are skipped.
pub fn scan_markers(html: &str) -> impl Iterator<Item = MarkerToken<'_>> {
	let mut cursor = 0;
	std::iter::from_fn(move || {
		loop {
			let start = cursor + html.get(cursor..)?.find("<!--")?;
			let body_start = start + 4;
			let body_len = html[body_start..].find("-->")?;
			let body = &html[body_start..body_start + body_len];
			cursor = body_start + body_len + 3;

			if let Some(token) = parse_marker(body, start) {
				return Some(token);
			}
		}
	})
}

fn parse_marker(body: &str, offset: usize) -> Option<MarkerToken<'_>> {
	let (closing, rest) = match body.strip_prefix('/') {
		Some(rest) => (true, rest),
		None => (false, body),
	};
	let rest = rest
		.strip_prefix(MARKER_PREFIX)?
		.strip_prefix(MARKER_SEPARATOR)?;

	if closing {
		return Some(MarkerToken {
			kind: MarkerKind::parse(rest)?,
			payload: None,
			offset,
		});
	}

	let (kind, payload) = rest.split_once(MARKER_SEPARATOR).unwrap_or((rest, ""));
	Some(MarkerToken {
		kind: MarkerKind::parse(kind)?,
		payload: Some(payload),
		offset,
	})
}

/// Marker nesting violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkerError {
	/// A closing marker without an open marker.
	#[error("Closing {kind} marker at byte {offset} has no opening marker")]
	Unexpected {
		/// Kind of the closing marker.
		kind: MarkerKind,
		/// Byte offset.
		offset: usize,
	},

	/// A closing marker that does not match the innermost open marker.
	#[error("Closing {found} marker at byte {offset} does not match open {expected} marker")]
	Mismatched {
		/// Kind of the innermost open marker.
		expected: MarkerKind,
		/// Kind of the closing marker.
		found: MarkerKind,
		/// Byte offset.
		offset: usize,
	},

	/// An opening marker that is never closed.
	#[error("{kind} marker opened at byte {offset} is never closed")]
	Unclosed {
		/// Kind of the open marker.
		kind: MarkerKind,
		/// Byte offset.
		offset: usize,
	},
}

/// Checks that the markers in `html` are properly nested.
///
/// Returns the number of complete pairs.
pub fn check_balanced(html: &str) -> Result<usize, MarkerError> {
	let mut stack: Vec<MarkerToken<'_>> = Vec::new();
	let mut pairs = 0;

	for token in scan_markers(html) {
		if !token.is_close() {
			stack.push(token);
			continue;
		}
		match stack.pop() {
			Some(open) if open.kind == token.kind => pairs += 1,
			Some(open) => {
				return Err(MarkerError::Mismatched {
					expected: open.kind,
					found: token.kind,
					offset: token.offset,
				});
			}
			None => {
				return Err(MarkerError::Unexpected {
					kind: token.kind,
					offset: token.offset,
				});
			}
		}
	}

	match stack.pop() {
		Some(open) => Err(MarkerError::Unclosed {
			kind: open.kind,
			offset: open.offset,
		}),
		None => Ok(pairs),
	}
}
