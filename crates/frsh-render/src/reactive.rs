//! Reactive values that may appear in island props.

mod signal;

pub use signal::Signal;

/// A value container whose current value can be read without subscribing.
///
/// Island props holding a `ReactiveValue` are serialized as a snapshot of
/// [`peek`](ReactiveValue::peek) and rehydrated as a reactive container on
/// the client.
pub trait ReactiveValue: Send + Sync {
	/// Returns the current value without registering a dependency.
	fn peek(&self) -> serde_json::Result<serde_json::Value>;
}
