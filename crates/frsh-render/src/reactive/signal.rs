//! Signal - shared reactive value container
//!
//! `Signal<T>` holds a value shared between the server-side component tree and
//! whatever updates it. Island props may carry signals; the serializer reads
//! them with [`ReactiveValue::peek`], which never subscribes.
//!
//! ## Example
//!
//! ```
//! use frsh_render::reactive::Signal;
//!
//! let count = Signal::new(0);
//! assert_eq!(count.get(), 0);
//!
//! count.set(42);
//! count.update(|n| *n += 1);
//! assert_eq!(count.get(), 43);
//! ```

use super::ReactiveValue;
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A reactive value container.
///
/// `Signal<T>` implements `Clone` and shares the value via `Arc<RwLock<T>>`.
/// All clones of the same Signal see the same value.
#[derive(Clone)]
pub struct Signal<T: 'static> {
	value: Arc<RwLock<T>>,
}

impl<T: 'static> Signal<T> {
	/// Creates a new signal.
	pub fn new(value: T) -> Self {
		Self {
			value: Arc::new(RwLock::new(value)),
		}
	}

	/// Returns a clone of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.value.read().clone()
	}

	/// Runs `f` with a reference to the current value.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.read())
	}

	/// Replaces the value.
	pub fn set(&self, value: T) {
		*self.value.write() = value;
	}

	/// Updates the value in place.
	pub fn update(&self, f: impl FnOnce(&mut T)) {
		f(&mut self.value.write());
	}

	/// Returns true when both signals share storage.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.value, &other.value)
	}
}

impl<T> ReactiveValue for Signal<T>
where
	T: Serialize + Send + Sync + 'static,
{
	fn peek(&self) -> serde_json::Result<serde_json::Value> {
		serde_json::to_value(&*self.value.read())
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("value", &*self.value.read())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_clones_share_value() {
		let a = Signal::new(String::from("x"));
		let b = a.clone();
		b.set("y".to_string());
		assert_eq!(a.get(), "y");
		assert!(a.ptr_eq(&b));
	}

	#[rstest]
	fn test_peek_snapshots_current_value() {
		let signal = Signal::new(vec![1, 2]);
		signal.update(|v| v.push(3));
		assert_eq!(signal.peek().unwrap(), serde_json::json!([1, 2, 3]));
	}

	#[rstest]
	fn test_with_borrows() {
		let signal = Signal::new(5);
		assert_eq!(signal.with(|v| v * 2), 10);
	}
}
