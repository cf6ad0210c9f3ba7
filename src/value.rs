use std::fmt::Debug;
use std::ops::Deref;
use std::rc::Rc;

/// Read access to an observable source, erased over the concrete
/// signal type so bindings can hold any source.
pub trait Access<T> {
	/// Tracked read: subscribes the current observer, if any.
	fn get(&self) -> Ref<'_, T>;

	/// Read with no subscription side effect.
	fn get_untracked(&self) -> Ref<'_, T>;
}

pub struct Value<T> {
	value: Rc<dyn Access<T>>,
}

impl<T> Clone for Value<T> {
	fn clone(&self) -> Self {
		Value {
			value: self.value.clone(),
		}
	}
}

impl<T> Value<T>
where
	T: 'static,
{
	pub fn new(value: Rc<dyn Access<T>>) -> Self {
		Value { value }
	}

	#[inline]
	pub fn get(&self) -> Ref<'_, T> {
		self.value.get()
	}

	#[inline]
	pub fn get_untracked(&self) -> Ref<'_, T> {
		self.value.get_untracked()
	}
}

/// Borrow of a source's current value.
pub struct Ref<'a, T: ?Sized> {
	pub(crate) guard: std::cell::Ref<'a, T>,
}

impl<'a, T: ?Sized> Deref for Ref<'a, T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		self.guard.deref()
	}
}

impl<'a, T> Debug for Ref<'a, T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.guard.fmt(f)
	}
}
