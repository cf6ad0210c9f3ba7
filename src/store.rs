use std::cell::Ref;
use std::hash::Hash;

use crate::binding::Binding;
use crate::shallow::ShallowEq;
use crate::signal::Signal;

/// Reducer-style convenience over one signal holding the whole state.
pub struct Store<T> {
	state: Signal<T>,
}

impl<T> Clone for Store<T> {
	fn clone(&self) -> Self {
		Store {
			state: self.state.clone(),
		}
	}
}

pub fn create_store<T>(initial: T) -> Store<T>
where
	T: Hash + Clone + 'static,
{
	Store::new(initial)
}

impl<T> Store<T>
where
	T: Hash + Clone + 'static,
{
	pub fn new(initial: T) -> Self {
		Store {
			state: Signal::new(initial),
		}
	}

	/// Applies `patch` to the previous state and writes the result
	/// back. The closure must build a fresh value; partial updates are
	/// spelled with struct update syntax,
	/// `State { count: n, ..prev.clone() }`, which leaves the previous
	/// state untouched.
	pub fn dispatch(&self, patch: impl FnOnce(&T) -> T) {
		let next = {
			let prev = self.state.get_untracked();
			patch(&prev)
		};
		self.state.set(next);
	}

	/// Replaces the state wholesale.
	pub fn replace(&self, next: T) {
		self.state.set(next);
	}

	/// Tracked read of the current state.
	#[inline]
	pub fn get(&self) -> Ref<'_, T> {
		self.state.get()
	}

	#[inline]
	pub fn get_untracked(&self) -> Ref<'_, T> {
		self.state.get_untracked()
	}

	/// Binds a selector-driven runner over the store state.
	pub fn bind<S>(&self, selector: impl Fn(&T) -> S + 'static) -> Binding<T, S>
	where
		S: ShallowEq + Clone + 'static,
	{
		Binding::new(self.state.clone(), selector)
	}

	/// Identity selector: the runner republishes the whole state.
	pub fn bind_state(&self) -> Binding<T, T>
	where
		T: ShallowEq,
	{
		self.bind(T::clone)
	}
}
