use std::cell::{Ref, RefCell};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use crate::context;
use crate::dependencies::SubscriberSet;
use crate::value::{Access, Value};

/// Value plus the fxhash64 it carried when last written. Hash
/// inequality is the write cutoff: a write that hashes equal assigns
/// nothing and notifies nobody.
struct Hashed<T> {
	value: T,
	hash: u64,
}

impl<T> Hashed<T> {
	fn new(value: T) -> Self
	where
		T: Hash,
	{
		let hash = fxhash::hash64(&value);
		Hashed { value, hash }
	}
}

/// A mutable observable value. Reads inside a tracked evaluation
/// subscribe the evaluating reaction; writes that change the value
/// invoke every subscriber's schedule callback.
pub struct Signal<T> {
	body: Rc<SignalBody<T>>,
}

impl<T> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Signal {
			body: self.body.clone(),
		}
	}
}

/// The `(read, write)` pair of a signal as two independently cloneable
/// handles over one body.
pub fn create_signal<T>(value: T) -> (ReadSignal<T>, WriteSignal<T>)
where
	T: Hash + 'static,
{
	Signal::new(value).split()
}

impl<T> Signal<T>
where
	T: 'static,
{
	pub fn new(value: T) -> Self
	where
		T: Hash,
	{
		Signal {
			body: Rc::new(SignalBody {
				value: RefCell::new(Hashed::new(value)),
				subscribers: Rc::new(SubscriberSet::new()),
			}),
		}
	}

	pub fn split(&self) -> (ReadSignal<T>, WriteSignal<T>) {
		(
			ReadSignal {
				body: self.body.clone(),
			},
			WriteSignal {
				body: self.body.clone(),
			},
		)
	}

	#[inline]
	pub fn get(&self) -> Ref<'_, T> {
		self.body.get()
	}

	#[inline]
	pub fn get_untracked(&self) -> Ref<'_, T> {
		self.body.get_untracked()
	}

	#[inline]
	pub fn set(&self, value: T)
	where
		T: Hash,
	{
		self.body.set(value)
	}

	#[inline]
	pub fn replace(&self, value: T) -> T
	where
		T: Hash,
	{
		self.body.replace(value)
	}

	#[inline]
	pub fn update(&self, func: impl FnOnce(&mut T))
	where
		T: Hash,
	{
		self.body.update(func)
	}
}

impl<T> Default for Signal<T>
where
	T: Default + Hash + 'static,
{
	fn default() -> Self {
		Signal::new(Default::default())
	}
}

pub struct ReadSignal<T> {
	body: Rc<SignalBody<T>>,
}

impl<T> Clone for ReadSignal<T> {
	fn clone(&self) -> Self {
		ReadSignal {
			body: self.body.clone(),
		}
	}
}

impl<T> ReadSignal<T>
where
	T: 'static,
{
	#[inline]
	pub fn get(&self) -> Ref<'_, T> {
		self.body.get()
	}

	#[inline]
	pub fn get_untracked(&self) -> Ref<'_, T> {
		self.body.get_untracked()
	}
}

pub struct WriteSignal<T> {
	body: Rc<SignalBody<T>>,
}

impl<T> Clone for WriteSignal<T> {
	fn clone(&self) -> Self {
		WriteSignal {
			body: self.body.clone(),
		}
	}
}

impl<T> WriteSignal<T>
where
	T: 'static,
{
	#[inline]
	pub fn set(&self, value: T)
	where
		T: Hash,
	{
		self.body.set(value)
	}

	#[inline]
	pub fn replace(&self, value: T) -> T
	where
		T: Hash,
	{
		self.body.replace(value)
	}

	#[inline]
	pub fn update(&self, func: impl FnOnce(&mut T))
	where
		T: Hash,
	{
		self.body.update(func)
	}
}

pub(crate) struct SignalBody<T> {
	value: RefCell<Hashed<T>>,
	subscribers: Rc<SubscriberSet>,
}

impl<T> SignalBody<T>
where
	T: 'static,
{
	pub fn get(&self) -> Ref<'_, T> {
		if let Some(observer) = context::current() {
			observer.subscribe_to(&self.subscribers);
		}
		Ref::map(self.value.borrow(), |hashed| &hashed.value)
	}

	pub fn get_untracked(&self) -> Ref<'_, T> {
		Ref::map(self.value.borrow(), |hashed| &hashed.value)
	}

	pub fn set(&self, value: T)
	where
		T: Hash,
	{
		let _ = self.replace(value);
	}

	pub fn replace(&self, value: T) -> T
	where
		T: Hash,
	{
		let next = Hashed::new(value);
		let mut current = self.value.borrow_mut();
		let changed = current.hash != next.hash;
		let old = std::mem::replace(&mut *current, next);
		std::mem::drop(current);
		if changed {
			self.notify();
		}
		old.value
	}

	pub fn update(&self, func: impl FnOnce(&mut T))
	where
		T: Hash,
	{
		let mut current = self.value.borrow_mut();
		func(&mut current.value);
		let hash = fxhash::hash64(&current.value);
		let changed = current.hash != hash;
		current.hash = hash;
		std::mem::drop(current);
		if changed {
			self.notify();
		}
	}

	/// Fan-out over a snapshot taken at write time: a callback may
	/// re-track and mutate the subscriber set while this loop is still
	/// running. The value borrow is already released, so callbacks may
	/// read or write this signal again.
	fn notify(&self) {
		let snapshot = self.subscribers.snapshot();
		tracing::trace!(subscribers = snapshot.len(), "signal changed");
		for reaction in snapshot {
			if let Some(reaction) = reaction.upgrade() {
				reaction.schedule();
			}
		}
	}
}

impl<T> Access<T> for SignalBody<T>
where
	T: 'static,
{
	fn get(&self) -> crate::value::Ref<'_, T> {
		crate::value::Ref {
			guard: SignalBody::get(self),
		}
	}

	fn get_untracked(&self) -> crate::value::Ref<'_, T> {
		crate::value::Ref {
			guard: SignalBody::get_untracked(self),
		}
	}
}

impl<T> From<Signal<T>> for Value<T>
where
	T: 'static,
{
	fn from(signal: Signal<T>) -> Self {
		Value::new(signal.body)
	}
}

impl<T> From<ReadSignal<T>> for Value<T>
where
	T: 'static,
{
	fn from(signal: ReadSignal<T>) -> Self {
		Value::new(signal.body)
	}
}

impl<T> Hash for Signal<T>
where
	T: Hash,
{
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		state.write_u64(self.body.value.borrow().hash);
	}
}

impl<T> Debug for Signal<T>
where
	T: 'static + Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.get_untracked().fmt(f)
	}
}
