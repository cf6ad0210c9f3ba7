use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::batch;
use crate::reaction::Reaction;
use crate::shallow::ShallowEq;
use crate::value::Value;

/// Glues a [`Reaction`] to a host render cycle.
///
/// Writes that invalidate the reaction are coalesced: the first
/// invalidation of a flush window defers one commit, which re-tracks
/// the selector over the source and republishes only when the derived
/// value fails [`ShallowEq`] against the last published one. Any
/// number of synchronous writes inside a window therefore produce at
/// most one downstream notification, reflecting the final value.
///
/// Hosts consume a binding in one of two styles:
///
/// - push: [`subscribe`] a callback that receives each republished
///   value and re-renders eagerly from it;
/// - pull: [`subscribe`] an invalidation callback and read [`get`] on
///   demand — the external-store contract. [`render`] is the
///   host-triggered re-evaluation entry and re-tracks on every call.
///
/// [`subscribe`]: Binding::subscribe
/// [`get`]: Binding::get
/// [`render`]: Binding::render
pub struct Binding<T, S> {
	body: Rc<BindingBody<T, S>>,
}

impl<T, S> Clone for Binding<T, S> {
	fn clone(&self) -> Self {
		Binding {
			body: self.body.clone(),
		}
	}
}

/// Free-function spelling of [`Binding::new`], the host-facing hook.
pub fn bind<T, S>(
	source: impl Into<Value<T>>,
	selector: impl Fn(&T) -> S + 'static,
) -> Binding<T, S>
where
	T: 'static,
	S: ShallowEq + Clone + 'static,
{
	Binding::new(source, selector)
}

struct BindingBody<T, S> {
	source: Value<T>,
	selector: Box<dyn Fn(&T) -> S>,
	reaction: Reaction,
	state: RefCell<S>,
	pending: Cell<u32>,
	listeners: RefCell<Vec<Listener<S>>>,
	next_listener: Cell<u64>,
}

struct Listener<S> {
	id: u64,
	callback: Rc<dyn Fn(&S)>,
}

impl<T, S> Binding<T, S>
where
	T: 'static,
	S: ShallowEq + Clone + 'static,
{
	pub fn new(source: impl Into<Value<T>>, selector: impl Fn(&T) -> S + 'static) -> Self {
		let source = source.into();
		let selector: Box<dyn Fn(&T) -> S> = Box::new(selector);
		let reaction = Reaction::new_with_name("binding");

		// First activation: seed the published value and the
		// dependency set in one tracked pass.
		let initial = reaction.track(|| {
			let state = source.get();
			selector(&state)
		});

		let body = Rc::new(BindingBody {
			source,
			selector,
			reaction,
			state: RefCell::new(initial),
			pending: Cell::new(0),
			listeners: RefCell::new(Vec::new()),
			next_listener: Cell::new(0),
		});

		let weak = Rc::downgrade(&body);
		body.reaction.reconcile(move || {
			if let Some(body) = weak.upgrade() {
				BindingBody::invalidated(&body);
			}
		});

		Binding { body }
	}

	/// Last published value — the pull half of the external-store
	/// contract.
	pub fn get(&self) -> S {
		self.body.state.borrow().clone()
	}

	/// Re-runs the tracked computation on behalf of a host render pass
	/// and returns the current derived value.
	pub fn render(&self) -> S {
		let next = self.body.evaluate();
		*self.body.state.borrow_mut() = next.clone();
		next
	}

	/// Registers a host callback fired after every republication. The
	/// listener is detached when the returned guard drops.
	#[must_use]
	pub fn subscribe(&self, callback: impl Fn(&S) + 'static) -> Subscription {
		let id = self.body.next_listener.get();
		self.body.next_listener.set(id + 1);
		self.body.listeners.borrow_mut().push(Listener {
			id,
			callback: Rc::new(callback),
		});

		let weak = Rc::downgrade(&self.body);
		Subscription {
			unsubscribe: Some(Box::new(move || {
				if let Some(body) = weak.upgrade() {
					body.listeners.borrow_mut().retain(|listener| listener.id != id);
				}
			})),
		}
	}
}

impl<T, S> BindingBody<T, S>
where
	T: 'static,
	S: ShallowEq + Clone + 'static,
{
	/// Counts invalidations in the current flush window; only the 0→1
	/// transition defers a commit, so the window commits once no
	/// matter how many writes land in it.
	fn invalidated(this: &Rc<Self>) {
		let pending = this.pending.get() + 1;
		this.pending.set(pending);
		if pending == 1 {
			let weak = Rc::downgrade(this);
			batch::defer(move || {
				if let Some(body) = weak.upgrade() {
					body.commit();
				}
			});
		}
	}

	/// Recomputes through the reaction, so the dependency set always
	/// matches what the selector read this time, then republishes on
	/// shallow change. Every borrow is released before listeners run.
	fn commit(&self) {
		self.pending.set(0);
		let next = self.evaluate();
		if self.state.borrow().shallow_eq(&next) {
			return;
		}
		*self.state.borrow_mut() = next.clone();
		tracing::trace!("republish");

		let listeners: SmallVec<[Rc<dyn Fn(&S)>; 2]> = self
			.listeners
			.borrow()
			.iter()
			.map(|listener| listener.callback.clone())
			.collect();
		for listener in listeners {
			listener(&next);
		}
	}

	fn evaluate(&self) -> S {
		self.reaction.track(|| {
			let state = self.source.get();
			(self.selector)(&state)
		})
	}
}

/// Active listener registration; dropping it unsubscribes.
pub struct Subscription {
	unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(unsubscribe) = self.unsubscribe.take() {
			unsubscribe()
		}
	}
}
