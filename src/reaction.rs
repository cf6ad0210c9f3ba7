use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::context;
use crate::dependencies::{Dependencies, SubscriberSet};

/// A trackable unit of computation. Signals read inside [`track`]
/// subscribe the reaction; a later write to any of them invokes the
/// callback installed with [`reconcile`].
///
/// [`track`]: Reaction::track
/// [`reconcile`]: Reaction::reconcile
#[derive(Clone)]
pub struct Reaction {
	body: Rc<ReactionBody>,
}

pub(crate) struct ReactionBody {
	inner: RefCell<ReactionInner>,
}

struct ReactionInner {
	name: &'static str,
	schedule: Option<Rc<dyn Fn()>>,
	dependencies: Dependencies,
	this: Weak<ReactionBody>,
}

impl Drop for ReactionInner {
	fn drop(&mut self) {
		tracing::trace!(name = self.name, "reaction dropped");
		let this = self.this.clone();
		self.dependencies.clear(&this);
	}
}

pub fn create_reaction() -> Reaction {
	Reaction::new()
}

impl Reaction {
	#[must_use]
	pub fn new() -> Self {
		Self::new_with_name("<unnamed>")
	}

	#[must_use]
	pub fn new_with_name(name: &'static str) -> Self {
		Reaction {
			body: Rc::new_cyclic(|this| ReactionBody {
				inner: RefCell::new(ReactionInner {
					name,
					schedule: None,
					dependencies: Dependencies::new(),
					this: this.clone(),
				}),
			}),
		}
	}

	/// Runs `func` with this reaction as the current observer.
	///
	/// Subscriptions from the previous run are dropped first, so only
	/// the signals `func` reads this time stay subscribed. The observer
	/// frame is popped on every exit path; a `func` that returns a
	/// `Result` hands the error back to the caller with the dependency
	/// bookkeeping already settled.
	pub fn track<R>(&self, func: impl FnOnce() -> R) -> R {
		tracing::trace!(name = self.body.name(), "track");
		self.body.cleanup();
		let _frame = context::enter(Rc::downgrade(&self.body));
		func()
	}

	/// Installs the callback invoked when a dependency changes value.
	/// Until the first call the reaction is invalidated silently;
	/// rebinding later replaces the callback for subsequent writes.
	pub fn reconcile(&self, callback: impl Fn() + 'static) {
		self.body.inner.borrow_mut().schedule = Some(Rc::new(callback));
	}
}

impl Default for Reaction {
	fn default() -> Self {
		Reaction::new()
	}
}

impl ReactionBody {
	fn name(&self) -> &'static str {
		self.inner.borrow().name
	}

	fn cleanup(&self) {
		let mut inner = self.inner.borrow_mut();
		let this = inner.this.clone();
		inner.dependencies.clear(&this);
	}

	/// Mutual registration between this reaction and a signal's
	/// subscriber set. Idempotent: both sides are sets.
	pub(crate) fn subscribe_to(&self, subscribers: &Rc<SubscriberSet>) {
		let this = self.inner.borrow().this.clone();
		subscribers.insert(this);
		self.inner.borrow_mut().dependencies.insert(subscribers.clone());
	}

	/// The borrow is released before the callback runs, so a callback
	/// may re-track this very reaction mid-notification.
	pub(crate) fn schedule(&self) {
		let callback = self.inner.borrow().schedule.clone();
		if let Some(callback) = callback {
			callback()
		}
	}
}

impl std::fmt::Debug for Reaction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Reaction")
			.field("name", &self.body.name())
			.finish()
	}
}
