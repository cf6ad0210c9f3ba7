use std::cell::RefCell;
use std::rc::{Rc, Weak};

use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use smallvec::SmallVec;

use crate::addr::{RcAddr, WeakAddr};
use crate::reaction::ReactionBody;

type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// The reactions currently depending on one signal, in subscription
/// order. Entries are weak: a dropped reaction unregisters itself, and
/// anything that races teardown is skipped at notify time.
pub(crate) struct SubscriberSet {
	reactions: RefCell<FxIndexSet<WeakAddr<ReactionBody>>>,
}

impl SubscriberSet {
	pub fn new() -> Self {
		SubscriberSet {
			reactions: RefCell::new(FxIndexSet::default()),
		}
	}

	pub fn insert(&self, reaction: Weak<ReactionBody>) {
		self.reactions.borrow_mut().insert(WeakAddr::new(reaction));
	}

	pub fn remove(&self, reaction: &Weak<ReactionBody>) {
		self.reactions
			.borrow_mut()
			.shift_remove(&WeakAddr::new(reaction.clone()));
	}

	/// Copy of the current subscribers, taken before a notification
	/// pass. A schedule callback may re-track mid-pass and mutate this
	/// set, so the fan-out must never iterate the live set.
	pub fn snapshot(&self) -> SmallVec<[Weak<ReactionBody>; 4]> {
		self.reactions
			.borrow()
			.iter()
			.map(|reaction| Weak::clone(reaction))
			.collect()
	}
}

/// The subscriber sets a reaction is registered in right now. Kept so
/// cleanup walks only the sets the reaction actually appears in.
pub(crate) struct Dependencies {
	sets: FxIndexSet<RcAddr<SubscriberSet>>,
}

impl Dependencies {
	pub fn new() -> Self {
		Dependencies {
			sets: FxIndexSet::default(),
		}
	}

	pub fn insert(&mut self, set: Rc<SubscriberSet>) {
		self.sets.insert(RcAddr::new(set));
	}

	/// Removes `this` from every subscriber set, then forgets the sets.
	/// Both sides of the relation are gone before the next tracked run
	/// records new reads.
	pub fn clear(&mut self, this: &Weak<ReactionBody>) {
		for set in &self.sets {
			set.remove(this);
		}
		self.sets.clear();
	}
}
