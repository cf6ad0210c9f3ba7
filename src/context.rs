use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::reaction::ReactionBody;

// One stack per thread: tracked evaluation is single-threaded and
// cooperative, so a plain RefCell is enough.
thread_local! {
	static OBSERVERS: RefCell<Vec<Weak<ReactionBody>>> = RefCell::new(Vec::new());
}

/// Frame of one tracked evaluation. Dropping it pops the observer
/// stack, so the exit runs on every path out of the evaluation,
/// including unwinding.
pub(crate) struct Frame {
	depth: usize,
}

pub(crate) fn enter(observer: Weak<ReactionBody>) -> Frame {
	OBSERVERS.with(|stack| {
		let mut stack = stack.borrow_mut();
		stack.push(observer);
		Frame { depth: stack.len() }
	})
}

impl Drop for Frame {
	fn drop(&mut self) {
		OBSERVERS.with(|stack| {
			let mut stack = stack.borrow_mut();
			debug_assert_eq!(stack.len(), self.depth, "observer stack out of balance");
			stack.pop();
		});
	}
}

/// The reaction that owns reads happening right now, if any.
pub(crate) fn current() -> Option<Rc<ReactionBody>> {
	OBSERVERS.with(|stack| stack.borrow().last().and_then(Weak::upgrade))
}

/// True while some reaction is evaluating on this thread.
pub fn is_tracking() -> bool {
	OBSERVERS.with(|stack| !stack.borrow().is_empty())
}
