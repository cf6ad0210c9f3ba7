use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

// Deferred commits for the current thread. On wasm a microtask drains
// the queue; natively the host (or `batch`) owns the flush.
thread_local! {
	static QUEUE: RefCell<VecDeque<Box<dyn FnOnce()>>> = RefCell::new(VecDeque::new());
	static STARTED: Cell<bool> = Cell::new(false);
	#[cfg(target_arch = "wasm32")]
	static MICROTASK: Cell<bool> = Cell::new(false);
}

pub fn in_batch() -> bool {
	STARTED.with(|started| started.get())
}

/// Groups writes so their coalesced commits run once, at the exit of
/// the outermost batch.
pub fn batch<R>(func: impl FnOnce() -> R) -> R {
	let is_root = batch_start();
	let out = func();
	if is_root {
		batch_stop();
		flush();
	}
	out
}

fn batch_start() -> bool {
	STARTED.with(|started| {
		if started.get() {
			false
		} else {
			started.set(true);
			true
		}
	})
}

fn batch_stop() {
	STARTED.with(|started| started.set(false));
}

/// Queues `task` for the next flush. Inside a batch the task waits for
/// the outermost exit; on wasm a microtask drain is scheduled for the
/// first task of a window; natively the queue waits for an explicit
/// [`flush`] — the host's timer stands in for a microtask boundary.
pub(crate) fn defer(task: impl FnOnce() + 'static) {
	QUEUE.with(|queue| queue.borrow_mut().push_back(Box::new(task)));
	if !in_batch() {
		schedule_flush();
	}
}

#[cfg(target_arch = "wasm32")]
fn schedule_flush() {
	let is_first = MICROTASK.with(|scheduled| {
		if scheduled.get() {
			false
		} else {
			scheduled.set(true);
			true
		}
	});
	if is_first {
		crate::microtask::queue(|| {
			MICROTASK.with(|scheduled| scheduled.set(false));
			flush();
		});
	}
}

#[cfg(not(target_arch = "wasm32"))]
fn schedule_flush() {}

/// Drains the deferred queue until it stays empty. Commits may queue
/// further work; the queue borrow is released around every task, so
/// tasks may defer and flush reentrantly.
pub fn flush() {
	loop {
		let task = QUEUE.with(|queue| queue.borrow_mut().pop_front());
		match task {
			Some(task) => task(),
			None => break,
		}
	}
}
