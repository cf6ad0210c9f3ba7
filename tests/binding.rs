use std::rc::Rc;

use mockall::predicate::eq;
use retrack::{batch, bind, create_store, flush, patch, selector, ShallowEq, Signal};

mod mock;

use mock::{SharedMock, Spy};

#[derive(Clone, Hash)]
struct State {
	x: i64,
	y: i64,
}

#[derive(Clone, Hash)]
struct Counter {
	count: u64,
}

#[derive(Clone, Hash)]
struct Pair {
	left: u64,
	right: u64,
}

impl ShallowEq for Pair {
	fn shallow_eq(&self, other: &Self) -> bool {
		self.left.shallow_eq(&other.left) && self.right.shallow_eq(&other.right)
	}
}

#[test]
fn selector_cutoff() {
	let store = create_store(State { x: 1, y: 2 });
	let binding = store.bind(selector!(state => state.x));
	let mock = SharedMock::new();
	let _sub = binding.subscribe({
		let mock = mock.clone();
		move |x: &i64| mock.get().publish(*x)
	});

	// Only `y` changes: the selected value is untouched, nothing is
	// republished.
	mock.get().expect_publish().times(0).return_const(());
	store.dispatch(patch!(prev => State { y: 99, ..prev.clone() }));
	flush();
	mock.get().checkpoint();
	assert_eq!(binding.get(), 1);

	mock.get().expect_publish().with(eq(2)).times(1).return_const(());
	store.dispatch(patch!(prev => State { x: 2, ..prev.clone() }));
	flush();
	mock.get().checkpoint();
	assert_eq!(binding.get(), 2);
}

#[test]
fn coalesces_writes_into_one_publication() {
	let store = create_store(State { x: 0, y: 0 });
	let binding = store.bind(selector!(state => state.x));
	let mock = SharedMock::new();
	let _sub = binding.subscribe({
		let mock = mock.clone();
		move |x: &i64| mock.get().publish(*x)
	});

	mock.get().expect_publish().with(eq(2)).times(1).return_const(());
	store.dispatch(patch!(prev => State { x: 1, ..prev.clone() }));
	store.dispatch(patch!(prev => State { x: 2, ..prev.clone() }));
	flush();
	mock.get().checkpoint();
	assert_eq!(binding.get(), 2);
}

#[test]
fn batch_flushes_on_exit() {
	let doubled_source = Signal::new(3u64);
	let binding = bind(doubled_source.clone(), |value: &u64| *value * 2);
	let mock = SharedMock::new();
	let _sub = binding.subscribe({
		let mock = mock.clone();
		move |doubled: &u64| mock.get().publish(*doubled as i64)
	});

	assert_eq!(binding.get(), 6);

	mock.get().expect_publish().with(eq(14)).times(1).return_const(());
	batch(|| {
		doubled_source.set(5);
		doubled_source.set(7);
	});
	mock.get().checkpoint();
	assert_eq!(binding.get(), 14);
}

#[test]
fn dispatch_applies_updates_in_sequence() {
	let store = create_store(Counter { count: 0 });
	store.dispatch(|prev| Counter { count: prev.count + 1 });
	store.dispatch(|prev| Counter { count: prev.count + 1 });
	assert_eq!(store.get_untracked().count, 2);

	store.replace(Counter { count: 10 });
	assert_eq!(store.get_untracked().count, 10);
}

#[test]
fn render_reflects_latest_state() {
	let store = create_store(Counter { count: 1 });
	let binding = store.bind(selector!(state => state.count));
	assert_eq!(binding.render(), 1);

	store.dispatch(|prev| Counter { count: prev.count + 5 });
	// Host-driven re-evaluation sees the new state without a flush.
	assert_eq!(binding.render(), 6);

	// The pending commit then finds nothing further to publish.
	flush();
	assert_eq!(binding.get(), 6);
}

#[test]
fn bind_state_republishes_whole_state() {
	let store = create_store(Pair { left: 1, right: 2 });
	let binding = store.bind_state();
	let mock = SharedMock::new();
	let _sub = binding.subscribe({
		let mock = mock.clone();
		move |state: &Pair| mock.get().publish(state.right as i64)
	});

	mock.get().expect_publish().with(eq(9)).times(1).return_const(());
	store.dispatch(|prev| Pair { right: 9, ..prev.clone() });
	flush();
	mock.get().checkpoint();
}

#[test]
fn dropped_binding_is_detached() {
	let store = create_store(Counter { count: 0 });
	let mock = SharedMock::new();
	{
		let binding = store.bind(selector!(state => state.count as i64));
		let _sub = binding.subscribe({
			let mock = mock.clone();
			move |count: &i64| mock.get().publish(*count)
		});
	}

	mock.get().expect_publish().times(0).return_const(());
	store.dispatch(|prev| Counter { count: prev.count + 1 });
	flush();
	mock.get().checkpoint();
}

#[test]
fn dropped_subscription_detaches_listener() {
	let store = create_store(Counter { count: 0 });
	let binding = store.bind(selector!(state => state.count));
	let mock = SharedMock::new();
	let sub = binding.subscribe({
		let mock = mock.clone();
		move |count: &u64| mock.get().publish(*count as i64)
	});
	std::mem::drop(sub);

	mock.get().expect_publish().times(0).return_const(());
	store.dispatch(|prev| Counter { count: prev.count + 1 });
	flush();
	mock.get().checkpoint();

	// The binding itself still recomputed.
	assert_eq!(binding.get(), 1);
}

#[test]
fn shallow_contract() {
	assert!(1i64.shallow_eq(&1));
	assert!(!1i64.shallow_eq(&2));
	assert!("left".shallow_eq(&"left"));

	// Shared handles compare by pointer, not contents.
	let first = Rc::new(5u64);
	let alias = first.clone();
	let twin = Rc::new(5u64);
	assert!(first.shallow_eq(&alias));
	assert!(!first.shallow_eq(&twin));

	// Containers compare shape plus direct members.
	assert!(vec![first.clone()].shallow_eq(&vec![alias.clone()]));
	assert!(!vec![first.clone()].shallow_eq(&vec![twin.clone()]));
	assert!(!vec![first.clone()].shallow_eq(&Vec::new()));

	assert!((1u64, "x").shallow_eq(&(1u64, "x")));
	assert!(!(1u64, "x").shallow_eq(&(1u64, "y")));

	assert!(Some(first.clone()).shallow_eq(&Some(alias)));
	assert!(!Some(first).shallow_eq(&None));
}
