use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

/// One-level structural equality, used by bindings to decide whether a
/// derived value actually changed.
///
/// The contract: plain data compares by value, shared handles (`Rc`,
/// `Arc`) compare by pointer identity, and containers compare their
/// shape plus direct members by the members' own `shallow_eq` — no
/// recursion beyond that.
pub trait ShallowEq {
	fn shallow_eq(&self, other: &Self) -> bool;
}

macro_rules! shallow_by_value {
	($($ty:ty),* $(,)?) => {
		$(
			impl ShallowEq for $ty {
				#[inline]
				fn shallow_eq(&self, other: &Self) -> bool {
					self == other
				}
			}
		)*
	};
}

shallow_by_value!(
	(),
	bool,
	char,
	u8,
	u16,
	u32,
	u64,
	u128,
	usize,
	i8,
	i16,
	i32,
	i64,
	i128,
	isize,
	f32,
	f64,
	str,
	String,
);

impl<T> ShallowEq for &T
where
	T: ShallowEq + ?Sized,
{
	#[inline]
	fn shallow_eq(&self, other: &Self) -> bool {
		T::shallow_eq(*self, *other)
	}
}

impl<T: ?Sized> ShallowEq for Rc<T> {
	#[inline]
	fn shallow_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(self, other)
	}
}

impl<T: ?Sized> ShallowEq for Arc<T> {
	#[inline]
	fn shallow_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(self, other)
	}
}

impl<T> ShallowEq for Option<T>
where
	T: ShallowEq,
{
	fn shallow_eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Some(this), Some(that)) => this.shallow_eq(that),
			(None, None) => true,
			_ => false,
		}
	}
}

impl<T> ShallowEq for Vec<T>
where
	T: ShallowEq,
{
	fn shallow_eq(&self, other: &Self) -> bool {
		self.len() == other.len()
			&& self.iter().zip(other).all(|(this, that)| this.shallow_eq(that))
	}
}

impl<T, const N: usize> ShallowEq for [T; N]
where
	T: ShallowEq,
{
	fn shallow_eq(&self, other: &Self) -> bool {
		self.iter().zip(other).all(|(this, that)| this.shallow_eq(that))
	}
}

impl<K, V, S> ShallowEq for HashMap<K, V, S>
where
	K: Eq + Hash,
	V: ShallowEq,
	S: BuildHasher,
{
	fn shallow_eq(&self, other: &Self) -> bool {
		self.len() == other.len()
			&& self.iter().all(|(key, value)| {
				other
					.get(key)
					.map_or(false, |theirs| value.shallow_eq(theirs))
			})
	}
}

macro_rules! shallow_for_tuple {
	($($name:ident : $idx:tt),+) => {
		impl<$($name),+> ShallowEq for ($($name,)+)
		where
			$($name: ShallowEq,)+
		{
			fn shallow_eq(&self, other: &Self) -> bool {
				true $(&& self.$idx.shallow_eq(&other.$idx))+
			}
		}
	};
}

shallow_for_tuple!(A: 0);
shallow_for_tuple!(A: 0, B: 1);
shallow_for_tuple!(A: 0, B: 1, C: 2);
shallow_for_tuple!(A: 0, B: 1, C: 2, D: 3);
