pub mod macros;

mod addr;
mod batch;
mod binding;
mod context;
mod dependencies;
mod microtask;
mod reaction;
mod shallow;
mod signal;
mod store;
mod value;

pub use batch::{batch, flush, in_batch};
pub use binding::{bind, Binding, Subscription};
pub use context::is_tracking;
pub use reaction::{create_reaction, Reaction};
pub use shallow::ShallowEq;
pub use signal::{create_signal, ReadSignal, Signal, WriteSignal};
pub use store::{create_store, Store};
pub use value::{Access, Ref, Value};
