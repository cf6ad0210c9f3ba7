pub use enclose::*;

/// Selector closure with cloned captures, for [`crate::Store::bind`]
/// and [`crate::Binding::new`].
#[macro_export]
macro_rules! selector {
    (( $($d_tt:tt)* ) $state:ident => $($b:tt)*) => {
        $crate::macros::enclose!(($( $d_tt )*) move |$state| { $($b)* })
    };
    ($state:ident => $($b:tt)*) => {
        move |$state| { $($b)* }
    };
}

/// Patch closure with cloned captures, for [`crate::Store::dispatch`].
#[macro_export]
macro_rules! patch {
    (( $($d_tt:tt)* ) $prev:ident => $($b:tt)*) => {
        $crate::macros::enclose!(($( $d_tt )*) move |$prev| { $($b)* })
    };
    ($prev:ident => $($b:tt)*) => {
        move |$prev| { $($b)* }
    };
}
