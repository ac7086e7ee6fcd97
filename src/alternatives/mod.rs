//! Alternative sets: the closed list of types a [`Variant`](crate::Variant)
//! may hold.
//!
//! A set is a type-level list built from [`Alt`] nodes and terminated by
//! [`Nil`]. It is normally written with the [`alternatives!`] macro (or
//! directly as a variant type with [`Variant!`]):
//!
//! ```rust
//! use sumvar::{alternatives, AlternativeSet};
//!
//! type Set = alternatives![u8, #[backup] String, u64];
//!
//! assert_eq!(<Set as AlternativeSet>::COUNT, 3);
//! assert_eq!(<Set as AlternativeSet>::BACKUP_COUNT, 1);
//! assert!(<Set as AlternativeSet>::MAX_SIZE >= core::mem::size_of::<String>());
//! ```
//!
//! Each alternative gets the 0-based index of its declaration position. The
//! set computes the aggregate layout of its storage slots and partitions the
//! alternatives by [`Kind`].
//!
//! # Definition-time checks
//!
//! - A variant over fewer than two alternatives fails to compile as soon as
//!   any of its constructors is instantiated.
//! - Type-directed operations (`new`, `set`, `get`, ...) resolve the index of
//!   a type through [`Contains`]; a type that is not in the set, or that
//!   appears in it twice, fails to resolve.
//! - A set naming the same type twice can still be spelled, and index-directed
//!   constructors (`new_at`) would otherwise accept it. Every constructor
//!   therefore panics, in release builds too, before a variant over such a
//!   set exists.

pub mod index;
pub mod kind;
pub mod member;
pub mod ops;

pub use index::{Here, Index, There};
pub use kind::{BackedUp, Indirect, Inline, Kind};
pub use member::{At, Contains};
pub use ops::{
    CloneAll, DebugAll, DefaultAll, DisplayAll, EqAll, OrdAll, PartialEqAll, PartialOrdAll,
    TypeIdAll,
};

use crate::storage::{self, Overlay};
use core::convert::Infallible;
use core::marker::PhantomData;
use core::mem;

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;

/// The largest number of alternatives a set may declare.
///
/// The discriminant stores the index as a signed 32-bit value.
pub const MAX_ALTERNATIVES: usize = i32::MAX as usize;

/// A list node: alternative `H` of storage kind `K`, followed by `Tail`.
///
/// Never instantiated; it only exists at the type level.
pub struct Alt<H, Tail, K = Inline>(Infallible, PhantomData<fn() -> (H, Tail, K)>);

/// The empty list terminating every alternative set.
pub enum Nil {}

/// Definition-time metadata of an ordered alternative list.
///
/// This trait is sealed; sets are built from [`Alt`] and [`Nil`] only.
/// The `unsafe` functions are the raw, index-driven operations that every
/// higher-level dispatch is built on: each walks the list comparing the index
/// against the node position and acts on the slot reinterpreted as the stored
/// type found there.
pub trait AlternativeSet: Sealed + Sized {
    /// Layout of a slot able to hold any alternative.
    type Primary;

    /// Layout of a slot able to hold any [`BackedUp`] alternative; `()` when
    /// there are none.
    type Backup;

    /// Number of alternatives.
    const COUNT: usize;

    /// Number of alternatives declared `#[backup]`.
    const BACKUP_COUNT: usize;

    /// Largest stored size over all alternatives.
    const MAX_SIZE: usize;

    /// Largest stored alignment over all alternatives.
    const MAX_ALIGN: usize;

    /// Whether alternative `index` stages replacements in the inactive slot.
    fn is_backed_up(index: usize) -> bool;

    /// Name of the alternative type at `index`, for diagnostics.
    fn type_name(index: usize) -> &'static str;

    /// Destroys the value of alternative `index` held at `at`.
    ///
    /// # Safety
    /// `at` must hold a live stored value of alternative `index`.
    unsafe fn drop_at(at: *mut u8, index: usize);

    /// Relocates the value of alternative `index` from `from` to `to`.
    ///
    /// # Safety
    /// `from` must hold a live stored value of alternative `index`; `to` must
    /// be a slot that fits it and does not overlap `from`. `from` is logically
    /// uninitialized afterwards.
    unsafe fn relocate_at(from: *const u8, to: *mut u8, index: usize);

    /// Swaps two values of alternative `index` in place.
    ///
    /// # Safety
    /// Both locations must hold live stored values of alternative `index`
    /// and must not overlap.
    unsafe fn swap_at(a: *mut u8, b: *mut u8, index: usize);
}

impl Sealed for Nil {}
impl<H, Tail, K> Sealed for Alt<H, Tail, K> {}

impl AlternativeSet for Nil {
    type Primary = ();
    type Backup = ();
    const COUNT: usize = 0;
    const BACKUP_COUNT: usize = 0;
    const MAX_SIZE: usize = 0;
    const MAX_ALIGN: usize = 1;

    fn is_backed_up(index: usize) -> bool {
        no_such_alternative(index)
    }

    fn type_name(index: usize) -> &'static str {
        no_such_alternative(index)
    }

    unsafe fn drop_at(_: *mut u8, index: usize) {
        no_such_alternative(index)
    }

    unsafe fn relocate_at(_: *const u8, _: *mut u8, index: usize) {
        no_such_alternative(index)
    }

    unsafe fn swap_at(_: *mut u8, _: *mut u8, index: usize) {
        no_such_alternative(index)
    }
}

impl<H, Tail, K> AlternativeSet for Alt<H, Tail, K>
where
    Tail: AlternativeSet,
    K: Kind,
{
    type Primary = Overlay<K::Stored<H>, Tail::Primary>;
    type Backup = K::Backup<K::Stored<H>, Tail::Backup>;

    const COUNT: usize = Tail::COUNT + 1;
    const BACKUP_COUNT: usize = Tail::BACKUP_COUNT + K::BACKED_UP as usize;
    const MAX_SIZE: usize = max(mem::size_of::<K::Stored<H>>(), Tail::MAX_SIZE);
    const MAX_ALIGN: usize = max(mem::align_of::<K::Stored<H>>(), Tail::MAX_ALIGN);

    #[inline]
    fn is_backed_up(index: usize) -> bool {
        if index == 0 {
            K::BACKED_UP
        } else {
            Tail::is_backed_up(index - 1)
        }
    }

    fn type_name(index: usize) -> &'static str {
        if index == 0 {
            core::any::type_name::<H>()
        } else {
            Tail::type_name(index - 1)
        }
    }

    #[inline]
    unsafe fn drop_at(at: *mut u8, index: usize) {
        if index == 0 {
            // SAFETY: caller asserts `at` holds alternative 0 of this node.
            unsafe { storage::drop_at::<K::Stored<H>>(at) }
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::drop_at(at, index - 1) }
        }
    }

    #[inline]
    unsafe fn relocate_at(from: *const u8, to: *mut u8, index: usize) {
        if index == 0 {
            // SAFETY: forwarded contract.
            unsafe { storage::relocate_at::<K::Stored<H>>(from, to) }
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::relocate_at(from, to, index - 1) }
        }
    }

    #[inline]
    unsafe fn swap_at(a: *mut u8, b: *mut u8, index: usize) {
        if index == 0 {
            // SAFETY: forwarded contract.
            unsafe { storage::swap_at::<K::Stored<H>>(a, b) }
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::swap_at(a, b, index - 1) }
        }
    }
}

const fn max(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}

/// Returns whether no alternative type is declared twice.
///
/// Compares type names, which are identical for identical types. Alternatives
/// need not be `'static`, so [`TypeId`](core::any::TypeId) is not available;
/// the only false positives are distinct types whose names coincide, such as
/// types differing only in lifetimes, which `Contains` cannot tell apart
/// either.
pub(crate) fn names_distinct<L: AlternativeSet>() -> bool {
    (0..L::COUNT).all(|i| (i + 1..L::COUNT).all(|j| L::type_name(i) != L::type_name(j)))
}

/// Reached when a discriminant matches no alternative.
///
/// The never-empty invariant makes this unreachable; getting here means
/// memory has been corrupted, so the process is aborted rather than unwound.
#[cold]
#[inline(never)]
pub(crate) fn no_such_alternative(index: usize) -> ! {
    crate::log::error_event!(index, "discriminant matches no alternative");
    eprintln!("sumvar: discriminant matches no alternative (offset {index}); aborting");
    std::process::abort()
}

/// Builds an alternative set type from a list of types.
///
/// Alternatives are plain types; prefix one with `#[backup]` to have its
/// replacements built in the variant's inactive slot, or with `#[recursive]`
/// to store it behind a [`Recursive`](crate::Recursive) box.
///
/// ```rust
/// use sumvar::alternatives;
/// use sumvar::alternatives::{Alt, BackedUp, Inline, Nil};
///
/// type Declared = alternatives![u32, #[backup] String];
/// type Spelled = Alt<u32, Alt<String, Nil, BackedUp>, Inline>;
///
/// fn same<T>(_: core::marker::PhantomData<T>, _: core::marker::PhantomData<T>) {}
/// same::<Declared>(core::marker::PhantomData, core::marker::PhantomData::<Spelled>);
/// ```
#[macro_export]
macro_rules! alternatives {
    () => { $crate::alternatives::Nil };
    (#[backup] $head:ty $(, $($rest:tt)*)?) => {
        $crate::alternatives::Alt<
            $head,
            $crate::alternatives!($($($rest)*)?),
            $crate::alternatives::BackedUp,
        >
    };
    (#[recursive] $head:ty $(, $($rest:tt)*)?) => {
        $crate::alternatives::Alt<
            $head,
            $crate::alternatives!($($($rest)*)?),
            $crate::alternatives::Indirect,
        >
    };
    ($head:ty $(, $($rest:tt)*)?) => {
        $crate::alternatives::Alt<
            $head,
            $crate::alternatives!($($($rest)*)?),
            $crate::alternatives::Inline,
        >
    };
}

/// Names a [`Variant`](crate::Variant) type over the given alternatives.
///
/// `Variant![A, #[backup] B]` is `Variant<alternatives![A, #[backup] B]>`.
#[macro_export]
macro_rules! Variant {
    ($($alternatives:tt)*) => {
        $crate::Variant<$crate::alternatives!($($alternatives)*)>
    };
}
