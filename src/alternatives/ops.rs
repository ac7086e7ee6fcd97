//! Whole-set capabilities.
//!
//! Each trait here holds when *every* alternative of a set supports the
//! corresponding standard trait, and provides the index-driven operation the
//! [`Variant`](crate::Variant) impls are built on. Like the raw operations of
//! [`AlternativeSet`], each one scans the list for the active index and acts on
//! the slot reinterpreted as the real stored type, presenting the unwrapped
//! alternative for [`Indirect`](super::Indirect) ones.

use super::{no_such_alternative, Alt, AlternativeSet, Kind, Nil};
use crate::storage::{view_at, view_at_mut, write_at};
use core::any::TypeId;
use core::cmp::Ordering;
use core::fmt;
use core::mem;

/// Every alternative is [`Clone`].
pub trait CloneAll: AlternativeSet {
    /// Writes a copy of the alternative-`index` value at `from` into `to`.
    ///
    /// `Clone` may panic; `to` then holds nothing.
    ///
    /// # Safety
    /// `from` must hold a live value of alternative `index`; `to` must fit it
    /// and hold no live value.
    unsafe fn clone_at(from: *const u8, to: *mut u8, index: usize);
}

/// Every alternative is [`Default`].
pub trait DefaultAll: AlternativeSet {
    /// Moves the alternative-`index` value at `from` into `to`, leaving that
    /// alternative's default value behind at `from`.
    ///
    /// # Safety
    /// `from` must hold a live value of alternative `index`; `to` must fit it
    /// and hold no live value.
    unsafe fn take_at(from: *mut u8, to: *mut u8, index: usize);
}

/// Every alternative is [`PartialEq`].
pub trait PartialEqAll: AlternativeSet {
    /// Compares two values of alternative `index`.
    ///
    /// # Safety
    /// Both locations must hold live values of alternative `index`.
    unsafe fn eq_at(a: *const u8, b: *const u8, index: usize) -> bool;
}

/// Every alternative is [`Eq`].
pub trait EqAll: PartialEqAll {}

/// Every alternative is [`PartialOrd`].
pub trait PartialOrdAll: PartialEqAll {
    /// Orders two values of alternative `index`.
    ///
    /// # Safety
    /// Both locations must hold live values of alternative `index`.
    unsafe fn partial_cmp_at(a: *const u8, b: *const u8, index: usize) -> Option<Ordering>;
}

/// Every alternative is [`Ord`].
pub trait OrdAll: PartialOrdAll + EqAll {
    /// Orders two values of alternative `index`.
    ///
    /// # Safety
    /// Both locations must hold live values of alternative `index`.
    unsafe fn cmp_at(a: *const u8, b: *const u8, index: usize) -> Ordering;
}

/// Every alternative is [`fmt::Debug`].
pub trait DebugAll: AlternativeSet {
    /// Formats the alternative-`index` value at `at` with `Debug`.
    ///
    /// # Safety
    /// `at` must hold a live value of alternative `index`.
    unsafe fn fmt_debug_at(at: *const u8, index: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Every alternative is [`fmt::Display`].
pub trait DisplayAll: AlternativeSet {
    /// Formats the alternative-`index` value at `at` with `Display`.
    ///
    /// # Safety
    /// `at` must hold a live value of alternative `index`.
    unsafe fn fmt_display_at(
        at: *const u8,
        index: usize,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result;
}

/// Every alternative is `'static`, so each has a [`TypeId`].
pub trait TypeIdAll: AlternativeSet {
    /// Type identity of alternative `index`.
    fn type_id_at(index: usize) -> TypeId;

    /// Address of the alternative-`index` value presented at `at`, past any
    /// indirection.
    ///
    /// # Safety
    /// `at` must hold a live value of alternative `index`.
    unsafe fn presented_at(at: *const u8, index: usize) -> *const u8;

    /// Mutable counterpart of [`presented_at`](Self::presented_at).
    ///
    /// # Safety
    /// `at` must hold a live value of alternative `index`, exclusively
    /// borrowed.
    unsafe fn presented_at_mut(at: *mut u8, index: usize) -> *mut u8;
}

// Terminal cases: reaching `Nil` means the index matched nothing.

impl CloneAll for Nil {
    unsafe fn clone_at(_: *const u8, _: *mut u8, index: usize) {
        no_such_alternative(index)
    }
}

impl DefaultAll for Nil {
    unsafe fn take_at(_: *mut u8, _: *mut u8, index: usize) {
        no_such_alternative(index)
    }
}

impl PartialEqAll for Nil {
    unsafe fn eq_at(_: *const u8, _: *const u8, index: usize) -> bool {
        no_such_alternative(index)
    }
}

impl EqAll for Nil {}

impl PartialOrdAll for Nil {
    unsafe fn partial_cmp_at(_: *const u8, _: *const u8, index: usize) -> Option<Ordering> {
        no_such_alternative(index)
    }
}

impl OrdAll for Nil {
    unsafe fn cmp_at(_: *const u8, _: *const u8, index: usize) -> Ordering {
        no_such_alternative(index)
    }
}

impl DebugAll for Nil {
    unsafe fn fmt_debug_at(_: *const u8, index: usize, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        no_such_alternative(index)
    }
}

impl DisplayAll for Nil {
    unsafe fn fmt_display_at(
        _: *const u8,
        index: usize,
        _: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        no_such_alternative(index)
    }
}

impl TypeIdAll for Nil {
    fn type_id_at(index: usize) -> TypeId {
        no_such_alternative(index)
    }

    unsafe fn presented_at(_: *const u8, index: usize) -> *const u8 {
        no_such_alternative(index)
    }

    unsafe fn presented_at_mut(_: *mut u8, index: usize) -> *mut u8 {
        no_such_alternative(index)
    }
}

/// Presents the stored value at `at` as the node's alternative type.
///
/// # Safety
/// `at` must hold a live `K::Stored<H>` that outlives `'a`.
#[inline(always)]
unsafe fn present<'a, H, K: Kind>(at: *const u8) -> &'a H {
    // SAFETY: forwarded contract.
    K::view(unsafe { view_at::<K::Stored<H>>(at) })
}

impl<H, Tail, K> CloneAll for Alt<H, Tail, K>
where
    H: Clone,
    Tail: CloneAll,
    K: Kind,
{
    #[inline]
    unsafe fn clone_at(from: *const u8, to: *mut u8, index: usize) {
        if index == 0 {
            // SAFETY: forwarded contract; `to` is written only after `clone`
            // returned.
            unsafe {
                let copy = present::<H, K>(from).clone();
                write_at(to, K::store(copy));
            }
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::clone_at(from, to, index - 1) }
        }
    }
}

impl<H, Tail, K> DefaultAll for Alt<H, Tail, K>
where
    H: Default,
    Tail: DefaultAll,
    K: Kind,
{
    #[inline]
    unsafe fn take_at(from: *mut u8, to: *mut u8, index: usize) {
        if index == 0 {
            // SAFETY: forwarded contract.
            unsafe {
                let stored = view_at_mut::<K::Stored<H>>(from);
                let value = mem::take(K::view_mut(stored));
                write_at(to, K::store(value));
            }
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::take_at(from, to, index - 1) }
        }
    }
}

impl<H, Tail, K> PartialEqAll for Alt<H, Tail, K>
where
    H: PartialEq,
    Tail: PartialEqAll,
    K: Kind,
{
    #[inline]
    unsafe fn eq_at(a: *const u8, b: *const u8, index: usize) -> bool {
        if index == 0 {
            // SAFETY: forwarded contract.
            unsafe { present::<H, K>(a) == present::<H, K>(b) }
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::eq_at(a, b, index - 1) }
        }
    }
}

impl<H, Tail, K> EqAll for Alt<H, Tail, K>
where
    H: Eq,
    Tail: EqAll,
    K: Kind,
{
}

impl<H, Tail, K> PartialOrdAll for Alt<H, Tail, K>
where
    H: PartialOrd,
    Tail: PartialOrdAll,
    K: Kind,
{
    #[inline]
    unsafe fn partial_cmp_at(a: *const u8, b: *const u8, index: usize) -> Option<Ordering> {
        if index == 0 {
            // SAFETY: forwarded contract.
            unsafe { present::<H, K>(a).partial_cmp(present::<H, K>(b)) }
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::partial_cmp_at(a, b, index - 1) }
        }
    }
}

impl<H, Tail, K> OrdAll for Alt<H, Tail, K>
where
    H: Ord,
    Tail: OrdAll,
    K: Kind,
{
    #[inline]
    unsafe fn cmp_at(a: *const u8, b: *const u8, index: usize) -> Ordering {
        if index == 0 {
            // SAFETY: forwarded contract.
            unsafe { present::<H, K>(a).cmp(present::<H, K>(b)) }
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::cmp_at(a, b, index - 1) }
        }
    }
}

impl<H, Tail, K> DebugAll for Alt<H, Tail, K>
where
    H: fmt::Debug,
    Tail: DebugAll,
    K: Kind,
{
    unsafe fn fmt_debug_at(at: *const u8, index: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if index == 0 {
            // SAFETY: forwarded contract.
            fmt::Debug::fmt(unsafe { present::<H, K>(at) }, f)
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::fmt_debug_at(at, index - 1, f) }
        }
    }
}

impl<H, Tail, K> DisplayAll for Alt<H, Tail, K>
where
    H: fmt::Display,
    Tail: DisplayAll,
    K: Kind,
{
    unsafe fn fmt_display_at(
        at: *const u8,
        index: usize,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if index == 0 {
            // SAFETY: forwarded contract.
            fmt::Display::fmt(unsafe { present::<H, K>(at) }, f)
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::fmt_display_at(at, index - 1, f) }
        }
    }
}

impl<H, Tail, K> TypeIdAll for Alt<H, Tail, K>
where
    H: 'static,
    Tail: TypeIdAll,
    K: Kind,
{
    fn type_id_at(index: usize) -> TypeId {
        if index == 0 {
            TypeId::of::<H>()
        } else {
            Tail::type_id_at(index - 1)
        }
    }

    unsafe fn presented_at(at: *const u8, index: usize) -> *const u8 {
        if index == 0 {
            // SAFETY: forwarded contract.
            let value: &H = unsafe { present::<H, K>(at) };
            (value as *const H).cast()
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::presented_at(at, index - 1) }
        }
    }

    unsafe fn presented_at_mut(at: *mut u8, index: usize) -> *mut u8 {
        if index == 0 {
            // SAFETY: forwarded contract.
            let value: &mut H = K::view_mut(unsafe { view_at_mut::<K::Stored<H>>(at) });
            (value as *mut H).cast()
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::presented_at_mut(at, index - 1) }
        }
    }
}
