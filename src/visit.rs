//! Visitor dispatch: run an operation on whichever alternative is active.
//!
//! A visitor is a type that implements [`Visit<T>`] (or [`VisitMut<T>`],
//! [`VisitOnce<T>`]) for *every* alternative `T` of a set, all sharing the one
//! [`Visitor::Output`] type. Dispatch locates the active alternative from the
//! discriminant, restores the value's real type and calls exactly one of those
//! implementations. A set the visitor does not fully cover, or a visitor
//! whose implementations disagree on the result type, does not compile.
//!
//! [`Indirect`](crate::alternatives::Indirect) alternatives are unwrapped: a
//! visitor over `alternatives![Leaf, #[recursive] Node]` implements
//! `Visit<Leaf>` and `Visit<Node>`, never `Visit<Recursive<Node>>`.
//!
//! ```rust
//! use sumvar::{Variant, Visit, Visitor};
//!
//! struct Width;
//!
//! impl Visitor for Width {
//!     type Output = usize;
//! }
//!
//! impl Visit<u32> for Width {
//!     fn visit(&mut self, value: &u32) -> usize {
//!         value.to_string().len()
//!     }
//! }
//!
//! impl Visit<String> for Width {
//!     fn visit(&mut self, value: &String) -> usize {
//!         value.len()
//!     }
//! }
//!
//! let v = <Variant![u32, String]>::new(String::from("four"));
//! assert_eq!(v.visit(Width), 4);
//! ```

use crate::alternatives::{no_such_alternative, Alt, AlternativeSet, Kind, Nil};
use crate::storage::{read_at, view_at, view_at_mut};

/// The common result type of a visitor.
pub trait Visitor {
    /// What every `visit*` call of this visitor returns.
    type Output;
}

/// Visits a shared reference to an alternative of type `T`.
pub trait Visit<T>: Visitor {
    /// Handles `value`, the active alternative.
    fn visit(&mut self, value: &T) -> Self::Output;
}

/// Visits a mutable reference to an alternative of type `T`.
pub trait VisitMut<T>: Visitor {
    /// Handles `value`, the active alternative.
    fn visit_mut(&mut self, value: &mut T) -> Self::Output;
}

/// Consumes an alternative of type `T`.
pub trait VisitOnce<T>: Visitor + Sized {
    /// Handles `value`, the active alternative, taking ownership of it.
    fn visit_once(self, value: T) -> Self::Output;
}

impl<V: Visitor + ?Sized> Visitor for &mut V {
    type Output = V::Output;
}

impl<T, V: Visit<T> + ?Sized> Visit<T> for &mut V {
    #[inline]
    fn visit(&mut self, value: &T) -> Self::Output {
        (**self).visit(value)
    }
}

impl<T, V: VisitMut<T> + ?Sized> VisitMut<T> for &mut V {
    #[inline]
    fn visit_mut(&mut self, value: &mut T) -> Self::Output {
        (**self).visit_mut(value)
    }
}

/// The set can dispatch shared visits to `V`.
pub trait Accept<V: Visitor>: AlternativeSet {
    /// Calls `visitor` on the alternative-`index` value at `at`.
    ///
    /// # Safety
    /// `at` must hold a live value of alternative `index`, not mutated for
    /// the duration of the call.
    unsafe fn accept(at: *const u8, index: usize, visitor: &mut V) -> V::Output;
}

/// The set can dispatch mutable visits to `V`.
pub trait AcceptMut<V: Visitor>: AlternativeSet {
    /// Calls `visitor` on the alternative-`index` value at `at`.
    ///
    /// # Safety
    /// `at` must hold a live value of alternative `index`, exclusively
    /// borrowed for the duration of the call.
    unsafe fn accept_mut(at: *mut u8, index: usize, visitor: &mut V) -> V::Output;
}

/// The set can dispatch consuming visits to `V`.
pub trait AcceptOnce<V: Visitor>: AlternativeSet {
    /// Moves the alternative-`index` value out of `at` into `visitor`.
    ///
    /// # Safety
    /// `at` must hold a live value of alternative `index`; it is logically
    /// uninitialized once this is called, even if the visitor unwinds.
    unsafe fn accept_once(at: *mut u8, index: usize, visitor: V) -> V::Output;
}

impl<V: Visitor> Accept<V> for Nil {
    unsafe fn accept(_: *const u8, index: usize, _: &mut V) -> V::Output {
        no_such_alternative(index)
    }
}

impl<V: Visitor> AcceptMut<V> for Nil {
    unsafe fn accept_mut(_: *mut u8, index: usize, _: &mut V) -> V::Output {
        no_such_alternative(index)
    }
}

impl<V: Visitor> AcceptOnce<V> for Nil {
    unsafe fn accept_once(_: *mut u8, index: usize, _: V) -> V::Output {
        no_such_alternative(index)
    }
}

impl<H, Tail, K, V> Accept<V> for Alt<H, Tail, K>
where
    Tail: Accept<V>,
    K: Kind,
    V: Visit<H>,
{
    #[inline]
    unsafe fn accept(at: *const u8, index: usize, visitor: &mut V) -> V::Output {
        if index == 0 {
            // SAFETY: the index says `at` holds this node's stored type.
            let stored = unsafe { view_at::<K::Stored<H>>(at) };
            visitor.visit(K::view(stored))
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::accept(at, index - 1, visitor) }
        }
    }
}

impl<H, Tail, K, V> AcceptMut<V> for Alt<H, Tail, K>
where
    Tail: AcceptMut<V>,
    K: Kind,
    V: VisitMut<H>,
{
    #[inline]
    unsafe fn accept_mut(at: *mut u8, index: usize, visitor: &mut V) -> V::Output {
        if index == 0 {
            // SAFETY: the index says `at` holds this node's stored type.
            let stored = unsafe { view_at_mut::<K::Stored<H>>(at) };
            visitor.visit_mut(K::view_mut(stored))
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::accept_mut(at, index - 1, visitor) }
        }
    }
}

impl<H, Tail, K, V> AcceptOnce<V> for Alt<H, Tail, K>
where
    Tail: AcceptOnce<V>,
    K: Kind,
    V: VisitOnce<H>,
{
    #[inline]
    unsafe fn accept_once(at: *mut u8, index: usize, visitor: V) -> V::Output {
        if index == 0 {
            // SAFETY: the index says `at` holds this node's stored type;
            // ownership moves out here.
            let stored = unsafe { read_at::<K::Stored<H>>(at) };
            visitor.visit_once(K::unstore(stored))
        } else {
            // SAFETY: forwarded contract.
            unsafe { Tail::accept_once(at, index - 1, visitor) }
        }
    }
}
