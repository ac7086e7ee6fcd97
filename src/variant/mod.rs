//! `Variant<L>`: a value holding exactly one alternative of the set `L`.
//!
//! # Layout
//!
//! ```text
//! Variant<L>
//! ├── discriminant: i32                 index + active slot
//! ├── primary:  StorageSlot<L::Primary> fits every alternative
//! └── backup:   StorageSlot<L::Backup>  fits `#[backup]` alternatives only
//! ```
//!
//! When the set declares no `#[backup]` alternative the backup slot is
//! zero-sized.
//!
//! # Never empty
//!
//! At every observable instant exactly one slot holds exactly one fully
//! constructed value, and the discriminant names it. No operation, including
//! one that fails or unwinds midway, leaves a variant without a value:
//!
//! - constructors produce the value before the variant exists;
//! - assignment produces the replacement before touching the current value
//!   (see [`try_assign_with`](Variant::try_assign_with));
//! - swapping only relocates values, which cannot fail.
//!
//! There is no empty state; [`Variant::is_empty`] is always `false`.

mod assign;
mod discriminant;
mod swap;
mod traits;

pub use swap::swap;

pub(crate) use discriminant::Discriminant;

use crate::alternatives::{
    names_distinct, AlternativeSet, At, Contains, DefaultAll, Index, Kind, TypeIdAll,
    MAX_ALTERNATIVES,
};
use crate::error::BadGet;
use crate::storage::{read_at, view_at, view_at_mut, StorageSlot};
use crate::visit::{Accept, AcceptMut, AcceptOnce, Visitor};
use core::any::TypeId;
use core::mem::ManuallyDrop;

/// Storage kind of alternative `T` (at index `I`) in set `L`.
pub(crate) type KindOf<L, T, I> = <L as Contains<T, I>>::Kind;

/// Stored form of alternative `T` (at index `I`) in set `L`.
pub(crate) type StoredOf<L, T, I> = <KindOf<L, T, I> as Kind>::Stored<T>;

/// A closed-set discriminated union over the alternatives `L`.
///
/// Usually named with the [`Variant!`](crate::Variant!) macro:
///
/// ```rust
/// use sumvar::Variant;
///
/// let mut v = <Variant![i32, String]>::new(1i32);
/// assert_eq!(v.which(), 0);
///
/// v.set(String::from("hello"));
/// assert_eq!(v.which(), 1);
/// assert_eq!(v.get::<String, _>().map(String::as_str), Some("hello"));
/// assert_eq!(v.get::<i32, _>(), None);
/// ```
pub struct Variant<L: AlternativeSet> {
    discriminant: Discriminant,
    primary: StorageSlot<L::Primary>,
    backup: StorageSlot<L::Backup>,
}

impl<L: AlternativeSet> Variant<L> {
    const WELL_FORMED: () = {
        assert!(L::COUNT >= 2, "a variant needs at least two alternatives");
        assert!(
            L::COUNT <= MAX_ALTERNATIVES,
            "too many alternatives for the discriminant"
        );
    };

    /// Builds a variant holding alternative `index` in the primary slot.
    ///
    /// Every constructor ends here, after the stored value already exists.
    ///
    /// # Safety
    /// `stored` must be the stored form of alternative `index`.
    #[inline]
    pub(crate) unsafe fn from_stored<S>(index: usize, stored: S) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::WELL_FORMED;
        assert!(
            names_distinct::<L>(),
            "an alternative type is declared more than once"
        );
        debug_assert!(StorageSlot::<L::Primary>::fits::<S>());

        let mut primary = StorageSlot::uninit();
        // SAFETY: `S` is an alternative's stored form and fits the slot.
        unsafe { primary.construct_as(stored) };
        Self {
            discriminant: Discriminant::primary(index),
            primary,
            backup: StorageSlot::uninit(),
        }
    }

    /// Creates a variant holding `value`.
    ///
    /// `T` must be exactly one of the alternatives.
    #[inline]
    pub fn new<T, I>(value: T) -> Self
    where
        L: Contains<T, I>,
        I: Index,
    {
        let stored = KindOf::<L, T, I>::store(value);
        // SAFETY: `stored` is the stored form of alternative `I`.
        unsafe { Self::from_stored(I::VALUE, stored) }
    }

    /// Creates a variant holding alternative `T`, converted from `value`.
    ///
    /// The target alternative is named explicitly, so a conversion can never
    /// be ambiguous:
    ///
    /// ```rust
    /// use sumvar::Variant;
    ///
    /// let v = <Variant![i32, String]>::new_from::<String, _, _>("hello");
    /// assert_eq!(v.which(), 1);
    /// ```
    #[inline]
    pub fn new_from<T, I, V>(value: V) -> Self
    where
        L: Contains<T, I>,
        I: Index,
        V: Into<T>,
    {
        Self::new::<T, I>(value.into())
    }

    /// Creates a variant holding alternative number `I`.
    #[inline]
    pub fn new_at<I>(value: <L as At<I>>::Output) -> Self
    where
        L: At<I>,
        I: Index,
    {
        let stored = <L as At<I>>::Kind::store(value);
        // SAFETY: `stored` is the stored form of alternative `I`.
        unsafe { Self::from_stored(I::VALUE, stored) }
    }

    /// The 0-based index of the active alternative.
    #[inline]
    pub fn which(&self) -> usize {
        self.discriminant.which()
    }

    /// Whether the active alternative is `T`.
    #[inline]
    pub fn is<T, I>(&self) -> bool
    where
        L: Contains<T, I>,
        I: Index,
    {
        self.which() == I::VALUE
    }

    /// Always `false`: a variant is never empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Whether the active value currently lives in the backup slot.
    ///
    /// Only `#[backup]` alternatives ever move there; this is a layout
    /// detail exposed for diagnostics.
    #[inline]
    pub fn is_in_backup_slot(&self) -> bool {
        self.discriminant.in_backup()
    }

    /// Type identity of the active alternative.
    pub fn type_id(&self) -> TypeId
    where
        L: TypeIdAll,
    {
        L::type_id_at(self.which())
    }

    pub(crate) fn type_name(&self) -> &'static str {
        L::type_name(self.which())
    }

    #[inline(always)]
    pub(crate) fn active_ptr(&self) -> *const u8 {
        if self.discriminant.in_backup() {
            self.backup.address()
        } else {
            self.primary.address()
        }
    }

    #[inline(always)]
    pub(crate) fn active_ptr_mut(&mut self) -> *mut u8 {
        if self.discriminant.in_backup() {
            self.backup.address_mut()
        } else {
            self.primary.address_mut()
        }
    }

    #[inline(always)]
    pub(crate) fn inactive_ptr_mut(&mut self) -> *mut u8 {
        if self.discriminant.in_backup() {
            self.primary.address_mut()
        } else {
            self.backup.address_mut()
        }
    }

    fn bad_get(&self, requested: usize) -> BadGet {
        BadGet::new(
            requested,
            self.which(),
            L::type_name(requested),
            self.type_name(),
        )
    }

    /// Borrows the value if the active alternative is `T`.
    #[inline]
    pub fn get<T, I>(&self) -> Option<&T>
    where
        L: Contains<T, I>,
        I: Index,
    {
        if self.is::<T, I>() {
            // SAFETY: the discriminant says the active slot holds `T`.
            Some(unsafe { self.get_unchecked::<T, I>() })
        } else {
            None
        }
    }

    /// Mutably borrows the value if the active alternative is `T`.
    #[inline]
    pub fn get_mut<T, I>(&mut self) -> Option<&mut T>
    where
        L: Contains<T, I>,
        I: Index,
    {
        if self.is::<T, I>() {
            // SAFETY: the discriminant says the active slot holds `T`.
            Some(unsafe { self.get_unchecked_mut::<T, I>() })
        } else {
            None
        }
    }

    /// Borrows the value as `T`, or reports which alternative is held.
    ///
    /// # Errors
    ///
    /// Returns [`BadGet`] if the active alternative is not `T`.
    pub fn try_get<T, I>(&self) -> Result<&T, BadGet>
    where
        L: Contains<T, I>,
        I: Index,
    {
        self.get::<T, I>().ok_or_else(|| self.bad_get(I::VALUE))
    }

    /// Mutably borrows the value as `T`, or reports which alternative is held.
    ///
    /// # Errors
    ///
    /// Returns [`BadGet`] if the active alternative is not `T`.
    pub fn try_get_mut<T, I>(&mut self) -> Result<&mut T, BadGet>
    where
        L: Contains<T, I>,
        I: Index,
    {
        if !self.is::<T, I>() {
            return Err(self.bad_get(I::VALUE));
        }
        // SAFETY: checked above.
        Ok(unsafe { self.get_unchecked_mut::<T, I>() })
    }

    /// Borrows the value as `T` without checking the discriminant.
    ///
    /// # Safety
    /// The active alternative must be `T`.
    #[inline]
    pub unsafe fn get_unchecked<T, I>(&self) -> &T
    where
        L: Contains<T, I>,
        I: Index,
    {
        debug_assert!(self.is::<T, I>());
        // SAFETY: caller asserts the active slot holds `T`'s stored form.
        KindOf::<L, T, I>::view(unsafe { view_at::<StoredOf<L, T, I>>(self.active_ptr()) })
    }

    /// Mutably borrows the value as `T` without checking the discriminant.
    ///
    /// # Safety
    /// The active alternative must be `T`.
    #[inline]
    pub unsafe fn get_unchecked_mut<T, I>(&mut self) -> &mut T
    where
        L: Contains<T, I>,
        I: Index,
    {
        debug_assert!(self.is::<T, I>());
        // SAFETY: caller asserts the active slot holds `T`'s stored form.
        KindOf::<L, T, I>::view_mut(unsafe {
            view_at_mut::<StoredOf<L, T, I>>(self.active_ptr_mut())
        })
    }

    /// Borrows the value if the active alternative is number `I`.
    pub fn get_at<I>(&self) -> Option<&<L as At<I>>::Output>
    where
        L: At<I>,
        I: Index,
    {
        if self.which() != I::VALUE {
            return None;
        }
        // SAFETY: the discriminant says the active slot holds alternative `I`.
        let stored = unsafe {
            view_at::<<<L as At<I>>::Kind as Kind>::Stored<<L as At<I>>::Output>>(
                self.active_ptr(),
            )
        };
        Some(<L as At<I>>::Kind::view(stored))
    }

    /// Mutably borrows the value if the active alternative is number `I`.
    pub fn get_at_mut<I>(&mut self) -> Option<&mut <L as At<I>>::Output>
    where
        L: At<I>,
        I: Index,
    {
        if self.which() != I::VALUE {
            return None;
        }
        // SAFETY: the discriminant says the active slot holds alternative `I`.
        let stored = unsafe {
            view_at_mut::<<<L as At<I>>::Kind as Kind>::Stored<<L as At<I>>::Output>>(
                self.active_ptr_mut(),
            )
        };
        Some(<L as At<I>>::Kind::view_mut(stored))
    }

    /// Borrows the value as any `'static` type `T`, which need not be an
    /// alternative; absent unless the active alternative is exactly `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T>
    where
        L: TypeIdAll,
    {
        let which = self.which();
        if L::type_id_at(which) != TypeId::of::<T>() {
            return None;
        }
        // SAFETY: the active alternative is `T`; `presented_at` unwraps its
        // stored form.
        Some(unsafe { &*L::presented_at(self.active_ptr(), which).cast::<T>() })
    }

    /// Mutable counterpart of [`downcast_ref`](Self::downcast_ref).
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T>
    where
        L: TypeIdAll,
    {
        let which = self.which();
        if L::type_id_at(which) != TypeId::of::<T>() {
            return None;
        }
        // SAFETY: as in `downcast_ref`, with exclusive access.
        Some(unsafe { &mut *L::presented_at_mut(self.active_ptr_mut(), which).cast::<T>() })
    }

    /// Moves the value out if the active alternative is `T`.
    ///
    /// # Errors
    ///
    /// Gives the variant back unchanged if it holds another alternative.
    pub fn into_inner<T, I>(self) -> Result<T, Self>
    where
        L: Contains<T, I>,
        I: Index,
    {
        if !self.is::<T, I>() {
            return Err(self);
        }
        let mut this = ManuallyDrop::new(self);
        // SAFETY: the active slot holds `T`'s stored form; `this` is never
        // dropped, so the value is moved out exactly once.
        let stored = unsafe { read_at::<StoredOf<L, T, I>>(this.active_ptr_mut()) };
        Ok(KindOf::<L, T, I>::unstore(stored))
    }

    /// Moves the active value into a new variant, leaving the default value
    /// of the *same* alternative behind.
    ///
    /// This is the non-destructive move: `self` stays non-empty and keeps its
    /// alternative. A plain Rust move of the variant is the destructive one.
    pub fn take(&mut self) -> Self
    where
        L: DefaultAll,
    {
        let which = self.which();
        let mut primary = StorageSlot::uninit();
        // SAFETY: the active slot holds alternative `which`; `primary` is empty
        // and fits every alternative.
        unsafe { L::take_at(self.active_ptr_mut(), primary.address_mut(), which) };
        Self {
            discriminant: Discriminant::primary(which),
            primary,
            backup: StorageSlot::uninit(),
        }
    }

    /// Calls `visitor` with a shared reference to the active value.
    #[inline]
    pub fn visit<V>(&self, mut visitor: V) -> V::Output
    where
        V: Visitor,
        L: Accept<V>,
    {
        // SAFETY: the active slot holds alternative `which`.
        unsafe { L::accept(self.active_ptr(), self.which(), &mut visitor) }
    }

    /// Calls `visitor` with a mutable reference to the active value.
    #[inline]
    pub fn visit_mut<V>(&mut self, mut visitor: V) -> V::Output
    where
        V: Visitor,
        L: AcceptMut<V>,
    {
        let which = self.which();
        // SAFETY: the active slot holds alternative `which`, borrowed
        // exclusively through `&mut self`.
        unsafe { L::accept_mut(self.active_ptr_mut(), which, &mut visitor) }
    }

    /// Consumes the variant, handing the active value to `visitor`.
    #[inline]
    pub fn into_visit<V>(self, visitor: V) -> V::Output
    where
        V: Visitor,
        L: AcceptOnce<V>,
    {
        let mut this = ManuallyDrop::new(self);
        let which = this.which();
        // SAFETY: the value is moved out exactly once and `this` is never
        // dropped.
        unsafe { L::accept_once(this.active_ptr_mut(), which, visitor) }
    }
}

impl<L: AlternativeSet> Drop for Variant<L> {
    fn drop(&mut self) {
        let which = self.which();
        // SAFETY: the never-empty invariant guarantees a live value here.
        unsafe { L::drop_at(self.active_ptr_mut(), which) }
    }
}

#[cfg(test)]
mod tests {
    use crate::alternatives::index::{I0, I1, I2};
    use crate::Variant;

    type Small = Variant![u8, String, Vec<u32>];

    #[test]
    fn test_default_construction_holds_first_alternative() {
        let v = Small::default();
        assert_eq!(v.which(), 0);
        assert_eq!(v.get::<u8, _>(), Some(&0));
        assert!(!v.is_in_backup_slot());
        assert!(!v.is_empty());
    }

    #[test]
    fn test_index_directed_access() {
        let mut v = Small::new_at::<I2>(vec![1, 2]);
        assert_eq!(v.which(), 2);
        assert_eq!(v.get_at::<I2>(), Some(&vec![1, 2]));
        assert_eq!(v.get_at::<I0>(), None);
        v.get_at_mut::<I2>().unwrap().push(3);
        assert_eq!(v.get::<Vec<u32>, _>().map(Vec::len), Some(3));
        assert!(v.get_at_mut::<I1>().is_none());
    }

    #[test]
    fn test_try_get_reports_indices() {
        let v = Small::new(7u8);
        let err = v.try_get::<String, _>().unwrap_err();
        assert_eq!(err.requested(), 1);
        assert_eq!(err.held(), 0);
        assert_eq!(err.held_name(), "u8");
        assert_eq!(v.try_get::<u8, _>(), Ok(&7));
    }

    #[test]
    fn test_into_inner() {
        let v = Small::new(String::from("moved"));
        let v = v.into_inner::<u8, _>().unwrap_err();
        assert_eq!(v.into_inner::<String, _>().unwrap(), "moved");
    }

    #[test]
    fn test_take_leaves_same_alternative() {
        let mut source = Small::new(String::from("payload"));
        let moved = source.take();
        assert_eq!(moved.get::<String, _>().map(String::as_str), Some("payload"));
        assert_eq!(source.which(), 1);
        assert_eq!(source.get::<String, _>().map(String::as_str), Some(""));
    }

    #[test]
    fn test_downcast() {
        let mut v = Small::new(5u8);
        assert_eq!(v.downcast_ref::<u8>(), Some(&5));
        assert_eq!(v.downcast_ref::<i64>(), None);
        *v.downcast_mut::<u8>().unwrap() = 6;
        assert_eq!(v.get::<u8, _>(), Some(&6));
    }

    #[test]
    #[should_panic(expected = "declared more than once")]
    fn test_repeated_alternative_rejected_at_construction() {
        type Repeated = Variant![u8, String, u8];
        let _ = Repeated::new_at::<I2>(1);
    }
}
