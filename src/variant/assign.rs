//! Assignment with the strong guarantee.
//!
//! The replacement is always produced *before* the current value is touched,
//! so a failure while producing it (a panic, or an `Err` from
//! [`try_assign_with`](Variant::try_assign_with)) leaves the variant exactly
//! as it was. Where the replacement is produced depends on its kind:
//!
//! - `Inline` / `Indirect`: in a temporary. The current value is destroyed,
//!   then the temporary is relocated into the primary slot.
//! - `BackedUp`: directly in the slot that is currently inactive. The current
//!   value is destroyed and the discriminant flips to the other slot, so
//!   consecutive assignments alternate slots.
//!
//! Relocation cannot fail. If the old value's destructor unwinds, the
//! replacement is still committed before the unwind continues, so the
//! variant is never observed empty.

use super::{Discriminant, KindOf, StoredOf, Variant};
use crate::alternatives::{AlternativeSet, CloneAll, Contains, Index, Kind};
use crate::log::{trace_event, warn_event};
use crate::storage::{write_at, StorageSlot};
use core::convert::Infallible;
use core::mem;

/// Runs the commit step when dropped, so it also runs while a destructor
/// unwinds.
struct Commit<'a, L: AlternativeSet, F: FnOnce(&mut Variant<L>)> {
    variant: &'a mut Variant<L>,
    finish: Option<F>,
}

impl<L: AlternativeSet, F: FnOnce(&mut Variant<L>)> Drop for Commit<'_, L, F> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            warn_event!(
                alternative = self.variant.type_name(),
                "destructor unwound during assignment; committing replacement"
            );
        }
        if let Some(finish) = self.finish.take() {
            finish(self.variant);
        }
    }
}

impl<L: AlternativeSet> Variant<L> {
    /// Destroys the active value, then runs `finish`.
    ///
    /// # Safety
    /// `finish` must leave a live value in a slot and a discriminant naming
    /// it. It must not rely on the destroyed value.
    unsafe fn destroy_then<F: FnOnce(&mut Self)>(&mut self, finish: F) {
        let which = self.which();
        let mut guard = Commit {
            variant: self,
            finish: Some(finish),
        };
        // Derived through the guard's borrow so the guard can still use it.
        let at = guard.variant.active_ptr_mut();
        // SAFETY: `at` holds the live alternative `which`; the guard commits
        // the replacement whether or not this returns.
        unsafe { L::drop_at(at, which) };
        drop(guard);
    }

    /// Installs a value already built into the inactive slot.
    ///
    /// # Safety
    /// The inactive slot must hold a live stored value of alternative `index`.
    unsafe fn commit_inactive(&mut self, index: usize) {
        let next = self.discriminant.flipped(index);
        // SAFETY: the replacement already lives in the slot `next` names.
        unsafe { self.destroy_then(move |this| this.discriminant = next) };
    }

    /// Installs a stored value into the primary slot, replacing the active one.
    ///
    /// # Safety
    /// `stored` must be the stored form of alternative `index`.
    unsafe fn commit_primary<S>(&mut self, index: usize, stored: S) {
        debug_assert!(StorageSlot::<L::Primary>::fits::<S>());
        // SAFETY: the primary slot is free once the old value is gone, and
        // `S` fits it.
        unsafe {
            self.destroy_then(move |this| {
                this.primary.construct_as(stored);
                this.discriminant = Discriminant::primary(index);
            });
        }
    }

    /// Replaces the active value with the one `build` produces.
    ///
    /// `build` runs before anything is destroyed. If it returns `Err` or
    /// panics, the variant is left unchanged: same alternative, same value.
    ///
    /// # Errors
    ///
    /// Returns whatever error `build` returns.
    ///
    /// ```rust
    /// use sumvar::Variant;
    ///
    /// let mut v = <Variant![i32, String]>::new(5i32);
    /// let failed = v.try_assign_with::<String, _, _, _>(|| "x".parse::<f64>().map(|_| String::new()));
    /// assert!(failed.is_err());
    /// assert_eq!(v.get::<i32, _>(), Some(&5));
    /// ```
    pub fn try_assign_with<T, I, E, F>(&mut self, build: F) -> Result<(), E>
    where
        L: Contains<T, I>,
        I: Index,
        F: FnOnce() -> Result<T, E>,
    {
        trace_event!(
            from = self.which(),
            to = I::VALUE,
            backed_up = KindOf::<L, T, I>::BACKED_UP,
            "assign"
        );
        if KindOf::<L, T, I>::BACKED_UP {
            let stored = KindOf::<L, T, I>::store(build()?);
            debug_assert!(StorageSlot::<L::Backup>::fits::<StoredOf<L, T, I>>());
            let target = self.inactive_ptr_mut();
            // SAFETY: backed-up alternatives fit both slots, and the inactive
            // slot holds no live value.
            unsafe {
                write_at(target, stored);
                self.commit_inactive(I::VALUE);
            }
        } else {
            let stored = KindOf::<L, T, I>::store(build()?);
            // SAFETY: `stored` is alternative `I`'s stored form.
            unsafe { self.commit_primary(I::VALUE, stored) };
        }
        Ok(())
    }

    /// Replaces the active value with the one `build` produces.
    ///
    /// If `build` panics the variant is left unchanged.
    pub fn assign_with<T, I, F>(&mut self, build: F)
    where
        L: Contains<T, I>,
        I: Index,
        F: FnOnce() -> T,
    {
        match self.try_assign_with::<T, I, Infallible, _>(|| Ok(build())) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Replaces the active value with a clone of `value`.
    ///
    /// If `T::clone` panics the variant is left unchanged.
    pub fn assign<T, I>(&mut self, value: &T)
    where
        L: Contains<T, I>,
        I: Index,
        T: Clone,
    {
        self.assign_with::<T, I, _>(|| value.clone());
    }

    /// Replaces the active value with `value`.
    ///
    /// The value already exists, so this cannot fail short of the old value's
    /// destructor unwinding; `value` is installed even then.
    pub fn set<T, I>(&mut self, value: T)
    where
        L: Contains<T, I>,
        I: Index,
    {
        self.assign_with::<T, I, _>(move || value);
    }

    /// Replaces the active value with alternative `T`, converted from `value`.
    ///
    /// The assignment counterpart of [`new_from`](Variant::new_from). The
    /// conversion runs before the current value is touched.
    ///
    /// ```rust
    /// use sumvar::Variant;
    ///
    /// let mut v = <Variant![i32, String]>::new(0i32);
    /// v.set_from::<String, _, _>("hello");
    /// assert_eq!(v.get::<String, _>().map(String::as_str), Some("hello"));
    /// ```
    pub fn set_from<T, I, V>(&mut self, value: V)
    where
        L: Contains<T, I>,
        I: Index,
        V: Into<T>,
    {
        self.assign_with::<T, I, _>(move || value.into());
    }

    /// Replaces the whole variant with one holding `value`, returning the
    /// previous variant.
    pub fn replace<T, I>(&mut self, value: T) -> Self
    where
        L: Contains<T, I>,
        I: Index,
    {
        mem::replace(self, Self::new(value))
    }

    /// Makes `self` hold a copy of `source`'s value, whichever alternative
    /// that is.
    ///
    /// Same guarantee as the typed assignments: if cloning panics, `self` is
    /// unchanged.
    pub fn assign_variant(&mut self, source: &Self)
    where
        L: CloneAll,
    {
        let index = source.which();
        trace_event!(
            from = self.which(),
            to = index,
            backed_up = L::is_backed_up(index),
            "assign from variant"
        );
        if L::is_backed_up(index) {
            let target = self.inactive_ptr_mut();
            // SAFETY: backed-up alternatives fit both slots and the inactive
            // slot holds nothing; once the clone exists it is committed.
            unsafe {
                L::clone_at(source.active_ptr(), target, index);
                self.commit_inactive(index);
            }
        } else {
            let mut temp = StorageSlot::<L::Primary>::uninit();
            // SAFETY: `temp` fits every alternative. After cloning it holds
            // alternative `index`, which the commit relocates into the free
            // primary slot.
            unsafe {
                L::clone_at(source.active_ptr(), temp.address_mut(), index);
                self.destroy_then(move |this| {
                    L::relocate_at(temp.address(), this.primary.address_mut(), index);
                    this.discriminant = Discriminant::primary(index);
                });
            }
        }
    }
}
