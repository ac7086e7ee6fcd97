//! Exchanging the contents of two variants.

use super::{Discriminant, Variant};
use crate::alternatives::AlternativeSet;
use crate::log::trace_event;
use crate::storage::StorageSlot;

impl<L: AlternativeSet> Variant<L> {
    /// Exchanges the values, and thereby the alternatives, of `self` and
    /// `other`.
    ///
    /// Values of the same alternative are swapped in place. Otherwise each
    /// value is relocated through a side buffer and both variants end up
    /// holding their new value in the primary slot. Relocation cannot fail,
    /// so neither variant is ever observed empty.
    pub fn swap(&mut self, other: &mut Self) {
        let index = self.which();
        let other_index = other.which();
        trace_event!(left = index, right = other_index, "swap");

        if index == other_index {
            // SAFETY: both slots hold live values of alternative `index`, in
            // distinct variants.
            unsafe { L::swap_at(self.active_ptr_mut(), other.active_ptr_mut(), index) };
            return;
        }

        let mut side = StorageSlot::<L::Primary>::uninit();
        // SAFETY: every step moves a live value into a slot that fits it and
        // was vacated by the previous step; each discriminant is updated as
        // soon as its slot is refilled.
        unsafe {
            L::relocate_at(other.active_ptr(), side.address_mut(), other_index);
            L::relocate_at(self.active_ptr(), other.primary.address_mut(), index);
            other.discriminant = Discriminant::primary(index);
            L::relocate_at(side.address(), self.primary.address_mut(), other_index);
            self.discriminant = Discriminant::primary(other_index);
        }
    }
}

/// Exchanges the contents of two variants of the same set.
///
/// ```rust
/// use sumvar::Variant;
///
/// let mut a = <Variant![i32, String]>::new(1i32);
/// let mut b = <Variant![i32, String]>::new(String::from("b"));
/// sumvar::swap(&mut a, &mut b);
/// assert_eq!(a.get::<String, _>().map(String::as_str), Some("b"));
/// assert_eq!(b.get::<i32, _>(), Some(&1));
/// ```
pub fn swap<L: AlternativeSet>(a: &mut Variant<L>, b: &mut Variant<L>) {
    a.swap(b);
}
