//! Standard trait impls, available when every alternative supports the trait.

use super::{Discriminant, Variant};
use crate::alternatives::{
    Alt, AlternativeSet, CloneAll, DebugAll, DisplayAll, EqAll, Here, Kind, OrdAll, PartialEqAll,
    PartialOrdAll,
};
use crate::storage::StorageSlot;
use core::cmp::Ordering;
use core::fmt;

impl<L: CloneAll> Clone for Variant<L> {
    fn clone(&self) -> Self {
        let which = self.which();
        let mut primary = StorageSlot::uninit();
        // SAFETY: the active slot holds alternative `which`; `primary` fits it.
        unsafe { L::clone_at(self.active_ptr(), primary.address_mut(), which) };
        Self {
            discriminant: Discriminant::primary(which),
            primary,
            backup: StorageSlot::uninit(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign_variant(source);
    }
}

/// Holds the default value of the first alternative.
impl<H, Tail, K> Default for Variant<Alt<H, Tail, K>>
where
    H: Default,
    Tail: AlternativeSet,
    K: Kind,
{
    fn default() -> Self {
        Self::new_at::<Here>(H::default())
    }
}

impl<L: PartialEqAll> PartialEq for Variant<L> {
    fn eq(&self, other: &Self) -> bool {
        let which = self.which();
        // SAFETY: both hold alternative `which` when the indices match.
        which == other.which() && unsafe { L::eq_at(self.active_ptr(), other.active_ptr(), which) }
    }
}

impl<L: EqAll> Eq for Variant<L> {}

/// Orders by alternative index first, then by value.
impl<L: PartialOrdAll> PartialOrd for Variant<L> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let which = self.which();
        match which.cmp(&other.which()) {
            // SAFETY: both hold alternative `which`.
            Ordering::Equal => unsafe {
                L::partial_cmp_at(self.active_ptr(), other.active_ptr(), which)
            },
            unequal => Some(unequal),
        }
    }
}

impl<L: OrdAll> Ord for Variant<L> {
    fn cmp(&self, other: &Self) -> Ordering {
        let which = self.which();
        which.cmp(&other.which()).then_with(|| {
            // SAFETY: `then_with` only runs for equal indices.
            unsafe { L::cmp_at(self.active_ptr(), other.active_ptr(), which) }
        })
    }
}

/// Formats the active value alone.
impl<L: DebugAll> fmt::Debug for Variant<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // SAFETY: the active slot holds alternative `which`.
        unsafe { L::fmt_debug_at(self.active_ptr(), self.which(), f) }
    }
}

impl<L: DisplayAll> fmt::Display for Variant<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // SAFETY: the active slot holds alternative `which`.
        unsafe { L::fmt_display_at(self.active_ptr(), self.which(), f) }
    }
}

#[cfg(test)]
mod tests {
    use crate::Variant;

    type Number = Variant![i64, #[backup] String];

    #[test]
    fn test_order_compares_index_before_value() {
        let small_index = Number::new(i64::MAX);
        let large_index = Number::new(String::new());
        assert!(small_index < large_index);
        assert!(Number::new(1i64) < Number::new(2i64));
        assert_eq!(Number::new(String::from("a")), Number::new(String::from("a")));
        assert_ne!(Number::new(0i64), Number::new(String::from("0")));
    }

    #[test]
    fn test_formatting_is_transparent() {
        let v = Number::new(String::from("text"));
        assert_eq!(format!("{v:?}"), "\"text\"");
        assert_eq!(v.to_string(), "text");
    }

    #[test]
    fn test_clone_from_reuses_protocol() {
        let source = Number::new(String::from("copied"));
        let mut target = Number::new(5i64);
        target.clone_from(&source);
        assert_eq!(target, source);
        assert!(target.is_in_backup_slot());
        assert!(!source.clone().is_in_backup_slot());
    }
}
