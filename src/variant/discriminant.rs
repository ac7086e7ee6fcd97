//! The discriminant: active alternative index plus active slot, in one signed
//! integer.
//!
//! - `d >= 0`: the primary slot holds alternative `d`.
//! - `d < 0`: the backup slot holds alternative `-(d + 1)`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Discriminant(i32);

impl Discriminant {
    #[inline(always)]
    pub(crate) fn primary(index: usize) -> Self {
        debug_assert!(index <= i32::MAX as usize);
        Self(index as i32)
    }

    #[inline(always)]
    pub(crate) fn backup(index: usize) -> Self {
        debug_assert!(index <= i32::MAX as usize);
        Self(-(index as i32) - 1)
    }

    #[inline(always)]
    pub(crate) fn in_backup(self) -> bool {
        self.0 < 0
    }

    /// The active alternative, whichever slot holds it.
    #[inline(always)]
    pub(crate) fn which(self) -> usize {
        if self.0 >= 0 {
            self.0 as usize
        } else {
            (-(self.0 + 1)) as usize
        }
    }

    /// Alternative `index` living in the slot that is inactive under `self`.
    #[inline(always)]
    pub(crate) fn flipped(self, index: usize) -> Self {
        if self.in_backup() {
            Self::primary(index)
        } else {
            Self::backup(index)
        }
    }
}
