//! Raw, correctly aligned storage for the values of an alternative set.
//!
//! A [`StorageSlot<R>`] is an uninitialized buffer shaped like `R`, where `R`
//! is an [`Overlay`] union of every type the slot must be able to hold. The
//! slot has no idea what, if anything, it currently holds: that bookkeeping
//! belongs to [`Variant`](crate::Variant) and its discriminant.
//!
//! All pointer-level reads, writes and drops used by the crate go through the
//! helpers at the bottom of this module, so the unsafe surface can be audited
//! in one place.
//!
//! ## Core invariant
//! A slot address handed to any helper here is valid for the stored type it is
//! used at, because the caller resolved that type from the discriminant.

use core::mem::{self, ManuallyDrop, MaybeUninit};
use core::ptr;

/// A union laying `A` and `B` over the same bytes.
///
/// Size is the maximum of both sizes (rounded to alignment) and alignment is
/// the maximum of both alignments. Both fields start at offset 0.
#[repr(C)]
#[allow(dead_code)]
pub union Overlay<A, B> {
    head: ManuallyDrop<A>,
    tail: ManuallyDrop<B>,
}

/// An untyped buffer sized and aligned for every member of the overlay `R`.
#[repr(transparent)]
pub struct StorageSlot<R> {
    raw: MaybeUninit<R>,
}

impl<R> StorageSlot<R> {
    /// Size of the buffer in bytes.
    pub const SIZE: usize = mem::size_of::<R>();

    /// Alignment of the buffer in bytes.
    pub const ALIGN: usize = mem::align_of::<R>();

    /// Creates a slot holding nothing.
    #[inline(always)]
    pub const fn uninit() -> Self {
        Self {
            raw: MaybeUninit::uninit(),
        }
    }

    /// Returns whether a `T` can be placed in this slot.
    #[inline(always)]
    pub const fn fits<T>() -> bool {
        mem::size_of::<T>() <= Self::SIZE && mem::align_of::<T>() <= Self::ALIGN
    }

    /// Raw location of the buffer.
    #[inline(always)]
    pub fn address(&self) -> *const u8 {
        self.raw.as_ptr().cast()
    }

    /// Raw mutable location of the buffer.
    #[inline(always)]
    pub fn address_mut(&mut self) -> *mut u8 {
        self.raw.as_mut_ptr().cast()
    }

    /// Places `value` in the slot.
    ///
    /// # Safety
    /// - `T` must fit the slot.
    /// - Whatever the slot held before must already be destroyed or moved
    ///   out; it is overwritten without being dropped.
    #[inline]
    pub unsafe fn construct_as<T>(&mut self, value: T) -> &mut T {
        debug_assert!(Self::fits::<T>(), "type does not fit the storage slot");
        let slot = self.address_mut().cast::<T>();
        // SAFETY: caller guarantees fit; the buffer is aligned for `R` and
        // therefore for `T`.
        unsafe {
            ptr::write(slot, value);
            &mut *slot
        }
    }

    /// Drops the `T` held in the slot.
    ///
    /// # Safety
    /// The slot must hold an initialized `T`, and it must not be used as a
    /// `T` afterwards.
    #[inline]
    pub unsafe fn destroy_as<T>(&mut self) {
        // SAFETY: caller asserts the slot holds a `T`.
        unsafe { drop_at::<T>(self.address_mut()) }
    }

    /// Views the slot as a `T`.
    ///
    /// # Safety
    /// The slot must hold an initialized `T`.
    #[inline(always)]
    pub unsafe fn get_as<T>(&self) -> &T {
        // SAFETY: caller asserts the slot holds a `T`.
        unsafe { view_at(self.address()) }
    }

    /// Views the slot as a `T`, mutably.
    ///
    /// # Safety
    /// The slot must hold an initialized `T`.
    #[inline(always)]
    pub unsafe fn get_as_mut<T>(&mut self) -> &mut T {
        // SAFETY: caller asserts the slot holds a `T`.
        unsafe { view_at_mut(self.address_mut()) }
    }

    /// Moves the `T` out of the slot, leaving it logically empty.
    ///
    /// # Safety
    /// The slot must hold an initialized `T`, which must not be dropped or
    /// read again afterwards.
    #[inline]
    pub unsafe fn take_as<T>(&mut self) -> T {
        // SAFETY: caller asserts the slot holds a `T`.
        unsafe { read_at(self.address()) }
    }
}

/// Interprets `at` as `&T`.
///
/// # Safety
/// `at` must point to an initialized `T` that outlives `'a` and is not
/// mutated while the reference is alive.
#[inline(always)]
pub(crate) unsafe fn view_at<'a, T>(at: *const u8) -> &'a T {
    // SAFETY: caller asserts initialization and aliasing.
    unsafe { &*at.cast::<T>() }
}

/// Interprets `at` as `&mut T`.
///
/// # Safety
/// `at` must point to an initialized `T` that outlives `'a`, and the
/// reference must be exclusive.
#[inline(always)]
pub(crate) unsafe fn view_at_mut<'a, T>(at: *mut u8) -> &'a mut T {
    // SAFETY: caller asserts initialization and exclusivity.
    unsafe { &mut *at.cast::<T>() }
}

/// Bitwise-moves a `T` out of `at`.
///
/// # Safety
/// `at` must hold an initialized `T`; the source is logically uninitialized
/// afterwards.
#[inline(always)]
pub(crate) unsafe fn read_at<T>(at: *const u8) -> T {
    // SAFETY: caller asserts initialization; `ptr::read` contract.
    unsafe { ptr::read(at.cast::<T>()) }
}

/// Writes a `T` to `at` without dropping previous contents.
///
/// # Safety
/// `at` must be valid and aligned for a `T`, and must not hold a live value.
#[inline(always)]
pub(crate) unsafe fn write_at<T>(at: *mut u8, value: T) {
    // SAFETY: caller upholds the overwrite contract.
    unsafe { ptr::write(at.cast::<T>(), value) }
}

/// Drops the `T` at `at` in place.
///
/// # Safety
/// `at` must hold an initialized `T`; must not be called twice for the same
/// value.
#[inline(always)]
pub(crate) unsafe fn drop_at<T>(at: *mut u8) {
    // SAFETY: caller asserts initialization and drop uniqueness.
    unsafe { ptr::drop_in_place(at.cast::<T>()) }
}

/// Relocates a `T` from `from` to `to`.
///
/// # Safety
/// `from` must hold an initialized `T`, `to` must be valid for a `T` and not
/// overlap `from`. `from` is logically uninitialized afterwards.
#[inline(always)]
pub(crate) unsafe fn relocate_at<T>(from: *const u8, to: *mut u8) {
    // SAFETY: caller asserts validity and non-overlap.
    unsafe { ptr::copy_nonoverlapping(from.cast::<T>(), to.cast::<T>(), 1) }
}

/// Swaps the two `T`s at `a` and `b`.
///
/// # Safety
/// Both locations must hold initialized `T`s and must not overlap.
#[inline(always)]
pub(crate) unsafe fn swap_at<T>(a: *mut u8, b: *mut u8) {
    // SAFETY: caller asserts validity and non-overlap.
    unsafe { ptr::swap_nonoverlapping(a.cast::<T>(), b.cast::<T>(), 1) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_takes_max_size_and_alignment() {
        assert_eq!(StorageSlot::<Overlay<u8, u64>>::SIZE, 8);
        assert_eq!(StorageSlot::<Overlay<u8, u64>>::ALIGN, mem::align_of::<u64>());
        assert_eq!(StorageSlot::<Overlay<[u8; 12], u32>>::SIZE, 12);
        assert_eq!(StorageSlot::<Overlay<[u8; 13], u32>>::SIZE, 16);
        assert_eq!(StorageSlot::<()>::SIZE, 0);
    }

    #[test]
    fn test_construct_get_destroy() {
        let mut slot = StorageSlot::<Overlay<String, u32>>::uninit();
        unsafe {
            slot.construct_as(String::from("slot"));
            assert_eq!(slot.get_as::<String>(), "slot");
            slot.get_as_mut::<String>().push_str("ted");
            assert_eq!(slot.get_as::<String>(), "slotted");
            slot.destroy_as::<String>();

            slot.construct_as(7u32);
            assert_eq!(slot.take_as::<u32>(), 7);
        }
    }

    #[test]
    fn test_fits() {
        type Slot = StorageSlot<Overlay<u16, [u8; 3]>>;
        assert!(Slot::fits::<u16>());
        assert!(Slot::fits::<[u8; 4]>());
        assert!(!Slot::fits::<u64>());
    }

    #[test]
    fn test_relocate_and_swap() {
        let mut a = StorageSlot::<Overlay<String, ()>>::uninit();
        let mut b = StorageSlot::<Overlay<String, ()>>::uninit();
        unsafe {
            a.construct_as(String::from("left"));
            relocate_at::<String>(a.address(), b.address_mut());
            assert_eq!(b.get_as::<String>(), "left");

            a.construct_as(String::from("right"));
            swap_at::<String>(a.address_mut(), b.address_mut());
            assert_eq!(a.get_as::<String>(), "left");
            assert_eq!(b.get_as::<String>(), "right");

            a.destroy_as::<String>();
            b.destroy_as::<String>();
        }
    }
}
