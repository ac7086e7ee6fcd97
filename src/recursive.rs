//! `Recursive<T>`: an exclusively owned heap box for self-referential
//! alternatives.
//!
//! A variant that (indirectly) contains itself would need unbounded storage.
//! Declaring such an alternative `#[recursive]` stores it as a `Recursive<T>`:
//! a single pointer, whatever `T` is. Dispatch and accessors unwrap the box, so
//! visitor code handles `T` exactly as if the box did not exist.
//!
//! The allocation is managed by hand through `std::alloc`, which keeps the
//! pointer-stealing move ([`Recursive::take`]) explicit: a stolen-from box is
//! *empty* and may only be reassigned or dropped.

use core::alloc::Layout;
use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};
use std::alloc::{alloc, dealloc, handle_alloc_error};

/// A uniquely owned heap allocation holding one `T`, or nothing after
/// [`take`](Recursive::take).
pub struct Recursive<T> {
    ptr: Option<NonNull<T>>,
    _owns: PhantomData<T>,
}

impl<T> Recursive<T> {
    /// Moves `value` into a fresh heap allocation.
    pub fn new(value: T) -> Self {
        let layout = Layout::new::<T>();
        let raw = if layout.size() == 0 {
            NonNull::<T>::dangling().as_ptr()
        } else {
            // SAFETY: layout has non-zero size.
            unsafe { alloc(layout).cast::<T>() }
        };

        let Some(ptr) = NonNull::new(raw) else {
            handle_alloc_error(layout);
        };

        // SAFETY: `ptr` is valid for writes of `T` and uninitialized.
        unsafe { ptr::write(ptr.as_ptr(), value) };
        Self {
            ptr: Some(ptr),
            _owns: PhantomData,
        }
    }

    /// Returns whether the value has been stolen by [`take`](Self::take).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    /// Borrows the boxed value.
    ///
    /// # Panics
    ///
    /// Panics if the box is empty.
    #[inline]
    pub fn get(&self) -> &T {
        match self.ptr {
            // SAFETY: a present pointer always refers to our live allocation.
            Some(ptr) => unsafe { ptr.as_ref() },
            None => empty_access(),
        }
    }

    /// Mutably borrows the boxed value.
    ///
    /// # Panics
    ///
    /// Panics if the box is empty.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        match self.ptr {
            // SAFETY: exclusive access through `&mut self`.
            Some(mut ptr) => unsafe { ptr.as_mut() },
            None => empty_access(),
        }
    }

    /// Steals the allocation, leaving `self` empty.
    ///
    /// No allocation or copy happens. The emptied box must not be read again
    /// until a value is [`set`](Self::set) into it.
    #[inline]
    pub fn take(&mut self) -> Self {
        Self {
            ptr: self.ptr.take(),
            _owns: PhantomData,
        }
    }

    /// Moves the value into a new allocation, leaving `T::default()` behind.
    ///
    /// Unlike [`take`](Self::take) the source stays non-empty.
    ///
    /// # Panics
    ///
    /// Panics if the box is empty.
    pub fn relocate(&mut self) -> Self
    where
        T: Default,
    {
        Self::new(mem::take(self.get_mut()))
    }

    /// Unwraps the value, releasing the allocation.
    ///
    /// # Panics
    ///
    /// Panics if the box is empty.
    pub fn into_inner(mut self) -> T {
        let Some(ptr) = self.ptr.take() else {
            empty_access();
        };
        // SAFETY: the allocation holds a live `T`; after the read it is only
        // deallocated, never dropped again.
        unsafe {
            let value = ptr::read(ptr.as_ptr());
            release(ptr);
            value
        }
    }

    /// Stores `value`, replacing the current value or refilling an empty box.
    pub fn set(&mut self, value: T) {
        match self.ptr {
            // SAFETY: exclusive access to a live value.
            Some(mut ptr) => unsafe { *ptr.as_mut() = value },
            None => *self = Self::new(value),
        }
    }

    /// Copy-assigns from `value` into the existing allocation.
    pub fn assign(&mut self, value: &T)
    where
        T: Clone,
    {
        match self.ptr {
            // SAFETY: exclusive access to a live value.
            Some(mut ptr) => unsafe { ptr.as_mut().clone_from(value) },
            None => *self = Self::new(value.clone()),
        }
    }

    /// Exchanges the allocations of two boxes.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
    }
}

#[cold]
#[track_caller]
fn empty_access() -> ! {
    panic!("access to an emptied Recursive box")
}

/// Deallocates without dropping.
///
/// # Safety
/// `ptr` must come from `Recursive::new` and its value must already be
/// dropped or moved out.
unsafe fn release<T>(ptr: NonNull<T>) {
    let layout = Layout::new::<T>();
    if layout.size() != 0 {
        // SAFETY: allocated by `alloc` with this exact layout.
        unsafe { dealloc(ptr.as_ptr().cast::<u8>(), layout) };
    }
}

impl<T> Drop for Recursive<T> {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // Release the allocation even if `T`'s destructor unwinds.
            struct Release<T>(NonNull<T>);
            impl<T> Drop for Release<T> {
                fn drop(&mut self) {
                    // SAFETY: the value has been dropped by the time this runs.
                    unsafe { release(self.0) }
                }
            }

            let _release = Release(ptr);
            // SAFETY: we own a live value.
            unsafe { ptr::drop_in_place(ptr.as_ptr()) };
        }
    }
}

impl<T: Default> Default for Recursive<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> Clone for Recursive<T> {
    /// Deep copy into a fresh allocation. Cloning an empty box yields an
    /// empty box.
    fn clone(&self) -> Self {
        match self.ptr {
            // SAFETY: live value.
            Some(ptr) => Self::new(unsafe { ptr.as_ref() }.clone()),
            None => Self {
                ptr: None,
                _owns: PhantomData,
            },
        }
    }

    fn clone_from(&mut self, source: &Self) {
        match (self.ptr, source.ptr) {
            (Some(_), Some(_)) => self.assign(source.get()),
            _ => *self = source.clone(),
        }
    }
}

impl<T> From<T> for Recursive<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> Deref for Recursive<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> DerefMut for Recursive<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for Recursive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ptr {
            Some(_) => fmt::Debug::fmt(self.get(), f),
            None => f.write_str("Recursive(<empty>)"),
        }
    }
}

impl<T: PartialEq> PartialEq for Recursive<T> {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<T: Eq> Eq for Recursive<T> {}

impl<T: PartialOrd> PartialOrd for Recursive<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.get().partial_cmp(other.get())
    }
}

impl<T: Ord> Ord for Recursive<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.get().cmp(other.get())
    }
}

// SAFETY: `Recursive<T>` owns its `T` exclusively, like `Box<T>`.
unsafe impl<T: Send> Send for Recursive<T> {}
unsafe impl<T: Sync> Sync for Recursive<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_new_get_set() {
        let mut boxed = Recursive::new(5);
        assert_eq!(*boxed.get(), 5);
        *boxed.get_mut() += 1;
        assert_eq!(*boxed, 6);
        boxed.set(10);
        assert_eq!(boxed.into_inner(), 10);
    }

    #[test]
    fn test_take_steals_pointer() {
        let mut source = Recursive::new(String::from("owned"));
        let address = source.get() as *const String;

        let stolen = source.take();
        assert!(source.is_empty());
        assert_eq!(stolen.get() as *const String, address);

        source.set(String::from("refilled"));
        assert_eq!(source.get(), "refilled");
    }

    #[test]
    fn test_relocate_keeps_source_non_empty() {
        let mut source = Recursive::new(vec![1, 2, 3]);
        let moved = source.relocate();
        assert!(!source.is_empty());
        assert!(source.get().is_empty());
        assert_eq!(moved.get(), &vec![1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "emptied Recursive")]
    fn test_access_after_take_panics() {
        let mut source = Recursive::new(1u8);
        let _stolen = source.take();
        let _ = source.get();
    }

    #[test]
    fn test_clone_is_deep() {
        let original = Recursive::new(vec![String::from("a")]);
        let mut copy = original.clone();
        copy.get_mut().push(String::from("b"));
        assert_eq!(original.get().len(), 1);
        assert_eq!(copy.get().len(), 2);
    }

    #[test]
    fn test_drop_releases_value_once() {
        let tracker = Rc::new(());
        {
            let a = Recursive::new(Rc::clone(&tracker));
            let mut b = a.clone();
            let c = b.take();
            assert_eq!(Rc::strong_count(&tracker), 3);
            drop(c);
            drop(b);
            drop(a);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn test_zero_sized_payload() {
        let boxed = Recursive::new(());
        let copy = boxed.clone();
        assert_eq!(boxed, copy);
        boxed.into_inner();
    }

    #[test]
    fn test_swap_exchanges_allocations() {
        let mut a = Recursive::new(1);
        let mut b = Recursive::new(2);
        a.swap(&mut b);
        assert_eq!((*a, *b), (2, 1));
    }
}
