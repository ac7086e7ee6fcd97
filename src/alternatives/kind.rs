//! Per-alternative storage kinds.
//!
//! Every alternative in an [`AlternativeSet`] carries a kind that decides how
//! its value is stored in a slot and how a replacement value is staged during
//! assignment:
//!
//! | kind | stored as | replacement staged in | declared as |
//! |---|---|---|---|
//! | [`Inline`] | `T` | a stack temporary, relocated into the primary slot | `T` |
//! | [`BackedUp`] | `T` | the variant's currently inactive slot | `#[backup] T` |
//! | [`Indirect`] | [`Recursive<T>`] | a stack temporary | `#[recursive] T` |
//!
//! Visitors and accessors always see `T`; the `Recursive` box of an
//! [`Indirect`] alternative is never exposed.
//!
//! [`AlternativeSet`]: super::AlternativeSet

use super::sealed::Sealed;
use crate::recursive::Recursive;
use crate::storage::Overlay;

/// Storage policy of one alternative.
pub trait Kind: Sealed + 'static {
    /// The type physically placed in a storage slot for alternative `T`.
    type Stored<T>;

    /// The backup-slot layout after adding an alternative `T` of this kind in
    /// front of the layout `Rest`.
    type Backup<T, Rest>;

    /// Whether replacements of this kind are built in the inactive slot.
    const BACKED_UP: bool;

    /// Wraps a value into its stored form.
    fn store<T>(value: T) -> Self::Stored<T>;

    /// Presents the stored form as the alternative's own type.
    fn view<T>(stored: &Self::Stored<T>) -> &T;

    /// Presents the stored form as the alternative's own type, mutably.
    fn view_mut<T>(stored: &mut Self::Stored<T>) -> &mut T;

    /// Unwraps the stored form.
    fn unstore<T>(stored: Self::Stored<T>) -> T;
}

/// Stored in place; replacements are built in a temporary and relocated.
pub enum Inline {}

/// Stored in place; replacements are built directly in the inactive slot, so
/// the current value is destroyed only once its replacement fully exists.
pub enum BackedUp {}

/// Stored behind a [`Recursive`] box, which lets the alternative contain the
/// enclosing variant type.
pub enum Indirect {}

impl Sealed for Inline {}
impl Sealed for BackedUp {}
impl Sealed for Indirect {}

impl Kind for Inline {
    type Stored<T> = T;
    type Backup<T, Rest> = Rest;
    const BACKED_UP: bool = false;

    #[inline(always)]
    fn store<T>(value: T) -> T {
        value
    }

    #[inline(always)]
    fn view<T>(stored: &T) -> &T {
        stored
    }

    #[inline(always)]
    fn view_mut<T>(stored: &mut T) -> &mut T {
        stored
    }

    #[inline(always)]
    fn unstore<T>(stored: T) -> T {
        stored
    }
}

impl Kind for BackedUp {
    type Stored<T> = T;
    type Backup<T, Rest> = Overlay<T, Rest>;
    const BACKED_UP: bool = true;

    #[inline(always)]
    fn store<T>(value: T) -> T {
        value
    }

    #[inline(always)]
    fn view<T>(stored: &T) -> &T {
        stored
    }

    #[inline(always)]
    fn view_mut<T>(stored: &mut T) -> &mut T {
        stored
    }

    #[inline(always)]
    fn unstore<T>(stored: T) -> T {
        stored
    }
}

impl Kind for Indirect {
    type Stored<T> = Recursive<T>;
    type Backup<T, Rest> = Rest;
    const BACKED_UP: bool = false;

    #[inline]
    fn store<T>(value: T) -> Recursive<T> {
        Recursive::new(value)
    }

    #[inline]
    fn view<T>(stored: &Recursive<T>) -> &T {
        stored.get()
    }

    #[inline]
    fn view_mut<T>(stored: &mut Recursive<T>) -> &mut T {
        stored.get_mut()
    }

    #[inline]
    fn unstore<T>(stored: Recursive<T>) -> T {
        stored.into_inner()
    }
}
