//! [`proptest`] strategies producing variants.
//!
//! Enabled by the `proptest` feature.
//!
//! ```rust
//! use proptest::prelude::*;
//! use sumvar::strategy::any_variant;
//!
//! proptest!(|(v in any_variant::<sumvar::alternatives![u8, String]>())| {
//!     prop_assert!(v.which() < 2);
//! });
//! ```

use crate::alternatives::{Alt, AlternativeSet, DebugAll, Kind, Nil};
use crate::Variant;
use proptest::prelude::*;
use proptest::strategy::{BoxedStrategy, Union};

/// Every alternative has an [`Arbitrary`] implementation.
///
/// `Root` is the whole set the produced variants range over; `Self` is the
/// part of it still to be collected.
pub trait ArbitraryAll<Root: DebugAll>: AlternativeSet {
    /// Appends one strategy per remaining alternative, the first of which is
    /// alternative `offset` of `Root`.
    ///
    /// # Safety
    /// `Self` must be the tail of `Root` that starts at position `offset`.
    unsafe fn collect(offset: usize, into: &mut Vec<BoxedStrategy<Variant<Root>>>);
}

impl<Root: DebugAll> ArbitraryAll<Root> for Nil {
    unsafe fn collect(_: usize, _: &mut Vec<BoxedStrategy<Variant<Root>>>) {}
}

impl<H, Tail, K, Root> ArbitraryAll<Root> for Alt<H, Tail, K>
where
    H: Arbitrary + 'static,
    Tail: ArbitraryAll<Root>,
    K: Kind,
    Root: DebugAll + 'static,
{
    unsafe fn collect(offset: usize, into: &mut Vec<BoxedStrategy<Variant<Root>>>) {
        into.push(
            any::<H>()
                .prop_map(move |value| {
                    // SAFETY: alternative `offset` of `Root` is `H` of kind `K`.
                    unsafe { Variant::<Root>::from_stored(offset, K::store(value)) }
                })
                .boxed(),
        );
        // SAFETY: `Tail` starts one position further into `Root`.
        unsafe { Tail::collect(offset + 1, into) };
    }
}

/// A strategy choosing an alternative uniformly, then an arbitrary value of it.
pub fn any_variant<L>() -> BoxedStrategy<Variant<L>>
where
    L: ArbitraryAll<L> + DebugAll + 'static,
{
    let mut options = Vec::with_capacity(L::COUNT);
    // SAFETY: `L` is its own tail at position 0.
    unsafe { L::collect(0, &mut options) };
    Union::new(options).boxed()
}
