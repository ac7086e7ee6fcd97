//! Type ↔ index resolution inside an alternative set.

use super::index::{Here, Index, There};
use super::{Alt, AlternativeSet, Kind};

/// The set holds `T` at position `I`.
///
/// `I` is normally inferred. Inference fails, at compile time, when `T` is not
/// an alternative of the set or when it is one more than once.
pub trait Contains<T, I: Index>: AlternativeSet {
    /// Storage kind `T` was declared with.
    type Kind: Kind;
}

impl<H, Tail, K> Contains<H, Here> for Alt<H, Tail, K>
where
    Tail: AlternativeSet,
    K: Kind,
{
    type Kind = K;
}

impl<H, T, Tail, K, I> Contains<T, There<I>> for Alt<H, Tail, K>
where
    Tail: Contains<T, I>,
    K: Kind,
    I: Index,
{
    type Kind = <Tail as Contains<T, I>>::Kind;
}

/// The alternative at position `I`.
pub trait At<I: Index>: AlternativeSet {
    /// The alternative type.
    type Output;

    /// Storage kind the alternative was declared with.
    type Kind: Kind;
}

impl<H, Tail, K> At<Here> for Alt<H, Tail, K>
where
    Tail: AlternativeSet,
    K: Kind,
{
    type Output = H;
    type Kind = K;
}

impl<H, Tail, K, I> At<There<I>> for Alt<H, Tail, K>
where
    Tail: At<I>,
    K: Kind,
    I: Index,
{
    type Output = <Tail as At<I>>::Output;
    type Kind = <Tail as At<I>>::Kind;
}
