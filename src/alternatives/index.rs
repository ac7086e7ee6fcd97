//! Type-level alternative indices.
//!
//! An index is a Peano number: [`Here`] is position 0 and [`There<I>`] is the
//! position after `I`. Indices are never constructed; they only steer trait
//! resolution so that a type can be located in an [`AlternativeSet`] at
//! compile time, and [`Index::VALUE`] recovers the runtime position.
//!
//! [`AlternativeSet`]: super::AlternativeSet

use core::marker::PhantomData;

/// Position 0 of an alternative list.
pub enum Here {}

/// The position after `I`.
pub struct There<I>(PhantomData<I>);

/// A type-level position inside an alternative list.
pub trait Index {
    /// The 0-based position this index denotes.
    const VALUE: usize;
}

impl Index for Here {
    const VALUE: usize = 0;
}

impl<I: Index> Index for There<I> {
    const VALUE: usize = I::VALUE + 1;
}

#[allow(missing_docs)]
mod aliases {
    use super::{Here, There};

    pub type I0 = Here;
    pub type I1 = There<I0>;
    pub type I2 = There<I1>;
    pub type I3 = There<I2>;
    pub type I4 = There<I3>;
    pub type I5 = There<I4>;
    pub type I6 = There<I5>;
    pub type I7 = There<I6>;
    pub type I8 = There<I7>;
    pub type I9 = There<I8>;
    pub type I10 = There<I9>;
    pub type I11 = There<I10>;
    pub type I12 = There<I11>;
    pub type I13 = There<I12>;
    pub type I14 = There<I13>;
    pub type I15 = There<I14>;
}

pub use aliases::*;
