//! # `sumvar` - Never-Empty Closed-Set Variants
//!
//! A discriminated union over a closed, ordered list of alternative types that
//! always holds exactly one value of one of them, even when constructing a
//! replacement value fails partway through an assignment.
//!
//! ## Guarantees
//!
//! ### Never empty
//! - **Every constructor** produces the value before the variant exists.
//! - **Every assignment** produces the replacement before the current value is
//!   destroyed. A panic (or an `Err` from [`Variant::try_assign_with`]) while
//!   producing it leaves the variant untouched: the strong guarantee.
//! - **Swapping** only relocates values, which cannot fail.
//! - **A destructor that unwinds** during assignment does not stop the
//!   replacement from being committed.
//!
//! ### Two-slot storage
//! - **Primary slot**: sized and aligned for every alternative.
//! - **Backup slot**: sized for the alternatives declared `#[backup]`; those
//!   are built directly in whichever slot is inactive and the discriminant
//!   flips between slots. Sets without `#[backup]` alternatives pay nothing.
//!
//! ### Type safety
//! - **Closed set**: an alternative is named by type (`get::<String, _>()`) or
//!   by position (`get_at::<I1>()`); types outside the set, or repeated in it,
//!   do not resolve at compile time. Reaching a repeated type by position
//!   does not help either: constructing a variant over such a set panics,
//!   in release builds too.
//! - **Total visitors**: a visitor must handle every alternative with one
//!   common result type, or dispatch does not compile.
//! - **Recursive alternatives**: `#[recursive] T` is stored behind a
//!   [`Recursive<T>`] box but is always presented as `T`.
//!
//! ## Architecture
//!
//! ```text
//! alternatives  ── type-level list, indices, kinds, whole-set capabilities
//!      │
//! storage       ── raw aligned slots and the pointer-level helpers
//!      │
//! variant       ── discriminant, construction, access, assign, swap, traits
//!      │
//! visit         ── visitor traits and index-driven dispatch
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sumvar::{Variant, Visit, Visitor};
//!
//! type Value = Variant![i64, #[backup] String];
//!
//! struct Render;
//!
//! impl Visitor for Render {
//!     type Output = String;
//! }
//!
//! impl Visit<i64> for Render {
//!     fn visit(&mut self, n: &i64) -> String {
//!         format!("int {n}")
//!     }
//! }
//!
//! impl Visit<String> for Render {
//!     fn visit(&mut self, s: &String) -> String {
//!         format!("text {s:?}")
//!     }
//! }
//!
//! let mut value = Value::new(7i64);
//! assert_eq!(value.visit(Render), "int 7");
//!
//! value.set(String::from("seven"));
//! assert_eq!(value.visit(Render), "text \"seven\"");
//! assert_eq!(value.which(), 1);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod alternatives;
pub mod error;
pub mod recursive;
pub mod storage;
#[cfg(feature = "proptest")]
pub mod strategy;
pub mod variant;
pub mod visit;

mod log;

pub use alternatives::{AlternativeSet, At, Contains};
pub use error::BadGet;
pub use recursive::Recursive;
pub use storage::StorageSlot;
pub use variant::{swap, Variant};
pub use visit::{Visit, VisitMut, VisitOnce, Visitor};

// Compile-time assertions for the storage layout
const _: () = {
    use core::mem;

    // A recursive alternative costs one pointer, whatever it boxes.
    assert!(mem::size_of::<Recursive<[u64; 64]>>() == mem::size_of::<usize>());

    // Slots are exactly as large as their overlay.
    assert!(
        mem::size_of::<StorageSlot<storage::Overlay<u8, u64>>>() == mem::size_of::<u64>()
    );
    assert!(
        mem::align_of::<StorageSlot<storage::Overlay<u8, u64>>>() == mem::align_of::<u64>()
    );

    // Without `#[backup]` alternatives the backup slot vanishes: one
    // discriminant word on top of the primary slot.
    assert!(
        mem::size_of::<Variant![u32, u64]>() == mem::size_of::<u64>() * 2
    );
    assert!(
        mem::size_of::<Variant![u8, #[backup] u64]>() == mem::size_of::<u64>() * 3
    );
};
