//! The error reported by checked accessors.

use core::fmt;

/// The error returned by a checked accessor when the variant holds a
/// different alternative than the one requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadGet {
    requested: usize,
    held: usize,
    requested_name: &'static str,
    held_name: &'static str,
}

impl BadGet {
    pub(crate) fn new(
        requested: usize,
        held: usize,
        requested_name: &'static str,
        held_name: &'static str,
    ) -> Self {
        Self {
            requested,
            held,
            requested_name,
            held_name,
        }
    }

    /// Index of the alternative that was asked for.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Index of the alternative the variant actually holds.
    pub fn held(&self) -> usize {
        self.held
    }

    /// Type name of the alternative that was asked for.
    pub fn requested_name(&self) -> &'static str {
        self.requested_name
    }

    /// Type name of the alternative the variant actually holds.
    pub fn held_name(&self) -> &'static str {
        self.held_name
    }
}

impl fmt::Display for BadGet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bad get: requested alternative {} (`{}`) but the variant holds alternative {} (`{}`)",
            self.requested, self.requested_name, self.held, self.held_name
        )
    }
}

impl std::error::Error for BadGet {}
