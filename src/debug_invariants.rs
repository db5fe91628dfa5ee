//! Invariant checks for meshes that did not come out of a constructor.
//!
//! Constructors validate their parameters, but deserialized meshes and
//! descriptors are loaded as-is. Callers reading an archive run
//! [`DebugInvariants::validate_invariants`] on the result; internally, the
//! [`debug_invariants!`](crate::debug_invariants) macro re-checks freshly
//! combined domains and panics on a broken invariant when checking is on
//! (`debug_assertions`, `strict-invariants` or `check-invariants`).

use crate::mesh_error::MeshError;

/// Trait for validating mesh invariants, e.g. after deserialization.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshError>;
}

/// Helper macro to run a fallible check and panic on error when invariant
/// checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
