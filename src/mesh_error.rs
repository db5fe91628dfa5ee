//! MeshError: Unified error type for gf-meshes public APIs
//!
//! Every fallible operation in the crate (mesh construction, index lookup,
//! Green's-function algebra) reports through this type. Errors are
//! deterministic logical failures: nothing here is transient or retryable.

use crate::algebra::AlgebraOp;
use crate::meshes::MeshTag;
use crate::statistic::Statistic;
use thiserror::Error;

/// Unified error type for gf-meshes operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A mesh constructor was given arguments violating its constraints.
    #[error("invalid parameter for {mesh}: {reason}")]
    InvalidParameter {
        mesh: &'static str,
        reason: String,
    },
    /// An index lookup fell outside the mesh domain (or had the wrong shape).
    #[error("index {index} out of range for {mesh} of size {size}")]
    IndexOutOfRange {
        mesh: &'static str,
        index: String,
        size: usize,
    },
    /// Two meshes cannot be combined by the requested operation.
    #[error("incompatible meshes for `{op}`: {reason}")]
    IncompatibleMesh {
        op: AlgebraOp,
        reason: Incompatibility,
    },
}

/// Why two operand meshes could not be combined.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Incompatibility {
    /// Operands have a different number of mesh axes.
    #[error("operands have {left} and {right} mesh axes")]
    ArityMismatch { left: usize, right: usize },
    /// Axis holds different mesh kinds.
    #[error("axis {axis}: {left} cannot be combined with {right}")]
    KindMismatch {
        axis: usize,
        left: MeshTag,
        right: MeshTag,
    },
    /// Addition of meshes carrying different statistics.
    #[error("axis {axis}: {left} statistic cannot be added to {right} statistic")]
    StatisticMismatch {
        axis: usize,
        left: Statistic,
        right: Statistic,
    },
    /// Axis meshes differ in a parameter other than the statistic.
    #[error("axis {axis}: {tag} meshes differ in their parameters")]
    ParameterMismatch { axis: usize, tag: MeshTag },
    /// In-place multiplication would change the receiver's statistic.
    #[error("axis {axis}: in-place result has statistic {result}, receiver holds {current}")]
    InPlaceStatistic {
        axis: usize,
        current: Statistic,
        result: Statistic,
    },
}

impl MeshError {
    pub(crate) fn invalid(mesh: &'static str, reason: impl Into<String>) -> Self {
        MeshError::InvalidParameter {
            mesh,
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(mesh: &'static str, index: impl ToString, size: usize) -> Self {
        MeshError::IndexOutOfRange {
            mesh,
            index: index.to_string(),
            size,
        }
    }

    /// `true` for [`MeshError::IncompatibleMesh`].
    pub fn is_incompatible(&self) -> bool {
        matches!(self, MeshError::IncompatibleMesh { .. })
    }

    /// The incompatibility reason, if this is an algebra failure.
    pub fn incompatibility(&self) -> Option<&Incompatibility> {
        match self {
            MeshError::IncompatibleMesh { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_operation_and_axis() {
        let e = MeshError::IncompatibleMesh {
            op: AlgebraOp::MulAssign,
            reason: Incompatibility::InPlaceStatistic {
                axis: 1,
                current: Statistic::Fermion,
                result: Statistic::Boson,
            },
        };
        let s = e.to_string();
        assert!(s.contains("*="), "{s}");
        assert!(s.contains("axis 1"), "{s}");
        assert!(e.is_incompatible());
    }

    #[test]
    fn invalid_parameter_is_not_incompatible() {
        let e = MeshError::invalid("MeshImTime", "beta must be positive");
        assert!(!e.is_incompatible());
        assert!(e.incompatibility().is_none());
        assert_eq!(
            e.to_string(),
            "invalid parameter for MeshImTime: beta must be positive"
        );
    }
}
