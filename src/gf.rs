//! Green's-function descriptors: a shared mesh domain plus a target shape.
//!
//! The numerical payload is not represented here; the target shape is
//! carried along untouched by the algebra (shape compatibility is the
//! array layer's business).

use std::ops::{Add, Mul};
use std::sync::Arc;

use crate::algebra::{self, AlgebraOp};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::product::MeshDomain;
use crate::statistic::Statistic;

/// A Green's function reduced to what the mesh algebra needs.
///
/// The mesh is held through an [`Arc`]: cloning a descriptor, or building
/// the result of an operation that leaves the mesh unchanged, shares it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GfDescriptor {
    mesh: Arc<MeshDomain>,
    target_shape: Vec<usize>,
}

impl GfDescriptor {
    pub fn new(mesh: impl Into<MeshDomain>, target_shape: impl Into<Vec<usize>>) -> Self {
        Self::with_shared_mesh(Arc::new(mesh.into()), target_shape)
    }

    /// Descriptor over a mesh that other descriptors may already hold.
    pub fn with_shared_mesh(mesh: Arc<MeshDomain>, target_shape: impl Into<Vec<usize>>) -> Self {
        Self {
            mesh,
            target_shape: target_shape.into(),
        }
    }

    pub fn mesh(&self) -> &MeshDomain {
        &self.mesh
    }

    pub fn shared_mesh(&self) -> &Arc<MeshDomain> {
        &self.mesh
    }

    pub fn target_shape(&self) -> &[usize] {
        &self.target_shape
    }

    pub fn target_rank(&self) -> usize {
        self.target_shape.len()
    }

    /// Statistic of a single-mesh descriptor.
    pub fn statistic(&self) -> Option<Statistic> {
        self.mesh.statistic()
    }

    /// `true` when both descriptors point at the same mesh allocation.
    pub fn shares_mesh_with(&self, other: &GfDescriptor) -> bool {
        Arc::ptr_eq(&self.mesh, &other.mesh)
    }

    /// `self + other`.
    pub fn try_add(&self, other: &GfDescriptor) -> Result<GfDescriptor, MeshError> {
        self.binary(AlgebraOp::Add, other)
    }

    /// `self * other`.
    pub fn try_mul(&self, other: &GfDescriptor) -> Result<GfDescriptor, MeshError> {
        self.binary(AlgebraOp::Mul, other)
    }

    /// `self += other`. On error `self` is left untouched.
    pub fn try_add_assign(&mut self, other: &GfDescriptor) -> Result<(), MeshError> {
        self.in_place(AlgebraOp::AddAssign, other)
    }

    /// `self *= other`. Both meshes must be identical, and the product must
    /// keep the receiver's statistics; on error `self` is left untouched.
    pub fn try_mul_assign(&mut self, other: &GfDescriptor) -> Result<(), MeshError> {
        self.in_place(AlgebraOp::MulAssign, other)
    }

    fn binary(&self, op: AlgebraOp, other: &GfDescriptor) -> Result<GfDescriptor, MeshError> {
        let domain = algebra::combine(op, &self.mesh, &other.mesh)?;
        crate::debug_invariants!(domain.validate_invariants(), "GfDescriptor::binary");
        let mesh = if domain == *self.mesh {
            Arc::clone(&self.mesh)
        } else if domain == *other.mesh {
            Arc::clone(&other.mesh)
        } else {
            Arc::new(domain)
        };
        Ok(GfDescriptor {
            mesh,
            target_shape: self.target_shape.clone(),
        })
    }

    fn in_place(&mut self, op: AlgebraOp, other: &GfDescriptor) -> Result<(), MeshError> {
        let domain = algebra::combine(op, &self.mesh, &other.mesh)?;
        if domain != *self.mesh {
            self.mesh = Arc::new(domain);
        }
        Ok(())
    }
}

impl Add for &GfDescriptor {
    type Output = Result<GfDescriptor, MeshError>;

    fn add(self, rhs: &GfDescriptor) -> Self::Output {
        self.try_add(rhs)
    }
}

impl Mul for &GfDescriptor {
    type Output = Result<GfDescriptor, MeshError>;

    fn mul(self, rhs: &GfDescriptor) -> Self::Output {
        self.try_mul(rhs)
    }
}
