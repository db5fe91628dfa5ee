#![cfg_attr(docsrs, feature(doc_cfg))]
//! # gf-meshes
//!
//! gf-meshes describes the meshes Green's functions of many-body physics
//! are tabulated on (Matsubara frequencies, imaginary times, Legendre
//! coefficients, real frequencies and times, Brillouin-zone momenta and
//! cyclic-lattice sites), and decides how those meshes combine when Green's
//! functions are added or multiplied.
//!
//! ## Features
//! - One immutable value type per mesh kind, gathered in [`MeshKind`]
//! - Size, index-to-linear mapping and lazy point iteration for every kind
//! - Tensor-product meshes ([`MeshProduct`]) with row-major linearization
//! - Statistics propagation: `Fermion × Fermion → Boson`, `Boson` is neutral
//! - Strict in-place rules: `g *= h` needs `h` on the same mesh and never
//!   changes the mesh of `g`
//!
//! ## Usage
//!
//! ```rust
//! use gf_meshes::prelude::*;
//!
//! let f = GfDescriptor::new(MeshKind::from(ImTimeMesh::new(1.0, Statistic::Fermion, 100)?), [1, 1]);
//! let b = GfDescriptor::new(MeshKind::from(ImTimeMesh::new(1.0, Statistic::Boson, 100)?), [1, 1]);
//!
//! assert_eq!((&f * &f)?.statistic(), Some(Statistic::Boson));
//! assert_eq!((&f * &b)?.statistic(), Some(Statistic::Fermion));
//! assert!((&f + &b).unwrap_err().is_incompatible());
//! # Ok::<(), gf_meshes::mesh_error::MeshError>(())
//! ```
//!
//! ## Invariant checks
//! Meshes validate their parameters on construction. Values obtained some
//! other way (e.g. deserialized) can be checked with
//! [`DebugInvariants::validate_invariants`]; the `strict-invariants` and
//! `check-invariants` features keep the internal assertions on in release
//! builds.

pub mod algebra;
pub mod debug_invariants;
pub mod gf;
pub mod lattice;
pub mod mesh_error;
pub mod meshes;
pub mod product;
pub mod statistic;

pub use debug_invariants::DebugInvariants;
pub use gf::GfDescriptor;
pub use meshes::{MeshKind, MeshTag};
pub use product::{MeshDomain, MeshProduct};

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algebra::{AlgebraOp, combine};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::gf::GfDescriptor;
    pub use crate::lattice::{BravaisLattice, BrillouinZone};
    pub use crate::mesh_error::{Incompatibility, MeshError};
    pub use crate::meshes::{
        BrillouinZoneMesh, CyclicLatticeMesh, ImFreqMesh, ImFreqOptions, ImTimeMesh,
        LegendreMesh, MatsubaraFreq, Mesh, MeshIndex, MeshKind, MeshPoint, MeshTag, MeshValue,
        ReFreqMesh, ReTimeMesh,
    };
    pub use crate::product::{MeshDomain, MeshProduct};
    pub use crate::statistic::{MatsubaraMeshOpt, Statistic};
}
