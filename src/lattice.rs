//! Bravais lattices and their Brillouin zones.
//!
//! Lattices are always stored in three dimensions: a lattice built from one
//! or two unit vectors is completed with orthonormal directions, so that the
//! cluster meshes can use uniform `[i64; 3]` indices. `dim()` remembers how
//! many directions were physically specified.

use std::f64::consts::PI;
use std::fmt;

use crate::mesh_error::MeshError;

const EPS: f64 = 1e-10;

/// A Bravais lattice given by its real-space unit vectors (rows).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BravaisLattice {
    units: [[f64; 3]; 3],
    dim: usize,
}

impl BravaisLattice {
    /// Build a lattice from 1 to 3 linearly independent unit vectors.
    pub fn new(units: &[[f64; 3]]) -> Result<Self, MeshError> {
        let dim = units.len();
        if !(1..=3).contains(&dim) {
            return Err(MeshError::invalid(
                "BravaisLattice",
                format!("expected 1 to 3 unit vectors, got {dim}"),
            ));
        }
        if units.iter().flatten().any(|x| !x.is_finite()) {
            return Err(MeshError::invalid(
                "BravaisLattice",
                "unit vectors must be finite",
            ));
        }
        let mut full = [[0.0; 3]; 3];
        full[..dim].copy_from_slice(units);
        if dim == 1 {
            full[1] = orthonormal_to(full[0])?;
        }
        if dim <= 2 {
            full[2] = normalize(cross(full[0], full[1]))?;
        }
        if det(full).abs() < EPS {
            return Err(MeshError::invalid(
                "BravaisLattice",
                "unit vectors are linearly dependent",
            ));
        }
        log::trace!("BravaisLattice: dim {dim}, units {full:?}");
        Ok(Self { units: full, dim })
    }

    /// Simple cubic lattice of dimension `dim` with unit lattice constant.
    pub fn cubic(dim: usize) -> Result<Self, MeshError> {
        const E: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        Self::new(E.get(..dim).unwrap_or(&[]))
    }

    /// Number of directions that were physically specified.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The three (completed) unit vectors.
    pub fn units(&self) -> &[[f64; 3]; 3] {
        &self.units
    }

    /// Real-space position of the lattice point with integer coordinates `x`.
    pub fn lattice_to_real(&self, x: [f64; 3]) -> [f64; 3] {
        combine(&self.units, x)
    }
}

impl fmt::Display for BravaisLattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bravais lattice of dimension {} with units {:?}", self.dim, &self.units[..self.dim])
    }
}

/// Brillouin zone of a Bravais lattice, holding the reciprocal basis
/// `b_i · a_j = 2π δ_ij`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BrillouinZone {
    lattice: BravaisLattice,
    reciprocal: [[f64; 3]; 3],
}

impl BrillouinZone {
    pub fn new(lattice: BravaisLattice) -> Self {
        let a = lattice.units;
        let volume = det(a);
        let scale = 2.0 * PI / volume;
        let reciprocal = [
            scale_vec(cross(a[1], a[2]), scale),
            scale_vec(cross(a[2], a[0]), scale),
            scale_vec(cross(a[0], a[1]), scale),
        ];
        Self {
            lattice,
            reciprocal,
        }
    }

    pub fn lattice(&self) -> &BravaisLattice {
        &self.lattice
    }

    /// Reciprocal unit vectors (rows).
    pub fn units(&self) -> &[[f64; 3]; 3] {
        &self.reciprocal
    }

    /// Momentum with reduced coordinates `x` in the reciprocal basis.
    pub fn lattice_to_real(&self, x: [f64; 3]) -> [f64; 3] {
        combine(&self.reciprocal, x)
    }

    /// Reduced coordinates of the momentum `k`.
    pub fn real_to_lattice(&self, k: [f64; 3]) -> [f64; 3] {
        let a = &self.lattice.units;
        [
            dot(k, a[0]) / (2.0 * PI),
            dot(k, a[1]) / (2.0 * PI),
            dot(k, a[2]) / (2.0 * PI),
        ]
    }
}

impl fmt::Display for BrillouinZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Brillouin zone of the {}", self.lattice)
    }
}

fn combine(basis: &[[f64; 3]; 3], x: [f64; 3]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (b, c) in basis.iter().zip(x) {
        for k in 0..3 {
            out[k] += c * b[k];
        }
    }
    out
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn det(m: [[f64; 3]; 3]) -> f64 {
    dot(m[0], cross(m[1], m[2]))
}

fn scale_vec(v: [f64; 3], s: f64) -> [f64; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

fn normalize(v: [f64; 3]) -> Result<[f64; 3], MeshError> {
    let n = dot(v, v).sqrt();
    if n < EPS {
        return Err(MeshError::invalid(
            "BravaisLattice",
            "unit vectors are linearly dependent",
        ));
    }
    Ok(scale_vec(v, 1.0 / n))
}

/// A unit vector orthogonal to `v`, built from the Cartesian axis least
/// aligned with it.
fn orthonormal_to(v: [f64; 3]) -> Result<[f64; 3], MeshError> {
    let v = normalize(v)?;
    let axis = (0..3)
        .min_by(|&i, &j| v[i].abs().total_cmp(&v[j].abs()))
        .unwrap_or(0);
    let mut e = [0.0; 3];
    e[axis] = 1.0;
    let proj = dot(e, v);
    normalize([e[0] - proj * v[0], e[1] - proj * v[1], e[2] - proj * v[2]])
}
