//! Finite periodic clusters: Brillouin-zone and cyclic-lattice meshes.
//!
//! Both kinds are indexed by `[i64; 3]` with `0 <= i[d] < dims[d]`, and
//! linearized row-major: `(i0 * dims[1] + i1) * dims[2] + i2`.

use std::fmt;

use super::{Mesh, MeshTag, MeshValue};
use crate::lattice::{BravaisLattice, BrillouinZone};
use crate::mesh_error::MeshError;

/// Extents of a diagonal periodization.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ClusterGrid {
    dims: [usize; 3],
}

impl ClusterGrid {
    pub fn new(tag: MeshTag, dims: [usize; 3]) -> Result<Self, MeshError> {
        let grid = Self { dims };
        grid.validate(tag)?;
        Ok(grid)
    }

    /// Read the extents off a periodization matrix. Only diagonal matrices
    /// with positive entries describe a cluster this grid can hold.
    pub fn from_periodization(tag: MeshTag, matrix: [[i64; 3]; 3]) -> Result<Self, MeshError> {
        let mut dims = [0usize; 3];
        for (i, row) in matrix.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                if i != j && v != 0 {
                    return Err(MeshError::invalid(
                        tag.name(),
                        format!("non-diagonal periodization matrix {matrix:?} is not supported"),
                    ));
                }
            }
            dims[i] = usize::try_from(row[i]).unwrap_or(0);
        }
        Self::new(tag, dims)
    }

    pub(crate) fn validate(&self, tag: MeshTag) -> Result<(), MeshError> {
        if self.dims.contains(&0) {
            return Err(MeshError::invalid(
                tag.name(),
                format!("cluster extents must be positive, got {:?}", self.dims),
            ));
        }
        super::checked_size(tag.name(), self.dims).map(|_| ())
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn size(&self) -> usize {
        self.dims.iter().product()
    }

    /// The periodization matrix, `diag(dims)`.
    pub fn periodization_matrix(&self) -> [[i64; 3]; 3] {
        let mut m = [[0; 3]; 3];
        for d in 0..3 {
            m[d][d] = self.dims[d] as i64;
        }
        m
    }

    pub fn index_to_linear(&self, tag: MeshTag, index: [i64; 3]) -> Result<usize, MeshError> {
        let mut linear = 0usize;
        for (&i, &n) in index.iter().zip(&self.dims) {
            match usize::try_from(i) {
                Ok(u) if u < n => linear = linear * n + u,
                _ => {
                    let [a, b, c] = index;
                    return Err(MeshError::out_of_range(
                        tag.name(),
                        format!("({a}, {b}, {c})"),
                        self.size(),
                    ));
                }
            }
        }
        Ok(linear)
    }

    /// Inverse of [`ClusterGrid::index_to_linear`]; `linear` must be in range.
    pub fn linear_to_index(&self, linear: usize) -> [i64; 3] {
        let [_, n1, n2] = self.dims;
        [
            (linear / (n1 * n2)) as i64,
            ((linear / n2) % n1) as i64,
            (linear % n2) as i64,
        ]
    }

    /// Bring any integer index back into the cluster (periodic wrap).
    pub fn wrap(&self, index: [i64; 3]) -> [i64; 3] {
        let mut out = [0; 3];
        for d in 0..3 {
            out[d] = index[d].rem_euclid(self.dims[d] as i64);
        }
        out
    }
}

/// Extents of an `n_k`-per-direction cluster on a lattice of dimension `dim`.
fn uniform_dims(dim: usize, n: usize) -> [usize; 3] {
    let mut dims = [1; 3];
    for d in dims.iter_mut().take(dim) {
        *d = n;
    }
    dims
}

fn warn_on_unspanned_extents(tag: MeshTag, dim: usize, grid: &ClusterGrid) {
    if grid.dims()[dim..].iter().any(|&n| n > 1) {
        log::warn!(
            "{}: periodization {:?} extends along directions a {}-dimensional lattice does not span",
            tag.name(),
            grid.dims(),
            dim
        );
    }
}

/// Regular momentum grid `k = Σ_d (i_d / dims[d]) b_d` on a Brillouin zone.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BrillouinZoneMesh {
    bz: BrillouinZone,
    grid: ClusterGrid,
}

impl BrillouinZoneMesh {
    /// `n_k` points along each direction the lattice spans.
    pub fn new(bz: BrillouinZone, n_k: usize) -> Result<Self, MeshError> {
        super::check_count(Self::TAG, "n_k", n_k)?;
        let grid = ClusterGrid::new(Self::TAG, uniform_dims(bz.lattice().dim(), n_k))?;
        let mesh = Self { bz, grid };
        log::trace!("{mesh}");
        Ok(mesh)
    }

    /// Cluster given by a (diagonal) periodization matrix.
    pub fn with_periodization(
        bz: BrillouinZone,
        periodization: [[i64; 3]; 3],
    ) -> Result<Self, MeshError> {
        let grid = ClusterGrid::from_periodization(Self::TAG, periodization)?;
        warn_on_unspanned_extents(Self::TAG, bz.lattice().dim(), &grid);
        let mesh = Self { bz, grid };
        log::trace!("{mesh}");
        Ok(mesh)
    }

    pub fn domain(&self) -> &BrillouinZone {
        &self.bz
    }

    pub fn grid(&self) -> &ClusterGrid {
        &self.grid
    }

    /// Index of the mesh momentum closest to `k`, folded back into the zone.
    pub fn locate_neighbours(&self, k: [f64; 3]) -> [i64; 3] {
        let x = self.bz.real_to_lattice(k);
        let dims = self.grid.dims();
        let mut index = [0i64; 3];
        for d in 0..3 {
            index[d] = (x[d] * dims[d] as f64).round() as i64;
        }
        self.grid.wrap(index)
    }
}

impl Mesh for BrillouinZoneMesh {
    type Index = [i64; 3];
    const TAG: MeshTag = MeshTag::BrillouinZone;

    fn size(&self) -> usize {
        self.grid.size()
    }

    fn index_to_linear(&self, index: [i64; 3]) -> Result<usize, MeshError> {
        self.grid.index_to_linear(Self::TAG, index)
    }

    fn linear_to_index(&self, linear: usize) -> Result<[i64; 3], MeshError> {
        self.check_linear(linear)?;
        Ok(self.grid.linear_to_index(linear))
    }

    fn value(&self, linear: usize) -> Result<MeshValue, MeshError> {
        let index = self.linear_to_index(linear)?;
        let dims = self.grid.dims();
        let x = [
            index[0] as f64 / dims[0] as f64,
            index[1] as f64 / dims[1] as f64,
            index[2] as f64 / dims[2] as f64,
        ];
        Ok(MeshValue::Vector(self.bz.lattice_to_real(x)))
    }

    fn validate(&self) -> Result<(), MeshError> {
        self.grid.validate(Self::TAG)
    }
}

impl fmt::Display for BrillouinZoneMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Brillouin Zone Mesh of size {} with periodization {:?}, Domain: {}",
            self.size(),
            self.grid.dims(),
            self.bz
        )
    }
}

/// Finite cyclic cluster `R = Σ_d i_d a_d` of a Bravais lattice.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CyclicLatticeMesh {
    lattice: BravaisLattice,
    grid: ClusterGrid,
}

impl CyclicLatticeMesh {
    /// Cluster of `dims[d]` sites along each lattice direction.
    pub fn new(lattice: BravaisLattice, dims: [usize; 3]) -> Result<Self, MeshError> {
        let grid = ClusterGrid::new(Self::TAG, dims)?;
        warn_on_unspanned_extents(Self::TAG, lattice.dim(), &grid);
        let mesh = Self { lattice, grid };
        log::trace!("{mesh}");
        Ok(mesh)
    }

    /// Cluster given by a (diagonal) periodization matrix.
    pub fn with_periodization(
        lattice: BravaisLattice,
        periodization: [[i64; 3]; 3],
    ) -> Result<Self, MeshError> {
        let grid = ClusterGrid::from_periodization(Self::TAG, periodization)?;
        Self::new(lattice, grid.dims())
    }

    pub fn domain(&self) -> &BravaisLattice {
        &self.lattice
    }

    pub fn grid(&self) -> &ClusterGrid {
        &self.grid
    }

    /// Periodic image of `index` inside the cluster.
    pub fn wrap_index(&self, index: [i64; 3]) -> [i64; 3] {
        self.grid.wrap(index)
    }
}

impl Mesh for CyclicLatticeMesh {
    type Index = [i64; 3];
    const TAG: MeshTag = MeshTag::CyclicLattice;

    fn size(&self) -> usize {
        self.grid.size()
    }

    fn index_to_linear(&self, index: [i64; 3]) -> Result<usize, MeshError> {
        self.grid.index_to_linear(Self::TAG, index)
    }

    fn linear_to_index(&self, linear: usize) -> Result<[i64; 3], MeshError> {
        self.check_linear(linear)?;
        Ok(self.grid.linear_to_index(linear))
    }

    fn value(&self, linear: usize) -> Result<MeshValue, MeshError> {
        let [a, b, c] = self.linear_to_index(linear)?;
        Ok(MeshValue::Vector(
            self.lattice.lattice_to_real([a as f64, b as f64, c as f64]),
        ))
    }

    fn validate(&self) -> Result<(), MeshError> {
        self.grid.validate(Self::TAG)
    }
}

impl fmt::Display for CyclicLatticeMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cyclic Lattice Mesh of size {} with periodization {:?}, Domain: {}",
            self.size(),
            self.grid.dims(),
            self.lattice
        )
    }
}
