//! Imaginary-time mesh on `[0, β]`.

use std::fmt;

use super::{LinearGrid, Mesh, MeshTag, MeshValue};
use crate::mesh_error::MeshError;
use crate::statistic::Statistic;

/// `n_tau` equally spaced times `τ_i = i β / (n_tau - 1)`, both ends included.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImTimeMesh {
    beta: f64,
    statistic: Statistic,
    n_tau: usize,
}

impl ImTimeMesh {
    pub fn new(beta: f64, statistic: Statistic, n_tau: usize) -> Result<Self, MeshError> {
        let mesh = Self {
            beta,
            statistic,
            n_tau,
        };
        mesh.validate()?;
        log::trace!("{mesh}");
        Ok(mesh)
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    fn grid(&self) -> LinearGrid {
        LinearGrid::spanning(0.0, self.beta, self.n_tau)
    }

    /// Index of the time slice closest to `tau`, clamped to `[0, β]`.
    pub fn closest(&self, tau: f64) -> usize {
        self.grid().closest(tau)
    }

    pub(crate) fn with_statistic(&self, statistic: Statistic) -> Self {
        Self {
            statistic,
            ..self.clone()
        }
    }
}

impl Mesh for ImTimeMesh {
    type Index = i64;
    const TAG: MeshTag = MeshTag::ImTime;

    fn size(&self) -> usize {
        self.n_tau
    }

    fn index_to_linear(&self, i: i64) -> Result<usize, MeshError> {
        self.grid().index_to_linear(Self::TAG, i)
    }

    fn linear_to_index(&self, linear: usize) -> Result<i64, MeshError> {
        self.check_linear(linear)?;
        Ok(linear as i64)
    }

    fn value(&self, linear: usize) -> Result<MeshValue, MeshError> {
        self.check_linear(linear)?;
        Ok(MeshValue::Real(self.grid().point(linear)))
    }

    fn statistic(&self) -> Option<Statistic> {
        Some(self.statistic)
    }

    fn validate(&self) -> Result<(), MeshError> {
        super::check_beta(Self::TAG, self.beta)?;
        super::check_count(Self::TAG, "n_tau", self.n_tau)
    }
}

impl fmt::Display for ImTimeMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imaginary Time Mesh of size {}, Domain: Matsubara domain with beta = {}, statistic = {}",
            self.n_tau, self.beta, self.statistic
        )
    }
}
