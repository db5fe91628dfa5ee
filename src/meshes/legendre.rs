//! Legendre-coefficient mesh and the Legendre polynomial recurrence.

use std::fmt;

use super::{Mesh, MeshTag, MeshValue};
use crate::mesh_error::MeshError;
use crate::statistic::Statistic;

/// Default number of Legendre coefficients.
pub const DEFAULT_N_L: usize = 1025;

/// Values `P_0(x), P_1(x), ...` of the Legendre polynomials, generated with
/// `n P_n = (2n - 1) x P_{n-1} - (n - 1) P_{n-2}`. The iterator never ends.
#[derive(Copy, Clone, Debug)]
pub struct LegendrePolynomials {
    x: f64,
    n: u32,
    last: [f64; 2],
}

impl LegendrePolynomials {
    pub fn new(x: f64) -> Self {
        Self {
            x,
            n: 0,
            last: [1.0, x],
        }
    }
}

impl Iterator for LegendrePolynomials {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let n = self.n;
        self.n += 1;
        if n < 2 {
            return Some(self.last[n as usize]);
        }
        let eo = (n % 2) as usize;
        let nf = f64::from(n);
        self.last[eo] =
            ((2.0 * nf - 1.0) * self.x * self.last[1 - eo] - (nf - 1.0) * self.last[eo]) / nf;
        Some(self.last[eo])
    }
}

/// Mesh of Legendre coefficients `l ∈ [0, n_l)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LegendreMesh {
    beta: f64,
    statistic: Statistic,
    n_l: usize,
}

impl LegendreMesh {
    pub fn new(beta: f64, statistic: Statistic, n_l: usize) -> Result<Self, MeshError> {
        let mesh = Self {
            beta,
            statistic,
            n_l,
        };
        mesh.validate()?;
        log::trace!("{mesh}");
        Ok(mesh)
    }

    /// Mesh with [`DEFAULT_N_L`] coefficients.
    pub fn with_default_size(beta: f64, statistic: Statistic) -> Result<Self, MeshError> {
        Self::new(beta, statistic, DEFAULT_N_L)
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Normalized basis `sqrt(2l + 1)/β · P_l(2τ/β - 1)` for every `l` of the mesh.
    pub fn basis(&self, tau: f64) -> Result<Vec<f64>, MeshError> {
        if !(0.0..=self.beta).contains(&tau) {
            return Err(MeshError::invalid(
                Self::TAG.name(),
                format!("tau = {tau} lies outside [0, {}]", self.beta),
            ));
        }
        let x = 2.0 * tau / self.beta - 1.0;
        Ok(LegendrePolynomials::new(x)
            .take(self.n_l)
            .enumerate()
            .map(|(l, p)| (2.0 * l as f64 + 1.0).sqrt() / self.beta * p)
            .collect())
    }

    pub(crate) fn with_statistic(&self, statistic: Statistic) -> Self {
        Self {
            statistic,
            ..self.clone()
        }
    }
}

impl Mesh for LegendreMesh {
    type Index = i64;
    const TAG: MeshTag = MeshTag::Legendre;

    fn size(&self) -> usize {
        self.n_l
    }

    fn index_to_linear(&self, l: i64) -> Result<usize, MeshError> {
        match usize::try_from(l) {
            Ok(u) if u < self.n_l => Ok(u),
            _ => Err(MeshError::out_of_range(Self::TAG.name(), l, self.n_l)),
        }
    }

    fn linear_to_index(&self, linear: usize) -> Result<i64, MeshError> {
        self.check_linear(linear)?;
        Ok(linear as i64)
    }

    fn value(&self, linear: usize) -> Result<MeshValue, MeshError> {
        self.check_linear(linear)?;
        Ok(MeshValue::Legendre(linear))
    }

    fn statistic(&self) -> Option<Statistic> {
        Some(self.statistic)
    }

    fn validate(&self) -> Result<(), MeshError> {
        super::check_beta(Self::TAG, self.beta)?;
        super::check_count(Self::TAG, "n_l", self.n_l)
    }
}

impl fmt::Display for LegendreMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Legendre Mesh of size {}, Domain: Legendre domain with beta = {}, statistic = {}",
            self.n_l, self.beta, self.statistic
        )
    }
}
