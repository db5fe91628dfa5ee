//! Imaginary (Matsubara) frequency mesh.

use std::f64::consts::PI;
use std::fmt;

use super::{Mesh, MeshTag, MeshValue};
use crate::mesh_error::MeshError;
use crate::statistic::{MatsubaraMeshOpt, Statistic};

/// Number of positive frequencies when none is given.
pub const DEFAULT_N_MAX: usize = 1025;

/// A Matsubara frequency `iω_n`, `ω_n = (2n + 1)π/β` for fermions and
/// `2nπ/β` for bosons.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MatsubaraFreq {
    pub n: i64,
    pub beta: f64,
    pub statistic: Statistic,
}

impl MatsubaraFreq {
    pub fn new(n: i64, beta: f64, statistic: Statistic) -> Self {
        Self { n, beta, statistic }
    }

    /// `ω_n` (the imaginary part of the frequency).
    pub fn value(&self) -> f64 {
        (2 * self.n + self.statistic.matsubara_offset()) as f64 * PI / self.beta
    }
}

impl fmt::Display for MatsubaraFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}i", self.value())
    }
}

/// Construction options for [`ImFreqMesh`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImFreqOptions {
    /// Number of non-negative frequencies.
    pub n_max: usize,
    pub option: MatsubaraMeshOpt,
}

impl Default for ImFreqOptions {
    fn default() -> Self {
        Self {
            n_max: DEFAULT_N_MAX,
            option: MatsubaraMeshOpt::AllFrequencies,
        }
    }
}

/// Mesh of Matsubara frequencies `n ∈ [first_index, last_index]`.
///
/// With all frequencies, fermionic meshes are symmetric around zero
/// (`-n_max ..= n_max - 1`, size `2 n_max`) while bosonic meshes are
/// centered on `ω_0 = 0` (`-(n_max - 1) ..= n_max - 1`, size `2 n_max - 1`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImFreqMesh {
    beta: f64,
    statistic: Statistic,
    n_max: usize,
    option: MatsubaraMeshOpt,
}

impl ImFreqMesh {
    pub fn new(beta: f64, statistic: Statistic, n_max: usize) -> Result<Self, MeshError> {
        Self::with_options(
            beta,
            statistic,
            ImFreqOptions {
                n_max,
                ..Default::default()
            },
        )
    }

    pub fn with_options(
        beta: f64,
        statistic: Statistic,
        opts: ImFreqOptions,
    ) -> Result<Self, MeshError> {
        let mesh = Self {
            beta,
            statistic,
            n_max: opts.n_max,
            option: opts.option,
        };
        mesh.validate()?;
        log::trace!("{mesh}");
        Ok(mesh)
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn n_max(&self) -> usize {
        self.n_max
    }

    pub fn option(&self) -> MatsubaraMeshOpt {
        self.option
    }

    pub fn positive_only(&self) -> bool {
        self.option == MatsubaraMeshOpt::PositiveFrequenciesOnly
    }

    /// Smallest Matsubara index on the mesh.
    pub fn first_index(&self) -> i64 {
        match (self.positive_only(), self.statistic) {
            (true, _) => 0,
            (false, Statistic::Fermion) => -(self.n_max as i64),
            (false, Statistic::Boson) => 1 - self.n_max as i64,
        }
    }

    /// Largest Matsubara index on the mesh.
    pub fn last_index(&self) -> i64 {
        self.n_max as i64 - 1
    }

    pub(crate) fn with_statistic(&self, statistic: Statistic) -> Self {
        Self {
            statistic,
            ..self.clone()
        }
    }
}

impl Mesh for ImFreqMesh {
    type Index = i64;
    const TAG: MeshTag = MeshTag::ImFreq;

    fn size(&self) -> usize {
        (self.last_index() - self.first_index() + 1) as usize
    }

    fn index_to_linear(&self, n: i64) -> Result<usize, MeshError> {
        if n < self.first_index() || n > self.last_index() {
            return Err(MeshError::out_of_range(Self::TAG.name(), n, self.size()));
        }
        Ok((n - self.first_index()) as usize)
    }

    fn linear_to_index(&self, linear: usize) -> Result<i64, MeshError> {
        self.check_linear(linear)?;
        Ok(self.first_index() + linear as i64)
    }

    fn value(&self, linear: usize) -> Result<MeshValue, MeshError> {
        let n = self.linear_to_index(linear)?;
        Ok(MeshValue::Matsubara(MatsubaraFreq::new(
            n,
            self.beta,
            self.statistic,
        )))
    }

    fn statistic(&self) -> Option<Statistic> {
        Some(self.statistic)
    }

    fn validate(&self) -> Result<(), MeshError> {
        super::check_beta(Self::TAG, self.beta)?;
        super::check_count(Self::TAG, "n_max", self.n_max)?;
        // both signs are stored, and the size must stay addressable
        if self.n_max > super::MAX_POINTS / 2 {
            return Err(MeshError::invalid(
                Self::TAG.name(),
                format!("n_max = {} exceeds {}", self.n_max, super::MAX_POINTS / 2),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for ImFreqMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imaginary Freq Mesh of size {}, Domain: Matsubara domain with beta = {}, statistic = {}, positive_only : {}",
            self.size(),
            self.beta,
            self.statistic,
            self.positive_only()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_ranges_follow_statistic() {
        let f = ImFreqMesh::new(10.0, Statistic::Fermion, 4).unwrap();
        assert_eq!((f.first_index(), f.last_index(), f.size()), (-4, 3, 8));
        let b = ImFreqMesh::new(10.0, Statistic::Boson, 4).unwrap();
        assert_eq!((b.first_index(), b.last_index(), b.size()), (-3, 3, 7));
        let p = ImFreqMesh::with_options(
            10.0,
            Statistic::Fermion,
            ImFreqOptions {
                n_max: 4,
                option: MatsubaraMeshOpt::PositiveFrequenciesOnly,
            },
        )
        .unwrap();
        assert_eq!((p.first_index(), p.size()), (0, 4));
    }

    #[test]
    fn n_max_bounded_by_index_range() {
        for n_max in [usize::MAX, i64::MAX as usize, i64::MAX as usize / 2 + 1] {
            assert!(matches!(
                ImFreqMesh::new(1.0, Statistic::Fermion, n_max),
                Err(MeshError::InvalidParameter { .. })
            ));
        }
        let n_max = i64::MAX as usize / 2;
        let f = ImFreqMesh::new(1.0, Statistic::Fermion, n_max).unwrap();
        assert_eq!(f.size(), 2 * n_max);
        assert_eq!(f.first_index(), -(n_max as i64));
        let b = ImFreqMesh::new(1.0, Statistic::Boson, n_max).unwrap();
        assert_eq!(b.size(), 2 * n_max - 1);
    }

    #[test]
    fn fermionic_frequencies_are_odd() {
        let beta = 2.0;
        let f = ImFreqMesh::new(beta, Statistic::Fermion, 2).unwrap();
        let MeshValue::Matsubara(w) = f.value(f.index_to_linear(0).unwrap()).unwrap() else {
            panic!("expected a Matsubara value");
        };
        assert!((w.value() - PI / beta).abs() < 1e-14);
        let MeshValue::Matsubara(w) = f.value(0).unwrap() else {
            panic!("expected a Matsubara value");
        };
        assert!((w.value() + 3.0 * PI / beta).abs() < 1e-14);
    }

    #[test]
    fn out_of_range_matsubara_index() {
        let b = ImFreqMesh::new(1.0, Statistic::Boson, 3).unwrap();
        assert!(b.index_to_linear(2).is_ok());
        assert!(matches!(
            b.index_to_linear(-3),
            Err(MeshError::IndexOutOfRange { .. })
        ));
        assert!(b.linear_to_index(b.size()).is_err());
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(ImFreqMesh::new(0.0, Statistic::Fermion, 10).is_err());
        assert!(ImFreqMesh::new(f64::INFINITY, Statistic::Fermion, 10).is_err());
        assert!(ImFreqMesh::new(1.0, Statistic::Fermion, 0).is_err());
        let d = ImFreqMesh::with_options(1.0, Statistic::Boson, ImFreqOptions::default()).unwrap();
        assert_eq!(d.n_max(), DEFAULT_N_MAX);
    }
}
