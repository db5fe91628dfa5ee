//! Quantum statistics carried by imaginary-axis meshes.
//!
//! Under multiplication, statistics compose like the group C₂ (XOR):
//! `Boson` is the identity and two `Fermion`s give a `Boson`.

use std::fmt;
use std::str::FromStr;

use crate::mesh_error::MeshError;

/// Fermionic (antiperiodic) or bosonic (periodic) statistic.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Statistic {
    Fermion,
    Boson,
}

impl Statistic {
    /// Both statistics, fermion first.
    pub const ALL: [Statistic; 2] = [Statistic::Fermion, Statistic::Boson];

    /// Statistic of a product of two functions with statistics `a` and `b`.
    #[inline]
    pub fn compose(a: Self, b: Self) -> Self {
        if a.is_fermion() ^ b.is_fermion() {
            Statistic::Fermion
        } else {
            Statistic::Boson
        }
    }

    #[inline]
    pub fn is_fermion(self) -> bool {
        self == Statistic::Fermion
    }

    /// The other statistic.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Statistic::Fermion => Statistic::Boson,
            Statistic::Boson => Statistic::Fermion,
        }
    }

    /// Sign picked up under `τ → τ + β`: `-1` for fermions, `+1` for bosons.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Statistic::Fermion => -1,
            Statistic::Boson => 1,
        }
    }

    /// Offset in `ω_n = (2n + offset)π/β`.
    #[inline]
    pub(crate) fn matsubara_offset(self) -> i64 {
        match self {
            Statistic::Fermion => 1,
            Statistic::Boson => 0,
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Fermion => f.write_str("Fermion"),
            Statistic::Boson => f.write_str("Boson"),
        }
    }
}

impl FromStr for Statistic {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fermion" | "F" => Ok(Statistic::Fermion),
            "Boson" | "B" => Ok(Statistic::Boson),
            other => Err(MeshError::invalid(
                "statistic",
                format!("unknown statistic `{other}` (expected Fermion or Boson)"),
            )),
        }
    }
}

/// Which Matsubara frequencies an imaginary-frequency mesh stores.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MatsubaraMeshOpt {
    /// Negative and positive frequencies.
    #[default]
    AllFrequencies,
    /// Only `n >= 0`.
    PositiveFrequenciesOnly,
}

#[cfg(test)]
mod tests {
    use super::*;
    use Statistic::*;

    #[test]
    fn composition_table() {
        assert_eq!(Statistic::compose(Fermion, Fermion), Boson);
        assert_eq!(Statistic::compose(Fermion, Boson), Fermion);
        assert_eq!(Statistic::compose(Boson, Fermion), Fermion);
        assert_eq!(Statistic::compose(Boson, Boson), Boson);
    }

    #[test]
    fn flip_is_composition_with_fermion() {
        for s in Statistic::ALL {
            assert_eq!(s.flip(), Statistic::compose(s, Fermion));
            assert_eq!(s.flip().flip(), s);
        }
    }

    #[test]
    fn parse_and_print() {
        assert_eq!("Fermion".parse::<Statistic>().unwrap(), Fermion);
        assert_eq!("B".parse::<Statistic>().unwrap(), Boson);
        assert_eq!(Boson.to_string(), "Boson");
        let err = "Anyon".parse::<Statistic>().unwrap_err();
        assert!(matches!(err, MeshError::InvalidParameter { .. }));
    }

    #[test]
    fn sign_convention() {
        assert_eq!(Fermion.sign(), -1);
        assert_eq!(Boson.sign(), 1);
        assert_eq!(MatsubaraMeshOpt::default(), MatsubaraMeshOpt::AllFrequencies);
    }
}
