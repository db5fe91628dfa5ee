//! The mesh catalog.
//!
//! Each mesh kind lives in its own struct implementing [`Mesh`]; the closed
//! set of kinds is gathered in the [`MeshKind`] sum type, which is what the
//! algebra engine and Green's-function descriptors manipulate. Meshes are
//! immutable once constructed: every constructor validates its parameters
//! and fails with [`MeshError::InvalidParameter`].
//!
//! Only the imaginary-axis kinds ([`ImFreqMesh`], [`ImTimeMesh`],
//! [`LegendreMesh`]) carry a [`Statistic`].

pub mod cluster;
pub mod imtime;
pub mod legendre;
pub mod linear;
pub mod matsubara;

pub use cluster::{BrillouinZoneMesh, ClusterGrid, CyclicLatticeMesh};
pub use imtime::ImTimeMesh;
pub use legendre::{LegendreMesh, LegendrePolynomials};
pub use linear::{LinearGrid, ReFreqMesh, ReTimeMesh};
pub use matsubara::{ImFreqMesh, ImFreqOptions, MatsubaraFreq};

use std::fmt;
use std::ops::Range;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::statistic::Statistic;

/// Common interface of every concrete mesh kind.
pub trait Mesh {
    /// Kind-specific index: a Matsubara index, a grid position, or a
    /// three-component cluster index.
    type Index: Copy + fmt::Debug;

    /// Discriminant of this kind.
    const TAG: MeshTag;

    /// Number of mesh points.
    fn size(&self) -> usize;

    /// Map a kind-specific index to its position in `[0, size)`.
    fn index_to_linear(&self, index: Self::Index) -> Result<usize, MeshError>;

    /// Inverse of [`Mesh::index_to_linear`].
    fn linear_to_index(&self, linear: usize) -> Result<Self::Index, MeshError>;

    /// Physical value of the point at `linear`.
    fn value(&self, linear: usize) -> Result<MeshValue, MeshError>;

    /// Statistic, for the kinds that carry one.
    fn statistic(&self) -> Option<Statistic> {
        None
    }

    /// Check the constructor constraints on the current parameters.
    fn validate(&self) -> Result<(), MeshError>;

    #[inline]
    fn check_linear(&self, linear: usize) -> Result<(), MeshError> {
        if linear < self.size() {
            Ok(())
        } else {
            Err(MeshError::out_of_range(Self::TAG.name(), linear, self.size()))
        }
    }
}

/// Discriminant of [`MeshKind`], used in diagnostics.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MeshTag {
    ImFreq,
    ImTime,
    Legendre,
    ReFreq,
    ReTime,
    BrillouinZone,
    CyclicLattice,
}

impl MeshTag {
    /// User-facing class name, e.g. `MeshImFreq`.
    pub fn name(self) -> &'static str {
        match self {
            MeshTag::ImFreq => "MeshImFreq",
            MeshTag::ImTime => "MeshImTime",
            MeshTag::Legendre => "MeshLegendre",
            MeshTag::ReFreq => "MeshReFreq",
            MeshTag::ReTime => "MeshReTime",
            MeshTag::BrillouinZone => "MeshBrillouinZone",
            MeshTag::CyclicLattice => "MeshCyclicLattice",
        }
    }

    /// Name under which the mesh is tagged in persistent archives.
    pub fn h5_name(self) -> &'static str {
        &self.name()[4..]
    }

    /// `true` for the kinds carrying a statistic.
    pub fn has_statistic(self) -> bool {
        matches!(self, MeshTag::ImFreq | MeshTag::ImTime | MeshTag::Legendre)
    }
}

impl fmt::Display for MeshTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index accepted by [`MeshKind::index_to_linear`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MeshIndex {
    /// One-dimensional meshes.
    Scalar(i64),
    /// Brillouin-zone and cyclic-lattice meshes.
    Lattice([i64; 3]),
}

impl fmt::Display for MeshIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshIndex::Scalar(i) => write!(f, "{i}"),
            MeshIndex::Lattice([a, b, c]) => write!(f, "({a}, {b}, {c})"),
        }
    }
}

impl From<i64> for MeshIndex {
    fn from(i: i64) -> Self {
        MeshIndex::Scalar(i)
    }
}

impl From<[i64; 3]> for MeshIndex {
    fn from(i: [i64; 3]) -> Self {
        MeshIndex::Lattice(i)
    }
}

/// Physical value attached to a mesh point.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum MeshValue {
    /// Matsubara frequency `iω_n`.
    Matsubara(MatsubaraFreq),
    /// Real coordinate: imaginary time, real frequency or real time.
    Real(f64),
    /// Legendre coefficient index `l`.
    Legendre(usize),
    /// Momentum or real-space lattice vector.
    Vector([f64; 3]),
}

impl MeshValue {
    /// Scalar reading of the value: `ω_n` for Matsubara points, the
    /// coordinate for real points, `l` for Legendre points.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MeshValue::Matsubara(w) => Some(w.value()),
            MeshValue::Real(x) => Some(*x),
            MeshValue::Legendre(l) => Some(*l as f64),
            MeshValue::Vector(_) => None,
        }
    }
}

/// A point of a mesh: its linear position, index and value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshPoint {
    pub linear: usize,
    pub index: MeshIndex,
    pub value: MeshValue,
}

/// A mesh of any kind.
///
/// Two meshes are equal iff they are of the same kind with identical
/// parameters, statistic included.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum MeshKind {
    #[serde(rename = "MeshImFreq")]
    ImFreq(ImFreqMesh),
    #[serde(rename = "MeshImTime")]
    ImTime(ImTimeMesh),
    #[serde(rename = "MeshLegendre")]
    Legendre(LegendreMesh),
    #[serde(rename = "MeshReFreq")]
    ReFreq(ReFreqMesh),
    #[serde(rename = "MeshReTime")]
    ReTime(ReTimeMesh),
    #[serde(rename = "MeshBrillouinZone")]
    BrillouinZone(BrillouinZoneMesh),
    #[serde(rename = "MeshCyclicLattice")]
    CyclicLattice(CyclicLatticeMesh),
}

/// Run `$body` with `$m` bound to the concrete mesh inside `$self`.
macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            MeshKind::ImFreq($m) => $body,
            MeshKind::ImTime($m) => $body,
            MeshKind::Legendre($m) => $body,
            MeshKind::ReFreq($m) => $body,
            MeshKind::ReTime($m) => $body,
            MeshKind::BrillouinZone($m) => $body,
            MeshKind::CyclicLattice($m) => $body,
        }
    };
}

pub(crate) fn check_beta(tag: MeshTag, beta: f64) -> Result<(), MeshError> {
    if beta.is_finite() && beta > 0.0 {
        Ok(())
    } else {
        Err(MeshError::invalid(
            tag.name(),
            format!("beta must be finite and positive, got {beta}"),
        ))
    }
}

/// Largest number of points a mesh may hold; every index must fit an `i64`.
pub(crate) const MAX_POINTS: usize = i64::MAX as usize;

pub(crate) fn check_count(tag: MeshTag, what: &str, n: usize) -> Result<(), MeshError> {
    if n == 0 {
        return Err(MeshError::invalid(tag.name(), format!("{what} must be positive")));
    }
    if n > MAX_POINTS {
        return Err(MeshError::invalid(
            tag.name(),
            format!("{what} = {n} exceeds {MAX_POINTS}"),
        ));
    }
    Ok(())
}

/// Product of `factors`, or `InvalidParameter` when it exceeds [`MAX_POINTS`].
pub(crate) fn checked_size(
    mesh: &'static str,
    factors: impl IntoIterator<Item = usize>,
) -> Result<usize, MeshError> {
    factors
        .into_iter()
        .try_fold(1usize, |acc, n| acc.checked_mul(n))
        .filter(|&n| n <= MAX_POINTS)
        .ok_or_else(|| MeshError::invalid(mesh, format!("total size exceeds {MAX_POINTS} points")))
}

fn scalar_index(tag: MeshTag, index: MeshIndex, size: usize) -> Result<i64, MeshError> {
    match index {
        MeshIndex::Scalar(i) => Ok(i),
        other => Err(MeshError::out_of_range(tag.name(), other, size)),
    }
}

fn lattice_index(tag: MeshTag, index: MeshIndex, size: usize) -> Result<[i64; 3], MeshError> {
    match index {
        MeshIndex::Lattice(i) => Ok(i),
        other => Err(MeshError::out_of_range(tag.name(), other, size)),
    }
}

impl MeshKind {
    pub fn tag(&self) -> MeshTag {
        match self {
            MeshKind::ImFreq(_) => MeshTag::ImFreq,
            MeshKind::ImTime(_) => MeshTag::ImTime,
            MeshKind::Legendre(_) => MeshTag::Legendre,
            MeshKind::ReFreq(_) => MeshTag::ReFreq,
            MeshKind::ReTime(_) => MeshTag::ReTime,
            MeshKind::BrillouinZone(_) => MeshTag::BrillouinZone,
            MeshKind::CyclicLattice(_) => MeshTag::CyclicLattice,
        }
    }

    /// Statistic of the imaginary-axis kinds; `None` for the others.
    pub fn statistic(&self) -> Option<Statistic> {
        dispatch!(self, m => m.statistic())
    }

    /// The same mesh carrying statistic `s`, or `None` when this kind has
    /// no statistic.
    pub fn with_statistic(&self, s: Statistic) -> Option<MeshKind> {
        match self {
            MeshKind::ImFreq(m) => Some(MeshKind::ImFreq(m.with_statistic(s))),
            MeshKind::ImTime(m) => Some(MeshKind::ImTime(m.with_statistic(s))),
            MeshKind::Legendre(m) => Some(MeshKind::Legendre(m.with_statistic(s))),
            _ => None,
        }
    }

    pub fn size(&self) -> usize {
        dispatch!(self, m => m.size())
    }

    pub fn index_to_linear(&self, index: impl Into<MeshIndex>) -> Result<usize, MeshError> {
        let index = index.into();
        let tag = self.tag();
        let size = self.size();
        match self {
            MeshKind::ImFreq(m) => m.index_to_linear(scalar_index(tag, index, size)?),
            MeshKind::ImTime(m) => m.index_to_linear(scalar_index(tag, index, size)?),
            MeshKind::Legendre(m) => m.index_to_linear(scalar_index(tag, index, size)?),
            MeshKind::ReFreq(m) => m.index_to_linear(scalar_index(tag, index, size)?),
            MeshKind::ReTime(m) => m.index_to_linear(scalar_index(tag, index, size)?),
            MeshKind::BrillouinZone(m) => m.index_to_linear(lattice_index(tag, index, size)?),
            MeshKind::CyclicLattice(m) => m.index_to_linear(lattice_index(tag, index, size)?),
        }
    }

    pub fn linear_to_index(&self, linear: usize) -> Result<MeshIndex, MeshError> {
        dispatch!(self, m => m.linear_to_index(linear).map(MeshIndex::from))
    }

    /// The point at position `linear`.
    pub fn point(&self, linear: usize) -> Result<MeshPoint, MeshError> {
        Ok(MeshPoint {
            linear,
            index: self.linear_to_index(linear)?,
            value: dispatch!(self, m => m.value(linear))?,
        })
    }

    /// Lazily iterate the points in linear order. Every call starts afresh.
    ///
    /// The mesh must satisfy its invariants, which holds for every mesh
    /// built through a constructor. On a mesh that does not (an unchecked
    /// deserialized value), iteration stops at the first point that cannot
    /// be computed.
    pub fn points(&self) -> MeshPoints<'_> {
        MeshPoints {
            mesh: self,
            range: 0..self.size(),
        }
    }

    /// All point values, in linear order.
    pub fn values(&self) -> Vec<MeshValue> {
        self.points().map(|p| p.value).collect()
    }

    /// Persistent archive tag of this kind.
    pub fn h5_name(&self) -> &'static str {
        self.tag().h5_name()
    }
}

impl fmt::Display for MeshKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, m => fmt::Display::fmt(m, f))
    }
}

impl DebugInvariants for MeshKind {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "MeshKind");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        dispatch!(self, m => m.validate())
    }
}

macro_rules! impl_from_mesh {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(impl From<$ty> for MeshKind {
            fn from(m: $ty) -> Self {
                MeshKind::$variant(m)
            }
        })*
    };
}

impl_from_mesh!(
    ImFreq(ImFreqMesh),
    ImTime(ImTimeMesh),
    Legendre(LegendreMesh),
    ReFreq(ReFreqMesh),
    ReTime(ReTimeMesh),
    BrillouinZone(BrillouinZoneMesh),
    CyclicLattice(CyclicLatticeMesh),
);

/// Iterator over the points of a [`MeshKind`], see [`MeshKind::points`].
#[derive(Clone, Debug)]
pub struct MeshPoints<'a> {
    mesh: &'a MeshKind,
    range: Range<usize>,
}

impl Iterator for MeshPoints<'_> {
    type Item = MeshPoint;

    fn next(&mut self) -> Option<MeshPoint> {
        let linear = self.range.next()?;
        match self.mesh.point(linear) {
            Ok(p) => Some(p),
            Err(e) => {
                crate::debug_invariants!(self.mesh.validate_invariants(), "MeshPoints::next");
                log::error!("{}: no point at {linear}: {e}", self.mesh.tag().name());
                self.range = 0..0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for MeshPoints<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn imtime(s: Statistic) -> MeshKind {
        ImTimeMesh::new(1.0, s, 5).unwrap().into()
    }

    #[test]
    fn equality_includes_statistic() {
        assert_eq!(imtime(Statistic::Fermion), imtime(Statistic::Fermion));
        assert_ne!(imtime(Statistic::Fermion), imtime(Statistic::Boson));
        let other_beta: MeshKind = ImTimeMesh::new(2.0, Statistic::Fermion, 5).unwrap().into();
        assert_ne!(imtime(Statistic::Fermion), other_beta);
    }

    #[test]
    fn with_statistic_only_on_imaginary_kinds() {
        let m = imtime(Statistic::Fermion);
        assert_eq!(m.with_statistic(Statistic::Boson), Some(imtime(Statistic::Boson)));
        let w: MeshKind = ReFreqMesh::new(-1.0, 1.0, 3).unwrap().into();
        assert_eq!(w.statistic(), None);
        assert_eq!(w.with_statistic(Statistic::Boson), None);
    }

    #[test]
    fn points_are_restartable_and_exact() {
        let m = imtime(Statistic::Boson);
        let first: Vec<_> = m.points().collect();
        let second: Vec<_> = m.points().collect();
        assert_eq!(first.len(), m.size());
        assert_eq!(m.points().len(), m.size());
        assert_eq!(first, second);
        for (i, p) in first.iter().enumerate() {
            assert_eq!(p.linear, i);
            assert_eq!(m.index_to_linear(p.index).unwrap(), i);
        }
    }

    #[test]
    fn wrong_index_shape_is_out_of_range() {
        let m = imtime(Statistic::Boson);
        let err = m.index_to_linear([0i64, 0, 0]).unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { .. }));
    }

    #[test]
    fn tag_names() {
        assert_eq!(MeshTag::ImFreq.name(), "MeshImFreq");
        assert_eq!(MeshTag::CyclicLattice.h5_name(), "CyclicLattice");
        assert!(MeshTag::Legendre.has_statistic());
        assert!(!MeshTag::BrillouinZone.has_statistic());
    }
}
