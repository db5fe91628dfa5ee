//! Mesh algebra: which Green's-function operations are legal, and on which
//! mesh the result lives.
//!
//! Rules are applied axis by axis, in order:
//! - `+` and `+=` need identical meshes on every axis.
//! - `*` needs the same kind and the same parameters up to the statistic;
//!   statistics compose with [`Statistic::compose`]. Axes without a
//!   statistic must be identical.
//! - `*=` needs identical meshes on every axis, as `+=` does, and the
//!   composed statistic must equal the receiver's. Only bosonic or
//!   statistic-free axes qualify.

use std::fmt;

use crate::mesh_error::{Incompatibility, MeshError};
use crate::meshes::MeshKind;
use crate::product::MeshDomain;
use crate::statistic::Statistic;

/// A binary Green's-function operation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AlgebraOp {
    Add,
    AddAssign,
    Mul,
    MulAssign,
}

impl AlgebraOp {
    /// `true` for `+=` and `*=`.
    pub fn is_in_place(self) -> bool {
        matches!(self, AlgebraOp::AddAssign | AlgebraOp::MulAssign)
    }

    /// `true` for `+` and `+=`.
    pub fn is_additive(self) -> bool {
        matches!(self, AlgebraOp::Add | AlgebraOp::AddAssign)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AlgebraOp::Add => "+",
            AlgebraOp::AddAssign => "+=",
            AlgebraOp::Mul => "*",
            AlgebraOp::MulAssign => "*=",
        }
    }
}

impl fmt::Display for AlgebraOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

fn incompatible(op: AlgebraOp, reason: Incompatibility) -> MeshError {
    log::debug!("rejecting `{op}`: {reason}");
    MeshError::IncompatibleMesh { op, reason }
}

fn check_kind(op: AlgebraOp, axis: usize, l: &MeshKind, r: &MeshKind) -> Result<(), MeshError> {
    if l.tag() != r.tag() {
        return Err(incompatible(
            op,
            Incompatibility::KindMismatch {
                axis,
                left: l.tag(),
                right: r.tag(),
            },
        ));
    }
    Ok(())
}

/// Mesh of axis `axis` of `l + r`.
pub fn add_axis(
    op: AlgebraOp,
    axis: usize,
    l: &MeshKind,
    r: &MeshKind,
) -> Result<MeshKind, MeshError> {
    check_kind(op, axis, l, r)?;
    if let (Some(left), Some(right)) = (l.statistic(), r.statistic()) {
        if left != right {
            return Err(incompatible(
                op,
                Incompatibility::StatisticMismatch { axis, left, right },
            ));
        }
    }
    if l != r {
        return Err(incompatible(
            op,
            Incompatibility::ParameterMismatch { axis, tag: l.tag() },
        ));
    }
    Ok(l.clone())
}

/// Mesh of axis `axis` of `l * r`.
pub fn mul_axis(
    op: AlgebraOp,
    axis: usize,
    l: &MeshKind,
    r: &MeshKind,
) -> Result<MeshKind, MeshError> {
    check_kind(op, axis, l, r)?;
    let mismatch = || incompatible(op, Incompatibility::ParameterMismatch { axis, tag: l.tag() });
    match (l.statistic(), r.statistic()) {
        (Some(left), Some(right)) => {
            // compare everything but the statistic
            if r.with_statistic(left).as_ref() != Some(l) {
                return Err(mismatch());
            }
            let result = Statistic::compose(left, right);
            l.with_statistic(result).ok_or_else(mismatch)
        }
        _ if l == r => Ok(l.clone()),
        _ => Err(mismatch()),
    }
}

/// Composed statistic of every axis of `l * r`, without building meshes.
pub fn product_statistics(
    l: &MeshDomain,
    r: &MeshDomain,
) -> Result<Vec<Option<Statistic>>, MeshError> {
    combine(AlgebraOp::Mul, l, r).map(|d| d.statistics())
}

/// Domain of the result of `l op r`.
///
/// For in-place operations the result is always equal to `l`; the call
/// fails rather than change the receiver's mesh.
pub fn combine(op: AlgebraOp, l: &MeshDomain, r: &MeshDomain) -> Result<MeshDomain, MeshError> {
    if l.arity() != r.arity() || l.is_product() != r.is_product() {
        return Err(incompatible(
            op,
            Incompatibility::ArityMismatch {
                left: l.arity(),
                right: r.arity(),
            },
        ));
    }
    let axes = l
        .axes()
        .iter()
        .zip(r.axes())
        .enumerate()
        .map(|(axis, (lm, rm))| combine_axis(op, axis, lm, rm))
        .collect::<Result<Vec<_>, _>>()?;
    let result = l.same_shape(axes);
    log::debug!("`{op}` on {} axes -> {:?}", result.arity(), result.statistics());
    Ok(result)
}

fn combine_axis(
    op: AlgebraOp,
    axis: usize,
    l: &MeshKind,
    r: &MeshKind,
) -> Result<MeshKind, MeshError> {
    match op {
        AlgebraOp::Add | AlgebraOp::AddAssign => add_axis(op, axis, l, r),
        AlgebraOp::Mul => mul_axis(op, axis, l, r),
        AlgebraOp::MulAssign => {
            add_axis(op, axis, l, r)?;
            let result = mul_axis(op, axis, l, r)?;
            match (l.statistic(), result.statistic()) {
                (Some(current), Some(result)) if current != result => Err(incompatible(
                    op,
                    Incompatibility::InPlaceStatistic {
                        axis,
                        current,
                        result,
                    },
                )),
                _ => Ok(result),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{BravaisLattice, BrillouinZone};
    use crate::meshes::{BrillouinZoneMesh, ImFreqMesh, ImTimeMesh, LegendreMesh};
    use crate::product::MeshProduct;
    use Statistic::*;

    fn tau(s: Statistic) -> MeshKind {
        ImTimeMesh::new(1.0, s, 100).unwrap().into()
    }

    fn k_mesh() -> MeshKind {
        let bz = BrillouinZone::new(BravaisLattice::cubic(2).unwrap());
        BrillouinZoneMesh::new(bz, 4).unwrap().into()
    }

    fn single(m: MeshKind) -> MeshDomain {
        MeshDomain::Single(m)
    }

    #[test]
    fn add_requires_equal_statistic() {
        let err = combine(AlgebraOp::Add, &single(tau(Fermion)), &single(tau(Boson))).unwrap_err();
        assert!(matches!(
            err.incompatibility(),
            Some(Incompatibility::StatisticMismatch { axis: 0, left: Fermion, right: Boson })
        ));
        let ok = combine(AlgebraOp::Add, &single(tau(Boson)), &single(tau(Boson))).unwrap();
        assert_eq!(ok, single(tau(Boson)));
    }

    #[test]
    fn mul_composes_statistics() {
        for a in Statistic::ALL {
            for b in Statistic::ALL {
                let d = combine(AlgebraOp::Mul, &single(tau(a)), &single(tau(b))).unwrap();
                assert_eq!(d, single(tau(Statistic::compose(a, b))));
            }
        }
    }

    #[test]
    fn mul_assign_keeps_receiver_statistic() {
        let err = combine(AlgebraOp::MulAssign, &single(tau(Fermion)), &single(tau(Fermion)))
            .unwrap_err();
        assert!(matches!(
            err.incompatibility(),
            Some(Incompatibility::InPlaceStatistic { current: Fermion, result: Boson, .. })
        ));
        let bb = combine(AlgebraOp::MulAssign, &single(tau(Boson)), &single(tau(Boson))).unwrap();
        assert_eq!(bb, single(tau(Boson)));
    }

    #[test]
    fn mul_assign_needs_identical_meshes() {
        for (l, r) in [(Fermion, Boson), (Boson, Fermion)] {
            let err = combine(AlgebraOp::MulAssign, &single(tau(l)), &single(tau(r))).unwrap_err();
            assert!(matches!(
                err.incompatibility(),
                Some(Incompatibility::StatisticMismatch { axis: 0, .. })
            ));
        }
        let k = single(k_mesh());
        assert_eq!(combine(AlgebraOp::MulAssign, &k, &k).unwrap(), k);
    }

    #[test]
    fn in_place_on_products_checks_every_axis() {
        let kb = MeshDomain::from(MeshProduct::new([k_mesh(), tau(Boson)]).unwrap());
        let kf = MeshDomain::from(MeshProduct::new([k_mesh(), tau(Fermion)]).unwrap());
        assert_eq!(combine(AlgebraOp::AddAssign, &kb, &kb).unwrap(), kb);
        assert_eq!(combine(AlgebraOp::MulAssign, &kb, &kb).unwrap(), kb);
        for op in [AlgebraOp::AddAssign, AlgebraOp::MulAssign] {
            let err = combine(op, &kf, &kb).unwrap_err();
            assert!(matches!(
                err.incompatibility(),
                Some(Incompatibility::StatisticMismatch { axis: 1, .. })
            ));
        }
        let err = combine(AlgebraOp::MulAssign, &kf, &kf).unwrap_err();
        assert!(matches!(
            err.incompatibility(),
            Some(Incompatibility::InPlaceStatistic { axis: 1, .. })
        ));
    }

    #[test]
    fn mul_needs_same_parameters() {
        let other: MeshKind = ImTimeMesh::new(2.0, Boson, 100).unwrap().into();
        let err = combine(AlgebraOp::Mul, &single(tau(Fermion)), &single(other)).unwrap_err();
        assert!(matches!(
            err.incompatibility(),
            Some(Incompatibility::ParameterMismatch { axis: 0, .. })
        ));
    }

    #[test]
    fn kinds_must_match() {
        let leg: MeshKind = LegendreMesh::new(1.0, Fermion, 10).unwrap().into();
        let err = combine(AlgebraOp::Mul, &single(tau(Fermion)), &single(leg)).unwrap_err();
        assert!(matches!(
            err.incompatibility(),
            Some(Incompatibility::KindMismatch { .. })
        ));
    }

    #[test]
    fn imfreq_product_rebuilds_frequency_range() {
        let f: MeshKind = ImFreqMesh::new(5.0, Fermion, 8).unwrap().into();
        let d = combine(AlgebraOp::Mul, &single(f.clone()), &single(f)).unwrap();
        let MeshKind::ImFreq(w) = &d[0] else {
            panic!("expected an imaginary-frequency mesh");
        };
        assert_eq!(w.first_index(), -7);
        assert_eq!(d.size(), 15);
    }

    #[test]
    fn spatial_axes_must_be_identical() {
        let bz = BrillouinZone::new(BravaisLattice::cubic(2).unwrap());
        let k5: MeshKind = BrillouinZoneMesh::new(bz, 5).unwrap().into();
        let l = MeshDomain::from(MeshProduct::new([k_mesh(), tau(Fermion)]).unwrap());
        let r = MeshDomain::from(MeshProduct::new([k5, tau(Fermion)]).unwrap());
        let err = combine(AlgebraOp::Mul, &l, &r).unwrap_err();
        assert!(matches!(
            err.incompatibility(),
            Some(Incompatibility::ParameterMismatch { axis: 0, .. })
        ));
        let same = combine(AlgebraOp::Mul, &l, &l).unwrap();
        assert_eq!(same.statistics(), vec![None, Some(Boson)]);
    }

    #[test]
    fn single_and_product_do_not_mix() {
        let p = MeshDomain::from(MeshProduct::new([tau(Boson), tau(Boson)]).unwrap());
        let err = combine(AlgebraOp::Add, &single(tau(Boson)), &p).unwrap_err();
        assert!(matches!(
            err.incompatibility(),
            Some(Incompatibility::ArityMismatch { left: 1, right: 2 })
        ));
    }

    #[test]
    fn product_statistics_per_axis() {
        let bf = MeshDomain::from(MeshProduct::new([tau(Boson), tau(Fermion)]).unwrap());
        let bb = MeshDomain::from(MeshProduct::new([tau(Boson), tau(Boson)]).unwrap());
        assert_eq!(
            product_statistics(&bf, &bf).unwrap(),
            vec![Some(Boson), Some(Boson)]
        );
        assert_eq!(
            product_statistics(&bf, &bb).unwrap(),
            vec![Some(Boson), Some(Fermion)]
        );
    }

    #[test]
    fn op_symbols() {
        assert_eq!(AlgebraOp::MulAssign.to_string(), "*=");
        assert!(AlgebraOp::AddAssign.is_in_place());
        assert!(AlgebraOp::AddAssign.is_additive());
        assert!(!AlgebraOp::Mul.is_additive());
    }
}
