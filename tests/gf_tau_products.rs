use gf_meshes::prelude::*;

fn mtf() -> MeshKind {
    ImTimeMesh::new(1.0, Statistic::Fermion, 100).unwrap().into()
}

fn mtb() -> MeshKind {
    ImTimeMesh::new(1.0, Statistic::Boson, 100).unwrap().into()
}

fn mk() -> MeshKind {
    let bl = BravaisLattice::new(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).unwrap();
    BrillouinZoneMesh::new(BrillouinZone::new(bl), 20).unwrap().into()
}

fn gf(mesh: impl Into<MeshDomain>) -> GfDescriptor {
    GfDescriptor::new(mesh, [1, 1])
}

fn product(a: MeshKind, b: MeshKind) -> MeshProduct {
    MeshProduct::new([a, b]).unwrap()
}

#[test]
fn fermion_plus_boson_is_rejected() {
    let f = gf(mtf());
    let b = gf(mtb());
    let err = (&f + &b).unwrap_err();
    assert!(matches!(
        err,
        MeshError::IncompatibleMesh {
            op: AlgebraOp::Add,
            reason: Incompatibility::StatisticMismatch { .. }
        }
    ));
}

#[test]
fn fermion_times_assign_boson_is_rejected() {
    let mut f = gf(mtf());
    let before = f.clone();
    let b = gf(mtb());
    let err = f.try_mul_assign(&b).unwrap_err();
    assert!(matches!(
        err,
        MeshError::IncompatibleMesh {
            op: AlgebraOp::MulAssign,
            reason: Incompatibility::StatisticMismatch { .. }
        }
    ));
    assert_eq!(f, before);
}

#[test]
fn in_place_product_cannot_flip_statistic() {
    let mut f = gf(mtf());
    let other = gf(mtf());
    let err = f.try_mul_assign(&other).unwrap_err();
    assert!(matches!(
        err.incompatibility(),
        Some(Incompatibility::InPlaceStatistic {
            current: Statistic::Fermion,
            result: Statistic::Boson,
            ..
        })
    ));
    // the non-mutating product is fine
    assert_eq!((&f * &other).unwrap().statistic(), Some(Statistic::Boson));

    let mut b = gf(mtb());
    assert!(b.try_mul_assign(&f).unwrap_err().is_incompatible());
}

#[test]
fn g_tau_products() {
    let f = gf(mtf());
    let b = gf(mtb());
    assert_eq!((&f * &f).unwrap().mesh().statistic(), Some(Statistic::Boson));
    assert_eq!((&f * &b).unwrap().mesh().statistic(), Some(Statistic::Fermion));
    assert_eq!((&b * &f).unwrap().mesh().statistic(), Some(Statistic::Fermion));
    assert_eq!((&b * &b).unwrap().mesh().statistic(), Some(Statistic::Boson));
}

#[test]
fn g_tau1_tau2_products() {
    let ff = gf(product(mtf(), mtf()));
    let fb = gf(product(mtf(), mtb()));

    let p = (&ff * &ff).unwrap();
    assert_eq!(p.mesh()[0].statistic(), Some(Statistic::Boson));
    assert_eq!(p.mesh()[1].statistic(), Some(Statistic::Boson));

    let p = (&ff * &fb).unwrap();
    assert_eq!(p.mesh()[0].statistic(), Some(Statistic::Boson));
    assert_eq!(p.mesh()[1].statistic(), Some(Statistic::Fermion));

    let p = (&fb * &ff).unwrap();
    assert_eq!(p.mesh()[0].statistic(), Some(Statistic::Boson));
    assert_eq!(p.mesh()[1].statistic(), Some(Statistic::Fermion));

    let p = (&fb * &fb).unwrap();
    assert_eq!(p.mesh()[0].statistic(), Some(Statistic::Boson));
    assert_eq!(p.mesh()[1].statistic(), Some(Statistic::Boson));
}

#[test]
fn boson_fermion_pairs() {
    let bf = gf(product(mtb(), mtf()));
    let bb = gf(product(mtb(), mtb()));
    assert_eq!(
        (&bf * &bf).unwrap().mesh().statistics(),
        vec![Some(Statistic::Boson), Some(Statistic::Boson)]
    );
    assert_eq!(
        (&bf * &bb).unwrap().mesh().statistics(),
        vec![Some(Statistic::Boson), Some(Statistic::Fermion)]
    );
}

#[test]
fn g_k_tau_sums_and_products() {
    let f = gf(product(mk(), mtf()));
    let b = gf(product(mk(), mtb()));

    assert_eq!((&f + &f).unwrap().mesh()[1].statistic(), Some(Statistic::Fermion));
    assert_eq!((&b + &b).unwrap().mesh()[1].statistic(), Some(Statistic::Boson));
    assert!((&f + &b).is_err());

    for (l, r, expected) in [
        (&f, &f, Statistic::Boson),
        (&f, &b, Statistic::Fermion),
        (&b, &f, Statistic::Fermion),
        (&b, &b, Statistic::Boson),
    ] {
        let p = (l * r).unwrap();
        assert_eq!(p.mesh()[0], mk());
        assert_eq!(p.mesh()[0].statistic(), None);
        assert_eq!(p.mesh()[1].statistic(), Some(expected));
    }
}

#[test]
fn axis_order_is_significant() {
    let kt = gf(product(mk(), mtf()));
    let tk = gf(product(mtf(), mk()));
    let err = (&kt * &tk).unwrap_err();
    assert!(matches!(
        err.incompatibility(),
        Some(Incompatibility::KindMismatch { axis: 0, .. })
    ));
}

#[test]
fn g_k_tau_in_place() {
    let mut b = gf(product(mk(), mtb()));
    let before = b.clone();
    b.try_add_assign(&before).unwrap();
    b.try_mul_assign(&before).unwrap();
    assert_eq!(b, before);
    assert!(b.shares_mesh_with(&before));

    // axis 0 matches, axis 1 does not: the receiver stays as it was
    let mut f = gf(product(mk(), mtf()));
    let kept = f.clone();
    for err in [f.try_add_assign(&b).unwrap_err(), f.try_mul_assign(&b).unwrap_err()] {
        assert!(matches!(
            err.incompatibility(),
            Some(Incompatibility::StatisticMismatch { axis: 1, .. })
        ));
    }
    assert!(matches!(
        f.try_mul_assign(&kept).unwrap_err().incompatibility(),
        Some(Incompatibility::InPlaceStatistic { axis: 1, .. })
    ));
    assert_eq!(f, kept);
    assert!(f.shares_mesh_with(&kept));
}
