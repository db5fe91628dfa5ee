//! Tensor-product meshes and the domain a Green's function lives on.

use std::fmt;
use std::ops::Index;

use itertools::Itertools;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::meshes::{MeshIndex, MeshKind, MeshPoint};
use crate::statistic::Statistic;

/// Ordered product of at least two meshes. Axis order is significant and
/// the number of axes is fixed at construction.
///
/// Deserialization goes through [`MeshProduct::new`], so a loaded product is
/// checked like a constructed one.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ProductAxes")]
pub struct MeshProduct {
    axes: Box<[MeshKind]>,
}

#[derive(serde::Deserialize)]
struct ProductAxes {
    axes: Vec<MeshKind>,
}

impl TryFrom<ProductAxes> for MeshProduct {
    type Error = MeshError;

    fn try_from(raw: ProductAxes) -> Result<Self, MeshError> {
        MeshProduct::new(raw.axes)
    }
}

impl MeshProduct {
    pub fn new<I>(axes: I) -> Result<Self, MeshError>
    where
        I: IntoIterator<Item = MeshKind>,
    {
        let product = Self {
            axes: axes.into_iter().collect(),
        };
        product.validate_invariants()?;
        log::trace!("{product}");
        Ok(product)
    }

    /// Build a product whose axes are already known to be valid.
    pub(crate) fn from_axes(axes: Vec<MeshKind>) -> Self {
        Self {
            axes: axes.into_boxed_slice(),
        }
    }

    /// Number of axes.
    pub fn arity(&self) -> usize {
        self.axes.len()
    }

    pub fn axes(&self) -> &[MeshKind] {
        &self.axes
    }

    pub fn axis(&self, i: usize) -> Option<&MeshKind> {
        self.axes.get(i)
    }

    /// Per-axis statistics, `None` on axes without one.
    pub fn statistics(&self) -> Vec<Option<Statistic>> {
        self.axes.iter().map(MeshKind::statistic).collect()
    }

    /// Product of the axis sizes.
    pub fn size(&self) -> usize {
        self.axes.iter().map(MeshKind::size).product()
    }

    /// Row-major linear index (last axis fastest) of one index per axis.
    pub fn index_to_linear(&self, index: &[MeshIndex]) -> Result<usize, MeshError> {
        if index.len() != self.arity() {
            return Err(MeshError::out_of_range(
                "MeshProduct",
                format!("{} components for {} axes", index.len(), self.arity()),
                self.size(),
            ));
        }
        self.axes
            .iter()
            .zip(index)
            .try_fold(0usize, |acc, (m, &i)| -> Result<usize, MeshError> {
                Ok(acc * m.size() + m.index_to_linear(i)?)
            })
    }

    /// Inverse of [`MeshProduct::index_to_linear`].
    pub fn linear_to_index(&self, linear: usize) -> Result<Vec<MeshIndex>, MeshError> {
        if linear >= self.size() {
            return Err(MeshError::out_of_range("MeshProduct", linear, self.size()));
        }
        let mut rest = linear;
        let mut out = Vec::with_capacity(self.arity());
        for m in self.axes.iter().rev() {
            out.push(m.linear_to_index(rest % m.size())?);
            rest /= m.size();
        }
        out.reverse();
        Ok(out)
    }

    /// Lazily iterate the cartesian product of the axis points in linear
    /// order. Every call starts afresh.
    pub fn points(&self) -> impl Iterator<Item = ProductPoint> + '_ {
        self.axes
            .iter()
            .map(MeshKind::points)
            .multi_cartesian_product()
            .enumerate()
            .map(|(linear, points)| ProductPoint { linear, points })
    }
}

impl Index<usize> for MeshProduct {
    type Output = MeshKind;

    fn index(&self, i: usize) -> &MeshKind {
        &self.axes[i]
    }
}

impl fmt::Display for MeshProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mesh Product of {} axes: ", self.arity())?;
        for (i, m) in self.axes.iter().enumerate() {
            if i > 0 {
                f.write_str(" x ")?;
            }
            write!(f, "{}", m.tag())?;
        }
        Ok(())
    }
}

impl DebugInvariants for MeshProduct {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "MeshProduct");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        if self.axes.len() < 2 {
            return Err(MeshError::invalid(
                "MeshProduct",
                format!("a product needs at least two meshes, got {}", self.axes.len()),
            ));
        }
        self.axes.iter().try_for_each(MeshKind::validate_invariants)?;
        crate::meshes::checked_size("MeshProduct", self.axes.iter().map(MeshKind::size)).map(|_| ())
    }
}

/// A point of a [`MeshProduct`]: one point per axis.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductPoint {
    pub linear: usize,
    pub points: Vec<MeshPoint>,
}

/// The domain of a Green's function: one mesh, or a product of meshes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum MeshDomain {
    Single(MeshKind),
    Product(MeshProduct),
}

impl MeshDomain {
    /// Number of axes (1 for a single mesh).
    pub fn arity(&self) -> usize {
        self.axes().len()
    }

    /// The axes, in order.
    pub fn axes(&self) -> &[MeshKind] {
        match self {
            MeshDomain::Single(m) => std::slice::from_ref(m),
            MeshDomain::Product(p) => p.axes(),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            MeshDomain::Single(m) => m.size(),
            MeshDomain::Product(p) => p.size(),
        }
    }

    /// Statistic of a single mesh; `None` for products and statistic-free kinds.
    pub fn statistic(&self) -> Option<Statistic> {
        match self {
            MeshDomain::Single(m) => m.statistic(),
            MeshDomain::Product(_) => None,
        }
    }

    pub fn statistics(&self) -> Vec<Option<Statistic>> {
        self.axes().iter().map(MeshKind::statistic).collect()
    }

    pub fn is_product(&self) -> bool {
        matches!(self, MeshDomain::Product(_))
    }

    /// Rebuild a domain of the same shape as `self` from new axes.
    pub(crate) fn same_shape(&self, mut axes: Vec<MeshKind>) -> MeshDomain {
        match self {
            MeshDomain::Single(_) if axes.len() == 1 => MeshDomain::Single(axes.remove(0)),
            _ => MeshDomain::Product(MeshProduct::from_axes(axes)),
        }
    }
}

impl Index<usize> for MeshDomain {
    type Output = MeshKind;

    fn index(&self, i: usize) -> &MeshKind {
        &self.axes()[i]
    }
}

impl From<MeshKind> for MeshDomain {
    fn from(m: MeshKind) -> Self {
        MeshDomain::Single(m)
    }
}

impl From<MeshProduct> for MeshDomain {
    fn from(p: MeshProduct) -> Self {
        MeshDomain::Product(p)
    }
}

impl fmt::Display for MeshDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshDomain::Single(m) => fmt::Display::fmt(m, f),
            MeshDomain::Product(p) => fmt::Display::fmt(p, f),
        }
    }
}

impl DebugInvariants for MeshDomain {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "MeshDomain");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        match self {
            MeshDomain::Single(m) => m.validate_invariants(),
            MeshDomain::Product(p) => p.validate_invariants(),
        }
    }
}
