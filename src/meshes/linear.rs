//! Uniform grids on a real interval, and the real-axis meshes built on them.

use std::fmt;

use super::{Mesh, MeshTag, MeshValue};
use crate::mesh_error::MeshError;

/// `n` equally spaced points from `x_min` to `x_max`, both included.
///
/// A single-point grid sits at `x_min`.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinearGrid {
    x_min: f64,
    x_max: f64,
    n: usize,
}

impl LinearGrid {
    pub(crate) fn new(tag: MeshTag, x_min: f64, x_max: f64, n: usize) -> Result<Self, MeshError> {
        let grid = Self { x_min, x_max, n };
        grid.validate(tag)?;
        Ok(grid)
    }

    /// Grid without parameter checks, for callers that validated already.
    pub(crate) fn spanning(x_min: f64, x_max: f64, n: usize) -> Self {
        Self { x_min, x_max, n }
    }

    pub(crate) fn validate(&self, tag: MeshTag) -> Result<(), MeshError> {
        if !(self.x_min.is_finite() && self.x_max.is_finite()) {
            return Err(MeshError::invalid(tag.name(), "bounds must be finite"));
        }
        if self.x_min >= self.x_max {
            return Err(MeshError::invalid(
                tag.name(),
                format!("bounds must satisfy min < max, got [{}, {}]", self.x_min, self.x_max),
            ));
        }
        super::check_count(tag, "number of points", self.n)
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Spacing between consecutive points (`0` for a single point).
    pub fn delta(&self) -> f64 {
        if self.n > 1 {
            (self.x_max - self.x_min) / (self.n - 1) as f64
        } else {
            0.0
        }
    }

    /// Coordinate of point `i`; the last point is exactly `x_max`.
    pub fn point(&self, i: usize) -> f64 {
        if self.n > 1 && i + 1 == self.n {
            self.x_max
        } else {
            self.x_min + i as f64 * self.delta()
        }
    }

    pub(crate) fn index_to_linear(&self, tag: MeshTag, i: i64) -> Result<usize, MeshError> {
        match usize::try_from(i) {
            Ok(u) if u < self.n => Ok(u),
            _ => Err(MeshError::out_of_range(tag.name(), i, self.n)),
        }
    }

    /// Index of the grid point closest to `x`, clamped to the grid.
    pub fn closest(&self, x: f64) -> usize {
        if self.n == 1 || x <= self.x_min {
            return 0;
        }
        let i = ((x - self.x_min) / self.delta()).round();
        (i as usize).min(self.n - 1)
    }
}

macro_rules! real_axis_mesh {
    ($(#[$doc:meta])* $name:ident, $tag:ident, $min:ident, $max:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            grid: LinearGrid,
        }

        impl $name {
            pub fn new($min: f64, $max: f64, n: usize) -> Result<Self, MeshError> {
                let mesh = Self {
                    grid: LinearGrid::new(MeshTag::$tag, $min, $max, n)?,
                };
                log::trace!("{mesh}");
                Ok(mesh)
            }

            pub fn $min(&self) -> f64 {
                self.grid.x_min()
            }

            pub fn $max(&self) -> f64 {
                self.grid.x_max()
            }

            pub fn grid(&self) -> &LinearGrid {
                &self.grid
            }
        }

        impl Mesh for $name {
            type Index = i64;
            const TAG: MeshTag = MeshTag::$tag;

            fn size(&self) -> usize {
                self.grid.len()
            }

            fn index_to_linear(&self, i: i64) -> Result<usize, MeshError> {
                self.grid.index_to_linear(Self::TAG, i)
            }

            fn linear_to_index(&self, linear: usize) -> Result<i64, MeshError> {
                self.check_linear(linear)?;
                Ok(linear as i64)
            }

            fn value(&self, linear: usize) -> Result<MeshValue, MeshError> {
                self.check_linear(linear)?;
                Ok(MeshValue::Real(self.grid.point(linear)))
            }

            fn validate(&self) -> Result<(), MeshError> {
                self.grid.validate(Self::TAG)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    concat!($label, " Mesh of size {}, [{}, {}]"),
                    self.size(),
                    self.grid.x_min(),
                    self.grid.x_max()
                )
            }
        }
    };
}

real_axis_mesh!(
    /// Uniform real-frequency mesh on `[omega_min, omega_max]`.
    ReFreqMesh, ReFreq, omega_min, omega_max, "Real Freq"
);

real_axis_mesh!(
    /// Uniform real-time mesh on `[t_min, t_max]`.
    ReTimeMesh, ReTime, t_min, t_max, "Real Time"
);
