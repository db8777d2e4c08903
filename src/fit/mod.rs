//! Circle and cylinder fitting.
//!
//! The cylinder model is a vertical cylinder: a circle in the XY plane
//! extruded between `z_min` and `z_max`. Fitting proceeds in three layers:
//!
//! - [`fit_circle`] — Gauss–Newton least squares on the planar projection
//!   of the points, minimizing `Σ (|p − c| − r)²`.
//! - [`fit_cylinder`] — runs the circle fit and takes the vertical extent
//!   from the collection's bounds.
//! - [`refine_cylinder`] — alternates cylinder fits with proximity filtering
//!   on a tightening tolerance schedule to reject outliers.

pub mod circle;
pub mod cylinder;
pub mod refine;

pub use circle::{fit_circle, CircleFit};
pub use cylinder::{fit_cylinder, initial_guess, CylinderFit};
pub use refine::{refine_cylinder, RefineConfig, RefineReport, RefineStage, RoundSummary};

use std::fmt;

use crate::error::{FitError, FitResult};
use crate::Vector3;

/// A circle in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x0: f64,
    pub y0: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(x0: f64, y0: f64, r: f64) -> Self {
        Self { x0, y0, r }
    }

    /// Return the circle shifted by a `(Δx0, Δy0, Δr)` correction.
    pub fn corrected(&self, delta: &Vector3) -> Self {
        Self {
            x0: self.x0 + delta.x,
            y0: self.y0 + delta.y,
            r: self.r + delta.z,
        }
    }
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Circle (center=({:.4}, {:.4}), R={:.4})",
            self.x0, self.y0, self.r
        )
    }
}

/// A vertical cylinder: a [`Circle`] extruded over `[z_min, z_max]`.
///
/// The center and radius are read through from the owned circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    circle: Circle,
    z_min: f64,
    z_max: f64,
}

impl Cylinder {
    pub fn new(circle: Circle, z_min: f64, z_max: f64) -> Self {
        Self {
            circle,
            z_min,
            z_max,
        }
    }

    pub fn circle(&self) -> &Circle {
        &self.circle
    }

    pub fn x0(&self) -> f64 {
        self.circle.x0
    }

    pub fn y0(&self) -> f64 {
        self.circle.y0
    }

    pub fn r(&self) -> f64 {
        self.circle.r
    }

    pub fn z_min(&self) -> f64 {
        self.z_min
    }

    pub fn z_max(&self) -> f64 {
        self.z_max
    }

    pub fn height(&self) -> f64 {
        self.z_max - self.z_min
    }

    /// Fail with `DegenerateGeometry` unless the radius is positive and finite.
    pub(crate) fn ensure_valid_radius(&self) -> FitResult<()> {
        if self.circle.r.is_finite() && self.circle.r > 0.0 {
            Ok(())
        } else {
            Err(FitError::degenerate(format!(
                "cylinder radius must be positive, got {}",
                self.circle.r
            )))
        }
    }
}

impl fmt::Display for Cylinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cylinder (circle={}, z_min={:.4}, z_max={:.4})",
            self.circle, self.z_min, self.z_max
        )
    }
}

/// Configuration for the Gauss–Newton circle solver.
#[derive(Debug, Clone)]
pub struct CircleFitConfig {
    /// Maximum solver iterations. Default 50.
    pub max_iterations: u32,
    /// Stop once the largest correction component falls below this. Default 1e-4.
    pub tolerance: f64,
}

impl Default for CircleFitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tolerance: 1e-4,
        }
    }
}

impl CircleFitConfig {
    pub(crate) fn validate(&self) -> FitResult<()> {
        if self.max_iterations == 0 {
            return Err(FitError::invalid_parameter("max_iterations must be >= 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(FitError::invalid_parameter(format!(
                "solver tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
