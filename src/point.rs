//! Point types for scanned shell surfaces.
//!
//! A scan sample starts life as a [`ColoredPoint`] (position plus the optional
//! color the scanner recorded) and becomes a [`DeformationPoint`] once it is
//! handed to the deformation calculator. All of them expose their position
//! through the [`ScanPoint`] trait so that collections, filters, and fitters
//! work over any of them.

use crate::error::{FitError, FitResult};

/// A 3-D sample with finite double-precision coordinates.
///
/// Coordinates are validated on construction and cannot be changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3D {
    position: nalgebra::Point3<f64>,
}

impl Point3D {
    /// Create a point, rejecting NaN and infinite coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> FitResult<Self> {
        for (axis, value) in [("x", x), ("y", y), ("z", z)] {
            if !value.is_finite() {
                return Err(FitError::invalid_coordinate(format!("{axis} = {value}")));
            }
        }
        Ok(Self {
            position: nalgebra::Point3::new(x, y, z),
        })
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> f64 {
        self.position.z
    }

    /// The underlying nalgebra point.
    pub fn position(&self) -> &nalgebra::Point3<f64> {
        &self.position
    }

    /// Distance in the XY plane to the vertical axis through `(x0, y0)`.
    pub fn planar_distance(&self, x0: f64, y0: f64) -> f64 {
        (self.position.x - x0).hypot(self.position.y - y0)
    }
}

impl TryFrom<[f64; 3]> for Point3D {
    type Error = FitError;

    fn try_from(xyz: [f64; 3]) -> FitResult<Self> {
        Self::new(xyz[0], xyz[1], xyz[2])
    }
}

/// 8-bit RGB color recorded by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Anything that can live in a [`PointCollection`](crate::PointCollection).
pub trait ScanPoint: Clone {
    /// Position of the sample.
    fn point(&self) -> &Point3D;

    /// Scanner color, if one was recorded.
    fn color(&self) -> Option<Rgb> {
        None
    }
}

impl ScanPoint for Point3D {
    fn point(&self) -> &Point3D {
        self
    }
}

/// A scan sample with optional color provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredPoint {
    pub point: Point3D,
    pub color: Option<Rgb>,
}

impl ColoredPoint {
    pub fn new(point: Point3D, color: Option<Rgb>) -> Self {
        Self { point, color }
    }

    /// Validate coordinates and build an uncolored sample.
    pub fn from_coords(x: f64, y: f64, z: f64) -> FitResult<Self> {
        Ok(Self::new(Point3D::new(x, y, z)?, None))
    }
}

impl From<Point3D> for ColoredPoint {
    fn from(point: Point3D) -> Self {
        Self::new(point, None)
    }
}

impl ScanPoint for ColoredPoint {
    fn point(&self) -> &Point3D {
        &self.point
    }

    fn color(&self) -> Option<Rgb> {
        self.color
    }
}

/// A scan sample annotated with its radial deformation.
///
/// The deformation is `None` until a
/// [`DeformationCalculator`](crate::DeformationCalculator) pass has set it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformationPoint {
    pub sample: ColoredPoint,
    deformation: Option<f64>,
}

impl DeformationPoint {
    /// Wrap any scan point; the deformation starts unset.
    pub fn from_scan_point<P: ScanPoint>(point: &P) -> Self {
        Self {
            sample: ColoredPoint::new(*point.point(), point.color()),
            deformation: None,
        }
    }

    /// Signed radial offset from the fitted surface (positive = outward).
    pub fn deformation(&self) -> Option<f64> {
        self.deformation
    }

    pub(crate) fn set_deformation(&mut self, deformation: f64) {
        self.deformation = Some(deformation);
    }

    pub(crate) fn with_deformation(sample: ColoredPoint, deformation: f64) -> Self {
        Self {
            sample,
            deformation: Some(deformation),
        }
    }
}

impl ScanPoint for DeformationPoint {
    fn point(&self) -> &Point3D {
        &self.sample.point
    }

    fn color(&self) -> Option<Rgb> {
        self.sample.color
    }
}
