//! Outlier filters for point collections.
//!
//! Filters are a closed set of policies dispatched through
//! [`ScanFilter::accepts`]. Apply them with
//! [`PointCollection::filter_in_place`](crate::PointCollection::filter_in_place)
//! or [`PointCollection::filtered`](crate::PointCollection::filtered).
//!
//! # Policies
//!
//! - [`ScanFilter::Decimate`] — keep every Nth point
//! - [`ScanFilter::ZBand`] — keep points strictly between two heights
//! - [`ScanFilter::CylinderProximity`] — keep points near a fitted cylinder

use crate::error::{FitError, FitResult};
use crate::fit::Cylinder;
use crate::point::Point3D;

/// How the cylinder-proximity filter treats points inside the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityMode {
    /// Keep points with `|dr| < tolerance`.
    Symmetric,
    /// Keep points with `dr < tolerance`; inward points are never dropped.
    OutsideOnly,
}

/// Keep every `stride`-th point seen by this filter.
#[derive(Debug, Clone)]
pub struct Decimation {
    stride: usize,
    counter: usize,
}

impl Decimation {
    fn accepts(&mut self, _point: &Point3D) -> bool {
        let keep = self.counter % self.stride == 0;
        self.counter += 1;
        keep
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of points seen so far, across all passes.
    pub fn seen(&self) -> usize {
        self.counter
    }
}

/// Keep points with `z_min < z < z_max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZBand {
    pub z_min: f64,
    pub z_max: f64,
}

impl ZBand {
    fn accepts(&self, point: &Point3D) -> bool {
        self.z_min < point.z() && point.z() < self.z_max
    }
}

/// Keep points whose planar distance to a cylinder surface is within tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderProximity {
    cylinder: Cylinder,
    tolerance: f64,
    mode: ProximityMode,
}

impl CylinderProximity {
    /// Signed radial offset of `point` from the cylinder surface.
    pub fn radial_offset(&self, point: &Point3D) -> f64 {
        point.planar_distance(self.cylinder.x0(), self.cylinder.y0()) - self.cylinder.r()
    }

    fn accepts(&self, point: &Point3D) -> bool {
        let dr = self.radial_offset(point);
        match self.mode {
            ProximityMode::Symmetric => dr.abs() < self.tolerance,
            ProximityMode::OutsideOnly => dr < self.tolerance,
        }
    }

    pub fn cylinder(&self) -> &Cylinder {
        &self.cylinder
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn mode(&self) -> ProximityMode {
        self.mode
    }
}

/// A point filter policy.
#[derive(Debug, Clone)]
pub enum ScanFilter {
    Decimate(Decimation),
    ZBand(ZBand),
    CylinderProximity(CylinderProximity),
}

impl ScanFilter {
    /// Keep every `stride`-th point. `stride == 1` keeps everything.
    pub fn decimate(stride: usize) -> FitResult<Self> {
        if stride == 0 {
            return Err(FitError::invalid_parameter("decimation stride must be >= 1"));
        }
        Ok(Self::Decimate(Decimation { stride, counter: 0 }))
    }

    /// Keep points strictly between `z_min` and `z_max`.
    pub fn z_band(z_min: f64, z_max: f64) -> Self {
        Self::ZBand(ZBand { z_min, z_max })
    }

    /// Keep points within `tolerance` of the lateral surface of `cylinder`.
    pub fn cylinder_proximity(cylinder: Cylinder, tolerance: f64, mode: ProximityMode) -> Self {
        Self::CylinderProximity(CylinderProximity {
            cylinder,
            tolerance,
            mode,
        })
    }

    /// Whether `point` survives this filter.
    ///
    /// Decimation is stateful: each call advances its counter.
    pub fn accepts(&mut self, point: &Point3D) -> bool {
        match self {
            Self::Decimate(d) => d.accepts(point),
            Self::ZBand(z) => z.accepts(point),
            Self::CylinderProximity(c) => c.accepts(point),
        }
    }

    /// Short description for log messages.
    pub fn label(&self) -> String {
        match self {
            Self::Decimate(d) => format!("decimate(1/{})", d.stride),
            Self::ZBand(z) => format!("z-band({}, {})", z.z_min, z.z_max),
            Self::CylinderProximity(c) => {
                format!("cylinder-proximity({:?}, tol={})", c.mode, c.tolerance)
            }
        }
    }
}
