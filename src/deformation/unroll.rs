//! Develop a deformation scan onto the plane of the cylinder surface.
//!
//! Each annotated point maps to
//!
//! ```text
//! x' = z
//! y' = r · θ,   θ = atan2(y − y0, x − x0) ∈ [0, 2π)
//! z' = deformation
//! ```
//!
//! so the result is a height × arc-length map of the shell with deformation
//! as the third coordinate, ready for gridding or contouring.

use std::f64::consts::TAU;

use crate::collection::PointCollection;
use crate::error::{FitError, FitResult};
use crate::fit::Cylinder;
use crate::point::{ColoredPoint, DeformationPoint, Point3D, ScanPoint};

use super::DeformationScan;

/// Azimuth of `point` around the cylinder axis, in `[0, 2π)`.
pub fn azimuth(cylinder: &Cylinder, point: &Point3D) -> f64 {
    let theta = (point.y() - cylinder.y0()).atan2(point.x() - cylinder.x0());
    if theta < 0.0 {
        // theta + TAU can round to exactly TAU; fold it back to 0
        (theta + TAU) % TAU
    } else {
        theta
    }
}

/// Unroll a deformation scan into a collection named `<name>_unrolled`.
///
/// Colors and deformation values carry over unchanged.
pub fn unroll(
    scan: &DeformationScan,
    cylinder: &Cylinder,
) -> FitResult<PointCollection<DeformationPoint>> {
    cylinder.ensure_valid_radius()?;
    if scan.points().is_empty() {
        return Err(FitError::EmptyInput);
    }

    let mut out = PointCollection::new(format!("{}_unrolled", scan.points().name()));
    for (index, p) in scan.points().iter().enumerate() {
        let deformation = p
            .deformation()
            .ok_or(FitError::MissingDeformation { index })?;
        let theta = azimuth(cylinder, p.point());
        let flat = Point3D::new(p.point().z(), cylinder.r() * theta, deformation)?;
        out.push(DeformationPoint::with_deformation(
            ColoredPoint::new(flat, p.color()),
            deformation,
        ));
    }
    Ok(out)
}
