//! Vertical cylinder estimation from a point collection.

use crate::collection::PointCollection;
use crate::error::{FitError, FitResult};
use crate::point::ScanPoint;

use super::circle::fit_circle;
use super::{Circle, CircleFitConfig, Cylinder};

/// Result of a cylinder fit.
#[derive(Debug, Clone)]
pub struct CylinderFit {
    pub cylinder: Cylinder,
    /// Whether the underlying circle fit converged within tolerance.
    pub converged: bool,
    /// Circle solver iterations performed.
    pub iterations: u32,
}

/// Coarse circle estimate from the collection's bounding box.
///
/// The center is the box midpoint; the radius is the mean of the x and y
/// half-extents. Good enough to seed [`fit_cylinder`] on a full or mostly
/// complete shell scan.
pub fn initial_guess<P: ScanPoint>(points: &PointCollection<P>) -> FitResult<Circle> {
    let b = points.bounds().ok_or(FitError::EmptyInput)?;
    let rx = 0.5 * (b.x_max - b.x_min);
    let ry = 0.5 * (b.y_max - b.y_min);
    let (x0, y0) = b.center_xy();
    Ok(Circle::new(x0, y0, 0.5 * (rx + ry)))
}

/// Fit a vertical cylinder to `points`, seeding the circle solver with `initial`.
///
/// The circle is fit to the XY projection; `z_min`/`z_max` come from the
/// collection's bounds.
pub fn fit_cylinder<P: ScanPoint>(
    initial: &Circle,
    points: &PointCollection<P>,
    config: &CircleFitConfig,
) -> FitResult<CylinderFit> {
    let bounds = *points.bounds().ok_or(FitError::EmptyInput)?;
    let fit = fit_circle(initial, points.points(), config)?;
    Ok(CylinderFit {
        cylinder: Cylinder::new(fit.circle, bounds.z_min, bounds.z_max),
        converged: fit.converged,
        iterations: fit.iterations,
    })
}
