//! Gauss–Newton circle fitting.
//!
//! Each iteration linearizes the residuals `l_i = |p_i − c| − r` around the
//! current circle. With `r_i = |p_i − c|` the Jacobian row for point `i` is
//!
//! ```text
//! [ −(x_i − x0)/r_i,  −(y_i − y0)/r_i,  −1 ]
//! ```
//!
//! and the correction `Δ = −(AᵀA)⁻¹ Aᵀ l` is applied to `(x0, y0, r)`.
//! The 3×3 normal matrix is accumulated row by row, so memory does not grow
//! with the number of points.

use nalgebra::Matrix3;
use tracing::{debug, warn};

use crate::error::{FitError, FitResult};
use crate::point::ScanPoint;
use crate::Vector3;

use super::{Circle, CircleFitConfig};

/// Points closer than this to the current center make the Jacobian undefined.
const MIN_CENTER_DISTANCE: f64 = 1e-12;

/// Smallest-to-largest singular value ratio below which `AᵀA` is singular.
const SINGULAR_RATIO: f64 = 1e-12;

/// Result of a circle fit.
#[derive(Debug, Clone)]
pub struct CircleFit {
    /// The fitted circle.
    pub circle: Circle,
    /// True if the last correction fell below the tolerance; false if the
    /// iteration budget ran out first.
    pub converged: bool,
    /// Number of Gauss–Newton iterations performed.
    pub iterations: u32,
    /// Correction `(Δx0, Δy0, Δr)` applied at each iteration, in order.
    pub corrections: Vec<Vector3>,
}

/// Fit a circle to the XY projection of `points`, starting from `initial`.
///
/// # Errors
///
/// - `EmptyInput` if `points` is empty.
/// - `SingularSystem` if fewer than three points are given or the normal
///   equations are rank deficient (e.g. fewer than three distinct points).
/// - `DegenerateGeometry` if a point coincides with the current center.
/// - `InvalidParameter` if `config` is out of range.
pub fn fit_circle<P: ScanPoint>(
    initial: &Circle,
    points: &[P],
    config: &CircleFitConfig,
) -> FitResult<CircleFit> {
    config.validate()?;
    if points.is_empty() {
        return Err(FitError::EmptyInput);
    }
    if points.len() < 3 {
        return Err(FitError::singular(format!(
            "circle fit needs at least 3 points, got {}",
            points.len()
        )));
    }

    let mut circle = *initial;
    let mut corrections = Vec::new();
    let mut converged = false;

    for iter in 0..config.max_iterations {
        let delta = circle_correction(&circle, points)?;
        circle = circle.corrected(&delta);
        corrections.push(delta);

        debug!(
            "Circle fit iteration {}: delta=({:.3e}, {:.3e}, {:.3e}), {}",
            iter, delta.x, delta.y, delta.z, circle
        );

        if delta.amax() < config.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            "Circle fit did not converge within {} iterations (last |delta| = {:.3e})",
            config.max_iterations,
            corrections.last().map_or(f64::NAN, |d| d.amax())
        );
    }

    Ok(CircleFit {
        circle,
        converged,
        iterations: corrections.len() as u32,
        corrections,
    })
}

/// Compute one Gauss–Newton correction `(Δx0, Δy0, Δr)` for `circle`.
///
/// This is a pure function of the current estimate, so the convergence
/// sequence can be replayed step by step.
pub fn circle_correction<P: ScanPoint>(circle: &Circle, points: &[P]) -> FitResult<Vector3> {
    let mut normal = Matrix3::<f64>::zeros();
    let mut at_l = Vector3::zeros();

    for (i, p) in points.iter().enumerate() {
        let p = p.point();
        let dx = p.x() - circle.x0;
        let dy = p.y() - circle.y0;
        let ri = dx.hypot(dy);
        if ri < MIN_CENTER_DISTANCE {
            return Err(FitError::degenerate(format!(
                "point {} at ({}, {}) coincides with the fit center",
                i,
                p.x(),
                p.y()
            )));
        }

        let row = Vector3::new(-dx / ri, -dy / ri, -1.0);
        let li = ri - circle.r;
        normal += row * row.transpose();
        at_l += row * li;
    }

    let svd = normal.svd(true, true);
    let s_max = svd.singular_values.max();
    let s_min = svd.singular_values.min();
    if !(s_max > 0.0) || s_min / s_max < SINGULAR_RATIO {
        return Err(FitError::singular(format!(
            "normal matrix is rank deficient (singular values {:.3e} .. {:.3e})",
            s_min, s_max
        )));
    }

    let solution = svd
        .solve(&at_l, 0.0)
        .map_err(|e| FitError::singular(e.to_string()))?;
    let delta = -solution;

    if delta.iter().any(|v| !v.is_finite()) {
        return Err(FitError::singular("correction is not finite"));
    }
    Ok(delta)
}
