//! End-to-end shell analysis: prefilter, refine, deform.

use tracing::info;

use crate::collection::PointCollection;
use crate::deformation::{compute_deformation, DeformationScan};
use crate::error::{FitError, FitResult};
use crate::filter::{ScanFilter, ZBand};
use crate::fit::{refine_cylinder, Cylinder, RefineConfig, RefineReport};
use crate::point::ScanPoint;

/// Configuration for [`analyze`].
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Coarse height band applied before fitting. Default `None` (keep all).
    pub z_band: Option<ZBand>,
    /// Refinement schedule and solver settings.
    pub refine: RefineConfig,
}

/// Output of [`analyze`].
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The trusted cylinder.
    pub cylinder: Cylinder,
    pub report: RefineReport,
    /// Deformation of every retained point.
    pub deformation: DeformationScan,
}

/// Fit a cylinder to `points` and compute the deformation of the retained points.
///
/// `points` is consumed; the retained subset is returned inside
/// [`Analysis::deformation`].
pub fn analyze<P: ScanPoint>(
    mut points: PointCollection<P>,
    config: &AnalysisConfig,
) -> FitResult<Analysis> {
    if let Some(band) = config.z_band {
        points.filter_in_place(&mut ScanFilter::ZBand(band));
        if points.is_empty() {
            return Err(FitError::EmptyInput);
        }
    }

    let report = refine_cylinder(&mut points, &config.refine)?;
    let deformation = compute_deformation(&report.cylinder, &points)?;

    info!("Analysis of '{}': {}", points.name(), deformation.stats());

    Ok(Analysis {
        cylinder: report.cylinder,
        report,
        deformation,
    })
}
