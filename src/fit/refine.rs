//! Iterative fit–filter refinement of a cylinder estimate.
//!
//! Starting from the bounding-box estimate, each round fits a cylinder to the
//! currently retained points and then drops the points that lie too far from
//! it. Rounds are grouped into stages with a fixed tolerance and proximity
//! mode; tolerances must not increase from one stage to the next. A final fit
//! over the surviving points gives the trusted cylinder.
//!
//! The default schedule is five symmetric rounds at 0.1 followed by five
//! outside-only rounds at 0.04. The outside-only stage never drops inward
//! points, so dents survive into the deformation pass while nozzles and
//! stiffeners on the outside of the shell are stripped.

use tracing::{debug, info};

use crate::collection::PointCollection;
use crate::error::{FitError, FitResult};
use crate::filter::{ProximityMode, ScanFilter};
use crate::point::ScanPoint;

use super::cylinder::{fit_cylinder, initial_guess};
use super::{Circle, CircleFitConfig, Cylinder};

/// A run of refinement rounds sharing one filter tolerance and mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineStage {
    /// Proximity filter tolerance, in scan units.
    pub tolerance: f64,
    /// Which side of the surface the tolerance applies to.
    pub mode: ProximityMode,
    /// Number of fit–filter rounds in this stage.
    pub rounds: u32,
}

/// Configuration for [`refine_cylinder`].
#[derive(Debug, Clone)]
pub struct RefineConfig {
    /// Circle solver settings used for every fit.
    pub circle: CircleFitConfig,
    /// Stages in the order they run. Tolerances must be non-increasing.
    pub stages: Vec<RefineStage>,
    /// If set, a stage ends early once the fitted radius moves by less than
    /// this between consecutive rounds. Default `None` (run every round).
    pub radius_stability: Option<f64>,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            circle: CircleFitConfig::default(),
            stages: vec![
                RefineStage {
                    tolerance: 0.1,
                    mode: ProximityMode::Symmetric,
                    rounds: 5,
                },
                RefineStage {
                    tolerance: 0.04,
                    mode: ProximityMode::OutsideOnly,
                    rounds: 5,
                },
            ],
            radius_stability: None,
        }
    }
}

impl RefineConfig {
    fn validate(&self) -> FitResult<()> {
        self.circle.validate()?;
        let mut previous = f64::INFINITY;
        for (i, stage) in self.stages.iter().enumerate() {
            if !(stage.tolerance.is_finite() && stage.tolerance > 0.0) {
                return Err(FitError::invalid_parameter(format!(
                    "stage {} tolerance must be positive, got {}",
                    i, stage.tolerance
                )));
            }
            if stage.tolerance > previous {
                return Err(FitError::invalid_parameter(format!(
                    "stage {} tolerance {} exceeds previous stage tolerance {}",
                    i, stage.tolerance, previous
                )));
            }
            previous = stage.tolerance;
        }
        if let Some(eps) = self.radius_stability {
            if !(eps.is_finite() && eps > 0.0) {
                return Err(FitError::invalid_parameter(format!(
                    "radius_stability must be positive, got {eps}"
                )));
            }
        }
        Ok(())
    }
}

/// What happened in a single fit–filter round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    /// Index of the stage this round belongs to.
    pub stage: usize,
    pub tolerance: f64,
    pub mode: ProximityMode,
    /// Radius of the cylinder fitted at the start of the round.
    pub radius: f64,
    /// Whether that fit converged.
    pub converged: bool,
    /// Points left after filtering.
    pub retained: usize,
    /// Points removed by this round's filter.
    pub rejected: usize,
}

/// Outcome of [`refine_cylinder`].
#[derive(Debug, Clone)]
pub struct RefineReport {
    /// The trusted cylinder from the final fit.
    pub cylinder: Cylinder,
    /// Whether the final fit converged.
    pub converged: bool,
    /// The bounding-box estimate the loop started from.
    pub initial: Circle,
    /// One entry per round, in order.
    pub rounds: Vec<RoundSummary>,
    /// `|r_final − r_previous|` between the final fit and the last round's fit.
    /// `None` when the schedule has no rounds.
    pub radius_change: Option<f64>,
}

impl RefineReport {
    /// Total points rejected across all rounds.
    pub fn total_rejected(&self) -> usize {
        self.rounds.iter().map(|r| r.rejected).sum()
    }
}

/// Refine a cylinder estimate by alternating fits and proximity filtering.
///
/// On success `points` holds only the retained points. On error it is left
/// untouched.
///
/// # Errors
///
/// Propagates solver errors. A round that filters away every point fails with
/// `EmptyInput`; a schedule with rising tolerances is `InvalidParameter`.
pub fn refine_cylinder<P: ScanPoint>(
    points: &mut PointCollection<P>,
    config: &RefineConfig,
) -> FitResult<RefineReport> {
    config.validate()?;
    let initial = initial_guess(points)?;
    let n_start = points.len();

    let mut working = points.clone();
    let mut seed = initial;
    let mut rounds = Vec::new();
    let mut previous_radius: Option<f64> = None;

    for (stage_idx, stage) in config.stages.iter().enumerate() {
        for round in 0..stage.rounds {
            let fit = fit_cylinder(&seed, &working, &config.circle)?;
            let radius = fit.cylinder.r();

            let mut filter =
                ScanFilter::cylinder_proximity(fit.cylinder, stage.tolerance, stage.mode);
            let rejected = working.filter_in_place(&mut filter);

            debug!(
                "Refine stage {} round {}: R={:.5}, rejected {}, retained {}",
                stage_idx,
                round,
                radius,
                rejected,
                working.len()
            );

            rounds.push(RoundSummary {
                stage: stage_idx,
                tolerance: stage.tolerance,
                mode: stage.mode,
                radius,
                converged: fit.converged,
                retained: working.len(),
                rejected,
            });

            if working.is_empty() {
                return Err(FitError::EmptyInput);
            }

            let delta_r = previous_radius.map(|r| (radius - r).abs());
            previous_radius = Some(radius);
            seed = *fit.cylinder.circle();

            if let (Some(eps), Some(dr)) = (config.radius_stability, delta_r) {
                if dr < eps {
                    debug!(
                        "Refine stage {}: radius stable (|dR|={:.3e}) after {} rounds",
                        stage_idx,
                        dr,
                        round + 1
                    );
                    break;
                }
            }
        }
    }

    let final_fit = fit_cylinder(&seed, &working, &config.circle)?;
    let radius_change = previous_radius.map(|r| (final_fit.cylinder.r() - r).abs());

    info!(
        "Refined {}: {} rounds, retained {}/{} points, |dR| last={:.3e}",
        final_fit.cylinder,
        rounds.len(),
        working.len(),
        n_start,
        radius_change.unwrap_or(0.0)
    );

    *points = working;

    Ok(RefineReport {
        cylinder: final_fit.cylinder,
        converged: final_fit.converged,
        initial,
        rounds,
        radius_change,
    })
}
