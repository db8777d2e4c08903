//! # shellfit
//!
//! Cylinder fitting and radial deformation analysis for 3-D scans of
//! cylindrical shells (storage tanks, silos, pipe sections).
//!
//! Given raw `(x, y, z)` samples from a laser scanner, `shellfit` estimates
//! the vertical cylinder the shell was built as and measures how far each
//! sample deviates from it.
//!
//! ## Example
//!
//! ```no_run
//! use shellfit::{analyze, load_scan_from_file, AnalysisConfig, ZBand};
//!
//! let scan = load_scan_from_file("data/OilTank1.txt").unwrap();
//!
//! let config = AnalysisConfig {
//!     z_band: Some(ZBand { z_min: 1.0, z_max: 10.0 }),
//!     ..Default::default()
//! };
//! let analysis = analyze(scan, &config).unwrap();
//!
//! println!("{}", analysis.cylinder);
//! println!("{}", analysis.deformation.stats());
//! ```
//!
//! ## Algorithm overview
//!
//! 1. **Prefilter** — keep a coarse height band of the scan
//! 2. **Seed** — take the circle center and radius from the bounding box
//! 3. **Fit** — Gauss–Newton least squares on `Σ (|p − c| − r)²` over the
//!    XY projection; the z-range comes from the bounds
//! 4. **Refine** — alternate fits with cylinder-proximity filtering on a
//!    tightening tolerance schedule (symmetric, then outside-only)
//! 5. **Deform** — annotate every retained point with its signed radial
//!    offset and report min / max / RMS
//! 6. **Unroll** (optional) — map the annotated shell to height × arc length
//!    for contouring

pub mod analysis;
pub mod collection;
pub mod deformation;
pub mod error;
pub mod filter;
pub mod fit;
pub mod formats;
pub mod point;
pub mod registry;

pub use analysis::{analyze, Analysis, AnalysisConfig};
pub use collection::{Bounds, PointCollection};
pub use deformation::{
    compute_deformation, unroll, DeformationCalculator, DeformationScan, DeformationStats,
};
pub use error::{FitError, FitResult};
pub use filter::{ProximityMode, ScanFilter, ZBand};
pub use fit::{
    fit_circle, fit_cylinder, initial_guess, refine_cylinder, Circle, CircleFit,
    CircleFitConfig, Cylinder, CylinderFit, RefineConfig, RefineReport, RefineStage,
};
pub use formats::{load_scan, load_scan_from_file};
pub use point::{ColoredPoint, DeformationPoint, Point3D, Rgb, ScanPoint};
pub use registry::{NameRegistry, NamedPoint};

// All fitting math is double precision
pub type Vector3 = nalgebra::Vector3<f64>;
