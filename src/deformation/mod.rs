//! Radial deformation of scan points relative to a fitted cylinder.
//!
//! The deformation of a point is its planar distance to the cylinder axis
//! minus the cylinder radius: positive values bulge outward, negative values
//! are dents.

pub mod unroll;

pub use unroll::unroll;

use std::fmt;

use crate::collection::PointCollection;
use crate::error::{FitError, FitResult};
use crate::fit::Cylinder;
use crate::point::{DeformationPoint, Point3D, ScanPoint};

/// Aggregate deformation statistics over a collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformationStats {
    pub min_deformation: f64,
    pub max_deformation: f64,
    /// `sqrt(mean(d²))`.
    pub rms_deformation: f64,
    /// Number of points the statistics cover.
    pub count: usize,
}

impl DeformationStats {
    /// Compute statistics from annotated points.
    ///
    /// Fails with `EmptyInput` for an empty collection and
    /// `MissingDeformation` if any point has not been annotated.
    pub fn from_points(points: &[DeformationPoint]) -> FitResult<Self> {
        if points.is_empty() {
            return Err(FitError::EmptyInput);
        }
        let mut min_deformation = f64::INFINITY;
        let mut max_deformation = f64::NEG_INFINITY;
        let mut sum_sq = 0.0;
        for (index, p) in points.iter().enumerate() {
            let d = p
                .deformation()
                .ok_or(FitError::MissingDeformation { index })?;
            min_deformation = min_deformation.min(d);
            max_deformation = max_deformation.max(d);
            sum_sq += d * d;
        }
        Ok(Self {
            min_deformation,
            max_deformation,
            rms_deformation: (sum_sq / points.len() as f64).sqrt(),
            count: points.len(),
        })
    }
}

impl fmt::Display for DeformationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deformation [{:.3}, {:.3}], rms {:.3} over {} points",
            self.min_deformation, self.max_deformation, self.rms_deformation, self.count
        )
    }
}

/// A deformation-annotated point collection with its statistics.
///
/// The statistics always describe the current annotation of the points;
/// re-annotating goes through [`DeformationCalculator::annotate`].
#[derive(Debug, Clone)]
pub struct DeformationScan {
    points: PointCollection<DeformationPoint>,
    stats: DeformationStats,
}

impl DeformationScan {
    pub fn points(&self) -> &PointCollection<DeformationPoint> {
        &self.points
    }

    pub fn stats(&self) -> &DeformationStats {
        &self.stats
    }

    pub fn into_points(self) -> PointCollection<DeformationPoint> {
        self.points
    }
}

/// Computes radial deformation against a fixed cylinder.
#[derive(Debug, Clone, Copy)]
pub struct DeformationCalculator {
    cylinder: Cylinder,
}

impl DeformationCalculator {
    /// Fails with `DegenerateGeometry` unless the cylinder radius is positive.
    pub fn new(cylinder: Cylinder) -> FitResult<Self> {
        cylinder.ensure_valid_radius()?;
        Ok(Self { cylinder })
    }

    pub fn cylinder(&self) -> &Cylinder {
        &self.cylinder
    }

    /// Signed radial offset of a single point.
    pub fn deformation_of(&self, point: &Point3D) -> f64 {
        point.planar_distance(self.cylinder.x0(), self.cylinder.y0()) - self.cylinder.r()
    }

    /// Annotate every point of `points` and compute the statistics.
    ///
    /// The result keeps the input's name, point order, colors, and bounds.
    pub fn compute<P: ScanPoint>(
        &self,
        points: &PointCollection<P>,
    ) -> FitResult<DeformationScan> {
        if points.is_empty() {
            return Err(FitError::EmptyInput);
        }
        let annotated: Vec<DeformationPoint> = points
            .iter()
            .map(|p| {
                let mut dp = DeformationPoint::from_scan_point(p);
                dp.set_deformation(self.deformation_of(p.point()));
                dp
            })
            .collect();
        let stats = DeformationStats::from_points(&annotated)?;
        Ok(DeformationScan {
            points: PointCollection::from_points(points.name(), annotated),
            stats,
        })
    }

    /// Re-annotate `scan` in place against this cylinder and refresh its
    /// statistics.
    pub fn annotate(&self, scan: &mut DeformationScan) -> FitResult<DeformationStats> {
        let updated: Vec<DeformationPoint> = scan
            .points
            .iter()
            .map(|p| {
                let mut dp = *p;
                dp.set_deformation(self.deformation_of(p.point()));
                dp
            })
            .collect();
        let stats = DeformationStats::from_points(&updated)?;
        scan.points.replace_points(updated);
        scan.stats = stats;
        Ok(stats)
    }
}

/// Convenience wrapper: validate `cylinder` and compute deformation over `points`.
pub fn compute_deformation<P: ScanPoint>(
    cylinder: &Cylinder,
    points: &PointCollection<P>,
) -> FitResult<DeformationScan> {
    DeformationCalculator::new(*cylinder)?.compute(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::Circle;
    use crate::point::{ColoredPoint, Rgb};

    fn unit_cylinder(r: f64) -> Cylinder {
        Cylinder::new(Circle::new(0.0, 0.0, r), 0.0, 10.0)
    }

    #[test]
    fn test_deformation_sign_and_magnitude() {
        let points = PointCollection::from_points(
            "tank",
            vec![
                Point3D::new(5.3, 0.0, 1.0).unwrap(),
                Point3D::new(0.0, -4.7, 2.0).unwrap(),
            ],
        );
        let scan = compute_deformation(&unit_cylinder(5.0), &points).unwrap();
        let d: Vec<f64> = scan.points().iter().map(|p| p.deformation().unwrap()).collect();
        assert!((d[0] - 0.3).abs() < 1e-12);
        assert!((d[1] + 0.3).abs() < 1e-12);
        assert!((scan.stats().min_deformation + 0.3).abs() < 1e-12);
        assert!((scan.stats().max_deformation - 0.3).abs() < 1e-12);
        assert!((scan.stats().rms_deformation - 0.3).abs() < 1e-12);
        assert_eq!(scan.stats().count, 2);
    }

    #[test]
    fn test_rms_over_mixed_offsets() {
        let points = PointCollection::from_points(
            "tank",
            vec![
                Point3D::new(10.0, 0.0, 0.0).unwrap(),
                Point3D::new(10.2, 0.0, 0.0).unwrap(),
                Point3D::new(9.6, 0.0, 0.0).unwrap(),
            ],
        );
        let scan = compute_deformation(&unit_cylinder(10.0), &points).unwrap();
        let expected = ((0.0 + 0.04 + 0.16) / 3.0_f64).sqrt();
        assert!((scan.stats().rms_deformation - expected).abs() < 1e-9);
    }

    #[test]
    fn test_keeps_name_order_and_color() {
        let mut points = PointCollection::new("OilTank");
        points.push(ColoredPoint::new(
            Point3D::new(1.0, 0.0, 0.0).unwrap(),
            Some(Rgb::new(1, 2, 3)),
        ));
        points.push(ColoredPoint::from_coords(0.0, 2.0, 5.0).unwrap());
        let scan = compute_deformation(&unit_cylinder(1.5), &points).unwrap();
        assert_eq!(scan.points().name(), "OilTank");
        assert_eq!(scan.points().points()[0].color(), Some(Rgb::new(1, 2, 3)));
        assert_eq!(scan.points().points()[1].color(), None);
        assert_eq!(scan.points().bounds(), points.bounds());
    }

    #[test]
    fn test_preconditions() {
        let empty: PointCollection<Point3D> = PointCollection::new("empty");
        assert!(matches!(
            compute_deformation(&unit_cylinder(5.0), &empty),
            Err(FitError::EmptyInput)
        ));
        assert!(matches!(
            DeformationCalculator::new(unit_cylinder(0.0)),
            Err(FitError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_stats_require_annotation() {
        let p = DeformationPoint::from_scan_point(&Point3D::new(1.0, 1.0, 1.0).unwrap());
        assert_eq!(
            DeformationStats::from_points(&[p]),
            Err(FitError::MissingDeformation { index: 0 })
        );
    }

    #[test]
    fn test_annotate_in_place_against_new_cylinder() {
        let points =
            PointCollection::from_points("t", vec![Point3D::new(6.0, 0.0, 0.0).unwrap()]);
        let mut scan = compute_deformation(&unit_cylinder(5.0), &points).unwrap();
        let stats = DeformationCalculator::new(unit_cylinder(6.5))
            .unwrap()
            .annotate(&mut scan)
            .unwrap();
        assert!((stats.max_deformation + 0.5).abs() < 1e-12);
        assert_eq!(scan.stats(), &stats);
        assert_eq!(scan.stats().count, 1);
        assert!((scan.points().points()[0].deformation().unwrap() + 0.5).abs() < 1e-12);
    }
}
