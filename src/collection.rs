//! Ordered point collections with axis-aligned bounds.
//!
//! `PointCollection` keeps samples in insertion order and tracks their
//! bounding box. Insertions widen the box incrementally; bulk replacement
//! (filtering) recomputes it from the surviving points so it is never stale.

use tracing::debug;

use crate::filter::ScanFilter;
use crate::point::{Point3D, ScanPoint};

/// Axis-aligned extents of a non-empty point collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl Bounds {
    /// Degenerate box containing a single point.
    pub fn from_point(p: &Point3D) -> Self {
        Self {
            x_min: p.x(),
            x_max: p.x(),
            y_min: p.y(),
            y_max: p.y(),
            z_min: p.z(),
            z_max: p.z(),
        }
    }

    /// Grow the box to contain `p`.
    pub fn include(&mut self, p: &Point3D) {
        self.x_min = self.x_min.min(p.x());
        self.x_max = self.x_max.max(p.x());
        self.y_min = self.y_min.min(p.y());
        self.y_max = self.y_max.max(p.y());
        self.z_min = self.z_min.min(p.z());
        self.z_max = self.z_max.max(p.z());
    }

    /// Exact bounds over `points`, or `None` when there are none.
    pub fn of<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3D>,
    {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    /// Midpoint of the box in the XY plane.
    pub fn center_xy(&self) -> (f64, f64) {
        (
            0.5 * (self.x_min + self.x_max),
            0.5 * (self.y_min + self.y_max),
        )
    }
}

/// A named, ordered collection of scan points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCollection<P> {
    name: String,
    points: Vec<P>,
    bounds: Option<Bounds>,
}

impl<P: ScanPoint> PointCollection<P> {
    /// Create an empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
            bounds: None,
        }
    }

    /// Build a collection from owned points, computing exact bounds.
    pub fn from_points(name: impl Into<String>, points: Vec<P>) -> Self {
        let bounds = Bounds::of(points.iter().map(ScanPoint::point));
        Self {
            name: name.into(),
            points,
            bounds,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in insertion order.
    pub fn points(&self) -> &[P] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.points.iter()
    }

    /// Bounding box, `None` iff the collection is empty.
    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }

    /// Append a point, widening the bounds.
    pub fn push(&mut self, point: P) {
        match self.bounds.as_mut() {
            Some(b) => b.include(point.point()),
            None => self.bounds = Some(Bounds::from_point(point.point())),
        }
        self.points.push(point);
    }

    /// Replace the contents wholesale and recompute bounds.
    pub fn replace_points(&mut self, points: Vec<P>) {
        self.bounds = Bounds::of(points.iter().map(ScanPoint::point));
        self.points = points;
    }

    /// Keep only the points `filter` accepts, in place.
    ///
    /// Returns the number of points removed.
    pub fn filter_in_place(&mut self, filter: &mut ScanFilter) -> usize {
        let before = self.points.len();
        let kept = self.select(filter);
        self.replace_points(kept);
        let removed = before - self.points.len();
        debug!(
            "Filter {} on '{}': kept {}/{} points",
            filter.label(),
            self.name,
            self.points.len(),
            before
        );
        removed
    }

    /// Copy the accepted points into a new collection named `<name>_filtered`.
    pub fn filtered(&self, filter: &mut ScanFilter) -> Self {
        let kept = self.select(filter);
        debug!(
            "Filter {} on '{}': kept {}/{} points into new collection",
            filter.label(),
            self.name,
            kept.len(),
            self.points.len()
        );
        Self::from_points(format!("{}_filtered", self.name), kept)
    }

    fn select(&self, filter: &mut ScanFilter) -> Vec<P> {
        self.points
            .iter()
            .filter(|p| filter.accepts(p.point()))
            .cloned()
            .collect()
    }
}

impl<P: ScanPoint> Extend<P> for PointCollection<P> {
    fn extend<T: IntoIterator<Item = P>>(&mut self, iter: T) {
        for p in iter {
            self.push(p);
        }
    }
}

impl<'a, P> IntoIterator for &'a PointCollection<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
