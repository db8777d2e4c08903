//! Named survey points with caller-scoped name uniqueness.
//!
//! Reference marks (benchmarks, control points on the tank wall) are
//! registered under a name. Uniqueness is enforced per [`NameRegistry`]
//! instance; two registries never see each other's names.

use std::collections::HashSet;
use std::fmt;

use crate::error::{FitError, FitResult};
use crate::point::{Point3D, ScanPoint};

/// A point issued by a [`NameRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPoint {
    name: String,
    point: Point3D,
}

impl NamedPoint {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ScanPoint for NamedPoint {
    fn point(&self) -> &Point3D {
        &self.point
    }
}

impl fmt::Display for NamedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NamedPoint (name={}, x={}, y={}, z={})",
            self.name,
            self.point.x(),
            self.point.y(),
            self.point.z()
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    names: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` and return the named point.
    ///
    /// Fails with `NameCollision` if the name is already taken.
    pub fn register(&mut self, name: impl Into<String>, point: Point3D) -> FitResult<NamedPoint> {
        let name = name.into();
        if !self.names.insert(name.clone()) {
            return Err(FitError::NameCollision(name));
        }
        Ok(NamedPoint { name, point })
    }

    /// Free a name so it can be registered again. Returns whether it was taken.
    pub fn release(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
