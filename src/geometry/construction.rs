//! Recording geometry kernel
//!
//! [`ConstructionKernel`] validates each call the way a B-rep kernel would
//! and returns a [`Shape`] node describing it. The resulting tree is the
//! part's construction history: it serializes to YAML/JSON and can be
//! replayed against a real kernel.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::kernel::{GeometryKernel, Result};
use crate::geometry::{KernelError, Vector, TOLERANCE};

/// Topological kind of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Wire,
    Face,
    Solid,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeKind::Wire => write!(f, "wire"),
            ShapeKind::Face => write!(f, "face"),
            ShapeKind::Solid => write!(f, "solid"),
        }
    }
}

/// A node of the construction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Shape {
    /// Polyline through the points
    Polygon { points: Vec<Vector> },

    /// Planar face bounded by a closed polygon
    Face { wire: Box<Shape>, normal: Vector },

    /// Prism swept from a face
    Extrusion { profile: Box<Shape>, direction: Vector },

    /// Solid cylinder
    Cylinder {
        radius: f64,
        height: f64,
        base: Vector,
        axis: Vector,
    },

    /// Union of solids
    Fuse { shapes: Vec<Shape> },
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vector,
    pub max: Vector,
}

impl BoundingBox {
    fn from_points<'a>(mut points: impl Iterator<Item = &'a Vector>) -> Self {
        let first = points.next().copied().unwrap_or_default();
        points.fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |bb, p| BoundingBox {
                min: bb.min.min(p),
                max: bb.max.max(p),
            },
        )
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        }
    }

    pub fn translated(&self, offset: Vector) -> BoundingBox {
        BoundingBox {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// True when the boxes share at least a boundary point
    pub fn touches(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x + TOLERANCE
            && other.min.x <= self.max.x + TOLERANCE
            && self.min.y <= other.max.y + TOLERANCE
            && other.min.y <= self.max.y + TOLERANCE
            && self.min.z <= other.max.z + TOLERANCE
            && other.min.z <= self.max.z + TOLERANCE
    }
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Polygon { .. } => ShapeKind::Wire,
            Shape::Face { .. } => ShapeKind::Face,
            Shape::Extrusion { .. } | Shape::Cylinder { .. } | Shape::Fuse { .. } => {
                ShapeKind::Solid
            }
        }
    }

    /// Exact axis-aligned bounds of the shape
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Shape::Polygon { points } => BoundingBox::from_points(points.iter()),
            Shape::Face { wire, .. } => wire.bounding_box(),
            Shape::Extrusion { profile, direction } => {
                let bb = profile.bounding_box();
                bb.union(&bb.translated(*direction))
            }
            Shape::Cylinder {
                radius,
                height,
                base,
                axis,
            } => {
                // Each end circle spans r * sqrt(1 - a_i^2) along axis i
                let top = *base + *axis * *height;
                let extent = |a: f64| radius * (1.0 - a * a).max(0.0).sqrt();
                let e = Vector::new(extent(axis.x), extent(axis.y), extent(axis.z));
                BoundingBox {
                    min: base.min(&top) - e,
                    max: base.max(&top) + e,
                }
            }
            Shape::Fuse { shapes } => shapes
                .iter()
                .map(Shape::bounding_box)
                .reduce(|a, b| a.union(&b))
                .unwrap_or(BoundingBox {
                    min: Vector::ZERO,
                    max: Vector::ZERO,
                }),
        }
    }

    /// Number of primitive solids in the tree
    pub fn solid_count(&self) -> usize {
        match self {
            Shape::Fuse { shapes } => shapes.iter().map(Shape::solid_count).sum(),
            Shape::Extrusion { .. } | Shape::Cylinder { .. } => 1,
            Shape::Polygon { .. } | Shape::Face { .. } => 0,
        }
    }

    fn wrong_kind(&self, expected: ShapeKind) -> KernelError {
        KernelError::WrongShapeKind {
            expected,
            found: self.kind(),
        }
    }

    fn expect_kind(&self, expected: ShapeKind) -> Result<()> {
        if self.kind() == expected {
            Ok(())
        } else {
            Err(self.wrong_kind(expected))
        }
    }
}

/// Newell's method: the returned vector is normal to the polygon and its
/// length is twice the enclosed area
fn newell_normal(points: &[Vector]) -> Vector {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .fold(Vector::ZERO, |n, (a, b)| n + a.cross(b))
}

/// Geometry kernel that records construction calls as a [`Shape`] tree
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstructionKernel;

impl ConstructionKernel {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryKernel for ConstructionKernel {
    type Shape = Shape;

    fn make_polygon(&self, points: &[Vector]) -> Result<Shape> {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(KernelError::InvalidGeometry(
                "polygon points must be finite".into(),
            ));
        }

        let mut distinct: Vec<&Vector> = Vec::new();
        for p in points {
            if !distinct.iter().any(|q| q.is_equal(p, TOLERANCE)) {
                distinct.push(p);
            }
        }
        if distinct.len() < 3 {
            return Err(KernelError::InvalidGeometry(format!(
                "polygon needs at least 3 distinct points, got {}",
                distinct.len()
            )));
        }

        trace!(points = points.len(), "make_polygon");
        Ok(Shape::Polygon {
            points: points.to_vec(),
        })
    }

    fn make_face(&self, wire: &Shape) -> Result<Shape> {
        let points = match wire {
            Shape::Polygon { points } => points,
            other => return Err(other.wrong_kind(ShapeKind::Wire)),
        };

        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(KernelError::InvalidGeometry("empty wire".into())),
        };
        if !first.is_equal(last, TOLERANCE) {
            return Err(KernelError::InvalidGeometry(
                "face boundary must be a closed wire".into(),
            ));
        }

        // Last point repeats the first
        let ring = &points[..points.len() - 1];
        let normal = newell_normal(ring).normalized().ok_or_else(|| {
            KernelError::InvalidGeometry("face boundary encloses no area".into())
        })?;

        let origin = ring[0];
        if ring
            .iter()
            .any(|p| (*p - origin).dot(&normal).abs() > TOLERANCE)
        {
            return Err(KernelError::InvalidGeometry(
                "face boundary is not planar".into(),
            ));
        }

        trace!(%normal, "make_face");
        Ok(Shape::Face {
            wire: Box::new(wire.clone()),
            normal,
        })
    }

    fn extrude(&self, face: &Shape, direction: Vector) -> Result<Shape> {
        let normal = match face {
            Shape::Face { normal, .. } => normal,
            other => return Err(other.wrong_kind(ShapeKind::Face)),
        };

        if !direction.is_finite() || direction.magnitude() <= TOLERANCE {
            return Err(KernelError::InvalidGeometry(
                "extrusion direction must be non-zero".into(),
            ));
        }
        if direction.dot(normal).abs() <= TOLERANCE {
            return Err(KernelError::InvalidGeometry(
                "extrusion direction lies in the face plane".into(),
            ));
        }

        trace!(%direction, "extrude");
        Ok(Shape::Extrusion {
            profile: Box::new(face.clone()),
            direction,
        })
    }

    fn make_cylinder(&self, radius: f64, height: f64, base: Vector, axis: Vector) -> Result<Shape> {
        if !(radius.is_finite() && radius > TOLERANCE) {
            return Err(KernelError::InvalidGeometry(format!(
                "cylinder radius must be positive, got {}",
                radius
            )));
        }
        if !(height.is_finite() && height > TOLERANCE) {
            return Err(KernelError::InvalidGeometry(format!(
                "cylinder height must be positive, got {}",
                height
            )));
        }
        if !base.is_finite() {
            return Err(KernelError::InvalidGeometry(
                "cylinder base must be finite".into(),
            ));
        }
        let axis = axis.normalized().ok_or_else(|| {
            KernelError::InvalidGeometry("cylinder axis must be non-zero".into())
        })?;

        trace!(radius, height, "make_cylinder");
        Ok(Shape::Cylinder {
            radius,
            height,
            base,
            axis,
        })
    }

    fn fuse(&self, a: &Shape, b: &Shape) -> Result<Shape> {
        a.expect_kind(ShapeKind::Solid)?;
        b.expect_kind(ShapeKind::Solid)?;

        if !a.bounding_box().touches(&b.bounding_box()) {
            return Err(KernelError::BooleanFailed(
                "solids do not touch; the union would not be a single solid".into(),
            ));
        }

        let mut shapes = Vec::new();
        for shape in [a, b] {
            match shape {
                Shape::Fuse { shapes: inner } => shapes.extend(inner.iter().cloned()),
                other => shapes.push(other.clone()),
            }
        }

        trace!(solids = shapes.len(), "fuse");
        Ok(Shape::Fuse { shapes })
    }
}
