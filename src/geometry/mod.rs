//! Geometry primitives and the kernel seam
//!
//! The host CAD application owns B-rep evaluation. This module defines the
//! calls a part makes ([`GeometryKernel`]) and a recording implementation
//! ([`ConstructionKernel`]) that turns them into a serializable shape tree.

pub mod construction;
pub mod hexagon;
pub mod kernel;
pub mod vector;

pub use construction::{BoundingBox, ConstructionKernel, Shape, ShapeKind};
pub use hexagon::hexagon_points;
pub use kernel::GeometryKernel;
pub use vector::Vector;

/// Tolerance for geometric comparisons (mm)
pub const TOLERANCE: f64 = 1e-6;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum KernelError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("expected a {expected}, got a {found}")]
    WrongShapeKind { expected: ShapeKind, found: ShapeKind },

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),
}
