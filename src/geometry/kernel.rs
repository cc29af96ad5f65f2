//! The geometry kernel interface a scripted part builds against
//!
//! Only the calls a part needs are exposed. The host application supplies
//! the real implementation; [`ConstructionKernel`](super::ConstructionKernel)
//! records the calls instead of evaluating them.

use crate::geometry::{KernelError, Vector};

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, KernelError>;

/// Shape construction calls provided by a CAD geometry kernel
pub trait GeometryKernel {
    /// The kernel's shape handle (wire, face or solid)
    type Shape: Clone + std::fmt::Debug;

    /// Create a polyline wire through `points`
    ///
    /// Repeat the first point at the end to close the wire.
    fn make_polygon(&self, points: &[Vector]) -> Result<Self::Shape>;

    /// Create a planar face bounded by a closed wire
    fn make_face(&self, wire: &Self::Shape) -> Result<Self::Shape>;

    /// Sweep a face along `direction` into a prism
    fn extrude(&self, face: &Self::Shape, direction: Vector) -> Result<Self::Shape>;

    /// Create a solid cylinder whose base circle is centred on `base`
    fn make_cylinder(
        &self,
        radius: f64,
        height: f64,
        base: Vector,
        axis: Vector,
    ) -> Result<Self::Shape>;

    /// Boolean union of two solids
    fn fuse(&self, a: &Self::Shape, b: &Self::Shape) -> Result<Self::Shape>;
}
