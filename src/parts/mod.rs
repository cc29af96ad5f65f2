//! Parts built on the host seam

pub mod hex_screw;

pub use hex_screw::{build_screw, PartialHexScrew, ScrewGeometry};
