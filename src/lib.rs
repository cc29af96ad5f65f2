//! hexscrew: parametric ISO 4014 hexagon head screws
//!
//! A scripted CAD part built from a dimensional lookup table. The host
//! application supplies the geometry kernel and the document; this crate
//! supplies the table, the part's callbacks and an installer.

pub mod cli;
pub mod core;
pub mod geometry;
pub mod parts;
pub mod standards;
pub mod yaml;
