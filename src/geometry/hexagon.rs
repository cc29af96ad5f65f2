//! Regular hexagon outline for hexagon heads
//!
//! ```text
//!            +--------+          y
//!           /          \         ^
//!          /            \        |
//!     s   +      O       +       +---> x
//!          \            /
//!           \          /
//!            +--------+
//!     |<------- e ------->|
//! ```
//!
//! The flats are parallel to the x axis, so the across-flats width `s`
//! is measured along y and the corners sit at `(+-R, 0)` with `R = e / 2`.

use std::f64::consts::FRAC_PI_3;

use crate::geometry::Vector;

/// Circumradius (half the across-corners width e) for an across-flats width
pub fn circumradius(across_flats: f64) -> f64 {
    0.5 * across_flats / FRAC_PI_3.sin()
}

/// Closed hexagon outline in the XY plane, centred on the origin
///
/// Starts at the far right corner `(R, 0, 0)`, runs counter-clockwise and
/// repeats the first point at the end to close the polygon.
pub fn hexagon_points(across_flats: f64) -> [Vector; 7] {
    let y = 0.5 * across_flats;
    let radius = y / FRAC_PI_3.sin();
    let x = FRAC_PI_3.cos() * radius;

    [
        Vector::new(radius, 0.0, 0.0),
        Vector::new(x, y, 0.0),
        Vector::new(-x, y, 0.0),
        Vector::new(-radius, 0.0, 0.0),
        Vector::new(-x, -y, 0.0),
        Vector::new(x, -y, 0.0),
        Vector::new(radius, 0.0, 0.0),
    ]
}

/// Area enclosed by a regular hexagon
pub fn hexagon_area(across_flats: f64) -> f64 {
    // Six triangles of base R and height s/2
    3.0 * circumradius(across_flats) * 0.5 * across_flats
}
