//! Geometry kernel: vector primitives, line-like segments, and the convex
//! quadrilateral type threaded through Stages B–F.

pub mod kernel;
pub mod point;
pub mod quad;

pub use kernel::*;
pub use point::{LineLike, Point, Segment};
pub use quad::{Quad, ShrunkQuad};
