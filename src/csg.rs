// CSG (Constructive Solid Geometry) distance algebra.
//
// These combine signed distance values to produce boolean combinations
// of shapes:
// - union:        the merged shape (min)
// - intersection: the overlapping region (max)
// - difference:   A minus B (max of A and negated B)
//
// The octree classifier only relies on the sign of these values, plus
// their magnitude relative to the voxel diagonal, so primitives are
// free to return conservative rather than exact Euclidean distances.

use crate::math::Vec3;

/// Signed distance to a sphere of the given radius, centered at the
/// origin. Negative inside, zero on the surface, positive outside.
pub fn sphere(point: Vec3, radius: f32) -> f32 {
    point.norm() - radius
}

/// Signed distance to an axis-aligned cube of the given edge length,
/// centered at the origin.
///
/// This is the Chebyshev distance, not the Euclidean cube SDF: the sign
/// is exact everywhere and the magnitude underestimates the true
/// distance by at most a factor of sqrt(3), which the classifier's
/// half-diagonal slack absorbs.
pub fn cube(point: Vec3, side: f32) -> f32 {
    point.x.abs().max(point.y.abs()).max(point.z.abs()) - side / 2.0
}

/// Boolean union of two SDF values (logical OR).
/// The point is inside whichever shape is closer.
pub fn union(d1: f32, d2: f32) -> f32 {
    d1.min(d2)
}

/// Boolean intersection of two SDF values (logical AND).
/// The point must be inside both shapes.
pub fn intersection(d1: f32, d2: f32) -> f32 {
    d1.max(d2)
}

/// Boolean difference: shape A minus shape B.
/// Keeps points inside A that are outside B.
pub fn difference(d1: f32, d2: f32) -> f32 {
    d1.max(-d2)
}
