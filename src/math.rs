//! Linear algebra type aliases and the cubical bounding box.

/// World-space position or direction.
pub type Vec3 = nalgebra::Vector3<f32>;
/// Integer grid coordinates.
pub type UVec3 = nalgebra::Vector3<u32>;
/// Homogeneous affine transform.
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Componentwise minimum of two vectors.
pub fn cmin(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

/// Componentwise maximum of two vectors.
pub fn cmax(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}

/// Axis-aligned bounding box.
///
/// Extents accumulate componentwise, but consumers treat the box as a
/// cube anchored at `min` with edge [`Aabb::side`], the largest of the
/// three extents. The voxel grid is laid over exactly that cube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Cube centered at the origin with the given edge length.
    pub fn cube(side: f32) -> Self {
        let half = side / 2.0;
        Self {
            min: Vec3::new(-half, -half, -half),
            max: Vec3::new(half, half, half),
        }
    }

    /// Edge length of the enclosing cube: the maximum extent.
    pub fn side(&self) -> f32 {
        let extent = self.max - self.min;
        extent.x.max(extent.y).max(extent.z)
    }

    /// Smallest box containing both operands.
    pub fn merge(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: cmin(self.min, other.min),
            max: cmax(self.max, other.max),
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x
            && p.y >= self.min.y && p.y <= self.max.y
            && p.z >= self.min.z && p.z <= self.max.z
    }
}
