//! The CSG scene: an arena of nodes plus the ordered top-level list.
//!
//! All nodes live in a per-scene append-only arena and are referred to
//! by [`Object`] handles (scene id + index). Handles are `Copy`, cheap
//! to pass around, and never dangle while the scene is alive; combining
//! handles from two different scenes is a programmer error caught in
//! debug builds. Arena storage also keeps the node graph trivially
//! traversable without any ownership cycles.
//!
//! Distance and bounding-box evaluation walk the arena recursively.
//! Both are pure: they never mutate the scene, so a build may query
//! them freely while it subdivides.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::{Point3, Rotation3, Unit};

use crate::csg;
use crate::math::{cmax, cmin, Aabb, Mat4, Vec3};
use crate::voxel::Material;

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// A non-owning handle to a node in a [`Scene`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Object {
    scene: u64,
    index: u32,
}

#[derive(Debug)]
enum Node {
    Sphere {
        radius: f32,
    },
    Cube {
        side: f32,
    },
    Union {
        left: u32,
        right: u32,
    },
    Intersection {
        left: u32,
        right: u32,
    },
    Difference {
        left: u32,
        right: u32,
    },
    Transform {
        child: u32,
        object_to_world: Mat4,
        // Cached at construction; distance evaluation only ever needs
        // the inverse.
        world_to_object: Mat4,
    },
    Toplevel {
        child: u32,
        material: Material,
    },
}

/// Owner of a CSG node graph and of the ordered list of objects to
/// voxelize.
#[derive(Debug)]
pub struct Scene {
    id: u64,
    nodes: Vec<Node>,
    toplevels: Vec<(u32, Material)>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Scene {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
            toplevels: Vec::new(),
        }
    }

    fn push(&mut self, node: Node) -> Object {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        Object {
            scene: self.id,
            index,
        }
    }

    fn check(&self, object: Object) {
        debug_assert_eq!(object.scene, self.id, "object belongs to another scene");
        debug_assert!((object.index as usize) < self.nodes.len());
    }

    // --- Primitive factories ---

    /// Sphere of the given radius, centered at the origin.
    pub fn sphere(&mut self, radius: f32) -> Object {
        debug_assert!(radius > 0.0, "sphere radius must be positive");
        self.push(Node::Sphere { radius })
    }

    /// Axis-aligned cube of the given edge length, centered at the
    /// origin.
    pub fn cube(&mut self, side: f32) -> Object {
        debug_assert!(side > 0.0, "cube side must be positive");
        self.push(Node::Cube { side })
    }

    // --- Boolean combinators ---

    pub fn unite(&mut self, left: Object, right: Object) -> Object {
        self.check(left);
        self.check(right);
        self.push(Node::Union {
            left: left.index,
            right: right.index,
        })
    }

    pub fn intersect(&mut self, left: Object, right: Object) -> Object {
        self.check(left);
        self.check(right);
        self.push(Node::Intersection {
            left: left.index,
            right: right.index,
        })
    }

    /// `left` minus `right`.
    pub fn subtract(&mut self, left: Object, right: Object) -> Object {
        self.check(left);
        self.check(right);
        self.push(Node::Difference {
            left: left.index,
            right: right.index,
        })
    }

    // --- Transforms ---

    /// Apply an arbitrary affine transform to `child`. The matrix maps
    /// object space to world space and must be invertible.
    pub fn transform(&mut self, object_to_world: Mat4, child: Object) -> Object {
        self.check(child);
        let world_to_object = match object_to_world.try_inverse() {
            Some(inverse) => inverse,
            None => {
                debug_assert!(false, "transform matrix is not invertible");
                Mat4::identity()
            }
        };
        self.push(Node::Transform {
            child: child.index,
            object_to_world,
            world_to_object,
        })
    }

    /// Uniform scale.
    pub fn scale(&mut self, factor: f32, child: Object) -> Object {
        self.scale3(Vec3::new(factor, factor, factor), child)
    }

    /// Per-axis scale. Factors must be finite and non-zero.
    pub fn scale3(&mut self, factors: Vec3, child: Object) -> Object {
        debug_assert!(
            factors.iter().all(|&f| f.is_finite() && f != 0.0),
            "scale factor must be finite and non-zero"
        );
        self.transform(Mat4::new_nonuniform_scaling(&factors), child)
    }

    /// Rotation of `degrees` around `axis`.
    pub fn rotate(&mut self, degrees: f32, axis: Vec3, child: Object) -> Object {
        debug_assert!(axis.norm() > 0.0, "rotation axis must be non-zero");
        let rotation =
            Rotation3::from_axis_angle(&Unit::new_normalize(axis), degrees.to_radians());
        self.transform(rotation.to_homogeneous(), child)
    }

    /// Translation by `offset`.
    pub fn translate(&mut self, offset: Vec3, child: Object) -> Object {
        self.transform(Mat4::new_translation(&offset), child)
    }

    // --- Top-level registration ---

    /// Register `child` as an object to voxelize with the given
    /// material. Top-levels are classified in registration order; the
    /// first one whose interior contains a voxel wins it.
    pub fn toplevel(&mut self, child: Object, material: Material) -> Object {
        self.check(child);
        debug_assert!(
            material != Material::UNKNOWN && material != Material::VOID,
            "top-level material must be a user label"
        );
        let object = self.push(Node::Toplevel {
            child: child.index,
            material,
        });
        self.toplevels.push((object.index, material));
        object
    }

    /// The registered top-level objects, in registration order.
    pub fn toplevels(&self) -> impl Iterator<Item = (Object, Material)> + '_ {
        let id = self.id;
        self.toplevels.iter().map(move |&(index, material)| {
            (
                Object {
                    scene: id,
                    index,
                },
                material,
            )
        })
    }

    pub fn is_empty(&self) -> bool {
        self.toplevels.is_empty()
    }

    // --- Evaluation ---

    /// Signed distance from `point` to the object's surface. Negative
    /// inside, positive outside.
    pub fn distance(&self, object: Object, point: Vec3) -> f32 {
        self.check(object);
        self.distance_at(object.index, point)
    }

    fn distance_at(&self, index: u32, point: Vec3) -> f32 {
        match &self.nodes[index as usize] {
            Node::Sphere { radius } => csg::sphere(point, *radius),
            Node::Cube { side } => csg::cube(point, *side),
            Node::Union { left, right } => csg::union(
                self.distance_at(*left, point),
                self.distance_at(*right, point),
            ),
            Node::Intersection { left, right } => csg::intersection(
                self.distance_at(*left, point),
                self.distance_at(*right, point),
            ),
            Node::Difference { left, right } => csg::difference(
                self.distance_at(*left, point),
                self.distance_at(*right, point),
            ),
            Node::Transform {
                child,
                world_to_object,
                ..
            } => {
                let local = world_to_object.transform_point(&Point3::from(point));
                self.distance_at(*child, local.coords)
            }
            Node::Toplevel { child, .. } => self.distance_at(*child, point),
        }
    }

    /// Bounding box of a single object.
    pub fn bounding_box_of(&self, object: Object) -> Aabb {
        self.check(object);
        self.bounding_box_at(object.index)
    }

    /// Bounding box of the whole scene: the union of the top-level
    /// boxes. Requires at least one registered top-level.
    pub fn bounding_box(&self) -> Aabb {
        debug_assert!(!self.toplevels.is_empty(), "scene has no top-level objects");
        self.toplevels
            .iter()
            .map(|&(index, _)| self.bounding_box_at(index))
            .reduce(|a, b| a.merge(&b))
            .unwrap_or(Aabb::new(Vec3::zeros(), Vec3::zeros()))
    }

    fn bounding_box_at(&self, index: u32) -> Aabb {
        match &self.nodes[index as usize] {
            Node::Sphere { radius } => Aabb::cube(2.0 * radius),
            Node::Cube { side } => Aabb::cube(*side),
            // Componentwise min/max of the operand boxes. For the
            // intersection this over-approximates, which is safe: the
            // classifier only needs the box to contain the object.
            Node::Union { left, right } | Node::Intersection { left, right } => self
                .bounding_box_at(*left)
                .merge(&self.bounding_box_at(*right)),
            Node::Difference { left, .. } => self.bounding_box_at(*left),
            Node::Transform {
                child,
                object_to_world,
                ..
            } => transformed_box(object_to_world, self.bounding_box_at(*child)),
            Node::Toplevel { child, .. } => self.bounding_box_at(*child),
        }
    }

    // --- Debug dump ---

    /// Write the top-level objects back out in source-like syntax, one
    /// `build` line per object.
    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        for &(index, material) in &self.toplevels {
            write!(out, "build {} ", material.label())?;
            match &self.nodes[index as usize] {
                Node::Toplevel { child, .. } => self.dump_at(*child, out)?,
                _ => self.dump_at(index, out)?,
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn dump_at(&self, index: u32, out: &mut dyn fmt::Write) -> fmt::Result {
        match &self.nodes[index as usize] {
            Node::Sphere { radius } => write!(out, "sphere({radius})"),
            Node::Cube { side } => write!(out, "cube({side})"),
            Node::Union { left, right } => self.dump_binary("unite", *left, *right, out),
            Node::Intersection { left, right } => {
                self.dump_binary("intersect", *left, *right, out)
            }
            Node::Difference { left, right } => self.dump_binary("subtract", *left, *right, out),
            Node::Transform { child, .. } => {
                out.write_str("transform(matrix..., ")?;
                self.dump_at(*child, out)?;
                out.write_char(')')
            }
            Node::Toplevel { child, .. } => self.dump_at(*child, out),
        }
    }

    fn dump_binary(
        &self,
        name: &str,
        left: u32,
        right: u32,
        out: &mut dyn fmt::Write,
    ) -> fmt::Result {
        write!(out, "{name}(")?;
        self.dump_at(left, out)?;
        out.write_str(", ")?;
        self.dump_at(right, out)?;
        out.write_char(')')
    }
}

/// Axis-aligned box of a transformed axis-aligned box.
///
/// Per-axis projection: each column of the linear part, scaled by the
/// box extents along that axis, contributes its componentwise min/max;
/// the translation column shifts the result.
fn transformed_box(m: &Mat4, bb: Aabb) -> Aabb {
    let translation = Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
    let mut min = translation;
    let mut max = translation;
    for axis in 0..3 {
        let column = Vec3::new(m[(0, axis)], m[(1, axis)], m[(2, axis)]);
        let lo = column * bb.min[axis];
        let hi = column * bb.max[axis];
        min += cmin(lo, hi);
        max += cmax(lo, hi);
    }
    Aabb::new(min, max)
}
