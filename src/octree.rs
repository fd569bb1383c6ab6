//! The linear octree: a sorted flat array of packed voxels.
//!
//! There is no pointer structure. The tree shape is implicit in the
//! voxel codes: sorting by code is a pre-order Z-curve traversal, and
//! every containment or adjacency query becomes a binary search. The
//! build is a single pass over a growing array that subdivides in
//! place, with the sort deferred to the end so appending children stays
//! O(1) amortized.

use tracing::{debug, info};

use crate::math::{Mat4, UVec3, Vec3};
use crate::scene::{Object, Scene};
use crate::voxel::{Direction, Material, Voxel};

/// How a voxel relates to one object's surface.
enum Intersection {
    Inside,
    Outside,
    AtIntersection,
}

/// A voxelized volume: sorted voxels plus the grid-to-world transform
/// captured when the octree was built from a scene.
pub struct Octree {
    data: Vec<Voxel>,
    grid_to_world: Mat4,
}

impl Default for Octree {
    fn default() -> Self {
        Self::new()
    }
}

impl Octree {
    /// An empty octree in grid units.
    pub fn new() -> Self {
        Octree {
            data: Vec::new(),
            grid_to_world: Mat4::identity(),
        }
    }

    /// The voxels, sorted by code.
    pub fn voxels(&self) -> &[Voxel] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Maps grid coordinates to the world space of the scene this
    /// octree was built from. Identity for predicate-built octrees.
    pub fn grid_to_world(&self) -> &Mat4 {
        &self.grid_to_world
    }

    /// Build the octree by repeated subdivision, classifying every
    /// voxel with `split`.
    ///
    /// `split` returns the material of the voxel, or
    /// [`Material::UNKNOWN`] to request subdivision. It must not return
    /// UNKNOWN for a unit voxel, and it must depend only on its
    /// argument: while the build runs the octree is unsorted and
    /// partially classified, so there is nothing coherent for it to
    /// consult.
    pub fn build(&mut self, mut split: impl FnMut(Voxel) -> Material) {
        self.data.clear();
        self.data.push(Voxel::root());

        let mut i = 0;
        while i < self.data.len() {
            let v = self.data[i];
            let material = split(v);

            if v.level() > 0 && material == Material::UNKNOWN {
                // Subdivide in place: the first child overwrites this
                // slot, so the same index is examined again on the next
                // iteration.
                let children = v.children();
                self.data[i] = children[0];
                self.data.extend_from_slice(&children[1..]);
            } else {
                debug_assert!(
                    material != Material::UNKNOWN,
                    "split function failed to classify a unit voxel"
                );
                self.data[i] = v.with_material(material);
                i += 1;
            }
        }

        self.data.sort_unstable();

        debug_assert!(
            self.data.windows(2).all(|w| w[0] < w[1]),
            "voxel codes must be strictly increasing"
        );
        debug_assert!(
            self.data.iter().all(|v| v.material() != Material::UNKNOWN),
            "finished octree must not contain unclassified voxels"
        );
        debug!(voxels = self.data.len(), "octree build complete");
    }

    /// Build an octree from a scene's top-level objects.
    ///
    /// `precision` in `(0, 1]` is the smallest voxel edge the build may
    /// refine down to, as a fraction of the scene bounding box side.
    /// Voxels are classified against each top-level in registration
    /// order: the first object whose interior claims the voxel assigns
    /// its material, a surface-straddling voxel subdivides, and a voxel
    /// outside every object becomes [`Material::VOID`].
    pub fn from_scene(scene: &Scene, precision: f32) -> Octree {
        debug_assert!(
            precision > 0.0 && precision <= 1.0,
            "precision must be in (0, 1]"
        );

        let bounds = scene.bounding_box();
        let side = bounds.side();
        let unit = side / (1u32 << Voxel::PRECISION) as f32;
        let toplevels: Vec<(Object, Material)> = scene.toplevels().collect();

        let mut octree = Octree::new();
        octree.grid_to_world =
            Mat4::new_translation(&bounds.min) * Mat4::new_scaling(unit);

        octree.build(|v| {
            for &(object, material) in &toplevels {
                match classify(scene, object, v, bounds.min, unit, precision * side) {
                    Intersection::Inside => return material,
                    Intersection::AtIntersection => return Material::UNKNOWN,
                    Intersection::Outside => {}
                }
            }
            Material::VOID
        });

        info!(
            voxels = octree.data.len(),
            side,
            precision,
            "scene voxelized"
        );
        octree
    }

    /// The voxel of this octree adjacent to `data[index]` across the
    /// given face.
    ///
    /// Works by forming the hypothetical same-size neighbor and running
    /// a lower-bound search for it: a coarser voxel whose low corner
    /// coincides with the probe's sorts at or after the probe thanks to
    /// its larger level field, so the search lands on it. Returns
    /// `None` when the face lies on the domain boundary.
    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        let candidate = self.data[index].neighbor(direction);
        if candidate.is_void() {
            return None;
        }
        let position = self.data.partition_point(|v| *v < candidate);
        (position < self.data.len()).then_some(position)
    }

    /// Neighbor across an edge: the neighbor along `first`, then
    /// `second` from there.
    pub fn edge_neighbor(
        &self,
        index: usize,
        first: Direction,
        second: Direction,
    ) -> Option<usize> {
        self.neighbor(index, first)
            .and_then(|next| self.neighbor(next, second))
    }

    /// The voxel whose extent contains the given grid point.
    pub fn find(&self, point: UVec3) -> Option<usize> {
        let key = Voxel::from_coordinates(point, 0, Material::UNKNOWN);
        let position = self.data.partition_point(|v| *v < key);
        // The container either sits at the insertion point (shared low
        // corner) or just before it (strictly smaller morton prefix).
        for candidate in [position, position.wrapping_sub(1)] {
            if let Some(v) = self.data.get(candidate) {
                if contains(*v, point) {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

fn contains(v: Voxel, point: UVec3) -> bool {
    let origin = v.coordinates();
    let size = v.size();
    (0..3).all(|axis| point[axis] >= origin[axis] && point[axis] < origin[axis] + size)
}

/// Classify one voxel against one top-level object.
///
/// The probe is the voxel's low-corner world position. A voxel refines
/// while the probe lies within half the cube diagonal of the surface
/// and the cube edge still exceeds the precision floor; otherwise the
/// sign of the distance decides.
fn classify(
    scene: &Scene,
    object: Object,
    v: Voxel,
    origin: Vec3,
    unit: f32,
    smallest_side: f32,
) -> Intersection {
    let c = v.coordinates();
    let probe = Vec3::new(c.x as f32, c.y as f32, c.z as f32) * unit + origin;
    let world_side = v.size() as f32 * unit;
    let diagonal = 3.0_f32.sqrt() * world_side;

    let d = scene.distance(object, probe);

    if d.abs() < diagonal / 2.0 && world_side > smallest_side {
        Intersection::AtIntersection
    } else if d <= 0.0 {
        Intersection::Inside
    } else {
        Intersection::Outside
    }
}
