//! CSG scene voxelization into a linear octree.
//!
//! The pipeline: a scene description (parsed from the small CSG
//! language or built programmatically through [`Scene`]) is voxelized
//! by recursive subdivision driven by signed distance queries, yielding
//! a sorted flat array of packed voxels, the linear octree, which can
//! be exported as an indexed triangle mesh in Wavefront OBJ format.
//!
//! ```
//! use ocmesh::{Material, Octree, Scene};
//!
//! let mut scene = Scene::new();
//! let ball = scene.sphere(50.0);
//! scene.toplevel(ball, Material::new(2));
//!
//! let octree = Octree::from_scene(&scene, 0.1);
//! assert!(!octree.is_empty());
//! ```

pub mod csg;
pub mod math;
pub mod morton;
pub mod obj;
pub mod octree;
pub mod parser;
pub mod scene;
pub mod voxel;

pub use math::{Aabb, Mat4, UVec3, Vec3};
pub use octree::Octree;
pub use parser::{parse, ParseError};
pub use scene::{Object, Scene};
pub use voxel::{Direction, Material, Voxel};
