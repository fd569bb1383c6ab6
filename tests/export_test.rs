//! End-to-end: source text through voxelization to OBJ output.

use ocmesh::obj::write_obj;
use ocmesh::{parse, Material, Octree};

fn obj_text(source: &str, precision: f32) -> (Octree, String) {
    let scene = parse(source).unwrap();
    let octree = Octree::from_scene(&scene, precision);
    let mut buf = Vec::new();
    write_obj(&octree, &mut buf).unwrap();
    (octree, String::from_utf8(buf).unwrap())
}

#[test]
fn sphere_scene_produces_a_consistent_mesh() {
    let (octree, text) = obj_text(
        "object ball = sphere(50)
         material stone
         build ball stone
        ",
        0.1,
    );

    let solid = octree
        .voxels()
        .iter()
        .filter(|v| v.material() != Material::VOID)
        .count();
    assert!(solid > 0);

    let v = text.lines().filter(|l| l.starts_with("v ")).count();
    let vn = text.lines().filter(|l| l.starts_with("vn ")).count();
    let f = text.lines().filter(|l| l.starts_with("f ")).count();
    assert_eq!(v, 8 * solid);
    assert_eq!(vn, 6);
    assert_eq!(f, 12 * solid);
}

#[test]
fn face_indices_stay_in_range() {
    let (_, text) = obj_text(
        "object block = cube(80)
         material wood
         build block wood
        ",
        0.25,
    );

    let vertex_count = text.lines().filter(|l| l.starts_with("v ")).count();
    for line in text.lines().filter(|l| l.starts_with("f ")) {
        for part in line.split_whitespace().skip(1) {
            let (vertex, normal) = part.split_once("//").unwrap();
            let vertex: usize = vertex.parse().unwrap();
            let normal: usize = normal.parse().unwrap();
            assert!(vertex >= 1 && vertex <= vertex_count);
            assert!((1..=6).contains(&normal));
        }
    }
}

#[test]
fn all_void_scene_writes_an_empty_mesh() {
    // A sphere inscribed in its own bounding box at the coarsest
    // precision collapses to a single void root voxel.
    let (octree, text) = obj_text(
        "object ball = sphere(50)
         material stone
         build ball stone
        ",
        1.0,
    );
    assert_eq!(octree.len(), 1);
    assert!(text.lines().all(|l| l.starts_with("vn ")));
}

#[test]
fn vertices_are_grid_coordinates() {
    let (octree, text) = obj_text(
        "object block = cube(100)
         material wood
         build block wood
        ",
        1.0,
    );
    assert_eq!(octree.len(), 1);

    // The single solid voxel is the root: corners at 0 and 8192.
    let corners: Vec<&str> = text.lines().filter(|l| l.starts_with("v ")).collect();
    assert_eq!(corners.len(), 8);
    assert_eq!(corners[0], "v 0 0 0");
    assert_eq!(corners[7], "v 8192 8192 8192");
}
