use approx::assert_relative_eq;
use ocmesh::{Material, Scene, Vec3};

#[test]
fn primitive_distances() {
    let mut scene = Scene::new();
    let ball = scene.sphere(42.0);
    let block = scene.cube(42.0);

    assert_relative_eq!(scene.distance(ball, Vec3::zeros()), -42.0);
    assert_relative_eq!(scene.distance(ball, Vec3::new(43.0, 0.0, 0.0)), 1.0);

    assert_relative_eq!(scene.distance(block, Vec3::zeros()), -21.0);
    assert_relative_eq!(scene.distance(block, Vec3::new(21.0, 21.0, 21.0)), 0.0);
    assert_relative_eq!(scene.distance(block, Vec3::new(22.0, 21.0, 21.0)), 1.0);
}

#[test]
fn boolean_distances() {
    let mut scene = Scene::new();
    let a = scene.sphere(10.0);
    let b = scene.translate(Vec3::new(15.0, 0.0, 0.0), a);

    let both = scene.unite(a, b);
    assert!(scene.distance(both, Vec3::zeros()) < 0.0);
    assert!(scene.distance(both, Vec3::new(15.0, 0.0, 0.0)) < 0.0);

    let overlap = scene.intersect(a, b);
    assert!(scene.distance(overlap, Vec3::new(7.5, 0.0, 0.0)) < 0.0);
    assert!(scene.distance(overlap, Vec3::zeros()) > 0.0);

    let crescent = scene.subtract(a, b);
    assert!(scene.distance(crescent, Vec3::new(-7.0, 0.0, 0.0)) < 0.0);
    assert!(scene.distance(crescent, Vec3::new(7.0, 0.0, 0.0)) > 0.0);
}

#[test]
fn translate_moves_the_interior() {
    let mut scene = Scene::new();
    let ball = scene.sphere(5.0);
    let moved = scene.translate(Vec3::new(10.0, 0.0, 0.0), ball);

    assert!(scene.distance(moved, Vec3::new(10.0, 0.0, 0.0)) < 0.0);
    assert!(scene.distance(moved, Vec3::zeros()) > 0.0);
}

#[test]
fn scale_stretches_one_axis() {
    let mut scene = Scene::new();
    let ball = scene.sphere(1.0);
    let cigar = scene.scale3(Vec3::new(4.0, 1.0, 1.0), ball);

    assert!(scene.distance(cigar, Vec3::new(3.9, 0.0, 0.0)) < 0.0);
    assert!(scene.distance(cigar, Vec3::new(0.0, 1.1, 0.0)) > 0.0);
}

#[test]
fn rotate_carries_the_interior_around() {
    let mut scene = Scene::new();
    let ball = scene.sphere(1.0);
    let arm = scene.translate(Vec3::new(10.0, 0.0, 0.0), ball);
    let up = scene.rotate(90.0, Vec3::new(0.0, 0.0, 1.0), arm);

    assert!(scene.distance(up, Vec3::new(0.0, 10.0, 0.0)) < 0.0);
    assert!(scene.distance(up, Vec3::new(10.0, 0.0, 0.0)) > 0.0);
}

#[test]
fn primitive_bounding_boxes_are_cubes() {
    let mut scene = Scene::new();
    let ball = scene.sphere(7.0);
    let block = scene.cube(4.0);

    let bb = scene.bounding_box_of(ball);
    assert_relative_eq!(bb.side(), 14.0);
    assert_relative_eq!(bb.min.x, -7.0);

    let bb = scene.bounding_box_of(block);
    assert_relative_eq!(bb.side(), 4.0);
}

#[test]
fn transformed_bounding_box_encloses_the_rotated_cube() {
    let mut scene = Scene::new();
    let block = scene.cube(2.0);
    let tilted = scene.rotate(45.0, Vec3::new(0.0, 0.0, 1.0), block);

    // A unit-half cube rotated 45 degrees about Z projects to sqrt(2)
    // on X and Y and stays 1 on Z.
    let bb = scene.bounding_box_of(tilted);
    let sqrt2 = 2.0_f32.sqrt();
    assert_relative_eq!(bb.min.x, -sqrt2, epsilon = 1e-4);
    assert_relative_eq!(bb.max.y, sqrt2, epsilon = 1e-4);
    assert_relative_eq!(bb.max.z, 1.0, epsilon = 1e-4);
}

#[test]
fn translated_bounding_box_shifts() {
    let mut scene = Scene::new();
    let ball = scene.sphere(5.0);
    let moved = scene.translate(Vec3::new(10.0, -2.0, 0.0), ball);

    let bb = scene.bounding_box_of(moved);
    assert_relative_eq!(bb.min.x, 5.0);
    assert_relative_eq!(bb.max.x, 15.0);
    assert_relative_eq!(bb.min.y, -7.0);
}

#[test]
fn difference_keeps_the_left_box() {
    let mut scene = Scene::new();
    let big = scene.sphere(10.0);
    let bite = scene.translate(Vec3::new(50.0, 0.0, 0.0), big);
    let carved = scene.subtract(big, bite);

    let bb = scene.bounding_box_of(carved);
    assert_relative_eq!(bb.side(), 20.0);
    assert_relative_eq!(bb.max.x, 10.0);
}

#[test]
fn scene_bounding_box_unions_toplevels() {
    let mut scene = Scene::new();
    let ball = scene.sphere(10.0);
    let left = scene.translate(Vec3::new(-30.0, 0.0, 0.0), ball);
    let right = scene.translate(Vec3::new(30.0, 0.0, 0.0), ball);
    scene.toplevel(left, Material::new(2));
    scene.toplevel(right, Material::new(3));

    let bb = scene.bounding_box();
    assert_relative_eq!(bb.min.x, -40.0);
    assert_relative_eq!(bb.max.x, 40.0);
    assert_relative_eq!(bb.side(), 80.0);
}

#[test]
fn toplevels_keep_registration_order() {
    let mut scene = Scene::new();
    let a = scene.sphere(1.0);
    let b = scene.cube(1.0);
    scene.toplevel(b, Material::new(5));
    scene.toplevel(a, Material::new(2));

    let materials: Vec<u32> = scene
        .toplevels()
        .map(|(_, material)| material.label())
        .collect();
    assert_eq!(materials, vec![5, 2]);
}

#[test]
fn handles_are_shareable() {
    // The same node can appear in several parents without copies.
    let mut scene = Scene::new();
    let ball = scene.sphere(10.0);
    let shifted = scene.translate(Vec3::new(5.0, 0.0, 0.0), ball);
    let lens = scene.intersect(ball, shifted);

    assert!(scene.distance(lens, Vec3::new(2.5, 0.0, 0.0)) < 0.0);
    assert!(scene.distance(lens, Vec3::new(-8.0, 0.0, 0.0)) > 0.0);
}

#[test]
fn dump_round_describes_the_scene() {
    let mut scene = Scene::new();
    let a = scene.sphere(10.0);
    let b = scene.cube(4.0);
    let merged = scene.unite(a, b);
    scene.toplevel(merged, Material::new(2));

    let mut text = String::new();
    scene.dump(&mut text).unwrap();
    assert_eq!(text, "build 2 unite(sphere(10), cube(4))\n");
}
