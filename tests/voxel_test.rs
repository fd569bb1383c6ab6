use ocmesh::morton::morton;
use ocmesh::{Direction, Material, UVec3, Voxel};

#[test]
fn voxel_is_one_word() {
    assert_eq!(std::mem::size_of::<Voxel>(), 8);
    assert_eq!(
        Voxel::LOCATION_BITS + Voxel::LEVEL_BITS + Voxel::MATERIAL_BITS,
        64
    );
}

#[test]
fn packing_round_trips() {
    let m = morton(96, 160, 1024);
    let v = Voxel::new(m, 5, Material::new(7));
    assert_eq!(v.morton(), m);
    assert_eq!(v.level(), 5);
    assert_eq!(v.material(), Material::new(7));
    assert_eq!(v.coordinates(), UVec3::new(96, 160, 1024));
    assert_eq!(v.size(), 32);
}

#[test]
fn updaters_touch_one_field() {
    let v = Voxel::from_coordinates(UVec3::new(64, 128, 256), 6, Material::new(9));

    let relabeled = v.with_material(Material::new(3));
    assert_eq!(relabeled.material(), Material::new(3));
    assert_eq!(relabeled.morton(), v.morton());
    assert_eq!(relabeled.level(), v.level());

    let releveled = v.with_level(7);
    assert_eq!(releveled.level(), 7);
    assert_eq!(releveled.morton(), v.morton());
    assert_eq!(releveled.material(), v.material());

    let moved = v.with_coordinates(UVec3::new(0, 0, 512));
    assert_eq!(moved.coordinates(), UVec3::new(0, 0, 512));
    assert_eq!(moved.level(), v.level());
    assert_eq!(moved.material(), v.material());

    let rehomed = v.with_morton(0);
    assert_eq!(rehomed.morton(), 0);
    assert_eq!(rehomed.level(), v.level());
    assert_eq!(rehomed.material(), v.material());
}

#[test]
fn root_spans_the_domain() {
    let root = Voxel::root();
    assert_eq!(root.coordinates(), UVec3::zeros());
    assert_eq!(root.level(), Voxel::MAX_LEVEL);
    assert_eq!(root.size(), Voxel::MAX_COORDINATE + 1);
    assert_eq!(root.material(), Material::UNKNOWN);
}

#[test]
fn children_tile_the_parent() {
    let parent = Voxel::from_coordinates(UVec3::new(1024, 0, 2048), 10, Material::new(2));
    let children = parent.children();

    let child_size = parent.size() / 2;
    let mut volume = 0u64;
    for (k, child) in children.iter().enumerate() {
        assert_eq!(child.level(), parent.level() - 1);
        assert_eq!(child.material(), parent.material());
        assert_eq!(child.size(), child_size);

        // Child k sits at the parent's corner k.
        let k = k as u32;
        let expected = parent.coordinates()
            + child_size * UVec3::new(k & 1, k >> 1 & 1, k >> 2 & 1);
        assert_eq!(child.coordinates(), expected);

        volume += u64::from(child_size).pow(3);
    }
    assert_eq!(volume, u64::from(parent.size()).pow(3));

    // Strictly increasing codes, first child shares the parent's corner.
    assert!(children.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(children[0].morton(), parent.morton());
}

#[test]
fn child_codes_step_by_the_child_cell_volume() {
    let parent = Voxel::root();
    let children = parent.children();
    let stride = 1u64 << (3 * (Voxel::MAX_LEVEL as u32 - 1));
    for (k, child) in children.iter().enumerate() {
        assert_eq!(child.morton(), parent.morton() + k as u64 * stride);
    }
}

#[test]
fn neighbor_keeps_level_and_material() {
    let v = Voxel::from_coordinates(UVec3::new(512, 1024, 256), 8, Material::new(4));

    let right = v.neighbor(Direction::Right);
    assert_eq!(right.coordinates(), UVec3::new(512 + 256, 1024, 256));
    assert_eq!(right.level(), v.level());
    assert_eq!(right.material(), v.material());

    let down = v.neighbor(Direction::Down);
    assert_eq!(down.coordinates(), UVec3::new(512, 1023, 256));
    assert_eq!(down.level(), v.level());

    let front = v.neighbor(Direction::Front);
    assert_eq!(front.coordinates(), UVec3::new(512, 1024, 512));
}

#[test]
fn neighbor_past_the_boundary_is_void() {
    let root = Voxel::root();
    for direction in Direction::ALL {
        assert!(root.neighbor(direction).is_void(), "{direction:?}");
    }

    let origin = Voxel::from_coordinates(UVec3::zeros(), 0, Material::new(2));
    assert!(origin.neighbor(Direction::Left).is_void());
    assert!(origin.neighbor(Direction::Down).is_void());
    assert!(origin.neighbor(Direction::Back).is_void());
    assert!(!origin.neighbor(Direction::Right).is_void());

    let far = Voxel::from_coordinates(
        UVec3::new(Voxel::MAX_COORDINATE, 0, 0),
        0,
        Material::new(2),
    );
    assert!(far.neighbor(Direction::Right).is_void());
    assert!(!far.neighbor(Direction::Left).is_void());
}

#[test]
fn corners_follow_child_order() {
    let v = Voxel::from_coordinates(UVec3::new(8, 16, 32), 3, Material::new(2));
    let corners = v.corners();
    assert_eq!(corners[0], UVec3::new(8, 16, 32));
    assert_eq!(corners[1], UVec3::new(16, 16, 32));
    assert_eq!(corners[2], UVec3::new(8, 24, 32));
    assert_eq!(corners[3], UVec3::new(16, 24, 32));
    assert_eq!(corners[4], UVec3::new(8, 16, 40));
    assert_eq!(corners[7], UVec3::new(16, 24, 40));
}

#[test]
fn code_order_is_z_order_with_coarser_last() {
    // Two voxels sharing a low corner: the finer one sorts first.
    let fine = Voxel::from_coordinates(UVec3::zeros(), 0, Material::new(2));
    let coarse = Voxel::from_coordinates(UVec3::zeros(), 1, Material::new(2));
    assert!(fine < coarse);

    // Different corners: pure Z-order, regardless of level.
    let a = Voxel::from_coordinates(UVec3::new(0, 0, 0), 12, Material::new(2));
    let b = Voxel::from_coordinates(UVec3::new(4096, 0, 0), 0, Material::new(2));
    assert!(a < b);
}
