//! The packed voxel: one cube of the subdivision in a single `u64`.
//!
//! Bit layout, most significant first:
//!
//! ```text
//! | morton (39) | level (4) | material (21) |
//! ```
//!
//! The morton field sits in the high bits on purpose: comparing two
//! voxels by their raw code then orders them along the Z curve first,
//! with coarser voxels (higher level) sorting after the finer voxel
//! that shares their low corner. The linear octree relies on exactly
//! this order for its binary searches, so the field placement is part
//! of the contract, not an implementation detail.
//!
//! `level` is the size exponent: a voxel at level `l` spans `2^l` grid
//! units per edge. Leaves are level 0, the root is level
//! [`Voxel::MAX_LEVEL`]. Well-formed voxels have coordinates aligned to
//! their size, so the low `l` bits of each component are zero and the
//! "don't care" morton digits below the level are zero too.

use std::fmt;

use crate::math::UVec3;
use crate::morton::{morton, unmorton};

/// Per-voxel material label.
///
/// Two labels are reserved: [`Material::UNKNOWN`] marks a voxel the
/// classifier has not decided yet (the octree build subdivides it), and
/// [`Material::VOID`] marks empty space. User labels start at 2.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Material(u32);

impl Material {
    /// Not yet decided; never present in a finished octree.
    pub const UNKNOWN: Material = Material(0);
    /// Outside every object.
    pub const VOID: Material = Material(1);
    /// Largest representable label.
    pub const MAX: u32 = (1 << Voxel::MATERIAL_BITS) - 1;

    pub fn new(label: u32) -> Self {
        debug_assert!(label <= Self::MAX, "material label out of range");
        Material(label)
    }

    pub fn label(self) -> u32 {
        self.0
    }
}

/// One of the six axis-aligned face directions.
///
/// The order matches the normal table of the OBJ emitter: -X, +X, -Y,
/// +Y, -Z, +Z.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Left,
    Right,
    Down,
    Up,
    Back,
    Front,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Left,
        Direction::Right,
        Direction::Down,
        Direction::Up,
        Direction::Back,
        Direction::Front,
    ];

    /// Coordinate index this direction moves along.
    pub fn axis(self) -> usize {
        match self {
            Direction::Left | Direction::Right => 0,
            Direction::Down | Direction::Up => 1,
            Direction::Back | Direction::Front => 2,
        }
    }

    /// True for +X, +Y, +Z.
    pub fn is_positive(self) -> bool {
        matches!(self, Direction::Right | Direction::Up | Direction::Front)
    }
}

/// A cube of the subdivision, packed into 64 bits.
///
/// The all-zero word is the *void voxel*: it names no cube and is used
/// as the "no neighbor across this face" sentinel.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Voxel(u64);

const fn mask(bits: u32) -> u64 {
    (1 << bits) - 1
}

impl Voxel {
    /// Coordinate bits per axis.
    pub const PRECISION: u32 = 13;
    /// Width of the morton field.
    pub const LOCATION_BITS: u32 = 3 * Self::PRECISION;
    /// Width of the level field: enough for levels `0..=PRECISION`.
    pub const LEVEL_BITS: u32 = 4;
    /// Width of the material field: whatever is left of the word.
    pub const MATERIAL_BITS: u32 = 64 - Self::LOCATION_BITS - Self::LEVEL_BITS;

    /// Largest valid coordinate component.
    pub const MAX_COORDINATE: u32 = (1 << Self::PRECISION) - 1;
    /// Level of the root voxel.
    pub const MAX_LEVEL: u8 = Self::PRECISION as u8;

    /// The void voxel.
    pub const VOID: Voxel = Voxel(0);

    /// Pack a voxel from an already interleaved location.
    pub fn new(morton: u64, level: u8, material: Material) -> Self {
        debug_assert!(morton <= mask(Self::LOCATION_BITS), "morton code out of range");
        debug_assert!(level <= Self::MAX_LEVEL, "voxel level out of range");
        Voxel(
            morton << (Self::MATERIAL_BITS + Self::LEVEL_BITS)
                | (level as u64) << Self::MATERIAL_BITS
                | material.label() as u64,
        )
    }

    /// Pack a voxel from unpacked grid coordinates.
    pub fn from_coordinates(coordinates: UVec3, level: u8, material: Material) -> Self {
        debug_assert!(
            coordinates.iter().all(|&c| c <= Self::MAX_COORDINATE),
            "coordinate out of range"
        );
        Self::new(
            morton(coordinates.x, coordinates.y, coordinates.z),
            level,
            material,
        )
    }

    /// Reconstruct a voxel from its raw code.
    pub fn from_code(code: u64) -> Self {
        Voxel(code)
    }

    /// The root voxel: the whole domain, material still undecided.
    pub fn root() -> Self {
        Self::new(0, Self::MAX_LEVEL, Material::UNKNOWN)
    }

    /// The full 64-bit code. Ordering, equality and hashing all reduce
    /// to this value.
    pub fn code(self) -> u64 {
        self.0
    }

    pub fn morton(self) -> u64 {
        self.0 >> (Self::MATERIAL_BITS + Self::LEVEL_BITS)
    }

    pub fn level(self) -> u8 {
        (self.0 >> Self::MATERIAL_BITS & mask(Self::LEVEL_BITS)) as u8
    }

    pub fn material(self) -> Material {
        Material((self.0 & mask(Self::MATERIAL_BITS)) as u32)
    }

    /// Grid coordinates of the low corner.
    pub fn coordinates(self) -> UVec3 {
        let (x, y, z) = unmorton(self.morton());
        UVec3::new(x, y, z)
    }

    /// Edge length in grid units: `2^level`.
    pub fn size(self) -> u32 {
        1 << self.level()
    }

    pub fn is_void(self) -> bool {
        self.0 == 0
    }

    /// Same voxel with the morton field replaced.
    pub fn with_morton(self, morton: u64) -> Self {
        debug_assert!(morton <= mask(Self::LOCATION_BITS), "morton code out of range");
        let low = self.0 & mask(Self::MATERIAL_BITS + Self::LEVEL_BITS);
        Voxel(morton << (Self::MATERIAL_BITS + Self::LEVEL_BITS) | low)
    }

    /// Same voxel with the level field replaced.
    pub fn with_level(self, level: u8) -> Self {
        debug_assert!(level <= Self::MAX_LEVEL, "voxel level out of range");
        let cleared = self.0 & !(mask(Self::LEVEL_BITS) << Self::MATERIAL_BITS);
        Voxel(cleared | (level as u64) << Self::MATERIAL_BITS)
    }

    /// Same voxel with the material field replaced.
    pub fn with_material(self, material: Material) -> Self {
        let cleared = self.0 & !mask(Self::MATERIAL_BITS);
        Voxel(cleared | material.label() as u64)
    }

    /// Same voxel relocated to the given low corner.
    pub fn with_coordinates(self, coordinates: UVec3) -> Self {
        debug_assert!(
            coordinates.iter().all(|&c| c <= Self::MAX_COORDINATE),
            "coordinate out of range"
        );
        self.with_morton(morton(coordinates.x, coordinates.y, coordinates.z))
    }

    /// The eight children, in Z-order.
    ///
    /// In a well-formed location code the morton digits below the
    /// voxel's level are zero, so stepping through the children is a
    /// plain increment of the octal digit at the children's level. The
    /// first child therefore shares the parent's morton code, differing
    /// only in the level field. Children inherit the parent's material.
    pub fn children(self) -> [Voxel; 8] {
        debug_assert!(self.level() > 0, "cannot subdivide a unit voxel");
        let level = self.level() - 1;
        let stride = 1u64 << (3 * level as u32);
        let base = self.morton();
        let material = self.material();
        std::array::from_fn(|k| Voxel::new(base + k as u64 * stride, level, material))
    }

    /// The same-size neighbor across the given face.
    ///
    /// Toward a positive face the query point is the low corner moved by
    /// one full edge; toward a negative face, one grid unit below the
    /// low corner, which is enough because the low corner is the
    /// coordinate origin of the cube. Stepping outside the domain yields
    /// the void voxel.
    ///
    /// The result is hypothetical: it keeps this voxel's level and
    /// material and need not exist in any octree. It is meant as a
    /// search key for [`crate::octree::Octree::neighbor`].
    pub fn neighbor(self, direction: Direction) -> Voxel {
        let step: i64 = if direction.is_positive() {
            self.size() as i64
        } else {
            -1
        };
        let mut coordinates = self.coordinates();
        let moved = coordinates[direction.axis()] as i64 + step;
        if moved < 0 || moved > Self::MAX_COORDINATE as i64 {
            return Voxel::VOID;
        }
        coordinates[direction.axis()] = moved as u32;
        self.with_coordinates(coordinates)
    }

    /// The eight corner coordinates of the cube, in the same Z-order as
    /// [`Voxel::children`]: left/right, then bottom/top, then
    /// back/front.
    pub fn corners(self) -> [UVec3; 8] {
        let origin = self.coordinates();
        let size = self.size();
        std::array::from_fn(|k| {
            let k = k as u32;
            origin + size * UVec3::new(k & 1, k >> 1 & 1, k >> 2 & 1)
        })
    }
}

impl fmt::Debug for Voxel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.coordinates();
        f.debug_struct("Voxel")
            .field("coordinates", &(c.x, c.y, c.z))
            .field("level", &self.level())
            .field("material", &self.material().label())
            .finish()
    }
}
