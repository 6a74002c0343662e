//! # Bitmask Autotiling
//!
//! Selects the edge/corner variant of an occupied cell from its 8 neighbors.
//!
//! ## Mask Layout
//!
//! ```text
//!   1 |  2 |   4        NW | N | NE
//!  ---+----+----       ----+---+----
//!   8 |  * |  16         W | * | E
//!  ---+----+----       ----+---+----
//!  32 | 64 | 128        SW | S | SE
//! ```
//!
//! A diagonal contributes only when **both** orthogonal neighbors sharing its
//! corner are occupied. This leaves exactly 47 reachable masks, including 0
//! for an isolated cell, mapped to variant indices 1 to 47.

/// Index into the autotile sheet (1 to 47; slot 0 is unused).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileVariant(u8);

impl TileVariant {
    /// The fully enclosed variant (mask 255).
    pub const ENCLOSED: Self = Self(46);
    /// The isolated variant (mask 0).
    pub const ISOLATED: Self = Self(47);

    /// Returns the sheet index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Gated mask value to variant index, in ascending mask order.
const BITMASK_TO_VARIANT: [(u8, u8); 47] = [
    (0, 47),
    (2, 1),
    (8, 2),
    (10, 3),
    (11, 4),
    (16, 5),
    (18, 6),
    (22, 7),
    (24, 8),
    (26, 9),
    (27, 10),
    (30, 11),
    (31, 12),
    (64, 13),
    (66, 14),
    (72, 15),
    (74, 16),
    (75, 17),
    (80, 18),
    (82, 19),
    (86, 20),
    (88, 21),
    (90, 22),
    (91, 23),
    (94, 24),
    (95, 25),
    (104, 26),
    (106, 27),
    (107, 28),
    (120, 29),
    (122, 30),
    (123, 31),
    (126, 32),
    (127, 33),
    (208, 34),
    (210, 35),
    (214, 36),
    (216, 37),
    (218, 38),
    (219, 39),
    (222, 40),
    (223, 41),
    (248, 42),
    (250, 43),
    (251, 44),
    (254, 45),
    (255, 46),
];

/// Marks a mask with no variant.
const UNMAPPED: u8 = u8::MAX;

/// Direct-indexed lookup built at compile time.
const LOOKUP: [u8; 256] = build_lookup();

const fn build_lookup() -> [u8; 256] {
    let mut table = [UNMAPPED; 256];
    let mut i = 0;
    while i < BITMASK_TO_VARIANT.len() {
        let (mask, variant) = BITMASK_TO_VARIANT[i];
        table[mask as usize] = variant;
        i += 1;
    }
    table
}

/// Occupancy of the 8 cells around a candidate cell.
///
/// North is `y + 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct Neighbors {
    /// `(x, y + 1)`
    pub n: bool,
    /// `(x + 1, y + 1)`
    pub ne: bool,
    /// `(x + 1, y)`
    pub e: bool,
    /// `(x + 1, y - 1)`
    pub se: bool,
    /// `(x, y - 1)`
    pub s: bool,
    /// `(x - 1, y - 1)`
    pub sw: bool,
    /// `(x - 1, y)`
    pub w: bool,
    /// `(x - 1, y + 1)`
    pub nw: bool,
}

impl Neighbors {
    /// All eight neighbors occupied.
    pub const ALL: Self = Self {
        n: true,
        ne: true,
        e: true,
        se: true,
        s: true,
        sw: true,
        w: true,
        nw: true,
    };

    /// Samples the neighbors of `(x, y)` through an occupancy query.
    pub fn sample(x: i32, y: i32, occupied: impl Fn(i32, i32) -> bool) -> Self {
        Self {
            n: occupied(x, y + 1),
            ne: occupied(x + 1, y + 1),
            e: occupied(x + 1, y),
            se: occupied(x + 1, y - 1),
            s: occupied(x, y - 1),
            sw: occupied(x - 1, y - 1),
            w: occupied(x - 1, y),
            nw: occupied(x - 1, y + 1),
        }
    }

    /// Builds from an ungated 8-bit pattern (bit weights as in the layout).
    ///
    /// The pattern may contain unsupported diagonals; [`Neighbors::mask`]
    /// gates them.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            nw: bits & 1 != 0,
            n: bits & 2 != 0,
            ne: bits & 4 != 0,
            w: bits & 8 != 0,
            e: bits & 16 != 0,
            sw: bits & 32 != 0,
            s: bits & 64 != 0,
            se: bits & 128 != 0,
        }
    }

    /// Computes the gated mask.
    #[must_use]
    pub const fn mask(self) -> u8 {
        let mut mask = 0;
        if self.n {
            mask |= 2;
        }
        if self.w {
            mask |= 8;
        }
        if self.e {
            mask |= 16;
        }
        if self.s {
            mask |= 64;
        }
        if self.nw && self.n && self.w {
            mask |= 1;
        }
        if self.ne && self.n && self.e {
            mask |= 4;
        }
        if self.sw && self.s && self.w {
            mask |= 32;
        }
        if self.se && self.s && self.e {
            mask |= 128;
        }
        mask
    }
}

/// Looks up the variant of a mask, or `None` for an untabulated mask.
#[inline]
#[must_use]
pub const fn variant_for_mask(mask: u8) -> Option<TileVariant> {
    match LOOKUP[mask as usize] {
        UNMAPPED => None,
        variant => Some(TileVariant(variant)),
    }
}

/// Resolves the variant of an occupied cell.
///
/// # Panics
///
/// Panics if the gated mask is untabulated. The gating in
/// [`Neighbors::mask`] makes that unreachable; a panic here means the gating
/// is broken.
#[inline]
#[must_use]
pub fn resolve(neighbors: Neighbors) -> TileVariant {
    let mask = neighbors.mask();
    match variant_for_mask(mask) {
        Some(variant) => variant,
        None => panic!("bitmask {mask} has no tile variant ({neighbors:?})"),
    }
}

/// Resolves a cell: `None` when unoccupied, otherwise its variant.
#[inline]
#[must_use]
pub fn resolve_cell(occupied: bool, neighbors: Neighbors) -> Option<TileVariant> {
    occupied.then(|| resolve(neighbors))
}
