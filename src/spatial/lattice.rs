//! Lattice topologies mapping cell coordinates to linear indices
//!
//! A lattice supplies the coordinate codec, the neighbour offset table, and
//! the opposite-direction lookup that the solver shares between its 2D and 3D
//! instantiations. Coordinates are signed so that a raw neighbour step can be
//! tested against a boundary predicate before toroidal wrapping.

/// Neighbour x offsets for the four 2D directions
const DX2: [i32; 4] = [-1, 0, 1, 0];
/// Neighbour y offsets for the four 2D directions
const DY2: [i32; 4] = [0, 1, 0, -1];
/// Opposite-direction lookup for the 2D offset table
const OPPOSITE2: [usize; 4] = [2, 3, 0, 1];

/// Neighbour x offsets for the six 3D directions
const DX3: [i32; 6] = [-1, 0, 1, 0, 0, 0];
/// Neighbour y offsets for the six 3D directions
const DY3: [i32; 6] = [0, 1, 0, -1, 0, 0];
/// Neighbour z offsets for the six 3D directions
const DZ3: [i32; 6] = [0, 0, 0, 0, 1, -1];
/// Opposite-direction lookup for the 3D offset table
const OPPOSITE3: [usize; 6] = [2, 3, 0, 1, 5, 4];

/// Topology strategy shared by the generic solver
///
/// Implementations are small copyable value types; the solver treats them as
/// pure coordinate arithmetic with no state of their own.
pub trait Lattice: Copy {
    /// Signed coordinate tuple for one cell
    type Coords: Copy + std::fmt::Debug + PartialEq;

    /// Number of neighbour directions (4 for 2D, 6 for 3D)
    const DIRECTION_COUNT: usize;

    /// Total number of cells in the lattice
    fn cell_count(&self) -> usize;

    /// Linear index of in-range coordinates
    fn index_of(&self, coords: Self::Coords) -> usize;

    /// Coordinates of a linear index
    fn coords_of(&self, index: usize) -> Self::Coords;

    /// Raw neighbour coordinates one step in `direction`, without wrapping
    fn step(coords: Self::Coords, direction: usize) -> Self::Coords;

    /// Wrap coordinates toroidally into the lattice range
    fn wrap(&self, coords: Self::Coords) -> Self::Coords;

    /// Direction pointing back along `direction`
    fn opposite(direction: usize) -> usize;
}

/// 2D lattice of `width` x `height` cells with 4 neighbour directions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid2 {
    /// Cells along the x axis
    pub width: usize,
    /// Cells along the y axis
    pub height: usize,
}

impl Grid2 {
    /// Create a 2D lattice
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

impl Lattice for Grid2 {
    type Coords = [i32; 2];

    const DIRECTION_COUNT: usize = 4;

    fn cell_count(&self) -> usize {
        self.width * self.height
    }

    fn index_of(&self, coords: Self::Coords) -> usize {
        coords[0] as usize + coords[1] as usize * self.width
    }

    fn coords_of(&self, index: usize) -> Self::Coords {
        [(index % self.width) as i32, (index / self.width) as i32]
    }

    fn step(coords: Self::Coords, direction: usize) -> Self::Coords {
        let dx = DX2.get(direction).copied().unwrap_or(0);
        let dy = DY2.get(direction).copied().unwrap_or(0);
        [coords[0] + dx, coords[1] + dy]
    }

    fn wrap(&self, coords: Self::Coords) -> Self::Coords {
        [
            wrap_axis(coords[0], self.width),
            wrap_axis(coords[1], self.height),
        ]
    }

    fn opposite(direction: usize) -> usize {
        OPPOSITE2.get(direction).copied().unwrap_or(direction)
    }
}

/// 3D lattice of `width` x `height` x `depth` cells with 6 neighbour directions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid3 {
    /// Cells along the x axis
    pub width: usize,
    /// Cells along the y axis
    pub height: usize,
    /// Cells along the z axis
    pub depth: usize,
}

impl Grid3 {
    /// Create a 3D lattice
    pub const fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

impl Lattice for Grid3 {
    type Coords = [i32; 3];

    const DIRECTION_COUNT: usize = 6;

    fn cell_count(&self) -> usize {
        self.width * self.height * self.depth
    }

    fn index_of(&self, coords: Self::Coords) -> usize {
        coords[0] as usize
            + coords[1] as usize * self.width
            + coords[2] as usize * self.width * self.height
    }

    fn coords_of(&self, index: usize) -> Self::Coords {
        [
            (index % self.width) as i32,
            ((index / self.width) % self.height) as i32,
            (index / (self.width * self.height)) as i32,
        ]
    }

    fn step(coords: Self::Coords, direction: usize) -> Self::Coords {
        let dx = DX3.get(direction).copied().unwrap_or(0);
        let dy = DY3.get(direction).copied().unwrap_or(0);
        let dz = DZ3.get(direction).copied().unwrap_or(0);
        [coords[0] + dx, coords[1] + dy, coords[2] + dz]
    }

    fn wrap(&self, coords: Self::Coords) -> Self::Coords {
        [
            wrap_axis(coords[0], self.width),
            wrap_axis(coords[1], self.height),
            wrap_axis(coords[2], self.depth),
        ]
    }

    fn opposite(direction: usize) -> usize {
        OPPOSITE3.get(direction).copied().unwrap_or(direction)
    }
}

/// Fold a single-step out-of-range coordinate back into `[0, extent)`
///
/// Neighbour steps move at most one cell, so one correction suffices.
const fn wrap_axis(value: i32, extent: usize) -> i32 {
    let extent = extent as i32;
    if value < 0 {
        value + extent
    } else if value >= extent {
        value - extent
    } else {
        value
    }
}
