//! Diamond arena geometry shared by the board, the pathfinder and the engine.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::InvalidArgument;

/// Arena size used by the live game.
pub const DEFAULT_ARENA_SIZE: u32 = 28;

/// Largest arena size accepted by [`ArenaSize::new`].
pub const MAX_ARENA_SIZE: u32 = 4096;

/// Location of a single arena cell.
///
/// Coordinates are signed so that neighbours of boundary cells can be probed
/// without underflow; [`ArenaSize::contains`] decides whether a cell is real.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell. Row zero lies on the player's side of the arena.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the cell displaced by the provided offsets.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Computes the Euclidean distance between two cell coordinates.
    #[must_use]
    pub fn distance(self, other: CellCoord) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Validated side length of the square that inscribes the diamond arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ArenaSize(u32);

impl ArenaSize {
    /// Creates an arena size, rejecting zero, odd and oversized values.
    pub fn new(size: u32) -> Result<Self, InvalidArgument> {
        if size == 0 || size % 2 != 0 || size > MAX_ARENA_SIZE {
            return Err(InvalidArgument::ArenaSize(size));
        }

        Ok(Self(size))
    }

    /// Side length of the arena in cells.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Side length as a signed value for coordinate arithmetic.
    #[must_use]
    pub const fn side(self) -> i32 {
        self.0 as i32
    }

    /// Half of the side length; the row that separates the two players.
    #[must_use]
    pub const fn half(self) -> i32 {
        (self.0 / 2) as i32
    }

    /// Reports whether the cell lies inside the diamond.
    #[must_use]
    pub fn contains(self, cell: CellCoord) -> bool {
        let size = self.side();
        let half = self.half();
        let (x, y) = (cell.x(), cell.y());

        if y < half {
            x >= half - y - 1 && x <= half + y
        } else {
            x >= y - half && x <= size - 1 - (y - half)
        }
    }

    /// Number of slots in a dense row-major grid covering the bounding square.
    #[must_use]
    pub fn square_cell_count(self) -> usize {
        let side = self.0 as usize;
        side * side
    }

    /// Dense row-major index of the cell within the bounding square.
    #[must_use]
    pub fn index(self, cell: CellCoord) -> Option<usize> {
        let side = self.side();
        if cell.x() < 0 || cell.y() < 0 || cell.x() >= side || cell.y() >= side {
            return None;
        }

        let column = usize::try_from(cell.x()).ok()?;
        let row = usize::try_from(cell.y()).ok()?;
        Some(row * self.0 as usize + column)
    }

    /// Iterates over every in-bounds cell, column by column.
    pub fn cells(self) -> impl Iterator<Item = CellCoord> {
        let side = self.side();
        (0..side)
            .flat_map(move |x| (0..side).map(move |y| CellCoord::new(x, y)))
            .filter(move |cell| self.contains(*cell))
    }

    /// In-bounds 4-neighbours of the cell in the order `+x, -x, +y, -y`.
    pub fn neighbors(self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        [
            cell.offset(1, 0),
            cell.offset(-1, 0),
            cell.offset(0, 1),
            cell.offset(0, -1),
        ]
        .into_iter()
        .filter(move |neighbor| self.contains(*neighbor))
    }
}

impl Default for ArenaSize {
    fn default() -> Self {
        Self(DEFAULT_ARENA_SIZE)
    }
}

impl TryFrom<u32> for ArenaSize {
    type Error = InvalidArgument;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ArenaSize> for u32 {
    fn from(value: ArenaSize) -> Self {
        value.get()
    }
}

/// Orientation of a single step between adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Movement along the row axis.
    Vertical,
    /// Movement along the column axis.
    Horizontal,
}

/// Cardinal movement directions available to mobile units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward increasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward decreasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// Classifies the step between two cells, or `None` when they are not adjacent.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        if from.manhattan_distance(to) != 1 {
            return None;
        }

        if from.x() == to.x() {
            if to.y() > from.y() {
                Some(Self::Up)
            } else {
                Some(Self::Down)
            }
        } else if to.x() > from.x() {
            Some(Self::Right)
        } else {
            Some(Self::Left)
        }
    }

    /// Axis the direction travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }
}

/// One of the four diagonal boundaries of the arena, named after its corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Edge {
    /// Opponent-side boundary with decreasing columns.
    TopLeft,
    /// Opponent-side boundary with increasing columns.
    TopRight,
    /// Player-side boundary with decreasing columns.
    BottomLeft,
    /// Player-side boundary with increasing columns.
    BottomRight,
}

impl Edge {
    /// Every edge in declaration order.
    pub const ALL: [Edge; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Canonical textual tag of the edge.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::TopLeft => "TOP_LEFT",
            Self::TopRight => "TOP_RIGHT",
            Self::BottomLeft => "BOTTOM_LEFT",
            Self::BottomRight => "BOTTOM_RIGHT",
        }
    }

    /// Signs of the column and row axes pointing into the edge's quadrant.
    #[must_use]
    pub const fn heading(self) -> (i32, i32) {
        match self {
            Self::TopLeft => (-1, 1),
            Self::TopRight => (1, 1),
            Self::BottomLeft => (-1, -1),
            Self::BottomRight => (1, -1),
        }
    }

    /// Ordered boundary cells of the edge, exactly `size / 2` of them.
    #[must_use]
    pub fn cells(self, arena: ArenaSize) -> Vec<CellCoord> {
        let size = arena.side();
        let half = arena.half();

        (0..half)
            .map(|i| match self {
                Self::TopLeft => CellCoord::new(i, half + i),
                Self::TopRight => CellCoord::new(half + i, size - 1 - i),
                Self::BottomLeft => CellCoord::new(i, half - 1 - i),
                Self::BottomRight => CellCoord::new(half + i, i),
            })
            .collect()
    }

    /// Reports whether the cell belongs to the edge.
    #[must_use]
    pub fn contains(self, cell: CellCoord, arena: ArenaSize) -> bool {
        let size = arena.side();
        let half = arena.half();
        let (x, y) = (cell.x(), cell.y());
        let left = (0..half).contains(&x);
        let right = (half..size).contains(&x);

        match self {
            Self::TopLeft => left && y == half + x,
            Self::TopRight => right && y == size - 1 - (x - half),
            Self::BottomLeft => left && y == half - 1 - x,
            Self::BottomRight => right && y == x - half,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomLeft => 2,
            Self::BottomRight => 3,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Edge {
    type Err = InvalidArgument;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|edge| edge.tag() == value)
            .ok_or_else(|| InvalidArgument::UnknownEdge(value.to_owned()))
    }
}

/// Edge cell sequences precomputed once for a given arena size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeTable {
    arena: ArenaSize,
    cells: [Vec<CellCoord>; 4],
}

impl EdgeTable {
    /// Computes the boundary cells of every edge.
    #[must_use]
    pub fn new(arena: ArenaSize) -> Self {
        Self {
            arena,
            cells: Edge::ALL.map(|edge| edge.cells(arena)),
        }
    }

    /// Arena size the table was computed for.
    #[must_use]
    pub const fn arena(&self) -> ArenaSize {
        self.arena
    }

    /// Ordered boundary cells of the edge.
    #[must_use]
    pub fn cells(&self, edge: Edge) -> &[CellCoord] {
        &self.cells[edge.slot()]
    }

    /// Reports whether the cell belongs to the edge.
    #[must_use]
    pub fn contains(&self, edge: Edge, cell: CellCoord) -> bool {
        edge.contains(cell, self.arena)
    }
}
