//! Mobile units taking part in an attack.

use std::collections::BTreeSet;

use breach_sim_core::{
    ArenaSize, Axis, CellCoord, Edge, PlayerSide, Spawn, UnitCatalog, UnitKind, UnitStats,
};
use thiserror::Error;

/// Reasons a spawn request may be rejected by the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The start cell lies outside the diamond arena.
    #[error("spawn cell {0} is outside the arena")]
    OutOfBounds(CellCoord),
    /// Only mobile kinds can be spawned.
    #[error("{0} is not a mobile unit")]
    NotMobile(UnitKind),
    /// The kind's configured speed does not allow it to move.
    #[error("{0} has no positive speed")]
    Immobile(UnitKind),
}

/// Cache key shared by units that always follow the same path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct PathKey {
    kind: UnitKind,
    start: CellCoord,
    edge: Edge,
}

/// Mobile unit walking toward a target edge.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackUnit {
    pub(crate) kind: UnitKind,
    pub(crate) stats: UnitStats,
    pub(crate) owner: PlayerSide,
    pub(crate) start: CellCoord,
    pub(crate) edge: Edge,
    pub(crate) cell: CellCoord,
    pub(crate) health: f64,
    pub(crate) last_axis: Axis,
    pub(crate) frames_per_move: u32,
    pub(crate) frames_since_move: u32,
    pub(crate) cursor: usize,
    pub(crate) steps_taken: u32,
    pub(crate) shielded_by: BTreeSet<CellCoord>,
    pub(crate) reached_edge: bool,
}

impl AttackUnit {
    /// Kind of the unit.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Stat snapshot the unit was created with.
    #[must_use]
    pub const fn stats(&self) -> &UnitStats {
        &self.stats
    }

    /// Side that owns the unit.
    #[must_use]
    pub const fn owner(&self) -> PlayerSide {
        self.owner
    }

    /// Cell the unit was spawned on.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Edge the unit is heading for.
    #[must_use]
    pub const fn edge(&self) -> Edge {
        self.edge
    }

    /// Cell the unit currently stands on.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Remaining health, including shields received.
    #[must_use]
    pub const fn health(&self) -> f64 {
        self.health
    }

    /// Axis of the most recent step.
    #[must_use]
    pub const fn last_axis(&self) -> Axis {
        self.last_axis
    }

    /// Number of steps taken since the unit spawned.
    #[must_use]
    pub const fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    /// Reports whether the unit scored this frame.
    #[must_use]
    pub const fn reached_edge(&self) -> bool {
        self.reached_edge
    }

    /// Support cells that already shielded this unit.
    pub fn shielded_by(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.shielded_by.iter().copied()
    }

    pub(crate) fn path_key(&self) -> PathKey {
        PathKey {
            kind: self.kind,
            start: self.start,
            edge: self.edge,
        }
    }
}

/// Ordered list of the mobile units in an attack.
///
/// Roster order is spawn order and decides the order in which units move and
/// attack.
#[derive(Clone, Debug)]
pub struct Roster {
    arena: ArenaSize,
    units: Vec<AttackUnit>,
}

impl Roster {
    /// Creates an empty roster for the provided arena.
    #[must_use]
    pub fn new(arena: ArenaSize) -> Self {
        Self {
            arena,
            units: Vec::new(),
        }
    }

    /// Arena the roster's units walk on.
    #[must_use]
    pub const fn arena(&self) -> ArenaSize {
        self.arena
    }

    /// Appends a unit created from the spawn request and returns its index.
    pub fn spawn(&mut self, spawn: Spawn, catalog: &UnitCatalog) -> Result<usize, SpawnError> {
        if !spawn.kind.is_mobile() {
            return Err(SpawnError::NotMobile(spawn.kind));
        }

        if !self.arena.contains(spawn.cell) {
            return Err(SpawnError::OutOfBounds(spawn.cell));
        }

        let stats = *catalog.stats(spawn.kind, false);
        let frames_per_move = stats
            .frames_per_move()
            .ok_or(SpawnError::Immobile(spawn.kind))?;

        self.units.push(AttackUnit {
            kind: spawn.kind,
            stats,
            owner: spawn.owner,
            start: spawn.cell,
            edge: spawn.edge,
            cell: spawn.cell,
            health: stats.max_health,
            last_axis: Axis::Horizontal,
            frames_per_move,
            frames_since_move: 0,
            cursor: 0,
            steps_taken: 0,
            shielded_by: BTreeSet::new(),
            reached_edge: false,
        });

        Ok(self.units.len() - 1)
    }

    /// Number of units still in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Reports whether every unit has left the roster.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit at the provided roster index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AttackUnit> {
        self.units.get(index)
    }

    /// Iterates over the units in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &AttackUnit> {
        self.units.iter()
    }

    /// Reports whether units of both sides take part.
    #[must_use]
    pub fn has_both_sides(&self) -> bool {
        let mut owners = self.units.iter().map(|unit| unit.owner);
        match owners.next() {
            Some(first) => owners.any(|owner| owner != first),
            None => false,
        }
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut AttackUnit> {
        self.units.get_mut(index)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut AttackUnit> {
        self.units.iter_mut()
    }

    /// Removes the units at the provided indices, highest index first.
    pub(crate) fn remove_indices(&mut self, indices: &BTreeSet<usize>) {
        for &index in indices.iter().rev() {
            if index < self.units.len() {
                let _ = self.units.remove(index);
            }
        }
    }
}
