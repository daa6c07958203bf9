#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state for Breach Sim.
//!
//! The [`Board`] stores every stationary unit in an arena addressed by
//! [`StructureId`] handles and keeps a cell index that maps each occupied
//! cell to its handle. Callers hold handles rather than references, so a
//! structure can be removed while other parts of a frame still refer to it
//! by id.

use std::collections::HashMap;

use breach_sim_core::{ArenaSize, CellCoord, PlayerSide, UnitCatalog, UnitKind, UnitStats};
use thiserror::Error;

/// Handle of a structure stored on a [`Board`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureId(u32);

impl StructureId {
    /// Creates a new structure identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    fn slot(self) -> usize {
        self.0 as usize
    }
}

/// Stationary unit occupying exactly one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Structure {
    id: StructureId,
    kind: UnitKind,
    owner: PlayerSide,
    cell: CellCoord,
    health: f64,
    upgraded: bool,
    stats: UnitStats,
}

impl Structure {
    /// Identifier allocated by the board.
    #[must_use]
    pub const fn id(&self) -> StructureId {
        self.id
    }

    /// Kind of the structure.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Side that owns the structure.
    #[must_use]
    pub const fn owner(&self) -> PlayerSide {
        self.owner
    }

    /// Cell occupied by the structure.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Remaining health. Zero or below means the structure is destroyed.
    #[must_use]
    pub const fn health(&self) -> f64 {
        self.health
    }

    /// Reports whether the structure has been upgraded.
    #[must_use]
    pub const fn upgraded(&self) -> bool {
        self.upgraded
    }

    /// Stat snapshot of the structure.
    #[must_use]
    pub const fn stats(&self) -> &UnitStats {
        &self.stats
    }

    /// Reports whether the structure still has health left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Subtracts damage and returns the health actually lost.
    ///
    /// The loss is clamped to the health remaining before the hit.
    pub fn apply_damage(&mut self, amount: f64) -> f64 {
        let lost = amount.min(self.health.max(0.0));
        self.health -= amount;
        lost
    }
}

/// Reasons a structure placement may be rejected by the board.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the diamond arena.
    #[error("cell {0} is outside the arena")]
    OutOfBounds(CellCoord),
    /// The requested cell already holds a structure.
    #[error("cell {0} is already occupied")]
    Occupied(CellCoord),
    /// Only stationary kinds can be placed on the board.
    #[error("{0} is not a stationary unit")]
    NotStationary(UnitKind),
    /// The board ran out of structure handles.
    #[error("board cannot hold more structures")]
    Full,
    /// The handle refers to a structure that is no longer on the board.
    #[error("structure {} is not on the board", .0.get())]
    Missing(StructureId),
    /// The structure at the cell has already been upgraded.
    #[error("structure at {0} is already upgraded")]
    AlreadyUpgraded(CellCoord),
}

/// Resource totals a side holds between rounds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerResources {
    /// Points spent on structures.
    pub structure_points: f64,
    /// Points spent on mobile units.
    pub mobile_points: f64,
}

/// Mapping from cells to the stationary units occupying them.
#[derive(Clone, Debug)]
pub struct Board {
    arena: ArenaSize,
    structures: Vec<Option<Structure>>,
    cells: HashMap<CellCoord, StructureId>,
    resources: [PlayerResources; 2],
}

impl Board {
    /// Creates an empty board for the provided arena.
    #[must_use]
    pub fn new(arena: ArenaSize) -> Self {
        Self {
            arena,
            structures: Vec::new(),
            cells: HashMap::new(),
            resources: [PlayerResources::default(); 2],
        }
    }

    /// Arena the board covers.
    #[must_use]
    pub const fn arena(&self) -> ArenaSize {
        self.arena
    }

    /// Places a structure, deriving its owner from the row it sits on.
    ///
    /// `health` overrides the catalog's starting health when provided, which
    /// is how damaged structures from a persisted snapshot are restored.
    pub fn place(
        &mut self,
        kind: UnitKind,
        cell: CellCoord,
        health: Option<f64>,
        upgraded: bool,
        catalog: &UnitCatalog,
    ) -> Result<StructureId, PlacementError> {
        if !kind.is_stationary() {
            return Err(PlacementError::NotStationary(kind));
        }

        if !self.arena.contains(cell) {
            return Err(PlacementError::OutOfBounds(cell));
        }

        if self.cells.contains_key(&cell) {
            return Err(PlacementError::Occupied(cell));
        }

        let id = next_id(self.structures.len())?;
        let stats = *catalog.stats(kind, upgraded);
        self.structures.push(Some(Structure {
            id,
            kind,
            owner: PlayerSide::owning_row(cell.y(), self.arena),
            cell,
            health: health.unwrap_or(stats.max_health),
            upgraded,
            stats,
        }));
        let _ = self.cells.insert(cell, id);

        Ok(id)
    }

    /// Upgrades a structure in place.
    ///
    /// Damage already taken carries over: the structure keeps the same
    /// health deficit against its new maximum.
    pub fn upgrade(
        &mut self,
        id: StructureId,
        catalog: &UnitCatalog,
    ) -> Result<(), PlacementError> {
        let structure = self.structure_mut(id).ok_or(PlacementError::Missing(id))?;
        if structure.upgraded {
            return Err(PlacementError::AlreadyUpgraded(structure.cell));
        }

        let stats = *catalog.stats(structure.kind, true);
        structure.health = stats.max_health - (structure.stats.max_health - structure.health);
        structure.stats = stats;
        structure.upgraded = true;
        Ok(())
    }

    /// Handle of the structure occupying the cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<StructureId> {
        self.cells.get(&cell).copied()
    }

    /// Reports whether the cell holds a structure.
    #[must_use]
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Reports whether a mobile unit may stand on the cell.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.arena.contains(cell) && !self.is_occupied(cell)
    }

    /// Structure behind the handle, unless it was removed.
    #[must_use]
    pub fn structure(&self, id: StructureId) -> Option<&Structure> {
        self.structures.get(id.slot()).and_then(Option::as_ref)
    }

    /// Mutable access to the structure behind the handle.
    pub fn structure_mut(&mut self, id: StructureId) -> Option<&mut Structure> {
        self.structures.get_mut(id.slot()).and_then(Option::as_mut)
    }

    /// Structure occupying the cell, if any.
    #[must_use]
    pub fn structure_at(&self, cell: CellCoord) -> Option<&Structure> {
        self.occupant(cell).and_then(|id| self.structure(id))
    }

    /// Removes the structure, freeing its cell.
    pub fn remove(&mut self, id: StructureId) -> Option<Structure> {
        let removed = self.structures.get_mut(id.slot()).and_then(Option::take)?;
        let _ = self.cells.remove(&removed.cell);
        Some(removed)
    }

    /// Iterates over the structures still on the board in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &Structure> {
        self.structures.iter().flatten()
    }

    /// Number of structures still on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the board holds no structures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Resource totals recorded for the side.
    #[must_use]
    pub fn resources(&self, side: PlayerSide) -> PlayerResources {
        self.resources[side_slot(side)]
    }

    /// Records resource totals for the side.
    pub fn set_resources(&mut self, side: PlayerSide, resources: PlayerResources) {
        self.resources[side_slot(side)] = resources;
    }
}

fn next_id(allocated: usize) -> Result<StructureId, PlacementError> {
    u32::try_from(allocated)
        .map(StructureId::new)
        .map_err(|_| PlacementError::Full)
}

fn side_slot(side: PlayerSide) -> usize {
    match side {
        PlayerSide::Player => 0,
        PlayerSide::Opponent => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> UnitCatalog {
        UnitCatalog::default()
            .with_stats(
                UnitKind::Wall,
                UnitStats {
                    max_health: 60.0,
                    cost: 1.0,
                    ..UnitStats::default()
                },
            )
            .with_upgraded_stats(
                UnitKind::Wall,
                UnitStats {
                    max_health: 120.0,
                    cost: 2.0,
                    ..UnitStats::default()
                },
            )
    }

    #[test]
    fn place_assigns_owner_from_row() {
        let mut board = Board::new(ArenaSize::default());
        let catalog = catalog();

        let low = board
            .place(UnitKind::Wall, CellCoord::new(13, 0), None, false, &catalog)
            .expect("placement succeeds");
        let high = board
            .place(UnitKind::Wall, CellCoord::new(13, 27), None, false, &catalog)
            .expect("placement succeeds");

        assert_eq!(board.structure(low).map(Structure::owner), Some(PlayerSide::Player));
        assert_eq!(board.structure(high).map(Structure::owner), Some(PlayerSide::Opponent));
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn place_rejects_invalid_requests() {
        let mut board = Board::new(ArenaSize::default());
        let catalog = catalog();
        let cell = CellCoord::new(13, 5);
        let _ = board
            .place(UnitKind::Wall, cell, None, false, &catalog)
            .expect("placement succeeds");

        assert_eq!(
            board.place(UnitKind::Wall, cell, None, false, &catalog),
            Err(PlacementError::Occupied(cell))
        );
        assert_eq!(
            board.place(UnitKind::Wall, CellCoord::new(0, 0), None, false, &catalog),
            Err(PlacementError::OutOfBounds(CellCoord::new(0, 0)))
        );
        assert_eq!(
            board.place(UnitKind::Scout, CellCoord::new(13, 6), None, false, &catalog),
            Err(PlacementError::NotStationary(UnitKind::Scout))
        );
    }

    #[test]
    fn upgraded_structures_use_upgraded_stats_and_explicit_health() {
        let mut board = Board::new(ArenaSize::default());
        let catalog = catalog();
        let id = board
            .place(UnitKind::Wall, CellCoord::new(10, 10), Some(75.0), true, &catalog)
            .expect("placement succeeds");

        let wall = board.structure(id).expect("wall present");
        assert!(wall.upgraded());
        assert_eq!(wall.stats().max_health, 120.0);
        assert_eq!(wall.health(), 75.0);
    }

    #[test]
    fn remove_frees_cell_and_invalidates_handle() {
        let mut board = Board::new(ArenaSize::default());
        let catalog = catalog();
        let cell = CellCoord::new(12, 3);
        let id = board
            .place(UnitKind::Wall, cell, None, false, &catalog)
            .expect("placement succeeds");
        assert!(!board.is_walkable(cell));

        let removed = board.remove(id).expect("structure removed");
        assert_eq!(removed.cell(), cell);
        assert!(board.is_walkable(cell));
        assert!(board.structure(id).is_none());
        assert!(board.remove(id).is_none());
        assert!(board.is_empty());
    }

    #[test]
    fn apply_damage_clamps_reported_loss() {
        let mut board = Board::new(ArenaSize::default());
        let catalog = catalog();
        let id = board
            .place(UnitKind::Wall, CellCoord::new(14, 14), Some(10.0), false, &catalog)
            .expect("placement succeeds");

        let wall = board.structure_mut(id).expect("wall present");
        assert_eq!(wall.apply_damage(4.0), 4.0);
        assert_eq!(wall.apply_damage(15.0), 6.0);
        assert!(!wall.is_alive());
        assert_eq!(wall.apply_damage(5.0), 0.0);
    }

    #[test]
    fn upgrade_keeps_damage_taken() {
        let mut board = Board::new(ArenaSize::default());
        let catalog = catalog();
        let id = board
            .place(UnitKind::Wall, CellCoord::new(13, 20), Some(45.0), false, &catalog)
            .expect("placement succeeds");

        board.upgrade(id, &catalog).expect("upgrade succeeds");

        let wall = board.structure(id).expect("wall present");
        assert!(wall.upgraded());
        assert_eq!(wall.health(), 120.0 - (60.0 - 45.0));
        assert_eq!(wall.stats().max_health, 120.0);
        assert_eq!(wall.stats().cost, 2.0);
    }

    #[test]
    fn upgrade_rejects_repeats_and_removed_structures() {
        let mut board = Board::new(ArenaSize::default());
        let catalog = catalog();
        let cell = CellCoord::new(13, 20);
        let id = board
            .place(UnitKind::Wall, cell, None, true, &catalog)
            .expect("placement succeeds");

        assert_eq!(
            board.upgrade(id, &catalog),
            Err(PlacementError::AlreadyUpgraded(cell))
        );
        assert_eq!(board.structure(id).map(Structure::health), Some(120.0));

        let _ = board.remove(id).expect("structure removed");
        assert_eq!(board.upgrade(id, &catalog), Err(PlacementError::Missing(id)));
    }

    #[test]
    fn handles_run_out_instead_of_repeating() {
        let last = u32::MAX as usize;
        assert_eq!(next_id(last), Ok(StructureId::new(u32::MAX)));
        assert_eq!(next_id(last + 1), Err(PlacementError::Full));
    }

    #[test]
    fn resources_are_recorded_per_side() {
        let mut board = Board::new(ArenaSize::default());
        board.set_resources(
            PlayerSide::Opponent,
            PlayerResources {
                structure_points: 30.0,
                mobile_points: 5.0,
            },
        );

        assert_eq!(board.resources(PlayerSide::Player), PlayerResources::default());
        assert_eq!(board.resources(PlayerSide::Opponent).structure_points, 30.0);
    }
}
