//! Path cache shared by units with the same kind, start cell and target edge.

use std::collections::HashMap;

use breach_sim_core::{ArenaSize, CellCoord};
use breach_sim_system_pathfinding::Pathfinder;
use breach_sim_world::Board;

use crate::roster::{PathKey, Roster};

/// Cached paths, rebuilt after the board changes.
#[derive(Clone, Debug)]
pub(crate) struct PathCache {
    pathfinder: Pathfinder,
    paths: HashMap<PathKey, Vec<CellCoord>>,
    dirty: bool,
}

impl PathCache {
    pub(crate) fn new(arena: ArenaSize) -> Self {
        Self {
            pathfinder: Pathfinder::new(arena),
            paths: HashMap::new(),
            dirty: true,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Recomputes every path from the units' current cells when the board changed.
    ///
    /// Cursors restart at zero because the new paths begin at the units'
    /// current cells.
    pub(crate) fn refresh(&mut self, roster: &mut Roster, board: &Board) {
        if !self.dirty {
            return;
        }

        self.paths.clear();
        for unit in roster.iter_mut() {
            unit.cursor = 0;

            let key = unit.path_key();
            if self.paths.contains_key(&key) {
                continue;
            }

            let path = self.pathfinder.shortest_path_to_edge(
                unit.cell,
                unit.edge,
                unit.last_axis,
                |cell| board.is_occupied(cell),
            );
            let _ = self.paths.insert(key, path);
        }

        log::debug!("rebuilt {} cached paths", self.paths.len());
        self.dirty = false;
    }

    /// Path cached for the key; empty when none was computed.
    pub(crate) fn path(&self, key: &PathKey) -> &[CellCoord] {
        self.paths.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}
