//! JSON documents describing a board snapshot and an attack.
//!
//! Both formats mirror what the game's bindings exchange: the board lists
//! every stationary unit with its current health, the attack lists one record
//! per mobile unit. Redundant count fields are ignored.

use anyhow::{Context, Result};
use breach_sim_core::{ArenaSize, CellCoord, Edge, PlayerSide, Spawn, UnitCatalog, UnitKind};
use breach_sim_engine::Roster;
use breach_sim_world::Board;
use serde::Deserialize;

/// Board snapshot document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub(crate) struct BoardDocument {
    #[serde(default)]
    pub(crate) units: Vec<StructureRecord>,
}

/// One stationary unit of a board snapshot.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct StructureRecord {
    pub(crate) unit_type: String,
    pub(crate) x: i32,
    pub(crate) y: i32,
    #[serde(default)]
    pub(crate) health: Option<f64>,
    #[serde(default)]
    pub(crate) upgraded: bool,
}

/// Attack document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub(crate) struct AttackDocument {
    #[serde(default)]
    pub(crate) attack: Vec<SpawnRecord>,
}

/// One mobile unit of an attack.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct SpawnRecord {
    pub(crate) unit_type: String,
    pub(crate) player_index: String,
    pub(crate) start_x: i32,
    pub(crate) start_y: i32,
    pub(crate) target_edge: String,
}

impl BoardDocument {
    /// Places every listed structure on a fresh board.
    pub(crate) fn into_board(self, arena: ArenaSize, catalog: &UnitCatalog) -> Result<Board> {
        let mut board = Board::new(arena);

        for (index, record) in self.units.into_iter().enumerate() {
            let kind: UnitKind = record
                .unit_type
                .parse()
                .with_context(|| format!("board unit {index} has an invalid type"))?;
            let cell = CellCoord::new(record.x, record.y);
            let _ = board
                .place(kind, cell, record.health, record.upgraded, catalog)
                .with_context(|| format!("board unit {index} ({kind} at {cell}) was rejected"))?;
        }

        Ok(board)
    }
}

impl AttackDocument {
    /// Spawns every listed unit, in document order.
    pub(crate) fn into_roster(self, arena: ArenaSize, catalog: &UnitCatalog) -> Result<Roster> {
        let mut roster = Roster::new(arena);

        for (index, record) in self.attack.into_iter().enumerate() {
            let spawn = record
                .to_spawn()
                .with_context(|| format!("attack unit {index} is malformed"))?;
            let _ = roster
                .spawn(spawn, catalog)
                .with_context(|| format!("attack unit {index} was rejected"))?;
        }

        Ok(roster)
    }
}

impl SpawnRecord {
    fn to_spawn(&self) -> Result<Spawn> {
        let kind: UnitKind = self.unit_type.parse()?;
        let owner: PlayerSide = self.player_index.parse()?;
        let edge: Edge = self.target_edge.parse()?;
        Ok(Spawn::new(
            kind,
            owner,
            CellCoord::new(self.start_x, self.start_y),
            edge,
        ))
    }
}
