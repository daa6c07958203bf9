#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Breach Sim workspace.
//!
//! This crate defines the geometry of the diamond arena, the unit vocabulary
//! and stat snapshots, and the values that cross the boundary of a
//! simulation run: [`Spawn`] records going in and a [`SimulationResult`]
//! coming out. The board, the pathfinder and the engine all build on these
//! types and never on each other's internals.

mod catalog;
mod geometry;
mod units;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{GameConfig, UnitCatalog, UnitInformation, UpgradeInformation};
pub use geometry::{
    ArenaSize, Axis, CellCoord, Direction, Edge, EdgeTable, DEFAULT_ARENA_SIZE, MAX_ARENA_SIZE,
};
pub use units::{
    AttackProfile, PlayerSide, SelfDestructProfile, ShieldProfile, UnitKind, UnitStats,
};

/// Rejected construction input: unknown tags or inconsistent configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    /// The unit type tag is not one of the known kinds.
    #[error("unknown unit type '{0}'")]
    UnknownUnitKind(String),
    /// The edge tag is not one of the four arena edges.
    #[error("unknown arena edge '{0}'")]
    UnknownEdge(String),
    /// The player tag is neither `PLAYER` nor `OPPONENT`.
    #[error("unknown player type '{0}'")]
    UnknownPlayer(String),
    /// The arena size is zero, odd or larger than [`MAX_ARENA_SIZE`].
    #[error("arena size {0} must be even, non-zero and at most {max}", max = MAX_ARENA_SIZE)]
    ArenaSize(u32),
    /// The configuration does not describe the provided kind.
    #[error("game config has no unit information for {0}")]
    MissingUnitInformation(UnitKind),
}

/// Request to create one mobile unit at the start of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spawn {
    /// Kind of mobile unit to create.
    pub kind: UnitKind,
    /// Side that owns the unit.
    pub owner: PlayerSide,
    /// Cell the unit starts on.
    pub cell: CellCoord,
    /// Edge the unit tries to reach.
    pub edge: Edge,
}

impl Spawn {
    /// Creates a new spawn request.
    #[must_use]
    pub const fn new(kind: UnitKind, owner: PlayerSide, cell: CellCoord, edge: Edge) -> Self {
        Self {
            kind,
            owner,
            cell,
            edge,
        }
    }
}

/// Aggregate statistics of one simulation run.
///
/// Damage figures are normalised to the resource cost of the damaged
/// structures so that partial damage to different kinds is comparable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Mobile units owned by the player that reached their edge.
    pub player_points_scored: f64,
    /// Mobile units owned by the opponent that reached their edge.
    pub opponent_points_scored: f64,
    /// Normalised structure damage dealt by the player, destroyed or not.
    pub player_total_damage_caused: f64,
    /// Normalised structure damage dealt by the opponent, destroyed or not.
    pub opponent_total_damage_caused: f64,
    /// Cost of the opponent structures the player destroyed.
    pub player_destroyed_damage_caused: f64,
    /// Cost of the player structures the opponent destroyed.
    pub opponent_destroyed_damage_caused: f64,
}

impl SimulationResult {
    /// Credits a scored point to the side.
    pub fn credit_point(&mut self, side: PlayerSide) {
        match side {
            PlayerSide::Player => self.player_points_scored += 1.0,
            PlayerSide::Opponent => self.opponent_points_scored += 1.0,
        }
    }

    /// Credits normalised damage dealt by the side.
    pub fn credit_damage(&mut self, side: PlayerSide, amount: f64) {
        match side {
            PlayerSide::Player => self.player_total_damage_caused += amount,
            PlayerSide::Opponent => self.opponent_total_damage_caused += amount,
        }
    }

    /// Credits the cost of a structure destroyed by the side.
    pub fn credit_destroyed(&mut self, side: PlayerSide, cost: f64) {
        match side {
            PlayerSide::Player => self.player_destroyed_damage_caused += cost,
            PlayerSide::Opponent => self.opponent_destroyed_damage_caused += cost,
        }
    }

    /// Points scored by the side.
    #[must_use]
    pub fn points(&self, side: PlayerSide) -> f64 {
        match side {
            PlayerSide::Player => self.player_points_scored,
            PlayerSide::Opponent => self.opponent_points_scored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_accumulate_per_side() {
        let mut result = SimulationResult::default();
        result.credit_point(PlayerSide::Player);
        result.credit_point(PlayerSide::Player);
        result.credit_damage(PlayerSide::Opponent, 0.5);
        result.credit_destroyed(PlayerSide::Player, 2.0);

        assert_eq!(result.points(PlayerSide::Player), 2.0);
        assert_eq!(result.points(PlayerSide::Opponent), 0.0);
        assert_eq!(result.opponent_total_damage_caused, 0.5);
        assert_eq!(result.player_destroyed_damage_caused, 2.0);
    }

    #[test]
    fn result_serializes_with_stable_keys() {
        let result = SimulationResult {
            player_points_scored: 3.0,
            ..SimulationResult::default()
        };
        let json = serde_json::to_value(result).expect("serialize");
        assert_eq!(json["player_points_scored"], 3.0);
        assert_eq!(json["opponent_destroyed_damage_caused"], 0.0);
    }

    #[test]
    fn spawn_deserializes_from_tags() {
        let spawn: Spawn = serde_json::from_str(
            r#"{"kind": "SCOUT", "owner": "PLAYER", "cell": {"x": 13, "y": 0}, "edge": "TOP_RIGHT"}"#,
        )
        .expect("spawn parses");
        assert_eq!(
            spawn,
            Spawn::new(
                UnitKind::Scout,
                PlayerSide::Player,
                CellCoord::new(13, 0),
                Edge::TopRight
            )
        );
    }
}
