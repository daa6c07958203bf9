//! Unit kinds, ownership and stat snapshots.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ArenaSize, InvalidArgument};

/// The two participants of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerSide {
    /// The side whose back edge is row zero.
    Player,
    /// The side whose back edge is the last row.
    Opponent,
}

impl PlayerSide {
    /// Canonical textual tag of the side.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Player => "PLAYER",
            Self::Opponent => "OPPONENT",
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Opponent,
            Self::Opponent => Self::Player,
        }
    }

    /// Side that owns structures placed on the provided row.
    #[must_use]
    pub const fn owning_row(row: i32, arena: ArenaSize) -> Self {
        if row < arena.half() {
            Self::Player
        } else {
            Self::Opponent
        }
    }

    /// Number of rows between `row` and this side's back edge.
    #[must_use]
    pub const fn row_distance(self, row: i32, arena: ArenaSize) -> i32 {
        match self {
            Self::Player => row,
            Self::Opponent => arena.side() - 1 - row,
        }
    }
}

impl fmt::Display for PlayerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PlayerSide {
    type Err = InvalidArgument;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PLAYER" => Ok(Self::Player),
            "OPPONENT" => Ok(Self::Opponent),
            other => Err(InvalidArgument::UnknownPlayer(other.to_owned())),
        }
    }
}

/// Types of units that exist in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitKind {
    /// Stationary blocker without capabilities.
    Wall,
    /// Stationary unit that shields friendly mobile units.
    Support,
    /// Stationary unit that attacks enemy mobile units.
    Destructor,
    /// Fast, fragile mobile unit.
    Scout,
    /// Slow mobile unit specialised in damaging structures.
    Demolisher,
    /// Mobile unit specialised in destroying enemy mobile units.
    Interceptor,
}

impl UnitKind {
    /// Every unit kind, ordered as in the game configuration.
    pub const ALL: [UnitKind; 6] = [
        Self::Wall,
        Self::Support,
        Self::Destructor,
        Self::Scout,
        Self::Demolisher,
        Self::Interceptor,
    ];

    /// Canonical textual tag of the kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Wall => "WALL",
            Self::Support => "SUPPORT",
            Self::Destructor => "DESTRUCTOR",
            Self::Scout => "SCOUT",
            Self::Demolisher => "DEMOLISHER",
            Self::Interceptor => "INTERCEPTOR",
        }
    }

    /// Position of the kind inside the configuration's unit table.
    #[must_use]
    pub const fn config_index(self) -> usize {
        match self {
            Self::Wall => 0,
            Self::Support => 1,
            Self::Destructor => 2,
            Self::Scout => 3,
            Self::Demolisher => 4,
            Self::Interceptor => 5,
        }
    }

    /// Reports whether units of this kind occupy a fixed cell.
    #[must_use]
    pub const fn is_stationary(self) -> bool {
        matches!(self, Self::Wall | Self::Support | Self::Destructor)
    }

    /// Reports whether units of this kind travel toward an edge.
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        !self.is_stationary()
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for UnitKind {
    type Err = InvalidArgument;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == value)
            .ok_or_else(|| InvalidArgument::UnknownUnitKind(value.to_owned()))
    }
}

/// Ranged attack capability.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttackProfile {
    /// Euclidean reach of the attack.
    pub range: f64,
    /// Damage applied to a structure per frame.
    pub damage_to_structure: f64,
    /// Damage applied to a mobile unit per frame.
    pub damage_to_mobile: f64,
}

/// Blast applied when a mobile unit self-destructs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SelfDestructProfile {
    /// Euclidean reach of the blast.
    pub range: f64,
    /// Damage applied to each enemy structure in range.
    pub damage_to_structure: f64,
    /// Damage applied to each enemy mobile unit in range.
    pub damage_to_mobile: f64,
    /// Steps a unit must have taken for the blast to deal damage, when enforced.
    pub steps_required: u32,
}

/// One-time health bonus granted by a support.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShieldProfile {
    /// Euclidean reach of the shield.
    pub range: f64,
    /// Flat health granted to each unit.
    pub per_unit: f64,
    /// Additional health granted per row between the support and the unit owner's back edge.
    pub bonus_per_row: f64,
}

/// Immutable stat snapshot of a unit kind, optionally upgraded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UnitStats {
    /// Health of a freshly created unit.
    pub max_health: f64,
    /// Resource cost used to normalise damage.
    pub cost: f64,
    /// Moves per frame; fractional values move once every `ceil(1 / speed)` frames.
    pub speed: f64,
    /// Damage dealt to the defending player when the unit scores.
    pub breach_damage: f64,
    /// Ranged attack, if the kind has one.
    pub attack: Option<AttackProfile>,
    /// Self-destruct blast, if the kind has one.
    pub self_destruct: Option<SelfDestructProfile>,
    /// Shield, if the kind has one.
    pub shield: Option<ShieldProfile>,
}

impl UnitStats {
    /// Frames a unit must wait between consecutive moves.
    ///
    /// Returns `None` when the unit cannot move at all.
    #[must_use]
    pub fn frames_per_move(&self) -> Option<u32> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return None;
        }

        let frames = (1.0 / self.speed).ceil();
        if frames > f64::from(u32::MAX) {
            return None;
        }

        Some((frames as u32).max(1))
    }

    /// Damage this unit deals to mobile units, or zero without an attack.
    #[must_use]
    pub fn mobile_damage(&self) -> f64 {
        self.attack.map_or(0.0, |attack| attack.damage_to_mobile)
    }

    /// Damage this unit deals to structures, or zero without an attack.
    #[must_use]
    pub fn structure_damage(&self) -> f64 {
        self.attack.map_or(0.0, |attack| attack.damage_to_structure)
    }

    /// Reach of the attack, if any.
    #[must_use]
    pub fn attack_range(&self) -> Option<f64> {
        self.attack.map(|attack| attack.range)
    }

    /// Normalises raw health loss into "cost to rebuild" units.
    #[must_use]
    pub fn normalized_damage(&self, health_lost: f64) -> f64 {
        if self.max_health <= 0.0 {
            return 0.0;
        }

        health_lost / self.max_health * self.cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_per_move_rounds_fractional_speeds_up() {
        let mut stats = UnitStats {
            speed: 1.0,
            ..UnitStats::default()
        };
        assert_eq!(stats.frames_per_move(), Some(1));

        stats.speed = 0.5;
        assert_eq!(stats.frames_per_move(), Some(2));

        stats.speed = 0.3;
        assert_eq!(stats.frames_per_move(), Some(4));

        stats.speed = 2.0;
        assert_eq!(stats.frames_per_move(), Some(1));

        stats.speed = 0.0;
        assert_eq!(stats.frames_per_move(), None);
    }

    #[test]
    fn row_distance_mirrors_for_opponent() {
        let arena = ArenaSize::default();
        assert_eq!(PlayerSide::Player.row_distance(3, arena), 3);
        assert_eq!(PlayerSide::Opponent.row_distance(3, arena), 24);
        assert_eq!(PlayerSide::owning_row(13, arena), PlayerSide::Player);
        assert_eq!(PlayerSide::owning_row(14, arena), PlayerSide::Opponent);
    }

    #[test]
    fn tags_round_trip_and_reject_unknown_values() {
        for kind in UnitKind::ALL {
            assert_eq!(kind.tag().parse::<UnitKind>(), Ok(kind));
        }
        assert_eq!("PLAYER".parse::<PlayerSide>(), Ok(PlayerSide::Player));
        assert_eq!(
            "TURRET".parse::<UnitKind>(),
            Err(InvalidArgument::UnknownUnitKind("TURRET".to_owned()))
        );
        assert_eq!(
            "NOBODY".parse::<PlayerSide>(),
            Err(InvalidArgument::UnknownPlayer("NOBODY".to_owned()))
        );
    }

    #[test]
    fn capabilities_default_to_absent() {
        let wall = UnitStats {
            max_health: 60.0,
            cost: 1.0,
            ..UnitStats::default()
        };
        assert_eq!(wall.attack_range(), None);
        assert_eq!(wall.mobile_damage(), 0.0);
        assert!((wall.normalized_damage(30.0) - 0.5).abs() < f64::EPSILON);
    }
}
