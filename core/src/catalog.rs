//! Unit stat lookup built from the game's configuration document.

use serde::{Deserialize, Serialize};

use crate::{
    AttackProfile, InvalidArgument, SelfDestructProfile, ShieldProfile, UnitKind, UnitStats,
};

/// Game configuration document, restricted to the unit table.
///
/// Unknown keys are ignored so the full configuration published by the game
/// can be deserialised directly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Unit entries ordered as in [`UnitKind::config_index`].
    pub unit_information: Vec<UnitInformation>,
}

/// Raw stats of a single unit kind as they appear in the configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitInformation {
    /// Starting health.
    pub start_health: Option<f64>,
    /// Damage dealt to structures per attack.
    pub attack_damage_tower: Option<f64>,
    /// Damage dealt to mobile units per attack.
    pub attack_damage_walker: Option<f64>,
    /// Reach of the attack.
    pub attack_range: Option<f64>,
    /// Damage dealt to the defending player on a breach.
    pub player_breach_damage: Option<f64>,
    /// Cost paid in structure points.
    pub cost1: Option<f64>,
    /// Cost paid in mobile points.
    pub cost2: Option<f64>,
    /// Moves per frame.
    pub speed: Option<f64>,
    /// Self-destruct damage dealt to mobile units.
    pub self_destruct_damage_walker: Option<f64>,
    /// Self-destruct damage dealt to structures.
    pub self_destruct_damage_tower: Option<f64>,
    /// Reach of the self-destruct blast.
    pub self_destruct_range: Option<f64>,
    /// Steps required before a self-destruct deals damage.
    pub self_destruct_steps_required: Option<f64>,
    /// Reach of the shield.
    pub shield_range: Option<f64>,
    /// Flat shield granted per unit.
    pub shield_per_unit: Option<f64>,
    /// Shield bonus granted per row.
    pub shield_bonus_per_y: Option<f64>,
    /// Overrides applied to upgraded units.
    pub upgrade: Option<UpgradeInformation>,
}

/// Stat overrides applied when a unit is upgraded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeInformation {
    /// Replacement starting health.
    pub start_health: Option<f64>,
    /// Replacement structure damage.
    pub attack_damage_tower: Option<f64>,
    /// Replacement mobile damage.
    pub attack_damage_walker: Option<f64>,
    /// Replacement attack reach.
    pub attack_range: Option<f64>,
    /// Additional structure-point cost of the upgrade.
    pub cost1: Option<f64>,
    /// Replacement shield reach.
    pub shield_range: Option<f64>,
    /// Replacement flat shield.
    pub shield_per_unit: Option<f64>,
    /// Replacement per-row shield bonus.
    pub shield_bonus_per_y: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct CatalogEntry {
    base: UnitStats,
    upgraded: UnitStats,
}

/// Stat table keyed by unit kind and upgrade flag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitCatalog {
    entries: [CatalogEntry; 6],
}

impl UnitCatalog {
    /// Builds the catalog from a parsed configuration document.
    pub fn from_config(config: &GameConfig) -> Result<Self, InvalidArgument> {
        let mut catalog = Self::default();

        for kind in UnitKind::ALL {
            let info = config
                .unit_information
                .get(kind.config_index())
                .ok_or(InvalidArgument::MissingUnitInformation(kind))?;

            let base = base_stats(info);
            let upgraded = info
                .upgrade
                .as_ref()
                .map_or(base, |upgrade| upgraded_stats(base, upgrade));

            catalog.entries[kind.config_index()] = CatalogEntry { base, upgraded };
        }

        Ok(catalog)
    }

    /// Replaces both the base and upgraded stats of a kind.
    #[must_use]
    pub fn with_stats(mut self, kind: UnitKind, stats: UnitStats) -> Self {
        self.entries[kind.config_index()] = CatalogEntry {
            base: stats,
            upgraded: stats,
        };
        self
    }

    /// Replaces only the upgraded stats of a kind.
    #[must_use]
    pub fn with_upgraded_stats(mut self, kind: UnitKind, stats: UnitStats) -> Self {
        self.entries[kind.config_index()].upgraded = stats;
        self
    }

    /// Looks up the stats of a kind.
    #[must_use]
    pub fn stats(&self, kind: UnitKind, upgraded: bool) -> &UnitStats {
        let entry = &self.entries[kind.config_index()];
        if upgraded {
            &entry.upgraded
        } else {
            &entry.base
        }
    }
}

fn base_stats(info: &UnitInformation) -> UnitStats {
    let attack = if info.attack_range.is_some()
        || info.attack_damage_tower.is_some()
        || info.attack_damage_walker.is_some()
    {
        Some(AttackProfile {
            range: info.attack_range.unwrap_or(0.0),
            damage_to_structure: info.attack_damage_tower.unwrap_or(0.0),
            damage_to_mobile: info.attack_damage_walker.unwrap_or(0.0),
        })
    } else {
        None
    };

    let self_destruct = if info.self_destruct_range.is_some()
        || info.self_destruct_damage_tower.is_some()
        || info.self_destruct_damage_walker.is_some()
    {
        Some(SelfDestructProfile {
            range: info.self_destruct_range.unwrap_or(0.0),
            damage_to_structure: info.self_destruct_damage_tower.unwrap_or(0.0),
            damage_to_mobile: info.self_destruct_damage_walker.unwrap_or(0.0),
            steps_required: info
                .self_destruct_steps_required
                .map_or(0, |steps| steps.max(0.0).ceil() as u32),
        })
    } else {
        None
    };

    let shield = if info.shield_range.is_some()
        || info.shield_per_unit.is_some()
        || info.shield_bonus_per_y.is_some()
    {
        Some(ShieldProfile {
            range: info.shield_range.unwrap_or(0.0),
            per_unit: info.shield_per_unit.unwrap_or(0.0),
            bonus_per_row: info.shield_bonus_per_y.unwrap_or(0.0),
        })
    } else {
        None
    };

    UnitStats {
        max_health: info.start_health.unwrap_or(0.0),
        cost: info.cost1.or(info.cost2).unwrap_or(0.0),
        speed: info.speed.unwrap_or(0.0),
        breach_damage: info.player_breach_damage.unwrap_or(0.0),
        attack,
        self_destruct,
        shield,
    }
}

fn upgraded_stats(base: UnitStats, upgrade: &UpgradeInformation) -> UnitStats {
    let mut stats = base;

    if let Some(health) = upgrade.start_health {
        stats.max_health = health;
    }

    stats.cost = match upgrade.cost1 {
        Some(extra) => base.cost + extra,
        None => base.cost * 2.0,
    };

    if upgrade.attack_range.is_some()
        || upgrade.attack_damage_tower.is_some()
        || upgrade.attack_damage_walker.is_some()
    {
        let attack = stats.attack.get_or_insert_with(AttackProfile::default);
        if let Some(range) = upgrade.attack_range {
            attack.range = range;
        }
        if let Some(damage) = upgrade.attack_damage_tower {
            attack.damage_to_structure = damage;
        }
        if let Some(damage) = upgrade.attack_damage_walker {
            attack.damage_to_mobile = damage;
        }
    }

    if upgrade.shield_range.is_some()
        || upgrade.shield_per_unit.is_some()
        || upgrade.shield_bonus_per_y.is_some()
    {
        let shield = stats.shield.get_or_insert_with(ShieldProfile::default);
        if let Some(range) = upgrade.shield_range {
            shield.range = range;
        }
        if let Some(amount) = upgrade.shield_per_unit {
            shield.per_unit = amount;
        }
        if let Some(bonus) = upgrade.shield_bonus_per_y {
            shield.bonus_per_row = bonus;
        }
    }

    stats
}
