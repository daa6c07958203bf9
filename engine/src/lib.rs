#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-by-frame simulation of one attack round.
//!
//! An [`Engine`] owns a [`Board`] and a [`Roster`] and advances them one
//! frame at a time until every mobile unit has scored, self-destructed or
//! died. Each frame runs the same phases in a fixed order: path refresh,
//! movement, shielding, destructor attacks, mobile attacks, self-destructs and
//! finally removal of everything queued for deletion during the frame.

mod paths;
mod roster;

use std::collections::BTreeSet;

use breach_sim_core::{CellCoord, Direction, EdgeTable, SimulationResult, UnitKind};
use breach_sim_system_targeting::{Attacker, Candidate, Targeting};
use breach_sim_world::{Board, StructureId};
use thiserror::Error;

use crate::paths::PathCache;

pub use roster::{AttackUnit, Roster, SpawnError};

/// Failures that abort a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A cached path contained a step between cells that are not adjacent.
    #[error("path step from {from} to {to} does not connect adjacent cells")]
    NonAdjacentStep {
        /// Cell the unit stood on.
        from: CellCoord,
        /// Cell the path asked it to move to.
        to: CellCoord,
    },
    /// The board and the roster were built for different arenas.
    #[error("board arena size {board} does not match roster arena size {roster}")]
    ArenaMismatch {
        /// Arena size of the board.
        board: u32,
        /// Arena size of the roster.
        roster: u32,
    },
}

/// Tunables of a simulation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationOptions {
    /// Only let a forced self-destruct deal damage once the unit has taken
    /// the number of steps its kind requires.
    pub enforce_self_destruct_steps: bool,
}

/// Deterministic attack simulator.
#[derive(Debug)]
pub struct Engine {
    board: Board,
    roster: Roster,
    options: SimulationOptions,
    edges: EdgeTable,
    paths: PathCache,
    targeting: Targeting,
    structures: BTreeSet<CellCoord>,
    destructors: BTreeSet<CellCoord>,
    supports: BTreeSet<CellCoord>,
    both_sides: bool,
    removals: BTreeSet<usize>,
    self_destructs: BTreeSet<usize>,
    wrecked: BTreeSet<StructureId>,
    result: SimulationResult,
    frame: u64,
}

impl Engine {
    /// Creates an engine with default options.
    pub fn new(board: Board, roster: Roster) -> Result<Self, SimulationError> {
        Self::with_options(board, roster, SimulationOptions::default())
    }

    /// Creates an engine, indexing the board's structures by cell.
    pub fn with_options(
        board: Board,
        roster: Roster,
        options: SimulationOptions,
    ) -> Result<Self, SimulationError> {
        let arena = board.arena();
        if arena != roster.arena() {
            return Err(SimulationError::ArenaMismatch {
                board: arena.get(),
                roster: roster.arena().get(),
            });
        }

        let mut structures = BTreeSet::new();
        let mut destructors = BTreeSet::new();
        let mut supports = BTreeSet::new();
        for structure in board.iter() {
            let cell = structure.cell();
            let _ = structures.insert(cell);
            match structure.kind() {
                UnitKind::Destructor => {
                    let _ = destructors.insert(cell);
                }
                UnitKind::Support => {
                    let _ = supports.insert(cell);
                }
                _ => {}
            }
        }

        let both_sides = roster.has_both_sides();

        Ok(Self {
            board,
            roster,
            options,
            edges: EdgeTable::new(arena),
            paths: PathCache::new(arena),
            targeting: Targeting::new(arena),
            structures,
            destructors,
            supports,
            both_sides,
            removals: BTreeSet::new(),
            self_destructs: BTreeSet::new(),
            wrecked: BTreeSet::new(),
            result: SimulationResult::default(),
            frame: 0,
        })
    }

    /// Board in its current state.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Units still taking part in the attack.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Number of units still taking part in the attack.
    #[must_use]
    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }

    /// Number of frames stepped so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Accumulated statistics so far.
    #[must_use]
    pub fn result(&self) -> SimulationResult {
        self.result
    }

    /// Reports whether the attack has finished.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.roster.is_empty()
    }

    /// Steps frames until the attack has finished and returns the statistics.
    pub fn run(mut self) -> Result<SimulationResult, SimulationError> {
        log::debug!(
            "simulating {} units against {} structures",
            self.roster.len(),
            self.board.len()
        );

        while !self.is_done() {
            self.step()?;
        }

        log::debug!("simulation finished after {} frames", self.frame);
        Ok(self.result)
    }

    /// Advances the simulation by one frame.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        if self.is_done() {
            return Ok(());
        }

        self.frame += 1;
        self.paths.refresh(&mut self.roster, &self.board);
        self.move_units()?;
        self.apply_shields();
        self.destructors_attack();
        self.mobile_units_attack();
        self.detonate_queued();
        self.remove_casualties();

        log::trace!(
            "frame {}: {} units remain, {} structures remain",
            self.frame,
            self.roster.len(),
            self.board.len()
        );
        Ok(())
    }

    fn move_units(&mut self) -> Result<(), SimulationError> {
        for index in 0..self.roster.len() {
            let Some(unit) = self.roster.get_mut(index) else {
                continue;
            };

            unit.frames_since_move += 1;
            if unit.frames_since_move < unit.frames_per_move {
                continue;
            }

            if self.edges.contains(unit.edge, unit.cell) {
                self.result.credit_point(unit.owner);
                unit.reached_edge = true;
                let _ = self.removals.insert(index);
                continue;
            }

            let path = self.paths.path(&unit.path_key());
            let Some(&next) = path.get(unit.cursor) else {
                let _ = self.self_destructs.insert(index);
                continue;
            };

            let direction =
                Direction::between(unit.cell, next).ok_or(SimulationError::NonAdjacentStep {
                    from: unit.cell,
                    to: next,
                })?;

            unit.cell = next;
            unit.cursor += 1;
            unit.frames_since_move = 0;
            unit.steps_taken += 1;
            unit.last_axis = direction.axis();
        }

        Ok(())
    }

    fn apply_shields(&mut self) {
        let arena = self.board.arena();

        for &cell in &self.supports {
            let Some(support) = self.board.structure_at(cell) else {
                continue;
            };
            let Some(shield) = support.stats().shield else {
                continue;
            };

            let owner = support.owner();
            let amount =
                shield.per_unit + shield.bonus_per_row * f64::from(owner.row_distance(cell.y(), arena));

            for unit in self.roster.iter_mut() {
                if unit.owner != owner || unit.cell.distance(cell) > shield.range {
                    continue;
                }

                if unit.shielded_by.insert(cell) {
                    unit.health += amount;
                }
            }
        }
    }

    fn destructors_attack(&mut self) {
        for &cell in &self.destructors {
            let Some(destructor) = self.board.structure_at(cell) else {
                continue;
            };
            if !destructor.is_alive() {
                continue;
            }
            let Some(attack) = destructor.stats().attack else {
                continue;
            };

            let attacker = Attacker {
                cell,
                owner: destructor.owner(),
                range: attack.range,
            };
            let target = self.targeting.select(
                attacker,
                self.roster
                    .iter()
                    .enumerate()
                    .filter(|(_, unit)| unit.owner != attacker.owner && unit.health > 0.0)
                    .map(|(index, unit)| Candidate {
                        key: index,
                        cell: unit.cell,
                        health: unit.health,
                    }),
            );

            if let Some(index) = target {
                strike_unit(&mut self.roster, &mut self.removals, index, attack.damage_to_mobile);
            }
        }
    }

    fn mobile_units_attack(&mut self) {
        for index in 0..self.roster.len() {
            let Some(unit) = self.roster.get(index) else {
                continue;
            };
            if unit.reached_edge {
                continue;
            }
            let Some(attack) = unit.stats.attack else {
                continue;
            };

            let attacker = Attacker {
                cell: unit.cell,
                owner: unit.owner,
                range: attack.range,
            };

            if self.both_sides {
                let target = self.targeting.select(
                    attacker,
                    self.roster
                        .iter()
                        .enumerate()
                        .filter(|(_, other)| other.owner != attacker.owner && other.health > 0.0)
                        .map(|(other_index, other)| Candidate {
                            key: other_index,
                            cell: other.cell,
                            health: other.health,
                        }),
                );

                if let Some(target) = target {
                    strike_unit(
                        &mut self.roster,
                        &mut self.removals,
                        target,
                        attack.damage_to_mobile,
                    );
                    continue;
                }
            }

            let board = &self.board;
            let target = self.targeting.select(
                attacker,
                self.structures
                    .iter()
                    .filter_map(|&cell| board.structure_at(cell))
                    .filter(|structure| structure.owner() != attacker.owner && structure.is_alive())
                    .map(|structure| Candidate {
                        key: structure.id(),
                        cell: structure.cell(),
                        health: structure.health(),
                    }),
            );

            if let Some(id) = target {
                self.strike_structure(id, attacker, attack.damage_to_structure);
            }
        }
    }

    fn detonate_queued(&mut self) {
        let queued = std::mem::take(&mut self.self_destructs);

        for index in queued {
            let armed = self
                .roster
                .get(index)
                .is_some_and(|unit| unit.health > 0.0);
            if armed {
                self.detonate(index);
            }

            let _ = self.removals.insert(index);
        }
    }

    fn detonate(&mut self, index: usize) {
        let Some(unit) = self.roster.get(index) else {
            return;
        };
        let Some(blast) = unit.stats.self_destruct else {
            return;
        };

        if self.options.enforce_self_destruct_steps && unit.steps_taken < blast.steps_required {
            log::trace!(
                "{} at {} fizzled after {} of {} steps",
                unit.kind,
                unit.cell,
                unit.steps_taken,
                blast.steps_required
            );
            return;
        }

        let attacker = Attacker {
            cell: unit.cell,
            owner: unit.owner,
            range: blast.range,
        };

        let board = &self.board;
        let struck: Vec<StructureId> = Targeting::within_range(
            attacker.cell,
            attacker.range,
            self.structures
                .iter()
                .filter_map(|&cell| board.structure_at(cell))
                .filter(|structure| structure.owner() != attacker.owner && structure.is_alive())
                .map(|structure| Candidate {
                    key: structure.id(),
                    cell: structure.cell(),
                    health: structure.health(),
                }),
        )
        .map(|candidate| candidate.key)
        .collect();

        for id in struck {
            self.strike_structure(id, attacker, blast.damage_to_structure);
        }

        let caught: Vec<usize> = Targeting::within_range(
            attacker.cell,
            attacker.range,
            self.roster
                .iter()
                .enumerate()
                .filter(|(_, other)| other.owner != attacker.owner)
                .map(|(other_index, other)| Candidate {
                    key: other_index,
                    cell: other.cell,
                    health: other.health,
                }),
        )
        .map(|candidate| candidate.key)
        .collect();

        for other_index in caught {
            strike_unit(
                &mut self.roster,
                &mut self.removals,
                other_index,
                blast.damage_to_mobile,
            );
        }
    }

    fn strike_structure(&mut self, id: StructureId, attacker: Attacker, damage: f64) {
        let Some(structure) = self.board.structure_mut(id) else {
            return;
        };

        let lost = structure.apply_damage(damage);
        self.result
            .credit_damage(attacker.owner, structure.stats().normalized_damage(lost));

        if !structure.is_alive() {
            let _ = self.wrecked.insert(id);
        }
    }

    fn remove_casualties(&mut self) {
        let removals = std::mem::take(&mut self.removals);
        self.roster.remove_indices(&removals);

        let wrecked = std::mem::take(&mut self.wrecked);
        if wrecked.is_empty() {
            return;
        }

        for id in wrecked {
            let Some(structure) = self.board.remove(id) else {
                continue;
            };

            let cell = structure.cell();
            log::trace!("{} at {} destroyed", structure.kind(), cell);
            self.result
                .credit_destroyed(structure.owner().opponent(), structure.stats().cost);
            let _ = self.structures.remove(&cell);
            let _ = self.destructors.remove(&cell);
            let _ = self.supports.remove(&cell);
        }

        self.paths.mark_dirty();
    }
}

fn strike_unit(roster: &mut Roster, removals: &mut BTreeSet<usize>, index: usize, damage: f64) {
    let Some(unit) = roster.get_mut(index) else {
        return;
    };

    unit.health -= damage;
    if unit.health <= 0.0 {
        let _ = removals.insert(index);
    }
}

/// Runs a complete simulation with default options.
pub fn simulate(board: Board, roster: Roster) -> Result<SimulationResult, SimulationError> {
    Engine::new(board, roster)?.run()
}

/// Runs a complete simulation with the provided options.
pub fn simulate_with_options(
    board: Board,
    roster: Roster,
    options: SimulationOptions,
) -> Result<SimulationResult, SimulationError> {
    Engine::with_options(board, roster, options)?.run()
}
