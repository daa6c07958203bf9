#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks deterministic attack targets.
//!
//! Destructors, mobile units and self-destruct blasts all share one priority
//! order: the closest candidate wins, then the one with the least health, then
//! the one nearest the attacker's own back edge, then the one with the
//! smallest column. Candidates that compare equal on every key keep the
//! earlier position in the input, so callers control the final tie-break
//! through iteration order.

use breach_sim_core::{ArenaSize, CellCoord, PlayerSide};

/// Unit that is looking for a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attacker {
    /// Cell the attack originates from.
    pub cell: CellCoord,
    /// Side the attacker fights for.
    pub owner: PlayerSide,
    /// Euclidean reach of the attack.
    pub range: f64,
}

/// Potential target presented to the selector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate<K> {
    /// Caller-defined handle returned when the candidate wins.
    pub key: K,
    /// Cell the candidate occupies.
    pub cell: CellCoord,
    /// Remaining health of the candidate.
    pub health: f64,
}

/// Target selector bound to one arena size.
#[derive(Clone, Copy, Debug)]
pub struct Targeting {
    arena: ArenaSize,
}

impl Targeting {
    /// Creates a selector for the provided arena.
    #[must_use]
    pub const fn new(arena: ArenaSize) -> Self {
        Self { arena }
    }

    /// Returns the key of the best candidate within the attacker's range.
    ///
    /// Callers are expected to pass only enemy candidates that are still
    /// alive; the selector applies range and priority only.
    pub fn select<K, I>(&self, attacker: Attacker, candidates: I) -> Option<K>
    where
        K: Copy,
        I: IntoIterator<Item = Candidate<K>>,
    {
        let mut best: Option<Ranked<K>> = None;

        for candidate in candidates {
            let distance = attacker.cell.distance(candidate.cell);
            if distance > attacker.range {
                continue;
            }

            let current = Ranked {
                key: candidate.key,
                distance,
                health: candidate.health,
                row_distance: attacker.owner.row_distance(candidate.cell.y(), self.arena),
                column: candidate.cell.x(),
            };

            match &mut best {
                Some(existing) => {
                    if current.precedes(existing) {
                        *existing = current;
                    }
                }
                None => best = Some(current),
            }
        }

        best.map(|ranked| ranked.key)
    }

    /// Iterates over the candidates within `range` of `origin`, in input order.
    pub fn within_range<'a, K, I>(
        origin: CellCoord,
        range: f64,
        candidates: I,
    ) -> impl Iterator<Item = Candidate<K>> + 'a
    where
        K: Copy + 'a,
        I: IntoIterator<Item = Candidate<K>>,
        I::IntoIter: 'a,
    {
        candidates
            .into_iter()
            .filter(move |candidate| origin.distance(candidate.cell) <= range)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Ranked<K> {
    key: K,
    distance: f64,
    health: f64,
    row_distance: i32,
    column: i32,
}

impl<K> Ranked<K> {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance != other.distance {
            return self.distance < other.distance;
        }

        if self.health != other.health {
            return self.health < other.health;
        }

        if self.row_distance != other.row_distance {
            return self.row_distance < other.row_distance;
        }

        self.column < other.column
    }
}
