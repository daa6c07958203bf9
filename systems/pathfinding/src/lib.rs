#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic shortest-path search from a cell to an arena edge.
//!
//! The pathfinder runs a breadth-first search from the start cell to find the
//! closest reachable cells of the target edge, falls back to the most "ideal"
//! reachable cells when the edge is sealed off, and then walks greedily down a
//! second breadth-first field seeded from those candidates. Ties between
//! equally good steps are broken by direction persistence, so the produced
//! path zig-zags instead of running along one axis before turning.

use std::collections::VecDeque;

use breach_sim_core::{ArenaSize, Axis, CellCoord, Direction, Edge, EdgeTable};

/// Idealness assigned to cells lying on the target edge itself.
const EDGE_IDEALNESS: u64 = 1_000_000;

const UNREACHABLE: u32 = u32::MAX;

/// Reusable shortest-path planner bound to one arena size.
///
/// The dense distance buffers are allocated once and reused across calls.
#[derive(Clone, Debug)]
pub struct Pathfinder {
    edges: EdgeTable,
    from_start: Vec<u32>,
    to_candidates: Vec<u32>,
    queue: VecDeque<CellCoord>,
    reachable: Vec<CellCoord>,
    candidates: Vec<CellCoord>,
}

impl Pathfinder {
    /// Creates a pathfinder for the provided arena.
    #[must_use]
    pub fn new(arena: ArenaSize) -> Self {
        let cell_count = arena.square_cell_count();
        Self {
            edges: EdgeTable::new(arena),
            from_start: vec![UNREACHABLE; cell_count],
            to_candidates: vec![UNREACHABLE; cell_count],
            queue: VecDeque::new(),
            reachable: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Arena the pathfinder plans for.
    #[must_use]
    pub fn arena(&self) -> ArenaSize {
        self.edges.arena()
    }

    /// Computes the path a mobile unit follows from `start` toward `edge`.
    ///
    /// The returned cells exclude `start`; each is 4-adjacent to its
    /// predecessor. The path is empty when `start` is blocked or already a
    /// target. `last_axis` is the axis of the unit's previous step and drives
    /// the tie-break between equally short moves.
    pub fn shortest_path_to_edge<F>(
        &mut self,
        start: CellCoord,
        edge: Edge,
        last_axis: Axis,
        mut is_blocked: F,
    ) -> Vec<CellCoord>
    where
        F: FnMut(CellCoord) -> bool,
    {
        let arena = self.arena();
        let mut walkable = |cell: CellCoord| arena.contains(cell) && !is_blocked(cell);

        if !walkable(start) {
            return Vec::new();
        }

        self.reachable.clear();
        flood(
            arena,
            &mut self.from_start,
            &mut self.queue,
            std::slice::from_ref(&start),
            &mut walkable,
            Some(&mut self.reachable),
        );
        self.select_candidates(edge);
        flood(
            arena,
            &mut self.to_candidates,
            &mut self.queue,
            &self.candidates,
            &mut walkable,
            None,
        );

        let heading = edge.heading();
        let mut path = Vec::new();
        let mut current = start;
        let mut axis = last_axis;

        while !self.candidates.contains(&current) {
            let Some(next) = self.best_step(current, axis, heading, &mut walkable) else {
                log::warn!(
                    "path from {start} toward {edge} stalled at {current} after {} steps",
                    path.len()
                );
                break;
            };

            if let Some(direction) = Direction::between(current, next) {
                axis = direction.axis();
            }
            path.push(next);
            current = next;
        }

        path
    }

    fn select_candidates(&mut self, edge: Edge) {
        let arena = self.arena();
        self.candidates.clear();

        let mut closest = UNREACHABLE;
        for &cell in self.edges.cells(edge) {
            let distance = distance_at(arena, &self.from_start, cell);
            if distance == UNREACHABLE || distance > closest {
                continue;
            }

            if distance < closest {
                closest = distance;
                self.candidates.clear();
            }
            self.candidates.push(cell);
        }

        if !self.candidates.is_empty() {
            return;
        }

        let mut best = None;
        for &cell in &self.reachable {
            let score = idealness(cell, edge, &self.edges);
            match best {
                Some(current) if score < current => continue,
                Some(current) if score == current => {}
                _ => {
                    best = Some(score);
                    self.candidates.clear();
                }
            }
            self.candidates.push(cell);
        }
    }

    fn best_step<W>(
        &self,
        current: CellCoord,
        axis: Axis,
        heading: (i32, i32),
        walkable: &mut W,
    ) -> Option<CellCoord>
    where
        W: FnMut(CellCoord) -> bool,
    {
        let arena = self.arena();
        let mut closest = distance_at(arena, &self.to_candidates, current);
        let mut best: Option<CellCoord> = None;

        for neighbor in arena.neighbors(current) {
            if !walkable(neighbor) {
                continue;
            }

            let distance = distance_at(arena, &self.to_candidates, neighbor);
            if distance == UNREACHABLE || distance > closest {
                continue;
            }

            if distance < closest {
                closest = distance;
                best = Some(neighbor);
            } else if let Some(incumbent) = best {
                if distance == closest && prefers(current, incumbent, neighbor, axis, heading) {
                    best = Some(neighbor);
                }
            }
        }

        best
    }
}

/// Reports whether `challenger` is a better step from `origin` than `incumbent`.
///
/// A step that changes axis beats one that keeps it. Between steps on the same
/// axis the one moving toward the edge's heading wins.
fn prefers(
    origin: CellCoord,
    incumbent: CellCoord,
    challenger: CellCoord,
    last_axis: Axis,
    heading: (i32, i32),
) -> bool {
    let (Some(held), Some(offered)) = (
        Direction::between(origin, incumbent),
        Direction::between(origin, challenger),
    ) else {
        return false;
    };

    let held_turns = held.axis() != last_axis;
    let offered_turns = offered.axis() != last_axis;
    if offered_turns != held_turns {
        return offered_turns;
    }

    match offered.axis() {
        Axis::Horizontal => (challenger.x() - origin.x()).signum() == heading.0,
        Axis::Vertical => (challenger.y() - origin.y()).signum() == heading.1,
    }
}

/// Ranks how far a cell lies into the edge's quadrant; rows outweigh columns.
fn idealness(cell: CellCoord, edge: Edge, edges: &EdgeTable) -> u64 {
    if edges.contains(edge, cell) {
        return EDGE_IDEALNESS;
    }

    let size = edges.arena().side();
    let (sx, sy) = edge.heading();
    let column = if sx == 1 { cell.x() } else { size - 1 - cell.x() };
    let row = if sy == 1 { cell.y() } else { size - 1 - cell.y() };

    let column = u64::try_from(column).unwrap_or(0);
    let row = u64::try_from(row).unwrap_or(0);
    let size = u64::try_from(size).unwrap_or(0);
    column + size * row
}

fn distance_at(arena: ArenaSize, field: &[u32], cell: CellCoord) -> u32 {
    arena
        .index(cell)
        .and_then(|index| field.get(index).copied())
        .unwrap_or(UNREACHABLE)
}

/// Breadth-first distances from `sources` over walkable cells.
fn flood<W>(
    arena: ArenaSize,
    distances: &mut Vec<u32>,
    queue: &mut VecDeque<CellCoord>,
    sources: &[CellCoord],
    walkable: &mut W,
    mut visited: Option<&mut Vec<CellCoord>>,
) where
    W: FnMut(CellCoord) -> bool,
{
    let cell_count = arena.square_cell_count();
    if distances.len() != cell_count {
        *distances = vec![UNREACHABLE; cell_count];
    } else {
        distances.fill(UNREACHABLE);
    }
    queue.clear();

    for &source in sources {
        if !walkable(source) {
            continue;
        }

        let Some(index) = arena.index(source) else {
            continue;
        };

        if distances[index] == 0 {
            continue;
        }

        distances[index] = 0;
        queue.push_back(source);
    }

    while let Some(cell) = queue.pop_front() {
        let Some(current_index) = arena.index(cell) else {
            continue;
        };
        let next_distance = distances[current_index].saturating_add(1);

        if let Some(visited) = visited.as_deref_mut() {
            visited.push(cell);
        }

        for neighbor in arena.neighbors(cell) {
            let Some(neighbor_index) = arena.index(neighbor) else {
                continue;
            };

            if distances[neighbor_index] <= next_distance || !walkable(neighbor) {
                continue;
            }

            distances[neighbor_index] = next_distance;
            queue.push_back(neighbor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin_cell() -> CellCoord {
        CellCoord::new(10, 10)
    }

    #[test]
    fn prefers_turning_over_keeping_axis() {
        let origin = origin_cell();
        let right = origin.offset(1, 0);
        let up = origin.offset(0, 1);

        assert!(prefers(origin, right, up, Axis::Horizontal, (1, 1)));
        assert!(!prefers(origin, up, right, Axis::Horizontal, (1, 1)));
        assert!(prefers(origin, up, right, Axis::Vertical, (1, 1)));
    }

    #[test]
    fn prefers_heading_on_same_axis() {
        let origin = origin_cell();
        let left = origin.offset(-1, 0);
        let right = origin.offset(1, 0);

        assert!(prefers(origin, left, right, Axis::Vertical, (1, 1)));
        assert!(!prefers(origin, right, left, Axis::Vertical, (1, 1)));
        assert!(prefers(origin, right, left, Axis::Vertical, (-1, 1)));

        let down = origin.offset(0, -1);
        let up = origin.offset(0, 1);
        assert!(prefers(origin, up, down, Axis::Horizontal, (1, -1)));
    }

    #[test]
    fn idealness_favours_rows_over_columns() {
        let arena = ArenaSize::default();
        let edges = EdgeTable::new(arena);

        let deep = idealness(CellCoord::new(13, 20), Edge::TopRight, &edges);
        let wide = idealness(CellCoord::new(20, 19), Edge::TopRight, &edges);
        assert!(deep > wide);
        assert_eq!(
            idealness(CellCoord::new(14, 27), Edge::TopRight, &edges),
            EDGE_IDEALNESS
        );
        assert_eq!(
            idealness(CellCoord::new(13, 0), Edge::BottomLeft, &edges),
            EDGE_IDEALNESS
        );
        assert_eq!(
            idealness(CellCoord::new(14, 1), Edge::BottomLeft, &edges),
            13 + 28 * 26
        );
    }

    #[test]
    fn flood_skips_blocked_cells() {
        let arena = ArenaSize::new(4).expect("valid arena size");
        let mut distances = Vec::new();
        let mut queue = VecDeque::new();
        let mut visited = Vec::new();
        let wall = CellCoord::new(2, 1);
        let mut walkable = |cell: CellCoord| arena.contains(cell) && cell != wall;

        flood(
            arena,
            &mut distances,
            &mut queue,
            &[CellCoord::new(1, 0)],
            &mut walkable,
            Some(&mut visited),
        );

        assert_eq!(distance_at(arena, &distances, CellCoord::new(1, 0)), 0);
        assert_eq!(distance_at(arena, &distances, CellCoord::new(2, 0)), 1);
        assert_eq!(distance_at(arena, &distances, wall), UNREACHABLE);
        assert_eq!(distance_at(arena, &distances, CellCoord::new(3, 1)), 5);
        assert_eq!(visited.first(), Some(&CellCoord::new(1, 0)));
        assert!(!visited.contains(&wall));
    }
}
