use std::collections::HashSet;

use breach_sim_core::{ArenaSize, Axis, CellCoord, Edge};
use breach_sim_system_pathfinding::Pathfinder;
use proptest::prelude::*;

fn assert_contiguous(start: CellCoord, path: &[CellCoord]) {
    let mut previous = start;
    for &cell in path {
        assert_eq!(
            previous.manhattan_distance(cell),
            1,
            "step {previous} -> {cell} is not adjacent"
        );
        previous = cell;
    }
}

#[test]
fn clear_board_path_reaches_edge_with_manhattan_length() {
    let arena = ArenaSize::default();
    let mut pathfinder = Pathfinder::new(arena);
    let start = CellCoord::new(13, 0);

    let path = pathfinder.shortest_path_to_edge(start, Edge::TopRight, Axis::Horizontal, |_| false);

    let last = *path.last().expect("path is not empty");
    assert!(Edge::TopRight.contains(last, arena));
    assert_eq!(path.len() as u32, start.manhattan_distance(last));
    assert_contiguous(start, &path);
}

#[test]
fn clear_board_path_alternates_axes() {
    let arena = ArenaSize::default();
    let mut pathfinder = Pathfinder::new(arena);
    let start = CellCoord::new(13, 0);

    let path = pathfinder.shortest_path_to_edge(start, Edge::TopRight, Axis::Horizontal, |_| false);

    assert_eq!(path.first(), Some(&CellCoord::new(13, 1)));
    assert_eq!(path.get(1), Some(&CellCoord::new(14, 1)));
    assert_eq!(path.get(2), Some(&CellCoord::new(14, 2)));
}

#[test]
fn blocked_start_yields_empty_path() {
    let arena = ArenaSize::default();
    let mut pathfinder = Pathfinder::new(arena);
    let start = CellCoord::new(13, 0);

    let path =
        pathfinder.shortest_path_to_edge(start, Edge::TopRight, Axis::Horizontal, |cell| cell == start);

    assert!(path.is_empty());
}

#[test]
fn start_on_target_edge_yields_empty_path() {
    let arena = ArenaSize::default();
    let mut pathfinder = Pathfinder::new(arena);

    let path = pathfinder.shortest_path_to_edge(
        CellCoord::new(14, 27),
        Edge::TopRight,
        Axis::Vertical,
        |_| false,
    );

    assert!(path.is_empty());
}

#[test]
fn sealed_pocket_walks_to_most_ideal_cell() {
    let arena = ArenaSize::default();
    let mut pathfinder = Pathfinder::new(arena);
    let start = CellCoord::new(13, 0);
    // Seal the bottom tip below row 3.
    let walls: HashSet<CellCoord> = (0..28).map(|x| CellCoord::new(x, 3)).collect();

    let path = pathfinder.shortest_path_to_edge(start, Edge::TopRight, Axis::Horizontal, |cell| {
        walls.contains(&cell)
    });

    // The pocket's most ideal cell for the top right edge is its highest row,
    // rightmost column.
    assert_eq!(path.last(), Some(&CellCoord::new(16, 2)));
    assert_contiguous(start, &path);
    assert!(path.iter().all(|cell| !walls.contains(cell)));
}

#[test]
fn detours_around_walls() {
    let arena = ArenaSize::default();
    let mut pathfinder = Pathfinder::new(arena);
    let start = CellCoord::new(13, 0);
    let walls: HashSet<CellCoord> = (5..23).map(|x| CellCoord::new(x, 10)).collect();

    let path = pathfinder.shortest_path_to_edge(start, Edge::TopLeft, Axis::Horizontal, |cell| {
        walls.contains(&cell)
    });

    let last = *path.last().expect("path is not empty");
    assert!(Edge::TopLeft.contains(last, arena));
    assert_contiguous(start, &path);
    assert!(path.iter().all(|cell| !walls.contains(cell)));
}

#[test]
fn repeated_queries_are_identical() {
    let arena = ArenaSize::default();
    let mut pathfinder = Pathfinder::new(arena);
    let walls: HashSet<CellCoord> = [CellCoord::new(14, 5), CellCoord::new(15, 6)]
        .into_iter()
        .collect();

    let first = pathfinder.shortest_path_to_edge(
        CellCoord::new(14, 0),
        Edge::TopLeft,
        Axis::Horizontal,
        |cell| walls.contains(&cell),
    );
    let _ = pathfinder.shortest_path_to_edge(
        CellCoord::new(0, 14),
        Edge::BottomRight,
        Axis::Vertical,
        |_| false,
    );
    let second = pathfinder.shortest_path_to_edge(
        CellCoord::new(14, 0),
        Edge::TopLeft,
        Axis::Horizontal,
        |cell| walls.contains(&cell),
    );

    assert_eq!(first, second);
}

proptest! {
    #[test]
    fn clear_board_paths_are_manhattan_optimal(index in 0usize..392, edge_slot in 0usize..4) {
        let arena = ArenaSize::default();
        let start = arena.cells().nth(index).expect("index within diamond");
        let edge = Edge::ALL[edge_slot];
        let mut pathfinder = Pathfinder::new(arena);

        let path = pathfinder.shortest_path_to_edge(start, edge, Axis::Horizontal, |_| false);

        let end = path.last().copied().unwrap_or(start);
        prop_assert!(edge.contains(end, arena));
        let nearest = edge
            .cells(arena)
            .into_iter()
            .map(|cell| start.manhattan_distance(cell))
            .min()
            .expect("edge has cells");
        prop_assert_eq!(path.len() as u32, nearest);
        let mut previous = start;
        for &cell in &path {
            prop_assert_eq!(previous.manhattan_distance(cell), 1);
            prop_assert!(arena.contains(cell));
            previous = cell;
        }
    }
}
