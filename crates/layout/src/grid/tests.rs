use std::collections::HashSet;

use bevy::prelude::*;

use super::*;
use crate::catalog::ContentId;
use crate::config::LayoutConfig;
use crate::query::LayoutQuery;
use crate::rng::cell_seed;
use crate::sides::Side;
use crate::test_harness::TestLayout;

// ====================================================================
// Construction
// ====================================================================

#[test]
fn test_every_position_has_a_cell() {
    let grid = LayoutGrid::new(&LayoutConfig::with_size(5, 3));
    assert_eq!(grid.cells().count(), 15);
    for y in 0..3 {
        for x in 0..5 {
            let p = IVec2::new(x, y);
            let cell = grid.cell(p).unwrap();
            assert_eq!(cell.position(), p);
            assert!(!cell.is_generated());
        }
    }
    assert!(grid.cell(IVec2::new(5, 0)).is_none());
    assert_eq!(grid.index(IVec2::new(2, 1)), Some(7));
}

#[test]
fn test_cell_seeds_follow_layout_seed() {
    let grid = LayoutGrid::new(&LayoutConfig::with_size(3, 3).with_seed(42));
    let p = IVec2::new(2, 1);
    assert_eq!(grid.cell(p).unwrap().unique_seed(), cell_seed(42, p));

    let seeds: HashSet<u32> = grid.cells().map(|c| c.unique_seed()).collect();
    assert_eq!(seeds.len(), 9, "every cell gets its own stream");
}

#[test]
fn test_grid_from_world_reads_config() {
    let mut world = World::new();
    world.insert_resource(LayoutConfig::with_size(2, 6).with_seed(3));
    let grid = LayoutGrid::from_world(&mut world);
    assert_eq!(grid.dimensions(), UVec2::new(2, 6));
    assert_eq!(grid.seed(), 3);
}

#[test]
fn test_out_of_grid_operations_are_noops() {
    let mut layout = TestLayout::new(2, 2);
    let outside = IVec2::new(-1, 4);
    assert!(!layout.assign(outside, "Cross", 0));
    assert!(!layout.validate(outside, "Cross", 0));
    assert_eq!(layout.load(outside), None);
    assert!(!layout.grid.unload_content(outside));
    assert!(layout
        .grid
        .valid_candidates(outside, &layout.catalog, &layout.diagnostics)
        .is_empty());
}

#[test]
fn test_clear_resets_all_cells() {
    let mut layout = TestLayout::new(2, 2).synchronous();
    layout.assign(IVec2::new(0, 0), "Corner", 0);
    layout.assign(IVec2::new(1, 1), "Corner", 2);
    layout.load(IVec2::new(0, 0));

    layout.grid.clear();
    assert_eq!(layout.grid.generated_cells().count(), 0);
    layout.streamer.process_releases();
    assert_eq!(layout.streamer.live_instances(), 0);
}

// ====================================================================
// Candidates
// ====================================================================

#[test]
fn test_valid_candidates_in_a_lone_cell() {
    let layout = TestLayout::new(1, 1);
    let candidates = layout
        .grid
        .valid_candidates(IVec2::ZERO, &layout.catalog, &layout.diagnostics);
    // Only rows without connections fit a cell with no neighbours.
    let rows: HashSet<&str> = candidates.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(rows, HashSet::from(["Closed"]));
    assert_eq!(candidates.len(), 4, "one per rotation");
}

#[test]
fn test_valid_candidates_answer_a_dead_end() {
    let mut layout = TestLayout::new(3, 1);
    // (2,0) opens toward (1,0); (1,0) must answer on +X and nothing else
    // fits at the grid's top and bottom edges.
    assert!(layout.assign(IVec2::new(2, 0), "DeadEnd", 2));
    let candidates = layout
        .grid
        .valid_candidates(IVec2::new(1, 0), &layout.catalog, &layout.diagnostics);

    assert!(candidates.contains(&(ContentId::from("DeadEnd"), 0)));
    assert!(candidates.contains(&(ContentId::from("Straight"), 0)));
    assert!(candidates.contains(&(ContentId::from("Straight"), 2)));
    assert!(!candidates.iter().any(|(id, _)| id.as_str() == "Closed"));
    assert!(!candidates.iter().any(|(id, _)| id.as_str() == "Corner"));

    for (id, rotation) in &candidates {
        assert!(layout.validate(IVec2::new(1, 0), id.as_str(), i32::from(*rotation)));
    }
}

// ====================================================================
// Connectivity
// ====================================================================

/// A 3x1 corridor: dead end, straight, dead end.
fn corridor() -> TestLayout {
    let mut layout = TestLayout::new(3, 1);
    assert!(layout.place(IVec2::new(0, 0), "DeadEnd", 0));
    assert!(layout.place(IVec2::new(1, 0), "Straight", 0));
    assert!(layout.place(IVec2::new(2, 0), "DeadEnd", 2));
    layout
}

#[test]
fn test_corridor_is_connected_and_closed() {
    let layout = corridor();
    assert!(layout.grid.is_fully_connected());
    assert!(layout.grid.open_connections().is_empty());
    assert_eq!(layout.grid.connected_region(IVec2::new(0, 0)).len(), 3);
}

#[test]
fn test_linked_neighbours_need_both_sides() {
    let mut layout = TestLayout::new(2, 1);
    layout.assign(IVec2::new(0, 0), "DeadEnd", 0);
    layout.assign(IVec2::new(1, 0), "Closed", 0);
    assert!(layout.grid.linked_neighbours(IVec2::new(0, 0)).is_empty());
    assert_eq!(layout.grid.open_connections(), vec![(IVec2::new(0, 0), Side::PosX)]);
    assert!(!layout.grid.is_fully_connected());
}

#[test]
fn test_empty_layout_is_vacuously_connected() {
    let layout = TestLayout::new(4, 4);
    assert!(layout.grid.is_fully_connected());
    assert!(layout.grid.connected_region(IVec2::ZERO).is_empty());
}

#[test]
fn test_open_connection_at_grid_edge() {
    let mut layout = TestLayout::new(2, 2);
    layout.assign(IVec2::new(0, 0), "DeadEnd", 3);
    assert_eq!(layout.grid.open_connections(), vec![(IVec2::new(0, 0), Side::NegY)]);
}

#[test]
fn test_two_islands() {
    let mut layout = TestLayout::new(5, 1);
    layout.assign(IVec2::new(0, 0), "DeadEnd", 0);
    layout.assign(IVec2::new(1, 0), "DeadEnd", 2);
    layout.assign(IVec2::new(3, 0), "DeadEnd", 0);
    layout.assign(IVec2::new(4, 0), "DeadEnd", 2);
    assert!(layout.grid.open_connections().is_empty());
    assert!(!layout.grid.is_fully_connected());
    let region = layout.grid.connected_region(IVec2::new(3, 0));
    assert_eq!(region, HashSet::from([IVec2::new(3, 0), IVec2::new(4, 0)]));
}

// ====================================================================
// Queries through the grid
// ====================================================================

#[test]
fn test_generated_count() {
    let layout = corridor();
    assert_eq!(layout.grid.generated_count(&ContentId::from("DeadEnd")), 2);
    assert_eq!(layout.grid.generated_count(&ContentId::from("Straight")), 1);
    assert_eq!(layout.grid.generated_count(&ContentId::from("Cross")), 0);
}

#[test]
fn test_poll_reports_each_completed_cell() {
    let mut layout = corridor();
    for x in 0..3 {
        layout.load(IVec2::new(x, 0));
    }
    let done = layout.poll();
    assert_eq!(
        done,
        vec![(IVec2::new(0, 0), 2), (IVec2::new(1, 0), 2), (IVec2::new(2, 0), 2)]
    );
    assert!(layout.grid.cells().all(|c| c.is_loaded()));
}
