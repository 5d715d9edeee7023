//! Read-only view of a layout, as seen by cell queries and spawn validators.

use bevy::prelude::*;

use crate::catalog::ContentId;
use crate::cell::CellState;
use crate::sides::Side;

/// Neighbour lookup and per-cell state of a layout grid.
///
/// Object safe so validators can take `&dyn LayoutQuery`. Lookups never
/// create cells; positions outside the grid simply have no state.
pub trait LayoutQuery {
    /// Grid size in cells.
    fn dimensions(&self) -> UVec2;

    /// State of the cell at `position`, if the grid has one there.
    fn cell_state(&self, position: IVec2) -> Option<&CellState>;

    fn in_bounds(&self, position: IVec2) -> bool {
        let dims = self.dimensions().as_ivec2();
        position.x >= 0 && position.y >= 0 && position.x < dims.x && position.y < dims.y
    }

    /// Position of the neighbour on `side`. With `wrap` the grid is treated
    /// as a torus; without it, sides past the edge have no neighbour.
    fn neighbour_position(&self, position: IVec2, side: Side, wrap: bool) -> Option<IVec2> {
        let target = position + side.offset();
        if wrap {
            let dims = self.dimensions().as_ivec2();
            if dims.x == 0 || dims.y == 0 {
                return None;
            }
            return Some(IVec2::new(
                target.x.rem_euclid(dims.x),
                target.y.rem_euclid(dims.y),
            ));
        }
        self.in_bounds(target).then_some(target)
    }

    /// The up-to-four neighbours of `position`, indexed by side.
    fn neighbours(&self, position: IVec2, wrap: bool) -> Neighbours<'_> {
        let mut cells = [None; 4];
        for side in Side::ALL {
            cells[side.index()] = self
                .neighbour_position(position, side, wrap)
                .and_then(|p| self.cell_state(p));
        }
        Neighbours { cells }
    }

    /// Number of generated cells currently holding `content`.
    fn generated_count(&self, content: &ContentId) -> usize {
        let dims = self.dimensions().as_ivec2();
        let mut count = 0;
        for y in 0..dims.y {
            for x in 0..dims.x {
                if let Some(state) = self.cell_state(IVec2::new(x, y)) {
                    if state.is_generated() && state.content() == Some(content) {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}

/// Result of a neighbour lookup: one optional cell per side.
#[derive(Debug, Clone, Copy)]
pub struct Neighbours<'a> {
    cells: [Option<&'a CellState>; 4],
}

impl<'a> Neighbours<'a> {
    pub fn get(&self, side: Side) -> Option<&'a CellState> {
        self.cells[side.index()]
    }

    /// Present neighbours with the side they sit on.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &'a CellState)> + '_ {
        Side::ALL
            .into_iter()
            .filter_map(move |side| self.get(side).map(|cell| (side, cell)))
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// A layout with one cell replaced by a simulated state.
///
/// Validation runs every neighbour query through this view so a candidate is
/// judged as if it were placed, without touching the live cell.
pub struct CandidateView<'a, Q: LayoutQuery + ?Sized> {
    base: &'a Q,
    candidate: &'a CellState,
}

impl<'a, Q: LayoutQuery + ?Sized> CandidateView<'a, Q> {
    pub fn new(base: &'a Q, candidate: &'a CellState) -> Self {
        Self { base, candidate }
    }

    pub fn candidate(&self) -> &CellState {
        self.candidate
    }
}

impl<Q: LayoutQuery + ?Sized> LayoutQuery for CandidateView<'_, Q> {
    fn dimensions(&self) -> UVec2 {
        self.base.dimensions()
    }

    fn cell_state(&self, position: IVec2) -> Option<&CellState> {
        if position == self.candidate.position() {
            return Some(self.candidate);
        }
        self.base.cell_state(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentDefinition;
    use crate::config::LayoutConfig;
    use crate::sides::CellSides;
    use crate::grid::LayoutGrid;

    #[test]
    fn test_corner_has_two_neighbours() {
        let grid = LayoutGrid::new(&LayoutConfig::with_size(3, 3));
        let neighbours = grid.neighbours(IVec2::ZERO, false);
        assert_eq!(neighbours.count(), 2);
        assert!(neighbours.get(Side::PosX).is_some());
        assert!(neighbours.get(Side::PosY).is_some());
        assert!(neighbours.get(Side::NegX).is_none());
        assert!(neighbours.get(Side::NegY).is_none());
    }

    #[test]
    fn test_wrap_reaches_far_edge() {
        let grid = LayoutGrid::new(&LayoutConfig::with_size(4, 3));
        assert_eq!(
            grid.neighbour_position(IVec2::ZERO, Side::NegX, true),
            Some(IVec2::new(3, 0))
        );
        assert_eq!(
            grid.neighbour_position(IVec2::new(0, 2), Side::PosY, true),
            Some(IVec2::new(0, 0))
        );
        assert_eq!(grid.neighbours(IVec2::ZERO, true).count(), 4);
    }

    #[test]
    fn test_lookup_outside_grid_is_none() {
        let grid = LayoutGrid::new(&LayoutConfig::with_size(2, 2));
        assert!(grid.cell_state(IVec2::new(-1, 0)).is_none());
        assert!(grid.cell_state(IVec2::new(2, 0)).is_none());
        assert_eq!(grid.neighbours(IVec2::new(5, 5), false).count(), 0);
    }

    #[test]
    fn test_candidate_view_overrides_only_its_cell() {
        let grid = LayoutGrid::new(&LayoutConfig::with_size(2, 1));
        let live = grid.cell_state(IVec2::ZERO).unwrap();
        let definition = ContentDefinition::new(CellSides::ALL);
        let candidate = live.with_pattern(ContentId::from("Cross"), &definition, 3);

        let view = CandidateView::new(&grid, &candidate);
        assert_eq!(view.cell_state(IVec2::ZERO).unwrap().rotation(), 3);
        assert_eq!(grid.cell_state(IVec2::ZERO).unwrap().rotation(), 0);
        assert_eq!(
            view.cell_state(IVec2::new(1, 0)),
            grid.cell_state(IVec2::new(1, 0))
        );
    }
}
