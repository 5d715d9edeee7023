//! Reachability between generated cells through mutual connections.

use std::collections::HashSet;

use bevy::prelude::*;
use pathfinding::directed::bfs::bfs_reach;

use crate::query::LayoutQuery;
use crate::sides::Side;

use super::layout_grid::LayoutGrid;

impl LayoutGrid {
    /// Generated neighbours that `position` connects to and that connect
    /// back.
    pub fn linked_neighbours(&self, position: IVec2) -> Vec<IVec2> {
        let Some(cell) = self.cell_state(position) else {
            return Vec::new();
        };
        if !cell.is_generated() {
            return Vec::new();
        }
        self.neighbours(position, false)
            .iter()
            .filter(|(side, n)| {
                n.is_generated()
                    && cell.has_connections().get(*side)
                    && n.has_connections().get(side.opposite())
            })
            .map(|(_, n)| n.position())
            .collect()
    }

    /// Cells reachable from `start` by walking mutual connections, `start`
    /// included. Empty when `start` is not generated.
    pub fn connected_region(&self, start: IVec2) -> HashSet<IVec2> {
        if !self.cell(start).is_some_and(|c| c.is_generated()) {
            return HashSet::new();
        }
        bfs_reach(start, |&p| self.linked_neighbours(p)).collect()
    }

    /// Whether every generated cell can reach every other. Vacuously true for
    /// an empty layout.
    pub fn is_fully_connected(&self) -> bool {
        let Some(first) = self.generated_cells().next() else {
            return true;
        };
        let region = self.connected_region(first.position());
        region.len() == self.generated_cells().count()
    }

    /// Connections offered by generated cells that nothing answers yet: the
    /// neighbour is missing, not generated, or has no connection back.
    pub fn open_connections(&self) -> Vec<(IVec2, Side)> {
        let mut open = Vec::new();
        for cell in self.generated_cells() {
            let neighbours = self.neighbours(cell.position(), false);
            for side in cell.has_connections().iter() {
                let answered = neighbours.get(side).is_some_and(|n| {
                    n.is_generated() && n.has_connections().get(side.opposite())
                });
                if !answered {
                    open.push((cell.position(), side));
                }
            }
        }
        open
    }
}
