use bevy::prelude::*;

use crate::catalog::{ContentDefinition, ContentId};
use crate::query::LayoutQuery;
use crate::rng::CellRng;
use crate::sides::{CellSides, Side};

/// Quarter turns taken modulo 4, negative turns included.
pub fn normalize_rotation(rotation: i32) -> u8 {
    rotation.rem_euclid(4) as u8
}

/// Logical state of one grid cell: where it is, what content it holds and
/// which sides that content connects or blocks.
///
/// Connection and blocking patterns are always the catalog row's patterns
/// rotated by `rotation`; an unassigned cell has both patterns empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CellState {
    position: IVec2,
    rotation: u8,
    content: Option<ContentId>,
    has_connections: CellSides,
    disable_neighbour_sides: CellSides,
    is_generated: bool,
    unique_seed: u32,
}

impl CellState {
    pub fn empty(position: IVec2, unique_seed: u32) -> Self {
        Self {
            position,
            rotation: 0,
            content: None,
            has_connections: CellSides::NONE,
            disable_neighbour_sides: CellSides::NONE,
            is_generated: false,
            unique_seed,
        }
    }

    /// This cell as it would look holding `content` at `rotation`.
    /// Generation status is left as it is.
    pub fn with_pattern(&self, content: ContentId, definition: &ContentDefinition, rotation: u8) -> Self {
        let rotation = rotation % 4;
        Self {
            position: self.position,
            rotation,
            content: Some(content),
            has_connections: definition.has_connections.rotated(rotation),
            disable_neighbour_sides: definition.disable_neighbour_sides.rotated(rotation),
            is_generated: self.is_generated,
            unique_seed: self.unique_seed,
        }
    }

    pub(crate) fn generated(mut self) -> Self {
        self.is_generated = true;
        self
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn content(&self) -> Option<&ContentId> {
        self.content.as_ref()
    }

    pub fn has_connections(&self) -> CellSides {
        self.has_connections
    }

    pub fn disable_neighbour_sides(&self) -> CellSides {
        self.disable_neighbour_sides
    }

    pub fn is_generated(&self) -> bool {
        self.is_generated
    }

    pub fn unique_seed(&self) -> u32 {
        self.unique_seed
    }

    /// Fresh stream seeded from this cell's unique seed.
    pub fn random_stream(&self) -> CellRng {
        CellRng::from_seed(self.unique_seed)
    }

    /// Sides whose neighbour exposes a connection facing back at this cell.
    pub fn required_connections(&self, layout: &(impl LayoutQuery + ?Sized)) -> CellSides {
        let neighbours = layout.neighbours(self.position, false);
        let mut required = CellSides::NONE;
        for (side, neighbour) in neighbours.iter() {
            required.set(side, neighbour.has_connections.get(side.opposite()));
        }
        required
    }

    /// Sides where this cell may not connect: no neighbour, a neighbour that
    /// is itself blocked, or a generated neighbour without a connection back.
    pub fn blocked_connections(&self, layout: &(impl LayoutQuery + ?Sized)) -> CellSides {
        let neighbours = layout.neighbours(self.position, false);
        let mut blocked = CellSides::NONE;
        for side in Side::ALL {
            let is_blocked = match neighbours.get(side) {
                None => true,
                Some(neighbour) => {
                    neighbour.is_blocked_by_neighbour(layout)
                        || (neighbour.is_generated
                            && !neighbour.has_connections.get(side.opposite()))
                }
            };
            blocked.set(side, is_blocked);
        }
        blocked
    }

    /// True if any neighbour disables the side facing this cell.
    pub fn is_blocked_by_neighbour(&self, layout: &(impl LayoutQuery + ?Sized)) -> bool {
        layout
            .neighbours(self.position, false)
            .iter()
            .any(|(side, neighbour)| neighbour.disable_neighbour_sides.get(side.opposite()))
    }

    /// A neighbour already depends on this cell, so it must receive content.
    pub fn is_required_to_generate(&self, layout: &(impl LayoutQuery + ?Sized)) -> bool {
        self.required_connections(layout).any()
    }

    /// Side-by-side fit of this state against its neighbours. `layout` must
    /// already show this state at this cell's position.
    pub(crate) fn fits_neighbours(&self, layout: &(impl LayoutQuery + ?Sized)) -> bool {
        let required = self.required_connections(layout);
        let blocked = self.blocked_connections(layout);
        let neighbours = layout.neighbours(self.position, false);

        Side::ALL.into_iter().all(|side| {
            let connects = self.has_connections.get(side);
            if required.get(side) && !connects {
                return false;
            }
            if blocked.get(side) && connects {
                return false;
            }
            // A neighbour that is committed or depended upon may not be newly disabled.
            if self.disable_neighbour_sides.get(side) {
                if let Some(neighbour) = neighbours.get(side) {
                    if neighbour.is_generated || neighbour.is_required_to_generate(layout) {
                        return false;
                    }
                }
            }
            true
        })
    }
}
