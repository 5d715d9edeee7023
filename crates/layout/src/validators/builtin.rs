use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cell::CellState;
use crate::query::LayoutQuery;
use crate::rng::CellRng;

use super::registry::SpawnValidator;

/// Passes with the given probability, decided by the cell's stream. The
/// same cell always gets the same answer for the same seed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomChance {
    pub probability: f64,
}

impl RandomChance {
    pub const KIND: &'static str = "random_chance";
}

impl SpawnValidator for RandomChance {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn is_valid_spawn(&self, _layout: &dyn LayoutQuery, _cell: &CellState, rng: &mut CellRng) -> bool {
        rng.0.gen_bool(self.probability.clamp(0.0, 1.0))
    }
}

/// Keeps content at least `margin` cells away from every grid edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeMargin {
    pub margin: u32,
}

impl EdgeMargin {
    pub const KIND: &'static str = "edge_margin";
}

impl SpawnValidator for EdgeMargin {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn is_valid_spawn(&self, layout: &dyn LayoutQuery, cell: &CellState, _rng: &mut CellRng) -> bool {
        let dims = layout.dimensions().as_ivec2();
        let p = cell.position();
        let margin = self.margin as i32;
        p.x >= margin && p.y >= margin && dims.x - 1 - p.x >= margin && dims.y - 1 - p.y >= margin
    }
}

/// Caps how many cells may hold the candidate's content. Cells other than
/// the candidate's own position are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxInstances {
    pub max: usize,
}

impl MaxInstances {
    pub const KIND: &'static str = "max_instances";
}

impl SpawnValidator for MaxInstances {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn is_valid_spawn(&self, layout: &dyn LayoutQuery, cell: &CellState, _rng: &mut CellRng) -> bool {
        let Some(content) = cell.content() else {
            return true;
        };
        let mut others = layout.generated_count(content);
        if cell.is_generated() {
            // The view counts the candidate itself once its cell is generated.
            others = others.saturating_sub(1);
        }
        others < self.max
    }
}
