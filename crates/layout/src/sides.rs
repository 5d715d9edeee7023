//! The four planar sides of a cell and the per-side flag set used for
//! connection and blocking patterns.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One of the four planar directions a cell can connect through.
///
/// Index order is `PosX, PosY, NegX, NegY`, which is also the order a
/// clockwise quarter turn walks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    PosX,
    PosY,
    NegX,
    NegY,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::PosX, Side::PosY, Side::NegX, Side::NegY];

    pub fn index(self) -> usize {
        match self {
            Side::PosX => 0,
            Side::PosY => 1,
            Side::NegX => 2,
            Side::NegY => 3,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::PosX => Side::NegX,
            Side::PosY => Side::NegY,
            Side::NegX => Side::PosX,
            Side::NegY => Side::PosY,
        }
    }

    /// The side this one lands on after a single clockwise quarter turn.
    pub fn clockwise(self) -> Side {
        match self {
            Side::PosX => Side::PosY,
            Side::PosY => Side::NegX,
            Side::NegX => Side::NegY,
            Side::NegY => Side::PosX,
        }
    }

    /// Grid offset of the neighbour on this side.
    pub fn offset(self) -> IVec2 {
        match self {
            Side::PosX => IVec2::X,
            Side::PosY => IVec2::Y,
            Side::NegX => IVec2::NEG_X,
            Side::NegY => IVec2::NEG_Y,
        }
    }

    /// Unit direction in world space. Grid +Y runs along world +Z.
    pub fn world_direction(self) -> Vec3 {
        match self {
            Side::PosX => Vec3::X,
            Side::PosY => Vec3::Z,
            Side::NegX => Vec3::NEG_X,
            Side::NegY => Vec3::NEG_Z,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::PosX => "+X",
            Side::PosY => "+Y",
            Side::NegX => "-X",
            Side::NegY => "-Y",
        }
    }
}

/// Four independent flags, one per `Side`.
///
/// Authored in catalog JSON as `{"px": true, "ny": true}`; missing fields are
/// `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CellSides {
    pub px: bool,
    pub py: bool,
    pub nx: bool,
    pub ny: bool,
}

impl CellSides {
    pub const NONE: CellSides = CellSides::new(false, false, false, false);
    pub const ALL: CellSides = CellSides::new(true, true, true, true);

    pub const fn new(px: bool, py: bool, nx: bool, ny: bool) -> Self {
        Self { px, py, nx, ny }
    }

    /// Flags set only on the given sides.
    pub fn from_sides(sides: &[Side]) -> Self {
        let mut out = Self::NONE;
        for &side in sides {
            out.set(side, true);
        }
        out
    }

    pub fn get(&self, side: Side) -> bool {
        match side {
            Side::PosX => self.px,
            Side::PosY => self.py,
            Side::NegX => self.nx,
            Side::NegY => self.ny,
        }
    }

    pub fn set(&mut self, side: Side, value: bool) {
        match side {
            Side::PosX => self.px = value,
            Side::PosY => self.py = value,
            Side::NegX => self.nx = value,
            Side::NegY => self.ny = value,
        }
    }

    pub fn any(&self) -> bool {
        *self != Self::NONE
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    pub fn count(&self) -> usize {
        Side::ALL.iter().filter(|&&s| self.get(s)).count()
    }

    /// Sides whose flag is set, in `Side::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = Side> + '_ {
        Side::ALL.into_iter().filter(move |&s| self.get(s))
    }

    /// One clockwise quarter turn: the +X flag moves to +Y, +Y to -X,
    /// -X to -Y and -Y back to +X.
    pub fn rotate_clockwise(&mut self) {
        *self = Self {
            px: self.ny,
            py: self.px,
            nx: self.py,
            ny: self.nx,
        };
    }

    /// Copy rotated clockwise by `quarter_turns` (taken modulo 4).
    pub fn rotated(mut self, quarter_turns: u8) -> Self {
        for _ in 0..(quarter_turns % 4) {
            self.rotate_clockwise();
        }
        self
    }
}
