pub(crate) use self::cage::CageConstraint;
pub(crate) use self::killer_cage::KillerCageConstraint;
pub(crate) use self::uniqueness::{BoxUniqueness, RowColUniqueness};

pub(crate) mod cage;

mod killer_cage;
mod uniqueness;

use enum_dispatch::enum_dispatch;

use crate::collections::square::Coord;
use crate::collections::Square;
use crate::puzzle::Value;

/// Answers "can `value` go at `coord` given the current grid state?"
///
/// Implementations must tolerate partially filled grids and must not
/// assume cage cells form a connected region.
#[enum_dispatch]
pub(crate) trait Constraint {
    fn can_place(&self, grid: &Square<Value>, coord: Coord, value: Value) -> bool;
}

#[enum_dispatch(Constraint)]
#[derive(Clone)]
pub(crate) enum AnyConstraint {
    RowColUniqueness,
    BoxUniqueness,
    CageConstraint,
    KillerCageConstraint,
}

/// Logical AND over a set of constraints, short-circuiting on the
/// first rejection
#[derive(Clone, Default)]
pub(crate) struct ConstraintSet {
    constraints: Vec<AnyConstraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, constraint: impl Into<AnyConstraint>) {
        self.constraints.push(constraint.into());
    }

    pub fn can_place(&self, grid: &Square<Value>, coord: Coord, value: Value) -> bool {
        self.constraints
            .iter()
            .all(|c| c.can_place(grid, coord, value))
    }
}
