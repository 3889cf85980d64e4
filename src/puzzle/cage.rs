use crate::puzzle::{CageId, CellId, Value};

/// A cage in a KenKen puzzle
///
/// Every cell in the puzzle belongs to exactly one cage. Every cage has
/// an operator and a target number that the values in the cage must
/// produce.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cage {
    id: CageId,
    cell_ids: Vec<CellId>,
    operator: Operator,
    target: Value,
}

impl Cage {
    pub fn new(
        id: CageId,
        cell_ids: impl Into<Vec<CellId>>,
        operator: Operator,
        target: Value,
    ) -> Self {
        let mut cell_ids = cell_ids.into();
        debug_assert!(!cell_ids.is_empty());
        cell_ids.sort_unstable();
        Self {
            id,
            cell_ids,
            operator,
            target,
        }
    }

    pub fn id(&self) -> CageId {
        self.id
    }

    /// The IDs of the cells in the cage, in ascending order
    pub fn cell_ids(&self) -> &[CellId] {
        &self.cell_ids
    }

    pub fn cell_count(&self) -> usize {
        self.cell_ids.len()
    }

    pub fn is_singleton(&self) -> bool {
        self.cell_ids.len() == 1
    }

    /// The math operator on the cage
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The number on the cage
    ///
    /// For a [`Hide`](Operator::Hide) cage this is the concealed cell
    /// value, which must not be shown to the player.
    pub fn target(&self) -> Value {
        self.target
    }

    pub(crate) fn with_target(&self, target: Value) -> Self {
        Self {
            target,
            ..self.clone()
        }
    }
}

/// The math operators that can be on a cage
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Gcd,
    Lcm,
    /// A single-cell cage whose target is concealed from the player
    Hide,
}

impl Operator {
    /// The display symbol of the operator, `None` for hidden cages
    pub fn symbol(self) -> Option<&'static str> {
        let symbol = match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "x",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Gcd => "gcd",
            Operator::Lcm => "lcm",
            Operator::Hide => return None,
        };
        Some(symbol)
    }

    /// Whether the operator counts towards the "has a special operator"
    /// generation requirement
    pub fn is_special(self) -> bool {
        matches!(self, Operator::Modulo | Operator::Gcd | Operator::Lcm)
    }
}
