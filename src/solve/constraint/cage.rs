use super::Constraint;
use crate::collections::square::Coord;
use crate::collections::Square;
use crate::puzzle::{Cage, CellId, Operator, Value, UNFILLED};

/// Enforces one KenKen cage: the filled values must still be able to
/// produce the cage target with the cage operator
#[derive(Clone)]
pub(crate) struct CageConstraint {
    cell_ids: Vec<CellId>,
    operator: Operator,
    target: Value,
}

impl CageConstraint {
    pub fn new(cage: &Cage) -> Self {
        Self {
            cell_ids: cage.cell_ids().to_vec(),
            operator: cage.operator(),
            target: cage.target(),
        }
    }
}

impl Constraint for CageConstraint {
    fn can_place(&self, grid: &Square<Value>, coord: Coord, value: Value) -> bool {
        let cell_id = grid.index_of(coord);
        if !self.cell_ids.contains(&cell_id) {
            return true;
        }
        let mut values = Vec::with_capacity(self.cell_ids.len());
        values.push(value);
        for &id in &self.cell_ids {
            if id == cell_id || grid[id] == UNFILLED {
                continue;
            }
            values.push(grid[id]);
        }
        let complete = values.len() == self.cell_ids.len();
        validate_cage(&values, self.operator, self.target, complete, grid.width())
    }
}

/// Whether a fully filled cage produces its target
pub fn evaluate_cage_complete(values: &[Value], operator: Operator, target: Value) -> bool {
    if values.is_empty() {
        return false;
    }
    match operator {
        Operator::Add => values.iter().sum::<Value>() == target,
        Operator::Subtract => match values {
            &[a, b] => (a - b).abs() == target,
            _ => false,
        },
        Operator::Multiply => values.iter().product::<Value>() == target,
        Operator::Divide => match values {
            &[a, b] => {
                let (small, big) = sorted_pair(a, b);
                small != 0 && big % small == 0 && big / small == target
            }
            _ => false,
        },
        Operator::Modulo => match values {
            &[a, b] => {
                let (small, big) = sorted_pair(a, b);
                small != 0 && big % small == target
            }
            _ => false,
        },
        Operator::Gcd => !values.contains(&0) && gcd_all(values) == target,
        Operator::Lcm => !values.contains(&0) && lcm_all(values) == i128::from(target),
        Operator::Hide => values.len() == 1 && values[0] == target,
    }
}

/// Whether a partially filled cage can still produce its target
///
/// `complete` switches to the exact check. Must reject conservatively:
/// returning `true` for a doomed prefix only costs search time,
/// returning `false` for a viable one loses solutions.
pub(crate) fn validate_cage(
    values: &[Value],
    operator: Operator,
    target: Value,
    complete: bool,
    width: usize,
) -> bool {
    if values.is_empty() {
        return true;
    }
    // division, modulo, gcd and lcm are all undefined around zero
    if values.contains(&0)
        && matches!(
            operator,
            Operator::Divide | Operator::Modulo | Operator::Gcd | Operator::Lcm
        )
    {
        return false;
    }
    if complete {
        return evaluate_cage_complete(values, operator, target);
    }
    let max_value = width as Value;
    match operator {
        Operator::Add => values.iter().sum::<Value>() <= target,
        Operator::Subtract => match values {
            &[v] => v + target <= max_value || v - target >= 1,
            _ => true,
        },
        Operator::Multiply => {
            let product: Value = values.iter().product();
            if target == 0 {
                values.contains(&0) || product <= max_value.pow(values.len() as u32)
            } else {
                product != 0 && product <= target && target % product == 0
            }
        }
        Operator::Divide => match values {
            &[v] => v * target <= max_value || (v != 0 && target != 0 && v % target == 0),
            _ => true,
        },
        Operator::Modulo => match values {
            &[v] => v > target,
            _ => true,
        },
        Operator::Gcd => target != 0 && gcd_all(values) % target == 0,
        Operator::Lcm => i128::from(target) % lcm_all(values) == 0,
        Operator::Hide => values.len() <= 1,
    }
}

fn sorted_pair(a: Value, b: Value) -> (Value, Value) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub(crate) fn gcd(x: Value, y: Value) -> Value {
    let (mut x, mut y) = (x.abs(), y.abs());
    while y != 0 {
        let t = y;
        y = x % y;
        x = t;
    }
    x
}

pub(crate) fn gcd_all(values: &[Value]) -> Value {
    values.iter().copied().fold(0, gcd)
}

/// Least common multiple of all values, computed in `i128` so that
/// pathological decoded cages cannot overflow
pub(crate) fn lcm_all(values: &[Value]) -> i128 {
    values
        .iter()
        .map(|&v| i128::from(v.abs()))
        .fold(1, |acc, v| acc / gcd_i128(acc, v) * v)
}

fn gcd_i128(x: i128, y: i128) -> i128 {
    let (mut x, mut y) = (x, y);
    while y != 0 {
        let t = y;
        y = x % y;
        x = t;
    }
    x
}
