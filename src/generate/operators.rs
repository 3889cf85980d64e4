use rand::seq::SliceRandom;
use rand::Rng;

use crate::collections::square::Coord;
use crate::puzzle::{Cage, CellId, HiddenClue, Operator, Solution, SpecialFlags, Value};
use crate::solve::constraint::cage::{gcd_all, lcm_all};

/// How often a "too easy" target survives: a modulo target of zero or
/// a gcd target of one is kept with this probability, otherwise the
/// operator is re-rolled.
const TRIVIAL_TARGET_KEEP_RATE: f64 = 0.2;

/// Attempts at sampling a (operator, target) pair per cage before
/// falling back to addition
const TARGET_ATTEMPTS: usize = 50;

const INVALID_TARGET: Value = -1;

pub(crate) struct AssignedCages {
    pub cages: Vec<Cage>,
    /// Whether some 2+-cell cage received `%`, `gcd` or `lcm`
    pub has_special: bool,
    pub hidden: Option<HiddenClue>,
}

/// Picks an operator and target for every cage, from the solution grid
pub(crate) fn assign_operators(
    solution: &Solution,
    cage_cells: Vec<Vec<CellId>>,
    flags: SpecialFlags,
    rng: &mut impl Rng,
) -> AssignedCages {
    let width = solution.width();
    let mut cages = Vec::with_capacity(cage_cells.len());
    let mut has_special = false;
    let mut hidden = None;
    for (id, cells) in cage_cells.into_iter().enumerate() {
        let values: Vec<Value> = cells.iter().map(|&i| solution[i]).collect();
        let pool = operator_pool(cells.len(), flags, values.contains(&0));
        let (mut operator, mut target) = (Operator::Add, INVALID_TARGET);
        for _ in 0..TARGET_ATTEMPTS {
            let candidate = *pool.choose(rng).unwrap();
            let t = cage_target(candidate, &values, rng);
            if t != INVALID_TARGET {
                operator = candidate;
                target = t;
                break;
            }
        }
        if target == INVALID_TARGET {
            operator = Operator::Add;
            target = values.iter().sum();
        }
        if flags.hidden && hidden.is_none() && cells.len() == 1 {
            let coord = solution.coord_at(cells[0]);
            if !on_border(coord, width) {
                operator = Operator::Hide;
                target = values[0];
                hidden = Some(HiddenClue {
                    cage_id: id,
                    value: values[0],
                });
            }
        }
        if cells.len() > 1 && operator.is_special() {
            has_special = true;
        }
        cages.push(Cage::new(id, cells, operator, target));
    }
    AssignedCages {
        cages,
        has_special,
        hidden,
    }
}

/// The operators a cage may draw from, weighted by repetition
///
/// A cage containing a zero is restricted to `{+, -, x}` since the
/// remaining operators degenerate around zero.
fn operator_pool(cage_size: usize, flags: SpecialFlags, has_zero: bool) -> Vec<Operator> {
    if has_zero {
        return vec![Operator::Add, Operator::Subtract, Operator::Multiply];
    }
    let mut pool = vec![Operator::Add, Operator::Multiply];
    if cage_size == 2 {
        pool.extend_from_slice(&[
            Operator::Add,
            Operator::Multiply,
            Operator::Subtract,
            Operator::Subtract,
            Operator::Subtract,
            Operator::Divide,
            Operator::Divide,
            Operator::Divide,
        ]);
        if flags.modulo {
            pool.extend_from_slice(&[Operator::Modulo; 3]);
        }
        if flags.gcd {
            pool.extend_from_slice(&[
                Operator::Add,
                Operator::Multiply,
                Operator::Gcd,
                Operator::Gcd,
            ]);
        }
    }
    if flags.lcm {
        pool.extend_from_slice(&[
            Operator::Add,
            Operator::Multiply,
            Operator::Lcm,
            Operator::Lcm,
        ]);
    }
    pool
}

/// The target the operator produces over the cage's solution values,
/// or [`INVALID_TARGET`] when the operator does not apply
fn cage_target(operator: Operator, values: &[Value], rng: &mut impl Rng) -> Value {
    match operator {
        Operator::Add => values.iter().sum(),
        Operator::Subtract => match values {
            &[a, b] => (a - b).abs(),
            _ => INVALID_TARGET,
        },
        Operator::Multiply => values.iter().product(),
        Operator::Divide => match values {
            &[a, b] => {
                let (small, big) = (a.min(b), a.max(b));
                if small == 0 || big % small != 0 {
                    INVALID_TARGET
                } else {
                    big / small
                }
            }
            _ => INVALID_TARGET,
        },
        Operator::Modulo => match values {
            &[a, b] => {
                let (small, big) = (a.min(b), a.max(b));
                if small == 0 {
                    INVALID_TARGET
                } else if big % small == 0 && !rng.gen_bool(TRIVIAL_TARGET_KEEP_RATE) {
                    INVALID_TARGET
                } else {
                    big % small
                }
            }
            _ => INVALID_TARGET,
        },
        Operator::Gcd => {
            if values.contains(&0) {
                return INVALID_TARGET;
            }
            let gcd = gcd_all(values);
            if gcd == 1 && !rng.gen_bool(TRIVIAL_TARGET_KEEP_RATE) {
                INVALID_TARGET
            } else {
                gcd
            }
        }
        Operator::Lcm => {
            if values.contains(&0) {
                return INVALID_TARGET;
            }
            let lcm = lcm_all(values);
            if lcm > i128::from(Value::max_value()) {
                INVALID_TARGET
            } else {
                lcm as Value
            }
        }
        Operator::Hide => match values {
            &[v] => v,
            _ => INVALID_TARGET,
        },
    }
}

fn on_border(coord: Coord, width: usize) -> bool {
    coord.row() == 0 || coord.row() == width - 1 || coord.col() == 0 || coord.col() == width - 1
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{assign_operators, cage_target, operator_pool};
    use crate::generate::{generate_cages, latin_square};
    use crate::puzzle::{Difficulty, Operator, SpecialFlags};
    use crate::solve::evaluate_cage_complete;

    #[test]
    fn zero_cage_pool_is_restricted() {
        let flags = SpecialFlags {
            modulo: true,
            gcd: true,
            lcm: true,
            zero: true,
            hidden: false,
        };
        let pool = operator_pool(2, flags, true);
        assert_eq!(
            vec![Operator::Add, Operator::Subtract, Operator::Multiply],
            pool
        );
    }

    #[test]
    fn pool_gates_specials_behind_flags() {
        let pool = operator_pool(2, SpecialFlags::default(), false);
        assert!(!pool.iter().any(|op| op.is_special()));
        let flags = SpecialFlags {
            modulo: true,
            ..SpecialFlags::default()
        };
        assert!(operator_pool(2, flags, false).contains(&Operator::Modulo));
        // modulo cages only ever span two cells
        assert!(!operator_pool(3, flags, false).contains(&Operator::Modulo));
    }

    #[test]
    fn targets_match_direct_arithmetic() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(9, cage_target(Operator::Add, &[2, 3, 4], &mut rng));
        assert_eq!(4, cage_target(Operator::Subtract, &[3, 7], &mut rng));
        assert_eq!(24, cage_target(Operator::Multiply, &[2, 3, 4], &mut rng));
        assert_eq!(3, cage_target(Operator::Divide, &[6, 2], &mut rng));
        assert_eq!(-1, cage_target(Operator::Divide, &[7, 3], &mut rng));
        assert_eq!(-1, cage_target(Operator::Subtract, &[1, 2, 3], &mut rng));
        assert_eq!(12, cage_target(Operator::Lcm, &[4, 6], &mut rng));
        assert_eq!(-1, cage_target(Operator::Lcm, &[0, 6], &mut rng));
    }

    #[test]
    fn assigned_targets_hold_over_the_solution() {
        let mut rng = StdRng::seed_from_u64(5);
        let solution = latin_square(5, false, &mut rng);
        let cage_cells = generate_cages(5, Difficulty::Medium, &mut rng);
        let assigned = assign_operators(&solution, cage_cells, SpecialFlags::default(), &mut rng);
        for cage in &assigned.cages {
            let values: Vec<_> = cage.cell_ids().iter().map(|&i| solution[i]).collect();
            assert!(
                evaluate_cage_complete(&values, cage.operator(), cage.target()),
                "cage {:?} does not hold",
                cage
            );
        }
        assert!(assigned.hidden.is_none());
    }

    #[test]
    fn hidden_cage_is_an_interior_singleton() {
        let flags = SpecialFlags {
            hidden: true,
            ..SpecialFlags::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        // retry until the partition happens to contain an interior singleton
        for _ in 0..200 {
            let solution = latin_square(6, false, &mut rng);
            let cage_cells = generate_cages(6, Difficulty::Easy, &mut rng);
            let assigned = assign_operators(&solution, cage_cells, flags, &mut rng);
            let hidden = match assigned.hidden {
                None => continue,
                Some(hidden) => hidden,
            };
            let cage = &assigned.cages[hidden.cage_id];
            assert_eq!(Operator::Hide, cage.operator());
            assert!(cage.is_singleton());
            let coord = solution.coord_at(cage.cell_ids()[0]);
            assert!(!super::on_border(coord, 6));
            assert_eq!(solution[cage.cell_ids()[0]], hidden.value);
            return;
        }
        panic!("no interior singleton cage in 200 partitions");
    }
}
