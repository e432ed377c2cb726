//! The SAT encoding of planning problems.
//!
//! For a horizon `T`, the encoding contains:
//! * the initial state, as unit clauses on the fluents at step 0;
//! * the goal, as unit clauses on the fluents at step `T`;
//! * the preconditions of operators: `-op(t) ∨ pre(t)`;
//! * the effects of operators: `-op(t) ∨ eff(t+1)`;
//! * explanatory frame axioms: a fluent changing its value between `t` and `t+1` requires an operator executed at `t` producing this change;
//! * mutual exclusions: two interfering operators cannot be executed at the same time step.

use super::{ClauseSet, VariableTable};
use crate::{
    planning::{LabelType, PlanningProblem},
    sat::Literal,
};
use std::collections::BTreeSet;

/// Builds the clauses encoding the existence of a plan of a given horizon.
///
/// The parts of the encoding that do not depend on the horizon
/// (the operators producing each change of each fluent, the pairs of interfering operators)
/// are computed once, when the generator is built.
pub struct ClauseGenerator<'a, T>
where
    T: LabelType,
{
    problem: &'a PlanningProblem<T>,
    adders: Vec<Vec<usize>>,
    deleters: Vec<Vec<usize>>,
    interfering_pairs: Vec<(usize, usize)>,
}

impl<'a, T> ClauseGenerator<'a, T>
where
    T: LabelType,
{
    /// Builds a new clause generator for the given problem.
    pub fn new(problem: &'a PlanningProblem<T>) -> Self {
        let mut adders = vec![vec![]; problem.n_fluents()];
        let mut deleters = vec![vec![]; problem.n_fluents()];
        problem.operators().iter().for_each(|op| {
            op.add_effects().for_each(|f| adders[f].push(op.id()));
            op.delete_effects().for_each(|f| deleters[f].push(op.id()));
        });
        let interfering_pairs = compute_interfering_pairs(problem, &adders, &deleters);
        Self {
            problem,
            adders,
            deleters,
            interfering_pairs,
        }
    }

    /// Returns the problem under consideration.
    pub fn problem(&self) -> &'a PlanningProblem<T> {
        self.problem
    }

    /// Returns the variable table of the problem for the given horizon.
    pub fn variable_table(&self, horizon: usize) -> VariableTable {
        VariableTable::new(
            self.problem.n_fluents(),
            self.problem.n_operators(),
            horizon,
        )
    }

    /// Returns the pairs of interfering operators, as couples of operator ids `(a, b)` with `a < b`.
    pub fn interfering_pairs(&self) -> &[(usize, usize)] {
        &self.interfering_pairs
    }

    /// Builds the full encoding for the horizon of the given table.
    pub fn encode(&self, table: &VariableTable) -> ClauseSet {
        let mut clauses = ClauseSet::default();
        self.encode_initial_state(table, &mut clauses);
        self.encode_goal(table, &mut clauses);
        for step in 0..table.horizon() {
            self.encode_preconditions(table, step, &mut clauses);
            self.encode_effects(table, step, &mut clauses);
            self.encode_frame_axioms(table, step, &mut clauses);
            self.encode_mutual_exclusions(table, step, &mut clauses);
        }
        clauses
    }

    fn encode_initial_state(&self, table: &VariableTable, clauses: &mut ClauseSet) {
        self.problem
            .initial_state()
            .iter()
            .enumerate()
            .for_each(|(f, value)| {
                clauses.add_clause(vec![table.fluent_lit(f, 0, *value)]);
            });
    }

    fn encode_goal(&self, table: &VariableTable, clauses: &mut ClauseSet) {
        self.problem.goal().iter().for_each(|c| {
            clauses.add_clause(vec![table.fluent_lit(
                c.fluent(),
                table.horizon(),
                c.polarity(),
            )]);
        });
    }

    fn encode_preconditions(&self, table: &VariableTable, step: usize, clauses: &mut ClauseSet) {
        self.problem.operators().iter().for_each(|op| {
            let op_lit = Literal::new(table.operator_var(op.id(), step), false);
            op.preconditions().iter().for_each(|c| {
                clauses.add_clause(vec![
                    op_lit,
                    table.fluent_lit(c.fluent(), step, c.polarity()),
                ]);
            });
        });
    }

    fn encode_effects(&self, table: &VariableTable, step: usize, clauses: &mut ClauseSet) {
        self.problem.operators().iter().for_each(|op| {
            let op_lit = Literal::new(table.operator_var(op.id(), step), false);
            op.effects().iter().for_each(|c| {
                clauses.add_clause(vec![
                    op_lit,
                    table.fluent_lit(c.fluent(), step + 1, c.polarity()),
                ]);
            });
        });
    }

    fn encode_frame_axioms(&self, table: &VariableTable, step: usize, clauses: &mut ClauseSet) {
        let operator_lits = |ops: &[usize]| {
            ops.iter()
                .map(|op| Literal::new(table.operator_var(*op, step), true))
                .collect::<Vec<Literal>>()
        };
        for f in 0..self.problem.n_fluents() {
            let mut becomes_false = vec![
                table.fluent_lit(f, step, false),
                table.fluent_lit(f, step + 1, true),
            ];
            becomes_false.append(&mut operator_lits(&self.deleters[f]));
            clauses.add_clause(becomes_false);
            let mut becomes_true = vec![
                table.fluent_lit(f, step, true),
                table.fluent_lit(f, step + 1, false),
            ];
            becomes_true.append(&mut operator_lits(&self.adders[f]));
            clauses.add_clause(becomes_true);
        }
    }

    fn encode_mutual_exclusions(
        &self,
        table: &VariableTable,
        step: usize,
        clauses: &mut ClauseSet,
    ) {
        self.interfering_pairs.iter().for_each(|(a, b)| {
            clauses.add_clause(vec![
                Literal::new(table.operator_var(*a, step), false),
                Literal::new(table.operator_var(*b, step), false),
            ]);
        });
    }
}

fn compute_interfering_pairs<T>(
    problem: &PlanningProblem<T>,
    adders: &[Vec<usize>],
    deleters: &[Vec<usize>],
) -> Vec<(usize, usize)>
where
    T: LabelType,
{
    let mut requiring_true = vec![vec![]; problem.n_fluents()];
    let mut requiring_false = vec![vec![]; problem.n_fluents()];
    problem.operators().iter().for_each(|op| {
        op.preconditions().iter().for_each(|c| {
            if c.polarity() {
                requiring_true[c.fluent()].push(op.id());
            } else {
                requiring_false[c.fluent()].push(op.id());
            }
        })
    });
    let mut pairs = BTreeSet::new();
    problem.operators().iter().for_each(|op| {
        op.effects().iter().for_each(|e| {
            let f = e.fluent();
            let (opposite_requirements, opposite_effects) = if e.polarity() {
                (&requiring_false[f], &deleters[f])
            } else {
                (&requiring_true[f], &adders[f])
            };
            opposite_requirements
                .iter()
                .chain(opposite_effects.iter())
                .filter(|other| **other != op.id())
                .for_each(|other| {
                    pairs.insert((usize::min(op.id(), *other), usize::max(op.id(), *other)));
                });
        })
    });
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        planning::FluentSet,
        sat::{clause, Literal},
    };
    use std::collections::HashSet;

    fn home_work_problem(goal_at_home: bool) -> PlanningProblem<&'static str> {
        let fluents = FluentSet::new_with_labels(&["at-home"]);
        let mut problem = PlanningProblem::new_with_fluent_set(fluents);
        problem
            .new_operator("go-to-work", &[("at-home", true)], &[("at-home", false)])
            .unwrap();
        problem.set_initially_true(&"at-home").unwrap();
        problem.add_goal(&"at-home", goal_at_home).unwrap();
        problem
    }

    fn assert_clauses_eq(expected: Vec<Vec<Literal>>, clauses: &ClauseSet) {
        let expected = expected
            .into_iter()
            .map(|mut cl| {
                cl.sort_unstable_by_key(|l| (l.var(), l.is_positive()));
                cl
            })
            .collect::<HashSet<_>>();
        assert_eq!(expected.len(), clauses.len());
        assert_eq!(expected, clauses.as_literal_sets());
    }

    #[test]
    fn test_encoding_horizon_0() {
        let problem = home_work_problem(false);
        let generator = ClauseGenerator::new(&problem);
        let clauses = generator.encode(&generator.variable_table(0));
        assert_clauses_eq(vec![clause![-1], clause![1]], &clauses);
        assert!(clauses.is_contradictory());
    }

    #[test]
    fn test_encoding_horizon_0_goal_already_reached() {
        let problem = home_work_problem(true);
        let generator = ClauseGenerator::new(&problem);
        let clauses = generator.encode(&generator.variable_table(0));
        assert_clauses_eq(vec![clause![1]], &clauses);
        assert!(!clauses.is_contradictory());
    }

    #[test]
    fn test_encoding_horizon_1() {
        // vars: at-home@0 = 1, at-home@1 = 2, go-to-work@0 = 3
        let problem = home_work_problem(false);
        let generator = ClauseGenerator::new(&problem);
        let clauses = generator.encode(&generator.variable_table(1));
        assert_clauses_eq(
            vec![
                clause![1],        // initial state
                clause![-2],       // goal
                clause![-3, 1],    // precondition
                clause![-3, -2],   // effect
                clause![-1, 2, 3], // frame: becomes false
                clause![1, -2],    // frame: becomes true
            ],
            &clauses,
        );
    }

    #[test]
    fn test_no_effect_fluent_persists() {
        let fluents = FluentSet::new_with_labels(&["a", "b"]);
        let mut problem = PlanningProblem::new_with_fluent_set(fluents);
        problem.new_operator("op", &[], &[("a", true)]).unwrap();
        let generator = ClauseGenerator::new(&problem);
        let table = generator.variable_table(1);
        let clauses = generator.encode(&table);
        let b0 = table.fluent_var(1, 0);
        let b1 = table.fluent_var(1, 1);
        let literal_sets = clauses.as_literal_sets();
        let persistence_1 = {
            let mut c = vec![Literal::new(b0, false), Literal::new(b1, true)];
            c.sort_unstable_by_key(|l| (l.var(), l.is_positive()));
            c
        };
        let persistence_2 = {
            let mut c = vec![Literal::new(b0, true), Literal::new(b1, false)];
            c.sort_unstable_by_key(|l| (l.var(), l.is_positive()));
            c
        };
        assert!(literal_sets.contains(&persistence_1));
        assert!(literal_sets.contains(&persistence_2));
    }

    #[test]
    fn test_interfering_pairs() {
        let fluents = FluentSet::new_with_labels(&["a", "b", "c"]);
        let mut problem = PlanningProblem::new_with_fluent_set(fluents);
        problem.new_operator("make-a", &[], &[("a", true)]).unwrap();
        problem
            .new_operator("use-a", &[("a", true)], &[("a", false), ("b", true)])
            .unwrap();
        problem.new_operator("make-c", &[], &[("c", true)]).unwrap();
        problem
            .new_operator("need-no-b", &[("b", false)], &[])
            .unwrap();
        let generator = ClauseGenerator::new(&problem);
        assert_eq!(&[(0, 1), (1, 3)], generator.interfering_pairs());
        let table = generator.variable_table(2);
        let clauses = generator.encode(&table);
        let literal_sets = clauses.as_literal_sets();
        for step in 0..2 {
            let mutex = vec![
                Literal::new(table.operator_var(0, step), false),
                Literal::new(table.operator_var(1, step), false),
            ];
            assert!(literal_sets.contains(&mutex));
        }
    }

    #[test]
    fn test_deterministic() {
        let fluents = FluentSet::new_with_labels(&["a", "b", "c"]);
        let mut problem = PlanningProblem::new_with_fluent_set(fluents);
        problem.new_operator("op0", &[("c", false)], &[("a", true)]).unwrap();
        problem
            .new_operator("op1", &[("a", true)], &[("b", true), ("c", true)])
            .unwrap();
        problem.add_goal(&"b", true).unwrap();
        let generator = ClauseGenerator::new(&problem);
        for horizon in 0..4 {
            let first = generator.encode(&generator.variable_table(horizon));
            let second = ClauseGenerator::new(&problem).encode(&generator.variable_table(horizon));
            assert_eq!(first.as_literal_sets(), second.as_literal_sets());
            assert_eq!(first.len(), second.len());
        }
    }
}
