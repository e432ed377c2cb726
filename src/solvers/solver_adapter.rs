use crate::{
    encodings::ClauseSet,
    sat::{Assignment, SatSolverFactory, SolvingResult},
};
use std::time::Duration;

/// The result of a single SAT call on the encoding of a horizon.
#[derive(Debug, PartialEq, Eq)]
pub enum AttemptResult {
    /// The clauses are satisfiable; the model covers all the variables of the encoding.
    Satisfiable(Assignment),
    /// The clauses are unsatisfiable.
    Unsatisfiable,
    /// The clause set is trivially unsatisfiable; the solver was not run.
    Contradiction,
    /// The solver stopped without an answer.
    TimedOut,
}

impl AttemptResult {
    /// Returns a short name for this result, used in logs.
    pub fn short_name(&self) -> &'static str {
        match self {
            AttemptResult::Satisfiable(_) => "SAT",
            AttemptResult::Unsatisfiable => "UNSAT",
            AttemptResult::Contradiction => "CONTRADICTION",
            AttemptResult::TimedOut => "TIMEOUT",
        }
    }
}

impl From<SolvingResult> for AttemptResult {
    fn from(result: SolvingResult) -> Self {
        match result {
            SolvingResult::Satisfiable(assignment) => AttemptResult::Satisfiable(assignment),
            SolvingResult::Unsatisfiable => AttemptResult::Unsatisfiable,
            SolvingResult::Unknown => AttemptResult::TimedOut,
        }
    }
}

/// Solves a set of clauses using a fresh solver built by the factory.
///
/// The solver knows variables `1..=n_vars`, even the ones that appear in no clause,
/// and is not allowed to run longer than `time_limit`.
/// It is dropped before this function returns.
pub fn solve_clause_set(
    factory: &dyn SatSolverFactory,
    clauses: &ClauseSet,
    n_vars: usize,
    time_limit: Duration,
) -> AttemptResult {
    if clauses.is_contradictory() {
        return AttemptResult::Contradiction;
    }
    let mut solver = factory.new_solver();
    solver.reserve(n_vars);
    clauses.add_to_solver(solver.as_mut());
    solver.set_time_limit(time_limit);
    solver.solve().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{clause, DefaultSatSolverFactory};

    #[test]
    fn test_sat() {
        let mut clauses = ClauseSet::default();
        clauses.add_clause(clause![1, 2]);
        clauses.add_clause(clause![-1]);
        match solve_clause_set(
            &DefaultSatSolverFactory::default(),
            &clauses,
            4,
            Duration::from_secs(10),
        ) {
            AttemptResult::Satisfiable(model) => {
                assert_eq!(4, model.len());
                assert_eq!(Some(false), model.value_of(1));
                assert_eq!(Some(true), model.value_of(2));
            }
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_unsat() {
        let mut clauses = ClauseSet::default();
        clauses.add_clause(clause![1, 2]);
        clauses.add_clause(clause![-1, 2]);
        clauses.add_clause(clause![1, -2]);
        clauses.add_clause(clause![-1, -2]);
        assert_eq!(
            AttemptResult::Unsatisfiable,
            solve_clause_set(
                &DefaultSatSolverFactory::default(),
                &clauses,
                2,
                Duration::from_secs(10)
            )
        );
    }

    #[test]
    fn test_contradiction() {
        struct PanickingFactory;
        impl SatSolverFactory for PanickingFactory {
            fn new_solver(&self) -> Box<dyn crate::sat::SatSolver> {
                panic!("the solver must not be built")
            }
        }
        let mut clauses = ClauseSet::default();
        clauses.add_clause(clause![1]);
        clauses.add_clause(clause![-1]);
        assert_eq!(
            AttemptResult::Contradiction,
            solve_clause_set(&PanickingFactory, &clauses, 1, Duration::from_secs(10))
        );
    }

    #[test]
    fn test_unknown_is_timeout() {
        assert_eq!(AttemptResult::TimedOut, SolvingResult::Unknown.into());
        assert_eq!("TIMEOUT", AttemptResult::TimedOut.short_name());
    }
}
