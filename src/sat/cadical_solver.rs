use super::{sat_solver::SolvingResult, Assignment, Literal, SatSolver, SolvingListener};
use cadical::{Solver as CadicalCSolver, Timeout};
use std::time::Duration;

/// A wrapper around the Cadical SAT solver.
///
/// Time limits are enforced through the terminate callback of Cadical.
#[derive(Default)]
pub struct CadicalSolver {
    solver: CadicalCSolver,
    listeners: Vec<Box<dyn SolvingListener>>,
    n_clauses: usize,
    reserved: usize,
}

impl SatSolver for CadicalSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.solver
            .add_clause(cl.into_iter().map(|l| isize::from(l) as i32));
        self.n_clauses += 1;
    }

    fn solve(&mut self) -> SolvingResult {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(self.n_vars(), self.n_clauses));
        let solving_result = match self.solver.solve() {
            Some(true) => {
                let max_variable = self.solver.max_variable();
                let assignment = Assignment::new(
                    (1..=max_variable)
                        .map(|i| self.solver.value(i))
                        .chain(
                            std::iter::repeat(None)
                                .take(self.reserved.saturating_sub(max_variable as usize)),
                        )
                        .collect(),
                );
                SolvingResult::Satisfiable(assignment)
            }
            Some(false) => SolvingResult::Unsatisfiable,
            None => SolvingResult::Unknown,
        };
        self.listeners
            .iter()
            .for_each(|l| l.solving_end(&solving_result));
        solving_result
    }

    fn n_vars(&self) -> usize {
        usize::max(self.solver.max_variable() as usize, self.reserved)
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.listeners.push(listener);
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.reserved = usize::max(self.reserved, new_max_id);
    }

    fn set_time_limit(&mut self, limit: Duration) {
        self.solver
            .set_callbacks(Some(Timeout::new(limit.as_secs_f32())));
    }
}
