use super::{solve_clause_set, AttemptResult, PlanDecoder, PlannerConfig};
use crate::{
    encodings::ClauseGenerator,
    planning::{LabelType, Plan, PlanningProblem},
    sat::{Assignment, DefaultSatSolverFactory, SatSolverFactory},
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::{Duration, Instant};

/// The states of the horizon search.
#[derive(Debug, PartialEq, Eq)]
pub enum SearchState {
    /// The encoding for the given horizon must be solved.
    Trying(usize),
    /// A model was found for the given horizon.
    Satisfiable(usize, Assignment),
    /// The search stopped without finding a model.
    Exhausted(ExhaustionReason),
}

impl SearchState {
    /// Returns `true` iff no transition leaves this state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchState::Trying(_))
    }
}

/// The reasons a search may stop without finding a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustionReason {
    /// All the horizons up to the maximal one were proved to admit no plan.
    HorizonBound {
        /// the maximal horizon
        max_horizon: usize,
        /// `true` iff the maximal horizon is large enough to prove the problem has no plan at all
        proven: bool,
    },
    /// The time budget was spent while considering the given horizon.
    Timeout {
        /// the horizon under consideration when the budget ran out
        horizon: usize,
    },
}

/// The result of a horizon search.
#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A plan was found; its horizon is the smallest one admitting a plan among the considered ones.
    PlanFound {
        /// the horizon for which the plan was found
        horizon: usize,
        /// the plan
        plan: Plan,
    },
    /// No plan exists up to the maximal horizon.
    HorizonExhausted {
        /// the maximal horizon
        max_horizon: usize,
        /// `true` iff the problem is proved to have no plan at all
        proven: bool,
    },
    /// The time budget was spent before a plan was found.
    TimedOut {
        /// the horizon under consideration when the budget ran out
        horizon: usize,
    },
}

/// Statistics about a single attempt of the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptStatistics {
    /// the horizon
    pub horizon: usize,
    /// the number of variables of the encoding
    pub n_vars: usize,
    /// the number of clauses of the encoding
    pub n_clauses: usize,
    /// the time spent building the encoding
    pub encoding_time: Duration,
    /// the time spent by the SAT solver
    pub solving_time: Duration,
    /// the short name of the attempt result
    pub result: &'static str,
}

/// A planner looking for plans of increasing horizons.
///
/// The search starts at the minimal horizon of the configuration.
/// For each horizon, the problem is encoded into a fresh SAT solver.
/// The first horizon for which the solver finds a model gives the plan;
/// if the encoding is unsatisfiable, the next horizon is considered, up to the maximal horizon.
/// A solver that hits its time limit ends the search.
///
/// # Example
///
/// ```
/// # use satplan::io::{GroundedProblemReader, InstanceReader};
/// # use satplan::solvers::{HorizonSearch, PlannerConfig, SearchOutcome};
/// let instance = r#"
/// fluent(at-home).
/// operator(go-to-work).
/// pre(go-to-work, at-home).
/// eff(go-to-work, -at-home).
/// init(at-home).
/// goal(-at-home).
/// "#;
/// let problem = GroundedProblemReader::default()
///     .read(&mut instance.as_bytes())
///     .unwrap();
/// let mut search = HorizonSearch::new(&problem, PlannerConfig::default()).unwrap();
/// match search.run() {
///     SearchOutcome::PlanFound { horizon, plan } => {
///         assert_eq!(1, horizon);
///         assert_eq!(1, plan.n_actions());
///     }
///     _ => panic!(),
/// }
/// ```
pub struct HorizonSearch<'a, T>
where
    T: LabelType,
{
    generator: ClauseGenerator<'a, T>,
    config: PlannerConfig,
    solver_factory: Box<dyn SatSolverFactory>,
    statistics: Vec<AttemptStatistics>,
}

impl<'a, T> HorizonSearch<'a, T>
where
    T: LabelType,
{
    /// Builds a new horizon search using the default SAT solver.
    ///
    /// An error is returned if the configuration is invalid.
    pub fn new(problem: &'a PlanningProblem<T>, config: PlannerConfig) -> Result<Self> {
        Self::new_with_sat_solver_factory(
            problem,
            config,
            Box::<DefaultSatSolverFactory>::default(),
        )
    }

    /// Builds a new horizon search using the solvers built by the provided factory.
    ///
    /// An error is returned if the configuration is invalid.
    pub fn new_with_sat_solver_factory(
        problem: &'a PlanningProblem<T>,
        config: PlannerConfig,
        solver_factory: Box<dyn SatSolverFactory>,
    ) -> Result<Self> {
        config
            .validate()
            .context("invalid planner configuration")?;
        Ok(Self {
            generator: ClauseGenerator::new(problem),
            config,
            solver_factory,
            statistics: vec![],
        })
    }

    /// Runs the search until a plan is found, the maximal horizon is exceeded, or the time budget is spent.
    pub fn run(&mut self) -> SearchOutcome {
        self.statistics.clear();
        let deadline = Instant::now() + self.config.timeout;
        let mut state = SearchState::Trying(self.config.min_horizon);
        while !state.is_terminal() {
            state = self.next_state(state, deadline);
        }
        match state {
            SearchState::Satisfiable(horizon, model) => {
                let table = self.generator.variable_table(horizon);
                let plan = PlanDecoder::new(&table).decode(&model);
                info!(
                    "found a plan with {} action(s) in {} step(s) for horizon {}",
                    plan.n_actions(),
                    plan.len(),
                    horizon
                );
                SearchOutcome::PlanFound { horizon, plan }
            }
            SearchState::Exhausted(ExhaustionReason::HorizonBound {
                max_horizon,
                proven,
            }) => {
                info!("no plan up to horizon {}", max_horizon);
                SearchOutcome::HorizonExhausted {
                    max_horizon,
                    proven,
                }
            }
            SearchState::Exhausted(ExhaustionReason::Timeout { horizon }) => {
                info!("time budget exhausted while trying horizon {}", horizon);
                SearchOutcome::TimedOut { horizon }
            }
            SearchState::Trying(_) => unreachable!(),
        }
    }

    /// Computes the state following a non-terminal one.
    ///
    /// # Panics
    ///
    /// If the state is terminal, this function panics.
    pub fn next_state(&mut self, state: SearchState, deadline: Instant) -> SearchState {
        let horizon = match state {
            SearchState::Trying(h) => h,
            _ => panic!("no transition from a terminal state"),
        };
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return SearchState::Exhausted(ExhaustionReason::Timeout { horizon });
        }
        let time_limit = match self.config.attempt_timeout {
            Some(d) => Duration::min(d, remaining),
            None => remaining,
        };
        match self.attempt(horizon, time_limit) {
            AttemptResult::Satisfiable(model) => SearchState::Satisfiable(horizon, model),
            AttemptResult::Unsatisfiable | AttemptResult::Contradiction => {
                if horizon >= self.config.max_horizon {
                    SearchState::Exhausted(ExhaustionReason::HorizonBound {
                        max_horizon: self.config.max_horizon,
                        proven: horizon_bound_is_proof(
                            self.generator.problem().n_fluents(),
                            self.config.max_horizon,
                        ),
                    })
                } else {
                    SearchState::Trying(horizon + 1)
                }
            }
            AttemptResult::TimedOut => SearchState::Exhausted(ExhaustionReason::Timeout { horizon }),
        }
    }

    fn attempt(&mut self, horizon: usize, time_limit: Duration) -> AttemptResult {
        debug!("trying horizon {} (time limit is {:?})", horizon, time_limit);
        let encoding_start = Instant::now();
        let table = self.generator.variable_table(horizon);
        let clauses = self.generator.encode(&table);
        let encoding_time = encoding_start.elapsed();
        let solving_start = Instant::now();
        let result = solve_clause_set(
            self.solver_factory.as_ref(),
            &clauses,
            table.n_vars(),
            time_limit,
        );
        let statistics = AttemptStatistics {
            horizon,
            n_vars: table.n_vars(),
            n_clauses: clauses.len(),
            encoding_time,
            solving_time: solving_start.elapsed(),
            result: result.short_name(),
        };
        info!(
            "horizon {}: {} variables, {} clauses, encoded in {:.3}s, solved in {:.3}s: {}",
            statistics.horizon,
            statistics.n_vars,
            statistics.n_clauses,
            statistics.encoding_time.as_secs_f64(),
            statistics.solving_time.as_secs_f64(),
            statistics.result,
        );
        self.statistics.push(statistics);
        result
    }

    /// Returns the statistics of the attempts of the last run, in the order they were made.
    pub fn statistics(&self) -> &[AttemptStatistics] {
        &self.statistics
    }
}

// A problem with n fluents has 2^n states; a shortest plan never visits a state twice.
fn horizon_bound_is_proof(n_fluents: usize, max_horizon: usize) -> bool {
    n_fluents < 128 && (max_horizon as u128) + 1 >= 1u128 << n_fluents
}
