//! The planner: horizon search, solver calls and plan decoding.

mod horizon_search;
pub use horizon_search::AttemptStatistics;
pub use horizon_search::ExhaustionReason;
pub use horizon_search::HorizonSearch;
pub use horizon_search::SearchOutcome;
pub use horizon_search::SearchState;

mod plan_decoder;
pub use plan_decoder::PlanDecoder;

mod planner_config;
pub use planner_config::PlannerConfig;
pub use planner_config::DEFAULT_MAX_HORIZON;
pub use planner_config::DEFAULT_TIMEOUT;

mod solver_adapter;
pub use solver_adapter::solve_clause_set;
pub use solver_adapter::AttemptResult;
