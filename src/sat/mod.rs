//! SAT solver interfaces used by the planner.

mod buffered_sat_solver;
pub use buffered_sat_solver::BufferedSatSolver;
pub use buffered_sat_solver::DimacsInstanceRead;
pub use buffered_sat_solver::SolvingFn;

mod cadical_solver;
pub use cadical_solver::CadicalSolver;

mod external_sat_solver;
pub use external_sat_solver::ExternalSatSolver;
pub use external_sat_solver::ExternalSatSolverFactory;

mod sat_solver;
pub use crate::clause;
pub use sat_solver::default_solver;
pub use sat_solver::Assignment;
pub use sat_solver::AssignmentIterator;
pub use sat_solver::DefaultSatSolverFactory;
pub use sat_solver::Literal;
pub use sat_solver::SatSolver;
pub use sat_solver::SatSolverFactory;
pub use sat_solver::SolvingListener;
pub use sat_solver::SolvingResult;
pub use sat_solver::Variable;

use strum_macros::{AsRefStr, EnumString, EnumVariantNames, IntoStaticStr};

/// The SAT solving engines the planner can use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString, EnumVariantNames, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum SolverEngine {
    /// The embedded Cadical solver.
    Cadical,
    /// An external program following the SAT competition input/output formats.
    External,
}

impl Default for SolverEngine {
    fn default() -> Self {
        SolverEngine::Cadical
    }
}
