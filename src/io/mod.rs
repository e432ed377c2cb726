//! Objects used to read planning problems and write the answers of the planner.

mod grounded_problem_reader;
pub use grounded_problem_reader::GroundedProblemReader;

mod plan_writer;
pub use plan_writer::PlanWriter;

mod specs;
pub use specs::InstanceReader;
pub use specs::ResponseWriter;
pub use specs::WarningHandler;

mod warning_result;
