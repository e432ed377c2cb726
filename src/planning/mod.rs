//! This module contains the material used to define grounded planning problems and their plans.

mod fluents;
pub use fluents::Fluent;
pub use fluents::FluentSet;
pub use fluents::LabelType;

mod operators;
pub use operators::Condition;
pub use operators::Operator;

mod plan;
pub use plan::Plan;
pub use plan::PlanStep;

mod problem;
pub use problem::PlanningProblem;
