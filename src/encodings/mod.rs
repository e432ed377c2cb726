//! Objects used to encode planning problems into SAT solvers.

mod clause_generator;
pub use clause_generator::ClauseGenerator;

mod clause_set;
pub use clause_set::ClauseSet;

mod variable_table;
pub use variable_table::VariableKind;
pub use variable_table::VariableTable;
