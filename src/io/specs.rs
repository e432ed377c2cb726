use crate::planning::{LabelType, Plan, PlanningProblem};
use anyhow::Result;
use std::io::{Read, Write};

/// The type of callback functions to call when warnings are raised while parsing a problem.
///
/// The arguments are the (1-based) line number and the warning message.
pub type WarningHandler = Box<dyn Fn(usize, String)>;

/// A trait implemented by objects able to read grounded planning problems.
pub trait InstanceReader<T>
where
    T: LabelType,
{
    /// Reads a [`PlanningProblem`].
    /// The [LabelType](crate::planning::LabelType) of the returned problems depends on the reader.
    ///
    /// In case warnings are raised, the callback functions registered by [add_warning_handler](Self::add_warning_handler) are triggered.
    ///
    /// # Example
    ///
    /// ```
    /// # use satplan::io::{GroundedProblemReader, InstanceReader};
    /// # use satplan::planning::PlanningProblem;
    /// fn read_problem_from_str(s: &str) -> PlanningProblem<String> {
    ///     let reader = GroundedProblemReader::default();
    ///     reader.read(&mut s.as_bytes()).expect("invalid problem")
    /// }
    /// # read_problem_from_str("fluent(a).");
    /// ```
    fn read(&self, reader: &mut dyn Read) -> Result<PlanningProblem<T>>;

    /// Adds a callback function to call when warnings are raised while parsing a problem.
    fn add_warning_handler(&mut self, h: WarningHandler);
}

/// A trait implemented by objects that write the results of the planner.
pub trait ResponseWriter<T>
where
    T: LabelType,
{
    /// Writes a plan.
    fn write_plan(
        &self,
        writer: &mut dyn Write,
        problem: &PlanningProblem<T>,
        plan: &Plan,
    ) -> Result<()>;

    /// Writes the text associated with the fact no plan exists up to the maximal horizon.
    fn write_no_plan(&self, writer: &mut dyn Write) -> Result<()>;

    /// Writes the text associated with the fact the planner gave up before reaching an answer.
    fn write_unknown(&self, writer: &mut dyn Write) -> Result<()>;
}
