use super::ResponseWriter;
use crate::{
    planning::{LabelType, Plan, PlanningProblem},
    solvers::SearchOutcome,
};
use anyhow::{Context, Result};
use std::io::Write;

/// A writer for the results of the planner.
///
/// The answers are written this way:
///   * plan: the line `PLAN`, followed by a line per non-empty step made of the time step, a colon and the labels of the operators
///   * no plan up to the maximal horizon: `NO PLAN`
///   * time budget exhausted: `UNKNOWN`
///
/// ```text
/// PLAN
/// 0: make-p make-q
/// 1: use-p
/// ```
#[derive(Default)]
pub struct PlanWriter;

impl PlanWriter {
    /// Writes the answer associated with the outcome of a horizon search.
    pub fn write_outcome<T>(
        &self,
        writer: &mut dyn Write,
        problem: &PlanningProblem<T>,
        outcome: &SearchOutcome,
    ) -> Result<()>
    where
        T: LabelType,
    {
        match outcome {
            SearchOutcome::PlanFound { plan, .. } => self.write_plan(writer, problem, plan),
            SearchOutcome::HorizonExhausted { .. } => {
                <Self as ResponseWriter<T>>::write_no_plan(self, writer)
            }
            SearchOutcome::TimedOut { .. } => <Self as ResponseWriter<T>>::write_unknown(self, writer),
        }
    }
}

impl<T> ResponseWriter<T> for PlanWriter
where
    T: LabelType,
{
    fn write_plan(
        &self,
        writer: &mut dyn Write,
        problem: &PlanningProblem<T>,
        plan: &Plan,
    ) -> Result<()> {
        let context = "while writing a plan";
        writeln!(writer, "PLAN").context(context)?;
        for step in plan.steps() {
            write!(writer, "{}:", step.time_step()).context(context)?;
            step.resolve(problem)
                .iter()
                .try_for_each(|op| write!(writer, " {}", op).context(context))?;
            writeln!(writer).context(context)?;
        }
        writer.flush().context(context)
    }

    fn write_no_plan(&self, writer: &mut dyn Write) -> Result<()> {
        let context = "while writing the absence of plan";
        writeln!(writer, "NO PLAN").context(context)?;
        writer.flush().context(context)
    }

    fn write_unknown(&self, writer: &mut dyn Write) -> Result<()> {
        let context = "while writing an unknown status";
        writeln!(writer, "UNKNOWN").context(context)?;
        writer.flush().context(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::{FluentSet, PlanStep};
    use std::io::BufWriter;

    fn problem() -> PlanningProblem<&'static str> {
        let fluents = FluentSet::new_with_labels(&["p", "q"]);
        let mut problem = PlanningProblem::new_with_fluent_set(fluents);
        problem.new_operator("make-p", &[], &[("p", true)]).unwrap();
        problem.new_operator("make-q", &[], &[("q", true)]).unwrap();
        problem
            .new_operator("use-p", &[("p", true)], &[("p", false)])
            .unwrap();
        problem
    }

    fn write_to_string<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        let mut buffer = BufWriter::new(Vec::new());
        f(&mut buffer).unwrap();
        String::from_utf8(buffer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_write_plan() {
        let problem = problem();
        let plan = Plan::new(vec![
            PlanStep::new(0, vec![0, 1]),
            PlanStep::new(2, vec![2]),
        ]);
        assert_eq!(
            "PLAN\n0: make-p make-q\n2: use-p\n",
            write_to_string(|w| PlanWriter.write_plan(w, &problem, &plan))
        );
    }

    #[test]
    fn test_write_empty_plan() {
        let problem = problem();
        assert_eq!(
            "PLAN\n",
            write_to_string(|w| PlanWriter.write_plan(w, &problem, &Plan::default()))
        );
    }

    #[test]
    fn test_write_outcomes() {
        let problem = problem();
        assert_eq!(
            "NO PLAN\n",
            write_to_string(|w| PlanWriter.write_outcome(
                w,
                &problem,
                &SearchOutcome::HorizonExhausted {
                    max_horizon: 3,
                    proven: false
                }
            ))
        );
        assert_eq!(
            "UNKNOWN\n",
            write_to_string(|w| PlanWriter.write_outcome(
                w,
                &problem,
                &SearchOutcome::TimedOut { horizon: 2 }
            ))
        );
        assert_eq!(
            "PLAN\n0: make-q\n",
            write_to_string(|w| PlanWriter.write_outcome(
                w,
                &problem,
                &SearchOutcome::PlanFound {
                    horizon: 1,
                    plan: Plan::new(vec![PlanStep::new(0, vec![1])])
                }
            ))
        );
    }
}
