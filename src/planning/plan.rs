use super::{LabelType, Operator, PlanningProblem};
use anyhow::{anyhow, Result};

/// The set of operators executed at a given time step of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    time_step: usize,
    operators: Vec<usize>,
}

impl PlanStep {
    /// Builds a new step given its time step and the ids of its operators.
    pub fn new(time_step: usize, operators: Vec<usize>) -> Self {
        Self {
            time_step,
            operators,
        }
    }

    /// Returns the time step at which the operators are executed.
    pub fn time_step(&self) -> usize {
        self.time_step
    }

    /// Returns the ids of the operators executed at this step.
    pub fn operators(&self) -> &[usize] {
        &self.operators
    }

    /// Returns the operators executed at this step.
    pub fn resolve<'a, T>(&self, problem: &'a PlanningProblem<T>) -> Vec<&'a Operator<T>>
    where
        T: LabelType,
    {
        self.operators
            .iter()
            .map(|id| problem.get_operator_by_id(*id))
            .collect()
    }
}

/// A plan: a sequence of steps, sorted by increasing time step.
///
/// Each step contains at least one operator.
/// The operators of a step do not interfere, so they may be executed in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    steps: Vec<PlanStep>,
}

impl Plan {
    /// Builds a plan from its steps.
    ///
    /// Steps with no operators are dropped.
    ///
    /// # Panics
    ///
    /// If the steps are not sorted by strictly increasing time steps, this function panics.
    pub fn new(steps: Vec<PlanStep>) -> Self {
        let steps = steps
            .into_iter()
            .filter(|s| !s.operators.is_empty())
            .collect::<Vec<PlanStep>>();
        if steps.windows(2).any(|w| w[0].time_step >= w[1].time_step) {
            panic!("plan steps must be sorted by strictly increasing time steps");
        }
        Self { steps }
    }

    /// Returns the number of (non-empty) steps of this plan.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` iff this plan has no step.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the total number of operators in this plan.
    pub fn n_actions(&self) -> usize {
        self.steps.iter().map(|s| s.operators.len()).sum()
    }

    /// Returns the steps of this plan.
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Iterates over the operator ids, in execution order.
    pub fn iter_operators(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps.iter().flat_map(|s| s.operators.iter().copied())
    }

    /// Checks this plan is a solution of the problem.
    ///
    /// The plan is executed from the initial state.
    /// At each step, all the preconditions of its operators must hold, and its operators must not interfere.
    /// The effects of the step are then applied together.
    /// The final state must satisfy the goal.
    ///
    /// An error describing the first failure is returned if the plan is not valid.
    pub fn validate<T>(&self, problem: &PlanningProblem<T>) -> Result<()>
    where
        T: LabelType,
    {
        let mut state = problem.initial_state().to_vec();
        for step in self.steps.iter() {
            let operators = step.resolve(problem);
            if let Some(op) = operators.iter().find(|op| !op.is_applicable(&state)) {
                return Err(anyhow!(
                    "operator {} is not applicable at time step {}",
                    op,
                    step.time_step
                ));
            }
            for (i, op0) in operators.iter().enumerate() {
                if let Some(op1) = operators[i + 1..].iter().find(|op1| op0.interferes_with(op1)) {
                    return Err(anyhow!(
                        "operators {} and {} interfere at time step {}",
                        op0,
                        op1,
                        step.time_step
                    ));
                }
            }
            operators
                .iter()
                .flat_map(|op| op.effects().iter())
                .for_each(|e| state[e.fluent()] = e.polarity());
        }
        match problem.goal().iter().find(|c| !c.holds_in(&state)) {
            Some(c) => Err(anyhow!(
                "goal condition on fluent {} does not hold at the end of the plan",
                problem.fluent_set().get_fluent_by_id(c.fluent())
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::FluentSet;

    fn problem() -> PlanningProblem<&'static str> {
        let fluents = FluentSet::new_with_labels(&["a", "b", "c"]);
        let mut problem = PlanningProblem::new_with_fluent_set(fluents);
        problem.new_operator("make-a", &[], &[("a", true)]).unwrap();
        problem
            .new_operator("make-b", &[("a", true)], &[("b", true)])
            .unwrap();
        problem.new_operator("make-c", &[], &[("c", true)]).unwrap();
        problem
            .new_operator("unmake-a", &[], &[("a", false)])
            .unwrap();
        problem.add_goal(&"b", true).unwrap();
        problem.add_goal(&"c", true).unwrap();
        problem
    }

    #[test]
    fn test_empty_steps_dropped() {
        let plan = Plan::new(vec![
            PlanStep::new(0, vec![0]),
            PlanStep::new(1, vec![]),
            PlanStep::new(2, vec![1, 2]),
        ]);
        assert_eq!(2, plan.len());
        assert_eq!(3, plan.n_actions());
        assert_eq!(vec![0, 1, 2], plan.iter_operators().collect::<Vec<_>>());
        assert!(Plan::new(vec![PlanStep::new(0, vec![])]).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_unsorted_steps() {
        Plan::new(vec![PlanStep::new(1, vec![0]), PlanStep::new(0, vec![1])]);
    } // kcov-ignore

    #[test]
    fn test_valid_plan() {
        let problem = problem();
        let plan = Plan::new(vec![
            PlanStep::new(0, vec![0, 2]),
            PlanStep::new(1, vec![1]),
        ]);
        plan.validate(&problem).unwrap();
    }

    #[test]
    fn test_not_applicable() {
        let problem = problem();
        let plan = Plan::new(vec![PlanStep::new(0, vec![0, 1, 2])]);
        assert_eq!(
            "operator make-b is not applicable at time step 0",
            plan.validate(&problem).unwrap_err().to_string()
        );
    }

    #[test]
    fn test_interference() {
        let problem = problem();
        let plan = Plan::new(vec![PlanStep::new(0, vec![0, 3])]);
        assert_eq!(
            "operators make-a and unmake-a interfere at time step 0",
            plan.validate(&problem).unwrap_err().to_string()
        );
    }

    #[test]
    fn test_goal_not_reached() {
        let problem = problem();
        let plan = Plan::new(vec![PlanStep::new(0, vec![0]), PlanStep::new(1, vec![1])]);
        assert_eq!(
            "goal condition on fluent c does not hold at the end of the plan",
            plan.validate(&problem).unwrap_err().to_string()
        );
    }
}
