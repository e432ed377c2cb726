use super::{Condition, Fluent, FluentSet, LabelType, Operator};
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;

/// A grounded planning problem.
///
/// A problem is made of a set of fluents, a set of operators acting on them,
/// an initial state and a goal.
///
/// The initial state follows the closed world assumption:
/// the fluents that are not explicitly set to `true` are `false`.
/// The goal is a set of conditions that must hold in the final state.
///
/// Every reference to a fluent or an operator is resolved when the problem is built,
/// so that the encodings can rely on ids only.
#[derive(Debug)]
pub struct PlanningProblem<T>
where
    T: LabelType,
{
    fluents: FluentSet<T>,
    operators: Vec<Operator<T>>,
    operator_label_to_id: HashMap<T, usize>,
    initial_state: Vec<bool>,
    goal: Vec<Condition>,
}

impl<T> PlanningProblem<T>
where
    T: LabelType,
{
    /// Builds a planning problem with no operators, an initial state in which all fluents are false, and an empty goal.
    ///
    /// # Example
    ///
    /// ```
    /// # use satplan::planning::{FluentSet, PlanningProblem};
    /// let fluents = FluentSet::new_with_labels(&["at-home"]);
    /// let mut problem = PlanningProblem::new_with_fluent_set(fluents);
    /// problem.new_operator("go-to-work", &[("at-home", true)], &[("at-home", false)]).unwrap();
    /// problem.set_initially_true(&"at-home").unwrap();
    /// problem.add_goal(&"at-home", false).unwrap();
    /// assert_eq!(1, problem.n_operators());
    /// ```
    pub fn new_with_fluent_set(fluents: FluentSet<T>) -> Self {
        let initial_state = vec![false; fluents.len()];
        PlanningProblem {
            fluents,
            operators: vec![],
            operator_label_to_id: HashMap::new(),
            initial_state,
            goal: vec![],
        }
    }

    /// Adds a new operator given its label, its preconditions and its effects.
    ///
    /// Conditions are given as couples of a fluent label and the truth value of the fluent.
    /// Duplicate conditions are merged.
    ///
    /// An error is returned if an operator with the same label already exists,
    /// if a condition refers to an undefined fluent,
    /// or if the preconditions (resp. the effects) require a fluent to be both true and false.
    pub fn new_operator(
        &mut self,
        label: T,
        preconditions: &[(T, bool)],
        effects: &[(T, bool)],
    ) -> Result<()> {
        let context = || format!("cannot add operator {:?}", label);
        if self.operator_label_to_id.contains_key(&label) {
            return Err(anyhow!("operator {} is already defined", label)).with_context(context);
        }
        let preconditions = self
            .resolve_conditions(preconditions)
            .context("while reading preconditions")
            .with_context(context)?;
        let effects = self
            .resolve_conditions(effects)
            .context("while reading effects")
            .with_context(context)?;
        let id = self.operators.len();
        self.operator_label_to_id.insert(label.clone(), id);
        self.operators
            .push(Operator::new(id, label, preconditions, effects));
        Ok(())
    }

    fn resolve_conditions(&self, conditions: &[(T, bool)]) -> Result<Vec<Condition>> {
        let mut resolved = conditions
            .iter()
            .map(|(l, p)| {
                self.fluents
                    .get_fluent(l)
                    .map(|f| Condition::new(f.id(), *p))
            })
            .collect::<Result<Vec<Condition>>>()?;
        resolved.sort_unstable();
        resolved.dedup();
        check_consistency(&resolved, &self.fluents)?;
        Ok(resolved)
    }

    /// Sets a fluent to `true` in the initial state.
    ///
    /// If the fluent is undefined, an error is returned.
    pub fn set_initially_true(&mut self, label: &T) -> Result<()> {
        let id = self
            .fluents
            .get_fluent(label)
            .context("while setting the initial state")?
            .id();
        self.initial_state[id] = true;
        Ok(())
    }

    /// Adds a condition to the goal.
    ///
    /// If the fluent is undefined, or if the goal already requires the opposite truth value for it, an error is returned.
    pub fn add_goal(&mut self, label: &T, polarity: bool) -> Result<()> {
        let context = "while setting the goal";
        let id = self.fluents.get_fluent(label).context(context)?.id();
        let condition = Condition::new(id, polarity);
        if self.goal.contains(&condition.negate()) {
            return Err(anyhow!(
                "the goal requires fluent {} to be both true and false",
                label
            ))
            .context(context);
        }
        if let Err(pos) = self.goal.binary_search(&condition) {
            self.goal.insert(pos, condition);
        }
        Ok(())
    }

    /// Returns the set of fluents.
    pub fn fluent_set(&self) -> &FluentSet<T> {
        &self.fluents
    }

    /// Returns the number of fluents.
    pub fn n_fluents(&self) -> usize {
        self.fluents.len()
    }

    /// Returns the operators, sorted by id.
    pub fn operators(&self) -> &[Operator<T>] {
        &self.operators
    }

    /// Returns the number of operators.
    pub fn n_operators(&self) -> usize {
        self.operators.len()
    }

    /// Returns the operator with the given label.
    ///
    /// If no such label exists, an error is returned.
    pub fn get_operator(&self, label: &T) -> Result<&Operator<T>> {
        match self.operator_label_to_id.get(label) {
            Some(id) => Ok(&self.operators[*id]),
            None => Err(anyhow!("no such operator: {}", label)),
        }
    }

    /// Returns the operator with the given id.
    ///
    /// # Panics
    ///
    /// If there is no operator with this id, this function panics.
    pub fn get_operator_by_id(&self, id: usize) -> &Operator<T> {
        &self.operators[id]
    }

    /// Returns the initial state, indexed by fluent ids.
    pub fn initial_state(&self) -> &[bool] {
        &self.initial_state
    }

    /// Returns the goal conditions, sorted by fluent id.
    pub fn goal(&self) -> &[Condition] {
        &self.goal
    }

    /// Returns `true` iff the goal holds in the given state.
    pub fn is_goal_state(&self, state: &[bool]) -> bool {
        self.goal.iter().all(|c| c.holds_in(state))
    }

    /// Returns the fluents of goal conditions that do not hold initially and that no operator can produce.
    ///
    /// A non-empty result means that the problem has no solution, whatever the horizon.
    pub fn unreachable_goals(&self) -> Vec<&Fluent<T>> {
        self.goal
            .iter()
            .filter(|c| !c.holds_in(&self.initial_state))
            .filter(|c| !self.operators.iter().any(|o| o.effects().contains(c)))
            .map(|c| self.fluents.get_fluent_by_id(c.fluent()))
            .collect()
    }
}

fn check_consistency<T>(sorted_conditions: &[Condition], fluents: &FluentSet<T>) -> Result<()>
where
    T: LabelType,
{
    match sorted_conditions
        .windows(2)
        .find(|w| w[0].fluent() == w[1].fluent())
    {
        Some(w) => Err(anyhow!(
            "fluent {} is required to be both true and false",
            fluents.get_fluent_by_id(w[0].fluent())
        )),
        None => Ok(()),
    }
}
