use super::LabelType;
use std::fmt::Display;

/// A requirement or an effect on a fluent: the fluent id and its truth value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Condition {
    fluent: usize,
    polarity: bool,
}

impl Condition {
    /// Builds a new condition on the fluent with the given id.
    pub fn new(fluent: usize, polarity: bool) -> Self {
        Self { fluent, polarity }
    }

    /// Returns the id of the fluent.
    pub fn fluent(&self) -> usize {
        self.fluent
    }

    /// Returns the truth value this condition is about.
    pub fn polarity(&self) -> bool {
        self.polarity
    }

    /// Returns the condition on the same fluent with the opposite truth value.
    pub fn negate(&self) -> Self {
        Self {
            fluent: self.fluent,
            polarity: !self.polarity,
        }
    }

    /// Returns `true` iff this condition holds in the given state (indexed by fluent ids).
    pub fn holds_in(&self, state: &[bool]) -> bool {
        state[self.fluent] == self.polarity
    }
}

/// A grounded operator.
///
/// Operators are built by [`PlanningProblem`](super::PlanningProblem) objects,
/// which ensure their conditions refer to existing fluents.
/// Preconditions and effects are sorted by fluent id and free of duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operator<T: LabelType> {
    id: usize,
    label: T,
    preconditions: Vec<Condition>,
    effects: Vec<Condition>,
}

impl<T> Operator<T>
where
    T: LabelType,
{
    pub(crate) fn new(
        id: usize,
        label: T,
        preconditions: Vec<Condition>,
        effects: Vec<Condition>,
    ) -> Self {
        Self {
            id,
            label,
            preconditions,
            effects,
        }
    }

    /// Returns the id of the operator.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the label of the operator.
    pub fn label(&self) -> &T {
        &self.label
    }

    /// Returns the preconditions of the operator.
    pub fn preconditions(&self) -> &[Condition] {
        &self.preconditions
    }

    /// Returns the effects of the operator.
    pub fn effects(&self) -> &[Condition] {
        &self.effects
    }

    /// Iterates over the ids of the fluents this operator makes true.
    pub fn add_effects(&self) -> impl Iterator<Item = usize> + '_ {
        self.effects
            .iter()
            .filter(|c| c.polarity())
            .map(|c| c.fluent())
    }

    /// Iterates over the ids of the fluents this operator makes false.
    pub fn delete_effects(&self) -> impl Iterator<Item = usize> + '_ {
        self.effects
            .iter()
            .filter(|c| !c.polarity())
            .map(|c| c.fluent())
    }

    /// Returns `true` iff this operator is applicable in the given state.
    pub fn is_applicable(&self, state: &[bool]) -> bool {
        self.preconditions.iter().all(|c| c.holds_in(state))
    }

    /// Returns `true` iff this operator and the other one cannot be executed at the same time step.
    ///
    /// Two operators interfere when an effect of one of them negates a precondition or an effect of the other one.
    /// An operator never interferes with itself.
    pub fn interferes_with(&self, other: &Operator<T>) -> bool {
        fn negates(effects: &[Condition], conditions: &[Condition]) -> bool {
            effects
                .iter()
                .any(|e| conditions.binary_search(&e.negate()).is_ok())
        }
        if self.id == other.id {
            return false;
        }
        negates(&self.effects, &other.preconditions)
            || negates(&other.effects, &self.preconditions)
            || negates(&self.effects, &other.effects)
    }
}

impl<T> Display for Operator<T>
where
    T: LabelType,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}
