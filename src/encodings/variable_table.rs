use crate::sat::{Literal, Variable};

/// The entity a SAT variable stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// The truth value of a fluent at a time step (`0..=horizon`).
    Fluent {
        /// the fluent id
        fluent: usize,
        /// the time step
        step: usize,
    },
    /// The execution of an operator at a time step (`0..horizon`).
    Operator {
        /// the operator id
        operator: usize,
        /// the time step
        step: usize,
    },
}

/// The mapping between planning entities and SAT variables for a given horizon.
///
/// State variables come first, in `(step, fluent)` lexical order;
/// action variables follow, in `(step, operator)` lexical order.
/// Both directions of the mapping are computed arithmetically.
///
/// The table depends on the horizon: a new one must be built for each horizon under consideration.
///
/// # Example
///
/// ```
/// # use satplan::encodings::{VariableKind, VariableTable};
/// let table = VariableTable::new(2, 3, 1);
/// assert_eq!(2 * 2 + 3, table.n_vars());
/// let v = table.operator_var(1, 0);
/// assert_eq!(Some(VariableKind::Operator { operator: 1, step: 0 }), table.kind_of(v));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableTable {
    n_fluents: usize,
    n_operators: usize,
    horizon: usize,
}

impl VariableTable {
    /// Builds the table for the given numbers of fluents and operators and the given horizon.
    pub fn new(n_fluents: usize, n_operators: usize, horizon: usize) -> Self {
        Self {
            n_fluents,
            n_operators,
            horizon,
        }
    }

    /// Returns the horizon (the number of action layers).
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Returns the number of fluents.
    pub fn n_fluents(&self) -> usize {
        self.n_fluents
    }

    /// Returns the number of operators.
    pub fn n_operators(&self) -> usize {
        self.n_operators
    }

    fn n_state_vars(&self) -> usize {
        self.n_fluents * (self.horizon + 1)
    }

    /// Returns the total number of variables.
    pub fn n_vars(&self) -> usize {
        self.n_state_vars() + self.n_operators * self.horizon
    }

    /// Returns the variable of a fluent at a time step.
    ///
    /// # Panics
    ///
    /// If the fluent id or the time step is out of range, this function panics.
    pub fn fluent_var(&self, fluent: usize, step: usize) -> Variable {
        if fluent >= self.n_fluents || step > self.horizon {
            panic!(
                "no state variable for fluent {} at step {} (horizon is {})",
                fluent, step, self.horizon
            );
        }
        Variable::from(1 + step * self.n_fluents + fluent)
    }

    /// Returns the literal stating the fluent has the given truth value at the time step.
    pub fn fluent_lit(&self, fluent: usize, step: usize, polarity: bool) -> Literal {
        Literal::new(self.fluent_var(fluent, step), polarity)
    }

    /// Returns the variable of an operator at a time step.
    ///
    /// # Panics
    ///
    /// If the operator id or the time step is out of range, this function panics.
    pub fn operator_var(&self, operator: usize, step: usize) -> Variable {
        if operator >= self.n_operators || step >= self.horizon {
            panic!(
                "no action variable for operator {} at step {} (horizon is {})",
                operator, step, self.horizon
            );
        }
        Variable::from(1 + self.n_state_vars() + step * self.n_operators + operator)
    }

    /// Returns the entity associated with a variable, or `None` if the variable is out of the table.
    ///
    /// Since variables start at 1, `kind_of(0)` returns `None`.
    pub fn kind_of<V>(&self, var: V) -> Option<VariableKind>
    where
        V: Into<usize>,
    {
        let index = var.into().checked_sub(1)?;
        if index < self.n_state_vars() {
            Some(VariableKind::Fluent {
                fluent: index % self.n_fluents,
                step: index / self.n_fluents,
            })
        } else if index < self.n_vars() {
            let action_index = index - self.n_state_vars();
            Some(VariableKind::Operator {
                operator: action_index % self.n_operators,
                step: action_index / self.n_operators,
            })
        } else {
            None
        }
    }
}
