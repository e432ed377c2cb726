use super::cadical_solver::CadicalSolver;
use std::{
    fmt::Display,
    num::{NonZeroIsize, NonZeroUsize},
    time::Duration,
};

/// A variable in a SAT solver.
///
/// A variable is represented by a non-null positive integer.
/// It can be obtained through the [From] trait from an integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(NonZeroUsize);

macro_rules! impl_var_from {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                Self(NonZeroUsize::try_from(v as usize).unwrap())
            }
        }
    };
}
impl_var_from!(usize);
impl_var_from!(u64);
impl_var_from!(u32);

macro_rules! impl_var_from_neg {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                if v < 0 {
                    panic!("cannot build a variable from a negative integer")
                }
                Self(NonZeroUsize::try_from(v as usize).unwrap())
            }
        }
    };
}
impl_var_from_neg!(isize);
impl_var_from_neg!(i64);
impl_var_from_neg!(i32);

impl From<Variable> for usize {
    fn from(v: Variable) -> Self {
        v.0.into()
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A literal in a SAT solver.
///
/// A literal is represented by a non-null integer.
/// It can be obtained through the [From] trait from a signed integer type,
/// or from a [Variable] and a polarity using [Literal::new].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(NonZeroIsize);

impl Literal {
    /// Builds the literal of a variable with the given polarity.
    ///
    /// A `true` polarity gives the positive literal.
    pub fn new(var: Variable, polarity: bool) -> Self {
        let v = usize::from(var) as isize;
        Self::from(if polarity { v } else { -v })
    }

    /// Returns the opposite literal.
    pub fn negate(self) -> Self {
        Self::from(-self.0.get())
    }

    /// Returns the variable of this literal.
    pub fn var(&self) -> Variable {
        Variable(self.0.unsigned_abs())
    }

    /// Returns `true` iff this literal is the positive one of its variable.
    pub fn is_positive(&self) -> bool {
        self.0.get() > 0
    }
}

macro_rules! impl_lit_from {
    ($t: ty) => {
        impl From<$t> for Literal {
            fn from(l: $t) -> Self {
                Self(NonZeroIsize::try_from(l as isize).unwrap())
            }
        }
    };
}
impl_lit_from!(isize);
impl_lit_from!(i64);
impl_lit_from!(i32);

impl From<Literal> for isize {
    fn from(l: Literal) -> Self {
        l.0.into()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds a clause from a list of integers.
#[macro_export]
macro_rules! clause {
    () => (
        vec![] as Vec<$crate::sat::Literal>
    );
    ($($x:expr),+ $(,)?) => (
        [$($x),+].into_iter().map($crate::sat::Literal::from).collect::<Vec<$crate::sat::Literal>>()
    );
}

/// An assignment of a set of variables.
///
/// Inside the set of variables involved in the assignment, some may be unassigned.
/// This is the reason why accessors to assigned value returns an [Option<bool>].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment(Vec<Option<bool>>);

impl Assignment {
    /// Builds an assignment from the values of the variables, in increasing variable order.
    pub fn new(assignment: Vec<Option<bool>>) -> Self {
        Self(assignment)
    }

    /// Returns the value potentially assigned to the variable.
    ///
    /// The result in an [Option].
    /// In case the variable is not assigned, or is out of the scope of this assignment, [Option::None] is returned.
    /// Else, [Option::Some] is returned and contains the assigned value.
    pub fn value_of<T>(&self, v: T) -> Option<bool>
    where
        T: Into<Variable>,
    {
        self.0.get(usize::from(v.into()) - 1).copied().flatten()
    }

    /// Returns the number of variables covered by this assignment.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` iff this assignment covers no variable.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the variables (starting at 1) and their values.
    pub fn iter(&self) -> AssignmentIterator<'_> {
        AssignmentIterator {
            assignment: self,
            next: 0,
        }
    }
}

/// An iterator over the (variable, value) pairs of an [Assignment].
pub struct AssignmentIterator<'a> {
    assignment: &'a Assignment,
    next: usize,
}

impl Iterator for AssignmentIterator<'_> {
    type Item = (usize, Option<bool>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.assignment.0.len() {
            None
        } else {
            self.next += 1;
            Some((self.next, self.assignment.0[self.next - 1]))
        }
    }
}

/// The result of a call to a SAT solver.
#[derive(Debug, PartialEq, Eq)]
pub enum SolvingResult {
    /// The problem is satisfiable; a model is given.
    Satisfiable(Assignment),
    /// The problem is unsatisfiable.
    Unsatisfiable,
    /// The solver stopped before reaching an answer (time limit, interrupted process, ...).
    Unknown,
}

impl SolvingResult {
    /// Returns the underlying model if it exists, or [Option::None].
    ///
    /// # Panics
    ///
    /// If the solving result is set [SolvingResult::Unknown], this function panics.
    pub fn unwrap_model(self) -> Option<Assignment> {
        match self {
            SolvingResult::Satisfiable(assignment) => Some(assignment),
            SolvingResult::Unsatisfiable => None,
            SolvingResult::Unknown => {
                panic!(r#"cannot unwrap solving result when the solver returned "Unknown""#)
            }
        }
    }

    /// Returns a short name for the result, as written by SAT competition solvers.
    pub fn short_name(&self) -> &'static str {
        match self {
            SolvingResult::Satisfiable(_) => "SAT",
            SolvingResult::Unsatisfiable => "UNSAT",
            SolvingResult::Unknown => "UNKNOWN",
        }
    }
}

/// A trait for SAT solvers.
pub trait SatSolver {
    /// Adds a clause to this solver.
    fn add_clause(&mut self, cl: Vec<Literal>);

    /// Solves the problem formed by the clauses added so far.
    fn solve(&mut self) -> SolvingResult;

    /// Returns the number of variables known by the solver.
    fn n_vars(&self) -> usize;

    /// Adds a listener, triggered each time the solver is called.
    fn add_listener(&mut self, listener: Box<dyn SolvingListener>);

    /// Ensures variables up to `new_max_id` are part of the problem,
    /// even if they do not appear in any clause.
    ///
    /// The models returned by the solver then cover all these variables.
    fn reserve(&mut self, new_max_id: usize);

    /// Sets the maximal duration of the next calls to [solve](Self::solve).
    ///
    /// A solver reaching this limit returns [SolvingResult::Unknown].
    fn set_time_limit(&mut self, limit: Duration);
}

/// A trait for objects listening to SAT solving calls.
pub trait SolvingListener {
    /// Called before the solver starts.
    fn solving_start(&self, n_vars: usize, n_clauses: usize);

    /// Called when the solver returns.
    fn solving_end(&self, result: &SolvingResult);
}

/// A trait for objects building fresh SAT solvers.
pub trait SatSolverFactory {
    /// Returns a new solver, with no clause and no variable.
    fn new_solver(&self) -> Box<dyn SatSolver>;
}

/// The factory of the default SAT solver (see [default_solver]).
#[derive(Default)]
pub struct DefaultSatSolverFactory {
    listener_builders: Vec<Box<dyn Fn() -> Box<dyn SolvingListener>>>,
}

impl DefaultSatSolverFactory {
    /// Adds a function building a listener to attach to every new solver.
    pub fn add_solver_listener(&mut self, builder: Box<dyn Fn() -> Box<dyn SolvingListener>>) {
        self.listener_builders.push(builder);
    }
}

impl SatSolverFactory for DefaultSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        let mut solver = default_solver();
        self.listener_builders
            .iter()
            .for_each(|b| solver.add_listener(b()));
        solver
    }
}

/// The default SAT solver (Cadical).
pub fn default_solver() -> Box<dyn SatSolver> {
    Box::<CadicalSolver>::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_from_pos() {
        let v = Variable::from(1);
        assert_eq!(1, usize::from(v))
    }

    #[test]
    #[allow(unused_must_use)]
    #[should_panic]
    fn test_var_from_null() {
        Variable::from(0);
    } // kcov-ignore

    #[test]
    #[allow(unused_must_use)]
    #[should_panic]
    fn test_var_from_neg() {
        Variable::from(-1);
    } // kcov-ignore

    #[test]
    fn test_lit_from_pos() {
        let l = Literal::from(1);
        assert_eq!(1, isize::from(l))
    }

    #[test]
    #[allow(unused_must_use)]
    #[should_panic]
    fn test_lit_from_null() {
        Literal::from(0);
    } // kcov-ignore

    #[test]
    fn test_lit_from_neg() {
        let l = Literal::from(-1);
        assert_eq!(-1, isize::from(l))
    }

    #[test]
    fn test_lit_new() {
        assert_eq!(Literal::from(3), Literal::new(Variable::from(3), true));
        assert_eq!(Literal::from(-3), Literal::new(Variable::from(3), false));
        assert!(Literal::from(3).is_positive());
        assert!(!Literal::from(-3).is_positive());
    }

    #[test]
    fn test_solving_result_unwrap_model_some() {
        assert_eq!(
            Some(Assignment::new(vec![])),
            SolvingResult::Satisfiable(Assignment::new(vec![])).unwrap_model()
        );
    }

    #[test]
    fn test_solving_result_unwrap_model_none() {
        assert_eq!(None, SolvingResult::Unsatisfiable.unwrap_model());
    }

    #[test]
    #[should_panic]
    fn test_solving_result_unwrap_model_unknown() {
        SolvingResult::Unknown.unwrap_model();
    } // kcov-ignore

    #[test]
    fn test_negate_lit() {
        assert_eq!(Literal::from(-1), Literal::from(1).negate());
        assert_eq!(Literal::from(1), Literal::from(-1).negate());
    }

    #[test]
    fn test_assignment_out_of_scope() {
        let a = Assignment::new(vec![Some(true), None]);
        assert_eq!(Some(true), a.value_of(1));
        assert_eq!(None, a.value_of(2));
        assert_eq!(None, a.value_of(3));
        assert_eq!(
            vec![(1, Some(true)), (2, None)],
            a.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_default_factory() {
        let mut s = DefaultSatSolverFactory::default().new_solver();
        s.add_clause(clause![1, -2]);
        assert!(s.solve().unwrap_model().is_some());
    }
}
