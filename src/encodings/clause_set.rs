use crate::sat::{Literal, SatSolver};
use std::collections::HashSet;

/// A set of clauses, i.e. a CNF formula.
///
/// Clauses are kept in insertion order.
/// A clause equal to a previously added one, up to the order of its literals, is ignored.
/// Tautologies are ignored as well.
///
/// The set detects the contradictions that are visible at construction time:
/// an empty clause, or a unit clause whose opposite has already been added as a unit clause.
#[derive(Debug, Default)]
pub struct ClauseSet {
    clauses: Vec<Vec<Literal>>,
    known: HashSet<Vec<Literal>>,
    units: HashSet<Literal>,
    contradictory: bool,
}

impl ClauseSet {
    /// Adds a clause to the set.
    ///
    /// Returns `true` iff the clause was not already in the set.
    pub fn add_clause(&mut self, cl: Vec<Literal>) -> bool {
        let mut cl_without_repetition = Vec::with_capacity(cl.len());
        cl.into_iter().for_each(|l| {
            if !cl_without_repetition.contains(&l) {
                cl_without_repetition.push(l);
            }
        });
        let cl = cl_without_repetition;
        let mut normalized = cl.clone();
        normalized.sort_unstable_by_key(|l| (l.var(), l.is_positive()));
        if normalized
            .windows(2)
            .any(|w| w[0].var() == w[1].var())
        {
            return false;
        }
        if !self.known.insert(normalized) {
            return false;
        }
        match cl.len() {
            0 => self.contradictory = true,
            1 => {
                if self.units.contains(&cl[0].negate()) {
                    self.contradictory = true;
                }
                self.units.insert(cl[0]);
            }
            _ => {}
        }
        self.clauses.push(cl);
        true
    }

    /// Returns the number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns `true` iff the set has no clause.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns `true` iff a contradiction was detected while the clauses were added.
    ///
    /// A `false` value does not mean the formula is satisfiable.
    pub fn is_contradictory(&self) -> bool {
        self.contradictory
    }

    /// Iterates over the clauses, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Vec<Literal>> + '_ {
        self.clauses.iter()
    }

    /// Returns the clauses as a set of literal sets, ignoring the order of the clauses and of their literals.
    pub fn as_literal_sets(&self) -> HashSet<Vec<Literal>> {
        self.known.clone()
    }

    /// Adds all the clauses of this set to a SAT solver.
    pub fn add_to_solver(&self, solver: &mut dyn SatSolver) {
        self.clauses
            .iter()
            .for_each(|cl| solver.add_clause(cl.clone()));
    }
}
