use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use std::fmt::Display;
use std::hash::Hash;

/// The trait for fluent and operator labels.
///
/// Fluents and operators may be labeled by any type implementing some traits.
/// This trait is used to combine them.
pub trait LabelType: Clone + Debug + Display + Eq + Hash {}
impl<T: Clone + Debug + Display + Eq + Hash> LabelType for T {}

/// Handles a single fluent.
///
/// Each fluent has a label and an identifier which is unique in a fluent set.
/// The label must be a [`LabelType`].
///
/// Fluents are built by [`FluentSet`] objects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fluent<T: LabelType> {
    id: usize,
    label: T,
}

impl<T> Fluent<T>
where
    T: LabelType,
{
    /// Returns the label of the fluent.
    ///
    /// Example
    ///
    /// ```
    /// # use satplan::planning::{Fluent, LabelType};
    /// fn describe_fluent<T: LabelType>(f: &Fluent<T>) {
    ///     println!("fluent with id {} has the label {}", f.id(), f.label());
    /// }
    /// ```
    pub fn label(&self) -> &T {
        &self.label
    }

    /// Returns the id of the fluent.
    pub fn id(&self) -> usize {
        self.id
    }
}

impl<T> Display for Fluent<T>
where
    T: LabelType,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Handles the set of fluents of a planning problem.
///
/// Fluent ids are consecutive, starting at zero, in insertion order.
#[derive(Debug, Default)]
pub struct FluentSet<T>
where
    T: LabelType,
{
    fluents: Vec<Fluent<T>>,
    label_to_id: HashMap<T, usize>,
}

impl<T> FluentSet<T>
where
    T: LabelType,
{
    /// Builds a new fluent set given the labels of the fluents.
    ///
    /// Each fluent will be assigned an id equal to its index in the provided slice of labels.
    /// If a label appears multiple times, the first occurrence is the only one that is considered.
    ///
    /// # Example
    ///
    /// ```
    /// # use satplan::planning::FluentSet;
    /// let fluents = FluentSet::new_with_labels(&["at-home", "at-work"]);
    /// assert_eq!(2, fluents.len());
    /// ```
    pub fn new_with_labels(labels: &[T]) -> Self {
        let mut fluent_set = FluentSet {
            fluents: Vec::with_capacity(labels.len()),
            label_to_id: HashMap::with_capacity(labels.len()),
        };
        labels.iter().for_each(|l| fluent_set.new_fluent(l.clone()));
        fluent_set.fluents.shrink_to_fit();
        fluent_set
    }

    /// Adds a new fluent to this set.
    ///
    /// The id of the new fluent is the previous maximal id plus one.
    /// In a fluent with the same label is already defined, no fluent is added.
    pub fn new_fluent(&mut self, label: T) {
        self.label_to_id.entry(label.clone()).or_insert_with(|| {
            self.fluents.push(Fluent {
                id: self.fluents.len(),
                label,
            });
            self.fluents.len() - 1
        });
    }

    /// Returns the number of fluents in the set.
    pub fn len(&self) -> usize {
        self.fluents.len()
    }

    /// Returns `true` iff the set has no fluent.
    pub fn is_empty(&self) -> bool {
        self.fluents.is_empty()
    }

    /// Returns `true` iff a fluent with this label exists.
    pub fn contains(&self, label: &T) -> bool {
        self.label_to_id.contains_key(label)
    }

    /// Returns the fluent with the given label.
    ///
    /// If no such label exists, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// # use satplan::planning::FluentSet;
    /// let fluents = FluentSet::new_with_labels(&["at-home", "at-work"]);
    /// assert_eq!(1, fluents.get_fluent(&"at-work").unwrap().id());
    /// assert!(fluents.get_fluent(&"at-school").is_err());
    /// ```
    pub fn get_fluent(&self, label: &T) -> Result<&Fluent<T>> {
        match self.label_to_id.get(label) {
            Some(id) => Ok(&self.fluents[*id]),
            None => Err(anyhow!("no such fluent: {}", label)),
        }
    }

    /// Returns the fluent with the given id.
    ///
    /// # Panics
    ///
    /// If there is no fluent with this id, this function panics.
    pub fn get_fluent_by_id(&self, id: usize) -> &Fluent<T> {
        &self.fluents[id]
    }

    /// Iterates over the fluents, in increasing id order.
    pub fn iter(&self) -> impl Iterator<Item = &Fluent<T>> + '_ {
        self.fluents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_labels_dedup() {
        let fluents = FluentSet::new_with_labels(&["a", "b", "a"]);
        assert_eq!(2, fluents.len());
        assert_eq!(0, fluents.get_fluent(&"a").unwrap().id());
        assert_eq!(1, fluents.get_fluent(&"b").unwrap().id());
    }

    #[test]
    fn test_new_fluent() {
        let mut fluents = FluentSet::default();
        assert!(fluents.is_empty());
        fluents.new_fluent("a".to_string());
        fluents.new_fluent("a".to_string());
        fluents.new_fluent("b".to_string());
        assert_eq!(2, fluents.len());
        assert!(fluents.contains(&"b".to_string()));
        assert_eq!("b", fluents.get_fluent_by_id(1).label());
    }

    #[test]
    fn test_unknown_fluent() {
        let fluents = FluentSet::new_with_labels(&["a"]);
        assert_eq!(
            "no such fluent: b",
            fluents.get_fluent(&"b").unwrap_err().to_string()
        );
    }

    #[test]
    fn test_iter_order() {
        let fluents = FluentSet::new_with_labels(&["c", "a", "b"]);
        assert_eq!(
            vec!["c", "a", "b"],
            fluents.iter().map(|f| *f.label()).collect::<Vec<&str>>()
        );
    }
}
