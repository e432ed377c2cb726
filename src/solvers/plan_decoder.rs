use crate::{
    encodings::VariableTable,
    planning::{Plan, PlanStep},
    sat::Assignment,
};

/// Translates the models of an encoding into plans.
///
/// For each time step, the operators whose action variable is set to `true` are executed.
/// Unassigned variables are considered as `false`.
pub struct PlanDecoder<'a> {
    table: &'a VariableTable,
}

impl<'a> PlanDecoder<'a> {
    /// Builds a decoder for the encoding described by the table.
    pub fn new(table: &'a VariableTable) -> Self {
        Self { table }
    }

    /// Decodes a model into a plan.
    ///
    /// The operators of a step are sorted by their ids; steps with no operator are omitted.
    pub fn decode(&self, model: &Assignment) -> Plan {
        let steps = (0..self.table.horizon())
            .map(|step| {
                let operators = (0..self.table.n_operators())
                    .filter(|op| {
                        model.value_of(self.table.operator_var(*op, step)) == Some(true)
                    })
                    .collect();
                PlanStep::new(step, operators)
            })
            .collect();
        Plan::new(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_true_vars(n_vars: usize, true_vars: &[usize]) -> Assignment {
        Assignment::new(
            (1..=n_vars)
                .map(|v| Some(true_vars.contains(&v)))
                .collect(),
        )
    }

    #[test]
    fn test_decode() {
        // 1 fluent, 3 operators, horizon 3: state vars 1..=4, action vars 5..=13
        let table = VariableTable::new(1, 3, 3);
        let model = model_with_true_vars(13, &[1, 2, 7, 11, 12]);
        let plan = PlanDecoder::new(&table).decode(&model);
        assert_eq!(
            &[PlanStep::new(0, vec![2]), PlanStep::new(2, vec![0, 1])],
            plan.steps()
        );
        assert_eq!(2, plan.len());
        assert_eq!(3, plan.n_actions());
    }

    #[test]
    fn test_decode_is_idempotent() {
        let table = VariableTable::new(2, 2, 2);
        let model = model_with_true_vars(10, &[7, 10]);
        let decoder = PlanDecoder::new(&table);
        assert_eq!(decoder.decode(&model), decoder.decode(&model));
    }

    #[test]
    fn test_unassigned_are_false() {
        let table = VariableTable::new(1, 2, 1);
        let model = Assignment::new(vec![Some(true), Some(true), None, Some(true)]);
        let plan = PlanDecoder::new(&table).decode(&model);
        assert_eq!(&[PlanStep::new(0, vec![1])], plan.steps());
    }

    #[test]
    fn test_short_model() {
        let table = VariableTable::new(1, 2, 1);
        let model = Assignment::new(vec![Some(true)]);
        assert!(PlanDecoder::new(&table).decode(&model).is_empty());
    }

    #[test]
    fn test_horizon_0() {
        let table = VariableTable::new(3, 2, 0);
        let model = model_with_true_vars(3, &[1, 2, 3]);
        assert!(PlanDecoder::new(&table).decode(&model).is_empty());
    }
}
