//! Single-example evaluation.
use super::{Expression, ExprId, ExpressionArena, Value};


impl ExpressionArena {
    /// Evaluates node `id` on one example whose input values are `inputs`.
    /// A variable whose input is absent evaluates to `Value::Missing`.
    pub fn evaluate(&self, id: ExprId, inputs: &[Value]) -> Value {
        match self.expression(id) {
            Expression::Variable { input, .. } => {
                inputs.get(*input).cloned().unwrap_or(Value::Missing)
            },
            Expression::Constant(value) => value.clone(),
            Expression::Function { function, arguments } => {
                match arguments[..] {
                    [] => function.compute(&[]),
                    [a] => {
                        let a = self.evaluate(a, inputs);
                        function.compute(std::slice::from_ref(&a))
                    },
                    [a, b] => {
                        let a = self.evaluate(a, inputs);
                        let b = self.evaluate(b, inputs);
                        function.compute(&[a, b])
                    },
                    ref arguments => {
                        let values = arguments.iter()
                            .map(|&arg| self.evaluate(arg, inputs))
                            .collect::<Vec<_>>();
                        function.compute(&values)
                    },
                }
            },
            Expression::Test { condition, failure, success, missing } => {
                let branch = match self.evaluate(*condition, inputs).raw_boolean() {
                    super::FAILURE => failure,
                    super::SUCCESS => success,
                    _ => missing,
                };
                branch.map_or(Value::Missing, |b| self.evaluate(b, inputs))
            },
            Expression::Sequence { kind, nodes } => {
                let values = nodes.iter()
                    .map(|&node| self.evaluate(node, inputs))
                    .collect::<Vec<_>>();
                kind.aggregate(&values)
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Function, SequenceKind, Type};

    #[test]
    fn test_evaluate_test_node_01() {
        let mut arena = ExpressionArena::new();
        let x = arena.variable("x", 0, Type::Double);
        let stump = arena.function(Function::Stump { threshold: 1.0 }, vec![x]).unwrap();
        let pos = arena.constant(Value::Double(0.5), Type::Double).unwrap();
        let neg = arena.constant(Value::Double(-0.5), Type::Double).unwrap();
        let test = arena.test(stump, Some(neg), Some(pos), None).unwrap();

        assert_eq!(arena.evaluate(test, &[Value::Double(2.0)]), Value::Double(0.5));
        assert_eq!(arena.evaluate(test, &[Value::Double(0.0)]), Value::Double(-0.5));
        assert_eq!(arena.evaluate(test, &[Value::Missing]), Value::Missing);
        assert_eq!(arena.evaluate(test, &[]), Value::Missing);
    }

    #[test]
    fn test_evaluate_sequence_01() {
        let mut arena = ExpressionArena::new();
        let x = arena.variable("x", 0, Type::Double);
        let y = arena.variable("y", 1, Type::Double);
        let sum = arena.function(Function::Sum, vec![x, y, x]).unwrap();
        let seq = arena.sequence(SequenceKind::Sum);
        arena.push_child(seq, sum).unwrap();
        arena.push_child(seq, y).unwrap();

        let inputs = [Value::Double(1.0), Value::Double(2.0)];
        assert_eq!(arena.evaluate(seq, &inputs), Value::Double(6.0));

        let inputs = [Value::Double(1.0), Value::Missing];
        assert_eq!(arena.evaluate(seq, &inputs), Value::Double(0.0));
    }
}
