//! Builtin pure functions.
use serde::{Serialize, Deserialize};

use crate::{Error, Result};
use super::{Type, Value};


/// A pure function applied by a function node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Function {
    /// `x >= threshold`.
    Stump {
        /// Decision threshold.
        threshold: f64,
    },
    /// `x > y`.
    GreaterThan,
    /// Logical negation.
    Not,
    /// Logical conjunction.
    And,
    /// Logical disjunction.
    Or,
    /// `x + y`.
    Add,
    /// `x - y`.
    Sub,
    /// `x * y`.
    Mul,
    /// `x / y`.
    Div,
    /// `-x`.
    Neg,
    /// Natural logarithm.
    Log,
    /// Square root.
    Sqrt,
    /// Sum of any positive number of arguments.
    Sum,
}


impl Function {
    /// Returns the number of arguments, `None` for a variadic function.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::Stump { .. } | Self::Not | Self::Neg | Self::Log | Self::Sqrt
                => Some(1),
            Self::GreaterThan | Self::And | Self::Or
            | Self::Add | Self::Sub | Self::Mul | Self::Div
                => Some(2),
            Self::Sum => None,
        }
    }


    /// Returns `true` if the function accepts an argument of type `ty`.
    pub fn accepts_input_type(&self, ty: Type) -> bool {
        match self {
            Self::Not | Self::And | Self::Or => ty.is_boolean_like(),
            _ => ty.is_convertible_to_double(),
        }
    }


    /// Derives the output type from the argument types.
    pub fn output_type(&self, inputs: &[Type]) -> Result<Type> {
        match self.arity() {
            Some(n) if n != inputs.len() => {
                return Err(Error::Arity {
                    function: self.node_name(),
                    expected: n,
                    found: inputs.len(),
                });
            },
            None if inputs.is_empty() => {
                return Err(Error::Arity {
                    function: self.node_name(),
                    expected: 1,
                    found: 0,
                });
            },
            _ => {},
        }

        if let Some(&ty) = inputs.iter().find(|&&ty| !self.accepts_input_type(ty)) {
            let expected = match self {
                Self::Not | Self::And | Self::Or => "boolean",
                _ => "numeric",
            };
            return Err(Error::TypeMismatch {
                context: format!("argument of `{}`", self.node_name()),
                expected: expected.into(),
                found: ty,
            });
        }

        let ty = match self {
            Self::Stump { .. } | Self::GreaterThan
            | Self::Not | Self::And | Self::Or => Type::Boolean,
            _ => Type::Double,
        };
        Ok(ty)
    }


    /// Applies the function.
    /// A missing argument, or a non-finite result, gives `Value::Missing`.
    pub fn compute(&self, inputs: &[Value]) -> Value {
        if inputs.iter().any(Value::is_missing) {
            return Value::Missing;
        }
        match self {
            Self::Stump { threshold } => {
                Value::Boolean(inputs[0].raw_double() >= *threshold)
            },
            Self::GreaterThan => {
                Value::Boolean(inputs[0].raw_double() > inputs[1].raw_double())
            },
            Self::Not => Value::Boolean(inputs[0].raw_boolean() == 0),
            Self::And => Value::Boolean(
                inputs[0].raw_boolean() == 1 && inputs[1].raw_boolean() == 1
            ),
            Self::Or => Value::Boolean(
                inputs[0].raw_boolean() == 1 || inputs[1].raw_boolean() == 1
            ),
            _ => finite_or_missing(self.compute_double(inputs)),
        }
    }


    fn compute_double(&self, inputs: &[Value]) -> f64 {
        let x = inputs[0].raw_double();
        match self {
            Self::Add => x + inputs[1].raw_double(),
            Self::Sub => x - inputs[1].raw_double(),
            Self::Mul => x * inputs[1].raw_double(),
            Self::Div => x / inputs[1].raw_double(),
            Self::Neg => -x,
            Self::Log => x.ln(),
            Self::Sqrt => x.sqrt(),
            Self::Sum => inputs.iter().map(Value::raw_double).sum(),
            _ => f64::NAN,
        }
    }


    /// Returns the display name of the function.
    pub fn node_name(&self) -> String {
        match self {
            Self::Stump { threshold } => format!("stump[{threshold}]"),
            Self::GreaterThan => "gt".into(),
            Self::Not => "not".into(),
            Self::And => "and".into(),
            Self::Or => "or".into(),
            Self::Add => "add".into(),
            Self::Sub => "sub".into(),
            Self::Mul => "mul".into(),
            Self::Div => "div".into(),
            Self::Neg => "neg".into(),
            Self::Log => "log".into(),
            Self::Sqrt => "sqrt".into(),
            Self::Sum => "sum".into(),
        }
    }
}


#[inline]
fn finite_or_missing(x: f64) -> Value {
    if x.is_finite() { Value::Double(x) } else { Value::Missing }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stump_01() {
        let f = Function::Stump { threshold: 0.5 };
        assert_eq!(f.compute(&[Value::Double(0.5)]), Value::Boolean(true));
        assert_eq!(f.compute(&[Value::Double(0.2)]), Value::Boolean(false));
        assert_eq!(f.compute(&[Value::Integer(1)]), Value::Boolean(true));
        assert_eq!(f.compute(&[Value::Missing]), Value::Missing);
    }

    #[test]
    fn test_non_finite_is_missing() {
        let div = Function::Div.compute(&[Value::Double(1.0), Value::Double(0.0)]);
        assert_eq!(div, Value::Missing);
        let log = Function::Log.compute(&[Value::Double(-1.0)]);
        assert_eq!(log, Value::Missing);
    }

    #[test]
    fn test_output_type_01() {
        assert_eq!(
            Function::Add.output_type(&[Type::Integer, Type::Double]).unwrap(),
            Type::Double
        );
        assert_eq!(
            Function::And.output_type(&[Type::Boolean, Type::Boolean]).unwrap(),
            Type::Boolean
        );
        assert!(matches!(
            Function::Add.output_type(&[Type::Double]),
            Err(Error::Arity { expected: 2, found: 1, .. })
        ));
        assert!(matches!(
            Function::Not.output_type(&[Type::Double]),
            Err(Error::TypeMismatch { found: Type::Double, .. })
        ));
        assert!(Function::Sum.output_type(&[]).is_err());
    }

    #[test]
    fn test_sum_01() {
        let values = [Value::Double(1.0), Value::Integer(2), Value::Boolean(true)];
        assert_eq!(Function::Sum.compute(&values), Value::Double(4.0));
    }
}
