//! Typed evaluation of expression trees.
//!
//! [`evaluate`] walks an [`AstNode`] against a [`Bindings`] snapshot and
//! produces a [`TypedValue`]. Nothing is mutated; a failing evaluation leaves
//! the snapshot exactly as it was.
//!
//! # Typing Rules
//!
//! | Operation | Accepted operands | Result |
//! |-----------|-------------------|--------|
//! | `+` | two strings | concatenation |
//! | `+ - *` | two numbers | integer if both are integers, else float |
//! | `/` | two numbers, non-zero divisor | always float |
//! | `%` | two numbers, non-zero divisor | integer if both are integers, else float |
//! | `&& \|\|` | two booleans | boolean, both sides evaluated |
//! | `== != > < >= <=` | two strings, two numbers | boolean |
//! | `== !=` | two booleans | boolean |
//! | `!` | boolean | boolean |
//! | unary `- +` | number | same type |
//!
//! Integer arithmetic is checked and reports [`EvalError::Overflow`]
//! instead of wrapping.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_lossless
)]

use std::cmp::Ordering;

use crate::{
    expression::{
        ast::{AstNode, BinaryOperator, Identifier, UnaryOperator},
        element::{Expression, FunctionName},
        error::EvalError,
        parser::{parse_condition, parse_value},
        variable::Bindings,
        TypedValue, Value, VariableType,
    },
    Result,
};

/// Evaluates `ast` against `bindings`.
///
/// # Errors
///
/// Returns an [`EvalError`] for unassigned variables, zero divisors,
/// out-of-bounds or non-integer indices, operand type mismatches, failed
/// casts and integer overflow.
pub fn evaluate(ast: &AstNode, bindings: &Bindings) -> std::result::Result<TypedValue, EvalError> {
    match ast {
        AstNode::Literal { value, ty } => Ok(TypedValue {
            value: value.clone(),
            ty: *ty,
            element_type: None,
        }),
        AstNode::Identifier(ident) => read_variable(ident, bindings),
        AstNode::MemberAccess { object, index } => read_element(object, index, bindings),
        AstNode::UnaryOp { op, operand } => unary(*op, evaluate(operand, bindings)?),
        AstNode::BinaryOp { op, left, right } => {
            let left = evaluate(left, bindings)?;
            let right = evaluate(right, bindings)?;
            binary(*op, &left, &right)
        }
        AstNode::FunctionCall { name, argument } => {
            let argument = evaluate(argument, bindings)?;
            Ok(TypedValue::scalar(cast(&argument.value, *name)?))
        }
    }
}

/// Evaluates `ast` and coerces the result to `expected`.
///
/// With `expected` set to [`VariableType::Array`], `element` names the
/// required element type. With no expectation the raw result is returned.
///
/// # Errors
///
/// Everything [`evaluate`] reports, plus [`EvalError::UnexpectedType`] when
/// the result cannot be coerced.
pub fn calculate_value(
    ast: &AstNode,
    expected: Option<VariableType>,
    element: Option<VariableType>,
    bindings: &Bindings,
) -> std::result::Result<TypedValue, EvalError> {
    let typed = evaluate(ast, bindings)?;
    match expected {
        Some(expected) => coerce(typed, expected, element),
        None => Ok(typed),
    }
}

/// Converts `typed` to `expected` where the language allows it implicitly.
///
/// Identity always succeeds, integers widen to floats, floats narrow to
/// integers by flooring and arrays pass if their element types agree.
///
/// # Errors
///
/// Returns [`EvalError::UnexpectedType`] for any other combination, and
/// [`EvalError::InvalidConversion`] for a float too large for an integer.
pub fn coerce(
    typed: TypedValue,
    expected: VariableType,
    element: Option<VariableType>,
) -> std::result::Result<TypedValue, EvalError> {
    let mismatch = |found| EvalError::UnexpectedType { expected, found };
    match (expected, typed.value) {
        (VariableType::Integer, Value::Integer(i)) => Ok(TypedValue::scalar(Value::Integer(i))),
        (VariableType::Integer, Value::Float(f)) => floor_to_integer(f)
            .map(|i| TypedValue::scalar(Value::Integer(i)))
            .ok_or(EvalError::InvalidConversion {
                value: f.to_string(),
                target: VariableType::Integer,
            }),
        (VariableType::Float, Value::Integer(i)) => Ok(TypedValue::scalar(Value::Float(i as f64))),
        (VariableType::Float, Value::Float(f)) => Ok(TypedValue::scalar(Value::Float(f))),
        (VariableType::String, Value::String(s)) => Ok(TypedValue::scalar(Value::String(s))),
        (VariableType::Boolean, Value::Boolean(b)) => Ok(TypedValue::scalar(Value::Boolean(b))),
        (VariableType::Array, Value::Array(items)) => match (element, typed.element_type) {
            (Some(want), Some(have)) if want != have => Err(EvalError::UnexpectedType {
                expected: want,
                found: have,
            }),
            (want, have) => Ok(TypedValue::array(items, want.or(have))),
        },
        _ => Err(mismatch(typed.ty)),
    }
}

/// Applies a cast function to a value.
///
/// | Cast | integer | float | boolean | string |
/// |------|---------|-------|---------|--------|
/// | `integer` | as is | floor | `1` / `0` | parsed, floats floored |
/// | `float` | widened | as is | `1.0` / `0.0` | parsed |
/// | `string` | display form | display form | `true` / `false` | as is |
/// | `boolean` | `!= 0` | `!= 0.0` | as is | non-empty |
///
/// # Errors
///
/// Returns [`EvalError::InvalidConversion`] for arrays, unparsable strings
/// and non-representable numbers.
pub fn cast(value: &Value, name: FunctionName) -> std::result::Result<Value, EvalError> {
    let fail = || EvalError::InvalidConversion {
        value: value.to_string(),
        target: name.result_type(),
    };

    match (name, value) {
        (_, Value::Array(_)) => Err(fail()),
        (FunctionName::String, other) => Ok(Value::String(other.to_string())),

        (FunctionName::Integer, Value::Integer(i)) => Ok(Value::Integer(*i)),
        (FunctionName::Integer, Value::Float(f)) => floor_to_integer(*f).map(Value::Integer).ok_or_else(fail),
        (FunctionName::Integer, Value::Boolean(b)) => Ok(Value::Integer(i64::from(*b))),
        (FunctionName::Integer, Value::String(s)) => {
            let text = s.trim();
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Value::Integer(i));
            }
            parse_float(text)
                .and_then(floor_to_integer)
                .map(Value::Integer)
                .ok_or_else(fail)
        }

        (FunctionName::Float, Value::Integer(i)) => Ok(Value::Float(*i as f64)),
        (FunctionName::Float, Value::Float(f)) => Ok(Value::Float(*f)),
        (FunctionName::Float, Value::Boolean(b)) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        (FunctionName::Float, Value::String(s)) => {
            parse_float(s.trim()).map(Value::Float).ok_or_else(fail)
        }

        (FunctionName::Boolean, Value::Integer(i)) => Ok(Value::Boolean(*i != 0)),
        (FunctionName::Boolean, Value::Float(f)) => Ok(Value::Boolean(*f != 0.0)),
        (FunctionName::Boolean, Value::Boolean(b)) => Ok(Value::Boolean(*b)),
        (FunctionName::Boolean, Value::String(s)) => Ok(Value::Boolean(!s.is_empty())),
    }
}

/// Evaluates a condition expression to a boolean.
///
/// # Errors
///
/// Returns [`Error::Parse`](crate::Error::Parse) if either side fails to
/// parse and [`Error::Eval`](crate::Error::Eval) if evaluation fails or the
/// result is not a boolean.
///
/// # Examples
///
/// ```rust
/// use flowscope::expression::{
///     evaluate_condition, Binding, Bindings, Element, Expression, Operator, Value, Variable,
///     VariableType,
/// };
///
/// let x = Variable::scalar("x", "x", VariableType::Integer);
/// let bindings = Bindings::new().with(Binding::new(x.clone(), Value::Integer(3)));
/// let test = Expression::condition(
///     vec![Element::var(&x)],
///     Operator::Greater,
///     vec![Element::literal("0")],
/// );
/// assert!(evaluate_condition(&test, &bindings)?);
/// # Ok::<(), flowscope::Error>(())
/// ```
pub fn evaluate_condition(expression: &Expression, bindings: &Bindings) -> Result<bool> {
    let ast = parse_condition(expression)?;
    let result = evaluate(&ast, bindings)?;
    match result.value {
        Value::Boolean(b) => Ok(b),
        _ => Err(EvalError::UnexpectedType {
            expected: VariableType::Boolean,
            found: result.ty,
        }
        .into()),
    }
}

/// Evaluates the right side of `expression`, coerced to `expected` if given.
///
/// # Errors
///
/// Returns [`Error::Parse`](crate::Error::Parse) or
/// [`Error::Eval`](crate::Error::Eval).
pub fn evaluate_value(
    expression: &Expression,
    expected: Option<VariableType>,
    bindings: &Bindings,
) -> Result<Value> {
    let ast = parse_value(expression)?;
    Ok(calculate_value(&ast, expected, None, bindings)?.value)
}

fn read_variable(
    ident: &Identifier,
    bindings: &Bindings,
) -> std::result::Result<TypedValue, EvalError> {
    let binding = bindings
        .get(&ident.variable.id)
        .ok_or_else(|| EvalError::Unassigned {
            name: ident.name.clone(),
        })?;

    match &binding.value {
        Value::Array(items) => Ok(TypedValue::array(
            items.clone(),
            binding
                .variable
                .array_subtype
                .or(ident.variable.array_subtype),
        )),
        scalar => Ok(TypedValue::scalar(scalar.clone())),
    }
}

fn read_element(
    object: &Identifier,
    index: &AstNode,
    bindings: &Bindings,
) -> std::result::Result<TypedValue, EvalError> {
    let position = resolve_index(object, index, bindings)?;
    let binding = bindings
        .get(&object.variable.id)
        .ok_or_else(|| EvalError::Unassigned {
            name: object.name.clone(),
        })?;
    let Value::Array(items) = &binding.value else {
        return Err(EvalError::UnexpectedType {
            expected: VariableType::Array,
            found: binding.value.value_type(),
        });
    };

    items
        .get(position)
        .cloned()
        .map(TypedValue::scalar)
        .ok_or(EvalError::IndexOutOfBounds {
            name: object.name.clone(),
            index: position as i64,
            size: items.len(),
        })
}

/// Evaluates an array index and checks it against the declared size.
pub(crate) fn resolve_index(
    object: &Identifier,
    index: &AstNode,
    bindings: &Bindings,
) -> std::result::Result<usize, EvalError> {
    let size = object
        .variable
        .array_size
        .ok_or_else(|| EvalError::IncompleteArrayType {
            name: object.name.clone(),
        })?;

    let index = evaluate(index, bindings)?;
    let Value::Integer(raw) = index.value else {
        return Err(EvalError::IndexNotInteger {
            name: object.name.clone(),
            found: index.ty,
        });
    };

    usize::try_from(raw)
        .ok()
        .filter(|&i| i < size)
        .ok_or(EvalError::IndexOutOfBounds {
            name: object.name.clone(),
            index: raw,
            size,
        })
}

#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }
}

fn unary(op: UnaryOperator, operand: TypedValue) -> std::result::Result<TypedValue, EvalError> {
    let value = match (op, &operand.value) {
        (UnaryOperator::Not, Value::Boolean(b)) => Value::Boolean(!b),
        (UnaryOperator::Negate, Value::Integer(i)) => {
            Value::Integer(i.checked_neg().ok_or_else(|| EvalError::Overflow {
                operation: op.to_string(),
            })?)
        }
        (UnaryOperator::Negate, Value::Float(f)) => Value::Float(-f),
        (UnaryOperator::Plus, Value::Integer(_) | Value::Float(_)) => operand.value.clone(),
        _ => return Err(EvalError::mismatch(op, &[operand.ty])),
    };
    Ok(TypedValue::scalar(value))
}

fn binary(
    op: BinaryOperator,
    left: &TypedValue,
    right: &TypedValue,
) -> std::result::Result<TypedValue, EvalError> {
    let mismatch = || EvalError::mismatch(op, &[left.ty, right.ty]);

    if op.is_relational() {
        return compare(op, left, right).map(|b| TypedValue::scalar(Value::Boolean(b)));
    }

    if op.is_logical() {
        let (Value::Boolean(a), Value::Boolean(b)) = (&left.value, &right.value) else {
            return Err(mismatch());
        };
        let result = match op {
            BinaryOperator::And => *a && *b,
            _ => *a || *b,
        };
        return Ok(TypedValue::scalar(Value::Boolean(result)));
    }

    if let (BinaryOperator::Add, Value::String(a), Value::String(b)) = (op, &left.value, &right.value) {
        return Ok(TypedValue::scalar(Value::String(format!("{a}{b}"))));
    }

    let (Some(a), Some(b)) = (Number::of(&left.value), Number::of(&right.value)) else {
        return Err(mismatch());
    };
    arithmetic(op, a, b).map(TypedValue::scalar)
}

fn arithmetic(op: BinaryOperator, a: Number, b: Number) -> std::result::Result<Value, EvalError> {
    let overflow = || EvalError::Overflow {
        operation: op.to_string(),
    };

    match op {
        BinaryOperator::Divide => {
            if b.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Float(a.as_f64() / b.as_f64()))
        }
        BinaryOperator::Modulo => {
            if b.is_zero() {
                return Err(EvalError::ModuloByZero);
            }
            Ok(match (a, b) {
                (Number::Int(x), Number::Int(y)) => Value::Integer(x.wrapping_rem(y)),
                _ => Value::Float(a.as_f64() % b.as_f64()),
            })
        }
        _ => match (a, b) {
            (Number::Int(x), Number::Int(y)) => {
                let result = match op {
                    BinaryOperator::Add => x.checked_add(y),
                    BinaryOperator::Subtract => x.checked_sub(y),
                    _ => x.checked_mul(y),
                };
                result.map(Value::Integer).ok_or_else(overflow)
            }
            _ => {
                let (x, y) = (a.as_f64(), b.as_f64());
                Ok(Value::Float(match op {
                    BinaryOperator::Add => x + y,
                    BinaryOperator::Subtract => x - y,
                    _ => x * y,
                }))
            }
        },
    }
}

fn compare(
    op: BinaryOperator,
    left: &TypedValue,
    right: &TypedValue,
) -> std::result::Result<bool, EvalError> {
    let equality_only = matches!(op, BinaryOperator::Equal | BinaryOperator::NotEqual);
    let ordering = match (&left.value, &right.value) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) if equality_only => Some(a.cmp(b)),
        (a, b) => match (Number::of(a), Number::of(b)) {
            (Some(Number::Int(x)), Some(Number::Int(y))) => Some(x.cmp(&y)),
            (Some(x), Some(y)) => x.as_f64().partial_cmp(&y.as_f64()),
            _ => return Err(EvalError::mismatch(op, &[left.ty, right.ty])),
        },
    };

    Ok(match op {
        BinaryOperator::Equal => ordering == Some(Ordering::Equal),
        BinaryOperator::NotEqual => ordering != Some(Ordering::Equal),
        BinaryOperator::Greater => ordering == Some(Ordering::Greater),
        BinaryOperator::Less => ordering == Some(Ordering::Less),
        BinaryOperator::GreaterEqual => {
            matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
        }
        _ => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
    })
}

fn parse_float(text: &str) -> Option<f64> {
    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn floor_to_integer(value: f64) -> Option<i64> {
    let floored = value.floor();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    (floored.is_finite() && floored >= i64::MIN as f64 && floored < i64::MAX as f64)
        .then_some(floored as i64)
}
