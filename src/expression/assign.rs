//! Assignment of expression results to variables.

use crate::{
    expression::{
        ast::AstNode,
        element::{Element, Expression},
        error::EvalError,
        evaluator::{calculate_value, resolve_index},
        parser::{parse, parse_value},
        variable::{Binding, Bindings},
        Operator, Value,
    },
    Result,
};

/// Computes the binding an assignment expression produces.
///
/// The returned binding replaces the target's previous one; `bindings`
/// itself is not modified. Folding it in with [`Bindings::with`] gives the
/// next snapshot.
///
/// For a scalar target the right side is evaluated and coerced to the
/// declared type. For an indexed array target the index is resolved
/// against the declared size, the right side is coerced to the element type
/// and a copy of the array with that one slot replaced is returned. An array
/// without a binding yet starts out as all zero values.
///
/// # Errors
///
/// - [`EvalError::NotAnAssignment`] if the left side is not a variable
/// - [`EvalError::WholeArrayAssignment`] if an array is assigned without index
/// - [`EvalError::ArrayLengthMismatch`] if the stored array has the wrong length
/// - any parse or evaluation error from the index or right side
///
/// # Examples
///
/// ```rust
/// use flowscope::expression::{
///     assign, Binding, Bindings, Element, Expression, Value, Variable, VariableType,
/// };
///
/// let arr = Variable::array("arr", "arr", VariableType::Integer, 3);
/// let i = Variable::scalar("i", "i", VariableType::Integer);
/// let bindings = Bindings::new().with(Binding::new(i.clone(), Value::Integer(1)));
///
/// let store = Expression::assignment(
///     arr.indexed(vec![Element::var(&i)]),
///     vec![Element::literal("5")],
/// );
/// let binding = assign(&store, &bindings)?;
/// assert_eq!(
///     binding.value,
///     Value::Array(vec![Value::Integer(0), Value::Integer(5), Value::Integer(0)])
/// );
/// # Ok::<(), flowscope::Error>(())
/// ```
pub fn assign(expression: &Expression, bindings: &Bindings) -> Result<Binding> {
    let target = expression.target().ok_or(EvalError::NotAnAssignment)?;
    let value_ast = parse_value(expression)?;

    let Some(index) = target.index() else {
        if target.is_array() {
            return Err(EvalError::WholeArrayAssignment {
                name: target.name.clone(),
            }
            .into());
        }
        let value = calculate_value(&value_ast, Some(target.var_type), None, bindings)?;
        return Ok(Binding::new(target.without_index(), value.value));
    };

    let array = target.without_index();
    let mut subscript = Vec::with_capacity(index.len() + 3);
    subscript.push(Element::Variable(array.clone()));
    subscript.push(Element::op(Operator::OpenBracket));
    subscript.extend(index.iter().cloned());
    subscript.push(Element::op(Operator::CloseBracket));

    let AstNode::MemberAccess { object, index } = parse(&subscript)? else {
        return Err(EvalError::NotAnAssignment.into());
    };

    let (Some(subtype), Some(size)) = (array.array_subtype, array.array_size) else {
        return Err(EvalError::IncompleteArrayType {
            name: array.name.clone(),
        }
        .into());
    };
    let position = resolve_index(&object, &index, bindings)?;

    let mut items = match bindings.get(&array.id).map(|binding| &binding.value) {
        Some(Value::Array(items)) => items.clone(),
        Some(other) => {
            return Err(EvalError::UnexpectedType {
                expected: array.var_type,
                found: other.value_type(),
            }
            .into())
        }
        None => {
            log::trace!("default-initializing array '{}' with {size} elements", array.name);
            match Value::zeroed_array(subtype, size) {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(EvalError::IncompleteArrayType {
                        name: array.name.clone(),
                    }
                    .into())
                }
            }
        }
    };

    if items.len() != size {
        return Err(EvalError::ArrayLengthMismatch {
            name: array.name.clone(),
            expected: size,
            found: items.len(),
        }
        .into());
    }

    let value = calculate_value(&value_ast, Some(subtype), None, bindings)?;
    items[position] = value.value;
    Ok(Binding::new(array, Value::Array(items)))
}
