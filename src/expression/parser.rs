//! Recursive-descent parser from element sequences to [`AstNode`] trees.
//!
//! Precedence, loosest first. Every binary level is left-associative.
//!
//! | Level | Operators |
//! |-------|-----------|
//! | relational | `== != > < >= <=` |
//! | or | `\|\|` |
//! | and | `&&` |
//! | additive | `+ -` |
//! | multiplicative | `* / %` |
//! | unary | `! - +` |
//! | primary | literal, variable, `a[i]`, cast call, `( ... )` |
//!
//! Relational operators bind loosest, so `a > 0 && b` parses as
//! `a > (0 && b)`. The diagram editor builds conditions from one comparison
//! between two sides, and that layout mirrors it.

use crate::expression::{
    ast::{AstNode, BinaryOperator, Identifier, UnaryOperator},
    element::{Element, Expression, LeftSide},
    error::ParseError,
    Operator, Value, Variable, VariableType,
};

/// Parses a complete element sequence.
///
/// # Errors
///
/// Returns a [`ParseError`] if the sequence is empty or truncated, a
/// delimiter is unbalanced, tokens remain after a complete expression, a
/// non-array variable is subscripted, a literal is malformed or a cast has an
/// empty argument.
///
/// # Examples
///
/// ```rust
/// use flowscope::expression::{parse, AstNode, Element, Operator};
///
/// let ast = parse(&[
///     Element::literal("1"),
///     Element::op(Operator::Plus),
///     Element::literal("2"),
///     Element::op(Operator::Multiply),
///     Element::literal("3"),
/// ])?;
/// assert_eq!(ast.to_string(), "(1 + (2 * 3))");
/// # Ok::<(), flowscope::expression::ParseError>(())
/// ```
pub fn parse(elements: &[Element]) -> Result<AstNode, ParseError> {
    parse_nested(elements, 0)
}

fn parse_nested(elements: &[Element], depth: usize) -> Result<AstNode, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::TooDeep { limit: MAX_DEPTH });
    }
    let mut parser = Parser {
        elements,
        pos: 0,
        depth,
    };
    let ast = parser.parse_expression()?;
    if parser.pos < elements.len() {
        return Err(ParseError::TrailingTokens {
            position: parser.pos,
        });
    }
    Ok(ast)
}

/// Parses the right side of a value or assignment expression.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_value(expression: &Expression) -> Result<AstNode, ParseError> {
    parse(&expression.right_side)
}

/// Parses a condition into one tree joining both sides with its comparison.
///
/// An expression without left side parses as its right side alone.
///
/// # Errors
///
/// Besides the errors of [`parse`], fails with
/// [`ParseError::MissingComparison`] if a left side has no operator and
/// [`ParseError::NotAComparison`] if the operator is not relational.
pub fn parse_condition(expression: &Expression) -> Result<AstNode, ParseError> {
    let Some(left_side) = &expression.left_side else {
        return parse(&expression.right_side);
    };
    let op = expression.equality.ok_or(ParseError::MissingComparison)?;
    let binary = BinaryOperator::from_operator(op)
        .filter(|op| op.is_relational())
        .ok_or(ParseError::NotAComparison { op })?;

    let left = match left_side {
        LeftSide::Elements(elements) => parse(elements)?,
        LeftSide::Variable(variable) => parse(&[Element::Variable(variable.clone())])?,
    };
    let right = parse(&expression.right_side)?;
    Ok(AstNode::binary(binary, left, right))
}

/// Determines the value and type of literal surface text.
///
/// `true`/`false` are booleans, text in matching single or double quotes is
/// a string, anything `i64` accepts is an integer and any other finite
/// number is a float.
///
/// # Errors
///
/// Returns [`ParseError::InvalidLiteral`] for anything else.
pub fn parse_literal(text: &str) -> Result<(Value, VariableType), ParseError> {
    let trimmed = text.trim();
    match trimmed {
        "true" => return Ok((Value::Boolean(true), VariableType::Boolean)),
        "false" => return Ok((Value::Boolean(false), VariableType::Boolean)),
        _ => {}
    }

    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            let inner = &trimmed[1..trimmed.len() - 1];
            return Ok((Value::String(inner.to_string()), VariableType::String));
        }
    }

    if let Ok(int) = trimmed.parse::<i64>() {
        return Ok((Value::Integer(int), VariableType::Integer));
    }
    let looks_numeric = trimmed.bytes().any(|b| b.is_ascii_digit());
    match trimmed.parse::<f64>() {
        Ok(float) if looks_numeric && float.is_finite() => {
            Ok((Value::Float(float), VariableType::Float))
        }
        _ => Err(ParseError::InvalidLiteral {
            text: text.to_string(),
        }),
    }
}

/// Deepest tree the parser builds. Counts unary operators, groupings, subscripts, cast
/// arguments and operands chained at one binary level.
pub const MAX_DEPTH: usize = 256;

struct Parser<'a> {
    elements: &'a [Element],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.parse_relational()
    }

    fn parse_relational(&mut self) -> Result<AstNode, ParseError> {
        let base = self.depth;
        let mut left = self.parse_or()?;
        while let Some(op) = self.binary_at_level(BinaryOperator::is_relational) {
            self.pos += 1;
            self.descend()?;
            let right = self.parse_or()?;
            left = AstNode::binary(op, left, right);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<AstNode, ParseError> {
        let base = self.depth;
        let mut left = self.parse_and()?;
        while self.eat(Operator::Or) {
            self.descend()?;
            let right = self.parse_and()?;
            left = AstNode::binary(BinaryOperator::Or, left, right);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<AstNode, ParseError> {
        let base = self.depth;
        let mut left = self.parse_additive()?;
        while self.eat(Operator::And) {
            self.descend()?;
            let right = self.parse_additive()?;
            left = AstNode::binary(BinaryOperator::And, left, right);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<AstNode, ParseError> {
        let base = self.depth;
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.binary_at_level(|op| {
            matches!(op, BinaryOperator::Add | BinaryOperator::Subtract)
        }) {
            self.pos += 1;
            self.descend()?;
            let right = self.parse_multiplicative()?;
            left = AstNode::binary(op, left, right);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<AstNode, ParseError> {
        let base = self.depth;
        let mut left = self.parse_unary()?;
        while let Some(op) = self.binary_at_level(|op| {
            matches!(
                op,
                BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo
            )
        }) {
            self.pos += 1;
            self.descend()?;
            let right = self.parse_unary()?;
            left = AstNode::binary(op, left, right);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<AstNode, ParseError> {
        let op = match self.peek() {
            Some(Element::Operator(Operator::Not)) => UnaryOperator::Not,
            Some(Element::Operator(Operator::Minus)) => UnaryOperator::Negate,
            Some(Element::Operator(Operator::Plus)) => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };
        self.pos += 1;
        self.descend()?;
        let operand = self.parse_unary()?;
        self.depth -= 1;
        Ok(AstNode::unary(op, operand))
    }

    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let position = self.pos;
        let element = self.elements.get(position).ok_or(ParseError::UnexpectedEnd)?;
        self.pos += 1;

        match element {
            Element::Literal(text) => {
                let (value, ty) = parse_literal(text)?;
                Ok(AstNode::Literal { value, ty })
            }
            Element::Variable(variable) => {
                if let Some(index) = variable.index() {
                    let object = Self::array_identifier(variable)?;
                    let index = parse_nested(index, self.depth + 1)?;
                    return Ok(AstNode::MemberAccess {
                        object,
                        index: Box::new(index),
                    });
                }
                if self.eat(Operator::OpenBracket) {
                    let object = Self::array_identifier(variable)?;
                    self.descend()?;
                    let index = self.parse_expression()?;
                    self.expect(Operator::CloseBracket)?;
                    self.depth -= 1;
                    return Ok(AstNode::MemberAccess {
                        object,
                        index: Box::new(index),
                    });
                }
                Ok(AstNode::Identifier(Identifier::new(variable)))
            }
            Element::Function { name, argument } => {
                if argument.is_empty() {
                    return Err(ParseError::EmptyArgument { name: *name });
                }
                let argument = parse_nested(argument, self.depth + 1)?;
                Ok(AstNode::FunctionCall {
                    name: *name,
                    argument: Box::new(argument),
                })
            }
            Element::Operator(Operator::OpenParen) => {
                self.descend()?;
                let inner = self.parse_expression()?;
                self.expect(Operator::CloseParen)?;
                self.depth -= 1;
                Ok(inner)
            }
            Element::Operator(op) => Err(ParseError::UnexpectedToken {
                token: op.to_string(),
                position,
            }),
        }
    }

    fn array_identifier(variable: &Variable) -> Result<Identifier, ParseError> {
        if !variable.is_array() {
            return Err(ParseError::NotAnArray {
                name: variable.name.clone(),
            });
        }
        Ok(Identifier::new(variable))
    }

    fn peek(&self) -> Option<&'a Element> {
        self.elements.get(self.pos)
    }

    fn binary_at_level(&self, level: impl Fn(BinaryOperator) -> bool) -> Option<BinaryOperator> {
        match self.peek() {
            Some(Element::Operator(op)) => BinaryOperator::from_operator(*op).filter(|&op| level(op)),
            _ => None,
        }
    }

    fn eat(&mut self, op: Operator) -> bool {
        if matches!(self.peek(), Some(Element::Operator(current)) if *current == op) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, op: Operator) -> Result<(), ParseError> {
        if self.eat(op) {
            Ok(())
        } else {
            Err(ParseError::MissingDelimiter {
                expected: op,
                position: self.pos,
            })
        }
    }
}
