//! Lowering of flowchart expressions into target expressions and statements.

use crate::{
    codegen::ast::{BinOp, Expr, Statement, StatementKind, UnaryOp},
    expression::{
        parse, parse_condition, parse_value, AstNode, BinaryOperator, EvalError, Expression,
        FunctionName, UnaryOperator, Variable, VariableType,
    },
    flowchart::FlowNode,
    Result,
};

/// Builtin name of a cast in the target language.
pub(crate) const fn cast_name(name: FunctionName) -> &'static str {
    match name {
        FunctionName::Integer => "int",
        FunctionName::Float => "float",
        FunctionName::String => "str",
        FunctionName::Boolean => "bool",
    }
}

const fn binary_op(op: BinaryOperator) -> BinOp {
    match op {
        BinaryOperator::Equal => BinOp::Eq,
        BinaryOperator::NotEqual => BinOp::NotEq,
        BinaryOperator::Greater => BinOp::Gt,
        BinaryOperator::Less => BinOp::Lt,
        BinaryOperator::GreaterEqual => BinOp::GtE,
        BinaryOperator::LessEqual => BinOp::LtE,
        BinaryOperator::Or => BinOp::Or,
        BinaryOperator::And => BinOp::And,
        BinaryOperator::Add => BinOp::Add,
        BinaryOperator::Subtract => BinOp::Sub,
        BinaryOperator::Multiply => BinOp::Mul,
        BinaryOperator::Divide => BinOp::Div,
        BinaryOperator::Modulo => BinOp::Mod,
    }
}

const fn unary_op(op: UnaryOperator) -> UnaryOp {
    match op {
        UnaryOperator::Not => UnaryOp::Not,
        UnaryOperator::Negate => UnaryOp::Neg,
        UnaryOperator::Plus => UnaryOp::Pos,
    }
}

/// Lowers an expression tree.
pub(crate) fn lower_expr(ast: &AstNode) -> Expr {
    match ast {
        AstNode::Literal { value, .. } => Expr::literal(value.clone()),
        AstNode::Identifier(ident) => Expr::identifier(&ident.name),
        AstNode::UnaryOp { op, operand } => Expr::unary(unary_op(*op), lower_expr(operand)),
        AstNode::BinaryOp { op, left, right } => {
            Expr::binary(binary_op(*op), lower_expr(left), lower_expr(right))
        }
        AstNode::MemberAccess { object, index } => {
            Expr::subscript(Expr::identifier(&object.name), lower_expr(index))
        }
        AstNode::FunctionCall { name, argument } => {
            Expr::call(cast_name(*name), vec![lower_expr(argument)])
        }
    }
}

/// Lowers the receiving side of an assignment or input.
fn lower_target(variable: &Variable) -> Result<Expr> {
    let name = Expr::identifier(&variable.name);
    match variable.index() {
        Some(index) => Ok(Expr::subscript(name, lower_expr(&parse(index)?))),
        None if variable.is_array() => Err(EvalError::WholeArrayAssignment {
            name: variable.name.clone(),
        }
        .into()),
        None => Ok(name),
    }
}

/// `target = value` for an `AssignVariable` node.
pub(crate) fn assignment(expression: &Expression, node: &FlowNode) -> Result<Statement> {
    let target = expression.target().ok_or(EvalError::NotAnAssignment)?;
    let target = lower_target(target)?;
    let value = lower_expr(&parse_value(expression)?).from_node(node);
    Ok(Statement::new(StatementKind::Assignment { target, value }).from_node(node))
}

/// `target = cast(input())` for an `Input` node.
pub(crate) fn input(variable: &Variable, node: &FlowNode) -> Result<Statement> {
    let target = lower_target(variable)?;
    let read = Expr::call("input", Vec::new());
    let ty = if variable.index().is_some() {
        variable.array_subtype.unwrap_or(VariableType::String)
    } else {
        variable.var_type
    };
    let value = match FunctionName::for_type(ty) {
        Some(FunctionName::String) | None => read,
        Some(cast) => Expr::call(cast_name(cast), vec![read]),
    }
    .from_node(node);
    Ok(Statement::new(StatementKind::Assignment { target, value }).from_node(node))
}

/// `print(value)` for an `Output` node.
pub(crate) fn output(expression: &Expression, node: &FlowNode) -> Result<Statement> {
    let value = lower_expr(&parse_value(expression)?).from_node(node);
    Ok(Statement::new(StatementKind::Print { args: vec![value] }).from_node(node))
}

/// The test of a `Conditional` node.
pub(crate) fn condition(expression: &Expression, node: &FlowNode) -> Result<Expr> {
    Ok(lower_expr(&parse_condition(expression)?).from_node(node))
}
