//! Text rendering of the target syntax tree.

use std::fmt::Write;

use crate::{
    codegen::ast::{Expr, ExprKind, Program, Statement, StatementKind},
    expression::Value,
};

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Emit a `# [node-id] label` comment before statements with provenance.
    pub provenance_comments: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        EmitterConfig {
            indent_width: 2,
            provenance_comments: true,
        }
    }
}

/// Renders programs as indented source text.
///
/// # Examples
///
/// ```rust
/// use flowscope::codegen::{
///     ast::{Expr, Program, Statement, StatementKind},
///     Emitter, EmitterConfig,
/// };
///
/// let program = Program {
///     statements: vec![Statement::new(StatementKind::While {
///         test: Expr::literal(true),
///         body: vec![Statement::new(StatementKind::Break)],
///     })],
/// };
///
/// let text = Emitter::new(EmitterConfig::default()).emit(&program);
/// assert_eq!(text, "while True:\n  break\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    config: EmitterConfig,
}

impl Emitter {
    /// Creates an emitter with `config`.
    #[must_use]
    pub fn new(config: EmitterConfig) -> Self {
        Emitter { config }
    }

    /// Renders `program`. Every line, the last included, ends with `\n`.
    #[must_use]
    pub fn emit(&self, program: &Program) -> String {
        let mut output = String::new();
        self.emit_block(&program.statements, 0, &mut output);
        output
    }

    fn emit_block(&self, statements: &[Statement], indent: usize, output: &mut String) {
        if statements.is_empty() {
            self.push_line(output, indent, "pass");
            return;
        }
        for statement in statements {
            self.emit_statement(statement, indent, output);
        }
    }

    fn emit_statement(&self, statement: &Statement, indent: usize, output: &mut String) {
        if self.config.provenance_comments {
            if let Some(provenance) = &statement.provenance {
                let comment = format!(
                    "# [{}] {}",
                    provenance.node_id,
                    single_line(&provenance.label)
                );
                self.push_line(output, indent, &comment);
            }
        }

        match &statement.kind {
            StatementKind::Assignment { target, value } => {
                let line = format!("{} = {}", expression(target), expression(value));
                self.push_line(output, indent, &line);
            }
            StatementKind::If {
                test,
                then,
                otherwise,
            } => {
                self.push_line(output, indent, &format!("if {}:", expression(test)));
                self.emit_block(then, indent + 1, output);
                if !otherwise.is_empty() {
                    self.push_line(output, indent, "else:");
                    self.emit_block(otherwise, indent + 1, output);
                }
            }
            StatementKind::While { test, body } => {
                self.push_line(output, indent, &format!("while {}:", expression(test)));
                self.emit_block(body, indent + 1, output);
            }
            StatementKind::Print { args } => {
                let args: Vec<String> = args.iter().map(expression).collect();
                self.push_line(output, indent, &format!("print({})", args.join(", ")));
            }
            StatementKind::Break => self.push_line(output, indent, "break"),
            StatementKind::Unsupported { reason } => {
                let line = format!("pass  # unsupported: {}", single_line(reason));
                self.push_line(output, indent, &line);
            }
        }
    }

    fn push_line(&self, output: &mut String, indent: usize, line: &str) {
        let _ = writeln!(
            output,
            "{:width$}{line}",
            "",
            width = indent * self.config.indent_width
        );
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Renders an expression without outer parentheses.
fn expression(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Binary { op, left, right } => {
            format!("{} {op} {}", operand(left), operand(right))
        }
        ExprKind::Unary { op, operand: inner } => {
            let separator = if op.to_string().chars().all(char::is_alphabetic) {
                " "
            } else {
                ""
            };
            format!("{op}{separator}{}", operand(inner))
        }
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::Literal(value) => literal(value),
        ExprKind::Call { function, args } => {
            let args: Vec<String> = args.iter().map(expression).collect();
            format!("{function}({})", args.join(", "))
        }
        ExprKind::Subscript { object, index } => {
            format!("{}[{}]", operand(object), expression(index))
        }
    }
}

/// Renders a nested operand, parenthesizing compound operations.
fn operand(expr: &Expr) -> String {
    match expr.kind {
        ExprKind::Binary { .. } | ExprKind::Unary { .. } => format!("({})", expression(expr)),
        _ => expression(expr),
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::Boolean(true) => "True".to_string(),
        Value::Boolean(false) => "False".to_string(),
        Value::String(text) => {
            let escaped = text
                .replace('\\', "\\\\")
                .replace('"', "\\\"")
                .replace('\n', "\\n");
            format!("\"{escaped}\"")
        }
        Value::Float(number) if number.fract() == 0.0 && number.is_finite() => {
            format!("{number:.1}")
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(literal).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.to_string(),
    }
}
