//! Flowchart to structured source compilation.
//!
//! Compilation runs in three stages:
//!
//! 1. [`FlowCfg::build`] validates the diagram and builds the control-flow graph
//! 2. the synthesizer recovers `if` / `while` / `break` structure into an [`ast::Program`]
//! 3. the [`Emitter`] renders the program as indented text
//!
//! [`compile`] never fails. A diagram that cannot be analyzed at all compiles to a program
//! holding a single `Unsupported` statement, and local problems (an unparsable condition, an
//! unknown node kind, irreducible flow) become `Unsupported` statements in place while the rest
//! of the diagram is still lowered.
//!
//! # Examples
//!
//! ```rust
//! use flowscope::{
//!     codegen::compile,
//!     expression::{Element, Expression, Operator, Variable, VariableType},
//!     flowchart::DiagramBuilder,
//! };
//!
//! let x = Variable::scalar("x", "x", VariableType::Integer);
//! let diagram = DiagramBuilder::new()
//!     .start("s")
//!     .conditional(
//!         "c",
//!         Expression::condition(vec![Element::var(&x)], Operator::Greater, vec![Element::literal("0")]),
//!     )
//!     .end("e")
//!     .edge("s", "c")
//!     .yes("c", "c")
//!     .no("c", "e")
//!     .build();
//!
//! let compilation = compile(&diagram.nodes, &diagram.edges);
//! assert_eq!(compilation.text, "# [c] conditional\nwhile x > 0:\n  pass\n");
//! ```

pub mod ast;
mod emitter;
mod lower;
mod synthesizer;

pub use emitter::{Emitter, EmitterConfig};

use crate::{
    analysis::FlowCfg,
    codegen::{
        ast::{Program, Statement},
        synthesizer::Synthesizer,
    },
    flowchart::{FlowEdge, FlowNode},
};

/// Compilation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Text rendering options.
    pub emitter: EmitterConfig,
    /// Deepest branch or loop nesting lowered before giving up on a path.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            emitter: EmitterConfig::default(),
            max_depth: 64,
        }
    }
}

/// Result of a compile: the program tree and its rendered text.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    /// Generated syntax tree.
    pub program: Program,
    /// Rendered source text.
    pub text: String,
}

impl Compilation {
    /// Number of `Unsupported` statements anywhere in the program.
    #[must_use]
    pub fn unsupported_count(&self) -> usize {
        fn count(statements: &[Statement]) -> usize {
            statements
                .iter()
                .map(|statement| match &statement.kind {
                    ast::StatementKind::If {
                        then, otherwise, ..
                    } => count(then) + count(otherwise),
                    ast::StatementKind::While { body, .. } => count(body),
                    ast::StatementKind::Unsupported { .. } => 1,
                    _ => 0,
                })
                .sum()
        }
        count(&self.program.statements)
    }
}

/// Configured flowchart compiler.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    /// Creates a compiler with `options`.
    #[must_use]
    pub fn new(options: CompileOptions) -> Self {
        Compiler { options }
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compiles a diagram. Never fails; see the [module documentation](self).
    #[must_use]
    pub fn compile(&self, nodes: &[FlowNode], edges: &[FlowEdge]) -> Compilation {
        let program = match FlowCfg::build(nodes, edges) {
            Ok(cfg) => Program {
                statements: Synthesizer::new(&cfg, self.options.max_depth).synthesize(),
            },
            Err(err) => {
                log::warn!("cannot compile flowchart: {err}");
                Program {
                    statements: vec![Statement::unsupported(err.to_string())],
                }
            }
        };

        let text = Emitter::new(self.options.emitter.clone()).emit(&program);
        log::debug!(
            "compiled {} node(s) into {} top-level statement(s)",
            nodes.len(),
            program.statements.len()
        );
        Compilation { program, text }
    }
}

/// Compiles a diagram with default options.
#[must_use]
pub fn compile(nodes: &[FlowNode], edges: &[FlowEdge]) -> Compilation {
    Compiler::default().compile(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codegen::ast::StatementKind,
        test::{array_diagram, while_diagram},
    };

    #[test]
    fn test_total_failure_is_single_unsupported() {
        let compilation = compile(&[], &[]);
        assert_eq!(compilation.program.statements.len(), 1);
        assert!(matches!(
            compilation.program.statements[0].kind,
            StatementKind::Unsupported { .. }
        ));
        assert_eq!(compilation.text, "pass  # unsupported: Empty flowchart\n");
        assert_eq!(compilation.unsupported_count(), 1);
    }

    #[test]
    fn test_array_element_assignment() {
        let diagram = array_diagram();
        let options = CompileOptions {
            emitter: EmitterConfig {
                provenance_comments: false,
                ..EmitterConfig::default()
            },
            ..CompileOptions::default()
        };
        let compilation = Compiler::new(options).compile(&diagram.nodes, &diagram.edges);
        assert_eq!(compilation.text, "i = 1\narr[i] = 5\n");
    }

    #[test]
    fn test_while_text() {
        let diagram = while_diagram();
        let compilation = compile(&diagram.nodes, &diagram.edges);
        assert_eq!(
            compilation.text,
            "# [a] assignVariable\n\
             x = 3\n\
             # [c] x > 0\n\
             while x > 0:\n  \
             # [b] assignVariable\n  \
             x = x - 1\n\
             # [o] output\n\
             print(x)\n"
        );
        assert_eq!(compilation.unsupported_count(), 0);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let diagram = while_diagram();
        let first = compile(&diagram.nodes, &diagram.edges);
        let second = compile(&diagram.nodes, &diagram.edges);
        assert_eq!(first, second);
    }
}
