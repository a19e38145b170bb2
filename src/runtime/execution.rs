//! The stepping interpreter.

use serde::Serialize;

use crate::{
    analysis::FlowCfg,
    expression::{
        assign, evaluate_condition, evaluate_value, Binding, Bindings, Element, Expression,
        FunctionName, Variable, VariableType,
    },
    flowchart::{BranchLabel, FlowEdge, FlowNode, NodeKind},
    runtime::{ExecutionConfig, InputSource},
    utils::graph::NodeId,
    Error, Result,
};

/// What a single step did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum StepEvent {
    /// The `Start` node was passed.
    Started,
    /// A declaration node was passed.
    Declared {
        /// Node id
        node: String,
        /// Number of declared variables
        count: usize,
    },
    /// A variable or array element was written.
    Assigned {
        /// Node id
        node: String,
        /// The new binding
        binding: Binding,
    },
    /// A value was printed.
    Printed {
        /// Node id
        node: String,
        /// Display form of the value
        text: String,
    },
    /// A conditional chose a branch.
    Branched {
        /// Node id
        node: String,
        /// The branch taken
        taken: BranchLabel,
    },
    /// A node of unknown kind was passed over.
    Skipped {
        /// Node id
        node: String,
    },
    /// Execution reached an `End` node or a node without successor.
    Finished,
}

/// A running flowchart.
#[derive(Debug)]
pub struct Execution {
    cfg: FlowCfg,
    config: ExecutionConfig,
    bindings: Bindings,
    outputs: Vec<String>,
    current: Option<NodeId>,
    steps: usize,
}

impl Execution {
    /// Prepares an execution positioned at the `Start` node.
    ///
    /// # Errors
    ///
    /// Fails like [`FlowCfg::build`] when the diagram has no unique start.
    pub fn new(nodes: &[FlowNode], edges: &[FlowEdge], config: ExecutionConfig) -> Result<Self> {
        let cfg = FlowCfg::build(nodes, edges)?;
        let current = Some(cfg.entry());
        Ok(Execution {
            cfg,
            config,
            bindings: Bindings::new(),
            outputs: Vec::new(),
            current,
            steps: 0,
        })
    }

    /// The current binding snapshot.
    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Everything printed so far, in order.
    #[must_use]
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// The node the next step executes, `None` once finished.
    #[must_use]
    pub fn current_node(&self) -> Option<&FlowNode> {
        self.current.and_then(|node| self.cfg.node(node))
    }

    /// Number of steps taken.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns `true` once execution has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    /// Executes the current node and advances.
    ///
    /// Once finished, every further step returns [`StepEvent::Finished`].
    ///
    /// # Errors
    ///
    /// - [`Error::StepLimit`] when the configured budget is used up
    /// - [`Error::InputExhausted`] when an `Input` node gets no line
    /// - [`Error::Parse`] / [`Error::Eval`] when an expression fails
    ///
    /// On error the execution stays on the failing node.
    pub fn step(&mut self, input: &mut dyn InputSource) -> Result<StepEvent> {
        let Some(node) = self.current else {
            return Ok(StepEvent::Finished);
        };
        let Some(flow) = self.cfg.node(node) else {
            self.current = None;
            return Ok(StepEvent::Finished);
        };
        if self.config.max_steps > 0 && self.steps >= self.config.max_steps {
            return Err(Error::StepLimit(self.config.max_steps));
        }

        let id = flow.id.clone();
        let mut next = self.cfg.next(node);
        let event = match &flow.kind {
            NodeKind::Start => StepEvent::Started,
            NodeKind::End => {
                next = None;
                StepEvent::Finished
            }
            NodeKind::DeclareVariable { variables } => {
                for variable in variables {
                    variable.validate()?;
                }
                StepEvent::Declared {
                    node: id,
                    count: variables.len(),
                }
            }
            NodeKind::AssignVariable { expression } => {
                let binding = assign(expression, &self.bindings)?;
                self.bindings = self.bindings.with(binding.clone());
                StepEvent::Assigned { node: id, binding }
            }
            NodeKind::Input { variable } => {
                let line = input
                    .read_line(variable)
                    .ok_or_else(|| Error::InputExhausted(variable.name.clone()))?;
                let binding = assign(&input_expression(variable, &line), &self.bindings)?;
                self.bindings = self.bindings.with(binding.clone());
                StepEvent::Assigned { node: id, binding }
            }
            NodeKind::Output { expression } => {
                let text = evaluate_value(expression, None, &self.bindings)?.to_string();
                self.outputs.push(text.clone());
                StepEvent::Printed { node: id, text }
            }
            NodeKind::Conditional { expression } => {
                let taken = if evaluate_condition(expression, &self.bindings)? {
                    BranchLabel::Yes
                } else {
                    BranchLabel::No
                };
                next = self.cfg.branch_target(node, taken);
                StepEvent::Branched { node: id, taken }
            }
            NodeKind::Unknown => StepEvent::Skipped { node: id },
        };

        self.steps += 1;
        self.current = next;
        log::trace!("step {}: {:?}", self.steps, event);
        Ok(event)
    }

    /// Steps until finished.
    ///
    /// # Errors
    ///
    /// Propagates the first failing [`step`](Self::step).
    pub fn run(&mut self, input: &mut dyn InputSource) -> Result<()> {
        while !self.is_finished() {
            self.step(input)?;
        }
        Ok(())
    }
}

/// Builds `variable = cast("line")` so input goes through the regular assignment path.
fn input_expression(variable: &Variable, line: &str) -> Expression {
    let ty = if variable.index().is_some() {
        variable.array_subtype.unwrap_or(VariableType::String)
    } else {
        variable.var_type
    };
    let text = line.trim_end_matches(['\r', '\n']);
    let quoted = Element::literal(format!("\"{text}\""));

    let value = match ty {
        VariableType::Boolean if matches!(text.trim(), "true" | "false") => {
            Element::literal(text.trim())
        }
        VariableType::String | VariableType::Array => quoted,
        other => match FunctionName::for_type(other) {
            Some(cast) => Element::function(cast, vec![quoted]),
            None => quoted,
        },
    };
    Expression::assignment(variable.clone(), vec![value])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        expression::{EvalError, Value},
        flowchart::DiagramBuilder,
        runtime::ScriptedInput,
        test::{array_diagram, do_while_diagram, int_var, while_diagram},
    };

    fn run(diagram: &crate::flowchart::Diagram, lines: &[&str]) -> Result<Execution> {
        let mut execution =
            Execution::new(&diagram.nodes, &diagram.edges, ExecutionConfig::default())?;
        execution.run(&mut ScriptedInput::new(lines.iter().copied()))?;
        Ok(execution)
    }

    #[test]
    fn test_array_scenario() {
        let execution = run(&array_diagram(), &[]).unwrap();
        assert_eq!(
            execution.bindings().value_of("arr"),
            Some(&Value::Array(
                [0, 5, 0, 0, 0].into_iter().map(Value::Integer).collect()
            ))
        );
        assert!(execution.is_finished());
    }

    #[test]
    fn test_while_loop_counts_down() {
        let execution = run(&while_diagram(), &[]).unwrap();
        assert_eq!(execution.outputs(), ["0"]);
        assert_eq!(execution.bindings().value_of("x"), Some(&Value::Integer(0)));
    }

    #[test]
    fn test_do_while_runs_body_first() {
        let x = int_var("x");
        let mut diagram = do_while_diagram();
        // seed x so the first increment has something to read
        diagram.nodes.insert(
            1,
            FlowNode::new(
                "seed",
                NodeKind::AssignVariable {
                    expression: crate::test::set(&x, "10"),
                },
            ),
        );
        diagram.edges[0] = FlowEdge::new("s", "seed");
        diagram.edges.push(FlowEdge::new("seed", "a"));

        let execution = run(&diagram, &[]).unwrap();
        assert_eq!(execution.outputs(), ["11"]);
    }

    #[test]
    fn test_step_events() {
        let diagram = while_diagram();
        let mut execution =
            Execution::new(&diagram.nodes, &diagram.edges, ExecutionConfig::default()).unwrap();
        let mut input = ScriptedInput::default();

        assert_eq!(execution.step(&mut input).unwrap(), StepEvent::Started);
        assert_eq!(
            execution.step(&mut input).unwrap(),
            StepEvent::Declared {
                node: "d".into(),
                count: 1
            }
        );
        assert!(matches!(
            execution.step(&mut input).unwrap(),
            StepEvent::Assigned { ref node, .. } if node == "a"
        ));
        assert_eq!(
            execution.step(&mut input).unwrap(),
            StepEvent::Branched {
                node: "c".into(),
                taken: BranchLabel::Yes
            }
        );
        assert_eq!(execution.current_node().map(|n| n.id.as_str()), Some("b"));
    }

    #[test]
    fn test_input_is_cast_to_declared_type() {
        let n = int_var("n");
        let flag = Variable::scalar("f", "f", VariableType::Boolean);
        let name = Variable::scalar("s", "s", VariableType::String);
        let diagram = DiagramBuilder::new()
            .start("s0")
            .input("i1", n)
            .input("i2", flag)
            .input("i3", name)
            .end("e")
            .chain(&["s0", "i1", "i2", "i3", "e"])
            .build();

        let execution = run(&diagram, &["7", "false", "Ada"]).unwrap();
        assert_eq!(execution.bindings().value_of("n"), Some(&Value::Integer(7)));
        assert_eq!(execution.bindings().value_of("f"), Some(&Value::Boolean(false)));
        assert_eq!(
            execution.bindings().value_of("s"),
            Some(&Value::String("Ada".into()))
        );
    }

    #[test]
    fn test_missing_input_fails() {
        let diagram = DiagramBuilder::new()
            .start("s")
            .input("i", int_var("n"))
            .end("e")
            .chain(&["s", "i", "e"])
            .build();
        let err = run(&diagram, &[]).unwrap_err();
        assert!(matches!(err, Error::InputExhausted(name) if name == "n"));
    }

    #[test]
    fn test_step_limit() {
        let x = int_var("x");
        let diagram = DiagramBuilder::new()
            .start("s")
            .assign("a", crate::test::set(&x, "1"))
            .conditional(
                "c",
                crate::test::compare(&x, crate::expression::Operator::Greater, "0"),
            )
            .end("e")
            .chain(&["s", "a", "c"])
            .yes("c", "c")
            .no("c", "e")
            .build();
        let mut execution = Execution::new(
            &diagram.nodes,
            &diagram.edges,
            ExecutionConfig::new().with_max_steps(50),
        )
        .unwrap();
        let err = execution.run(&mut ScriptedInput::default()).unwrap_err();
        assert!(matches!(err, Error::StepLimit(50)));
        assert_eq!(execution.steps(), 50);
    }

    #[test]
    fn test_unassigned_read_fails() {
        let x = int_var("x");
        let diagram = DiagramBuilder::new()
            .start("s")
            .output("o", crate::test::print_var(&x))
            .end("e")
            .chain(&["s", "o", "e"])
            .build();
        let err = run(&diagram, &[]).unwrap_err();
        assert!(matches!(err, Error::Eval(EvalError::Unassigned { .. })));
    }

    #[test]
    fn test_finished_is_sticky() {
        let diagram = DiagramBuilder::new()
            .start("s")
            .end("e")
            .edge("s", "e")
            .build();
        let mut execution =
            Execution::new(&diagram.nodes, &diagram.edges, ExecutionConfig::default()).unwrap();
        let mut input = ScriptedInput::default();
        assert_eq!(execution.step(&mut input).unwrap(), StepEvent::Started);
        assert_eq!(execution.step(&mut input).unwrap(), StepEvent::Finished);
        assert_eq!(execution.step(&mut input).unwrap(), StepEvent::Finished);
        assert_eq!(execution.steps(), 2);
    }
}
