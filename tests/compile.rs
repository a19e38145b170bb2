//! End-to-end compilation tests.
//!
//! Diagrams are built with the public builder, compiled with provenance comments off, and the
//! rendered text is compared exactly.

use flowscope::{
    codegen::{ast::StatementKind, compile, CompileOptions, Compiler, EmitterConfig},
    prelude::*,
};

fn int_var(name: &str) -> Variable {
    Variable::scalar(name, name, VariableType::Integer)
}

fn set(variable: &Variable, value: &str) -> Expression {
    Expression::assignment(variable.clone(), vec![Element::literal(value)])
}

fn increment(variable: &Variable) -> Expression {
    Expression::assignment(
        variable.clone(),
        vec![
            Element::var(variable),
            Element::op(Operator::Plus),
            Element::literal("1"),
        ],
    )
}

fn compare(variable: &Variable, op: Operator, value: &str) -> Expression {
    Expression::condition(vec![Element::var(variable)], op, vec![Element::literal(value)])
}

fn show(variable: &Variable) -> Expression {
    Expression::value(vec![Element::var(variable)])
}

fn plain(diagram: &Diagram) -> String {
    let options = CompileOptions {
        emitter: EmitterConfig {
            provenance_comments: false,
            ..EmitterConfig::default()
        },
        ..CompileOptions::default()
    };
    Compiler::new(options)
        .compile(&diagram.nodes, &diagram.edges)
        .text
}

#[test]
fn array_element_assignment_compiles_to_subscript() {
    let arr = Variable::array("arr", "arr", VariableType::Integer, 5);
    let i = int_var("i");
    let diagram = DiagramBuilder::new()
        .start("s")
        .declare("d", vec![arr.clone(), i.clone()])
        .assign("ai", set(&i, "1"))
        .assign(
            "aa",
            Expression::assignment(arr.indexed(vec![Element::var(&i)]), vec![Element::literal("5")]),
        )
        .end("e")
        .chain(&["s", "d", "ai", "aa", "e"])
        .build();

    assert_eq!(plain(&diagram), "i = 1\narr[i] = 5\n");

    let mut execution =
        Execution::new(&diagram.nodes, &diagram.edges, ExecutionConfig::default()).unwrap();
    execution.run(&mut ScriptedInput::new(Vec::<String>::new())).unwrap();
    let expected: Vec<Value> = [0, 5, 0, 0, 0].into_iter().map(Value::Integer).collect();
    assert_eq!(execution.bindings().value_of("arr"), Some(&Value::Array(expected)));
}

#[test]
fn self_looping_conditional_is_a_bare_while() {
    let x = int_var("x");
    let diagram = DiagramBuilder::new()
        .start("s")
        .conditional("c", compare(&x, Operator::Greater, "0"))
        .end("e")
        .edge("s", "c")
        .yes("c", "c")
        .no("c", "e")
        .build();

    assert_eq!(plain(&diagram), "while x > 0:\n  pass\n");
}

#[test]
fn loop_on_no_branch_is_negated() {
    let x = int_var("x");
    let diagram = DiagramBuilder::new()
        .start("s")
        .conditional("c", compare(&x, Operator::GreaterEqual, "10"))
        .assign("inc", increment(&x))
        .end("e")
        .edge("s", "c")
        .no("c", "inc")
        .edge("inc", "c")
        .yes("c", "e")
        .build();

    assert_eq!(plain(&diagram), "while not (x >= 10):\n  x = x + 1\n");
}

#[test]
fn nested_loops() {
    let i = int_var("i");
    let j = int_var("j");
    let diagram = DiagramBuilder::new()
        .start("s")
        .assign("ai", set(&i, "0"))
        .conditional("outer", compare(&i, Operator::Less, "3"))
        .assign("aj", set(&j, "0"))
        .conditional("inner", compare(&j, Operator::Less, "2"))
        .assign("incj", increment(&j))
        .assign("inci", increment(&i))
        .output("o", show(&i))
        .end("e")
        .chain(&["s", "ai", "outer"])
        .yes("outer", "aj")
        .edge("aj", "inner")
        .yes("inner", "incj")
        .edge("incj", "inner")
        .no("inner", "inci")
        .edge("inci", "outer")
        .no("outer", "o")
        .edge("o", "e")
        .build();

    assert_eq!(
        plain(&diagram),
        "i = 0\n\
         while i < 3:\n\
         \x20 j = 0\n\
         \x20 while j < 2:\n\
         \x20   j = j + 1\n\
         \x20 i = i + 1\n\
         print(i)\n"
    );
}

#[test]
fn early_exit_breaks_to_continuation() {
    let x = int_var("x");
    let diagram = DiagramBuilder::new()
        .start("s")
        .assign("ax", set(&x, "0"))
        .conditional("c", compare(&x, Operator::Less, "10"))
        .assign("inc", increment(&x))
        .conditional("hit", compare(&x, Operator::Equal, "5"))
        .output(
            "five",
            Expression::value(vec![Element::literal("\"five\"")]),
        )
        .output("o", show(&x))
        .end("e")
        .chain(&["s", "ax", "c"])
        .yes("c", "inc")
        .edge("inc", "hit")
        .yes("hit", "five")
        .no("hit", "c")
        .edge("five", "o")
        .no("c", "o")
        .edge("o", "e")
        .build();

    assert_eq!(
        plain(&diagram),
        "x = 0\n\
         while x < 10:\n\
         \x20 x = x + 1\n\
         \x20 if x == 5:\n\
         \x20   print(\"five\")\n\
         \x20   break\n\
         print(x)\n"
    );
}

#[test]
fn post_tested_loop() {
    let x = int_var("x");
    let diagram = DiagramBuilder::new()
        .start("s")
        .assign("a", increment(&x))
        .conditional("c", compare(&x, Operator::Less, "3"))
        .end("e")
        .chain(&["s", "a", "c"])
        .yes("c", "a")
        .no("c", "e")
        .build();

    assert_eq!(
        plain(&diagram),
        "while True:\n  x = x + 1\n  if not (x < 3):\n    break\n"
    );
}

#[test]
fn provenance_comments_name_the_node() {
    let x = int_var("x");
    let diagram = DiagramBuilder::new()
        .start("s")
        .node(FlowNode::new("a", NodeKind::AssignVariable { expression: set(&x, "1") }).with_label("Init x"))
        .end("e")
        .chain(&["s", "a", "e"])
        .build();

    let compilation = compile(&diagram.nodes, &diagram.edges);
    assert_eq!(compilation.text, "# [a] Init x\nx = 1\n");
    let provenance = compilation.program.statements[0].provenance.as_ref().unwrap();
    assert_eq!(provenance.node_id, "a");
    assert_eq!(provenance.label, "Init x");
}

#[test]
fn compile_never_fails() {
    let missing_start = DiagramBuilder::new().end("e").build();
    let compilation = compile(&missing_start.nodes, &missing_start.edges);
    assert_eq!(compilation.unsupported_count(), 1);
    assert!(compilation.text.starts_with("pass  # unsupported:"));

    let two_starts = DiagramBuilder::new().start("a").start("b").build();
    let compilation = compile(&two_starts.nodes, &two_starts.edges);
    assert!(matches!(
        compilation.program.statements[0].kind,
        StatementKind::Unsupported { .. }
    ));
}

#[test]
fn bad_condition_is_localized() {
    let x = int_var("x");
    let broken = Expression::condition(
        vec![Element::var(&x)],
        Operator::Plus,
        vec![Element::literal("1")],
    );
    let diagram = DiagramBuilder::new()
        .start("s")
        .assign("a", set(&x, "1"))
        .conditional("c", broken)
        .end("e")
        .edge("s", "a")
        .edge("a", "c")
        .yes("c", "e")
        .no("c", "e")
        .build();

    let compilation = compile(&diagram.nodes, &diagram.edges);
    assert_eq!(compilation.program.statements.len(), 2);
    assert!(matches!(
        compilation.program.statements[0].kind,
        StatementKind::Assignment { .. }
    ));
    assert_eq!(compilation.unsupported_count(), 1);
}

#[test]
fn unknown_kinds_from_json_are_unsupported() {
    let json = r#"{
        "nodes": [
            { "id": "s", "kind": "start" },
            { "id": "u", "kind": "teleport" },
            { "id": "e", "kind": "end" }
        ],
        "edges": [
            { "source": "s", "target": "u" },
            { "source": "u", "target": "e" }
        ]
    }"#;
    let diagram = Diagram::from_json(json).unwrap();
    assert_eq!(diagram.nodes[1].kind, NodeKind::Unknown);

    let text = plain(&diagram);
    assert_eq!(text, "pass  # unsupported: unknown node kind\n");
}

#[test]
fn compile_is_deterministic_across_json_round_trip() {
    let x = int_var("x");
    let diagram = DiagramBuilder::new()
        .start("s")
        .assign("a", set(&x, "4"))
        .conditional("c", compare(&x, Operator::Greater, "2"))
        .output("big", Expression::value(vec![Element::literal("\"big\"")]))
        .output("small", Expression::value(vec![Element::literal("\"small\"")]))
        .end("e")
        .chain(&["s", "a", "c"])
        .yes("c", "big")
        .no("c", "small")
        .edge("big", "e")
        .edge("small", "e")
        .build();

    let reloaded = Diagram::from_json(&diagram.to_json().unwrap()).unwrap();
    assert_eq!(reloaded, diagram);

    let first = compile(&diagram.nodes, &diagram.edges);
    let second = compile(&reloaded.nodes, &reloaded.edges);
    assert_eq!(first, second);
    assert_eq!(
        plain(&diagram),
        "x = 4\nif x > 2:\n  print(\"big\")\nelse:\n  print(\"small\")\n"
    );
}

#[test]
fn header_with_both_branches_in_loop_is_while_true() {
    let k = int_var("k");
    let diagram = DiagramBuilder::new()
        .start("s")
        .assign("a", set(&k, "0"))
        .conditional("h", compare(&k, Operator::Less, "3"))
        .assign("inc", increment(&k))
        .assign(
            "dbl",
            Expression::assignment(
                k.clone(),
                vec![Element::var(&k), Element::op(Operator::Plus), Element::literal("10")],
            ),
        )
        .conditional("t", compare(&k, Operator::Greater, "20"))
        .output("o", show(&k))
        .end("e")
        .chain(&["s", "a", "h"])
        .yes("h", "inc")
        .edge("inc", "h")
        .no("h", "dbl")
        .edge("dbl", "t")
        .yes("t", "o")
        .no("t", "h")
        .edge("o", "e")
        .build();

    assert_eq!(
        plain(&diagram),
        "k = 0\n\
         while True:\n\
         \x20 if k < 3:\n\
         \x20   k = k + 1\n\
         \x20 else:\n\
         \x20   k = k + 10\n\
         \x20   if k > 20:\n\
         \x20     break\n\
         print(k)\n"
    );

    let mut execution =
        Execution::new(&diagram.nodes, &diagram.edges, ExecutionConfig::default()).unwrap();
    execution.run(&mut ScriptedInput::new(Vec::<String>::new())).unwrap();
    assert_eq!(execution.outputs(), &["23"]);
}

/// Outer `i < 3` loop around an inner `j < 3` loop whose `j == 1` branch goes to `target`,
/// either `pi` (print i, then End) or `bump` (i = i + 10, then the outer test).
fn nested_exit(target: &str) -> Diagram {
    let i = int_var("i");
    let j = int_var("j");
    DiagramBuilder::new()
        .start("s")
        .assign("ai", set(&i, "0"))
        .conditional("outer", compare(&i, Operator::Less, "3"))
        .assign("aj", set(&j, "0"))
        .conditional("inner", compare(&j, Operator::Less, "3"))
        .conditional("hit", compare(&j, Operator::Equal, "1"))
        .assign("incj", increment(&j))
        .assign("inci", increment(&i))
        .output("pi", show(&i))
        .assign(
            "bump",
            Expression::assignment(
                i.clone(),
                vec![Element::var(&i), Element::op(Operator::Plus), Element::literal("10")],
            ),
        )
        .end("e")
        .chain(&["s", "ai", "outer"])
        .yes("outer", "aj")
        .edge("aj", "inner")
        .yes("inner", "hit")
        .no("inner", "inci")
        .edge("inci", "outer")
        .yes("hit", target)
        .no("hit", "incj")
        .edge("incj", "inner")
        .no("outer", "e")
        .edge("pi", "e")
        .edge("bump", "outer")
        .build()
}

#[test]
fn exit_through_two_loops_is_unsupported() {
    let diagram = nested_exit("pi");
    let text = plain(&diagram);
    assert_eq!(
        text,
        "i = 0\n\
         while i < 3:\n\
         \x20 j = 0\n\
         \x20 while j < 3:\n\
         \x20   if j == 1:\n\
         \x20     pass  # unsupported: exit crosses nested loops\n\
         \x20   else:\n\
         \x20     j = j + 1\n\
         \x20 i = i + 1\n"
    );
    assert!(!text.contains("break"));
    assert_eq!(compile(&diagram.nodes, &diagram.edges).unsupported_count(), 1);
}

#[test]
fn exit_to_outer_header_is_unsupported() {
    let text = plain(&nested_exit("bump"));
    assert_eq!(
        text,
        "i = 0\n\
         while i < 3:\n\
         \x20 j = 0\n\
         \x20 while j < 3:\n\
         \x20   if j == 1:\n\
         \x20     i = i + 10\n\
         \x20     pass  # unsupported: exit crosses nested loops\n\
         \x20   else:\n\
         \x20     j = j + 1\n\
         \x20 i = i + 1\n"
    );
    assert!(!text.contains("break"));
}

#[test]
fn program_end_inside_loop_with_code_after_is_unsupported() {
    let x = int_var("x");
    let diagram = DiagramBuilder::new()
        .start("s")
        .assign("ax", set(&x, "0"))
        .conditional("c", compare(&x, Operator::Less, "10"))
        .assign("inc", increment(&x))
        .conditional("hit", compare(&x, Operator::Equal, "5"))
        .output("five", Expression::value(vec![Element::literal("\"five\"")]))
        .output("o", show(&x))
        .end("e")
        .chain(&["s", "ax", "c"])
        .yes("c", "inc")
        .edge("inc", "hit")
        .yes("hit", "five")
        .no("hit", "c")
        .edge("five", "e")
        .no("c", "o")
        .edge("o", "e")
        .build();

    assert_eq!(
        plain(&diagram),
        "x = 0\n\
         while x < 10:\n\
         \x20 x = x + 1\n\
         \x20 if x == 5:\n\
         \x20   print(\"five\")\n\
         \x20   pass  # unsupported: program ends inside loop\n\
         print(x)\n"
    );
}

#[test]
fn program_end_inside_final_loop_breaks() {
    // Two exits to different outputs, and nothing follows the loop.
    let x = int_var("x");
    let diagram = DiagramBuilder::new()
        .start("s")
        .assign("ax", set(&x, "0"))
        .conditional("h", compare(&x, Operator::Less, "3"))
        .assign("inc", increment(&x))
        .assign(
            "dbl",
            Expression::assignment(
                x.clone(),
                vec![Element::var(&x), Element::op(Operator::Plus), Element::literal("10")],
            ),
        )
        .conditional("big", compare(&x, Operator::Greater, "20"))
        .conditional("lucky", compare(&x, Operator::Equal, "13"))
        .output("a", Expression::value(vec![Element::literal("\"a\"")]))
        .output("b", Expression::value(vec![Element::literal("\"b\"")]))
        .end("e")
        .chain(&["s", "ax", "h"])
        .yes("h", "inc")
        .edge("inc", "h")
        .no("h", "dbl")
        .edge("dbl", "big")
        .yes("big", "a")
        .no("big", "lucky")
        .yes("lucky", "b")
        .no("lucky", "h")
        .edge("a", "e")
        .edge("b", "e")
        .build();

    assert_eq!(
        plain(&diagram),
        "x = 0\n\
         while True:\n\
         \x20 if x < 3:\n\
         \x20   x = x + 1\n\
         \x20 else:\n\
         \x20   x = x + 10\n\
         \x20   if x > 20:\n\
         \x20     print(\"a\")\n\
         \x20     break\n\
         \x20   else:\n\
         \x20     if x == 13:\n\
         \x20       print(\"b\")\n\
         \x20       break\n"
    );
}
