//! Diagram factories.
//!
//! Each factory documents the flow it builds. Node ids are short and stable because tests
//! refer to them directly.

use crate::{
    expression::{Element, Expression, Operator, Variable, VariableType},
    flowchart::{Diagram, DiagramBuilder},
};

pub(crate) fn int_var(name: &str) -> Variable {
    Variable::scalar(name, name, VariableType::Integer)
}

pub(crate) fn int_array(name: &str, size: usize) -> Variable {
    Variable::array(name, name, VariableType::Integer, size)
}

/// `name = value` with `value` given as literal text.
pub(crate) fn set(variable: &Variable, value: &str) -> Expression {
    Expression::assignment(variable.clone(), vec![Element::literal(value)])
}

/// `name = name op value`.
pub(crate) fn update(variable: &Variable, op: Operator, value: &str) -> Expression {
    Expression::assignment(
        variable.clone(),
        vec![Element::var(variable), Element::op(op), Element::literal(value)],
    )
}

/// `variable op value` as a condition.
pub(crate) fn compare(variable: &Variable, op: Operator, value: &str) -> Expression {
    Expression::condition(vec![Element::var(variable)], op, vec![Element::literal(value)])
}

pub(crate) fn print_var(variable: &Variable) -> Expression {
    Expression::value(vec![Element::var(variable)])
}

pub(crate) fn print_text(text: &str) -> Expression {
    Expression::value(vec![Element::literal(format!("\"{text}\""))])
}

/// `s -> d(declare x) -> a(x = 1) -> o(print x) -> e`
pub(crate) fn linear_diagram() -> Diagram {
    let x = int_var("x");
    DiagramBuilder::new()
        .start("s")
        .declare("d", vec![x.clone()])
        .assign("a", set(&x, "1"))
        .output("o", print_var(&x))
        .end("e")
        .chain(&["s", "d", "a", "o", "e"])
        .build()
}

/// `x = 3; while x > 0: x = x - 1; print(x)`
///
/// The conditional `c` is labeled `x > 0`.
pub(crate) fn while_diagram() -> Diagram {
    let x = int_var("x");
    let mut diagram = DiagramBuilder::new()
        .start("s")
        .declare("d", vec![x.clone()])
        .assign("a", set(&x, "3"))
        .conditional("c", compare(&x, Operator::Greater, "0"))
        .assign("b", update(&x, Operator::Minus, "1"))
        .output("o", print_var(&x))
        .end("e")
        .chain(&["s", "d", "a", "c"])
        .yes("c", "b")
        .edge("b", "c")
        .no("c", "o")
        .edge("o", "e")
        .build();
    diagram.nodes[3].label = Some("x > 0".to_string());
    diagram
}

/// `c(x > 0)` looping to itself on "yes", ending on "no".
pub(crate) fn self_loop_diagram() -> Diagram {
    let x = int_var("x");
    DiagramBuilder::new()
        .start("s")
        .conditional("c", compare(&x, Operator::Greater, "0"))
        .end("e")
        .edge("s", "c")
        .yes("c", "c")
        .no("c", "e")
        .build()
}

/// `c(x > 0)` printing "pos" or "neg", both joining at `e`.
pub(crate) fn if_else_diagram() -> Diagram {
    let x = int_var("x");
    DiagramBuilder::new()
        .start("s")
        .conditional("c", compare(&x, Operator::Greater, "0"))
        .output("pos", print_text("pos"))
        .output("neg", print_text("neg"))
        .end("e")
        .edge("s", "c")
        .yes("c", "pos")
        .no("c", "neg")
        .edge("pos", "e")
        .edge("neg", "e")
        .build()
}

/// `c(x > 0)` with a two-node "yes" arm `a1, a2`; both arms meet at `o(print x)`.
pub(crate) fn nested_if_diagram() -> Diagram {
    let x = int_var("x");
    DiagramBuilder::new()
        .start("s")
        .conditional("c", compare(&x, Operator::Greater, "0"))
        .assign("a1", set(&x, "1"))
        .assign("a2", set(&x, "2"))
        .output("o", print_var(&x))
        .end("e")
        .edge("s", "c")
        .yes("c", "a1")
        .chain(&["a1", "a2", "o", "e"])
        .no("c", "o")
        .build()
}

/// `a(x = x + 1) -> c(x < 3)`, looping to `a` on "yes", then `o(print x)`.
pub(crate) fn do_while_diagram() -> Diagram {
    let x = int_var("x");
    DiagramBuilder::new()
        .start("s")
        .assign("a", update(&x, Operator::Plus, "1"))
        .conditional("c", compare(&x, Operator::Less, "3"))
        .output("o", print_var(&x))
        .end("e")
        .chain(&["s", "a", "c"])
        .yes("c", "a")
        .no("c", "o")
        .edge("o", "e")
        .build()
}

/// `arr: integer[5]`, `i = 1`, `arr[i] = 5`.
pub(crate) fn array_diagram() -> Diagram {
    let arr = int_array("arr", 5);
    let i = int_var("i");
    DiagramBuilder::new()
        .start("s")
        .declare("d", vec![arr.clone(), i.clone()])
        .assign("ai", set(&i, "1"))
        .assign(
            "aa",
            Expression::assignment(arr.indexed(vec![Element::var(&i)]), vec![Element::literal("5")]),
        )
        .end("e")
        .chain(&["s", "d", "ai", "aa", "e"])
        .build()
}

/// Both branches of the header stay in the loop:
///
/// `h(k < 3)` yes -> `inc(k = k + 1)` -> `h`; no -> `dbl(k = k + 10)` -> `t(k > 20)`,
/// `t` yes -> `o(print k)` -> `e`, no -> `h`.
pub(crate) fn two_sided_loop_diagram() -> Diagram {
    let k = int_var("k");
    DiagramBuilder::new()
        .start("s")
        .assign("a", set(&k, "0"))
        .conditional("h", compare(&k, Operator::Less, "3"))
        .assign("inc", update(&k, Operator::Plus, "1"))
        .assign("dbl", update(&k, Operator::Plus, "10"))
        .conditional("t", compare(&k, Operator::Greater, "20"))
        .output("o", print_var(&k))
        .end("e")
        .chain(&["s", "a", "h"])
        .yes("h", "inc")
        .edge("inc", "h")
        .no("h", "dbl")
        .edge("dbl", "t")
        .yes("t", "o")
        .no("t", "h")
        .edge("o", "e")
        .build()
}

/// Two nested counting loops where `hit(j == 1)` inside the inner loop jumps to `target`.
///
/// `outer(i < 3)` yes -> `aj(j = 0)` -> `inner(j < 3)`; `inner` yes -> `hit`, no ->
/// `inci(i = i + 1)` -> `outer`; `hit` no -> `incj(j = j + 1)` -> `inner`; `outer` no -> `e`.
/// `target` is `pi(print i) -> e` or `bump(i = i + 10) -> outer`.
pub(crate) fn nested_exit_diagram(target: &str) -> Diagram {
    let i = int_var("i");
    let j = int_var("j");
    DiagramBuilder::new()
        .start("s")
        .assign("ai", set(&i, "0"))
        .conditional("outer", compare(&i, Operator::Less, "3"))
        .assign("aj", set(&j, "0"))
        .conditional("inner", compare(&j, Operator::Less, "3"))
        .conditional("hit", compare(&j, Operator::Equal, "1"))
        .assign("incj", update(&j, Operator::Plus, "1"))
        .assign("inci", update(&i, Operator::Plus, "1"))
        .output("pi", print_var(&i))
        .assign("bump", update(&i, Operator::Plus, "10"))
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
