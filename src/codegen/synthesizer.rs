//! Structured control-flow recovery.
//!
//! The synthesizer walks the CFG from the entry and rebuilds `if`/`while`/`break` structure
//! from dominance and loop information. Each branch receives its own copy of the visited set;
//! copies are unioned when branches reconverge. Pending merge points travel down as stop nodes
//! so a branch walk ends where its sibling will pick up.

use crate::{
    analysis::{FlowCfg, LoopForest, LoopRegion},
    codegen::{
        ast::{Expr, Statement, StatementKind},
        lower,
    },
    expression::Expression,
    flowchart::{BranchLabel, FlowNode, NodeKind},
    utils::{
        graph::{algorithms::bfs_distances, NodeId},
        BitSet,
    },
};

/// The loop currently being lowered.
#[derive(Debug, Clone)]
struct Frame {
    header: NodeId,
    /// Node control reaches after the loop, if known.
    continuation: Option<NodeId>,
    /// Conditional latch closing a post-tested loop.
    exit_latch: Option<(NodeId, BranchLabel)>,
    /// Nothing runs after the loop, so an exit into `End` may simply break.
    ends_program: bool,
}

/// A path leaving a loop, walked in the enclosing scope.
#[derive(Debug, Clone, Copy)]
struct Exit {
    /// Where the `break` lands.
    continuation: Option<NodeId>,
    /// Frames and stops of the enclosing scope when the exit started. Anything added later
    /// belongs to constructs lowered on the exit path itself.
    frames: usize,
    stops: usize,
    ends_program: bool,
}

#[derive(Debug, Clone, Default)]
struct Scope {
    frames: Vec<Frame>,
    stops: Vec<NodeId>,
    exit: Option<Exit>,
    /// Falling off the end of this walk ends the program.
    tail: bool,
}

impl Scope {
    fn frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    fn with_stop(&self, stop: NodeId) -> Self {
        let mut scope = self.clone();
        scope.stops.push(stop);
        scope.tail = false;
        scope
    }

    fn with_frame(&self, frame: Frame) -> Self {
        let mut scope = self.clone();
        scope.frames.push(frame);
        scope.tail = false;
        scope
    }

    /// Scope for a path leaving the innermost loop.
    fn exiting(&self) -> Option<Self> {
        let mut scope = self.clone();
        let frame = scope.frames.pop()?;
        scope.exit = Some(Exit {
            continuation: frame.continuation,
            frames: scope.frames.len(),
            stops: scope.stops.len(),
            ends_program: frame.ends_program,
        });
        scope.tail = false;
        Some(scope)
    }

    /// The exit being walked, unless a loop lowered on the exit path is innermost.
    fn active_exit(&self) -> Option<Exit> {
        self.exit.filter(|exit| exit.frames == self.frames.len())
    }

    fn frame_for(&self, header: NodeId, continuation: Option<NodeId>) -> Frame {
        Frame {
            header,
            continuation,
            exit_latch: None,
            ends_program: continuation.is_none() && self.tail,
        }
    }
}

/// Statements of one walk together with the nodes it lowered.
struct Block {
    statements: Vec<Statement>,
    visited: BitSet,
}

/// Rebuilds structured statements from a [`FlowCfg`].
pub(crate) struct Synthesizer<'a> {
    cfg: &'a FlowCfg,
    loops: &'a LoopForest,
    max_depth: usize,
}

impl<'a> Synthesizer<'a> {
    pub(crate) fn new(cfg: &'a FlowCfg, max_depth: usize) -> Self {
        Synthesizer {
            cfg,
            loops: cfg.loops(),
            max_depth,
        }
    }

    /// Lowers the whole graph starting at the entry.
    pub(crate) fn synthesize(&self) -> Vec<Statement> {
        let visited = BitSet::new(self.cfg.node_count());
        let scope = Scope {
            tail: true,
            ..Scope::default()
        };
        self.walk(Some(self.cfg.entry()), &scope, visited, 0)
            .statements
    }

    fn flow_node(&self, node: NodeId) -> Option<&'a FlowNode> {
        self.cfg.node(node)
    }

    fn region(&self, header: NodeId) -> Option<&'a LoopRegion> {
        self.loops.loop_for_header(header)
    }

    fn in_region(&self, scope: &Scope, node: NodeId) -> bool {
        scope
            .frame()
            .and_then(|frame| self.region(frame.header))
            .map_or(true, |region| region.contains(node))
    }

    fn unsupported(node: &FlowNode, reason: impl Into<String>) -> Statement {
        Statement::unsupported(reason).from_node(node)
    }

    fn crossing(&self, node: NodeId) -> Statement {
        match self.flow_node(node) {
            Some(flow) => Self::unsupported(flow, "exit crosses nested loops"),
            None => Statement::unsupported("exit crosses nested loops"),
        }
    }

    /// Closes an exit path that terminates the program.
    fn program_end(flow: &FlowNode, exit: Exit) -> Statement {
        if exit.ends_program {
            Statement::new(StatementKind::Break)
        } else {
            Self::unsupported(flow, "program ends inside loop")
        }
    }

    fn walk(&self, start: Option<NodeId>, scope: &Scope, mut visited: BitSet, depth: usize) -> Block {
        let mut statements = Vec::new();
        let mut current = start;
        let exit = scope.active_exit();

        while let Some(node) = current {
            let stop = scope.stops.iter().rposition(|&s| s == node);
            if let Some(exit) = exit {
                if stop.is_some_and(|i| i >= exit.stops) {
                    break;
                }
                if Some(node) == exit.continuation {
                    statements.push(Statement::new(StatementKind::Break));
                    break;
                }
                if stop.is_some() {
                    statements.push(self.crossing(node));
                    break;
                }
            } else if stop.is_some() {
                break;
            }
            if let Some(frame) = scope.frame() {
                let leaves = node == frame.header || !self.in_region(scope, node);
                if leaves && exit.is_some() {
                    log::warn!("loop exit reaching node {node} crosses an enclosing loop");
                    statements.push(self.crossing(node));
                    break;
                }
                if node == frame.header {
                    break;
                }
                if leaves {
                    statements.extend(self.exit_loop(node, scope, visited.clone(), depth));
                    break;
                }
            }

            let Some(flow) = self.flow_node(node) else {
                break;
            };
            if visited.contains(node.index()) {
                log::warn!("irreducible flow: node '{}' reached twice on one path", flow.id);
                statements.push(Self::unsupported(flow, "irreducible control flow"));
                break;
            }
            if depth > self.max_depth {
                statements.push(Self::unsupported(flow, "nesting limit exceeded"));
                break;
            }

            if self.loops.is_header(node) {
                let (stmt, next, after) = self.lower_loop(node, scope, visited, depth);
                statements.push(stmt);
                visited = after;
                current = next;
                continue;
            }

            visited.insert(node.index());
            let next = match &flow.kind {
                NodeKind::Start | NodeKind::DeclareVariable { .. } => self.cfg.next(node),
                NodeKind::End => {
                    if let Some(exit) = exit {
                        statements.push(Self::program_end(flow, exit));
                    }
                    break;
                }
                NodeKind::AssignVariable { .. } | NodeKind::Input { .. } | NodeKind::Output { .. } => {
                    statements.extend(self.straight_line(flow));
                    self.cfg.next(node)
                }
                NodeKind::Unknown => {
                    statements.push(Self::unsupported(flow, "unknown node kind"));
                    self.cfg.next(node)
                }
                NodeKind::Conditional { expression } => {
                    let latch = scope.frame().and_then(|frame| frame.exit_latch);
                    let latch = latch.filter(|(latch, _)| exit.is_none() && *latch == node);
                    if let Some((_, exits_on)) = latch {
                        statements.push(Self::exit_test(flow, expression, exits_on));
                        break;
                    }
                    let (stmt, next, after) = self.lower_branch(node, scope, visited, depth);
                    statements.extend(stmt);
                    visited = after;
                    current = next;
                    continue;
                }
            };

            // A dead end terminates the program just like `End`.
            if next.is_none() {
                if let Some(exit) = exit {
                    statements.push(Self::program_end(flow, exit));
                }
            }
            current = next;
        }

        Block {
            statements,
            visited,
        }
    }

    /// Lowers a straight-line node to its statement, or nothing for declarations.
    fn straight_line(&self, flow: &FlowNode) -> Option<Statement> {
        let lowered = match &flow.kind {
            NodeKind::AssignVariable { expression } => lower::assignment(expression, flow),
            NodeKind::Input { variable } => lower::input(variable, flow),
            NodeKind::Output { expression } => lower::output(expression, flow),
            NodeKind::Unknown => return Some(Self::unsupported(flow, "unknown node kind")),
            _ => return None,
        };
        Some(lowered.unwrap_or_else(|err| Self::unsupported(flow, err.to_string())))
    }

    /// `if exit-test: break` closing a post-tested loop.
    fn exit_test(
        flow: &FlowNode,
        expression: &Expression,
        exits_on: BranchLabel,
    ) -> Statement {
        match lower::condition(expression, flow) {
            Ok(test) => {
                let test = match exits_on {
                    BranchLabel::Yes => test,
                    BranchLabel::No => test.negated(),
                };
                Statement::new(StatementKind::If {
                    test,
                    then: vec![Statement::new(StatementKind::Break)],
                    otherwise: Vec::new(),
                })
                .from_node(flow)
            }
            Err(err) => Self::unsupported(flow, err.to_string()),
        }
    }

    /// Statements for a path leaving the innermost loop at `node`.
    ///
    /// The path ends in `break` once it reaches the loop continuation. Paths that would have
    /// to leave an enclosing loop too, or that end the program while code follows the loop,
    /// end in an unsupported marker instead.
    fn exit_loop(&self, node: NodeId, scope: &Scope, visited: BitSet, depth: usize) -> Vec<Statement> {
        match scope.exiting() {
            Some(outer) => self.walk(Some(node), &outer, visited, depth + 1).statements,
            None => Vec::new(),
        }
    }

    fn is_simple_arm(&self, scope: &Scope, visited: &BitSet, node: NodeId) -> bool {
        self.flow_node(node)
            .is_some_and(|flow| flow.kind.is_straight_line())
            && !visited.contains(node.index())
            && !scope.stops.contains(&node)
            && !self.loops.is_header(node)
            && self.in_region(scope, node)
            && scope.frame().map_or(true, |frame| frame.header != node)
    }

    /// Lowers a non-looping conditional. Returns the statement, where to continue and the
    /// updated visited set.
    fn lower_branch(
        &self,
        node: NodeId,
        scope: &Scope,
        visited: BitSet,
        depth: usize,
    ) -> (Option<Statement>, Option<NodeId>, BitSet) {
        let Some(flow) = self.flow_node(node) else {
            return (None, None, visited);
        };
        let NodeKind::Conditional { expression } = &flow.kind else {
            return (None, self.cfg.next(node), visited);
        };
        let test = match lower::condition(expression, flow) {
            Ok(test) => test,
            Err(err) => return (Some(Self::unsupported(flow, err.to_string())), None, visited),
        };

        let yes = self.cfg.branch_target(node, BranchLabel::Yes);
        let no = self.cfg.branch_target(node, BranchLabel::No);

        // Both arms are single statements joining at the same node.
        if let (Some(y), Some(n)) = (yes, no) {
            let shared = self.cfg.next(y);
            let arms = self.flow_node(y).zip(self.flow_node(n));
            if let Some((yes_flow, no_flow)) = arms.filter(|_| {
                y != n
                    && shared.is_some()
                    && shared == self.cfg.next(n)
                    && self.is_simple_arm(scope, &visited, y)
                    && self.is_simple_arm(scope, &visited, n)
            }) {
                let mut visited = visited;
                visited.insert(y.index());
                visited.insert(n.index());
                let then: Vec<Statement> = self.straight_line(yes_flow).into_iter().collect();
                let otherwise: Vec<Statement> = self.straight_line(no_flow).into_iter().collect();
                log::trace!("simple merge at '{}'", flow.id);
                return (Some(Self::if_statement(flow, test, then, otherwise)), shared, visited);
            }
        }

        let merge = match (yes, no) {
            (Some(y), Some(n)) => self.merge_point(node, y, n, scope, &visited),
            _ => None,
        };
        let branch_scope = match merge {
            Some(m) => scope.with_stop(m),
            None => scope.clone(),
        };

        let then = self.walk(yes, &branch_scope, visited.clone(), depth + 1);
        let otherwise = self.walk(no, &branch_scope, visited.clone(), depth + 1);

        let mut joined = visited;
        joined.union_with(&then.visited);
        joined.union_with(&otherwise.visited);

        let stmt = Self::if_statement(flow, test, then.statements, otherwise.statements);
        (Some(stmt), merge, joined)
    }

    fn if_statement(
        flow: &FlowNode,
        test: Expr,
        then: Vec<Statement>,
        otherwise: Vec<Statement>,
    ) -> Statement {
        let kind = if then.is_empty() && !otherwise.is_empty() {
            StatementKind::If {
                test: test.negated(),
                then: otherwise,
                otherwise: Vec::new(),
            }
        } else {
            StatementKind::If {
                test,
                then,
                otherwise,
            }
        };
        Statement::new(kind).from_node(flow)
    }

    /// Nearest node reachable from both arms that every path from `cond` passes through,
    /// without leaving the current region.
    fn merge_point(
        &self,
        cond: NodeId,
        yes: NodeId,
        no: NodeId,
        scope: &Scope,
        visited: &BitSet,
    ) -> Option<NodeId> {
        if yes == no {
            return Some(yes);
        }

        let header = scope.frame().map(|frame| frame.header);
        let allow = |node: NodeId| {
            node != cond
                && Some(node) != header
                && self.in_region(scope, node)
                && !scope.stops.contains(&node)
                && !visited.contains(node.index())
        };

        let from_yes = bfs_distances(self.cfg, yes, &allow);
        let from_no = bfs_distances(self.cfg, no, &allow);

        let mut distance_no = vec![None; self.cfg.node_count()];
        for &(node, distance) in &from_no {
            distance_no[node.index()] = Some(distance);
        }

        let mut candidates: Vec<(usize, NodeId)> = from_yes
            .iter()
            .filter(|(node, _)| allow(*node))
            .filter_map(|&(node, dy)| distance_no[node.index()].map(|dn| (dy.max(dn), node)))
            .collect();
        candidates.sort();

        candidates
            .into_iter()
            .map(|(_, node)| node)
            .find(|&candidate| self.post_dominates(candidate, cond, scope))
    }

    /// Returns `true` if every path from `cond` inside the region reaches `candidate` before
    /// leaving the region or ending.
    fn post_dominates(&self, candidate: NodeId, cond: NodeId, scope: &Scope) -> bool {
        let header = scope.frame().map(|frame| frame.header);
        let mut seen = BitSet::new(self.cfg.node_count());
        seen.insert(cond.index());
        let mut stack: Vec<NodeId> = self.cfg.successors(cond).collect();

        while let Some(node) = stack.pop() {
            if node == candidate || !seen.insert(node.index()) {
                continue;
            }
            let sink = Some(node) == header
                || !self.in_region(scope, node)
                || scope.stops.contains(&node)
                || self.cfg.successors(node).next().is_none();
            if sink {
                return false;
            }
            stack.extend(self.cfg.successors(node));
        }
        true
    }

    /// Lowers the loop headed by `header`. Returns the `while` statement, the continuation
    /// and the updated visited set.
    fn lower_loop(
        &self,
        header: NodeId,
        scope: &Scope,
        mut visited: BitSet,
        depth: usize,
    ) -> (Statement, Option<NodeId>, BitSet) {
        let (Some(flow), Some(region)) = (self.flow_node(header), self.region(header)) else {
            return (Statement::unsupported("missing loop region"), None, visited);
        };
        visited.insert(header.index());

        if let NodeKind::Conditional { expression } = &flow.kind {
            let test = match lower::condition(expression, flow) {
                Ok(test) => test,
                Err(err) => return (Self::unsupported(flow, err.to_string()), None, visited),
            };
            let yes = self.cfg.branch_target(header, BranchLabel::Yes);
            let no = self.cfg.branch_target(header, BranchLabel::No);
            let yes_in = yes.is_some_and(|t| region.contains(t));
            let no_in = no.is_some_and(|t| region.contains(t));

            let (test, body_start, continuation) = match (yes_in, no_in) {
                (true, false) => (test, yes, no),
                (false, true) => (test.negated(), no, yes),
                _ => {
                    log::debug!("loop at '{}': both branches stay in the loop", flow.id);
                    let continuation = region.unique_exit_target();
                    let inner = scope.with_frame(scope.frame_for(header, continuation));
                    let then = self.walk(yes, &inner, visited.clone(), depth + 1);
                    let otherwise = self.walk(no, &inner, visited.clone(), depth + 1);
                    visited.union_with(&then.visited);
                    visited.union_with(&otherwise.visited);
                    let body = vec![Self::if_statement(
                        flow,
                        test,
                        then.statements,
                        otherwise.statements,
                    )];
                    return (self.while_true(flow, body), continuation, visited);
                }
            };

            log::debug!("loop at '{}': pre-tested", flow.id);
            let inner = scope.with_frame(scope.frame_for(header, continuation));
            let body = self.walk(body_start, &inner, visited.clone(), depth + 1);
            visited.union_with(&body.visited);
            let stmt = Statement::new(StatementKind::While {
                test,
                body: body.statements,
            })
            .from_node(flow);
            return (stmt, continuation, visited);
        }

        let (exit_latch, continuation) = self.post_test(region);
        if exit_latch.is_none() && region.latches.len() > 1 {
            log::warn!(
                "loop at '{}' has {} back edges, lowering as an infinite loop with breaks",
                flow.id,
                region.latches.len()
            );
        } else {
            log::debug!("loop at '{}': post-tested", flow.id);
        }

        let inner = scope.with_frame(Frame {
            exit_latch,
            ..scope.frame_for(header, continuation)
        });
        let mut body: Vec<Statement> = self.straight_line(flow).into_iter().collect();
        if !matches!(flow.kind, NodeKind::End) {
            let rest = self.walk(self.cfg.next(header), &inner, visited.clone(), depth + 1);
            visited.union_with(&rest.visited);
            body.extend(rest.statements);
        }
        (self.while_true(flow, body), continuation, visited)
    }

    /// Finds the conditional latch of a post-tested loop and the exit it takes.
    fn post_test(&self, region: &LoopRegion) -> (Option<(NodeId, BranchLabel)>, Option<NodeId>) {
        let fallback = (None, region.unique_exit_target());
        let Some(latch) = region.single_latch() else {
            return fallback;
        };
        let is_conditional = self
            .flow_node(latch)
            .is_some_and(|flow| matches!(flow.kind, NodeKind::Conditional { .. }));
        if latch == region.header || !is_conditional {
            return fallback;
        }

        let yes = self.cfg.branch_target(latch, BranchLabel::Yes);
        let no = self.cfg.branch_target(latch, BranchLabel::No);
        let header = Some(region.header);
        match (yes, no) {
            (Some(_), Some(n)) if yes == header && !region.contains(n) => {
                (Some((latch, BranchLabel::No)), Some(n))
            }
            (Some(y), Some(_)) if no == header && !region.contains(y) => {
                (Some((latch, BranchLabel::Yes)), Some(y))
            }
            _ => fallback,
        }
    }

    fn while_true(&self, flow: &FlowNode, body: Vec<Statement>) -> Statement {
        Statement::new(StatementKind::While {
            test: Expr::literal(true).from_node(flow),
            body,
        })
        .from_node(flow)
    }
}
