use std::path::Path;

use anyhow::bail;
use flowscope::{
    analysis::{CfgEdgeKind, FlowCfg},
    utils::graph::NodeId,
};
use serde::Serialize;

use crate::{
    commands::common::{diagram_name, load_diagram},
    output::{Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct SuccessorOutput {
    node: String,
    edge_type: String,
}

#[derive(Debug, Serialize)]
struct NodeOutput {
    id: String,
    kind: String,
    label: String,
    successors: Vec<SuccessorOutput>,
}

#[derive(Debug, Serialize)]
struct LoopOutput {
    header: String,
    loop_type: String,
    depth: usize,
    body: Vec<String>,
    exits: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CfgOutput {
    diagram: String,
    node_count: usize,
    entry: String,
    exits: Vec<String>,
    nodes: Vec<NodeOutput>,
    loops: Option<Vec<LoopOutput>>,
}

fn edge_kind_label(kind: CfgEdgeKind) -> &'static str {
    match kind {
        CfgEdgeKind::Unconditional => "next",
        CfgEdgeKind::Yes => "yes",
        CfgEdgeKind::No => "no",
    }
}

pub fn run(path: &Path, format: &str, show_loops: bool) -> anyhow::Result<()> {
    let diagram = load_diagram(path)?;
    let name = diagram_name(path);
    let cfg = FlowCfg::build(&diagram.nodes, &diagram.edges)?;

    let id_of = |node: NodeId| cfg.node(node).map_or_else(String::new, |n| n.id.clone());

    match format {
        "json" => {
            let nodes = cfg
                .reverse_postorder()
                .into_iter()
                .filter_map(|node| {
                    let flow = cfg.node(node)?;
                    Some(NodeOutput {
                        id: flow.id.clone(),
                        kind: flow.kind.name().to_string(),
                        label: flow.display_label().to_string(),
                        successors: cfg
                            .outgoing_edges(node)
                            .map(|(_, target, kind)| SuccessorOutput {
                                node: id_of(target),
                                edge_type: edge_kind_label(kind).to_string(),
                            })
                            .collect(),
                    })
                })
                .collect();

            let loops = show_loops.then(|| {
                cfg.loops()
                    .iter()
                    .map(|region| LoopOutput {
                        header: id_of(region.header),
                        loop_type: format!("{:?}", region.loop_type),
                        depth: region.depth,
                        body: region.body.iter().map(|&n| id_of(n)).collect(),
                        exits: region.exits.iter().map(|e| id_of(e.target)).collect(),
                    })
                    .collect()
            });

            let output = CfgOutput {
                diagram: name,
                node_count: cfg.node_count(),
                entry: id_of(cfg.entry()),
                exits: cfg.exits().iter().map(|&e| id_of(e)).collect(),
                nodes,
                loops,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        "dot" => {
            print!("{}", cfg.to_dot(Some(&name)));
        }
        "text" => {
            let exits: Vec<String> = cfg.exits().iter().map(|&e| id_of(e)).collect();
            println!("Control flow graph for {name}");
            println!(
                "Nodes: {}, Entry: {}, Exits: {}",
                cfg.node_count(),
                id_of(cfg.entry()),
                if exits.is_empty() {
                    "(none)".to_string()
                } else {
                    exits.join(", ")
                }
            );
            println!();

            let mut tw = TabWriter::new(&[
                ("Node", Align::Left),
                ("Kind", Align::Left),
                ("Depth", Align::Right),
                ("Successors", Align::Left),
            ]);
            for node in cfg.reverse_postorder() {
                let Some(flow) = cfg.node(node) else {
                    continue;
                };
                let successors: Vec<String> = cfg
                    .outgoing_edges(node)
                    .map(|(_, target, kind)| match kind.label() {
                        Some(label) => format!("{}({label})", id_of(target)),
                        None => id_of(target),
                    })
                    .collect();
                tw.row(vec![
                    flow.id.clone(),
                    flow.kind.name().to_string(),
                    cfg.loops().loop_depth(node).to_string(),
                    successors.join(", "),
                ]);
            }
            tw.print();

            if show_loops {
                println!();
                if cfg.loops().is_empty() {
                    println!("No loops.");
                } else {
                    let mut tw = TabWriter::new(&[
                        ("Header", Align::Left),
                        ("Type", Align::Left),
                        ("Depth", Align::Right),
                        ("Body", Align::Left),
                        ("Exits", Align::Left),
                    ]);
                    for region in cfg.loops().iter() {
                        let body: Vec<String> = region.body.iter().map(|&n| id_of(n)).collect();
                        let exits: Vec<String> =
                            region.exits.iter().map(|e| id_of(e.target)).collect();
                        tw.row(vec![
                            id_of(region.header),
                            format!("{:?}", region.loop_type),
                            region.depth.to_string(),
                            body.join(", "),
                            exits.join(", "),
                        ]);
                    }
                    tw.print();
                }
            }
        }
        other => bail!("unknown format '{other}', expected text, dot or json"),
    }
    Ok(())
}
