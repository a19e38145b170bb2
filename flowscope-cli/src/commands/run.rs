use std::path::Path;

use anyhow::Context;
use flowscope::{
    expression::Binding,
    runtime::{Execution, ExecutionConfig, ScriptedInput, StepEvent},
};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_diagram,
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct RunOutput {
    steps: usize,
    outputs: Vec<String>,
    bindings: Vec<Binding>,
    events: Option<Vec<StepEvent>>,
}

pub fn run(
    path: &Path,
    input: &[String],
    max_steps: usize,
    trace: bool,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let diagram = load_diagram(path)?;
    let mut execution = Execution::new(
        &diagram.nodes,
        &diagram.edges,
        ExecutionConfig::new().with_max_steps(max_steps),
    )?;
    let mut source = ScriptedInput::new(input.iter().cloned());

    let mut events = Vec::new();
    while !execution.is_finished() {
        let at = execution
            .current_node()
            .map(|node| node.id.clone())
            .unwrap_or_default();
        let event = execution
            .step(&mut source)
            .with_context(|| format!("execution failed at node '{at}'"))?;
        if trace && !opts.json {
            println!("[{at}] {}", describe(&event));
        } else if !trace && !opts.json {
            if let StepEvent::Printed { text, .. } = &event {
                println!("{text}");
            }
        }
        events.push(event);
    }
    if source.remaining() > 0 {
        log::warn!("{} input line(s) were not consumed", source.remaining());
    }

    let output = RunOutput {
        steps: execution.steps(),
        outputs: execution.outputs().to_vec(),
        bindings: execution.bindings().iter().cloned().collect(),
        events: trace.then_some(events),
    };
    print_output(&output, opts, |out| {
        if !trace {
            return;
        }
        println!();
        let mut tw = TabWriter::new(&[("Variable", Align::Left), ("Value", Align::Left)]);
        for binding in &out.bindings {
            tw.row(vec![binding.variable.name.clone(), binding.value.to_string()]);
        }
        tw.print();
    })
}

fn describe(event: &StepEvent) -> String {
    match event {
        StepEvent::Started => "start".to_string(),
        StepEvent::Declared { count, .. } => format!("declare {count} variable(s)"),
        StepEvent::Assigned { binding, .. } => {
            format!("{} = {}", binding.variable.name, binding.value)
        }
        StepEvent::Printed { text, .. } => format!("print {text}"),
        StepEvent::Branched { taken, .. } => format!("branch {taken}"),
        StepEvent::Skipped { .. } => "skip".to_string(),
        StepEvent::Finished => "end".to_string(),
    }
}
