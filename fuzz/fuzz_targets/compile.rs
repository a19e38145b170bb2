#![no_main]

use flowscope::{flowchart::Diagram, runtime::{Execution, ExecutionConfig, ScriptedInput}};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(diagram) = Diagram::from_json(text) else {
        return;
    };

    // Compilation must succeed on any parsed diagram, however malformed.
    let compilation = flowscope::codegen::compile(&diagram.nodes, &diagram.edges);
    assert!(compilation.text.ends_with('\n'));

    if let Ok(mut execution) = Execution::new(
        &diagram.nodes,
        &diagram.edges,
        ExecutionConfig::new().with_max_steps(1_000),
    ) {
        let _ = execution.run(&mut ScriptedInput::new(["1", "2", "3"]));
    }
});
