use std::path::Path;

use flowscope::codegen::{ast::Program, CompileOptions, Compiler, EmitterConfig};
use serde::Serialize;

use crate::{app::GlobalOptions, commands::common::load_diagram, output::print_output};

/// Command line knobs of `flowscope compile`.
pub struct CompileArgs {
    pub indent: usize,
    pub provenance: bool,
    pub max_depth: usize,
}

#[derive(Debug, Serialize)]
struct CompileOutput {
    text: String,
    unsupported: usize,
    program: Program,
}

pub fn run(path: &Path, args: CompileArgs, opts: &GlobalOptions) -> anyhow::Result<()> {
    let diagram = load_diagram(path)?;

    let compiler = Compiler::new(CompileOptions {
        emitter: EmitterConfig {
            indent_width: args.indent,
            provenance_comments: args.provenance,
        },
        max_depth: args.max_depth,
    });
    let compilation = compiler.compile(&diagram.nodes, &diagram.edges);
    let unsupported = compilation.unsupported_count();
    if unsupported > 0 {
        log::warn!("{unsupported} construct(s) could not be lowered");
    }

    let output = CompileOutput {
        text: compilation.text,
        unsupported,
        program: compilation.program,
    };
    print_output(&output, opts, |out| print!("{}", out.text))
}
