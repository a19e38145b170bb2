use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// flowscope - compile, inspect and run flowchart diagrams
#[derive(Debug, Parser)]
#[command(name = "flowscope", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a diagram into structured source code.
    Compile {
        /// Path to the diagram JSON file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Spaces per indentation level.
        #[arg(long, default_value_t = 2)]
        indent: usize,

        /// Omit the `# [node-id] label` comments.
        #[arg(long)]
        no_provenance: bool,

        /// Deepest branch or loop nesting to lower.
        #[arg(long, default_value_t = 64)]
        max_depth: usize,
    },

    /// Display the control-flow graph of a diagram.
    Cfg {
        /// Path to the diagram JSON file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Output format: text, dot, json.
        #[arg(long, default_value = "text")]
        format: String,

        /// Include loop analysis information.
        #[arg(long)]
        loops: bool,
    },

    /// Execute a diagram node by node.
    Run {
        /// Path to the diagram JSON file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Line fed to the next input node (repeatable, consumed in order).
        #[arg(short, long = "input", value_name = "VALUE")]
        input: Vec<String>,

        /// Maximum number of executed nodes (0 for unlimited).
        #[arg(long, default_value_t = 10_000)]
        max_steps: usize,

        /// Print every step instead of only the outputs.
        #[arg(long)]
        trace: bool,
    },
}
