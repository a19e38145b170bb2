mod app;
mod commands;
mod output;

use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // flowscope warnings on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        };
        env_logger::Builder::new()
            .filter_module("flowscope", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Compile {
            path,
            indent,
            no_provenance,
            max_depth,
        } => commands::compile::run(
            path,
            commands::compile::CompileArgs {
                indent: *indent,
                provenance: !*no_provenance,
                max_depth: *max_depth,
            },
            &cli.global,
        ),
        Command::Cfg {
            path,
            format,
            loops,
        } => commands::cfg::run(path, format, *loops),
        Command::Run {
            path,
            input,
            max_steps,
            trace,
        } => commands::run::run(path, input, *max_steps, *trace, &cli.global),
    }
}
