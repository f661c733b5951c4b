//! Collapses the side-car files written by generate-compile-command into a
//! single compile_commands.json database.
//!
//! Usage:
//!   bazel --experimental_action_listener=//tools/actions:generate_compile_commands_listener
//! then either pass the roots explicitly:
//!   generate-compile-commands-json --build_root bazel-out/[config] \
//!       --execution_root $(bazel info execution_root)
//! or let the tool discover them with `bazel info`.

use std::env;
use std::path::Path;
use std::process;

extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;

extern crate action_tools;

use action_tools::aggregate::{self, AggregatorPaths, COMPILE_COMMANDS_ACTION_SUBPATH};
use action_tools::errors::Result;
use clap::{CommandFactory, Parser};

#[derive(Parser)]
#[command(name = "generate-compile-commands-json")]
struct CompileCommandsCli {
    /// Workspace directory `bazel info` runs from when the roots are
    /// discovered rather than passed.
    #[arg(long = "workspace_root", default_value = ".")]
    workspace_root: String,

    /// bazel info execution_root
    #[arg(long = "execution_root")]
    execution_root: Option<String>,

    /// bazel-out/[config]/
    #[arg(long = "build_root")]
    build_root: Option<String>,

    /// Output file path for the database file.
    #[arg(long = "output_file", default_value = "compile_commands.json")]
    output_file: String,
}

fn run(cli: CompileCommandsCli) -> Result<()> {
    let paths = match (&cli.build_root, &cli.execution_root) {
        (Some(build_root), Some(execution_root)) => {
            AggregatorPaths::from_flags(build_root, execution_root, COMPILE_COMMANDS_ACTION_SUBPATH)
        }
        _ => AggregatorPaths::discover(&cli.workspace_root)?,
    };
    let entries = aggregate::collect_compile_commands(&paths)?;
    info!(
        "writing {} compile commands to {}",
        entries.len(),
        cli.output_file
    );
    aggregate::write_database(&entries, Path::new(&cli.output_file))
}

fn main() {
    env_logger::init();

    // Bare invocation prints usage and fails.
    if env::args().len() == 1 {
        CompileCommandsCli::command().print_help().ok();
        process::exit(1);
    }

    if let Err(e) = run(CompileCommandsCli::parse()) {
        eprintln!("generate-compile-commands-json: {}", e);
        process::exit(1);
    }
}
