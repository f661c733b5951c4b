//! Collapses the side-car files written by generate-link-target into a
//! single link_targets.json database.
//!
//! Usage:
//!   bazel --experimental_action_listener=//tools/actions:generate_link_targets_listener
//! then run this with explicit --build_root/--execution_root flags, or let
//! it discover the roots with `bazel info`.

use std::env;
use std::path::Path;
use std::process;

extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;

extern crate action_tools;

use action_tools::aggregate::{self, AggregatorPaths, LINK_TARGETS_ACTION_SUBPATH};
use action_tools::errors::Result;
use clap::{CommandFactory, Parser};

#[derive(Parser)]
#[command(name = "generate-link-targets-json")]
struct LinkTargetsCli {
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
    #[arg(long = "output_file", default_value = "link_targets.json")]
    output_file: String,
}

fn run(cli: LinkTargetsCli) -> Result<()> {
    let paths = match (&cli.build_root, &cli.execution_root) {
        (Some(build_root), Some(execution_root)) => {
            AggregatorPaths::from_flags(build_root, execution_root, LINK_TARGETS_ACTION_SUBPATH)
        }
        _ => AggregatorPaths::discover(&cli.workspace_root)?,
    };
    let entries = aggregate::collect_link_targets(&paths)?;
    info!(
        "writing {} link targets to {}",
        entries.len(),
        cli.output_file
    );
    aggregate::write_database(&entries, Path::new(&cli.output_file))
}

fn main() {
    env_logger::init();

    // Bare invocation prints usage and fails.
    if env::args().len() == 1 {
        LinkTargetsCli::command().print_help().ok();
        process::exit(1);
    }

    if let Err(e) = run(LinkTargetsCli::parse()) {
        eprintln!("generate-link-targets-json: {}", e);
        process::exit(1);
    }
}
