//! Bazel extra_action binary that writes one compile-command side-car file
//! per C/C++ compile action. The side-cars are collapsed into a single
//! compile_commands.json database by generate-compile-commands-json.

use std::env;
use std::path::Path;
use std::process;

extern crate env_logger;

extern crate action_tools;
use action_tools::extract::CompileCommandExtractor;

/// When set, commands are emitted for every .h file required per unit.
const INCLUDE_ALL_HEADERS: bool = true;

fn main() {
    env_logger::init();

    let args: Vec<_> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: generate-compile-command <input_record> <output_file>");
        process::exit(1);
    }

    let extractor = CompileCommandExtractor::new(INCLUDE_ALL_HEADERS);
    if let Err(e) = extractor.extract(Path::new(&args[1]), Path::new(&args[2])) {
        eprintln!("generate-compile-command: {}", e);
        process::exit(1);
    }
}
