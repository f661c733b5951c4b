//! Bazel extra_action binary that writes one link-target side-car file per
//! C/C++ link action. Executable links record (package, id, output path);
//! everything else leaves an empty file so the aggregator skips it. The
//! side-cars are collapsed into link_targets.json by
//! generate-link-targets-json.

use std::env;
use std::path::Path;
use std::process;

extern crate env_logger;

extern crate action_tools;
use action_tools::extract::extract_link_target;

fn main() {
    env_logger::init();

    let args: Vec<_> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: generate-link-target <input_record> <output_file>");
        process::exit(1);
    }

    if let Err(e) = extract_link_target(Path::new(&args[1]), Path::new(&args[2])) {
        eprintln!("generate-link-target: {}", e);
        process::exit(1);
    }
}
