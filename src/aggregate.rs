//! Aggregators: walk a build-output tree for side-car files and collapse
//! them into a single JSON array database.
//!
//! Both databases share one shape: a glob-filtered recursive walk over the
//! action output directory, one parse per side-car, and a single write of
//! the assembled array. Entry order follows walk order and is not sorted;
//! consumers must not rely on it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use globset::Glob;
use log::debug;
use serde::Serialize;
use walkdir::WalkDir;

use crate::errors::{PipelineError, Result};
use crate::sidecar;

/// Fixed subpaths under `<build_root>/extra_actions/` where the build
/// system deposits extractor output. These mirror the labels of the action
/// listeners and are part of the listener contract, not derived here.
pub const COMPILE_COMMANDS_ACTION_SUBPATH: &str =
    "tools/actions/generate_compile_commands_action";
pub const LINK_TARGETS_ACTION_SUBPATH: &str = "tools/actions/generate_link_targets_action";

/// One record of a compile_commands.json database.
#[derive(Debug, Serialize)]
pub struct CompileCommandEntry {
    pub directory: String,
    pub command: String,
    pub file: String,
}

/// One record of a link_targets.json database.
#[derive(Debug, Serialize)]
pub struct LinkTargetEntry {
    pub package: String,
    pub uuid: String,
    pub executable: String,
}

/// The resolved inputs an aggregator run needs: where the extractor output
/// lives and the directory commands run from. The two deployment modes
/// (explicit flags, build-tool discovery) only differ in how this pair is
/// produced.
pub struct AggregatorPaths {
    pub action_output_root: PathBuf,
    pub command_directory: String,
}

impl AggregatorPaths {
    /// Build the pair from explicit `--build_root`/`--execution_root` flags.
    pub fn from_flags(
        build_root: &str,
        execution_root: &str,
        action_subpath: &str,
    ) -> AggregatorPaths {
        AggregatorPaths {
            action_output_root: Path::new(build_root)
                .join("extra_actions")
                .join(action_subpath),
            command_directory: execution_root.to_string(),
        }
    }

    /// Discover the pair by asking the build tool. `bazel info output_path`
    /// names the configuration-independent output root; the walk starts
    /// there and the filename filter narrows it to this pipeline's
    /// side-cars, so per-configuration subdirectories need no handling.
    pub fn discover(workspace_root: &str) -> Result<AggregatorPaths> {
        let execution_root = bazel_info(workspace_root, "execution_root")?;
        let output_path = bazel_info(workspace_root, "output_path")?;
        Ok(AggregatorPaths {
            action_output_root: PathBuf::from(output_path),
            command_directory: execution_root,
        })
    }
}

fn bazel_info(workspace_root: &str, key: &str) -> Result<String> {
    let output = Command::new("bazel")
        .arg("info")
        .arg(key)
        .current_dir(workspace_root)
        .output()?;
    if !output.status.success() {
        return Err(PipelineError::Discovery(format!(
            "bazel info {} exited with {}",
            key, output.status
        )));
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() {
        return Err(PipelineError::Discovery(format!(
            "bazel info {} printed nothing",
            key
        )));
    }
    Ok(value)
}

/// Walk `root` and return every file whose name matches `*{suffix}`, in
/// walk order. A missing root yields no files rather than an error so that
/// a build which ran no matching actions still aggregates to `[]`.
fn collect_sidecar_files(root: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        debug!("no action output directory at {}", root.display());
        return Ok(Vec::new());
    }
    let glob = Glob::new(&format!("*{}", suffix)).unwrap().compile_matcher();
    let mut paths = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && glob.is_match(entry.file_name()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Collapse every compile-command side-car under the action output root.
pub fn collect_compile_commands(paths: &AggregatorPaths) -> Result<Vec<CompileCommandEntry>> {
    let mut entries = Vec::new();
    for file_path in
        collect_sidecar_files(&paths.action_output_root, sidecar::COMPILE_COMMAND_SUFFIX)?
    {
        debug!("reading {}", file_path.display());
        let contents = fs::read_to_string(&file_path)?;
        let origin = file_path.display().to_string();
        for (command, raw_file) in sidecar::parse_compile_pairs(&contents, &origin)? {
            entries.push(CompileCommandEntry {
                directory: paths.command_directory.clone(),
                command,
                file: resolve_source_path(&raw_file, &paths.command_directory),
            });
        }
    }
    Ok(entries)
}

/// Collapse every link-target side-car under the action output root.
/// Empty side-cars (static libraries) contribute nothing.
pub fn collect_link_targets(paths: &AggregatorPaths) -> Result<Vec<LinkTargetEntry>> {
    let mut entries = Vec::new();
    for file_path in collect_sidecar_files(&paths.action_output_root, sidecar::LINK_TARGET_SUFFIX)?
    {
        let contents = fs::read_to_string(&file_path)?;
        match sidecar::parse_link_record(&contents) {
            Some((package, uuid, output_file)) => {
                // A join, not a canonicalization: the executable may not
                // exist yet when the database is generated.
                let executable = Path::new(&paths.command_directory)
                    .join(&output_file)
                    .to_string_lossy()
                    .into_owned();
                entries.push(LinkTargetEntry {
                    package,
                    uuid,
                    executable,
                });
            }
            None => {
                debug!("skipping {}: no link record", file_path.display());
            }
        }
    }
    Ok(entries)
}

/// Serialize entries as a JSON array in one write: one object literal per
/// entry joined with commas, no trailing comma, the literal `[]` when
/// there are no entries.
pub fn write_database<T: Serialize>(entries: &[T], output_file: &Path) -> Result<()> {
    let mut literals = Vec::with_capacity(entries.len());
    for entry in entries {
        literals.push(serde_json::to_string(entry)?);
    }
    fs::write(output_file, format!("[{}]", literals.join(",")))?;
    Ok(())
}

/// Absolutize a recorded source path against the execution root, and apply
/// the cygwin mount rewrite clang-tidy needs when the build ran under that
/// emulation layer.
fn resolve_source_path(raw: &str, command_directory: &str) -> String {
    if let Some(native) = cygwin_to_native(raw) {
        return native;
    }
    let path = Path::new(raw);
    if path.is_absolute() {
        raw.to_string()
    } else {
        Path::new(command_directory)
            .join(path)
            .to_string_lossy()
            .into_owned()
    }
}

/// Rewrite a cygwin mount path (`/cygdrive/c/foo/bar`) into the native
/// Windows form (`c:\foo\bar`). Returns `None` for paths without the mount
/// prefix; the prefix only ever appears when the build ran under cygwin.
pub fn cygwin_to_native(path: &str) -> Option<String> {
    let rest = path.strip_prefix("/cygdrive/")?;
    let mut parts = rest.splitn(2, '/');
    let drive = parts.next()?;
    if drive.len() != 1 {
        return None;
    }
    let tail = parts.next().unwrap_or("");
    Some(format!("{}:\\{}", drive, tail.replace('/', "\\")))
}
