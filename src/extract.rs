//! Extractor cores: one compile or link action record in, one side-car
//! file out. These run once per build action under the action listener,
//! so they do as little as possible and any failure is fatal.

use std::fs;
use std::path::Path;

use crate::action_record::{self, CppCompileInfo};
use crate::errors::{PipelineError, Result};
use crate::sidecar;

/// Builds compile-command side-car files from compile-action records.
pub struct CompileCommandExtractor {
    include_all_headers: bool,
}

impl CompileCommandExtractor {
    /// When `include_all_headers` is set, commands are emitted for every
    /// `.h` file the compilation unit touches, not just the primary source.
    pub fn new(include_all_headers: bool) -> CompileCommandExtractor {
        CompileCommandExtractor {
            include_all_headers,
        }
    }

    /// Format the compiler invocation and enumerate the files it covers.
    fn command_and_files(&self, info: &CppCompileInfo) -> (String, Vec<String>) {
        let command = format!(
            "{} {} -c {} -o {}",
            info.tool(),
            info.compiler_option.join(" "),
            info.source_file(),
            info.output_file()
        );
        let mut files = vec![info.source_file().to_string()];
        if self.include_all_headers {
            files.extend(
                info.sources_and_headers
                    .iter()
                    .filter(|f| f.ends_with(".h"))
                    .cloned(),
            );
        }
        (command, files)
    }

    /// Decode the record at `input` and write one (command, file) pair per
    /// covered file to the side-car at `output`.
    pub fn extract(&self, input: &Path, output: &Path) -> Result<()> {
        let action = action_record::read_action(input)?;
        let info = action
            .cpp_compile_info
            .as_ref()
            .ok_or(PipelineError::MissingPayload("cpp_compile_info"))?;
        let (command, files) = self.command_and_files(info);
        let mut buf = Vec::new();
        for file in &files {
            sidecar::push_pair(&mut buf, &command, file);
        }
        fs::write(output, buf)?;
        Ok(())
    }
}

/// Decode the record at `input`; write a link side-car for executable link
/// actions and an empty file for everything else (static libraries in
/// particular), which the aggregator treats as "no record".
pub fn extract_link_target(input: &Path, output: &Path) -> Result<()> {
    let action = action_record::read_action(input)?;
    let info = action
        .cpp_link_info
        .as_ref()
        .ok_or(PipelineError::MissingPayload("cpp_link_info"))?;
    if info.link_target_type() != action_record::LINK_TARGET_TYPE_EXECUTABLE {
        fs::write(output, b"")?;
        return Ok(());
    }
    let buf = sidecar::encode_link_target(action.owner(), action.id(), info.output_file());
    fs::write(output, buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_record::{CppLinkInfo, ExtraActionInfo};
    use prost::Message;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_record(dir: &Path, action: &ExtraActionInfo) -> PathBuf {
        let mut bytes = Vec::new();
        action.encode(&mut bytes).unwrap();
        let path = dir.join("record");
        fs::write(&path, &bytes).unwrap();
        path
    }

    fn compile_action() -> ExtraActionInfo {
        ExtraActionInfo {
            owner: Some("//foo:bar".to_string()),
            id: Some("deadbeef".to_string()),
            mnemonic: Some("CppCompile".to_string()),
            cpp_compile_info: Some(CppCompileInfo {
                tool: Some("gcc".to_string()),
                compiler_option: vec!["-O2".to_string(), "-Wall".to_string()],
                source_file: Some("foo/bar.cc".to_string()),
                output_file: Some("bazel-out/foo/bar.o".to_string()),
                sources_and_headers: vec![
                    "foo/bar.cc".to_string(),
                    "foo/bar.h".to_string(),
                    "foo/baz.h".to_string(),
                    "foo/tables.inc".to_string(),
                ],
            }),
            ..Default::default()
        }
    }

    fn link_action(target_type: &str) -> ExtraActionInfo {
        ExtraActionInfo {
            owner: Some("//foo:bar".to_string()),
            id: Some("abc123".to_string()),
            mnemonic: Some("CppLink".to_string()),
            cpp_link_info: Some(CppLinkInfo {
                output_file: Some("bazel-out/bin/foo/bar".to_string()),
                link_target_type: Some(target_type.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_compile_extract_with_headers() {
        let dir = tempdir().unwrap();
        let input = write_record(dir.path(), &compile_action());
        let output = dir.path().join("out_compile_command");

        CompileCommandExtractor::new(true)
            .extract(&input, &output)
            .unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        let pairs = sidecar::parse_compile_pairs(&contents, "test").unwrap();
        // Primary source plus the two .h files; the .cc and .inc entries in
        // sources_and_headers do not get their own pairs.
        assert_eq!(pairs.len(), 3);
        let command = "gcc -O2 -Wall -c foo/bar.cc -o bazel-out/foo/bar.o";
        assert_eq!(pairs[0], (command.to_string(), "foo/bar.cc".to_string()));
        assert_eq!(pairs[1], (command.to_string(), "foo/bar.h".to_string()));
        assert_eq!(pairs[2], (command.to_string(), "foo/baz.h".to_string()));
    }

    #[test]
    fn test_compile_extract_without_headers() {
        let dir = tempdir().unwrap();
        let input = write_record(dir.path(), &compile_action());
        let output = dir.path().join("out_compile_command");

        CompileCommandExtractor::new(false)
            .extract(&input, &output)
            .unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        let pairs = sidecar::parse_compile_pairs(&contents, "test").unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1, "foo/bar.cc");
    }

    #[test]
    fn test_compile_record_without_payload_is_fatal() {
        let dir = tempdir().unwrap();
        let input = write_record(dir.path(), &link_action("EXECUTABLE"));
        let output = dir.path().join("out_compile_command");

        match CompileCommandExtractor::new(true).extract(&input, &output) {
            Err(PipelineError::MissingPayload("cpp_compile_info")) => {}
            other => panic!("expected missing payload, got {:?}", other),
        }
    }

    #[test]
    fn test_link_extract_executable() {
        let dir = tempdir().unwrap();
        let input = write_record(dir.path(), &link_action("EXECUTABLE"));
        let output = dir.path().join("out_link_target");

        extract_link_target(&input, &output).unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        assert_eq!(contents, "//foo:bar\0abc123\0bazel-out/bin/foo/bar");
    }

    #[test]
    fn test_link_extract_static_library_writes_empty_file() {
        let dir = tempdir().unwrap();
        let input = write_record(dir.path(), &link_action("STATIC_LIBRARY"));
        let output = dir.path().join("out_link_target");

        extract_link_target(&input, &output).unwrap();

        assert_eq!(fs::read(&output).unwrap(), Vec::<u8>::new());
    }
}
