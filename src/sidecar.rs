//! The NUL-delimited side-car format shared by the extractors and the
//! aggregators.
//!
//! Compile-command side-cars are a flat sequence of (command, file) string
//! pairs with every field followed by a NUL. Link-target side-cars are
//! exactly three fields (package, id, executable) with no trailing NUL;
//! an empty file means "no record" and is how static-library link actions
//! tell the aggregator to skip them.

use crate::errors::{PipelineError, Result};

/// Filename suffix of compile-command side-car files.
pub const COMPILE_COMMAND_SUFFIX: &str = "_compile_command";

/// Filename suffix of link-target side-car files.
pub const LINK_TARGET_SUFFIX: &str = "_link_target";

/// Append one (command, file) pair to a compile side-car buffer.
pub fn push_pair(buf: &mut Vec<u8>, command: &str, file: &str) {
    buf.extend_from_slice(command.as_bytes());
    buf.push(0);
    buf.extend_from_slice(file.as_bytes());
    buf.push(0);
}

/// Encode a link-target side-car.
pub fn encode_link_target(package: &str, id: &str, output_file: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(package.as_bytes());
    buf.push(0);
    buf.extend_from_slice(id.as_bytes());
    buf.push(0);
    buf.extend_from_slice(output_file.as_bytes());
    buf
}

/// Parse a compile side-car into (command, file) pairs.
///
/// The extractor terminates every field with a NUL, so a well-formed file
/// splits into pairs plus one empty trailer, which is dropped before the
/// pair check. Any other odd field count is a hard error, never a silent
/// truncation of the last incomplete pair.
pub fn parse_compile_pairs(contents: &str, origin: &str) -> Result<Vec<(String, String)>> {
    let mut fields: Vec<&str> = contents.split('\0').collect();
    if fields.last() == Some(&"") {
        fields.pop();
    }
    if fields.is_empty() {
        return Ok(Vec::new());
    }
    if fields.len() % 2 != 0 {
        return Err(PipelineError::MalformedSidecar(format!(
            "{}: {} NUL-delimited fields, expected (command, file) pairs",
            origin,
            fields.len()
        )));
    }
    Ok(fields
        .chunks(2)
        .map(|pair| (pair[0].to_string(), pair[1].to_string()))
        .collect())
}

/// Parse a link side-car into (package, id, executable). Files with fewer
/// than three fields carry no record.
pub fn parse_link_record(contents: &str) -> Option<(String, String, String)> {
    let fields: Vec<&str> = contents.split('\0').collect();
    if fields.len() < 3 {
        return None;
    }
    Some((
        fields[0].to_string(),
        fields[1].to_string(),
        fields[2].to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let pairs = parse_compile_pairs("gcc -O2\0/tmp/a.c\0gcc -O2\0/tmp/a.h\0", "test").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("gcc -O2".to_string(), "/tmp/a.c".to_string()),
                ("gcc -O2".to_string(), "/tmp/a.h".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_pairs_without_trailing_nul() {
        let pairs = parse_compile_pairs("gcc -O2\0/tmp/a.c", "test").unwrap();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_empty_file_has_no_pairs() {
        assert!(parse_compile_pairs("", "test").unwrap().is_empty());
    }

    #[test]
    fn test_odd_field_count_is_fatal() {
        assert!(parse_compile_pairs("gcc\0/tmp/a.c\0orphan", "test").is_err());
    }

    #[test]
    fn test_pair_round_trip() {
        let mut buf = Vec::new();
        push_pair(&mut buf, "clang -g", "x/y.cc");
        push_pair(&mut buf, "clang -g", "x/y.h");
        let contents = String::from_utf8(buf).unwrap();
        let pairs = parse_compile_pairs(&contents, "test").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], ("clang -g".to_string(), "x/y.h".to_string()));
    }

    #[test]
    fn test_link_record_round_trip() {
        let buf = encode_link_target("//foo:bar", "abc123", "bazel-out/bin/foo/bar");
        // No trailing NUL after the last field.
        assert_eq!(buf.last(), Some(&b'r'));
        let contents = String::from_utf8(buf).unwrap();
        assert_eq!(
            parse_link_record(&contents),
            Some((
                "//foo:bar".to_string(),
                "abc123".to_string(),
                "bazel-out/bin/foo/bar".to_string()
            ))
        );
    }

    #[test]
    fn test_short_link_record_is_skipped() {
        assert_eq!(parse_link_record(""), None);
        assert_eq!(parse_link_record("//foo:bar\0abc123"), None);
    }
}
