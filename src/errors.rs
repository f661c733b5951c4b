use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Everything that can go wrong between reading an action record and
/// writing a database file. All of these abort the invoking process;
/// there are no recoverable variants.
#[derive(Debug)]
pub enum PipelineError {
    Io(io::Error),
    Decode(prost::DecodeError),
    Json(serde_json::Error),
    /// The action record did not carry the payload the extractor needed.
    MissingPayload(&'static str),
    /// A compile-command side-car did not split into (command, file) pairs.
    MalformedSidecar(String),
    /// `bazel info` failed or printed something unusable.
    Discovery(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::Io(e) => write!(f, "{}", e),
            PipelineError::Decode(e) => write!(f, "failed to decode action record: {}", e),
            PipelineError::Json(e) => write!(f, "{}", e),
            PipelineError::MissingPayload(field) => {
                write!(f, "action record has no {} payload", field)
            }
            PipelineError::MalformedSidecar(msg) => write!(f, "malformed side-car file: {}", msg),
            PipelineError::Discovery(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<io::Error> for PipelineError {
    fn from(e: io::Error) -> PipelineError {
        PipelineError::Io(e)
    }
}

impl From<prost::DecodeError> for PipelineError {
    fn from(e: prost::DecodeError) -> PipelineError {
        PipelineError::Decode(e)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> PipelineError {
        PipelineError::Json(e)
    }
}
