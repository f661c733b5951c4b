//! Reading and decoding serialized extra-action records.
//!
//! The build system hands each action listener a binary `ExtraActionInfo`
//! describing the action that just ran. The schema lives in
//! `proto/extra_actions_base.proto` and is compiled by prost at build time.

use std::fs;
use std::path::Path;

use prost::Message;

use crate::errors::Result;

pub mod proto {
    include!(concat!(env!("OUT_DIR"), "/blaze.rs"));
}

pub use self::proto::{CppCompileInfo, CppLinkInfo, ExtraActionInfo};

/// `link_target_type` value recorded for executable link actions.
pub const LINK_TARGET_TYPE_EXECUTABLE: &str = "EXECUTABLE";

/// Read and decode one serialized `ExtraActionInfo` record. Any read or
/// decode failure is fatal to the invocation.
pub fn read_action(path: &Path) -> Result<ExtraActionInfo> {
    let bytes = fs::read(path)?;
    let action = ExtraActionInfo::decode(bytes.as_slice())?;
    Ok(action)
}
