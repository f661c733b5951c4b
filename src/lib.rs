extern crate globset;
extern crate log;
extern crate prost;
extern crate serde;
extern crate serde_json;
extern crate walkdir;

pub mod action_record;
pub mod aggregate;
pub mod errors;
pub mod extract;
pub mod sidecar;
