//! Mode implementations
//!
//! - `install`: place cuckoo in front of an executable
//! - `invoke`: run the hooks for the name cuckoo was started under

pub mod install;
pub mod invoke;
