//! Process-level helpers shared by the catalog binaries: logging bootstrap and
//! runtime environment checks.

pub mod env;
pub mod utils;
