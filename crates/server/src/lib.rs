pub mod errors;
pub mod rpc;
pub mod startup;

pub use startup::{run, serve};
