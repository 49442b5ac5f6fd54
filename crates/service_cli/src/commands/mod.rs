//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod device;
pub mod price;
