//! Contract, precision, and result types.
//!
//! This module provides:
//! - `option`: The immutable option contract ([`OptionSpec`]) and its builder
//! - `precision`: Numeric precision used by a pricing run ([`Precision`])
//! - `result`: Valuation tags ([`PayoffKind`]) and the populated [`OptionResult`]
//! - `error`: Validation errors raised while building a contract

pub mod error;
pub mod option;
pub mod precision;
pub mod result;

pub use error::SpecError;
pub use option::{OptionSpec, OptionSpecBuilder, OptionType};
pub use precision::Precision;
pub use result::{Expectation, OptionResult, PayoffKind};
