//! # pricer_core: Contract and Result Types for Path-Dependent Pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the pricing workspace, providing:
//! - The option contract description: [`OptionSpec`], [`OptionType`] (`types::option`)
//! - The valuation tags and accumulated results: [`PayoffKind`], [`OptionResult`] (`types::result`)
//! - Numeric precision selection: [`Precision`] (`types::precision`)
//! - Validation errors: [`SpecError`] (`types::error`)
//! - Closed-form Black-Scholes prices for cross-checking Monte Carlo output (`analytical`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::types::{OptionSpec, OptionType};
//!
//! let spec = OptionSpec::builder()
//!     .spot(40.0)
//!     .strike(35.0)
//!     .risk_free_rate(0.03)
//!     .volatility(0.20)
//!     .tenor(1.0 / 3.0)
//!     .time_step(1.0 / 261.0)
//!     .barrier(45.0)
//!     .option_type(OptionType::Call)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(spec.num_timesteps(), 87);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for the contract, precision and result types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod types;

pub use types::{
    Expectation, OptionResult, OptionSpec, OptionSpecBuilder, OptionType, PayoffKind, Precision,
    SpecError,
};
