//! Analytical (closed-form) prices used to verify Monte Carlo output.
//!
//! The Monte Carlo plain vanilla estimator and the serial reference pricer
//! both converge to the Black-Scholes price; tests and the CLI report use
//! it as a third, noise-free reference.
//!
//! # Usage
//!
//! ```rust
//! use pricer_core::analytical::black_scholes_price;
//! use pricer_core::types::OptionType;
//!
//! let call = black_scholes_price(100.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call);
//! assert!((call - 10.4506).abs() < 1e-3);
//! ```

pub mod black_scholes;
pub mod distributions;

pub use black_scholes::{black_scholes_price, black_scholes_spec_price};
pub use distributions::{norm_cdf, norm_pdf};
