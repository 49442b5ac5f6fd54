//! # pricer_pricing: Data-Parallel Monte Carlo Engine (Layer 3)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing prices the path-dependent contracts described by
//! `pricer_core` on a data-parallel compute device:
//! - Per-lane random streams seeded by a compute pass (`rng`)
//! - Log-normal path simulation into a column-major path matrix (`mc`)
//! - Plain vanilla, Asian, lookback and knock-out/knock-in valuation passes
//!   reduced per group (`path_dependent`)
//! - Host-side orchestration and device memory lifecycle (`orchestrator`)
//! - A serial Box–Muller reference pricer for cross-validation (`reference`)
//!
//! ## Compute Model
//!
//! The engine sees the device through the [`ComputeBackend`](device::ComputeBackend)
//! trait: a grid of groups of lanes, where each group reduces its lanes'
//! partial sums through local memory and groups are combined on the host.
//! [`CpuBackend`](device::CpuBackend) runs each group as a rayon task.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::types::OptionSpec;
//! use pricer_pricing::device::CpuBackend;
//! use pricer_pricing::mc::SimulationConfig;
//! use pricer_pricing::{PricingEngine, ReferencePricer};
//!
//! let spec = OptionSpec::builder()
//!     .spot(40.0)
//!     .strike(35.0)
//!     .risk_free_rate(0.03)
//!     .volatility(0.2)
//!     .tenor(1.0 / 3.0)
//!     .time_step(1.0 / 261.0)
//!     .barrier(45.0)
//!     .build()
//!     .unwrap();
//! let config = SimulationConfig::builder().num_paths(8_192).seed(1234).build().unwrap();
//!
//! let engine = PricingEngine::new(CpuBackend::new().unwrap());
//! let mut result = engine.price(&spec, &config).unwrap();
//! ReferencePricer::new(42).price_into(&spec, &mut result);
//!
//! assert!((result.plain_vanilla() - result.plain_vanilla_reference()).abs() < 0.5);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialisation of [`DeviceInfo`](device::DeviceInfo) and the `pricer_core` result types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod device;
pub mod mc;
pub mod orchestrator;
pub mod path_dependent;
pub mod real;
pub mod reference;
pub mod rng;

pub use mc::{PricingError, SimulationConfig};
pub use orchestrator::PricingEngine;
pub use real::Real;
pub use reference::ReferencePricer;
