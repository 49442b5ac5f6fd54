//! Monte Carlo simulation building blocks.
//!
//! - [`SimulationConfig`]: path count, launch shape, seed and precision
//! - [`select_launch_shape`] / [`verify_kernel_limits`]: workload sizing
//! - [`PathMatrix`] and the path generation pass
//! - [`reduce_sum`]: the group reduction shared by every valuation pass
//! - [`PricingError`]: everything that can abort a run

mod config;
mod error;
mod paths;
mod reduction;
mod shape;

pub use config::{SimulationConfig, SimulationConfigBuilder, DEFAULT_GROUP_SIZE};
pub use error::{ConfigError, PricingError};
pub use paths::{DeviceOptionParams, PathMatrix};
pub(crate) use paths::generate_paths;
pub use reduction::reduce_sum;
pub use shape::{select_launch_shape, verify_kernel_limits, GROUPS_PER_COMPUTE_UNIT};
