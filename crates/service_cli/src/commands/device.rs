//! Device command implementation
//!
//! Describes the compute backend pricing runs would use.

use pricer_pricing::PricingEngine;
use tracing::info;

use crate::config::PricerSettings;
use crate::report::{render_device, OutputFormat};
use crate::Result;

/// Run the device command
pub fn run(settings: &PricerSettings, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let engine = PricingEngine::new(settings.simulation.backend()?);
    let info = engine.device_info()?;

    info!(device = %info.name, compute_units = info.compute_units, "Queried compute device");
    print!("{}", render_device(&info, format)?);
    Ok(())
}
