//! Rendering of pricing runs
//!
//! Tables mirror the layout operators compare against the golden output:
//! the contract first, then each valuation beside its Black-Scholes or
//! reference counterpart, then timings.

use std::fmt::Write as _;

use pricer_core::analytical::black_scholes_spec_price;
use pricer_core::types::{OptionResult, OptionSpec};
use pricer_pricing::device::DeviceInfo;
use serde::Serialize;

use crate::{CliError, Result};

/// Output formats shared by the commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: table, json",
                other
            ))),
        }
    }
}

/// One priced run as printed by `mcpricer price --format json`.
#[derive(Debug, Serialize)]
pub struct PriceReport<'a> {
    pub spec: &'a OptionSpec,
    pub black_scholes: f64,
    pub result: &'a OptionResult,
    pub throughput: f64,
    pub speedup: Option<f64>,
    pub within_tolerance: Option<bool>,
}

impl<'a> PriceReport<'a> {
    pub fn new(spec: &'a OptionSpec, result: &'a OptionResult) -> Self {
        Self {
            spec,
            black_scholes: black_scholes_spec_price(spec),
            result,
            throughput: result.throughput(),
            speedup: result.speedup(),
            within_tolerance: result.within_tolerance(),
        }
    }
}

/// Renders the reports of one invocation.
pub fn render_prices(reports: &[PriceReport<'_>], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
        OutputFormat::Table => {
            let mut out = String::new();
            for report in reports {
                price_table(&mut out, report);
            }
            Ok(out)
        }
    }
}

fn row(out: &mut String, label: &str, value: impl std::fmt::Display) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "│ {:<28} │ {:>16} │", label, value);
}

fn rule(out: &mut String, left: char, right: char) {
    let _ = writeln!(out, "{}{}┼{}{}", left, "─".repeat(30), "─".repeat(18), right);
}

fn price_table(out: &mut String, report: &PriceReport<'_>) {
    let spec = report.spec;
    let result = report.result;

    let _ = writeln!(out, "\n┌{}┬{}┐", "─".repeat(30), "─".repeat(18));
    row(out, "Spot", format!("{:.6}", spec.spot()));
    row(out, "Strike", format!("{:.6}", spec.strike()));
    row(out, "Risk-free rate", format!("{:.6}", spec.risk_free_rate()));
    row(out, "Volatility", format!("{:.6}", spec.volatility()));
    row(out, "Tenor", format!("{:.6}", spec.tenor()));
    row(out, "Barrier", format!("{:.6}", spec.barrier()));
    row(out, "Option type", spec.option_type());
    rule(out, '├', '┤');

    let expected = result
        .expectation()
        .map(|e| format!("{:.6}", e.value))
        .unwrap_or_else(|| "-".to_string());
    row(out, "Asian", format!("{:.6}", result.asian()));
    row(out, "Asian expected", expected);
    row(out, "Plain vanilla", format!("{:.6}", result.plain_vanilla()));
    row(
        out,
        "Plain vanilla reference",
        format!("{:.6}", result.plain_vanilla_reference()),
    );
    row(out, "Black-Scholes", format!("{:.6}", report.black_scholes));
    row(out, "Knock-out", format!("{:.6}", result.knockout()));
    row(out, "Knock-in", format!("{:.6}", result.knockin()));
    row(
        out,
        "Knock-out + Knock-in",
        format!("{:.6}", result.knockout_plus_knockin()),
    );
    row(out, "Lookback", format!("{:.6}", result.lookback()));
    rule(out, '├', '┤');

    row(out, "Precision", result.precision());
    row(out, "Simulations", result.num_paths());
    row(
        out,
        "Launch shape",
        format!("{} x {}", result.group_count(), result.group_size()),
    );
    row(
        out,
        "Parallel time (ms)",
        format!("{:.3}", result.elapsed_parallel().as_secs_f64() * 1e3),
    );
    let serial = result
        .elapsed_reference()
        .map(|d| format!("{:.3}", d.as_secs_f64() * 1e3))
        .unwrap_or_else(|| "-".to_string());
    row(out, "Serial time (ms)", serial);
    row(out, "Throughput (sims/s)", format!("{:.0}", report.throughput));
    if let Some(speedup) = report.speedup {
        row(out, "Speed-up", format!("{:.2}x", speedup));
    }
    if let Some(pass) = report.within_tolerance {
        row(out, "Golden check", if pass { "PASS" } else { "FAIL" });
    }
    let _ = writeln!(out, "└{}┴{}┘", "─".repeat(30), "─".repeat(18));
}

/// Renders the device description.
pub fn render_device(info: &DeviceInfo, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(info)?),
        OutputFormat::Table => {
            let mut out = String::new();
            let _ = writeln!(out, "┌{}┬{}┐", "─".repeat(30), "─".repeat(18));
            row(&mut out, "Device", &info.name);
            row(&mut out, "Compute units", info.compute_units);
            row(&mut out, "Max group size", info.max_group_size);
            row(&mut out, "Max group count", info.max_group_count);
            row(&mut out, "Local memory (bytes)", info.local_memory_bytes);
            row(&mut out, "Global memory (bytes)", info.global_memory_bytes);
            row(&mut out, "Double precision", info.supports_double);
            let _ = writeln!(out, "└{}┴{}┘", "─".repeat(30), "─".repeat(18));
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_core::types::{Expectation, PayoffKind, Precision};
    use std::time::Duration;

    fn spec() -> OptionSpec {
        OptionSpec::builder()
            .spot(40.0)
            .strike(35.0)
            .risk_free_rate(0.03)
            .volatility(0.2)
            .tenor(1.0 / 3.0)
            .time_step(1.0 / 261.0)
            .barrier(45.0)
            .build()
            .unwrap()
    }

    fn result() -> OptionResult {
        let mut result = OptionResult::new(1000, 87, Precision::Double).with_expectation(Expectation {
            kind: PayoffKind::Asian,
            value: 5.162534,
            tolerance: 0.1,
        });
        result.record(PayoffKind::Asian, 5.2);
        result.record(PayoffKind::PlainVanilla, 5.5);
        result.set_elapsed_parallel(Duration::from_millis(10));
        result.record_reference(5.6, Duration::from_millis(40));
        result
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "csv".parse::<OutputFormat>(),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_table_lists_every_valuation() {
        let spec = spec();
        let result = result();
        let table = render_prices(&[PriceReport::new(&spec, &result)], OutputFormat::Table).unwrap();

        for label in [
            "Asian expected",
            "Plain vanilla reference",
            "Black-Scholes",
            "Knock-out + Knock-in",
            "Lookback",
            "Throughput (sims/s)",
        ] {
            assert!(table.contains(label), "missing {label}");
        }
        assert!(table.contains("5.162534"));
        assert!(table.contains("PASS"));
        assert!(table.contains("4.00x"));
    }

    #[test]
    fn test_table_rows_share_one_width() {
        let spec = spec();
        let result = result();
        let table = render_prices(&[PriceReport::new(&spec, &result)], OutputFormat::Table).unwrap();

        let widths: Vec<usize> = table
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{table}");
        assert!(table.contains(&format!("│ {:<28} │ {:>16} │", "Option type", "Call")));
        assert!(table.contains(&format!("│ {:<28} │ {:>16} │", "Precision", "double")));
    }

    #[test]
    fn test_json_barrier_is_explicit() {
        let result = result();
        let knocked = spec();
        let json = render_prices(&[PriceReport::new(&knocked, &result)], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["spec"]["barrier"], 45.0);

        let unbarriered = OptionSpec::builder()
            .spot(40.0)
            .strike(35.0)
            .risk_free_rate(0.03)
            .volatility(0.2)
            .tenor(1.0 / 3.0)
            .time_step(1.0 / 261.0)
            .build()
            .unwrap();
        let json = render_prices(&[PriceReport::new(&unbarriered, &result)], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["spec"]["barrier"], "inf");
    }

    #[test]
    fn test_json_report() {
        let spec = spec();
        let result = result();
        let json = render_prices(&[PriceReport::new(&spec, &result)], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["within_tolerance"], serde_json::Value::Bool(true));
        assert_eq!(value[0]["result"]["num_paths"], 1000);
        assert!(value[0]["black_scholes"].as_f64().unwrap() > 5.0);
    }
}
