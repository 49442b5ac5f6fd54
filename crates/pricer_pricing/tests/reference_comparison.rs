//! Monte Carlo values against the serial reference, Black-Scholes and the
//! published Asian golden value.
//!
//! Reference contract: spot 40, strike 35, r 3%, σ 20%, tenor 1/3,
//! daily steps of 1/261, barrier 45, call.

use approx::assert_relative_eq;
use pricer_core::analytical::black_scholes_spec_price;
use pricer_core::types::{Expectation, OptionSpec, OptionType, PayoffKind, Precision};
use pricer_pricing::device::CpuBackend;
use pricer_pricing::mc::SimulationConfig;
use pricer_pricing::{PricingEngine, ReferencePricer};

const GOLDEN_ASIAN: f64 = 5.162534;
const TOLERANCE: f64 = 0.1;

fn reference_spec(option_type: OptionType) -> OptionSpec {
    OptionSpec::builder()
        .spot(40.0)
        .strike(35.0)
        .risk_free_rate(0.03)
        .volatility(0.2)
        .tenor(1.0 / 3.0)
        .time_step(1.0 / 261.0)
        .barrier(45.0)
        .option_type(option_type)
        .build()
        .unwrap()
}

fn scenario_config(precision: Precision) -> SimulationConfig {
    SimulationConfig::builder()
        .num_paths(100_000)
        .group_size(256)
        .seed(1234)
        .precision(precision)
        .build()
        .unwrap()
}

#[test]
fn test_reference_scenario_double_precision() {
    let spec = reference_spec(OptionType::Call);
    let engine = PricingEngine::new(CpuBackend::new().unwrap());

    let mut result = engine
        .price(&spec, &scenario_config(Precision::Double))
        .unwrap()
        .with_expectation(Expectation {
            kind: PayoffKind::Asian,
            value: GOLDEN_ASIAN,
            tolerance: TOLERANCE,
        });
    ReferencePricer::default().price_into(&spec, &mut result);

    let analytical = black_scholes_spec_price(&spec);
    assert_relative_eq!(analytical, 5.568_666, epsilon = 1e-4);

    assert!(
        (result.plain_vanilla() - result.plain_vanilla_reference()).abs() < TOLERANCE,
        "parallel {} vs serial {}",
        result.plain_vanilla(),
        result.plain_vanilla_reference()
    );
    assert!((result.plain_vanilla() - analytical).abs() < TOLERANCE);
    assert!((result.plain_vanilla_reference() - analytical).abs() < TOLERANCE);

    assert_eq!(result.within_tolerance(), Some(true), "asian = {}", result.asian());
    assert!(result.elapsed_reference().is_some());
    assert!(result.speedup().is_some());
}

#[test]
fn test_reference_scenario_single_precision() {
    let spec = reference_spec(OptionType::Call);
    let engine = PricingEngine::new(CpuBackend::new().unwrap());
    let result = engine.price(&spec, &scenario_config(Precision::Single)).unwrap();

    assert_eq!(result.precision(), Precision::Single);
    assert!((result.asian() - GOLDEN_ASIAN).abs() < TOLERANCE);
    assert!((result.plain_vanilla() - black_scholes_spec_price(&spec)).abs() < TOLERANCE);
}

#[test]
fn test_value_ordering_for_reference_contract() {
    let spec = reference_spec(OptionType::Call);
    let engine = PricingEngine::new(CpuBackend::new().unwrap());
    let result = engine.price(&spec, &scenario_config(Precision::Double)).unwrap();

    // Averaging lowers the volatility of the underlying.
    assert!(result.asian() < result.plain_vanilla());
    // Both barrier legs are worth less than the unconditional payoff.
    assert!(result.knockout() < result.plain_vanilla());
    assert!(result.knockin() < result.plain_vanilla());
    assert!(result.lookback() > 2.5 && result.lookback() < 4.5);
}

#[test]
fn test_put_call_parity_on_shared_paths() {
    let engine = PricingEngine::new(CpuBackend::new().unwrap());
    let config = scenario_config(Precision::Double);

    let call = engine.price(&reference_spec(OptionType::Call), &config).unwrap();
    let put = engine.price(&reference_spec(OptionType::Put), &config).unwrap();

    let spec = reference_spec(OptionType::Call);
    let forward = spec.spot() - spec.strike() * spec.discount_factor();
    assert!((call.plain_vanilla() - put.plain_vanilla() - forward).abs() < TOLERANCE);
}

#[test]
fn test_put_reference_matches_black_scholes() {
    let spec = reference_spec(OptionType::Put);
    let engine = PricingEngine::new(CpuBackend::new().unwrap());
    let mut result = engine
        .price(&spec, &scenario_config(Precision::Double))
        .unwrap();
    ReferencePricer::new(99).price_into(&spec, &mut result);

    let analytical = black_scholes_spec_price(&spec);
    assert!((result.plain_vanilla() - analytical).abs() < 0.05);
    assert!((result.plain_vanilla_reference() - analytical).abs() < 0.05);
}
