//! Statistical and algebraic properties of the fractal estimators on
//! synthetic series with known scaling.

use assert_approx_eq::assert_approx_eq;
use fractal_signal::{
    calculate_fdi, calculate_multifractal_spectrum, estimate_hurst_rescaled_range,
    generators::*, perform_dfa, perform_mfdfa, perform_mfdfa_with_config, simple_moving_average,
    trend_factor, AnalysisConfig, ScaleLadder,
};

/// h(2) of uncorrelated increments sits near 0.5 across seeds.
///
/// MF-DFA integrates its input, so the increments of a random walk (white
/// noise) are the series whose profile is the walk itself.
#[test]
fn test_mfdfa_h2_of_random_walk_increments() {
    for seed in [1, 7, 42, 2024] {
        let config = GeneratorConfig {
            length: 4000,
            seed: Some(seed),
        };
        let increments = generate_white_noise(&config).unwrap();
        let result = perform_mfdfa_with_config(&increments, &AnalysisConfig::default()).unwrap();
        let h2 = result.hurst_at(2.0).unwrap();
        assert!(
            (h2 - 0.5).abs() < 0.15,
            "seed {}: h(2) = {:.3} outside 0.5 ± 0.15",
            seed,
            h2
        );
    }
}

/// Feeding the walk itself shifts h(2) up by one.
#[test]
fn test_mfdfa_h2_of_random_walk_levels() {
    let config = GeneratorConfig {
        length: 2000,
        seed: Some(99),
    };
    let walk = generate_random_walk(&config).unwrap();
    let result = perform_mfdfa_with_config(&walk, &AnalysisConfig::default()).unwrap();
    let h2 = result.hurst_at(2.0).unwrap();
    assert!((h2 - 1.5).abs() < 0.2, "h(2) = {:.3}", h2);
}

#[test]
fn test_white_noise_is_nearly_monofractal() {
    let config = GeneratorConfig {
        length: 3000,
        seed: Some(5),
    };
    let noise = generate_white_noise(&config).unwrap();
    let result = perform_mfdfa(&noise, &[-2.0, 0.0, 2.0], &ScaleLadder::default(), 2).unwrap();

    let h: Vec<f64> = result.generalized_hurst.iter().map(|gh| gh.h).collect();
    assert!((h[0] - h[2]).abs() < 0.25, "h(-2) = {:.3}, h(2) = {:.3}", h[0], h[2]);
    for gh in &result.generalized_hurst {
        assert!(gh.r_squared > 0.8, "q = {}: R² = {:.3}", gh.q, gh.r_squared);
    }
}

#[test]
fn test_dfa_agrees_with_mfdfa_on_noise() {
    let config = GeneratorConfig {
        length: 3000,
        seed: Some(8),
    };
    let noise = generate_white_noise(&config).unwrap();
    let dfa = perform_dfa(&noise, &ScaleLadder::default(), 2).unwrap();
    assert!((dfa.alpha - 0.5).abs() < 0.15, "DFA α = {:.3}", dfa.alpha);
    assert_eq!(dfa.log_scales.len(), 10);
}

#[test]
fn test_spectrum_identity_on_estimated_exponents() {
    for seed in 0..5 {
        let config = GeneratorConfig {
            length: 1500,
            seed: Some(300 + seed),
        };
        let prices = generate_price_path(&config, 50.0, 0.0, 0.02).unwrap();
        let result = perform_mfdfa_with_config(&prices, &AnalysisConfig::default()).unwrap();
        let spectrum = calculate_multifractal_spectrum(&result.generalized_hurst).unwrap();
        for point in &spectrum.points {
            assert_approx_eq!(point.f_alpha, point.q * point.alpha - point.tau, 1e-9);
        }
        let fdi = calculate_fdi(&spectrum);
        assert!(fdi.value.is_finite() && fdi.value >= 0.0);
        assert!(fdi.triple.width >= 0.0);
    }
}

#[test]
fn test_constant_series_hurst_is_half() {
    assert_eq!(estimate_hurst_rescaled_range(&[42.0; 250]), 0.5);
    assert_eq!(estimate_hurst_rescaled_range(&[1.0]), 0.5);
}

/// Strict monotone uptrend: positive trend factor and persistent R/S exponent.
#[test]
fn test_uptrend_scenario() {
    let prices = [100.0, 102.0, 105.0, 110.0, 115.0, 120.0, 125.0, 130.0, 135.0, 140.0];

    let short = simple_moving_average(3, &prices).unwrap();
    let long = simple_moving_average(7, &prices).unwrap();
    assert_eq!(short.len(), 8);
    assert_eq!(long.len(), 4);
    assert_approx_eq!(*short.last().unwrap(), 135.0);
    assert_approx_eq!(*long.last().unwrap(), 125.0);

    let factor = trend_factor(&short, &long).unwrap();
    assert!(factor > 0.0);
    assert_approx_eq!(factor, 0.08);

    let hurst = estimate_hurst_rescaled_range(&prices);
    assert!(hurst > 0.5, "H = {:.3}", hurst);
}
