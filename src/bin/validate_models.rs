//! Model Registry Validation
//!
//! Loads every predictor artifact the dashboard can reach and reports which
//! ones are usable:
//! 1. Nationwide models for each input length (6 to 11 months)
//! 2. Every row of the state model summary
//!
//! Each loaded model also runs a one-step smoke forecast on a flat window
//! of the configured default value.
//!
//! Usage:
//!   cargo run --bin validate_models
//!
//! Exits non-zero when any artifact exists but fails to load or predict.
//! Missing artifacts are reported as warnings only.

use mfps_dashboard::config::load_config_default;
use mfps_dashboard::forecast::registry::{CheckStatus, ModelRegistry};
use mfps_dashboard::forecast::{run_forecast, ForecastRequest};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_env("RUST_LOG")
        .init();

    println!("🌊 Model Registry Validation");
    println!("============================\n");

    let config = load_config_default()?;
    let registry = ModelRegistry::from_config(&config);
    println!("📂 Model directory: {}\n", registry.dir().display());

    let checks = registry.check_all();
    let mut loaded = 0;
    let mut missing = 0;
    let mut failed = 0;

    for check in &checks {
        match &check.status {
            CheckStatus::Loaded(kind) => {
                let request = ForecastRequest::new(
                    vec![config.forecast.default_value_mm; check.input_len],
                    1,
                )?;
                match run_forecast(&registry, &check.scope, &request) {
                    Ok(forecast) => {
                        loaded += 1;
                        println!(
                            "   ✓ {:<22} {:>2}m  {:<7} next month {:.2} mm",
                            check.scope.to_string(),
                            check.input_len,
                            kind,
                            forecast.steps[0].rounded()
                        );
                    }
                    Err(e) => {
                        failed += 1;
                        println!("   ✗ {:<22} {:>2}m  {}", check.scope.to_string(), check.input_len, e);
                    }
                }
            }
            CheckStatus::Missing => {
                missing += 1;
                println!("   ⚠ {:<22} {:>2}m  not available", check.scope.to_string(), check.input_len);
            }
            CheckStatus::Failed(reason) => {
                failed += 1;
                println!("   ✗ {:<22} {:>2}m  {}", check.scope.to_string(), check.input_len, reason);
            }
        }
    }

    println!(
        "\n📊 {} loaded, {} missing, {} failed ({} checked)",
        loaded,
        missing,
        failed,
        checks.len()
    );

    if failed > 0 {
        eprintln!("\n❌ {} model(s) failed validation", failed);
        std::process::exit(1);
    }
    println!("✓ Registry is usable");
    Ok(())
}
