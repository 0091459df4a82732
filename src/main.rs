//! Malaysia Flood Prediction System - command-line dashboard
//!
//! Prints the numbers behind each dashboard view:
//!
//! ```text
//! mfps_dashboard summary                         # dataset size and flood share
//! mfps_dashboard overview [--state Kelantan]     # national or state overview
//! mfps_dashboard pattern [--state S] [--from Y] [--to Y]
//! mfps_dashboard map --year 2010 [--state S]     # district risk + annotated GeoJSON
//! mfps_dashboard forecast [--state S] [--values 210,180,...] [--horizon 6]
//! mfps_dashboard classify 312.5 [--annual]
//! mfps_dashboard admin --username U --password P # diagnostics behind login
//! ```
//!
//! `--json` switches any view to machine-readable output.
//!
//! Environment:
//!   MFPS_CONFIG - configuration file (default: mfps.toml)
//!   RUST_LOG    - log verbosity (default: info)

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::error::Error;
use std::process;

use mfps_dashboard::analysis::diagnostics::diagnostics;
use mfps_dashboard::analysis::district_map::{build_district_map, popup_background};
use mfps_dashboard::analysis::groupings::{filter_state, mean_annual_by_year, sorted_years};
use mfps_dashboard::analysis::overview::{dataset_summary, national_overview, state_overview};
use mfps_dashboard::analysis::patterns::{available_range, rainfall_pattern};
use mfps_dashboard::auth::{AdminSession, CredentialStore};
use mfps_dashboard::config::{load_config_default, Config};
use mfps_dashboard::forecast::registry::ModelRegistry;
use mfps_dashboard::forecast::{run_forecast, ForecastRequest, ForecastScope};
use mfps_dashboard::ingest::boundaries::load_boundaries;
use mfps_dashboard::ingest::records::load_records;
use mfps_dashboard::model::RecordSet;
use mfps_dashboard::risk::thresholds::{classify_annual, RiskScale};

#[derive(Parser)]
#[command(name = "mfps_dashboard", about = "Malaysia flood prediction dashboard")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dataset size, coverage and flood share
    Summary,
    /// National overview, or one state's overview
    Overview {
        #[arg(long)]
        state: Option<String>,
    },
    /// Yearly totals, 5-year trend and monthly distribution
    Pattern {
        #[arg(long)]
        state: Option<String>,
        /// First year of the range (default: earliest available)
        #[arg(long)]
        from: Option<i32>,
        /// Last year of the range (default: latest available)
        #[arg(long)]
        to: Option<i32>,
    },
    /// District annual rainfall and flood risk for one year
    Map {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        state: Option<String>,
    },
    /// Recursive rainfall forecast from recent monthly values
    Forecast {
        /// Use the model trained for this state instead of the nationwide one
        #[arg(long)]
        state: Option<String>,
        /// Observed monthly rainfall in mm, oldest first (6 to 11 values)
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        values: Vec<f64>,
        /// Input months when --values is omitted (each set to the default value)
        #[arg(long, conflicts_with = "values")]
        input_months: Option<usize>,
        /// Months to predict (1 to 12)
        #[arg(long)]
        horizon: Option<usize>,
        /// Also print historical average annual rainfall per year
        #[arg(long)]
        history: bool,
    },
    /// Classify a rainfall value
    Classify {
        #[arg(allow_negative_numbers = true)]
        value_mm: f64,
        /// Use the annual scale instead of the monthly one
        #[arg(long)]
        annual: bool,
    },
    /// Dataset diagnostics (requires admin login)
    Admin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

fn main() {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    let cli = Cli::parse();

    let config = match load_config_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &config) {
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli, config: &Config) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Commands::Summary => summary(cli.json, config),
        Commands::Overview { state } => overview(cli.json, config, state.as_deref()),
        Commands::Pattern { state, from, to } => {
            pattern(cli.json, config, state.as_deref(), *from, *to)
        }
        Commands::Map { year, state } => map(cli.json, config, *year, state.as_deref()),
        Commands::Forecast {
            state,
            values,
            input_months,
            horizon,
            history,
        } => forecast(
            cli.json,
            config,
            state.as_deref(),
            values,
            *input_months,
            *horizon,
            *history,
        ),
        Commands::Classify { value_mm, annual } => classify(cli.json, *value_mm, *annual),
        Commands::Admin { username, password } => admin(cli.json, config, username, password),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_dataset(config: &Config) -> Result<RecordSet, Box<dyn Error>> {
    Ok(load_records(&config.data.records)?)
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

fn summary(json: bool, config: &Config) -> Result<(), Box<dyn Error>> {
    let summary = dataset_summary(&load_dataset(config)?);
    if json {
        return print_json(&summary);
    }

    println!("🌊 Malaysia Flood Dataset");
    println!("=========================\n");
    println!("   Total records:  {}", summary.records);
    println!("   States covered: {}", summary.states);
    println!("   Districts:      {}", summary.districts);
    println!("   Years of data:  {}", summary.years);
    println!(
        "   Flood cases:    {} ({:.1}%), no flood: {}",
        summary.flood_cases, summary.flood_pct, summary.no_flood_cases
    );
    Ok(())
}

fn overview(json: bool, config: &Config, state: Option<&str>) -> Result<(), Box<dyn Error>> {
    let records = load_dataset(config)?;

    let Some(state) = state else {
        let overview = national_overview(&records);
        if json {
            return print_json(&overview);
        }

        println!("📊 Malaysia Overview");
        println!("====================\n");
        println!("   Total flood events:  {}", overview.total_floods);
        if let Some(avg) = overview.avg_annual_rainfall {
            println!("   Avg annual rainfall: {:.1} mm", avg);
        }
        println!(
            "   Most flood-prone:    {}",
            overview.most_flood_prone_state.as_deref().unwrap_or("-")
        );
        if let Some(wettest) = &overview.wettest_district {
            println!("   Wettest district:    {} ({:.1} mm)", wettest.name, wettest.value);
        }

        println!("\n   Flood events by state:");
        for row in &overview.floods_by_state {
            println!("      {:<22} {:>4}", row.name, row.count);
        }

        println!("\n   Year   Avg annual (mm)   Floods");
        for row in &overview.yearly {
            println!("   {}   {:>15.1}   {:>6}", row.year, row.mean_annual, row.flood_events);
        }
        return Ok(());
    };

    let Some(overview) = state_overview(&records, state) else {
        println!("⚠ No records for state '{}'", state);
        return Ok(());
    };
    if json {
        return print_json(&overview);
    }

    println!("📊 {} Overview", overview.state);
    println!("=========================\n");
    println!("   Flood events:        {}", overview.floods);
    println!("   Avg annual rainfall: {:.1} mm", overview.avg_annual_rainfall);
    println!(
        "   Most flood-prone:    {}",
        overview.most_flood_prone_district.as_deref().unwrap_or("-")
    );

    println!("\n   Flood events by district:");
    for row in &overview.district_floods {
        println!("      {:<22} {:>4}", row.name, row.count);
    }

    println!("\n   Monthly rainfall contribution:");
    for m in &overview.monthly_contribution {
        println!("      {}  {:>10.1} mm", m.month, m.value);
    }

    println!("\n   Flood trend:");
    for y in &overview.flood_trend {
        println!("      {}  {:>3}", y.year, y.count);
    }
    Ok(())
}

fn pattern(
    json: bool,
    config: &Config,
    state: Option<&str>,
    from: Option<i32>,
    to: Option<i32>,
) -> Result<(), Box<dyn Error>> {
    let records = load_dataset(config)?;

    let Some((min_year, max_year)) = available_range(&records, state) else {
        println!("⚠ No records for {}", state.unwrap_or("Malaysia"));
        return Ok(());
    };
    let pattern = rainfall_pattern(
        &records,
        state,
        from.unwrap_or(min_year),
        to.unwrap_or(max_year),
    );
    if json {
        return print_json(&pattern);
    }

    println!(
        "🌧 Rainfall Pattern: {} ({}-{})",
        pattern.scope, pattern.from_year, pattern.to_year
    );
    println!("==========================================\n");
    match pattern.long_term_average {
        Some(avg) => println!("   Long-term average: {:.1} mm", avg),
        None => {
            println!("⚠ No data in the selected range");
            return Ok(());
        }
    }

    println!("\n   Year   Total (mm)    5-yr MA (mm)");
    for (total, ma) in pattern.yearly_totals.iter().zip(&pattern.moving_average) {
        println!("   {}   {:>10.1}   {:>12.1}", total.year, total.value, ma.value);
    }

    println!("\n   Monthly distribution:   selected (mm)   all years (mm)");
    for (m, all) in pattern.monthly_distribution.iter().zip(&pattern.all_years_monthly) {
        println!("      {}  {:>22.1}   {:>14.1}", m.month, m.value, all.value);
    }
    Ok(())
}

fn map(
    json: bool,
    config: &Config,
    year: Option<i32>,
    state: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let records = load_dataset(config)?;
    let boundaries = load_boundaries(&config.data.boundaries)?;

    let year = match year.or_else(|| sorted_years(&records.view()).first().copied()) {
        Some(year) => year,
        None => {
            println!("⚠ Dataset is empty");
            return Ok(());
        }
    };

    let map = build_district_map(&records, &boundaries, year, state);
    if json {
        return print_json(&map);
    }

    println!(
        "🗺 Flood Risk Map: {} {}",
        state.unwrap_or("All States"),
        year
    );
    println!("==================================\n");
    println!(
        "   Centre: ({}, {})  zoom {}",
        map.view.center[0], map.view.center[1], map.view.zoom
    );
    for (tier, count) in map.tier_counts() {
        println!("   {:<12} {:>3} districts", tier.label(), count);
    }
    println!("\n   {:<18} {:<22} {:>12}  Risk", "State", "District", "Annual (mm)");
    for d in &map.districts {
        println!(
            "   {:<18} {:<22} {:>12.2}  {} {}",
            d.state,
            d.district,
            d.annual_rainfall,
            d.flood_risk.as_str(),
            popup_background(d.flood_risk)
        );
    }
    println!(
        "\n✓ {} of {} districts matched a boundary",
        map.features.features.len(),
        map.districts.len()
    );
    Ok(())
}

fn forecast(
    json: bool,
    config: &Config,
    state: Option<&str>,
    values: &[f64],
    input_months: Option<usize>,
    horizon: Option<usize>,
    history: bool,
) -> Result<(), Box<dyn Error>> {
    let window = if values.is_empty() {
        let n = input_months.unwrap_or(config.forecast.input_months);
        vec![config.forecast.default_value_mm; n]
    } else {
        values.to_vec()
    };
    let horizon = horizon.unwrap_or(config.forecast.horizon);
    let request = ForecastRequest::new(window, horizon)?;

    let scope = match state {
        Some(name) => ForecastScope::State(name.to_string()),
        None => ForecastScope::Overall,
    };

    if history && !json {
        let records = load_dataset(config)?;
        let view = records.view();
        let rows = match state {
            Some(name) => mean_annual_by_year(&filter_state(&view, name)),
            None => mean_annual_by_year(&view),
        };
        println!("📈 Average annual rainfall ({})", scope);
        for row in &rows {
            println!(
                "   {}  {:>8.1} mm  {}",
                row.year,
                row.value,
                classify_annual(row.value)
            );
        }
        println!();
    }

    let registry = ModelRegistry::from_config(config);
    let forecast = match run_forecast(&registry, &scope, &request) {
        Ok(forecast) => forecast,
        Err(e) if e.is_unavailable() => {
            println!("⚠ Model not available: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        return print_json(&forecast);
    }

    println!(
        "🔮 Rainfall forecast: {} ({} input months, {} ahead)",
        scope,
        request.input_len(),
        request.horizon()
    );
    println!("==================================================\n");
    println!("   {:<10} {:>16}  Flood Risk", "Month", "Predicted (mm)");
    for step in &forecast.steps {
        println!(
            "   {:<10} {:>16.2}  {}",
            step.label,
            step.rounded(),
            step.risk.label()
        );
    }
    println!();
    for line in RiskScale::Monthly.legend() {
        println!("   {}", line);
    }
    Ok(())
}

fn classify(json: bool, value_mm: f64, annual: bool) -> Result<(), Box<dyn Error>> {
    if !value_mm.is_finite() || value_mm < 0.0 {
        return Err(format!("Rainfall must be a non-negative number, got {}", value_mm).into());
    }
    let scale = if annual { RiskScale::Annual } else { RiskScale::Monthly };
    let tier = scale.classify(value_mm);

    if json {
        return print_json(&serde_json::json!({
            "value_mm": value_mm,
            "scale": scale,
            "tier": tier,
            "label": tier.label(),
            "color": tier.color(),
        }));
    }

    println!("{:.2} mm ({:?}): {} {}", value_mm, scale, tier.label(), tier.color());
    Ok(())
}

fn admin(json: bool, config: &Config, username: &str, password: &str) -> Result<(), Box<dyn Error>> {
    let store = CredentialStore::load(&config.data.credentials)?;
    let mut session = AdminSession::new();
    session.login(&store, username, password)?;
    let user = session.require()?;

    let report = diagnostics(&load_dataset(config)?);
    if json {
        return print_json(&serde_json::json!({
            "session": &session,
            "diagnostics": report,
        }));
    }

    println!("🔐 Admin Dashboard");
    println!("==================\n");
    println!("   Welcome, {}.\n", user);
    println!("   Total records:  {}", report.records);
    println!("   Total columns:  {}", report.columns);
    println!("   Missing values: {}", report.missing_values);
    println!("   Flood ratio:    {:.3}\n", report.flood_ratio);
    println!("   Month        Min        Mean         Max");
    for m in &report.monthly {
        println!("   {}   {:>9.1}   {:>9.1}   {:>9.1}", m.month, m.min, m.mean, m.max);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
