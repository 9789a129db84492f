use rust_neural_gradcheck::config::{load_config, SanityCheckConfig};
use rust_neural_gradcheck::gradcheck::GradCheckReport;
use rust_neural_gradcheck::sanity::run_sanity_check;
use std::process;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

// Gradient sanity check for the two-layer sigmoid/softmax network.
// Usage: sanity_check [config.json]

// Config from the first argument, or the built-in 10-5-10 check with 20 samples.
fn config_from_args(args: &[String]) -> rust_neural_gradcheck::Result<SanityCheckConfig> {
    match args.get(1) {
        Some(path) => load_config(path),
        None => Ok(SanityCheckConfig::default()),
    }
}

fn log_level(name: &str) -> Level {
    match name {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

// Human-readable summary; at most ten mismatches are listed.
fn print_report(report: &GradCheckReport) {
    println!("Baseline cost: {:.6}", report.baseline_cost);
    println!(
        "Checked {} parameters, max relative error {:.3e}",
        report.checked, report.max_relative_error
    );

    if report.passed() {
        println!("Gradient check passed!");
        return;
    }

    println!("Gradient check failed: {} mismatches", report.mismatches.len());
    for mismatch in report.mismatches.iter().take(10) {
        println!(
            "  index {}: numerical {:.10}, analytical {:.10}, relative error {:.3e}",
            mismatch.index, mismatch.numerical, mismatch.analytical, mismatch.relative_error
        );
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let config = match config_from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            process::exit(1);
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&config.log_level))
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    println!("Running sanity check...");
    let start = Instant::now();
    let report = match run_sanity_check(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Sanity check error: {}", e);
            process::exit(1);
        }
    };
    print_report(&report);
    println!("Elapsed: {:.3} seconds", start.elapsed().as_secs_f64());

    if !report.passed() {
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(log_level("debug"), Level::DEBUG);
        assert_eq!(log_level("info"), Level::INFO);
        assert_eq!(log_level("unknown"), Level::INFO);
    }

    #[test]
    fn test_config_from_args_without_path() {
        let args = vec!["sanity_check".to_string()];
        let config = config_from_args(&args).unwrap();
        assert_eq!(config, SanityCheckConfig::default());
    }
}
