//! PhishGuard CLI - classify URLs from the command line
//!
//! ```text
//! phishguard [--json] <url>...
//! ```
//!
//! Configuration comes from the same `PHISHGUARD_*` environment variables as
//! the web server.

use std::process::ExitCode;

use phishguard_core::constants::{APP_NAME, APP_VERSION};
use phishguard_core::{Detector, DetectorConfig};

const USAGE: &str = "usage: phishguard [--json] <url>...";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut json = false;
    let mut urls = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{} {}\n{}", APP_NAME, APP_VERSION, USAGE);
                return ExitCode::SUCCESS;
            }
            _ => urls.push(arg),
        }
    }

    if urls.is_empty() {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    }

    let config = DetectorConfig::from_env();
    let detector = match Detector::from_config(&config) {
        Ok(detector) => detector,
        Err(e) => {
            log::error!("Cannot start without a model ({}): {}", config.model_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut analyses = Vec::with_capacity(urls.len());
    let mut failed = false;
    for url in &urls {
        match detector.analyze(url) {
            Ok(analysis) => analyses.push(analysis),
            Err(e) => {
                log::error!("Classification failed for {:?}: {}", url, e);
                failed = true;
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&analyses) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                log::error!("Failed to serialize results: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for analysis in &analyses {
            println!("{}\t{:.2}%\t{}", analysis.headline, analysis.confidence, analysis.url);
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
