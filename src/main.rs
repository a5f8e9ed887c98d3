//! Station sizer entry point: CLI wiring and config-driven sizer construction.

use std::path::Path;
use std::process;

use station_sizer::catalog::Catalog;
use station_sizer::cli::{self, CliOptions};
use station_sizer::config::AppConfig;
use station_sizer::io::export::export_recommendations_csv;
use station_sizer::sizing::Sizer;
use station_sizer::telemetry;
use tracing::error;

fn load_config(cli: &CliOptions) -> AppConfig {
    let mut config = match cli.config {
        Some(ref path) => match AppConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    // Command-line overrides
    if let Some(ref dir) = cli.catalog {
        config.catalog.dir = dir.clone();
    }
    #[cfg(feature = "api")]
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    config
}

/// Sizes the single request described on the command line.
fn run_once(cli: &CliOptions, sizer: &Sizer) -> Result<(), String> {
    let request = cli.to_request()?.into_profile_request().map_err(|e| e.to_string())?;
    let report = sizer.size(request).map_err(|e| {
        if !e.is_client_error() {
            error!(error = %e, "sizing failed");
        }
        e.to_string()
    })?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("failed to serialize report: {e}"))?;
        println!("{json}");
    } else {
        println!("{report}");
    }

    if let Some(ref path) = cli.recommendations_out {
        export_recommendations_csv(&report.recommendations, path)
            .map_err(|e| format!("failed to write CSV: {e}"))?;
        eprintln!("Recommendations written to {}", path.display());
    }
    Ok(())
}

#[cfg(feature = "api")]
fn run_server(config: &AppConfig, sizer: Sizer) -> Result<(), String> {
    use std::sync::Arc;

    let addr = config.server.socket_addr().map_err(|e| e.to_string())?;
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("failed to create tokio runtime: {e}"))?;
    rt.block_on(station_sizer::api::serve(Arc::new(sizer), addr))
        .map_err(|e| format!("server error: {e}"))
}

fn main() {
    telemetry::init_tracing();

    let cli = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    let config = load_config(&cli);

    // The catalog must load before anything is served.
    let catalog = match Catalog::from_dir(Path::new(&config.catalog.dir)) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    let sizer = Sizer::from_config(catalog, &config);

    #[cfg(feature = "api")]
    if cli.serve {
        if let Err(e) = run_server(&config, sizer) {
            eprintln!("error: {e}");
            process::exit(1);
        }
        return;
    }

    if let Err(e) = run_once(&cli, &sizer) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
