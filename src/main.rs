use std::io::Write;
use std::process::ExitCode;

use route_lister::config::{Config, OutputFormat};
use route_lister::{AppError, AppResult, IpCommand, Route, RouteCollector, RouteEngine, RoutingTable};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let config = match Config::load().map_err(|e| AppError::Config(e.to_string())) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}\n{}", e, e.user_message());
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging; stdout is reserved for the table
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.as_str().to_lowercase()))
        .with_writer(std::io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> AppResult<()> {
    let source = IpCommand::new(config.program.clone(), config.args.clone());
    let collection = RouteCollector::new(source).collect()?;

    if !collection.skipped.is_empty() {
        tracing::info!("{} line(s) could not be parsed", collection.skipped.len());
    }

    let routes: Vec<Route> = match config.lookup {
        Some(dest) => {
            let hit = RouteEngine::new(&collection.routes).lookup(dest).cloned();
            if hit.is_none() {
                tracing::warn!("No route to {}", dest);
            }
            hit.into_iter().collect()
        }
        None => collection.routes,
    };

    let mut stdout = std::io::stdout().lock();
    match config.format {
        OutputFormat::Json => {
            let table = RoutingTable::new(routes);
            if config.pretty {
                serde_json::to_writer_pretty(&mut stdout, &table)?;
            } else {
                serde_json::to_writer(&mut stdout, &table)?;
            }
            writeln!(stdout)?;
        }
        OutputFormat::Text => {
            for route in &routes {
                writeln!(stdout, "{}", route)?;
            }
        }
    }

    Ok(())
}
