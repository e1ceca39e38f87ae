// Route collection - runs the listing command and parses each line

use super::Route;
use super::parser::parse_route_line;
use crate::error::{AppError, AppResult, ParseError};
use std::process::Command;

/// Source of raw `ip route` text.
///
/// The collector only needs the full listing as a string, so tests can hand
/// it canned output instead of running a command.
pub trait RouteSource {
    fn fetch(&self) -> AppResult<String>;
}

/// Runs an external routing-table listing command, `ip route list` by default.
#[derive(Debug, Clone)]
pub struct IpCommand {
    program: String,
    args: Vec<String>,
}

impl IpCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        IpCommand {
            program: program.into(),
            args,
        }
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for IpCommand {
    fn default() -> Self {
        IpCommand::new("ip", vec!["route".to_string(), "list".to_string()])
    }
}

impl RouteSource for IpCommand {
    /// Blocks until the command exits. Stdout and stderr are returned
    /// together, stdout first.
    fn fetch(&self) -> AppResult<String> {
        let command_line = self.command_line();
        tracing::debug!("Executing {}", command_line);

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| {
                AppError::CollectionFailed(format!("error running {}: {}", command_line, e))
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(AppError::CollectionFailed(format!(
                "error running {}: {}: {}",
                command_line,
                output.status,
                stderr.trim()
            )));
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&stderr);
        Ok(text)
    }
}

/// A line that could not be parsed and was left out of the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_number: usize,
    pub line: String,
    pub error: ParseError,
}

/// Result of one collection pass
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub routes: Vec<Route>,
    pub skipped: Vec<SkippedLine>,
}

pub struct RouteCollector<S> {
    source: S,
}

impl<S: RouteSource> RouteCollector<S> {
    pub fn new(source: S) -> Self {
        RouteCollector { source }
    }

    /// Fetch the table and parse every non-empty line.
    ///
    /// Only a failure of the source aborts; bad lines are logged and
    /// reported in `skipped`.
    pub fn collect(&self) -> AppResult<Collection> {
        let output = self.source.fetch()?;
        let collection = parse_table(&output);

        tracing::debug!(
            "Collected {} route(s), skipped {} line(s)",
            collection.routes.len(),
            collection.skipped.len()
        );
        Ok(collection)
    }

    pub fn routes(&self) -> AppResult<Vec<Route>> {
        self.collect().map(|collection| collection.routes)
    }
}

/// Parse a full listing, keeping input order.
pub fn parse_table(output: &str) -> Collection {
    let mut collection = Collection::default();

    for (index, line) in output.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match parse_route_line(line) {
            Ok(route) => collection.routes.push(route),
            Err(error) => {
                tracing::warn!("Failed to parse route {:?}: {}", line, error);
                collection.skipped.push(SkippedLine {
                    line_number: index + 1,
                    line: line.to_string(),
                    error,
                });
            }
        }
    }

    collection
}

/// Read the main routing table with `ip route list`.
pub fn get_routes() -> AppResult<Vec<Route>> {
    RouteCollector::new(IpCommand::default()).routes()
}
