//! Typed access to the kernel routing table.
//!
//! Runs `ip route list` and parses each line into a [`Route`]. Lines that
//! cannot be parsed are logged and skipped; only a failure to run the
//! command is reported as an error.

pub mod config;
pub mod error;
pub mod routes;

pub use error::{AppError, AppResult, ParseError};
pub use routes::collector::{
    Collection, IpCommand, RouteCollector, RouteSource, SkippedLine, get_routes, parse_table,
};
pub use routes::lookup::RouteEngine;
pub use routes::parser::parse_route_line;
pub use routes::{Route, RoutingTable};
