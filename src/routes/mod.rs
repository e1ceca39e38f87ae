// Routes module - routing table parsing, collection and lookups

pub mod collector;
pub mod lookup;
pub mod parser;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// One entry of the kernel routing table, as listed by `ip route list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub destination: IpNet, // CIDR, `default` becomes 0.0.0.0/0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<IpAddr>,
    #[serde(default)]
    pub dev: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proto: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<IpAddr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<u32>,
}

impl Route {
    /// A route to `destination` with every optional attribute unset.
    pub fn new(destination: IpNet) -> Self {
        Route {
            destination,
            via: None,
            dev: String::new(),
            proto: None,
            scope: None,
            src: None,
            metric: None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.destination.prefix_len() == 0
    }
}

/// Renders the route back in `ip route` order.
impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            write!(f, "default")?;
        } else {
            write!(f, "{}", self.destination)?;
        }
        if let Some(via) = self.via {
            write!(f, " via {}", via)?;
        }
        if !self.dev.is_empty() {
            write!(f, " dev {}", self.dev)?;
        }
        if let Some(proto) = &self.proto {
            write!(f, " proto {}", proto)?;
        }
        if let Some(scope) = &self.scope {
            write!(f, " scope {}", scope)?;
        }
        if let Some(src) = self.src {
            write!(f, " src {}", src)?;
        }
        if let Some(metric) = self.metric {
            write!(f, " metric {}", metric)?;
        }
        Ok(())
    }
}

/// Snapshot of the routing table of the local host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingTable {
    pub hostname: String,
    pub routes: Vec<Route>,
    pub timestamp: String,
}

impl RoutingTable {
    pub fn new(routes: Vec<Route>) -> Self {
        RoutingTable {
            hostname: get_hostname(),
            routes,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}
