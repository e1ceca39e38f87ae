// Route lookup engine with longest prefix matching

use super::Route;
use std::net::IpAddr;

pub struct RouteEngine<'a> {
    routes: &'a [Route],
}

impl<'a> RouteEngine<'a> {
    pub fn new(routes: &'a [Route]) -> Self {
        RouteEngine { routes }
    }

    /// Find the route the kernel would pick for `dest`.
    ///
    /// Longest prefix wins; among equal prefixes the lowest metric wins,
    /// with an unset metric counting as 0. Remaining ties go to the route
    /// listed first.
    pub fn lookup(&self, dest: IpAddr) -> Option<&'a Route> {
        let mut best_match: Option<(&'a Route, u8, u32)> = None;

        for route in self.routes {
            if !matches_destination(route, dest) {
                continue;
            }

            let prefix_len = route.destination.prefix_len();
            let metric = route.metric.unwrap_or(0);
            match best_match {
                None => best_match = Some((route, prefix_len, metric)),
                Some((_, best_len, best_metric))
                    if prefix_len > best_len
                        || (prefix_len == best_len && metric < best_metric) =>
                {
                    best_match = Some((route, prefix_len, metric));
                }
                _ => {}
            }
        }

        best_match.map(|(route, _, _)| route)
    }
}

/// `default` parses as 0.0.0.0/0 but stands for "any" in either family.
fn matches_destination(route: &Route, dest: IpAddr) -> bool {
    route.is_default() || route.destination.contains(&dest)
}
