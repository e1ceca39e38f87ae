// Parser for the text output of `ip route list`

use super::Route;
use crate::error::ParseError;
use ipnet::{IpNet, Ipv4Net};
use std::net::IpAddr;

/// Parse a single `ip route` line into a `Route`.
///
/// The first token is the destination (`default` or a CIDR). After it,
/// `via`, `dev`, `proto`, `scope`, `src` and `metric` each take the next
/// token as their value. Any other token is skipped on its own, without
/// consuming a value, so flags like `linkdown` or `onlink` are harmless.
pub fn parse_route_line(line: &str) -> Result<Route, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let destination = match tokens.first().copied() {
        None => return Err(ParseError::EmptyLine),
        Some("default") => IpNet::V4(Ipv4Net::default()),
        Some(token) => parse_destination(token)?,
    };

    let mut route = Route::new(destination);

    let mut i = 1;
    while i < tokens.len() {
        let Some(keyword) = Keyword::from_token(tokens[i]) else {
            i += 1;
            continue;
        };

        let value = tokens
            .get(i + 1)
            .copied()
            .ok_or_else(|| ParseError::TruncatedValue(tokens[i].to_string()))?;

        match keyword {
            Keyword::Via => route.via = parse_addr("via", value),
            Keyword::Dev => route.dev = value.to_string(),
            Keyword::Proto => route.proto = Some(value.to_string()),
            Keyword::Scope => route.scope = Some(value.to_string()),
            Keyword::Src => route.src = parse_addr("src", value),
            Keyword::Metric => {
                route.metric = value.parse().ok();
                if route.metric.is_none() {
                    tracing::debug!("Ignoring malformed metric {:?} in {:?}", value, line);
                }
            }
        }
        i += 2;
    }

    Ok(route)
}

/// Value-bearing keywords understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Via,
    Dev,
    Proto,
    Scope,
    Src,
    Metric,
}

impl Keyword {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "via" => Some(Keyword::Via),
            "dev" => Some(Keyword::Dev),
            "proto" => Some(Keyword::Proto),
            "scope" => Some(Keyword::Scope),
            "src" => Some(Keyword::Src),
            "metric" => Some(Keyword::Metric),
            _ => None,
        }
    }
}

/// Parse a CIDR destination, clearing any host bits.
///
/// Leading zeros are rejected in both the address (`010.0.0.0/8`) and the
/// prefix length (`10.0.0.0/08`).
fn parse_destination(token: &str) -> Result<IpNet, ParseError> {
    let invalid = || ParseError::InvalidDestination(token.to_string());

    let (addr, prefix_len) = token.split_once('/').ok_or_else(invalid)?;
    if addr.parse::<IpAddr>().is_err() || (prefix_len.len() > 1 && prefix_len.starts_with('0')) {
        return Err(invalid());
    }

    token
        .parse::<IpNet>()
        .map(|net| net.trunc())
        .map_err(|_| invalid())
}

fn parse_addr(keyword: &str, value: &str) -> Option<IpAddr> {
    let addr = value.parse().ok();
    if addr.is_none() {
        tracing::debug!("Ignoring malformed {} address {:?}", keyword, value);
    }
    addr
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> IpNet {
        s.parse().unwrap()
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_route() {
        let route =
            parse_route_line("default via 192.168.1.1 dev eth0 proto dhcp metric 100").unwrap();

        assert_eq!(
            route,
            Route {
                destination: net("0.0.0.0/0"),
                via: Some(ip("192.168.1.1")),
                dev: "eth0".to_string(),
                proto: Some("dhcp".to_string()),
                scope: None,
                src: None,
                metric: Some(100),
            }
        );
    }

    #[test]
    fn test_default_is_any_network_regardless_of_fields() {
        for line in ["default", "default dev wlan0", "default via 10.1.1.1 metric 5 onlink"] {
            let route = parse_route_line(line).unwrap();
            assert_eq!(route.destination, net("0.0.0.0/0"), "line: {}", line);
            assert_eq!(route.destination.prefix_len(), 0);
        }
    }

    #[test]
    fn test_cidr_route_with_gateway() {
        let route = parse_route_line("172.16.0.0/16 via 10.0.0.1 dev eth1").unwrap();

        assert_eq!(route.destination, net("172.16.0.0/16"));
        assert_eq!(route.via, Some(ip("10.0.0.1")));
        assert_eq!(route.dev, "eth1");
        assert_eq!(route.proto, None);
        assert_eq!(route.metric, None);
    }

    #[test]
    fn test_cidr_route_without_gateway() {
        let route =
            parse_route_line("10.0.0.0/24 dev eth1 proto kernel scope link src 10.0.0.5").unwrap();

        assert_eq!(
            route,
            Route {
                destination: net("10.0.0.0/24"),
                via: None,
                dev: "eth1".to_string(),
                proto: Some("kernel".to_string()),
                scope: Some("link".to_string()),
                src: Some(ip("10.0.0.5")),
                metric: None,
            }
        );
    }

    #[test]
    fn test_route_with_metric() {
        let route = parse_route_line(
            "192.168.1.0/24 dev eth0 proto kernel scope link src 192.168.1.100 metric 100",
        )
        .unwrap();

        assert_eq!(route.src, Some(ip("192.168.1.100")));
        assert_eq!(route.metric, Some(100));
    }

    #[test]
    fn test_invalid_destination() {
        assert_eq!(
            parse_route_line("not_a_cidr dev eth0"),
            Err(ParseError::InvalidDestination("not_a_cidr".to_string()))
        );
        // A bare address without a prefix length is not a network.
        assert_eq!(
            parse_route_line("10.0.0.1 dev eth0"),
            Err(ParseError::InvalidDestination("10.0.0.1".to_string()))
        );
        assert_eq!(
            parse_route_line("10.0.0.0/33 dev eth0"),
            Err(ParseError::InvalidDestination("10.0.0.0/33".to_string()))
        );
    }

    #[test]
    fn test_leading_zeros_rejected() {
        assert_eq!(
            parse_route_line("010.0.0.0/8 dev eth0"),
            Err(ParseError::InvalidDestination("010.0.0.0/8".to_string()))
        );
        assert_eq!(
            parse_route_line("10.0.0.0/08 dev eth0"),
            Err(ParseError::InvalidDestination("10.0.0.0/08".to_string()))
        );
        // A zero-length prefix is still a single digit.
        assert!(parse_route_line("0.0.0.0/0 dev eth0").is_ok());
    }

    #[test]
    fn test_truncated_value() {
        assert_eq!(
            parse_route_line("default dev eth0 via"),
            Err(ParseError::TruncatedValue("via".to_string()))
        );
        assert_eq!(
            parse_route_line("10.0.0.0/8 metric"),
            Err(ParseError::TruncatedValue("metric".to_string()))
        );
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(parse_route_line("   \t "), Err(ParseError::EmptyLine));
    }

    #[test]
    fn test_malformed_metric_is_absent() {
        let route = parse_route_line("10.0.0.0/8 dev eth0 metric high").unwrap();
        assert_eq!(route.metric, None);
        assert_eq!(route.dev, "eth0");

        let route = parse_route_line("10.0.0.0/8 dev eth0 metric -1").unwrap();
        assert_eq!(route.metric, None);
    }

    #[test]
    fn test_zero_metric_is_present() {
        let route = parse_route_line("10.0.0.0/8 dev eth0 metric 0").unwrap();
        assert_eq!(route.metric, Some(0));
    }

    #[test]
    fn test_unknown_tokens_skip_one() {
        let route =
            parse_route_line("10.0.0.0/24 dev eth0 proto kernel linkdown scope link").unwrap();
        assert_eq!(route.scope, Some("link".to_string()));

        // `pref` takes a value in real output but is not recognised, so its
        // value is skipped as a second unknown token.
        let route = parse_route_line("fe80::/64 dev eth0 proto kernel metric 256 pref medium")
            .unwrap();
        assert_eq!(route.destination, net("fe80::/64"));
        assert_eq!(route.metric, Some(256));
    }

    #[test]
    fn test_unknown_keyword_value_is_reinterpreted() {
        // `table dev` skips `table` only; `dev` is then read as a keyword.
        let route = parse_route_line("10.0.0.0/8 table dev eth9").unwrap();
        assert_eq!(route.dev, "eth9");
    }

    #[test]
    fn test_malformed_address_is_absent() {
        let route = parse_route_line("10.0.0.0/8 via gateway dev eth0 src nowhere").unwrap();
        assert_eq!(route.via, None);
        assert_eq!(route.src, None);
        assert_eq!(route.dev, "eth0");
    }

    #[test]
    fn test_host_bits_are_cleared() {
        let route = parse_route_line("192.168.1.77/24 dev eth0").unwrap();
        assert_eq!(route.destination, net("192.168.1.0/24"));
    }

    #[test]
    fn test_cidr_round_trip() {
        for cidr in ["0.0.0.0/0", "10.0.0.0/8", "192.168.1.128/25", "10.9.8.7/32", "2001:db8::/32"] {
            let route = parse_route_line(&format!("{} dev lo", cidr)).unwrap();
            assert_eq!(route.destination, net(cidr));
            assert_eq!(route.destination.to_string(), cidr);
        }
    }

    #[test]
    fn test_repeated_keyword_last_wins() {
        let route = parse_route_line("10.0.0.0/8 dev eth0 dev eth1").unwrap();
        assert_eq!(route.dev, "eth1");
    }

    #[test]
    fn test_extra_whitespace() {
        let route = parse_route_line("  10.0.0.0/8\tdev   eth0  metric 5 ").unwrap();
        assert_eq!(route.dev, "eth0");
        assert_eq!(route.metric, Some(5));
    }
}
