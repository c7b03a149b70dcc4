//! Advertised network endpoints of a peer.
//!
//! Peers publish endpoints as single space-separated lines such as
//! `BASIC_MERKLED_API g1.example.org 81.2.3.4 2001:db8::1 443`.
//! The first token names the API; the remaining tokens are a DNS name, an
//! IPv4 and/or IPv6 address, a port, and optionally a path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub api: String,
    pub dns: Option<String>,
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
    pub port: Option<u16>,
    pub path: Option<String>,
    /// The endpoint line exactly as advertised.
    pub raw: String,
}

impl Endpoint {
    /// Resolve an endpoint line into its parts.
    ///
    /// Never fails: unrecognised tokens are kept as the DNS name (first one)
    /// or the path (after the port), and `raw` always preserves the input.
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        let api = tokens.next().unwrap_or_default().to_string();
        let mut endpoint = Self {
            api,
            dns: None,
            ipv4: None,
            ipv6: None,
            port: None,
            path: None,
            raw: line.to_string(),
        };
        for token in tokens {
            if endpoint.port.is_some() {
                endpoint.path.get_or_insert_with(|| token.to_string());
            } else if let Ok(v4) = token.parse::<Ipv4Addr>() {
                endpoint.ipv4 = Some(v4);
            } else if let Ok(v6) = token.parse::<Ipv6Addr>() {
                endpoint.ipv6 = Some(v6);
            } else if let Ok(port) = token.parse::<u16>() {
                endpoint.port = Some(port);
            } else if endpoint.dns.is_none() {
                endpoint.dns = Some(token.to_string());
            }
        }
        endpoint
    }

    /// Best host to dial: DNS name, then IPv4, then IPv6.
    pub fn host(&self) -> Option<String> {
        self.dns
            .clone()
            .or_else(|| self.ipv4.map(|ip| ip.to_string()))
            .or_else(|| self.ipv6.map(|ip| format!("[{ip}]")))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
