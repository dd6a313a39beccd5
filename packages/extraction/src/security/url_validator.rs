//! SSRF protection for user-supplied website URLs.

use std::collections::HashSet;
use std::net::IpAddr;

use ipnet::IpNet;
use url::Url;

use crate::error::{SecurityError, SecurityResult};

const BLOCKED_HOSTS: &[&str] = &[
    "localhost",
    "0.0.0.0",
    "metadata.google.internal",
    "metadata.gke.internal",
    "instance-data",
];

const BLOCKED_CIDRS: &[&str] = &[
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "100.64.0.0/10",
    "169.254.0.0/16", // cloud metadata
    "127.0.0.0/8",
    "0.0.0.0/8",
    "::1/128",
    "fc00::/7",
    "fe80::/10",
];

/// Validates URLs before the analysis stage fetches them.
///
/// Rejects non-http(s) schemes, known internal hostnames and any address
/// (literal or resolved) inside a private range.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    allowed_schemes: HashSet<String>,
    blocked_hosts: HashSet<String>,
    blocked_cidrs: Vec<IpNet>,
    allowed_hosts: HashSet<String>,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlValidator {
    pub fn new() -> Self {
        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            blocked_hosts: BLOCKED_HOSTS.iter().map(|h| h.to_string()).collect(),
            blocked_cidrs: BLOCKED_CIDRS
                .iter()
                .filter_map(|cidr| cidr.parse().ok())
                .collect(),
            allowed_hosts: HashSet::new(),
        }
    }

    /// Allow a host unconditionally (tests, internal mirrors).
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into().to_ascii_lowercase());
        self
    }

    pub fn block_host(mut self, host: impl Into<String>) -> Self {
        self.blocked_hosts.insert(host.into().to_ascii_lowercase());
        self
    }

    pub fn block_cidr(mut self, cidr: IpNet) -> Self {
        self.blocked_cidrs.push(cidr);
        self
    }

    /// Parse user input, assuming `https://` when no scheme was typed.
    pub fn normalize(input: &str) -> SecurityResult<Url> {
        let input = input.trim();
        let candidate = if input.contains("://") {
            input.to_string()
        } else {
            format!("https://{input}")
        };
        Ok(Url::parse(&candidate)?)
    }

    /// Static checks: scheme, host name and literal IP.
    pub fn validate(&self, url: &str) -> SecurityResult<Url> {
        let parsed = Self::normalize(url)?;

        if !self.allowed_schemes.contains(parsed.scheme()) {
            return Err(SecurityError::DisallowedScheme(parsed.scheme().to_string()));
        }

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(SecurityError::NoHost)?
            .to_ascii_lowercase();

        if self.allowed_hosts.contains(&host) {
            return Ok(parsed);
        }

        if self.blocked_hosts.contains(&host) || host.ends_with(".localhost") {
            return Err(SecurityError::BlockedHost(host));
        }

        let bare = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = bare.parse::<IpAddr>() {
            self.check_ip(&ip)?;
        }

        Ok(parsed)
    }

    /// Static checks plus DNS resolution, so a public name pointing at a
    /// private address is rejected too.
    pub async fn validate_with_dns(&self, url: &str) -> SecurityResult<Url> {
        let parsed = self.validate(url)?;
        let host = parsed.host_str().ok_or(SecurityError::NoHost)?;

        if self.allowed_hosts.contains(&host.to_ascii_lowercase())
            || host
                .trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<IpAddr>()
                .is_ok()
        {
            return Ok(parsed);
        }

        let port = parsed.port_or_known_default().unwrap_or(443);
        let addrs = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| SecurityError::DnsResolution(e.to_string()))?;

        for addr in addrs {
            self.check_ip(&addr.ip()).map_err(|_| {
                SecurityError::BlockedCidr(format!("{host} resolved to {}", addr.ip()))
            })?;
        }

        Ok(parsed)
    }

    fn check_ip(&self, ip: &IpAddr) -> SecurityResult<()> {
        let ip = match ip {
            IpAddr::V6(v6) => v6
                .to_ipv4_mapped()
                .map(IpAddr::V4)
                .unwrap_or(IpAddr::V6(*v6)),
            v4 => *v4,
        };

        if self.blocked_cidrs.iter().any(|cidr| cidr.contains(&ip)) {
            return Err(SecurityError::BlockedCidr(ip.to_string()));
        }
        Ok(())
    }
}
