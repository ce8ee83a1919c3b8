//! Origin allow-list for WebSocket upgrades.
//!
//! Entries look like `https://tradepost.example`, `https://*.tradepost.example`
//! (any subdomain) or `http://localhost:*` (any non-zero port). An entry
//! without a port matches the scheme's default port only.

use std::str::FromStr;

use url::Url;

/// Errors raised while parsing an allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OriginPatternError {
    #[error("origin pattern `{0}` must look like scheme://host[:port]")]
    Malformed(String),
    #[error("origin pattern `{0}` has an invalid port")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostPattern {
    Exact(String),
    /// Matches strict subdomains; stored with its leading dot.
    Subdomains(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PortPattern {
    Default,
    Any,
    Exact(u16),
}

/// One allowed origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPattern {
    scheme: String,
    host: HostPattern,
    port: PortPattern,
}

impl FromStr for OriginPattern {
    type Err = OriginPatternError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || OriginPatternError::Malformed(raw.to_owned());
        let trimmed = raw.trim().trim_end_matches('/');
        let (scheme, authority) = trimmed.split_once("://").ok_or_else(malformed)?;
        if scheme.is_empty() || authority.is_empty() || authority.contains('/') {
            return Err(malformed());
        }
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, "*")) => (host, PortPattern::Any),
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| OriginPatternError::InvalidPort(raw.to_owned()))?;
                (host, PortPattern::Exact(port))
            }
            None => (authority, PortPattern::Default),
        };
        let host = host.to_ascii_lowercase();
        let host = match host.strip_prefix("*.") {
            Some(parent) if !parent.is_empty() => HostPattern::Subdomains(format!(".{parent}")),
            Some(_) => return Err(malformed()),
            None if host.is_empty() || host.contains('*') => return Err(malformed()),
            None => HostPattern::Exact(host),
        };
        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            host,
            port,
        })
    }
}

impl OriginPattern {
    fn matches(&self, origin: &Url) -> bool {
        let Some(host) = origin.host_str() else {
            return false;
        };
        if origin.scheme() != self.scheme {
            return false;
        }
        let host_ok = match &self.host {
            HostPattern::Exact(expected) => host == expected,
            HostPattern::Subdomains(suffix) => host
                .strip_suffix(suffix.as_str())
                .is_some_and(|label| !label.is_empty()),
        };
        let port_ok = match self.port {
            PortPattern::Default => origin.port().is_none(),
            PortPattern::Any => origin.port().is_some_and(|port| port != 0),
            PortPattern::Exact(port) => origin.port_or_known_default() == Some(port),
        };
        host_ok && port_ok
    }
}

/// Set of origins permitted to open WebSocket connections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginAllowList {
    patterns: Vec<OriginPattern>,
}

impl OriginAllowList {
    /// Parse every entry, failing on the first malformed one.
    pub fn parse<I, S>(entries: I) -> Result<Self, OriginPatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = entries
            .into_iter()
            .map(|entry| entry.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Whether `origin` matches any entry.
    pub fn allows(&self, origin: &Url) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(origin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn allow_list() -> OriginAllowList {
        OriginAllowList::parse([
            "http://localhost:*",
            "https://tradepost.example",
            "https://*.tradepost.example",
            "http://127.0.0.1:8081",
        ])
        .expect("valid allow-list")
    }

    #[rstest]
    #[case("http://localhost:4000", true)]
    #[case("http://localhost:0", false)]
    #[case("http://localhost", false)]
    #[case("https://tradepost.example", true)]
    #[case("https://chat.tradepost.example", true)]
    #[case("https://tradepost.example.evil.com", false)]
    #[case("https://eviltradepost.example", false)]
    #[case("https://tradepost.example:8443", false)]
    #[case("wss://tradepost.example", false)]
    #[case("http://127.0.0.1:8081", true)]
    #[case("http://127.0.0.1:8082", false)]
    fn evaluates_allow_list(
        allow_list: OriginAllowList,
        #[case] origin: &str,
        #[case] expected: bool,
    ) {
        let parsed = Url::parse(origin).expect("url should parse");
        assert_eq!(allow_list.allows(&parsed), expected);
    }

    #[rstest]
    #[case("localhost:3000")]
    #[case("https://")]
    #[case("https://*.")]
    #[case("https://exa*mple.com")]
    #[case("https://example.com/path")]
    fn rejects_malformed_patterns(#[case] raw: &str) {
        assert!(matches!(
            raw.parse::<OriginPattern>(),
            Err(OriginPatternError::Malformed(_))
        ));
    }

    #[rstest]
    fn rejects_out_of_range_ports() {
        assert!(matches!(
            "http://localhost:70000".parse::<OriginPattern>(),
            Err(OriginPatternError::InvalidPort(_))
        ));
    }

    #[rstest]
    fn empty_list_allows_nothing() {
        let origin = Url::parse("http://localhost:3000").expect("url");
        assert!(!OriginAllowList::default().allows(&origin));
    }
}
