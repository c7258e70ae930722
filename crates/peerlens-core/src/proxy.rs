//! Proxy address translation.
//!
//! When cluster nodes are only reachable through a single proxy host, every
//! node address the driver discovers has to be dialed through that host
//! instead. The proxy hostname is resolved once at startup into a
//! [`ProxyEndpoint`]; an [`AddressRewriteRule`] built from it then maps any
//! `(address, port)` to `(proxy address, port)`.
//!
//! Resolution is best-effort: a hostname without an IPv4 address yields an
//! unset endpoint and the rule degrades to the identity.

use async_trait::async_trait;
use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// A proxy hostname and the IPv4 address it resolved to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    hostname: String,
    address: Option<Ipv4Addr>,
}

impl ProxyEndpoint {
    /// An endpoint with a known address.
    pub fn new(hostname: impl Into<String>, address: Ipv4Addr) -> Self {
        Self {
            hostname: hostname.into(),
            address: Some(address),
        }
    }

    /// An endpoint whose hostname did not resolve to any IPv4 address.
    pub fn unset(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            address: None,
        }
    }

    /// Pick the first IPv4 address among lookup results.
    ///
    /// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) count as IPv4. Plain
    /// IPv6 results are skipped.
    pub fn from_candidates<I>(hostname: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        let address = candidates.into_iter().find_map(|ip| match ip {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(v6) => v6.to_ipv4_mapped(),
        });
        Self {
            hostname: hostname.into(),
            address,
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn address(&self) -> Option<Ipv4Addr> {
        self.address
    }

    pub fn is_resolved(&self) -> bool {
        self.address.is_some()
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            Some(address) => write!(f, "{} ({})", self.hostname, address),
            None => write!(f, "{} (unresolved)", self.hostname),
        }
    }
}

/// Hostname lookup used by [`AddressResolver`].
#[async_trait]
pub trait HostLookup: Send + Sync {
    /// Return every address the hostname resolves to, in resolver order.
    async fn lookup(&self, hostname: &str) -> io::Result<Vec<IpAddr>>;
}

/// Lookup through the system resolver (`getaddrinfo`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLookup;

#[async_trait]
impl HostLookup for SystemLookup {
    async fn lookup(&self, hostname: &str) -> io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((hostname, 0)).await?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// Resolves the proxy hostname into a [`ProxyEndpoint`].
#[derive(Debug, Clone, Default)]
pub struct AddressResolver<L = SystemLookup> {
    lookup: L,
}

impl AddressResolver<SystemLookup> {
    /// A resolver backed by the system resolver.
    pub fn system() -> Self {
        Self::new(SystemLookup)
    }
}

impl<L: HostLookup> AddressResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Look the hostname up once and keep the first IPv4 result.
    ///
    /// Never fails: a lookup error or a result without IPv4 addresses is
    /// logged and produces an unset endpoint.
    pub async fn resolve(&self, hostname: &str) -> ProxyEndpoint {
        match self.lookup.lookup(hostname).await {
            Ok(candidates) => {
                let endpoint = ProxyEndpoint::from_candidates(hostname, candidates);
                match endpoint.address() {
                    Some(address) => {
                        tracing::info!(proxy = hostname, address = %address, "Resolved proxy host");
                    }
                    None => {
                        tracing::warn!(
                            proxy = hostname,
                            "Proxy host has no IPv4 address, node addresses will not be translated"
                        );
                    }
                }
                endpoint
            }
            Err(e) => {
                tracing::warn!(
                    proxy = hostname,
                    error = %e,
                    "Proxy lookup failed, node addresses will not be translated"
                );
                ProxyEndpoint::unset(hostname)
            }
        }
    }
}

/// Rewrites node addresses to the proxy address, keeping the port.
///
/// Holds no mutable state, so one rule can be shared by any number of
/// concurrent connection attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRewriteRule {
    endpoint: ProxyEndpoint,
}

impl AddressRewriteRule {
    pub fn new(endpoint: ProxyEndpoint) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &ProxyEndpoint {
        &self.endpoint
    }

    /// Map `(address, port)` to the address that should actually be dialed.
    ///
    /// Identity when the endpoint is unset.
    pub fn translate(&self, address: IpAddr, port: u16) -> (IpAddr, u16) {
        let translated = match self.endpoint.address {
            Some(proxy) => IpAddr::V4(proxy),
            None => address,
        };
        tracing::debug!(
            from = %SocketAddr::new(address, port),
            to = %SocketAddr::new(translated, port),
            "Translating node address"
        );
        (translated, port)
    }

    pub fn translate_socket(&self, addr: SocketAddr) -> SocketAddr {
        let (ip, port) = self.translate(addr.ip(), addr.port());
        SocketAddr::new(ip, port)
    }
}

impl From<ProxyEndpoint> for AddressRewriteRule {
    fn from(endpoint: ProxyEndpoint) -> Self {
        Self::new(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;
    use std::sync::Arc;

    struct StaticLookup(Vec<IpAddr>);

    #[async_trait]
    impl HostLookup for StaticLookup {
        async fn lookup(&self, _hostname: &str) -> io::Result<Vec<IpAddr>> {
            Ok(self.0.clone())
        }
    }

    struct FailingLookup;

    #[async_trait]
    impl HostLookup for FailingLookup {
        async fn lookup(&self, hostname: &str) -> io::Result<Vec<IpAddr>> {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such host: {hostname}"),
            ))
        }
    }

    fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(a, b, c, d))
    }

    #[test]
    fn test_from_candidates_picks_first_ipv4() {
        let endpoint = ProxyEndpoint::from_candidates(
            "proxy.com",
            [
                IpAddr::V6(Ipv6Addr::LOCALHOST),
                v4(10, 0, 0, 5),
                v4(10, 0, 0, 6),
            ],
        );
        assert_eq!(endpoint.address(), Some(Ipv4Addr::new(10, 0, 0, 5)));
        assert_eq!(endpoint.hostname(), "proxy.com");
    }

    #[test]
    fn test_from_candidates_accepts_ipv4_mapped() {
        let mapped = Ipv4Addr::new(192, 168, 1, 7).to_ipv6_mapped();
        let endpoint = ProxyEndpoint::from_candidates("proxy.com", [IpAddr::V6(mapped)]);
        assert_eq!(endpoint.address(), Some(Ipv4Addr::new(192, 168, 1, 7)));
    }

    #[test]
    fn test_from_candidates_ipv6_only_is_unset() {
        let endpoint =
            ProxyEndpoint::from_candidates("v6.proxy", [IpAddr::V6(Ipv6Addr::LOCALHOST)]);
        assert!(!endpoint.is_resolved());
        assert_eq!(endpoint.to_string(), "v6.proxy (unresolved)");
    }

    #[test]
    fn test_translate_rewrites_to_proxy_keeping_port() {
        let rule = AddressRewriteRule::new(ProxyEndpoint::new(
            "proxy.com",
            Ipv4Addr::new(10, 0, 0, 5),
        ));
        assert_eq!(
            rule.translate(v4(172, 16, 0, 9), 9042),
            (v4(10, 0, 0, 5), 9042)
        );

        for (addr, port) in [
            (v4(127, 0, 0, 1), 1),
            (v4(10, 0, 0, 5), 19042),
            (IpAddr::V6(Ipv6Addr::LOCALHOST), 65535),
        ] {
            assert_eq!(rule.translate(addr, port), (v4(10, 0, 0, 5), port));
        }
    }

    #[test]
    fn test_translate_unset_is_identity() {
        let rule = AddressRewriteRule::new(ProxyEndpoint::unset("nowhere.invalid"));
        for (addr, port) in [
            (v4(172, 16, 0, 9), 9042),
            (v4(0, 0, 0, 0), 0),
            (IpAddr::V6(Ipv6Addr::LOCALHOST), 9142),
        ] {
            assert_eq!(rule.translate(addr, port), (addr, port));
        }
    }

    #[test]
    fn test_translate_socket() {
        let rule: AddressRewriteRule =
            ProxyEndpoint::new("proxy.com", Ipv4Addr::new(10, 0, 0, 5)).into();
        let translated = rule.translate_socket("172.16.0.9:9042".parse().unwrap());
        assert_eq!(translated, "10.0.0.5:9042".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_translate_concurrent_callers() {
        let rule = Arc::new(AddressRewriteRule::new(ProxyEndpoint::new(
            "proxy.com",
            Ipv4Addr::new(10, 0, 0, 5),
        )));

        std::thread::scope(|scope| {
            for i in 0..8u8 {
                let rule = Arc::clone(&rule);
                scope.spawn(move || {
                    for port in 9000..9100u16 {
                        let (addr, out_port) = rule.translate(v4(172, 16, 0, i), port);
                        assert_eq!(addr, v4(10, 0, 0, 5));
                        assert_eq!(out_port, port);
                    }
                });
            }
        });
    }

    #[tokio::test]
    async fn test_resolve_with_ipv4_result() {
        let resolver = AddressResolver::new(StaticLookup(vec![
            IpAddr::V6(Ipv6Addr::LOCALHOST),
            v4(10, 0, 0, 5),
        ]));
        let endpoint = resolver.resolve("proxy.com").await;
        assert_eq!(endpoint, ProxyEndpoint::new("proxy.com", Ipv4Addr::new(10, 0, 0, 5)));
    }

    #[tokio::test]
    async fn test_resolve_without_results_is_unset() {
        let resolver = AddressResolver::new(StaticLookup(Vec::new()));
        let endpoint = resolver.resolve("proxy.com").await;
        assert_eq!(endpoint, ProxyEndpoint::unset("proxy.com"));
    }

    #[tokio::test]
    async fn test_resolve_lookup_failure_is_unset() {
        let resolver = AddressResolver::new(FailingLookup);
        let endpoint = resolver.resolve("proxy.com").await;
        assert!(!endpoint.is_resolved());
    }

    #[tokio::test]
    async fn test_system_lookup_ip_literal() {
        let endpoint = AddressResolver::system().resolve("10.0.0.5").await;
        assert_eq!(endpoint.address(), Some(Ipv4Addr::new(10, 0, 0, 5)));
    }
}
