//! Public IP discovery.

use crate::config::{Config, DiscoveryMethod, RecordType};
use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

/// Name that OpenDNS answers with the address of the asking client.
pub const MYIP_HOSTNAME: &str = "myip.opendns.com.";

const OPENDNS_V4: [Ipv4Addr; 2] = [
    Ipv4Addr::new(208, 67, 222, 222),
    Ipv4Addr::new(208, 67, 220, 220),
];

const OPENDNS_V6: [Ipv6Addr; 2] = [
    Ipv6Addr::new(0x2620, 0x119, 0x35, 0, 0, 0, 0, 0x35),
    Ipv6Addr::new(0x2620, 0x119, 0x53, 0, 0, 0, 0, 0x53),
];

/// Resolvers queried by [`DnsIpSource`] when none are configured.
pub fn default_resolvers(record_type: RecordType) -> Vec<IpAddr> {
    match record_type {
        RecordType::A => OPENDNS_V4.iter().copied().map(IpAddr::V4).collect(),
        RecordType::Aaaa => OPENDNS_V6.iter().copied().map(IpAddr::V6).collect(),
    }
}

/// Echo services tried by [`HttpIpSource`] when none are configured.
pub fn default_ip_services(record_type: RecordType) -> Vec<String> {
    let services: &[&str] = match record_type {
        RecordType::A => &[
            "https://api.ipify.org",
            "https://icanhazip.com",
            "https://ifconfig.me/ip",
            "https://ipecho.net/plain",
        ],
        RecordType::Aaaa => &[
            "https://api6.ipify.org",
            "https://v6.ident.me",
            "https://ipv6.icanhazip.com",
        ],
    };

    services.iter().map(|s| s.to_string()).collect()
}

/// Source of the caller's current public address.
///
/// The returned string is not validated here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Discover the current address for the given record type.
    async fn current_ip(&self, record_type: RecordType) -> Result<String>;
}

/// Create the IP source selected in the configuration.
pub fn create_source(config: &Config) -> Result<Box<dyn IpSource>> {
    match config.discovery {
        DiscoveryMethod::Dns => Ok(Box::new(DnsIpSource::new(
            &config.resolvers,
            config.timeout,
        ))),
        DiscoveryMethod::Http => Ok(Box::new(HttpIpSource::with_services(
            config.ip_services.clone(),
            config.timeout,
        )?)),
    }
}

/// Looks up `myip.opendns.com` against public resolvers.
pub struct DnsIpSource {
    resolver: TokioAsyncResolver,
    servers: Vec<IpAddr>,
}

impl DnsIpSource {
    /// Create a source querying `servers` on port 53 over UDP.
    pub fn new(servers: &[IpAddr], timeout: Duration) -> Self {
        Self::with_port(servers, 53, timeout)
    }

    /// Create a source querying `servers` on a custom port.
    pub fn with_port(servers: &[IpAddr], port: u16, timeout: Duration) -> Self {
        let config = ResolverConfig::from_parts(
            None,
            vec![],
            NameServerConfigGroup::from_ips_clear(servers, port, true),
        );

        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 1;
        opts.cache_size = 0;
        opts.use_hosts_file = false;

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
            servers: servers.to_vec(),
        }
    }
}

#[async_trait]
impl IpSource for DnsIpSource {
    fn name(&self) -> &'static str {
        "dns"
    }

    async fn current_ip(&self, record_type: RecordType) -> Result<String> {
        tracing::debug!(
            "Querying {} {} via {:?}",
            record_type,
            MYIP_HOSTNAME,
            self.servers
        );

        let answer = match record_type {
            RecordType::A => self
                .resolver
                .ipv4_lookup(MYIP_HOSTNAME)
                .await
                .map_err(|e| DdnsError::IpDetection(e.to_string()))?
                .iter()
                .next()
                .map(|a| a.0.to_string()),
            RecordType::Aaaa => self
                .resolver
                .ipv6_lookup(MYIP_HOSTNAME)
                .await
                .map_err(|e| DdnsError::IpDetection(e.to_string()))?
                .iter()
                .next()
                .map(|aaaa| aaaa.0.to_string()),
        };

        answer.ok_or_else(|| {
            DdnsError::IpDetection(format!("No {} answer for {}", record_type, MYIP_HOSTNAME))
        })
    }
}

/// IP detector with multiple fallback echo services.
pub struct HttpIpSource {
    client: reqwest::Client,
    services: Vec<String>,
}

impl HttpIpSource {
    /// Create a new source trying `services` in order.
    pub fn with_services(services: Vec<String>, timeout: Duration) -> Result<Self> {
        if services.is_empty() {
            return Err(DdnsError::Config(
                "at least one IP service is required".to_string(),
            ));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, services })
    }

    /// Try a single IP detection service.
    async fn try_service(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DdnsError::IpDetection(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let text = response.text().await?;
        let ip = text.trim();

        if ip.is_empty() {
            return Err(DdnsError::IpDetection(format!("Empty response from {}", url)));
        }

        Ok(ip.to_string())
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn current_ip(&self, record_type: RecordType) -> Result<String> {
        for service in &self.services {
            match self.try_service(service).await {
                Ok(ip) => {
                    tracing::debug!("Detected {} address {} from {}", record_type, ip, service);
                    return Ok(ip);
                }
                Err(e) => {
                    tracing::warn!("Service {} failed: {}", service, e);
                }
            }
        }

        Err(DdnsError::IpDetection(
            "All IP detection services failed".to_string(),
        ))
    }
}
