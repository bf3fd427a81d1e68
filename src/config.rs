//! Runtime configuration for route53-ddns.

use crate::cli::Cli;
use crate::detector;
use crate::error::{DdnsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// DNS record type managed by the updater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum RecordType {
    #[value(name = "A")]
    A,
    #[serde(rename = "AAAA")]
    #[value(name = "AAAA")]
    Aaaa,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the current public IP is discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DiscoveryMethod {
    /// Ask OpenDNS for myip.opendns.com.
    Dns,
    /// Fetch the address from plain-text HTTP echo services.
    Http,
}

/// How strictly AAAA addresses are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ipv6Validation {
    /// Any non-empty string of hex digits and colons. Group count and
    /// group width are not checked.
    #[default]
    Lenient,
    /// Must parse as an IPv6 address.
    Strict,
}

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosted zone ID.
    pub zone_id: String,
    /// DNS record name (e.g., "home.example.com").
    pub record_name: String,
    pub record_type: RecordType,
    /// TTL in seconds.
    pub ttl: u32,
    /// IP supplied by the user; discovery is skipped when set.
    pub forced_ip: Option<String>,
    /// Comment attached to the change batch.
    pub comment: String,
    /// Executable run after a successful change.
    pub script: Option<PathBuf>,
    /// AWS shared-config profile.
    pub profile: Option<String>,
    pub discovery: DiscoveryMethod,
    /// Resolvers used by DNS discovery.
    pub resolvers: Vec<IpAddr>,
    /// Echo services used by HTTP discovery.
    pub ip_services: Vec<String>,
    pub ipv6_validation: Ipv6Validation,
    /// Bound on every network call and on the notifier.
    pub timeout: Duration,
    pub dry_run: bool,
}

impl Config {
    /// Build the configuration from parsed arguments.
    ///
    /// Fails when the record is not identified or when the notifier script
    /// cannot be executed. Nothing here touches the network.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let zone_id = cli.zone_id.trim().to_string();
        if zone_id.is_empty() {
            return Err(DdnsError::Config("zone id must not be empty".to_string()));
        }

        let record_name = cli.record_set.trim().to_string();
        if record_name.is_empty() {
            return Err(DdnsError::Config("record set must not be empty".to_string()));
        }

        if let Some(script) = &cli.script {
            check_script(script)?;
        }

        if cli.timeout == 0 {
            return Err(DdnsError::Config("timeout must be at least 1 second".to_string()));
        }

        let resolvers = if cli.resolvers.is_empty() {
            detector::default_resolvers(cli.record_type)
        } else {
            cli.resolvers
        };

        let ip_services = if cli.ip_services.is_empty() {
            detector::default_ip_services(cli.record_type)
        } else {
            cli.ip_services
        };

        Ok(Self {
            zone_id,
            record_name,
            record_type: cli.record_type,
            ttl: cli.ttl,
            forced_ip: cli.ip,
            comment: cli.comment.unwrap_or_else(default_comment),
            script: cli.script,
            profile: cli.profile,
            discovery: cli.discovery,
            resolvers,
            ip_services,
            ipv6_validation: if cli.strict_ipv6 {
                Ipv6Validation::Strict
            } else {
                Ipv6Validation::Lenient
            },
            timeout: Duration::from_secs(cli.timeout),
            dry_run: cli.dry_run,
        })
    }
}

fn default_comment() -> String {
    format!(
        "Auto updating @ {}",
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    )
}

/// The notifier must be a regular file we are allowed to execute.
fn check_script(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        DdnsError::Config(format!("notifier script {}: {}", path.display(), e))
    })?;

    if !metadata.is_file() {
        return Err(DdnsError::Config(format!(
            "notifier script {} is not a file",
            path.display()
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(DdnsError::Config(format!(
                "notifier script {} is not executable",
                path.display()
            )));
        }
    }

    Ok(())
}
