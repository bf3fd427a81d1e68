//! Command-line interface.
//!
//! Every option that configures the target record can also be supplied
//! through a `ROUTE53_DDNS_*` environment variable, which makes the binary
//! easy to drive from cron or a systemd timer.

use crate::config::{DiscoveryMethod, RecordType};
use clap::{ArgAction, Parser};
use std::net::IpAddr;
use std::path::PathBuf;

macro_rules! env_prefix {
    () => {
        "ROUTE53_DDNS_"
    };
}

#[derive(Debug, Clone, Parser)]
#[command(name = "route53-ddns")]
#[command(about = "Dynamic DNS updater for AWS Route 53 hosted zones")]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    /// AWS shared-config profile to load credentials from
    #[arg(short = 'p', long)]
    pub profile: Option<String>,

    /// Hosted zone ID
    #[arg(short = 'z', long, env = concat!(env_prefix!(), "ZONE_ID"))]
    pub zone_id: String,

    /// Record name to update (e.g. "home.example.com")
    #[arg(short = 'r', long, env = concat!(env_prefix!(), "RECORD_SET"))]
    pub record_set: String,

    /// Record TTL in seconds
    #[arg(short = 't', long, default_value_t = 300, env = concat!(env_prefix!(), "TTL"))]
    pub ttl: u32,

    /// Record type
    #[arg(
        short = 'y',
        long = "type",
        value_enum,
        ignore_case = true,
        default_value_t = RecordType::A,
        env = concat!(env_prefix!(), "TYPE")
    )]
    pub record_type: RecordType,

    /// Use this IP instead of discovering the public one
    #[arg(short = 'i', long = "ip")]
    pub ip: Option<String>,

    /// Executable called with the old and new IP after a change
    #[arg(short = 's', long, env = concat!(env_prefix!(), "SCRIPT"))]
    pub script: Option<PathBuf>,

    /// Comment attached to the change batch
    #[arg(short = 'c', long, env = concat!(env_prefix!(), "COMMENT"))]
    pub comment: Option<String>,

    /// How to discover the public IP
    #[arg(
        long,
        value_enum,
        default_value_t = DiscoveryMethod::Dns,
        env = concat!(env_prefix!(), "DISCOVERY")
    )]
    pub discovery: DiscoveryMethod,

    /// Resolvers queried for myip.opendns.com (dns discovery)
    #[arg(
        long = "resolver",
        value_name = "IP",
        value_delimiter = ',',
        env = concat!(env_prefix!(), "RESOLVERS")
    )]
    pub resolvers: Vec<IpAddr>,

    /// IP echo services tried in order (http discovery)
    #[arg(
        long = "ip-service",
        value_name = "URL",
        value_delimiter = ',',
        env = concat!(env_prefix!(), "IP_SERVICES")
    )]
    pub ip_services: Vec<String>,

    /// Require AAAA addresses to be well-formed IPv6
    #[arg(long, env = concat!(env_prefix!(), "STRICT_IPV6"))]
    pub strict_ipv6: bool,

    /// Timeout in seconds for each network call and the notifier
    #[arg(long, default_value_t = 10, env = concat!(env_prefix!(), "TIMEOUT"))]
    pub timeout: u64,

    /// Print the change batch instead of submitting it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    _version: (),
}
