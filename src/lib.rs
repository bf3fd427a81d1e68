//! # route53-ddns
//!
//! A dynamic DNS updater for AWS Route 53 hosted zones.
//!
//! Each run discovers the caller's public IP, compares it with the value
//! published in the hosted zone and, when they differ, upserts the record
//! and runs an optional notification script with the old and new address.
//! It keeps no state between runs; schedule it with cron or a systemd timer.
//!
//! ## Usage
//!
//! ```bash
//! # Update home.example.com from the address OpenDNS sees
//! route53-ddns -z Z0123456789ABC -r home.example.com
//!
//! # IPv6, with a hook run on change
//! route53-ddns -z Z0123456789ABC -r home.example.com -y AAAA -s ./on-change.sh
//!
//! # Publish a fixed address, printing the change instead of sending it
//! route53-ddns -z Z0123456789ABC -r home.example.com -i 203.0.113.5 --dry-run
//! ```

pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod notifier;
pub mod providers;
pub mod updater;
pub mod validate;

pub use config::Config;
pub use detector::IpSource;
pub use error::{DdnsError, Result};
pub use updater::{Decision, Outcome, Updater};
