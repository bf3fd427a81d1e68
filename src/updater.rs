//! One update run: discover, compare, publish, notify.

use crate::config::Config;
use crate::detector::IpSource;
use crate::error::{DdnsError, Result};
use crate::notifier::Notifier;
use crate::providers::{ChangeBatch, HostedZone, RecordSpec};
use crate::validate;

/// Whether the zone needs to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip,
    Update,
}

impl Decision {
    /// `Skip` iff both strings are identical. `current_ip` must already be
    /// validated; an absent published value is passed as `""`.
    pub fn new(current_ip: &str, published_ip: &str) -> Self {
        if current_ip == published_ip {
            Decision::Skip
        } else {
            Decision::Update
        }
    }
}

/// What happened to the notifier after a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    NotConfigured,
    Delivered,
    Failed(String),
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The zone already publishes the current address.
    Unchanged { ip: String },
    /// The record was upserted.
    Updated {
        previous: Option<String>,
        current: String,
        notification: Notification,
    },
    /// Dry run: the batch that would have been submitted.
    DryRun { batch: ChangeBatch },
}

/// Drives a single update against one record.
pub struct Updater<'a> {
    config: &'a Config,
    source: Box<dyn IpSource>,
    zone: Box<dyn HostedZone>,
    notifier: Option<Box<dyn Notifier>>,
}

impl<'a> Updater<'a> {
    pub fn new(
        config: &'a Config,
        source: Box<dyn IpSource>,
        zone: Box<dyn HostedZone>,
        notifier: Option<Box<dyn Notifier>>,
    ) -> Self {
        Self {
            config,
            source,
            zone,
            notifier,
        }
    }

    /// Run the update.
    ///
    /// Errors are fatal for this run: undetermined or invalid current IP, or
    /// a rejected write. A failed read of the published value is not; it is
    /// logged and treated as "nothing published". A failing notifier is
    /// reported in the outcome since the change is already committed.
    pub async fn run(&self) -> Result<Outcome> {
        let record = RecordSpec::new(&self.config.record_name, self.config.record_type);

        let current = self.current_ip().await?;
        let published = self.published_ip(&record).await;

        if !validate::is_valid(&current, record.record_type, self.config.ipv6_validation) {
            return Err(DdnsError::InvalidIp {
                ip: current,
                record_type: record.record_type,
            });
        }

        let previous = published.as_deref().unwrap_or_default();
        if Decision::new(&current, previous) == Decision::Skip {
            tracing::info!("{} already points to {}", record.name, current);
            return Ok(Outcome::Unchanged { ip: current });
        }

        let batch = ChangeBatch::upsert(&record, self.config.ttl, &current, &self.config.comment);

        if self.config.dry_run {
            tracing::info!("Dry run, not submitting change for {}", record.name);
            return Ok(Outcome::DryRun { batch });
        }

        tracing::info!(
            "Updating {} {} from {:?} to {}",
            record.name,
            record.record_type,
            previous,
            current
        );
        self.zone.upsert(&batch).await?;

        let notification = match &self.notifier {
            None => Notification::NotConfigured,
            Some(notifier) => match notifier.notify(previous, &current).await {
                Ok(()) => Notification::Delivered,
                Err(e) => {
                    tracing::error!("Record updated but notification failed: {}", e);
                    Notification::Failed(e.to_string())
                }
            },
        };

        Ok(Outcome::Updated {
            previous: published,
            current,
            notification,
        })
    }

    async fn current_ip(&self) -> Result<String> {
        if let Some(ip) = &self.config.forced_ip {
            tracing::debug!("Using forced IP {}", ip);
            return Ok(ip.clone());
        }

        let ip = self.source.current_ip(self.config.record_type).await?;
        tracing::debug!("Discovered {} via {}", ip, self.source.name());
        Ok(ip)
    }

    async fn published_ip(&self, record: &RecordSpec) -> Option<String> {
        match self.zone.published_ip(record).await {
            Ok(Some(ip)) => {
                tracing::debug!("{} currently publishes {}", self.zone.name(), ip);
                Some(ip)
            }
            Ok(None) => {
                tracing::info!("No {} record for {} yet", record.record_type, record.name);
                None
            }
            Err(e) => {
                tracing::warn!("Could not read published value, assuming none: {}", e);
                None
            }
        }
    }
}
