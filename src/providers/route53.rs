//! AWS Route 53 hosted zone.

use super::{ChangeAction, ChangeBatch, HostedZone, RecordSpec};
use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_route53::config::Builder as ClientConfigBuilder;
use aws_sdk_route53::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_route53::types;
use aws_sdk_route53::Client;
use std::error::Error as StdError;
use std::fmt::Debug;
use std::time::Duration;

const PROVIDER: &str = "route53";

/// Route 53 is global; the SDK still wants a region to sign requests.
const FALLBACK_REGION: &str = "us-east-1";

/// Route 53 hosted zone accessed through the AWS SDK.
pub struct Route53Zone {
    client: Client,
    zone_id: String,
}

impl Route53Zone {
    /// Load AWS configuration (optionally from a named profile) and create
    /// a client for `zone_id`.
    pub async fn connect(zone_id: &str, profile: Option<&str>, timeout: Duration) -> Self {
        let region = RegionProviderChain::default_provider().or_else(FALLBACK_REGION);
        let timeouts = TimeoutConfig::builder().operation_timeout(timeout).build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .retry_config(RetryConfig::disabled())
            .timeout_config(timeouts);
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;
        Self::from_conf(ClientConfigBuilder::from(&sdk_config), zone_id)
    }

    /// Create from a client configuration. Retries are always disabled:
    /// a failed call ends the run and the next scheduled run tries again.
    pub fn from_conf(config: ClientConfigBuilder, zone_id: &str) -> Self {
        let config = config.retry_config(RetryConfig::disabled()).build();

        Self {
            client: Client::from_conf(config),
            zone_id: zone_id.to_string(),
        }
    }
}

#[async_trait]
impl HostedZone for Route53Zone {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn published_ip(&self, record: &RecordSpec) -> Result<Option<String>> {
        let output = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(&self.zone_id)
            .start_record_name(record.fqdn())
            .start_record_type(types::RrType::from(record.record_type.as_str()))
            .max_items(1)
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(published_value(output.resource_record_sets(), record))
    }

    async fn upsert(&self, batch: &ChangeBatch) -> Result<()> {
        let change_batch = sdk_change_batch(batch)?;

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&self.zone_id)
            .change_batch(change_batch)
            .send()
            .await
            .map_err(sdk_error)?;

        tracing::debug!("Route 53 accepted change: {:?}", output.change_info());
        Ok(())
    }
}

/// Service errors keep only their code and message; transport failures
/// keep their error chain.
fn sdk_error<E, R>(e: SdkError<E, R>) -> DdnsError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: Debug,
{
    tracing::debug!("Route 53 call failed: {}", DisplayErrorContext(&e));

    match (e.code(), e.message()) {
        (Some(code), Some(message)) => provider_error(format!("{}: {}", code, message)),
        (Some(code), None) => provider_error(code),
        _ => provider_error(DisplayErrorContext(&e)),
    }
}

fn provider_error(message: impl ToString) -> DdnsError {
    DdnsError::Provider {
        provider: PROVIDER.to_string(),
        message: message.to_string(),
    }
}

/// First value of the first set matching the record's name and type.
fn published_value(sets: &[types::ResourceRecordSet], record: &RecordSpec) -> Option<String> {
    let wanted = normalize_name(&record.name);

    sets.iter()
        .find(|set| {
            set.r#type().as_str() == record.record_type.as_str()
                && normalize_name(set.name()) == wanted
        })
        .and_then(|set| set.resource_records().first())
        .map(|rr| rr.value().to_string())
}

/// Lowercase, trailing dot, and Route 53's octal escape for `*` undone.
fn normalize_name(name: &str) -> String {
    let name = name.replace("\\052", "*").to_ascii_lowercase();
    if name.ends_with('.') {
        name
    } else {
        format!("{}.", name)
    }
}

fn sdk_change_batch(batch: &ChangeBatch) -> Result<types::ChangeBatch> {
    let mut changes = Vec::with_capacity(batch.changes.len());

    for change in &batch.changes {
        let set = &change.resource_record_set;

        let mut records = Vec::with_capacity(set.resource_records.len());
        for record in &set.resource_records {
            records.push(
                types::ResourceRecord::builder()
                    .value(&record.value)
                    .build()
                    .map_err(provider_error)?,
            );
        }

        let record_set = types::ResourceRecordSet::builder()
            .name(&set.name)
            .r#type(types::RrType::from(set.record_type.as_str()))
            .ttl(i64::from(set.ttl))
            .set_resource_records(Some(records))
            .build()
            .map_err(provider_error)?;

        let action = match change.action {
            ChangeAction::Upsert => types::ChangeAction::Upsert,
        };

        changes.push(
            types::Change::builder()
                .action(action)
                .resource_record_set(record_set)
                .build()
                .map_err(provider_error)?,
        );
    }

    types::ChangeBatch::builder()
        .comment(&batch.comment)
        .set_changes(Some(changes))
        .build()
        .map_err(provider_error)
}
