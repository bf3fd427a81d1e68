//! Hosted-zone access.

mod route53;

pub use route53::Route53Zone;

use crate::config::RecordType;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The record set managed by the updater.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpec {
    /// Record name as configured; a trailing dot is optional.
    pub name: String,
    pub record_type: RecordType,
}

impl RecordSpec {
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
        }
    }

    /// Fully-qualified name with a trailing dot, as the zone reports it.
    pub fn fqdn(&self) -> String {
        if self.name.ends_with('.') {
            self.name.clone()
        } else {
            format!("{}.", self.name)
        }
    }
}

/// Change batch submitted to the hosted zone.
///
/// Serializes to the `ChangeResourceRecordSets` request shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeBatch {
    pub comment: String,
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Change {
    pub action: ChangeAction,
    pub resource_record_set: ResourceRecordSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Upsert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecordSet {
    pub resource_records: Vec<ResourceRecord>,
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: RecordType,
    #[serde(rename = "TTL")]
    pub ttl: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecord {
    pub value: String,
}

impl ChangeBatch {
    /// A batch holding a single UPSERT of `record` to `ip`.
    pub fn upsert(record: &RecordSpec, ttl: u32, ip: &str, comment: &str) -> Self {
        Self {
            comment: comment.to_string(),
            changes: vec![Change {
                action: ChangeAction::Upsert,
                resource_record_set: ResourceRecordSet {
                    resource_records: vec![ResourceRecord {
                        value: ip.to_string(),
                    }],
                    name: record.name.clone(),
                    record_type: record.record_type,
                    ttl,
                },
            }],
        }
    }

    /// Value of the first record in the first change.
    pub fn value(&self) -> Option<&str> {
        self.changes
            .first()
            .and_then(|c| c.resource_record_set.resource_records.first())
            .map(|r| r.value.as_str())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read and write access to one hosted zone.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostedZone: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &'static str;

    /// First value currently published for `record`.
    ///
    /// `Ok(None)` means the zone has no such record; an error means the
    /// zone could not be read.
    async fn published_ip(&self, record: &RecordSpec) -> Result<Option<String>>;

    /// Submit `batch`. The error carries the provider's diagnostic text.
    async fn upsert(&self, batch: &ChangeBatch) -> Result<()>;
}
