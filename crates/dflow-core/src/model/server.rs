//! Normalized server snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider tag of the managed cloud integration
pub const DFLOW_PROVIDER: &str = "dflow";

/// Provisioning lifecycle reported for dFlow VPS orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisioningStatus {
    /// VPS order is still being set up
    Provisioning,
    /// VPS is up; connection checks take over
    Running,
    /// Any other lifecycle value
    #[serde(other)]
    Other,
}

/// Result of the backend's last connection check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionStatus {
    Success,
    NotCheckedYet,
    #[default]
    #[serde(other)]
    Unknown,
}

/// cloud-init state; only `running` changes the outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudInitStatus {
    Running,
    #[default]
    #[serde(other)]
    Other,
}

/// Preferred way of reaching the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// Direct SSH to `ip`
    Ssh,
    /// Anything else goes through public IP, then the tailnet
    #[default]
    #[serde(other)]
    Tailscale,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Success => write!(f, "success"),
            ConnectionStatus::NotCheckedYet => write!(f, "not-checked-yet"),
            ConnectionStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Read-only server snapshot fed to the classifier.
///
/// Built from a [`ServerDocument`](crate::ServerDocument) at ingestion, where
/// absent counters and flags get their defaults and the invalid public IP
/// sentinel becomes `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,

    /// Provider name as entered; compare through [`ServerRecord::is_dflow`]
    pub provider: String,

    /// Only meaningful for dFlow servers
    pub provisioning_status: Option<ProvisioningStatus>,

    /// Next billing date of a dFlow VPS order
    pub next_billing_date: Option<DateTime<Utc>>,

    pub connection_attempts: u32,
    pub connection_status: ConnectionStatus,
    pub onboarded: bool,
    pub cloud_init_status: CloudInitStatus,
    pub dpkg_locked: bool,
    pub preferred_connection_type: ConnectionType,

    pub ip: Option<String>,
    pub public_ip: Option<String>,
    pub tailscale_private_ip: Option<String>,
}

impl ServerRecord {
    /// Create a record for the given provider with every other field defaulted
    pub fn with_provider(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    pub fn is_dflow(&self) -> bool {
        self.provider.eq_ignore_ascii_case(DFLOW_PROVIDER)
    }

    pub fn is_cloud_init_running(&self) -> bool {
        self.cloud_init_status == CloudInitStatus::Running
    }

    /// Name used in log lines and tables
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("(unnamed)")
    }
}
