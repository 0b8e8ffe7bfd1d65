//! Wire shape of a server snapshot

use super::server::{
    CloudInitStatus, ConnectionStatus, ConnectionType, ProvisioningStatus, ServerRecord,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder the backend stores when a server has no usable public IP
pub const INVALID_PUBLIC_IP: &str = "999.999.999.999";

/// Server document as returned by the dashboard backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDocument {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub provider: String,
    pub dflow_vps_details: Option<DflowVpsDetails>,
    pub connection_attempts: Option<u32>,
    pub connection: Option<ConnectionDetails>,
    pub onboarded: Option<bool>,
    pub cloud_init_status: Option<CloudInitStatus>,
    pub dpkg_locked: Option<bool>,
    pub prefer_connection_type: Option<ConnectionType>,
    pub ip: Option<String>,
    pub public_ip: Option<String>,
    pub tailscale_private_ip: Option<String>,
}

/// VPS order details attached to dFlow servers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DflowVpsDetails {
    pub status: Option<ProvisioningStatus>,
    pub next_billing_date: Option<DateTime<Utc>>,
}

/// Result of the last connection check
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionDetails {
    pub status: Option<ConnectionStatus>,
}

/// Blank strings carry no address.
fn normalize_address(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Like [`normalize_address`], and the [`INVALID_PUBLIC_IP`] sentinel is dropped.
pub fn normalize_public_ip(value: Option<String>) -> Option<String> {
    normalize_address(value).filter(|v| v != INVALID_PUBLIC_IP)
}

impl From<ServerDocument> for ServerRecord {
    fn from(doc: ServerDocument) -> Self {
        let (provisioning_status, next_billing_date) = match doc.dflow_vps_details {
            Some(details) => (details.status, details.next_billing_date),
            None => (None, None),
        };

        Self {
            id: doc.id,
            name: doc.name.filter(|n| !n.is_empty()),
            description: doc.description.filter(|d| !d.is_empty()),
            provider: doc.provider,
            provisioning_status,
            next_billing_date,
            connection_attempts: doc.connection_attempts.unwrap_or(0),
            connection_status: doc
                .connection
                .and_then(|c| c.status)
                .unwrap_or_default(),
            onboarded: doc.onboarded.unwrap_or(false),
            cloud_init_status: doc.cloud_init_status.unwrap_or_default(),
            dpkg_locked: doc.dpkg_locked.unwrap_or(false),
            preferred_connection_type: doc.prefer_connection_type.unwrap_or_default(),
            ip: normalize_address(doc.ip),
            public_ip: normalize_public_ip(doc.public_ip),
            tailscale_private_ip: normalize_address(doc.tailscale_private_ip),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> ServerRecord {
        let doc: ServerDocument = serde_json::from_value(value).unwrap();
        doc.into()
    }

    #[test]
    fn test_full_document() {
        let server = record(json!({
            "id": "66a1f0",
            "name": "web-1",
            "description": "frontend",
            "provider": "dFlow",
            "dflowVpsDetails": {
                "status": "running",
                "next_billing_date": "2025-08-01T00:00:00.000Z"
            },
            "connectionAttempts": 4,
            "connection": { "status": "not-checked-yet" },
            "onboarded": false,
            "cloudInitStatus": "running",
            "dpkgLocked": true,
            "preferConnectionType": "ssh",
            "ip": "10.0.0.4",
            "publicIp": "203.0.113.9",
            "tailscalePrivateIp": "100.64.0.4"
        }));

        assert!(server.is_dflow());
        assert_eq!(server.provisioning_status, Some(ProvisioningStatus::Running));
        assert!(server.next_billing_date.is_some());
        assert_eq!(server.connection_attempts, 4);
        assert_eq!(server.connection_status, ConnectionStatus::NotCheckedYet);
        assert_eq!(server.cloud_init_status, CloudInitStatus::Running);
        assert!(server.dpkg_locked);
        assert_eq!(server.preferred_connection_type, ConnectionType::Ssh);
        assert_eq!(server.public_ip.as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_minimal_document_gets_defaults() {
        let server = record(json!({ "provider": "aws" }));

        assert_eq!(server.connection_attempts, 0);
        assert_eq!(server.connection_status, ConnectionStatus::Unknown);
        assert_eq!(server.cloud_init_status, CloudInitStatus::Other);
        assert_eq!(server.preferred_connection_type, ConnectionType::Tailscale);
        assert!(!server.onboarded);
        assert!(!server.dpkg_locked);
        assert!(server.provisioning_status.is_none());
    }

    #[test]
    fn test_nulls_are_absent() {
        let server = record(json!({
            "provider": "aws",
            "connectionAttempts": null,
            "connection": null,
            "onboarded": null,
            "publicIp": null
        }));

        assert_eq!(server.connection_attempts, 0);
        assert_eq!(server.connection_status, ConnectionStatus::Unknown);
        assert!(server.public_ip.is_none());
    }

    #[test]
    fn test_unknown_enum_values_fall_back() {
        let server = record(json!({
            "provider": "dflow",
            "dflowVpsDetails": { "status": "stopped" },
            "connection": { "status": "failed" },
            "cloudInitStatus": "done",
            "preferConnectionType": "tailscale"
        }));

        assert_eq!(server.provisioning_status, Some(ProvisioningStatus::Other));
        assert_eq!(server.connection_status, ConnectionStatus::Unknown);
        assert_eq!(server.cloud_init_status, CloudInitStatus::Other);
        assert_eq!(server.preferred_connection_type, ConnectionType::Tailscale);
    }

    #[test]
    fn test_sentinel_public_ip_is_dropped_on_ingestion() {
        let server = record(json!({
            "provider": "dflow",
            "publicIp": "999.999.999.999",
            "tailscalePrivateIp": "100.101.102.103"
        }));

        assert!(server.public_ip.is_none());
        assert_eq!(server.tailscale_private_ip.as_deref(), Some("100.101.102.103"));
    }

    #[test]
    fn test_blank_addresses_are_dropped() {
        let server = record(json!({
            "provider": "aws",
            "ip": "",
            "publicIp": "  ",
            "tailscalePrivateIp": ""
        }));

        assert!(server.ip.is_none());
        assert!(server.public_ip.is_none());
        assert!(server.tailscale_private_ip.is_none());
    }

    #[test]
    fn test_missing_provider_is_not_dflow() {
        let server = record(json!({
            "name": "x",
            "dflowVpsDetails": { "status": "provisioning" }
        }));
        assert_eq!(server.provider, "");
        assert!(!server.is_dflow());
    }
}
