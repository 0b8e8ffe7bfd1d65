//! Address selection for display
//!
//! SSH servers show their `ip`. Everything else prefers the public IP and
//! falls back to the Tailscale address.

use crate::model::{ConnectionType, ServerRecord};
use serde::Serialize;

/// Shown in place of a missing address
pub const NO_IP_AVAILABLE: &str = "No IP available";

/// Advisory shown when only the tailnet can reach the server
pub const NO_PUBLIC_IP_LABEL: &str = "No Public IP";
pub const NO_PUBLIC_IP_ADVISORY: &str = "Server is only accessible via Tailscale private network";

/// Address picked for a server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpSelection<'a> {
    /// SSH connection; the address may be missing
    Ssh(Option<&'a str>),
    Public(&'a str),
    Tailscale(&'a str),
    /// Nothing to show
    Unavailable,
}

/// Icon token next to the address label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressIcon {
    Server,
    Globe,
    Shield,
}

/// Visual treatment of the address value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressTone {
    Plain,
    /// Private overlay address
    Highlighted,
    Muted,
}

impl<'a> IpSelection<'a> {
    pub fn label(&self) -> &'static str {
        match self {
            IpSelection::Ssh(_) | IpSelection::Unavailable => "IP Address",
            IpSelection::Public(_) => "Public IP",
            IpSelection::Tailscale(_) => "Tailscale IP",
        }
    }

    pub fn address(&self) -> Option<&'a str> {
        match *self {
            IpSelection::Ssh(ip) => ip,
            IpSelection::Public(ip) | IpSelection::Tailscale(ip) => Some(ip),
            IpSelection::Unavailable => None,
        }
    }

    pub fn has_value(&self) -> bool {
        self.address().is_some()
    }

    /// Address or the "no IP" marker
    pub fn display_value(&self) -> &'a str {
        self.address().unwrap_or(NO_IP_AVAILABLE)
    }

    pub fn icon(&self) -> AddressIcon {
        match self {
            IpSelection::Ssh(_) | IpSelection::Unavailable => AddressIcon::Server,
            IpSelection::Public(_) => AddressIcon::Globe,
            IpSelection::Tailscale(_) => AddressIcon::Shield,
        }
    }

    pub fn tone(&self) -> AddressTone {
        match self {
            IpSelection::Ssh(_) | IpSelection::Public(_) => AddressTone::Plain,
            IpSelection::Tailscale(_) => AddressTone::Highlighted,
            IpSelection::Unavailable => AddressTone::Muted,
        }
    }
}

/// Pick the address to display for `record`
pub fn select_ip(record: &ServerRecord) -> IpSelection<'_> {
    if record.preferred_connection_type == ConnectionType::Ssh {
        return IpSelection::Ssh(record.ip.as_deref());
    }

    if let Some(public_ip) = record.public_ip.as_deref() {
        return IpSelection::Public(public_ip);
    }

    match record.tailscale_private_ip.as_deref() {
        Some(tailscale_ip) => IpSelection::Tailscale(tailscale_ip),
        None => IpSelection::Unavailable,
    }
}

/// Whether the server is reachable only over the tailnet
pub fn needs_no_public_ip_advisory(record: &ServerRecord) -> bool {
    record.preferred_connection_type != ConnectionType::Ssh
        && record.public_ip.is_none()
        && record.tailscale_private_ip.is_some()
}
