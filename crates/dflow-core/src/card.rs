//! Server card view model
//!
//! Collects what a renderer shows for one server: status badge and banner,
//! the address line, the billing date of dFlow orders and the detail link.
//! The terminal renderer and the JSON output both read from [`ServerCard`].

use crate::address::{
    AddressIcon, AddressTone, NO_PUBLIC_IP_ADVISORY, needs_no_public_ip_advisory, select_ip,
};
use crate::classifier::Classifier;
use crate::model::ServerRecord;
use crate::status::{Accent, Badge, Banner, ServerStatus, StatusKind};
use serde::Serialize;

const NO_DESCRIPTION: &str = "No description provided";
const DPKG_LOCK_TOOLTIP: &str = "dpkg is locked. Wait for package operations to complete.";
const BILLING_DATE_FORMAT: &str = "%b %-d, %Y";

/// Icon token shown inside the status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusIcon {
    Cloud,
    Settings,
    AlertCircle,
    WifiOff,
}

impl StatusIcon {
    /// Connected servers get no icon
    pub fn for_status(status: &ServerStatus) -> Option<Self> {
        match status.kind() {
            StatusKind::Provisioning | StatusKind::Connecting => Some(StatusIcon::Cloud),
            StatusKind::CloudInit => Some(StatusIcon::Settings),
            StatusKind::Disconnected | StatusKind::ConnectionError => Some(StatusIcon::WifiOff),
            StatusKind::Connected => None,
            StatusKind::OnboardingRequired
            | StatusKind::DpkgLocked
            | StatusKind::DpkgLockedOnboarded
            | StatusKind::Unknown => Some(StatusIcon::AlertCircle),
        }
    }
}

/// ` (n/max)` suffix of the badge while a dFlow server is connecting.
///
/// The stored counter is zero-based, the displayed one is one-based.
pub fn attempts_annotation(record: &ServerRecord, status: &ServerStatus) -> Option<String> {
    if !record.is_dflow() {
        return None;
    }
    status
        .progress()
        .map(|p| format!(" ({}/{})", p.attempts.saturating_add(1), p.max_attempts))
}

/// Rendering context shared by all cards of a listing
#[derive(Debug, Clone, Default)]
pub struct CardContext {
    /// Organisation slug used to build detail links
    pub organisation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
    pub label: &'static str,
    pub value: String,
    pub has_value: bool,
    pub icon: AddressIcon,
    pub tone: AddressTone,
    /// Set when the server can only be reached over the tailnet
    pub advisory: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardAlert {
    pub title: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillingView {
    pub date: String,
    pub tooltip: String,
}

/// Everything shown on a server card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCard {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub provider: String,
    pub status: StatusKind,
    pub title: &'static str,
    pub subtitle: String,
    pub badge: Badge,
    /// Badge text including the attempt counter
    pub badge_label: String,
    pub icon: Option<StatusIcon>,
    pub accent: Accent,
    pub banner: Option<Banner>,
    /// Tooltip of the lock indicator, set for both dpkg states
    pub dpkg_lock: Option<&'static str>,
    pub alert: Option<CardAlert>,
    pub address: AddressView,
    pub next_billing: Option<BillingView>,
    pub link: Option<String>,
}

impl ServerCard {
    pub fn build(record: &ServerRecord, status: &ServerStatus, ctx: &CardContext) -> Self {
        let badge = status.badge();
        let badge_label = match attempts_annotation(record, status) {
            Some(annotation) => format!("{}{}", badge.text, annotation),
            None => badge.text.to_string(),
        };

        let dpkg_lock = matches!(
            status.kind(),
            StatusKind::DpkgLocked | StatusKind::DpkgLockedOnboarded
        )
        .then_some(DPKG_LOCK_TOOLTIP);

        let alert = (status.kind() == StatusKind::Unknown).then_some(CardAlert {
            title: "Unknown Server Status",
            message: "Unable to determine server status. Please refresh or check your server \
                      configuration. If the issue persists, contact support.",
        });

        let selection = select_ip(record);
        let address = AddressView {
            label: selection.label(),
            value: selection.display_value().to_string(),
            has_value: selection.has_value(),
            icon: selection.icon(),
            tone: selection.tone(),
            advisory: needs_no_public_ip_advisory(record).then_some(NO_PUBLIC_IP_ADVISORY),
        };

        let next_billing = record
            .next_billing_date
            .filter(|_| record.is_dflow())
            .map(|date| {
                let date = date.format(BILLING_DATE_FORMAT).to_string();
                BillingView {
                    tooltip: format!("Dflow instance expires on {}", date),
                    date,
                }
            });

        let link = match (ctx.organisation.as_deref(), record.id.as_deref()) {
            (Some(org), Some(id)) => Some(format!("/{}/servers/{}", org, id)),
            _ => None,
        };

        Self {
            id: record.id.clone(),
            name: record.display_name().to_string(),
            description: record
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            provider: record.provider.clone(),
            status: status.kind(),
            title: status.title(),
            subtitle: status.subtitle(),
            badge,
            badge_label,
            icon: StatusIcon::for_status(status),
            accent: status.accent(),
            banner: status.banner(),
            dpkg_lock,
            alert,
            address,
            next_billing,
            link,
        }
    }

    /// Classify `record` and build its card
    pub fn from_record(record: &ServerRecord, classifier: &Classifier, ctx: &CardContext) -> Self {
        let status = classifier.classify(record);
        Self::build(record, &status, ctx)
    }
}
