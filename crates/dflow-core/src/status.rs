//! Server status outcomes
//!
//! [`ServerStatus`] is the closed set of outcomes the classifier can produce.
//! Everything a renderer needs (texts, badge, accent, banner) is derived from
//! the variant, so adding a variant forces every consumer to handle it.

use serde::Serialize;

/// Stable tag of a status outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusKind {
    Provisioning,
    Connecting,
    ConnectionError,
    Disconnected,
    CloudInit,
    #[serde(rename = "onboarding")]
    OnboardingRequired,
    DpkgLocked,
    DpkgLockedOnboarded,
    Connected,
    Unknown,
}

impl StatusKind {
    pub const ALL: [StatusKind; 10] = [
        StatusKind::Provisioning,
        StatusKind::Connecting,
        StatusKind::ConnectionError,
        StatusKind::Disconnected,
        StatusKind::CloudInit,
        StatusKind::OnboardingRequired,
        StatusKind::DpkgLocked,
        StatusKind::DpkgLockedOnboarded,
        StatusKind::Connected,
        StatusKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Provisioning => "provisioning",
            StatusKind::Connecting => "connecting",
            StatusKind::ConnectionError => "connection-error",
            StatusKind::Disconnected => "disconnected",
            StatusKind::CloudInit => "cloud-init",
            StatusKind::OnboardingRequired => "onboarding",
            StatusKind::DpkgLocked => "dpkg-locked",
            StatusKind::DpkgLockedOnboarded => "dpkg-locked-onboarded",
            StatusKind::Connected => "connected",
            StatusKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection attempts made so far against the configured ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProgress {
    /// Zero-based counter as stored by the backend
    pub attempts: u32,
    pub max_attempts: u32,
}

/// Severity of a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Secondary,
    Destructive,
    Warning,
    Success,
}

/// Badge shown next to the server name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub variant: BadgeVariant,
    pub text: &'static str,
    pub tooltip: Option<&'static str>,
}

/// Border/accent color token of a server card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Purple,
    Blue,
    Red,
    Amber,
    Yellow,
    Green,
    Gray,
}

impl Accent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accent::Purple => "purple",
            Accent::Blue => "blue",
            Accent::Red => "red",
            Accent::Amber => "amber",
            Accent::Yellow => "yellow",
            Accent::Green => "green",
            Accent::Gray => "gray",
        }
    }
}

/// Payload of the supplementary banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub server_name: Option<String>,
    #[serde(flatten)]
    pub progress: Option<ConnectionProgress>,
}

/// Outcome of classifying a server snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerStatus {
    Provisioning {
        server_name: Option<String>,
    },
    Connecting {
        server_name: Option<String>,
        progress: ConnectionProgress,
    },
    ConnectionError {
        server_name: Option<String>,
    },
    Disconnected,
    CloudInit {
        server_name: Option<String>,
    },
    #[serde(rename = "onboarding")]
    OnboardingRequired,
    DpkgLocked,
    DpkgLockedOnboarded,
    Connected,
    Unknown,
}

const DPKG_TOOLTIP: &str = "dpkg is locked. Wait for package operations to complete.";
const ONBOARDING_TEXT: &str = "Server is connected but needs to be onboarded.";
const UNKNOWN_TEXT: &str = "Unable to determine server status.";

/// `"name"` when known, the generic fallback otherwise
fn subject(server_name: &Option<String>, fallback: &str) -> String {
    match server_name {
        Some(name) => format!("\"{}\"", name),
        None => fallback.to_string(),
    }
}

impl ServerStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            ServerStatus::Provisioning { .. } => StatusKind::Provisioning,
            ServerStatus::Connecting { .. } => StatusKind::Connecting,
            ServerStatus::ConnectionError { .. } => StatusKind::ConnectionError,
            ServerStatus::Disconnected => StatusKind::Disconnected,
            ServerStatus::CloudInit { .. } => StatusKind::CloudInit,
            ServerStatus::OnboardingRequired => StatusKind::OnboardingRequired,
            ServerStatus::DpkgLocked => StatusKind::DpkgLocked,
            ServerStatus::DpkgLockedOnboarded => StatusKind::DpkgLockedOnboarded,
            ServerStatus::Connected => StatusKind::Connected,
            ServerStatus::Unknown => StatusKind::Unknown,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ServerStatus::Provisioning { .. } => "Server Provisioning",
            ServerStatus::Connecting { .. } => "Connecting to Server",
            ServerStatus::ConnectionError { .. } => "Connection Issue Detected",
            ServerStatus::Disconnected => "Server Disconnected",
            ServerStatus::CloudInit { .. } => "Server Initialization Running",
            ServerStatus::OnboardingRequired => "Onboarding Required",
            ServerStatus::DpkgLocked => "dpkg Locked",
            ServerStatus::DpkgLockedOnboarded => "dpkg Locked (Onboarded)",
            ServerStatus::Connected => "Server Connected",
            ServerStatus::Unknown => "Unknown Status",
        }
    }

    pub fn subtitle(&self) -> String {
        match self {
            ServerStatus::Provisioning { server_name } => format!(
                "{} is being provisioned. This may take a few minutes.",
                subject(server_name, "Your dFlow server")
            ),
            ServerStatus::Connecting { server_name, .. } => format!(
                "{} is being connected. This may take a few minutes.",
                subject(server_name, "Your dFlow server")
            ),
            ServerStatus::ConnectionError { server_name } => format!(
                "{} could not be connected after multiple attempts.",
                subject(server_name, "Your server")
            ),
            ServerStatus::Disconnected => "Unable to connect to the server.".to_string(),
            ServerStatus::CloudInit { server_name } => format!(
                "{} is being initialized. This may take a few minutes.",
                subject(server_name, "Your server")
            ),
            ServerStatus::OnboardingRequired => ONBOARDING_TEXT.to_string(),
            ServerStatus::DpkgLocked => "System package manager (dpkg) is currently locked. \
                 Wait for ongoing operations to finish."
                .to_string(),
            ServerStatus::DpkgLockedOnboarded => "Server is onboarded, but dpkg is currently \
                 locked. Wait for package operations to finish."
                .to_string(),
            ServerStatus::Connected => "Server is connected and ready for use.".to_string(),
            ServerStatus::Unknown => UNKNOWN_TEXT.to_string(),
        }
    }

    pub fn badge(&self) -> Badge {
        let (variant, text, tooltip) = match self {
            ServerStatus::Provisioning { .. } => (
                BadgeVariant::Secondary,
                "Provisioning",
                Some("dFlow server is being provisioned. This may take a few minutes."),
            ),
            ServerStatus::Connecting { .. } => (
                BadgeVariant::Secondary,
                "Connecting",
                Some("Attempting to connect to the server. This may take a few minutes."),
            ),
            ServerStatus::ConnectionError { .. } => (
                BadgeVariant::Destructive,
                "Connection Error",
                Some(
                    "Server could not be connected after multiple attempts. \
                     Please contact support.",
                ),
            ),
            ServerStatus::Disconnected => (
                BadgeVariant::Destructive,
                "Disconnected",
                Some("Check server configuration or network status."),
            ),
            ServerStatus::CloudInit { .. } => (
                BadgeVariant::Secondary,
                "Initializing",
                Some("Cloud-init is running. Please wait for initialization to complete."),
            ),
            ServerStatus::OnboardingRequired => (
                BadgeVariant::Warning,
                "Onboarding Required",
                Some(ONBOARDING_TEXT),
            ),
            ServerStatus::DpkgLocked | ServerStatus::DpkgLockedOnboarded => {
                (BadgeVariant::Warning, "dpkg Locked", Some(DPKG_TOOLTIP))
            }
            ServerStatus::Connected => (BadgeVariant::Success, "Connected", None),
            ServerStatus::Unknown => (BadgeVariant::Secondary, "Unknown Status", Some(UNKNOWN_TEXT)),
        };

        Badge {
            variant,
            text,
            tooltip,
        }
    }

    pub fn accent(&self) -> Accent {
        match self {
            ServerStatus::Provisioning { .. } => Accent::Purple,
            ServerStatus::Connecting { .. } | ServerStatus::CloudInit { .. } => Accent::Blue,
            ServerStatus::ConnectionError { .. } | ServerStatus::Disconnected => Accent::Red,
            ServerStatus::OnboardingRequired => Accent::Amber,
            ServerStatus::DpkgLocked | ServerStatus::DpkgLockedOnboarded => Accent::Yellow,
            ServerStatus::Connected => Accent::Green,
            ServerStatus::Unknown => Accent::Gray,
        }
    }

    pub fn shows_banner(&self) -> bool {
        self.banner().is_some()
    }

    /// Banner payload for the in-flight states; `None` means no banner
    pub fn banner(&self) -> Option<Banner> {
        match self {
            ServerStatus::Provisioning { server_name }
            | ServerStatus::ConnectionError { server_name }
            | ServerStatus::CloudInit { server_name } => Some(Banner {
                server_name: server_name.clone(),
                progress: None,
            }),
            ServerStatus::Connecting {
                server_name,
                progress,
            } => Some(Banner {
                server_name: server_name.clone(),
                progress: Some(*progress),
            }),
            _ => None,
        }
    }

    /// Connection progress, only present while connecting
    pub fn progress(&self) -> Option<ConnectionProgress> {
        match self {
            ServerStatus::Connecting { progress, .. } => Some(*progress),
            _ => None,
        }
    }
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.badge().text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_uses_quoted_name() {
        let status = ServerStatus::Provisioning {
            server_name: Some("web-1".to_string()),
        };
        assert_eq!(
            status.subtitle(),
            "\"web-1\" is being provisioned. This may take a few minutes."
        );
    }

    #[test]
    fn test_subtitle_fallbacks() {
        let connecting = ServerStatus::Connecting {
            server_name: None,
            progress: ConnectionProgress {
                attempts: 0,
                max_attempts: 30,
            },
        };
        assert!(connecting.subtitle().starts_with("Your dFlow server "));

        let error = ServerStatus::ConnectionError { server_name: None };
        assert!(error.subtitle().starts_with("Your server "));
    }

    #[test]
    fn test_dpkg_subtitles_are_single_spaced() {
        assert_eq!(
            ServerStatus::DpkgLocked.subtitle(),
            "System package manager (dpkg) is currently locked. Wait for ongoing operations to finish."
        );
        assert_eq!(
            ServerStatus::DpkgLockedOnboarded.subtitle(),
            "Server is onboarded, but dpkg is currently locked. Wait for package operations to finish."
        );
    }

    #[test]
    fn test_connected_badge_has_no_tooltip() {
        let badge = ServerStatus::Connected.badge();
        assert_eq!(badge.variant, BadgeVariant::Success);
        assert_eq!(badge.text, "Connected");
        assert!(badge.tooltip.is_none());
    }

    #[test]
    fn test_banners() {
        assert!(!ServerStatus::Disconnected.shows_banner());
        assert!(!ServerStatus::Unknown.shows_banner());
        assert!(ServerStatus::CloudInit { server_name: None }.shows_banner());

        let banner = ServerStatus::Connecting {
            server_name: Some("db".to_string()),
            progress: ConnectionProgress {
                attempts: 3,
                max_attempts: 30,
            },
        }
        .banner()
        .unwrap();
        assert_eq!(banner.progress.unwrap().attempts, 3);
        assert_eq!(banner.server_name.as_deref(), Some("db"));
    }

    #[test]
    fn test_kind_tags() {
        let tags: Vec<&str> = StatusKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            tags,
            vec![
                "provisioning",
                "connecting",
                "connection-error",
                "disconnected",
                "cloud-init",
                "onboarding",
                "dpkg-locked",
                "dpkg-locked-onboarded",
                "connected",
                "unknown",
            ]
        );
    }

    #[test]
    fn test_serialized_tag_matches_kind() {
        let value = serde_json::to_value(ServerStatus::OnboardingRequired).unwrap();
        assert_eq!(value["type"], "onboarding");

        let value = serde_json::to_value(ServerStatus::ConnectionError { server_name: None })
            .unwrap();
        assert_eq!(value["type"], "connection-error");
    }
}
