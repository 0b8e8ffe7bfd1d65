//! Server status classifier
//!
//! Classification runs an ordered [`DecisionTable`] over the [`Facts`]
//! gathered from a [`ServerRecord`]. The first rule that matches wins; when
//! none does the outcome is [`StatusKind::Unknown`].
//!
//! Default rule order:
//!
//! | # | facts | outcome |
//! |---|-------|---------|
//! | 1 | dflow, provisioning | Provisioning |
//! | 2 | dflow, running, not-checked-yet, attempts < max | Connecting |
//! | 3 | dflow, running, not-checked-yet, attempts >= max | ConnectionError |
//! | 4 | not connected | Disconnected |
//! | 5 | connected, cloud-init running | CloudInit |
//! | 6 | connected, not onboarded | OnboardingRequired |
//! | 7 | connected, not onboarded, dpkg locked | DpkgLocked |
//! | 8 | connected, onboarded, dpkg locked | DpkgLockedOnboarded |
//! | 9 | connected, onboarded | Connected |
//!
//! Rule 7 is shadowed by rule 6 in this order. [`DpkgPrecedence::DpkgFirst`]
//! swaps the two so a locked server that is not onboarded reports the lock.

use crate::model::{ConnectionStatus, ProvisioningStatus, ServerRecord};
use crate::status::{ConnectionProgress, ServerStatus, StatusKind};
use serde::{Deserialize, Serialize};

/// Attempts after which a dFlow server that never answered is reported as failed
pub const MAX_CONNECTION_ATTEMPTS: u32 = 30;

/// Ordering of the onboarding and dpkg-lock rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DpkgPrecedence {
    /// Onboarding is checked first; the non-onboarded dpkg rule never fires
    #[default]
    AsWritten,
    /// The non-onboarded dpkg rule is checked before onboarding
    DpkgFirst,
}

impl std::fmt::Display for DpkgPrecedence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DpkgPrecedence::AsWritten => write!(f, "as-written"),
            DpkgPrecedence::DpkgFirst => write!(f, "dpkg-first"),
        }
    }
}

/// Classifier options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierOptions {
    pub max_connection_attempts: u32,
    pub dpkg_precedence: DpkgPrecedence,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            max_connection_attempts: MAX_CONNECTION_ATTEMPTS,
            dpkg_precedence: DpkgPrecedence::default(),
        }
    }
}

/// The inputs every rule is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Facts {
    pub is_dflow: bool,
    pub provisioning: Option<ProvisioningStatus>,
    pub connection: ConnectionStatus,
    pub attempts_exhausted: bool,
    pub cloud_init_running: bool,
    pub onboarded: bool,
    pub dpkg_locked: bool,
}

impl Facts {
    pub fn gather(record: &ServerRecord, max_connection_attempts: u32) -> Self {
        Self {
            is_dflow: record.is_dflow(),
            provisioning: record.provisioning_status,
            connection: record.connection_status,
            attempts_exhausted: record.connection_attempts >= max_connection_attempts,
            cloud_init_running: record.is_cloud_init_running(),
            onboarded: record.onboarded,
            dpkg_locked: record.dpkg_locked,
        }
    }

    fn connected(&self) -> bool {
        self.connection == ConnectionStatus::Success
    }

    fn connected_idle(&self) -> bool {
        self.connected() && !self.cloud_init_running
    }

    fn dflow_awaiting_first_check(&self) -> bool {
        self.is_dflow
            && self.provisioning == Some(ProvisioningStatus::Running)
            && self.connection == ConnectionStatus::NotCheckedYet
    }
}

/// A single row of the decision table
#[derive(Clone, Copy)]
pub struct Rule {
    pub kind: StatusKind,
    pub matches: fn(&Facts) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("kind", &self.kind).finish()
    }
}

fn provisioning(f: &Facts) -> bool {
    f.is_dflow && f.provisioning == Some(ProvisioningStatus::Provisioning)
}

fn connecting(f: &Facts) -> bool {
    f.dflow_awaiting_first_check() && !f.attempts_exhausted
}

fn connection_error(f: &Facts) -> bool {
    f.dflow_awaiting_first_check() && f.attempts_exhausted
}

fn disconnected(f: &Facts) -> bool {
    !f.connected()
}

fn cloud_init(f: &Facts) -> bool {
    f.connected() && f.cloud_init_running
}

fn onboarding_required(f: &Facts) -> bool {
    f.connected_idle() && !f.onboarded
}

fn dpkg_locked(f: &Facts) -> bool {
    f.connected_idle() && !f.onboarded && f.dpkg_locked
}

fn dpkg_locked_onboarded(f: &Facts) -> bool {
    f.connected_idle() && f.onboarded && f.dpkg_locked
}

fn connected(f: &Facts) -> bool {
    f.connected_idle() && f.onboarded
}

const PROVISIONING: Rule = Rule {
    kind: StatusKind::Provisioning,
    matches: provisioning,
};
const CONNECTING: Rule = Rule {
    kind: StatusKind::Connecting,
    matches: connecting,
};
const CONNECTION_ERROR: Rule = Rule {
    kind: StatusKind::ConnectionError,
    matches: connection_error,
};
const DISCONNECTED: Rule = Rule {
    kind: StatusKind::Disconnected,
    matches: disconnected,
};
const CLOUD_INIT: Rule = Rule {
    kind: StatusKind::CloudInit,
    matches: cloud_init,
};
const ONBOARDING_REQUIRED: Rule = Rule {
    kind: StatusKind::OnboardingRequired,
    matches: onboarding_required,
};
const DPKG_LOCKED: Rule = Rule {
    kind: StatusKind::DpkgLocked,
    matches: dpkg_locked,
};
const DPKG_LOCKED_ONBOARDED: Rule = Rule {
    kind: StatusKind::DpkgLockedOnboarded,
    matches: dpkg_locked_onboarded,
};
const CONNECTED: Rule = Rule {
    kind: StatusKind::Connected,
    matches: connected,
};

/// Ordered list of rules; first match wins
#[derive(Debug, Clone)]
pub struct DecisionTable {
    rules: Vec<Rule>,
}

impl DecisionTable {
    /// The standard nine rules in the order given by `precedence`
    pub fn standard(precedence: DpkgPrecedence) -> Self {
        let (sixth, seventh) = match precedence {
            DpkgPrecedence::AsWritten => (ONBOARDING_REQUIRED, DPKG_LOCKED),
            DpkgPrecedence::DpkgFirst => (DPKG_LOCKED, ONBOARDING_REQUIRED),
        };

        Self {
            rules: vec![
                PROVISIONING,
                CONNECTING,
                CONNECTION_ERROR,
                DISCONNECTED,
                CLOUD_INIT,
                sixth,
                seventh,
                DPKG_LOCKED_ONBOARDED,
                CONNECTED,
            ],
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Keep only the rules for which `keep` returns true
    pub fn retain(mut self, keep: impl Fn(&Rule) -> bool) -> Self {
        self.rules.retain(|rule| keep(rule));
        self
    }

    /// Outcome of the first matching rule, `Unknown` when none matches
    pub fn evaluate(&self, facts: &Facts) -> StatusKind {
        self.rules
            .iter()
            .find(|rule| (rule.matches)(facts))
            .map(|rule| rule.kind)
            .unwrap_or(StatusKind::Unknown)
    }
}

impl Default for DecisionTable {
    fn default() -> Self {
        Self::standard(DpkgPrecedence::default())
    }
}

/// Maps server snapshots to a [`ServerStatus`]
#[derive(Debug, Clone)]
pub struct Classifier {
    options: ClassifierOptions,
    table: DecisionTable,
}

impl Classifier {
    pub fn new(options: ClassifierOptions) -> Self {
        Self {
            options,
            table: DecisionTable::standard(options.dpkg_precedence),
        }
    }

    /// Use a custom table instead of the standard one
    pub fn with_table(options: ClassifierOptions, table: DecisionTable) -> Self {
        Self { options, table }
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    pub fn table(&self) -> &DecisionTable {
        &self.table
    }

    pub fn classify(&self, record: &ServerRecord) -> ServerStatus {
        let facts = Facts::gather(record, self.options.max_connection_attempts);
        let kind = self.table.evaluate(&facts);

        tracing::trace!(
            server = record.display_name(),
            provider = %record.provider,
            connection = %record.connection_status,
            attempts = record.connection_attempts,
            status = %kind,
            "classified server"
        );

        self.build(kind, record)
    }

    fn build(&self, kind: StatusKind, record: &ServerRecord) -> ServerStatus {
        let server_name = record.name.clone();
        match kind {
            StatusKind::Provisioning => ServerStatus::Provisioning { server_name },
            StatusKind::Connecting => ServerStatus::Connecting {
                server_name,
                progress: ConnectionProgress {
                    attempts: record.connection_attempts,
                    max_attempts: self.options.max_connection_attempts,
                },
            },
            StatusKind::ConnectionError => ServerStatus::ConnectionError { server_name },
            StatusKind::Disconnected => ServerStatus::Disconnected,
            StatusKind::CloudInit => ServerStatus::CloudInit { server_name },
            StatusKind::OnboardingRequired => ServerStatus::OnboardingRequired,
            StatusKind::DpkgLocked => ServerStatus::DpkgLocked,
            StatusKind::DpkgLockedOnboarded => ServerStatus::DpkgLockedOnboarded,
            StatusKind::Connected => ServerStatus::Connected,
            StatusKind::Unknown => ServerStatus::Unknown,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierOptions::default())
    }
}

/// Classify with default options
pub fn classify(record: &ServerRecord) -> ServerStatus {
    Classifier::default().classify(record)
}
