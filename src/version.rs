//! Service version resolution and the `--autoclone` policy.
//!
//! Nearly every command that touches a versioned resource goes through
//! [`VersionResolver::resolve`] before building its request: the user's
//! `--version` value is turned into a concrete version number, the command's
//! [`ResolutionPolicy`] is checked against that version, and a non-editable
//! version is cloned when `--autoclone` permits it.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::api::types::Version;

/// Read-only view of a service's versions.
#[async_trait]
pub trait VersionDirectory: Send + Sync {
    async fn list_versions(&self, service_id: &str) -> anyhow::Result<Vec<Version>>;
}

/// Creates a new, unlocked and inactive copy of a version.
#[async_trait]
pub trait VersionCloner: Send + Sync {
    /// Returns the number of the newly created version.
    async fn clone_version(&self, service_id: &str, number: u32) -> anyhow::Result<u32>;
}

// ============ Version specifier ============

/// What the user passed to `--version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSpec {
    Number(u32),
    Latest,
    Active,
}

impl FromStr for VersionSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "active" => Ok(Self::Active),
            other => match other.parse::<u32>() {
                Ok(n) if n > 0 => Ok(Self::Number(n)),
                _ => Err(format!(
                    "invalid version '{s}': expected 'latest', 'active' or a positive number"
                )),
            },
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Latest => f.write_str("latest"),
            Self::Active => f.write_str("active"),
        }
    }
}

// ============ Policy ============

/// Per-command rules for which versions may be operated on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPolicy {
    /// An active version may be used as-is.
    pub allow_active: bool,
    /// A locked version may be used as-is.
    pub allow_locked: bool,
    /// `Some(true)` requires a staged version, `Some(false)` forbids one.
    pub require_staging: Option<bool>,
    /// `Some(true)` requires the active version, `Some(false)` forbids it.
    pub require_active: Option<bool>,
    /// Clone a disallowed active/locked version instead of failing.
    pub auto_clone: bool,
    /// An unset specifier is an error rather than `latest`.
    pub version_required: bool,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self::editable()
    }
}

impl ResolutionPolicy {
    /// Policy for mutating a versioned resource: the version must be
    /// neither active nor locked.
    pub fn editable() -> Self {
        Self {
            allow_active: false,
            allow_locked: false,
            require_staging: None,
            require_active: None,
            auto_clone: false,
            version_required: true,
        }
    }

    /// Policy for reads: any version will do.
    pub fn read_only() -> Self {
        Self {
            allow_active: true,
            allow_locked: true,
            ..Self::editable()
        }
    }

    pub fn with_auto_clone(mut self, auto_clone: bool) -> Self {
        self.auto_clone = auto_clone;
        self
    }

    pub fn with_allow_active(mut self, allow: bool) -> Self {
        self.allow_active = allow;
        self
    }

    pub fn with_allow_locked(mut self, allow: bool) -> Self {
        self.allow_locked = allow;
        self
    }

    pub fn with_staging(mut self, staged: bool) -> Self {
        self.require_staging = Some(staged);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.require_active = Some(active);
        self
    }
}

// ============ Errors ============

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("no service version specified (use --version with a number, 'latest' or 'active')")]
    MissingVersion,

    #[error("service version {number} not found")]
    VersionNotFound { number: u32 },

    #[error("no active service version found")]
    NoActiveVersion,

    #[error("no service versions available")]
    NoVersions,

    #[error("service version {number} is {}", staging_state(.got))]
    StagingMismatch { number: u32, wanted: bool, got: bool },

    #[error("service version {number} is {}", active_state(.got))]
    ActiveMismatch { number: u32, wanted: bool, got: bool },

    #[error("service version {number} is active and cannot be edited")]
    VersionActive { number: u32 },

    #[error("service version {number} is locked and cannot be edited")]
    VersionLocked { number: u32 },

    #[error("error listing versions of service {service_id}")]
    Directory {
        service_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("error cloning version {number} of service {service_id}")]
    Clone {
        service_id: String,
        number: u32,
        #[source]
        source: anyhow::Error,
    },
}

fn staging_state(staged: &bool) -> &'static str {
    if *staged {
        "staged"
    } else {
        "not staged"
    }
}

fn active_state(active: &bool) -> &'static str {
    if *active {
        "active"
    } else {
        "not active"
    }
}

impl VersionError {
    /// Errors the user can fix by passing `--autoclone`.
    pub fn is_not_editable(&self) -> bool {
        matches!(self, Self::VersionActive { .. } | Self::VersionLocked { .. })
    }
}

// ============ Resolver ============

/// Outcome of a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// Version the command should operate on.
    pub number: u32,
    /// Whether `number` was created by cloning.
    pub cloned: bool,
    /// Version the specifier pointed at before any clone.
    pub source: u32,
}

enum Verdict {
    Use,
    Clone,
}

pub struct VersionResolver<'a> {
    directory: &'a dyn VersionDirectory,
    cloner: &'a dyn VersionCloner,
}

impl<'a> VersionResolver<'a> {
    pub fn new(directory: &'a dyn VersionDirectory, cloner: &'a dyn VersionCloner) -> Self {
        Self { directory, cloner }
    }

    /// Turn `spec` into a version number that satisfies `policy`, cloning at
    /// most once.
    pub async fn resolve(
        &self,
        service_id: &str,
        spec: Option<VersionSpec>,
        policy: &ResolutionPolicy,
    ) -> Result<Resolved, VersionError> {
        let versions = self
            .directory
            .list_versions(service_id)
            .await
            .map_err(|source| VersionError::Directory {
                service_id: service_id.to_string(),
                source,
            })?;

        let spec = match spec {
            Some(spec) => spec,
            None if policy.version_required => return Err(VersionError::MissingVersion),
            None => VersionSpec::Latest,
        };

        let entry = select(&versions, spec)?;
        debug!(service_id, spec = %spec, number = entry.number, "resolved service version");

        match evaluate(entry, policy)? {
            Verdict::Use => Ok(Resolved {
                number: entry.number,
                cloned: false,
                source: entry.number,
            }),
            Verdict::Clone => {
                let number = self
                    .cloner
                    .clone_version(service_id, entry.number)
                    .await
                    .map_err(|source| VersionError::Clone {
                        service_id: service_id.to_string(),
                        number: entry.number,
                        source,
                    })?;
                debug!(service_id, from = entry.number, to = number, "auto-cloned service version");
                Ok(Resolved {
                    number,
                    cloned: true,
                    source: entry.number,
                })
            }
        }
    }
}

/// Pick the version a specifier points at.
pub fn select(versions: &[Version], spec: VersionSpec) -> Result<&Version, VersionError> {
    match spec {
        VersionSpec::Number(number) => versions
            .iter()
            .find(|v| v.number == number)
            .ok_or(VersionError::VersionNotFound { number }),
        VersionSpec::Latest => versions
            .iter()
            .max_by_key(|v| v.number)
            .ok_or(VersionError::NoVersions),
        VersionSpec::Active => {
            if versions.is_empty() {
                return Err(VersionError::NoVersions);
            }
            versions
                .iter()
                .find(|v| v.active)
                .ok_or(VersionError::NoActiveVersion)
        }
    }
}

// Active is checked before locked, so an active+locked version clones once.
fn evaluate(v: &Version, policy: &ResolutionPolicy) -> Result<Verdict, VersionError> {
    if let Some(wanted) = policy.require_staging {
        if v.staging != wanted {
            return Err(VersionError::StagingMismatch {
                number: v.number,
                wanted,
                got: v.staging,
            });
        }
    }
    if let Some(wanted) = policy.require_active {
        if v.active != wanted {
            return Err(VersionError::ActiveMismatch {
                number: v.number,
                wanted,
                got: v.active,
            });
        }
    }

    if v.active && !policy.allow_active {
        return if policy.auto_clone {
            Ok(Verdict::Clone)
        } else {
            Err(VersionError::VersionActive { number: v.number })
        };
    }
    if v.locked && !policy.allow_locked {
        return if policy.auto_clone {
            Ok(Verdict::Clone)
        } else {
            Err(VersionError::VersionLocked { number: v.number })
        };
    }
    Ok(Verdict::Use)
}
